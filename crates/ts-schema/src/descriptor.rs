/// Which of the five `CollectionData` kinds a branch belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Primary,
    Reference,
    Key,
    Value,
    Header,
}

/// Links one of a primary record's range slots to the reference branch whose
/// length it offsets against (`spec.md` §4.D.2, range-add rule).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeRule {
    /// Index into `PrimaryRecord::ranges` for this collection.
    pub range_slot: usize,
    /// Branch index of the companion reference branch, e.g. `_MCParticles_parents`.
    pub reference_branch: usize,
}

/// Everything the merger needs to update one branch's elements, computed
/// once at startup (`spec.md` §3, `BranchDescriptor`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchDescriptor {
    pub name: String,
    pub category: Category,

    /// Index into `PrimaryRecord::floats` holding the time field, if any.
    /// `Category::Primary` only.
    pub time_field: Option<usize>,
    /// Index into `PrimaryRecord::ints` holding `generatorStatus`, if any.
    /// `Category::Primary` only.
    pub status_field: Option<usize>,
    /// One rule per range field this collection declares.
    /// `Category::Primary` only.
    pub range_rules: Vec<RangeRule>,
    /// Indices into `PrimaryRecord::floats` holding `(vertexX, vertexY,
    /// vertexZ)`, if this collection declares all three. `Category::Primary`
    /// only; used for beam attachment's "first primary-status particle"
    /// vertex lookup.
    pub vertex_fields: Option<(usize, usize, usize)>,

    /// Branch index of the primary collection this reference vector's
    /// `ObjectId`s point into. `Category::Reference` only.
    pub target: Option<usize>,
    /// Branch index of the primary collection that owns this reference
    /// branch (the `C` in `_C_<field>`). `Category::Reference` only.
    pub owner: Option<usize>,
}

impl BranchDescriptor {
    pub fn primary(name: String) -> Self {
        Self {
            name,
            category: Category::Primary,
            time_field: None,
            status_field: None,
            range_rules: Vec::new(),
            vertex_fields: None,
            target: None,
            owner: None,
        }
    }

    pub fn reference(name: String, owner: usize, target: usize) -> Self {
        Self {
            name,
            category: Category::Reference,
            time_field: None,
            status_field: None,
            range_rules: Vec::new(),
            vertex_fields: None,
            target: Some(target),
            owner: Some(owner),
        }
    }

    pub fn simple(name: String, category: Category) -> Self {
        Self {
            name,
            category,
            time_field: None,
            status_field: None,
            range_rules: Vec::new(),
            vertex_fields: None,
            target: None,
            owner: None,
        }
    }
}
