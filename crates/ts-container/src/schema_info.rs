use serde::{Deserialize, Serialize};
use ts_model::CollectionData;

/// What a branch's element type looks like, as reported by the container's
/// metadata tree. This is the raw material the schema registry classifies
/// into [`ts_model`]-shaped branches; it carries just enough to decode bytes
/// into the right [`ts_model::CollectionData`] variant, nothing about
/// merging semantics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RawElementKind {
    /// A primary record type, with field names as reported by the
    /// container's reflection metadata. Field *names* (not just counts) are
    /// what let the schema registry recognize `time`/`generatorStatus` and
    /// match range fields to their reference branch without hardcoding a
    /// single collection's layout.
    Primary {
        float_fields: Vec<String>,
        int_fields: Vec<String>,
        /// Range field name prefixes, e.g. `["parents", "daughters"]` for
        /// `MCParticles` (matched against `_MCParticles_parents` etc).
        range_fields: Vec<String>,
    },
    /// A vector of `ObjectId`.
    ObjectIdVec,
    /// A vector of strings (a `GP*Keys` branch).
    StringVec,
    /// A vector of vectors of a scalar parameter type (a `GP*Values` branch).
    ParamValueVec(ParamScalarKind),
    /// A vector of `SubEventHeader` records. Never discovered from a fresh
    /// generator output — this only appears when an already-merged source's
    /// input file is itself a prior run's output container, carrying its
    /// own header branch through.
    HeaderVec,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParamScalarKind {
    Int,
    Float,
    Double,
    Str,
}

/// One branch as reported by the container's metadata tree: a name and an
/// element kind. Discovery order is preserved (`Vec`, not `HashMap`) because
/// it becomes the schema's branch index space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawBranchInfo {
    pub name: String,
    pub kind: RawElementKind,
}

impl RawBranchInfo {
    /// An empty collection of the right variant for this branch's kind,
    /// used to allocate fresh event-local and timeslice-local slots.
    pub fn empty(&self) -> CollectionData {
        match &self.kind {
            RawElementKind::Primary { .. } => CollectionData::Primary(Vec::new()),
            RawElementKind::ObjectIdVec => CollectionData::Reference(Vec::new()),
            RawElementKind::StringVec => CollectionData::Key(Vec::new()),
            RawElementKind::ParamValueVec(_) => {
                CollectionData::Value(ts_model::ParamVector::default())
            }
            RawElementKind::HeaderVec => CollectionData::Header(Vec::new()),
        }
    }
}
