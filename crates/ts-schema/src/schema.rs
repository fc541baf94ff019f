use std::collections::HashMap;

use ts_container::{RawBranchInfo, RawElementKind};
use ts_model::{CollectionData, TimesliceBuffer};

use crate::descriptor::{BranchDescriptor, Category, RangeRule};
use crate::error::SchemaError;

const GP_KEY_NAMES: [&str; 4] = ["GPIntKeys", "GPFloatKeys", "GPDoubleKeys", "GPStringKeys"];
const GP_VALUE_NAMES: [&str; 4] = [
    "GPIntValues",
    "GPFloatValues",
    "GPDoubleValues",
    "GPStringValues",
];

/// The discovered, classified branch set plus every update rule the merger
/// needs, computed once at startup (`spec.md` §3/§4.A).
#[derive(Debug, Clone)]
pub struct Schema {
    branches: Vec<BranchDescriptor>,
    raw: Vec<RawBranchInfo>,
    index_of: HashMap<String, usize>,
    header_index: usize,
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

impl Schema {
    /// Inspect the first source's branch list and classify every branch
    /// (`spec.md` §4.A). Fatal on any branch whose element type cannot be
    /// classified — the core refuses to process unclassifiable branches to
    /// preserve schema stability.
    pub fn discover(raw: &[RawBranchInfo]) -> Result<Schema, SchemaError> {
        let mut primary_names: std::collections::HashSet<&str> = Default::default();
        for b in raw {
            if !b.name.starts_with('_') {
                if let RawElementKind::Primary { .. } = b.kind {
                    primary_names.insert(b.name.as_str());
                }
            }
        }

        let mut kept: Vec<RawBranchInfo> = Vec::new();
        for b in raw {
            if b.name.starts_with('_') {
                match b.kind {
                    RawElementKind::ObjectIdVec => {
                        let remainder = &b.name[1..];
                        match remainder.rsplit_once('_') {
                            Some((owner, _field)) if primary_names.contains(owner) => {
                                kept.push(b.clone());
                            }
                            _ => {
                                tracing::warn!(
                                    branch = b.name.as_str(),
                                    "dangling reference branch: owning collection not found, ignoring"
                                );
                            }
                        }
                    }
                    _ => return Err(SchemaError::Unclassifiable(b.name.clone())),
                }
            } else {
                match &b.kind {
                    RawElementKind::Primary { .. } => kept.push(b.clone()),
                    RawElementKind::StringVec if GP_KEY_NAMES.contains(&b.name.as_str()) => {
                        kept.push(b.clone())
                    }
                    RawElementKind::ParamValueVec(_) if GP_VALUE_NAMES.contains(&b.name.as_str()) => {
                        kept.push(b.clone())
                    }
                    RawElementKind::HeaderVec if b.name == "SubEventHeaders" => {
                        // An already-merged source whose input is itself a
                        // prior run's output. The header branch is always
                        // synthesized below, not rediscovered here.
                    }
                    _ => return Err(SchemaError::Unclassifiable(b.name.clone())),
                }
            }
        }

        let index_of: HashMap<String, usize> = kept
            .iter()
            .enumerate()
            .map(|(i, b)| (b.name.clone(), i))
            .collect();

        let mut branches = Vec::with_capacity(kept.len() + 1);
        for b in &kept {
            let descriptor = if b.name.starts_with('_') {
                let remainder = &b.name[1..];
                let (owner_name, field) = remainder
                    .rsplit_once('_')
                    .expect("validated above: reference branch name has an owner prefix");
                let owner = index_of[owner_name];
                let candidate_target = format!("{owner_name}{}", capitalize(field));
                let target = index_of.get(&candidate_target).copied().unwrap_or(owner);
                BranchDescriptor::reference(b.name.clone(), owner, target)
            } else {
                match &b.kind {
                    RawElementKind::Primary {
                        float_fields,
                        int_fields,
                        range_fields,
                    } => {
                        let mut descriptor = BranchDescriptor::primary(b.name.clone());
                        descriptor.time_field = float_fields.iter().position(|f| f == "time");
                        descriptor.status_field =
                            int_fields.iter().position(|f| f == "generatorStatus");
                        descriptor.vertex_fields = (|| {
                            Some((
                                float_fields.iter().position(|f| f == "vertexX")?,
                                float_fields.iter().position(|f| f == "vertexY")?,
                                float_fields.iter().position(|f| f == "vertexZ")?,
                            ))
                        })();
                        for (slot, field) in range_fields.iter().enumerate() {
                            let ref_branch_name = format!("_{}_{field}", b.name);
                            match index_of.get(&ref_branch_name) {
                                Some(&reference_branch) => {
                                    descriptor.range_rules.push(RangeRule {
                                        range_slot: slot,
                                        reference_branch,
                                    });
                                }
                                None => {
                                    tracing::warn!(
                                        collection = b.name.as_str(),
                                        field = field.as_str(),
                                        "range field has no matching reference branch, leaving unshifted"
                                    );
                                }
                            }
                        }
                        descriptor
                    }
                    RawElementKind::StringVec => {
                        BranchDescriptor::simple(b.name.clone(), Category::Key)
                    }
                    RawElementKind::ParamValueVec(_) => {
                        BranchDescriptor::simple(b.name.clone(), Category::Value)
                    }
                    RawElementKind::ObjectIdVec => unreachable!("filtered above"),
                }
            };
            branches.push(descriptor);
        }

        let header_index = branches.len();
        branches.push(BranchDescriptor::simple(
            "SubEventHeaders".to_string(),
            Category::Header,
        ));

        let mut index_of = index_of;
        index_of.insert("SubEventHeaders".to_string(), header_index);

        Ok(Schema {
            branches,
            raw: kept,
            index_of,
            header_index,
        })
    }

    /// Fatal check (`spec.md` §4.B): a later source's branch list must be a
    /// superset of this schema's branches with matching element types.
    /// Extra (e.g. dangling-reference) branches the later source declares
    /// are tolerated, exactly as they would have been had it been the first
    /// source.
    pub fn validate_against(&self, raw: &[RawBranchInfo]) -> Result<(), SchemaError> {
        let found: HashMap<&str, &RawElementKind> =
            raw.iter().map(|b| (b.name.as_str(), &b.kind)).collect();
        for expected in &self.raw {
            match found.get(expected.name.as_str()) {
                None => {
                    return Err(SchemaError::BranchSetMismatch {
                        expected: self.raw.iter().map(|b| b.name.clone()).collect(),
                        found: raw.iter().map(|b| b.name.clone()).collect(),
                    });
                }
                Some(kind) if **kind != expected.kind => {
                    return Err(SchemaError::TypeMismatch {
                        name: expected.name.clone(),
                    });
                }
                Some(_) => {}
            }
        }
        Ok(())
    }

    pub fn branches(&self) -> &[BranchDescriptor] {
        &self.branches
    }

    pub fn branch(&self, index: usize) -> &BranchDescriptor {
        &self.branches[index]
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.index_of.get(name).copied()
    }

    pub fn header_index(&self) -> usize {
        self.header_index
    }

    pub fn raw_branches(&self) -> &[RawBranchInfo] {
        &self.raw
    }

    /// A freshly allocated, empty buffer with one slot per branch, in
    /// discovery order, ready to be filled by a `Source` or grown by the
    /// merger.
    pub fn empty_buffer(&self) -> TimesliceBuffer {
        let mut slots: Vec<CollectionData> = self.raw.iter().map(RawBranchInfo::empty).collect();
        slots.push(CollectionData::Header(Vec::new()));
        TimesliceBuffer::new(slots)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ts_container::ParamScalarKind;

    fn mc_particles() -> RawBranchInfo {
        RawBranchInfo {
            name: "MCParticles".into(),
            kind: RawElementKind::Primary {
                float_fields: vec!["time".into()],
                int_fields: vec!["generatorStatus".into()],
                range_fields: vec!["parents".into(), "daughters".into()],
            },
        }
    }

    fn mc_daughters_ref() -> RawBranchInfo {
        RawBranchInfo {
            name: "_MCParticles_daughters".into(),
            kind: RawElementKind::ObjectIdVec,
        }
    }

    fn mc_parents_ref() -> RawBranchInfo {
        RawBranchInfo {
            name: "_MCParticles_parents".into(),
            kind: RawElementKind::ObjectIdVec,
        }
    }

    fn calo_hits() -> RawBranchInfo {
        RawBranchInfo {
            name: "ECalBarrelHits".into(),
            kind: RawElementKind::Primary {
                float_fields: vec![],
                int_fields: vec![],
                range_fields: vec!["contributions".into()],
            },
        }
    }

    fn calo_contributions() -> RawBranchInfo {
        RawBranchInfo {
            name: "ECalBarrelHitsContributions".into(),
            kind: RawElementKind::Primary {
                float_fields: vec![],
                int_fields: vec![],
                range_fields: vec![],
            },
        }
    }

    fn calo_contributions_ref() -> RawBranchInfo {
        RawBranchInfo {
            name: "_ECalBarrelHits_contributions".into(),
            kind: RawElementKind::ObjectIdVec,
        }
    }

    #[test]
    fn self_referential_ranges_target_the_owning_collection() {
        let raw = vec![mc_particles(), mc_parents_ref(), mc_daughters_ref()];
        let schema = Schema::discover(&raw).unwrap();
        let mc_idx = schema.index_of("MCParticles").unwrap();
        let mc = schema.branch(mc_idx);
        assert_eq!(mc.range_rules.len(), 2);

        let parents_idx = schema.index_of("_MCParticles_parents").unwrap();
        let parents = schema.branch(parents_idx);
        assert_eq!(parents.target, Some(mc_idx));
        assert_eq!(parents.owner, Some(mc_idx));
    }

    #[test]
    fn companion_contributions_collection_is_the_reference_target() {
        let raw = vec![calo_hits(), calo_contributions(), calo_contributions_ref()];
        let schema = Schema::discover(&raw).unwrap();
        let hits_idx = schema.index_of("ECalBarrelHits").unwrap();
        let contribs_idx = schema.index_of("ECalBarrelHitsContributions").unwrap();
        let ref_idx = schema.index_of("_ECalBarrelHits_contributions").unwrap();

        let reference = schema.branch(ref_idx);
        assert_eq!(reference.target, Some(contribs_idx));
        assert_eq!(reference.owner, Some(hits_idx));

        let hits = schema.branch(hits_idx);
        assert_eq!(hits.range_rules[0].reference_branch, ref_idx);
    }

    #[test]
    fn dangling_reference_is_dropped_not_fatal() {
        let raw = vec![
            mc_particles(),
            RawBranchInfo {
                name: "_Unknown_parents".into(),
                kind: RawElementKind::ObjectIdVec,
            },
        ];
        let schema = Schema::discover(&raw).unwrap();
        assert!(schema.index_of("_Unknown_parents").is_none());
    }

    #[test]
    fn unclassifiable_branch_is_fatal() {
        let raw = vec![RawBranchInfo {
            name: "_MalformedNoUnderscoreSuffix".into(),
            kind: RawElementKind::StringVec,
        }];
        assert!(matches!(
            Schema::discover(&raw),
            Err(SchemaError::Unclassifiable(_))
        ));
    }

    #[test]
    fn global_parameter_branches_classify_as_key_and_value() {
        let raw = vec![
            RawBranchInfo {
                name: "GPIntKeys".into(),
                kind: RawElementKind::StringVec,
            },
            RawBranchInfo {
                name: "GPIntValues".into(),
                kind: RawElementKind::ParamValueVec(ParamScalarKind::Int),
            },
        ];
        let schema = Schema::discover(&raw).unwrap();
        assert_eq!(schema.branch(0).category, Category::Key);
        assert_eq!(schema.branch(1).category, Category::Value);
    }

    #[test]
    fn validate_against_tolerates_extra_dangling_branches() {
        let raw = vec![mc_particles()];
        let schema = Schema::discover(&raw).unwrap();
        let later = vec![
            mc_particles(),
            RawBranchInfo {
                name: "_Extra_field".into(),
                kind: RawElementKind::ObjectIdVec,
            },
        ];
        assert!(schema.validate_against(&later).is_ok());
    }

    #[test]
    fn validate_against_rejects_missing_branch() {
        let raw = vec![mc_particles(), mc_parents_ref()];
        let schema = Schema::discover(&raw).unwrap();
        let later = vec![mc_particles()];
        assert!(matches!(
            schema.validate_against(&later),
            Err(SchemaError::BranchSetMismatch { .. })
        ));
    }
}
