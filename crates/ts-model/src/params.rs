use serde::{Deserialize, Serialize};

/// Scalar kinds carried by the global-parameters side channel
/// (`GPIntValues`, `GPFloatValues`, `GPDoubleValues`, `GPStringValues`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ParamValue {
    Int(i32),
    Float(f32),
    Double(f64),
    Str(String),
}

/// One `GP*Keys` / `GP*Values` branch pair: a vector of keys paired with a
/// vector of vectors of scalars, one inner vector per key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParamVector {
    pub keys: Vec<String>,
    pub values: Vec<Vec<ParamValue>>,
}

impl ParamVector {
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Size-parity invariant: keys and values move in lockstep.
    pub fn is_consistent(&self) -> bool {
        self.keys.len() == self.values.len()
    }
}
