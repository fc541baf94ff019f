/// `spec.md` §7: "missing files, zero sources, contradictory flags" —
/// reported at startup, exit code 1.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required option: {0}")]
    Missing(&'static str),
    #[error("no sources declared")]
    NoSources,
    #[error("source {name:?}: missing required option {key:?}")]
    MissingSourceField { name: String, key: &'static str },
    #[error("source {name:?}: {key}={value:?} is not a valid {expected}")]
    InvalidValue {
        name: String,
        key: String,
        value: String,
        expected: &'static str,
    },
    #[error("source {name:?}: contradictory admission flags (frequency, static_events and weighted resampling are mutually exclusive selectors)")]
    ContradictoryAdmission { name: String },
    #[error("config file {path}: {source}")]
    Yaml {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
