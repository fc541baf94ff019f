//! CLI + YAML configuration (`spec.md` §6.3): fixed flags via `clap`, an
//! optional YAML file via `serde_yaml`, and the CLI-over-YAML precedence
//! merge for per-source declarations.

mod cli;
mod error;
mod load;
mod model;
mod yaml;

pub use cli::{split_source_flags, Cli};
pub use error::ConfigError;
pub use load::load;
pub use model::{resolve_source, RunConfig, SourceConfig};
pub use yaml::{SourceYaml, YamlConfig};
