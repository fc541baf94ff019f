use std::collections::HashMap;
use std::fs;

use crate::cli::{parse_source_overrides, Cli};
use crate::error::ConfigError;
use crate::model::{resolve_source, RunConfig};
use crate::yaml::YamlConfig;

fn read_yaml(path: &std::path::Path) -> Result<YamlConfig, ConfigError> {
    let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.display().to_string(),
        source,
    })?;
    serde_yaml::from_str(&text).map_err(|source| ConfigError::Yaml {
        path: path.display().to_string(),
        source,
    })
}

/// Merge `cli` over an optional `--config FILE` YAML document and the raw
/// `--source:NAME:KEY` overrides, producing a fully resolved [`RunConfig`]
/// (`spec.md` §6.3: "CLI takes precedence over YAML where present; YAML
/// sources not referenced on CLI remain").
pub fn load(
    cli: Cli,
    raw_sources: HashMap<String, HashMap<String, String>>,
) -> Result<RunConfig, ConfigError> {
    let yaml = match &cli.config {
        Some(path) => read_yaml(path)?,
        None => YamlConfig::default(),
    };

    let output = cli.output.or(yaml.output).ok_or(ConfigError::Missing("output"))?;
    let nevents = cli.nevents.or(yaml.nevents).ok_or(ConfigError::Missing("nevents"))?;
    let duration_ns = cli.duration.or(yaml.duration).ok_or(ConfigError::Missing("duration"))?;
    let bunch_period_ns = cli.bunch_period.or(yaml.bunch_period);
    let seed = cli.seed.or(yaml.seed);

    let mut names: Vec<String> = yaml.source.keys().cloned().collect();
    for name in raw_sources.keys() {
        if !names.contains(name) {
            names.push(name.clone());
        }
    }

    let mut sources = Vec::with_capacity(names.len());
    for name in names {
        let yaml_entry = yaml.source.get(&name).cloned().unwrap_or_default();
        let cli_entry = match raw_sources.get(&name) {
            Some(raw) => parse_source_overrides(&name, raw)?,
            None => Default::default(),
        };
        let merged = cli_entry.merged_over(yaml_entry);
        sources.push(resolve_source(name, merged, bunch_period_ns)?);
    }

    if sources.is_empty() {
        return Err(ConfigError::NoSources);
    }

    Ok(RunConfig {
        output,
        nevents,
        duration_ns,
        seed,
        sources,
    })
}
