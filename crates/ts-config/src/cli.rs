use std::collections::HashMap;
use std::path::PathBuf;

use clap::Parser;

use crate::yaml::SourceYaml;

/// Fixed top-level flags (`spec.md` §6.3), mirroring the teacher's
/// `ox-bin::Args` shape. The `--source:NAME:KEY VALUE` flags are dynamic in
/// name and can't be modeled by clap's derive macro, so they're stripped out
/// by [`split_source_flags`] before the remaining argv reaches this parser.
#[derive(Parser, Debug)]
#[command(name = "ts-merge", version, about = "Timeslice event merger")]
pub struct Cli {
    #[arg(long)]
    pub output: Option<PathBuf>,
    #[arg(long)]
    pub nevents: Option<u64>,
    #[arg(long)]
    pub duration: Option<f64>,
    #[arg(long = "bunch-period")]
    pub bunch_period: Option<f64>,
    #[arg(long)]
    pub config: Option<PathBuf>,
    #[arg(long)]
    pub seed: Option<u64>,
}

/// Splits `--source:NAME` / `--source:NAME:KEY VALUE` tokens out of argv,
/// returning the remainder for [`Cli::parse_from`] plus one raw string map
/// per declared source name.
pub fn split_source_flags(args: &[String]) -> (Vec<String>, HashMap<String, HashMap<String, String>>) {
    let mut rest = Vec::new();
    let mut sources: HashMap<String, HashMap<String, String>> = HashMap::new();
    let mut iter = args.iter().cloned().peekable();

    while let Some(arg) = iter.next() {
        let Some(body) = arg.strip_prefix("--source:") else {
            rest.push(arg);
            continue;
        };
        let mut parts = body.splitn(2, ':');
        let name = parts.next().unwrap_or_default().to_string();
        match parts.next() {
            Some(key) => {
                let value = iter.next().unwrap_or_default();
                sources
                    .entry(name)
                    .or_default()
                    .insert(key.to_string(), value);
            }
            None => {
                sources.entry(name).or_default();
            }
        }
    }
    (rest, sources)
}

fn parse_bool(name: &str, key: &'static str, value: &str) -> Result<bool, crate::ConfigError> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(crate::ConfigError::InvalidValue {
            name: name.to_string(),
            key: key.to_string(),
            value: value.to_string(),
            expected: "true|false",
        }),
    }
}

fn parse_f64(name: &str, key: &'static str, value: &str) -> Result<f64, crate::ConfigError> {
    value.parse().map_err(|_| crate::ConfigError::InvalidValue {
        name: name.to_string(),
        key: key.to_string(),
        value: value.to_string(),
        expected: "a floating-point number",
    })
}

fn parse_i32(name: &str, key: &'static str, value: &str) -> Result<i32, crate::ConfigError> {
    value.parse().map_err(|_| crate::ConfigError::InvalidValue {
        name: name.to_string(),
        key: key.to_string(),
        value: value.to_string(),
        expected: "an integer",
    })
}

fn parse_u64(name: &str, key: &'static str, value: &str) -> Result<u64, crate::ConfigError> {
    value.parse().map_err(|_| crate::ConfigError::InvalidValue {
        name: name.to_string(),
        key: key.to_string(),
        value: value.to_string(),
        expected: "a non-negative integer",
    })
}

/// Converts one source's raw `KEY -> VALUE` strings into a [`SourceYaml`]
/// fragment, typed per-key.
pub fn parse_source_overrides(
    name: &str,
    raw: &HashMap<String, String>,
) -> Result<SourceYaml, crate::ConfigError> {
    let mut out = SourceYaml::default();
    for (key, value) in raw {
        match key.as_str() {
            "input_files" => {
                out.input_files = Some(value.split(',').map(PathBuf::from).collect())
            }
            "tree_name" => out.tree_name = Some(value.clone()),
            "frequency" => out.frequency = Some(parse_f64(name, "frequency", value)?),
            "static_events" => out.static_events = Some(parse_bool(name, "static_events", value)?),
            "events_per_slice" => {
                out.events_per_slice = Some(parse_u64(name, "events_per_slice", value)?)
            }
            "placement" => out.placement = Some(value.clone()),
            "bunch_crossing" => {
                out.bunch_crossing = Some(parse_bool(name, "bunch_crossing", value)?)
            }
            "beam_attachment" => {
                out.beam_attachment = Some(parse_bool(name, "beam_attachment", value)?)
            }
            "beam_speed" => out.beam_speed = Some(parse_f64(name, "beam_speed", value)?),
            "beam_spread" => out.beam_spread = Some(parse_f64(name, "beam_spread", value)?),
            "beam_angle" => out.beam_angle = Some(parse_f64(name, "beam_angle", value)?),
            "status_offset" => out.status_offset = Some(parse_i32(name, "status_offset", value)?),
            "already_merged" => {
                out.already_merged = Some(parse_bool(name, "already_merged", value)?)
            }
            "repeat_on_eof" => out.repeat_on_eof = Some(parse_bool(name, "repeat_on_eof", value)?),
            "weight_key" => out.weight_key = Some(value.clone()),
            unknown => {
                tracing::warn!(source = name, key = unknown, "unrecognized --source key, ignoring");
            }
        }
    }
    Ok(out)
}
