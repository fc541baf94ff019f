use std::path::PathBuf;

use ts_sampler::{AdmissionMode, BeamParams, Placement, SourceAdmissionConfig};

use crate::error::ConfigError;
use crate::yaml::SourceYaml;

/// One fully resolved source (`spec.md` §6.3), ready to open a [`ts_source::Source`]
/// and build a [`ts_sampler::SourceSampler`] from.
#[derive(Debug, Clone)]
pub struct SourceConfig {
    pub name: String,
    pub input_files: Vec<PathBuf>,
    pub tree_name: String,
    pub repeat_on_eof: bool,
    pub status_offset: i32,
    pub admission: SourceAdmissionConfig,
}

/// The fully resolved run (`spec.md` §6.3), after merging CLI flags over any
/// `--config FILE` YAML document.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub output: PathBuf,
    pub nevents: u64,
    pub duration_ns: f64,
    pub seed: Option<u64>,
    pub sources: Vec<SourceConfig>,
}

fn default_tree_name() -> String {
    "events".to_string()
}

/// Resolve one merged `(name, SourceYaml)` pair into a [`SourceConfig`],
/// choosing the admission mode per `spec.md` §4.C / §6.3: `frequency > 0`
/// selects Frequency-Poisson; otherwise `static_events` selects Static vs.
/// Weighted-Resampling.
pub fn resolve_source(
    name: String,
    merged: SourceYaml,
    bunch_period_ns: Option<f64>,
) -> Result<SourceConfig, ConfigError> {
    let input_files = merged.input_files.ok_or(ConfigError::MissingSourceField {
        name: name.clone(),
        key: "input_files",
    })?;
    if input_files.is_empty() {
        return Err(ConfigError::MissingSourceField {
            name: name.clone(),
            key: "input_files",
        });
    }

    let already_merged = merged.already_merged.unwrap_or(false);
    let frequency = merged.frequency.unwrap_or(0.0);
    let static_events = merged.static_events.unwrap_or(false);

    let mode = if frequency > 0.0 {
        let placement = match merged.placement.as_deref() {
            None | Some("uniform") => Placement::Uniform,
            Some("exponential") => Placement::ExponentialTimeline,
            Some(other) => {
                return Err(ConfigError::InvalidValue {
                    name: name.clone(),
                    key: "placement".to_string(),
                    value: other.to_string(),
                    expected: "uniform|exponential",
                });
            }
        };
        AdmissionMode::FrequencyPoisson {
            frequency,
            placement,
        }
    } else if static_events {
        let events_per_slice = merged
            .events_per_slice
            .ok_or(ConfigError::MissingSourceField {
                name: name.clone(),
                key: "events_per_slice",
            })? as u32;
        AdmissionMode::Static { events_per_slice }
    } else {
        AdmissionMode::WeightedResampling {
            weight_key: merged.weight_key.clone().unwrap_or_else(|| "weight".to_string()),
        }
    };

    let bunch_period = if merged.bunch_crossing.unwrap_or(false) {
        Some(bunch_period_ns.ok_or(ConfigError::Missing("bunch-period"))?)
    } else {
        None
    };

    let beam = if merged.beam_attachment.unwrap_or(false) {
        Some(BeamParams {
            speed: merged.beam_speed.ok_or(ConfigError::MissingSourceField {
                name: name.clone(),
                key: "beam_speed",
            })?,
            angle: merged.beam_angle.ok_or(ConfigError::MissingSourceField {
                name: name.clone(),
                key: "beam_angle",
            })?,
            spread: merged.beam_spread.unwrap_or(0.0),
        })
    } else {
        None
    };

    Ok(SourceConfig {
        name,
        input_files,
        tree_name: merged.tree_name.unwrap_or_else(default_tree_name),
        repeat_on_eof: merged.repeat_on_eof.unwrap_or(false),
        status_offset: merged.status_offset.unwrap_or(0),
        admission: SourceAdmissionConfig {
            mode,
            bunch_period,
            beam,
            already_merged,
        },
    })
}
