use std::collections::HashMap;
use std::path::PathBuf;

use serde::Deserialize;

/// One `[source.NAME]` table, every field optional so CLI flags can fill
/// in whatever the file leaves unset (`spec.md` §6.3: "CLI takes precedence
/// over YAML where present").
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct SourceYaml {
    pub input_files: Option<Vec<PathBuf>>,
    pub tree_name: Option<String>,
    pub frequency: Option<f64>,
    pub static_events: Option<bool>,
    pub events_per_slice: Option<u64>,
    pub placement: Option<String>,
    pub bunch_crossing: Option<bool>,
    pub beam_attachment: Option<bool>,
    pub beam_speed: Option<f64>,
    pub beam_spread: Option<f64>,
    pub beam_angle: Option<f64>,
    pub status_offset: Option<i32>,
    pub already_merged: Option<bool>,
    pub repeat_on_eof: Option<bool>,
    pub weight_key: Option<String>,
}

impl SourceYaml {
    /// Fields present in `self` win; `other`'s fields fill in the rest.
    /// Used both for CLI-over-YAML merging and (in reverse) YAML-over-CLI
    /// for the literal "--source:NAME" no-key declaration.
    pub fn merged_over(self, other: SourceYaml) -> SourceYaml {
        SourceYaml {
            input_files: self.input_files.or(other.input_files),
            tree_name: self.tree_name.or(other.tree_name),
            frequency: self.frequency.or(other.frequency),
            static_events: self.static_events.or(other.static_events),
            events_per_slice: self.events_per_slice.or(other.events_per_slice),
            placement: self.placement.or(other.placement),
            bunch_crossing: self.bunch_crossing.or(other.bunch_crossing),
            beam_attachment: self.beam_attachment.or(other.beam_attachment),
            beam_speed: self.beam_speed.or(other.beam_speed),
            beam_spread: self.beam_spread.or(other.beam_spread),
            beam_angle: self.beam_angle.or(other.beam_angle),
            status_offset: self.status_offset.or(other.status_offset),
            already_merged: self.already_merged.or(other.already_merged),
            repeat_on_eof: self.repeat_on_eof.or(other.repeat_on_eof),
            weight_key: self.weight_key.or(other.weight_key),
        }
    }
}

/// The whole `--config FILE` document (`spec.md` §6.3: "optional YAML
/// overriding all flags").
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct YamlConfig {
    pub output: Option<PathBuf>,
    pub nevents: Option<u64>,
    pub duration: Option<f64>,
    pub bunch_period: Option<f64>,
    pub seed: Option<u64>,
    pub source: HashMap<String, SourceYaml>,
}
