//! Extraction configuration.
//!
//! Mirrors the host crate's `PdfConfig`/`PdfTableDetectionConfig` shape:
//! a `serde`-derived struct with `#[serde(default = "...")]` per field so a
//! caller can deserialize a partial JSON/TOML document and still get sane
//! defaults for anything it omits.

use serde::{Deserialize, Serialize};

use crate::classify::IssuerFormat;
use crate::pdf::{TableSettings, TableStrategy};

/// Top-level knobs for a call to [`crate::extract`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionConfig {
    /// Passwords to try, in order, against an encrypted PDF.
    #[serde(default)]
    pub passwords: Vec<String>,

    /// Table detection tuning, tried as the first strategy ahead of the
    /// table finder's own Lines/LinesStrict fallbacks. `None` is equivalent
    /// to `Some(TableDetectionConfig::default())`.
    #[serde(default)]
    pub table: Option<TableDetectionConfig>,

    /// Skip classification and force a specific issuer format.
    ///
    /// Not part of the original format-detection contract; an escape hatch
    /// for callers who already know the layout and want to avoid a
    /// misclassification on an unusual statement.
    #[serde(default)]
    pub issuer_override: Option<IssuerFormat>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            passwords: Vec::new(),
            table: None,
            issuer_override: None,
        }
    }
}

/// Table detection strategy exposed in configuration.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TableStrategyConfig {
    #[default]
    Lines,
    LinesStrict,
    Text,
    Explicit,
}

/// Mirrors [`TableSettings`], allowing tolerance tuning through config.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableDetectionConfig {
    #[serde(default)]
    pub vertical_strategy: TableStrategyConfig,
    #[serde(default)]
    pub horizontal_strategy: TableStrategyConfig,
    #[serde(default = "default_snap_tolerance")]
    pub snap_tolerance: f64,
    #[serde(default = "default_join_tolerance")]
    pub join_tolerance: f64,
    #[serde(default = "default_edge_min_length")]
    pub edge_min_length: f64,
    #[serde(default = "default_edge_min_length_prefilter")]
    pub edge_min_length_prefilter: f64,
    #[serde(default = "default_min_words_vertical")]
    pub min_words_vertical: usize,
    #[serde(default = "default_min_words_horizontal")]
    pub min_words_horizontal: usize,
    #[serde(default = "default_intersection_tolerance")]
    pub intersection_tolerance: f64,
}

impl Default for TableDetectionConfig {
    fn default() -> Self {
        Self {
            vertical_strategy: TableStrategyConfig::Lines,
            horizontal_strategy: TableStrategyConfig::Lines,
            snap_tolerance: default_snap_tolerance(),
            join_tolerance: default_join_tolerance(),
            edge_min_length: default_edge_min_length(),
            edge_min_length_prefilter: default_edge_min_length_prefilter(),
            min_words_vertical: default_min_words_vertical(),
            min_words_horizontal: default_min_words_horizontal(),
            intersection_tolerance: default_intersection_tolerance(),
        }
    }
}

impl TableDetectionConfig {
    pub fn to_table_settings(&self) -> TableSettings {
        TableSettings {
            vertical_strategy: map_strategy(self.vertical_strategy),
            horizontal_strategy: map_strategy(self.horizontal_strategy),
            explicit_vertical_lines: Vec::new(),
            explicit_horizontal_lines: Vec::new(),
            explicit_boxes: Vec::new(),
            snap_tolerance: self.snap_tolerance,
            join_tolerance: self.join_tolerance,
            edge_min_length: self.edge_min_length,
            edge_min_length_prefilter: self.edge_min_length_prefilter,
            min_words_vertical: self.min_words_vertical,
            min_words_horizontal: self.min_words_horizontal,
            intersection_tolerance: self.intersection_tolerance,
        }
    }
}

fn map_strategy(strategy: TableStrategyConfig) -> TableStrategy {
    match strategy {
        TableStrategyConfig::Lines => TableStrategy::Lines,
        TableStrategyConfig::LinesStrict => TableStrategy::LinesStrict,
        TableStrategyConfig::Text => TableStrategy::Text,
        TableStrategyConfig::Explicit => TableStrategy::Explicit,
    }
}

fn default_snap_tolerance() -> f64 {
    3.0
}
fn default_join_tolerance() -> f64 {
    3.0
}
fn default_edge_min_length() -> f64 {
    3.0
}
fn default_edge_min_length_prefilter() -> f64 {
    1.0
}
fn default_min_words_vertical() -> usize {
    3
}
fn default_min_words_horizontal() -> usize {
    1
}
fn default_intersection_tolerance() -> f64 {
    3.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_no_override() {
        let cfg = ExtractionConfig::default();
        assert!(cfg.issuer_override.is_none());
        assert!(cfg.passwords.is_empty());
    }

    #[test]
    fn table_detection_default_matches_finder_defaults() {
        let cfg = TableDetectionConfig::default();
        let settings = cfg.to_table_settings();
        assert_eq!(settings.snap_tolerance, 3.0);
        assert_eq!(settings.join_tolerance, 3.0);
    }
}
