use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::core::{
    BreakpointOverride, BreakpointReference, ConfigError, GridConfig, TrackSizing,
};

/// Embedding-facing configuration surface with the documented option keys.
///
/// Every field is optional; anything unset falls back to the crate defaults.
/// `columns` and `minCellWidth` may both appear at the same level, in which
/// case `columns` wins and the min width is discarded.
///
/// ```
/// use bento_grid::config::GridOptions;
///
/// let options: GridOptions = serde_json::from_str(
///     r#"{
///         "minCellWidth": 120,
///         "cellGap": 8,
///         "breakpoints": { "768": { "columns": 4 } }
///     }"#,
/// )?;
/// let config = options.into_config()?;
/// assert_eq!(config.cell_gap, 8.0);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GridOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_cell_width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub columns: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cell_gap: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aspect_ratio: Option<f64>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub breakpoints: BTreeMap<u32, BreakpointOptions>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub breakpoint_reference: Option<BreakpointReference>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub balance_fillers: Option<bool>,
}

/// Per-breakpoint partial override, same key set minus the top-level-only
/// fields (`breakpointReference`, `balanceFillers`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BreakpointOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_cell_width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub columns: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cell_gap: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aspect_ratio: Option<f64>,
}

impl GridOptions {
    /// Convert into the validated internal model.
    pub fn into_config(self) -> Result<GridConfig, ConfigError> {
        let defaults = GridConfig::default();
        let config = GridConfig {
            sizing: sizing_from(self.columns, self.min_cell_width).unwrap_or(defaults.sizing),
            cell_gap: self.cell_gap.unwrap_or(defaults.cell_gap),
            aspect_ratio: self.aspect_ratio.unwrap_or(defaults.aspect_ratio),
            breakpoints: self
                .breakpoints
                .into_iter()
                .map(|(threshold, options)| (threshold, options.into_override()))
                .collect(),
            reference: self.breakpoint_reference.unwrap_or(defaults.reference),
            balance_fillers: self.balance_fillers.unwrap_or(defaults.balance_fillers),
        };
        config.validate()?;
        Ok(config)
    }
}

impl BreakpointOptions {
    fn into_override(self) -> BreakpointOverride {
        BreakpointOverride {
            sizing: sizing_from(self.columns, self.min_cell_width),
            cell_gap: self.cell_gap,
            aspect_ratio: self.aspect_ratio,
        }
    }
}

impl TryFrom<GridOptions> for GridConfig {
    type Error = ConfigError;

    fn try_from(options: GridOptions) -> Result<Self, Self::Error> {
        options.into_config()
    }
}

fn sizing_from(columns: Option<usize>, min_cell_width: Option<f64>) -> Option<TrackSizing> {
    match (columns, min_cell_width) {
        (Some(count), _) => Some(TrackSizing::FixedColumns(count)),
        (None, Some(width)) => Some(TrackSizing::MinCellWidth(width)),
        (None, None) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_documented_values() {
        let config = GridOptions::default().into_config().unwrap();
        assert_eq!(config, GridConfig::default());
        assert_eq!(config.sizing, TrackSizing::MinCellWidth(100.0));
        assert_eq!(config.cell_gap, 0.0);
        assert_eq!(config.aspect_ratio, 1.0);
        assert_eq!(config.reference, BreakpointReference::Container);
        assert!(!config.balance_fillers);
    }

    #[test]
    fn columns_win_over_min_cell_width_at_the_same_level() {
        let options = GridOptions {
            columns: Some(3),
            min_cell_width: Some(50.0),
            ..GridOptions::default()
        };
        let config = options.into_config().unwrap();
        assert_eq!(config.sizing, TrackSizing::FixedColumns(3));
    }

    #[test]
    fn breakpoint_options_apply_the_same_precedence() {
        let options = GridOptions {
            breakpoints: [(
                768,
                BreakpointOptions {
                    columns: Some(4),
                    min_cell_width: Some(90.0),
                    ..BreakpointOptions::default()
                },
            )]
            .into_iter()
            .collect(),
            ..GridOptions::default()
        };
        let config = options.into_config().unwrap();
        assert_eq!(
            config.breakpoints[&768].sizing,
            Some(TrackSizing::FixedColumns(4))
        );
    }

    #[test]
    fn json_round_trip_preserves_the_option_keys() {
        let source = r#"{
            "minCellWidth": 120.0,
            "cellGap": 8.0,
            "aspectRatio": 1.5,
            "breakpoints": { "480": { "columns": 2 }, "1024": { "minCellWidth": 160.0 } },
            "breakpointReference": "window",
            "balanceFillers": true
        }"#;
        let options: GridOptions = serde_json::from_str(source).unwrap();
        assert_eq!(options.breakpoint_reference, Some(BreakpointReference::Window));

        let serialized = serde_json::to_string(&options).unwrap();
        let reparsed: GridOptions = serde_json::from_str(&serialized).unwrap();
        let config = reparsed.into_config().unwrap();
        assert_eq!(config.cell_gap, 8.0);
        assert_eq!(config.breakpoints.len(), 2);
        assert_eq!(
            config.breakpoints[&480].sizing,
            Some(TrackSizing::FixedColumns(2))
        );
        assert!(config.balance_fillers);
    }

    #[test]
    fn invalid_values_are_rejected_on_conversion() {
        let options = GridOptions {
            columns: Some(0),
            ..GridOptions::default()
        };
        assert!(matches!(
            options.into_config(),
            Err(ConfigError::ZeroColumns)
        ));

        let options = GridOptions {
            cell_gap: Some(-4.0),
            ..GridOptions::default()
        };
        assert!(matches!(
            options.into_config(),
            Err(ConfigError::NegativeCellGap(_))
        ));
    }
}
