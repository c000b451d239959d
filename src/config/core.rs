use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Column sizing strategy for one resolution level.
///
/// The two strategies are mutually exclusive by construction: a resolved
/// configuration carries exactly one, and a breakpoint override that sets
/// one replaces the other wholesale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TrackSizing {
    /// Fit as many columns of at least this pixel width as the container allows.
    MinCellWidth(f64),
    /// Use exactly this many columns.
    FixedColumns(usize),
}

/// Which width the breakpoint thresholds are compared against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BreakpointReference {
    /// The grid container's own content width.
    #[default]
    Container,
    /// The window (viewport) width.
    Window,
}

/// Validation failures for user-supplied configuration values.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("minCellWidth must be positive, got {0}")]
    NonPositiveMinCellWidth(f64),
    #[error("columns must be at least 1")]
    ZeroColumns,
    #[error("cellGap must not be negative, got {0}")]
    NegativeCellGap(f64),
    #[error("aspectRatio must be positive, got {0}")]
    NonPositiveAspectRatio(f64),
    #[error("breakpoint {threshold}: {source}")]
    Breakpoint {
        threshold: u32,
        #[source]
        source: Box<ConfigError>,
    },
    #[error("cell width collapses to {width:.1}px across {columns} columns")]
    CellWidthCollapsed { width: f64, columns: usize },
}

/// Partial configuration activated once the reference width reaches its
/// threshold. Unset fields inherit from lower thresholds or the base.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BreakpointOverride {
    pub sizing: Option<TrackSizing>,
    pub cell_gap: Option<f64>,
    pub aspect_ratio: Option<f64>,
}

impl BreakpointOverride {
    /// Override with a fixed column count.
    pub fn columns(count: usize) -> Self {
        Self {
            sizing: Some(TrackSizing::FixedColumns(count)),
            ..Self::default()
        }
    }

    /// Override with a minimum cell width.
    pub fn min_cell_width(width: f64) -> Self {
        Self {
            sizing: Some(TrackSizing::MinCellWidth(width)),
            ..Self::default()
        }
    }

    pub fn with_cell_gap(mut self, gap: f64) -> Self {
        self.cell_gap = Some(gap);
        self
    }

    pub fn with_aspect_ratio(mut self, ratio: f64) -> Self {
        self.aspect_ratio = Some(ratio);
        self
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if let Some(sizing) = self.sizing {
            validate_sizing(sizing)?;
        }
        if let Some(gap) = self.cell_gap {
            if gap < 0.0 {
                return Err(ConfigError::NegativeCellGap(gap));
            }
        }
        if let Some(ratio) = self.aspect_ratio {
            if !(ratio > 0.0) {
                return Err(ConfigError::NonPositiveAspectRatio(ratio));
            }
        }
        Ok(())
    }
}

/// Full grid configuration, immutable for the lifetime of one runtime.
///
/// Thresholds are keyed in a `BTreeMap` so resolution always walks them in
/// ascending numeric order.
#[derive(Debug, Clone, PartialEq)]
pub struct GridConfig {
    pub sizing: TrackSizing,
    pub cell_gap: f64,
    pub aspect_ratio: f64,
    pub breakpoints: BTreeMap<u32, BreakpointOverride>,
    pub reference: BreakpointReference,
    pub balance_fillers: bool,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            sizing: TrackSizing::MinCellWidth(100.0),
            cell_gap: 0.0,
            aspect_ratio: 1.0,
            breakpoints: BTreeMap::new(),
            reference: BreakpointReference::Container,
            balance_fillers: false,
        }
    }
}

impl GridConfig {
    /// Check every resolution level for out-of-range values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_sizing(self.sizing)?;
        if self.cell_gap < 0.0 {
            return Err(ConfigError::NegativeCellGap(self.cell_gap));
        }
        if !(self.aspect_ratio > 0.0) {
            return Err(ConfigError::NonPositiveAspectRatio(self.aspect_ratio));
        }
        for (threshold, overrides) in &self.breakpoints {
            overrides
                .validate()
                .map_err(|source| ConfigError::Breakpoint {
                    threshold: *threshold,
                    source: Box::new(source),
                })?;
        }
        Ok(())
    }

    /// Merge every breakpoint whose threshold the reference width reaches,
    /// in ascending order, so the highest qualifying threshold wins per key.
    ///
    /// Pure: the configuration itself is never mutated.
    pub fn resolve(&self, reference_width: f64) -> ResolvedConfig {
        let mut active = ResolvedConfig {
            sizing: self.sizing,
            cell_gap: self.cell_gap,
            aspect_ratio: self.aspect_ratio,
            balance_fillers: self.balance_fillers,
        };

        for (threshold, overrides) in &self.breakpoints {
            if f64::from(*threshold) > reference_width {
                continue;
            }
            if let Some(sizing) = overrides.sizing {
                active.sizing = sizing;
            }
            if let Some(gap) = overrides.cell_gap {
                active.cell_gap = gap;
            }
            if let Some(ratio) = overrides.aspect_ratio {
                active.aspect_ratio = ratio;
            }
        }

        active
    }
}

/// Configuration after breakpoint resolution: the values one layout pass
/// actually runs with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedConfig {
    pub sizing: TrackSizing,
    pub cell_gap: f64,
    pub aspect_ratio: f64,
    pub balance_fillers: bool,
}

fn validate_sizing(sizing: TrackSizing) -> Result<(), ConfigError> {
    match sizing {
        TrackSizing::MinCellWidth(width) if !(width > 0.0) => {
            Err(ConfigError::NonPositiveMinCellWidth(width))
        }
        TrackSizing::FixedColumns(0) => Err(ConfigError::ZeroColumns),
        _ => Ok(()),
    }
}
