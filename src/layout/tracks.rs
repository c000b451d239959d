use crate::config::{ConfigError, ResolvedConfig, TrackSizing};
use crate::error::Result;

/// Column geometry for one pass: the track count plus the derived pixel
/// metrics handed to the surface.
///
/// The placement engine only ever consumes `total_columns`; the pixel
/// values exist so surfaces can style tracks and rows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackPlan {
    pub total_columns: usize,
    pub cell_width: f64,
    pub row_height: f64,
    pub cell_gap: f64,
    /// Minimum width each track may shrink to. Absent when the column
    /// count was fixed explicitly, in which case tracks share the width
    /// evenly with no lower bound.
    pub min_track_width: Option<f64>,
}

/// Derive the track plan from the active configuration and the measured
/// container width.
///
/// Under minimum-cell-width sizing the count is the largest number of
/// tracks that fit with their gaps, never less than one. Cell width splits
/// the remaining width evenly; row height follows from the aspect ratio.
pub fn plan_tracks(active: &ResolvedConfig, container_width: f64) -> Result<TrackPlan> {
    let total_columns = match active.sizing {
        TrackSizing::FixedColumns(count) => count.max(1),
        TrackSizing::MinCellWidth(min_width) => {
            let fit = (container_width + active.cell_gap) / (min_width + active.cell_gap);
            (fit.floor() as usize).max(1)
        }
    };

    let gap_total = (total_columns - 1) as f64 * active.cell_gap;
    let cell_width = (container_width - gap_total) / total_columns as f64;
    if cell_width <= 0.0 {
        return Err(ConfigError::CellWidthCollapsed {
            width: cell_width,
            columns: total_columns,
        }
        .into());
    }

    Ok(TrackPlan {
        total_columns,
        cell_width,
        row_height: cell_width / active.aspect_ratio,
        cell_gap: active.cell_gap,
        min_track_width: match active.sizing {
            TrackSizing::MinCellWidth(width) => Some(width),
            TrackSizing::FixedColumns(_) => None,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolved(sizing: TrackSizing, cell_gap: f64, aspect_ratio: f64) -> ResolvedConfig {
        ResolvedConfig {
            sizing,
            cell_gap,
            aspect_ratio,
            balance_fillers: false,
        }
    }

    #[test]
    fn min_cell_width_without_gap_divides_evenly() {
        let plan = plan_tracks(&resolved(TrackSizing::MinCellWidth(100.0), 0.0, 1.0), 1000.0)
            .expect("plan");
        assert_eq!(plan.total_columns, 10);
        assert_eq!(plan.cell_width, 100.0);
        assert_eq!(plan.row_height, 100.0);
        assert_eq!(plan.min_track_width, Some(100.0));
    }

    #[test]
    fn gap_reduces_how_many_tracks_fit() {
        // floor((1000 + 10) / (100 + 10)) = 9
        let plan = plan_tracks(&resolved(TrackSizing::MinCellWidth(100.0), 10.0, 1.0), 1000.0)
            .expect("plan");
        assert_eq!(plan.total_columns, 9);
        let expected_width = (1000.0 - 8.0 * 10.0) / 9.0;
        assert!((plan.cell_width - expected_width).abs() < 1e-9);
    }

    #[test]
    fn narrow_container_still_gets_one_track() {
        let plan = plan_tracks(&resolved(TrackSizing::MinCellWidth(200.0), 4.0, 1.0), 90.0)
            .expect("plan");
        assert_eq!(plan.total_columns, 1);
        assert_eq!(plan.cell_width, 90.0);
    }

    #[test]
    fn fixed_columns_skip_the_fit_computation() {
        let plan = plan_tracks(&resolved(TrackSizing::FixedColumns(4), 8.0, 1.0), 512.0)
            .expect("plan");
        assert_eq!(plan.total_columns, 4);
        assert_eq!(plan.cell_width, (512.0 - 3.0 * 8.0) / 4.0);
        assert_eq!(plan.min_track_width, None);
    }

    #[test]
    fn aspect_ratio_drives_row_height() {
        let plan = plan_tracks(&resolved(TrackSizing::FixedColumns(5), 0.0, 2.0), 1000.0)
            .expect("plan");
        assert_eq!(plan.cell_width, 200.0);
        assert_eq!(plan.row_height, 100.0);
    }

    #[test]
    fn collapsed_cell_width_is_rejected() {
        let err = plan_tracks(&resolved(TrackSizing::FixedColumns(50), 10.0, 1.0), 100.0)
            .expect_err("gaps alone exceed the container");
        assert!(matches!(
            err,
            crate::error::GridError::Config(ConfigError::CellWidthCollapsed { columns: 50, .. })
        ));
    }
}
