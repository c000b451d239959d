use std::fmt;

use crate::error::{GridError, Result};
use crate::geometry::{Position, Span};
use crate::layout::{LayoutPlan, TrackPlan};

/// Opaque handle for one element hosted by a surface. Surfaces allocate
/// ids and never reuse them, including across filler clone generations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ElementId(u64);

impl ElementId {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Widths sampled from the host environment, in pixels or cells.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Measurement {
    pub container_width: f64,
    pub window_width: f64,
}

/// One placeable element as discovered by a surface scan, in document
/// order. The span comes from the element's span tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemSource {
    pub id: ElementId,
    pub span: Span,
    /// Pinned elements keep their packed position during balancing.
    pub no_swap: bool,
}

/// Snapshot of the surface contents feeding one or more passes: items to
/// place and filler templates to clone, both in document order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SurfaceScan {
    pub items: Vec<ItemSource>,
    pub templates: Vec<ElementId>,
}

/// Parse a `<columns>x<rows>` span tag such as `2x1`.
pub fn parse_span_tag(tag: &str) -> Result<Span> {
    let invalid = || GridError::InvalidSpanTag(tag.to_string());
    let (columns, rows) = tag.trim().split_once(['x', 'X']).ok_or_else(invalid)?;
    let columns: usize = columns.trim().parse().map_err(|_| invalid())?;
    let rows: usize = rows.trim().parse().map_err(|_| invalid())?;
    if columns == 0 || rows == 0 {
        return Err(invalid());
    }
    Ok(Span::new(columns, rows))
}

/// Grid placement for one element, formatted on demand as 1-indexed
/// `<start> / span <count>` shorthand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionStyle {
    pub origin: Position,
    pub span: Span,
}

impl PositionStyle {
    pub fn new(origin: Position, span: Span) -> Self {
        Self { origin, span }
    }

    pub fn grid_column(&self) -> String {
        format!("{} / span {}", self.origin.column + 1, self.span.columns)
    }

    pub fn grid_row(&self) -> String {
        format!("{} / span {}", self.origin.row + 1, self.span.rows)
    }
}

/// Column track declaration for a plan. Fixed-count sizing shares the
/// width evenly; minimum-width sizing keeps the lower bound visible.
pub fn column_template(plan: &TrackPlan) -> String {
    match plan.min_track_width {
        Some(min_width) => format!(
            "repeat({}, minmax({}px, 1fr))",
            plan.total_columns, min_width
        ),
        None => format!("repeat({}, 1fr)", plan.total_columns),
    }
}

/// Row track declaration sized from the aspect-ratio-derived row height.
pub fn row_template(plan: &TrackPlan, max_row: usize) -> String {
    format!("repeat({}, minmax({}px, 1fr))", max_row, plan.row_height)
}

/// Host adapter the runtime drives a grid through.
///
/// A surface owns the real elements (DOM-like records, terminal cells)
/// and exposes just enough structure for placement: measurement, a scan
/// of placeable items, and style application. Implementations decide what
/// "style" means for their medium.
pub trait Surface {
    /// Current widths, or `None` while the host cannot be measured.
    fn measure(&self) -> Option<Measurement>;

    /// Discover visible items and filler templates in document order.
    /// Hidden items are left out; clones inserted by
    /// [`insert_filler`](Self::insert_filler) are never reported.
    fn scan(&mut self) -> Result<SurfaceScan>;

    /// Take filler templates out of the visible flow. Called once when a
    /// runtime adopts the surface.
    fn hide_templates(&mut self) -> Result<()>;

    /// Apply column track geometry, gap, and the derived row height. Runs
    /// on every debounce fire, even when no full pass follows.
    fn apply_tracks(&mut self, plan: &TrackPlan) -> Result<()>;

    /// Declare the row tracks once a full pass knows how many rows the
    /// items reach.
    fn apply_row_template(&mut self, plan: &TrackPlan, max_row: usize) -> Result<()>;

    /// Position one scanned item.
    fn apply_item_position(&mut self, id: ElementId, style: &PositionStyle) -> Result<()>;

    /// Materialize a filler block, cloning `template` when one is given.
    /// Returns the id of the new element.
    fn insert_filler(
        &mut self,
        template: Option<ElementId>,
        style: &PositionStyle,
    ) -> Result<ElementId>;

    /// Drop every filler clone inserted by earlier passes.
    fn remove_cloned_fillers(&mut self) -> Result<()>;

    /// A pass finished and all styles for `plan` are applied. Surfaces
    /// that render a frame per pass do it here.
    fn pass_complete(&mut self, plan: &LayoutPlan) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn span_tags_parse_columns_then_rows() {
        assert_eq!(parse_span_tag("2x3").unwrap(), Span::new(2, 3));
        assert_eq!(parse_span_tag(" 1X1 ").unwrap(), Span::new(1, 1));
    }

    #[test]
    fn bad_span_tags_are_rejected() {
        for tag in ["", "2", "x2", "2x", "0x1", "1x0", "axb", "1x2x3"] {
            let err = parse_span_tag(tag).expect_err(tag);
            assert!(matches!(err, GridError::InvalidSpanTag(_)), "{tag}");
        }
    }

    #[test]
    fn position_styles_are_one_indexed() {
        let style = PositionStyle::new(Position::new(0, 2), Span::new(3, 1));
        assert_eq!(style.grid_column(), "1 / span 3");
        assert_eq!(style.grid_row(), "3 / span 1");
    }

    #[test]
    fn column_template_reflects_the_sizing_mode() {
        let mut plan = TrackPlan {
            total_columns: 9,
            cell_width: 102.0,
            row_height: 102.0,
            cell_gap: 10.0,
            min_track_width: Some(100.0),
        };
        assert_eq!(column_template(&plan), "repeat(9, minmax(100px, 1fr))");
        plan.min_track_width = None;
        assert_eq!(column_template(&plan), "repeat(9, 1fr)");
    }
}
