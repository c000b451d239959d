use crate::geometry::{Position, Span};
use crate::surface::ElementId;

use super::core::PlacedFiller;
use super::occupancy::OccupancyGrid;

/// Cover every cell left empty below `max_row` with greedy maximal blocks.
///
/// A block's width is fixed first, extending along the discovery row until
/// it hits an occupied cell or the grid edge; it then grows downward while
/// every covered column stays free, never past `max_row`. Emission order is
/// row-major and drives the template cycling, so it is part of the
/// contract: the grid walk restarts behind each emitted block only in the
/// sense that later cells see it as occupied.
pub(crate) fn synthesize_fillers(
    grid: &mut OccupancyGrid,
    max_row: usize,
    templates: &[ElementId],
) -> Vec<PlacedFiller> {
    let mut fillers = Vec::new();
    let mut template_cursor = 0;

    for row in 0..max_row {
        for column in 0..grid.columns() {
            if grid.is_occupied(column, row) {
                continue;
            }
            let origin = Position::new(column, row);
            let span = gap_extent(grid, origin, max_row);
            grid.occupy(origin, span);
            fillers.push(PlacedFiller {
                origin,
                span,
                template: next_template(templates, &mut template_cursor),
            });
        }
    }

    fillers
}

/// Measure the maximal block anchored at a free cell: width first along
/// the row, then whole-width rows below until one is blocked.
fn gap_extent(grid: &OccupancyGrid, origin: Position, max_row: usize) -> Span {
    let mut columns = 1;
    while origin.column + columns < grid.columns()
        && !grid.is_occupied(origin.column + columns, origin.row)
    {
        columns += 1;
    }

    let mut rows = 1;
    'grow: for row in origin.row + 1..max_row {
        for column in origin.column..origin.column + columns {
            if grid.is_occupied(column, row) {
                break 'grow;
            }
        }
        rows += 1;
    }

    Span::new(columns, rows)
}

/// Cycle through the template list in emission order, wrapping at the end.
fn next_template(templates: &[ElementId], cursor: &mut usize) -> Option<ElementId> {
    if templates.is_empty() {
        return None;
    }
    let template = templates[*cursor % templates.len()];
    *cursor += 1;
    Some(template)
}
