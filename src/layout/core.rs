use crate::error::{GridError, Result};
use crate::geometry::{Position, Span};
use crate::surface::{ElementId, ItemSource};

use super::balance::balance_fillers;
use super::fillers::synthesize_fillers;
use super::occupancy::OccupancyGrid;
use super::tracks::TrackPlan;

/// Position assigned to one item during a pass. Origins are mutable state
/// from the balancer's point of view: swaps exchange them in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemPlacement {
    pub id: ElementId,
    pub origin: Position,
    pub span: Span,
    pub no_swap: bool,
}

/// A synthesized block covering part of the leftover area, tagged with the
/// template it should be cloned from when one is available.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacedFiller {
    pub origin: Position,
    pub span: Span,
    pub template: Option<ElementId>,
}

/// Complete output of one layout pass.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutPlan {
    pub tracks: TrackPlan,
    /// One past the last row any item reaches. Fillers never extend it.
    pub max_row: usize,
    pub placements: Vec<ItemPlacement>,
    pub fillers: Vec<PlacedFiller>,
    pub swaps_performed: usize,
}

/// One place-fill-balance cycle over a fixed track plan.
///
/// All transient state (the occupancy grid, the swap history) lives inside
/// [`solve`](Self::solve) and is discarded with it; only the returned plan
/// escapes. Solving the same inputs twice yields identical plans.
pub struct LayoutPass<'a> {
    tracks: TrackPlan,
    items: &'a [ItemSource],
    templates: &'a [ElementId],
    balance: bool,
}

impl<'a> LayoutPass<'a> {
    pub fn new(tracks: TrackPlan, items: &'a [ItemSource], templates: &'a [ElementId]) -> Self {
        Self {
            tracks,
            items,
            templates,
            balance: false,
        }
    }

    /// Enable the distance-maximizing filler/item swap phase.
    pub fn with_balancing(mut self, enabled: bool) -> Self {
        self.balance = enabled;
        self
    }

    pub fn solve(self) -> Result<LayoutPlan> {
        let mut grid = OccupancyGrid::new(self.tracks.total_columns);
        let mut placements = place_items(&mut grid, self.items)?;
        let max_row = placements
            .iter()
            .map(|placement| placement.origin.row + placement.span.rows)
            .max()
            .unwrap_or(0);
        let mut fillers = synthesize_fillers(&mut grid, max_row, self.templates);
        debug_assert!(grid.is_filled_through(max_row));
        let swaps_performed = if self.balance {
            balance_fillers(&mut placements, &mut fillers)
        } else {
            0
        };
        Ok(LayoutPlan {
            tracks: self.tracks,
            max_row,
            placements,
            fillers,
            swaps_performed,
        })
    }
}

/// Greedy first-fit packer. Each item takes the first free rectangle in
/// row-major order and immediately blocks it for everything placed later,
/// so input order decides the shape of the layout.
fn place_items(grid: &mut OccupancyGrid, items: &[ItemSource]) -> Result<Vec<ItemPlacement>> {
    let mut placements = Vec::with_capacity(items.len());
    for item in items {
        if item.span.columns > grid.columns() {
            return Err(GridError::SpanExceedsColumns {
                span: item.span.columns,
                columns: grid.columns(),
            });
        }
        let origin = first_free_origin(grid, item.span);
        grid.occupy(origin, item.span);
        placements.push(ItemPlacement {
            id: item.id,
            origin,
            span: item.span,
            no_swap: item.no_swap,
        });
    }
    Ok(placements)
}

/// Scan candidate top-left cells left to right, top to bottom, until the
/// whole rectangle fits. Always terminates: rows below the touched area
/// are free, so a span that fits the column count fits somewhere.
fn first_free_origin(grid: &OccupancyGrid, span: Span) -> Position {
    let mut candidate = Position::new(0, 0);
    loop {
        if grid.is_free_rect(candidate, span) {
            return candidate;
        }
        candidate.column += 1;
        if candidate.column + span.columns > grid.columns() {
            candidate.column = 0;
            candidate.row += 1;
        }
    }
}
