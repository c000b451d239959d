use crate::geometry::{Position, Span};

use super::core::{ItemPlacement, PlacedFiller};

/// Spread fillers away from one another by swapping each with a matching
/// placed item, scored by average Manhattan distance to the swap targets
/// already finalized this pass.
///
/// Fillers are visited in emission order. Candidacy is judged from current
/// positions, so an item swapped for an earlier filler stays eligible for
/// later ones. Swaps exchange equal-sized rectangles, which keeps total
/// coverage untouched. Returns the number of swaps performed.
pub(crate) fn balance_fillers(
    placements: &mut [ItemPlacement],
    fillers: &mut [PlacedFiller],
) -> usize {
    let mut swap_targets: Vec<Position> = Vec::new();
    let mut swaps = 0;

    for filler in fillers.iter_mut() {
        let Some(index) = best_candidate(placements, filler.origin, filler.span, &swap_targets)
        else {
            continue;
        };
        let item = &mut placements[index];
        std::mem::swap(&mut item.origin, &mut filler.origin);
        swap_targets.push(filler.origin);
        swaps += 1;
    }

    swaps
}

/// Pick the eligible item maximizing the average distance to prior swap
/// targets. Eligible means same span, not pinned, and not already at the
/// filler's position. Ties keep the earliest item in placement order; with
/// no history every candidate scores zero, so the first one wins.
fn best_candidate(
    placements: &[ItemPlacement],
    target: Position,
    span: Span,
    history: &[Position],
) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (index, item) in placements.iter().enumerate() {
        if item.no_swap || item.span != span || item.origin == target {
            continue;
        }
        let score = average_distance(history, item.origin);
        let better = match best {
            Some((_, best_score)) => score > best_score,
            None => true,
        };
        if better {
            best = Some((index, score));
        }
    }
    best.map(|(index, _)| index)
}

fn average_distance(history: &[Position], candidate: Position) -> f64 {
    if history.is_empty() {
        return 0.0;
    }
    let total: usize = history
        .iter()
        .map(|target| target.manhattan_distance(&candidate))
        .sum();
    total as f64 / history.len() as f64
}
