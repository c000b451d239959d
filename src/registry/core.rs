use std::collections::HashMap;

use blake3::Hash;

use crate::surface::{ElementId, PositionStyle};

/// Tracks the last style text written per element so unchanged elements
/// are not rewritten on the next pass.
///
/// Only scanned items are tracked. Filler clones are inserted fresh each
/// pass and removed wholesale, so they never enter the registry.
#[derive(Debug, Default)]
pub struct StyleRegistry {
    entries: HashMap<ElementId, Hash>,
}

impl StyleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Diff one pass worth of item styles against the last written set.
    ///
    /// Returns the ids whose style text changed (or that are new), in
    /// input order. Elements absent from `styles` are forgotten, so an id
    /// that disappears and later returns counts as new again.
    pub fn diff_items<'a>(
        &mut self,
        styles: impl IntoIterator<Item = (ElementId, &'a PositionStyle)>,
    ) -> Vec<ElementId> {
        let mut next = HashMap::new();
        let mut dirty = Vec::new();

        for (id, style) in styles {
            let hash = style_hash(style);
            if self.entries.get(&id) != Some(&hash) {
                dirty.push(id);
            }
            next.insert(id, hash);
        }

        self.entries = next;
        dirty
    }

    pub fn is_tracked(&self, id: ElementId) -> bool {
        self.entries.contains_key(&id)
    }

    /// Forget every tracked style. The next diff reports all items dirty,
    /// which is the recovery path after a partially applied pass.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

fn style_hash(style: &PositionStyle) -> Hash {
    blake3::hash(format!("{};{}", style.grid_column(), style.grid_row()).as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Position, Span};

    fn style(column: usize, row: usize) -> PositionStyle {
        PositionStyle::new(Position::new(column, row), Span::single())
    }

    #[test]
    fn first_diff_reports_every_item() {
        let mut registry = StyleRegistry::new();
        let a = ElementId::new(1);
        let b = ElementId::new(2);
        let styles = [(a, style(0, 0)), (b, style(1, 0))];
        let dirty = registry.diff_items(styles.iter().map(|(id, s)| (*id, s)));
        assert_eq!(dirty, vec![a, b]);
    }

    #[test]
    fn unchanged_styles_are_not_rewritten() {
        let mut registry = StyleRegistry::new();
        let a = ElementId::new(1);
        let styles = [(a, style(0, 0))];
        registry.diff_items(styles.iter().map(|(id, s)| (*id, s)));
        let dirty = registry.diff_items(styles.iter().map(|(id, s)| (*id, s)));
        assert!(dirty.is_empty());
    }

    #[test]
    fn only_moved_items_come_back_dirty() {
        let mut registry = StyleRegistry::new();
        let a = ElementId::new(1);
        let b = ElementId::new(2);
        let before = [(a, style(0, 0)), (b, style(1, 0))];
        registry.diff_items(before.iter().map(|(id, s)| (*id, s)));

        let after = [(a, style(0, 0)), (b, style(0, 1))];
        let dirty = registry.diff_items(after.iter().map(|(id, s)| (*id, s)));
        assert_eq!(dirty, vec![b]);
    }

    #[test]
    fn absent_items_are_forgotten() {
        let mut registry = StyleRegistry::new();
        let a = ElementId::new(1);
        let b = ElementId::new(2);
        let both = [(a, style(0, 0)), (b, style(1, 0))];
        registry.diff_items(both.iter().map(|(id, s)| (*id, s)));

        let only_a = [(a, style(0, 0))];
        registry.diff_items(only_a.iter().map(|(id, s)| (*id, s)));
        assert!(!registry.is_tracked(b));

        // Coming back counts as new even at the old position.
        let dirty = registry.diff_items(both.iter().map(|(id, s)| (*id, s)));
        assert_eq!(dirty, vec![b]);
    }

    #[test]
    fn clearing_forgets_every_entry() {
        let mut registry = StyleRegistry::new();
        let a = ElementId::new(1);
        let b = ElementId::new(2);
        let styles = [(a, style(0, 0)), (b, style(1, 0))];
        registry.diff_items(styles.iter().map(|(id, s)| (*id, s)));

        registry.clear();
        assert!(!registry.is_tracked(a));
        let dirty = registry.diff_items(styles.iter().map(|(id, s)| (*id, s)));
        assert_eq!(dirty, vec![a, b]);
    }
}
