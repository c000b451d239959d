use crate::error::{GridError, Result};
use crate::layout::{LayoutPlan, TrackPlan};

use super::core::{
    ElementId, ItemSource, Measurement, PositionStyle, Surface, SurfaceScan, column_template,
    parse_span_tag, row_template,
};

/// What a surface element is for. Clones never show up in scans.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Role {
    Item { no_swap: bool },
    Template,
    Clone { template: Option<ElementId> },
}

#[derive(Debug, Clone, PartialEq)]
struct MemoryElement {
    id: ElementId,
    role: Role,
    span_tag: Option<String>,
    visible: bool,
    position: Option<PositionStyle>,
}

/// Operations a [`MemorySurface`] has absorbed, in call order.
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceOp {
    HideTemplates,
    Tracks { columns: String, gap: String, row_height: String },
    RowTemplate { rows: String },
    Position { id: ElementId, grid_column: String, grid_row: String },
    InsertFiller { id: ElementId, template: Option<ElementId> },
    RemoveClones { removed: usize },
}

/// Pure in-memory surface holding element records instead of a real host.
///
/// The journal records every mutation the runtime applies, which is what
/// most tests assert against: what was written, in what order, and what
/// was skipped.
#[derive(Debug, Default)]
pub struct MemorySurface {
    next_id: u64,
    elements: Vec<MemoryElement>,
    container_width: Option<f64>,
    window_width: Option<f64>,
    column_style: Option<String>,
    row_style: Option<String>,
    journal: Vec<SurfaceOp>,
    completed: Vec<LayoutPlan>,
}

impl MemorySurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_container_width(width: f64) -> Self {
        let mut surface = Self::new();
        surface.set_container_width(width);
        surface
    }

    pub fn set_container_width(&mut self, width: f64) {
        self.container_width = Some(width);
    }

    pub fn set_window_width(&mut self, width: f64) {
        self.window_width = Some(width);
    }

    /// Simulate a container that cannot be measured.
    pub fn detach_container(&mut self) {
        self.container_width = None;
    }

    /// Show or hide an element. Hidden items drop out of the next scan.
    pub fn set_visible(&mut self, id: ElementId, visible: bool) {
        if let Some(element) = self.elements.iter_mut().find(|element| element.id == id) {
            element.visible = visible;
        }
    }

    pub fn push_item(&mut self, span_tag: impl Into<String>) -> ElementId {
        self.push_element(Role::Item { no_swap: false }, Some(span_tag.into()))
    }

    /// An item that balancing must never move.
    pub fn push_pinned_item(&mut self, span_tag: impl Into<String>) -> ElementId {
        self.push_element(Role::Item { no_swap: true }, Some(span_tag.into()))
    }

    pub fn push_template(&mut self) -> ElementId {
        self.push_element(Role::Template, None)
    }

    fn push_element(&mut self, role: Role, span_tag: Option<String>) -> ElementId {
        let id = self.allocate_id();
        self.elements.push(MemoryElement {
            id,
            role,
            span_tag,
            visible: true,
            position: None,
        });
        id
    }

    fn allocate_id(&mut self) -> ElementId {
        let id = ElementId::new(self.next_id);
        self.next_id += 1;
        id
    }

    fn element(&self, id: ElementId) -> Option<&MemoryElement> {
        self.elements.iter().find(|element| element.id == id)
    }

    pub fn position_of(&self, id: ElementId) -> Option<PositionStyle> {
        self.element(id).and_then(|element| element.position)
    }

    pub fn is_visible(&self, id: ElementId) -> bool {
        self.element(id).is_some_and(|element| element.visible)
    }

    /// Ids of filler clones currently on the surface, in insertion order.
    pub fn cloned_fillers(&self) -> Vec<ElementId> {
        self.elements
            .iter()
            .filter(|element| matches!(element.role, Role::Clone { .. }))
            .map(|element| element.id)
            .collect()
    }

    pub fn column_style(&self) -> Option<&str> {
        self.column_style.as_deref()
    }

    pub fn row_style(&self) -> Option<&str> {
        self.row_style.as_deref()
    }

    pub fn journal(&self) -> &[SurfaceOp] {
        &self.journal
    }

    pub fn take_journal(&mut self) -> Vec<SurfaceOp> {
        std::mem::take(&mut self.journal)
    }

    pub fn completed_passes(&self) -> &[LayoutPlan] {
        &self.completed
    }
}

impl Surface for MemorySurface {
    fn measure(&self) -> Option<Measurement> {
        let container_width = self.container_width?;
        Some(Measurement {
            container_width,
            window_width: self.window_width.unwrap_or(container_width),
        })
    }

    fn scan(&mut self) -> Result<SurfaceScan> {
        let mut scan = SurfaceScan::default();
        for element in &self.elements {
            match &element.role {
                Role::Item { no_swap } => {
                    if !element.visible {
                        continue;
                    }
                    let tag = element.span_tag.as_deref().unwrap_or("1x1");
                    scan.items.push(ItemSource {
                        id: element.id,
                        span: parse_span_tag(tag)?,
                        no_swap: *no_swap,
                    });
                }
                Role::Template => scan.templates.push(element.id),
                Role::Clone { .. } => {}
            }
        }
        Ok(scan)
    }

    fn hide_templates(&mut self) -> Result<()> {
        for element in &mut self.elements {
            if element.role == Role::Template {
                element.visible = false;
            }
        }
        self.journal.push(SurfaceOp::HideTemplates);
        Ok(())
    }

    fn apply_tracks(&mut self, plan: &TrackPlan) -> Result<()> {
        let columns = column_template(plan);
        self.column_style = Some(columns.clone());
        self.journal.push(SurfaceOp::Tracks {
            columns,
            gap: format!("{}px", plan.cell_gap),
            row_height: format!("{}px", plan.row_height),
        });
        Ok(())
    }

    fn apply_row_template(&mut self, plan: &TrackPlan, max_row: usize) -> Result<()> {
        let rows = row_template(plan, max_row);
        self.row_style = Some(rows.clone());
        self.journal.push(SurfaceOp::RowTemplate { rows });
        Ok(())
    }

    fn apply_item_position(&mut self, id: ElementId, style: &PositionStyle) -> Result<()> {
        let element = self
            .elements
            .iter_mut()
            .find(|element| element.id == id)
            .ok_or(GridError::UnknownElement(id))?;
        element.position = Some(*style);
        self.journal.push(SurfaceOp::Position {
            id,
            grid_column: style.grid_column(),
            grid_row: style.grid_row(),
        });
        Ok(())
    }

    fn insert_filler(
        &mut self,
        template: Option<ElementId>,
        style: &PositionStyle,
    ) -> Result<ElementId> {
        if let Some(template_id) = template {
            if self.element(template_id).is_none() {
                return Err(GridError::UnknownElement(template_id));
            }
        }
        let id = self.allocate_id();
        self.elements.push(MemoryElement {
            id,
            role: Role::Clone { template },
            span_tag: None,
            visible: true,
            position: Some(*style),
        });
        self.journal.push(SurfaceOp::InsertFiller { id, template });
        Ok(id)
    }

    fn remove_cloned_fillers(&mut self) -> Result<()> {
        let before = self.elements.len();
        self.elements
            .retain(|element| !matches!(element.role, Role::Clone { .. }));
        let removed = before - self.elements.len();
        self.journal.push(SurfaceOp::RemoveClones { removed });
        Ok(())
    }

    fn pass_complete(&mut self, plan: &LayoutPlan) -> Result<()> {
        self.completed.push(plan.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Position, Span};

    #[test]
    fn scan_reports_items_and_templates_in_document_order() {
        let mut surface = MemorySurface::with_container_width(600.0);
        let a = surface.push_item("2x1");
        let template = surface.push_template();
        let b = surface.push_pinned_item("1x1");

        let scan = surface.scan().expect("scan");
        assert_eq!(scan.templates, vec![template]);
        assert_eq!(
            scan.items,
            vec![
                ItemSource { id: a, span: Span::new(2, 1), no_swap: false },
                ItemSource { id: b, span: Span::new(1, 1), no_swap: true },
            ]
        );
    }

    #[test]
    fn scan_rejects_a_bad_span_tag() {
        let mut surface = MemorySurface::with_container_width(600.0);
        surface.push_item("2xx");
        let err = surface.scan().expect_err("bad tag");
        assert!(matches!(err, GridError::InvalidSpanTag(tag) if tag == "2xx"));
    }

    #[test]
    fn clones_never_appear_in_scans() {
        let mut surface = MemorySurface::with_container_width(600.0);
        let template = surface.push_template();
        let style = PositionStyle::new(Position::new(0, 0), Span::single());
        let clone = surface
            .insert_filler(Some(template), &style)
            .expect("insert");

        let scan = surface.scan().expect("scan");
        assert!(scan.items.is_empty());
        assert_eq!(scan.templates, vec![template]);
        assert_eq!(surface.cloned_fillers(), vec![clone]);
        assert_eq!(surface.position_of(clone), Some(style));
    }

    #[test]
    fn hide_templates_leaves_items_alone() {
        let mut surface = MemorySurface::with_container_width(600.0);
        let item = surface.push_item("1x1");
        let template = surface.push_template();
        surface.hide_templates().expect("hide");
        assert!(surface.is_visible(item));
        assert!(!surface.is_visible(template));
    }

    #[test]
    fn remove_cloned_fillers_only_touches_clones() {
        let mut surface = MemorySurface::with_container_width(600.0);
        let item = surface.push_item("1x1");
        let template = surface.push_template();
        let style = PositionStyle::new(Position::new(1, 0), Span::single());
        surface.insert_filler(Some(template), &style).expect("one");
        surface.insert_filler(None, &style).expect("two");

        surface.remove_cloned_fillers().expect("remove");
        assert!(surface.cloned_fillers().is_empty());
        assert!(surface.element(item).is_some());
        assert!(surface.element(template).is_some());
        assert!(matches!(
            surface.journal().last(),
            Some(SurfaceOp::RemoveClones { removed: 2 })
        ));
    }

    #[test]
    fn positioning_an_unknown_element_fails() {
        let mut surface = MemorySurface::with_container_width(600.0);
        let style = PositionStyle::new(Position::new(0, 0), Span::single());
        let err = surface
            .apply_item_position(ElementId::new(99), &style)
            .expect_err("unknown");
        assert!(matches!(err, GridError::UnknownElement(id) if id == ElementId::new(99)));
    }

    #[test]
    fn measurement_tracks_container_state() {
        let mut surface = MemorySurface::with_container_width(800.0);
        assert_eq!(
            surface.measure(),
            Some(Measurement { container_width: 800.0, window_width: 800.0 })
        );
        surface.set_window_width(1920.0);
        assert_eq!(
            surface.measure().map(|m| m.window_width),
            Some(1920.0)
        );
        surface.detach_container();
        assert_eq!(surface.measure(), None);
    }

    #[test]
    fn hidden_items_drop_out_of_scans() {
        let mut surface = MemorySurface::with_container_width(600.0);
        let shown = surface.push_item("1x1");
        let hidden = surface.push_item("2x2");
        surface.set_visible(hidden, false);

        let scan = surface.scan().expect("scan");
        assert_eq!(scan.items.len(), 1);
        assert_eq!(scan.items[0].id, shown);

        surface.set_visible(hidden, true);
        assert_eq!(surface.scan().expect("scan").items.len(), 2);
    }

    #[test]
    fn journal_preserves_call_order() {
        let mut surface = MemorySurface::with_container_width(300.0);
        let item = surface.push_item("1x1");
        surface.hide_templates().expect("hide");
        let plan = crate::layout::TrackPlan {
            total_columns: 3,
            cell_width: 100.0,
            row_height: 100.0,
            cell_gap: 0.0,
            min_track_width: Some(100.0),
        };
        surface.apply_tracks(&plan).expect("tracks");
        let style = PositionStyle::new(Position::new(0, 0), Span::single());
        surface.apply_item_position(item, &style).expect("position");
        surface.apply_row_template(&plan, 1).expect("rows");

        assert_eq!(
            surface.journal(),
            &[
                SurfaceOp::HideTemplates,
                SurfaceOp::Tracks {
                    columns: "repeat(3, minmax(100px, 1fr))".to_string(),
                    gap: "0px".to_string(),
                    row_height: "100px".to_string(),
                },
                SurfaceOp::Position {
                    id: item,
                    grid_column: "1 / span 1".to_string(),
                    grid_row: "1 / span 1".to_string(),
                },
                SurfaceOp::RowTemplate {
                    rows: "repeat(1, minmax(100px, 1fr))".to_string(),
                },
            ]
        );
    }
}
