use std::io::Write;

use crate::error::{GridError, Result};
use crate::geometry::Rect;
use crate::layout::{LayoutPlan, TrackPlan};
use crate::width::{display_width, truncate_to_width};

use super::core::{
    ElementId, ItemSource, Measurement, PositionStyle, Surface, SurfaceScan, parse_span_tag,
};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Role {
    Item { span_tag: String, no_swap: bool },
    Template,
    Clone,
}

#[derive(Debug, Clone)]
struct AnsiEntry {
    id: ElementId,
    label: String,
    role: Role,
    visible: bool,
    position: Option<PositionStyle>,
}

/// Terminal surface drawing each placed element as a bordered box.
///
/// Grid units are character cells: the container width is the viewport
/// width, so configure widths like the minimum cell width in cells, not
/// pixels. The surface starts unmeasured and stays that way until the
/// host reports a size, so a runtime built around it defers its first
/// pass until the driver is on screen. Every completed pass repaints the
/// frame from scratch with plain cursor-addressing escapes.
pub struct AnsiSurface<W: Write> {
    out: W,
    viewport: Option<(u16, u16)>,
    next_id: u64,
    entries: Vec<AnsiEntry>,
    tracks: Option<TrackPlan>,
}

impl<W: Write> AnsiSurface<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            viewport: None,
            next_id: 0,
            entries: Vec::new(),
            tracks: None,
        }
    }

    /// Update the cached terminal size. The next pass lays out against it.
    pub fn set_viewport(&mut self, columns: u16, rows: u16) {
        self.viewport = Some((columns, rows));
    }

    pub fn push_item(&mut self, label: impl Into<String>, span_tag: impl Into<String>) -> ElementId {
        self.push_entry(
            label.into(),
            Role::Item {
                span_tag: span_tag.into(),
                no_swap: false,
            },
        )
    }

    pub fn push_pinned_item(
        &mut self,
        label: impl Into<String>,
        span_tag: impl Into<String>,
    ) -> ElementId {
        self.push_entry(
            label.into(),
            Role::Item {
                span_tag: span_tag.into(),
                no_swap: true,
            },
        )
    }

    /// Filler template; clones inherit its label.
    pub fn push_template(&mut self, label: impl Into<String>) -> ElementId {
        self.push_entry(label.into(), Role::Template)
    }

    fn push_entry(&mut self, label: String, role: Role) -> ElementId {
        let id = self.allocate_id();
        self.entries.push(AnsiEntry {
            id,
            label,
            role,
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

    fn entry_mut(&mut self, id: ElementId) -> Result<&mut AnsiEntry> {
        self.entries
            .iter_mut()
            .find(|entry| entry.id == id)
            .ok_or(GridError::UnknownElement(id))
    }

    fn draw_frame(&mut self) -> Result<()> {
        let Some(plan) = self.tracks else {
            return Ok(());
        };
        let Some((view_columns, view_rows)) = self.viewport else {
            return Ok(());
        };
        write!(self.out, "\x1b[2J\x1b[H")?;
        for entry in &self.entries {
            if !entry.visible {
                continue;
            }
            let Some(style) = entry.position else {
                continue;
            };
            let rect = cell_rect(&plan, &style);
            if rect.y >= view_rows || rect.x >= view_columns {
                continue;
            }
            let dim = matches!(entry.role, Role::Clone);
            draw_box(&mut self.out, rect, &entry.label, dim)?;
        }
        write!(self.out, "\x1b[{};1H", view_rows)?;
        self.out.flush()?;
        Ok(())
    }
}

impl<W: Write> Surface for AnsiSurface<W> {
    fn measure(&self) -> Option<Measurement> {
        let (columns, _) = self.viewport?;
        let width = f64::from(columns);
        Some(Measurement {
            container_width: width,
            window_width: width,
        })
    }

    fn scan(&mut self) -> Result<SurfaceScan> {
        let mut scan = SurfaceScan::default();
        for entry in &self.entries {
            match &entry.role {
                Role::Item { span_tag, no_swap } if entry.visible => {
                    scan.items.push(ItemSource {
                        id: entry.id,
                        span: parse_span_tag(span_tag)?,
                        no_swap: *no_swap,
                    });
                }
                Role::Item { .. } => {}
                Role::Template => scan.templates.push(entry.id),
                Role::Clone => {}
            }
        }
        Ok(scan)
    }

    fn hide_templates(&mut self) -> Result<()> {
        for entry in &mut self.entries {
            if entry.role == Role::Template {
                entry.visible = false;
            }
        }
        Ok(())
    }

    fn apply_tracks(&mut self, plan: &TrackPlan) -> Result<()> {
        self.tracks = Some(*plan);
        Ok(())
    }

    fn apply_row_template(&mut self, _plan: &TrackPlan, _max_row: usize) -> Result<()> {
        // Row extent falls out of the drawn boxes; nothing to declare.
        Ok(())
    }

    fn apply_item_position(&mut self, id: ElementId, style: &PositionStyle) -> Result<()> {
        self.entry_mut(id)?.position = Some(*style);
        Ok(())
    }

    fn insert_filler(
        &mut self,
        template: Option<ElementId>,
        style: &PositionStyle,
    ) -> Result<ElementId> {
        let label = match template {
            Some(template_id) => self
                .entries
                .iter()
                .find(|entry| entry.id == template_id)
                .ok_or(GridError::UnknownElement(template_id))?
                .label
                .clone(),
            None => String::new(),
        };
        let id = self.allocate_id();
        self.entries.push(AnsiEntry {
            id,
            label,
            role: Role::Clone,
            visible: true,
            position: Some(*style),
        });
        Ok(id)
    }

    fn remove_cloned_fillers(&mut self) -> Result<()> {
        self.entries.retain(|entry| entry.role != Role::Clone);
        Ok(())
    }

    fn pass_complete(&mut self, _plan: &LayoutPlan) -> Result<()> {
        self.draw_frame()
    }
}

/// Map a grid placement to screen cells. Gaps separate both columns and
/// rows; fractional positions round to the nearest cell.
fn cell_rect(plan: &TrackPlan, style: &PositionStyle) -> Rect {
    let stride_x = plan.cell_width + plan.cell_gap;
    let stride_y = plan.row_height + plan.cell_gap;
    let x = (style.origin.column as f64 * stride_x).round();
    let y = (style.origin.row as f64 * stride_y).round();
    let width = (style.span.columns as f64 * plan.cell_width
        + style.span.columns.saturating_sub(1) as f64 * plan.cell_gap)
        .round();
    let height = (style.span.rows as f64 * plan.row_height
        + style.span.rows.saturating_sub(1) as f64 * plan.cell_gap)
        .round();
    Rect::new(
        x as u16,
        y as u16,
        width.max(1.0) as u16,
        height.max(1.0) as u16,
    )
}

fn draw_box(writer: &mut impl Write, rect: Rect, label: &str, dim: bool) -> Result<()> {
    if rect.width < 2 || rect.height < 2 {
        return Ok(());
    }
    let inner = (rect.width - 2) as usize;
    let label_row = rect.height / 2;
    for row in 0..rect.height {
        let line = if row == 0 {
            format!("\u{250c}{}\u{2510}", "\u{2500}".repeat(inner))
        } else if row == rect.height - 1 {
            format!("\u{2514}{}\u{2518}", "\u{2500}".repeat(inner))
        } else if row == label_row {
            let text = truncate_to_width(label, inner);
            let text_width = display_width(&text);
            let left = (inner - text_width) / 2;
            let right = inner - text_width - left;
            format!(
                "\u{2502}{}{}{}\u{2502}",
                " ".repeat(left),
                text,
                " ".repeat(right)
            )
        } else {
            format!("\u{2502}{}\u{2502}", " ".repeat(inner))
        };
        write!(writer, "\x1b[{};{}H", rect.y + row + 1, rect.x + 1)?;
        if dim {
            write!(writer, "\x1b[2m{line}\x1b[22m")?;
        } else {
            write!(writer, "{line}")?;
        }
    }
    Ok(())
}
