//! Bento gallery in the terminal.
//!
//! Lays out a set of labelled tiles as a dense bento grid measured in
//! character cells, with dim filler tiles plugging the leftover gaps.
//! Wider terminals cross breakpoints into larger cells; resizing the
//! window drives the debounced relayout.
//!
//! ```bash
//! cargo run --example terminal_gallery
//! ```
//!
//! Quit with `q`, `Esc` or `Ctrl-C`.

use std::io;
use std::time::Duration;

use bento_grid::{
    AnsiSurface, BentoRuntime, BreakpointOverride, CliDriver, GridConfig, RuntimeConfig,
    TrackSizing,
};

fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let mut surface = AnsiSurface::new(io::stdout());

    surface.push_item("hero", "2x2");
    surface.push_item("inbox", "1x1");
    surface.push_item("build", "1x1");
    surface.push_item("deploys", "2x1");
    surface.push_item("uptime", "1x2");
    surface.push_item("alerts", "1x1");
    surface.push_item("traffic", "2x1");
    surface.push_pinned_item("clock", "1x1");
    surface.push_item("queue", "1x1");
    surface.push_item("billing", "2x1");
    surface.push_template("~");
    surface.push_template("~");

    let grid = GridConfig {
        sizing: TrackSizing::MinCellWidth(16.0),
        cell_gap: 1.0,
        aspect_ratio: 4.0,
        breakpoints: [
            (100, BreakpointOverride::min_cell_width(20.0)),
            (
                150,
                BreakpointOverride::min_cell_width(24.0).with_cell_gap(2.0),
            ),
        ]
        .into_iter()
        .collect(),
        balance_fillers: true,
        ..GridConfig::default()
    };

    let mut config = RuntimeConfig::default();
    config.resize_debounce = Duration::from_millis(80);

    let runtime = BentoRuntime::with_config(surface, grid, config)?;
    CliDriver::new(runtime).run()?;
    Ok(())
}
