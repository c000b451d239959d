//! Headless trace of the placement engine.
//!
//! Drives an in-memory surface through construction, a debounced resize,
//! a same-width resize that skips the relayout, and a recalculation after
//! hiding an item, printing every surface write along the way. The
//! structured log stream collected during the run is dumped at the end as
//! JSON lines.
//!
//! ```bash
//! cargo run --example pass_trace
//! ```

use std::time::Duration;

use bento_grid::{
    BentoRuntime, BreakpointOverride, GridConfig, MemorySurface, PassLogObserver, PassOutcome,
    RuntimeConfig, RuntimeEvent, SurfaceOp, TrackSizing, memory_logger,
};

fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let (logger, sink) = memory_logger();

    let mut surface = MemorySurface::with_container_width(520.0);
    let hero = surface.push_item("2x2");
    surface.push_item("1x1");
    surface.push_item("2x1");
    surface.push_item("1x1");
    surface.push_item("1x2");
    surface.push_item("1x1");
    surface.push_template();

    let grid = GridConfig {
        sizing: TrackSizing::MinCellWidth(120.0),
        cell_gap: 10.0,
        breakpoints: [(480, BreakpointOverride::columns(4))]
            .into_iter()
            .collect(),
        balance_fillers: true,
        ..GridConfig::default()
    };

    let mut config = RuntimeConfig {
        logger: Some(logger.clone()),
        metrics_interval: Duration::from_millis(200),
        ..RuntimeConfig::default()
    };
    config.enable_metrics();

    let mut runtime = BentoRuntime::with_config(surface, grid, config)?;
    runtime.register_observer(PassLogObserver::new(logger));
    print_journal("construction at 520px", runtime.surface_mut().take_journal());

    runtime.surface_mut().set_container_width(300.0);
    let outcomes = runtime.run_scripted(resize_burst())?;
    print_outcomes(&outcomes);
    print_journal("resize to 300px", runtime.surface_mut().take_journal());

    let outcomes = runtime.run_scripted(resize_burst())?;
    print_outcomes(&outcomes);
    print_journal("resize to 300px again", runtime.surface_mut().take_journal());

    runtime.surface_mut().set_visible(hero, false);
    let outcome = runtime.recalculate()?;
    print_outcomes(&[outcome]);
    print_journal(
        "recalculate without the hero",
        runtime.surface_mut().take_journal(),
    );

    // Idle long enough for the metrics window to lapse so a snapshot
    // lands in the stream.
    runtime.run_scripted([(Duration::from_millis(400), RuntimeEvent::Tick)])?;

    println!("\nlog stream:");
    for event in sink.events() {
        println!("{}", serde_json::to_string(&event)?);
    }
    Ok(())
}

fn resize_burst() -> Vec<(Duration, RuntimeEvent)> {
    vec![
        (Duration::from_millis(3), RuntimeEvent::Resize),
        (Duration::from_millis(3), RuntimeEvent::Resize),
        (Duration::from_millis(12), RuntimeEvent::Tick),
    ]
}

fn print_outcomes(outcomes: &[PassOutcome]) {
    for outcome in outcomes {
        match outcome {
            PassOutcome::Completed(report) => println!(
                "=> completed: {} columns, {} rows, {} placed, {} restyled, {} fillers, {} swaps",
                report.total_columns,
                report.max_row,
                report.items_placed,
                report.items_restyled,
                report.fillers_emitted,
                report.swaps_performed
            ),
            PassOutcome::Skipped(reason) => println!("=> skipped: {}", reason.as_str()),
        }
    }
}

fn print_journal(stage: &str, ops: Vec<SurfaceOp>) {
    println!("\n[{stage}]");
    if ops.is_empty() {
        println!("  (no surface writes)");
    }
    for op in ops {
        println!("  {op:?}");
    }
}
