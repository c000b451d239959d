use std::time::Duration;

use bento_grid::logging::{LogEvent, LogSink};
use bento_grid::{
    BentoRuntime, BreakpointOverride, ElementId, GridConfig, ItemSource, LayoutPass, Logger,
    LoggingResult, MemorySurface, Result, RuntimeConfig, RuntimeEvent, Span, TrackPlan,
    TrackSizing,
};
use criterion::{Criterion, black_box, criterion_group, criterion_main};

#[derive(Clone, Default)]
struct NullSink;

impl LogSink for NullSink {
    fn log(&self, _event: &LogEvent) -> LoggingResult<()> {
        Ok(())
    }
}

const GALLERY_SPANS: &[&str] = &[
    "2x2", "1x1", "1x1", "2x1", "1x2", "1x1", "3x1", "1x1", "2x2", "1x1", "1x1", "2x1", "1x1",
    "1x2", "2x1", "1x1", "1x1", "2x2", "1x1", "3x1", "1x1", "1x1", "2x1", "1x1",
];

/// Container widths cycled between bursts. Each lands on a different
/// column count (3, 4, 6, 4), so every fire runs a full pass.
const RESIZE_WIDTHS: [f64; 4] = [420.0, 760.0, 1280.0, 540.0];

fn runtime_resize_script(c: &mut Criterion) {
    let burst = resize_burst();
    c.bench_function("runtime_resize_script", |b| {
        b.iter(|| {
            let mut runtime = build_runtime(false).expect("runtime");
            for width in RESIZE_WIDTHS {
                runtime.surface_mut().set_container_width(width);
                runtime
                    .run_scripted(black_box(burst.clone()))
                    .expect("scripted run");
            }
        });
    });
}

fn runtime_balanced_resize_script(c: &mut Criterion) {
    let burst = resize_burst();
    c.bench_function("runtime_balanced_resize_script", |b| {
        b.iter(|| {
            let mut runtime = build_runtime(true).expect("runtime");
            for width in RESIZE_WIDTHS {
                runtime.surface_mut().set_container_width(width);
                runtime
                    .run_scripted(black_box(burst.clone()))
                    .expect("scripted run");
            }
        });
    });
}

fn runtime_recalculate_script(c: &mut Criterion) {
    let script = recalculate_script();
    c.bench_function("runtime_recalculate_script", |b| {
        b.iter(|| {
            let mut runtime = build_runtime(false).expect("runtime");
            runtime
                .run_scripted(black_box(script.clone()))
                .expect("scripted run");
        });
    });
}

fn solver_dense_board(c: &mut Criterion) {
    let items = board_items();
    let templates = [ElementId::new(500)];
    c.bench_function("solver_dense_board", |b| {
        b.iter(|| {
            LayoutPass::new(board_tracks(), black_box(&items), &templates)
                .solve()
                .expect("plan")
        });
    });
}

fn solver_balanced_board(c: &mut Criterion) {
    let items = board_items();
    let templates = [ElementId::new(500)];
    c.bench_function("solver_balanced_board", |b| {
        b.iter(|| {
            LayoutPass::new(board_tracks(), black_box(&items), &templates)
                .with_balancing(true)
                .solve()
                .expect("plan")
        });
    });
}

fn build_runtime(balanced: bool) -> Result<BentoRuntime<MemorySurface>> {
    let mut config = RuntimeConfig {
        logger: Some(Logger::new(NullSink::default())),
        metrics_interval: Duration::from_millis(0),
        ..RuntimeConfig::default()
    };
    config.enable_metrics();
    BentoRuntime::with_config(gallery_surface(), gallery_grid(balanced), config)
}

fn gallery_surface() -> MemorySurface {
    let mut surface = MemorySurface::with_container_width(960.0);
    for tag in GALLERY_SPANS {
        surface.push_item(*tag);
    }
    surface.push_template();
    surface.push_template();
    surface
}

fn gallery_grid(balanced: bool) -> GridConfig {
    GridConfig {
        sizing: TrackSizing::MinCellWidth(120.0),
        cell_gap: 8.0,
        breakpoints: [
            (640, BreakpointOverride::min_cell_width(150.0)),
            (
                1024,
                BreakpointOverride::min_cell_width(180.0).with_cell_gap(12.0),
            ),
        ]
        .into_iter()
        .collect(),
        balance_fillers: balanced,
        ..GridConfig::default()
    }
}

/// Three coalescing signals, then an idle tick past the deadline. One
/// debounced pass per burst.
fn resize_burst() -> Vec<(Duration, RuntimeEvent)> {
    vec![
        (Duration::from_millis(3), RuntimeEvent::Resize),
        (Duration::from_millis(3), RuntimeEvent::Resize),
        (Duration::from_millis(3), RuntimeEvent::Resize),
        (Duration::from_millis(12), RuntimeEvent::Tick),
    ]
}

fn recalculate_script() -> Vec<(Duration, RuntimeEvent)> {
    std::iter::repeat((Duration::from_millis(16), RuntimeEvent::Recalculate))
        .take(8)
        .collect()
}

fn board_items() -> Vec<ItemSource> {
    let spans = [(2, 2), (1, 1), (2, 1), (1, 2), (3, 1), (1, 1)];
    let mut items = Vec::with_capacity(48);
    for index in 0..48u64 {
        let (columns, rows) = spans[index as usize % spans.len()];
        items.push(ItemSource {
            id: ElementId::new(index + 1),
            span: Span::new(columns, rows),
            no_swap: false,
        });
    }
    items
}

fn board_tracks() -> TrackPlan {
    TrackPlan {
        total_columns: 8,
        cell_width: 140.0,
        row_height: 140.0,
        cell_gap: 8.0,
        min_track_width: Some(120.0),
    }
}

criterion_group!(
    benches,
    runtime_resize_script,
    runtime_balanced_resize_script,
    runtime_recalculate_script,
    solver_dense_board,
    solver_balanced_board
);
criterion_main!(benches);
