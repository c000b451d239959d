//! Responsive bento-grid placement engine.
//!
//! Items declare a column/row span; the engine resolves breakpoints against
//! the measured width, packs the items first-fit into a column grid, covers
//! the leftover cells with cloned fillers and optionally rebalances them so
//! the gaps don't cluster. Each concern exposes an orchestrator `mod.rs`
//! over private submodules.

pub mod config;
pub mod error;
pub mod geometry;
pub mod layout;
pub mod logging;
pub mod metrics;
pub mod registry;
pub mod runtime;
pub mod surface;
pub mod width;

pub use config::{
    BreakpointOptions, BreakpointOverride, BreakpointReference, ConfigError, GridConfig,
    GridOptions, ResolvedConfig, TrackSizing,
};
pub use error::{GridError, Result};
pub use geometry::{Position, Rect, Span};
pub use layout::{
    ItemPlacement, LayoutPass, LayoutPlan, OccupancyGrid, PlacedFiller, TrackPlan, plan_tracks,
};
pub use logging::{
    FileSink, LogEvent, LogFields, LogLevel, LogSink, Logger, LoggingError, LoggingResult,
    MemorySink, memory_logger,
};
pub use metrics::{MetricSnapshot, PassMetrics};
pub use registry::StyleRegistry;
pub use runtime::debounce::ResizeDebouncer;
pub use runtime::diagnostics::PassLogObserver;
pub use runtime::driver::{CliDriver, CliDriverError, DriverResult};
pub use runtime::{
    BentoRuntime, PassObserver, PassOutcome, PassReport, PassTrigger, RuntimeConfig, RuntimeEvent,
    RuntimeState, SkipReason,
};
pub use surface::{
    AnsiSurface, ElementId, ItemSource, Measurement, MemorySurface, PositionStyle, Surface,
    SurfaceOp, SurfaceScan, column_template, parse_span_tag, row_template,
};
pub use width::display_width;
