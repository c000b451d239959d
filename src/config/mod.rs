//! Grid configuration: the validated internal model, breakpoint resolution,
//! and the serde-backed options surface for embedding tooling.

mod core;
mod options;

pub use core::{
    BreakpointOverride, BreakpointReference, ConfigError, GridConfig, ResolvedConfig, TrackSizing,
};
pub use options::{BreakpointOptions, GridOptions};
