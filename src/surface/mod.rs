//! Host adapters. The runtime talks to a [`Surface`], never to a concrete
//! host: [`MemorySurface`] backs tests and headless use, [`AnsiSurface`]
//! paints a live terminal.

mod ansi;
mod core;
mod memory;

pub use ansi::AnsiSurface;
pub use core::{
    ElementId, ItemSource, Measurement, PositionStyle, Surface, SurfaceScan, column_template,
    parse_span_tag, row_template,
};
pub use memory::{MemorySurface, SurfaceOp};
