mod core;

pub use core::StyleRegistry;
