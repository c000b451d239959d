//! Placement engine orchestrator.
//!
//! Downstream code imports layout types from here while the implementation
//! details live in the private submodules: occupancy tracking, track
//! planning, first-fit placement, filler synthesis, and the swap balancer.

mod balance;
mod core;
mod fillers;
mod occupancy;
mod tracks;

pub use core::{ItemPlacement, LayoutPass, LayoutPlan, PlacedFiller};
pub use occupancy::OccupancyGrid;
pub use tracks::{TrackPlan, plan_tracks};
