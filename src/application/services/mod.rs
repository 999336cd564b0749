//! Application services
//!
//! Concrete service implementations that orchestrate domain logic.

mod treemap;

pub use treemap::{LegendEntry, Tile, TreemapModel, TreemapService};
