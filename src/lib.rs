//! treeshade - treemap data shaping
//!
//! Prepares a hierarchical dataset for a treemap renderer. The renderer (and the
//! space-partitioning layout) live elsewhere; this crate owns the data side:
//!
//! - [`domain::annotator`]: dotted-path ids, subtree sums, heights and sibling order
//! - [`domain::intensity`]: per-category value ranges mapped to an output intensity
//! - [`domain::color`]: hex parsing, RGBA composition and ordinal palettes
//! - [`application`]: dataset loading and the shaping service producing tiles and legend
//! - [`config`]: layered settings
//!
//! # Quick Start
//!
//! ```
//! use treeshade::domain::{annotate, CategoryIntensityMapper, OutputRange, TreeNode};
//!
//! let root = TreeNode::internal(
//!     "Root",
//!     vec![TreeNode::internal(
//!         "Action",
//!         vec![
//!             TreeNode::leaf("Game1", Some("Action"), 10.0),
//!             TreeNode::leaf("Game2", Some("Action"), 30.0),
//!         ],
//!     )],
//! );
//!
//! let tree = annotate(&root).unwrap();
//! assert!(tree.find("Root.Action.Game1").is_some());
//!
//! let mapper = CategoryIntensityMapper::from_categories(root.children(), OutputRange::default());
//! assert_eq!(mapper.intensity_of("Action", 10.0).unwrap(), 0.6);
//! assert_eq!(mapper.intensity_of("Action", 30.0).unwrap(), 0.8);
//! ```

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod tree_traits;
pub mod util;
