//! Domain layer: tree model, annotation and color logic
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod annotator;
pub mod arena;
pub mod color;
pub mod error;
pub mod intensity;
pub mod label;
pub mod node;

pub use annotator::{annotate, TreeAnnotator, ID_SEPARATOR};
pub use arena::{AnnotatedTree, ArenaNode, NodeData};
pub use color::{hex_to_rgb, ColorSource, OrdinalPalette, Rgb, Rgba, DEFAULT_PALETTE};
pub use error::{DomainError, DomainResult};
pub use intensity::{build_ranges, CategoryIntensityMapper, CategoryRange, OutputRange};
pub use label::{split_label, ValueFormat};
pub use node::TreeNode;
