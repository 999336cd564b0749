//! Input tree model: an explicit leaf/internal variant instead of a shape-inferred object.

use std::fmt;

/// A node of the raw hierarchical dataset.
///
/// Leaves carry a value, internal nodes carry children. The distinction is made
/// once, when input is converted, so later passes never have to guess.
#[derive(Debug, Clone, PartialEq)]
pub enum TreeNode {
    Leaf {
        name: String,
        /// Top-level group the leaf belongs to, normally its parent's name
        category: Option<String>,
        value: f64,
    },
    Internal {
        name: String,
        children: Vec<TreeNode>,
    },
}

impl TreeNode {
    pub fn leaf(name: impl Into<String>, category: Option<&str>, value: f64) -> Self {
        Self::Leaf {
            name: name.into(),
            category: category.map(str::to_string),
            value,
        }
    }

    pub fn internal(name: impl Into<String>, children: Vec<TreeNode>) -> Self {
        Self::Internal {
            name: name.into(),
            children,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Leaf { name, .. } | Self::Internal { name, .. } => name,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Self::Leaf { .. })
    }

    /// Leaf value, `None` for internal nodes.
    pub fn value(&self) -> Option<f64> {
        match self {
            Self::Leaf { value, .. } => Some(*value),
            Self::Internal { .. } => None,
        }
    }

    pub fn category(&self) -> Option<&str> {
        match self {
            Self::Leaf { category, .. } => category.as_deref(),
            Self::Internal { .. } => None,
        }
    }

    /// Children in input order; empty for leaves.
    pub fn children(&self) -> &[TreeNode] {
        match self {
            Self::Leaf { .. } => &[],
            Self::Internal { children, .. } => children,
        }
    }
}

impl fmt::Display for TreeNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Leaf { name, value, .. } => write!(f, "{} ({})", name, value),
            Self::Internal { name, children } => write!(f, "{} [{}]", name, children.len()),
        }
    }
}
