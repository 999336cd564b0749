//! Category-relative color intensity.
//!
//! Each top-level category gets a `[min, max]` range over its leaf values; a
//! leaf's value is then mapped linearly into a configured output range, so tiles
//! sharing a base color still differ by size.
//!
//! Only the immediate children of each category are considered. Deeper
//! hierarchies are not recursed into.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::domain::arena::AnnotatedTree;
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::node::TreeNode;

/// Observed value range of one category.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CategoryRange {
    pub min: f64,
    pub max: f64,
}

impl CategoryRange {
    fn of(values: impl IntoIterator<Item = f64>) -> Option<Self> {
        values.into_iter().fold(None, |acc, v| match acc {
            None => Some(Self { min: v, max: v }),
            Some(r) => Some(Self {
                min: r.min.min(v),
                max: r.max.max(v),
            }),
        })
    }
}

/// Intensity produced for a category's `min` (`start`) and `max` (`end`).
///
/// `start > end` is allowed and inverts the mapping.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OutputRange {
    pub start: f64,
    pub end: f64,
}

impl Default for OutputRange {
    fn default() -> Self {
        Self {
            start: 0.6,
            end: 0.8,
        }
    }
}

impl OutputRange {
    pub fn new(start: f64, end: f64) -> DomainResult<Self> {
        if !start.is_finite() || !end.is_finite() {
            return Err(DomainError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn midpoint(&self) -> f64 {
        self.interpolate(0.5)
    }

    /// `t` in `[0, 1]`; the form keeps both endpoints exact.
    fn interpolate(&self, t: f64) -> f64 {
        self.start * (1.0 - t) + self.end * t
    }
}

/// Compute `[min, max]` per category over each category's leaf children.
///
/// Internal children and top-level leaves are skipped, and a category without
/// any leaf children gets no range.
#[instrument(level = "debug", skip(categories), fields(count = categories.len()))]
pub fn build_ranges(categories: &[TreeNode]) -> BTreeMap<String, CategoryRange> {
    let mut ranges = BTreeMap::new();
    for category in categories {
        let values = category.children().iter().filter_map(TreeNode::value);
        match CategoryRange::of(values) {
            Some(range) => {
                ranges.insert(category.name().to_string(), range);
            }
            None => debug!(category = category.name(), "no leaf children, skipping"),
        }
    }
    ranges
}

/// Maps leaf values to intensities relative to their category's range.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryIntensityMapper {
    ranges: BTreeMap<String, CategoryRange>,
    output: OutputRange,
}

impl CategoryIntensityMapper {
    pub fn new(ranges: BTreeMap<String, CategoryRange>, output: OutputRange) -> Self {
        Self { ranges, output }
    }

    pub fn from_categories(categories: &[TreeNode], output: OutputRange) -> Self {
        Self::new(build_ranges(categories), output)
    }

    /// Build ranges from the root's children of an annotated tree.
    #[instrument(level = "debug", skip(tree))]
    pub fn from_tree(tree: &AnnotatedTree, output: OutputRange) -> Self {
        let mut ranges = BTreeMap::new();
        let Some(root) = tree.root_node() else {
            return Self::new(ranges, output);
        };
        for &category_idx in &root.children {
            let Some(category) = tree.get_node(category_idx) else {
                continue;
            };
            if category.data.is_leaf() {
                continue;
            }
            let values = category
                .children
                .iter()
                .filter_map(|&idx| tree.get_node(idx))
                .filter_map(|leaf| leaf.data.value);
            match CategoryRange::of(values) {
                Some(range) => {
                    ranges.insert(category.data.name.clone(), range);
                }
                None => debug!(category = %category.data.name, "no leaf children, skipping"),
            }
        }
        Self::new(ranges, output)
    }

    pub fn ranges(&self) -> &BTreeMap<String, CategoryRange> {
        &self.ranges
    }

    pub fn range_of(&self, category: &str) -> Option<&CategoryRange> {
        self.ranges.get(category)
    }

    pub fn output(&self) -> OutputRange {
        self.output
    }

    /// Intensity of `leaf_value` within `category`.
    ///
    /// Values outside the category's range clamp to the output bounds. A
    /// category whose min equals its max yields the output midpoint.
    ///
    /// # Errors
    /// `UnknownCategory` if the category has no range, `InvalidValue` for NaN or infinities.
    pub fn intensity_of(&self, category: &str, leaf_value: f64) -> DomainResult<f64> {
        let range = self
            .ranges
            .get(category)
            .ok_or_else(|| DomainError::UnknownCategory(category.to_string()))?;
        if !leaf_value.is_finite() {
            return Err(DomainError::InvalidValue(leaf_value));
        }

        let span = range.max - range.min;
        if span <= 0.0 {
            return Ok(self.output.midpoint());
        }
        let t = ((leaf_value - range.min) / span).clamp(0.0, 1.0);
        Ok(self.output.interpolate(t))
    }
}
