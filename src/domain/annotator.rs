//! Tree annotation: dotted-path ids, subtree sums and heights.

use std::collections::HashSet;

use generational_arena::Index;
use tracing::{debug, instrument, warn};

use crate::domain::arena::{AnnotatedTree, NodeData};
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::node::TreeNode;

/// Separator between ancestor names in a node id.
pub const ID_SEPARATOR: &str = ".";

/// Builds an [`AnnotatedTree`] from a raw [`TreeNode`] hierarchy.
#[derive(Debug, Clone)]
pub struct TreeAnnotator {
    sort_siblings: bool,
}

impl Default for TreeAnnotator {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeAnnotator {
    pub fn new() -> Self {
        Self {
            sort_siblings: true,
        }
    }

    /// Whether siblings are reordered taller first, then larger first.
    pub fn with_sort_siblings(mut self, sort_siblings: bool) -> Self {
        self.sort_siblings = sort_siblings;
        self
    }

    /// Annotate `root`.
    ///
    /// Ids are assigned in a pre-order pass, since each id only depends on the
    /// parent's. Aggregate values and heights are reduced in a post-order pass
    /// over the arena. The input is not modified.
    ///
    /// # Errors
    /// `DomainError::InvalidTree` if any name is empty or a leaf value is not finite.
    #[instrument(level = "debug", skip(self, root), fields(root = root.name()))]
    pub fn annotate(&self, root: &TreeNode) -> DomainResult<AnnotatedTree> {
        let mut tree = self.assign_ids(root)?;
        Self::aggregate(&mut tree);
        if self.sort_siblings {
            tree.sort_siblings();
        }
        debug!(nodes = tree.len(), depth = tree.depth(), "annotated tree");
        Ok(tree)
    }

    fn assign_ids(&self, root: &TreeNode) -> DomainResult<AnnotatedTree> {
        let mut tree = AnnotatedTree::new();
        let mut seen_ids = HashSet::new();
        let mut stack: Vec<(&TreeNode, Option<(Index, String)>, usize)> = vec![(root, None, 0)];

        while let Some((node, parent, depth)) = stack.pop() {
            let id = match &parent {
                Some((_, parent_id)) => format!("{}{}{}", parent_id, ID_SEPARATOR, node.name()),
                None => node.name().to_string(),
            };
            validate(node, &id)?;
            if !seen_ids.insert(id.clone()) {
                warn!(%id, "duplicate node id, sibling names are not unique");
            }

            let data = NodeData {
                name: node.name().to_string(),
                id: id.clone(),
                category: node.category().map(str::to_string),
                value: node.value(),
                aggregate_value: node.value().unwrap_or(0.0),
                height: 0,
                depth,
            };
            let idx = tree.insert_node(data, parent.map(|(parent_idx, _)| parent_idx));

            // Reverse push keeps children in input order once popped
            for child in node.children().iter().rev() {
                stack.push((child, Some((idx, id.clone())), depth + 1));
            }
        }

        Ok(tree)
    }

    fn aggregate(tree: &mut AnnotatedTree) {
        let order: Vec<Index> = tree.iter_postorder().map(|(idx, _)| idx).collect();
        for idx in order {
            let children = match tree.get_node(idx) {
                Some(node) if !node.children.is_empty() => node.children.clone(),
                _ => continue,
            };
            let (sum, tallest) = children
                .iter()
                .filter_map(|&child| tree.get_node(child))
                .fold((0.0, 0), |(sum, tallest), child| {
                    (
                        sum + child.data.aggregate_value,
                        tallest.max(child.data.height),
                    )
                });
            if let Some(node) = tree.get_node_mut(idx) {
                node.data.aggregate_value = sum;
                node.data.height = tallest + 1;
            }
        }
    }
}

/// Annotate with default options (siblings sorted).
pub fn annotate(root: &TreeNode) -> DomainResult<AnnotatedTree> {
    TreeAnnotator::new().annotate(root)
}

fn validate(node: &TreeNode, id: &str) -> DomainResult<()> {
    if node.name().is_empty() {
        return Err(DomainError::invalid_tree(id, "node name is empty"));
    }
    match node {
        TreeNode::Leaf { value, .. } if !value.is_finite() => Err(DomainError::invalid_tree(
            id,
            format!("leaf value is not finite: {}", value),
        )),
        TreeNode::Internal { children, .. } if children.is_empty() => Err(
            DomainError::invalid_tree(id, "node has neither children nor a value"),
        ),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn games() -> TreeNode {
        TreeNode::internal(
            "Root",
            vec![TreeNode::internal(
                "Action",
                vec![
                    TreeNode::leaf("Game1", Some("Action"), 10.0),
                    TreeNode::leaf("Game2", Some("Action"), 30.0),
                ],
            )],
        )
    }

    #[test]
    fn given_two_level_tree_when_annotating_then_ids_are_dotted_paths() {
        let tree = annotate(&games()).unwrap();
        let root = tree.root_node().unwrap();
        assert_eq!(root.data.id, "Root");
        assert!(tree.find("Root.Action.Game1").is_some());
        assert!(tree.find("Root.Action.Game2").is_some());
    }

    #[test]
    fn given_two_level_tree_when_annotating_then_sums_and_heights_reduce_bottom_up() {
        let tree = annotate(&games()).unwrap();
        let (_, action) = tree.find("Root.Action").unwrap();
        assert_eq!(action.data.aggregate_value, 40.0);
        assert_eq!(action.data.height, 1);
        assert_eq!(action.data.depth, 1);
        assert_eq!(tree.root_node().unwrap().data.height, 2);
    }

    #[test]
    fn given_sorting_disabled_when_annotating_then_input_order_is_kept() {
        let tree = TreeAnnotator::new()
            .with_sort_siblings(false)
            .annotate(&games())
            .unwrap();
        let names: Vec<_> = tree.leaves().iter().map(|(_, n)| n.data.name.clone()).collect();
        assert_eq!(names, vec!["Game1", "Game2"]);
    }

    #[test]
    fn given_empty_name_when_annotating_then_invalid_tree() {
        let root = TreeNode::internal("Root", vec![TreeNode::leaf("", None, 1.0)]);
        let err = annotate(&root).unwrap_err();
        assert!(matches!(err, DomainError::InvalidTree { .. }));
    }

    #[test]
    fn given_nan_value_when_annotating_then_invalid_tree() {
        let root = TreeNode::internal("Root", vec![TreeNode::leaf("x", None, f64::NAN)]);
        let err = annotate(&root).unwrap_err();
        assert!(
            matches!(err, DomainError::InvalidTree { ref path, .. } if path == "Root.x"),
            "{:?}",
            err
        );
    }
}
