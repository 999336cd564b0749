use std::cmp::Ordering;
use std::fmt;

use generational_arena::{Arena, Index};
use tracing::instrument;

/// Annotated payload of one tree node.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeData {
    pub name: String,
    /// Dotted path from the root, e.g. `Root.Action.Game1`
    pub id: String,
    /// Leaf category as given in the input, None for internal nodes
    pub category: Option<String>,
    /// Own value for leaves, None for internal nodes
    pub value: Option<f64>,
    /// Sum of all descendant leaf values (own value for leaves)
    pub aggregate_value: f64,
    /// 0 for leaves, 1 + tallest child otherwise
    pub height: usize,
    /// 0 for the root
    pub depth: usize,
}

impl NodeData {
    pub fn is_leaf(&self) -> bool {
        self.value.is_some()
    }
}

impl fmt::Display for NodeData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.id, self.aggregate_value)
    }
}

/// Tree node in the arena-based hierarchy structure.
#[derive(Debug)]
pub struct ArenaNode {
    pub data: NodeData,
    /// Index of parent node in the arena, None for the root
    pub parent: Option<Index>,
    /// Indices of child nodes in presentation order
    pub children: Vec<Index>,
}

/// Arena-backed annotated tree.
///
/// Produced once by the annotator and read-only afterwards. Node references are
/// generational indices, so parent links need no reference counting.
#[derive(Debug)]
pub struct AnnotatedTree {
    arena: Arena<ArenaNode>,
    root: Option<Index>,
}

impl Default for AnnotatedTree {
    fn default() -> Self {
        Self::new()
    }
}

impl AnnotatedTree {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            root: None,
        }
    }

    #[instrument(level = "trace", skip(self))]
    pub(crate) fn insert_node(&mut self, data: NodeData, parent: Option<Index>) -> Index {
        let node = ArenaNode {
            data,
            parent,
            children: Vec::new(),
        };
        let node_idx = self.arena.insert(node);

        if let Some(parent_idx) = parent {
            if let Some(parent) = self.arena.get_mut(parent_idx) {
                parent.children.push(node_idx);
            }
        } else {
            self.root = Some(node_idx);
        }

        node_idx
    }

    pub fn get_node(&self, idx: Index) -> Option<&ArenaNode> {
        self.arena.get(idx)
    }

    pub(crate) fn get_node_mut(&mut self, idx: Index) -> Option<&mut ArenaNode> {
        self.arena.get_mut(idx)
    }

    pub fn root(&self) -> Option<Index> {
        self.root
    }

    pub fn root_node(&self) -> Option<&ArenaNode> {
        self.root.and_then(|idx| self.get_node(idx))
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Pre-order traversal (parent before children).
    pub fn iter(&self) -> TreeIterator<'_> {
        TreeIterator::new(self)
    }

    /// Post-order traversal (children before parent).
    pub fn iter_postorder(&self) -> PostOrderIterator<'_> {
        PostOrderIterator::new(self)
    }

    /// Number of levels, 0 for an empty tree.
    #[instrument(level = "debug", skip(self))]
    pub fn depth(&self) -> usize {
        self.root_node().map(|n| n.data.height + 1).unwrap_or(0)
    }

    /// Leaf nodes in pre-order, i.e. in presentation order.
    #[instrument(level = "debug", skip(self))]
    pub fn leaves(&self) -> Vec<(Index, &ArenaNode)> {
        self.iter().filter(|(_, node)| node.children.is_empty()).collect()
    }

    /// First node in pre-order whose id matches.
    pub fn find(&self, id: &str) -> Option<(Index, &ArenaNode)> {
        self.iter().find(|(_, node)| node.data.id == id)
    }

    pub fn parent_name(&self, idx: Index) -> Option<&str> {
        let parent = self.get_node(idx)?.parent?;
        self.get_node(parent).map(|p| p.data.name.as_str())
    }

    /// Category key of a leaf: its own category, else the name of its parent.
    pub fn category_of(&self, idx: Index) -> Option<&str> {
        let node = self.get_node(idx)?;
        match node.data.category.as_deref() {
            Some(category) => Some(category),
            None => self.parent_name(idx),
        }
    }

    /// Children of `idx` ordered taller first, then larger first.
    ///
    /// The sort is stable, so equal keys keep their input order.
    pub fn sorted_children(&self, idx: Index) -> Vec<Index> {
        let mut children = self
            .get_node(idx)
            .map(|n| n.children.clone())
            .unwrap_or_default();
        children.sort_by(|&a, &b| self.presentation_order(a, b));
        children
    }

    /// Apply [`Self::sorted_children`] ordering to every node in place.
    #[instrument(level = "debug", skip(self))]
    pub(crate) fn sort_siblings(&mut self) {
        let indices: Vec<Index> = self.iter().map(|(idx, _)| idx).collect();
        for idx in indices {
            let sorted = self.sorted_children(idx);
            if let Some(node) = self.get_node_mut(idx) {
                node.children = sorted;
            }
        }
    }

    fn presentation_order(&self, a: Index, b: Index) -> Ordering {
        match (self.get_node(a), self.get_node(b)) {
            (Some(a), Some(b)) => b
                .data
                .height
                .cmp(&a.data.height)
                .then_with(|| {
                    b.data
                        .aggregate_value
                        .partial_cmp(&a.data.aggregate_value)
                        .unwrap_or(Ordering::Equal)
                }),
            _ => Ordering::Equal,
        }
    }
}

pub struct TreeIterator<'a> {
    tree: &'a AnnotatedTree,
    stack: Vec<Index>,
}

impl<'a> TreeIterator<'a> {
    fn new(tree: &'a AnnotatedTree) -> Self {
        let mut stack = Vec::new();
        if let Some(root) = tree.root() {
            stack.push(root);
        }
        Self { tree, stack }
    }
}

impl<'a> Iterator for TreeIterator<'a> {
    type Item = (Index, &'a ArenaNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current_idx) = self.stack.pop() {
            if let Some(node) = self.tree.get_node(current_idx) {
                // Push children in reverse order for left-to-right traversal
                for &child in node.children.iter().rev() {
                    self.stack.push(child);
                }
                return Some((current_idx, node));
            }
        }
        None
    }
}

pub struct PostOrderIterator<'a> {
    tree: &'a AnnotatedTree,
    stack: Vec<(Index, bool)>,
}

impl<'a> PostOrderIterator<'a> {
    fn new(tree: &'a AnnotatedTree) -> Self {
        let mut stack = Vec::new();
        if let Some(root) = tree.root() {
            stack.push((root, false));
        }
        Self { tree, stack }
    }
}

impl<'a> Iterator for PostOrderIterator<'a> {
    type Item = (Index, &'a ArenaNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((current_idx, visited)) = self.stack.pop() {
            if let Some(node) = self.tree.get_node(current_idx) {
                if !visited {
                    self.stack.push((current_idx, true));
                    for &child in node.children.iter().rev() {
                        self.stack.push((child, false));
                    }
                } else {
                    return Some((current_idx, node));
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data(name: &str, value: Option<f64>, height: usize, aggregate_value: f64) -> NodeData {
        NodeData {
            name: name.to_string(),
            id: name.to_string(),
            category: None,
            value,
            aggregate_value,
            height,
            depth: 0,
        }
    }

    #[test]
    fn given_inserted_nodes_when_iterating_then_preorder_and_postorder_differ() {
        let mut tree = AnnotatedTree::new();
        let root = tree.insert_node(data("r", None, 1, 3.0), None);
        tree.insert_node(data("a", Some(1.0), 0, 1.0), Some(root));
        tree.insert_node(data("b", Some(2.0), 0, 2.0), Some(root));

        let pre: Vec<_> = tree.iter().map(|(_, n)| n.data.name.clone()).collect();
        let post: Vec<_> = tree.iter_postorder().map(|(_, n)| n.data.name.clone()).collect();
        assert_eq!(pre, vec!["r", "a", "b"]);
        assert_eq!(post, vec!["a", "b", "r"]);
        assert_eq!(tree.len(), 3);
        assert_eq!(tree.depth(), 2);
    }

    #[test]
    fn given_empty_tree_when_querying_then_returns_nothing() {
        let tree = AnnotatedTree::default();
        assert!(tree.is_empty());
        assert_eq!(tree.depth(), 0);
        assert!(tree.leaves().is_empty());
        assert!(tree.find("x").is_none());
    }

    #[test]
    fn given_siblings_when_sorting_then_taller_then_larger_first() {
        let mut tree = AnnotatedTree::new();
        let root = tree.insert_node(data("r", None, 2, 0.0), None);
        let small = tree.insert_node(data("small", Some(1.0), 0, 1.0), Some(root));
        let big = tree.insert_node(data("big", Some(5.0), 0, 5.0), Some(root));
        let group = tree.insert_node(data("group", None, 1, 0.5), Some(root));

        assert_eq!(tree.sorted_children(root), vec![group, big, small]);
        tree.sort_siblings();
        assert_eq!(tree.get_node(root).unwrap().children, vec![group, big, small]);
    }
}
