//! Text rendering of annotated trees via `termtree`.

use generational_arena::Index;
use termtree::Tree;

use crate::domain::{AnnotatedTree, ValueFormat};

pub trait TreeNodeConvert {
    fn to_tree_string(&self, format: ValueFormat) -> Tree<String>;
}

impl TreeNodeConvert for AnnotatedTree {
    fn to_tree_string(&self, format: ValueFormat) -> Tree<String> {
        fn label(tree: &AnnotatedTree, idx: Index, format: ValueFormat) -> String {
            match tree.get_node(idx) {
                Some(node) => format!(
                    "{} ({})",
                    node.data.id,
                    format.format(node.data.aggregate_value)
                ),
                None => String::new(),
            }
        }

        fn build_tree(tree: &AnnotatedTree, idx: Index, format: ValueFormat) -> Tree<String> {
            let leaves = tree
                .get_node(idx)
                .map(|node| {
                    node.children
                        .iter()
                        .map(|&child| build_tree(tree, child, format))
                        .collect::<Vec<_>>()
                })
                .unwrap_or_default();
            Tree::new(label(tree, idx, format)).with_leaves(leaves)
        }

        match self.root() {
            Some(root) => build_tree(self, root, format),
            None => Tree::new("Empty tree".to_string()),
        }
    }
}
