//! Dataset loading: JSON hierarchy into [`TreeNode`].
//!
//! Accepted shape:
//! `{ "name": ..., "children": [ { "name": ..., "category": ..., "value": ... } ] }`.
//! Values may be JSON numbers or numeric strings; published treemap datasets
//! use the latter.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::{debug, instrument};

use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::{DomainError, DomainResult, TreeNode, ID_SEPARATOR};

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawValue {
    Number(f64),
    Text(String),
}

#[derive(Debug, Deserialize)]
struct RawNode {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    value: Option<RawValue>,
    #[serde(default)]
    children: Option<Vec<RawNode>>,
}

impl RawNode {
    fn into_tree(self, parent_path: Option<&str>) -> DomainResult<TreeNode> {
        let name = self.name.unwrap_or_default();
        let path = match parent_path {
            Some(parent) => format!("{}{}{}", parent, ID_SEPARATOR, name),
            None => name.clone(),
        };
        if name.is_empty() {
            return Err(DomainError::invalid_tree(path, "node name is missing or empty"));
        }

        let children = self.children.unwrap_or_default();
        match (children.is_empty(), self.value) {
            (false, Some(_)) => Err(DomainError::invalid_tree(
                path,
                "node has both children and a value",
            )),
            (false, None) => {
                let children = children
                    .into_iter()
                    .map(|child| child.into_tree(Some(&path)))
                    .collect::<DomainResult<Vec<_>>>()?;
                Ok(TreeNode::Internal { name, children })
            }
            (true, Some(raw)) => {
                let value = parse_value(&raw).ok_or_else(|| {
                    DomainError::invalid_tree(&path, format!("value is not a number: {:?}", raw))
                })?;
                Ok(TreeNode::Leaf {
                    name,
                    category: self.category,
                    value,
                })
            }
            (true, None) => Err(DomainError::invalid_tree(
                path,
                "node has neither children nor a value",
            )),
        }
    }
}

fn parse_value(raw: &RawValue) -> Option<f64> {
    let value = match raw {
        RawValue::Number(n) => *n,
        RawValue::Text(s) => s.trim().parse::<f64>().ok()?,
    };
    value.is_finite().then_some(value)
}

/// Parse a dataset from a JSON string.
#[instrument(level = "debug", skip(json))]
pub fn parse_dataset(json: &str) -> ApplicationResult<TreeNode> {
    let raw: RawNode = serde_json::from_str(json).map_err(|source| ApplicationError::Dataset {
        path: "<inline>".into(),
        source,
    })?;
    Ok(raw.into_tree(None)?)
}

/// Load and validate a dataset file.
#[instrument(level = "debug")]
pub fn load_dataset(path: &Path) -> ApplicationResult<TreeNode> {
    let content = fs::read_to_string(path).map_err(|e| ApplicationError::OperationFailed {
        context: format!("read dataset: {}", path.display()),
        source: Box::new(e),
    })?;
    let raw: RawNode =
        serde_json::from_str(&content).map_err(|source| ApplicationError::Dataset {
            path: path.to_path_buf(),
            source,
        })?;
    let root = raw.into_tree(None)?;
    debug!(root = root.name(), categories = root.children().len(), "loaded dataset");
    Ok(root)
}
