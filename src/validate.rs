//! Unknown-key detection for loaded documents.
//!
//! Walks the document against the compiled tree and reports every dotted key
//! the tree does not declare. A mapping under a declared item is accepted as
//! the item's value; a scalar where the tree has a section is reported.

use serde_yaml::{Mapping, Value};

use crate::schema::{ConfigNode, ConfigTree};
use crate::types::render_value;

/// Dotted keys present in `values` but absent from `tree`, in document order.
pub fn unknown_keys(tree: &ConfigTree, values: &Mapping) -> Vec<String> {
    let mut unknown = Vec::new();
    collect_unknown(tree, values, "", &mut unknown);
    unknown
}

fn collect_unknown(tree: &ConfigTree, values: &Mapping, prefix: &str, out: &mut Vec<String>) {
    for (key, value) in values {
        let key = render_value(key);
        let dotted = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        match (tree.get(&key), value) {
            (Some(ConfigNode::Item(_)), _) => {}
            (Some(ConfigNode::Tree(sub)), Value::Mapping(nested)) => {
                collect_unknown(sub, nested, &dotted, out)
            }
            _ => out.push(dotted),
        }
    }
}
