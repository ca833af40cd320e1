use crate::schema::{ConfigNode, ConfigTree};

/// Deep-merge `overlay` on top of `base`.
/// If both sides have a subtree for the same key, recurse.
/// Otherwise, `overlay`'s node wins.
pub fn merge_trees(mut base: ConfigTree, overlay: ConfigTree) -> ConfigTree {
    for (key, overlay_node) in overlay {
        match (base.remove(&key), overlay_node) {
            (Some(ConfigNode::Tree(base_tree)), ConfigNode::Tree(overlay_tree)) => {
                base.insert(key, ConfigNode::Tree(merge_trees(base_tree, overlay_tree)));
            }
            (_, overlay_node) => {
                base.insert(key, overlay_node);
            }
        }
    }
    base
}
