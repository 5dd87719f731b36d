use std::io;

use ptree::{write_tree, TreeBuilder};

use super::SceneNode;

fn label(node: &SceneNode) -> String {
    format!("{} [{}]", node.name, node.sollum_type.ui_name())
}

fn add_node_to_tree(node: &SceneNode, tree: &mut TreeBuilder) {
    if node.children.is_empty() {
        tree.add_empty_child(label(node));
    } else {
        tree.begin_child(label(node));
        for child in &node.children {
            add_node_to_tree(child, tree);
        }
        tree.end_child();
    }
}

/// Render the snapshot hierarchy, one line per node.
pub fn write_scene_tree<W: io::Write>(root: &SceneNode, writer: W) -> io::Result<()> {
    let mut tree = TreeBuilder::new(label(root));
    for child in &root.children {
        add_node_to_tree(child, &mut tree);
    }
    write_tree(&tree.build(), writer)
}
