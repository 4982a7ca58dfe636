// Text-editor view state for a file window: a working buffer plus a dirty
// flag. The buffer only reaches the file system on an explicit save.

use crate::fsystem::{FileSystem, NodeId};

pub struct EditorView {
    node: NodeId,
    buffer: String,
    dirty: bool,
}

impl EditorView {
    pub fn open(fs: &FileSystem, node: &NodeId) -> EditorView {
        let buffer = fs
            .node(node)
            .and_then(|node| node.content.clone())
            .unwrap_or_default();
        EditorView {
            node: node.clone(),
            buffer,
            dirty: false,
        }
    }

    pub fn node(&self) -> &NodeId {
        &self.node
    }

    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn edit(&mut self, text: &str) {
        self.buffer = text.to_string();
        self.dirty = true;
    }

    /// Write the buffer back to the node. Saving a node that has been
    /// deleted follows the store's no-op policy; the dirty flag clears
    /// either way, as in the source.
    pub fn save(&mut self, fs: &mut FileSystem) {
        fs.update_node_content(&self.node, &self.buffer);
        self.dirty = false;
    }

    pub fn reload(&mut self, fs: &FileSystem) {
        self.buffer = fs
            .node(&self.node)
            .and_then(|node| node.content.clone())
            .unwrap_or_default();
        self.dirty = false;
    }
}
