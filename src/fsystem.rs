// Definition of the virtual file system. Every node lives in one in-memory
// table, in insertion order. The hierarchy is held as parent-id pointers;
// the path strings the views work with are derived on demand, so renames and
// moves are pointer updates rather than table-wide string rewrites.
//
// Nothing here survives the process. There is no backing store.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const ROOT_PATH: &str = "/";
pub const DESKTOP_PATH: &str = "/Desktop";

pub static SYSTEM_PATHS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    let mut paths = HashMap::new();
    paths.insert("ROOT", "/");
    paths.insert("DESKTOP", "/Desktop");
    paths.insert("DOCUMENTS", "/Documents");
    paths.insert("DOWNLOADS", "/Downloads");
    paths.insert("PICTURES", "/Pictures");
    paths.insert("SYSTEM", "/System");
    paths
});

pub(crate) const WELCOME_TEXT: &str =
    "Welcome to Tree's OS!\n\nThis is your personal workspace.";

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    fn generate() -> NodeId {
        NodeId(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for NodeId {
    fn from(id: &str) -> Self {
        NodeId(id.to_string())
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    File,
    Folder,
    Tree,
}

impl FileType {
    /// Trees behave exactly like folders; the distinction is cosmetic.
    pub fn is_container(&self) -> bool {
        !matches!(self, FileType::File)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Position {
        Position { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permissions {
    pub read: bool,
    pub write: bool,
    pub execute: bool,
}

impl Permissions {
    /// Defaults on creation: everything readable and writable, only
    /// containers executable. Stored, never enforced.
    pub fn for_type(kind: FileType) -> Permissions {
        Permissions {
            read: true,
            write: true,
            execute: kind.is_container(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
    #[serde(default)]
    pub is_system: bool,
    #[serde(default)]
    pub is_hidden: bool,
    pub permissions: Permissions,
}

impl NodeMetadata {
    fn for_type(kind: FileType) -> NodeMetadata {
        NodeMetadata {
            position: None,
            is_system: false,
            is_hidden: false,
            permissions: Permissions::for_type(kind),
        }
    }
}

/// Shallow-merge patch for node metadata. Fields left as `None` keep their
/// current value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetadataUpdate {
    pub position: Option<Position>,
    pub is_system: Option<bool>,
    pub is_hidden: Option<bool>,
    pub permissions: Option<Permissions>,
}

impl MetadataUpdate {
    pub fn position(position: Position) -> MetadataUpdate {
        MetadataUpdate {
            position: Some(position),
            ..MetadataUpdate::default()
        }
    }

    fn apply(&self, metadata: &mut NodeMetadata) {
        if let Some(position) = self.position {
            metadata.position = Some(position);
        }
        if let Some(is_system) = self.is_system {
            metadata.is_system = is_system;
        }
        if let Some(is_hidden) = self.is_hidden {
            metadata.is_hidden = is_hidden;
        }
        if let Some(permissions) = self.permissions {
            metadata.permissions = permissions;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileSystemNode {
    pub id: NodeId,
    pub name: String,
    pub kind: FileType,
    /// `None` only for the root node.
    pub parent: Option<NodeId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
    pub metadata: NodeMetadata,
}

/// Flattened view of a node with its derived path strings, for display and
/// JSON output.
#[derive(Debug, Clone, Serialize)]
pub struct NodeRecord {
    pub id: NodeId,
    pub name: String,
    pub kind: FileType,
    pub path: String,
    pub full_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
    pub metadata: NodeMetadata,
}

pub struct FileSystem {
    nodes: Vec<FileSystemNode>,
    opened: Vec<NodeId>,
}

impl FileSystem {
    /// An empty file system still carries the root folder; it anchors path
    /// resolution and cannot be deleted or moved.
    pub fn new() -> FileSystem {
        let now = Utc::now();
        let root = FileSystemNode {
            id: NodeId::from("root"),
            name: "Root".to_string(),
            kind: FileType::Folder,
            parent: None,
            content: None,
            created_at: now,
            modified_at: now,
            metadata: NodeMetadata {
                position: None,
                is_system: true,
                is_hidden: true,
                permissions: Permissions {
                    read: true,
                    write: true,
                    execute: true,
                },
            },
        };
        FileSystem {
            nodes: vec![root],
            opened: Vec::new(),
        }
    }

    /// The fixed initial state: root, a Desktop folder, and one welcome file
    /// at (20, 20).
    pub fn seeded(welcome_text: &str) -> FileSystem {
        let mut fs = FileSystem::new();
        let now = Utc::now();
        fs.nodes.push(FileSystemNode {
            id: NodeId::from("desktop"),
            name: "Desktop".to_string(),
            kind: FileType::Folder,
            parent: Some(NodeId::from("root")),
            content: None,
            created_at: now,
            modified_at: now,
            metadata: NodeMetadata {
                position: None,
                is_system: true,
                is_hidden: false,
                permissions: Permissions {
                    read: true,
                    write: true,
                    execute: true,
                },
            },
        });
        fs.nodes.push(FileSystemNode {
            id: NodeId::from("welcome"),
            name: "Welcome.txt".to_string(),
            kind: FileType::File,
            parent: Some(NodeId::from("desktop")),
            content: Some(welcome_text.to_string()),
            created_at: now,
            modified_at: now,
            metadata: NodeMetadata {
                position: Some(Position::new(20.0, 20.0)),
                is_system: false,
                is_hidden: false,
                permissions: Permissions {
                    read: true,
                    write: true,
                    execute: false,
                },
            },
        });
        fs
    }

    fn root_id(&self) -> &NodeId {
        // The root is always the first entry; see `new`.
        &self.nodes[0].id
    }

    fn index_of(&self, id: &NodeId) -> Option<usize> {
        self.nodes.iter().position(|node| &node.id == id)
    }

    pub fn node(&self, id: &NodeId) -> Option<&FileSystemNode> {
        self.nodes.iter().find(|node| &node.id == id)
    }

    pub fn nodes(&self) -> &[FileSystemNode] {
        &self.nodes
    }

    fn children_ids(&self, id: &NodeId) -> Vec<NodeId> {
        self.nodes
            .iter()
            .filter(|node| node.parent.as_ref() == Some(id))
            .map(|node| node.id.clone())
            .collect()
    }

    /// Resolve a full path ("/Desktop/Projects") to a node id. Empty
    /// segments collapse, so "//Desktop" resolves the same as "/Desktop".
    /// With duplicate sibling names the earliest-created node wins.
    pub fn resolve(&self, path: &str) -> Option<NodeId> {
        let mut current = self.root_id().clone();
        for segment in path.split('/').filter(|segment| !segment.is_empty()) {
            let next = self.nodes.iter().find(|node| {
                node.parent.as_ref() == Some(&current) && node.name == segment
            })?;
            current = next.id.clone();
        }
        Some(current)
    }

    fn resolve_container(&self, path: &str) -> Option<NodeId> {
        let id = self.resolve(path)?;
        let node = self.node(&id)?;
        if node.parent.is_none() || node.kind.is_container() {
            Some(id)
        } else {
            None
        }
    }

    /// Full path of the node itself, e.g. "/Desktop/Welcome.txt". The root
    /// is "/".
    pub fn full_path(&self, id: &NodeId) -> Option<String> {
        let node = self.node(id)?;
        match &node.parent {
            None => Some(ROOT_PATH.to_string()),
            Some(parent) => {
                let parent_path = self.full_path(parent)?;
                if parent_path == ROOT_PATH {
                    Some(format!("/{}", node.name))
                } else {
                    Some(format!("{}/{}", parent_path, node.name))
                }
            }
        }
    }

    /// The node's parent-directory path string, the `path` field of the
    /// original data model: "/Desktop" for a node living under Desktop. The
    /// root reports "/".
    pub fn parent_path(&self, id: &NodeId) -> Option<String> {
        let node = self.node(id)?;
        match &node.parent {
            None => Some(ROOT_PATH.to_string()),
            Some(parent) => self.full_path(parent),
        }
    }

    pub fn record(&self, id: &NodeId) -> Option<NodeRecord> {
        let node = self.node(id)?;
        Some(NodeRecord {
            id: node.id.clone(),
            name: node.name.clone(),
            kind: node.kind,
            path: self.parent_path(id)?,
            full_path: self.full_path(id)?,
            content: node.content.clone(),
            created_at: node.created_at,
            modified_at: node.modified_at,
            metadata: node.metadata.clone(),
        })
    }

    /// Direct children of the directory named by `path`, in insertion order.
    /// One level only; an unresolvable path yields an empty listing.
    pub fn nodes_at(&self, path: &str) -> Vec<&FileSystemNode> {
        let parent = match self.resolve_container(path) {
            Some(id) => id,
            None => return Vec::new(),
        };
        self.nodes
            .iter()
            .filter(|node| node.parent.as_ref() == Some(&parent))
            .collect()
    }

    pub fn desktop_nodes(&self) -> Vec<&FileSystemNode> {
        self.nodes_at(DESKTOP_PATH)
    }

    /// Create a node under `parent_path`. Sibling names are not checked for
    /// collisions. Returns the created node, or `None` when the parent path
    /// does not resolve to a container.
    pub fn create_node(
        &mut self,
        name: &str,
        kind: FileType,
        parent_path: &str,
        metadata: Option<MetadataUpdate>,
    ) -> Option<&FileSystemNode> {
        let parent = self.resolve_container(parent_path)?;
        let now = Utc::now();
        let mut node_metadata = NodeMetadata::for_type(kind);
        if let Some(update) = metadata {
            update.apply(&mut node_metadata);
        }
        self.nodes.push(FileSystemNode {
            id: NodeId::generate(),
            name: name.to_string(),
            kind,
            parent: Some(parent),
            content: None,
            created_at: now,
            modified_at: now,
            metadata: node_metadata,
        });
        self.nodes.last()
    }

    /// Delete a node. Containers cascade to every descendant; the cascade
    /// follows parent pointers, so "/Desktop/ProjectsOld" is never caught by
    /// a delete of "/Desktop/Projects". Unknown ids and the root are no-ops.
    pub fn delete_node(&mut self, id: &NodeId) {
        let node = match self.node(id) {
            Some(node) => node,
            None => return,
        };
        if node.parent.is_none() {
            return;
        }
        let mut doomed = vec![id.clone()];
        let mut stack = vec![id.clone()];
        while let Some(current) = stack.pop() {
            for child in self.children_ids(&current) {
                doomed.push(child.clone());
                stack.push(child);
            }
        }
        self.nodes.retain(|node| !doomed.contains(&node.id));
    }

    /// Reparent a node under `new_parent_path`, optionally pinning a new
    /// desktop position. Descendants follow their parent. No-ops: unknown
    /// id, the root, an unresolvable destination, or a destination inside
    /// the moved node's own subtree.
    pub fn move_node(
        &mut self,
        id: &NodeId,
        new_parent_path: &str,
        position: Option<Position>,
    ) {
        let new_parent = match self.resolve_container(new_parent_path) {
            Some(parent) => parent,
            None => return,
        };
        if &new_parent == id || self.is_descendant_of(&new_parent, id) {
            return;
        }
        let index = match self.index_of(id) {
            Some(index) => index,
            None => return,
        };
        if self.nodes[index].parent.is_none() {
            return;
        }
        self.nodes[index].parent = Some(new_parent);
        if let Some(position) = position {
            self.nodes[index].metadata.position = Some(position);
        }
    }

    /// Rename a node. Descendant paths are derived from the tree, so they
    /// follow the new name with no further bookkeeping; a sibling whose name
    /// merely shares the prefix is untouched.
    pub fn rename_node(&mut self, id: &NodeId, new_name: &str) {
        if let Some(index) = self.index_of(id) {
            self.nodes[index].name = new_name.to_string();
            self.nodes[index].modified_at = Utc::now();
        }
    }

    pub fn update_node_content(&mut self, id: &NodeId, content: &str) {
        if let Some(index) = self.index_of(id) {
            self.nodes[index].content = Some(content.to_string());
            self.nodes[index].modified_at = Utc::now();
        }
    }

    pub fn update_node_metadata(&mut self, id: &NodeId, update: &MetadataUpdate) {
        if let Some(index) = self.index_of(id) {
            update.apply(&mut self.nodes[index].metadata);
            self.nodes[index].modified_at = Utc::now();
        }
    }

    fn is_descendant_of(&self, id: &NodeId, ancestor: &NodeId) -> bool {
        let mut current = self.node(id).and_then(|node| node.parent.clone());
        while let Some(parent) = current {
            if &parent == ancestor {
                return true;
            }
            current = self.node(&parent).and_then(|node| node.parent.clone());
        }
        false
    }

    // Opened-node bookkeeping. The set is insertion-ordered and
    // duplicate-free; nothing else in the file system consults it.

    pub fn open_node(&mut self, id: &NodeId) {
        if !self.opened.contains(id) {
            self.opened.push(id.clone());
        }
    }

    pub fn close_node(&mut self, id: &NodeId) {
        self.opened.retain(|opened| opened != id);
    }

    pub fn opened_nodes(&self) -> &[NodeId] {
        &self.opened
    }
}

impl Default for FileSystem {
    fn default() -> Self {
        FileSystem::new()
    }
}
