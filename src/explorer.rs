// File-explorer view state: the current directory, view mode, breadcrumb
// trail, quick-access links, and the copy/cut clipboard. One of these backs
// every explorer window; folder windows get their own, rooted at the folder.

use serde::Serialize;

use crate::fsystem::{
    FileSystem, FileSystemNode, FileType, MetadataUpdate, NodeId, ROOT_PATH,
};

/// Fixed quick-access links, as the original sidebar listed them. "Music"
/// has no seeded directory; navigating there just lists nothing.
pub const QUICK_ACCESS: &[(&str, &str)] = &[
    ("Desktop", "/Desktop"),
    ("Documents", "/Documents"),
    ("Downloads", "/Downloads"),
    ("Pictures", "/Pictures"),
    ("Music", "/Music"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    List,
    Grid,
    Details,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClipboardOp {
    Copy,
    Cut,
}

/// Clipboard entries snapshot the node at copy/cut time, as the source did;
/// a copied node pastes with the name and metadata it had then.
#[derive(Debug, Clone)]
struct Clipboard {
    node: FileSystemNode,
    op: ClipboardOp,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Crumb {
    pub label: String,
    pub path: String,
}

/// What opening an entry means for the caller: the explorer either descended
/// into a container, or wants a window opened for a file.
#[derive(Debug, Clone, PartialEq)]
pub enum Opened {
    Descended(String),
    File(NodeId),
    Missing,
}

pub struct ExplorerView {
    current_dir: String,
    view_mode: ViewMode,
    clipboard: Option<Clipboard>,
}

impl ExplorerView {
    pub fn at(path: &str) -> ExplorerView {
        ExplorerView {
            current_dir: path.to_string(),
            view_mode: ViewMode::default(),
            clipboard: None,
        }
    }

    pub fn current_dir(&self) -> &str {
        &self.current_dir
    }

    pub fn view_mode(&self) -> ViewMode {
        self.view_mode
    }

    pub fn set_view_mode(&mut self, mode: ViewMode) {
        self.view_mode = mode;
    }

    /// The current directory's listing, hidden nodes filtered out, in
    /// insertion order.
    pub fn entries<'a>(&self, fs: &'a FileSystem) -> Vec<&'a FileSystemNode> {
        fs.nodes_at(&self.current_dir)
            .into_iter()
            .filter(|node| !node.metadata.is_hidden)
            .collect()
    }

    /// Jump straight to a path. No existence check; a directory nobody
    /// created lists as empty.
    pub fn navigate(&mut self, path: &str) {
        self.current_dir = path.to_string();
    }

    /// Open an entry of the current listing. Containers (folders and trees
    /// alike) descend; files are handed back for a window.
    pub fn open_entry(&mut self, fs: &FileSystem, id: &NodeId) -> Opened {
        let node = match fs.node(id) {
            Some(node) => node,
            None => return Opened::Missing,
        };
        if node.kind.is_container() {
            let descended =
                format!("{}/{}", self.current_dir, node.name).replace("//", "/");
            self.current_dir = descended.clone();
            Opened::Descended(descended)
        } else {
            Opened::File(id.clone())
        }
    }

    /// Home plus one crumb per path segment; crumb N navigates back to the
    /// path down to segment N.
    pub fn breadcrumbs(&self) -> Vec<Crumb> {
        let mut crumbs = vec![Crumb {
            label: "Home".to_string(),
            path: ROOT_PATH.to_string(),
        }];
        let mut path = String::new();
        for segment in self.current_dir.split('/').filter(|s| !s.is_empty()) {
            path.push('/');
            path.push_str(segment);
            crumbs.push(Crumb {
                label: segment.to_string(),
                path: path.clone(),
            });
        }
        crumbs
    }

    pub fn create(&self, fs: &mut FileSystem, name: &str, kind: FileType) -> Option<NodeId> {
        if name.trim().is_empty() {
            return None;
        }
        fs.create_node(name, kind, &self.current_dir, None)
            .map(|node| node.id.clone())
    }

    pub fn rename(&self, fs: &mut FileSystem, id: &NodeId, new_name: &str) {
        let unchanged = fs
            .node(id)
            .map(|node| node.name == new_name)
            .unwrap_or(true);
        if new_name.trim().is_empty() || unchanged {
            return;
        }
        fs.rename_node(id, new_name);
    }

    pub fn delete(&self, fs: &mut FileSystem, id: &NodeId) {
        fs.delete_node(id);
    }

    pub fn copy(&mut self, fs: &FileSystem, id: &NodeId) {
        if let Some(node) = fs.node(id) {
            self.clipboard = Some(Clipboard {
                node: node.clone(),
                op: ClipboardOp::Copy,
            });
        }
    }

    pub fn cut(&mut self, fs: &FileSystem, id: &NodeId) {
        if let Some(node) = fs.node(id) {
            self.clipboard = Some(Clipboard {
                node: node.clone(),
                op: ClipboardOp::Cut,
            });
        }
    }

    pub fn can_paste(&self) -> bool {
        self.clipboard.is_some()
    }

    /// Paste into the current directory. Copy re-creates the node from the
    /// snapshot (name, kind, metadata; content is not carried -- source
    /// behavior). Cut moves the node here. Either way the clipboard empties.
    pub fn paste(&mut self, fs: &mut FileSystem) {
        let Clipboard { node, op } = match self.clipboard.take() {
            Some(clipboard) => clipboard,
            None => return,
        };
        match op {
            ClipboardOp::Copy => {
                let metadata = MetadataUpdate {
                    position: node.metadata.position,
                    is_system: Some(node.metadata.is_system),
                    is_hidden: Some(node.metadata.is_hidden),
                    permissions: Some(node.metadata.permissions),
                };
                fs.create_node(&node.name, node.kind, &self.current_dir, Some(metadata));
            }
            ClipboardOp::Cut => {
                fs.move_node(&node.id, &self.current_dir, None);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fsystem::WELCOME_TEXT;

    fn fs() -> FileSystem {
        FileSystem::seeded(WELCOME_TEXT)
    }

    #[test]
    fn entries_hide_hidden_nodes_and_keep_order() {
        let mut fs = fs();
        let hidden = fs
            .create_node("secrets", FileType::Folder, "/Desktop", None)
            .unwrap()
            .id
            .clone();
        fs.update_node_metadata(
            &hidden,
            &MetadataUpdate {
                is_hidden: Some(true),
                ..MetadataUpdate::default()
            },
        );
        fs.create_node("b.txt", FileType::File, "/Desktop", None);

        let explorer = ExplorerView::at("/Desktop");
        let names: Vec<&str> = explorer
            .entries(&fs)
            .iter()
            .map(|node| node.name.as_str())
            .collect();
        assert_eq!(names, vec!["Welcome.txt", "b.txt"]);
    }

    #[test]
    fn opening_a_folder_descends_and_collapses_slashes() {
        let mut fs = fs();
        let docs = fs
            .create_node("Documents", FileType::Folder, "/", None)
            .unwrap()
            .id
            .clone();
        let mut explorer = ExplorerView::at("/");
        let opened = explorer.open_entry(&fs, &docs);
        assert_eq!(opened, Opened::Descended("/Documents".to_string()));
        assert_eq!(explorer.current_dir(), "/Documents");
    }

    #[test]
    fn trees_descend_like_folders_and_files_open() {
        let mut fs = fs();
        let tree = fs
            .create_node("repo", FileType::Tree, "/Desktop", None)
            .unwrap()
            .id
            .clone();
        let mut explorer = ExplorerView::at("/Desktop");
        assert_eq!(
            explorer.open_entry(&fs, &tree),
            Opened::Descended("/Desktop/repo".to_string())
        );

        let mut explorer = ExplorerView::at("/Desktop");
        assert_eq!(
            explorer.open_entry(&fs, &NodeId::from("welcome")),
            Opened::File(NodeId::from("welcome"))
        );
        assert_eq!(explorer.current_dir(), "/Desktop");
    }

    #[test]
    fn breadcrumbs_walk_back_up_the_path() {
        let explorer = ExplorerView::at("/Desktop/Projects/Sub");
        let crumbs = explorer.breadcrumbs();
        let paths: Vec<&str> = crumbs.iter().map(|crumb| crumb.path.as_str()).collect();
        assert_eq!(
            paths,
            vec!["/", "/Desktop", "/Desktop/Projects", "/Desktop/Projects/Sub"]
        );
        assert_eq!(crumbs[0].label, "Home");
        assert_eq!(crumbs[3].label, "Sub");
    }

    #[test]
    fn navigation_to_a_directory_nobody_created_lists_empty() {
        let fs = fs();
        let mut explorer = ExplorerView::at("/");
        explorer.navigate("/Music");
        assert!(explorer.entries(&fs).is_empty());
    }

    #[test]
    fn copy_paste_duplicates_without_content() {
        let mut fs = fs();
        let mut explorer = ExplorerView::at("/Desktop");
        explorer.copy(&fs, &NodeId::from("welcome"));
        assert!(explorer.can_paste());
        explorer.paste(&mut fs);

        let listing = fs.nodes_at("/Desktop");
        assert_eq!(listing.len(), 2);
        let pasted = listing[1];
        assert_eq!(pasted.name, "Welcome.txt");
        assert_ne!(pasted.id, NodeId::from("welcome"));
        assert_eq!(pasted.content, None);
        assert_eq!(pasted.metadata.position, listing[0].metadata.position);
        assert!(!explorer.can_paste());
    }

    #[test]
    fn cut_paste_moves_the_node() {
        let mut fs = fs();
        fs.create_node("Documents", FileType::Folder, "/", None);
        let mut explorer = ExplorerView::at("/Documents");
        explorer.cut(&fs, &NodeId::from("welcome"));
        explorer.paste(&mut fs);

        assert_eq!(
            fs.parent_path(&NodeId::from("welcome")).unwrap(),
            "/Documents"
        );
        assert!(fs.nodes_at("/Desktop").is_empty());
    }

    #[test]
    fn paste_with_an_empty_clipboard_is_a_no_op() {
        let mut fs = fs();
        let mut explorer = ExplorerView::at("/Desktop");
        explorer.paste(&mut fs);
        assert_eq!(fs.nodes_at("/Desktop").len(), 1);
    }

    #[test]
    fn create_and_rename_guard_blank_names() {
        let mut fs = fs();
        let explorer = ExplorerView::at("/Desktop");
        assert!(explorer.create(&mut fs, "   ", FileType::File).is_none());
        let id = explorer
            .create(&mut fs, "notes.txt", FileType::File)
            .unwrap();

        explorer.rename(&mut fs, &id, "  ");
        assert_eq!(fs.node(&id).unwrap().name, "notes.txt");
        explorer.rename(&mut fs, &id, "renamed.txt");
        assert_eq!(fs.node(&id).unwrap().name, "renamed.txt");
    }
}
