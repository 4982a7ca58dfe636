// The window manager: an ordered collection of open windows with a single
// focus and an explicit stacking order. "Front" is always the highest z,
// assigned from a monotone counter on open and focus; it is never inferred
// from table position.

use serde::Serialize;
use uuid::Uuid;

use crate::fsystem::{FileSystemNode, FileType, NodeId};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct WindowId(String);

impl WindowId {
    fn generate() -> WindowId {
        WindowId(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for WindowId {
    fn from(id: &str) -> Self {
        WindowId(id.to_string())
    }
}

impl std::fmt::Display for WindowId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What a window shows: either a file-system node, or a named custom view
/// (the singleton utility windows: file explorer, settings).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum WindowContent {
    Node(NodeId),
    Custom(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum WindowIcon {
    File,
    Folder,
    Tree,
    HardDrive,
    Settings,
}

impl WindowIcon {
    pub fn for_node(kind: FileType) -> WindowIcon {
        match kind {
            FileType::Folder => WindowIcon::Folder,
            FileType::Tree => WindowIcon::Tree,
            FileType::File => WindowIcon::File,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Window {
    pub id: WindowId,
    pub title: String,
    pub content: WindowContent,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<WindowIcon>,
    pub is_minimized: bool,
    pub z: u64,
}

/// Spec for the custom-window path; unlike node windows these carry their
/// own (stable) id, which is what makes them singletons.
#[derive(Debug, Clone)]
pub struct CustomWindow {
    pub id: WindowId,
    pub title: String,
    pub view: String,
    pub icon: Option<WindowIcon>,
}

pub struct WindowManager {
    windows: Vec<Window>,
    focused: Option<WindowId>,
    next_z: u64,
}

impl WindowManager {
    pub fn new() -> WindowManager {
        WindowManager {
            windows: Vec::new(),
            focused: None,
            next_z: 0,
        }
    }

    fn bump_z(&mut self) -> u64 {
        self.next_z += 1;
        self.next_z
    }

    /// Open a new window bound to a node. Always creates; opening the same
    /// node twice yields two windows.
    pub fn open_window(&mut self, node: &FileSystemNode) -> WindowId {
        let id = WindowId::generate();
        let z = self.bump_z();
        self.windows.push(Window {
            id: id.clone(),
            title: node.name.clone(),
            content: WindowContent::Node(node.id.clone()),
            icon: Some(WindowIcon::for_node(node.kind)),
            is_minimized: false,
            z,
        });
        self.focused = Some(id.clone());
        id
    }

    /// Open a custom window, or restore the existing one: if a window with
    /// this id is already open it is un-minimized (if needed) and focused,
    /// and no new window is created.
    pub fn open_custom(&mut self, spec: CustomWindow) -> WindowId {
        if self.window(&spec.id).is_some() {
            if let Some(window) = self.window_mut(&spec.id) {
                window.is_minimized = false;
            }
            self.focus_window(&spec.id);
            return spec.id;
        }
        let z = self.bump_z();
        self.windows.push(Window {
            id: spec.id.clone(),
            title: spec.title,
            content: WindowContent::Custom(spec.view),
            icon: spec.icon,
            is_minimized: false,
            z,
        });
        self.focused = Some(spec.id.clone());
        spec.id
    }

    /// Close a window. When the focused window goes away, focus falls to
    /// the top-most remaining window -- minimized or not -- or to none.
    pub fn close_window(&mut self, id: &WindowId) {
        self.windows.retain(|window| &window.id != id);
        if self.focused.as_ref() == Some(id) {
            self.focused = self
                .windows
                .iter()
                .max_by_key(|window| window.z)
                .map(|window| window.id.clone());
        }
    }

    /// Focus is set unconditionally, matching the original contract; only a
    /// window that actually exists is raised.
    pub fn focus_window(&mut self, id: &WindowId) {
        self.focused = Some(id.clone());
        let z = self.bump_z();
        if let Some(window) = self.window_mut(id) {
            window.z = z;
        }
    }

    /// Toggle the minimized flag. Minimizing the focused window hands focus
    /// to the top-most non-minimized other window, or to none.
    pub fn minimize_window(&mut self, id: &WindowId) {
        if let Some(window) = self.window_mut(id) {
            window.is_minimized = !window.is_minimized;
        } else {
            return;
        }
        if self.focused.as_ref() == Some(id) {
            self.focused = self
                .windows
                .iter()
                .filter(|window| !window.is_minimized && &window.id != id)
                .max_by_key(|window| window.z)
                .map(|window| window.id.clone());
        }
    }

    pub fn window(&self, id: &WindowId) -> Option<&Window> {
        self.windows.iter().find(|window| &window.id == id)
    }

    fn window_mut(&mut self, id: &WindowId) -> Option<&mut Window> {
        self.windows.iter_mut().find(|window| &window.id == id)
    }

    /// Open windows in insertion order.
    pub fn windows(&self) -> &[Window] {
        &self.windows
    }

    /// Open windows bottom to top.
    pub fn stacking(&self) -> Vec<&Window> {
        let mut stacked: Vec<&Window> = self.windows.iter().collect();
        stacked.sort_by_key(|window| window.z);
        stacked
    }

    pub fn focused(&self) -> Option<&WindowId> {
        self.focused.as_ref()
    }

    pub fn is_focused(&self, id: &WindowId) -> bool {
        self.focused.as_ref() == Some(id)
    }
}

impl Default for WindowManager {
    fn default() -> Self {
        WindowManager::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fsystem::{FileSystem, FileType, NodeId};

    fn explorer_spec() -> CustomWindow {
        CustomWindow {
            id: WindowId::from("file-explorer"),
            title: "File Explorer".to_string(),
            view: "file-explorer".to_string(),
            icon: Some(WindowIcon::HardDrive),
        }
    }

    fn fs_with_files() -> FileSystem {
        let mut fs = FileSystem::seeded(crate::fsystem::WELCOME_TEXT);
        fs.create_node("a.txt", FileType::File, "/Desktop", None);
        fs
    }

    #[test]
    fn opening_a_node_twice_creates_two_windows() {
        let fs = fs_with_files();
        let welcome = fs.node(&NodeId::from("welcome")).unwrap().clone();
        let mut wm = WindowManager::new();
        let first = wm.open_window(&welcome);
        let second = wm.open_window(&welcome);
        assert_ne!(first, second);
        assert_eq!(wm.windows().len(), 2);
        assert_eq!(wm.focused(), Some(&second));
        assert_eq!(wm.window(&second).unwrap().title, "Welcome.txt");
    }

    #[test]
    fn custom_windows_are_singletons_that_restore() {
        let mut wm = WindowManager::new();
        let id = wm.open_custom(explorer_spec());
        wm.minimize_window(&id);
        assert!(wm.window(&id).unwrap().is_minimized);

        let again = wm.open_custom(explorer_spec());
        assert_eq!(again, id);
        assert_eq!(wm.windows().len(), 1);
        assert!(!wm.window(&id).unwrap().is_minimized);
        assert_eq!(wm.focused(), Some(&id));
    }

    #[test]
    fn closing_the_focused_window_falls_back_to_the_top_most() {
        let fs = fs_with_files();
        let welcome = fs.node(&NodeId::from("welcome")).unwrap().clone();
        let mut wm = WindowManager::new();
        let first = wm.open_window(&welcome);
        let second = wm.open_window(&welcome);
        let third = wm.open_window(&welcome);
        // Raise the oldest window so stacking and insertion order disagree.
        wm.focus_window(&first);

        wm.close_window(&first);
        assert_eq!(wm.focused(), Some(&third));

        // Closing an unfocused window leaves focus alone.
        wm.close_window(&second);
        assert_eq!(wm.focused(), Some(&third));

        wm.close_window(&third);
        assert_eq!(wm.focused(), None);
    }

    #[test]
    fn closing_falls_back_even_to_a_minimized_window() {
        let fs = fs_with_files();
        let welcome = fs.node(&NodeId::from("welcome")).unwrap().clone();
        let mut wm = WindowManager::new();
        let first = wm.open_window(&welcome);
        let second = wm.open_window(&welcome);
        wm.minimize_window(&first);
        wm.focus_window(&second);

        wm.close_window(&second);
        assert_eq!(wm.focused(), Some(&first));
    }

    #[test]
    fn minimizing_the_focused_window_skips_minimized_windows() {
        let fs = fs_with_files();
        let welcome = fs.node(&NodeId::from("welcome")).unwrap().clone();
        let mut wm = WindowManager::new();
        let first = wm.open_window(&welcome);
        let second = wm.open_window(&welcome);
        let third = wm.open_window(&welcome);
        wm.minimize_window(&second);
        assert_eq!(wm.focused(), Some(&third));

        wm.minimize_window(&third);
        assert_eq!(wm.focused(), Some(&first));

        wm.minimize_window(&first);
        assert_eq!(wm.focused(), None);
    }

    #[test]
    fn minimize_is_a_toggle() {
        let mut wm = WindowManager::new();
        let id = wm.open_custom(explorer_spec());
        wm.minimize_window(&id);
        assert!(wm.window(&id).unwrap().is_minimized);
        wm.minimize_window(&id);
        assert!(!wm.window(&id).unwrap().is_minimized);
    }

    #[test]
    fn focus_raises_to_the_top_of_the_stack() {
        let fs = fs_with_files();
        let welcome = fs.node(&NodeId::from("welcome")).unwrap().clone();
        let mut wm = WindowManager::new();
        let first = wm.open_window(&welcome);
        let second = wm.open_window(&welcome);
        wm.focus_window(&first);

        let order: Vec<&WindowId> = wm.stacking().iter().map(|window| &window.id).collect();
        assert_eq!(order, vec![&second, &first]);
        // Insertion order is unchanged by restacking.
        assert_eq!(wm.windows()[0].id, first);
    }

    #[test]
    fn focusing_an_unknown_id_dangles_without_restacking() {
        let mut wm = WindowManager::new();
        let id = wm.open_custom(explorer_spec());
        let before = wm.window(&id).unwrap().z;
        wm.focus_window(&WindowId::from("missing"));
        assert_eq!(wm.focused(), Some(&WindowId::from("missing")));
        assert_eq!(wm.window(&id).unwrap().z, before);
    }

    #[test]
    fn minimizing_an_unknown_id_is_a_no_op() {
        let mut wm = WindowManager::new();
        let id = wm.open_custom(explorer_spec());
        wm.minimize_window(&WindowId::from("missing"));
        assert_eq!(wm.focused(), Some(&id));
        assert_eq!(wm.windows().len(), 1);
    }
}
