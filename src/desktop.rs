// The desktop session: one file system, one window manager, and the view
// state hanging off each open window. Views never touch ambient globals;
// they borrow the stores from here.

use std::collections::HashMap;

use serde::Serialize;
use tracing::instrument;

use crate::config::SystemConfig;
use crate::editor::EditorView;
use crate::explorer::{ExplorerView, Opened};
use crate::fsystem::{
    FileSystem, FileSystemNode, FileType, MetadataUpdate, NodeId, Position, DESKTOP_PATH,
};
use crate::gesture::{Frame, Gesture};
use crate::windows::{CustomWindow, WindowIcon, WindowId, WindowManager};

pub const EXPLORER_WINDOW: &str = "file-explorer";
pub const SETTINGS_WINDOW: &str = "settings";

pub enum ViewState {
    Editor(EditorView),
    Explorer(ExplorerView),
    Settings,
}

/// Everything the rendering layer needs for one window besides the window
/// record itself.
pub struct OpenView {
    pub frame: Frame,
    pub state: ViewState,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskbarEntry {
    pub window: WindowId,
    pub title: String,
    pub icon: WindowIcon,
    pub is_minimized: bool,
    pub is_focused: bool,
}

struct IconDrag {
    node: NodeId,
    gesture: Gesture,
}

pub struct Desktop {
    config: SystemConfig,
    fs: FileSystem,
    windows: WindowManager,
    views: HashMap<WindowId, OpenView>,
    icon_drag: Option<IconDrag>,
}

impl Desktop {
    pub fn new(config: SystemConfig) -> Desktop {
        let fs = FileSystem::seeded(&config.welcome_text);
        tracing::info!("desktop session started with the seed file system");
        Desktop {
            config,
            fs,
            windows: WindowManager::new(),
            views: HashMap::new(),
            icon_drag: None,
        }
    }

    pub fn config(&self) -> &SystemConfig {
        &self.config
    }

    pub fn fs(&self) -> &FileSystem {
        &self.fs
    }

    pub fn fs_mut(&mut self) -> &mut FileSystem {
        &mut self.fs
    }

    pub fn windows(&self) -> &WindowManager {
        &self.windows
    }

    /// Icons on the desktop surface. Unlike the explorer listing, hidden
    /// nodes are not filtered here; the desktop shows whatever lives under
    /// "/Desktop".
    pub fn icons(&self) -> Vec<&FileSystemNode> {
        self.fs.desktop_nodes()
    }

    // -- opening things ----------------------------------------------------

    /// Open a node from the desktop: mark it opened, then give it a window.
    #[instrument(name = "desktop.open", level = "info", skip(self), fields(id = %id))]
    pub fn open(&mut self, id: &NodeId) -> Option<WindowId> {
        self.fs.node(id)?;
        self.fs.open_node(id);
        self.open_node_window(id)
    }

    pub fn open_path(&mut self, path: &str) -> Option<WindowId> {
        let id = self.fs.resolve(path)?;
        self.open(&id)
    }

    /// Window + view for a node; files get an editor, containers get an
    /// explorer rooted at their own path. The explorer open path lands here
    /// too, without the opened-set marking (source parity).
    fn open_node_window(&mut self, id: &NodeId) -> Option<WindowId> {
        let node = self.fs.node(id)?.clone();
        let state = if node.kind.is_container() {
            let root = self.fs.full_path(id)?;
            ViewState::Explorer(ExplorerView::at(&root))
        } else {
            ViewState::Editor(EditorView::open(&self.fs, id))
        };
        let window = self.windows.open_window(&node);
        self.views.insert(
            window.clone(),
            OpenView {
                frame: self.new_frame(),
                state,
            },
        );
        Some(window)
    }

    /// The singleton file-explorer window (the taskbar / start-menu entry).
    /// Reopening restores and focuses it; its navigation state survives.
    #[instrument(name = "desktop.open_explorer", level = "info", skip(self))]
    pub fn open_explorer(&mut self) -> WindowId {
        let window = self.windows.open_custom(CustomWindow {
            id: WindowId::from(EXPLORER_WINDOW),
            title: "File Explorer".to_string(),
            view: EXPLORER_WINDOW.to_string(),
            icon: Some(WindowIcon::HardDrive),
        });
        let frame = self.new_frame();
        self.views.entry(window.clone()).or_insert_with(|| OpenView {
            frame,
            state: ViewState::Explorer(ExplorerView::at("/")),
        });
        window
    }

    #[instrument(name = "desktop.open_settings", level = "info", skip(self))]
    pub fn open_settings(&mut self) -> WindowId {
        let window = self.windows.open_custom(CustomWindow {
            id: WindowId::from(SETTINGS_WINDOW),
            title: "Settings".to_string(),
            view: SETTINGS_WINDOW.to_string(),
            icon: Some(WindowIcon::Settings),
        });
        let frame = self.new_frame();
        self.views.entry(window.clone()).or_insert_with(|| OpenView {
            frame,
            state: ViewState::Settings,
        });
        window
    }

    fn new_frame(&self) -> Frame {
        Frame::new(
            self.config.window.initial_position,
            self.config.window.initial_size,
        )
    }

    // -- window passthroughs ----------------------------------------------

    #[instrument(name = "desktop.close_window", level = "info", skip(self), fields(id = %id))]
    pub fn close_window(&mut self, id: &WindowId) {
        self.windows.close_window(id);
        self.views.remove(id);
    }

    pub fn focus_window(&mut self, id: &WindowId) {
        self.windows.focus_window(id);
    }

    pub fn minimize_window(&mut self, id: &WindowId) {
        self.windows.minimize_window(id);
    }

    pub fn view(&self, id: &WindowId) -> Option<&OpenView> {
        self.views.get(id)
    }

    pub fn view_mut(&mut self, id: &WindowId) -> Option<&mut OpenView> {
        self.views.get_mut(id)
    }

    // -- per-window view operations ---------------------------------------

    /// Open an entry from an explorer window: descend in place, or spawn an
    /// editor window for a file.
    pub fn explorer_open(&mut self, window: &WindowId, node: &NodeId) -> Option<WindowId> {
        let opened = match self.views.get_mut(window) {
            Some(OpenView {
                state: ViewState::Explorer(explorer),
                ..
            }) => explorer.open_entry(&self.fs, node),
            _ => return None,
        };
        match opened {
            Opened::File(id) => self.open_node_window(&id),
            _ => None,
        }
    }

    pub fn editor_edit(&mut self, window: &WindowId, text: &str) {
        if let Some(OpenView {
            state: ViewState::Editor(editor),
            ..
        }) = self.views.get_mut(window)
        {
            editor.edit(text);
        }
    }

    pub fn editor_save(&mut self, window: &WindowId) {
        if let Some(OpenView {
            state: ViewState::Editor(editor),
            ..
        }) = self.views.get_mut(window)
        {
            editor.save(&mut self.fs);
        }
    }

    // -- window frame gestures --------------------------------------------

    pub fn begin_window_drag(&mut self, id: &WindowId, pointer: Position) -> bool {
        self.views
            .get_mut(id)
            .map(|view| view.frame.begin_drag(pointer))
            .unwrap_or(false)
    }

    pub fn drag_window_to(&mut self, id: &WindowId, pointer: Position) {
        if let Some(view) = self.views.get_mut(id) {
            view.frame.drag_to(pointer);
        }
    }

    pub fn begin_window_resize(&mut self, id: &WindowId) -> bool {
        self.views
            .get_mut(id)
            .map(|view| view.frame.begin_resize())
            .unwrap_or(false)
    }

    pub fn resize_window_to(&mut self, id: &WindowId, pointer: Position) {
        let min = self.config.window.min_size;
        if let Some(view) = self.views.get_mut(id) {
            view.frame.resize_to(pointer, min);
        }
    }

    pub fn release_window(&mut self, id: &WindowId) {
        if let Some(view) = self.views.get_mut(id) {
            view.frame.release();
        }
    }

    pub fn toggle_maximized(&mut self, id: &WindowId) {
        if let Some(view) = self.views.get_mut(id) {
            view.frame.toggle_maximized();
        }
    }

    // -- desktop icon gestures and layout ---------------------------------

    pub fn begin_icon_drag(&mut self, id: &NodeId, pointer: Position) -> bool {
        if self.icon_drag.is_some() {
            return false;
        }
        let origin = match self.fs.node(id) {
            Some(node) => node.metadata.position.unwrap_or(Position::new(0.0, 0.0)),
            None => return false,
        };
        let mut gesture = Gesture::Idle;
        gesture.begin_drag(pointer, origin);
        self.icon_drag = Some(IconDrag {
            node: id.clone(),
            gesture,
        });
        true
    }

    /// Where the dragged icon would sit for this pointer position, clamped
    /// to the surface. Nothing is committed until the drop.
    pub fn icon_drag_position(&self, pointer: Position) -> Option<Position> {
        let drag = self.icon_drag.as_ref()?;
        let target = drag.gesture.drag_target(pointer)?;
        Some(self.clamp_to_surface(target))
    }

    /// Drop the dragged icon: commit the clamped position and (re)parent
    /// the node onto the desktop.
    #[instrument(name = "desktop.drop_icon", level = "info", skip(self, pointer))]
    pub fn drop_icon(&mut self, pointer: Position) {
        let position = self.icon_drag_position(pointer);
        if let (Some(drag), Some(position)) = (self.icon_drag.take(), position) {
            self.fs.move_node(&drag.node, DESKTOP_PATH, Some(position));
        }
    }

    pub fn cancel_icon_drag(&mut self) {
        self.icon_drag = None;
    }

    /// Context-menu create on the desktop surface, at a clamped position.
    pub fn create_at(
        &mut self,
        name: &str,
        kind: FileType,
        position: Position,
    ) -> Option<NodeId> {
        if name.trim().is_empty() {
            return None;
        }
        let position = self.clamp_to_surface(position);
        self.fs
            .create_node(
                name,
                kind,
                DESKTOP_PATH,
                Some(MetadataUpdate::position(position)),
            )
            .map(|node| node.id.clone())
    }

    /// Re-grid every desktop icon, row-major in listing order.
    #[instrument(name = "desktop.cleanup", level = "info", skip(self))]
    pub fn cleanup(&mut self) {
        let cell = self.config.desktop.icon_cell;
        let margin = self.config.desktop.margin;
        let cols = (((self.config.desktop.surface.width - margin) / cell) as usize).max(1);
        let ids: Vec<NodeId> = self
            .fs
            .desktop_nodes()
            .iter()
            .map(|node| node.id.clone())
            .collect();
        for (i, id) in ids.iter().enumerate() {
            let row = i / cols;
            let col = i % cols;
            self.fs.update_node_metadata(
                id,
                &MetadataUpdate::position(Position::new(
                    margin + col as f64 * cell,
                    margin + row as f64 * cell,
                )),
            );
        }
    }

    fn clamp_to_surface(&self, position: Position) -> Position {
        let max_x = (self.config.desktop.surface.width - self.config.desktop.icon_cell).max(0.0);
        let max_y = (self.config.desktop.surface.height - self.config.desktop.icon_cell).max(0.0);
        Position::new(position.x.clamp(0.0, max_x), position.y.clamp(0.0, max_y))
    }

    // -- taskbar -----------------------------------------------------------

    /// Taskbar buttons, one per open window in insertion order.
    pub fn taskbar(&self) -> Vec<TaskbarEntry> {
        self.windows
            .windows()
            .iter()
            .map(|window| TaskbarEntry {
                window: window.id.clone(),
                title: window.title.clone(),
                icon: window.icon.unwrap_or(WindowIcon::File),
                is_minimized: window.is_minimized,
                is_focused: self.windows.is_focused(&window.id),
            })
            .collect()
    }

    /// Click a taskbar button: restore if minimized, then focus.
    pub fn activate_taskbar(&mut self, id: &WindowId) {
        let minimized = self
            .windows
            .window(id)
            .map(|window| window.is_minimized)
            .unwrap_or(false);
        if minimized {
            self.windows.minimize_window(id);
        }
        self.windows.focus_window(id);
    }
}
