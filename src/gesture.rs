// Pointer interactions as an explicit state machine: Idle -> Dragging (or
// Resizing) -> Idle. The original attached and detached listeners for the
// lifetime of each gesture; here the states are entered and left
// deterministically and the caller feeds pointer positions in.

use serde::{Deserialize, Serialize};

use crate::fsystem::Position;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Size {
        Size { width, height }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Gesture {
    #[default]
    Idle,
    /// `grab` is the pointer offset from the dragged thing's origin, taken
    /// at begin time so the thing does not jump under the pointer.
    Dragging {
        grab: Position,
    },
    Resizing,
}

impl Gesture {
    pub fn is_idle(&self) -> bool {
        matches!(self, Gesture::Idle)
    }

    /// Begin a drag. Ignored unless idle; a second pointer cannot steal an
    /// in-flight gesture.
    pub fn begin_drag(&mut self, pointer: Position, origin: Position) -> bool {
        if !self.is_idle() {
            return false;
        }
        *self = Gesture::Dragging {
            grab: Position::new(pointer.x - origin.x, pointer.y - origin.y),
        };
        true
    }

    pub fn begin_resize(&mut self) -> bool {
        if !self.is_idle() {
            return false;
        }
        *self = Gesture::Resizing;
        true
    }

    /// The dragged thing's new origin for a pointer position, while a drag
    /// is in flight.
    pub fn drag_target(&self, pointer: Position) -> Option<Position> {
        match self {
            Gesture::Dragging { grab } => {
                Some(Position::new(pointer.x - grab.x, pointer.y - grab.y))
            }
            _ => None,
        }
    }

    pub fn is_resizing(&self) -> bool {
        matches!(self, Gesture::Resizing)
    }

    /// Release or cancel; either way the machine returns to idle.
    pub fn finish(&mut self) {
        *self = Gesture::Idle;
    }
}

/// Geometry of one window: position, size, maximized flag, and the gesture
/// currently manipulating it. Dragging and resizing are suppressed while
/// maximized.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub position: Position,
    pub size: Size,
    pub maximized: bool,
    gesture: Gesture,
}

impl Frame {
    pub fn new(position: Position, size: Size) -> Frame {
        Frame {
            position,
            size,
            maximized: false,
            gesture: Gesture::Idle,
        }
    }

    pub fn begin_drag(&mut self, pointer: Position) -> bool {
        if self.maximized {
            return false;
        }
        self.gesture.begin_drag(pointer, self.position)
    }

    pub fn drag_to(&mut self, pointer: Position) {
        if let Some(target) = self.gesture.drag_target(pointer) {
            self.position = target;
        }
    }

    pub fn begin_resize(&mut self) -> bool {
        if self.maximized {
            return false;
        }
        self.gesture.begin_resize()
    }

    /// Resize toward the pointer, anchored at the top-left corner and
    /// clamped to `min`.
    pub fn resize_to(&mut self, pointer: Position, min: Size) {
        if !self.gesture.is_resizing() {
            return;
        }
        self.size = Size::new(
            (pointer.x - self.position.x).max(min.width),
            (pointer.y - self.position.y).max(min.height),
        );
    }

    pub fn release(&mut self) {
        self.gesture.finish();
    }

    pub fn toggle_maximized(&mut self) {
        self.maximized = !self.maximized;
        // A maximize mid-gesture ends the gesture.
        self.gesture.finish();
    }

    pub fn gesture(&self) -> &Gesture {
        &self.gesture
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drag_cycle_returns_to_idle() {
        let mut gesture = Gesture::Idle;
        assert!(gesture.begin_drag(Position::new(110.0, 120.0), Position::new(100.0, 100.0)));
        assert_eq!(
            gesture.drag_target(Position::new(210.0, 220.0)),
            Some(Position::new(200.0, 200.0))
        );
        gesture.finish();
        assert!(gesture.is_idle());
    }

    #[test]
    fn a_busy_machine_rejects_new_gestures() {
        let mut gesture = Gesture::Idle;
        assert!(gesture.begin_resize());
        assert!(!gesture.begin_drag(Position::new(0.0, 0.0), Position::new(0.0, 0.0)));
        assert!(!gesture.begin_resize());
    }

    #[test]
    fn frame_drag_moves_by_pointer_delta() {
        let mut frame = Frame::new(Position::new(100.0, 100.0), Size::new(800.0, 600.0));
        assert!(frame.begin_drag(Position::new(150.0, 110.0)));
        frame.drag_to(Position::new(250.0, 160.0));
        assert_eq!(frame.position, Position::new(200.0, 150.0));
        frame.release();
        // After release further pointer positions are ignored.
        frame.drag_to(Position::new(999.0, 999.0));
        assert_eq!(frame.position, Position::new(200.0, 150.0));
    }

    #[test]
    fn frame_resize_clamps_to_minimum() {
        let mut frame = Frame::new(Position::new(100.0, 100.0), Size::new(800.0, 600.0));
        assert!(frame.begin_resize());
        frame.resize_to(Position::new(150.0, 150.0), Size::new(400.0, 300.0));
        assert_eq!(frame.size, Size::new(400.0, 300.0));
        frame.resize_to(Position::new(700.0, 600.0), Size::new(400.0, 300.0));
        assert_eq!(frame.size, Size::new(600.0, 500.0));
    }

    #[test]
    fn maximized_frames_ignore_gestures() {
        let mut frame = Frame::new(Position::new(100.0, 100.0), Size::new(800.0, 600.0));
        frame.toggle_maximized();
        assert!(!frame.begin_drag(Position::new(0.0, 0.0)));
        assert!(!frame.begin_resize());
        frame.toggle_maximized();
        assert!(frame.begin_drag(Position::new(0.0, 0.0)));
    }
}
