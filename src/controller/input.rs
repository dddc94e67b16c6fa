//! Platform-agnostic input handling

use std::collections::HashSet;

use winit::keyboard::KeyCode;

use crate::model::camera::Movement;

/// Input events after translation from the windowing layer
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    KeyDown(KeyCode),
    KeyUp(KeyCode),
    /// Absolute cursor position in window pixels
    CursorMoved { x: f64, y: f64 },
    /// Relative pointer motion from a locked cursor
    MouseMotion { dx: f64, dy: f64 },
    FocusLost,
}

/// Turns absolute cursor positions into look offsets.
///
/// The first sample after creation or [`MouseTracker::reset`] only sets the
/// reference point and yields `(0, 0)`.
#[derive(Debug, Clone)]
pub struct MouseTracker {
    last: (f64, f64),
    first_sample: bool,
}

impl MouseTracker {
    pub fn new(initial: (f64, f64)) -> Self {
        Self { last: initial, first_sample: true }
    }

    /// Offset from the previous sample, y reversed so that moving up is positive
    pub fn delta(&mut self, x: f64, y: f64) -> (f32, f32) {
        if self.first_sample {
            self.last = (x, y);
            self.first_sample = false;
        }
        let dx = x - self.last.0;
        let dy = self.last.1 - y;
        self.last = (x, y);
        (dx as f32, dy as f32)
    }

    pub fn reset(&mut self) {
        self.first_sample = true;
    }
}

#[derive(Debug, Clone)]
pub struct KeyBindings {
    pub forward: KeyCode,
    pub backward: KeyCode,
    pub left: KeyCode,
    pub right: KeyCode,
    pub close: KeyCode,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            forward: KeyCode::KeyW,
            backward: KeyCode::KeyS,
            left: KeyCode::KeyA,
            right: KeyCode::KeyD,
            close: KeyCode::Escape,
        }
    }
}

impl KeyBindings {
    pub fn movement(&self, key: KeyCode) -> Option<Movement> {
        match key {
            k if k == self.forward => Some(Movement::Forward),
            k if k == self.backward => Some(Movement::Backward),
            k if k == self.left => Some(Movement::Left),
            k if k == self.right => Some(Movement::Right),
            _ => None,
        }
    }
}

/// Accumulated input between two frames
pub struct InputState {
    held: HashSet<Movement>,
    look_delta: (f32, f32),
    mouse: MouseTracker,
    bindings: KeyBindings,
    close_requested: bool,
}

impl InputState {
    /// `cursor_origin` is the reference used before the first cursor sample
    /// (the window centre).
    pub fn new(cursor_origin: (f64, f64)) -> Self {
        Self {
            held: HashSet::new(),
            look_delta: (0.0, 0.0),
            mouse: MouseTracker::new(cursor_origin),
            bindings: KeyBindings::default(),
            close_requested: false,
        }
    }

    pub fn process_event(&mut self, event: &InputEvent) {
        match *event {
            InputEvent::KeyDown(key) => {
                if key == self.bindings.close {
                    self.close_requested = true;
                } else if let Some(movement) = self.bindings.movement(key) {
                    self.held.insert(movement);
                }
            }
            InputEvent::KeyUp(key) => {
                if let Some(movement) = self.bindings.movement(key) {
                    self.held.remove(&movement);
                }
            }
            InputEvent::CursorMoved { x, y } => {
                let (dx, dy) = self.mouse.delta(x, y);
                self.add_look(dx, dy);
            }
            InputEvent::MouseMotion { dx, dy } => {
                self.add_look(dx as f32, -dy as f32);
            }
            InputEvent::FocusLost => {
                self.held.clear();
                self.mouse.reset();
            }
        }
    }

    fn add_look(&mut self, dx: f32, dy: f32) {
        self.look_delta.0 += dx;
        self.look_delta.1 += dy;
    }

    pub fn held(&self) -> &HashSet<Movement> {
        &self.held
    }

    pub fn consume_look(&mut self) -> (f32, f32) {
        std::mem::take(&mut self.look_delta)
    }

    pub fn close_requested(&self) -> bool {
        self.close_requested
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_sample_at_reference_does_not_jump() {
        let mut tracker = MouseTracker::new((400.0, 300.0));
        assert_eq!(tracker.delta(400.0, 300.0), (0.0, 0.0));
    }

    #[test]
    fn first_sample_anywhere_does_not_jump() {
        let mut tracker = MouseTracker::new((400.0, 300.0));
        assert_eq!(tracker.delta(10.0, 590.0), (0.0, 0.0));
        assert_eq!(tracker.delta(15.0, 580.0), (5.0, 10.0));
    }

    #[test]
    fn y_is_reversed() {
        let mut tracker = MouseTracker::new((0.0, 0.0));
        tracker.delta(100.0, 100.0);
        assert_eq!(tracker.delta(90.0, 120.0), (-10.0, -20.0));
    }

    #[test]
    fn reset_rearms_first_sample() {
        let mut tracker = MouseTracker::new((0.0, 0.0));
        tracker.delta(0.0, 0.0);
        tracker.reset();
        assert_eq!(tracker.delta(500.0, 500.0), (0.0, 0.0));
    }

    #[test]
    fn keys_track_held_movements() {
        let mut input = InputState::new((400.0, 300.0));
        input.process_event(&InputEvent::KeyDown(KeyCode::KeyW));
        input.process_event(&InputEvent::KeyDown(KeyCode::KeyD));
        input.process_event(&InputEvent::KeyDown(KeyCode::KeyQ));
        assert_eq!(input.held().len(), 2);
        assert!(input.held().contains(&Movement::Forward));
        assert!(input.held().contains(&Movement::Right));

        input.process_event(&InputEvent::KeyUp(KeyCode::KeyW));
        assert_eq!(input.held().len(), 1);
    }

    #[test]
    fn escape_requests_close() {
        let mut input = InputState::new((0.0, 0.0));
        assert!(!input.close_requested());
        input.process_event(&InputEvent::KeyDown(KeyCode::Escape));
        assert!(input.close_requested());
    }

    #[test]
    fn look_accumulates_until_consumed() {
        let mut input = InputState::new((400.0, 300.0));
        input.process_event(&InputEvent::CursorMoved { x: 400.0, y: 300.0 });
        input.process_event(&InputEvent::CursorMoved { x: 410.0, y: 295.0 });
        input.process_event(&InputEvent::CursorMoved { x: 420.0, y: 290.0 });
        assert_eq!(input.consume_look(), (20.0, 10.0));
        assert_eq!(input.consume_look(), (0.0, 0.0));
    }

    #[test]
    fn raw_motion_is_relative_with_y_reversed() {
        let mut input = InputState::new((0.0, 0.0));
        input.process_event(&InputEvent::MouseMotion { dx: 3.0, dy: 4.0 });
        assert_eq!(input.consume_look(), (3.0, -4.0));
    }

    #[test]
    fn focus_loss_releases_keys() {
        let mut input = InputState::new((0.0, 0.0));
        input.process_event(&InputEvent::KeyDown(KeyCode::KeyA));
        input.process_event(&InputEvent::FocusLost);
        assert!(input.held().is_empty());
    }

    #[test]
    fn custom_bindings() {
        let bindings = KeyBindings { forward: KeyCode::ArrowUp, ..KeyBindings::default() };
        assert_eq!(bindings.movement(KeyCode::ArrowUp), Some(Movement::Forward));
        assert_eq!(bindings.movement(KeyCode::KeyW), None);
    }
}
