//! Winit input bridge for the overlay.
//!
//! Feeds window events into ImGui IO so widgets see mouse, wheel, keyboard,
//! and modifier state. Positions and sizes use logical coordinates; the
//! framebuffer scale carries the window's scale factor to the renderer.

use imgui::{Io, Key, MouseButton};
use winit::dpi::PhysicalPosition;
use winit::event::{ElementState, MouseScrollDelta, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

/// Pixels of wheel travel treated as one scroll line.
const WHEEL_PIXELS_PER_LINE: f32 = 50.0;

/// Translates winit window events into ImGui IO updates.
pub struct InputBridge {
    scale_factor: f64,
}

impl InputBridge {
    /// Create a bridge for a window with the given scale factor.
    pub fn new(scale_factor: f64) -> Self {
        Self { scale_factor }
    }

    /// The window scale factor currently in effect.
    pub fn scale_factor(&self) -> f64 {
        self.scale_factor
    }

    /// Apply a window event to ImGui IO.
    pub fn handle_event(&mut self, io: &mut Io, event: &WindowEvent) {
        match event {
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                self.scale_factor = *scale_factor;
                let scale = *scale_factor as f32;
                io.display_framebuffer_scale = [scale, scale];
            }
            WindowEvent::Resized(size) => {
                let logical = size.to_logical::<f32>(self.scale_factor);
                io.display_size = [logical.width, logical.height];
            }
            WindowEvent::ModifiersChanged(modifiers) => {
                let state = modifiers.state();
                io.key_shift = state.shift_key();
                io.key_ctrl = state.control_key();
                io.key_alt = state.alt_key();
                io.key_super = state.super_key();
            }
            WindowEvent::KeyboardInput { event, .. } => {
                let pressed = event.state == ElementState::Pressed;
                if let PhysicalKey::Code(code) = event.physical_key {
                    if let Some(key) = map_key(code) {
                        io.add_key_event(key, pressed);
                    }
                }
                if pressed {
                    if let Some(text) = &event.text {
                        for character in text.chars() {
                            io.add_input_character(character);
                        }
                    }
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                let logical = position.to_logical::<f32>(self.scale_factor);
                io.add_mouse_pos_event([logical.x, logical.y]);
            }
            WindowEvent::CursorLeft { .. } => {
                io.add_mouse_pos_event([-f32::MAX, -f32::MAX]);
            }
            WindowEvent::MouseInput { state, button, .. } => {
                if let Some(button) = map_mouse_button(*button) {
                    io.add_mouse_button_event(button, *state == ElementState::Pressed);
                }
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let wheel = match delta {
                    MouseScrollDelta::LineDelta(h, v) => [*h, *v],
                    MouseScrollDelta::PixelDelta(PhysicalPosition { x, y }) => [
                        *x as f32 / WHEEL_PIXELS_PER_LINE,
                        *y as f32 / WHEEL_PIXELS_PER_LINE,
                    ],
                };
                io.add_mouse_wheel_event(wheel);
            }
            _ => {}
        }
    }
}

/// Map a winit mouse button to the ImGui equivalent.
pub fn map_mouse_button(button: winit::event::MouseButton) -> Option<MouseButton> {
    match button {
        winit::event::MouseButton::Left => Some(MouseButton::Left),
        winit::event::MouseButton::Right => Some(MouseButton::Right),
        winit::event::MouseButton::Middle => Some(MouseButton::Middle),
        winit::event::MouseButton::Back => Some(MouseButton::Extra1),
        winit::event::MouseButton::Forward => Some(MouseButton::Extra2),
        winit::event::MouseButton::Other(_) => None,
    }
}

/// Map a winit key code to the ImGui equivalent.
pub fn map_key(code: KeyCode) -> Option<Key> {
    Some(match code {
        KeyCode::Escape => Key::Escape,
        KeyCode::Tab => Key::Tab,
        KeyCode::Enter => Key::Enter,
        KeyCode::Space => Key::Space,
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Delete => Key::Delete,
        KeyCode::Insert => Key::Insert,
        KeyCode::Home => Key::Home,
        KeyCode::End => Key::End,
        KeyCode::PageUp => Key::PageUp,
        KeyCode::PageDown => Key::PageDown,
        KeyCode::ArrowLeft => Key::LeftArrow,
        KeyCode::ArrowRight => Key::RightArrow,
        KeyCode::ArrowUp => Key::UpArrow,
        KeyCode::ArrowDown => Key::DownArrow,
        KeyCode::ShiftLeft => Key::LeftShift,
        KeyCode::ShiftRight => Key::RightShift,
        KeyCode::ControlLeft => Key::LeftCtrl,
        KeyCode::ControlRight => Key::RightCtrl,
        KeyCode::AltLeft => Key::LeftAlt,
        KeyCode::AltRight => Key::RightAlt,
        KeyCode::SuperLeft => Key::LeftSuper,
        KeyCode::SuperRight => Key::RightSuper,
        KeyCode::Minus => Key::Minus,
        KeyCode::Equal => Key::Equal,
        KeyCode::BracketLeft => Key::LeftBracket,
        KeyCode::BracketRight => Key::RightBracket,
        KeyCode::Backslash => Key::Backslash,
        KeyCode::Semicolon => Key::Semicolon,
        KeyCode::Quote => Key::Apostrophe,
        KeyCode::Comma => Key::Comma,
        KeyCode::Period => Key::Period,
        KeyCode::Slash => Key::Slash,
        KeyCode::Backquote => Key::GraveAccent,
        KeyCode::Digit0 => Key::Alpha0,
        KeyCode::Digit1 => Key::Alpha1,
        KeyCode::Digit2 => Key::Alpha2,
        KeyCode::Digit3 => Key::Alpha3,
        KeyCode::Digit4 => Key::Alpha4,
        KeyCode::Digit5 => Key::Alpha5,
        KeyCode::Digit6 => Key::Alpha6,
        KeyCode::Digit7 => Key::Alpha7,
        KeyCode::Digit8 => Key::Alpha8,
        KeyCode::Digit9 => Key::Alpha9,
        KeyCode::KeyA => Key::A,
        KeyCode::KeyB => Key::B,
        KeyCode::KeyC => Key::C,
        KeyCode::KeyD => Key::D,
        KeyCode::KeyE => Key::E,
        KeyCode::KeyF => Key::F,
        KeyCode::KeyG => Key::G,
        KeyCode::KeyH => Key::H,
        KeyCode::KeyI => Key::I,
        KeyCode::KeyJ => Key::J,
        KeyCode::KeyK => Key::K,
        KeyCode::KeyL => Key::L,
        KeyCode::KeyM => Key::M,
        KeyCode::KeyN => Key::N,
        KeyCode::KeyO => Key::O,
        KeyCode::KeyP => Key::P,
        KeyCode::KeyQ => Key::Q,
        KeyCode::KeyR => Key::R,
        KeyCode::KeyS => Key::S,
        KeyCode::KeyT => Key::T,
        KeyCode::KeyU => Key::U,
        KeyCode::KeyV => Key::V,
        KeyCode::KeyW => Key::W,
        KeyCode::KeyX => Key::X,
        KeyCode::KeyY => Key::Y,
        KeyCode::KeyZ => Key::Z,
        KeyCode::F1 => Key::F1,
        KeyCode::F2 => Key::F2,
        KeyCode::F3 => Key::F3,
        KeyCode::F4 => Key::F4,
        KeyCode::F5 => Key::F5,
        KeyCode::F6 => Key::F6,
        KeyCode::F7 => Key::F7,
        KeyCode::F8 => Key::F8,
        KeyCode::F9 => Key::F9,
        KeyCode::F10 => Key::F10,
        KeyCode::F11 => Key::F11,
        KeyCode::F12 => Key::F12,
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_common_keys() {
        assert_eq!(map_key(KeyCode::Escape), Some(Key::Escape));
        assert_eq!(map_key(KeyCode::KeyW), Some(Key::W));
        assert_eq!(map_key(KeyCode::Digit0), Some(Key::Alpha0));
        assert_eq!(map_key(KeyCode::ArrowUp), Some(Key::UpArrow));
        assert_eq!(map_key(KeyCode::NumLock), None);
    }

    #[test]
    fn maps_mouse_buttons() {
        assert_eq!(
            map_mouse_button(winit::event::MouseButton::Left),
            Some(MouseButton::Left)
        );
        assert_eq!(
            map_mouse_button(winit::event::MouseButton::Forward),
            Some(MouseButton::Extra2)
        );
        assert_eq!(map_mouse_button(winit::event::MouseButton::Other(9)), None);
    }
}
