use std::collections::HashSet;

use gilrs::{Axis, Button, EventType, Gilrs};
use winit::event::{ElementState, VirtualKeyCode};

use crate::game::FrameInput;

const STICK_THRESHOLD: f32 = 0.5;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Input {
    Key(VirtualKeyCode),
    Button(Button),
}

const TURN_LEFT: [Input; 4] = [
    Input::Key(VirtualKeyCode::Key1),
    Input::Key(VirtualKeyCode::Left),
    Input::Key(VirtualKeyCode::A),
    Input::Button(Button::DPadLeft),
];

const TURN_RIGHT: [Input; 4] = [
    Input::Key(VirtualKeyCode::Key2),
    Input::Key(VirtualKeyCode::Right),
    Input::Key(VirtualKeyCode::D),
    Input::Button(Button::DPadRight),
];

/// Keyboard and gamepad state for the current frame.
#[derive(Debug, Default)]
pub struct InputCollection {
    held: HashSet<Input>,
    just_pressed: HashSet<Input>,
    stick_x: f32,
}

impl InputCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key(&mut self, key: VirtualKeyCode, state: ElementState) {
        self.set(Input::Key(key), state == ElementState::Pressed);
    }

    pub fn button(&mut self, button: Button, pressed: bool) {
        self.set(Input::Button(button), pressed);
    }

    fn set(&mut self, input: Input, pressed: bool) {
        if pressed {
            // Key repeat delivers further presses while held.
            if self.held.insert(input) {
                self.just_pressed.insert(input);
            }
        } else {
            self.held.remove(&input);
        }
    }

    pub fn poll_gamepads(&mut self, gilrs: &mut Gilrs) {
        while let Some(event) = gilrs.next_event() {
            match event.event {
                EventType::ButtonPressed(button, _) => self.button(button, true),
                EventType::ButtonReleased(button, _) => self.button(button, false),
                EventType::AxisChanged(Axis::LeftStickX, value, _) => self.stick_x = value,
                EventType::Disconnected => {
                    tracing::info!(id = ?event.id, "gamepad disconnected");
                    self.held.retain(|i| matches!(i, Input::Key(_)));
                    self.stick_x = 0.0;
                }
                EventType::Connected => {
                    tracing::info!(id = ?event.id, "gamepad connected");
                }
                _ => (),
            }
        }
    }

    pub fn is_pressed(&self, input: Input) -> bool {
        self.held.contains(&input)
    }

    pub fn was_just_pressed(&self, input: Input) -> bool {
        self.just_pressed.contains(&input)
    }

    pub fn frame_input(&self) -> FrameInput {
        FrameInput {
            turn_left: TURN_LEFT.iter().any(|&i| self.is_pressed(i))
                || self.stick_x < -STICK_THRESHOLD,
            turn_right: TURN_RIGHT.iter().any(|&i| self.is_pressed(i))
                || self.stick_x > STICK_THRESHOLD,
        }
    }

    /// Clears edge-triggered state, called once every frame has been handled.
    pub fn end_frame(&mut self) {
        self.just_pressed.clear();
    }
}
