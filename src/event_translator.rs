use gilrs::{Axis, Button, EventType};

/// A gamepad input reduced to what the panel cares about.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PadEvent {
    ButtonPressed(Button),
    ButtonReleased(Button),
    AxisChanged(Axis, f64),
    ControllerLost,
}

impl PadEvent {
    pub fn from_gilrs(event: &EventType) -> Option<PadEvent> {
        match event {
            EventType::ButtonPressed(button, _) => Some(PadEvent::ButtonPressed(*button)),
            EventType::ButtonReleased(button, _) => Some(PadEvent::ButtonReleased(*button)),
            EventType::AxisChanged(axis, value, _) => {
                Some(PadEvent::AxisChanged(*axis, f64::from(*value)))
            }
            EventType::Disconnected => Some(PadEvent::ControllerLost),
            _ => None,
        }
    }
}

/// What a gamepad input means for the panel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PanelAction {
    SetSpeed(f64),
    SetTurn(f64),
    SetFrequency(f64),
    Stop,
    ToggleMode,
    Disconnect,
    Shutdown,
}

pub struct EventTranslator {
    menu_left_pressed: bool,
    menu_right_pressed: bool,
}

impl EventTranslator {
    pub fn new() -> Self {
        Self {
            menu_left_pressed: false,
            menu_right_pressed: false,
        }
    }

    pub fn translate(&mut self, event: &PadEvent) -> Vec<PanelAction> {
        match event {
            PadEvent::ButtonPressed(Button::Select) => {
                self.menu_left_pressed = true;
                return self.check_shutdown();
            }
            PadEvent::ButtonReleased(Button::Select) => {
                self.menu_left_pressed = false;
            }
            PadEvent::ButtonPressed(Button::Start) => {
                self.menu_right_pressed = true;
                return self.check_shutdown();
            }
            PadEvent::ButtonReleased(Button::Start) => {
                self.menu_right_pressed = false;
            }
            PadEvent::ButtonPressed(Button::South) => {
                return vec![PanelAction::Stop];
            }
            PadEvent::ButtonPressed(Button::North) => {
                return vec![PanelAction::ToggleMode];
            }
            PadEvent::ButtonPressed(Button::East) => {
                return vec![PanelAction::Disconnect];
            }
            PadEvent::AxisChanged(Axis::LeftStickY, value) => {
                // stick forward drives forward, pulling back is not reverse
                return vec![PanelAction::SetSpeed(value.max(0.0))];
            }
            PadEvent::AxisChanged(Axis::RightStickX, value) => {
                return vec![PanelAction::SetTurn(*value)];
            }
            PadEvent::AxisChanged(Axis::RightZ, value) => {
                return vec![PanelAction::SetFrequency((value + 1.0) / 2.0)];
            }
            PadEvent::ControllerLost => {
                return vec![PanelAction::Stop];
            }
            _ => {}
        }
        vec![]
    }

    fn check_shutdown(&self) -> Vec<PanelAction> {
        if self.menu_left_pressed && self.menu_right_pressed {
            vec![PanelAction::Shutdown]
        } else {
            vec![]
        }
    }
}
