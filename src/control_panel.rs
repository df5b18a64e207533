use crate::command::{Command, Mode};
use crate::config::Config;

/// State of the control panel: the slider values, the mode selector and the
/// enabled/disabled state of the interactive controls.
///
/// Speed and turn follow the sticks while the link is up. While no robot is
/// connected the controls count as greyed out and slider input is ignored.
pub struct ControlPanel {
    speed: i32,
    turn: i32,
    frequency: i32,
    mode: Mode,
    pending_sentinel: Option<Command>,
    link_alive: bool,

    max_speed: i32,
    max_turn: i32,
    max_frequency: i32,
}

impl ControlPanel {
    pub fn new(config: &Config) -> Self {
        Self {
            speed: 0,
            turn: 0,
            frequency: config.initial_frequency,
            mode: Mode::Manual,
            pending_sentinel: None,
            link_alive: false,
            max_speed: config.max_speed,
            max_turn: config.max_turn,
            max_frequency: config.max_frequency,
        }
    }

    /// Mirrors the link liveness onto the panel. Called every loop tick.
    pub fn set_link_alive(&mut self, alive: bool) {
        self.link_alive = alive;
    }

    /// False whenever no robot is connected.
    pub fn controls_enabled(&self) -> bool {
        self.link_alive
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Speed slider, `fraction` in 0..=1 of the configured maximum.
    pub fn set_speed(&mut self, fraction: f64) {
        if !self.controls_enabled() {
            return;
        }
        let fraction = fraction.max(0.0).min(1.0);
        self.speed = (fraction * f64::from(self.max_speed)).round() as i32;
    }

    /// Turn slider, `fraction` in -1..=1, negative is left.
    pub fn set_turn(&mut self, fraction: f64) {
        if !self.controls_enabled() {
            return;
        }
        let fraction = fraction.max(-1.0).min(1.0);
        self.turn = (fraction * f64::from(self.max_turn)).round() as i32;
    }

    /// PWM frequency slider, `fraction` in 0..=1 of the configured maximum.
    pub fn set_frequency(&mut self, fraction: f64) {
        if !self.controls_enabled() {
            return;
        }
        let fraction = fraction.max(0.0).min(1.0);
        self.frequency = (fraction * f64::from(self.max_frequency)).round() as i32;
    }

    /// Zeroes speed and turn. Always allowed.
    pub fn stop(&mut self) {
        self.speed = 0;
        self.turn = 0;
    }

    /// Selects `mode` and records its sentinel so it goes out exactly once
    /// before the next regular command. Selecting the current mode again
    /// does nothing. Entering manual mode resets the motion sliders, the
    /// sentinel already told the robot to go neutral.
    pub fn switch_mode(&mut self, mode: Mode) {
        if mode == self.mode {
            return;
        }
        self.mode = mode;
        self.pending_sentinel = Some(mode.sentinel());
        if mode == Mode::Manual {
            self.stop();
        }
    }

    pub fn toggle_mode(&mut self) {
        self.switch_mode(self.mode.toggled());
    }

    /// The one-shot mode-change sentinel, if a switch happened since the
    /// last call. Kept pending while the link is down so the robot still
    /// learns about the switch once it connects.
    pub fn take_pending_sentinel(&mut self) -> Option<Command> {
        self.pending_sentinel.take()
    }

    /// The command the panel currently describes.
    pub fn current_command(&self) -> Command {
        Command::new(self.speed, self.turn, self.frequency)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn connected_panel() -> ControlPanel {
        let mut panel = ControlPanel::new(&Config::default());
        panel.set_link_alive(true);
        panel
    }

    #[test]
    fn controls_start_disabled() {
        let panel = ControlPanel::new(&Config::default());
        assert!(!panel.controls_enabled());
    }

    #[test]
    fn sliders_are_ignored_while_disconnected() {
        let mut panel = ControlPanel::new(&Config::default());
        panel.set_speed(0.5);
        panel.set_turn(0.5);
        let frequency = panel.current_command().frequency;
        assert_eq!(panel.current_command(), Command::new(0, 0, frequency));
    }

    #[test]
    fn sliders_scale_to_the_configured_ranges() {
        let mut panel = connected_panel();
        panel.set_speed(0.96);
        panel.set_turn(0.0);
        panel.set_frequency(0.5);
        assert_eq!(panel.current_command(), Command::new(960, 0, 50000));
    }

    #[test]
    fn sliders_clamp_at_their_bounds() {
        let mut panel = connected_panel();
        panel.set_speed(2.0);
        panel.set_turn(-3.0);
        panel.set_frequency(1.5);
        assert_eq!(panel.current_command(), Command::new(1000, -500, 100_000));

        panel.set_speed(-1.0);
        assert_eq!(panel.current_command().speed, 0);
    }

    #[test]
    fn switching_mode_emits_exactly_one_sentinel() {
        let mut panel = connected_panel();
        panel.switch_mode(Mode::Automatic);
        assert_eq!(panel.take_pending_sentinel(), Some(Command::automatic()));
        assert_eq!(panel.take_pending_sentinel(), None);
    }

    #[test]
    fn switching_back_to_manual_emits_the_stop_sentinel_and_resets_motion() {
        let mut panel = connected_panel();
        panel.set_speed(0.8);
        panel.switch_mode(Mode::Automatic);
        panel.take_pending_sentinel();

        panel.switch_mode(Mode::Manual);
        assert_eq!(panel.take_pending_sentinel(), Some(Command::stop()));
        assert_eq!(panel.current_command().speed, 0);
        assert_eq!(panel.current_command().turn, 0);
    }

    #[test]
    fn selecting_the_current_mode_is_a_no_op() {
        let mut panel = connected_panel();
        panel.switch_mode(Mode::Manual);
        assert_eq!(panel.take_pending_sentinel(), None);
    }

    #[test]
    fn toggle_flips_between_modes() {
        let mut panel = connected_panel();
        panel.toggle_mode();
        assert_eq!(panel.mode(), Mode::Automatic);
        panel.toggle_mode();
        assert_eq!(panel.mode(), Mode::Manual);
    }

    #[test]
    fn sentinel_stays_pending_while_the_link_is_down() {
        let mut panel = ControlPanel::new(&Config::default());
        panel.switch_mode(Mode::Automatic);
        panel.set_link_alive(true);
        assert_eq!(panel.take_pending_sentinel(), Some(Command::automatic()));
    }

    #[test]
    fn stop_zeroes_motion_but_keeps_the_frequency() {
        let mut panel = connected_panel();
        panel.set_speed(1.0);
        panel.set_turn(1.0);
        panel.set_frequency(0.25);
        panel.stop();
        assert_eq!(panel.current_command(), Command::new(0, 0, 25000));
    }
}
