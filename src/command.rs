use std::fmt;

/// Field value meaning "stop / neutral", also used as the manual-mode sentinel.
pub const STOP_VALUE: i32 = -1;

/// Field value signalling "switch to automatic mode" when present in all three fields.
pub const AUTOMATIC_VALUE: i32 = 99;

/// One outbound message for the robot.
///
/// On the wire this is the plaintext `"A <speed> C <turn> D <frequency> "`,
/// single spaces between tokens and a trailing space, sent in one write.
/// The robot splits on spaces and reads the values positionally after the
/// `A`/`C`/`D` tags. There is no framing and no checksum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Command {
    pub speed: i32,
    pub turn: i32,
    pub frequency: i32,
}

impl Command {
    pub fn new(speed: i32, turn: i32, frequency: i32) -> Self {
        Self {
            speed,
            turn,
            frequency,
        }
    }

    /// Stop/neutral sentinel, all fields -1.
    pub fn stop() -> Self {
        Self::new(STOP_VALUE, STOP_VALUE, STOP_VALUE)
    }

    /// Automatic-mode sentinel, all fields 99.
    pub fn automatic() -> Self {
        Self::new(AUTOMATIC_VALUE, AUTOMATIC_VALUE, AUTOMATIC_VALUE)
    }

    pub fn format(&self) -> String {
        format!("A {} C {} D {} ", self.speed, self.turn, self.frequency)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format())
    }
}

/// Control-source selector. Exactly one of the two is active at any instant;
/// switching is announced to the robot in-band with a sentinel command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Manual,
    Automatic,
}

impl Mode {
    /// The command announcing a switch to this mode.
    pub fn sentinel(&self) -> Command {
        match self {
            Mode::Manual => Command::stop(),
            Mode::Automatic => Command::automatic(),
        }
    }

    pub fn toggled(&self) -> Mode {
        match self {
            Mode::Manual => Mode::Automatic,
            Mode::Automatic => Mode::Manual,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Parses the way the robot firmware does: split on spaces, match the
    // tags, read the values positionally.
    fn peer_parse(text: &str) -> (i32, i32, i32) {
        let tokens: Vec<&str> = text.split(' ').collect();
        assert_eq!(tokens[0], "A");
        assert_eq!(tokens[2], "C");
        assert_eq!(tokens[4], "D");
        assert_eq!(tokens[6], "");
        (
            tokens[1].parse().unwrap(),
            tokens[3].parse().unwrap(),
            tokens[5].parse().unwrap(),
        )
    }

    #[test]
    fn format_is_the_exact_wire_string() {
        assert_eq!(Command::new(960, 0, 50000).format(), "A 960 C 0 D 50000 ");
        assert_eq!(Command::new(0, 0, 0).format(), "A 0 C 0 D 0 ");
        assert_eq!(Command::new(-1, -1, -1).format(), "A -1 C -1 D -1 ");
    }

    #[test]
    fn display_matches_format() {
        let command = Command::new(12, -34, 56);
        assert_eq!(command.to_string(), command.format());
    }

    #[test]
    fn peer_recovers_the_values() {
        for &(a, c, d) in &[(960, 0, 50000), (0, -500, 1), (-1, -1, -1), (99, 99, 99)] {
            assert_eq!(peer_parse(&Command::new(a, c, d).format()), (a, c, d));
        }
    }

    #[test]
    fn sentinels() {
        assert_eq!(Command::stop(), Command::new(-1, -1, -1));
        assert_eq!(Command::automatic(), Command::new(99, 99, 99));
        assert_eq!(Mode::Automatic.sentinel(), Command::automatic());
        assert_eq!(Mode::Manual.sentinel(), Command::stop());
    }

    #[test]
    fn mode_toggles_between_the_two_variants() {
        assert_eq!(Mode::Manual.toggled(), Mode::Automatic);
        assert_eq!(Mode::Automatic.toggled(), Mode::Manual);
    }
}
