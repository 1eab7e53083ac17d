use std::fmt;

use serde::{Deserialize, Serialize};

use crate::led::brightness;
use crate::led::effect::NO_ANIMATION;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rgb {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl Rgb {
    /// All channels dark. Together with `NoAnimation` this is what "off" means to the daemon.
    pub const OFF: Rgb = Rgb {
        red: 0,
        green: 0,
        blue: 0,
    };

    /// Color sent on turn-on when the caller did not ask for one.
    pub const DEFAULT_ON: Rgb = Rgb {
        red: 255,
        green: 0,
        blue: 0,
    };

    pub fn new(red: u8, green: u8, blue: u8) -> Self {
        Rgb { red, green, blue }
    }

    pub fn is_black(&self) -> bool {
        *self == Rgb::OFF
    }
}

impl From<(u8, u8, u8)> for Rgb {
    fn from(tuple: (u8, u8, u8)) -> Self {
        Rgb {
            red: tuple.0,
            green: tuple.1,
            blue: tuple.2,
        }
    }
}

impl From<Rgb> for (u8, u8, u8) {
    fn from(rgb: Rgb) -> Self {
        (rgb.red, rgb.green, rgb.blue)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.red, self.green, self.blue)
    }
}

/// State of a single LED as reported by the daemon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedState {
    pub color: Rgb,
    /// Daemon brightness level, 1..=5.
    pub bright: u8,
    /// Animation speed. Reported by the daemon, never read or changed here, so a
    /// missing or `null` value is accepted.
    #[serde(default)]
    pub speed: Option<i64>,
    pub style: String,
}

impl LedState {
    /// The daemon has no power flag. A LED is off when it shows no animation and no color.
    pub fn is_off(&self) -> bool {
        self.style == NO_ANIMATION && self.color.is_black()
    }

    pub fn is_on(&self) -> bool {
        !self.is_off()
    }

    /// Brightness on the host scale.
    pub fn brightness(&self) -> u8 {
        brightness::to_host(self.bright)
    }
}
