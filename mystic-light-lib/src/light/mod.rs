//! The light-entity surface a home-automation host drives.
//!
//! See [home-assistant light](https://developers.home-assistant.io/docs/core/entity/light/)
//! documentation for the model this follows.

use std::collections::BTreeSet;
use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::led::led_state::Rgb;

pub mod mystic_light;

pub use self::mystic_light::MysticLight;

/// Color modes for lights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ColorMode {
    /// The light can be dimmed.
    #[serde(rename = "brightness")]
    Brightness,

    /// The light can be dimmed and its color set from red, green and blue.
    #[serde(rename = "rgb")]
    Rgb,
}

impl fmt::Display for ColorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mode_str = match self {
            ColorMode::Brightness => "brightness",
            ColorMode::Rgb => "rgb",
        };
        write!(f, "{}", mode_str)
    }
}

/// Optional capabilities beyond the color modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum LightEntityFeature {
    #[serde(rename = "effect")]
    Effect,
}

/// What the host asks for when turning a light on. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TurnOnParams {
    /// Host scale, 0..=255.
    pub brightness: Option<u8>,
    pub rgb_color: Option<Rgb>,
    pub effect: Option<String>,
}

impl TurnOnParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn brightness(mut self, brightness: u8) -> Self {
        self.brightness = Some(brightness);
        self
    }

    pub fn rgb_color(mut self, rgb: Rgb) -> Self {
        self.rgb_color = Some(rgb);
        self
    }

    pub fn effect(mut self, effect: impl Into<String>) -> Self {
        self.effect = Some(effect.into());
        self
    }
}

/// A light as seen by the host platform.
///
/// Accessors only read cached state. `update` is the one method that fetches state;
/// `turn_on` and `turn_off` report whether the device accepted the command.
#[async_trait]
pub trait LightEntity: Send + Sync {
    fn name(&self) -> &str;
    fn unique_id(&self) -> &str;
    fn supported_color_modes(&self) -> BTreeSet<ColorMode>;
    fn color_mode(&self) -> ColorMode;
    fn supported_features(&self) -> BTreeSet<LightEntityFeature>;

    fn is_on(&self) -> Option<bool>;
    fn brightness(&self) -> Option<u8>;
    fn rgb_color(&self) -> Option<Rgb>;
    fn effect(&self) -> Option<&str>;
    fn effect_list(&self) -> &[&'static str];

    async fn turn_on(&self, params: TurnOnParams) -> bool;
    async fn turn_off(&self) -> bool;
    async fn update(&mut self);
}
