//! GraphQL documents understood by the daemon, and the shapes that travel with them.
//!
//! Field and argument names are matched verbatim by the daemon; do not rename them.

use serde::{Deserialize, Serialize};

use crate::led::led_state::{LedState, Rgb};

/// Every device with every LED and its full state.
pub const GET_ALL_DEVICES: &str = r#"query GetDevices {
    devices {
        name
        leds {
            name
            state {
                color { red green blue }
                bright
                speed
                style
            }
        }
    }
}"#;

/// One LED of one device, filtered by the daemon.
pub const GET_SINGLE_LED: &str = r#"query GetDevices($device_name: String!, $led_name: String!) {
    devices(filter: { names: [$device_name] }) {
        name
        leds(filter: { names: [$led_name] }) {
            name
            state {
                color { red green blue }
                bright
                speed
                style
            }
        }
    }
}"#;

/// Applies a partial state to exactly one LED.
pub const SET_STATE_FOR_SINGLE_LED: &str = r#"mutation SetStateForSingleLed($device_name: String!, $led_name: String!, $state: DeviceLedStateInput!) {
    devices(filter: { names: [$device_name] }) {
        leds(filter: { names: [$led_name] }) {
            setState(state: $state)
        }
    }
}"#;

/// The `{"query": ..., "variables": ...}` envelope posted to the endpoint.
#[derive(Debug, Serialize)]
pub struct GraphQlRequest<'a, V: Serialize> {
    pub query: &'a str,
    pub variables: V,
}

/// Serializes to `{}`.
#[derive(Debug, Serialize)]
pub struct NoVariables {}

#[derive(Debug, Serialize)]
pub struct LedVariables<'a> {
    pub device_name: &'a str,
    pub led_name: &'a str,
}

#[derive(Debug, Serialize)]
pub struct SetStateVariables<'a> {
    pub device_name: &'a str,
    pub led_name: &'a str,
    pub state: &'a LedStateInput,
}

/// `DeviceLedStateInput`: the aspects of a LED to change.
///
/// Unset fields are left out of the serialized object entirely, so the daemon keeps
/// its current value for them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LedStateInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<Rgb>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bright: Option<u8>,
}

impl LedStateInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_style(mut self, style: impl Into<String>) -> Self {
        self.style = Some(style.into());
        self
    }

    pub fn with_color(mut self, color: Rgb) -> Self {
        self.color = Some(color);
        self
    }

    /// `bright` is a daemon level, 1..=5.
    pub fn with_bright(mut self, bright: u8) -> Self {
        self.bright = Some(bright);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.style.is_none() && self.color.is_none() && self.bright.is_none()
    }
}

/// Top level of a query response. A missing or `null` `data` fails to deserialize.
#[derive(Debug, Deserialize)]
pub struct GraphQlResponse<T> {
    pub data: T,
}

#[derive(Debug, Deserialize)]
pub struct DevicesData {
    #[serde(default)]
    pub devices: Vec<Device>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Device {
    #[serde(default = "unknown_device_name")]
    pub name: String,
    #[serde(default)]
    pub leds: Vec<Led>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Led {
    pub name: String,
    pub state: LedState,
}

fn unknown_device_name() -> String {
    "Unknown Name".to_string()
}
