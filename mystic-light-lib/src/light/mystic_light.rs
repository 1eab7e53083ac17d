use std::collections::BTreeSet;

use async_trait::async_trait;
use log::{debug, error, warn};

use crate::control_interface::graphql::LedStateInput;
use crate::control_interface::DaemonClient;
use crate::led::brightness;
use crate::led::effect::{is_known_effect, EFFECT_LIST, NO_ANIMATION};
use crate::led::led_state::{LedState, Rgb};
use crate::light::{ColorMode, LightEntity, LightEntityFeature, TurnOnParams};
use crate::util::discovery::DiscoveredLed;

/// One LED of one device, presented as a light.
///
/// The entity keeps the last state the daemon reported and derives everything the host
/// reads from it. That state only changes through [`LightEntity::update`]; commands do
/// not touch it.
#[derive(Debug, Clone)]
pub struct MysticLight {
    client: DaemonClient,
    device_name: String,
    led_name: String,
    name: String,
    unique_id: String,
    log_target: String,
    state: LedState,
}

impl MysticLight {
    pub fn new(client: &DaemonClient, device_name: &str, led_name: &str, state: LedState) -> Self {
        let unique_id = MysticLight::unique_id_for(device_name, led_name);
        let log_target = format!("mystic_light::light::{}", unique_id);
        debug!(target: log_target.as_str(), "New light {}:{} with {:?}", device_name, led_name, state);
        MysticLight {
            client: client.clone().with_log_target(log_target.clone()),
            device_name: device_name.to_string(),
            led_name: led_name.to_string(),
            name: format!("{} {}", device_name, led_name),
            unique_id,
            log_target,
            state,
        }
    }

    pub fn from_discovered(client: &DaemonClient, led: DiscoveredLed) -> Self {
        MysticLight::new(client, &led.device_name, &led.led_name, led.state)
    }

    /// Stable id of the entity for one LED.
    pub fn unique_id_for(device_name: &str, led_name: &str) -> String {
        format!("mystic_light_{}_{}", device_name, led_name)
    }

    pub fn host(&self) -> &str {
        self.client.host()
    }

    pub fn device_name(&self) -> &str {
        &self.device_name
    }

    pub fn led_name(&self) -> &str {
        &self.led_name
    }

    /// Last state reported by the daemon.
    pub fn state(&self) -> &LedState {
        &self.state
    }

    /// Partial state for a turn-on request.
    ///
    /// Style falls back to `NoAnimation` and color to red, so both are always present.
    /// Brightness is only sent when asked for.
    pub fn turn_on_input(params: &TurnOnParams) -> LedStateInput {
        let style = params.effect.as_deref().unwrap_or(NO_ANIMATION);
        let color = params.rgb_color.unwrap_or(Rgb::DEFAULT_ON);
        let input = LedStateInput::new().with_style(style).with_color(color);
        match params.brightness {
            Some(value) => input.with_bright(brightness::to_level(value)),
            None => input,
        }
    }

    pub fn turn_off_input() -> LedStateInput {
        LedStateInput::new()
            .with_style(NO_ANIMATION)
            .with_color(Rgb::OFF)
    }

    async fn send_state(&self, input: &LedStateInput) -> bool {
        debug!(
            target: self.log_target.as_str(),
            "Changing light status for {}:{} to {:?}",
            self.device_name,
            self.led_name,
            input
        );
        match self
            .client
            .set_led_state(&self.device_name, &self.led_name, input)
            .await
        {
            Ok(()) => true,
            Err(e) => {
                error!(target: self.log_target.as_str(), "{:#}", e);
                false
            }
        }
    }
}

#[async_trait]
impl LightEntity for MysticLight {
    fn name(&self) -> &str {
        &self.name
    }

    fn unique_id(&self) -> &str {
        &self.unique_id
    }

    fn supported_color_modes(&self) -> BTreeSet<ColorMode> {
        BTreeSet::from([ColorMode::Brightness, ColorMode::Rgb])
    }

    fn color_mode(&self) -> ColorMode {
        ColorMode::Brightness
    }

    fn supported_features(&self) -> BTreeSet<LightEntityFeature> {
        BTreeSet::from([LightEntityFeature::Effect])
    }

    fn is_on(&self) -> Option<bool> {
        Some(self.state.is_on())
    }

    fn brightness(&self) -> Option<u8> {
        Some(self.state.brightness())
    }

    fn rgb_color(&self) -> Option<Rgb> {
        Some(self.state.color)
    }

    fn effect(&self) -> Option<&str> {
        Some(self.state.style.as_str())
    }

    fn effect_list(&self) -> &[&'static str] {
        &EFFECT_LIST
    }

    async fn turn_on(&self, params: TurnOnParams) -> bool {
        if let Some(effect) = params.effect.as_deref() {
            if !is_known_effect(effect) {
                warn!(
                    target: self.log_target.as_str(),
                    "Unknown effect {:?} for {}:{}, nothing sent",
                    effect,
                    self.device_name,
                    self.led_name
                );
                return false;
            }
        }
        self.send_state(&MysticLight::turn_on_input(&params)).await
    }

    async fn turn_off(&self) -> bool {
        self.send_state(&MysticLight::turn_off_input()).await
    }

    async fn update(&mut self) {
        debug!(
            target: self.log_target.as_str(),
            "Starting state update for {}:{}",
            self.device_name,
            self.led_name
        );
        match self.client.get_led(&self.device_name, &self.led_name).await {
            Ok(Some(state)) => {
                debug!(
                    target: self.log_target.as_str(),
                    "... led {}:{} found for update: {:?}",
                    self.device_name,
                    self.led_name,
                    state
                );
                self.state = state;
            }
            Ok(None) => warn!(
                target: self.log_target.as_str(),
                "... led {}:{} missing from {}, keeping last state",
                self.device_name,
                self.led_name,
                self.client.url()
            ),
            Err(e) => error!(
                target: self.log_target.as_str(),
                "... Could not get status: {:#}",
                e
            ),
        }
    }
}
