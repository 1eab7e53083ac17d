use std::cmp::max;

use log::{error, info};
use serde::Serialize;

use crate::control_interface::graphql::Device;
use crate::control_interface::DaemonClient;
use crate::led::led_state::LedState;
use crate::light::MysticLight;

/// Everything needed to build the light entity for one LED.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiscoveredLed {
    pub host: String,
    pub device_name: String,
    pub led_name: String,
    pub state: LedState,
}

impl DiscoveredLed {
    pub fn unique_id(&self) -> String {
        MysticLight::unique_id_for(&self.device_name, &self.led_name)
    }
}

pub struct Discovery;

impl Discovery {
    /// Lists every LED the daemon on `host` knows about.
    pub async fn find_leds(host: &str) -> Vec<DiscoveredLed> {
        Self::find_leds_with(&DaemonClient::new(host)).await
    }

    /// Like [`Discovery::find_leds`], through an existing client.
    ///
    /// All or nothing: when the daemon cannot be reached or answers with anything but a
    /// usable device list, the failure is logged and no LED is returned.
    pub async fn find_leds_with(client: &DaemonClient) -> Vec<DiscoveredLed> {
        match client.get_devices().await {
            Ok(devices) => Self::flatten(client, devices),
            Err(e) => {
                error!(target: client.log_target(), "{:#}", e);
                Vec::new()
            }
        }
    }

    fn flatten(client: &DaemonClient, devices: Vec<Device>) -> Vec<DiscoveredLed> {
        info!(target: client.log_target(), "{} Mystic Light device(s) found", devices.len());
        let mut discovered = Vec::new();
        for device in devices {
            info!(
                target: client.log_target(),
                "{} LED(s) found for Mystic Light device {}",
                device.leds.len(),
                device.name
            );
            for led in device.leds {
                discovered.push(DiscoveredLed {
                    host: client.host().to_string(),
                    device_name: device.name.clone(),
                    led_name: led.name,
                    state: led.state,
                });
            }
        }
        discovered
    }

    pub fn pretty_print_leds(leds: &[DiscoveredLed]) {
        let max_device_width = leds
            .iter()
            .map(|l| max(l.device_name.len(), "Device".len()))
            .max()
            .unwrap_or(0);
        let max_led_width = leds
            .iter()
            .map(|l| max(l.led_name.len(), "LED".len()))
            .max()
            .unwrap_or(0);
        let max_style_width = leds
            .iter()
            .map(|l| max(l.state.style.len(), "Effect".len()))
            .max()
            .unwrap_or(0);
        let max_color_width = leds
            .iter()
            .map(|l| max(l.state.color.to_string().len(), "Color".len()))
            .max()
            .unwrap_or(0);

        // Print the header with appropriate spacing
        println!(
            "{:<device_width$} {:<led_width$} {:<style_width$} {:<color_width$} {}",
            "Device",
            "LED",
            "Effect",
            "Color",
            "Brightness",
            device_width = max_device_width + 2,
            led_width = max_led_width + 2,
            style_width = max_style_width + 2,
            color_width = max_color_width + 2,
        );

        println!(
            "{:<device_width$} {:<led_width$} {:<style_width$} {:<color_width$} {}",
            "-".repeat(max_device_width),
            "-".repeat(max_led_width),
            "-".repeat(max_style_width),
            "-".repeat(max_color_width),
            "-".repeat("Brightness".len()),
            device_width = max_device_width + 2,
            led_width = max_led_width + 2,
            style_width = max_style_width + 2,
            color_width = max_color_width + 2,
        );

        for led in leds {
            println!(
                "{:<device_width$} {:<led_width$} {:<style_width$} {:<color_width$} {}",
                led.device_name,
                led.led_name,
                led.state.style,
                led.state.color.to_string(),
                led.state.brightness(),
                device_width = max_device_width + 2,
                led_width = max_led_width + 2,
                style_width = max_style_width + 2,
                color_width = max_color_width + 2,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::Arc;

    use serde_json::json;

    use super::*;
    use crate::control_interface::tests::{devices_json, led_json, FakeTransport};
    use crate::led::led_state::Rgb;

    fn client(transport: &Arc<FakeTransport>) -> DaemonClient {
        DaemonClient::with_transport("10.0.0.5", transport.clone())
    }

    #[tokio::test]
    async fn test_two_devices_yield_one_record_per_led() {
        let transport = FakeTransport::new();
        transport.respond(
            200,
            devices_json(vec![
                ("MSI_MB", vec![led_json("JRGB1", "Rainbow", (1, 2, 3), 5)]),
                (
                    "MSI_GPU",
                    vec![
                        led_json("Logo", "NoAnimation", (0, 0, 0), 1),
                        led_json("Fan", "Flame", (255, 0, 0), 3),
                        led_json("Backplate", "Meteor", (0, 0, 255), 4),
                    ],
                ),
            ]),
        );

        let leds = Discovery::find_leds_with(&client(&transport)).await;
        assert_eq!(leds.len(), 4);

        let ids: HashSet<String> = leds.iter().map(DiscoveredLed::unique_id).collect();
        let expected: HashSet<String> = [
            "mystic_light_MSI_MB_JRGB1",
            "mystic_light_MSI_GPU_Logo",
            "mystic_light_MSI_GPU_Fan",
            "mystic_light_MSI_GPU_Backplate",
        ]
        .iter()
        .map(|id| id.to_string())
        .collect();
        assert_eq!(ids, expected);

        let fan = leds.iter().find(|l| l.led_name == "Fan").unwrap();
        assert_eq!(fan.host, "10.0.0.5");
        assert_eq!(fan.device_name, "MSI_GPU");
        assert_eq!(fan.state.color, Rgb::new(255, 0, 0));
        assert_eq!(fan.state.brightness(), 150);
    }

    #[tokio::test]
    async fn test_leds_keep_daemon_order() {
        let transport = FakeTransport::new();
        transport.respond(
            200,
            devices_json(vec![(
                "MSI_MB",
                vec![
                    led_json("B", "Rainbow", (1, 1, 1), 1),
                    led_json("A", "Rainbow", (1, 1, 1), 1),
                ],
            )]),
        );

        let leds = Discovery::find_leds_with(&client(&transport)).await;
        let names: Vec<&str> = leds.iter().map(|l| l.led_name.as_str()).collect();
        assert_eq!(names, vec!["B", "A"]);
    }

    #[tokio::test]
    async fn test_non_200_yields_nothing() {
        let transport = FakeTransport::new();
        transport.respond_raw(500, "Internal Server Error");

        assert!(Discovery::find_leds_with(&client(&transport)).await.is_empty());
    }

    #[tokio::test]
    async fn test_empty_body_yields_nothing() {
        let transport = FakeTransport::new();
        transport.respond_raw(200, "");

        assert!(Discovery::find_leds_with(&client(&transport)).await.is_empty());
    }

    #[tokio::test]
    async fn test_connection_failure_yields_nothing() {
        let transport = FakeTransport::new();
        transport.fail("connection refused");

        assert!(Discovery::find_leds_with(&client(&transport)).await.is_empty());
    }

    #[tokio::test]
    async fn test_malformed_led_fails_whole_discovery() {
        let transport = FakeTransport::new();
        transport.respond(
            200,
            json!({ "data": { "devices": [
                { "name": "MSI_MB", "leds": [ { "name": "JRGB1" } ] }
            ] } }),
        );

        assert!(Discovery::find_leds_with(&client(&transport)).await.is_empty());
    }

    #[tokio::test]
    async fn test_null_speed_does_not_drop_leds() {
        let mut unset_speed = led_json("JRAINBOW1", "NoAnimation", (0, 0, 0), 1);
        unset_speed["state"]["speed"] = json!(null);
        let transport = FakeTransport::new();
        transport.respond(
            200,
            devices_json(vec![(
                "MSI_MB",
                vec![led_json("JRGB1", "Rainbow", (1, 2, 3), 5), unset_speed],
            )]),
        );

        let leds = Discovery::find_leds_with(&client(&transport)).await;
        assert_eq!(leds.len(), 2);
        assert_eq!(leds[1].state.speed, None);
        assert!(leds[1].state.is_off());
    }

    #[tokio::test]
    async fn test_device_without_leds() {
        let transport = FakeTransport::new();
        transport.respond(200, json!({ "data": { "devices": [ { "name": "MSI_KB" } ] } }));

        assert!(Discovery::find_leds_with(&client(&transport)).await.is_empty());
    }
}
