use std::net::Ipv6Addr;

use anyhow::{bail, Result};
use log::info;
use serde::{Deserialize, Serialize};

use crate::control_interface::{DaemonClient, DAEMON_PORT};
use crate::light::MysticLight;
use crate::util::discovery::Discovery;

/// Log target for platform setup.
pub const LOG_TARGET: &str = "mystic_light::platform";

/// User configuration of the light platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformConfig {
    /// Address of the machine running the daemon. The port is always 5001.
    pub host: String,
}

impl PlatformConfig {
    pub fn new(host: impl Into<String>) -> Self {
        PlatformConfig { host: host.into() }
    }

    /// The host must be a bare name or address: no scheme, no port, no path.
    pub fn validate(&self) -> Result<()> {
        let host = self.host.trim();
        if host.is_empty() {
            bail!("host must not be empty");
        }
        if host.len() != self.host.len() {
            bail!("host {:?} has surrounding whitespace", self.host);
        }
        if host.contains("://") || host.contains('/') {
            bail!("host {:?} must not contain a scheme or path", self.host);
        }
        // A single colon is a port; IPv6 literals have several.
        match host.matches(':').count() {
            0 => {}
            1 => bail!(
                "host {:?} must not contain a port, the daemon always listens on {}",
                self.host,
                DAEMON_PORT
            ),
            _ => {
                let literal = host
                    .strip_prefix('[')
                    .and_then(|rest| rest.strip_suffix(']'))
                    .unwrap_or(host);
                if literal.parse::<Ipv6Addr>().is_err() {
                    bail!("host {:?} is not a valid IPv6 address", self.host);
                }
            }
        }
        Ok(())
    }
}

/// Discovers the LEDs behind `config.host` and hands the new entities to `add_entities`,
/// one call per device.
///
/// Returns the number of entities added. An unreachable daemon adds none and is not an
/// error; only an invalid configuration is.
pub async fn setup_platform<F>(config: &PlatformConfig, add_entities: F) -> Result<usize>
where
    F: FnMut(Vec<MysticLight>),
{
    config.validate()?;
    let client = DaemonClient::new(&config.host).with_log_target(LOG_TARGET);
    Ok(setup_platform_with(&client, add_entities).await)
}

/// [`setup_platform`] through an existing client.
pub async fn setup_platform_with<F>(client: &DaemonClient, mut add_entities: F) -> usize
where
    F: FnMut(Vec<MysticLight>),
{
    let leds = Discovery::find_leds_with(client).await;
    let total = leds.len();

    let mut batch: Vec<MysticLight> = Vec::new();
    for led in leds {
        if batch
            .last()
            .is_some_and(|light| light.device_name() != led.device_name)
        {
            add_entities(std::mem::take(&mut batch));
        }
        batch.push(MysticLight::from_discovered(client, led));
    }
    if !batch.is_empty() {
        add_entities(batch);
    }

    info!(
        target: client.log_target(),
        "{} Mystic Light entities set up for {}",
        total,
        client.host()
    );
    total
}
