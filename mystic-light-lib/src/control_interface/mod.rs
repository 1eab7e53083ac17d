use std::net::Ipv6Addr;
use std::sync::Arc;

use anyhow::{anyhow, bail, Context};
use derivative::Derivative;
use log::debug;
use serde::Serialize;

use crate::led::led_state::LedState;
use crate::util::transport::{HttpTransport, Transport};

use self::graphql::{
    Device, DevicesData, GraphQlRequest, GraphQlResponse, LedStateInput, LedVariables,
    NoVariables, SetStateVariables, GET_ALL_DEVICES, GET_SINGLE_LED, SET_STATE_FOR_SINGLE_LED,
};

pub mod graphql;

/// Port the daemon listens on. Not configurable.
pub const DAEMON_PORT: u16 = 5001;

const ENDPOINT_PATH: &str = "mystic_light";

/// IPv6 literals are bracketed so the port stays separable from the address.
pub fn endpoint_url(host: &str) -> String {
    if host.parse::<Ipv6Addr>().is_ok() {
        format!("http://[{}]:{}/{}", host, DAEMON_PORT, ENDPOINT_PATH)
    } else {
        format!("http://{}:{}/{}", host, DAEMON_PORT, ENDPOINT_PATH)
    }
}

/// Client for the GraphQL endpoint of one daemon.
///
/// Cloning is cheap; clones share the transport but never any LED state.
#[derive(Derivative, Clone)]
#[derivative(Debug)]
pub struct DaemonClient {
    host: String,
    url: String,
    #[derivative(Debug = "ignore")]
    transport: Arc<dyn Transport>,
    log_target: String,
}

impl DaemonClient {
    pub fn new(host: &str) -> Self {
        DaemonClient::with_transport(host, Arc::new(HttpTransport::new()))
    }

    pub fn with_transport(host: &str, transport: Arc<dyn Transport>) -> Self {
        DaemonClient {
            host: host.to_string(),
            url: endpoint_url(host),
            transport,
            log_target: module_path!().to_string(),
        }
    }

    /// Routes this client's log records to `target` instead of the module path.
    pub fn with_log_target(mut self, target: impl Into<String>) -> Self {
        self.log_target = target.into();
        self
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn log_target(&self) -> &str {
        &self.log_target
    }

    /// Fetches every device with all of its LEDs.
    pub async fn get_devices(&self) -> anyhow::Result<Vec<Device>> {
        let body = self.post(GET_ALL_DEVICES, NoVariables {}).await?;
        let response: GraphQlResponse<DevicesData> = serde_json::from_str(&body)
            .with_context(|| format!("Unexpected device list from {}: {}", self.url, body))?;
        Ok(response.data.devices)
    }

    /// Fetches the state of one LED. `Ok(None)` means the daemon answered but did not
    /// list that LED.
    pub async fn get_led(
        &self,
        device_name: &str,
        led_name: &str,
    ) -> anyhow::Result<Option<LedState>> {
        let variables = LedVariables {
            device_name,
            led_name,
        };
        let body = self.post(GET_SINGLE_LED, variables).await?;
        let response: GraphQlResponse<DevicesData> = serde_json::from_str(&body)
            .with_context(|| format!("Unexpected LED state from {}: {}", self.url, body))?;

        // The query is already filtered, but the daemon is not trusted to honour the filter.
        let state = response
            .data
            .devices
            .into_iter()
            .filter(|device| device.name == device_name)
            .flat_map(|device| device.leds)
            .find(|led| led.name == led_name)
            .map(|led| led.state);
        Ok(state)
    }

    /// Applies `state` to one LED. Only the fields set in `state` are sent.
    pub async fn set_led_state(
        &self,
        device_name: &str,
        led_name: &str,
        state: &LedStateInput,
    ) -> anyhow::Result<()> {
        if state.is_empty() {
            bail!("Refusing to send an empty state to {}:{}", device_name, led_name);
        }
        let variables = SetStateVariables {
            device_name,
            led_name,
            state,
        };
        self.post(SET_STATE_FOR_SINGLE_LED, variables).await?;
        Ok(())
    }

    /// Posts one GraphQL document. Anything but a 200 with a non-empty body is an error
    /// naming the endpoint, the status and the body.
    async fn post<V: Serialize>(&self, query: &str, variables: V) -> anyhow::Result<String> {
        let payload = serde_json::to_value(GraphQlRequest { query, variables })
            .context("Failed to encode GraphQL request")?;
        debug!(target: self.log_target.as_str(), "POST {} {}", self.url, payload);

        let response = self
            .transport
            .post_json(&self.url, &payload)
            .await
            .with_context(|| format!("Could not connect to {}, -", self.url))?;

        if response.status != 200 || response.body.is_empty() {
            return Err(anyhow!(
                "Could not connect to {}, {}: {}",
                self.url,
                response.status,
                response.body
            ));
        }
        debug!(target: self.log_target.as_str(), "... {}", response.body);
        Ok(response.body)
    }
}
