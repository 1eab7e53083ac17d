use std::net::SocketAddr;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use mystic_light_lib::control_interface::DaemonClient;
use mystic_light_lib::led::led_state::LedState;
use mystic_light_lib::light::{LightEntity, MysticLight, TurnOnParams};
use mystic_light_lib::util::discovery::Discovery;
use mystic_light_lib::util::transport::{HttpTransport, RawResponse, Transport};

/// A request as seen by the stub server.
struct Captured {
    head: String,
    body: Value,
}

/// Accepts exactly one connection, answers it with `status` and `body`, and returns the
/// request it received.
async fn serve_once(status: &'static str, body: &'static str) -> (SocketAddr, JoinHandle<Captured>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let handle = tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();

        let mut raw = Vec::new();
        let mut chunk = [0u8; 1024];
        let header_end = loop {
            let n = stream.read(&mut chunk).await.unwrap();
            assert!(n > 0, "client closed before sending headers");
            raw.extend_from_slice(&chunk[..n]);
            if let Some(pos) = raw.windows(4).position(|w| w == b"\r\n\r\n") {
                break pos + 4;
            }
        };

        let head = String::from_utf8_lossy(&raw[..header_end]).to_string();
        let content_length = head
            .lines()
            .filter_map(|line| line.split_once(':'))
            .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
            .map(|(_, value)| value.trim().parse::<usize>().unwrap())
            .unwrap_or(0);
        while raw.len() < header_end + content_length {
            let n = stream.read(&mut chunk).await.unwrap();
            assert!(n > 0, "client closed before sending the body");
            raw.extend_from_slice(&chunk[..n]);
        }

        let response = format!(
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        );
        stream.write_all(response.as_bytes()).await.unwrap();
        stream.shutdown().await.unwrap();

        let body = serde_json::from_slice(&raw[header_end..header_end + content_length]).unwrap();
        Captured { head, body }
    });

    (addr, handle)
}

/// Talks to the stub directly, even when the environment configures a proxy.
fn direct_transport() -> HttpTransport {
    HttpTransport::with_client(reqwest::Client::builder().no_proxy().build().unwrap())
}

/// Sends what the client addresses to port 5001 to the stub server instead.
struct Redirect {
    inner: HttpTransport,
    port: u16,
}

#[async_trait]
impl Transport for Redirect {
    async fn post_json(&self, url: &str, payload: &Value) -> anyhow::Result<RawResponse> {
        let url = url.replace(":5001/", &format!(":{}/", self.port));
        self.inner.post_json(&url, payload).await
    }
}

fn redirected_client(addr: SocketAddr) -> DaemonClient {
    DaemonClient::with_transport(
        "127.0.0.1",
        Arc::new(Redirect {
            inner: direct_transport(),
            port: addr.port(),
        }),
    )
}

#[tokio::test]
async fn test_post_json_sends_json_body() {
    let (addr, server) = serve_once("200 OK", r#"{"data":{}}"#).await;
    let url = format!("http://{}/mystic_light", addr);
    let payload = json!({ "query": "query GetDevices { devices { name } }", "variables": {} });

    let response = direct_transport().post_json(&url, &payload).await.unwrap();
    assert_eq!(response, RawResponse::new(200, r#"{"data":{}}"#));

    let captured = server.await.unwrap();
    assert!(captured.head.starts_with("POST /mystic_light HTTP/1.1\r\n"));
    assert!(captured
        .head
        .to_ascii_lowercase()
        .contains("content-type: application/json"));
    assert_eq!(captured.body, payload);
}

#[tokio::test]
async fn test_post_json_passes_through_error_status() {
    let (addr, server) = serve_once("500 Internal Server Error", "no daemon").await;
    let url = format!("http://{}/mystic_light", addr);

    let response = direct_transport()
        .post_json(&url, &json!({}))
        .await
        .unwrap();
    assert_eq!(response.status, 500);
    assert_eq!(response.body, "no daemon");
    server.await.unwrap();
}

#[tokio::test]
async fn test_post_json_connection_refused() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let url = format!("http://{}/mystic_light", addr);
    assert!(direct_transport().post_json(&url, &json!({})).await.is_err());
}

#[tokio::test]
async fn test_discovery_over_http() {
    let body = r#"{"data":{"devices":[{"name":"MSI_MB","leds":[
        {"name":"JRGB1","state":{"color":{"red":255,"green":0,"blue":0},"bright":5,"speed":2,"style":"Rainbow"}},
        {"name":"JRAINBOW1","state":{"color":{"red":0,"green":0,"blue":0},"bright":1,"speed":2,"style":"NoAnimation"}}
    ]}]}}"#;
    let (addr, server) = serve_once("200 OK", body).await;

    let leds = Discovery::find_leds_with(&redirected_client(addr)).await;
    assert_eq!(leds.len(), 2);
    assert_eq!(leds[0].unique_id(), "mystic_light_MSI_MB_JRGB1");
    assert!(leds[1].state.is_off());

    let captured = server.await.unwrap();
    assert_eq!(captured.body["variables"], json!({}));
    assert!(captured.body["query"]
        .as_str()
        .unwrap()
        .starts_with("query GetDevices {"));
}

#[tokio::test]
async fn test_turn_on_over_http() {
    let (addr, server) = serve_once("200 OK", r#"{"data":{"devices":[]}}"#).await;
    let client = redirected_client(addr);
    let state = LedState {
        color: (0, 0, 0).into(),
        bright: 1,
        speed: None,
        style: "NoAnimation".to_string(),
    };
    let light = MysticLight::new(&client, "MSI_MB", "JRGB1", state);

    assert!(light.turn_on(TurnOnParams::new().brightness(51)).await);

    let captured = server.await.unwrap();
    assert_eq!(
        captured.body["variables"],
        json!({
            "device_name": "MSI_MB",
            "led_name": "JRGB1",
            "state": {
                "style": "NoAnimation",
                "color": { "red": 255, "green": 0, "blue": 0 },
                "bright": 2
            }
        })
    );
}

#[tokio::test]
async fn test_refresh_failure_over_http_keeps_state() {
    let (addr, server) = serve_once("502 Bad Gateway", "").await;
    let client = redirected_client(addr);
    let initial = LedState {
        color: (0, 0, 255).into(),
        bright: 3,
        speed: None,
        style: "Breathing".to_string(),
    };
    let mut light = MysticLight::new(&client, "MSI_MB", "JRGB1", initial.clone());

    light.update().await;
    assert_eq!(light.state(), &initial);
    assert_eq!(light.brightness(), Some(150));
    server.await.unwrap();
}
