//! # Mystic Light Control Library
//!
//! `mystic-light-lib` exposes the LEDs managed by the MSI Mystic Light daemon as
//! home-automation light entities. The daemon publishes a GraphQL endpoint on
//! `http://{host}:5001/mystic_light`; this crate discovers every device and LED behind it,
//! reads LED state and changes it.
//!
//! ## Features
//!
//! - Discovery of all devices and LEDs known to a daemon
//! - One light entity per LED with on/off, brightness, RGB color and effect
//! - Partial state mutations that only carry the aspects being changed
//!
//! ## Example
//!
//! ```no_run
//! use mystic_light_lib::light::LightEntity;
//! use mystic_light_lib::platform::{setup_platform, PlatformConfig};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = PlatformConfig::new("192.168.1.20");
//!     let mut lights = Vec::new();
//!     setup_platform(&config, |entities| lights.extend(entities)).await?;
//!
//!     for light in &mut lights {
//!         light.update().await;
//!         println!("{}: on={:?}", light.name(), light.is_on());
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Disclaimer
//!
//! This project is not affiliated with, authorized by, endorsed by, or in any way officially connected
//! with MSI or its affiliates.

// The `control_interface` module talks to the daemon. It builds the GraphQL documents,
// posts them and turns the HTTP outcome into either a parsed body or an error that
// names the endpoint, status and body.
pub mod control_interface;

// The `led` module holds the daemon's LED model: colors, state, the brightness scale
// and the list of effects the daemon knows about.
pub mod led;

// The `light` module is the surface presented to the host platform, and the per-LED
// entity adapter behind it.
pub mod light;

// The `platform` module carries the user-supplied configuration and sets up the
// entities for one daemon.
pub mod platform;

// The `util` module provides the HTTP transport seam and LED discovery.
pub mod util;
