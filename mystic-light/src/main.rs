use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;

use mystic_light_lib::control_interface::DaemonClient;
use mystic_light_lib::led::effect::EFFECT_LIST;
use mystic_light_lib::led::led_state::Rgb;
use mystic_light_lib::light::{ColorMode, LightEntity, MysticLight, TurnOnParams};
use mystic_light_lib::platform::PlatformConfig;
use mystic_light_lib::util::discovery::Discovery;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    handle_cli(cli).await
}

/// This struct defines the command line interface of the application
#[derive(Parser)]
#[clap(
    name = "mystic_light",
    about = "Controls MSI Mystic Light LEDs through the Mystic Light daemon",
    version
)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,
}

/// Supported output formats.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
pub enum OutputFormat {
    /// Plain text format.
    Plaintext,
    /// JSON format.
    Json,
    /// YAML format.
    Yaml,
}

/// Where the daemon lives: either `--host` or a YAML file with a `host` key.
#[derive(Args)]
pub struct DaemonArgs {
    /// Address of the machine running the Mystic Light daemon
    #[clap(long, conflicts_with = "config")]
    host: Option<String>,

    /// YAML file holding the platform configuration
    #[clap(long)]
    config: Option<PathBuf>,
}

impl DaemonArgs {
    fn platform_config(&self) -> Result<PlatformConfig> {
        let config = match (&self.host, &self.config) {
            (Some(host), _) => PlatformConfig::new(host.clone()),
            (None, Some(path)) => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read {}", path.display()))?;
                serde_yaml::from_str(&text)
                    .with_context(|| format!("Invalid configuration in {}", path.display()))?
            }
            (None, None) => return Err(anyhow!("Either --host or --config is required")),
        };
        config.validate().context("Invalid configuration")?;
        Ok(config)
    }
}

/// Subcommands available for the CLI
#[derive(Subcommand)]
pub enum Commands {
    /// Lists every LED known to the daemon
    #[clap(name = "discover")]
    Discover {
        #[clap(flatten)]
        daemon: DaemonArgs,

        /// Output format (plaintext, json, yaml)
        #[clap(short, long, value_enum, default_value_t = OutputFormat::Plaintext)]
        output: OutputFormat,
    },
    /// Operations on a single LED
    #[clap(name = "led")]
    Led {
        #[clap(flatten)]
        daemon: DaemonArgs,

        /// Name of the device owning the LED
        #[clap(long)]
        device: String,

        /// Name of the LED
        #[clap(long)]
        led: String,

        /// Output format (plaintext, json, yaml)
        #[clap(short, long, value_enum, default_value_t = OutputFormat::Plaintext)]
        output: OutputFormat,

        #[clap(subcommand)]
        action: LedAction,
    },
    /// Prints the effects the daemon supports
    #[clap(name = "effects")]
    Effects,
}

/// Actions available under the `led` subcommand
#[derive(Subcommand)]
pub enum LedAction {
    /// Prints the current state of the LED.
    #[clap(name = "status")]
    Status,
    /// Turns the LED on.
    #[clap(name = "on")]
    On {
        /// Effect to show, defaults to NoAnimation
        #[clap(long)]
        effect: Option<String>,

        /// Brightness (0-255), sent to the daemon as a level from 1 to 5
        #[clap(long, value_parser = clap::value_parser!(u8))]
        brightness: Option<u8>,

        /// Red component of the color (0-255)
        #[clap(short = 'r', long = "red", value_parser = clap::value_parser!(u8), requires_all = ["green", "blue"])]
        red: Option<u8>,

        /// Green component of the color (0-255)
        #[clap(short = 'g', long = "green", value_parser = clap::value_parser!(u8), requires_all = ["red", "blue"])]
        green: Option<u8>,

        /// Blue component of the color (0-255)
        #[clap(short = 'b', long = "blue", value_parser = clap::value_parser!(u8), requires_all = ["red", "green"])]
        blue: Option<u8>,
    },
    /// Turns the LED off.
    #[clap(name = "off")]
    Off,
}

/// What `led` prints about a light.
#[derive(Serialize)]
struct LightStatus<'a> {
    name: &'a str,
    unique_id: &'a str,
    is_on: Option<bool>,
    brightness: Option<u8>,
    rgb_color: Option<Rgb>,
    effect: Option<&'a str>,
    color_mode: ColorMode,
}

impl<'a> LightStatus<'a> {
    fn of(light: &'a MysticLight) -> Self {
        LightStatus {
            name: light.name(),
            unique_id: light.unique_id(),
            is_on: light.is_on(),
            brightness: light.brightness(),
            rgb_color: light.rgb_color(),
            effect: light.effect(),
            color_mode: light.color_mode(),
        }
    }
}

fn print_status(light: &MysticLight, output: OutputFormat) -> Result<()> {
    let status = LightStatus::of(light);
    match output {
        OutputFormat::Plaintext => {
            println!("Light: {} ({})", status.name, status.unique_id);
            println!("On: {}", status.is_on.unwrap_or(false));
            if let Some(brightness) = status.brightness {
                println!("Brightness: {}", brightness);
            }
            if let Some(rgb) = status.rgb_color {
                println!("Color: {}", rgb);
            }
            if let Some(effect) = status.effect {
                println!("Effect: {}", effect);
            }
        }
        OutputFormat::Json => println!("{}", serde_json::to_string(&status)?),
        OutputFormat::Yaml => print!("{}", serde_yaml::to_string(&status)?),
    }
    Ok(())
}

async fn load_light(client: &DaemonClient, device: &str, led: &str) -> Result<MysticLight> {
    let state = client
        .get_led(device, led)
        .await?
        .ok_or_else(|| anyhow!("LED {}:{} not found on {}", device, led, client.host()))?;
    Ok(MysticLight::new(client, device, led, state))
}

async fn handle_cli(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Discover { daemon, output } => {
            let config = daemon.platform_config()?;
            let leds = Discovery::find_leds(&config.host).await;
            match output {
                OutputFormat::Plaintext => {
                    Discovery::pretty_print_leds(&leds);
                }
                OutputFormat::Json => {
                    let json = serde_json::to_string(&leds)?;
                    println!("{}", json);
                }
                OutputFormat::Yaml => {
                    let yaml = serde_yaml::to_string(&leds)?;
                    print!("{}", yaml);
                }
            }
        }
        Commands::Led {
            daemon,
            device,
            led,
            output,
            action,
        } => {
            let config = daemon.platform_config()?;
            let client = DaemonClient::new(&config.host);
            let mut light = load_light(&client, &device, &led).await?;

            match action {
                LedAction::Status => {}
                LedAction::On {
                    effect,
                    brightness,
                    red,
                    green,
                    blue,
                } => {
                    let params = TurnOnParams {
                        brightness,
                        rgb_color: match (red, green, blue) {
                            (Some(r), Some(g), Some(b)) => Some(Rgb::new(r, g, b)),
                            _ => None,
                        },
                        effect,
                    };
                    if !light.turn_on(params).await {
                        return Err(anyhow!("Failed to turn on {}", light.name()));
                    }
                    light.update().await;
                }
                LedAction::Off => {
                    if !light.turn_off().await {
                        return Err(anyhow!("Failed to turn off {}", light.name()));
                    }
                    light.update().await;
                }
            }
            print_status(&light, output)?;
        }
        Commands::Effects => {
            for effect in EFFECT_LIST {
                println!("{}", effect);
            }
        }
    }

    Ok(())
}
