//! mqtt-session - validate and probe MQTT channel session configuration

use clap::{Parser, Subcommand};
use mqtt_session::config::ConnectorConfig;
use mqtt_session::observability::init_default_logging;
use mqtt_session::session::SessionOptions;
use mqtt_session::transport::{connect_with_retry, MqttTransport};
use std::path::PathBuf;
use std::process;
use tokio::{signal, sync::watch};
use tracing::{error, info, warn};

/// MQTT client session configuration tool
#[derive(Parser)]
#[command(name = "mqtt-session")]
#[command(about = "Validate and probe MQTT client session configuration")]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, value_name = "FILE", env = "MQTT_SESSION_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build session options for every channel and report errors
    Check {
        /// Only check this channel
        #[arg(long)]
        channel: Option<String>,
    },
    /// Print the resolved session options of a channel as JSON
    Show {
        #[arg(long)]
        channel: String,
    },
    /// Connect to the broker of a channel, retrying per its reconnect policy
    Probe {
        #[arg(long)]
        channel: String,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_default_logging();

    let config = match load_configuration(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    let result = match cli.command {
        Commands::Check { channel } => check_channels(&config, channel.as_deref()),
        Commands::Show { channel } => show_channel(&config, &channel),
        Commands::Probe { channel } => probe_channel(&config, &channel).await,
    };

    if let Err(e) = result {
        error!("Command failed: {}", e);
        process::exit(1);
    }
}

fn load_configuration(
    config_path: &Option<PathBuf>,
) -> Result<ConnectorConfig, Box<dyn std::error::Error>> {
    match config_path {
        Some(path) => {
            info!("Loading configuration from: {}", path.display());
            Ok(ConnectorConfig::load_from_file(path)?)
        }
        None => {
            let default_paths = ["mqtt-session.toml", "config/mqtt-session.toml"];

            for path_str in default_paths {
                let path = PathBuf::from(path_str);
                if path.exists() {
                    info!("Loading configuration from: {}", path.display());
                    return Ok(ConnectorConfig::load_from_file(&path)?);
                }
            }

            Err("No configuration file found. Provide one with -c/--config or create mqtt-session.toml".into())
        }
    }
}

fn check_channels(
    config: &ConnectorConfig,
    only: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let channels = match only {
        Some(name) => vec![config.channel(name)?],
        None => config.channels.values().collect(),
    };

    if channels.is_empty() {
        warn!("Configuration declares no channels");
    }

    let mut failures = 0;
    for channel in channels {
        match SessionOptions::from_config(channel) {
            Ok(_) => println!("{}: ok", channel.name),
            Err(e) => {
                failures += 1;
                println!("{}: {}", channel.name, e);
            }
        }
    }

    if failures > 0 {
        return Err(format!("{failures} channel(s) failed validation").into());
    }
    info!("Configuration validation complete");
    Ok(())
}

fn show_channel(config: &ConnectorConfig, name: &str) -> Result<(), Box<dyn std::error::Error>> {
    let options = SessionOptions::from_config(config.channel(name)?)?;
    println!("{}", serde_json::to_string_pretty(&options.summary())?);
    Ok(())
}

async fn probe_channel(
    config: &ConnectorConfig,
    name: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut options = SessionOptions::from_config(config.channel(name)?)?;

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        if signal::ctrl_c().await.is_ok() {
            info!("Received Ctrl-C, stopping probe");
            let _ = shutdown_tx.send(true);
        }
    });

    let mut transport = MqttTransport::new();
    connect_with_retry(&mut transport, &mut options, shutdown_rx).await?;
    println!(
        "{}: connected to {}:{}",
        options.channel(),
        options.hostname(),
        options.port()
    );
    transport.disconnect().await;
    Ok(())
}
