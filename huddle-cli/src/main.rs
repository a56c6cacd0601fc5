use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Input;
use huddle::PeerId;
use huddle::client::{
    CallClient, RtcConnector, SessionConfig, SessionEvents, SessionHandle, SignalingConfig,
    SyntheticDevices, WsSignalingTransport,
};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

mod input;
mod render;

use input::{HELP, InputCommand};

#[derive(Parser)]
#[command(name = "huddle")]
#[command(about = "Headless participant for huddle video rooms")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Join a room and drive the call from the terminal.
    Join {
        #[arg(long, default_value = "ws://127.0.0.1:3000/signal")]
        url: String,

        #[arg(short, long)]
        room: String,

        /// Defaults to a random id.
        #[arg(long)]
        user_id: Option<String>,

        /// Prompted for when missing.
        #[arg(short, long)]
        name: Option<String>,

        /// Gather host candidates only.
        #[arg(long)]
        no_stun: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    match Cli::parse().command {
        Commands::Join {
            url,
            room,
            user_id,
            name,
            no_stun,
        } => {
            let name = match name {
                Some(name) => name,
                None => Input::new()
                    .with_prompt("Display name")
                    .interact_text()
                    .context("Failed to read display name")?,
            };
            let user_id = user_id.map(PeerId::from).unwrap_or_default();

            let config = SessionConfig {
                ice_servers: no_stun.then(Vec::new),
                ..Default::default()
            };
            run_call(config, url, room, user_id, name).await?;
        }
    }

    Ok(())
}

async fn run_call(
    config: SessionConfig,
    url: String,
    room: String,
    user_id: PeerId,
    name: String,
) -> Result<()> {
    let transport = Arc::new(WsSignalingTransport::new(SignalingConfig::new(url.clone())));
    let devices = Arc::new(SyntheticDevices::new());
    let connector = Arc::new(RtcConnector::new(&config).context("Failed to set up WebRTC")?);
    let (client, events) = CallClient::new(config, transport, devices, connector);

    info!("Joining room {} at {} as {:?}", room, url, user_id);
    println!("{} {} via {}", "🚀 Joining".green().bold(), room.bold(), url);
    let session = client
        .join_room(room, user_id, name)
        .await
        .context("Failed to join room")?;
    println!("{}", HELP.dimmed());

    let result = drive(&session, events).await;
    if let Err(e) = &result {
        warn!("Call ended with error: {:#}", e);
    }
    info!("Leaving room {}", session.room_id());
    session.leave_room().await.context("Failed to leave room")?;
    println!("{}", "👋 Left the room".green().bold());
    result
}

async fn drive(session: &SessionHandle, mut events: SessionEvents) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            event = events.recv() => match event {
                Some(event) => {
                    debug!("Session event: {:?}", event);
                    render::print_event(&event)
                }
                None => {
                    info!("Session event stream closed");
                    return Ok(());
                }
            },

            line = lines.next_line() => {
                let Some(line) = line? else {
                    return Ok(());
                };
                if line.trim().is_empty() {
                    continue;
                }
                match InputCommand::parse(&line) {
                    Ok(InputCommand::Leave) => return Ok(()),
                    Ok(command) => {
                        if let Err(e) = execute(session, command).await {
                            warn!("Command failed: {:#}", e);
                            println!("{} {:#}", "Error:".red().bold(), e);
                        }
                    }
                    Err(e) => println!("{} {}\n{}", "?".yellow(), e, HELP.dimmed()),
                }
            }

            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted");
                return Ok(());
            }
        }
    }
}

async fn execute(session: &SessionHandle, command: InputCommand) -> Result<()> {
    match command {
        InputCommand::Audio(enabled) => session.toggle_audio(enabled).await?,
        InputCommand::Video(enabled) => session.toggle_video(enabled).await?,
        InputCommand::Hand(raised) => session.raise_hand(raised).await?,
        InputCommand::Restart => {
            let report = session.restart_video().await?;
            println!(
                "{} track {}: {} renegotiated, {} deferred, {} failed",
                "🔄 Camera restarted".cyan(),
                report.track_id.dimmed(),
                report.renegotiated.len(),
                report.deferred.len(),
                report.failed.len()
            );
        }
        InputCommand::Peers => render::print_snapshot(&session.snapshot().await?),
        InputCommand::Help => println!("{}", HELP),
        InputCommand::Leave => {}
    }
    Ok(())
}
