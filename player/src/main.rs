// main.rs
//
// Copyright 2026 The gst-airplay Authors
//
// This file is part of gst-airplay
//
// SPDX-License-Identifier: GPL-3.0-only

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use airplay_player::cli::Args;
use airplay_player::{LoopHandle, Player, PlayerConfig};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logs go to stderr, stdout carries the player's own messages
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("airplay_player=info".parse()?),
        )
        .init();

    let args = Args::parse();
    let config = PlayerConfig::from(args);

    gstreamer::init()?;
    info!("GStreamer initialized");

    let player = Player::new(&config, std::io::stdout())?;

    // Register signal handlers up front (registration is synchronous and fallible)
    #[cfg(unix)]
    let mut sigint = tokio::signal::unix::signal(tokio::signal::unix::SignalKind::interrupt())?;
    #[cfg(unix)]
    let mut sigterm = tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())?;

    let handle: LoopHandle = player.loop_handle();
    tokio::spawn(async move {
        #[cfg(unix)]
        {
            tokio::select! {
                _ = sigint.recv() => info!("Received SIGINT"),
                _ = sigterm.recv() => info!("Received SIGTERM"),
            }
        }
        #[cfg(not(unix))]
        {
            if tokio::signal::ctrl_c().await.is_err() {
                return;
            }
            info!("Received Ctrl+C");
        }
        handle.quit();
    });

    let report = player.run().await?;
    info!("Exited on {}", report.exit);

    Ok(())
}
