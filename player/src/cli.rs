// cli.rs
//
// Copyright 2026 The gst-airplay Authors
//
// This file is part of gst-airplay
//
// SPDX-License-Identifier: GPL-3.0-only

use clap::Parser;

use crate::config::{PlayerConfig, DEFAULT_PIPELINE};

#[derive(Parser, Debug)]
#[command(name = "airplay-player")]
#[command(author = "The gst-airplay Authors")]
#[command(version)]
#[command(about = "Play an AirPlay mirroring stream through a GStreamer pipeline")]
pub struct Args {
    /// GStreamer pipeline description, without gst-launch
    #[arg(short = 'p', long, default_value = DEFAULT_PIPELINE)]
    pub pipeline: String,
}

impl From<Args> for PlayerConfig {
    fn from(args: Args) -> Self {
        PlayerConfig::new(args.pipeline)
    }
}
