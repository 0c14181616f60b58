// lib.rs
//
// Copyright 2026 The gst-airplay Authors
//
// This file is part of gst-airplay
//
// SPDX-License-Identifier: GPL-3.0-only

pub mod cli;
pub mod config;
pub mod error;
pub mod gst;

pub use config::{PlayerConfig, PropertyWatch, DEFAULT_PIPELINE};
pub use error::{PlayerError, Result};
pub use gst::{BusMessage, EventLoop, LoopExit, LoopHandle, Pipeline, Player, PlayerReport};
