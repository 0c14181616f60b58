// error.rs
//
// Copyright 2026 The gst-airplay Authors
//
// This file is part of gst-airplay
//
// SPDX-License-Identifier: GPL-3.0-only

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlayerError {
    #[error("GStreamer error: {0}")]
    GStreamer(String),

    #[error("Invalid pipeline description: {0}")]
    InvalidPipeline(String),

    #[error("Media not supported: {0}")]
    MediaNotSupported(String),

    #[error("State change failed: {0}")]
    StateChangeFailed(String),

    #[error("Element not found: {0}")]
    ElementNotFound(String),

    #[error("Element '{element}' has no property '{property}'")]
    PropertyNotFound { element: String, property: String },

    #[error("Event loop error: {0}")]
    EventLoop(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<gstreamer::glib::BoolError> for PlayerError {
    fn from(err: gstreamer::glib::BoolError) -> Self {
        PlayerError::GStreamer(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, PlayerError>;
