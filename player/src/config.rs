// config.rs
//
// Copyright 2026 The gst-airplay Authors
//
// This file is part of gst-airplay
//
// SPDX-License-Identifier: GPL-3.0-only

/// Pipeline used when no description is given on the command line
pub const DEFAULT_PIPELINE: &str =
    "airplaysrc name=source ! queue ! h264parse ! avdec_h264 max-threads=1 ! autovideosink";

/// Name of the element whose property is watched by default
pub const DEFAULT_WATCH_ELEMENT: &str = "source";

/// Property of `airplaysrc` toggled when a sender connects or disconnects
pub const DEFAULT_WATCH_PROPERTY: &str = "connected";

/// A property change subscription on a named pipeline element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyWatch {
    pub element: String,
    pub property: String,
}

impl PropertyWatch {
    pub fn new(element: impl Into<String>, property: impl Into<String>) -> Self {
        Self {
            element: element.into(),
            property: property.into(),
        }
    }
}

impl Default for PropertyWatch {
    fn default() -> Self {
        Self::new(DEFAULT_WATCH_ELEMENT, DEFAULT_WATCH_PROPERTY)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerConfig {
    /// Pipeline description in gst-launch syntax
    pub description: String,
    /// Optional property watch; `None` disables it
    pub watch: Option<PropertyWatch>,
}

impl PlayerConfig {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            watch: Some(PropertyWatch::default()),
        }
    }

    pub fn with_watch(mut self, watch: Option<PropertyWatch>) -> Self {
        self.watch = watch;
        self
    }
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self::new(DEFAULT_PIPELINE)
    }
}
