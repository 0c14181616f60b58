// event.rs
//
// Copyright 2026 The gst-airplay Authors
//
// This file is part of gst-airplay
//
// SPDX-License-Identifier: GPL-3.0-only

use gstreamer as gst;
use gstreamer::prelude::*;

use super::MESSAGE_CHANNEL_CAPACITY;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    /// Pipeline is in void/pending state (transitioning)
    VoidPending,
    Null,
    Ready,
    Paused,
    Playing,
}

impl std::fmt::Display for PipelineState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PipelineState::VoidPending => write!(f, "void_pending"),
            PipelineState::Null => write!(f, "null"),
            PipelineState::Ready => write!(f, "ready"),
            PipelineState::Paused => write!(f, "paused"),
            PipelineState::Playing => write!(f, "playing"),
        }
    }
}

impl From<gst::State> for PipelineState {
    fn from(state: gst::State) -> Self {
        match state {
            gst::State::VoidPending => PipelineState::VoidPending,
            gst::State::Null => PipelineState::Null,
            gst::State::Ready => PipelineState::Ready,
            gst::State::Paused => PipelineState::Paused,
            gst::State::Playing => PipelineState::Playing,
        }
    }
}

impl From<PipelineState> for gst::State {
    fn from(state: PipelineState) -> Self {
        match state {
            PipelineState::VoidPending => gst::State::VoidPending,
            PipelineState::Null => gst::State::Null,
            PipelineState::Ready => gst::State::Ready,
            PipelineState::Paused => gst::State::Paused,
            PipelineState::Playing => gst::State::Playing,
        }
    }
}

/// A message delivered to the event loop.
///
/// Bus messages are converted into this type by the bus watcher, and property
/// notifications from watched elements are forwarded as `PropertyChanged`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BusMessage {
    Eos,
    Error {
        message: String,
        debug: Option<String>,
        /// Path of the element that posted the message, if any
        source: Option<String>,
    },
    Warning {
        message: String,
        debug: Option<String>,
        source: Option<String>,
    },
    PropertyChanged {
        element: String,
        property: String,
        value: String,
    },
    /// Any bus message the loop does not act on
    Other { kind: String },
}

impl BusMessage {
    pub fn from_gst(msg: &gst::MessageRef) -> Self {
        let source = msg.src().map(|s| s.path_string().to_string());

        match msg.view() {
            gst::MessageView::Eos(_) => BusMessage::Eos,
            gst::MessageView::Error(err) => BusMessage::Error {
                message: err.error().to_string(),
                debug: err.debug().map(|d| d.to_string()),
                source,
            },
            gst::MessageView::Warning(warning) => BusMessage::Warning {
                message: warning.error().to_string(),
                debug: warning.debug().map(|d| d.to_string()),
                source,
            },
            _ => BusMessage::Other {
                kind: format!("{:?}", msg.type_()),
            },
        }
    }
}

pub type MessageSender = tokio::sync::mpsc::Sender<BusMessage>;
pub type MessageReceiver = tokio::sync::mpsc::Receiver<BusMessage>;

pub fn create_message_channel() -> (MessageSender, MessageReceiver) {
    tokio::sync::mpsc::channel(MESSAGE_CHANNEL_CAPACITY)
}
