// mod.rs
//
// Copyright 2026 The gst-airplay Authors
//
// This file is part of gst-airplay
//
// SPDX-License-Identifier: GPL-3.0-only

pub mod event;
pub mod event_loop;
pub mod pipeline;
pub mod player;

pub use event::{create_message_channel, BusMessage, MessageReceiver, MessageSender, PipelineState};
pub use event_loop::{EventLoop, LoopExit, LoopHandle};
pub use pipeline::Pipeline;
pub use player::{Player, PlayerReport};

/// Capacity of the channel between the bus watcher and the event loop
pub const MESSAGE_CHANNEL_CAPACITY: usize = 256;

/// Bus poll timeout in milliseconds; bounds how long shutdown waits on the watcher
pub const BUS_POLL_INTERVAL_MS: u64 = 100;



#[cfg(test)]
mod pipeline_tests;
