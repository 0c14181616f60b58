// player.rs
//
// Copyright 2026 The gst-airplay Authors
//
// This file is part of gst-airplay
//
// SPDX-License-Identifier: GPL-3.0-only

use std::io::Write;
use tracing::{error, info, warn};

use super::event::{create_message_channel, MessageSender, PipelineState};
use super::event_loop::{EventLoop, LoopExit, LoopHandle};
use super::pipeline::Pipeline;
use crate::config::PlayerConfig;
use crate::error::{PlayerError, Result};

/// Outcome of a [`Player::run`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerReport {
    pub exit: LoopExit,
    /// Pipeline state observed after shutdown
    pub final_state: PipelineState,
}

/// Owns a pipeline and the event loop monitoring it.
pub struct Player<W> {
    pipeline: Pipeline,
    event_loop: EventLoop<W>,
    message_tx: MessageSender,
}

impl<W: Write + Send + 'static> Player<W> {
    /// Build the pipeline and install the configured property watch.
    /// Does not need a running tokio runtime.
    pub fn new(config: &PlayerConfig, out: W) -> Result<Self> {
        let mut pipeline = Pipeline::new(&config.description)?;
        let (message_tx, message_rx) = create_message_channel();

        if let Some(watch) = &config.watch {
            match pipeline.watch_property(&watch.element, &watch.property, message_tx.clone()) {
                Ok(()) => {}
                Err(e @ (PlayerError::ElementNotFound(_) | PlayerError::PropertyNotFound { .. })) => {
                    warn!("Property watch disabled: {}", e);
                }
                Err(e) => return Err(e),
            }
        }

        Ok(Self {
            pipeline,
            event_loop: EventLoop::new(message_rx, out),
            message_tx,
        })
    }

    pub fn loop_handle(&self) -> LoopHandle {
        self.event_loop.handle()
    }

    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    /// Play the pipeline and block until the event loop ends.
    /// The pipeline is always back in NULL when this returns.
    pub async fn run(self) -> Result<PlayerReport> {
        let Player {
            mut pipeline,
            mut event_loop,
            message_tx,
        } = self;

        let bus = pipeline
            .bus()
            .ok_or_else(|| PlayerError::GStreamer("Pipeline has no bus".to_string()))?;
        let bus_task = Pipeline::start_bus_watch(
            bus,
            message_tx,
            pipeline.shutdown_flag(),
            pipeline.downgrade(),
        );
        pipeline.set_bus_task(bus_task);

        info!("Playing: {}", pipeline.description());
        // A failed state change posts its own error on the bus, which ends the loop.
        if let Err(e) = pipeline.play() {
            warn!("Could not start playback: {}", e);
        }

        let handle = event_loop.handle();
        let loop_task = tokio::spawn(async move { event_loop.run().await });

        let exit = match loop_task.await {
            Ok(Ok(exit)) => exit,
            Ok(Err(e)) => {
                error!("Event loop failed: {}", e);
                handle.quit();
                LoopExit::Failed
            }
            Err(e) => {
                let e = PlayerError::EventLoop(e.to_string());
                error!("{}", e);
                handle.quit();
                LoopExit::Failed
            }
        };

        pipeline.signal_shutdown();
        pipeline.stop()?;

        let final_state = pipeline.state();
        info!("Player finished ({}), pipeline is {}", exit, final_state);

        Ok(PlayerReport { exit, final_state })
    }
}
