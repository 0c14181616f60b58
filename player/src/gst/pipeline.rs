// pipeline.rs
//
// Copyright 2026 The gst-airplay Authors
//
// This file is part of gst-airplay
//
// SPDX-License-Identifier: GPL-3.0-only

use gstreamer as gst;
use gstreamer::glib;
use gstreamer::prelude::*;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use super::event::{BusMessage, MessageSender, PipelineState};
use super::BUS_POLL_INTERVAL_MS;
use crate::error::{PlayerError, Result};

/// Maximum length for pipeline descriptions to prevent memory exhaustion
pub const MAX_PIPELINE_DESCRIPTION_LENGTH: usize = 64 * 1024; // 64KB

/// Check if a GStreamer error points at a missing plugin or element rather
/// than a malformed description.
/// Returns Some with the original message if so, None otherwise.
pub fn is_media_not_supported_error(error: &glib::Error) -> Option<String> {
    if error.matches(gst::ParseError::NoSuchElement) || error.matches(gst::CoreError::MissingPlugin)
    {
        return Some(error.message().to_string());
    }

    let msg_lower = error.message().to_lowercase();
    let media_patterns = [
        "no element",
        "no suitable",
        "missing plugin",
        "missing element",
        "no decoder",
    ];

    media_patterns
        .iter()
        .any(|pattern| msg_lower.contains(pattern))
        .then(|| error.message().to_string())
}

pub struct Pipeline {
    description: String,
    pipeline: gst::Pipeline,
    bus_task: Option<tokio::task::JoinHandle<()>>,
    /// Flag to signal the bus watcher to stop
    shutdown_flag: Arc<AtomicBool>,
    notify_handlers: Vec<(gst::Element, glib::SignalHandlerId)>,
}

impl Pipeline {
    pub fn new(description: &str) -> Result<Self> {
        if description.trim().is_empty() {
            return Err(PlayerError::InvalidPipeline(
                "Pipeline description cannot be empty".to_string(),
            ));
        }

        if description.len() > MAX_PIPELINE_DESCRIPTION_LENGTH {
            return Err(PlayerError::InvalidPipeline(format!(
                "Pipeline description too long: {} bytes (max: {} bytes)",
                description.len(),
                MAX_PIPELINE_DESCRIPTION_LENGTH
            )));
        }

        // gst::init() is called once in main.rs before any pipeline is built.
        let element = gst::parse::launch(description).map_err(|e| {
            if let Some(msg) = is_media_not_supported_error(&e) {
                PlayerError::MediaNotSupported(msg)
            } else {
                PlayerError::InvalidPipeline(e.to_string())
            }
        })?;

        // A description with a single top-level element yields that element
        // instead of a pipeline.
        let pipeline = match element.downcast::<gst::Pipeline>() {
            Ok(pipeline) => pipeline,
            Err(element) => {
                debug!("Wrapping top-level element '{}' in a pipeline", element.name());
                let pipeline = gst::Pipeline::new();
                pipeline.add(&element)?;
                pipeline
            }
        };

        info!("Created pipeline: {}", description);

        Ok(Self {
            description: description.to_string(),
            pipeline,
            bus_task: None,
            shutdown_flag: Arc::new(AtomicBool::new(false)),
            notify_handlers: Vec::new(),
        })
    }

    /// Forward changes of `property` on the element named `element_name` to
    /// the event loop as [`BusMessage::PropertyChanged`].
    pub fn watch_property(
        &mut self,
        element_name: &str,
        property: &str,
        message_tx: MessageSender,
    ) -> Result<()> {
        let element = self
            .pipeline
            .by_name(element_name)
            .ok_or_else(|| PlayerError::ElementNotFound(element_name.to_string()))?;

        if element.find_property(property).is_none() {
            return Err(PlayerError::PropertyNotFound {
                element: element_name.to_string(),
                property: property.to_string(),
            });
        }

        // Notifications are emitted from whichever thread sets the property,
        // usually a streaming thread, so never block here.
        let handler = element.connect_notify(Some(property), move |element, pspec| {
            let value = element.property_value(pspec.name());
            let value = GstValueExt::serialize(&value)
                .map(|s| s.to_string())
                .unwrap_or_else(|_| format!("{:?}", value));

            let message = BusMessage::PropertyChanged {
                element: element.name().to_string(),
                property: pspec.name().to_string(),
                value,
            };
            if message_tx.try_send(message).is_err() {
                warn!(
                    "Dropped '{}' change on '{}': message channel full or closed",
                    pspec.name(),
                    element.name()
                );
            }
        });

        debug!("Watching property '{}' on '{}'", property, element_name);
        self.notify_handlers.push((element, handler));
        Ok(())
    }

    /// Start the bus watcher task for this pipeline.
    /// Every bus message is converted to a [`BusMessage`] and forwarded in bus
    /// order. The task ends on the shutdown flag or once the receiver is gone.
    pub fn start_bus_watch(
        bus: gst::Bus,
        message_tx: MessageSender,
        shutdown_flag: Arc<AtomicBool>,
        pipeline: glib::WeakRef<gst::Pipeline>,
    ) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            loop {
                if shutdown_flag.load(Ordering::Acquire) {
                    debug!("Bus watcher received shutdown signal");
                    break;
                }

                let bus_clone = bus.clone();
                let shutdown_clone = Arc::clone(&shutdown_flag);

                let msg = match tokio::task::spawn_blocking(move || {
                    if shutdown_clone.load(Ordering::Acquire) {
                        return None;
                    }
                    bus_clone.timed_pop(gst::ClockTime::from_mseconds(BUS_POLL_INTERVAL_MS))
                })
                .await
                {
                    Ok(msg) => msg,
                    Err(e) => {
                        warn!("Bus watcher spawn_blocking failed: {}", e);
                        continue;
                    }
                };

                let Some(msg) = msg else {
                    continue;
                };

                if let gst::MessageView::StateChanged(state_changed) = msg.view() {
                    let from_pipeline = match (msg.src(), pipeline.upgrade()) {
                        (Some(src), Some(p)) => src == p.upcast_ref::<gst::Object>(),
                        _ => false,
                    };
                    if from_pipeline {
                        debug!(
                            "Pipeline state changed: {} -> {}",
                            PipelineState::from(state_changed.old()),
                            PipelineState::from(state_changed.current())
                        );
                    }
                }

                if message_tx.send(BusMessage::from_gst(&msg)).await.is_err() {
                    debug!("Message receiver dropped, stopping bus watcher");
                    break;
                }
            }

            debug!("Bus watcher stopped");
        })
    }

    /// Get the GStreamer bus for this pipeline
    pub fn bus(&self) -> Option<gst::Bus> {
        self.pipeline.bus()
    }

    /// Look up an element of the pipeline by name
    pub fn element(&self, name: &str) -> Option<gst::Element> {
        self.pipeline.by_name(name)
    }

    pub fn downgrade(&self) -> glib::WeakRef<gst::Pipeline> {
        self.pipeline.downgrade()
    }

    pub fn set_bus_task(&mut self, task: tokio::task::JoinHandle<()>) {
        self.bus_task = Some(task);
    }

    pub fn shutdown_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.shutdown_flag)
    }

    /// Signal the bus watcher to stop
    pub fn signal_shutdown(&self) {
        self.shutdown_flag.store(true, Ordering::Release);
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn state(&self) -> PipelineState {
        let (_result, current, _pending) = self.pipeline.state(gst::ClockTime::ZERO);
        PipelineState::from(current)
    }

    pub fn set_state(&self, state: PipelineState) -> Result<()> {
        let gst_state: gst::State = state.into();
        match self.pipeline.set_state(gst_state) {
            Ok(gst::StateChangeSuccess::Async) => {
                info!("Pipeline state change to {} in progress", state);
                Ok(())
            }
            Ok(gst::StateChangeSuccess::NoPreroll) => {
                info!("Pipeline state set to {} (live, no preroll)", state);
                Ok(())
            }
            Ok(gst::StateChangeSuccess::Success) => {
                info!("Pipeline state set to {}", state);
                Ok(())
            }
            Err(_) => {
                error!("Failed to change pipeline state to {}", state);
                Err(PlayerError::StateChangeFailed(format!(
                    "Failed to change state to {}",
                    state
                )))
            }
        }
    }

    pub fn play(&self) -> Result<()> {
        self.set_state(PipelineState::Playing)
    }

    pub fn stop(&self) -> Result<()> {
        self.set_state(PipelineState::Null)
    }
}

impl Drop for Pipeline {
    fn drop(&mut self) {
        debug!("Dropping pipeline");

        self.shutdown_flag.store(true, Ordering::Release);

        for (element, handler) in self.notify_handlers.drain(..) {
            element.disconnect(handler);
        }

        let _ = self.pipeline.set_state(gst::State::Null);

        if let Some(task) = self.bus_task.take() {
            task.abort();
        }
    }
}
