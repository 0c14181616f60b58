// event_loop.rs
//
// Copyright 2026 The gst-airplay Authors
//
// This file is part of gst-airplay
//
// SPDX-License-Identifier: GPL-3.0-only

use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;
use tracing::{debug, error, info, warn};

use super::event::{BusMessage, MessageReceiver};
use crate::error::Result;

/// Why the event loop stopped running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopExit {
    EndOfStream,
    Error,
    /// Quit requested from outside the loop (signal handler, caller)
    Quit,
    /// Every message sender was dropped
    BusClosed,
    /// The loop itself failed or panicked
    Failed,
}

impl std::fmt::Display for LoopExit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoopExit::EndOfStream => write!(f, "end of stream"),
            LoopExit::Error => write!(f, "error"),
            LoopExit::Quit => write!(f, "quit"),
            LoopExit::BusClosed => write!(f, "bus closed"),
            LoopExit::Failed => write!(f, "failed"),
        }
    }
}

#[derive(Default)]
struct LoopState {
    quit_requests: AtomicUsize,
    notify: Notify,
}

/// Cloneable handle used to stop an [`EventLoop`].
#[derive(Clone, Default)]
pub struct LoopHandle {
    inner: Arc<LoopState>,
}

impl LoopHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request loop termination. Safe to call from any thread.
    pub fn quit(&self) {
        self.inner.quit_requests.fetch_add(1, Ordering::AcqRel);
        self.inner.notify.notify_one();
    }

    pub fn is_quit(&self) -> bool {
        self.quit_count() > 0
    }

    /// Number of quit requests issued so far
    pub fn quit_count(&self) -> usize {
        self.inner.quit_requests.load(Ordering::Acquire)
    }

    async fn quitted(&self) {
        self.inner.notify.notified().await;
    }
}

/// Single-threaded dispatcher for pipeline messages.
///
/// User-facing lines are written to `out`; logging goes through `tracing`.
pub struct EventLoop<W> {
    rx: MessageReceiver,
    handle: LoopHandle,
    out: W,
    terminal: Option<LoopExit>,
}

impl<W: Write> EventLoop<W> {
    pub fn new(rx: MessageReceiver, out: W) -> Self {
        Self {
            rx,
            handle: LoopHandle::new(),
            out,
            terminal: None,
        }
    }

    pub fn handle(&self) -> LoopHandle {
        self.handle.clone()
    }

    pub fn into_writer(self) -> W {
        self.out
    }

    /// Handle one bus message.
    ///
    /// Always returns `true`; the loop stops on quit requests only.
    pub fn on_message(&mut self, message: &BusMessage) -> Result<bool> {
        match message {
            BusMessage::Eos => {
                info!("Pipeline reached end of stream");
                writeln!(self.out, "End of stream")?;
                self.terminal = Some(LoopExit::EndOfStream);
                self.handle.quit();
            }
            BusMessage::Error {
                message,
                debug: debug_info,
                source,
            } => {
                error!(
                    "Error from {}: {} ({})",
                    source.as_deref().unwrap_or("pipeline"),
                    message,
                    debug_info.as_deref().unwrap_or("no debug info")
                );
                writeln!(self.out, "{}", format_diagnostic("Error", message, debug_info))?;
                self.terminal = Some(LoopExit::Error);
                self.handle.quit();
            }
            BusMessage::Warning {
                message,
                debug: debug_info,
                source,
            } => {
                warn!(
                    "Warning from {}: {} ({})",
                    source.as_deref().unwrap_or("pipeline"),
                    message,
                    debug_info.as_deref().unwrap_or("no debug info")
                );
                writeln!(self.out, "{}", format_diagnostic("Warning", message, debug_info))?;
            }
            BusMessage::PropertyChanged {
                element,
                property,
                value,
            } => {
                self.on_property_changed(element, property, value)?;
            }
            BusMessage::Other { .. } => {}
        }

        self.out.flush()?;
        Ok(true)
    }

    pub fn on_property_changed(&mut self, element: &str, property: &str, value: &str) -> Result<()> {
        info!("Element '{}' property '{}' changed to {}", element, property, value);
        writeln!(self.out, "{}: {}", capitalize(property), value)?;
        Ok(())
    }

    /// Dispatch messages until quit is requested or the channel closes.
    pub async fn run(&mut self) -> Result<LoopExit> {
        debug!("Event loop running");

        let exit = loop {
            if self.handle.is_quit() {
                break self.terminal.unwrap_or(LoopExit::Quit);
            }

            tokio::select! {
                biased;
                _ = self.handle.quitted() => {}
                message = self.rx.recv() => match message {
                    Some(message) => {
                        self.on_message(&message)?;
                    }
                    None => {
                        warn!("Message channel closed");
                        self.handle.quit();
                        break LoopExit::BusClosed;
                    }
                },
            }
        };

        debug!("Event loop stopped: {}", exit);
        Ok(exit)
    }
}

fn format_diagnostic(label: &str, message: &str, debug: &Option<String>) -> String {
    match debug {
        Some(debug) => format!("{}: {} ({})", label, message, debug),
        None => format!("{}: {}", label, message),
    }
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
