// pipeline_tests.rs
//
// Copyright 2026 The gst-airplay Authors
//
// This file is part of gst-airplay
//
// SPDX-License-Identifier: GPL-3.0-only

use gstreamer as gst;
use gstreamer::prelude::*;
use std::time::Duration;

use super::event::{create_message_channel, BusMessage, PipelineState};
use super::pipeline::*;
use crate::error::PlayerError;

fn init_gstreamer() {
    let _ = gst::init();
}

// =============================================================================
// Pipeline::new() validation tests
// =============================================================================

#[test]
fn test_pipeline_new_empty_description_fails() {
    init_gstreamer();
    match Pipeline::new("") {
        Err(PlayerError::InvalidPipeline(msg)) => assert!(msg.contains("empty")),
        _ => panic!("Expected InvalidPipeline error"),
    }
}

#[test]
fn test_pipeline_new_whitespace_only_fails() {
    init_gstreamer();
    match Pipeline::new("   \t\n  ") {
        Err(PlayerError::InvalidPipeline(msg)) => assert!(msg.contains("empty")),
        _ => panic!("Expected InvalidPipeline error"),
    }
}

#[test]
fn test_pipeline_new_description_too_long_fails() {
    init_gstreamer();
    let long_description = "a".repeat(MAX_PIPELINE_DESCRIPTION_LENGTH + 1);
    match Pipeline::new(&long_description) {
        Err(PlayerError::InvalidPipeline(msg)) => assert!(msg.contains("too long")),
        _ => panic!("Expected InvalidPipeline error"),
    }
}

#[test]
fn test_pipeline_new_unknown_element_is_media_error() {
    init_gstreamer();
    let result = Pipeline::new("invalid_element_xyz ! fakesink");
    assert!(matches!(result, Err(PlayerError::MediaNotSupported(_))));
}

#[test]
fn test_pipeline_new_valid_description_succeeds() {
    init_gstreamer();
    let pipeline = Pipeline::new("fakesrc ! fakesink").unwrap();
    assert_eq!(pipeline.description(), "fakesrc ! fakesink");
    assert!(pipeline.bus().is_some());
}

#[test]
fn test_pipeline_new_wraps_single_element() {
    init_gstreamer();
    let pipeline = Pipeline::new("fakesrc name=lonely").unwrap();
    assert!(pipeline.element("lonely").is_some());
    assert!(pipeline.bus().is_some());
}

// =============================================================================
// is_media_not_supported_error() tests
// =============================================================================

#[test]
fn test_is_media_not_supported_error_by_domain() {
    let error = gst::glib::Error::new(gst::ParseError::NoSuchElement, "no element \"airplaysrc\"");
    assert_eq!(
        is_media_not_supported_error(&error).as_deref(),
        Some("no element \"airplaysrc\"")
    );

    let error = gst::glib::Error::new(gst::CoreError::MissingPlugin, "whatever");
    assert!(is_media_not_supported_error(&error).is_some());
}

#[test]
fn test_is_media_not_supported_error_by_message() {
    for msg in ["No decoder available for video/x-h265", "MISSING PLUGIN for avdec_h264"] {
        let error = gst::glib::Error::new(gst::CoreError::Failed, msg);
        assert!(
            is_media_not_supported_error(&error).is_some(),
            "Expected media error for: {}",
            msg
        );
    }
}

#[test]
fn test_is_media_not_supported_error_unrelated_returns_none() {
    let error = gst::glib::Error::new(gst::ParseError::Syntax, "syntax error");
    assert!(is_media_not_supported_error(&error).is_none());
}

#[test]
fn test_is_media_not_supported_error_ignores_generic_unsupported_wording() {
    for msg in [
        "unsupported syntax near '!'",
        "link between queue and h264parse not supported",
    ] {
        let error = gst::glib::Error::new(gst::ParseError::Link, msg);
        assert!(
            is_media_not_supported_error(&error).is_none(),
            "Unexpected media error for: {}",
            msg
        );
    }
}

// =============================================================================
// State tests
// =============================================================================

#[test]
fn test_pipeline_initial_state_is_null() {
    init_gstreamer();
    let pipeline = Pipeline::new("fakesrc ! fakesink").unwrap();
    assert_eq!(pipeline.state(), PipelineState::Null);
}

#[test]
fn test_pipeline_state_changes() {
    init_gstreamer();
    let pipeline = Pipeline::new("fakesrc ! fakesink").unwrap();

    assert!(pipeline.set_state(PipelineState::Ready).is_ok());
    assert!(pipeline.play().is_ok());
    assert!(pipeline.stop().is_ok());
    assert_eq!(pipeline.state(), PipelineState::Null);
}

#[test]
fn test_pipeline_shutdown_flag() {
    init_gstreamer();
    let pipeline = Pipeline::new("fakesrc ! fakesink").unwrap();
    let flag = pipeline.shutdown_flag();
    assert!(!flag.load(std::sync::atomic::Ordering::Acquire));

    pipeline.signal_shutdown();

    assert!(flag.load(std::sync::atomic::Ordering::Acquire));
}

// =============================================================================
// Property watch tests
// =============================================================================

#[test]
fn test_watch_property_missing_element() {
    init_gstreamer();
    let mut pipeline = Pipeline::new("fakesrc ! fakesink").unwrap();
    let (tx, _rx) = create_message_channel();

    let result = pipeline.watch_property("source", "connected", tx);
    assert!(matches!(result, Err(PlayerError::ElementNotFound(name)) if name == "source"));
}

#[test]
fn test_watch_property_missing_property() {
    init_gstreamer();
    let mut pipeline = Pipeline::new("fakesrc name=source ! fakesink").unwrap();
    let (tx, _rx) = create_message_channel();

    let result = pipeline.watch_property("source", "connected", tx);
    assert!(matches!(result, Err(PlayerError::PropertyNotFound { .. })));
}

#[test]
fn test_watch_property_forwards_changes() {
    init_gstreamer();
    let mut pipeline = Pipeline::new("fakesrc name=source ! fakesink").unwrap();
    let (tx, mut rx) = create_message_channel();

    pipeline.watch_property("source", "silent", tx).unwrap();
    pipeline.element("source").unwrap().set_property("silent", false);

    assert_eq!(
        rx.try_recv().unwrap(),
        BusMessage::PropertyChanged {
            element: "source".to_string(),
            property: "silent".to_string(),
            value: "false".to_string(),
        }
    );
}

// =============================================================================
// Bus watcher tests
// =============================================================================

#[tokio::test]
async fn test_bus_watch_forwards_posted_messages_in_order() {
    init_gstreamer();
    let mut pipeline = Pipeline::new("fakesrc ! fakesink").unwrap();
    let (tx, mut rx) = create_message_channel();

    let bus = pipeline.bus().unwrap();
    bus.post(gst::message::Warning::new(gst::CoreError::Clock, "late"))
        .unwrap();
    bus.post(gst::message::Eos::new()).unwrap();

    let task = Pipeline::start_bus_watch(bus, tx, pipeline.shutdown_flag(), pipeline.downgrade());
    pipeline.set_bus_task(task);

    let first = tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .unwrap()
        .unwrap();
    assert!(matches!(first, BusMessage::Warning { ref message, .. } if message == "late"));

    let second = tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(second, BusMessage::Eos);
}

#[tokio::test]
async fn test_bus_watch_stops_on_shutdown_flag() {
    init_gstreamer();
    let pipeline = Pipeline::new("fakesrc ! fakesink").unwrap();
    let (tx, _rx) = create_message_channel();

    let task = Pipeline::start_bus_watch(
        pipeline.bus().unwrap(),
        tx,
        pipeline.shutdown_flag(),
        pipeline.downgrade(),
    );
    pipeline.signal_shutdown();

    tokio::time::timeout(Duration::from_secs(5), task)
        .await
        .expect("bus watcher did not stop")
        .unwrap();
}

#[test]
fn test_drop_sets_null_state() {
    init_gstreamer();
    let pipeline = Pipeline::new("fakesrc ! fakesink").unwrap();
    pipeline.play().unwrap();
    let weak = pipeline.downgrade();

    drop(pipeline);

    if let Some(p) = weak.upgrade() {
        let (_result, current, _pending) = p.state(gst::ClockTime::ZERO);
        assert_eq!(current, gst::State::Null);
    }
}
