//! frametrim - batch frame-accurate trimming of multi-camera recordings
//!
//! This library crate exposes the core functionality for integration testing.

pub mod batch;
pub mod config;
pub mod manifest;
