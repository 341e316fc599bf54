//! Subtran - Concurrent Subtitle Batch Translation
//!
//! Translates WebVTT/SRT caption files line by line through a
//! LibreTranslate-compatible service. Structural lines (header, cue timing and
//! blank lines) are copied through; every other line is dispatched
//! under one shared concurrency budget, cached by text and language, and
//! written back in its original position.

pub mod cli;
pub mod config;
pub mod context;
pub mod error;
pub mod error_log;
pub mod gate;
pub mod pipeline;
pub mod progress;
pub mod subtitle;
pub mod translate;
pub mod workflow;
