//! # Engine Module
//!
//! The stateful part of the calculator: contact accumulation over frames.
//!
//! - **Configuration** ([`config`]) - Run parameters and their builder
//! - **Contact Matrix** ([`matrix`]) - Per-pair counters and the finalized [`matrix::ContactAnalysis`]
//! - **Trajectory Driver** ([`driver`]) - Single-frame and streaming accumulation
//! - **Progress Monitoring** ([`progress`]) - Callback-based progress events
//! - **Error Handling** ([`error`]) - Engine-level error aggregation

pub mod config;
pub mod driver;
pub mod error;
pub mod matrix;
pub mod progress;
