//! # Workflows Module
//!
//! High-level entry points tying the [`core`](crate::core) and
//! [`engine`](crate::engine) layers together.
//!
//! - **Contact Workflow** ([`contact`]) - Loads a structure, resolves both
//!   selections, and accumulates contacts over a single frame or a trajectory.

pub mod contact;
