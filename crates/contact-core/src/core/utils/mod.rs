//! Stateless numerical helpers.

pub mod geometry;
