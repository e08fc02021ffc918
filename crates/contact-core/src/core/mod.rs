//! # Core Module
//!
//! Stateless building blocks of the contact calculator.
//!
//! - **Molecular Representation** ([`models`]) - Atoms, structures, simulation boxes, and selections
//! - **File I/O** ([`io`]) - GRO structures, NDX index groups, XTC/GRO trajectories, and contact reports
//! - **Atom Selection** ([`select`]) - A small query language resolving expressions to [`models::selection::Selection`]s
//! - **Geometry** ([`utils`]) - Minimum-image distances in periodic boxes

pub mod io;
pub mod models;
pub mod select;
pub mod utils;
