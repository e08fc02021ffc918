//! # Contact Matrix Library
//!
//! Computes how often pairs of atoms from two selections are in contact over
//! the frames of a molecular dynamics trajectory. A contact is a minimum-image
//! distance strictly below a cutoff; the result is the fraction of frames in
//! which each pair was in contact.
//!
//! ## Architectural Philosophy
//!
//! The library follows a three-layer architecture:
//!
//! - **[`core`]: The Foundation.** Stateless data models (`Structure`, `Selection`),
//!   periodic geometry, Gromacs file formats (GRO, NDX, XTC), the contact report
//!   format, and the atom-selection language.
//!
//! - **[`engine`]: The Logic Core.** The `ContactMatrix` accumulator, the
//!   trajectory driver, run configuration, and progress reporting.
//!
//! - **[`workflows`]: The Public API.** [`workflows::contact::run`] ties the
//!   layers together into a complete calculation.

pub mod core;
pub mod engine;
pub mod workflows;
