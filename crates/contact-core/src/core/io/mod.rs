//! Provides input/output functionality for Gromacs file formats and contact reports.
//!
//! Structures are read through the [`traits::StructureFile`] interface, index
//! groups through [`ndx::GroupTable`], and trajectories through the
//! [`trajectory::TrajectorySource`] trait, whose implementations are chosen by
//! [`trajectory::open_trajectory`].

pub mod gro;
pub mod gro_traj;
pub mod ndx;
pub mod report;
pub mod traits;
pub mod trajectory;
pub mod xtc;
