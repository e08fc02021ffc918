//! Provides the data models for molecular structures and atom selections.
//!
//! A [`structure::Structure`] owns the atoms and the coordinates of the current
//! frame, while a [`selection::Selection`] only stores indices into it. This keeps
//! selections valid while trajectory sources overwrite positions frame by frame.

pub mod atom;
pub mod selection;
pub mod structure;
