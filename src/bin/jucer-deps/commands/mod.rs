//! Command implementations

pub mod bootstrap;
pub mod doctor;
pub mod patch;
