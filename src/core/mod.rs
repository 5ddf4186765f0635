//! Core data structures.
//!
//! - Host platform conventions (triplet, file extensions)
//! - Project layout and `.jucer` discovery
//! - Staged library naming
//! - Projucer documents

pub mod jucer;
pub mod library;
pub mod platform;
pub mod project;

pub use jucer::{JucerDocument, JucerError, JucerPatch, PatchSummary, SearchList};
pub use library::{StagedLibraries, TargetFamily};
pub use platform::Platform;
pub use project::Project;
