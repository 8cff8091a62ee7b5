// ABOUTME: Command implementations for each migration phase
// ABOUTME: Exports the split, ingest, and clean commands

pub mod ingest;
pub mod split;

pub use ingest::{clean, ingest};
pub use split::split;
