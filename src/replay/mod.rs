// ABOUTME: Replay module: executes prepared statement blocks on the target
// ABOUTME: Exports the best-effort replay engine and the schema cleaner

pub mod clean;
pub mod engine;

pub use clean::{drop_all_tables, CleanSummary};
pub use engine::{replay, replay_block, BlockKind, BlockOutcome};
