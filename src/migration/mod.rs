// ABOUTME: Dump transformation module
// ABOUTME: Classifies, orders, and translates statements from a sqlite3 dump

pub mod classify;
pub mod order;
pub mod translate;

pub use classify::{classify, SplitDump};
pub use order::{order_by_dependency, OrderedRows};
pub use translate::{
    convert_hex_literals, sequence_reset_statements, translate_rows, translate_statement,
};
