// mysql-distill - MySQL Statement Fingerprinting Library
//!
//! Distills raw SQL statements into canonical fingerprints (verb sequence plus
//! the tables touched) for grouping query logs by shape. The engine is a set
//! of ordered, precompiled pattern rules rather than a SQL grammar: it never
//! fails and degrades to partial output on input it does not understand.

pub mod cli;
pub mod distill;


// Re-export the engine surface
pub use distill::{
    Verbs, distill, distill_verbs, distill_with_tables, fold_digits, get_tables, strip_comments,
};
