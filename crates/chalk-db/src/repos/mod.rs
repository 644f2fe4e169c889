//! Repository methods, implemented as `impl JournalService` blocks.

pub mod journal;
