//! Crate-level tests for remock-syntax.

mod behaviour;
