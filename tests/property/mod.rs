//! Property-based tests using proptest
//!
//! Tests invariants of validation, budgeting, classification and selection.

pub mod budget_tests;
pub mod selector_tests;
