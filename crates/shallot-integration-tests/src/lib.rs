//! Integration test crate for the shallot tooling.
//!
//! This crate carries no library code. It only holds integration tests
//! that exercise the full create / onion / unwrap flow across the
//! workspace crates.
