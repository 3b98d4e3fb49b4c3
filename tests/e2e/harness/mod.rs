//! Scenario harness: a [`Scenario`] lists mutations and [`Assertion`]s, the
//! runner replays them against a workspace built from a fixture manifest.

// Not every builder method or assertion is used by every scenario file.
#![allow(dead_code)]

pub mod assertions;
pub mod runner;
pub mod scenario;
pub mod steps;
pub mod workspace;

pub use assertions::Assertion;
pub use scenario::Scenario;
