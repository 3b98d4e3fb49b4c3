//! End-to-end alias scenarios.

mod harness;
