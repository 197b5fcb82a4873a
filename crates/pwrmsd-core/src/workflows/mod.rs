//! # Workflows Module
//!
//! The top-level entry points of the library.
//!
//! - **Cycle Workflow** ([`cycle`]) - Build the pairwise table of one cycle and persist it
//! - **Driver** ([`driver`]) - Scan for invalid conformers once, then process a range of
//!   cycles in order, skipping cycles whose table already exists

pub mod cycle;
pub mod driver;
