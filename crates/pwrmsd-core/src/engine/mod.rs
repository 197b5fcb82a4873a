//! # Engine Module
//!
//! The stateful layer between the stateless [`crate::core`] building blocks and the
//! [`crate::workflows`] entry points.
//!
//! - **Configuration** ([`config`]) - The molecule, its conformer counts, directories, and alignment options
//! - **Path Layout** ([`layout`]) - Mapping of conformer identifiers to geometry, result, and table paths
//! - **Invalid Conformers** ([`invalid`]) - Detection of conformers whose downstream result is missing
//! - **Tasks** ([`tasks`]) - The parallel computation of one table row
//! - **Progress** ([`progress`]) - Callback-based progress reporting
//! - **Errors** ([`error`]) - The error type shared by engine and workflows

pub mod config;
pub mod error;
pub mod invalid;
pub mod layout;
pub mod progress;
pub mod tasks;
