//! Units of parallel work executed by the workflows.

pub mod pairwise_row;
