//! File and stream IO: dataset CSV, persisted model artifacts, and the
//! stdin JSON batch protocol.

pub mod artifact;
pub mod batch;
pub mod dataset;
