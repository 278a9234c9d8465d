//! Library components of the `basic-cleaning` pipeline stage.

pub mod logging;
pub mod pipeline;
pub mod staging;
