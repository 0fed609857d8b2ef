#![forbid(unsafe_code)]

pub mod catalog;
pub mod model;
pub mod scoring;

pub use catalog::ExerciseCatalog;
