//! Classification and aggregation of order lines

pub mod aggregate;
pub mod classifier;
pub mod projector;

pub use classifier::Classifier;
pub use projector::project;
