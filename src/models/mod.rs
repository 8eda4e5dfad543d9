pub mod api;

// Re-export commonly used types
pub use api::{Api, Autoscaling, Compute, Predictor, PredictorType, Tracker, UpdateStrategy};
