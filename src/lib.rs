pub mod cloud;
pub mod loader;
pub mod models;
pub mod project;
pub mod providers;
pub mod validation;
