//! Generation provider module - model catalog and the Runware client

pub mod catalog;
pub mod runware;
pub mod traits;

pub use runware::RunwareClient;
pub use traits::ImageGenerator;
