pub mod error;
pub mod scene;
pub mod types;
