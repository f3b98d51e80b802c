//! Model point records and lookup

mod data;
pub mod loader;

pub use data::{ModelPoint, ModelPointStore, Sex};
pub use loader::{load_model_points, load_model_points_from_reader};
