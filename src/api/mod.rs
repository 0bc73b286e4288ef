pub mod health;
pub mod routes;

pub use routes::{cors_layer, router, ApiState};
