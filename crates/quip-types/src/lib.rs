pub mod api;
pub mod models;

pub use models::{MessageDoc, ResponseKind, User};
