pub mod api;
pub mod events;
pub mod message;
pub mod models;
mod timestamp;
