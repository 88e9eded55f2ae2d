//! Discord side of the bot: slash commands, button presses and the
//! [`ChatSurface`](trawler_core::ChatSurface) implementation over serenity's
//! HTTP client.

pub mod commands;
pub mod handler;
pub mod surface;

pub use handler::Handler;
pub use surface::{ComponentResponder, SerenityChatSurface};
