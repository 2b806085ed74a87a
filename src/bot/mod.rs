//! Bot module for handling Telegram interactions
//!
//! This module is split into several submodules:
//! - `message_handler`: Turns incoming text messages into engine events
//! - `callback_handler`: Turns inline keyboard callback queries into engine events
//! - `ui_builder`: Creates inline keyboards from engine buttons
//! - `delivery`: Sends engine actions to users and to the channel

pub mod callback_handler;
pub mod delivery;
pub mod message_handler;
pub mod ui_builder;

// Re-export main handler functions for use in main.rs
pub use callback_handler::callback_handler;
pub use delivery::Delivery;
pub use message_handler::message_handler;
