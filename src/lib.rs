//! # RideShare Telegram Bot
//!
//! A Telegram bot that walks users through a short conversation to collect
//! a ride request or a ride offer, then publishes the finished listing to a
//! shared channel.

pub mod bot;
pub mod channel_post;
pub mod config;
pub mod dialogue;
pub mod engine;
pub mod events;
pub mod listing;
pub mod localization;
pub mod session_store;
pub mod validation;
