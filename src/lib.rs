//! # What To Cook Telegram Bot
//!
//! A Telegram bot that suggests what to cook for breakfast, lunch or dinner.
//! It infers the meal time from free text, asks two preference questions,
//! and answers with up to three dishes and their recipes. The first
//! recommendation is free; after that the user buys lifetime access.

pub mod access;
pub mod assistant;
pub mod bot;
pub mod catalog;
pub mod config;
pub mod dialogue;
pub mod errors;
pub mod events;
pub mod localization;
pub mod response_cache;
pub mod selector;
pub mod store;
pub mod time_inference;
