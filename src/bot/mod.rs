//! Bot module for handling Telegram interactions
//!
//! This module only translates between Telegram and the transport-independent
//! [`CookingAssistant`](crate::assistant::CookingAssistant):
//! - `message_handler`: text messages and slash commands
//! - `callback_handler`: inline keyboard callback queries
//! - `ui_builder`: inline keyboards for assistant replies

pub mod callback_handler;
pub mod message_handler;
pub mod ui_builder;

use std::sync::Arc;

use anyhow::Result;
use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;

use crate::assistant::CookingAssistant;
use crate::config::UiConfig;
use crate::events::Reply;

// Re-export main handler functions for use in main.rs
pub use callback_handler::callback_handler;
pub use message_handler::{command_handler, message_handler, Command};
pub use ui_builder::create_keyboard;

/// Update handler tree for the dispatcher
pub fn schema() -> teloxide::dispatching::UpdateHandler<anyhow::Error> {
    dptree::entry()
        .branch(
            Update::filter_message()
                .filter_command::<Command>()
                .endpoint(command_handler),
        )
        .branch(Update::filter_message().endpoint(message_handler))
        .branch(Update::filter_callback_query().endpoint(callback_handler))
}

/// Register the slash commands shown in the Telegram menu
pub async fn register_commands(bot: &Bot) -> Result<()> {
    bot.set_my_commands(Command::bot_commands()).await?;
    Ok(())
}

/// Send an assistant reply, rendering its keyboard if it has one
pub(crate) async fn send_reply(
    bot: &Bot,
    chat_id: ChatId,
    reply: Reply,
    assistant: &Arc<CookingAssistant>,
    ui: &UiConfig,
) -> Result<()> {
    let request = bot.send_message(chat_id, reply.text);
    match reply.keyboard {
        Some(keyboard) => {
            request
                .reply_markup(create_keyboard(
                    keyboard,
                    ui,
                    assistant.policy().access_price_rub,
                ))
                .await?;
        }
        None => {
            request.await?;
        }
    }
    Ok(())
}
