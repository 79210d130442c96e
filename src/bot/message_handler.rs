//! Message Handler module for processing incoming Telegram messages

use anyhow::Result;
use std::sync::Arc;
use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;
use tracing::{debug, error};

use crate::assistant::CookingAssistant;
use crate::config::UiConfig;
use crate::events::{ChatCommand, InboundEvent};
use crate::localization::t;
use crate::store::UserKey;

use super::send_reply;

#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(rename_rule = "lowercase", description = "Доступные команды:")]
pub enum Command {
    #[command(description = "начать работу с ботом")]
    Start,
    #[command(description = "как пользоваться ботом")]
    Help,
}

impl From<Command> for ChatCommand {
    fn from(command: Command) -> Self {
        match command {
            Command::Start => ChatCommand::Start,
            Command::Help => ChatCommand::Help,
        }
    }
}

/// Handle `/start` and `/help`
pub async fn command_handler(
    bot: Bot,
    msg: Message,
    cmd: Command,
    assistant: Arc<CookingAssistant>,
    ui: UiConfig,
) -> Result<()> {
    let Some(user) = sender(&msg) else {
        return Ok(());
    };
    debug!(user_id = %user, command = ?cmd, "Received command from user");

    let event = InboundEvent::Command {
        user,
        command: cmd.into(),
    };
    if let Some(reply) = assistant.handle(event).await {
        if let Err(e) = send_reply(&bot, msg.chat.id, reply, &assistant, &ui).await {
            error!(user_id = %user, error = %e, "Failed to send command reply");
            return Err(e);
        }
    }
    Ok(())
}

/// Handle any other message: text is a cooking request, everything else gets a hint
pub async fn message_handler(
    bot: Bot,
    msg: Message,
    assistant: Arc<CookingAssistant>,
    ui: UiConfig,
) -> Result<()> {
    let Some(user) = sender(&msg) else {
        debug!(chat_id = %msg.chat.id, "Ignoring message without sender");
        return Ok(());
    };

    let Some(text) = msg.text() else {
        debug!(user_id = %user, "Received unsupported message type from user");
        bot.send_message(msg.chat.id, t("unsupported-message")).await?;
        return Ok(());
    };

    debug!(user_id = %user, message_length = text.len(), "Received text message from user");
    let event = InboundEvent::Text {
        user,
        text: text.to_string(),
    };

    if let Some(reply) = assistant.handle(event).await {
        if let Err(e) = send_reply(&bot, msg.chat.id, reply, &assistant, &ui).await {
            error!(user_id = %user, error = %e, "Failed to send reply");
            return Err(e);
        }
    }
    Ok(())
}

fn sender(msg: &Message) -> Option<UserKey> {
    msg.from.as_ref().map(|user| UserKey(user.id.0))
}
