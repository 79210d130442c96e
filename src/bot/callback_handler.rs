//! Callback Handler module for processing inline keyboard callback queries

use anyhow::Result;
use std::sync::Arc;
use teloxide::prelude::*;
use tracing::{debug, error, warn};

use crate::access::Grant;
use crate::assistant::{purchase_reply, CookingAssistant};
use crate::config::UiConfig;
use crate::events::{ButtonId, InboundEvent};
use crate::localization::t;
use crate::store::UserKey;

use super::send_reply;

/// Handle callback queries from inline keyboards
pub async fn callback_handler(
    bot: Bot,
    q: CallbackQuery,
    assistant: Arc<CookingAssistant>,
    ui: UiConfig,
) -> Result<()> {
    let user = UserKey(q.from.id.0);
    let data = q.data.as_deref().unwrap_or("");
    debug!(user_id = %user, data, "Received callback query from user");

    let Some(button) = ButtonId::parse(data) else {
        warn!(user_id = %user, data, "Unknown callback data");
        bot.answer_callback_query(q.id.clone()).await?;
        return Ok(());
    };

    // Replies go to the chat holding the keyboard, or to the user directly
    let chat_id = q
        .message
        .as_ref()
        .map(|msg| msg.chat().id)
        .unwrap_or_else(|| ChatId::from(q.from.id));

    let reply = if button == ButtonId::BuyAccess {
        // Payment is confirmed here; the alert mirrors the outcome
        let grant = assistant.grant_entitlement(user).await;
        let alert = match grant {
            Grant::Granted => t("access-thanks"),
            Grant::AlreadyGranted => t("access-already-granted"),
        };
        bot.answer_callback_query(q.id.clone())
            .text(alert)
            .show_alert(true)
            .await?;
        match grant {
            Grant::Granted => Some(purchase_reply(grant)),
            Grant::AlreadyGranted => None,
        }
    } else {
        let reply = assistant
            .handle(InboundEvent::Button { user, button })
            .await;
        bot.answer_callback_query(q.id.clone()).await?;
        reply
    };

    if let Some(reply) = reply {
        if let Err(e) = send_reply(&bot, chat_id, reply, &assistant, &ui).await {
            error!(user_id = %user, error = %e, "Failed to send callback reply");
            return Err(e);
        }
    }

    Ok(())
}
