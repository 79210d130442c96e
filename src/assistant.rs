//! # Cooking Assistant
//!
//! The request orchestrator. Every inbound event, whatever transport it came
//! from, goes through [`CookingAssistant::handle_at`]:
//!
//! 1. Rate limit (text and slot-button requests only)
//! 2. Free quota, unless the user is entitled
//! 3. Preference questions (health, then diet)
//! 4. Cache lookup for entitled users
//! 5. Dish selection with a single universal fallback retry
//! 6. Rendering, upsell suffix or cache store
//!
//! Steps 1–3 run when a request arrives; steps 4–6 run when the last
//! preference answer arrives and the request is replayed.

use chrono::{DateTime, Local, Timelike, Utc};
use tracing::{debug, info, warn};

use crate::access::Grant;
use crate::catalog::{Catalog, Diet, Dish};
use crate::config::AccessPolicy;
use crate::dialogue::ResolvedRequest;
use crate::errors::RequestError;
use crate::events::{ButtonId, ChatCommand, InboundEvent, Keyboard, Reply};
use crate::localization::{t, t_args};
use crate::response_cache::CacheKey;
use crate::selector::select_with_fallback;
use crate::store::{UserKey, UserRecord, UserStore};
use crate::time_inference::{hour_to_slot, parse_hour};

pub struct CookingAssistant {
    catalog: Catalog,
    policy: AccessPolicy,
    users: UserStore,
}

impl CookingAssistant {
    pub fn new(catalog: Catalog, policy: AccessPolicy) -> Self {
        Self {
            catalog,
            policy,
            users: UserStore::new(),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn policy(&self) -> &AccessPolicy {
        &self.policy
    }

    pub fn users(&self) -> &UserStore {
        &self.users
    }

    /// Handle an event at the current time
    pub async fn handle(&self, event: InboundEvent) -> Option<Reply> {
        self.handle_at(event, Utc::now()).await
    }

    /// Handle an event at `now`. `None` means nothing should be sent.
    pub async fn handle_at(&self, event: InboundEvent, now: DateTime<Utc>) -> Option<Reply> {
        match event {
            InboundEvent::Command { command, .. } => Some(self.command_reply(command)),
            InboundEvent::Text { user, text } => {
                let current_hour = now.with_timezone(&Local).hour();
                let hour = parse_hour(&text, current_hour);
                debug!(user_id = %user, hour, "Inferred hour from text request");
                self.request_recommendation(user, hour, now).await
            }
            InboundEvent::Button { user, button } => match button {
                ButtonId::Suggest(slot) => {
                    self.request_recommendation(user, slot.representative_hour(), now)
                        .await
                }
                ButtonId::Healthy(healthy) => self.answer_health(user, healthy).await,
                ButtonId::Diet(diet) => self.answer_diet(user, diet, now).await,
                ButtonId::BuyAccess => {
                    let grant = self.grant_entitlement(user).await;
                    Some(purchase_reply(grant))
                }
            },
        }
    }

    /// Mark `user` as entitled. Safe to call more than once per payment.
    pub async fn grant_entitlement(&self, user: UserKey) -> Grant {
        let grant = self.users.lock(user).await.grant_entitlement();
        match grant {
            Grant::Granted => info!(user_id = %user, "Lifetime access granted"),
            Grant::AlreadyGranted => debug!(user_id = %user, "Access was already granted"),
        }
        grant
    }

    /// A new cooking request for `hour`: guards, then the first preference question
    async fn request_recommendation(
        &self,
        user: UserKey,
        hour: u32,
        now: DateTime<Utc>,
    ) -> Option<Reply> {
        let mut record = self.users.lock(user).await;

        if let Err(e) = record.check_rate_limit(now, &self.policy) {
            info!(user_id = %user, error = %e, "Request rejected by rate limit");
            return self.refusal_reply(&e);
        }

        if let Err(e) = record.check_quota(&self.policy) {
            info!(user_id = %user, error = %e, "Request rejected by quota");
            return self.refusal_reply(&e);
        }

        record.dialogue.begin(hour);
        debug!(user_id = %user, hour, "Asking for preferences");
        Some(Reply::with_keyboard(t("ask-health"), Keyboard::Health))
    }

    async fn answer_health(&self, user: UserKey, healthy: bool) -> Option<Reply> {
        let mut record = self.users.lock(user).await;
        match record.dialogue.answer_health(healthy) {
            Ok(()) => {
                debug!(user_id = %user, healthy, "Health preference recorded");
                Some(Reply::with_keyboard(t("ask-diet"), Keyboard::Diet))
            }
            Err(e) => {
                debug!(user_id = %user, error = %e, "Ignoring health answer");
                self.refusal_reply(&e)
            }
        }
    }

    async fn answer_diet(&self, user: UserKey, diet: Diet, now: DateTime<Utc>) -> Option<Reply> {
        let mut record = self.users.lock(user).await;
        match record.dialogue.answer_diet(diet) {
            Ok(resolved) => self.recommend(user, &mut record, resolved, now),
            Err(e) => {
                debug!(user_id = %user, error = %e, "Ignoring diet answer");
                self.refusal_reply(&e)
            }
        }
    }

    /// Replay of a request once preferences are known
    fn recommend(
        &self,
        user: UserKey,
        record: &mut UserRecord,
        request: ResolvedRequest,
        now: DateTime<Utc>,
    ) -> Option<Reply> {
        let key = CacheKey::new(request.hour, request.preferences);

        if let Some(cached) = record.cached_reply(&key, now, self.policy.cache_ttl()) {
            info!(user_id = %user, cache_key = %key, "Serving cached recommendation");
            return Some(Reply::text(cached));
        }

        let slot = hour_to_slot(request.hour);
        let dishes = match select_with_fallback(
            &self.catalog,
            slot,
            request.preferences.healthy,
            request.preferences.diet,
        ) {
            Ok(dishes) => dishes,
            Err(e) => {
                warn!(user_id = %user, error = %e, "Nothing to recommend");
                return self.refusal_reply(&e);
            }
        };

        let mut text = format_recommendation(&dishes);
        if record.entitled {
            record.remember_reply(key, text.clone(), now);
        } else {
            text.push_str(&t_args(
                "recommendation-upsell",
                &[("price", &self.policy.access_price_rub.to_string())],
            ));
        }

        info!(
            user_id = %user,
            slot = %slot,
            dishes = dishes.len(),
            entitled = record.entitled,
            "Recommendation sent"
        );
        Some(Reply::text(text))
    }

    fn command_reply(&self, command: ChatCommand) -> Reply {
        let price = self.policy.access_price_rub.to_string();
        let text = match command {
            ChatCommand::Start => format!(
                "{}\n\n{}\n{}\n{}\n{}\n\n{}",
                t("welcome-title"),
                t("welcome-intro"),
                t("welcome-example1"),
                t("welcome-example2"),
                t("welcome-example3"),
                t_args("welcome-pricing", &[("price", &price)])
            ),
            ChatCommand::Help => vec![
                t("help-title"),
                t("help-step1"),
                t("help-step2"),
                t("help-step3"),
                t("help-limits"),
                t_args("welcome-pricing", &[("price", &price)]),
            ]
            .join("\n\n"),
        };
        Reply::with_keyboard(text, Keyboard::TimeSuggestions)
    }

    /// Chat reply for a request that stopped early; stale answers get none
    fn refusal_reply(&self, error: &RequestError) -> Option<Reply> {
        let reply = match error {
            RequestError::RateLimited { retry_in_secs } => Reply::text(t_args(
                "rate-limited",
                &[("seconds", &retry_in_secs.to_string())],
            )),
            RequestError::QuotaExceeded => Reply::with_keyboard(
                t_args(
                    "quota-exceeded",
                    &[("price", &self.policy.access_price_rub.to_string())],
                ),
                Keyboard::Payment,
            ),
            RequestError::EmptySelection { .. } => {
                Reply::with_keyboard(t("no-dishes"), Keyboard::TimeSuggestions)
            }
            RequestError::StaleSessionEvent => return None,
        };
        Some(reply)
    }
}

/// Reply to a `buy_access` press
pub fn purchase_reply(grant: Grant) -> Reply {
    match grant {
        Grant::Granted => Reply::with_keyboard(
            format!("{}\n\n{}", t("access-granted"), t("access-granted-hint")),
            Keyboard::TimeSuggestions,
        ),
        Grant::AlreadyGranted => Reply::text(t("access-already-granted")),
    }
}

/// Render dishes as a list of name + recipe blocks
pub fn format_recommendation(dishes: &[&Dish]) -> String {
    let mut result = format!("{}\n\n", t("recommendation-header"));
    for dish in dishes {
        result.push_str(&format!("🔥 {}\n{}\n\n", dish.name, dish.recipe));
    }
    result
}
