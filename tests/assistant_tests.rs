//! # Cooking Assistant Tests
//!
//! End-to-end flows through the orchestrator: preference questions, quota,
//! entitlement, caching and rate limiting. Time is driven explicitly.

use anyhow::Result;
use chrono::{DateTime, Duration, TimeZone, Utc};

use what_to_cook::access::Grant;
use what_to_cook::assistant::CookingAssistant;
use what_to_cook::catalog::{Catalog, Diet, Dish, Slot};
use what_to_cook::config::AccessPolicy;
use what_to_cook::dialogue::PreferenceDialogue;
use what_to_cook::events::{ButtonId, ChatCommand, InboundEvent, Keyboard, Reply};
use what_to_cook::localization::{t, t_args};
use what_to_cook::store::UserKey;

const USER: UserKey = UserKey(42);

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
}

fn assistant() -> CookingAssistant {
    CookingAssistant::new(Catalog::builtin().unwrap(), AccessPolicy::default())
}

fn text(user: UserKey, text: &str) -> InboundEvent {
    InboundEvent::Text {
        user,
        text: text.to_string(),
    }
}

fn button(user: UserKey, button: ButtonId) -> InboundEvent {
    InboundEvent::Button { user, button }
}

fn upsell() -> String {
    t_args("recommendation-upsell", &[("price", "299")])
}

/// Send a request and answer both preference questions
async fn full_cycle(
    assistant: &CookingAssistant,
    request: InboundEvent,
    healthy: bool,
    diet: Diet,
    now: DateTime<Utc>,
) -> Reply {
    let user = request.user();
    let question = assistant.handle_at(request, now).await.unwrap();
    assert_eq!(question.keyboard, Some(Keyboard::Health));

    let question = assistant
        .handle_at(button(user, ButtonId::Healthy(healthy)), now)
        .await
        .unwrap();
    assert_eq!(question.keyboard, Some(Keyboard::Diet));

    assistant
        .handle_at(button(user, ButtonId::Diet(diet)), now)
        .await
        .unwrap()
}

#[tokio::test]
async fn test_breakfast_request_scenario() -> Result<()> {
    let assistant = assistant();

    let reply = assistant
        .handle_at(text(USER, "что приготовить на завтрак?"), t0())
        .await
        .unwrap();
    assert_eq!(reply.text, t("ask-health"));
    assert_eq!(reply.keyboard, Some(Keyboard::Health));

    let record = assistant.users().snapshot(USER).await.unwrap();
    assert_eq!(record.dialogue, PreferenceDialogue::AwaitingHealth { pending_hour: 8 });

    let reply = assistant
        .handle_at(button(USER, ButtonId::Healthy(false)), t0())
        .await
        .unwrap();
    assert_eq!(reply.text, t("ask-diet"));
    assert_eq!(reply.keyboard, Some(Keyboard::Diet));

    let reply = assistant
        .handle_at(button(USER, ButtonId::Diet(Diet::Meat)), t0())
        .await
        .unwrap();
    assert!(reply.text.starts_with(&t("recommendation-header")));
    assert!(reply.text.contains("🔥 Яичница с беконом"));
    assert!(reply.text.contains("🔥 Блины с ветчиной и сыром"));
    assert!(reply.text.contains("🔥 Овсяная каша с ягодами"));
    assert_eq!(reply.text.matches("🔥").count(), 3);
    assert!(reply.text.ends_with(&upsell()));
    assert_eq!(reply.keyboard, None);

    let record = assistant.users().snapshot(USER).await.unwrap();
    assert_eq!(record.dialogue, PreferenceDialogue::Idle);
    assert_eq!(record.free_attempts_used, 1);
    assert!(record.cached.is_none());

    Ok(())
}

#[tokio::test]
async fn test_second_request_requires_payment() -> Result<()> {
    let assistant = assistant();
    full_cycle(&assistant, text(USER, "ужин"), true, Diet::Fish, t0()).await;

    let later = t0() + Duration::seconds(61);
    let reply = assistant
        .handle_at(text(USER, "ужин"), later)
        .await
        .unwrap();
    assert_eq!(reply.text, t_args("quota-exceeded", &[("price", "299")]));
    assert_eq!(reply.keyboard, Some(Keyboard::Payment));

    let record = assistant.users().snapshot(USER).await.unwrap();
    assert_eq!(record.dialogue, PreferenceDialogue::Idle);
    assert_eq!(record.free_attempts_used, 1);

    // Slot buttons are requests too
    let reply = assistant
        .handle_at(
            button(USER, ButtonId::Suggest(Slot::Lunch)),
            later + Duration::seconds(61),
        )
        .await
        .unwrap();
    assert_eq!(reply.keyboard, Some(Keyboard::Payment));

    Ok(())
}

#[tokio::test]
async fn test_rate_limited_request_has_no_side_effects() -> Result<()> {
    let assistant = assistant();
    assistant.handle_at(text(USER, "завтрак"), t0()).await.unwrap();
    let before = assistant.users().snapshot(USER).await.unwrap();

    let reply = assistant
        .handle_at(text(USER, "ужин"), t0() + Duration::seconds(30))
        .await
        .unwrap();
    assert_eq!(reply.text, t_args("rate-limited", &[("seconds", "30")]));
    assert_eq!(reply.keyboard, None);

    let after = assistant.users().snapshot(USER).await.unwrap();
    assert_eq!(after, before);
    assert_eq!(after.dialogue, PreferenceDialogue::AwaitingHealth { pending_hour: 8 });
    assert_eq!(after.last_request_at, Some(t0()));

    Ok(())
}

#[tokio::test]
async fn test_rate_limit_applies_to_entitled_users() -> Result<()> {
    let assistant = assistant();
    assistant.grant_entitlement(USER).await;

    assistant.handle_at(text(USER, "обед"), t0()).await.unwrap();
    let reply = assistant
        .handle_at(
            button(USER, ButtonId::Suggest(Slot::Dinner)),
            t0() + Duration::seconds(10),
        )
        .await
        .unwrap();
    assert_eq!(reply.text, t_args("rate-limited", &[("seconds", "50")]));

    Ok(())
}

#[tokio::test]
async fn test_purchase_then_cached_recommendation() -> Result<()> {
    let assistant = assistant();
    let first = full_cycle(&assistant, text(USER, "завтрак"), false, Diet::Meat, t0()).await;
    assert!(first.text.ends_with(&upsell()));

    let reply = assistant
        .handle_at(button(USER, ButtonId::BuyAccess), t0() + Duration::seconds(5))
        .await
        .unwrap();
    assert_eq!(reply.keyboard, Some(Keyboard::TimeSuggestions));
    assert!(reply.text.starts_with(&t("access-granted")));

    let second_at = t0() + Duration::seconds(61);
    let second = full_cycle(&assistant, text(USER, "завтрак"), false, Diet::Meat, second_at).await;
    assert!(!second.text.contains(&upsell()));
    assert!(second.text.contains("🔥 Яичница с беконом"));

    let cached = assistant.users().snapshot(USER).await.unwrap().cached.unwrap();
    assert_eq!(cached.produced_at, second_at);
    assert_eq!(cached.key.to_string(), "8_false_meat");

    let third_at = second_at + Duration::seconds(61);
    let third = full_cycle(&assistant, text(USER, "завтрак"), false, Diet::Meat, third_at).await;
    assert_eq!(third.text, second.text);

    // A hit does not refresh the entry
    let cached = assistant.users().snapshot(USER).await.unwrap().cached.unwrap();
    assert_eq!(cached.produced_at, second_at);

    Ok(())
}

#[tokio::test]
async fn test_entitled_cache_expires_and_misses_on_other_keys() -> Result<()> {
    let policy = AccessPolicy {
        rate_limit_secs: 0,
        ..Default::default()
    };
    let assistant = CookingAssistant::new(Catalog::builtin().unwrap(), policy);
    assistant.grant_entitlement(USER).await;

    full_cycle(&assistant, text(USER, "завтрак"), true, Diet::Veg, t0()).await;

    // Other answers, other key: the single entry is replaced
    let at = t0() + Duration::seconds(10);
    full_cycle(&assistant, text(USER, "завтрак"), false, Diet::Veg, at).await;
    let cached = assistant.users().snapshot(USER).await.unwrap().cached.unwrap();
    assert_eq!(cached.produced_at, at);
    assert_eq!(cached.key.to_string(), "8_false_veg");

    let still_fresh = at + Duration::minutes(4) + Duration::seconds(59);
    full_cycle(&assistant, text(USER, "завтрак"), false, Diet::Veg, still_fresh).await;
    let cached = assistant.users().snapshot(USER).await.unwrap().cached.unwrap();
    assert_eq!(cached.produced_at, at);

    let expired = at + Duration::minutes(5) + Duration::seconds(1);
    full_cycle(&assistant, text(USER, "завтрак"), false, Diet::Veg, expired).await;
    let cached = assistant.users().snapshot(USER).await.unwrap().cached.unwrap();
    assert_eq!(cached.produced_at, expired);

    Ok(())
}

#[tokio::test]
async fn test_grant_is_idempotent() -> Result<()> {
    let assistant = assistant();
    full_cycle(&assistant, text(USER, "ужин"), true, Diet::Meat, t0()).await;

    assert_eq!(assistant.grant_entitlement(USER).await, Grant::Granted);
    let once = assistant.users().snapshot(USER).await.unwrap();
    assert!(once.entitled);
    assert_eq!(once.free_attempts_used, 0);
    assert!(once.cached.is_none());

    assert_eq!(assistant.grant_entitlement(USER).await, Grant::AlreadyGranted);
    let twice = assistant.users().snapshot(USER).await.unwrap();
    assert_eq!(once, twice);

    let reply = assistant
        .handle_at(button(USER, ButtonId::BuyAccess), t0())
        .await
        .unwrap();
    assert_eq!(reply.text, t("access-already-granted"));
    assert_eq!(reply.keyboard, None);

    Ok(())
}

#[tokio::test]
async fn test_entitled_users_are_not_limited_by_quota() -> Result<()> {
    let assistant = assistant();
    assistant.grant_entitlement(USER).await;

    for i in 0..3 {
        let now = t0() + Duration::seconds(61 * i);
        let reply = full_cycle(&assistant, text(USER, "обед"), true, Diet::Fish, now).await;
        assert!(reply.text.contains("🔥 Уха из судака"));
    }
    assert_eq!(
        assistant.users().snapshot(USER).await.unwrap().free_attempts_used,
        0
    );

    Ok(())
}

#[tokio::test]
async fn test_stale_answers_are_ignored() -> Result<()> {
    let assistant = assistant();

    assert!(assistant
        .handle_at(button(USER, ButtonId::Healthy(true)), t0())
        .await
        .is_none());
    assert!(assistant
        .handle_at(button(USER, ButtonId::Diet(Diet::Fish)), t0())
        .await
        .is_none());

    assistant.handle_at(text(USER, "ужин"), t0()).await.unwrap();
    // Diet before health is out of order
    assert!(assistant
        .handle_at(button(USER, ButtonId::Diet(Diet::Fish)), t0())
        .await
        .is_none());

    let reply = full_cycle_answers(&assistant, t0()).await;
    assert!(reply.text.contains("🔥 Лосось на пару с брокколи"));

    // The cycle is over, a repeated diet press is a duplicate
    assert!(assistant
        .handle_at(button(USER, ButtonId::Diet(Diet::Fish)), t0())
        .await
        .is_none());

    Ok(())
}

async fn full_cycle_answers(assistant: &CookingAssistant, now: DateTime<Utc>) -> Reply {
    assistant
        .handle_at(button(USER, ButtonId::Healthy(true)), now)
        .await
        .unwrap();
    assistant
        .handle_at(button(USER, ButtonId::Diet(Diet::Fish)), now)
        .await
        .unwrap()
}

#[tokio::test]
async fn test_slot_button_uses_representative_hour() -> Result<()> {
    let assistant = assistant();
    assistant
        .handle_at(button(USER, ButtonId::Suggest(Slot::Lunch)), t0())
        .await
        .unwrap();

    let record = assistant.users().snapshot(USER).await.unwrap();
    assert_eq!(record.dialogue, PreferenceDialogue::AwaitingHealth { pending_hour: 13 });

    Ok(())
}

#[tokio::test]
async fn test_users_are_independent() -> Result<()> {
    let assistant = assistant();
    let other = UserKey(7);

    full_cycle(&assistant, text(USER, "ужин"), true, Diet::Meat, t0()).await;
    let reply = full_cycle(&assistant, text(other, "ужин"), true, Diet::Meat, t0()).await;
    assert!(reply.text.ends_with(&upsell()));

    Ok(())
}

#[tokio::test]
async fn test_commands_bypass_limits() -> Result<()> {
    let assistant = assistant();
    for _ in 0..3 {
        let reply = assistant
            .handle_at(
                InboundEvent::Command {
                    user: USER,
                    command: ChatCommand::Start,
                },
                t0(),
            )
            .await
            .unwrap();
        assert!(reply.text.starts_with(&t("welcome-title")));
        assert!(reply.text.contains("299"));
        assert_eq!(reply.keyboard, Some(Keyboard::TimeSuggestions));
    }

    let help = assistant
        .handle_at(
            InboundEvent::Command {
                user: USER,
                command: ChatCommand::Help,
            },
            t0(),
        )
        .await
        .unwrap();
    assert!(help.text.starts_with(&t("help-title")));
    assert!(assistant.users().snapshot(USER).await.is_none());

    Ok(())
}

#[tokio::test]
async fn test_empty_slot_gets_apology() -> Result<()> {
    let catalog = Catalog::from_dishes(vec![Dish {
        name: "Каша".to_string(),
        recipe: "Сварить".to_string(),
        slot: Slot::Breakfast,
        healthy: true,
        diet: Diet::Veg,
    }]);
    let assistant = CookingAssistant::new(catalog, AccessPolicy::default());

    let reply = full_cycle(&assistant, text(USER, "ужин"), true, Diet::Meat, t0()).await;
    assert_eq!(reply.text, t("no-dishes"));
    assert_eq!(reply.keyboard, Some(Keyboard::TimeSuggestions));

    Ok(())
}

#[tokio::test]
async fn test_configured_allowance() -> Result<()> {
    let policy = AccessPolicy {
        free_attempts: 2,
        rate_limit_secs: 0,
        ..Default::default()
    };
    let assistant = CookingAssistant::new(Catalog::builtin().unwrap(), policy);

    full_cycle(&assistant, text(USER, "обед"), true, Diet::Veg, t0()).await;
    full_cycle(&assistant, text(USER, "обед"), true, Diet::Veg, t0()).await;
    let reply = assistant.handle_at(text(USER, "обед"), t0()).await.unwrap();
    assert_eq!(reply.keyboard, Some(Keyboard::Payment));

    Ok(())
}
