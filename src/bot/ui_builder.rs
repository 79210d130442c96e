//! UI Builder module for creating keyboards

use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};

use crate::catalog::{Diet, Slot};
use crate::config::UiConfig;
use crate::events::{ButtonId, Keyboard};
use crate::localization::{t, t_args};

/// Label shown on a button
pub fn button_label(button: ButtonId, access_price_rub: u32) -> String {
    match button {
        ButtonId::Healthy(true) => t("button-healthy-yes"),
        ButtonId::Healthy(false) => t("button-healthy-no"),
        ButtonId::Diet(Diet::Meat) => t("button-diet-meat"),
        ButtonId::Diet(Diet::Fish) => t("button-diet-fish"),
        ButtonId::Diet(Diet::Veg) => t("button-diet-veg"),
        ButtonId::BuyAccess => t_args(
            "button-buy-access",
            &[("price", &access_price_rub.to_string())],
        ),
        ButtonId::Suggest(Slot::Breakfast) => t("button-suggest-breakfast"),
        ButtonId::Suggest(Slot::Lunch) => t("button-suggest-lunch"),
        ButtonId::Suggest(Slot::Dinner) => t("button-suggest-dinner"),
    }
}

/// Create the inline keyboard for a reply, with the support link as the last row
pub fn create_keyboard(
    keyboard: Keyboard,
    ui: &UiConfig,
    access_price_rub: u32,
) -> InlineKeyboardMarkup {
    let mut rows: Vec<Vec<InlineKeyboardButton>> = keyboard
        .rows()
        .into_iter()
        .map(|row| {
            row.into_iter()
                .map(|button| {
                    InlineKeyboardButton::callback(
                        button_label(button, access_price_rub),
                        button.callback_data(),
                    )
                })
                .collect()
        })
        .collect();

    if let Some(url) = &ui.support_url {
        rows.push(vec![InlineKeyboardButton::url(
            t("button-support"),
            url.clone(),
        )]);
    }

    InlineKeyboardMarkup::new(rows)
}
