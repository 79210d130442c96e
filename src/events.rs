//! Transport-independent inbound events and outbound replies.

use std::fmt;

use crate::catalog::{Diet, Slot};
use crate::store::UserKey;

/// Slash commands understood by the assistant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatCommand {
    Start,
    Help,
}

/// Inline buttons the assistant hands out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ButtonId {
    Healthy(bool),
    Diet(Diet),
    BuyAccess,
    Suggest(Slot),
}

impl ButtonId {
    /// Parse Telegram callback data
    pub fn parse(data: &str) -> Option<Self> {
        let button = match data {
            "healthy_yes" => ButtonId::Healthy(true),
            "healthy_no" => ButtonId::Healthy(false),
            "diet_meat" => ButtonId::Diet(Diet::Meat),
            "diet_fish" => ButtonId::Diet(Diet::Fish),
            "diet_veg" => ButtonId::Diet(Diet::Veg),
            "buy_access" => ButtonId::BuyAccess,
            "suggest_breakfast" => ButtonId::Suggest(Slot::Breakfast),
            "suggest_lunch" => ButtonId::Suggest(Slot::Lunch),
            "suggest_dinner" => ButtonId::Suggest(Slot::Dinner),
            _ => return None,
        };
        Some(button)
    }

    /// Callback data carried by the button
    pub fn callback_data(self) -> &'static str {
        match self {
            ButtonId::Healthy(true) => "healthy_yes",
            ButtonId::Healthy(false) => "healthy_no",
            ButtonId::Diet(Diet::Meat) => "diet_meat",
            ButtonId::Diet(Diet::Fish) => "diet_fish",
            ButtonId::Diet(Diet::Veg) => "diet_veg",
            ButtonId::BuyAccess => "buy_access",
            ButtonId::Suggest(Slot::Breakfast) => "suggest_breakfast",
            ButtonId::Suggest(Slot::Lunch) => "suggest_lunch",
            ButtonId::Suggest(Slot::Dinner) => "suggest_dinner",
        }
    }
}

impl fmt::Display for ButtonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.callback_data())
    }
}

/// One normalized event from the messaging transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundEvent {
    Text { user: UserKey, text: String },
    Button { user: UserKey, button: ButtonId },
    Command { user: UserKey, command: ChatCommand },
}

impl InboundEvent {
    pub fn user(&self) -> UserKey {
        match self {
            InboundEvent::Text { user, .. }
            | InboundEvent::Button { user, .. }
            | InboundEvent::Command { user, .. } => *user,
        }
    }
}

/// Button set attached to a reply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyboard {
    Health,
    Diet,
    Payment,
    TimeSuggestions,
}

impl Keyboard {
    /// Buttons of the keyboard, row by row
    pub fn rows(self) -> Vec<Vec<ButtonId>> {
        match self {
            Keyboard::Health => vec![vec![ButtonId::Healthy(true), ButtonId::Healthy(false)]],
            Keyboard::Diet => vec![vec![
                ButtonId::Diet(Diet::Meat),
                ButtonId::Diet(Diet::Fish),
                ButtonId::Diet(Diet::Veg),
            ]],
            Keyboard::Payment => vec![vec![ButtonId::BuyAccess]],
            Keyboard::TimeSuggestions => vec![vec![
                ButtonId::Suggest(Slot::Breakfast),
                ButtonId::Suggest(Slot::Lunch),
                ButtonId::Suggest(Slot::Dinner),
            ]],
        }
    }
}

/// What the assistant wants sent back to the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub keyboard: Option<Keyboard>,
}

impl Reply {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            keyboard: None,
        }
    }

    pub fn with_keyboard(text: impl Into<String>, keyboard: Keyboard) -> Self {
        Self {
            text: text.into(),
            keyboard: Some(keyboard),
        }
    }
}
