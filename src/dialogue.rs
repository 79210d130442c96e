//! Preference dialogue: the two questions asked before every recommendation.

use serde::{Deserialize, Serialize};

use crate::catalog::{Diet, DietChoice};
use crate::errors::RequestError;

/// Where a user stands in the preference cycle
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PreferenceDialogue {
    #[default]
    Idle,
    AwaitingHealth {
        pending_hour: u32,
    },
    AwaitingDiet {
        pending_hour: u32,
        healthy: bool,
    },
}

/// Answers collected during one cycle
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreferenceAnswer {
    pub healthy: bool,
    pub diet: DietChoice,
}

/// A finished cycle: the hour of the original request plus the answers
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResolvedRequest {
    pub hour: u32,
    pub preferences: PreferenceAnswer,
}

impl PreferenceDialogue {
    /// Open a cycle for `hour`. Any cycle already in progress is replaced.
    pub fn begin(&mut self, hour: u32) {
        *self = PreferenceDialogue::AwaitingHealth { pending_hour: hour };
    }

    pub fn answer_health(&mut self, healthy: bool) -> Result<(), RequestError> {
        match *self {
            PreferenceDialogue::AwaitingHealth { pending_hour } => {
                *self = PreferenceDialogue::AwaitingDiet {
                    pending_hour,
                    healthy,
                };
                Ok(())
            }
            _ => Err(RequestError::StaleSessionEvent),
        }
    }

    /// Close the cycle and hand back what is needed to replay the request.
    pub fn answer_diet(&mut self, diet: Diet) -> Result<ResolvedRequest, RequestError> {
        match *self {
            PreferenceDialogue::AwaitingDiet {
                pending_hour,
                healthy,
            } => {
                *self = PreferenceDialogue::Idle;
                Ok(ResolvedRequest {
                    hour: pending_hour,
                    preferences: PreferenceAnswer {
                        healthy,
                        diet: diet.into(),
                    },
                })
            }
            _ => Err(RequestError::StaleSessionEvent),
        }
    }

    pub fn is_pending(&self) -> bool {
        !matches!(self, PreferenceDialogue::Idle)
    }
}
