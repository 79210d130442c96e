use anyhow::Result;

use what_to_cook::catalog::{Diet, DietChoice};
use what_to_cook::dialogue::{PreferenceAnswer, PreferenceDialogue};
use what_to_cook::errors::RequestError;

/// Test dialogue state serialization
#[tokio::test]
async fn test_dialogue_state_serialization() -> Result<()> {
    let state = PreferenceDialogue::AwaitingDiet {
        pending_hour: 19,
        healthy: true,
    };

    let json = serde_json::to_string(&state)?;
    let restored: PreferenceDialogue = serde_json::from_str(&json)?;
    assert_eq!(restored, state);

    Ok(())
}

/// Test basic dialogue functionality
#[tokio::test]
async fn test_dialogue_functionality() -> Result<()> {
    let default_state = PreferenceDialogue::default();
    assert!(matches!(default_state, PreferenceDialogue::Idle));
    assert!(!default_state.is_pending());

    let mut state = default_state;
    state.begin(13);
    assert!(state.is_pending());

    state.answer_health(true)?;
    let resolved = state.answer_diet(Diet::Fish)?;
    assert_eq!(resolved.hour, 13);
    assert_eq!(
        resolved.preferences,
        PreferenceAnswer {
            healthy: true,
            diet: DietChoice::Fish,
        }
    );
    assert!(!state.is_pending());

    Ok(())
}

/// Unit test for repeated answers
#[test]
fn test_repeated_health_answer_is_stale() {
    let mut state = PreferenceDialogue::default();
    state.begin(8);
    state.answer_health(false).unwrap();

    assert_eq!(state.answer_health(true), Err(RequestError::StaleSessionEvent));
    // The first answer is kept
    assert_eq!(
        state,
        PreferenceDialogue::AwaitingDiet {
            pending_hour: 8,
            healthy: false
        }
    );
}
