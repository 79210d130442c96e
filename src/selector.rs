//! # Dish Selector Module
//!
//! Picks up to three dishes for a slot and a set of preferences. Exact
//! matches come first; if there are fewer than three, the list is topped up
//! with other dishes of the same slot, in catalog order.

use log::{debug, warn};

use crate::catalog::{Catalog, DietChoice, Dish, Slot};
use crate::errors::RequestError;

/// Maximum number of dishes in one recommendation
pub const MAX_SUGGESTIONS: usize = 3;

/// Select dishes for `slot` matching `healthy` and `diet`, topped up with same-slot dishes
pub fn select(catalog: &Catalog, slot: Slot, healthy: bool, diet: DietChoice) -> Vec<&Dish> {
    let dishes = catalog.dishes();
    let mut chosen: Vec<usize> = dishes
        .iter()
        .enumerate()
        .filter(|(_, d)| d.slot == slot && d.healthy == healthy && diet.admits(d.diet))
        .map(|(i, _)| i)
        .take(MAX_SUGGESTIONS)
        .collect();
    let exact = chosen.len();

    if chosen.len() < MAX_SUGGESTIONS {
        let fallback: Vec<usize> = dishes
            .iter()
            .enumerate()
            .filter(|(i, d)| d.slot == slot && !chosen.contains(i))
            .map(|(i, _)| i)
            .take(MAX_SUGGESTIONS - chosen.len())
            .collect();
        chosen.extend(fallback);
    }

    debug!(
        "Selected {} dishes for {} (healthy={}, diet={}): {} exact, {} fallback",
        chosen.len(),
        slot,
        healthy,
        diet,
        exact,
        chosen.len() - exact
    );

    chosen.into_iter().map(|i| &dishes[i]).collect()
}

/// [`select`] with a single retry using `healthy=true, diet=any` when nothing matched
pub fn select_with_fallback(
    catalog: &Catalog,
    slot: Slot,
    healthy: bool,
    diet: DietChoice,
) -> Result<Vec<&Dish>, RequestError> {
    let dishes = select(catalog, slot, healthy, diet);
    if !dishes.is_empty() {
        return Ok(dishes);
    }

    warn!("No dishes for {slot}, retrying with the universal fallback");
    let dishes = select(catalog, slot, true, DietChoice::Any);
    if dishes.is_empty() {
        warn!("Universal fallback found nothing for {slot}");
        return Err(RequestError::EmptySelection { slot });
    }
    Ok(dishes)
}
