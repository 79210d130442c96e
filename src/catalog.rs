//! # Dish Catalog Module
//!
//! Static lookup data for the recommendation engine. The built-in catalog is
//! a JSON document embedded into the binary; an external file with the same
//! schema can replace it. Every catalog is validated once at load time and is
//! never mutated afterwards.

use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::path::Path;

use crate::errors::CatalogError;

const BUILTIN_CATALOG: &str = include_str!("../data/dishes.json");

/// Meal slot a dish is meant for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Slot {
    Breakfast,
    Lunch,
    Dinner,
}

impl Slot {
    pub const ALL: [Slot; 3] = [Slot::Breakfast, Slot::Lunch, Slot::Dinner];

    /// Hour used when the user picks a slot with a button instead of writing a time
    pub fn representative_hour(self) -> u32 {
        match self {
            Slot::Breakfast => 8,
            Slot::Lunch => 13,
            Slot::Dinner => 19,
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Slot::Breakfast => "breakfast",
            Slot::Lunch => "lunch",
            Slot::Dinner => "dinner",
        };
        f.write_str(name)
    }
}

/// Main ingredient family of a dish
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Diet {
    Meat,
    Fish,
    Veg,
}

/// Diet requested by the user; `Any` leaves the diet unconstrained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DietChoice {
    Meat,
    Fish,
    Veg,
    Any,
}

impl DietChoice {
    pub fn admits(self, diet: Diet) -> bool {
        match self {
            DietChoice::Any => true,
            DietChoice::Meat => diet == Diet::Meat,
            DietChoice::Fish => diet == Diet::Fish,
            DietChoice::Veg => diet == Diet::Veg,
        }
    }
}

impl From<Diet> for DietChoice {
    fn from(diet: Diet) -> Self {
        match diet {
            Diet::Meat => DietChoice::Meat,
            Diet::Fish => DietChoice::Fish,
            Diet::Veg => DietChoice::Veg,
        }
    }
}

impl fmt::Display for DietChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DietChoice::Meat => "meat",
            DietChoice::Fish => "fish",
            DietChoice::Veg => "veg",
            DietChoice::Any => "any",
        };
        f.write_str(name)
    }
}

/// A single catalog entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dish {
    pub name: String,
    pub recipe: String,
    pub slot: Slot,
    pub healthy: bool,
    pub diet: Diet,
}

/// Read-only, ordered list of dishes
#[derive(Debug, Clone)]
pub struct Catalog {
    dishes: Vec<Dish>,
}

impl Catalog {
    /// Load the catalog embedded into the binary
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_json(BUILTIN_CATALOG)
    }

    /// Load and validate a catalog from a JSON file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        info!("Loading dish catalog from {}", path.display());
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Parse and validate a catalog from a JSON array of dishes
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let dishes: Vec<Dish> = serde_json::from_str(json)?;
        let catalog = Self::from_dishes(dishes);
        catalog.validate()?;
        info!("Dish catalog loaded with {} dishes", catalog.len());
        Ok(catalog)
    }

    /// Build a catalog without validation. Selection still works on a sparse
    /// catalog, it just may come back empty.
    pub fn from_dishes(dishes: Vec<Dish>) -> Self {
        Self { dishes }
    }

    /// Reject duplicate names and slots missing a healthy or non-healthy dish
    pub fn validate(&self) -> Result<(), CatalogError> {
        let mut names = HashSet::new();
        for dish in &self.dishes {
            if !names.insert(dish.name.as_str()) {
                return Err(CatalogError::DuplicateDish(dish.name.clone()));
            }
        }

        for slot in Slot::ALL {
            for healthy in [true, false] {
                let covered = self
                    .dishes
                    .iter()
                    .any(|d| d.slot == slot && d.healthy == healthy);
                if !covered {
                    return Err(CatalogError::MissingCombination { slot, healthy });
                }
            }
        }

        debug!("Catalog validation passed");
        Ok(())
    }

    pub fn dishes(&self) -> &[Dish] {
        &self.dishes
    }

    pub fn len(&self) -> usize {
        self.dishes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dishes.is_empty()
    }
}
