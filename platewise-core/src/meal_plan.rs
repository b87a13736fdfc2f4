//! A day of meals as returned by the inference service.

use serde::{Deserialize, Serialize};

use crate::locale::Locale;

/// One meal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meal {
    /// Dish name.
    pub name: String,
    /// Estimated calories (kcal).
    pub calories: f64,
    /// Short description with nutrition notes.
    pub description: String,
}

/// Time-of-day slot a meal belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MealSlot {
    /// Morning meal.
    Breakfast,
    /// Midday meal.
    Lunch,
    /// Evening meal.
    Dinner,
}

impl MealSlot {
    /// Slots in the order they are eaten.
    #[must_use]
    pub fn all() -> &'static [MealSlot] {
        &[Self::Breakfast, Self::Lunch, Self::Dinner]
    }

    /// JSON key of this slot in the reply schema.
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Self::Breakfast => "breakfast",
            Self::Lunch => "lunch",
            Self::Dinner => "dinner",
        }
    }

    /// Label for the meal-plan view.
    #[must_use]
    pub fn label(self, locale: Locale) -> &'static str {
        match (self, locale) {
            (Self::Breakfast, Locale::Ko) => "아침",
            (Self::Lunch, Locale::Ko) => "점심",
            (Self::Dinner, Locale::Ko) => "저녁",
            (Self::Breakfast, Locale::En) => "Breakfast",
            (Self::Lunch, Locale::En) => "Lunch",
            (Self::Dinner, Locale::En) => "Dinner",
        }
    }
}

/// A full day of meals.
///
/// All three slots are always present; a plan is only ever replaced as a
/// whole.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MealPlan {
    /// Morning meal.
    pub breakfast: Meal,
    /// Midday meal.
    pub lunch: Meal,
    /// Evening meal.
    pub dinner: Meal,
    /// Total calories as reported by the service.
    pub total_calories: f64,
    /// Health tip.
    pub tips: String,
}

impl MealPlan {
    /// Meal for a slot.
    #[must_use]
    pub fn meal(&self, slot: MealSlot) -> &Meal {
        match slot {
            MealSlot::Breakfast => &self.breakfast,
            MealSlot::Lunch => &self.lunch,
            MealSlot::Dinner => &self.dinner,
        }
    }

    /// Meals in eating order.
    pub fn meals(&self) -> impl Iterator<Item = (MealSlot, &Meal)> {
        MealSlot::all().iter().map(move |slot| (*slot, self.meal(*slot)))
    }

    /// Sum of the per-meal calories.
    ///
    /// Informational only; `total_calories` is whatever the service reported
    /// and may disagree.
    #[must_use]
    pub fn sum_of_meal_calories(&self) -> f64 {
        self.meals().map(|(_, m)| m.calories).sum()
    }
}
