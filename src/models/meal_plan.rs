use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::meal_type::MealType;
use super::user::Author;
use super::wire::{lenient_date, record_serde};
use super::Owned;

/// A recipe scheduled into a meal slot.
///
/// Meals reference recipes by id; titles are resolved at display time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PlannedMeal {
    pub meal_type: MealType,
    pub recipe_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipe_title: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MealPlanDay {
    /// 1-based day index within the plan
    pub day: u32,
    #[serde(default)]
    pub meals: Vec<PlannedMeal>,
}

/// A multi-day meal plan.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(remote = "Self", rename_all = "camelCase")]
pub struct MealPlan {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub days: Vec<MealPlanDay>,
    #[serde(default)]
    pub is_public: bool,
    #[serde(default, deserialize_with = "lenient_date")]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub author: Option<Author>,
}

record_serde!(MealPlan);

impl MealPlan {
    /// Every recipe id referenced by the plan, in day order.
    pub fn recipe_ids(&self) -> Vec<&str> {
        self.days
            .iter()
            .flat_map(|day| day.meals.iter().map(|meal| meal.recipe_id.as_str()))
            .collect()
    }
}

impl Owned for MealPlan {
    fn owner_ids(&self) -> Vec<&str> {
        self.user_id
            .as_deref()
            .into_iter()
            .chain(self.author.as_ref().map(Author::id))
            .collect()
    }
}

impl fmt::Display for MealPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title)?;
        if let Some(description) = &self.description {
            writeln!(f, "{}", description)?;
        }
        if let Some(start) = self.start_date {
            writeln!(f, "Starts: {}", start)?;
        }

        for day in &self.days {
            writeln!(f, "\nDay {}:", day.day)?;
            for meal in &day.meals {
                let title = meal.recipe_title.as_deref().unwrap_or(&meal.recipe_id);
                writeln!(f, "  {:<10} {}", meal.meal_type.to_string(), title)?;
            }
        }

        Ok(())
    }
}

/// Fields for creating or updating a meal plan.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MealPlanDraft {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub days: Vec<MealPlanDay>,
    pub is_public: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
}

impl MealPlanDraft {
    pub fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("Meal plan title is required".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> MealPlan {
        serde_json::from_value(serde_json::json!({
            "_id": "p1",
            "title": "Week one",
            "startDate": "2025-01-06",
            "userId": "u1",
            "days": [
                { "day": 1, "meals": [
                    { "mealType": "breakfast", "recipeId": "r1", "recipeTitle": "Oats" },
                    { "mealType": "dinner", "recipeId": "r2" }
                ]},
                { "day": 2, "meals": [{ "mealType": "lunch", "recipeId": "r3" }] }
            ]
        }))
        .unwrap()
    }

    #[test]
    fn test_meal_plan_parses() {
        let plan = sample();
        assert_eq!(plan.id, "p1");
        assert_eq!(plan.start_date, NaiveDate::from_ymd_opt(2025, 1, 6));
        assert_eq!(plan.recipe_ids(), vec!["r1", "r2", "r3"]);
        assert!(plan.is_owned_by("u1"));
    }

    #[test]
    fn test_meal_plan_start_date_as_timestamp() {
        let plan: MealPlan = serde_json::from_value(serde_json::json!({
            "_id": "p2",
            "id": "p2",
            "title": "Week two",
            "startDate": "2026-05-04T00:00:00.000Z",
            "author": { "_id": "u1", "id": "u1", "name": "Ana" }
        }))
        .unwrap();

        assert_eq!(plan.id, "p2");
        assert_eq!(plan.start_date, NaiveDate::from_ymd_opt(2026, 5, 4));
        assert!(plan.is_owned_by("u1"));
    }

    #[test]
    fn test_meal_plan_display() {
        let output = format!("{}", sample());
        assert!(output.contains("Week one"));
        assert!(output.contains("Day 2:"));
        assert!(output.contains("Oats"));
        assert!(output.contains("r2"));
    }

    #[test]
    fn test_draft_requires_title() {
        assert!(MealPlanDraft::default().validate().is_err());
        let draft = MealPlanDraft {
            title: "Plan".to_string(),
            ..Default::default()
        };
        assert!(draft.validate().is_ok());
    }
}
