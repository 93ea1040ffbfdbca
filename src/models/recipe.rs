use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use super::user::Author;
use super::wire::record_serde;
use super::{Owned, RecipeIngredient};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            _ => Err(format!(
                "Invalid difficulty '{}'. Valid options: easy, medium, hard",
                s
            )),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(remote = "Self", rename_all = "camelCase")]
pub struct Recipe {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub steps: Vec<String>,
    #[serde(default)]
    pub ingredients: Vec<RecipeIngredient>,
    /// Minutes
    #[serde(default)]
    pub time: Option<u32>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub difficulty: Option<Difficulty>,
    #[serde(default)]
    pub is_public: bool,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub author: Option<Author>,
}

record_serde!(Recipe);

impl Owned for Recipe {
    fn owner_ids(&self) -> Vec<&str> {
        self.user_id
            .as_deref()
            .into_iter()
            .chain(self.author.as_ref().map(Author::id))
            .collect()
    }
}

impl fmt::Display for Recipe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title)?;
        if !self.description.is_empty() {
            writeln!(f, "{}", self.description)?;
        }
        if let Some(time) = self.time {
            writeln!(f, "Time: {} min", time)?;
        }
        if let Some(difficulty) = self.difficulty {
            writeln!(f, "Difficulty: {}", difficulty)?;
        }
        if !self.tags.is_empty() {
            writeln!(f, "Tags: {}", self.tags.join(", "))?;
        }

        if !self.ingredients.is_empty() {
            writeln!(f, "\nIngredients:")?;
            for ingredient in &self.ingredients {
                writeln!(f, "  - {}", ingredient)?;
            }
        }

        if !self.steps.is_empty() {
            writeln!(f, "\nSteps:")?;
            for (i, step) in self.steps.iter().enumerate() {
                writeln!(f, "  {}. {}", i + 1, step)?;
            }
        }

        Ok(())
    }
}

/// Fields for creating or updating a recipe.
///
/// Sent as JSON, or as a multipart form when `image` is set.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RecipeDraft {
    pub title: String,
    pub description: String,
    pub steps: Vec<String>,
    pub ingredients: Vec<RecipeIngredient>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<Difficulty>,
    pub is_public: bool,
    pub tags: Vec<String>,
    /// Local image file to upload
    #[serde(skip)]
    pub image: Option<PathBuf>,
}

impl RecipeDraft {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    /// Checks required fields before anything is sent.
    pub fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("Recipe title is required".to_string());
        }
        if self.ingredients.is_empty() {
            return Err("Add at least one ingredient".to_string());
        }
        if self.ingredients.iter().any(|i| i.name.trim().is_empty()) {
            return Err("Ingredient names cannot be empty".to_string());
        }
        Ok(())
    }
}

impl From<&Recipe> for RecipeDraft {
    fn from(recipe: &Recipe) -> Self {
        Self {
            title: recipe.title.clone(),
            description: recipe.description.clone(),
            steps: recipe.steps.clone(),
            ingredients: recipe.ingredients.clone(),
            time: recipe.time,
            category: recipe.category.clone(),
            difficulty: recipe.difficulty,
            is_public: recipe.is_public,
            tags: recipe.tags.clone(),
            image: None,
        }
    }
}
