use clap::ValueEnum;
use std::io::{self, Write};

mod auth;
mod cart;
mod config_cmd;
mod ingredient;
mod mealplan;
mod pantry;
mod recipe;

pub use auth::AuthCommand;
pub use cart::CartCommand;
pub use config_cmd::ConfigCommand;
pub use ingredient::IngredientCommand;
pub use mealplan::MealPlanCommand;
pub use pantry::PantryCommand;
pub use recipe::RecipeCommand;

#[derive(Clone, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Shortens `s` to `width` characters for table columns.
fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() > width {
        let head: String = s.chars().take(width.saturating_sub(3)).collect();
        format!("{}...", head)
    } else {
        s.to_string()
    }
}

/// Asks a yes/no question on stdin. Anything but "y" is a no.
fn confirm(prompt: &str) -> io::Result<bool> {
    print!("{} [y/N] ", prompt);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().eq_ignore_ascii_case("y"))
}

/// Reads a line from stdin after printing `prompt`.
fn prompt_line(prompt: &str) -> io::Result<String> {
    print!("{}", prompt);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim_end_matches(['\r', '\n']).to_string())
}
