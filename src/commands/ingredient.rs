use clap::{Args, Subcommand};

use super::{truncate, OutputFormat};
use recipebox::service::Service;

#[derive(Args)]
pub struct IngredientCommand {
    #[command(subcommand)]
    pub command: IngredientSubcommand,
}

#[derive(Subcommand)]
pub enum IngredientSubcommand {
    /// List the ingredient catalog
    List {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,

        /// Filter by category
        #[arg(long)]
        category: Option<String>,

        /// Filter by name (case-insensitive substring)
        #[arg(long)]
        search: Option<String>,
    },

    /// Show one ingredient
    Show {
        /// Ingredient ID
        id: String,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },
}

impl IngredientCommand {
    pub async fn run(&self, service: &Service) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            IngredientSubcommand::List {
                format,
                category,
                search,
            } => {
                let category = category.as_ref().map(|c| c.to_lowercase());
                let search = search.as_ref().map(|s| s.to_lowercase());
                let ingredients: Vec<_> = service
                    .ingredients()
                    .await?
                    .into_iter()
                    .filter(|i| match &category {
                        Some(c) => i.category.as_deref().map(str::to_lowercase).as_ref() == Some(c),
                        None => true,
                    })
                    .filter(|i| match &search {
                        Some(s) => i.name.to_lowercase().contains(s.as_str()),
                        None => true,
                    })
                    .collect();

                if ingredients.is_empty() {
                    println!("No ingredients found");
                    return Ok(());
                }

                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(&ingredients)?);
                    }
                    OutputFormat::Text => {
                        println!("{:<24}  {:<30}  {:<16}  UNIT", "ID", "NAME", "CATEGORY");
                        println!("{}", "-".repeat(80));
                        for ingredient in &ingredients {
                            println!(
                                "{:<24}  {:<30}  {:<16}  {}",
                                ingredient.id,
                                truncate(&ingredient.name, 30),
                                ingredient.category.as_deref().unwrap_or(""),
                                ingredient.unit.as_deref().unwrap_or("")
                            );
                        }
                        println!("\nTotal: {} ingredient(s)", ingredients.len());
                    }
                }
                Ok(())
            }

            IngredientSubcommand::Show { id, format } => {
                let ingredient = service.ingredient(id).await?;
                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(&ingredient)?);
                    }
                    OutputFormat::Text => {
                        println!("{}", ingredient);
                        println!("  ID: {}", ingredient.id);
                    }
                }
                Ok(())
            }
        }
    }
}
