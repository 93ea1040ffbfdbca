use clap::{Args, Subcommand};
use std::path::PathBuf;

use super::{confirm, truncate, OutputFormat};
use recipebox::models::{Difficulty, Recipe, RecipeDraft, RecipeIngredient};
use recipebox::service::Service;

#[derive(Args)]
pub struct RecipeCommand {
    #[command(subcommand)]
    pub command: RecipeSubcommand,
}

#[derive(Subcommand)]
pub enum RecipeSubcommand {
    /// List public recipes
    List {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,

        /// Filter by tag
        #[arg(long = "tag", value_name = "TAG")]
        tag: Option<String>,
    },

    /// Show a recipe's details
    Show {
        /// Recipe ID
        id: String,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// List your own recipes
    Mine {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// List your favorite recipes
    Favorites {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Create a recipe
    Create {
        /// Recipe title
        title: String,

        #[arg(long)]
        description: Option<String>,

        /// Ingredient as NAME[:QUANTITY[:UNIT]] (can be repeated)
        #[arg(long = "ingredient", short = 'i', value_name = "INGREDIENT")]
        ingredients: Vec<String>,

        /// Step (can be repeated, in order)
        #[arg(long = "step", value_name = "STEP")]
        steps: Vec<String>,

        /// Total time in minutes
        #[arg(long)]
        time: Option<u32>,

        #[arg(long)]
        category: Option<String>,

        /// Difficulty (easy, medium, hard)
        #[arg(long)]
        difficulty: Option<Difficulty>,

        /// Tags (can be repeated)
        #[arg(long = "tag", value_name = "TAG")]
        tags: Vec<String>,

        /// Make the recipe visible to everyone
        #[arg(long)]
        public: bool,

        /// Image file to upload
        #[arg(long)]
        image: Option<PathBuf>,
    },

    /// Delete one of your recipes
    Delete {
        /// Recipe ID
        id: String,

        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
    },
}

impl RecipeCommand {
    pub async fn run(&self, service: &Service) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            RecipeSubcommand::List { format, tag } => {
                let recipes = service.recipes().await?;

                let recipes: Vec<_> = if let Some(tag) = tag {
                    let tag_lower = tag.to_lowercase();
                    recipes
                        .into_iter()
                        .filter(|r| r.tags.iter().any(|t| t.to_lowercase() == tag_lower))
                        .collect()
                } else {
                    recipes
                };

                print_recipes(&recipes, format)
            }

            RecipeSubcommand::Show { id, format } => {
                let recipe = service.recipe(id).await?;
                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(&recipe)?);
                    }
                    OutputFormat::Text => {
                        println!("{}", recipe);
                    }
                }
                Ok(())
            }

            RecipeSubcommand::Mine { format } => {
                let recipes = service.my_recipes().await?;
                print_recipes(&recipes, format)
            }

            RecipeSubcommand::Favorites { format } => {
                let recipes = service.favorite_recipes().await?;
                print_recipes(&recipes, format)
            }

            RecipeSubcommand::Create {
                title,
                description,
                ingredients,
                steps,
                time,
                category,
                difficulty,
                tags,
                public,
                image,
            } => {
                let mut draft = RecipeDraft::new(title.trim());
                draft.description = description.clone().unwrap_or_default();
                draft.ingredients = ingredients
                    .iter()
                    .map(|s| parse_ingredient(s))
                    .collect::<Result<_, _>>()?;
                draft.steps = steps.clone();
                draft.time = *time;
                draft.category = category.clone();
                draft.difficulty = *difficulty;
                draft.tags = tags.clone();
                draft.is_public = *public;
                draft.image = image.clone();

                let created = service.create_recipe(&draft).await?;
                println!("Created recipe {}:", created.id);
                println!("{}", created);
                Ok(())
            }

            RecipeSubcommand::Delete { id, force } => {
                let recipe = service.recipe(id).await?;

                if !force && !confirm(&format!("Delete recipe '{}'?", recipe.title))? {
                    println!("Deletion cancelled.");
                    return Ok(());
                }

                service.delete_recipe(id).await?;
                println!("Deleted recipe: {}", recipe.title);
                Ok(())
            }
        }
    }
}

fn print_recipes(
    recipes: &[Recipe],
    format: &OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    if recipes.is_empty() {
        println!("No recipes found");
        return Ok(());
    }

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(recipes)?);
        }
        OutputFormat::Text => {
            println!("{:<24}  {:<30}  {:>6}  TAGS", "ID", "TITLE", "TIME");
            println!("{}", "-".repeat(80));
            for recipe in recipes {
                let time = recipe
                    .time
                    .map(|t| format!("{}m", t))
                    .unwrap_or_default();
                println!(
                    "{:<24}  {:<30}  {:>6}  {}",
                    recipe.id,
                    truncate(&recipe.title, 30),
                    time,
                    recipe.tags.join(", ")
                );
            }
            println!("\nTotal: {} recipe(s)", recipes.len());
        }
    }
    Ok(())
}

/// Parses `NAME[:QUANTITY[:UNIT]]`.
fn parse_ingredient(spec: &str) -> Result<RecipeIngredient, String> {
    let mut parts = spec.splitn(3, ':');
    let name = parts.next().unwrap_or_default().trim();
    if name.is_empty() {
        return Err(format!("Invalid ingredient '{}': name is required", spec));
    }

    let mut ingredient = RecipeIngredient::new(name);
    if let Some(quantity) = parts.next().map(str::trim).filter(|q| !q.is_empty()) {
        let quantity: f64 = quantity
            .parse()
            .map_err(|_| format!("Invalid quantity '{}' for {}", quantity, name))?;
        if quantity <= 0.0 {
            return Err(format!("Quantity for {} must be positive", name));
        }
        ingredient.quantity = Some(quantity);
    }
    if let Some(unit) = parts.next().map(str::trim).filter(|u| !u.is_empty()) {
        ingredient.unit = Some(unit.to_string());
    }
    Ok(ingredient)
}
