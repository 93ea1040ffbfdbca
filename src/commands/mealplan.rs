use chrono::NaiveDate;
use clap::{Args, Subcommand};

use super::{truncate, OutputFormat};
use recipebox::models::{MealPlan, MealPlanDay, MealPlanDraft, MealType, PlannedMeal};
use recipebox::service::Service;

#[derive(Args)]
pub struct MealPlanCommand {
    #[command(subcommand)]
    pub command: MealPlanSubcommand,
}

#[derive(Subcommand)]
pub enum MealPlanSubcommand {
    /// List public meal plans
    List {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Show a meal plan day by day
    Show {
        /// Meal plan ID
        id: String,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// List your own meal plans
    Mine {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Create a meal plan
    Create {
        /// Plan title
        title: String,

        #[arg(long)]
        description: Option<String>,

        /// First day (YYYY-MM-DD)
        #[arg(long)]
        start: Option<String>,

        /// Meal as DAY:TYPE:RECIPE_ID, e.g. 1:dinner:abc123 (can be repeated)
        #[arg(long = "meal", value_name = "MEAL")]
        meals: Vec<String>,

        /// Make the plan visible to everyone
        #[arg(long)]
        public: bool,
    },

    /// Copy a meal plan into your own plans
    Clone {
        /// Meal plan ID
        id: String,
    },
}

impl MealPlanCommand {
    pub async fn run(&self, service: &Service) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            MealPlanSubcommand::List { format } => {
                let plans = service.meal_plans().await?;
                print_plans(&plans, format)
            }

            MealPlanSubcommand::Show { id, format } => {
                let mut plan = service.meal_plan(id).await?;
                resolve_titles(service, &mut plan).await;

                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(&plan)?);
                    }
                    OutputFormat::Text => {
                        println!("{}", plan);
                    }
                }
                Ok(())
            }

            MealPlanSubcommand::Mine { format } => {
                let plans = service.my_meal_plans().await?;
                print_plans(&plans, format)
            }

            MealPlanSubcommand::Create {
                title,
                description,
                start,
                meals,
                public,
            } => {
                let start_date = match start {
                    Some(d) => Some(
                        NaiveDate::parse_from_str(d, "%Y-%m-%d")
                            .map_err(|_| format!("Invalid date format: {}. Use YYYY-MM-DD", d))?,
                    ),
                    None => None,
                };

                let draft = MealPlanDraft {
                    title: title.trim().to_string(),
                    description: description.clone(),
                    days: parse_days(meals)?,
                    is_public: *public,
                    start_date,
                };

                let created = service.create_meal_plan(&draft).await?;
                println!("Created meal plan {}:", created.id);
                println!("{}", created);
                Ok(())
            }

            MealPlanSubcommand::Clone { id } => {
                let copy = service.clone_meal_plan(id).await?;
                println!("Cloned into your plans as {}: {}", copy.id, copy.title);
                Ok(())
            }
        }
    }
}

fn print_plans(plans: &[MealPlan], format: &OutputFormat) -> Result<(), Box<dyn std::error::Error>> {
    if plans.is_empty() {
        println!("No meal plans found");
        return Ok(());
    }

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(plans)?);
        }
        OutputFormat::Text => {
            println!("{:<24}  {:<30}  {:>4}  {:<10}  PUBLIC", "ID", "TITLE", "DAYS", "START");
            println!("{}", "-".repeat(82));
            for plan in plans {
                let start = plan
                    .start_date
                    .map(|d| d.to_string())
                    .unwrap_or_default();
                println!(
                    "{:<24}  {:<30}  {:>4}  {:<10}  {}",
                    plan.id,
                    truncate(&plan.title, 30),
                    plan.days.len(),
                    start,
                    if plan.is_public { "yes" } else { "no" }
                );
            }
            println!("\nTotal: {} plan(s)", plans.len());
        }
    }
    Ok(())
}

/// Fills in missing recipe titles. Recipes that fail to load keep their id.
async fn resolve_titles(service: &Service, plan: &mut MealPlan) {
    for day in &mut plan.days {
        for meal in &mut day.meals {
            if meal.recipe_title.is_some() {
                continue;
            }
            match service.recipe(&meal.recipe_id).await {
                Ok(recipe) => meal.recipe_title = Some(recipe.title),
                Err(e) => tracing::debug!("No title for recipe {}: {}", meal.recipe_id, e),
            }
        }
    }
}

/// Groups `DAY:TYPE:RECIPE_ID` entries into days, ordered by day number.
fn parse_days(specs: &[String]) -> Result<Vec<MealPlanDay>, String> {
    let mut days: Vec<MealPlanDay> = Vec::new();

    for spec in specs {
        let parts: Vec<&str> = spec.splitn(3, ':').map(str::trim).collect();
        let &[day, meal_type, recipe_id] = parts.as_slice() else {
            return Err(format!("Invalid meal '{}'. Use DAY:TYPE:RECIPE_ID", spec));
        };

        let day: u32 = day
            .parse()
            .ok()
            .filter(|d| *d >= 1)
            .ok_or_else(|| format!("Invalid day '{}' in '{}'", day, spec))?;
        let meal_type: MealType = meal_type.parse()?;
        if recipe_id.is_empty() {
            return Err(format!("Missing recipe id in '{}'", spec));
        }

        let meal = PlannedMeal {
            meal_type,
            recipe_id: recipe_id.to_string(),
            recipe_title: None,
        };
        match days.iter_mut().find(|d| d.day == day) {
            Some(existing) => existing.meals.push(meal),
            None => days.push(MealPlanDay {
                day,
                meals: vec![meal],
            }),
        }
    }

    days.sort_by_key(|d| d.day);
    Ok(days)
}
