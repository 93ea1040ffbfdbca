use chrono::{Local, NaiveDate};
use clap::{Args, Subcommand};

use super::{truncate, OutputFormat};
use recipebox::models::PantryDraft;
use recipebox::service::Service;

#[derive(Args)]
pub struct PantryCommand {
    #[command(subcommand)]
    pub command: PantrySubcommand,
}

#[derive(Subcommand)]
pub enum PantrySubcommand {
    /// List pantry items
    List {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,

        /// Only show expired items
        #[arg(long)]
        expired: bool,
    },

    /// Add an item to the pantry
    Add {
        /// Item name
        name: String,

        /// Quantity (amount)
        #[arg(long, short)]
        quantity: f64,

        /// Unit of measurement
        #[arg(long, short)]
        unit: Option<String>,

        /// Expiry date (YYYY-MM-DD)
        #[arg(long)]
        expires: Option<String>,
    },

    /// Remove an item from the pantry
    Remove {
        /// Pantry item ID
        id: String,
    },
}

impl PantryCommand {
    pub async fn run(&self, service: &Service) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            PantrySubcommand::List { format, expired } => {
                let today = Local::now().date_naive();
                let items: Vec<_> = service
                    .pantry()
                    .await?
                    .into_iter()
                    .filter(|item| !expired || item.is_expired(today))
                    .collect();

                if items.is_empty() {
                    println!("No pantry items found");
                    return Ok(());
                }

                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(&items)?);
                    }
                    OutputFormat::Text => {
                        println!(
                            "{:<24}  {:<24}  {:>8}  {:<6}  EXPIRES",
                            "ID", "NAME", "QTY", "UNIT"
                        );
                        println!("{}", "-".repeat(80));
                        for item in &items {
                            let expires = match item.expires_at {
                                Some(date) if item.is_expired(today) => format!("{} (expired)", date),
                                Some(date) => date.to_string(),
                                None => String::new(),
                            };
                            println!(
                                "{:<24}  {:<24}  {:>8}  {:<6}  {}",
                                item.id,
                                truncate(&item.name, 24),
                                item.quantity,
                                item.unit.as_deref().unwrap_or(""),
                                expires
                            );
                        }
                        println!("\nTotal: {} item(s)", items.len());
                    }
                }
                Ok(())
            }

            PantrySubcommand::Add {
                name,
                quantity,
                unit,
                expires,
            } => {
                let expires_at = match expires {
                    Some(d) => Some(
                        NaiveDate::parse_from_str(d, "%Y-%m-%d")
                            .map_err(|_| format!("Invalid date format: {}. Use YYYY-MM-DD", d))?,
                    ),
                    None => None,
                };

                let draft = PantryDraft {
                    name: name.trim().to_string(),
                    quantity: *quantity,
                    unit: unit.clone(),
                    expires_at,
                };
                let item = service.add_pantry_item(&draft).await?;
                println!("Added to pantry: {}", item);
                Ok(())
            }

            PantrySubcommand::Remove { id } => {
                service.remove_pantry_item(id).await?;
                println!("Removed pantry item {}", id);
                Ok(())
            }
        }
    }
}
