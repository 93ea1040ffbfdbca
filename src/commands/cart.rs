use clap::{Args, Subcommand};

use super::{confirm, truncate, OutputFormat};
use recipebox::cart::CartStore;
use recipebox::models::Ingredient;
use recipebox::service::Service;

#[derive(Args)]
pub struct CartCommand {
    #[command(subcommand)]
    pub command: CartSubcommand,
}

#[derive(Subcommand)]
pub enum CartSubcommand {
    /// Show the cart
    List {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Add one unit of an ingredient
    Add {
        /// Ingredient ID
        id: String,

        /// Ingredient name; skips the catalog lookup
        #[arg(long)]
        name: Option<String>,

        /// Category (with --name)
        #[arg(long)]
        category: Option<String>,

        /// Unit (with --name)
        #[arg(long)]
        unit: Option<String>,
    },

    /// Remove an ingredient from the cart
    Remove {
        /// Ingredient ID
        id: String,
    },

    /// Increase an ingredient's quantity
    Inc {
        /// Ingredient ID
        id: String,

        #[arg(long, short, default_value = "1")]
        by: u32,
    },

    /// Decrease an ingredient's quantity, removing it below one
    Dec {
        /// Ingredient ID
        id: String,

        #[arg(long, short, default_value = "1")]
        by: u32,
    },

    /// Empty the cart
    Clear {
        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
    },

    /// Send the cart to the server as a shopping list
    Checkout,
}

impl CartCommand {
    pub async fn run(
        &self,
        cart: &mut CartStore,
        service: &Service,
    ) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            CartSubcommand::List { format } => {
                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(cart.cart())?);
                    }
                    OutputFormat::Text => {
                        if cart.is_empty() {
                            println!("Cart is empty");
                            return Ok(());
                        }
                        println!("{:<24}  {:<30}  {:>5}  UNIT", "ID", "NAME", "QTY");
                        println!("{}", "-".repeat(72));
                        for line in cart.lines() {
                            println!(
                                "{:<24}  {:<30}  {:>5}  {}",
                                truncate(&line.id, 24),
                                truncate(&line.name, 30),
                                line.quantity,
                                line.unit.as_deref().unwrap_or("")
                            );
                        }
                        println!(
                            "\nTotal: {} item(s), {} unit(s)",
                            cart.len(),
                            cart.total_quantity()
                        );
                    }
                }
                Ok(())
            }

            CartSubcommand::Add {
                id,
                name,
                category,
                unit,
            } => {
                let ingredient = match name {
                    Some(name) => {
                        if name.trim().is_empty() {
                            return Err("Ingredient name cannot be empty".into());
                        }
                        Ingredient {
                            id: id.clone(),
                            name: name.trim().to_string(),
                            category: category.clone(),
                            unit: unit.clone(),
                        }
                    }
                    None => service.ingredient(id).await?,
                };

                cart.add_item(&ingredient);
                let quantity = cart.get(&ingredient.id).map_or(0, |l| l.quantity);
                println!("Added {} (now {})", ingredient.name, quantity);
                Ok(())
            }

            CartSubcommand::Remove { id } => {
                let name = cart
                    .get(id)
                    .map(|l| l.name.clone())
                    .ok_or_else(|| format!("Not in cart: {}", id))?;
                cart.remove_item(id);
                println!("Removed {}", name);
                Ok(())
            }

            CartSubcommand::Inc { id, by } => {
                let quantity = cart
                    .change_quantity(id, i64::from(*by))
                    .ok_or_else(|| format!("Not in cart: {}", id))?;
                println!("{}: {}", id, quantity);
                Ok(())
            }

            CartSubcommand::Dec { id, by } => {
                let current = cart
                    .get(id)
                    .map(|l| l.quantity)
                    .ok_or_else(|| format!("Not in cart: {}", id))?;

                // The store never goes below one; dropping past it removes the line.
                if current <= *by {
                    cart.remove_item(id);
                    println!("Removed {}", id);
                } else if let Some(quantity) = cart.change_quantity(id, -i64::from(*by)) {
                    println!("{}: {}", id, quantity);
                }
                Ok(())
            }

            CartSubcommand::Clear { force } => {
                if cart.is_empty() {
                    println!("Cart is already empty");
                    return Ok(());
                }
                if !force && !confirm(&format!("Remove all {} item(s)?", cart.len()))? {
                    println!("Cancelled.");
                    return Ok(());
                }
                cart.clear();
                println!("Cart cleared");
                Ok(())
            }

            CartSubcommand::Checkout => {
                let list = service.checkout(cart).await?;
                println!(
                    "Created shopping list {} with {} item(s)",
                    list.id,
                    list.items.len()
                );
                Ok(())
            }
        }
    }
}
