use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

use commands::{
    AuthCommand, CartCommand, ConfigCommand, IngredientCommand, MealPlanCommand, PantryCommand,
    RecipeCommand,
};
use recipebox::api::{ApiClient, ApiError};
use recipebox::cart::CartStore;
use recipebox::config::Config;
use recipebox::query::QueryClient;
use recipebox::service::Service;
use recipebox::session::SessionStore;
use recipebox::storage::{FileStore, KeyValueStore};

#[derive(Parser)]
#[command(name = "recipebox")]
#[command(version)]
#[command(about = "Recipes, meal plans, pantry and shopping cart", long_about = None)]
struct Cli {
    /// Path to config file
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage the shopping cart
    Cart(CartCommand),

    /// Browse and manage recipes
    Recipe(RecipeCommand),

    /// Browse, create and clone meal plans
    Mealplan(MealPlanCommand),

    /// Manage your pantry
    Pantry(PantryCommand),

    /// Browse the ingredient catalog
    Ingredient(IngredientCommand),

    /// Sign in, sign out and manage your profile
    Auth(AuthCommand),

    /// Manage configuration
    Config(ConfigCommand),
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(e) = run().await {
        let message = match e.downcast_ref::<ApiError>() {
            Some(api_error) => {
                tracing::debug!("{}", api_error);
                api_error.display_message()
            }
            None => e.to_string(),
        };
        eprintln!("Error: {}", message);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = Config::load(cli.config)?;

    let command = match cli.command {
        Some(Commands::Config(cmd)) => return cmd.run(&config),
        Some(command) => command,
        None => {
            println!("Use --help to see available commands");
            return Ok(());
        }
    };

    let storage: Arc<dyn KeyValueStore> = Arc::new(FileStore::new(config.data_dir.value.clone()));
    let session = Arc::new(SessionStore::open(storage.clone()));
    let api = ApiClient::new(
        &config.api_url.value,
        config.request_timeout(),
        session.clone(),
    )?;
    let queries = Arc::new(QueryClient::new(config.stale_time()));
    let service = Service::new(api, queries, session);

    match command {
        Commands::Cart(cmd) => {
            let mut cart = CartStore::open(storage);
            cmd.run(&mut cart, &service).await?;
        }
        Commands::Recipe(cmd) => cmd.run(&service).await?,
        Commands::Mealplan(cmd) => cmd.run(&service).await?,
        Commands::Pantry(cmd) => cmd.run(&service).await?,
        Commands::Ingredient(cmd) => cmd.run(&service).await?,
        Commands::Auth(cmd) => cmd.run(&service).await?,
        Commands::Config(cmd) => cmd.run(&config)?,
    }

    Ok(())
}
