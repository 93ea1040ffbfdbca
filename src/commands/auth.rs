use clap::{Args, Subcommand};

use super::{prompt_line, OutputFormat};
use recipebox::models::ProfileUpdate;
use recipebox::service::Service;

#[derive(Args)]
pub struct AuthCommand {
    #[command(subcommand)]
    pub command: AuthSubcommand,
}

#[derive(Subcommand)]
pub enum AuthSubcommand {
    /// Sign in with email and password
    Login {
        #[arg(long)]
        email: Option<String>,

        /// Prompted for when omitted
        #[arg(long)]
        password: Option<String>,
    },

    /// Create an account and sign in
    Register {
        #[arg(long)]
        name: String,

        #[arg(long)]
        email: String,

        /// Prompted for when omitted
        #[arg(long)]
        password: Option<String>,
    },

    /// Sign out and forget cached data
    Logout,

    /// Show who is signed in
    Status {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Update your profile
    Profile {
        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        email: Option<String>,

        /// Avatar image URL
        #[arg(long)]
        avatar: Option<String>,
    },
}

impl AuthCommand {
    pub async fn run(&self, service: &Service) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            AuthSubcommand::Login { email, password } => {
                let email = match email {
                    Some(email) => email.clone(),
                    None => prompt_line("Email: ")?,
                };
                let password = match password {
                    Some(password) => password.clone(),
                    None => prompt_line("Password: ")?,
                };

                let user = service.login(&email, &password).await?;
                println!("Signed in as {}", user);
                Ok(())
            }

            AuthSubcommand::Register {
                name,
                email,
                password,
            } => {
                let password = match password {
                    Some(password) => password.clone(),
                    None => prompt_line("Password: ")?,
                };

                let user = service.register(name, email, &password).await?;
                println!("Account created. Signed in as {}", user);
                Ok(())
            }

            AuthSubcommand::Logout => {
                if !service.session().is_signed_in() {
                    println!("Not signed in");
                    return Ok(());
                }
                service.logout();
                println!("Signed out");
                Ok(())
            }

            AuthSubcommand::Status { format } => {
                let user = service.session().user();
                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(&user)?);
                    }
                    OutputFormat::Text => match user {
                        Some(user) => {
                            println!("Signed in as {}", user);
                            println!("  User ID: {}", user.id);
                            println!("  Server: {}", service.api().base_url());
                        }
                        None => {
                            println!("Not signed in");
                            println!("Run 'recipebox auth login' to sign in.");
                        }
                    },
                }
                Ok(())
            }

            AuthSubcommand::Profile {
                name,
                email,
                avatar,
            } => {
                let update = ProfileUpdate {
                    name: name.clone(),
                    email: email.clone(),
                    avatar: avatar.clone(),
                };
                if update.is_empty() {
                    return Err("Nothing to update. Provide at least one option.".into());
                }

                let user = service.update_profile(&update).await?;
                println!("Updated profile: {}", user);
                Ok(())
            }
        }
    }
}
