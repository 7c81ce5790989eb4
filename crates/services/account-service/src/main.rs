//! Account Service - account maintenance and token CLI.

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

use account_service_lib::config::AccountServiceConfig;
use account_service_lib::service::{AccountService, TokenIssuer};
use account_service_lib::MigrateAction;
use common::{AppError, AppResult};
use domain::{NewUser, UserPatch, UserResponse};

#[derive(Parser)]
#[command(name = "account-service")]
#[command(author, version, about = "User account and authentication service")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Database migration commands
    Migrate {
        #[command(subcommand)]
        action: MigrateCommands,
    },
    /// Manage user accounts
    Users {
        #[command(subcommand)]
        action: UserCommands,
    },
    /// Authenticate and print a bearer token
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "ACCOUNT_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Verify a token and print its claims
    VerifyToken {
        token: String,
    },
}

#[derive(Subcommand)]
enum MigrateCommands {
    /// Run pending migrations
    Up,
    /// Rollback last migration
    Down,
    /// Show migration status
    Status,
    /// Reset database and run all migrations
    Fresh,
    /// Check database connectivity
    Ping,
}

#[derive(Subcommand)]
enum UserCommands {
    /// List all users
    List,
    /// Show a single user by email
    Show {
        email: String,
    },
    /// Create a user
    Create {
        #[arg(long)]
        email: String,
        #[arg(long, env = "ACCOUNT_PASSWORD", hide_env_values = true)]
        password: String,
        #[arg(long)]
        first_name: Option<String>,
        #[arg(long)]
        last_name: Option<String>,
        #[arg(long, default_value = "")]
        role: String,
    },
    /// Delete a user by id
    Delete {
        id: Uuid,
    },
    /// Replace a user's password
    SetPassword {
        id: Uuid,
        #[arg(long, env = "ACCOUNT_PASSWORD", hide_env_values = true)]
        password: String,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    if let Err(e) = run(cli.command).await {
        tracing::error!("Command failed: {}", e.user_message());
        std::process::exit(1);
    }
}

/// Initialize tracing subscriber
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        tracing_subscriber::EnvFilter::new("debug")
    } else {
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into())
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

async fn run(command: Commands) -> AppResult<()> {
    let config = AccountServiceConfig::from_env()?;
    tracing::debug!(?config, "Configuration loaded");

    match command {
        Commands::Migrate { action } => {
            let action = match action {
                MigrateCommands::Up => MigrateAction::Up,
                MigrateCommands::Down => MigrateAction::Down,
                MigrateCommands::Status => MigrateAction::Status,
                MigrateCommands::Fresh => MigrateAction::Fresh,
                MigrateCommands::Ping => MigrateAction::Ping,
            };
            account_service_lib::run_migrations(action, &config).await
        }
        Commands::VerifyToken { token } => {
            let claims = TokenIssuer::from_config(&config.jwt).verify(&token)?;
            print_json(&claims)
        }
        Commands::Login { email, password } => {
            let service = account_service_lib::connect_service(&config).await?;
            match service.login(&email, &password).await? {
                Some(token) => print_json(&token),
                None => {
                    eprintln!("Invalid credentials");
                    std::process::exit(2);
                }
            }
        }
        Commands::Users { action } => {
            let service = account_service_lib::connect_service(&config).await?;
            run_user_command(&service, action).await
        }
    }
}

async fn run_user_command(service: &dyn AccountService, action: UserCommands) -> AppResult<()> {
    match action {
        UserCommands::List => {
            let users: Vec<UserResponse> = service
                .get_all()
                .await?
                .into_iter()
                .map(UserResponse::from)
                .collect();
            print_json(&users)
        }
        UserCommands::Show { email } => {
            let user = service
                .get_by_email(&email)
                .await?
                .ok_or(AppError::NotFound)?;
            print_json(&UserResponse::from(user))
        }
        UserCommands::Create {
            email,
            password,
            first_name,
            last_name,
            role,
        } => {
            let new_user = NewUser {
                first_name,
                last_name,
                role,
                ..NewUser::with_email(email)
            };
            let user = service.create(new_user, &password).await?;
            print_json(&UserResponse::from(user))
        }
        UserCommands::Delete { id } => service.delete(id).await,
        UserCommands::SetPassword { id, password } => {
            // `update` skips blank passwords, so refuse them here
            if password.trim().is_empty() {
                return Err(AppError::invalid_input("Password must not be empty"));
            }
            let user = service
                .update(UserPatch::for_user(id), Some(&password))
                .await?;
            print_json(&UserResponse::from(user))
        }
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> AppResult<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
