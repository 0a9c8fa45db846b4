use clap::{Parser, Subcommand};
use mechanic_connect::api::{mechanics, reviews};
use mechanic_connect::models::{LoginRequest, MechanicSearchQuery};
use mechanic_connect::{AccountKind, AuthOutcome, Config, FileStore, LogEvents, SessionStore, Transport};
use std::process::ExitCode;
use std::sync::Arc;

#[derive(Parser)]
#[command(
    name = "mechanic-connect",
    about = "Session and API client for the mechanic marketplace"
)]
struct Cli {
    /// Defaults to `status`.
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Show who the restored session belongs to.
    Status,

    /// Sign in and remember the account kind for the next run.
    Login {
        /// `customer` or `mechanic`.
        kind: AccountKind,
        email: String,
        password: String,
    },

    /// Sign out and forget the stored account kind.
    Logout,

    /// List the signed-in account's reviews.
    Reviews,

    /// Search mechanics, optionally in one city.
    Search { city: Option<String> },
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenv::dotenv().ok();
    env_logger::init();
    let cli = Cli::parse();

    let config = Config::from_env();
    let transport = match Transport::new(&config, Arc::new(LogEvents)) {
        Ok(transport) => Arc::new(transport),
        Err(e) => {
            eprintln!("Could not set up HTTP client: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let storage = Arc::new(FileStore::new(&config.storage_path));
    let session = SessionStore::new(transport.clone(), storage);

    session.fetch_user().await;

    match cli.command.unwrap_or(Command::Status) {
        Command::Status => {
            let current = session.snapshot();
            match (current.account_kind, current.is_authenticated) {
                (Some(kind), true) => println!("Signed in as {}", kind),
                _ => println!("Not signed in"),
            }
            ExitCode::SUCCESS
        }
        Command::Login {
            kind,
            email,
            password,
        } => match session.login(kind, &LoginRequest::new(email, password)).await {
            AuthOutcome::Success { .. } => {
                println!("Signed in as {}", kind);
                ExitCode::SUCCESS
            }
            AuthOutcome::Failure { error } => {
                eprintln!("{}", error);
                ExitCode::FAILURE
            }
        },
        Command::Logout => {
            session.logout().await;
            println!("Signed out");
            ExitCode::SUCCESS
        }
        Command::Reviews => {
            let Some(kind) = session.snapshot().account_kind else {
                eprintln!("Not signed in");
                return ExitCode::FAILURE;
            };
            match reviews::fetch_reviews(&transport, kind).await {
                Ok(list) => {
                    for review in list {
                        println!("{} ★{} {}", review.id, review.rating, review.comment);
                    }
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    eprintln!("{}", e);
                    ExitCode::FAILURE
                }
            }
        }
        Command::Search { city } => {
            let query = MechanicSearchQuery {
                city,
                ..Default::default()
            };
            match mechanics::search_mechanics(&transport, &query).await {
                Ok(page) => {
                    println!(
                        "Page {}/{} ({} mechanics)",
                        page.current_page, page.total_pages, page.total_mechanics
                    );
                    for mechanic in page.data {
                        println!("{}", mechanic);
                    }
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    eprintln!("{}", e);
                    ExitCode::FAILURE
                }
            }
        }
    }
}
