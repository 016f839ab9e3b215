//! Bloom CLI - terminal client for the Bloom storefront.
//!
//! # Usage
//!
//! ```bash
//! # Sign in with email and password (password from flag or BLOOM_PASSWORD)
//! bloom login password -e admin@bloom.lk
//!
//! # Sign in with a Google access token obtained elsewhere
//! bloom login google --access-token ya29...
//!
//! # Show the current session
//! bloom whoami
//!
//! # Search the catalog once, or keep reading queries from stdin
//! bloom search "rose water"
//! bloom search --interactive
//!
//! # Browse orders (requires a session)
//! bloom orders list
//! bloom orders show ORD0001
//!
//! # Forget the session
//! bloom logout
//! ```
//!
//! # Commands
//!
//! - `login` - Password or Google sign-in
//! - `logout` - Clear the stored session token
//! - `whoami` - Show session state
//! - `search` - Catalog search
//! - `orders` - List orders and show order details

#![cfg_attr(not(test), forbid(unsafe_code))]

use bloom_core::Email;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "bloom")]
#[command(author, version, about = "Bloom storefront client")]
struct Cli {
    /// Emit logs as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in
    Login {
        #[command(subcommand)]
        method: LoginMethod,
    },
    /// Sign out and forget the stored session token
    Logout,
    /// Show the current session
    Whoami,
    /// Search the product catalog
    Search {
        /// Search text
        query: Option<String>,

        /// Read one query per line from stdin, showing results as they arrive
        #[arg(short, long, conflicts_with = "query")]
        interactive: bool,
    },
    /// Browse orders
    Orders {
        #[command(subcommand)]
        action: OrdersAction,
    },
}

#[derive(Subcommand)]
enum LoginMethod {
    /// Sign in with email and password
    Password {
        /// Account email address
        #[arg(short, long, value_parser = parse_email)]
        email: Email,

        /// Account password
        #[arg(short, long, env = "BLOOM_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Sign in with a Google access token
    Google {
        /// OAuth access token issued by Google
        #[arg(long, env = "BLOOM_GOOGLE_ACCESS_TOKEN", hide_env_values = true)]
        access_token: Option<String>,
    },
}

#[derive(Subcommand)]
enum OrdersAction {
    /// List all visible orders
    List,
    /// Show one order in detail
    Show {
        /// Order ID (e.g., ORD0001)
        order_id: String,
    },
}

fn parse_email(s: &str) -> Result<Email, bloom_core::EmailError> {
    Email::parse(s)
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.json);

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let ctx = commands::Context::from_env()?;

    match cli.command {
        Commands::Login { method } => match method {
            LoginMethod::Password { email, password } => {
                commands::auth::login_with_password(&ctx, &email, password).await?;
            }
            LoginMethod::Google { access_token } => {
                commands::auth::login_with_google(&ctx, access_token).await?;
            }
        },
        Commands::Logout => commands::auth::logout(&ctx)?,
        Commands::Whoami => commands::auth::whoami(&ctx),
        Commands::Search { query, interactive } => {
            if interactive {
                commands::search::interactive(&ctx).await?;
            } else {
                commands::search::once(&ctx, query.as_deref().unwrap_or_default()).await;
            }
        }
        Commands::Orders { action } => match action {
            OrdersAction::List => commands::orders::list(&ctx).await?,
            OrdersAction::Show { order_id } => commands::orders::show(&ctx, &order_id).await?,
        },
    }
    Ok(())
}
