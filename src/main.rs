//! Temple Puja Admin Console CLI
//!
//! Command-line front end over the admin store: sign in, manage resources, and
//! read dashboard analytics. Results are printed as JSON on stdout.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use serde_json::Value;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use puja_admin::client::Upload;
use puja_admin::config::Config;
use puja_admin::errors::ClientError;
use puja_admin::models::{Resource, SignupRequest, StatusResource};
use puja_admin::session::SIGNIN_PATH;
use puja_admin::store::{AdminStore, ResourceSlice};

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

#[derive(Parser, Debug)]
#[command(name = "puja-admin")]
#[command(about = "Admin console for the temple puja booking platform")]
#[command(version)]
struct Cli {
    /// Base URL of the platform API (overrides PUJA_ADMIN_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Session storage file (overrides PUJA_ADMIN_TOKEN_PATH)
    #[arg(long, global = true)]
    token_path: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sign in with an admin account
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "PUJA_ADMIN_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Register a new account
    Signup {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long, env = "PUJA_ADMIN_PASSWORD", hide_env_values = true)]
        password: String,
        #[arg(long)]
        phone: Option<String>,
    },
    /// Forget the stored session
    Logout,
    /// Show the signed-in account
    Whoami,
    /// Totals, 30-day growth, and chart series
    Dashboard,
    Pujas {
        #[command(subcommand)]
        action: Action,
    },
    Plans {
        #[command(subcommand)]
        action: Action,
    },
    Bookings {
        #[command(subcommand)]
        action: Action,
    },
    Blogs {
        #[command(subcommand)]
        action: Action,
    },
    Categories {
        #[command(subcommand)]
        action: Action,
    },
    ProductCategories {
        #[command(subcommand)]
        action: Action,
    },
    Users {
        #[command(subcommand)]
        action: Action,
    },
    Temples {
        #[command(subcommand)]
        action: Action,
    },
    Products {
        #[command(subcommand)]
        action: Action,
    },
    Orders {
        #[command(subcommand)]
        action: Action,
    },
    Chadawas {
        #[command(subcommand)]
        action: Action,
    },
}

#[derive(Subcommand, Debug)]
enum Action {
    /// List records
    List {
        #[arg(long)]
        page: Option<u32>,
        #[arg(long)]
        limit: Option<u32>,
        #[arg(long)]
        search: Option<String>,
    },
    /// Show one record
    Get { id: String },
    /// Create a record from JSON
    Create(Payload),
    /// Replace a record with JSON
    Update {
        id: String,
        #[command(flatten)]
        payload: Payload,
    },
    /// Delete a record
    Delete { id: String },
    /// Change the status of a booking or order
    Status { id: String, status: String },
}

#[derive(Args, Debug)]
struct Payload {
    /// Record as inline JSON, or `@path` to read it from a file
    #[arg(long)]
    data: String,
    /// Image to upload with the record
    #[arg(long)]
    image: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> CliResult<()> {
    let cli = Cli::parse();

    // Load configuration
    let mut config = Config::from_env();
    if let Some(api_url) = cli.api_url.as_deref() {
        config = config.with_base_url(api_url);
    }
    if let Some(token_path) = cli.token_path.clone() {
        config.token_path = token_path;
    }

    // Initialize logging; stdout is reserved for command output
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::debug!("API base URL: {}", config.api_base_url);
    tracing::debug!("Session storage: {:?}", config.token_path);

    let mut store = puja_admin::connect(&config)?;
    tracing::debug!("Authenticated at start: {}", store.auth.state().authenticated);

    let result = run(&mut store, cli.command).await;

    if let Err(e) = &result {
        if matches!(e.downcast_ref::<ClientError>(), Some(ClientError::Unauthorized(_))) {
            tracing::warn!(
                "Session ended ({}); sign in again with `puja-admin login`",
                SIGNIN_PATH
            );
        }
    }

    let output = result?;
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

async fn run(store: &mut AdminStore, command: Command) -> CliResult<Value> {
    match command {
        Command::Login { email, password } => {
            store.auth.login(&email, &password).await?;
            Ok(serde_json::to_value(store.auth.state())?)
        }
        Command::Signup {
            name,
            email,
            password,
            phone,
        } => {
            let request = SignupRequest {
                name,
                email,
                password,
                phone,
            };
            store.auth.signup(request).await?;
            Ok(serde_json::to_value(store.auth.state())?)
        }
        Command::Logout => {
            store.auth.logout()?;
            Ok(serde_json::to_value(store.auth.state())?)
        }
        Command::Whoami => {
            store.auth.fetch_profile().await?;
            Ok(serde_json::to_value(store.auth.state())?)
        }
        Command::Dashboard => {
            let stats = store.dashboard.fetch().await?;
            Ok(serde_json::to_value(stats)?)
        }
        Command::Pujas { action } => run_action(&mut store.pujas, action).await,
        Command::Plans { action } => run_action(&mut store.plans, action).await,
        Command::Bookings { action } => run_status_action(&mut store.bookings, action).await,
        Command::Blogs { action } => run_action(&mut store.blogs, action).await,
        Command::Categories { action } => run_action(&mut store.categories, action).await,
        Command::ProductCategories { action } => {
            run_action(&mut store.product_categories, action).await
        }
        Command::Users { action } => run_action(&mut store.users, action).await,
        Command::Temples { action } => run_action(&mut store.temples, action).await,
        Command::Products { action } => run_action(&mut store.products, action).await,
        Command::Orders { action } => run_status_action(&mut store.orders, action).await,
        Command::Chadawas { action } => run_action(&mut store.chadawas, action).await,
    }
}

async fn run_status_action<T: StatusResource>(
    slice: &mut ResourceSlice<T>,
    action: Action,
) -> CliResult<Value> {
    match action {
        Action::Status { id, status } => {
            let status = T::parse_status(&status)?;
            let updated = slice.set_status(&id, status).await?;
            Ok(serde_json::to_value(updated)?)
        }
        other => run_action(slice, other).await,
    }
}

async fn run_action<T: Resource>(slice: &mut ResourceSlice<T>, action: Action) -> CliResult<Value> {
    match action {
        Action::List {
            page,
            limit,
            search,
        } => {
            let mut query = slice.last_query().clone();
            query.page = page.or(query.page);
            query.limit = limit.or(query.limit);
            query.search = search;
            let items = slice.fetch_all(query).await?;
            Ok(serde_json::to_value(items)?)
        }
        Action::Get { id } => {
            let item = slice.fetch_by_id(&id).await?;
            Ok(serde_json::to_value(item)?)
        }
        Action::Create(payload) => {
            let (record, upload) = read_payload::<T>(&payload).await?;
            let created = match upload {
                Some(upload) => slice.create_with_image(&record, upload).await?,
                None => slice.create(&record).await?,
            };
            Ok(serde_json::to_value(created)?)
        }
        Action::Update { id, payload } => {
            let (record, upload) = read_payload::<T>(&payload).await?;
            let updated = match upload {
                Some(upload) => slice.update_with_image(&id, &record, upload).await?,
                None => slice.update(&id, &record).await?,
            };
            Ok(serde_json::to_value(updated)?)
        }
        Action::Delete { id } => {
            slice.delete(&id).await?;
            Ok(serde_json::json!({ "deleted": id }))
        }
        Action::Status { .. } => Err(ClientError::Validation(format!(
            "{} records have no status to change",
            T::LABEL
        ))
        .into()),
    }
}

async fn read_payload<T: Resource>(payload: &Payload) -> CliResult<(T, Option<Upload>)> {
    let raw = match payload.data.strip_prefix('@') {
        Some(path) => tokio::fs::read_to_string(path).await?,
        None => payload.data.clone(),
    };
    let record: T = serde_json::from_str(&raw)?;

    let upload = match payload.image.as_deref() {
        Some(path) => Some(Upload::from_path(path).await?),
        None => None,
    };

    Ok((record, upload))
}
