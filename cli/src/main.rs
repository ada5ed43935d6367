mod commands;
mod config;
mod server;

use std::path::PathBuf;
use std::process;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::commands::{
    LogArgs, cmd_calc, cmd_dashboard, cmd_foods, cmd_goal_set, cmd_log, cmd_tracker,
    cmd_user_add, cmd_user_list, cmd_user_remove, cmd_weight_log,
};
use crate::config::Config;
use lighter_core::auth::CredentialFile;
use lighter_core::catalog::FoodCatalog;
use lighter_core::goal::{GoalRequest, GoalType};
use lighter_core::models::Username;
use lighter_core::service::{LighterService, local_today};
use lighter_core::store::JsonFileStore;
use lighter_core::tracker::Tracker;

#[derive(Parser)]
#[command(
    name = "lighter",
    version,
    about = "A calorie tracker for South Indian home food"
)]
struct Cli {
    /// Data directory (default: platform data dir)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the JSON API server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "8080")]
        port: u16,
        /// Address to bind to (use 0.0.0.0 to expose to network)
        #[arg(short, long, default_value = "127.0.0.1")]
        bind: String,
    },
    /// List the food catalog
    Foods {
        /// Only show foods whose name contains this text
        #[arg(short, long)]
        search: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Estimate calories without logging
    Calc {
        /// Food name
        food: String,
        /// Amount in the food's unit (grams, pieces, cups, ...)
        amount: f64,
        /// Meal type: breakfast, lunch, dinner, snack
        #[arg(short, long, default_value = "snack")]
        meal: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Log a meal
    Log {
        /// Food name
        food: String,
        /// Amount in the food's unit
        amount: f64,
        /// User to log for
        #[arg(short, long)]
        user: String,
        /// Meal type: breakfast, lunch, dinner, snack
        #[arg(short, long, default_value = "snack")]
        meal: String,
        /// Date to log for (YYYY-MM-DD or today/yesterday/tomorrow)
        #[arg(long)]
        date: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Log body weight in kg
    Weight {
        /// Weight in kg
        value: f64,
        /// User to log for
        #[arg(short, long)]
        user: String,
        /// Date to log for (YYYY-MM-DD or today/yesterday/tomorrow)
        #[arg(long)]
        date: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Set the daily calorie goal
    Goal {
        /// User to set the goal for
        #[arg(short, long)]
        user: String,
        /// Current weight in kg
        #[arg(long)]
        current_weight: f64,
        /// Goal direction: lose or gain
        #[arg(long)]
        goal_type: GoalType,
        /// Target change in kg per week
        #[arg(long)]
        rate: f64,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show daily totals, goal hits, streak and latest weight
    Dashboard {
        /// User to show
        #[arg(short, long)]
        user: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show every logged meal
    Tracker {
        /// User to show
        #[arg(short, long)]
        user: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Manage users who can log in to the server
    User {
        #[command(subcommand)]
        action: UserAction,
    },
}

#[derive(Subcommand)]
enum UserAction {
    /// Add a user or change their password
    Add {
        /// User name
        name: String,
        /// Password
        #[arg(long)]
        password: String,
    },
    /// Remove a user
    Remove {
        /// User name
        name: String,
    },
    /// List users
    List,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let default_level = if matches!(cli.command, Commands::Serve { .. }) {
        "info"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = Config::load(cli.data_dir)?;
    let store = JsonFileStore::open(&config.store_dir)?;
    let tracker = Tracker::new(Arc::new(store), FoodCatalog::builtin());
    let today = local_today();

    match cli.command {
        Commands::Serve { port, bind } => {
            tracing::info!(data_dir = %config.data_dir.display(), "using data directory");
            let users = CredentialFile::load(&config.users_path)?;
            let service = LighterService::new(Arc::new(users), tracker);
            server::start_server(service, port, &bind).await
        }
        Commands::Foods { search, json } => cmd_foods(tracker.catalog(), search.as_deref(), json),
        Commands::Calc {
            food,
            amount,
            meal,
            json,
        } => cmd_calc(&tracker, &food, amount, &meal, json),
        Commands::Log {
            food,
            amount,
            user,
            meal,
            date,
            json,
        } => {
            let args = LogArgs {
                food: &food,
                amount,
                meal: &meal,
                date: date.as_deref(),
            };
            cmd_log(&tracker, &Username::new(&user)?, &args, today, json)
        }
        Commands::Weight {
            value,
            user,
            date,
            json,
        } => cmd_weight_log(
            &tracker,
            &Username::new(&user)?,
            value,
            date.as_deref(),
            today,
            json,
        ),
        Commands::Goal {
            user,
            current_weight,
            goal_type,
            rate,
            json,
        } => {
            let req = GoalRequest {
                current_weight,
                goal_type,
                goal_rate: rate,
            };
            cmd_goal_set(&tracker, &Username::new(&user)?, &req, json)
        }
        Commands::Dashboard { user, json } => {
            cmd_dashboard(&tracker, &Username::new(&user)?, today, json)
        }
        Commands::Tracker { user, json } => cmd_tracker(&tracker, &Username::new(&user)?, json),
        Commands::User { action } => match action {
            UserAction::Add { name, password } => {
                cmd_user_add(&config.users_path, &name, &password)
            }
            UserAction::Remove { name } => cmd_user_remove(&config.users_path, &name),
            UserAction::List => cmd_user_list(&config.users_path),
        },
    }
}
