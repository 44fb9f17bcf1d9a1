use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use social_api::{build_router, AppState};
use social_config::load as load_config;
use social_runtime::seed::{seed_database, SeedOptions};
use social_runtime::{shutdown_signal, telemetry, BackendServices};
use tokio::net::TcpListener;
use tracing::info;

#[derive(Parser)]
#[command(name = "social-backend")]
#[command(about = "Social backend (serves HTTP by default)")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve,
    /// Apply pending database migrations and exit
    Migrate,
    /// Seed the database with demo data
    Seed(SeedArgs),
}

#[derive(Args, Debug)]
struct SeedArgs {
    /// Number of users to create
    #[arg(long, default_value_t = 20)]
    users: usize,
    /// Minimum posts per user
    #[arg(long, default_value_t = 1)]
    min_posts: usize,
    /// Maximum posts per user (inclusive)
    #[arg(long, default_value_t = 3)]
    max_posts: usize,
    /// Minimum comments per post
    #[arg(long, default_value_t = 0)]
    min_comments: usize,
    /// Maximum comments per post (inclusive)
    #[arg(long, default_value_t = 5)]
    max_comments: usize,
    /// Maximum accounts each user follows
    #[arg(long, default_value_t = 5)]
    max_follows: usize,
    /// Random seed; omit for a random one
    #[arg(long)]
    seed: Option<u64>,
    /// Delete existing rows before seeding (destructive)
    #[arg(long)]
    clear: bool,
}

impl From<SeedArgs> for SeedOptions {
    fn from(args: SeedArgs) -> Self {
        Self {
            users: args.users,
            min_posts: args.min_posts,
            max_posts: args.max_posts,
            min_comments: args.min_comments,
            max_comments: args.max_comments,
            max_follows: args.max_follows,
            seed: args.seed,
            clear: args.clear,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    telemetry::init_tracing().context("failed to initialise tracing")?;

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => run_server().await,
        Commands::Migrate => run_migrations().await,
        Commands::Seed(args) => run_seed(args.into()).await,
    }
}

async fn run_server() -> anyhow::Result<()> {
    info!("starting social backend");

    let config = load_config().context("failed to load configuration")?;

    let services = BackendServices::initialise(&config)
        .await
        .context("failed to initialise backend services")?;

    let state = AppState::new(services.database, &config, env!("CARGO_PKG_VERSION"));
    let app = build_router(state, &config.http);

    let address = format!("{}:{}", config.http.address, config.http.port);
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind http listener on {address}"))?;

    info!(%address, env = %config.env, "http server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("http server error")?;

    info!("backend shut down");
    Ok(())
}

async fn run_migrations() -> anyhow::Result<()> {
    let config = load_config().context("failed to load configuration")?;

    // Initialising the services applies every pending migration.
    let services = BackendServices::initialise(&config)
        .await
        .context("failed to migrate database")?;
    services.database.close().await;

    info!(url = %config.database.url, "database is up to date");
    Ok(())
}

async fn run_seed(options: SeedOptions) -> anyhow::Result<()> {
    let config = load_config().context("failed to load configuration")?;

    let services = BackendServices::initialise(&config)
        .await
        .context("failed to initialise backend services")?;

    let report = seed_database(&services.database, &options)
        .await
        .context("seeding failed")?;
    services.database.close().await;

    println!(
        "seeded users={} posts={} comments={} follows={} (seed {})",
        report.users, report.posts, report.comments, report.follows, report.seed
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_serve() {
        let cli = Cli::try_parse_from(["social-backend"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn seed_flags_map_to_options() {
        let cli = Cli::try_parse_from([
            "social-backend",
            "seed",
            "--users",
            "5",
            "--max-follows",
            "0",
            "--seed",
            "42",
            "--clear",
        ])
        .unwrap();

        let Some(Commands::Seed(args)) = cli.command else {
            panic!("expected seed command");
        };
        let options = SeedOptions::from(args);
        assert_eq!(options.users, 5);
        assert_eq!(options.max_follows, 0);
        assert_eq!(options.seed, Some(42));
        assert!(options.clear);
        assert_eq!(options.max_posts, SeedOptions::default().max_posts);
    }
}
