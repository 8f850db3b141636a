use anyhow::Context;
use accounts_config::load as load_config;
use accounts_database::{map_user, RowSource};
use accounts_gateway::{create_router, GatewayState};
use accounts_runtime::{telemetry, AccountServices};
use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tracing::info;

#[derive(Parser)]
#[command(name = "accounts-server")]
#[command(about = "User account service (serves by default)")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the RPC server
    Serve,
    /// Apply database migrations and exit
    Migrate,
    /// Print every stored user, soft-deleted ones included
    DumpUsers,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    telemetry::init_tracing().context("failed to initialise tracing")?;

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => run_server().await,
        Commands::Migrate => migrate().await,
        Commands::DumpUsers => dump_users().await,
    }
}

async fn initialise() -> anyhow::Result<(accounts_config::AppConfig, AccountServices)> {
    let config = load_config().context("failed to load configuration")?;

    let services = AccountServices::initialise(&config)
        .await
        .context("failed to initialise account services")?;

    Ok((config, services))
}

async fn run_server() -> anyhow::Result<()> {
    info!("starting accounts service");

    let (config, services) = initialise().await?;

    let state = GatewayState {
        pool: services.db_pool.clone(),
        user_service: services.user_service.clone(),
    };
    let app = create_router(state);

    let address = config.rpc.bind_address();
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind rpc listener on {address}"))?;

    info!(%address, "rpc server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(accounts_runtime::shutdown_signal())
        .await
        .context("rpc server error")?;

    info!("accounts service shut down");
    Ok(())
}

async fn migrate() -> anyhow::Result<()> {
    let (config, services) = initialise().await?;
    services.db_pool.close().await;

    info!(url = %config.database.url, "database is up to date");
    Ok(())
}

async fn dump_users() -> anyhow::Result<()> {
    let (_, services) = initialise().await?;

    let rows = sqlx::query("SELECT * FROM users ORDER BY email ASC")
        .fetch_all(&services.db_pool)
        .await
        .context("failed to fetch users")?;

    println!("=== USERS ===");
    if rows.is_empty() {
        println!("No users found in database");
        return Ok(());
    }

    println!("Found {} users:", rows.len());
    println!(
        "{:<34} {:<32} {:<6} {:<24} {:<20} {:<26}",
        "ID", "Email", "Role", "Sub", "Name", "Deleted"
    );
    println!("{}", "-".repeat(146));

    for row in &rows {
        let user = map_user(RowSource::Cursor(row)).context("failed to map user row")?;
        println!(
            "{:<34} {:<32} {:<6} {:<24} {:<20} {:<26}",
            user.id,
            user.email,
            user.role.as_str(),
            user.sub,
            user.name.as_deref().unwrap_or("NULL"),
            user.deleted.as_deref().unwrap_or("NULL"),
        );
    }

    Ok(())
}
