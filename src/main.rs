use std::sync::Arc;

use clap::{Parser, Subcommand};
use scoreboard_session::{
    HttpSessionResource, NoticeBoard, RouteHistory, SessionClient, SessionConfig, SessionError, Subscription,
};
use serde_json::{Value, json};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "session-cli", about = "Scoreboard session client")]
struct Cli {
    /// Overrides `SESSION_BASE_URL`.
    #[arg(long)]
    base_url: Option<String>,

    /// Overrides `SESSION_PATH`.
    #[arg(long)]
    path: Option<String>,

    /// Overrides `SESSION_COOKIE`.
    #[arg(long)]
    cookie: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the session the backend currently reports.
    Status,
    /// Log in and print the resulting session.
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "SESSION_PASSWORD")]
        password: String,
        /// Log out again before exiting.
        #[arg(long, default_value_t = false)]
        logout: bool,
    },
    /// Run the admin gate and print its decision.
    RequireAdmin,
}

struct Context {
    client: SessionClient,
    notices: Arc<NoticeBoard>,
    routes: Arc<RouteHistory>,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = build_config(&cli)?;
    let ctx = build_context(&config)?;

    let logger = spawn_event_logger(ctx.client.subscribe());

    let result = match cli.command {
        Command::Status => run_status(&ctx).await,
        Command::Login { email, password, logout } => run_login(&ctx, &email, &password, logout).await,
        Command::RequireAdmin => run_require_admin(&ctx).await,
    };

    logger.abort();
    result
}

fn build_config(cli: &Cli) -> Result<SessionConfig, CliError> {
    let mut config = SessionConfig::from_env()?;
    if let Some(base_url) = &cli.base_url {
        config = config.with_base_url(base_url)?;
    }
    if let Some(path) = &cli.path {
        config = config.with_path(path);
    }
    if cli.cookie.is_some() {
        config = config.with_cookie(cli.cookie.clone());
    }
    Ok(config)
}

fn build_context(config: &SessionConfig) -> Result<Context, CliError> {
    let resource = Arc::new(HttpSessionResource::new(config)?);
    let notices = Arc::new(NoticeBoard::new());
    let routes = Arc::new(RouteHistory::default());
    let client = SessionClient::new(resource, notices.clone(), routes.clone());
    tracing::debug!(url = %config.session_url(), "session client ready");
    Ok(Context { client, notices, routes })
}

fn spawn_event_logger(mut subscription: Subscription) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(event) = subscription.recv().await {
            tracing::info!(%event, "session event");
        }
    })
}

async fn run_status(ctx: &Context) -> Result<(), CliError> {
    ctx.client.prime().await;
    print_json(&serde_json::to_value(ctx.client.session().await)?)
}

async fn run_login(ctx: &Context, email: &str, password: &str, logout: bool) -> Result<(), CliError> {
    ctx.client.prime().await;
    let session = ctx.client.login(email, password).await?;
    print_json(&serde_json::to_value(&session)?)?;

    if logout {
        ctx.client.logout().await?;
        print_json(&serde_json::to_value(ctx.client.session().await)?)?;
    }
    Ok(())
}

async fn run_require_admin(ctx: &Context) -> Result<(), CliError> {
    ctx.client.prime().await;
    let granted = ctx.client.require_admin().await;
    print_json(&json!({
        "granted": granted,
        "route": ctx.routes.current(),
        "notices": ctx.notices.notices(),
    }))
}

fn print_json(value: &Value) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}
