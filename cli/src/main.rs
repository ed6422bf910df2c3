use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use reusables::config::ConfigError;
use reusables::{AuthError, AuthSession, ClientConfig, FileTokenStore, HttpAuthApi, ProfileUpdate};
use tracing_subscriber::EnvFilter;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("{0}")]
    Auth(#[from] AuthError),
    #[error("nothing to update; pass at least one of --name, --avatar, --email")]
    EmptyProfileUpdate,
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "authctl", about = "Drive an auth session against a REST backend")]
struct Cli {
    /// Overrides `AUTH_API_BASE_URL`.
    #[arg(long)]
    base_url: Option<String>,

    /// Overrides `AUTH_TOKEN_PATH`.
    #[arg(long)]
    token_path: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Restore the stored session and print the state.
    State,
    Login(Credentials),
    Logout,
    Register {
        #[command(flatten)]
        credentials: Credentials,
        #[arg(long)]
        name: Option<String>,
    },
    ResetPassword {
        #[arg(long, env = "AUTH_EMAIL")]
        email: String,
    },
    UpdateProfile {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        avatar: Option<String>,
        #[arg(long)]
        email: Option<String>,
    },
    Refresh,
}

#[derive(Args, Debug)]
struct Credentials {
    #[arg(long, env = "AUTH_EMAIL")]
    email: String,

    #[arg(long, env = "AUTH_PASSWORD", hide_env_values = true)]
    password: String,
}

type CliSession = AuthSession<HttpAuthApi, FileTokenStore>;

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let dotenv = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
    match dotenv {
        Ok(path) => tracing::debug!(path = %path.display(), "loaded .env"),
        Err(e) => tracing::debug!(error = %e, "no .env loaded"),
    }

    let cli = Cli::parse();
    let config = resolve_config(cli.base_url, cli.token_path)?;
    let session = open_session(&config)?;
    session.initialize().await;

    let outcome = run(&session, cli.command).await;
    print_state(&session)?;
    outcome
}

fn resolve_config(base_url: Option<String>, token_path: Option<PathBuf>) -> Result<ClientConfig, CliError> {
    let mut config = ClientConfig::from_env()?;
    if let Some(url) = base_url {
        config.api_base_url = url.trim_end_matches('/').to_owned();
    }
    if let Some(path) = token_path {
        config.token_path = path;
    }
    tracing::info!(base_url = %config.api_base_url, token_path = %config.token_path.display(), "authctl config");
    Ok(config)
}

fn open_session(config: &ClientConfig) -> Result<CliSession, CliError> {
    let api = HttpAuthApi::new(config)?;
    let store = FileTokenStore::new(config.token_path.clone(), config.token_key.clone());
    Ok(AuthSession::new(api, store))
}

async fn run(session: &CliSession, command: Command) -> Result<(), CliError> {
    match command {
        Command::State => {}
        Command::Login(credentials) => session.login(&credentials.email, &credentials.password).await?,
        Command::Logout => session.logout().await,
        Command::Register { credentials, name } => {
            session
                .register(&credentials.email, &credentials.password, name.as_deref())
                .await?;
        }
        Command::ResetPassword { email } => session.reset_password(&email).await?,
        Command::UpdateProfile { name, avatar, email } => {
            let update = ProfileUpdate { name, avatar, email, ..ProfileUpdate::default() };
            if update.is_empty() {
                return Err(CliError::EmptyProfileUpdate);
            }
            session.update_profile(&update).await?;
        }
        Command::Refresh => session.refresh_token().await?,
    }
    Ok(())
}

fn print_state(session: &CliSession) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(&session.state())?;
    println!("{rendered}");
    Ok(())
}
