pub mod commands;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::client::{ApiClient, ClientError, TokenStore};
use crate::session::{RouteDecision, Session};

#[derive(Parser)]
#[command(name = "portal")]
#[command(about = "Portal admin console - list, inspect and moderate job portal records")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[arg(long, global = true, help = "Backend URL (defaults to the logged-in server, then PORTAL_API_URL)")]
    pub server: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(flatten)]
    Auth(commands::auth::AuthCommands),

    #[command(flatten)]
    Data(commands::data::DataCommands),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

/// Options shared by every command
#[derive(Debug, Clone)]
pub struct CliContext {
    pub output_format: OutputFormat,
    pub server: Option<String>,
}

/// A signed-in connection built from the stored session
pub struct Remote {
    pub store: TokenStore,
    pub client: ApiClient,
    pub session: Session,
}

impl Remote {
    /// Map a client error to a CLI error, dropping the stored token on auth expiry
    pub fn fail(&self, err: ClientError) -> anyhow::Error {
        if !err.is_auth_expiry() {
            return utils::client_error(err);
        }

        let session = self.session.clone().expire();
        if let Err(e) = self.store.clear() {
            tracing::warn!("failed to clear stored session: {}", e);
        }
        match session.guard(None) {
            RouteDecision::RedirectToLogin => {
                anyhow::anyhow!("Session expired. Run `portal login <username>` again")
            }
            _ => anyhow::Error::new(err),
        }
    }
}

impl CliContext {
    /// `--server`, else the server of the stored session, else config
    pub fn server_url(&self, stored_server: Option<&str>) -> String {
        self.server
            .clone()
            .or_else(|| stored_server.map(str::to_string))
            .unwrap_or_else(|| crate::config::config().api.base_url.clone())
    }

    /// Rebuild the session from disk without a round trip; signed-out sessions are refused
    pub fn remote(&self) -> anyhow::Result<Remote> {
        let store = TokenStore::from_env()?;
        let stored = store.load()?;
        let server = self.server_url(stored.as_ref().map(|s| s.server.as_str()));
        let token = stored.as_ref().map(|s| s.token.clone());

        let session = Session::loading(token.clone())
            .resolve(Ok::<_, ClientError>(stored.and_then(|s| s.user)));
        if session.guard(None) != RouteDecision::Render {
            anyhow::bail!("Not logged in. Run `portal login <username>` first");
        }

        let client = ApiClient::new(&server)?.with_token(token);
        Ok(Remote { store, client, session })
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let ctx = CliContext {
        output_format: OutputFormat::from_cli(&cli),
        server: cli.server,
    };

    match cli.command {
        Commands::Auth(cmd) => commands::auth::handle(cmd, &ctx).await,
        Commands::Data(cmd) => commands::data::handle(cmd, &ctx).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flattened_commands_parse() {
        let cli = Cli::try_parse_from(["portal", "--json", "login", "admin", "--password", "pw"]).unwrap();
        assert_eq!(OutputFormat::from_cli(&cli), OutputFormat::Json);
        assert!(matches!(cli.command, Commands::Auth(_)));

        let cli = Cli::try_parse_from(["portal", "delete", "jobs", "job-1"]).unwrap();
        assert!(matches!(cli.command, Commands::Data(_)));
    }

    #[test]
    fn explicit_server_wins() {
        let ctx = CliContext { output_format: OutputFormat::Text, server: Some("http://a".into()) };
        assert_eq!(ctx.server_url(Some("http://b")), "http://a");
        let ctx = CliContext { output_format: OutputFormat::Text, server: None };
        assert_eq!(ctx.server_url(Some("http://b")), "http://b");
    }

    fn signed_in_remote() -> Remote {
        use crate::client::StoredSession;
        use crate::permission::{Role, User};

        let dir = std::env::temp_dir().join(format!("portal-remote-{}", uuid::Uuid::new_v4().simple()));
        let store = TokenStore::new(dir);
        let user = User::new("u-1", "Ada", Role::Admin);
        store
            .save(&StoredSession::new("http://localhost:1", "tok", Some(user.clone())))
            .unwrap();
        Remote {
            store,
            client: ApiClient::new("http://localhost:1").unwrap(),
            session: Session::unauthenticated().login("tok", user),
        }
    }

    #[test]
    fn auth_expiry_signs_out_and_forgets_the_token() {
        let remote = signed_in_remote();
        let err = remote.fail(ClientError::AuthExpiry);
        assert!(err.to_string().contains("Session expired"));
        assert_eq!(remote.store.load().unwrap(), None);
    }

    #[test]
    fn other_errors_keep_the_stored_session() {
        let remote = signed_in_remote();
        let err = remote.fail(ClientError::NotFound("No jobs record 'x'".into()));
        assert!(err.to_string().contains("No jobs record"));
        assert!(remote.store.load().unwrap().is_some());
        remote.store.clear().unwrap();
    }
}
