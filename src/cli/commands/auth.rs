use clap::Subcommand;
use dialoguer::Password;
use serde_json::json;

use crate::cli::utils::{client_error, output_json, output_success};
use crate::cli::{CliContext, OutputFormat};
use crate::client::{ApiClient, StoredSession, TokenStore};
use crate::session::Session;

#[derive(Subcommand)]
pub enum AuthCommands {
    #[command(about = "Login to the portal backend")]
    Login {
        #[arg(help = "Username or email")]
        username: String,
        #[arg(long, help = "Password (reads PORTAL_PASSWORD, then prompts, if not provided)")]
        password: Option<String>,
    },

    #[command(about = "Forget the stored session")]
    Logout,

    #[command(about = "Show current authentication status")]
    Status,

    #[command(about = "Show current user information from the server")]
    Whoami,
}

pub async fn handle(cmd: AuthCommands, ctx: &CliContext) -> anyhow::Result<()> {
    match cmd {
        AuthCommands::Login { username, password } => login(ctx, &username, password).await,
        AuthCommands::Logout => logout(ctx),
        AuthCommands::Status => status(ctx).await,
        AuthCommands::Whoami => whoami(ctx).await,
    }
}

fn read_password() -> anyhow::Result<String> {
    if let Ok(password) = std::env::var("PORTAL_PASSWORD") {
        return Ok(password);
    }
    Ok(Password::new().with_prompt("Password").interact()?)
}

async fn login(ctx: &CliContext, username: &str, password: Option<String>) -> anyhow::Result<()> {
    let store = TokenStore::from_env()?;
    let stored = store.load()?;
    let server = ctx.server_url(stored.as_ref().map(|s| s.server.as_str()));

    let password = match password {
        Some(password) => password,
        None => read_password()?,
    };

    let client = ApiClient::new(&server)?;
    let response = client.login(username, &password).await.map_err(client_error)?;

    let session = Session::unauthenticated().login(response.token.clone(), response.user.clone());
    store.save(&StoredSession::new(&server, &response.token, session.user().cloned()))?;

    let user = &response.user;
    if !user.role.is_staff() {
        tracing::warn!("'{}' is a {} account and holds no admin permissions", user.name, user.role);
    }

    output_success(
        &ctx.output_format,
        &format!("Logged in to {} as {} ({})", server, user.name, user.role),
        Some(json!({
            "server": server,
            "user": user,
            "expires_in": response.expires_in,
        })),
    )
}

fn logout(ctx: &CliContext) -> anyhow::Result<()> {
    let store = TokenStore::from_env()?;
    let was_signed_in = store.load()?.is_some();
    store.clear()?;

    let message = if was_signed_in { "Logged out" } else { "No stored session" };
    output_success(&ctx.output_format, message, None)
}

async fn status(ctx: &CliContext) -> anyhow::Result<()> {
    let store = TokenStore::from_env()?;
    let Some(stored) = store.load()? else {
        return output_success(&ctx.output_format, "Not logged in", Some(json!({ "authenticated": false })));
    };

    let server = ctx.server_url(Some(&stored.server));
    let client = ApiClient::new(&server)?.with_token(Some(stored.token.clone()));
    let result = client.whoami().await;

    let expired = matches!(&result, Err(e) if e.is_auth_expiry());
    if expired {
        store.clear()?;
    }
    let session = Session::loading(Some(stored.token.clone())).resolve(result.map(Some));

    match session.user() {
        Some(user) => output_success(
            &ctx.output_format,
            &format!("Logged in to {} as {} ({})", server, user.name, user.role),
            Some(json!({
                "authenticated": true,
                "server": server,
                "user": user,
                "saved_at": stored.saved_at,
            })),
        ),
        None => {
            let message = if expired {
                "Session expired; stored token removed"
            } else {
                "Session could not be verified"
            };
            output_success(
                &ctx.output_format,
                message,
                Some(json!({ "authenticated": false, "server": server })),
            )
        }
    }
}

async fn whoami(ctx: &CliContext) -> anyhow::Result<()> {
    let remote = ctx.remote()?;
    let user = remote.client.whoami().await.map_err(|e| remote.fail(e))?;

    match ctx.output_format {
        OutputFormat::Json => output_json(&json!({ "user": user })),
        OutputFormat::Text => {
            println!("{} <{}>", user.name, user.email);
            println!("Role: {}", user.role);
            if !user.permissions.is_empty() {
                let grants: Vec<String> = user.permissions.iter().map(|p| p.to_string()).collect();
                println!("Permissions: {}", grants.join(", "));
            }
            Ok(())
        }
    }
}
