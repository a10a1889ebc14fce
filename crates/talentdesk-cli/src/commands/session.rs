//! `login`, `logout`, and `whoami` against the local session file.

use serde_json::json;
use talentdesk_config::{AuthState, StoredSession, UserProfile};

use crate::cli::{LoginArgs, OutputFormat};
use crate::client::{AppContext, CliError, CliResult};
use crate::output::to_json;

pub(crate) fn handle_login(ctx: &AppContext, args: LoginArgs) -> CliResult<String> {
    let token = args.token.trim();
    if token.is_empty() {
        return Err(CliError::validation("token must not be empty"));
    }
    let session = StoredSession::new(
        token,
        UserProfile {
            name: args.name,
            email: args.email,
            role: args.role,
        },
    );
    ctx.session.save(&session)?;
    match ctx.output {
        OutputFormat::Json => to_json(&json!({ "authenticated": true, "user": session.user })),
        OutputFormat::Table => Ok(format!(
            "logged in as {}",
            display_name(&session.user)
        )),
    }
}

pub(crate) fn handle_logout(ctx: &AppContext) -> CliResult<String> {
    let removed = ctx.session.clear()?;
    Ok(match (ctx.output, removed) {
        (OutputFormat::Json, _) => to_json(&json!({ "loggedOut": removed }))?,
        (OutputFormat::Table, true) => "logged out".to_string(),
        (OutputFormat::Table, false) => "no stored session".to_string(),
    })
}

pub(crate) fn handle_whoami(ctx: &AppContext) -> CliResult<String> {
    let state = ctx.session.auth_state();
    match (ctx.output, state) {
        (OutputFormat::Json, AuthState::Authenticated(session)) => to_json(&json!({
            "authenticated": true,
            "user": session.user,
            "savedAt": session.saved_at,
        })),
        (OutputFormat::Json, AuthState::Anonymous) => to_json(&json!({ "authenticated": false })),
        (OutputFormat::Table, AuthState::Authenticated(session)) => {
            let mut lines = vec![format!("user: {}", display_name(&session.user))];
            if let Some(role) = &session.user.role {
                lines.push(format!("role: {role}"));
            }
            lines.push(format!("since: {}", session.saved_at.to_rfc3339()));
            Ok(lines.join("\n"))
        }
        (OutputFormat::Table, AuthState::Anonymous) => Ok("not logged in".to_string()),
    }
}

fn display_name(user: &UserProfile) -> String {
    match (&user.name, &user.email) {
        (Some(name), Some(email)) => format!("{name} <{email}>"),
        (Some(name), None) => name.clone(),
        (None, Some(email)) => email.clone(),
        (None, None) => "unnamed user".to_string(),
    }
}
