//! `barnstormer agents` subcommands.

use anyhow::{anyhow, Result};
use barnstormer_core::{AgentAuthor, AgentRoster, AgentSession, CoreError};
use barnstormer_constant::catalog::DEFAULT_OPENROUTER_MODEL_ID;

use crate::cli::AgentsAction;
use crate::output;

pub async fn handle(action: AgentsAction) -> Result<()> {
    match action {
        AgentsAction::List => list(),
        AgentsAction::Chat {
            agent,
            message,
            model,
            canvas,
        } => chat(&agent, &message, model, canvas.as_deref()),
    }
}

fn list() -> Result<()> {
    let roster = AgentRoster::default();
    let mut table = output::table(&["Agent", "Name", "Provider", "Model", "Status"]);
    for profile in roster.profiles() {
        output::table_row(
            &mut table,
            vec![
                profile.id.clone(),
                profile.name.clone(),
                profile.provider.to_string(),
                profile.model.clone(),
                profile.status.as_str().to_string(),
            ],
        );
    }
    output::table_print(&table, roster.profiles());
    Ok(())
}

fn chat(agent_id: &str, message: &str, model: Option<String>, canvas: Option<&str>) -> Result<()> {
    let roster = AgentRoster::default();
    let model = model.unwrap_or_else(|| DEFAULT_OPENROUTER_MODEL_ID.to_string());
    let mut session = AgentSession::hydrate(&roster, agent_id, model);

    session.set_composer_value(message);
    session.send_user_message().map_err(|e| match e {
        CoreError::UnknownAgent(id) => anyhow!(
            "Unknown agent '{id}'. Available: {}",
            roster
                .profiles()
                .iter()
                .map(|p| p.id.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        ),
        other => other.into(),
    })?;
    if let Some(description) = canvas {
        session.send_canvas_action(description)?;
    }

    output::data("transcript", session.transcript());
    if output::is_json() {
        return Ok(());
    }
    for entry in session.transcript() {
        match entry.author {
            AgentAuthor::User => output::kv("you", &entry.content),
            AgentAuthor::Agent => output::kv("agent", &entry.content),
            AgentAuthor::System => output::dim(&entry.content),
        }
    }
    Ok(())
}
