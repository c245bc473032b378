//! Agent chat session: transcript and composer for the active agent.
//!
//! Replies are local acknowledgements; no model is called from here.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::agents::{AgentProfile, AgentRoster};
use crate::error::{CoreError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentAuthor {
    User,
    Agent,
    System,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentMessage {
    pub id: String,
    pub agent_id: String,
    pub author: AgentAuthor,
    pub content: String,
    /// RFC 3339
    pub timestamp: String,
}

impl AgentMessage {
    fn new(agent_id: &str, author: AgentAuthor, content: String) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            agent_id: agent_id.to_string(),
            author,
            content,
            timestamp: Utc::now().to_rfc3339(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AgentSession {
    active_agent_id: String,
    agent: Option<AgentProfile>,
    active_model_id: String,
    transcript: Vec<AgentMessage>,
    composer_value: String,
}

impl AgentSession {
    /// Starts a session for `agent_id`. Unknown agents get an empty transcript.
    pub fn hydrate(roster: &AgentRoster, agent_id: &str, model_id: impl Into<String>) -> Self {
        let agent = roster.get(agent_id).cloned();
        let transcript = match &agent {
            Some(profile) => {
                tracing::info!(agent_id, "hydrated agent session");
                vec![AgentMessage::new(
                    agent_id,
                    AgentAuthor::System,
                    format!("Connected to {} ({}).", profile.name, profile.model),
                )]
            }
            None => {
                tracing::warn!(agent_id, "attempted to hydrate agent session with unknown agent id");
                Vec::new()
            }
        };
        Self {
            active_agent_id: agent_id.to_string(),
            agent,
            active_model_id: model_id.into(),
            transcript,
            composer_value: String::new(),
        }
    }

    pub fn active_agent_id(&self) -> &str {
        &self.active_agent_id
    }

    pub fn agent(&self) -> Option<&AgentProfile> {
        self.agent.as_ref()
    }

    pub fn transcript(&self) -> &[AgentMessage] {
        &self.transcript
    }

    pub fn composer_value(&self) -> &str {
        &self.composer_value
    }

    pub fn set_composer_value(&mut self, value: impl Into<String>) {
        self.composer_value = value.into();
    }

    /// Model used for replies; follows the catalog's active selection.
    pub fn set_active_model_id(&mut self, model_id: impl Into<String>) {
        self.active_model_id = model_id.into();
    }

    /// Sends the trimmed composer text and appends the agent's acknowledgement.
    pub fn send_user_message(&mut self) -> Result<()> {
        let trimmed = self.composer_value.trim().to_string();
        if trimmed.is_empty() {
            tracing::debug!("ignoring empty agent composer submission");
            return Err(CoreError::EmptyMessage);
        }
        let agent = self
            .agent
            .as_ref()
            .ok_or_else(|| CoreError::UnknownAgent(self.active_agent_id.clone()))?;

        let reply = format!(
            "{} ({}) acknowledges: “{}”. (Profile model: {}, temp={})",
            agent.name, self.active_model_id, trimmed, agent.model, agent.temperature
        );
        let user = AgentMessage::new(&self.active_agent_id, AgentAuthor::User, trimmed.clone());
        let echo = AgentMessage::new(&self.active_agent_id, AgentAuthor::Agent, reply);
        self.transcript.push(user);
        self.transcript.push(echo);
        self.composer_value.clear();
        tracing::info!(
            agent_id = %self.active_agent_id,
            user_message_length = trimmed.len(),
            "appended agent conversation exchange"
        );
        Ok(())
    }

    /// Records a canvas change the agent suggests.
    pub fn send_canvas_action(&mut self, description: &str) -> Result<()> {
        let Some(agent) = self.agent.as_ref() else {
            tracing::warn!("cannot perform canvas action without active agent");
            return Err(CoreError::UnknownAgent(self.active_agent_id.clone()));
        };
        let content = format!(
            "{} ({}) suggests canvas update: {}",
            agent.name, self.active_model_id, description
        );
        self.transcript.push(AgentMessage::new(
            &self.active_agent_id,
            AgentAuthor::System,
            content,
        ));
        tracing::info!(agent_id = %self.active_agent_id, description, "agent issued canvas action");
        Ok(())
    }
}
