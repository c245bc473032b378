//! Agent roster shown in the agents panel.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentProvider {
    Google,
    OpenRouter,
    Ollama,
}

impl AgentProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            AgentProvider::Google => "google",
            AgentProvider::OpenRouter => "openrouter",
            AgentProvider::Ollama => "ollama",
        }
    }
}

impl fmt::Display for AgentProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentStatus {
    Online,
    Offline,
    Beta,
}

impl AgentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AgentStatus::Online => "online",
            AgentStatus::Offline => "offline",
            AgentStatus::Beta => "beta",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentProfile {
    pub id: String,
    pub name: String,
    pub provider: AgentProvider,
    pub model: String,
    pub description: String,
    pub status: AgentStatus,
    pub temperature: f32,
}

/// Known agent profiles, in display order.
#[derive(Debug, Clone)]
pub struct AgentRoster {
    profiles: Vec<AgentProfile>,
}

impl Default for AgentRoster {
    fn default() -> Self {
        Self::new(vec![
            AgentProfile {
                id: "gemini-pro-vision".to_string(),
                name: "Gemini Pro Vision".to_string(),
                provider: AgentProvider::Google,
                model: "gemini-1.5-pro".to_string(),
                description: "Google Gemini agent tuned for diagram synthesis and clustering."
                    .to_string(),
                status: AgentStatus::Online,
                temperature: 0.4,
            },
            AgentProfile {
                id: "openrouter-gpt4.1".to_string(),
                name: "OpenRouter GPT-4.1".to_string(),
                provider: AgentProvider::OpenRouter,
                model: "openrouter/gpt-4.1-mini".to_string(),
                description: "OpenRouter curated GPT-4.1 Mini for fast structuring of notes."
                    .to_string(),
                status: AgentStatus::Online,
                temperature: 0.5,
            },
            AgentProfile {
                id: "ollama-llama3.1".to_string(),
                name: "Ollama Llama 3.1".to_string(),
                provider: AgentProvider::Ollama,
                model: "llama3.1:8b".to_string(),
                description: "Local Llama 3.1 via Ollama for offline brainstorming support."
                    .to_string(),
                status: AgentStatus::Beta,
                temperature: 0.7,
            },
        ])
    }
}

impl AgentRoster {
    pub fn new(profiles: Vec<AgentProfile>) -> Self {
        Self { profiles }
    }

    pub fn get(&self, id: &str) -> Option<&AgentProfile> {
        self.profiles.iter().find(|p| p.id == id)
    }

    pub fn profiles(&self) -> &[AgentProfile] {
        &self.profiles
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_roster() {
        let roster = AgentRoster::default();
        assert_eq!(roster.profiles().len(), 3);
        let llama = roster.get("ollama-llama3.1").unwrap();
        assert_eq!(llama.provider, AgentProvider::Ollama);
        assert_eq!(llama.status, AgentStatus::Beta);
    }

    #[test]
    fn test_unknown_agent() {
        assert!(AgentRoster::default().get("nobody").is_none());
    }
}
