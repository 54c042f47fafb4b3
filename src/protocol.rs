//! `/api/worlds/*` wire protocol.
//!
//! This module owns **every message that crosses the HTTP boundary** between
//! the explorer and the StoryLeaf backend.
//!
//! ## Endpoints
//!
//! | Path                          | Method | Request                | Response               |
//! |-------------------------------|--------|------------------------|------------------------|
//! | `/api/worlds/{id}`            | GET    | -                      | [`WorldEnvelope`]      |
//! | `/api/worlds/{id}/interact`   | POST   | [`InteractionRequest`] | [`InteractionEnvelope`]|
//! | `/api/worlds/list`            | GET    | -                      | [`WorldCatalog`]       |
//! | `/api/health`                 | GET    | -                      | [`HealthStatus`]       |
//!
//! ## Design rules
//!
//! 1. Every struct is `Serialize + Deserialize` with snake_case JSON.
//! 2. Positions travel as `[x, y, z]` arrays.
//! 3. Unknown response fields are ignored; missing required fields are a
//!    decode error.

use serde::{Deserialize, Serialize};

use crate::types::{Vec3, WorldData};

// ---------------------------------------------------------------------------
// World descriptor  (GET /api/worlds/{id})
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldEnvelope {
    pub world: WorldData,
}

// ---------------------------------------------------------------------------
// Interactions  (POST /api/worlds/{id}/interact)
// ---------------------------------------------------------------------------

/// Body of an interaction request: `{"type": ..., "data": {...}}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum InteractionRequest {
    /// Free-text wish or command addressed to the world.
    Prompt { prompt: String, position: Vec3 },
    /// Click on an interactive element.
    CharacterInteraction { element_name: String, position: Vec3 },
}

impl InteractionRequest {
    pub fn kind(&self) -> &'static str {
        match self {
            InteractionRequest::Prompt { .. } => "prompt",
            InteractionRequest::CharacterInteraction { .. } => "character_interaction",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InteractionEnvelope {
    pub response: InteractionReply,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct InteractionReply {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub world_changes: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dialogue: Option<String>,
}

// ---------------------------------------------------------------------------
// Catalogue  (GET /api/worlds/list)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WorldSummary {
    pub id: String,
    pub title: String,
    pub description: String,
    pub environment_type: String,
}

impl From<&WorldData> for WorldSummary {
    fn from(w: &WorldData) -> Self {
        Self {
            id: w.id.clone(),
            title: w.title.clone(),
            description: w.description.clone(),
            environment_type: w.environment_type.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldCatalog {
    #[serde(default)]
    pub worlds: Vec<WorldSummary>,
}

// ---------------------------------------------------------------------------
// Health  (GET /api/health)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

/// All backend paths used by the explorer.
pub mod paths {
    pub const HEALTH: &str = "/api/health";
    pub const WORLD_LIST: &str = "/api/worlds/list";

    /// `/api/worlds/{id}` with the id percent-encoded.
    pub fn world(world_id: &str) -> String {
        format!("/api/worlds/{}", urlencoding::encode(world_id))
    }

    /// `/api/worlds/{id}/interact` with the id percent-encoded.
    pub fn interact(world_id: &str) -> String {
        format!("/api/worlds/{}/interact", urlencoding::encode(world_id))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn prompt_request_shape() {
        let req = InteractionRequest::Prompt {
            prompt: "faça chover".into(),
            position: Vec3::new(0.0, 0.0, 2.0),
        };
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            json!({"type": "prompt", "data": {"prompt": "faça chover", "position": [0.0, 0.0, 2.0]}})
        );
        assert_eq!(req.kind(), "prompt");
    }

    #[test]
    fn character_interaction_request_shape() {
        let req = InteractionRequest::CharacterInteraction {
            element_name: "Guia Místico".into(),
            position: Vec3::new(4.0, 0.0, 4.0),
        };
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            json!({
                "type": "character_interaction",
                "data": {"element_name": "Guia Místico", "position": [4.0, 0.0, 4.0]}
            })
        );
    }

    #[test]
    fn reply_optional_fields() {
        let env: InteractionEnvelope = serde_json::from_value(json!({
            "success": true,
            "interaction_id": "abc",
            "response": {
                "message": "O personagem responde à sua presença...",
                "dialogue": "Bem-vindo, viajante!",
                "quest_offered": "Encontre as três Sementes da Sabedoria"
            }
        }))
        .unwrap();
        assert_eq!(env.response.dialogue.as_deref(), Some("Bem-vindo, viajante!"));
        assert!(env.response.world_changes.is_none());
    }

    #[test]
    fn reply_without_message_is_rejected() {
        let r: Result<InteractionEnvelope, _> =
            serde_json::from_value(json!({"response": {"dialogue": "oi"}}));
        assert!(r.is_err());
    }

    #[test]
    fn health_status() {
        let ok: HealthStatus = serde_json::from_value(json!({"status": "healthy"})).unwrap();
        let bad: HealthStatus = serde_json::from_value(json!({"status": "degraded"})).unwrap();
        assert!(ok.is_healthy());
        assert!(!bad.is_healthy());
    }

    #[test]
    fn world_paths_are_encoded() {
        assert_eq!(paths::world("alice_wonderland"), "/api/worlds/alice_wonderland");
        assert_eq!(paths::interact("a b/c"), "/api/worlds/a%20b%2Fc/interact");
    }
}
