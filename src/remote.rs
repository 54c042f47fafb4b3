//! HTTP world source backed by the StoryLeaf REST API.

use log::debug;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

use crate::error::ExplorerError;
use crate::protocol::{
    paths, HealthStatus, InteractionEnvelope, InteractionReply, InteractionRequest, WorldCatalog,
    WorldEnvelope, WorldSummary,
};
use crate::source::WorldSource;
use crate::types::WorldData;

/// Upper bound on how much of an error body is kept in [`ExplorerError::Status`].
const MAX_ERROR_BODY: usize = 512;

#[derive(Debug, Clone)]
pub struct RemoteWorldSource {
    base_url: String,
    agent: ureq::Agent,
}

impl RemoteWorldSource {
    /// `base_url` is the server root, e.g. `http://localhost:5000`.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let agent = ureq::AgentBuilder::new().timeout(timeout).build();
        Self { base_url, agent }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `GET /api/health`.
    pub fn health(&self) -> Result<HealthStatus, ExplorerError> {
        self.get_json(paths::HEALTH)
    }

    // -----------------------------------------------------------------------
    // Request helpers
    // -----------------------------------------------------------------------

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ExplorerError> {
        let url = self.url(path);
        debug!("GET {}", url);
        let response = self.agent.get(&url).call().map_err(convert_error)?;
        response
            .into_json::<T>()
            .map_err(|e| ExplorerError::Decode(format!("GET {}: {}", path, e)))
    }

    fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ExplorerError> {
        let url = self.url(path);
        debug!("POST {}", url);
        let response = self
            .agent
            .post(&url)
            .set("Content-Type", "application/json")
            .send_json(body)
            .map_err(convert_error)?;
        response
            .into_json::<T>()
            .map_err(|e| ExplorerError::Decode(format!("POST {}: {}", path, e)))
    }
}

/// Convert a ureq error into an [`ExplorerError`].
fn convert_error(e: ureq::Error) -> ExplorerError {
    match e {
        ureq::Error::Status(code, response) => {
            let mut body = response.into_string().unwrap_or_default();
            if body.len() > MAX_ERROR_BODY {
                let cut = (0..=MAX_ERROR_BODY)
                    .rev()
                    .find(|i| body.is_char_boundary(*i))
                    .unwrap_or(0);
                body.truncate(cut);
            }
            ExplorerError::Status { code, body }
        }
        other => ExplorerError::Transport(other.to_string()),
    }
}

impl WorldSource for RemoteWorldSource {
    fn name(&self) -> &'static str {
        "remote"
    }

    fn load_world(&self, world_id: &str) -> Result<WorldData, ExplorerError> {
        let envelope: WorldEnvelope = self.get_json(&paths::world(world_id))?;
        Ok(envelope.world)
    }

    fn interact(
        &self,
        world_id: &str,
        request: &InteractionRequest,
    ) -> Result<InteractionReply, ExplorerError> {
        let envelope: InteractionEnvelope = self.post_json(&paths::interact(world_id), request)?;
        Ok(envelope.response)
    }

    fn list_worlds(&self) -> Result<Vec<WorldSummary>, ExplorerError> {
        let catalog: WorldCatalog = self.get_json(paths::WORLD_LIST)?;
        Ok(catalog.worlds)
    }
}
