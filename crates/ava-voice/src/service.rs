use crate::config::LiveKitConfig;
use crate::error::VoiceError;
use livekit_api::access_token::{AccessToken, VideoGrants};
use std::time::Duration;

/// Who is joining which room, as encoded into a join token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinGrant {
    pub room_name: String,
    pub participant_identity: String,
    pub participant_name: String,
    /// Opaque participant metadata, visible to the agent once joined.
    pub metadata: String,
}

#[derive(Debug, Clone)]
pub struct VoiceService {
    config: LiveKitConfig,
}

impl VoiceService {
    pub fn new(config: LiveKitConfig) -> Self {
        if !config.is_complete() {
            tracing::warn!(
                missing = ?config.missing_fields(),
                "LiveKit credentials incomplete, token requests will fail"
            );
        }
        Self { config }
    }

    pub fn is_configured(&self) -> bool {
        self.config.is_complete()
    }

    /// Returns the browser-facing room server URL.
    pub fn client_url(&self) -> &str {
        self.config.client_url()
    }

    pub fn config(&self) -> &LiveKitConfig {
        &self.config
    }

    /// Signs a join token that lets the participant publish audio and data
    /// and subscribe to the agent's tracks in `grant.room_name`.
    pub fn generate_join_token(&self, grant: &JoinGrant) -> Result<String, VoiceError> {
        if !self.is_configured() {
            return Err(VoiceError::Config(format!(
                "missing LiveKit settings: {}",
                self.config.missing_fields().join(", ")
            )));
        }

        let token = AccessToken::with_api_key(&self.config.api_key, &self.config.api_secret)
            .with_identity(&grant.participant_identity)
            .with_name(&grant.participant_name)
            .with_metadata(&grant.metadata)
            .with_grants(VideoGrants {
                room_join: true,
                room: grant.room_name.clone(),
                can_publish: true,
                can_subscribe: true,
                can_publish_data: true,
                ..Default::default()
            })
            .with_ttl(Duration::from_secs(self.config.token_ttl_seconds));

        token.to_jwt().map_err(VoiceError::LiveKit)
    }
}
