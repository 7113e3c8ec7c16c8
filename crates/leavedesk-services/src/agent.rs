//! Hosted chat agent bootstrap
//!
//! The dashboard embeds a hosted conversational agent. Its loader script must
//! be fetched and configured exactly once per process; `AgentBootstrap` guards
//! that with a once-cell instead of relying on ambient global state.

use std::sync::{Arc, OnceLock};
use std::time::Duration;

use async_trait::async_trait;
use leavedesk_core::AgentConfig;
use serde::Serialize;
use tokio::sync::OnceCell;

const LOADER_PATH: &str = "/wxochat/wxoLoader.js?embed=true";
const LOADER_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    #[error("Agent widget is disabled (AGENT_ENABLED=false)")]
    Disabled,

    #[error("Agent setting {0} is not configured")]
    MissingSetting(&'static str),

    #[error("Failed to fetch agent loader: {0}")]
    Http(String),

    #[error("Agent loader returned HTTP {0}")]
    Status(u16),

    #[error("Agent loader script is empty")]
    EmptyScript,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatOptions {
    #[serde(rename = "agentId")]
    pub agent_id: String,
    #[serde(rename = "agentEnvironmentId", skip_serializing_if = "Option::is_none")]
    pub agent_environment_id: Option<String>,
}

/// Configuration object handed to the loader script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AgentConfiguration {
    #[serde(rename = "orchestrationID")]
    pub orchestration_id: String,
    #[serde(rename = "hostURL")]
    pub host_url: String,
    #[serde(rename = "rootElementID")]
    pub root_element_id: String,
    #[serde(rename = "deploymentPlatform")]
    pub deployment_platform: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crn: Option<String>,
    #[serde(rename = "chatOptions")]
    pub chat_options: ChatOptions,
}

impl AgentConfiguration {
    pub fn from_config(config: &AgentConfig) -> Result<Self, AgentError> {
        let orchestration_id = config
            .orchestration_id
            .clone()
            .ok_or(AgentError::MissingSetting("AGENT_ORCHESTRATION_ID"))?;
        let agent_id = config
            .agent_id
            .clone()
            .ok_or(AgentError::MissingSetting("AGENT_ID"))?;

        Ok(Self {
            orchestration_id,
            host_url: config.host_url.trim_end_matches('/').to_string(),
            root_element_id: config.root_element_id.clone(),
            deployment_platform: config.deployment_platform.clone(),
            crn: config.crn.clone(),
            chat_options: ChatOptions {
                agent_id,
                agent_environment_id: config.agent_environment_id.clone(),
            },
        })
    }

    pub fn loader_url(&self) -> String {
        format!("{}{}", self.host_url, LOADER_PATH)
    }
}

/// A loaded, configured agent widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentHandle {
    pub loader_url: String,
    pub configuration: AgentConfiguration,
    pub script_bytes: usize,
}

/// Fetches the agent loader script.
#[async_trait]
pub trait AgentLoader: Send + Sync {
    async fn load(&self, configuration: AgentConfiguration) -> Result<AgentHandle, AgentError>;
}

/// Loads the script over HTTP.
pub struct HttpAgentLoader {
    client: reqwest::Client,
}

impl HttpAgentLoader {
    pub fn new() -> Result<Self, AgentError> {
        let client = reqwest::Client::builder()
            .timeout(LOADER_TIMEOUT)
            .build()
            .map_err(|e| AgentError::Http(e.to_string()))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl AgentLoader for HttpAgentLoader {
    async fn load(&self, configuration: AgentConfiguration) -> Result<AgentHandle, AgentError> {
        let loader_url = configuration.loader_url();
        let start = std::time::Instant::now();

        let response = self
            .client
            .get(&loader_url)
            .send()
            .await
            .map_err(|e| AgentError::Http(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AgentError::Status(status.as_u16()));
        }

        let script = response
            .bytes()
            .await
            .map_err(|e| AgentError::Http(e.to_string()))?;
        if script.is_empty() {
            return Err(AgentError::EmptyScript);
        }

        tracing::info!(
            url = %loader_url,
            size_bytes = script.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Agent loader fetched"
        );

        Ok(AgentHandle {
            loader_url,
            configuration,
            script_bytes: script.len(),
        })
    }
}

/// One-time agent initialization.
#[derive(Default)]
pub struct AgentBootstrap {
    cell: OnceCell<Arc<AgentHandle>>,
}

static GLOBAL: OnceLock<AgentBootstrap> = OnceLock::new();

impl AgentBootstrap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process-wide instance.
    pub fn global() -> &'static AgentBootstrap {
        GLOBAL.get_or_init(AgentBootstrap::new)
    }

    /// Load the agent unless already loaded. Concurrent callers share one load;
    /// a failed load leaves the bootstrap empty so a later call can retry.
    pub async fn init(
        &self,
        config: &AgentConfig,
        loader: &dyn AgentLoader,
    ) -> Result<Arc<AgentHandle>, AgentError> {
        if let Some(handle) = self.cell.get() {
            return Ok(handle.clone());
        }
        if !config.enabled {
            return Err(AgentError::Disabled);
        }
        let configuration = AgentConfiguration::from_config(config)?;

        let handle = self
            .cell
            .get_or_try_init(|| async move {
                let handle = loader.load(configuration).await.map_err(|e| {
                    tracing::error!(error = %e, "Agent widget initialization failed");
                    e
                })?;
                Ok::<_, AgentError>(Arc::new(handle))
            })
            .await?;

        Ok(handle.clone())
    }

    pub fn get(&self) -> Option<Arc<AgentHandle>> {
        self.cell.get().cloned()
    }

    pub fn is_initialized(&self) -> bool {
        self.cell.initialized()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingLoader {
        calls: AtomicUsize,
        fail_first: bool,
    }

    impl CountingLoader {
        fn new(fail_first: bool) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail_first,
            }
        }
    }

    #[async_trait]
    impl AgentLoader for CountingLoader {
        async fn load(&self, configuration: AgentConfiguration) -> Result<AgentHandle, AgentError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::task::yield_now().await;
            if self.fail_first && call == 0 {
                return Err(AgentError::Status(503));
            }
            Ok(AgentHandle {
                loader_url: configuration.loader_url(),
                configuration,
                script_bytes: 128,
            })
        }
    }

    fn config() -> AgentConfig {
        AgentConfig {
            enabled: true,
            host_url: "https://agents.example.com/".to_string(),
            orchestration_id: Some("org_1".to_string()),
            crn: None,
            agent_id: Some("agent_7".to_string()),
            agent_environment_id: Some("env_3".to_string()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn loads_once_for_concurrent_callers() {
        let bootstrap = Arc::new(AgentBootstrap::new());
        let loader = Arc::new(CountingLoader::new(false));
        let config = config();

        let mut tasks = Vec::new();
        for _ in 0..8 {
            let bootstrap = bootstrap.clone();
            let loader = loader.clone();
            let config = config.clone();
            tasks.push(tokio::spawn(async move {
                bootstrap.init(&config, loader.as_ref()).await.map(|h| h.script_bytes)
            }));
        }
        for task in tasks {
            assert_eq!(task.await.unwrap().unwrap(), 128);
        }

        assert_eq!(loader.calls.load(Ordering::SeqCst), 1);
        assert!(bootstrap.is_initialized());
    }

    #[tokio::test]
    async fn failed_load_can_be_retried() {
        let bootstrap = AgentBootstrap::new();
        let loader = CountingLoader::new(true);

        let err = bootstrap.init(&config(), &loader).await.unwrap_err();
        assert!(matches!(err, AgentError::Status(503)));
        assert!(bootstrap.get().is_none());

        let handle = bootstrap.init(&config(), &loader).await.unwrap();
        assert_eq!(
            handle.loader_url,
            "https://agents.example.com/wxochat/wxoLoader.js?embed=true"
        );
        assert_eq!(loader.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn disabled_agent_is_not_loaded() {
        let bootstrap = AgentBootstrap::new();
        let loader = CountingLoader::new(false);
        let config = AgentConfig::default();

        assert!(matches!(
            bootstrap.init(&config, &loader).await,
            Err(AgentError::Disabled)
        ));
        assert_eq!(loader.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn configuration_requires_ids() {
        let mut config = config();
        config.agent_id = None;
        assert!(matches!(
            AgentConfiguration::from_config(&config),
            Err(AgentError::MissingSetting("AGENT_ID"))
        ));
    }

    #[test]
    fn configuration_uses_widget_field_names() {
        let configuration = AgentConfiguration::from_config(&config()).unwrap();
        let json = serde_json::to_value(&configuration).unwrap();
        assert_eq!(json["orchestrationID"], "org_1");
        assert_eq!(json["hostURL"], "https://agents.example.com");
        assert_eq!(json["chatOptions"]["agentId"], "agent_7");
        assert_eq!(json["chatOptions"]["agentEnvironmentId"], "env_3");
        assert!(json.get("crn").is_none());
    }

    #[test]
    fn global_instance_is_shared() {
        assert!(std::ptr::eq(AgentBootstrap::global(), AgentBootstrap::global()));
    }
}
