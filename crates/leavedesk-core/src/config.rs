//! Configuration module
//!
//! Configuration is read from the environment (optionally seeded from a `.env`
//! file) and grouped by concern: storage, attachments, fuzzy matching, e-mail
//! delivery, and the hosted chat agent.

use std::env;
use std::str::FromStr;

use crate::constants::{
    DEFAULT_MATCH_PREFIX_LENGTH, DEFAULT_SIMILARITY_THRESHOLD, MAX_ATTACHMENT_SIZE_BYTES,
    PDF_CONTENT_TYPE, STATUS_ON_PROCESS,
};
use crate::matching::MatchingConfig;
use crate::storage_types::StorageBackend;

const DB_MAX_CONNECTIONS: u32 = 5;
const SMTP_PORT: u16 = 587;
const AGENT_HOST_URL: &str = "https://us-south.watson-orchestrate.cloud.ibm.com";
const AGENT_ROOT_ELEMENT_ID: &str = "agent-widget-container";
const AGENT_DEPLOYMENT_PLATFORM: &str = "ibmcloud";

/// Parse an optional value, falling back to `default` (with a warning) when it is malformed.
fn parse_or<T: FromStr>(key: &str, raw: Option<String>, default: T) -> T {
    match raw {
        Some(value) => value.parse().unwrap_or_else(|_| {
            tracing::warn!(key = %key, value = %value, "Ignoring invalid configuration value");
            default
        }),
        None => default,
    }
}

/// Attachment upload policy
#[derive(Clone, Debug, PartialEq)]
pub struct AttachmentConfig {
    pub max_size_bytes: u64,
    pub content_type: String,
    /// Status written to the leave request once its attachment is recorded.
    pub upload_status: String,
}

impl Default for AttachmentConfig {
    fn default() -> Self {
        Self {
            max_size_bytes: MAX_ATTACHMENT_SIZE_BYTES,
            content_type: PDF_CONTENT_TYPE.to_string(),
            upload_status: STATUS_ON_PROCESS.to_string(),
        }
    }
}

/// SMTP delivery settings for status notifications and the contact form.
#[derive(Clone, Debug, Default)]
pub struct EmailConfig {
    pub enabled: bool,
    pub smtp_host: Option<String>,
    pub smtp_port: u16,
    pub smtp_user: Option<String>,
    pub smtp_password: Option<String>,
    pub smtp_from: Option<String>,
    pub smtp_tls: bool,
}

/// Hosted conversational agent (embedded chat widget) settings.
#[derive(Clone, Debug, PartialEq)]
pub struct AgentConfig {
    pub enabled: bool,
    pub host_url: String,
    pub orchestration_id: Option<String>,
    pub crn: Option<String>,
    pub agent_id: Option<String>,
    pub agent_environment_id: Option<String>,
    pub root_element_id: String,
    pub deployment_platform: String,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            host_url: AGENT_HOST_URL.to_string(),
            orchestration_id: None,
            crn: None,
            agent_id: None,
            agent_environment_id: None,
            root_element_id: AGENT_ROOT_ELEMENT_ID.to_string(),
            deployment_platform: AGENT_DEPLOYMENT_PLATFORM.to_string(),
        }
    }
}

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    pub environment: String,
    pub database_url: Option<String>,
    pub db_max_connections: u32,
    // Storage configuration
    pub storage_backend: StorageBackend,
    pub local_storage_path: Option<String>,
    pub local_storage_base_url: Option<String>,
    pub s3_bucket: Option<String>,
    pub s3_region: Option<String>,
    pub s3_endpoint: Option<String>, // Custom endpoint for S3-compatible providers (MinIO, etc.)
    pub aws_region: Option<String>,
    pub attachments: AttachmentConfig,
    pub matching: MatchingConfig,
    pub email: EmailConfig,
    pub agent: AgentConfig,
}

impl Config {
    /// Load configuration from the process environment, reading `.env` first if present.
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let flag = |key: &str, default: bool| {
            get(key)
                .map(|v| matches!(v.to_lowercase().as_str(), "1" | "true" | "yes" | "on"))
                .unwrap_or(default)
        };

        let environment = get("ENVIRONMENT")
            .or_else(|| get("APP_ENV"))
            .unwrap_or_else(|| "development".to_string());

        let storage_backend = match get("STORAGE_BACKEND") {
            Some(raw) => raw.parse::<StorageBackend>()?,
            None => StorageBackend::Local,
        };

        let db_max_connections =
            parse_or("DB_MAX_CONNECTIONS", get("DB_MAX_CONNECTIONS"), DB_MAX_CONNECTIONS);

        let max_size_bytes = match get("ATTACHMENT_MAX_SIZE_MB") {
            Some(raw) => raw
                .parse::<u64>()
                .map_err(|e| anyhow::anyhow!("ATTACHMENT_MAX_SIZE_MB is not a number: {}", e))?
                .saturating_mul(1024 * 1024),
            None => MAX_ATTACHMENT_SIZE_BYTES,
        };

        let attachments = AttachmentConfig {
            max_size_bytes,
            content_type: get("ATTACHMENT_CONTENT_TYPE")
                .map(|v| v.to_lowercase())
                .unwrap_or_else(|| PDF_CONTENT_TYPE.to_string()),
            upload_status: get("ATTACHMENT_UPLOAD_STATUS")
                .unwrap_or_else(|| STATUS_ON_PROCESS.to_string()),
        };

        let matching = MatchingConfig {
            similarity_threshold: match get("ATTACHMENT_SIMILARITY_THRESHOLD") {
                Some(raw) => raw.parse::<f64>().map_err(|e| {
                    anyhow::anyhow!("ATTACHMENT_SIMILARITY_THRESHOLD is not a number: {}", e)
                })?,
                None => DEFAULT_SIMILARITY_THRESHOLD,
            },
            prefix_length: parse_or(
                "ATTACHMENT_PREFIX_LENGTH",
                get("ATTACHMENT_PREFIX_LENGTH"),
                DEFAULT_MATCH_PREFIX_LENGTH,
            ),
        };

        let email = EmailConfig {
            enabled: flag("EMAIL_ENABLED", false),
            smtp_host: get("SMTP_HOST"),
            smtp_port: parse_or("SMTP_PORT", get("SMTP_PORT"), SMTP_PORT),
            smtp_user: get("SMTP_USER"),
            smtp_password: get("SMTP_PASSWORD"),
            smtp_from: get("SMTP_FROM"),
            smtp_tls: flag("SMTP_TLS", true),
        };

        let agent_defaults = AgentConfig::default();
        let agent = AgentConfig {
            enabled: flag("AGENT_ENABLED", false),
            host_url: get("AGENT_HOST_URL").unwrap_or(agent_defaults.host_url),
            orchestration_id: get("AGENT_ORCHESTRATION_ID"),
            crn: get("AGENT_CRN"),
            agent_id: get("AGENT_ID"),
            agent_environment_id: get("AGENT_ENVIRONMENT_ID"),
            root_element_id: get("AGENT_ROOT_ELEMENT_ID")
                .unwrap_or(agent_defaults.root_element_id),
            deployment_platform: get("AGENT_DEPLOYMENT_PLATFORM")
                .unwrap_or(agent_defaults.deployment_platform),
        };

        Ok(Config {
            environment,
            database_url: get("DATABASE_URL"),
            db_max_connections,
            storage_backend,
            local_storage_path: get("LOCAL_STORAGE_PATH"),
            local_storage_base_url: get("LOCAL_STORAGE_BASE_URL"),
            s3_bucket: get("S3_BUCKET"),
            s3_region: get("S3_REGION"),
            s3_endpoint: get("S3_ENDPOINT"),
            aws_region: get("AWS_REGION"),
            attachments,
            matching,
            email,
            agent,
        })
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        matches!(self.environment.to_lowercase().as_str(), "production" | "prod")
    }

    /// Region for the S3 backend, preferring `S3_REGION` over `AWS_REGION`.
    pub fn s3_effective_region(&self) -> Option<&str> {
        self.s3_region.as_deref().or(self.aws_region.as_deref())
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if let Some(ref url) = self.database_url {
            if !(url.starts_with("postgres://") || url.starts_with("postgresql://")) {
                return Err(anyhow::anyhow!(
                    "DATABASE_URL must be a valid PostgreSQL connection string"
                ));
            }
        }

        match self.storage_backend {
            StorageBackend::S3 => {
                if self.s3_bucket.is_none() {
                    return Err(anyhow::anyhow!(
                        "S3_BUCKET must be set when using S3 storage backend"
                    ));
                }
                if self.s3_effective_region().is_none() {
                    return Err(anyhow::anyhow!(
                        "S3_REGION or AWS_REGION must be set when using S3 storage backend"
                    ));
                }
            }
            StorageBackend::Local => {
                if self.local_storage_path.is_none() {
                    return Err(anyhow::anyhow!(
                        "LOCAL_STORAGE_PATH must be set when using local storage backend"
                    ));
                }
                if self.local_storage_base_url.is_none() {
                    return Err(anyhow::anyhow!(
                        "LOCAL_STORAGE_BASE_URL must be set when using local storage backend"
                    ));
                }
            }
            StorageBackend::Memory => {
                if self.is_production() {
                    return Err(anyhow::anyhow!(
                        "memory storage backend cannot be used in production"
                    ));
                }
            }
        }

        if self.attachments.max_size_bytes == 0 {
            return Err(anyhow::anyhow!("ATTACHMENT_MAX_SIZE_MB must be greater than 0"));
        }

        if !(0.0..=1.0).contains(&self.matching.similarity_threshold) {
            return Err(anyhow::anyhow!(
                "ATTACHMENT_SIMILARITY_THRESHOLD must be between 0 and 1"
            ));
        }

        if self.email.enabled && (self.email.smtp_host.is_none() || self.email.smtp_from.is_none())
        {
            return Err(anyhow::anyhow!(
                "EMAIL_ENABLED=true requires SMTP_HOST and SMTP_FROM to be set"
            ));
        }

        if self.agent.enabled
            && (self.agent.orchestration_id.is_none() || self.agent.agent_id.is_none())
        {
            return Err(anyhow::anyhow!(
                "AGENT_ENABLED=true requires AGENT_ORCHESTRATION_ID and AGENT_ID to be set"
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> anyhow::Result<Config> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_match_attachment_policy() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.environment, "development");
        assert_eq!(config.storage_backend, StorageBackend::Local);
        assert_eq!(config.attachments.max_size_bytes, 10 * 1024 * 1024);
        assert_eq!(config.attachments.content_type, "application/pdf");
        assert_eq!(config.attachments.upload_status, "On process");
        assert_eq!(config.matching.similarity_threshold, 0.7);
        assert_eq!(config.matching.prefix_length, 10);
        assert!(!config.email.enabled);
        assert!(!config.agent.enabled);
    }

    #[test]
    fn matching_thresholds_are_configurable() {
        let config = config_from(&[
            ("ATTACHMENT_SIMILARITY_THRESHOLD", "0.85"),
            ("ATTACHMENT_PREFIX_LENGTH", "6"),
        ])
        .unwrap();
        assert_eq!(config.matching.similarity_threshold, 0.85);
        assert_eq!(config.matching.prefix_length, 6);
    }

    #[test]
    fn malformed_optional_numbers_fall_back_to_defaults() {
        let config = config_from(&[
            ("ATTACHMENT_PREFIX_LENGTH", "ten"),
            ("SMTP_PORT", "99999"),
            ("DB_MAX_CONNECTIONS", "-1"),
        ])
        .unwrap();
        assert_eq!(config.matching.prefix_length, 10);
        assert_eq!(config.email.smtp_port, 587);
        assert_eq!(config.db_max_connections, 5);
    }

    #[test]
    fn local_backend_requires_path_and_url() {
        let config = config_from(&[("STORAGE_BACKEND", "local")]).unwrap();
        assert!(config.validate().is_err());

        let config = config_from(&[
            ("STORAGE_BACKEND", "local"),
            ("LOCAL_STORAGE_PATH", "/tmp/leavedesk"),
            ("LOCAL_STORAGE_BASE_URL", "http://localhost:3000/attachments"),
        ])
        .unwrap();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn s3_region_falls_back_to_aws_region() {
        let config = config_from(&[
            ("STORAGE_BACKEND", "s3"),
            ("S3_BUCKET", "leave-attachments"),
            ("AWS_REGION", "eu-west-1"),
        ])
        .unwrap();
        assert_eq!(config.s3_effective_region(), Some("eu-west-1"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_non_postgres_database_url() {
        let config = config_from(&[
            ("STORAGE_BACKEND", "memory"),
            ("DATABASE_URL", "mysql://localhost/hr"),
        ])
        .unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn email_requires_smtp_settings() {
        let config = config_from(&[("STORAGE_BACKEND", "memory"), ("EMAIL_ENABLED", "true")])
            .unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn memory_backend_is_refused_in_production() {
        let config = config_from(&[("STORAGE_BACKEND", "memory"), ("ENVIRONMENT", "prod")])
            .unwrap();
        assert!(config.is_production());
        assert!(config.validate().is_err());
    }

    #[test]
    fn invalid_backend_is_an_error() {
        assert!(config_from(&[("STORAGE_BACKEND", "ftp")]).is_err());
    }
}
