//! Integration configurations: Wikipedia and SMTP

use application::ApplicationError;
use domain::EmailAddress;
use integration_smtp::{SmtpConfig, SmtpSecurity, TlsConfig};
use integration_wikipedia::WikipediaConfig;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use super::default_true;

// ==============================
// Wikipedia Configuration
// ==============================

/// Wikipedia client configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WikipediaAppConfig {
    /// User-Agent header; the integration default is used when unset
    #[serde(default)]
    pub user_agent: Option<String>,

    /// Connect timeout in seconds (default: 5)
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    /// Maximum redirects to follow (default: 5)
    #[serde(default = "default_max_redirects")]
    pub max_redirects: usize,
}

const fn default_connect_timeout_secs() -> u64 {
    5
}

const fn default_max_redirects() -> usize {
    5
}

impl Default for WikipediaAppConfig {
    fn default() -> Self {
        Self {
            user_agent: None,
            connect_timeout_secs: default_connect_timeout_secs(),
            max_redirects: default_max_redirects(),
        }
    }
}

impl WikipediaAppConfig {
    /// Convert to `integration_wikipedia`'s `WikipediaConfig`
    #[must_use]
    pub fn to_wikipedia_config(&self) -> WikipediaConfig {
        let defaults = WikipediaConfig::default();
        WikipediaConfig {
            user_agent: self
                .user_agent
                .clone()
                .filter(|ua| !ua.trim().is_empty())
                .unwrap_or(defaults.user_agent),
            connect_timeout_secs: self.connect_timeout_secs,
            max_redirects: self.max_redirects,
        }
    }

    pub fn validate(&self) -> Result<(), ApplicationError> {
        if self.connect_timeout_secs == 0 {
            return Err(ApplicationError::Configuration(
                "wikipedia.connect_timeout_secs must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

// ==============================
// SMTP Configuration
// ==============================

/// SMTP delivery configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct SmtpAppConfig {
    /// Server host
    pub host: String,

    /// Server port; derived from `security` when unset
    #[serde(default)]
    pub port: Option<u16>,

    /// "implicit", "starttls" (default) or "none"
    #[serde(default)]
    pub security: SmtpSecurity,

    /// Login name; AUTH is skipped when unset
    #[serde(default)]
    pub username: Option<String>,

    /// Login password
    /// Sensitive - uses `SecretString` for zeroization
    #[serde(default, skip_serializing)]
    pub password: Option<SecretString>,

    /// Sender used when the pipeline has no default sender
    pub from_address: String,

    /// Connect and per-command timeout in seconds (default: 30)
    #[serde(default = "default_smtp_timeout_secs")]
    pub timeout_secs: u64,

    /// Name announced in EHLO (default: local host name)
    #[serde(default)]
    pub helo_name: Option<String>,

    /// TLS configuration
    #[serde(default)]
    pub tls: SmtpTlsAppConfig,
}

impl std::fmt::Debug for SmtpAppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpAppConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("security", &self.security)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .field("from_address", &self.from_address)
            .field("timeout_secs", &self.timeout_secs)
            .field("helo_name", &self.helo_name)
            .field("tls", &self.tls)
            .finish()
    }
}

const fn default_smtp_timeout_secs() -> u64 {
    30
}

/// TLS configuration for SMTP connections
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmtpTlsAppConfig {
    /// Verify TLS certificates (default: true)
    #[serde(default = "default_true")]
    pub verify_certificates: bool,

    /// Minimum TLS version ("1.0", "1.1" or "1.2")
    #[serde(default = "default_min_tls")]
    pub min_tls_version: String,

    /// Path to custom CA certificate (optional)
    #[serde(default)]
    pub ca_cert_path: Option<String>,
}

fn default_min_tls() -> String {
    "1.2".to_string()
}

impl Default for SmtpTlsAppConfig {
    fn default() -> Self {
        Self {
            verify_certificates: true,
            min_tls_version: default_min_tls(),
            ca_cert_path: None,
        }
    }
}

impl SmtpAppConfig {
    /// Effective server port
    #[must_use]
    pub fn port(&self) -> u16 {
        self.port.unwrap_or_else(|| self.security.default_port())
    }

    /// Get the password as a string reference
    #[must_use]
    pub fn password_str(&self) -> Option<&str> {
        self.password.as_ref().map(ExposeSecret::expose_secret)
    }

    /// Convert to `integration_smtp`'s `SmtpConfig`
    #[must_use]
    pub fn to_smtp_config(&self) -> SmtpConfig {
        SmtpConfig {
            host: self.host.clone(),
            port: self.port(),
            security: self.security,
            username: self.username.clone(),
            password: self.password_str().map(ToString::to_string),
            timeout_secs: self.timeout_secs,
            helo_name: self.helo_name.clone(),
            tls: TlsConfig {
                verify_certificates: Some(self.tls.verify_certificates),
                ca_cert_path: self.tls.ca_cert_path.as_ref().map(std::path::PathBuf::from),
                min_tls_version: self.tls.min_tls_version.clone(),
            },
        }
    }

    pub fn validate(&self) -> Result<(), ApplicationError> {
        if self.host.trim().is_empty() {
            return Err(ApplicationError::Configuration(
                "smtp.host must not be empty".to_string(),
            ));
        }
        if self.timeout_secs == 0 {
            return Err(ApplicationError::Configuration(
                "smtp.timeout_secs must be greater than 0".to_string(),
            ));
        }
        if self.username.is_some() && self.password_str().is_none_or(str::is_empty) {
            return Err(ApplicationError::Configuration(
                "smtp.password is required when smtp.username is set".to_string(),
            ));
        }
        EmailAddress::new(self.from_address.as_str())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn smtp_config() -> SmtpAppConfig {
        SmtpAppConfig {
            host: "smtp.colegio.edu.ar".to_string(),
            port: None,
            security: SmtpSecurity::StartTls,
            username: Some("reports".to_string()),
            password: Some(SecretString::from("s3cret".to_string())),
            from_address: "reports@colegio.edu.ar".to_string(),
            timeout_secs: 30,
            helo_name: None,
            tls: SmtpTlsAppConfig::default(),
        }
    }

    #[test]
    fn wikipedia_defaults_to_integration_user_agent() {
        let config = WikipediaAppConfig::default().to_wikipedia_config();
        assert_eq!(config.user_agent, WikipediaConfig::default().user_agent);
        assert_eq!(config.max_redirects, 5);
    }

    #[test]
    fn wikipedia_custom_user_agent() {
        let app = WikipediaAppConfig {
            user_agent: Some("school-reports/2.0 (it@colegio.edu.ar)".to_string()),
            ..Default::default()
        };
        assert_eq!(
            app.to_wikipedia_config().user_agent,
            "school-reports/2.0 (it@colegio.edu.ar)"
        );
    }

    #[test]
    fn smtp_port_follows_security() {
        let mut config = smtp_config();
        assert_eq!(config.port(), 587);
        config.security = SmtpSecurity::Implicit;
        assert_eq!(config.port(), 465);
        config.port = Some(2525);
        assert_eq!(config.port(), 2525);
    }

    #[test]
    fn smtp_converts_to_client_config() {
        let client = smtp_config().to_smtp_config();
        assert_eq!(client.host, "smtp.colegio.edu.ar");
        assert_eq!(client.port, 587);
        assert_eq!(client.username.as_deref(), Some("reports"));
        assert_eq!(client.password.as_deref(), Some("s3cret"));
        assert!(client.tls.should_verify());
    }

    #[test]
    fn smtp_debug_redacts_password() {
        let debug = format!("{:?}", smtp_config());
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("s3cret"));
    }

    #[test]
    fn smtp_validation() {
        assert!(smtp_config().validate().is_ok());

        let mut config = smtp_config();
        config.password = None;
        assert!(config.validate().is_err());

        let mut config = smtp_config();
        config.from_address = "not an address".to_string();
        assert!(matches!(config.validate(), Err(ApplicationError::Domain(_))));

        let mut config = smtp_config();
        config.timeout_secs = 0;
        assert!(config.validate().is_err());

        let mut config = smtp_config();
        config.username = None;
        config.password = None;
        assert!(config.validate().is_ok());
    }
}
