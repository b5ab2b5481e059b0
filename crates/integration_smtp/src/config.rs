//! SMTP client configuration

use std::{fmt, path::PathBuf};

use serde::{Deserialize, Serialize};

/// How the connection to the server is secured
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SmtpSecurity {
    /// TLS from the first byte (usually port 465)
    Implicit,
    /// Plain connection upgraded with STARTTLS (usually port 587)
    #[default]
    StartTls,
    /// No encryption; for local relays and test sinks only
    None,
}

impl SmtpSecurity {
    /// Conventional port for this mode
    #[must_use]
    pub const fn default_port(self) -> u16 {
        match self {
            Self::Implicit => 465,
            Self::StartTls => 587,
            Self::None => 25,
        }
    }
}

/// TLS settings for SMTP connections
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TlsConfig {
    /// Whether to verify server certificates
    ///
    /// `None` means verify.
    #[serde(default)]
    pub verify_certificates: Option<bool>,

    /// Extra root certificate (PEM)
    #[serde(default)]
    pub ca_cert_path: Option<PathBuf>,

    /// Minimum TLS version ("1.0", "1.1" or "1.2")
    #[serde(default = "default_min_tls_version")]
    pub min_tls_version: String,
}

fn default_min_tls_version() -> String {
    "1.2".to_string()
}

impl Default for TlsConfig {
    fn default() -> Self {
        Self {
            verify_certificates: None,
            ca_cert_path: None,
            min_tls_version: default_min_tls_version(),
        }
    }
}

impl TlsConfig {
    #[must_use]
    pub fn should_verify(&self) -> bool {
        self.verify_certificates.unwrap_or(true)
    }

    /// Accept any certificate, e.g. a self-signed local relay
    #[must_use]
    pub fn insecure() -> Self {
        Self {
            verify_certificates: Some(false),
            ..Default::default()
        }
    }

    /// Verify against a custom CA certificate
    pub fn with_ca_cert(ca_cert_path: impl Into<PathBuf>) -> Self {
        Self {
            verify_certificates: Some(true),
            ca_cert_path: Some(ca_cert_path.into()),
            ..Default::default()
        }
    }
}

/// SMTP client configuration
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmtpConfig {
    /// Server host name
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default)]
    pub security: SmtpSecurity,

    /// Login name; AUTH is skipped when unset
    #[serde(default)]
    pub username: Option<String>,

    #[serde(default)]
    pub password: Option<String>,

    /// Connect and per-command timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Name announced in EHLO; defaults to the local host name
    #[serde(default)]
    pub helo_name: Option<String>,

    #[serde(default)]
    pub tls: TlsConfig,
}

fn default_host() -> String {
    "localhost".to_string()
}

const fn default_port() -> u16 {
    587
}

const fn default_timeout_secs() -> u64 {
    30
}

impl Default for SmtpConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            security: SmtpSecurity::default(),
            username: None,
            password: None,
            timeout_secs: default_timeout_secs(),
            helo_name: None,
            tls: TlsConfig::default(),
        }
    }
}

impl fmt::Debug for SmtpConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmtpConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("security", &self.security)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .field("timeout_secs", &self.timeout_secs)
            .field("helo_name", &self.helo_name)
            .field("tls", &self.tls)
            .finish()
    }
}

impl SmtpConfig {
    /// Plain connection to a local relay or test sink
    pub fn plain(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            security: SmtpSecurity::None,
            ..Default::default()
        }
    }

    /// Sets login credentials
    #[must_use]
    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    /// Sets the connect and per-command timeout
    #[must_use]
    pub const fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    /// Sets the name announced in EHLO
    #[must_use]
    pub fn with_helo_name(mut self, helo_name: impl Into<String>) -> Self {
        self.helo_name = Some(helo_name.into());
        self
    }
}
