//! Connection types handed out by the connection host

use serde::{Deserialize, Serialize};

/// How a connection authenticates against the server
///
/// # Example
///
/// ```rust
/// use flat_file_import::models::AuthenticationType;
///
/// assert!(AuthenticationType::Integrated.is_integrated());
/// assert!(!AuthenticationType::SqlLogin.is_integrated());
/// ```
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum AuthenticationType {
    /// Windows / integrated security; no credentials in the connection string
    #[default]
    Integrated,
    /// SQL login; user name and password are embedded
    SqlLogin,
}

impl AuthenticationType {
    /// Check if this is integrated authentication
    pub fn is_integrated(&self) -> bool {
        matches!(self, AuthenticationType::Integrated)
    }
}

impl std::fmt::Display for AuthenticationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthenticationType::Integrated => write!(f, "Integrated"),
            AuthenticationType::SqlLogin => write!(f, "SqlLogin"),
        }
    }
}

impl std::str::FromStr for AuthenticationType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "integrated" => Ok(AuthenticationType::Integrated),
            "sqllogin" | "sql" => Ok(AuthenticationType::SqlLogin),
            _ => Err(format!("Invalid authentication type: {}", s)),
        }
    }
}

/// Options describing where a connection points
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionOptions {
    /// Server host name
    pub server: String,
    /// Optional TCP port
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    /// Database the connection was opened against, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,
    /// User name for SQL logins
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    /// Authentication mode
    #[serde(default)]
    pub authentication_type: AuthenticationType,
}

impl ConnectionOptions {
    /// Options for an integrated-security connection to `server`
    pub fn integrated(server: impl Into<String>) -> Self {
        Self {
            server: server.into(),
            port: None,
            database: None,
            user: None,
            authentication_type: AuthenticationType::Integrated,
        }
    }

    /// Options for a SQL login connection to `server` as `user`
    pub fn sql_login(server: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            server: server.into(),
            port: None,
            database: None,
            user: Some(user.into()),
            authentication_type: AuthenticationType::SqlLogin,
        }
    }

    /// Set the port
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Set the database
    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        self.database = Some(database.into());
        self
    }
}

/// An active connection known to the host
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Connection {
    /// Opaque host identifier
    pub connection_id: String,
    /// Data provider that owns the connection (e.g., "MSSQL")
    pub provider_name: String,
    /// Connection options
    pub options: ConnectionOptions,
}

impl Connection {
    /// Create a connection for the default "MSSQL" provider
    pub fn new(connection_id: impl Into<String>, options: ConnectionOptions) -> Self {
        Self {
            connection_id: connection_id.into(),
            provider_name: "MSSQL".to_string(),
            options,
        }
    }

    /// Label shown in the server dropdown
    pub fn display_name(&self) -> String {
        match &self.options.database {
            Some(db) => format!("{} ({})", self.options.server, db),
            None => self.options.server.clone(),
        }
    }
}

/// Secrets returned by the host's credential store
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    /// Password for the connection's user
    pub password: String,
}

impl Credentials {
    pub fn new(password: impl Into<String>) -> Self {
        Self {
            password: password.into(),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("password", &"***")
            .finish()
    }
}
