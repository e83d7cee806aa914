//! Connection strings for the import service
//!
//! Two shapes are produced, selected by the connection's authentication type:
//!
//! ```text
//! Data Source=<host>[,<port>];Initial Catalog=<database>;Integrated Security=True
//! Data Source=<host>[,<port>];Initial Catalog=<database>;Integrated Security=False;User Id=<user>;Password=<password>
//! ```

use tracing::debug;

use crate::host::{ConnectionHost, HostResult};
use crate::models::{Connection, ConnectionOptions};

/// Build a connection string from its parts.
///
/// `password` is only consulted for SQL-login connections; integrated connections
/// never carry credentials.
///
/// # Example
///
/// ```rust
/// use flat_file_import::connection_string;
/// use flat_file_import::models::ConnectionOptions;
///
/// let options = ConnectionOptions::integrated("localhost").with_port(1433);
/// assert_eq!(
///     connection_string::build(&options, "sales", None),
///     "Data Source=localhost,1433;Initial Catalog=sales;Integrated Security=True"
/// );
/// ```
pub fn build(options: &ConnectionOptions, database: &str, password: Option<&str>) -> String {
    let mut data_source = options.server.clone();
    if let Some(port) = options.port {
        data_source.push_str(&format!(",{}", port));
    }

    let integrated = options.authentication_type.is_integrated();
    let mut result = format!(
        "Data Source={};Initial Catalog={};Integrated Security={}",
        data_source,
        database,
        if integrated { "True" } else { "False" }
    );

    if !integrated {
        result.push_str(&format!(
            ";User Id={};Password={}",
            options.user.as_deref().unwrap_or_default(),
            password.unwrap_or_default()
        ));
    }

    result
}

/// Build the connection string for `connection`, fetching the password from the
/// host's credential store when the connection uses a SQL login.
pub async fn resolve(
    host: &dyn ConnectionHost,
    connection: &Connection,
    database: &str,
) -> HostResult<String> {
    if connection.options.authentication_type.is_integrated() {
        return Ok(build(&connection.options, database, None));
    }

    debug!(
        connection_id = %connection.connection_id,
        "Looking up credentials for SQL login"
    );
    let credentials = host.get_credentials(&connection.connection_id).await?;
    Ok(build(
        &connection.options,
        database,
        Some(&credentials.password),
    ))
}

/// Mask the password of a connection string for logging.
///
/// `Password` is the last key [`build`] writes, so everything after it is masked,
/// including any `;` inside the password itself.
pub fn redact(connection_string: &str) -> String {
    match connection_string.to_ascii_lowercase().find("password=") {
        Some(start) => format!("{}Password=***", &connection_string[..start]),
        None => connection_string.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::InMemoryHost;
    use crate::models::Credentials;

    #[test]
    fn test_integrated_without_port() {
        let options = ConnectionOptions::integrated("sqlhost");
        let result = build(&options, "db1", Some("ignored"));
        assert_eq!(
            result,
            "Data Source=sqlhost;Initial Catalog=db1;Integrated Security=True"
        );
        assert!(!result.contains("User Id="));
        assert!(!result.contains("ignored"));
    }

    #[test]
    fn test_sql_login_with_port() {
        let options = ConnectionOptions::sql_login("sqlhost", "sa").with_port(1500);
        assert_eq!(
            build(&options, "db1", Some("p@ss")),
            "Data Source=sqlhost,1500;Initial Catalog=db1;Integrated Security=False;User Id=sa;Password=p@ss"
        );
    }

    #[test]
    fn test_build_is_deterministic() {
        let options = ConnectionOptions::sql_login("h", "u");
        assert_eq!(
            build(&options, "d", Some("p")),
            build(&options, "d", Some("p"))
        );
    }

    #[test]
    fn test_redact() {
        let raw = "Data Source=h;Initial Catalog=d;Integrated Security=False;User Id=u;Password=secret";
        let redacted = redact(raw);
        assert!(!redacted.contains("secret"));
        assert!(redacted.ends_with("Password=***"));
        assert_eq!(
            redact("Data Source=h;Initial Catalog=d;Integrated Security=True"),
            "Data Source=h;Initial Catalog=d;Integrated Security=True"
        );
    }

    #[test]
    fn test_redact_password_containing_separator() {
        let options = ConnectionOptions::sql_login("h", "u");
        let raw = build(&options, "d", Some("a;b=c;PWD"));

        assert_eq!(
            redact(&raw),
            "Data Source=h;Initial Catalog=d;Integrated Security=False;User Id=u;Password=***"
        );
    }

    #[test]
    fn test_resolve_looks_up_credentials_only_for_sql_login() {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let integrated = Connection::new("c1", ConnectionOptions::integrated("h"));
            let login = Connection::new("c2", ConnectionOptions::sql_login("h", "sa"));
            let host = InMemoryHost::new()
                .with_connection(integrated.clone(), &["db1"])
                .with_connection(login.clone(), &["db1"])
                .with_credentials("c2", Credentials::new("pw"));

            let s = resolve(&host, &integrated, "db1").await.unwrap();
            assert!(s.ends_with("Integrated Security=True"));
            assert!(host.calls().is_empty());

            let s = resolve(&host, &login, "db1").await.unwrap();
            assert!(s.ends_with(";User Id=sa;Password=pw"));
            assert_eq!(host.calls().len(), 1);
        });
    }
}
