//! SQL text for the metadata queries issued by the wizard.
//!
//! # Security
//!
//! Database, schema and table names come from user selections and are quoted as
//! SQL Server bracket identifiers. Internal `]` characters are escaped by doubling.

/// Quote an identifier with SQL Server brackets
///
/// # Example
///
/// ```rust
/// use flat_file_import::sql::quote_identifier;
///
/// assert_eq!(quote_identifier("orders"), "[orders]");
/// assert_eq!(quote_identifier("odd]name"), "[odd]]name]");
/// ```
pub fn quote_identifier(identifier: &str) -> String {
    format!("[{}]", identifier.replace(']', "]]"))
}

/// Schemas of `database`
pub fn schemas_query(database: &str) -> String {
    format!(
        "USE {}; SELECT name FROM sys.schemas",
        quote_identifier(database)
    )
}

/// Names of the existing tables in `database`
pub fn table_names_query(database: &str) -> String {
    format!(
        "USE {}; SELECT name FROM sys.tables",
        quote_identifier(database)
    )
}

/// Row count of the imported table
pub fn row_count_query(database: &str, schema: &str, table: &str) -> String {
    format!(
        "USE {}; SELECT COUNT(*) FROM {}.{}",
        quote_identifier(database),
        quote_identifier(schema),
        quote_identifier(table)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queries() {
        assert_eq!(schemas_query("db1"), "USE [db1]; SELECT name FROM sys.schemas");
        assert_eq!(
            table_names_query("db1"),
            "USE [db1]; SELECT name FROM sys.tables"
        );
        assert_eq!(
            row_count_query("db1", "dbo", "orders"),
            "USE [db1]; SELECT COUNT(*) FROM [dbo].[orders]"
        );
    }

    #[test]
    fn test_injection_is_escaped() {
        let query = row_count_query("db1", "dbo", "x]; DROP TABLE users; --");
        assert_eq!(
            query,
            "USE [db1]; SELECT COUNT(*) FROM [dbo].[x]]; DROP TABLE users; --]"
        );
    }
}
