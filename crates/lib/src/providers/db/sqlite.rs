use crate::{
    errors::AnalyzerError,
    providers::db::storage::Storage,
    types::ResultTable,
};
use async_trait::async_trait;
use serde_json::Value;
use std::fmt::{self, Debug};
use tracing::{debug, info};
use turso::{Database, Value as TursoValue};

/// A provider for interacting with a local SQLite database using Turso.
///
/// The analyzer opens one of these per request from the dataset file path, so
/// there is no shared in-process state between requests. Cloning shares the
/// same underlying database, which tests use with `:memory:` paths.
#[derive(Clone)]
pub struct SqliteProvider {
    pub db: Database,
}

impl SqliteProvider {
    /// Creates a new `SqliteProvider` from a file path or in-memory.
    ///
    /// Use `:memory:` for a unique, isolated in-memory database.
    pub async fn new(db_path: &str) -> Result<Self, AnalyzerError> {
        let db = turso::Builder::new_local(db_path)
            .build()
            .await
            .map_err(|e| AnalyzerError::StorageConnection(e.to_string()))?;

        // Enable WAL mode for file-based databases. It has no effect on
        // in-memory databases but is safe to run.
        let conn = db
            .connect()
            .map_err(|e| AnalyzerError::StorageConnection(e.to_string()))?;
        conn.query("PRAGMA journal_mode=WAL;", ())
            .await
            .map_err(|e| AnalyzerError::StorageConnection(e.to_string()))?;

        Ok(Self { db })
    }

    /// A helper for tests to pre-populate data by executing multiple SQL statements.
    pub async fn initialize_with_data(&self, init_sql: &str) -> Result<(), AnalyzerError> {
        let conn = self
            .db
            .connect()
            .map_err(|e| AnalyzerError::StorageConnection(e.to_string()))?;

        for statement in init_sql.split(';').filter(|s| !s.trim().is_empty()) {
            conn.execute(statement, ())
                .await
                .map_err(|e| AnalyzerError::StorageQueryFailed(e.to_string()))?;
        }
        Ok(())
    }

    /// Renders one `Name (col TYPE, ...)` line for a single table.
    async fn describe_table(&self, table_name: &str) -> Result<String, AnalyzerError> {
        let conn = self
            .db
            .connect()
            .map_err(|e| AnalyzerError::StorageConnection(e.to_string()))?;

        let query = format!("PRAGMA table_info({table_name});");
        let mut rows = conn
            .query(&query, ())
            .await
            .map_err(|e| AnalyzerError::StorageQueryFailed(e.to_string()))?;

        let mut columns = Vec::new();
        while let Some(row) = rows
            .next()
            .await
            .map_err(|e| AnalyzerError::StorageQueryFailed(e.to_string()))?
        {
            // PRAGMA table_info columns: cid, name, type, notnull, dflt_value, pk
            if let (Ok(TursoValue::Text(name)), Ok(TursoValue::Text(type_str))) =
                (row.get_value(1), row.get_value(2))
            {
                if type_str.is_empty() {
                    columns.push(name);
                } else {
                    columns.push(format!("{name} {type_str}"));
                }
            }
        }

        if columns.is_empty() {
            return Err(AnalyzerError::StorageQueryFailed(format!(
                "Table '{table_name}' not found or has no columns."
            )));
        }

        Ok(format!("{table_name} ({})", columns.join(", ")))
    }
}

impl Debug for SqliteProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SqliteProvider").finish_non_exhaustive()
    }
}

impl AsRef<Database> for SqliteProvider {
    fn as_ref(&self) -> &Database {
        &self.db
    }
}

/// Converts a Turso value to a serde_json::Value.
fn turso_value_to_json(v: TursoValue) -> Value {
    match v {
        TursoValue::Null => Value::Null,
        TursoValue::Integer(i) => Value::Number(i.into()),
        TursoValue::Real(f) => serde_json::Number::from_f64(f)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        TursoValue::Text(s) => Value::String(s),
        TursoValue::Blob(_) => Value::String("<blob>".to_string()),
    }
}

#[async_trait]
impl Storage for SqliteProvider {
    fn name(&self) -> &str {
        "SQLite"
    }

    /// Executes a query on SQLite and returns the rows as a `ResultTable`.
    async fn execute_query(&self, query: &str) -> Result<ResultTable, AnalyzerError> {
        debug!(query = %query, "--> Executing SQLite query");

        let conn = self
            .db
            .connect()
            .map_err(|e| AnalyzerError::StorageConnection(e.to_string()))?;

        let mut stmt = conn
            .prepare(query)
            .await
            .map_err(|e| AnalyzerError::StorageQueryFailed(e.to_string()))?;

        let columns: Vec<String> = stmt
            .columns()
            .iter()
            .map(|c| c.name().to_string())
            .collect();

        let mut rows = stmt
            .query(())
            .await
            .map_err(|e| AnalyzerError::StorageQueryFailed(e.to_string()))?;

        let mut result_rows: Vec<Vec<Value>> = Vec::new();

        while let Some(row) = rows
            .next()
            .await
            .map_err(|e| AnalyzerError::StorageQueryFailed(e.to_string()))?
        {
            let mut values = Vec::with_capacity(columns.len());
            for i in 0..columns.len() {
                let value = row
                    .get_value(i)
                    .map_err(|e| AnalyzerError::StorageQueryFailed(e.to_string()))?;
                values.push(turso_value_to_json(value));
            }
            result_rows.push(values);
        }

        Ok(ResultTable {
            columns,
            rows: result_rows,
        })
    }

    /// Renders the schema of every user table for prompt interpolation.
    ///
    /// The rendering is rebuilt on every call: the dataset file is
    /// externally owned and the provider lives for a single request, so
    /// there is nothing worth caching.
    async fn schema_overview(&self) -> Result<String, AnalyzerError> {
        let tables = self.list_tables().await?;
        let mut lines = Vec::with_capacity(tables.len());
        for table in &tables {
            lines.push(self.describe_table(table).await?);
        }
        info!("Rendered schema overview for {} tables.", lines.len());
        Ok(lines.join("\n"))
    }

    async fn list_tables(&self) -> Result<Vec<String>, AnalyzerError> {
        let conn = self
            .db
            .connect()
            .map_err(|e| AnalyzerError::StorageConnection(e.to_string()))?;

        let mut rows = conn
            .query(
                "SELECT name FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%';",
                (),
            )
            .await
            .map_err(|e| AnalyzerError::StorageQueryFailed(e.to_string()))?;

        let mut tables = Vec::new();
        while let Some(row) = rows
            .next()
            .await
            .map_err(|e| AnalyzerError::StorageQueryFailed(e.to_string()))?
        {
            if let Ok(TursoValue::Text(name)) = row.get_value(0) {
                tables.push(name);
            }
        }
        Ok(tables)
    }
}
