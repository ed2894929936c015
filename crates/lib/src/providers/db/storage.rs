use crate::{errors::AnalyzerError, types::ResultTable};
use async_trait::async_trait;
use dyn_clone::DynClone;
use std::fmt::Debug;

/// A trait for interacting with a storage backend.
///
/// The pipeline only needs three things from the dataset: a way to execute a
/// SELECT statement, a textual schema rendering for the query-generation
/// prompt, and the table names for diagnostics.
#[async_trait]
pub trait Storage: Send + Sync + DynClone + Debug {
    /// Returns the name of the storage provider (e.g., "SQLite").
    fn name(&self) -> &str;

    /// Executes a SQL query and returns the rectangular result.
    ///
    /// No read-only enforcement happens here; the only guard against
    /// mutating statements is the prompt's textual instruction.
    async fn execute_query(&self, query: &str) -> Result<ResultTable, AnalyzerError>;

    /// Renders every user table as `Name (col TYPE, ...)`, one per line,
    /// for interpolation into the query-generation prompt.
    async fn schema_overview(&self) -> Result<String, AnalyzerError>;

    /// Lists the user tables in the database.
    async fn list_tables(&self) -> Result<Vec<String>, AnalyzerError>;
}

dyn_clone::clone_trait_object!(Storage);
