//! # Schema Registry
//!
//! Storage and lookup for destination table schemas. A registry is built
//! once (from the built-in catalog or a versioned JSON catalog file) and is
//! read-only afterwards, so it can be shared freely across threads.

use super::{builtin, TableSchema};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;
use std::sync::{Arc, OnceLock};

static BUILTIN: OnceLock<Arc<SchemaRegistry>> = OnceLock::new();

/// Error types for registry construction
#[derive(Debug, Clone, thiserror::Error)]
pub enum SchemaError {
    /// Schema already registered for this table
    #[error("Schema already exists for table '{0}'")]
    AlreadyExists(String),
    /// Invalid schema definition
    #[error("Invalid schema: {0}")]
    InvalidSchema(String),
    /// Duplicate column name within one table
    #[error("Duplicate column name '{column}' in table '{table}'")]
    DuplicateColumn { table: String, column: String },
    /// Catalog document could not be parsed
    #[error("Malformed catalog: {0}")]
    Malformed(String),
    /// IO error
    #[error("IO error: {0}")]
    IoError(String),
}

/// On-disk catalog document
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CatalogDocument {
    version: String,
    tables: Vec<TableSchema>,
}

/// Read-only mapping from table name to schema.
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    version: String,
    /// Schemas in registration order
    tables: Vec<TableSchema>,
    index: HashMap<String, usize>,
}

impl SchemaRegistry {
    /// Create an empty registry tagged with a catalog version
    pub fn new(version: impl Into<String>) -> Self {
        SchemaRegistry {
            version: version.into(),
            tables: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// The process-wide built-in catalog, built on first use.
    pub fn builtin() -> Arc<SchemaRegistry> {
        BUILTIN.get_or_init(|| Arc::new(builtin::registry())).clone()
    }

    /// Register a table schema
    pub fn register(&mut self, schema: TableSchema) -> Result<(), SchemaError> {
        Self::validate_schema(&schema)?;

        if self.index.contains_key(&schema.name) {
            return Err(SchemaError::AlreadyExists(schema.name));
        }

        self.index.insert(schema.name.clone(), self.tables.len());
        self.tables.push(schema);
        Ok(())
    }

    /// Builder-style registration
    pub fn with_table(mut self, schema: TableSchema) -> Result<Self, SchemaError> {
        self.register(schema)?;
        Ok(self)
    }

    /// Look up a table schema. Absence is an ordinary outcome.
    pub fn lookup(&self, table: &str) -> Option<&TableSchema> {
        self.index.get(table).map(|&i| &self.tables[i])
    }

    pub fn contains(&self, table: &str) -> bool {
        self.index.contains_key(table)
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Table names in registration order
    pub fn table_names(&self) -> impl Iterator<Item = &str> {
        self.tables.iter().map(|t| t.name.as_str())
    }

    pub fn tables(&self) -> &[TableSchema] {
        &self.tables
    }

    /// Parse a JSON catalog document
    pub fn from_catalog_str(json: &str) -> Result<Self, SchemaError> {
        let doc: CatalogDocument =
            serde_json::from_str(json).map_err(|e| SchemaError::Malformed(e.to_string()))?;

        let mut registry = SchemaRegistry::new(doc.version);
        for table in doc.tables {
            registry.register(table)?;
        }
        Ok(registry)
    }

    /// Load a JSON catalog document from disk
    pub fn from_catalog_file(path: &Path) -> Result<Self, SchemaError> {
        let content = fs::read_to_string(path)
            .map_err(|e| SchemaError::IoError(format!("{}: {e}", path.display())))?;
        let registry = Self::from_catalog_str(&content)?;
        tracing::info!(
            path = %path.display(),
            version = %registry.version,
            tables = registry.len(),
            "schema_catalog_loaded"
        );
        Ok(registry)
    }

    /// Render the registry as a JSON catalog document
    pub fn to_catalog_json(&self) -> Result<String, SchemaError> {
        let doc = CatalogDocument {
            version: self.version.clone(),
            tables: self.tables.clone(),
        };
        serde_json::to_string_pretty(&doc).map_err(|e| SchemaError::Malformed(e.to_string()))
    }

    fn validate_schema(schema: &TableSchema) -> Result<(), SchemaError> {
        if schema.name.trim().is_empty() {
            return Err(SchemaError::InvalidSchema("table name is empty".to_string()));
        }
        if schema.columns.is_empty() {
            return Err(SchemaError::InvalidSchema(format!(
                "table '{}' declares no columns",
                schema.name
            )));
        }

        let mut seen = HashSet::new();
        for col in &schema.columns {
            if !seen.insert(col.name.as_str()) {
                return Err(SchemaError::DuplicateColumn {
                    table: schema.name.clone(),
                    column: col.name.clone(),
                });
            }
        }
        Ok(())
    }
}
