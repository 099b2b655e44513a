//! Export keys, rows, output documents and summaries.

use std::hash::{Hash, Hasher};
use std::path::PathBuf;

use serde::Serialize;
use serde_json::Value;

/// Value of the grouping column for one entity.
///
/// Bound back into window queries with its original storage class so that
/// range comparisons in SQLite match the order the keys were listed in.
#[derive(Debug, Clone)]
pub enum GroupKey {
    /// INTEGER storage class
    Integer(i64),
    /// REAL storage class
    Real(f64),
    /// TEXT (or BLOB) storage class
    Text(String),
}

impl GroupKey {
    /// Builds a key from a decoded cell. `null` cells have no key.
    pub fn from_cell(cell: &Value) -> Option<Self> {
        match cell {
            Value::Null => None,
            Value::Number(n) => match n.as_i64() {
                Some(i) => Some(GroupKey::Integer(i)),
                None => n.as_f64().map(GroupKey::Real),
            },
            Value::String(s) => Some(GroupKey::Text(s.clone())),
            other => Some(GroupKey::Text(other.to_string())),
        }
    }
}

impl PartialEq for GroupKey {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (GroupKey::Integer(a), GroupKey::Integer(b)) => a == b,
            (GroupKey::Real(a), GroupKey::Real(b)) => a.to_bits() == b.to_bits(),
            (GroupKey::Text(a), GroupKey::Text(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for GroupKey {}

impl Hash for GroupKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            GroupKey::Integer(i) => i.hash(state),
            GroupKey::Real(f) => f.to_bits().hash(state),
            GroupKey::Text(s) => s.hash(state),
        }
    }
}

impl std::fmt::Display for GroupKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GroupKey::Integer(i) => write!(f, "{i}"),
            GroupKey::Real(r) => write!(f, "{r}"),
            GroupKey::Text(s) => f.write_str(s),
        }
    }
}

/// One stored row inside an export window.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportRow {
    /// Grouping key of the row
    pub key: GroupKey,
    /// Value of the system column
    pub system: Value,
    /// Value of the type column
    pub kind: Value,
    /// Value of the application column
    pub application_id: Value,
    /// Value of the correlation column
    pub correlation: Value,
}

/// One item of an entity's `Entity` list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntityItem {
    /// Originating system
    pub system: Value,
    /// Entity type
    #[serde(rename = "type")]
    pub kind: Value,
    /// Application identifier
    #[serde(rename = "applicationId")]
    pub application_id: Value,
    /// Correlation value; omitted when absent or empty
    #[serde(rename = "correlationId", skip_serializing_if = "Option::is_none")]
    pub correlation_id: Option<Value>,
}

impl From<ExportRow> for EntityItem {
    fn from(row: ExportRow) -> Self {
        let correlation_id = match row.correlation {
            Value::Null => None,
            Value::String(s) if s.is_empty() => None,
            other => Some(other),
        };
        Self {
            system: row.system,
            kind: row.kind,
            application_id: row.application_id,
            correlation_id,
        }
    }
}

/// All items of one grouping key.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntityEnvelope {
    /// Rows of the entity, in order-column order
    #[serde(rename = "Entity")]
    pub entity: Vec<EntityItem>,
}

/// Document written to one batch file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchDocument {
    /// The single community of the exported table, `null` when unknown
    #[serde(rename = "CommunityId")]
    pub community_id: Value,
    /// One envelope per grouping key of the window, in key order
    #[serde(rename = "Entities")]
    pub entities: Vec<EntityEnvelope>,
}

/// Result of a batched export.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportSummary {
    /// Number of batch files written
    pub file_count: usize,
    /// Number of distinct grouping keys exported
    pub entity_count: usize,
    /// Written files, in batch order
    pub files: Vec<PathBuf>,
}

/// Result of a flat export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlatExportSummary {
    /// Rows written to each file
    pub rows: usize,
    /// The JSON array file
    pub json_path: PathBuf,
    /// The CSV companion file
    pub csv_path: PathBuf,
}
