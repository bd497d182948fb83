use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::document::Document;
use crate::error::ParseError;

/// Name of the extension, without the `x-` prefix.
pub const EXTENSION_NAME: &str = "atomically";

/// Top-level key holding the stack declarations.
pub const EXTENSION_KEY: &str = "x-atomically";

/// The decoded `x-atomically` block.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct AtomicExtension {
    pub stacks: IndexMap<String, StackConfig>,
}

impl AtomicExtension {
    /// Decode the extension from a document. A missing extension means no stacks.
    pub fn from_document(document: &Document) -> Result<Self, ParseError> {
        match document.extension(EXTENSION_NAME) {
            None | Some(Value::Null) => Ok(Self::default()),
            Some(value) => {
                serde_json::from_value(value.clone()).map_err(ParseError::InvalidExtension)
            }
        }
    }
}

/// One declared resource.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StackConfig {
    pub schema: SchemaRefConfig,

    #[serde(default = "CrudVerb::all")]
    pub supported: Vec<CrudVerb>,

    /// Parameter objects attached to the list operation as-is.
    #[serde(default)]
    pub filters: Vec<Value>,

    #[serde(default)]
    pub custom: IndexMap<String, CustomOperationConfig>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SchemaRefConfig {
    #[serde(rename = "$ref")]
    pub ref_path: String,
}

/// One declared non-CRUD operation.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct CustomOperationConfig {
    #[serde(rename = "type")]
    pub kind: CustomOperationKind,

    #[serde(rename = "requestSchema")]
    pub request_schema: Option<Value>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CustomOperationKind {
    /// Acts on one resource instance.
    #[default]
    Item,
    /// Acts on the resource set.
    Collection,
}

/// The standard operations a stack can expose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CrudVerb {
    Create,
    Read,
    Update,
    Delete,
    List,
}

impl CrudVerb {
    pub const ALL: [CrudVerb; 5] = [
        CrudVerb::Create,
        CrudVerb::Read,
        CrudVerb::Update,
        CrudVerb::Delete,
        CrudVerb::List,
    ];

    pub fn all() -> Vec<CrudVerb> {
        Self::ALL.to_vec()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CrudVerb::Create => "create",
            CrudVerb::Read => "read",
            CrudVerb::Update => "update",
            CrudVerb::Delete => "delete",
            CrudVerb::List => "list",
        }
    }

    /// Lowercase HTTP method used in `paths`.
    pub fn method(&self) -> &'static str {
        match self {
            CrudVerb::Create => "post",
            CrudVerb::Read | CrudVerb::List => "get",
            CrudVerb::Update => "put",
            CrudVerb::Delete => "delete",
        }
    }

    /// Whether the URL addresses a single item.
    pub fn targets_item(&self) -> bool {
        matches!(self, CrudVerb::Read | CrudVerb::Update | CrudVerb::Delete)
    }

    /// Summary prefix, e.g. `Create`.
    pub fn title(&self) -> &'static str {
        match self {
            CrudVerb::Create => "Create",
            CrudVerb::Read => "Read",
            CrudVerb::Update => "Update",
            CrudVerb::Delete => "Delete",
            CrudVerb::List => "List",
        }
    }
}

impl fmt::Display for CrudVerb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
