use std::path::PathBuf;

use thiserror::Error;

/// Failures while loading a document or decoding its `x-atomically` block.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    #[error("failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("document root must be a mapping")]
    NotAMapping,

    #[error("invalid x-atomically extension: {0}")]
    InvalidExtension(#[source] serde_json::Error),
}

/// Failures while resolving stack schemas during generation.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("only relative references are supported: {0}")]
    UnsupportedReferenceKind(String),

    #[error("stack schemas must reference #/components/schemas: {0}")]
    InvalidSchemaReference(String),

    #[error("schema not found: {0}")]
    SchemaNotFound(String),

    #[error("schema {0} is not an object schema")]
    InvalidBaseSchema(String),
}

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("resolve error: {0}")]
    Resolve(#[from] ResolveError),
}
