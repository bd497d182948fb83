use std::fs;
use std::path::Path;

use serde_json::Value;

use crate::document::Document;
use crate::error::{ParseError, ResolveError};
use crate::extension::AtomicExtension;
use crate::generator::{Generator, StackPlan};

/// A loaded atomic file: the input document plus its decoded stacks.
///
/// The input is never mutated, so [`Atomically::generate`] can be called
/// repeatedly and always yields the same document.
#[derive(Debug, Clone)]
pub struct Atomically {
    content: Document,
    extension: AtomicExtension,
}

impl Atomically {
    /// Wrap an already-parsed tree.
    pub fn new(content: Value) -> Result<Self, ParseError> {
        let content = Document::from_value(content)?;
        let extension = AtomicExtension::from_document(&content)?;
        Ok(Self { content, extension })
    }

    pub fn from_yaml(input: &str) -> Result<Self, ParseError> {
        let value: Value = serde_yaml_ng::from_str(input)?;
        Self::new(value)
    }

    pub fn from_json(input: &str) -> Result<Self, ParseError> {
        let value: Value = serde_json::from_str(input)?;
        Self::new(value)
    }

    /// Read a file, parsing it as JSON when it has a `.json` extension and as YAML otherwise.
    pub fn from_file(path: &Path) -> Result<Self, ParseError> {
        let content = fs::read_to_string(path).map_err(|source| ParseError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json(&content),
            _ => Self::from_yaml(&content),
        }
    }

    pub fn content(&self) -> &Document {
        &self.content
    }

    pub fn extension(&self) -> &AtomicExtension {
        &self.extension
    }

    pub fn plan(&self) -> Vec<StackPlan> {
        Generator::new(&self.extension).plan()
    }

    pub fn generate(&self) -> Result<Document, ResolveError> {
        Generator::new(&self.extension).generate(&self.content)
    }
}
