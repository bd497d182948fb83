pub mod config;
pub mod document;
pub mod error;
pub mod extension;
pub mod generator;
pub mod inflection;
pub mod load;
pub mod reference;
pub mod stack;

pub use document::{Document, OperationBuilder, OutputFormat, OutputOptions};
pub use error::{GenerateError, ParseError, ResolveError};
pub use load::Atomically;

/// Load an atomic file from YAML and render the generated document.
pub fn generate_yaml(input: &str) -> Result<String, GenerateError> {
    let atomic = Atomically::from_yaml(input)?;
    let document = atomic.generate()?;
    document
        .to_yaml()
        .map_err(|e| GenerateError::Parse(ParseError::Yaml(e)))
}
