use serde_json::Value;

use crate::document::Document;
use crate::error::ResolveError;
use crate::extension::{CrudVerb, CustomOperationConfig, CustomOperationKind, StackConfig};
use crate::inflection::{dasherize, humanize, pluralize, underscore};
use crate::reference::Reference;

/// A declared resource and the names derived from it.
#[derive(Debug, Clone, Copy)]
pub struct Stack<'a> {
    name: &'a str,
    config: &'a StackConfig,
}

impl<'a> Stack<'a> {
    pub fn new(name: &'a str, config: &'a StackConfig) -> Self {
        Self { name, config }
    }

    pub fn name(&self) -> &'a str {
        self.name
    }

    /// Tag label, e.g. `blog_post` → `Blog post`.
    pub fn readable_name(&self) -> String {
        humanize(self.name)
    }

    /// `BlogPost` → `blog_post`.
    pub fn identifier(&self) -> String {
        underscore(self.name)
    }

    /// `BlogPost` → `blog_posts`.
    pub fn plural_identifier(&self) -> String {
        underscore(&pluralize(self.name))
    }

    /// Name of the `{..}` segment addressing one item.
    pub fn path_parameter_name(&self) -> String {
        format!("{}_id", self.identifier())
    }

    pub fn item_schema_name(&self) -> String {
        format!("{}Item", self.name)
    }

    pub fn collection_schema_name(&self) -> String {
        format!("{}Collection", self.name)
    }

    pub fn schema_ref(&self) -> Reference {
        Reference::parse(&self.config.schema.ref_path)
    }

    /// Resolve the base schema the stack declares.
    pub fn schema<'d>(&self, document: &'d Document) -> Result<&'d Value, ResolveError> {
        let reference = self.schema_ref();
        if !reference.is_relative() {
            return Err(ResolveError::UnsupportedReferenceKind(reference.to_string()));
        }
        let pointer = reference.to_pointer();
        if !document.is_schema_ref(&pointer) {
            return Err(ResolveError::InvalidSchemaReference(reference.to_string()));
        }
        document.get_schema(&pointer)
    }

    pub fn is_supported(&self, verb: CrudVerb) -> bool {
        self.config.supported.contains(&verb)
    }

    pub fn filters(&self) -> &'a [Value] {
        &self.config.filters
    }

    pub fn custom_operations(&self) -> Vec<CustomOperation<'a>> {
        self.config
            .custom
            .iter()
            .map(|(name, config)| CustomOperation::new(name, config))
            .collect()
    }
}

/// A declared non-CRUD operation on a stack.
#[derive(Debug, Clone, Copy)]
pub struct CustomOperation<'a> {
    name: &'a str,
    config: &'a CustomOperationConfig,
}

impl<'a> CustomOperation<'a> {
    pub fn new(name: &'a str, config: &'a CustomOperationConfig) -> Self {
        Self { name, config }
    }

    pub fn name(&self) -> &'a str {
        self.name
    }

    pub fn kind(&self) -> CustomOperationKind {
        self.config.kind
    }

    /// The declared request schema. Null and `{}` count as absent.
    pub fn request_schema(&self) -> Option<&'a Value> {
        self.config.request_schema.as_ref().filter(|schema| match schema {
            Value::Null => false,
            Value::Object(map) => !map.is_empty(),
            _ => true,
        })
    }

    /// Trailing URL segment: `mark_as_read` → `mark-as-read`.
    pub fn url_slug(&self) -> String {
        dasherize(self.name).to_lowercase()
    }

    /// Operation id prefix: `MarkAsRead` → `mark_as_read`.
    pub fn identifier(&self) -> String {
        underscore(self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extension::{AtomicExtension, SchemaRefConfig};
    use serde_json::json;

    fn config(ref_path: &str) -> StackConfig {
        StackConfig {
            schema: SchemaRefConfig {
                ref_path: ref_path.to_string(),
            },
            supported: CrudVerb::all(),
            filters: Vec::new(),
            custom: Default::default(),
        }
    }

    fn document() -> Document {
        Document::from_value(json!({
            "components": { "schemas": { "Post": { "type": "object" } } }
        }))
        .unwrap()
    }

    #[test]
    fn test_derived_names() {
        let cfg = config("#/components/schemas/Post");
        let stack = Stack::new("BlogPost", &cfg);
        assert_eq!(stack.readable_name(), "Blogpost");
        assert_eq!(stack.identifier(), "blog_post");
        assert_eq!(stack.plural_identifier(), "blog_posts");
        assert_eq!(stack.path_parameter_name(), "blog_post_id");
        assert_eq!(stack.item_schema_name(), "BlogPostItem");
        assert_eq!(stack.collection_schema_name(), "BlogPostCollection");
    }

    #[test]
    fn test_snake_case_name() {
        let cfg = config("#/components/schemas/Post");
        let stack = Stack::new("blog_post", &cfg);
        assert_eq!(stack.readable_name(), "Blog post");
        assert_eq!(stack.plural_identifier(), "blog_posts");
    }

    #[test]
    fn test_schema_resolves() {
        let cfg = config("#/components/schemas/Post");
        let doc = document();
        let schema = Stack::new("Post", &cfg).schema(&doc).unwrap();
        assert_eq!(schema, &json!({ "type": "object" }));
    }

    #[test]
    fn test_schema_rejects_external_reference() {
        let cfg = config("shared.yaml#/components/schemas/Post");
        let doc = document();
        assert!(matches!(
            Stack::new("Post", &cfg).schema(&doc),
            Err(ResolveError::UnsupportedReferenceKind(r)) if r == "shared.yaml#/components/schemas/Post"
        ));
    }

    #[test]
    fn test_schema_rejects_non_schema_pointer() {
        let cfg = config("#/components/parameters/Post");
        let doc = document();
        assert!(matches!(
            Stack::new("Post", &cfg).schema(&doc),
            Err(ResolveError::InvalidSchemaReference(_))
        ));
    }

    #[test]
    fn test_schema_missing() {
        let cfg = config("#/components/schemas/Comment");
        let doc = document();
        assert!(matches!(
            Stack::new("Comment", &cfg).schema(&doc),
            Err(ResolveError::SchemaNotFound(_))
        ));
    }

    #[test]
    fn test_supported_subset() {
        let mut cfg = config("#/components/schemas/Post");
        cfg.supported = vec![CrudVerb::Create, CrudVerb::List];
        let stack = Stack::new("Post", &cfg);
        assert!(stack.is_supported(CrudVerb::Create));
        assert!(!stack.is_supported(CrudVerb::Read));
    }

    #[test]
    fn test_custom_operations() {
        let doc = Document::from_value(json!({
            "x-atomically": {
                "stacks": {
                    "Post": {
                        "schema": { "$ref": "#/components/schemas/Post" },
                        "custom": {
                            "mark_as_read": { "requestSchema": {} },
                            "Archive": {
                                "type": "collection",
                                "requestSchema": { "$ref": "#/components/schemas/Filter" }
                            }
                        }
                    }
                }
            }
        }))
        .unwrap();
        let ext = AtomicExtension::from_document(&doc).unwrap();
        let stack = Stack::new("Post", &ext.stacks["Post"]);
        let custom = stack.custom_operations();

        assert_eq!(custom.len(), 2);
        assert_eq!(custom[0].url_slug(), "mark-as-read");
        assert_eq!(custom[0].identifier(), "mark_as_read");
        assert_eq!(custom[0].kind(), CustomOperationKind::Item);
        assert!(custom[0].request_schema().is_none());

        assert_eq!(custom[1].url_slug(), "archive");
        assert_eq!(custom[1].kind(), CustomOperationKind::Collection);
        assert_eq!(
            custom[1].request_schema(),
            Some(&json!({ "$ref": "#/components/schemas/Filter" }))
        );
    }
}
