use serde::Deserialize;
use serde_json::{Map, Value, json};

use crate::error::{ParseError, ResolveError};
use crate::reference::JsonPointer;

pub const ERROR_SCHEMA_NAME: &str = "Error";

/// Prefix of every reference into `components.schemas`.
pub const SCHEMA_REF_PREFIX: &str = "#/components/schemas/";

/// Build a `{"$ref": "#/components/schemas/<name>"}` node.
pub fn schema_ref(name: &str) -> Value {
    json!({ "$ref": format!("{SCHEMA_REF_PREFIX}{name}") })
}

/// Rendering options for a generated document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct OutputOptions {
    pub format: OutputFormat,
    /// Emit mapping keys in sorted order instead of insertion order.
    pub sort_keys: bool,
    /// Keep the `x-atomically` block in the rendered output.
    pub keep_extension: bool,
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self {
            format: OutputFormat::Yaml,
            sort_keys: false,
            keep_extension: true,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Yaml,
    Json,
}

/// An OpenAPI document under construction.
///
/// Wraps the raw document tree so that every key from the input survives,
/// and creates `tags`, `paths` and `components.schemas` the first time they
/// are written to.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    root: Map<String, Value>,
}

impl Document {
    pub fn new(root: Map<String, Value>) -> Self {
        Self { root }
    }

    /// Wrap an arbitrary tree; only mappings are valid document roots.
    pub fn from_value(value: Value) -> Result<Self, ParseError> {
        match value {
            Value::Object(root) => Ok(Self::new(root)),
            _ => Err(ParseError::NotAMapping),
        }
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.root
    }

    /// Look up a top-level `x-<name>` extension.
    pub fn extension(&self, name: &str) -> Option<&Value> {
        self.root.get(&format!("x-{name}"))
    }

    pub fn tags(&self) -> &[Value] {
        self.root
            .get("tags")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Append `{name}` to `tags`. Existing tags with the same name are kept.
    pub fn add_tag(&mut self, name: &str) {
        let tags = ensure_array(&mut self.root, "tags");
        tags.push(json!({ "name": name }));
    }

    pub fn schemas(&self) -> Option<&Map<String, Value>> {
        self.root
            .get("components")
            .and_then(|c| c.get("schemas"))
            .and_then(Value::as_object)
    }

    pub fn has_schema(&self, name: &str) -> bool {
        self.schemas().is_some_and(|s| s.contains_key(name))
    }

    /// Insert or overwrite `components.schemas.<name>`.
    pub fn add_schema(&mut self, name: &str, schema: Value) {
        log::trace!("registering schema {name}");
        let components = ensure_object(&mut self.root, "components");
        let schemas = ensure_object(components, "schemas");
        schemas.insert(name.to_string(), schema);
    }

    /// True when the pointer addresses something under `components.schemas`.
    pub fn is_schema_ref(&self, pointer: &JsonPointer) -> bool {
        pointer.starts_with(&["components", "schemas"])
    }

    /// Fetch a schema by the pointer's last token.
    ///
    /// Only the top level of `components.schemas` is searched, nested
    /// pointers are not walked.
    pub fn get_schema(&self, pointer: &JsonPointer) -> Result<&Value, ResolveError> {
        pointer
            .last()
            .and_then(|name| self.schemas().and_then(|s| s.get(name)))
            .ok_or_else(|| ResolveError::SchemaNotFound(pointer.to_string()))
    }

    /// Register the shared problem-details `Error` schema unless it exists,
    /// returning a reference to it.
    pub fn ensure_error_schema(&mut self) -> Value {
        if !self.has_schema(ERROR_SCHEMA_NAME) {
            self.add_schema(ERROR_SCHEMA_NAME, error_schema());
        }
        schema_ref(ERROR_SCHEMA_NAME)
    }

    /// Set `paths.<url>.<method>` to a fresh operation, replacing any
    /// operation already registered there.
    pub fn add_operation(
        &mut self,
        url: &str,
        method: &str,
        operation_id: &str,
        summary: Option<&str>,
    ) -> OperationBuilder<'_> {
        let paths = ensure_object(&mut self.root, "paths");
        let path_item = ensure_object(paths, url);

        let mut operation = Map::new();
        operation.insert("operationId".to_string(), json!(operation_id));
        if let Some(summary) = summary.filter(|s| !s.is_empty()) {
            operation.insert("summary".to_string(), json!(summary));
        }
        path_item.insert(method.to_string(), Value::Object(operation));

        OperationBuilder {
            node: ensure_object(path_item, method),
        }
    }

    /// Look up `paths.<url>.<method>`.
    pub fn operation(&self, url: &str, method: &str) -> Option<&Map<String, Value>> {
        self.root
            .get("paths")
            .and_then(|p| p.get(url))
            .and_then(|item| item.get(method))
            .and_then(Value::as_object)
    }

    pub fn to_yaml(&self) -> Result<String, serde_yaml_ng::Error> {
        serde_yaml_ng::to_string(&self.root)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.root)
    }

    /// Serialize with the given options. The YAML emitter never writes
    /// anchors or aliases, so repeated nodes always appear in full.
    pub fn render(&self, options: &OutputOptions) -> Result<String, ParseError> {
        let mut root = self.root.clone();
        if !options.keep_extension {
            root.shift_remove(crate::extension::EXTENSION_KEY);
        }
        let value = if options.sort_keys {
            sort_keys(Value::Object(root))
        } else {
            Value::Object(root)
        };

        match options.format {
            OutputFormat::Yaml => Ok(serde_yaml_ng::to_string(&value)?),
            OutputFormat::Json => {
                let mut out = serde_json::to_string_pretty(&value)?;
                out.push('\n');
                Ok(out)
            }
        }
    }
}

/// A handle on one operation node inside a [`Document`].
///
/// `tags`, `parameters` and `responses` are created on first write.
#[derive(Debug)]
pub struct OperationBuilder<'a> {
    node: &'a mut Map<String, Value>,
}

impl OperationBuilder<'_> {
    pub fn add_tag(&mut self, tag: &str) -> &mut Self {
        ensure_array(self.node, "tags").push(json!(tag));
        self
    }

    /// Append a required, string-typed path parameter.
    pub fn add_path_parameter(&mut self, name: &str) -> &mut Self {
        self.add_parameter(json!({
            "in": "path",
            "name": name,
            "schema": { "type": "string" },
            "required": true,
        }))
    }

    /// Append a caller-supplied parameter object verbatim.
    pub fn add_parameter(&mut self, parameter: Value) -> &mut Self {
        ensure_array(self.node, "parameters").push(parameter);
        self
    }

    pub fn set_json_request_body(&mut self, schema: Value) -> &mut Self {
        self.node.insert(
            "requestBody".to_string(),
            json!({ "content": { "application/json": { "schema": schema } } }),
        );
        self
    }

    pub fn set_json_response(
        &mut self,
        status: u16,
        description: &str,
        schema: Value,
    ) -> &mut Self {
        ensure_object(self.node, "responses").insert(
            status.to_string(),
            json!({
                "description": description,
                "content": { "application/json": { "schema": schema } },
            }),
        );
        self
    }

    /// Attach a response without a body, e.g. `204 No content`.
    pub fn set_response(&mut self, status: u16, description: &str) -> &mut Self {
        ensure_object(self.node, "responses")
            .insert(status.to_string(), json!({ "description": description }));
        self
    }

    /// Attach `400`, `404` and `500` responses, filtered by `statuses`,
    /// pointing at the shared error schema.
    pub fn add_error_responses(&mut self, error_ref: &Value, statuses: &[u16]) -> &mut Self {
        for (status, description) in [
            (400, "Client error"),
            (404, "Not found"),
            (500, "Server error"),
        ] {
            if statuses.contains(&status) {
                self.set_json_response(status, description, error_ref.clone());
            }
        }
        self
    }
}

fn ensure_object<'m>(map: &'m mut Map<String, Value>, key: &str) -> &'m mut Map<String, Value> {
    let slot = map
        .entry(key.to_string())
        .or_insert_with(|| Value::Object(Map::new()));
    if !slot.is_object() {
        *slot = Value::Object(Map::new());
    }
    match slot {
        Value::Object(inner) => inner,
        _ => unreachable!("slot was just set to an object"),
    }
}

fn ensure_array<'m>(map: &'m mut Map<String, Value>, key: &str) -> &'m mut Vec<Value> {
    let slot = map
        .entry(key.to_string())
        .or_insert_with(|| Value::Array(Vec::new()));
    if !slot.is_array() {
        *slot = Value::Array(Vec::new());
    }
    match slot {
        Value::Array(inner) => inner,
        _ => unreachable!("slot was just set to an array"),
    }
}

fn sort_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> = map.into_iter().collect();
            entries.sort_by(|(a, _), (b, _)| a.cmp(b));
            Value::Object(
                entries
                    .into_iter()
                    .map(|(k, v)| (k, sort_keys(v)))
                    .collect(),
            )
        }
        Value::Array(items) => Value::Array(items.into_iter().map(sort_keys).collect()),
        other => other,
    }
}

/// RFC 7807 problem details.
fn error_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "type": {
                "type": "string",
                "description": "URI reference that identifies the problem type",
            },
            "title": {
                "type": "string",
                "description": "A short, human-readable summary of the problem type",
            },
            "status": {
                "type": "string",
                "description": "The HTTP status code generated by the origin server for this occurrence of the problem.",
            },
            "detail": {
                "type": "string",
                "description": "A human-readable explanation specific to this occurrence of the problem",
            },
            "instance": {
                "type": "string",
                "description": "A URI reference that identifies the specific occurrence of the problem.  It may or may not yield further information if dereferenced",
            },
        },
    })
}
