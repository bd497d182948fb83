use serde::Serialize;
use serde_json::{Map, Value, json};

use crate::document::{Document, schema_ref};
use crate::error::ResolveError;
use crate::extension::{AtomicExtension, CrudVerb, CustomOperationKind};
use crate::stack::{CustomOperation, Stack};

/// Error responses attached to `create`.
const CREATE_ERRORS: &[u16] = &[400, 500];

/// Error responses attached to every other operation.
const DEFAULT_ERRORS: &[u16] = &[400, 404, 500];

/// A schema an operation sends or returns.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// The stack's `<Name>Item` schema.
    Item,
    /// The stack's `<Name>Collection` schema.
    Collection,
    /// A schema declared inline (or as a reference) on a custom operation.
    Declared(Value),
}

/// Everything needed to emit one operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OperationPlan {
    pub method: &'static str,
    pub url: String,
    #[serde(rename = "operationId")]
    pub operation_id: String,
    pub summary: String,
    #[serde(skip)]
    pub path_parameter: Option<String>,
    #[serde(skip)]
    pub request: Option<Payload>,
    #[serde(skip)]
    pub status: u16,
    #[serde(skip)]
    pub description: &'static str,
    #[serde(skip)]
    pub response: Option<Payload>,
    #[serde(skip)]
    pub errors: &'static [u16],
    #[serde(skip)]
    pub with_filters: bool,
}

/// The schemas and operations one stack expands into.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StackPlan {
    pub name: String,
    pub tag: String,
    pub item_schema: String,
    pub collection_schema: String,
    pub operations: Vec<OperationPlan>,
}

/// Expands every declared stack into schemas and operations.
#[derive(Debug, Clone, Copy)]
pub struct Generator<'a> {
    extension: &'a AtomicExtension,
}

impl<'a> Generator<'a> {
    pub fn new(extension: &'a AtomicExtension) -> Self {
        Self { extension }
    }

    fn stacks(&self) -> impl Iterator<Item = Stack<'a>> + 'a {
        self.extension
            .stacks
            .iter()
            .map(|(name, config)| Stack::new(name, config))
    }

    /// Describe what [`Generator::generate`] will emit, without touching a document.
    pub fn plan(&self) -> Vec<StackPlan> {
        self.stacks().map(|stack| plan_stack(&stack)).collect()
    }

    /// Expand all stacks on top of a copy of `base`. `base` itself is never modified.
    pub fn generate(&self, base: &Document) -> Result<Document, ResolveError> {
        let mut document = base.clone();
        for stack in self.stacks() {
            generate_stack(&mut document, &stack)?;
        }
        Ok(document)
    }
}

fn generate_stack(document: &mut Document, stack: &Stack<'_>) -> Result<(), ResolveError> {
    log::debug!("expanding stack {}", stack.name());
    let plan = plan_stack(stack);

    document.add_tag(&plan.tag);

    let item_schema = item_schema(stack, stack.schema(document)?)?;
    document.add_schema(&plan.item_schema, item_schema);
    let item_ref = schema_ref(&plan.item_schema);

    document.add_schema(
        &plan.collection_schema,
        collection_schema(&plan.item_schema),
    );
    let collection_ref = schema_ref(&plan.collection_schema);

    for operation in &plan.operations {
        log::debug!(
            "{} {} -> {}",
            operation.method.to_uppercase(),
            operation.url,
            operation.operation_id
        );
        let payload_schema = |payload: &Payload| match payload {
            Payload::Item => item_ref.clone(),
            Payload::Collection => collection_ref.clone(),
            Payload::Declared(schema) => schema.clone(),
        };

        let error_ref = document.ensure_error_schema();
        let mut builder = document.add_operation(
            &operation.url,
            operation.method,
            &operation.operation_id,
            Some(&operation.summary),
        );
        builder.add_tag(&plan.tag);
        if let Some(name) = &operation.path_parameter {
            builder.add_path_parameter(name);
        }
        if let Some(request) = &operation.request {
            builder.set_json_request_body(payload_schema(request));
        }
        match &operation.response {
            Some(response) => builder.set_json_response(
                operation.status,
                operation.description,
                payload_schema(response),
            ),
            None => builder.set_response(operation.status, operation.description),
        };
        builder.add_error_responses(&error_ref, operation.errors);
        if operation.with_filters {
            for filter in stack.filters() {
                builder.add_parameter(filter.clone());
            }
        }
    }
    Ok(())
}

fn plan_stack(stack: &Stack<'_>) -> StackPlan {
    let identifier = stack.identifier();
    let plural = stack.plural_identifier();
    // Computed once so item-scoped custom operations never depend on which
    // CRUD verbs the stack supports.
    let path_parameter = stack.path_parameter_name();
    let collection_url = format!("/{plural}");
    let item_url = format!("/{plural}/{{{path_parameter}}}");

    let mut operations: Vec<OperationPlan> = CrudVerb::ALL
        .into_iter()
        .filter(|verb| stack.is_supported(*verb))
        .map(|verb| {
            let (status, description, request, response) = match verb {
                CrudVerb::Create => (201, "Created", Some(Payload::Item), Some(Payload::Item)),
                CrudVerb::Read => (200, "OK", None, Some(Payload::Item)),
                CrudVerb::Update => (200, "OK", Some(Payload::Item), Some(Payload::Item)),
                CrudVerb::Delete => (204, "No content", None, None),
                CrudVerb::List => (200, "OK", None, Some(Payload::Collection)),
            };
            OperationPlan {
                method: verb.method(),
                url: if verb.targets_item() {
                    item_url.clone()
                } else {
                    collection_url.clone()
                },
                operation_id: format!("{verb}_{identifier}"),
                summary: format!("{} {}", verb.title(), stack.name()),
                path_parameter: verb.targets_item().then(|| path_parameter.clone()),
                request,
                status,
                description,
                response,
                errors: if verb == CrudVerb::Create {
                    CREATE_ERRORS
                } else {
                    DEFAULT_ERRORS
                },
                with_filters: verb == CrudVerb::List,
            }
        })
        .collect();

    operations.extend(stack.custom_operations().iter().map(|custom| {
        plan_custom_operation(stack, custom, &identifier, &plural, &path_parameter)
    }));

    StackPlan {
        name: stack.name().to_string(),
        tag: stack.readable_name(),
        item_schema: stack.item_schema_name(),
        collection_schema: stack.collection_schema_name(),
        operations,
    }
}

fn plan_custom_operation(
    stack: &Stack<'_>,
    custom: &CustomOperation<'_>,
    identifier: &str,
    plural: &str,
    path_parameter: &str,
) -> OperationPlan {
    let slug = custom.url_slug();
    let (url, path_parameter, response) = match custom.kind() {
        CustomOperationKind::Item => (
            format!("/{plural}/{{{path_parameter}}}/{slug}"),
            Some(path_parameter.to_string()),
            Payload::Item,
        ),
        CustomOperationKind::Collection => {
            (format!("/{plural}/{slug}"), None, Payload::Collection)
        }
    };

    OperationPlan {
        method: "post",
        url,
        operation_id: format!("{}_{identifier}", custom.identifier()),
        summary: format!("{} {}", custom.name(), stack.name()),
        path_parameter,
        request: custom
            .request_schema()
            .map(|schema| Payload::Declared(schema.clone())),
        status: 200,
        description: "OK",
        response: Some(response),
        errors: DEFAULT_ERRORS,
        with_filters: false,
    }
}

/// Copy the base schema and inject read-only `id`, `createdAt` and
/// `updatedAt` properties. Declared properties with those names are replaced.
fn item_schema(stack: &Stack<'_>, base: &Value) -> Result<Value, ResolveError> {
    let invalid = || ResolveError::InvalidBaseSchema(stack.schema_ref().to_string());

    let mut schema = base.clone();
    let map = schema.as_object_mut().ok_or_else(invalid)?;

    let properties = map
        .entry("properties")
        .or_insert_with(|| Value::Object(Map::new()))
        .as_object_mut()
        .ok_or_else(invalid)?;
    properties.insert(
        "id".to_string(),
        json!({
            "type": "string",
            "description": "ID of the resource",
            "readOnly": true,
        }),
    );
    properties.insert(
        "createdAt".to_string(),
        json!({
            "type": "string",
            "format": "date-time",
            "description": "Date-time the resource was created",
            "readOnly": true,
        }),
    );
    properties.insert(
        "updatedAt".to_string(),
        json!({
            "type": "string",
            "format": "date-time",
            "description": "Date-time the resource was updated",
            "readOnly": true,
        }),
    );

    let required = map
        .entry("required")
        .or_insert_with(|| Value::Array(Vec::new()))
        .as_array_mut()
        .ok_or_else(invalid)?;
    required.extend(["id", "createdAt", "updatedAt"].map(|name| json!(name)));

    Ok(schema)
}

/// A page of items plus an optional cursor to the next page.
fn collection_schema(item_schema_name: &str) -> Value {
    json!({
        "type": "object",
        "properties": {
            "nextUrl": {
                "type": "string",
                "format": "url",
                "description": "Next link to be used with pagination",
            },
            "items": {
                "type": "array",
                "items": schema_ref(item_schema_name),
            },
        },
        "required": ["items"],
    })
}
