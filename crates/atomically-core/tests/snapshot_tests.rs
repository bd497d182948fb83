use atomically_core::{Atomically, OutputFormat, OutputOptions};

const TAGS: &str = r##"{
  "openapi": "3.0.3",
  "components": { "schemas": { "Tag": { "type": "object" } } },
  "x-atomically": {
    "stacks": {
      "Tag": {
        "schema": { "$ref": "#/components/schemas/Tag" },
        "supported": ["delete"]
      }
    }
  }
}"##;

#[test]
fn delete_only_stack_renders_fully_expanded_json() {
    let doc = Atomically::from_json(TAGS).unwrap().generate().unwrap();
    let options = OutputOptions {
        format: OutputFormat::Json,
        sort_keys: false,
        keep_extension: false,
    };
    let rendered = doc.render(&options).unwrap();

    insta::assert_snapshot!(rendered.trim_end(), @r##"
{
  "openapi": "3.0.3",
  "components": {
    "schemas": {
      "Tag": {
        "type": "object"
      },
      "TagItem": {
        "type": "object",
        "properties": {
          "id": {
            "type": "string",
            "description": "ID of the resource",
            "readOnly": true
          },
          "createdAt": {
            "type": "string",
            "format": "date-time",
            "description": "Date-time the resource was created",
            "readOnly": true
          },
          "updatedAt": {
            "type": "string",
            "format": "date-time",
            "description": "Date-time the resource was updated",
            "readOnly": true
          }
        },
        "required": [
          "id",
          "createdAt",
          "updatedAt"
        ]
      },
      "TagCollection": {
        "type": "object",
        "properties": {
          "nextUrl": {
            "type": "string",
            "format": "url",
            "description": "Next link to be used with pagination"
          },
          "items": {
            "type": "array",
            "items": {
              "$ref": "#/components/schemas/TagItem"
            }
          }
        },
        "required": [
          "items"
        ]
      },
      "Error": {
        "type": "object",
        "properties": {
          "type": {
            "type": "string",
            "description": "URI reference that identifies the problem type"
          },
          "title": {
            "type": "string",
            "description": "A short, human-readable summary of the problem type"
          },
          "status": {
            "type": "string",
            "description": "The HTTP status code generated by the origin server for this occurrence of the problem."
          },
          "detail": {
            "type": "string",
            "description": "A human-readable explanation specific to this occurrence of the problem"
          },
          "instance": {
            "type": "string",
            "description": "A URI reference that identifies the specific occurrence of the problem.  It may or may not yield further information if dereferenced"
          }
        }
      }
    }
  },
  "tags": [
    {
      "name": "Tag"
    }
  ],
  "paths": {
    "/tags/{tag_id}": {
      "delete": {
        "operationId": "delete_tag",
        "summary": "Delete Tag",
        "tags": [
          "Tag"
        ],
        "parameters": [
          {
            "in": "path",
            "name": "tag_id",
            "schema": {
              "type": "string"
            },
            "required": true
          }
        ],
        "responses": {
          "204": {
            "description": "No content"
          },
          "400": {
            "description": "Client error",
            "content": {
              "application/json": {
                "schema": {
                  "$ref": "#/components/schemas/Error"
                }
              }
            }
          },
          "404": {
            "description": "Not found",
            "content": {
              "application/json": {
                "schema": {
                  "$ref": "#/components/schemas/Error"
                }
              }
            }
          },
          "500": {
            "description": "Server error",
            "content": {
              "application/json": {
                "schema": {
                  "$ref": "#/components/schemas/Error"
                }
              }
            }
          }
        }
      }
    }
  }
}"##);
}

#[test]
fn sorted_yaml_output_is_stable() {
    let atomic = Atomically::from_json(TAGS).unwrap();
    let options = OutputOptions {
        format: OutputFormat::Yaml,
        sort_keys: true,
        keep_extension: true,
    };
    let first = atomic.generate().unwrap().render(&options).unwrap();
    let second = atomic.generate().unwrap().render(&options).unwrap();
    assert_eq!(first, second);

    let keys: Vec<&str> = first
        .lines()
        .filter(|line| !line.starts_with(' ') && !line.starts_with('-'))
        .filter_map(|line| line.split(':').next())
        .collect();
    assert_eq!(keys, ["components", "openapi", "paths", "tags", "x-atomically"]);
}
