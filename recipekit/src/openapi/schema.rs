use std::borrow::Cow;
use std::sync::Arc;

use indexmap::IndexMap;
use lazy_static::lazy_static;
use log::warn;
use regex::Regex;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::model::{Property, SchemaKind, SchemaMeta, SchemaNode, SchemaRef};
use crate::openapi::refs::pure_ref;

lazy_static! {
    /// A markdown link to a site-relative path: `[text](/docs/guides)`.
    static ref RELATIVE_LINK: Regex = Regex::new(r"\]\((/[^)]+)\)").unwrap();
    static ref EMPTY: Map<String, Value> = Map::new();
}

/// A `$ref` to a component that is not (yet) in the resolved set.
#[derive(Error, Debug, Clone, Eq, PartialEq)]
#[error("reference to unresolved schema '{0}'")]
pub struct UnresolvedRef(pub String);

/// Builds [SchemaNode]s from raw OpenAPI schema objects, substituting every `$ref` with the
/// already resolved component node it names.
pub struct SchemaResolver<'a> {
    resolved: &'a IndexMap<String, SchemaRef>,
    docs_base_url: &'a str,
}

impl<'a> SchemaResolver<'a> {
    pub fn new(resolved: &'a IndexMap<String, SchemaRef>, docs_base_url: &'a str) -> Self {
        Self {
            resolved,
            docs_base_url,
        }
    }

    /// A schema that is a `$ref` returns the shared component node itself, anything else is
    /// built into a new node.
    pub fn resolve(&self, schema: &Value) -> Result<SchemaRef, UnresolvedRef> {
        if let Some(name) = pure_ref(schema) {
            return self
                .resolved
                .get(name)
                .cloned()
                .ok_or_else(|| UnresolvedRef(name.to_string()));
        }
        // Non-object schemas (e.g. `items: true`) carry no information and become strings.
        let object = schema.as_object().unwrap_or(&*EMPTY);
        Ok(Arc::new(SchemaNode {
            kind: self.kind(object)?,
            meta: self.meta(object),
        }))
    }

    fn kind(&self, object: &Map<String, Value>) -> Result<SchemaKind, UnresolvedRef> {
        let kind = match infer_type(object) {
            "string" => SchemaKind::String,
            "number" => SchemaKind::Number,
            "integer" => SchemaKind::Integer,
            "boolean" => SchemaKind::Boolean,
            "file" => SchemaKind::File,
            "object" => SchemaKind::Object {
                properties: self.properties(object)?,
            },
            "array" => SchemaKind::Array {
                items: match object.get("items") {
                    Some(items) => self.resolve(items)?,
                    None => Arc::new(SchemaNode::new(SchemaKind::String)),
                },
            },
            "anyOf" => SchemaKind::AnyOf {
                variants: self.variants(object, "anyOf")?,
            },
            "oneOf" => SchemaKind::OneOf {
                variants: self.variants(object, "oneOf")?,
            },
            "allOf" => SchemaKind::AllOf {
                variants: self.variants(object, "allOf")?,
            },
            other => {
                warn!("unknown schema type '{}', treating it as a string", other);
                SchemaKind::String
            }
        };
        Ok(kind)
    }

    fn properties(&self, object: &Map<String, Value>) -> Result<Vec<Property>, UnresolvedRef> {
        let required = object
            .get("required")
            .and_then(Value::as_array)
            .map(|names| names.iter().filter_map(Value::as_str).collect::<Vec<_>>())
            .unwrap_or_default();
        object
            .get("properties")
            .and_then(Value::as_object)
            .unwrap_or(&*EMPTY)
            .iter()
            .map(|(name, schema)| {
                Ok(Property {
                    name: name.clone(),
                    required: required.contains(&name.as_str()),
                    schema: self.resolve(schema)?,
                })
            })
            .collect()
    }

    fn variants(
        &self,
        object: &Map<String, Value>,
        key: &str,
    ) -> Result<Vec<SchemaRef>, UnresolvedRef> {
        object
            .get(key)
            .and_then(Value::as_array)
            .map(|variants| variants.iter().map(|variant| self.resolve(variant)).collect())
            .unwrap_or_else(|| Ok(vec![]))
    }

    fn meta(&self, object: &Map<String, Value>) -> SchemaMeta {
        let value = |key: &str| object.get(key).cloned();
        SchemaMeta {
            description: object
                .get("description")
                .and_then(Value::as_str)
                .map(|description| self.absolute_links(description).into_owned()),
            nullable: object.get("nullable").and_then(Value::as_bool),
            enum_values: object.get("enum").and_then(Value::as_array).cloned(),
            minimum: value("minimum"),
            maximum: value("maximum"),
            default: value("default"),
            example: value("example"),
            min_items: object.get("minItems").and_then(Value::as_u64),
            max_items: object.get("maxItems").and_then(Value::as_u64),
            additional_properties: value("additionalProperties"),
            format: object
                .get("format")
                .and_then(Value::as_str)
                .map(String::from),
        }
    }

    /// Points markdown links to site-relative paths at the documentation site.
    fn absolute_links<'d>(&self, description: &'d str) -> Cow<'d, str> {
        RELATIVE_LINK.replace_all(description, format!("]({}${{1}})", self.docs_base_url))
    }
}

/// The type tag of a raw schema. A declared `type` wins, except that `type` together with
/// `format` marks a file. Without a declared type the shape decides, defaulting to string.
fn infer_type(object: &Map<String, Value>) -> &str {
    if let Some(declared) = object.get("type") {
        if object.contains_key("format") {
            return "file";
        }
        return declared.as_str().unwrap_or_else(|| {
            warn!("unsupported schema type {}, treating it as a string", declared);
            "string"
        });
    }
    ["properties", "items", "anyOf", "oneOf", "allOf"]
        .into_iter()
        .find(|key| object.contains_key(*key))
        .map(|key| match key {
            "properties" => "object",
            "items" => "array",
            union => union,
        })
        .unwrap_or("string")
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use indexmap::IndexMap;
    use serde_json::{json, Value};

    use crate::model::{SchemaKind, SchemaNode, SchemaRef};
    use crate::openapi::schema::{SchemaResolver, UnresolvedRef};

    const DOCS: &str = "https://platform.openai.com";

    fn resolve(schema: Value) -> Result<SchemaRef, UnresolvedRef> {
        SchemaResolver::new(&IndexMap::new(), DOCS).resolve(&schema)
    }

    mod infer_type {
        use serde_json::{json, Value};

        use crate::openapi::schema::infer_type;

        fn infer(schema: Value) -> String {
            let object = schema.as_object().cloned().unwrap_or_default();
            infer_type(&object).to_string()
        }

        #[test]
        fn declared_type_wins() {
            assert_eq!(infer(json!({ "type": "integer", "items": {} })), "integer");
        }

        #[test]
        fn type_with_format_is_file() {
            assert_eq!(infer(json!({ "type": "string", "format": "binary" })), "file");
        }

        #[test]
        fn shape() {
            assert_eq!(infer(json!({ "properties": {} })), "object");
            assert_eq!(infer(json!({ "items": {} })), "array");
            assert_eq!(infer(json!({ "anyOf": [] })), "anyOf");
            assert_eq!(infer(json!({ "oneOf": [] })), "oneOf");
            assert_eq!(infer(json!({ "allOf": [] })), "allOf");
        }

        #[test]
        fn defaults_to_string() {
            assert_eq!(infer(json!({ "description": "anything" })), "string");
            assert_eq!(infer(json!({ "type": ["string", "null"] })), "string");
        }
    }

    #[test]
    fn object_with_required_properties() -> anyhow::Result<()> {
        let node = resolve(json!({
            "type": "object",
            "required": ["model"],
            "properties": {
                "model": { "type": "string", "description": "ID of the model to use." },
                "temperature": { "type": "number", "minimum": 0, "maximum": 2, "default": 1, "nullable": true }
            }
        }))?;
        assert_eq!(
            serde_json::to_value(&*node)?,
            json!({
                "type": "object",
                "objectSchema": [
                    { "name": "model", "required": true, "type": "string", "description": "ID of the model to use." },
                    { "name": "temperature", "type": "number", "minimum": 0, "maximum": 2, "default": 1, "nullable": true }
                ]
            })
        );
        Ok(())
    }

    #[test]
    fn array_items() -> anyhow::Result<()> {
        let node = resolve(json!({ "type": "array", "items": { "type": "integer" }, "minItems": 1 }))?;
        assert_eq!(node.items().map(|items| items.kind.name()), Some("integer"));
        assert_eq!(node.meta.min_items, Some(1));
        Ok(())
    }

    #[test]
    fn array_without_items_holds_strings() -> anyhow::Result<()> {
        let node = resolve(json!({ "type": "array" }))?;
        assert_eq!(node.items().map(|items| items.kind.name()), Some("string"));
        Ok(())
    }

    #[test]
    fn union_variants_keep_order() -> anyhow::Result<()> {
        let node = resolve(json!({
            "oneOf": [{ "type": "string" }, { "type": "array", "items": { "type": "string" } }],
            "default": "<|endoftext|>"
        }))?;
        assert_eq!(
            node.variants()
                .iter()
                .map(|variant| variant.kind.name())
                .collect::<Vec<_>>(),
            vec!["string", "array"]
        );
        assert_eq!(node.meta.default, Some(json!("<|endoftext|>")));
        Ok(())
    }

    #[test]
    fn references_share_the_resolved_node() -> anyhow::Result<()> {
        let message: SchemaRef = Arc::new(SchemaNode::new(SchemaKind::String));
        let mut resolved = IndexMap::new();
        resolved.insert("Message".to_string(), message.clone());
        let resolver = SchemaResolver::new(&resolved, DOCS);

        let direct = resolver.resolve(&json!({ "$ref": "#/components/schemas/Message" }))?;
        assert!(Arc::ptr_eq(&direct, &message));

        let node = resolver.resolve(&json!({
            "type": "object",
            "properties": {
                "first": { "$ref": "#/components/schemas/Message" },
                "all": { "type": "array", "items": { "$ref": "#/components/schemas/Message" } }
            }
        }))?;
        let first = node.property("first").map(|p| p.schema.clone());
        assert!(first.is_some_and(|first| Arc::ptr_eq(&first, &message)));
        let all = node.property("all").and_then(|p| p.schema.items().cloned());
        assert!(all.is_some_and(|items| Arc::ptr_eq(&items, &message)));
        Ok(())
    }

    #[test]
    fn unresolved_reference() {
        assert_eq!(
            resolve(json!({ "type": "object", "properties": { "a": { "$ref": "#/components/schemas/Missing" } } })),
            Err(UnresolvedRef("Missing".to_string()))
        );
    }

    #[test]
    fn relative_description_links_become_absolute() -> anyhow::Result<()> {
        let node = resolve(json!({
            "type": "string",
            "description": "See [models](/docs/models) and [the API](https://example.com/api)."
        }))?;
        assert_eq!(
            node.meta.description.as_deref(),
            Some("See [models](https://platform.openai.com/docs/models) and [the API](https://example.com/api).")
        );
        Ok(())
    }

    #[test]
    fn copies_meta() -> anyhow::Result<()> {
        let node = resolve(json!({
            "type": "string",
            "enum": ["user", "assistant"],
            "example": "user",
            "additionalProperties": false
        }))?;
        assert_eq!(node.meta.enum_values, Some(vec![json!("user"), json!("assistant")]));
        assert_eq!(node.meta.example, Some(json!("user")));
        assert_eq!(node.meta.additional_properties, Some(json!(false)));
        assert_eq!(node.meta.format, None);
        Ok(())
    }

    #[test]
    fn unknown_type_degrades_to_string() -> anyhow::Result<()> {
        let node = resolve(json!({ "type": "uuid" }))?;
        assert_eq!(node.kind, SchemaKind::String);
        Ok(())
    }
}
