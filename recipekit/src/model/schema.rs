use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

/// Schema nodes are shared: every `$ref` to the same component points at the same node.
pub type SchemaRef = Arc<SchemaNode>;

/// A fully resolved schema. It never contains a `$ref`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SchemaNode {
    #[serde(flatten)]
    pub kind: SchemaKind,
    #[serde(flatten)]
    pub meta: SchemaMeta,
}

/// The shape of a [SchemaNode], decided once when the node is built.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum SchemaKind {
    String,
    Number,
    Integer,
    Boolean,
    File,
    Object {
        #[serde(rename = "objectSchema")]
        properties: Vec<Property>,
    },
    Array {
        #[serde(rename = "arraySchema")]
        items: SchemaRef,
    },
    AnyOf {
        variants: Vec<SchemaRef>,
    },
    OneOf {
        variants: Vec<SchemaRef>,
    },
    AllOf {
        variants: Vec<SchemaRef>,
    },
}

/// A named member of an object schema. Whether it is required belongs to the parent object,
/// not to the (possibly shared) schema it points at.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Property {
    pub name: String,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub required: bool,
    #[serde(flatten)]
    pub schema: SchemaRef,
}

/// Metadata copied verbatim from the source schema.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaMeta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nullable: Option<bool>,
    #[serde(rename = "enum", skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_items: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_items: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_properties: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

impl SchemaKind {
    /// The `type` tag as it appears in serialized output.
    pub fn name(&self) -> &'static str {
        match self {
            SchemaKind::String => "string",
            SchemaKind::Number => "number",
            SchemaKind::Integer => "integer",
            SchemaKind::Boolean => "boolean",
            SchemaKind::File => "file",
            SchemaKind::Object { .. } => "object",
            SchemaKind::Array { .. } => "array",
            SchemaKind::AnyOf { .. } => "anyOf",
            SchemaKind::OneOf { .. } => "oneOf",
            SchemaKind::AllOf { .. } => "allOf",
        }
    }
}

impl SchemaNode {
    pub fn new(kind: SchemaKind) -> Self {
        Self {
            kind,
            meta: SchemaMeta::default(),
        }
    }

    pub fn properties(&self) -> &[Property] {
        match &self.kind {
            SchemaKind::Object { properties } => properties,
            _ => &[],
        }
    }

    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties().iter().find(|p| p.name == name)
    }

    pub fn items(&self) -> Option<&SchemaRef> {
        match &self.kind {
            SchemaKind::Array { items } => Some(items),
            _ => None,
        }
    }

    pub fn variants(&self) -> &[SchemaRef] {
        match &self.kind {
            SchemaKind::AnyOf { variants }
            | SchemaKind::OneOf { variants }
            | SchemaKind::AllOf { variants } => variants,
            _ => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use crate::model::{Property, SchemaKind, SchemaMeta, SchemaNode};

    #[test]
    fn serializes_object_with_flattened_properties() -> serde_json::Result<()> {
        let name = Arc::new(SchemaNode {
            kind: SchemaKind::String,
            meta: SchemaMeta {
                description: Some("The name".to_string()),
                ..Default::default()
            },
        });
        let node = SchemaNode::new(SchemaKind::Object {
            properties: vec![
                Property {
                    name: "name".to_string(),
                    required: true,
                    schema: name.clone(),
                },
                Property {
                    name: "alias".to_string(),
                    required: false,
                    schema: name,
                },
            ],
        });
        assert_eq!(
            serde_json::to_value(&node)?,
            json!({
                "type": "object",
                "objectSchema": [
                    { "name": "name", "required": true, "type": "string", "description": "The name" },
                    { "name": "alias", "type": "string", "description": "The name" }
                ]
            })
        );
        Ok(())
    }

    #[test]
    fn serializes_array_and_union() -> serde_json::Result<()> {
        let string = Arc::new(SchemaNode::new(SchemaKind::String));
        let node = SchemaNode {
            kind: SchemaKind::Array {
                items: Arc::new(SchemaNode::new(SchemaKind::AnyOf {
                    variants: vec![string.clone(), Arc::new(SchemaNode::new(SchemaKind::Integer))],
                })),
            },
            meta: SchemaMeta {
                min_items: Some(1),
                ..Default::default()
            },
        };
        assert_eq!(
            serde_json::to_value(&node)?,
            json!({
                "type": "array",
                "minItems": 1,
                "arraySchema": {
                    "type": "anyOf",
                    "variants": [{ "type": "string" }, { "type": "integer" }]
                }
            })
        );
        Ok(())
    }

    #[test]
    fn accessors_match_kind() {
        let node = SchemaNode::new(SchemaKind::OneOf {
            variants: vec![Arc::new(SchemaNode::new(SchemaKind::Boolean))],
        });
        assert_eq!(node.kind.name(), "oneOf");
        assert_eq!(node.variants().len(), 1);
        assert!(node.properties().is_empty());
        assert!(node.items().is_none());
    }
}
