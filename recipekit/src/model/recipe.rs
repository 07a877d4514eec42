use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::model::{Method, SchemaRef};

/// One callable API operation extracted from an OpenAPI document.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeDescriptor {
    pub id: Uuid,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    pub method: Method,
    /// Server base url followed by the path template. `{param}` placeholders are kept as-is.
    pub path: String,
    pub project: String,
    pub auth: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_body: Option<RequestBody>,
}

impl RecipeDescriptor {
    /// Identifies the same operation across compilations of a document.
    pub fn key(&self) -> String {
        recipe_key(self.method.as_str(), &self.path)
    }
}

pub(crate) fn recipe_key(method: &str, path: &str) -> String {
    format!("{}_{}", method, path)
}

/// The body of an operation. The schema is flattened next to `contentType` and `required`
/// when serialized.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestBody {
    pub content_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    /// `None` when the body references a component schema that could not be resolved.
    #[serde(flatten)]
    pub schema: Option<SchemaRef>,
}

#[derive(Debug, Default, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthApply {
    /// Every recipe of the project carries the project auth.
    #[default]
    All,
    None,
}

impl AuthApply {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthApply::All => "all",
            AuthApply::None => "none",
        }
    }
}

/// Project level settings written next to the recipes as `config.json`.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectConfig {
    pub id: String,
    pub project: String,
    pub version: String,
    pub server: String,
    pub auth: Option<String>,
    pub auth_apply: AuthApply,
    /// The document's `info` object, written inline next to the fields above.
    pub info: Map<String, Value>,
}

impl Serialize for ProjectConfig {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.record().serialize(serializer)
    }
}

impl ProjectConfig {
    pub fn project_id(project: &str, version: &str) -> String {
        format!("{}_v{}", project, version)
    }

    /// The `config.json` record. `info` entries are applied last, so an `info` key such as
    /// `version` replaces the field of the same name and every key appears once.
    pub fn record(&self) -> Map<String, Value> {
        let mut record = Map::new();
        record.insert("id".to_string(), Value::from(self.id.as_str()));
        record.insert("project".to_string(), Value::from(self.project.as_str()));
        record.insert("version".to_string(), Value::from(self.version.as_str()));
        record.insert("server".to_string(), Value::from(self.server.as_str()));
        record.insert(
            "auth".to_string(),
            self.auth.clone().map_or(Value::Null, Value::String),
        );
        record.insert("authApply".to_string(), Value::from(self.auth_apply.as_str()));
        record.extend(self.info.clone());
        record
    }

    /// The auth tag each recipe of this project should carry.
    pub fn recipe_auth(&self) -> Option<String> {
        match self.auth_apply {
            AuthApply::All => self.auth.clone(),
            AuthApply::None => None,
        }
    }
}
