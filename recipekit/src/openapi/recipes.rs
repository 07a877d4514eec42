use lazy_static::lazy_static;
use log::{debug, warn};
use regex::{Captures, Regex};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::model::{Method, ProjectConfig, RecipeDescriptor, RequestBody, SchemaRef};
use crate::openapi::directory::SchemaDirectory;
use crate::openapi::refs::pure_ref;
use crate::openapi::schema::SchemaResolver;

lazy_static! {
    static ref UPPERCASE: Regex = Regex::new(r"([A-Z])").unwrap();
    static ref WORD: Regex = Regex::new(r"\w\S*").unwrap();
}

/// `createChatCompletion` becomes `Create Chat Completion`.
pub fn camel_case_to_title_case(input: &str) -> String {
    let spaced = UPPERCASE.replace_all(input, " $1");
    WORD.replace_all(spaced.trim(), |captures: &Captures| {
        let mut chars = captures[0].chars();
        let first = chars
            .next()
            .map(|first| first.to_uppercase().collect::<String>())
            .unwrap_or_default();
        first + &chars.as_str().to_lowercase()
    })
    .into_owned()
}

/// `/v1/chat/completions` becomes `V1ChatCompletions`.
pub fn path_to_title_case(path: &str) -> String {
    path.split('/')
        .filter(|segment| !segment.is_empty())
        .map(|segment| {
            let mut chars = segment.chars();
            chars
                .next()
                .map(|first| first.to_uppercase().chain(chars).collect::<String>())
                .unwrap_or_default()
        })
        .collect()
}

/// Extracts one recipe per operation of the `paths` map, in document order.
pub struct RecipeExtractor<'a> {
    config: &'a ProjectConfig,
    directory: &'a SchemaDirectory,
    resolver: SchemaResolver<'a>,
}

impl<'a> RecipeExtractor<'a> {
    pub fn new(
        config: &'a ProjectConfig,
        directory: &'a SchemaDirectory,
        docs_base_url: &'a str,
    ) -> Self {
        Self {
            config,
            directory,
            resolver: SchemaResolver::new(directory.schemas(), docs_base_url),
        }
    }

    pub fn extract(&self, paths: &Map<String, Value>) -> Vec<RecipeDescriptor> {
        let mut recipes = vec![];
        for (path, item) in paths {
            let Some(item) = item.as_object() else {
                warn!("skipping path '{}': path item is not an object", path);
                continue;
            };
            for (key, operation) in item {
                let Ok(method) = key.parse::<Method>() else {
                    debug!("skipping '{}' of path '{}': not an operation", key, path);
                    continue;
                };
                let Some(operation) = operation.as_object() else {
                    warn!("skipping {} {}: operation is not an object", method, path);
                    continue;
                };
                debug!("extracting recipe {} {}", method, path);
                recipes.push(self.recipe(path, method, operation));
            }
        }
        recipes
    }

    fn recipe(
        &self,
        path: &str,
        method: Method,
        operation: &Map<String, Value>,
    ) -> RecipeDescriptor {
        let title = match operation.get("operationId").and_then(Value::as_str) {
            Some(operation_id) => camel_case_to_title_case(operation_id),
            None => path_to_title_case(path),
        };
        RecipeDescriptor {
            id: Uuid::new_v4(),
            title,
            summary: operation
                .get("summary")
                .and_then(Value::as_str)
                .map(String::from),
            method,
            path: format!("{}{}", self.config.server, path),
            project: self.config.project.clone(),
            auth: self.config.recipe_auth(),
            request_body: operation
                .get("requestBody")
                .and_then(|body| self.request_body(path, method, body)),
        }
    }

    /// The body of the first declared content type.
    fn request_body(&self, path: &str, method: Method, body: &Value) -> Option<RequestBody> {
        let Some((content_type, media)) = body
            .get("content")
            .and_then(Value::as_object)
            .and_then(|content| content.iter().next())
        else {
            warn!("{} {}: request body declares no content", method, path);
            return None;
        };
        Some(RequestBody {
            content_type: content_type.clone(),
            required: body.get("required").and_then(Value::as_bool),
            schema: media
                .get("schema")
                .and_then(|schema| self.body_schema(path, method, schema)),
        })
    }

    fn body_schema(&self, path: &str, method: Method, schema: &Value) -> Option<SchemaRef> {
        if let Some(name) = pure_ref(schema) {
            let node = self.directory.get(name).cloned();
            if node.is_none() {
                warn!(
                    "{} {}: request body references unresolved schema '{}'",
                    method, path, name
                );
            }
            return node;
        }
        self.resolver
            .resolve(schema)
            .map_err(|err| warn!("{} {}: unable to resolve request body: {}", method, path, err))
            .ok()
    }
}
