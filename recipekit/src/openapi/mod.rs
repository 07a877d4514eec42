//! Compiles an OpenAPI document into a directory of resolved component schemas and a flat
//! list of recipes, one per operation.

use log::{debug, info};
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::model::{AuthApply, ProjectConfig, RecipeDescriptor};
pub use directory::{Dependencies, SchemaDirectory};
pub use error::CompileError;
pub use recipes::{camel_case_to_title_case, path_to_title_case, RecipeExtractor};
pub use refs::{pure_ref, ref_dependencies, ref_name};
pub use schema::{SchemaResolver, UnresolvedRef};

mod directory;
mod error;
mod recipes;
mod refs;
mod schema;

/// Compiler settings, optionally loaded from a JSON file. Every field has a default.
#[derive(Debug, Clone, Eq, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Prefixed to site-relative markdown links in schema descriptions.
    pub docs_base_url: String,
    /// Auth tag of the project, e.g. `bearer`.
    pub auth: Option<String>,
    pub auth_apply: AuthApply,
    /// Which entry of `servers` provides the base url of every recipe path.
    pub server_index: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            docs_base_url: "https://platform.openai.com".to_string(),
            auth: Some("bearer".to_string()),
            auth_apply: AuthApply::All,
            server_index: 0,
        }
    }
}

/// Everything produced from one document.
#[derive(Debug, Clone, PartialEq)]
pub struct Compilation {
    pub config: ProjectConfig,
    pub schemas: SchemaDirectory,
    pub recipes: Vec<RecipeDescriptor>,
}

#[derive(Debug, Default)]
pub struct Compiler {
    config: Config,
}

impl Compiler {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Compiles an already decoded OpenAPI document.
    ///
    /// A document without a usable `servers` entry or `paths` map fails as a whole. Schemas
    /// that cannot be resolved are left out of the directory and recipes with a body
    /// referencing them get a body without a schema.
    pub fn compile(
        &self,
        document: &Value,
        project: &str,
        version: &str,
    ) -> Result<Compilation, CompileError> {
        let document = document
            .as_object()
            .ok_or_else(|| CompileError::invalid("<document>", "an object"))?;
        let config = self.project_config(document, project, version)?;
        let paths = document
            .get("paths")
            .ok_or_else(|| CompileError::missing("paths"))?
            .as_object()
            .ok_or_else(|| CompileError::invalid("paths", "an object"))?;

        let no_schemas = Map::new();
        let schemas = SchemaDirectory::build(
            component_schemas(document)?.unwrap_or(&no_schemas),
            &self.config.docs_base_url,
        );
        let recipes =
            RecipeExtractor::new(&config, &schemas, &self.config.docs_base_url).extract(paths);
        info!(
            "compiled {} recipe(s) and {} component schema(s) for {}",
            recipes.len(),
            schemas.len(),
            config.id
        );
        Ok(Compilation {
            config,
            schemas,
            recipes,
        })
    }

    fn project_config(
        &self,
        document: &Map<String, Value>,
        project: &str,
        version: &str,
    ) -> Result<ProjectConfig, CompileError> {
        let servers = document
            .get("servers")
            .ok_or_else(|| CompileError::missing("servers"))?
            .as_array()
            .ok_or_else(|| CompileError::invalid("servers", "an array"))?;
        let index = self.config.server_index;
        let server = servers
            .get(index)
            .ok_or_else(|| {
                CompileError::invalid("servers", format!("at least {} entries", index + 1))
            })?
            .get("url")
            .and_then(Value::as_str)
            .ok_or_else(|| CompileError::missing(format!("servers[{}].url", index)))?;
        let info = document
            .get("info")
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default();
        Ok(ProjectConfig {
            id: ProjectConfig::project_id(project, version),
            project: project.to_string(),
            version: version.to_string(),
            server: server.to_string(),
            auth: self.config.auth.clone(),
            auth_apply: self.config.auth_apply,
            info,
        })
    }
}

fn component_schemas(
    document: &Map<String, Value>,
) -> Result<Option<&Map<String, Value>>, CompileError> {
    match document.get("components").and_then(|c| c.get("schemas")) {
        None => {
            debug!("document has no component schemas");
            Ok(None)
        }
        Some(schemas) => schemas
            .as_object()
            .map(Some)
            .ok_or_else(|| CompileError::invalid("components.schemas", "an object")),
    }
}

/// Compiles `document` with the default [Config].
pub fn compile(
    document: &Value,
    project: &str,
    version: &str,
) -> Result<Compilation, CompileError> {
    Compiler::default().compile(document, project, version)
}
