use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use log::{debug, info};
use serde::Serialize;
use serde_json::Value;

use crate::model::recipe_key;
use crate::model::{ProjectConfig, RecipeDescriptor};
use crate::openapi::Compilation;

pub const RECIPES_FILE: &str = "recipes.json";
pub const CONFIG_FILE: &str = "config.json";
const API_FILE: &str = "api.json";
const COMPONENTS_FILE: &str = "components.json";

/// The recipe files of one project version: `<recipe_root>/<project>_v<version>/`.
#[derive(Debug)]
pub struct RecipeSet {
    dir: PathBuf,
}

impl RecipeSet {
    /// Creates the project directory under `recipe_root` if it does not exist yet.
    pub fn new<P: Into<PathBuf>>(recipe_root: P, config: &ProjectConfig) -> Result<Self> {
        let dir = recipe_root.into().join(&config.id);
        fs::create_dir_all(&dir).with_context(|| format!("creating {}", dir.display()))?;
        let dir_metadata = fs::metadata(&dir).context("recipe dir")?;
        if !dir_metadata.is_dir() {
            return Err(anyhow!("'{}' must be a directory", dir.display()));
        }
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Writes `recipes.json`, merged with the recipes already on disk, and `config.json`.
    /// Returns the merged recipes.
    pub fn write(&self, compilation: &Compilation) -> Result<Vec<Value>> {
        let existing = self.read_recipes()?;
        let recipes = merge_recipes(&existing, &compilation.recipes)?;
        write_json(&self.dir.join(RECIPES_FILE), &recipes)?;
        write_json(&self.dir.join(CONFIG_FILE), &compilation.config)?;
        Ok(recipes)
    }

    /// The recipes of a previous run, or nothing if there was none.
    pub fn read_recipes(&self) -> Result<Vec<Value>> {
        let path = self.dir.join(RECIPES_FILE);
        if !path.exists() {
            return Ok(vec![]);
        }
        let data =
            fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))?;
        serde_json::from_str(&data).with_context(|| format!("parsing {}", path.display()))
    }
}

/// Keeps recipe ids stable across runs. A new recipe with the same method and path as an
/// existing one takes over its `id`, and any field only the existing one has. Fields of the
/// new recipe win otherwise. Existing recipes without a counterpart are dropped.
pub fn merge_recipes(existing: &[Value], recipes: &[RecipeDescriptor]) -> Result<Vec<Value>> {
    let existing = existing
        .iter()
        .filter_map(|recipe| Some((existing_key(recipe)?, recipe)))
        .collect::<HashMap<_, _>>();
    recipes
        .iter()
        .map(|recipe| -> Result<Value> {
            match (existing.get(&recipe.key()), serde_json::to_value(recipe)?) {
                (Some(old), Value::Object(new)) => {
                    let mut merged = old.as_object().cloned().unwrap_or_default();
                    let id = merged.get("id").cloned();
                    merged.extend(new);
                    if let Some(id) = id {
                        debug!("keeping id {} for {}", id, recipe.key());
                        merged.insert("id".to_string(), id);
                    }
                    Ok(Value::Object(merged))
                }
                (_, new) => Ok(new),
            }
        })
        .collect()
}

fn existing_key(recipe: &Value) -> Option<String> {
    let method = recipe.get("method")?.as_str()?;
    let path = recipe.get("path")?.as_str()?;
    Some(recipe_key(method, path))
}

/// Dumps the decoded document, the component directory and the recipes into `dir`.
pub fn write_debug_artifacts<P: AsRef<Path>>(
    dir: P,
    document: &Value,
    compilation: &Compilation,
) -> Result<()> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    write_json(&dir.join(API_FILE), document)?;
    write_json(&dir.join(COMPONENTS_FILE), &compilation.schemas)?;
    write_json(&dir.join(RECIPES_FILE), &compilation.recipes)?;
    Ok(())
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let data = serde_json::to_string_pretty(value)?;
    fs::write(path, data).with_context(|| format!("writing {}", path.display()))?;
    info!("wrote {}", path.display());
    Ok(())
}
