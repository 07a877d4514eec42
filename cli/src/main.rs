use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use serde_json::Value;

use recipekit::openapi::Compiler;
use recipekit::output::{write_debug_artifacts, RecipeSet};

use crate::config::{Command, Config, Curl, ParseYaml};

mod config;

fn main() -> Result<()> {
    env_logger::init();
    let config = Config::parse();
    match &config.command {
        Command::Curl(args) => curl(args),
        Command::ParseYaml(args) => parse_yaml(args),
    }
}

fn curl(args: &Curl) -> Result<()> {
    let command = match &args.command {
        Some(command) => command.clone(),
        None => {
            let mut command = String::new();
            io::stdin()
                .read_to_string(&mut command)
                .context("read cURL command from stdin")?;
            command
        }
    };
    let request = recipekit::curl::parse(&command)?;
    println!("{}", args.format.to_json(&request)?);
    Ok(())
}

fn parse_yaml(args: &ParseYaml) -> Result<()> {
    let document = read_document(&args.file)?;
    let compiler = Compiler::new(compiler_config(args.config.as_deref())?);
    let compilation = compiler
        .compile(&document, &args.project, &args.version)
        .with_context(|| format!("compile {}", args.file.display()))?;
    let recipe_set = RecipeSet::new(&args.recipe_dir, &compilation.config)?;
    let recipes = recipe_set.write(&compilation)?;
    info!(
        "{} recipe(s) in {}",
        recipes.len(),
        recipe_set.dir().display()
    );
    if args.debug_artifacts {
        write_debug_artifacts(&args.output_dir, &document, &compilation)?;
    }
    Ok(())
}

/// Decodes a yaml (or json) document. Non-string keys such as response codes become strings.
fn read_document(path: &Path) -> Result<Value> {
    let file = File::open(path).with_context(|| format!("read {}", path.display()))?;
    let reader = BufReader::new(file);
    let yaml: serde_yaml::Value =
        serde_yaml::from_reader(reader).with_context(|| format!("decode {}", path.display()))?;
    Ok(serde_json::to_value(yaml)?)
}

fn compiler_config(path: Option<&Path>) -> Result<recipekit::openapi::Config> {
    match path {
        None => Ok(Default::default()),
        Some(path) => {
            let file = File::open(path).context("read compiler config")?;
            let reader = BufReader::new(file);
            Ok(serde_json::from_reader(reader)?)
        }
    }
}
