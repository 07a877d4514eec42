use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;

#[derive(Parser, Debug)]
#[command(name = "recipekit", author, version, about)]
pub struct Config {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Parses a cURL command and prints the resulting request as JSON.
    Curl(Curl),

    /// Given an OpenAPI yaml file, generate a JSON file with recipes.
    ParseYaml(ParseYaml),
}

#[derive(Args, Debug)]
pub struct Curl {
    /// The full cURL command, line continuations included. Read from stdin if omitted.
    pub command: Option<String>,

    #[arg(long, value_enum, default_value_t = Format::Pretty)]
    pub format: Format,
}

#[derive(Args, Debug)]
pub struct ParseYaml {
    /// Location of the OpenAPI document, yaml or json.
    #[arg(short, long = "file-path", default_value = "./input.yaml")]
    pub file: PathBuf,

    /// Project name, e.g. `OpenAI`. Recipes are written to <RECIPE_DIR>/<PROJECT>_v<VERSION>.
    #[arg(short, long)]
    pub project: String,

    /// Version of the project's API.
    #[arg(short = 'v', long)]
    pub version: String,

    /// Root directory of all recipe projects.
    #[arg(long, default_value = "../recipes")]
    pub recipe_dir: PathBuf,

    /// Path to a [recipekit::openapi::Config] in json format.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Also write api.json, components.json and recipes.json to --output-dir.
    #[arg(short, long)]
    pub debug_artifacts: bool,

    /// Where --debug-artifacts are written.
    #[arg(long, default_value = "./output")]
    pub output_dir: PathBuf,
}

#[derive(ValueEnum, Copy, Clone, Debug, Eq, PartialEq)]
pub enum Format {
    Pretty,
    Compact,
}

impl Format {
    pub fn to_json<T: Serialize>(&self, value: &T) -> Result<String> {
        let json = match self {
            Format::Pretty => serde_json::to_string_pretty(value)?,
            Format::Compact => serde_json::to_string(value)?,
        };
        Ok(json)
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use anyhow::Result;
    use clap::Parser;

    use crate::config::{Command, Config, Format};

    #[test]
    fn parse_yaml_defaults() -> Result<()> {
        let config = Config::try_parse_from(["recipekit", "parse-yaml", "-p", "OpenAI", "-v", "2"])?;
        let Command::ParseYaml(args) = config.command else {
            panic!("expected parse-yaml");
        };
        assert_eq!(args.file, PathBuf::from("./input.yaml"));
        assert_eq!(args.project, "OpenAI");
        assert_eq!(args.version, "2");
        assert_eq!(args.recipe_dir, PathBuf::from("../recipes"));
        assert_eq!(args.config, None);
        assert!(!args.debug_artifacts);
        Ok(())
    }

    #[test]
    fn parse_yaml_requires_project_and_version() {
        assert!(Config::try_parse_from(["recipekit", "parse-yaml", "-p", "OpenAI"]).is_err());
        assert!(Config::try_parse_from(["recipekit", "parse-yaml", "-v", "1"]).is_err());
    }

    #[test]
    fn curl_command_argument() -> Result<()> {
        let config = Config::try_parse_from([
            "recipekit",
            "curl",
            "curl https://x.com -G",
            "--format",
            "compact",
        ])?;
        let Command::Curl(args) = config.command else {
            panic!("expected curl");
        };
        assert_eq!(args.command.as_deref(), Some("curl https://x.com -G"));
        assert_eq!(args.format, Format::Compact);
        Ok(())
    }

    #[test]
    fn format() -> Result<()> {
        let value = serde_json::json!({ "a": 1 });
        assert_eq!(Format::Compact.to_json(&value)?, r#"{"a":1}"#);
        assert_eq!(Format::Pretty.to_json(&value)?, "{\n  \"a\": 1\n}");
        Ok(())
    }
}
