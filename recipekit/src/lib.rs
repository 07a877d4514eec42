#![recursion_limit = "256"]

//! Turns external API descriptions into recipes: cURL commands become [ParsedRequest]s and
//! OpenAPI documents become component schema directories plus [RecipeDescriptor]s.

pub use curl::CurlError;
pub use model::{ParsedRequest, RecipeDescriptor};
pub use openapi::{compile, Compilation, CompileError, Compiler};

pub mod curl;
pub mod model;
pub mod openapi;
pub mod output;

#[cfg(test)]
mod test_util;
