//! Turns a cURL command, as copied from API documentation, into a [ParsedRequest].

use log::debug;

use crate::model::ParsedRequest;

pub use error::CurlError;

pub mod body;
mod error;
mod flags;
pub mod tokenizer;

/// Parses a (possibly multi-line) cURL command.
///
/// Malformed bodies never fail the parse, they degrade to a best-effort value (see
/// [body::decode]). Errors are only returned for a flag missing its argument or an `-X` method
/// outside of [crate::model::Method].
pub fn parse(command: &str) -> Result<ParsedRequest, CurlError> {
    let tokens = tokenizer::tokenize(command);
    debug!("curl tokens: {:?}", tokens);
    flags::interpret(&tokens)
}
