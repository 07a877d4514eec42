use std::fmt::{Display, Formatter};
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// HTTP methods a recipe or a parsed cURL command can carry.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    #[default]
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    pub const ALL: [Method; 5] = [
        Method::Get,
        Method::Post,
        Method::Put,
        Method::Patch,
        Method::Delete,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        }
    }
}

impl Display for Method {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, Clone, Eq, PartialEq)]
#[error("'{0}' is not a supported HTTP method")]
pub struct UnknownMethod(pub String);

impl FromStr for Method {
    type Err = UnknownMethod;

    /// Case-insensitive, so both `-X post` and an OpenAPI `post:` key parse.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Method::ALL
            .into_iter()
            .find(|method| method.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownMethod(s.to_string()))
    }
}

/// Authentication inferred from a cURL command. Serializes as `{"type": .., "payload": ..}`.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum AuthConfig {
    Bearer(AuthPayload),
    Basic(AuthPayload),
    Header(AuthPayload),
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct AuthPayload {
    pub name: String,
    pub default: String,
}

pub const AUTHORIZATION_HEADER: &str = "Authorization";
const BASIC_PAYLOAD_NAME: &str = "base64";

impl AuthConfig {
    pub fn bearer(token: impl Into<String>) -> Self {
        Self::Bearer(AuthPayload {
            name: AUTHORIZATION_HEADER.to_string(),
            default: token.into(),
        })
    }

    /// `credentials` is expected to already be base64 encoded.
    pub fn basic(credentials: impl Into<String>) -> Self {
        Self::Basic(AuthPayload {
            name: BASIC_PAYLOAD_NAME.to_string(),
            default: credentials.into(),
        })
    }

    pub fn header(value: impl Into<String>) -> Self {
        Self::Header(AuthPayload {
            name: AUTHORIZATION_HEADER.to_string(),
            default: value.into(),
        })
    }

    /// Infers the scheme from the value of an `Authorization` header. Anything that is neither
    /// `Bearer ` nor `Basic ` prefixed is kept verbatim as a raw header.
    pub fn from_authorization(value: &str) -> Self {
        if let Some(token) = value.strip_prefix("Bearer ") {
            Self::bearer(token)
        } else if let Some(credentials) = value.strip_prefix("Basic ") {
            Self::basic(credentials)
        } else {
            Self::header(value)
        }
    }

    pub fn payload(&self) -> &AuthPayload {
        match self {
            AuthConfig::Bearer(payload) | AuthConfig::Basic(payload) | AuthConfig::Header(payload) => {
                payload
            }
        }
    }
}

/// The structured form of a cURL command.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedRequest {
    pub method: Method,
    pub url: String,
    /// Header name to value, in order of first appearance.
    pub headers: IndexMap<String, String>,
    pub body: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth_config: Option<AuthConfig>,
}
