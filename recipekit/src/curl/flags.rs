use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use log::{debug, warn};
use serde_json::{Map, Value};

use crate::curl::body;
use crate::curl::CurlError;
use crate::model::{AuthConfig, Method, ParsedRequest, AUTHORIZATION_HEADER};

/// The flags understood by the interpreter. Matching is case-insensitive, so `-x` is `-X`.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
enum Flag {
    Curl,
    Request,
    Get,
    Header,
    Data,
    Form,
    Url,
    DataPlaceholder,
    User,
}

impl Flag {
    fn parse(token: &str) -> Option<Self> {
        let flag = match token.to_lowercase().as_str() {
            "curl" => Flag::Curl,
            "-x" | "--request" => Flag::Request,
            "-g" | "--get" => Flag::Get,
            "-h" | "--header" => Flag::Header,
            "-d" | "--data" => Flag::Data,
            "-f" | "--form" => Flag::Form,
            "--url" | "--location" => Flag::Url,
            "-d-" => Flag::DataPlaceholder,
            "-u" | "--user" => Flag::User,
            _ => return None,
        };
        Some(flag)
    }

    fn takes_argument(&self) -> bool {
        matches!(
            self,
            Flag::Request | Flag::Header | Flag::Data | Flag::Form | Flag::Url | Flag::User
        )
    }
}

/// State carried across the token walk.
#[derive(Debug, Default)]
struct Accumulator {
    request: ParsedRequest,
    /// Set by `-X` and `-G`. A body only implies POST while this is unset.
    explicit_method: bool,
    /// Fields collected from every `-F`, merged into one object body at the end.
    form: Option<Map<String, Value>>,
}

/// Walks the tokens left to right, consuming the token after each flag that takes an argument.
/// Unrecognized tokens become the url if none has been set yet.
pub fn interpret<S: AsRef<str>>(tokens: &[S]) -> Result<ParsedRequest, CurlError> {
    let mut acc = Accumulator::default();
    let mut tokens = tokens.iter().map(<S as AsRef<str>>::as_ref);
    while let Some(token) = tokens.next() {
        match Flag::parse(token) {
            Some(flag) if flag.takes_argument() => {
                let arg = tokens.next().ok_or_else(|| CurlError::MissingArgument {
                    flag: token.to_string(),
                })?;
                acc.apply(flag, arg)?;
            }
            Some(flag) => acc.apply_switch(flag),
            None => acc.positional(token),
        }
    }
    Ok(acc.finish())
}

impl Accumulator {
    fn apply(&mut self, flag: Flag, arg: &str) -> Result<(), CurlError> {
        match flag {
            Flag::Request => match arg.parse() {
                Ok(method) => {
                    self.request.method = method;
                    self.explicit_method = true;
                }
                Err(err) => warn!("Ignoring -X: {}", err),
            },
            Flag::Header => self.header(arg),
            Flag::Data => {
                self.imply_post();
                self.request.body = Some(body::decode(arg));
            }
            Flag::Form => self.form_field(arg),
            Flag::Url => self.request.url = arg.to_string(),
            Flag::User => self.user(arg),
            Flag::Curl | Flag::Get | Flag::DataPlaceholder => self.apply_switch(flag),
        }
        Ok(())
    }

    fn apply_switch(&mut self, flag: Flag) {
        if flag == Flag::Get {
            self.request.method = Method::Get;
            self.explicit_method = true;
        }
    }

    fn positional(&mut self, token: &str) {
        if self.request.url.is_empty() && !token.starts_with('-') {
            self.request.url = token.to_string();
        } else {
            debug!("ignoring token {:?}", token);
        }
    }

    fn imply_post(&mut self) {
        if !self.explicit_method {
            self.request.method = Method::Post;
        }
    }

    /// `Name: value`, split at the first colon. A header without a colon has an empty value.
    fn header(&mut self, arg: &str) {
        let (name, value) = arg.split_once(':').unwrap_or((arg, ""));
        let (name, value) = (name.trim(), value.trim());
        if name == AUTHORIZATION_HEADER {
            self.request.auth_config = Some(AuthConfig::from_authorization(value));
        }
        self.request
            .headers
            .insert(name.to_string(), value.to_string());
    }

    /// `field=value`, split at the first `=`. The value is JSON5 when possible, else a string.
    fn form_field(&mut self, arg: &str) {
        let Some((field, value)) = arg.split_once('=') else {
            debug!("ignoring form field without a value: {:?}", arg);
            return;
        };
        self.form
            .get_or_insert_with(Map::new)
            .insert(field.to_string(), body::decode_form_value(value));
    }

    /// `user:password`. A missing password is treated as empty.
    fn user(&mut self, arg: &str) {
        let (username, password) = arg.split_once(':').unwrap_or((arg, ""));
        let credentials = STANDARD.encode(format!("{}:{}", username, password));
        self.request.auth_config = Some(AuthConfig::basic(credentials));
    }

    fn finish(mut self) -> ParsedRequest {
        // A form always submits with POST, whatever -X said.
        if let Some(form) = self.form {
            self.request.method = Method::Post;
            self.request.body = Some(Value::Object(form));
        }
        self.request
    }
}
