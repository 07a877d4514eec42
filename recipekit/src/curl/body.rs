use std::borrow::Cow;

use lazy_static::lazy_static;
use log::warn;
use regex::Regex;
use serde_json::{Map, Value};

lazy_static! {
    /// `"key": bare_word` where the bare word is not quoted, an object, an array or a number
    /// list. Whether the match is followed by `,`, `\n` or `}` is checked by [repair].
    static ref BARE_VALUE: Regex = Regex::new(r#""([^"]+)":\s*([^"{}\[\],\s]+)"#).unwrap();
}

/// Decodes the argument of `-d`/`--data` leniently. This never fails:
/// 1. JSON5 decode.
/// 2. On failure, [repair] the text and decode again.
/// 3. If that fails as well, fall back to [placeholder].
pub fn decode(raw: &str) -> Value {
    match json5::from_str::<Value>(raw) {
        Ok(value) => value,
        Err(err) => {
            warn!("unable to parse body {:?}: {}", raw, err);
            let repaired = repair(raw);
            match json5::from_str::<Value>(&repaired) {
                Ok(value) => value,
                Err(err) => {
                    warn!("unable to parse repaired body: {}", err);
                    placeholder(raw)
                }
            }
        }
    }
}

/// Decodes a single form value, keeping the raw text as a string when it is not JSON5.
pub fn decode_form_value(raw: &str) -> Value {
    json5::from_str::<Value>(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

/// `{ <raw>: null }`, used when a body cannot be decoded at all (e.g. `-d @request.json`).
pub fn placeholder(raw: &str) -> Value {
    let mut map = Map::new();
    map.insert(raw.to_string(), Value::Null);
    Value::Object(map)
}

/// Quotes bare-word object values, which API docs commonly use to describe a value's type:
/// `"client_id": String,` becomes `"client_id": "String",`.
///
/// Only values directly followed by `,`, a newline or `}` are touched. Nothing else about the
/// text is fixed.
pub fn repair(raw: &str) -> Cow<'_, str> {
    let mut repaired = String::new();
    let mut copied_to = 0;
    let mut search_from = 0;
    while let Some(captures) = BARE_VALUE.captures_at(raw, search_from) {
        let (Some(whole), Some(key), Some(value)) =
            (captures.get(0), captures.get(1), captures.get(2))
        else {
            break;
        };
        if !raw[whole.end()..].starts_with([',', '\n', '}']) {
            // Retry from the next character, as a backtracking lookahead would.
            search_from = next_char_boundary(raw, whole.start());
            continue;
        }
        repaired.push_str(&raw[copied_to..whole.start()]);
        repaired.push_str(&format!("\"{}\": \"{}\"", key.as_str(), value.as_str()));
        copied_to = whole.end();
        search_from = whole.end();
    }
    if copied_to == 0 {
        return Cow::Borrowed(raw);
    }
    repaired.push_str(&raw[copied_to..]);
    Cow::Owned(repaired)
}

fn next_char_boundary(s: &str, index: usize) -> usize {
    s[index..]
        .chars()
        .next()
        .map(|c| index + c.len_utf8())
        .unwrap_or(s.len())
}
