use serde_json::Value;

pub const REF_KEY: &str = "$ref";

/// The component name a reference points at, i.e. its last path segment:
/// `#/components/schemas/Pet` is `Pet`.
pub fn ref_name(reference: &str) -> &str {
    reference.rsplit('/').next().unwrap_or(reference)
}

/// If `schema` is a reference, the name of the component it points at. Any sibling keys of
/// `$ref` are ignored.
pub fn pure_ref(schema: &Value) -> Option<&str> {
    schema.get(REF_KEY).and_then(Value::as_str).map(ref_name)
}

/// Every component name referenced anywhere inside `schema`, in the order they appear.
/// Duplicates are kept.
pub fn ref_dependencies(schema: &Value) -> Vec<String> {
    let mut names = vec![];
    collect_refs(schema, &mut names);
    names
}

fn collect_refs(value: &Value, names: &mut Vec<String>) {
    match value {
        Value::Object(object) => {
            for (key, value) in object {
                match value {
                    Value::String(reference) if key == REF_KEY => {
                        names.push(ref_name(reference).to_string())
                    }
                    _ => collect_refs(value, names),
                }
            }
        }
        Value::Array(values) => values.iter().for_each(|value| collect_refs(value, names)),
        _ => {}
    }
}
