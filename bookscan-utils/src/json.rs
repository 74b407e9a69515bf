use serde::{Deserialize, Serialize};
use serde_json::{to_string, to_value, Map, Value};

pub fn dejsonify<'a, T>(json_str: &'a str) -> serde_json::Result<T>
where
    T: Deserialize<'a>,
{
    serde_json::from_str::<T>(json_str)
}

/// Serializes `obj` with object keys sorted at every level, so equal values
/// always produce the same string.
pub fn jsonify<T>(obj: &T) -> String
where
    T: Serialize,
{
    to_string(&jsonify_internal(
        &to_value(obj).expect("to_value failed on serializable object"),
    ))
    .expect("to_string failed on serializable object")
}

fn jsonify_internal(json_value: &Value) -> Value {
    match json_value {
        Value::Object(obj) => {
            let mut sorted_map = Map::new();
            let mut keys: Vec<&String> = obj.keys().collect();
            keys.sort();
            for key in keys {
                if let Some(value) = obj.get(key) {
                    sorted_map.insert(key.clone(), jsonify_internal(value));
                }
            }
            Value::Object(sorted_map)
        }
        Value::Array(items) => Value::Array(items.iter().map(jsonify_internal).collect()),
        _ => json_value.clone(),
    }
}

/// Accepts either an inline JSON object or a path to a `.json` file holding
/// one. Used for algorithm hyperparameters.
pub fn load_json_object(arg: &str) -> anyhow::Result<Map<String, Value>> {
    let text = if arg.ends_with(".json") {
        std::fs::read_to_string(arg)
            .map_err(|e| anyhow::anyhow!("Failed to read json file {}: {}", arg, e))?
    } else {
        arg.to_string()
    };
    match dejsonify::<Value>(&text)? {
        Value::Object(map) => Ok(map),
        other => Err(anyhow::anyhow!("Expected a json object, got {}", other)),
    }
}
