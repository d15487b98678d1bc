//! YAML helpers.
//!
//! Commit messages are multi-line, so output goes through the
//! `yaml-rust-davvid` emitter which writes them as literal block scalars
//! instead of escaped one-line strings.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use yaml_rust_davvid::yaml::Hash;
use yaml_rust_davvid::{Yaml, YamlEmitter};

/// Serializes `data` to YAML, with multi-line strings as block scalars.
pub fn to_yaml<T: Serialize>(data: &T) -> Result<String> {
    let value = serde_yaml::to_value(data).context("Failed to serialize to serde value")?;
    let document = to_emitter_value(&value);

    let mut output = String::new();
    let mut emitter = YamlEmitter::new(&mut output);
    emitter.multiline_strings(true);
    emitter.dump(&document).context("Failed to emit YAML")?;

    output.push('\n');
    Ok(output)
}

fn to_emitter_value(value: &serde_yaml::Value) -> Yaml {
    use serde_yaml::Value;

    match value {
        Value::Null => Yaml::Null,
        Value::Bool(b) => Yaml::Boolean(*b),
        Value::Number(n) => n.as_i64().map_or_else(|| Yaml::Real(n.to_string()), Yaml::Integer),
        Value::String(s) => Yaml::String(s.clone()),
        Value::Sequence(items) => Yaml::Array(items.iter().map(to_emitter_value).collect()),
        Value::Mapping(map) => {
            let mut hash = Hash::new();
            for (k, v) in map {
                hash.insert(to_emitter_value(k), to_emitter_value(v));
            }
            Yaml::Hash(hash)
        }
        Value::Tagged(tagged) => to_emitter_value(&tagged.value),
    }
}

/// Deserializes a YAML string.
pub fn from_yaml<T: for<'de> Deserialize<'de>>(yaml: &str) -> Result<T> {
    serde_yaml::from_str(yaml).context("Failed to deserialize YAML")
}
