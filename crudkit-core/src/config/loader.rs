use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::Path;

use super::value::ConfigValue;
use super::ConfigError;

/// Load a YAML file into the values map. A missing file contributes nothing.
pub(crate) fn load_yaml_file(
    path: &Path,
    values: &mut HashMap<String, ConfigValue>,
) -> Result<(), ConfigError> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(ConfigError::Load(format!("{}: {e}", path.display()))),
    };
    load_yaml_str(&content, values)
        .map_err(|e| ConfigError::Load(format!("{}: {e}", path.display())))
}

/// Parse a YAML string and flatten it into the values map.
pub(crate) fn load_yaml_str(
    content: &str,
    values: &mut HashMap<String, ConfigValue>,
) -> Result<(), ConfigError> {
    let yaml: serde_yaml::Value =
        serde_yaml::from_str(content).map_err(|e| ConfigError::Load(e.to_string()))?;
    flatten_yaml("", &yaml, values);
    Ok(())
}

fn join_key(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{prefix}.{key}")
    }
}

/// Flatten a YAML tree into dot-separated keys.
///
/// Sequences are stored whole under their key and element-wise under
/// `key.0`, `key.1`, ... so that environment variables can address items.
fn flatten_yaml(prefix: &str, value: &serde_yaml::Value, out: &mut HashMap<String, ConfigValue>) {
    match value {
        serde_yaml::Value::Mapping(map) => {
            for (k, v) in map {
                let key = match k {
                    serde_yaml::Value::String(s) => s.clone(),
                    other => ConfigValue::from_yaml(other).to_string(),
                };
                flatten_yaml(&join_key(prefix, &key), v, out);
            }
        }
        serde_yaml::Value::Sequence(seq) if !prefix.is_empty() => {
            out.insert(prefix.to_string(), ConfigValue::from_yaml(value));
            for (i, item) in seq.iter().enumerate() {
                flatten_yaml(&join_key(prefix, &i.to_string()), item, out);
            }
        }
        leaf if !prefix.is_empty() => {
            out.insert(prefix.to_string(), ConfigValue::from_yaml(leaf));
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_maps_become_dotted_keys() {
        let mut values = HashMap::new();
        load_yaml_str("crudkit:\n  list:\n    limit: 25\n", &mut values).unwrap();
        assert!(matches!(values.get("crudkit.list.limit"), Some(ConfigValue::Integer(25))));
    }

    #[test]
    fn sequences_are_indexed() {
        let mut values = HashMap::new();
        load_yaml_str("tables: [users, groups]\n", &mut values).unwrap();
        assert!(matches!(values.get("tables"), Some(ConfigValue::List(items)) if items.len() == 2));
        assert!(matches!(values.get("tables.1"), Some(ConfigValue::String(s)) if s == "groups"));
    }

    #[test]
    fn missing_file_is_ignored() {
        let mut values = HashMap::new();
        load_yaml_file(Path::new("definitely/not/here.yaml"), &mut values).unwrap();
        assert!(values.is_empty());
    }
}
