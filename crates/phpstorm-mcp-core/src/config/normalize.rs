//! Removal of structurally empty containers.
//!
//! Some MCP clients reject `[]` (and `{}`) in fields such as `headers`, so the
//! whole document is normalized before it is written back.

use serde_json::Value;

/// Drop every empty array or object below `value`.
///
/// Children are normalized before they are tested, so a container that only
/// held empty containers is removed as well. The root is never removed.
pub fn normalize(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(key, child)| (key, normalize(child)))
                .filter(|(_, child)| !is_empty_container(child))
                .collect(),
        ),
        Value::Array(items) => Value::Array(
            items
                .into_iter()
                .map(normalize)
                .filter(|child| !is_empty_container(child))
                .collect(),
        ),
        scalar => scalar,
    }
}

fn is_empty_container(value: &Value) -> bool {
    match value {
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn removes_empty_arrays_everywhere() {
        let input = json!({
            "servers": {
                "http": {"url": "https://example.test", "headers": []},
                "stdio": {"command": "php", "args": []}
            },
            "inputs": []
        });

        let output = normalize(input);

        assert_eq!(
            output,
            json!({
                "servers": {
                    "http": {"url": "https://example.test"},
                    "stdio": {"command": "php"}
                }
            })
        );
    }

    #[test]
    fn keeps_non_empty_arrays_in_order() {
        let input = json!({"args": ["b", "a", "c"], "flags": [false, 0, ""]});
        assert_eq!(normalize(input.clone()), input);
    }

    #[test]
    fn removes_empty_objects() {
        let input = json!({"command": "php", "env": {}});
        assert_eq!(normalize(input), json!({"command": "php"}));
    }

    #[test]
    fn cascades_through_nested_empties() {
        let input = json!({"a": {"b": {"c": []}}, "keep": 1});
        assert_eq!(normalize(input), json!({"keep": 1}));
    }

    #[test]
    fn drops_empty_elements_inside_arrays() {
        let input = json!({"list": [[], "x", {}, ["y"]]});
        assert_eq!(normalize(input), json!({"list": ["x", ["y"]]}));
    }

    #[test]
    fn root_survives_when_empty() {
        assert_eq!(normalize(json!({"a": []})), json!({}));
        assert_eq!(normalize(json!([])), json!([]));
    }

    #[test]
    fn is_idempotent() {
        let input = json!({"a": {"b": []}, "c": [{"d": {}}], "e": "f"});
        let once = normalize(input);
        assert_eq!(normalize(once.clone()), once);
    }

    #[test]
    fn scalars_are_untouched() {
        assert_eq!(normalize(json!(null)), json!(null));
        assert_eq!(normalize(json!("")), json!(""));
        assert_eq!(normalize(json!(0)), json!(0));
    }
}
