//! Immutable get/set/merge/set-many over a path-addressed tree.
//!
//! All write operations consume the tree and return a new one; only the
//! spine of the mutated path is rewritten, siblings are moved as-is. After
//! every write a pruning walk runs from the mutated node upward: a node
//! holding an empty value is deleted, and a parent left empty by that
//! deletion is deleted too, repeated up to (but never past) the root.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Result, StoreError};
use crate::path::{SEPARATOR, join, parent};
use crate::value::is_empty_value;

/// One entry of a multi-path write. A `None` value is the absent value:
/// writing it deletes the node at `path`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathValue {
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

impl PathValue {
    pub fn new(path: impl Into<String>, value: impl Into<Option<Value>>) -> Self {
        Self {
            path: path.into(),
            value: value.into(),
        }
    }
}

/// Value at `path`, the whole tree for the empty path, `None` when the path
/// does not resolve. Never fails.
pub fn get<'a>(state: &'a Value, path: &str) -> Option<&'a Value> {
    if path.is_empty() {
        return Some(state);
    }
    let mut node = state;
    for segment in path.split(SEPARATOR) {
        node = match node {
            Value::Object(map) => map.get(segment)?,
            Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    Some(node)
}

/// New tree with `path` set to `value`; `None` deletes the node. An empty
/// `path` is rejected: unlike `get`, a write requires a concrete target.
pub fn set(state: Value, path: &str, value: impl Into<Option<Value>>) -> Result<Value> {
    if path.is_empty() {
        return Err(StoreError::InvalidPath);
    }
    Ok(set_unchecked(state, path, value.into()))
}

/// `set` for callers that have already rejected the empty path.
pub(crate) fn set_unchecked(mut state: Value, path: &str, value: Option<Value>) -> Value {
    write(&mut state, path, value);
    prune_empty_parents(state, path)
}

/// Shallow-merge `value` into the node at `path` (the root when `path` is
/// empty): mapping into mapping merges keys with the incoming side winning,
/// array into array concatenates, anything else replaces. The pruning walk
/// then runs from `path` - including after a root merge.
pub fn merge(mut state: Value, path: &str, value: Value) -> Value {
    if path.is_empty() {
        state = shallow_merge(state, value);
    } else {
        let target = get(&state, path).cloned().unwrap_or(Value::Null);
        write(&mut state, path, Some(shallow_merge(target, value)));
    }
    prune_empty_parents(state, path)
}

/// Apply `set` for each entry, left to right, each building on the previous
/// result. A sequential fold: later entries can overwrite earlier ones.
pub fn set_paths(state: Value, paths: &[PathValue]) -> Result<Value> {
    paths.iter().try_fold(state, |state, entry| {
        set(state, &entry.path, entry.value.clone())
    })
}

/// Depth-first search over mapping nodes collecting every occurrence of
/// `key` with its fully qualified path. Matches are not descended into, and
/// the walk never enters arrays or scalars. Order follows the key order of
/// each nesting level. Pass an empty `base_path` to report paths relative to
/// `state`.
pub fn find_prop_children(state: &Value, key: &str, base_path: &str) -> Vec<(String, Value)> {
    let mut found = Vec::new();
    collect_prop_children(state, key, base_path, &mut found);
    found
}

fn collect_prop_children(
    state: &Value,
    key: &str,
    base_path: &str,
    found: &mut Vec<(String, Value)>,
) {
    let Value::Object(map) = state else { return };
    for (child_key, child_value) in map {
        let child_path = join(base_path, child_key);
        if child_key == key {
            found.push((child_path, child_value.clone()));
        } else if child_value.is_object() {
            collect_prop_children(child_value, key, &child_path, found);
        }
    }
}

/// Structural write of `value` at `path`. Missing intermediates become
/// mappings; a scalar or mismatched intermediate is replaced by a mapping.
/// Numeric segments address into array nodes, padding with `null` when the
/// index is past the end and removing the element on deletion.
fn write(state: &mut Value, path: &str, value: Option<Value>) {
    let (head, rest) = match path.split_once(SEPARATOR) {
        Some((head, rest)) => (head, Some(rest)),
        None => (path, None),
    };

    if let Value::Array(items) = state
        && let Ok(index) = head.parse::<usize>()
    {
        match rest {
            None => match value {
                Some(value) => {
                    if index >= items.len() {
                        items.resize(index + 1, Value::Null);
                    }
                    items[index] = value;
                }
                None => {
                    if index < items.len() {
                        items.remove(index);
                    }
                }
            },
            Some(rest) => {
                if index >= items.len() {
                    items.resize(index + 1, Value::Null);
                }
                write(&mut items[index], rest, value);
            }
        }
        return;
    }

    if !state.is_object() {
        *state = Value::Object(Map::new());
    }
    if let Value::Object(map) = state {
        match rest {
            None => match value {
                Some(value) => {
                    map.insert(head.to_string(), value);
                }
                None => {
                    map.shift_remove(head);
                }
            },
            Some(rest) => {
                let child = map.entry(head).or_insert(Value::Null);
                write(child, rest, value);
            }
        }
    }
}

/// Walk from `path` toward the root, deleting the node when its value is
/// empty (or no longer resolves) and repeating on the parent until a
/// non-empty ancestor or the root is reached. The root itself is never
/// deleted.
fn prune_empty_parents(mut state: Value, path: &str) -> Value {
    let mut path = path;
    loop {
        let empty = match get(&state, path) {
            Some(value) => is_empty_value(value),
            None => true,
        };
        if !empty || path.is_empty() {
            return state;
        }
        tracing::trace!(path, "pruning empty node");
        write(&mut state, path, None);
        path = parent(path);
    }
}

fn shallow_merge(target: Value, incoming: Value) -> Value {
    match (target, incoming) {
        (Value::Object(mut base), Value::Object(overlay)) => {
            for (key, value) in overlay {
                base.insert(key, value);
            }
            Value::Object(base)
        }
        (Value::Array(mut base), Value::Array(overlay)) => {
            base.extend(overlay);
            Value::Array(base)
        }
        (_, incoming) => incoming,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn state() -> Value {
        json!({
            "item": "item0",
            "level1": {
                "item": "item1",
                "level2": {
                    "item": "item2"
                }
            }
        })
    }

    #[test]
    fn get_resolves_root_and_nested_paths() {
        let state = state();
        assert_eq!(get(&state, ""), Some(&state));
        assert_eq!(get(&state, "item"), Some(&json!("item0")));
        assert_eq!(get(&state, "level1.item"), Some(&json!("item1")));
        assert_eq!(get(&state, "level1.level2.item"), Some(&json!("item2")));
        assert_eq!(get(&state, "unknown"), None);
        assert_eq!(get(&state, "item.deeper"), None);
    }

    #[test]
    fn get_indexes_into_arrays() {
        let state = json!({ "items": ["a", { "name": "b" }] });
        assert_eq!(get(&state, "items.0"), Some(&json!("a")));
        assert_eq!(get(&state, "items.1.name"), Some(&json!("b")));
        assert_eq!(get(&state, "items.2"), None);
        assert_eq!(get(&state, "items.x"), None);
    }

    #[test]
    fn set_replaces_values_at_each_level() {
        for path in ["item", "level1.item", "level1.level2.item"] {
            let next = set(state(), path, json!("set")).unwrap();
            assert_eq!(get(&next, path), Some(&json!("set")));
        }
        // Siblings off the written path are untouched.
        let next = set(state(), "level1.item", json!("c")).unwrap();
        assert_eq!(
            next,
            json!({
                "item": "item0",
                "level1": { "item": "c", "level2": { "item": "item2" } }
            })
        );
    }

    #[test]
    fn set_creates_missing_intermediates() {
        let next = set(state(), "level1.level2.new.deep", json!("set")).unwrap();
        assert_eq!(get(&next, "level1.level2.new.deep"), Some(&json!("set")));
        let next = set(json!({}), "a.b.c", json!(1)).unwrap();
        assert_eq!(next, json!({ "a": { "b": { "c": 1 } } }));
    }

    #[test]
    fn set_rejects_the_empty_path() {
        assert_eq!(
            set(state(), "", json!({})).unwrap_err(),
            StoreError::InvalidPath
        );
    }

    #[test]
    fn set_empty_value_prunes_node_and_parents() {
        assert_eq!(set(json!({ "item": "value" }), "item", None).unwrap(), json!({}));
        assert_eq!(
            set(json!({ "item": "value" }), "item", json!("")).unwrap(),
            json!({})
        );
        assert_eq!(
            set(json!({ "item": "value" }), "item", json!({})).unwrap(),
            json!({})
        );
        assert_eq!(
            set(json!({ "item": "value" }), "item", json!([])).unwrap(),
            json!({})
        );
        assert_eq!(
            set(json!({ "item": { "item": "value" } }), "item.item", json!("")).unwrap(),
            json!({})
        );
    }

    #[test]
    fn set_prunes_up_to_the_first_non_empty_ancestor() {
        let state = json!({ "keep": 1, "a": { "b": { "c": "x" } } });
        let next = set(state, "a.b.c", json!("")).unwrap();
        assert_eq!(next, json!({ "keep": 1 }));
    }

    #[test]
    fn deleting_the_only_array_element_prunes_the_array() {
        let next = set(json!({ "item": ["test"] }), "item.0", None).unwrap();
        assert_eq!(next, json!({}));
    }

    #[test]
    fn null_is_retained_not_pruned() {
        let next = set(json!({}), "a.b", json!(null)).unwrap();
        assert_eq!(next, json!({ "a": { "b": null } }));
        assert_eq!(get(&next, "a.b"), Some(&json!(null)));
    }

    #[test]
    fn merge_at_root_and_at_depth() {
        let merged = merge(state(), "", json!({ "item": "merge", "merge": "merge" }));
        assert_eq!(get(&merged, "item"), Some(&json!("merge")));
        assert_eq!(get(&merged, "merge"), Some(&json!("merge")));
        assert_eq!(get(&merged, "level1.item"), Some(&json!("item1")));

        let merged = merge(state(), "level1", json!({ "item": "merge", "merge": "merge" }));
        assert_eq!(get(&merged, "level1.item"), Some(&json!("merge")));
        assert_eq!(get(&merged, "level1.merge"), Some(&json!("merge")));
        assert_eq!(get(&merged, "level1.level2.item"), Some(&json!("item2")));

        let merged = merge(
            state(),
            "level1.level2",
            json!({ "item": "merge", "merge": "merge" }),
        );
        assert_eq!(get(&merged, "level1.level2.item"), Some(&json!("merge")));
        assert_eq!(get(&merged, "level1.level2.merge"), Some(&json!("merge")));
    }

    #[test]
    fn merge_concatenates_arrays_and_replaces_scalars() {
        let merged = merge(json!({ "list": [1, 2] }), "list", json!([3]));
        assert_eq!(merged, json!({ "list": [1, 2, 3] }));

        let merged = merge(json!({ "scalar": 1 }), "scalar", json!({ "a": 1 }));
        assert_eq!(merged, json!({ "scalar": { "a": 1 } }));
    }

    #[test]
    fn merge_of_an_empty_mapping_prunes_an_empty_target() {
        let merged = merge(json!({ "a": { "b": {} } }), "a.b", json!({}));
        assert_eq!(merged, json!({}));
    }

    #[test]
    fn set_paths_is_a_sequential_fold() {
        let entries = vec![
            PathValue::new("item", json!("set")),
            PathValue::new("level1.item", json!("set")),
            PathValue::new("level1.level2.item", json!("set")),
        ];
        let folded = set_paths(state(), &entries).unwrap();
        let manual = set(
            set(set(state(), "item", json!("set")).unwrap(), "level1.item", json!("set")).unwrap(),
            "level1.level2.item",
            json!("set"),
        )
        .unwrap();
        assert_eq!(folded, manual);

        // Later entries observe (and may undo) earlier ones.
        let entries = vec![
            PathValue::new("a", json!("first")),
            PathValue::new("a", json!("")),
        ];
        assert_eq!(set_paths(json!({}), &entries).unwrap(), json!({}));
    }

    #[test]
    fn find_prop_children_reports_insertion_order() {
        let state = json!({
            "this": "this",
            "level1": { "this": "this", "level2": { "this": "this" } }
        });
        let found = find_prop_children(&state, "this", "");
        assert_eq!(
            found,
            vec![
                ("this".to_string(), json!("this")),
                ("level1.this".to_string(), json!("this")),
                ("level1.level2.this".to_string(), json!("this")),
            ]
        );
    }

    #[test]
    fn find_prop_children_skips_arrays_and_prefixes_the_base() {
        let state = json!({ "list": [{ "key": 1 }], "nested": { "key": 2 } });
        let found = find_prop_children(&state, "key", "base");
        assert_eq!(found, vec![("base.nested.key".to_string(), json!(2))]);
    }
}
