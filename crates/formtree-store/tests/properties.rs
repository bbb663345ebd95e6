use proptest::prelude::*;
use serde_json::{Value, json};

use formtree_store::{PathValue, tree};

fn paths() -> impl Strategy<Value = String> {
    proptest::collection::vec("[a-z]{1,6}", 1..4).prop_map(|segments| segments.join("."))
}

fn leaf_values() -> impl Strategy<Value = Value> {
    prop_oneof![
        "[a-z0-9]{1,8}".prop_map(Value::from),
        any::<i64>().prop_map(Value::from),
        any::<bool>().prop_map(Value::from),
        Just(Value::Null),
    ]
}

fn empty_values() -> impl Strategy<Value = Option<Value>> {
    prop_oneof![
        Just(None),
        Just(Some(json!(""))),
        Just(Some(json!({}))),
        Just(Some(json!([]))),
    ]
}

proptest! {
    #[test]
    fn set_then_get_round_trips(path in paths(), value in leaf_values()) {
        let state = tree::set(json!({}), &path, value.clone()).unwrap();
        prop_assert_eq!(tree::get(&state, &path), Some(&value));
    }

    #[test]
    fn set_survives_an_unrelated_sibling(path in paths(), value in leaf_values()) {
        let seeded = tree::set(json!({}), "zzzsibling", json!("keep")).unwrap();
        let state = tree::set(seeded, &path, value.clone()).unwrap();
        prop_assert_eq!(tree::get(&state, &path), Some(&value));
    }

    #[test]
    fn pruning_removes_the_path_and_is_idempotent(
        path in paths(),
        empty in empty_values(),
    ) {
        let seeded = tree::set(json!({}), &path, json!("occupied")).unwrap();
        let pruned = tree::set(seeded, &path, empty.clone()).unwrap();
        // The path and every ancestor it emptied are gone, the root remains.
        prop_assert_eq!(&pruned, &json!({}));
        prop_assert_eq!(tree::get(&pruned, &path), None);

        let again = tree::set(pruned.clone(), &path, empty).unwrap();
        prop_assert_eq!(again, pruned);
    }

    #[test]
    fn null_is_a_retained_value(path in paths()) {
        let state = tree::set(json!({}), &path, json!(null)).unwrap();
        let stored = tree::get(&state, &path).cloned();
        prop_assert_eq!(stored, Some(json!(null)));
    }

    #[test]
    fn set_paths_is_the_sequential_fold(
        first in paths(),
        first_value in leaf_values(),
        second in paths(),
        second_value in leaf_values(),
    ) {
        let entries = [
            PathValue::new(first.clone(), first_value.clone()),
            PathValue::new(second.clone(), second_value.clone()),
        ];
        let folded = tree::set_paths(json!({}), &entries).unwrap();
        let sequential = tree::set(
            tree::set(json!({}), &first, first_value).unwrap(),
            &second,
            second_value,
        )
        .unwrap();
        prop_assert_eq!(folded, sequential);
    }
}

#[test]
fn nested_write_keeps_siblings() {
    let state = json!({ "item": "a", "level1": { "item": "b" } });
    let state = tree::set(state, "level1.item", json!("c")).unwrap();
    insta::assert_json_snapshot!(state, @r#"
    {
      "item": "a",
      "level1": {
        "item": "c"
      }
    }
    "#);
}

#[test]
fn emptied_branch_is_pruned_from_the_snapshot() {
    let state = json!({ "form": { "field": "value", "other": 1 } });
    let state = tree::set(state, "form.field", json!("")).unwrap();
    insta::assert_json_snapshot!(state, @r#"
    {
      "form": {
        "other": 1
      }
    }
    "#);
}
