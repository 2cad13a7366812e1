//! Property tests for the normalizer.

use proptest::prelude::*;
use serde_json::{Map, Value, json};

use trials_normalize::{Field, FieldSchema, StudiesPath, normalize, normalize_all};

const FLAT_KEYS: [&str; 13] = [
    "nctId",
    "title",
    "url",
    "overallStatus",
    "briefSummary",
    "conditions",
    "interventions",
    "sponsor",
    "phase",
    "startDate",
    "primaryCompletionDate",
    "completionDate",
    "lastUpdatePostDate",
];

fn json_leaf() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(|n| json!(n)),
        "[a-zA-Z0-9 ,+-]{0,12}".prop_map(Value::String),
    ]
}

fn json_value() -> impl Strategy<Value = Value> {
    json_leaf().prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            prop::collection::btree_map("[a-z]{1,6}", inner, 0..4)
                .prop_map(|m| Value::Object(m.into_iter().collect::<Map<_, _>>())),
        ]
    })
}

fn study() -> impl Strategy<Value = Value> {
    prop::collection::vec(prop::option::of(json_value()), FLAT_KEYS.len()).prop_map(|values| {
        let mut map = Map::new();
        for (key, value) in FLAT_KEYS.iter().zip(values) {
            if let Some(value) = value {
                map.insert((*key).to_string(), value);
            }
        }
        Value::Object(map)
    })
}

proptest! {
    #[test]
    fn normalize_is_pure(study in study()) {
        let schema = FieldSchema::flat();
        prop_assert_eq!(normalize(&study, &schema), normalize(&study, &schema));
    }

    #[test]
    fn absent_fields_are_empty(study in study()) {
        let record = normalize(&study, &FieldSchema::flat());
        for (field, key) in Field::ALL.iter().zip(FLAT_KEYS) {
            if study.get(key).is_none() {
                prop_assert_eq!(record.get(*field), "");
            }
        }
    }

    #[test]
    fn string_lists_join_in_order(items in prop::collection::vec("[a-zA-Z0-9+ ]{0,10}", 0..6)) {
        let record = normalize(&json!({"conditions": items.clone()}), &FieldSchema::flat());
        prop_assert_eq!(record.get(Field::Conditions), items.join(", "));
    }

    #[test]
    fn table_length_matches_study_list(studies in prop::collection::vec(study(), 0..6)) {
        let count = studies.len();
        let response = json!({"data": {"studies": studies}});
        let table = normalize_all(&response, &StudiesPath::data(), &FieldSchema::flat());
        prop_assert_eq!(table.len(), count);
    }

    #[test]
    fn arbitrary_responses_never_panic(response in json_value()) {
        let table = normalize_all(&response, &StudiesPath::top_level(), &FieldSchema::protocol_section());
        for record in &table {
            prop_assert_eq!(record.values().len(), Field::COUNT);
        }
    }
}
