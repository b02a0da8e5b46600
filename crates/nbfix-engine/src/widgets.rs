//! Classification of `metadata.widgets` entries
//!
//! Renderers such as GitHub and nbviewer refuse notebooks whose widget metadata lacks a
//! `state` key. Two shapes render:
//!
//! ```json
//! { "state": { ... }, "version_major": 2 }
//! { "application/vnd.jupyter.widget-state+json": { "state": { ... } } }
//! ```
//!
//! Anything else is malformed and is removed whole.

use serde::Serialize;
use serde_json::Value;

/// Metadata key holding widget state
pub const WIDGETS_KEY: &str = "widgets";

/// Key renderers require inside widget metadata
pub const STATE_KEY: &str = "state";

/// How many mapping levels below `widgets` the `state` key may sit
pub const STATE_SEARCH_DEPTH: usize = 1;

/// Why a `widgets` value was classified as malformed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MalformedShape {
    /// `widgets` is not a mapping at all
    NotAMapping,
    /// `widgets` is an empty mapping
    Empty,
    /// No `state` key directly or in any entry
    MissingState,
    /// Some entries carry `state`, others do not
    PartialState,
}

impl std::fmt::Display for MalformedShape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotAMapping => write!(f, "value is not a mapping"),
            Self::Empty => write!(f, "mapping is empty"),
            Self::MissingState => write!(f, "'state' key is missing"),
            Self::PartialState => write!(f, "'state' key is missing from some entries"),
        }
    }
}

/// Whether `value` holds `key`, either directly or, up to `depth` levels down, in every
/// entry of a non-empty mapping.
#[must_use]
pub fn carries_key(value: &Value, key: &str, depth: usize) -> bool {
    let Value::Object(map) = value else {
        return false;
    };
    if map.contains_key(key) {
        return true;
    }
    depth > 0 && !map.is_empty() && map.values().all(|v| carries_key(v, key, depth - 1))
}

/// Classify a `widgets` value; `None` means it renders.
#[must_use]
pub fn classify(widgets: &Value) -> Option<MalformedShape> {
    let Value::Object(map) = widgets else {
        return Some(MalformedShape::NotAMapping);
    };
    if map.is_empty() {
        return Some(MalformedShape::Empty);
    }
    if carries_key(widgets, STATE_KEY, STATE_SEARCH_DEPTH) {
        return None;
    }

    let nested_depth = STATE_SEARCH_DEPTH.saturating_sub(1);
    if map.values().any(|v| carries_key(v, STATE_KEY, nested_depth)) {
        Some(MalformedShape::PartialState)
    } else {
        Some(MalformedShape::MissingState)
    }
}

#[must_use]
pub fn is_well_formed(widgets: &Value) -> bool {
    classify(widgets).is_none()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_state_at_widgets_root_is_well_formed() {
        let widgets = json!({"state": {}, "version_major": 2, "version_minor": 0});
        assert!(is_well_formed(&widgets));
    }

    #[test]
    fn test_state_in_every_entry_is_well_formed() {
        let widgets = json!({
            "application/vnd.jupyter.widget-state+json": {
                "state": {"a1": {"model_name": "IntSliderModel"}},
                "version_major": 2
            }
        });
        assert!(is_well_formed(&widgets));
        assert!(is_well_formed(&json!({"abc123": {"state": {"x": 1}}})));
    }

    #[test]
    fn test_entries_without_state_are_malformed() {
        assert_eq!(
            classify(&json!({"abc123": {}})),
            Some(MalformedShape::MissingState)
        );
        assert_eq!(
            classify(&json!({"abc123": {"model": 1}, "def456": {"view": 2}})),
            Some(MalformedShape::MissingState)
        );
    }

    #[test]
    fn test_mixed_entries_are_partial() {
        let widgets = json!({"ok": {"state": {}}, "broken": {}});
        assert_eq!(classify(&widgets), Some(MalformedShape::PartialState));
    }

    #[test]
    fn test_scalar_entries_are_missing_state() {
        assert_eq!(
            classify(&json!({"version_major": 2})),
            Some(MalformedShape::MissingState)
        );
    }

    #[test]
    fn test_non_mapping_and_empty() {
        assert_eq!(classify(&json!([])), Some(MalformedShape::NotAMapping));
        assert_eq!(classify(&json!("state")), Some(MalformedShape::NotAMapping));
        assert_eq!(classify(&Value::Null), Some(MalformedShape::NotAMapping));
        assert_eq!(classify(&json!({})), Some(MalformedShape::Empty));
    }

    #[test]
    fn test_state_two_levels_down_is_too_deep() {
        let widgets = json!({"outer": {"inner": {"state": {}}}});
        assert_eq!(classify(&widgets), Some(MalformedShape::MissingState));
    }

    #[test]
    fn test_carries_key_generic() {
        assert!(carries_key(&json!({"k": 1}), "k", 0));
        assert!(!carries_key(&json!({"a": {"k": 1}}), "k", 0));
        assert!(carries_key(&json!({"a": {"k": 1}}), "k", 1));
        assert!(carries_key(&json!({"a": {"b": {"k": 1}}}), "k", 2));
        assert!(!carries_key(&json!({}), "k", 3));
        assert!(!carries_key(&json!([{"k": 1}]), "k", 1));
    }

    fn arb_json() -> impl proptest::strategy::Strategy<Value = Value> {
        use proptest::prelude::*;
        let leaf = prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::Bool),
            any::<i32>().prop_map(|n| json!(n)),
            "[a-z]{0,6}".prop_map(Value::String),
        ];
        leaf.prop_recursive(3, 24, 4, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
                prop::collection::btree_map("[a-z]{1,6}", inner, 0..4)
                    .prop_map(|m| Value::Object(m.into_iter().collect())),
            ]
        })
    }

    proptest::proptest! {
        #[test]
        fn prop_direct_state_is_always_well_formed(state in arb_json(), extra in arb_json()) {
            let widgets = json!({"state": state, "version_major": extra});
            proptest::prop_assert!(is_well_formed(&widgets));
        }

        #[test]
        fn prop_classification_agrees_with_carries_key(value in arb_json()) {
            let expected_ok = carries_key(&value, STATE_KEY, STATE_SEARCH_DEPTH);
            proptest::prop_assert_eq!(is_well_formed(&value), expected_ok);
            if !value.is_object() {
                proptest::prop_assert_eq!(classify(&value), Some(MalformedShape::NotAMapping));
            }
        }
    }
}
