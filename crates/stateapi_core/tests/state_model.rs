use serde_json::json;
use stateapi_core::{State, StateFields, StateValidationError};
use uuid::Uuid;

fn fields(value: serde_json::Value) -> StateFields {
    value.as_object().cloned().unwrap()
}

#[test]
fn state_new_sets_defaults() {
    let state = State::new("California");

    assert!(!state.id.is_nil());
    assert_eq!(state.name, "California");
    assert_eq!(state.created_at, state.updated_at);
    assert!(state.extra.is_empty());
    assert!(state.validate().is_ok());
}

#[test]
fn from_fields_requires_name() {
    let err = State::from_fields(&fields(json!({"capital": "Sacramento"}))).unwrap_err();
    assert_eq!(err, StateValidationError::MissingName);
    assert_eq!(err.to_string(), "Missing name");
}

#[test]
fn from_fields_rejects_non_string_name() {
    let err = State::from_fields(&fields(json!({"name": null}))).unwrap_err();
    assert_eq!(err, StateValidationError::InvalidName);
}

#[test]
fn apply_fields_skips_ignored_keys_and_bumps_updated_at() {
    let mut state = State::new("California");
    let original_id = state.id;
    let original_created_at = state.created_at;

    state
        .apply_fields(&fields(json!({
            "name": "Texas",
            "id": "ignored",
            "created_at": "ignored",
            "updated_at": "ignored",
            "nickname": "Lone Star"
        })))
        .unwrap();

    assert_eq!(state.name, "Texas");
    assert_eq!(state.id, original_id);
    assert_eq!(state.created_at, original_created_at);
    assert!(state.updated_at >= original_created_at);
    assert_eq!(state.extra["nickname"], "Lone Star");
    assert!(!state.extra.contains_key("updated_at"));
}

#[test]
fn apply_fields_without_name_keeps_name() {
    let mut state = State::new("Maine");

    state
        .apply_fields(&fields(json!({"capital": "Augusta"})))
        .unwrap();

    assert_eq!(state.name, "Maine");
    assert_eq!(state.extra["capital"], "Augusta");
}

#[test]
fn serialization_flattens_extra_fields() {
    let mut state = State::new("Oregon");
    state.id = Uuid::parse_str("11111111-2222-4333-8444-555555555555").unwrap();
    state.extra.insert("capital".to_string(), json!("Salem"));

    let json = serde_json::to_value(&state).unwrap();
    assert_eq!(json["id"], "11111111-2222-4333-8444-555555555555");
    assert_eq!(json["name"], "Oregon");
    assert_eq!(json["capital"], "Salem");
    assert!(json["created_at"].is_string());
    assert!(json["updated_at"].is_string());
    assert!(json.get("extra").is_none());
}

#[test]
fn validate_rejects_nil_id() {
    let mut state = State::new("Nowhere");
    state.id = Uuid::nil();

    assert_eq!(state.validate().unwrap_err(), StateValidationError::NilId);
}

#[test]
fn validate_rejects_updated_before_created() {
    let mut state = State::new("Vermont");
    state.updated_at = state.created_at - chrono::Duration::seconds(1);

    assert!(matches!(
        state.validate().unwrap_err(),
        StateValidationError::UpdatedBeforeCreated { .. }
    ));
}
