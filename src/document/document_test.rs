use serde_json::json;

use super::*;

fn doc(value: Value) -> ObservedConfig {
    match value {
        Value::Object(map) => ObservedConfig::from(map),
        _ => panic!("fixture must be an object"),
    }
}

#[test]
fn set_nested_field_creates_intermediate_maps() {
    let mut config = ObservedConfig::new();
    config
        .set_nested_field("node-role=worker", &["projectConfig", "defaultNodeSelector"])
        .unwrap();

    assert_eq!(
        config,
        doc(json!({"projectConfig": {"defaultNodeSelector": "node-role=worker"}}))
    );
}

#[test]
fn set_nested_field_keeps_sibling_fields() {
    let mut config = doc(json!({"projectConfig": {"projectRequestMessage": "hi"}}));
    config
        .set_nested_field("a=b", &["projectConfig", "defaultNodeSelector"])
        .unwrap();

    assert_eq!(config.nested_string(&["projectConfig", "projectRequestMessage"]), Some("hi"));
    assert_eq!(config.nested_string(&["projectConfig", "defaultNodeSelector"]), Some("a=b"));
}

#[test]
fn set_nested_field_rejects_scalar_intermediate() {
    let mut config = doc(json!({"storageConfig": "flat"}));
    let err = config
        .set_nested_field("x", &["storageConfig", "urls"])
        .unwrap_err();

    match err {
        Error::Document { path, .. } => assert_eq!(path, "storageConfig"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn set_nested_field_rejects_empty_path() {
    let mut config = ObservedConfig::new();
    assert!(config.set_nested_field("x", &[]).is_err());
    assert!(config.is_empty());
}

#[test]
fn set_nested_string_slice_preserves_order() {
    let mut config = ObservedConfig::new();
    let urls = vec!["https://b:2379".to_string(), "https://a:2379".to_string()];
    config.set_nested_string_slice(&urls, &["storageConfig", "urls"]).unwrap();

    assert_eq!(config.nested_string_slice(&["storageConfig", "urls"]), Some(urls));
}

#[test]
fn nested_field_returns_none_through_non_map() {
    let config = doc(json!({"a": ["b"]}));
    assert!(config.nested_field(&["a", "b"]).is_none());
    assert!(config.nested_field(&["missing"]).is_none());
}

#[test]
fn from_raw_treats_empty_and_null_as_empty_document() {
    assert!(ObservedConfig::from_raw(b"").unwrap().is_empty());
    assert!(ObservedConfig::from_raw(b"  \n").unwrap().is_empty());
    assert!(ObservedConfig::from_raw(b"null").unwrap().is_empty());
}

#[test]
fn from_raw_rejects_malformed_bytes() {
    let err = ObservedConfig::from_raw(b"{not json").unwrap_err();
    assert!(matches!(err, Error::Decode(_)));
}

#[test]
fn from_raw_rejects_non_object_json() {
    let err = ObservedConfig::from_raw(b"[1, 2]").unwrap_err();
    assert!(matches!(err, Error::Decode(_)));
}

#[test]
fn raw_encoding_survives_decode() {
    let config = doc(json!({"imagePolicyConfig": {"internalRegistryHostname": "registry:5000"}}));
    let raw = config.to_raw().unwrap();

    assert_eq!(ObservedConfig::from_raw(&raw).unwrap(), config);
}

#[test]
fn encode_failure_is_labelled_apart_from_decode() {
    let err = Error::Encode(<serde_json::Error as serde::ser::Error>::custom("unsupported value"));
    assert_eq!(err.kind(), "encode");
    assert!(!matches!(err, Error::Decode(_)));
}

#[test]
fn equality_ignores_key_order_but_not_sequence_order() {
    let a = ObservedConfig::from_raw(br#"{"x": {"p": "1", "q": "2"}, "y": ["a", "b"]}"#).unwrap();
    let b = ObservedConfig::from_raw(br#"{"y": ["a", "b"], "x": {"q": "2", "p": "1"}}"#).unwrap();
    let c = ObservedConfig::from_raw(br#"{"y": ["b", "a"], "x": {"q": "2", "p": "1"}}"#).unwrap();

    assert_eq!(a, b);
    assert_ne!(a, c);
}

#[test]
fn equality_detects_extra_nested_keys() {
    let a = doc(json!({"x": {"p": "1"}}));
    let b = doc(json!({"x": {"p": "1", "q": "2"}}));
    assert_ne!(a, b);
}

#[test]
fn diff_reports_changed_added_and_removed_paths() {
    let before = doc(json!({
        "projectConfig": {"defaultNodeSelector": "a=b"},
        "storageConfig": {"urls": ["https://etcd-0:2379"]},
        "imagePolicyConfig": {"internalRegistryHostname": "old"}
    }));
    let after = doc(json!({
        "projectConfig": {"defaultNodeSelector": "a=b"},
        "storageConfig": {"urls": ["https://etcd-0:2379", "https://etcd-1:2379"]},
        "kubeletClientInfo": {"port": "10250"}
    }));

    assert_eq!(
        before.diff(&after),
        vec![
            "imagePolicyConfig".to_string(),
            "kubeletClientInfo".to_string(),
            "storageConfig.urls".to_string(),
        ]
    );
    assert!(after.diff(&after).is_empty());
}
