use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use chrono::NaiveDateTime;
use serde_json::json;
use warehouse_harness::{
    make_token, FailingClock, FailingSession, FixedClock, StaticCredentials, StaticSession,
};
use warehouse_metadata::{ProviderError, CREDENTIAL_STORAGE_KEY, TIMESTAMP_FORMAT};
use warehouse_widget::{WarehouseBlock, WidgetConfig};

fn label(value: &'static str) -> Arc<dyn warehouse_metadata::LabelProvider> {
    Arc::new(move || Ok::<_, ProviderError>(value.to_string()))
}

fn failing_label() -> Arc<dyn warehouse_metadata::LabelProvider> {
    Arc::new(|| Err::<String, _>(ProviderError::Failed("host callback threw".into())))
}

fn credentials_for(payload: serde_json::Value) -> Arc<StaticCredentials> {
    Arc::new(StaticCredentials::default().with(CREDENTIAL_STORAGE_KEY, make_token(&payload)))
}

#[test]
fn injected_labels_are_used_verbatim() -> Result<(), Box<dyn std::error::Error>> {
    let config = WidgetConfig::default()
        .with_now_label(label("2024-01-01 10:00:00"))
        .with_user_label(label("alice"))
        .with_session(Arc::new(StaticSession::new(Some("Bob"), None)))
        .with_credentials(credentials_for(json!({"full_name": "Carol"})))
        .with_wall_clock(Arc::new(FixedClock::at("1999-09-09 09:09:09")));
    let block = WarehouseBlock::new(&json!({}), config, false);
    assert_eq!(block.data().created_at, "2024-01-01 10:00:00");
    assert_eq!(block.data().created_by, "alice");
    Ok(())
}

#[test]
fn default_clock_produces_padded_timestamp() -> Result<(), Box<dyn std::error::Error>> {
    let block = WarehouseBlock::new(&json!({"sku": "X1"}), WidgetConfig::default(), false);
    let at = &block.data().created_at;
    assert_eq!(at.len(), 19);
    let parsed = NaiveDateTime::parse_from_str(at, TIMESTAMP_FORMAT)?;
    assert_eq!(&parsed.format(TIMESTAMP_FORMAT).to_string(), at);
    Ok(())
}

#[test]
fn failing_now_label_falls_back_to_wall_clock() -> Result<(), Box<dyn std::error::Error>> {
    let config = WidgetConfig::default()
        .with_now_label(failing_label())
        .with_wall_clock(Arc::new(FixedClock::at("2024-02-03 04:05:06")));
    let block = WarehouseBlock::new(&json!({}), config, false);
    assert_eq!(block.data().created_at, "2024-02-03 04:05:06");
    Ok(())
}

#[test]
fn every_time_source_failing_gives_empty() -> Result<(), Box<dyn std::error::Error>> {
    let config = WidgetConfig::default()
        .with_now_label(label("   "))
        .with_wall_clock(Arc::new(FailingClock));
    let block = WarehouseBlock::new(&json!({}), config, false);
    assert_eq!(block.data().created_at, "");
    Ok(())
}

#[test]
fn creator_precedence_walks_the_chain() -> Result<(), Box<dyn std::error::Error>> {
    let creator = |config: WidgetConfig| {
        WarehouseBlock::new(&json!({}), config, false)
            .data()
            .created_by
            .clone()
    };

    // Session display name beats credential.
    let config = WidgetConfig::default()
        .with_user_label(failing_label())
        .with_session(Arc::new(StaticSession::new(Some(" Bob Builder "), Some("bob"))))
        .with_credentials(credentials_for(json!({"full_name": "Carol"})));
    assert_eq!(creator(config), "Bob Builder");

    // Blank display name falls to the username.
    let config = WidgetConfig::default()
        .with_session(Arc::new(StaticSession::new(Some(""), Some("bob"))));
    assert_eq!(creator(config), "bob");

    // No session global: the stored token is decoded.
    let config = WidgetConfig::default()
        .with_user_label(label(""))
        .with_session(Arc::new(FailingSession))
        .with_credentials(credentials_for(json!({"username": "carol"})));
    assert_eq!(creator(config), "carol");

    // Token under another key is not consulted.
    let config = WidgetConfig::default().with_credentials(Arc::new(
        StaticCredentials::default().with("other_token", make_token(&json!({"username": "x"}))),
    ));
    assert_eq!(creator(config), "");

    // Malformed token reads as absent.
    let config = WidgetConfig::default()
        .with_session(Arc::new(StaticSession(None)))
        .with_credentials(Arc::new(
            StaticCredentials::default().with(CREDENTIAL_STORAGE_KEY, "header.%%%.sig"),
        ));
    assert_eq!(creator(config), "");
    Ok(())
}

#[test]
fn populated_provenance_is_never_recomputed() -> Result<(), Box<dyn std::error::Error>> {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let config = WidgetConfig::default()
        .with_now_label(Arc::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok::<_, ProviderError>("2099-01-01 00:00:00".to_string())
        }))
        .with_user_label(label("alice"));
    let block = WarehouseBlock::new(
        &json!({"createdAt": "2023-01-01 00:00:00", "createdBy": "zed"}),
        config,
        false,
    );
    assert_eq!(block.data().created_at, "2023-01-01 00:00:00");
    assert_eq!(block.data().created_by, "zed");
    assert_eq!(calls.load(Ordering::SeqCst), 0);
    Ok(())
}

#[test]
fn empty_persisted_provenance_is_resolved() -> Result<(), Box<dyn std::error::Error>> {
    let config = WidgetConfig::default()
        .with_now_label(label("2024-01-01 10:00:00"))
        .with_user_label(label("alice"));
    let block = WarehouseBlock::new(&json!({"createdAt": "", "createdBy": ""}), config, false);
    assert_eq!(block.data().created_at, "2024-01-01 10:00:00");
    assert_eq!(block.data().created_by, "alice");
    Ok(())
}
