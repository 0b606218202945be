//! `meta_data` helpers for resources that embed metadata in their record
//! (products, orders, customers).

use serde_json::{Value, json};

use crate::store::{ApiResult, Query, StoreClient};

/// Entries of `record.meta_data`, optionally only those with `key`.
pub(super) fn filter_meta(record: &Value, key: Option<&str>) -> Value {
    let entries = record
        .get("meta_data")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();

    match key {
        Some(key) => Value::Array(
            entries
                .into_iter()
                .filter(|entry| entry.get("key").and_then(Value::as_str) == Some(key))
                .collect(),
        ),
        None => Value::Array(entries),
    }
}

/// Set `key` to `value`, updating the first matching entry or appending.
pub(super) fn upsert_meta(entries: &mut Vec<Value>, key: &str, value: Value) {
    let existing = entries
        .iter_mut()
        .find(|entry| entry.get("key").and_then(Value::as_str) == Some(key));

    match existing {
        Some(Value::Object(entry)) => {
            entry.insert("value".to_string(), value);
        }
        _ => entries.push(json!({ "key": key, "value": value })),
    }
}

/// Drop every entry with `key`.
pub(super) fn remove_meta(entries: &mut Vec<Value>, key: &str) {
    entries.retain(|entry| entry.get("key").and_then(Value::as_str) != Some(key));
}

/// GET `path` and return its (filtered) metadata.
pub(super) async fn read_meta(
    client: &StoreClient,
    path: &str,
    key: Option<&str>,
    failure: &str,
) -> ApiResult<Value> {
    let record = client.get(path, &Query::new(), failure).await?;
    Ok(filter_meta(&record, key))
}

/// GET `path`, apply `edit` to its metadata, PUT it back and return the
/// stored metadata.
pub(super) async fn edit_meta(
    client: &StoreClient,
    path: &str,
    get_failure: &str,
    put_failure: &str,
    edit: impl FnOnce(&mut Vec<Value>),
) -> ApiResult<Value> {
    let record = client.get(path, &Query::new(), get_failure).await?;
    let mut entries = match filter_meta(&record, None) {
        Value::Array(entries) => entries,
        _ => Vec::new(),
    };
    edit(&mut entries);

    let updated = client
        .put(path, Some(&json!({ "meta_data": entries })), put_failure)
        .await?;
    Ok(filter_meta(&updated, None))
}
