use std::sync::Arc;

use crate::{AppError, AppState, Result};

/// List every object key in the configured backup bucket.
///
/// One unpaginated `ListObjectsV2` call, matching the expected bucket scale.
/// Keys are sorted before returning so that aggregation ties on equal
/// timestamps always resolve to the lexicographically first key.
pub async fn list_backup_keys(state: &Arc<AppState>) -> Result<Vec<String>> {
    let response = state
        .s3_client
        .list_objects_v2()
        .bucket(&state.config.s3_bucket)
        .send()
        .await
        .map_err(|e| AppError::Storage(format!("Failed to list bucket: {}", e)))?;

    let mut keys: Vec<String> = response
        .contents()
        .iter()
        .filter_map(|object| object.key().map(String::from))
        .collect();
    keys.sort();

    Ok(keys)
}
