use std::sync::Arc;

use axum::{
    extract::State,
    response::{Html, IntoResponse, Response},
};
use chrono::Utc;

use crate::{freshness, keys, storage, AppState, Result};

/// Render the dashboard: list the bucket, parse every key, keep the newest
/// valid backup per allow-listed application. No caching; each request
/// recomputes from a full listing.
pub async fn index(State(state): State<Arc<AppState>>) -> Result<Response> {
    let raw_keys = storage::list_backup_keys(&state).await?;
    let now = Utc::now().naive_utc();

    let records = raw_keys.iter().map(|key| keys::parse_key(key));
    let latest_backups = freshness::aggregate(records, &state.allowed_apps, now);

    let mut context = tera::Context::new();
    context.insert("latest_backups", &latest_backups);

    let html = state.templates.render("dashboard.html", &context)?;
    Ok(Html(html).into_response())
}
