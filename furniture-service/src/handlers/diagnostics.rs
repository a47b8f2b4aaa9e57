use crate::startup::AppState;
use axum::{extract::State, Json};
use serde::Serialize;
use service_core::error::truncate;

const MAX_LISTED_COLLECTIONS: usize = 10;
const MAX_ERROR_LEN: usize = 50;

/// Body of `GET /test`. Failures are described in the fields, never raised.
#[derive(Debug, Serialize)]
pub struct DiagnosticReport {
    pub backend: String,
    pub database: String,
    pub database_url: String,
    pub database_name: String,
    pub connection_status: String,
    pub collections: Vec<String>,
}

fn set_or_not(is_set: bool) -> String {
    let label = if is_set { "✅ Set" } else { "❌ Not Set" };
    label.to_string()
}

#[tracing::instrument(skip(state))]
pub async fn test_database(State(state): State<AppState>) -> Json<DiagnosticReport> {
    let mut report = DiagnosticReport {
        backend: "✅ Running".to_string(),
        database: "❌ Not Available".to_string(),
        database_url: set_or_not(state.config.database.url_is_set()),
        database_name: set_or_not(state.config.database.name_is_set()),
        connection_status: "Not Connected".to_string(),
        collections: Vec::new(),
    };

    if state.store.is_connected() {
        report.database = "✅ Available".to_string();
        report.connection_status = "Connected".to_string();

        match state.store.list_collection_names().await {
            Ok(names) => {
                report.collections = names.into_iter().take(MAX_LISTED_COLLECTIONS).collect();
                report.database = "✅ Connected & Working".to_string();
            }
            Err(e) => {
                tracing::warn!(error = %e, "Diagnostic collection listing failed");
                report.database = format!(
                    "⚠️  Connected but Error: {}",
                    truncate(&e.to_string(), MAX_ERROR_LEN)
                );
            }
        }
    } else {
        report.database = "⚠️  Available but not initialized".to_string();
    }

    Json(report)
}
