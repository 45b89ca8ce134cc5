use axum::extract::State;
use axum::Json;
use serde_json::json;

use crate::state::AppState;

pub async fn list_fields(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(json!({
        "form": state.schema.name,
        "description": state.schema.description,
        "fields": state.schema.fields(),
    }))
}
