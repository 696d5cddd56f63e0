use axum::Json;
use serde_json::{Value, json};

#[utoipa::path(
    get,
    path = "/api/",
    responses(
        (status = 200, description = "Service name and version")
    )
)]
pub async fn root() -> Json<Value> {
    Json(json!({
        "message": "ConvertDocs API",
        "version": "1.0"
    }))
}
