use crate::AppState;
use crate::api::error::AppError;
use crate::models::{ContactMessage, ContactMessageCreate};
use axum::{Json, extract::State};
use validator::Validate;

#[utoipa::path(
    post,
    path = "/api/contact",
    request_body = ContactMessageCreate,
    responses(
        (status = 200, description = "Message recorded", body = ContactMessage),
        (status = 400, description = "Invalid payload")
    )
)]
pub async fn create_contact_message(
    State(state): State<AppState>,
    Json(req): Json<ContactMessageCreate>,
) -> Result<Json<ContactMessage>, AppError> {
    req.validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let message = req.into_message();
    sqlx::query(
        "INSERT INTO contact_messages (id, name, email, subject, message, created_at) \
         VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(&message.id)
    .bind(&message.name)
    .bind(&message.email)
    .bind(&message.subject)
    .bind(&message.message)
    .bind(message.created_at)
    .execute(&state.db)
    .await?;

    Ok(Json(message))
}
