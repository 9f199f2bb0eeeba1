use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::db::Book;
use crate::AppState;

use super::auth::AuthUser;
use super::error::ApiError;
use super::validation::validate_card_number;

#[derive(Debug, Deserialize)]
pub struct PurchaseRequest {
    pub card_number: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PurchaseResponse {
    pub message: String,
}

/// Simulated charge: the payment clears when the last digit of the
/// card number is even
fn payment_accepted(card_number: &str) -> bool {
    card_number
        .chars()
        .last()
        .and_then(|c| c.to_digit(10))
        .map(|d| d % 2 == 0)
        .unwrap_or(false)
}

pub async fn purchase_book(
    State(state): State<Arc<AppState>>,
    Path(book_id): Path<String>,
    user: AuthUser,
    Json(request): Json<PurchaseRequest>,
) -> Result<Json<PurchaseResponse>, ApiError> {
    // The book must exist before the card is looked at
    let book = sqlx::query_as::<_, Book>("SELECT * FROM books WHERE id = ?")
        .bind(&book_id)
        .fetch_optional(&state.db)
        .await?
        .ok_or_else(|| ApiError::not_found("Book not found"))?;

    let card_number = request.card_number.unwrap_or_default();
    validate_card_number(&card_number)
        .map_err(|e| ApiError::validation_field("card_number", e))?;

    if payment_accepted(&card_number) {
        tracing::info!(
            "User {} purchased book {} ({})",
            user.email,
            book.title,
            book.id
        );
        Ok(Json(PurchaseResponse {
            message: "Payment successful, book purchased".to_string(),
        }))
    } else {
        tracing::info!("Payment declined for user {} on book {}", user.email, book.id);
        Err(ApiError::payment_required("Payment failed"))
    }
}
