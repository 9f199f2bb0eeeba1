use axum::{
    extract::{multipart::Field, FromRequest, Multipart, Path, Request, State},
    http::{header::CONTENT_TYPE, StatusCode},
    Json,
};
use bytes::Bytes;
use std::sync::Arc;
use uuid::Uuid;

use crate::db::{Book, BookPayload, BookResponse, Role};
use crate::storage::StorageError;
use crate::AppState;

use super::auth::{authorize, AuthUser};
use super::error::{ApiError, ValidationErrorBuilder};
use super::validation::{validate_description, validate_photo, validate_price, validate_title};

/// A photo supplied as a binary upload instead of a string reference
struct PhotoUpload {
    file_name: Option<String>,
    content_type: Option<String>,
    data: Bytes,
}

/// Decode a create/update body from either JSON or multipart form data.
///
/// In a multipart body the photo part may carry a file (stored on disk)
/// or plain text (kept as a string reference like the JSON variant).
async fn extract_book_payload(req: Request) -> Result<(BookPayload, Option<PhotoUpload>), ApiError> {
    let content_type = req
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();

    if content_type.starts_with("multipart/form-data") {
        let mut multipart = Multipart::from_request(req, &())
            .await
            .map_err(|e| ApiError::bad_request(e.to_string()))?;

        let mut payload = BookPayload::default();
        let mut upload = None;

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| ApiError::bad_request(e.to_string()))?
        {
            let name = field.name().unwrap_or_default().to_string();
            match name.as_str() {
                "title" => payload.title = Some(read_text(field).await?),
                "description" => payload.description = Some(read_text(field).await?),
                "price" => {
                    let raw = read_text(field).await?;
                    let price = raw.trim().parse::<f64>().map_err(|_| {
                        ApiError::validation_field("price", "Price must be a valid number")
                    })?;
                    payload.price = Some(price);
                }
                "photo" => {
                    if field.file_name().is_some() {
                        let file_name = field.file_name().map(str::to_string);
                        let file_type = field.content_type().map(str::to_string);
                        let data = field
                            .bytes()
                            .await
                            .map_err(|e| ApiError::bad_request(e.to_string()))?;
                        upload = Some(PhotoUpload {
                            file_name,
                            content_type: file_type,
                            data,
                        });
                    } else {
                        payload.photo = Some(read_text(field).await?);
                    }
                }
                _ => {}
            }
        }

        Ok((payload, upload))
    } else {
        let Json(payload) = Json::<BookPayload>::from_request(req, &())
            .await
            .map_err(|e| ApiError::validation_field("body", e.to_string()))?;
        Ok((payload, None))
    }
}

async fn read_text(field: Field<'_>) -> Result<String, ApiError> {
    field
        .text()
        .await
        .map_err(|e| ApiError::bad_request(e.to_string()))
}

/// Validate a create payload (all fields required)
fn validate_create_payload(payload: &BookPayload, has_upload: bool) -> Result<(), ApiError> {
    let mut errors = ValidationErrorBuilder::new();

    if let Err(e) = validate_title(payload.title.as_deref().unwrap_or_default()) {
        errors.add("title", &e);
    }

    // The photo is either an uploaded file or a string reference
    if !has_upload {
        if let Err(e) = validate_photo(payload.photo.as_deref().unwrap_or_default()) {
            errors.add("photo", &e);
        }
    }

    match payload.price {
        None => {
            errors.add("price", "Price is required");
        }
        Some(price) => {
            if let Err(e) = validate_price(price) {
                errors.add("price", &e);
            }
        }
    }

    if let Err(e) = validate_description(payload.description.as_deref().unwrap_or_default()) {
        errors.add("description", &e);
    }

    errors.finish()
}

/// Validate an update payload (only validates provided fields)
fn validate_update_payload(payload: &BookPayload) -> Result<(), ApiError> {
    let mut errors = ValidationErrorBuilder::new();

    if let Some(ref title) = payload.title {
        if let Err(e) = validate_title(title) {
            errors.add("title", &e);
        }
    }

    if let Some(ref photo) = payload.photo {
        if let Err(e) = validate_photo(photo) {
            errors.add("photo", &e);
        }
    }

    if let Some(price) = payload.price {
        if let Err(e) = validate_price(price) {
            errors.add("price", &e);
        }
    }

    if let Some(ref description) = payload.description {
        if let Err(e) = validate_description(description) {
            errors.add("description", &e);
        }
    }

    errors.finish()
}

/// Write an uploaded photo to the store, mapping rejections to
/// field-level validation errors
async fn store_upload(state: &AppState, upload: PhotoUpload) -> Result<String, ApiError> {
    state
        .photos
        .save(
            upload.file_name.as_deref(),
            upload.content_type.as_deref(),
            upload.data,
        )
        .await
        .map_err(|e| match e {
            StorageError::TooLarge(_) | StorageError::UnsupportedType(_) => {
                ApiError::validation_field("photo", e.to_string())
            }
            StorageError::Io(_) => {
                tracing::error!("Failed to store photo upload: {}", e);
                ApiError::internal("Failed to store photo")
            }
        })
}

pub async fn list_books(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
) -> Result<Json<Vec<BookResponse>>, ApiError> {
    let books = sqlx::query_as::<_, Book>("SELECT * FROM books ORDER BY created_at")
        .fetch_all(&state.db)
        .await?;

    let public_url = &state.config.server.public_url;
    Ok(Json(
        books
            .into_iter()
            .map(|book| book.into_response(public_url))
            .collect(),
    ))
}

pub async fn create_book(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    req: Request,
) -> Result<(StatusCode, Json<BookResponse>), ApiError> {
    authorize(&user, Role::Admin)?;

    let (payload, upload) = extract_book_payload(req).await?;
    validate_create_payload(&payload, upload.is_some())?;

    let photo = match upload {
        Some(upload) => store_upload(&state, upload).await?,
        None => payload.photo.unwrap_or_default(),
    };

    let id = Uuid::new_v4().to_string();
    let now = chrono::Utc::now().to_rfc3339();
    let title = payload.title.unwrap_or_default();
    let price = payload.price.unwrap_or_default();
    let description = payload.description.unwrap_or_default();

    sqlx::query(
        "INSERT INTO books (id, title, photo, price, description, created_at, updated_at)
         VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&id)
    .bind(&title)
    .bind(&photo)
    .bind(price)
    .bind(&description)
    .bind(&now)
    .bind(&now)
    .execute(&state.db)
    .await?;

    tracing::info!("Created book {} ({})", title, id);

    let book = sqlx::query_as::<_, Book>("SELECT * FROM books WHERE id = ?")
        .bind(&id)
        .fetch_one(&state.db)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(book.into_response(&state.config.server.public_url)),
    ))
}

pub async fn update_book(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    user: AuthUser,
    req: Request,
) -> Result<Json<BookResponse>, ApiError> {
    authorize(&user, Role::Admin)?;

    // Resolve the book before reading the body so an unknown id is a
    // 404 even when the payload is invalid
    let existing = sqlx::query_as::<_, Book>("SELECT * FROM books WHERE id = ?")
        .bind(&id)
        .fetch_optional(&state.db)
        .await?
        .ok_or_else(|| ApiError::not_found("Book not found"))?;

    let (payload, upload) = extract_book_payload(req).await?;
    validate_update_payload(&payload)?;

    let photo = match upload {
        Some(upload) => store_upload(&state, upload).await?,
        None => payload.photo.unwrap_or(existing.photo),
    };
    let title = payload.title.unwrap_or(existing.title);
    let price = payload.price.unwrap_or(existing.price);
    let description = payload.description.unwrap_or(existing.description);
    let now = chrono::Utc::now().to_rfc3339();

    sqlx::query(
        "UPDATE books SET title = ?, photo = ?, price = ?, description = ?, updated_at = ? WHERE id = ?",
    )
    .bind(&title)
    .bind(&photo)
    .bind(price)
    .bind(&description)
    .bind(&now)
    .bind(&id)
    .execute(&state.db)
    .await?;

    let book = sqlx::query_as::<_, Book>("SELECT * FROM books WHERE id = ?")
        .bind(&id)
        .fetch_one(&state.db)
        .await?;

    Ok(Json(book.into_response(&state.config.server.public_url)))
}

pub async fn delete_book(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    user: AuthUser,
) -> Result<StatusCode, ApiError> {
    authorize(&user, Role::Admin)?;

    let result = sqlx::query("DELETE FROM books WHERE id = ?")
        .bind(&id)
        .execute(&state.db)
        .await?;

    if result.rows_affected() == 0 {
        return Err(ApiError::not_found("Book not found"));
    }

    tracing::info!("Deleted book {}", id);

    Ok(StatusCode::NO_CONTENT)
}
