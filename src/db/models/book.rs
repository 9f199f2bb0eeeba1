//! Book catalog models.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Book {
    pub id: String,
    pub title: String,
    /// Stored photo reference: either a relative upload path or an
    /// absolute URL supplied by the client.
    pub photo: String,
    pub price: f64,
    pub description: String,
    pub created_at: String,
    pub updated_at: String,
}

impl Book {
    /// Build the API response, resolving the photo reference against
    /// the server's public URL when it is not already absolute.
    pub fn into_response(self, public_url: &str) -> BookResponse {
        let photo_url = if self.photo.starts_with("http://") || self.photo.starts_with("https://")
        {
            self.photo.clone()
        } else {
            format!(
                "{}/{}",
                public_url.trim_end_matches('/'),
                self.photo.trim_start_matches('/')
            )
        };
        BookResponse {
            id: self.id,
            title: self.title,
            photo: self.photo,
            photo_url,
            price: self.price,
            description: self.description,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BookResponse {
    pub id: String,
    pub title: String,
    pub photo: String,
    pub photo_url: String,
    pub price: f64,
    pub description: String,
    pub created_at: String,
    pub updated_at: String,
}

/// Fields accepted when creating or updating a book. Create enforces
/// required fields through validation; update treats every field as
/// optional and keeps the stored value for anything omitted.
#[derive(Debug, Default, Deserialize)]
pub struct BookPayload {
    pub title: Option<String>,
    pub photo: Option<String>,
    pub price: Option<f64>,
    pub description: Option<String>,
}
