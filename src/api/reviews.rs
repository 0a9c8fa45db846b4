use super::read;
use super::retry::write_error;
use crate::error::AppError;
use crate::models::{AccountKind, Review, ReviewInput};
use crate::transport::{encoded_path, Transport};
use serde_json::Value;
use validator::Validate;

pub const CREATE_PATH: &str = "/customers/reviews";
pub const FETCH_FALLBACK: &str = "Failed to fetch reviews";
pub const SUBMIT_FALLBACK: &str = "Failed to submit review";
pub const LIKE_FALLBACK: &str = "Failed to like review";

/// Reviews written by (customer) or about (mechanic) the signed-in account.
pub async fn fetch_reviews(transport: &Transport, kind: AccountKind) -> Result<Vec<Review>, AppError> {
    let data = read(transport, &kind.reviews_path(), &[], FETCH_FALLBACK)
        .await?
        .into_data();
    if data.is_null() {
        return Ok(Vec::new());
    }
    Ok(serde_json::from_value(data)?)
}

/// Posts a review as the signed-in customer and returns the stored record.
pub async fn create_review(transport: &Transport, input: &ReviewInput) -> Result<Value, AppError> {
    input.validate()?;
    transport
        .post(CREATE_PATH, input)
        .await
        .map(|r| r.into_data())
        .map_err(|e| write_error(e, SUBMIT_FALLBACK))
}

/// Toggles the signed-in customer's like on a review.
pub async fn like_review(transport: &Transport, review_id: &str) -> Result<Value, AppError> {
    if review_id.trim().is_empty() {
        return Err(AppError::Validation("Review id is required".into()));
    }
    let path = encoded_path(&["customers", "reviews", review_id, "like"])?;
    transport
        .post_empty(&path)
        .await
        .map(|r| r.into_data())
        .map_err(|e| write_error(e, LIKE_FALLBACK))
}
