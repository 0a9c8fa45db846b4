use super::read;
use crate::error::AppError;
use crate::models::{MechanicSearchQuery, SearchPage};
use crate::transport::{encoded_path, ApiResponse, Transport};
use serde_json::Value;

pub const SEARCH_PATH: &str = "/mechanics/search";
pub const SEARCH_FALLBACK: &str = "Failed to fetch mechanics";
pub const DETAIL_FALLBACK: &str = "Failed to fetch mechanic details";

/// One page of mechanics matching `query`.
pub async fn search_mechanics(
    transport: &Transport,
    query: &MechanicSearchQuery,
) -> Result<SearchPage, AppError> {
    let pairs = query.to_query_pairs();
    read(transport, SEARCH_PATH, &pairs, SEARCH_FALLBACK)
        .await?
        .decode()
}

/// A single mechanic's public record.
pub async fn get_mechanic(transport: &Transport, id: &str) -> Result<Value, AppError> {
    if id.trim().is_empty() {
        return Err(AppError::Validation("Mechanic id is required".into()));
    }
    let path = encoded_path(&["mechanics", id])?;
    read(transport, &path, &[], DETAIL_FALLBACK)
        .await
        .map(ApiResponse::into_data)
}
