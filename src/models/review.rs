use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::Validate;

/// Body of `POST /customers/reviews`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ReviewInput {
    /// Id of the mechanic being reviewed.
    #[validate(length(min = 1))]
    pub mechanic: String,
    /// Whole stars, 1 to 5.
    #[validate(range(min = 1, max = 5))]
    pub rating: u8,
    #[validate(length(max = 500))]
    pub comment: String,
}

/// A review as returned by the review listing endpoints.
///
/// `mechanic`, `customer` and each entry of `likes` are either an id or a populated
/// record depending on which side is asking, so they are kept as raw JSON. Ratings
/// may be averaged server side and are not assumed to be whole.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub mechanic: Value,
    #[serde(default)]
    pub customer: Value,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub likes: Vec<Value>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_review_input_validation() {
        let valid = ReviewInput {
            mechanic: "m1".to_string(),
            rating: 5,
            comment: "Quick and honest".to_string(),
        };
        assert!(valid.validate().is_ok());

        let zero_stars = ReviewInput {
            rating: 0,
            ..valid.clone()
        };
        assert!(zero_stars.validate().is_err());

        let six_stars = ReviewInput {
            rating: 6,
            ..valid.clone()
        };
        assert!(six_stars.validate().is_err());

        let too_long = ReviewInput {
            comment: "a".repeat(501),
            ..valid
        };
        assert!(too_long.validate().is_err());
    }

    #[test]
    fn test_review_deserializes_sparse_records() {
        let review: Review = serde_json::from_value(json!({
            "_id": "r1",
            "mechanic": { "_id": "m1", "businessName": "Usta" },
            "rating": 4,
            "createdAt": "2024-03-01T10:00:00Z"
        }))
        .unwrap();
        assert_eq!(review.id, "r1");
        assert_eq!(review.mechanic["businessName"], "Usta");
        assert!(review.customer.is_null());
        assert!(review.likes.is_empty());
        assert!(review.created_at.is_some());
    }

    #[test]
    fn test_review_accepts_populated_likes_and_fractional_rating() {
        let review: Review = serde_json::from_value(json!({
            "_id": "r2",
            "rating": 4.5,
            "likes": ["c1", { "_id": "c2", "name": "Ayse" }]
        }))
        .unwrap();
        assert_eq!(review.rating, 4.5);
        assert_eq!(review.likes.len(), 2);
        assert_eq!(review.likes[0], "c1");
        assert_eq!(review.likes[1]["name"], "Ayse");
    }
}
