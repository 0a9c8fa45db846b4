use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Filters for `GET /mechanics/search`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MechanicSearchQuery {
    pub city: Option<String>,
    pub district: Option<String>,
    pub expertise_areas: Vec<String>,
    pub vehicle_brands: Vec<String>,
    pub min_rating: Option<f32>,
    pub page: u32,
    pub limit: u32,
}

impl Default for MechanicSearchQuery {
    fn default() -> Self {
        Self {
            city: None,
            district: None,
            expertise_areas: Vec::new(),
            vehicle_brands: Vec::new(),
            min_rating: None,
            page: 1,
            limit: 10,
        }
    }
}

impl MechanicSearchQuery {
    /// Query-string pairs in the form the server expects. List filters are
    /// comma-joined; unset filters are left out.
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(city) = self.city.as_deref().filter(|s| !s.is_empty()) {
            pairs.push(("city", city.to_string()));
        }
        if let Some(district) = self.district.as_deref().filter(|s| !s.is_empty()) {
            pairs.push(("district", district.to_string()));
        }
        if !self.expertise_areas.is_empty() {
            pairs.push(("expertiseAreas", self.expertise_areas.join(",")));
        }
        if !self.vehicle_brands.is_empty() {
            pairs.push(("vehicleBrands", self.vehicle_brands.join(",")));
        }
        if let Some(min_rating) = self.min_rating {
            pairs.push(("minRating", min_rating.to_string()));
        }
        pairs.push(("page", self.page.to_string()));
        pairs.push(("limit", self.limit.to_string()));
        pairs
    }
}

/// One page of search results. Mechanic records are passed through as received.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchPage {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub data: Vec<Value>,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub current_page: u32,
    #[serde(default)]
    pub total_mechanics: u64,
}
