//! Visa Catalog Models

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// One selectable Schengen history answer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchengenHistoryOption {
    pub value: String,
    pub label: String,
}

/// Booking catalog served by the Gateway
///
/// `category_eligibility` maps a category to the Schengen history values
/// it accepts. A category missing from the map accepts none.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisaInfo {
    pub visa_types: Vec<String>,
    pub visa_sub_types: Vec<String>,
    pub locations: Vec<String>,
    pub categories_by_location: HashMap<String, Vec<String>>,
    #[serde(default)]
    pub category_requirements: HashMap<String, String>,
    #[serde(default)]
    pub category_eligibility: HashMap<String, Vec<String>>,
    pub schengen_history_options: Vec<SchengenHistoryOption>,
}

/// Eligibility probe request (`validate-category`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryCheck {
    pub location: String,
    pub category: String,
    pub schengen_visa_history: String,
}

/// Eligibility verdict for a draft
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationVerdict {
    pub is_valid: bool,
    pub message: String,
    pub recommended_categories: Vec<String>,
}
