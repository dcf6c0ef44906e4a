//! Category eligibility rules
//!
//! The rule table is built once per session from the Gateway's visa
//! catalog and consulted on every draft mutation. The Gateway is the
//! only source of eligibility data; nothing here hardcodes categories.
//!
//! Verdicts are advisory. An invalid draft blocks submission until the
//! operator explicitly overrides, but the final word stays with the
//! Gateway at booking time.

use std::collections::{HashMap, HashSet};

use shared::models::{SchengenHistoryOption, ValidationVerdict, VisaInfo};

use crate::ConsoleError;

/// Eligibility rule table derived from the Gateway catalog
#[derive(Debug, Clone)]
pub struct RuleTable {
    locations: Vec<String>,
    categories_by_location: HashMap<String, Vec<String>>,
    requirements: HashMap<String, String>,
    eligibility: HashMap<String, HashSet<String>>,
    history_options: Vec<SchengenHistoryOption>,
    visa_types: Vec<String>,
    visa_sub_types: Vec<String>,
}

impl RuleTable {
    /// Build the table from a Gateway catalog, rejecting unusable ones.
    pub fn from_visa_info(info: &VisaInfo) -> Result<Self, ConsoleError> {
        if info.locations.is_empty() {
            return Err(ConsoleError::Configuration(
                "catalog lists no locations".to_string(),
            ));
        }
        if info.visa_types.is_empty() || info.visa_sub_types.is_empty() {
            return Err(ConsoleError::Configuration(
                "catalog lists no visa types".to_string(),
            ));
        }
        if info.schengen_history_options.is_empty() {
            return Err(ConsoleError::Configuration(
                "catalog lists no Schengen history options".to_string(),
            ));
        }
        for location in &info.locations {
            match info.categories_by_location.get(location) {
                Some(categories) if !categories.is_empty() => {}
                _ => {
                    return Err(ConsoleError::Configuration(format!(
                        "location '{location}' has no categories"
                    )));
                }
            }
        }
        if info.category_eligibility.is_empty() {
            tracing::warn!(
                "catalog carries no eligibility mapping; every category will check as ineligible"
            );
        }

        Ok(Self {
            locations: info.locations.clone(),
            categories_by_location: info.categories_by_location.clone(),
            requirements: info.category_requirements.clone(),
            eligibility: info
                .category_eligibility
                .iter()
                .map(|(category, histories)| {
                    (category.clone(), histories.iter().cloned().collect())
                })
                .collect(),
            history_options: info.schengen_history_options.clone(),
            visa_types: info.visa_types.clone(),
            visa_sub_types: info.visa_sub_types.clone(),
        })
    }

    /// Locations in catalog order.
    pub fn locations(&self) -> &[String] {
        &self.locations
    }

    pub fn visa_types(&self) -> &[String] {
        &self.visa_types
    }

    pub fn visa_sub_types(&self) -> &[String] {
        &self.visa_sub_types
    }

    /// Schengen history answers in catalog order.
    pub fn history_options(&self) -> &[SchengenHistoryOption] {
        &self.history_options
    }

    pub fn has_location(&self, location: &str) -> bool {
        self.locations.iter().any(|l| l == location)
    }

    /// Categories offered at a location, in catalog order.
    pub fn categories_for(&self, location: &str) -> &[String] {
        self.categories_by_location
            .get(location)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Requirement text for a category, if the catalog carries one.
    pub fn requirement_for(&self, category: &str) -> Option<&str> {
        self.requirements.get(category).map(String::as_str)
    }

    /// Whether a category accepts a Schengen history answer.
    pub fn permits(&self, category: &str, history: &str) -> bool {
        self.eligibility
            .get(category)
            .is_some_and(|histories| histories.contains(history))
    }

    fn history_label<'a>(&'a self, history: &'a str) -> &'a str {
        self.history_options
            .iter()
            .find(|option| option.value == history)
            .map(|option| option.label.as_str())
            .unwrap_or(history)
    }

    /// Validate a draft selection. Pure: no I/O, no clock.
    ///
    /// On a mismatch, `recommended_categories` lists the categories at
    /// `location` that do accept `history`, in catalog order. A valid
    /// selection carries no recommendations.
    pub fn validate(&self, location: &str, category: &str, history: &str) -> ValidationVerdict {
        if self.permits(category, history) {
            return ValidationVerdict {
                is_valid: true,
                message: format!("Category '{category}' is valid for your Schengen visa history."),
                recommended_categories: Vec::new(),
            };
        }

        let recommended: Vec<String> = self
            .categories_for(location)
            .iter()
            .filter(|candidate| self.permits(candidate, history))
            .cloned()
            .collect();

        let label = self.history_label(history);
        let message = if recommended.is_empty() {
            format!("No category at {location} accepts Schengen history '{label}'.")
        } else {
            format!(
                "Category '{category}' does not match Schengen history '{label}'. Recommended for {location}: {}.",
                recommended.join(", ")
            )
        };

        ValidationVerdict {
            is_valid: false,
            message,
            recommended_categories: recommended,
        }
    }
}

/// Catalog fixture matching the Gateway's production data.
#[cfg(test)]
pub(crate) fn sample_catalog() -> VisaInfo {
    use std::collections::HashMap;

    let mut categories_by_location = HashMap::new();
    categories_by_location.insert(
        "Oran".to_string(),
        vec!["ORAN 1", "ORAN 2", "ORAN 3", "ORAN 4"]
            .into_iter()
            .map(String::from)
            .collect(),
    );
    categories_by_location.insert(
        "Algiers".to_string(),
        vec!["ALG 1", "ALG 2", "ALG 3", "ALG 4"]
            .into_iter()
            .map(String::from)
            .collect(),
    );

    let mut category_eligibility = HashMap::new();
    for (category, histories) in [
        ("ORAN 1", vec!["never", "before_2020"]),
        ("ORAN 2", vec!["after_2020_6months"]),
        ("ORAN 3", vec!["after_2020_6months_2years"]),
        ("ORAN 4", vec!["after_2020_2years_plus"]),
        ("ALG 1", vec!["never", "before_2020"]),
        ("ALG 2", vec!["after_2020_6months"]),
        ("ALG 3", vec!["after_2020_6months_2years"]),
        ("ALG 4", vec!["after_2020_2years_plus"]),
    ] {
        category_eligibility.insert(
            category.to_string(),
            histories.into_iter().map(String::from).collect(),
        );
    }

    let mut category_requirements = HashMap::new();
    category_requirements.insert(
        "ORAN 1".to_string(),
        "Never obtained a Schengen visa or issued before 2020".to_string(),
    );

    VisaInfo {
        visa_types: vec!["National Visa".to_string(), "Schengen Visa".to_string()],
        visa_sub_types: vec!["Tourism".to_string(), "Study visa".to_string()],
        locations: vec!["Oran".to_string(), "Algiers".to_string()],
        categories_by_location,
        category_requirements,
        category_eligibility,
        schengen_history_options: vec![
            SchengenHistoryOption {
                value: "never".to_string(),
                label: "Never had a Schengen visa".to_string(),
            },
            SchengenHistoryOption {
                value: "before_2020".to_string(),
                label: "Had Schengen visa before 2020".to_string(),
            },
            SchengenHistoryOption {
                value: "after_2020_6months".to_string(),
                label: "Schengen visa after 2020, valid <= 6 months".to_string(),
            },
            SchengenHistoryOption {
                value: "after_2020_6months_2years".to_string(),
                label: "Schengen visa after 2020, valid > 6 months, < 2 years".to_string(),
            },
            SchengenHistoryOption {
                value: "after_2020_2years_plus".to_string(),
                label: "Schengen visa after 2020, valid >= 2 years".to_string(),
            },
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> RuleTable {
        RuleTable::from_visa_info(&sample_catalog()).unwrap()
    }

    #[test]
    fn test_matching_history_is_valid() {
        let verdict = table().validate("Oran", "ORAN 1", "never");
        assert!(verdict.is_valid);
        assert!(verdict.recommended_categories.is_empty());
        assert!(verdict.message.contains("ORAN 1"));
    }

    #[test]
    fn test_mismatch_recommends_categories_at_location() {
        let verdict = table().validate("Oran", "ORAN 1", "after_2020_6months");
        assert!(!verdict.is_valid);
        assert_eq!(verdict.recommended_categories, vec!["ORAN 2"]);
        assert!(verdict.message.contains("ORAN 2"));
        assert!(verdict.message.contains("valid <= 6 months"));
    }

    #[test]
    fn test_recommendations_follow_catalog_order() {
        let mut catalog = sample_catalog();
        catalog
            .category_eligibility
            .get_mut("ORAN 4")
            .unwrap()
            .push("never".to_string());
        let table = RuleTable::from_visa_info(&catalog).unwrap();

        let verdict = table.validate("Oran", "ORAN 2", "never");
        assert!(!verdict.is_valid);
        // Location list order, not insertion or hash order
        assert_eq!(verdict.recommended_categories, vec!["ORAN 1", "ORAN 4"]);
        assert_eq!(verdict, table.validate("Oran", "ORAN 2", "never"));
    }

    #[test]
    fn test_recommendations_never_cross_locations() {
        let verdict = table().validate("Algiers", "ALG 2", "never");
        assert!(!verdict.is_valid);
        assert_eq!(verdict.recommended_categories, vec!["ALG 1"]);
        assert!(!verdict.message.contains("ORAN"));
    }

    #[test]
    fn test_unlisted_history_yields_empty_recommendations() {
        let verdict = table().validate("Oran", "ORAN 1", "rejected");
        assert!(!verdict.is_valid);
        assert!(verdict.recommended_categories.is_empty());
        assert!(verdict.message.contains("Oran"));
        assert!(verdict.message.contains("rejected"));
    }

    #[test]
    fn test_category_absent_from_eligibility_never_permits() {
        let mut catalog = sample_catalog();
        catalog
            .categories_by_location
            .get_mut("Oran")
            .unwrap()
            .push("FAMILY GROUP".to_string());
        let table = RuleTable::from_visa_info(&catalog).unwrap();

        for option in table.history_options() {
            assert!(!table.permits("FAMILY GROUP", &option.value));
        }
    }

    #[test]
    fn test_rejects_location_without_categories() {
        let mut catalog = sample_catalog();
        catalog.locations.push("Annaba".to_string());
        let err = RuleTable::from_visa_info(&catalog).unwrap_err();
        assert!(matches!(err, ConsoleError::Configuration(_)));
        assert!(err.to_string().contains("Annaba"));
    }

    #[test]
    fn test_rejects_empty_catalog() {
        let mut catalog = sample_catalog();
        catalog.locations.clear();
        assert!(matches!(
            RuleTable::from_visa_info(&catalog),
            Err(ConsoleError::Configuration(_))
        ));
    }

    #[test]
    fn test_requirement_lookup() {
        let table = table();
        assert!(table.requirement_for("ORAN 1").unwrap().contains("before 2020"));
        assert!(table.requirement_for("ORAN 9").is_none());
    }
}
