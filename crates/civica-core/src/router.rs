//! Authority routing.
//!
//! Maps a final category label to exactly one handling authority. Routing
//! never fails: unknown labels fall through a substring scan and then the
//! municipal fallback.

use civica_proto::{Authority, Category};
use tracing::debug;

/// Routes category labels to handling authorities.
#[derive(Debug, Clone)]
pub struct AuthorityRouter {
    /// Label -> authority, in scan order for the substring fallback.
    table: Vec<(String, Authority)>,
}

impl AuthorityRouter {
    /// Creates the router with the fixed category table.
    pub fn new() -> Self {
        let table = vec![
            (Category::WaterIssue, Authority::WaterSupply),
            (Category::ElectricityIssue, Authority::ElectricityBoard),
            (Category::RoadIssue, Authority::PublicWorks),
            (Category::GarbageIssue, Authority::Sanitation),
            (Category::SewageIssue, Authority::Drainage),
            (Category::StreetlightIssue, Authority::StreetLighting),
            (Category::SafetyHazard, Authority::DisasterManagement),
            (Category::EnvironmentalIssue, Authority::PollutionControl),
        ]
        .into_iter()
        .map(|(category, authority)| (category.as_label().to_string(), authority))
        .collect();
        Self { table }
    }

    /// Routes a category label to an authority.
    ///
    /// Exact key match first; then the table keys are scanned as substrings
    /// of the label (first hit wins); otherwise the fallback authority.
    pub fn route(&self, label: Option<&str>) -> Authority {
        let Some(label) = label.map(str::trim).filter(|l| !l.is_empty()) else {
            return Authority::fallback();
        };
        let lower = label.to_lowercase();

        if let Some((_, authority)) = self.table.iter().find(|(key, _)| *key == lower) {
            return *authority;
        }

        if let Some((key, authority)) = self.table.iter().find(|(key, _)| lower.contains(key.as_str())) {
            debug!("routed '{label}' via substring key '{key}'");
            return *authority;
        }

        debug!("no routing rule for '{label}', using fallback authority");
        Authority::fallback()
    }

    /// Routes a typed category.
    pub fn route_category(&self, category: Option<Category>) -> Authority {
        self.route(category.map(|c| c.as_label()))
    }
}

impl Default for AuthorityRouter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_lookup() {
        let router = AuthorityRouter::new();
        assert_eq!(router.route(Some("road issue")), Authority::PublicWorks);
        assert_eq!(router.route(Some("water issue")), Authority::WaterSupply);
        assert_eq!(
            router.route(Some("safety hazard")),
            Authority::DisasterManagement
        );
    }

    #[test]
    fn test_substring_fallback() {
        let router = AuthorityRouter::new();
        assert_eq!(
            router.route(Some("major road issue near school")),
            Authority::PublicWorks
        );
        assert_eq!(
            router.route(Some("recurring garbage issue, ward 12")),
            Authority::Sanitation
        );
    }

    #[test]
    fn test_unknown_label_falls_back() {
        let router = AuthorityRouter::new();
        assert_eq!(
            router.route(Some("completely unknown category")),
            Authority::MunicipalOffice
        );
    }

    #[test]
    fn test_missing_label_falls_back() {
        let router = AuthorityRouter::new();
        assert_eq!(router.route(None), Authority::MunicipalOffice);
        assert_eq!(router.route(Some("   ")), Authority::MunicipalOffice);
    }

    #[test]
    fn test_case_insensitive() {
        let router = AuthorityRouter::new();
        assert_eq!(router.route(Some("Road Issue")), Authority::PublicWorks);
    }

    #[test]
    fn test_every_category_routes_off_fallback() {
        let router = AuthorityRouter::new();
        for category in Category::ALL {
            assert_ne!(
                router.route_category(Some(category)),
                Authority::MunicipalOffice,
                "{category} should have a dedicated authority"
            );
        }
    }
}
