//! Handling authorities.
//!
//! Routing always resolves to a member of the closed `Authority` enum.
//! `AuthorityId` identifies an individual authority account in the embedding
//! system (the actor that requests identity reveals), which is distinct from
//! the department a complaint is routed to.

use serde::{Deserialize, Serialize};

/// A municipal department that handles complaints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Authority {
    WaterSupply,
    ElectricityBoard,
    PublicWorks,
    Sanitation,
    Drainage,
    StreetLighting,
    DisasterManagement,
    PollutionControl,
    /// Catch-all for complaints no department claims.
    MunicipalOffice,
}

impl Authority {
    /// Returns the department's display name.
    pub fn as_name(&self) -> &'static str {
        match self {
            Authority::WaterSupply => "Water Supply Department",
            Authority::ElectricityBoard => "Electricity Board",
            Authority::PublicWorks => "Public Works Department",
            Authority::Sanitation => "Sanitation Department",
            Authority::Drainage => "Drainage Department",
            Authority::StreetLighting => "Street Lighting Division",
            Authority::DisasterManagement => "Disaster Management Cell",
            Authority::PollutionControl => "Pollution Control Board",
            Authority::MunicipalOffice => "Municipal Commissioner Office",
        }
    }

    /// The fallback authority used when no routing rule matches.
    pub fn fallback() -> Self {
        Authority::MunicipalOffice
    }
}

impl std::fmt::Display for Authority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_name())
    }
}

/// Unique identifier for an authority account.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AuthorityId(String);

impl AuthorityId {
    /// Creates a new authority ID.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for AuthorityId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for AuthorityId {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl std::fmt::Display for AuthorityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_is_municipal_office() {
        assert_eq!(Authority::fallback(), Authority::MunicipalOffice);
    }

    #[test]
    fn test_display_names() {
        assert_eq!(Authority::WaterSupply.as_name(), "Water Supply Department");
        assert_eq!(
            Authority::MunicipalOffice.to_string(),
            "Municipal Commissioner Office"
        );
    }

    #[test]
    fn test_authority_id_from_str() {
        let id = AuthorityId::from("roads-officer-7");
        assert_eq!(id.as_str(), "roads-officer-7");
        assert_eq!(id.to_string(), "roads-officer-7");
    }

    #[test]
    fn test_serialization() {
        let json = serde_json::to_string(&Authority::PublicWorks).unwrap();
        assert_eq!(json, "\"public_works\"");
    }
}
