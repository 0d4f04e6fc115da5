//! Complaint categories.
//!
//! The category set is closed: every triaged complaint either lands in one
//! of these or is explicitly undetermined. The `Display` labels double as
//! the candidate label set sent to the zero-shot classifier.

use serde::{Deserialize, Serialize};

/// A handling category for a civic complaint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Water supply problems: burst pipes, contamination, outages.
    WaterIssue,
    /// Power problems: outages, live wires, transformer faults.
    ElectricityIssue,
    /// Road surface problems: potholes, broken pavement.
    RoadIssue,
    /// Waste collection problems: uncollected garbage, dumping.
    GarbageIssue,
    /// Drainage problems: blocked drains, sewage overflow, open manholes.
    SewageIssue,
    /// Street lighting problems: dark stretches, broken lamps.
    StreetlightIssue,
    /// Generic danger reports that name no specific utility.
    SafetyHazard,
    /// Generic environmental reports: pollution, smoke, dumping in nature.
    EnvironmentalIssue,
}

impl Category {
    /// Every category, in table order. Table order is the tie-break order
    /// used by the keyword matcher and the order of the zero-shot label set.
    pub const ALL: [Category; 8] = [
        Category::WaterIssue,
        Category::ElectricityIssue,
        Category::RoadIssue,
        Category::GarbageIssue,
        Category::SewageIssue,
        Category::StreetlightIssue,
        Category::SafetyHazard,
        Category::EnvironmentalIssue,
    ];

    /// Returns the human-readable label for this category.
    pub fn as_label(&self) -> &'static str {
        match self {
            Category::WaterIssue => "water issue",
            Category::ElectricityIssue => "electricity issue",
            Category::RoadIssue => "road issue",
            Category::GarbageIssue => "garbage issue",
            Category::SewageIssue => "sewage issue",
            Category::StreetlightIssue => "streetlight issue",
            Category::SafetyHazard => "safety hazard",
            Category::EnvironmentalIssue => "environmental issue",
        }
    }

    /// Parses a category from its label (case-insensitive).
    ///
    /// Accepts both the display form ("water issue") and the snake_case
    /// serde form ("water_issue").
    pub fn parse(label: &str) -> Option<Self> {
        let normalized = label.trim().to_lowercase().replace('_', " ");
        Category::ALL
            .iter()
            .find(|c| c.as_label() == normalized)
            .copied()
    }

    /// True for categories that name a concrete utility or service domain.
    ///
    /// Specific-domain evidence outranks generic-domain evidence in the
    /// keyword matcher once it clears the score threshold.
    pub fn is_specific(&self) -> bool {
        !matches!(self, Category::SafetyHazard | Category::EnvironmentalIssue)
    }

    /// True for the catch-all domains (safety, environmental).
    pub fn is_generic(&self) -> bool {
        !self.is_specific()
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_label())
    }
}
