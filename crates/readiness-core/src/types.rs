use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Category
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Strategy,
    Governance,
    DataInfrastructure,
    Organization,
}

impl Category {
    pub fn all() -> &'static [Category] {
        &[
            Category::Strategy,
            Category::Governance,
            Category::DataInfrastructure,
            Category::Organization,
        ]
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Strategy => "strategy",
            Category::Governance => "governance",
            Category::DataInfrastructure => "data_infrastructure",
            Category::Organization => "organization",
        }
    }

    /// Full name shown to assessment takers.
    pub fn display_name(self) -> &'static str {
        match self {
            Category::Strategy => "Strategy",
            Category::Governance => "Governance",
            Category::DataInfrastructure => "Data & Infrastructure",
            Category::Organization => "Organization (Talent & Culture)",
        }
    }

    /// Short label used in the report score table.
    pub fn report_label(self) -> &'static str {
        match self {
            Category::Organization => "Organization",
            other => other.display_name(),
        }
    }

    /// Authoritative ceiling for the category, applied after summation.
    pub fn max_score(self) -> f64 {
        match self {
            Category::Strategy => 19.0,
            Category::Governance => 17.0,
            Category::DataInfrastructure => 20.0,
            Category::Organization => 17.0,
        }
    }

    /// Scores strictly below this value earn a report recommendation.
    pub fn recommendation_threshold(self) -> f64 {
        match self {
            Category::Strategy => 15.0,
            Category::Governance => 13.0,
            Category::DataInfrastructure => 16.0,
            Category::Organization => 13.0,
        }
    }

    pub fn recommendation(self) -> &'static str {
        match self {
            Category::Strategy => {
                "Focus on developing a comprehensive AI strategy aligned with business goals."
            }
            Category::Governance => "Strengthen AI governance frameworks and ethical guidelines.",
            Category::DataInfrastructure => {
                "Invest in improving data quality and infrastructure to support AI initiatives."
            }
            Category::Organization => {
                "Enhance AI skills and promote a culture of innovation within the organization."
            }
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl std::str::FromStr for Category {
    type Err = crate::error::ReadinessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "strategy" | "Strategy" => Ok(Category::Strategy),
            "governance" | "Governance" => Ok(Category::Governance),
            "data_infrastructure" | "data-infrastructure" | "Data & Infrastructure" => {
                Ok(Category::DataInfrastructure)
            }
            "organization" | "Organization" | "Organization (Talent & Culture)" => {
                Ok(Category::Organization)
            }
            _ => Err(crate::error::ReadinessError::InvalidCategory(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// ReadinessLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ReadinessLevel {
    #[serde(rename = "AI Novice")]
    Novice,
    #[serde(rename = "AI Ready")]
    Ready,
    #[serde(rename = "AI Proficient")]
    Proficient,
    #[serde(rename = "AI Advanced")]
    Advanced,
}

impl ReadinessLevel {
    /// Bucket a total score. Each named band is inclusive of its upper bound;
    /// anything above 65 is Advanced.
    pub fn for_total(total: f64) -> Self {
        if total <= 21.0 {
            ReadinessLevel::Novice
        } else if total <= 43.0 {
            ReadinessLevel::Ready
        } else if total <= 65.0 {
            ReadinessLevel::Proficient
        } else {
            ReadinessLevel::Advanced
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ReadinessLevel::Novice => "AI Novice",
            ReadinessLevel::Ready => "AI Ready",
            ReadinessLevel::Proficient => "AI Proficient",
            ReadinessLevel::Advanced => "AI Advanced",
        }
    }
}

impl fmt::Display for ReadinessLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// AssessmentStatus
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssessmentStatus {
    #[serde(rename = "In Progress")]
    InProgress,
    #[serde(rename = "Complete")]
    Complete,
}

impl fmt::Display for AssessmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AssessmentStatus::InProgress => "In Progress",
            AssessmentStatus::Complete => "Complete",
        };
        f.write_str(s)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
