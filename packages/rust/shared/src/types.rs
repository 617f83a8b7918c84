//! Core domain types for reqdraft documents.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ReqDraftError, Result};

// ---------------------------------------------------------------------------
// DomainId
// ---------------------------------------------------------------------------

/// Industry vertical inferred from input text.
///
/// Declaration order is the classifier's tie-break priority: more specific
/// verticals come first and `Generic` is always last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DomainId {
    Insurance,
    Healthcare,
    Telecom,
    Banking,
    Finance,
    Ecommerce,
    Crm,
    Education,
    Logistics,
    Generic,
}

impl DomainId {
    /// Every domain, in priority order.
    pub const ALL: [DomainId; 10] = [
        Self::Insurance,
        Self::Healthcare,
        Self::Telecom,
        Self::Banking,
        Self::Finance,
        Self::Ecommerce,
        Self::Crm,
        Self::Education,
        Self::Logistics,
        Self::Generic,
    ];

    /// Stable machine identifier.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Insurance => "insurance",
            Self::Healthcare => "healthcare",
            Self::Telecom => "telecom",
            Self::Banking => "banking",
            Self::Finance => "finance",
            Self::Ecommerce => "ecommerce",
            Self::Crm => "crm",
            Self::Education => "education",
            Self::Logistics => "logistics",
            Self::Generic => "generic",
        }
    }

    /// Human-readable name used in rendered documents.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Insurance => "Insurance",
            Self::Healthcare => "Healthcare",
            Self::Telecom => "Telecommunications",
            Self::Banking => "Banking",
            Self::Finance => "Finance & Accounting",
            Self::Ecommerce => "E-commerce & Retail",
            Self::Crm => "CRM & Marketing",
            Self::Education => "Education",
            Self::Logistics => "Logistics & Supply Chain",
            Self::Generic => "General Business",
        }
    }
}

impl fmt::Display for DomainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DomainId {
    type Err = ReqDraftError;

    fn from_str(s: &str) -> Result<Self> {
        let key = s.trim().to_ascii_lowercase();
        let id = match key.as_str() {
            "insurance" => Self::Insurance,
            "healthcare" | "health" | "medical" => Self::Healthcare,
            "telecom" | "telecommunications" | "telco" => Self::Telecom,
            "banking" | "bank" => Self::Banking,
            "finance" | "accounting" | "fintech" => Self::Finance,
            "ecommerce" | "e-commerce" | "retail" => Self::Ecommerce,
            "crm" | "marketing" | "crm/marketing" | "crm_marketing" => Self::Crm,
            "education" | "edtech" => Self::Education,
            "logistics" | "supply chain" | "supply_chain" => Self::Logistics,
            "generic" | "business" | "general" => Self::Generic,
            _ => return Err(ReqDraftError::parse(format!("unknown domain '{s}'"))),
        };
        Ok(id)
    }
}

// ---------------------------------------------------------------------------
// Raw input
// ---------------------------------------------------------------------------

/// Named free-text section of a generation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    Scope,
    Objectives,
    BriefRequirements,
    Assumptions,
    Constraints,
    Validations,
    Budget,
}

impl Section {
    /// Sections in the order they are concatenated for classification.
    pub const ALL: [Section; 7] = [
        Self::Scope,
        Self::Objectives,
        Self::BriefRequirements,
        Self::Assumptions,
        Self::Constraints,
        Self::Validations,
        Self::Budget,
    ];

    /// Resolve a request key (`briefRequirements`, `requirements`, ...) to a section.
    pub fn from_key(key: &str) -> Option<Self> {
        let normalized: String = key
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();
        match normalized.as_str() {
            "scope" => Some(Self::Scope),
            "objectives" | "objective" => Some(Self::Objectives),
            "briefrequirements" | "requirements" | "businessrequirements" => {
                Some(Self::BriefRequirements)
            }
            "assumptions" => Some(Self::Assumptions),
            "constraints" => Some(Self::Constraints),
            "validations" | "validation" | "validationrules" => Some(Self::Validations),
            "budget" => Some(Self::Budget),
            _ => None,
        }
    }
}

/// Free-text input for one BRD generation call. Never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawInput {
    pub scope: String,
    pub objectives: String,
    #[serde(
        alias = "briefRequirements",
        alias = "requirements",
        alias = "businessRequirements"
    )]
    pub brief_requirements: String,
    pub assumptions: String,
    pub constraints: String,
    #[serde(alias = "validation")]
    pub validations: String,
    pub budget: String,
}

impl RawInput {
    /// Text for one section.
    pub fn get(&self, section: Section) -> &str {
        match section {
            Section::Scope => &self.scope,
            Section::Objectives => &self.objectives,
            Section::BriefRequirements => &self.brief_requirements,
            Section::Assumptions => &self.assumptions,
            Section::Constraints => &self.constraints,
            Section::Validations => &self.validations,
            Section::Budget => &self.budget,
        }
    }

    /// Set the text for one section.
    pub fn set(&mut self, section: Section, text: impl Into<String>) {
        let slot = match section {
            Section::Scope => &mut self.scope,
            Section::Objectives => &mut self.objectives,
            Section::BriefRequirements => &mut self.brief_requirements,
            Section::Assumptions => &mut self.assumptions,
            Section::Constraints => &mut self.constraints,
            Section::Validations => &mut self.validations,
            Section::Budget => &mut self.budget,
        };
        *slot = text.into();
    }

    /// All sections joined by newlines, for domain classification.
    pub fn combined_text(&self) -> String {
        Section::ALL
            .iter()
            .map(|s| self.get(*s))
            .filter(|t| !t.trim().is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Whether every section is blank.
    pub fn is_blank(&self) -> bool {
        Section::ALL.iter().all(|s| self.get(*s).trim().is_empty())
    }

    /// Parse a JSON object of section name to text.
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| ReqDraftError::parse(format!("invalid JSON input: {e}")))
    }

    /// Parse a TOML table of section name to text.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| ReqDraftError::parse(format!("invalid TOML input: {e}")))
    }
}

impl<K, V> FromIterator<(K, V)> for RawInput
where
    K: AsRef<str>,
    V: Into<String>,
{
    /// Build from `(key, text)` pairs. Unknown keys are ignored.
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut input = RawInput::default();
        for (key, value) in iter {
            match Section::from_key(key.as_ref()) {
                Some(section) => input.set(section, value),
                None => tracing::debug!(key = key.as_ref(), "ignoring unknown input section"),
            }
        }
        input
    }
}

/// How user-supplied validation text is turned into rules.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationMode {
    /// Use the text unless it is blank, a known placeholder, or too vague.
    #[default]
    Auto,
    /// Always use the text as written; domain rules only if nothing survives segmentation.
    #[serde(rename = "user")]
    UserOnly,
    /// Ignore the text and use the domain's canned rules.
    #[serde(rename = "domain")]
    DomainDefaults,
}

// ---------------------------------------------------------------------------
// Extracted entities
// ---------------------------------------------------------------------------

/// One normalized unit of meaning produced by the segmenter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedItem {
    pub text: String,
    pub section: Section,
    /// Position among the items of the same block, from zero.
    pub index: usize,
}

/// Where an entity's content came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    /// Derived from caller text.
    Extracted,
    /// Supplied by the domain table because the caller text was too sparse.
    DomainDefault,
}

/// A grouped business capability used as a traceability anchor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Epic {
    /// `EPIC-<area>-<n>` or `EPIC-<n>`.
    pub id: String,
    /// Functional area abbreviation, when the epic is area-scoped.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area: Option<String>,
    pub title: String,
    pub problem: String,
    pub value: String,
    pub capabilities: Vec<String>,
    pub constraints: Vec<String>,
    pub acceptance: Vec<String>,
    /// Objective this epic was derived from, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub objective_ref: Option<String>,
    pub provenance: Provenance,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Objective {
    /// `OBJ-<n>`.
    pub id: String,
    pub statement: String,
    pub hypothesis: String,
    pub provenance: Provenance,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Kpi {
    /// `KPI-<n>`.
    pub id: String,
    pub name: String,
    pub formula: String,
    pub target: String,
    pub frequency: String,
    /// Objective and epic IDs this KPI measures.
    pub traces: Vec<String>,
}

/// Three-point scale for likelihood and impact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Level {
    Low,
    Medium,
    High,
}

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Risk {
    /// `RISK-<n>`.
    pub id: String,
    pub title: String,
    pub description: String,
    pub likelihood: Level,
    pub impact: Level,
    pub mitigation: String,
    pub contingency: String,
}

/// Origin of a validation rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleSource {
    User,
    DomainDefault,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationRule {
    /// `V-<nnn>`.
    pub id: String,
    /// Normalized rule text ("Enforce ..." ending in a period).
    pub text: String,
    pub source: RuleSource,
}

/// A user story as supplied to the wireframe generator or emitted in an FRD.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserStory {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, alias = "acceptanceCriteria")]
    pub acceptance_criteria: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionalRequirement {
    /// `FR-<nnn>`.
    pub id: String,
    /// Epic the requirement realizes.
    pub epic_id: String,
    pub title: String,
    pub description: String,
    pub acceptance: Vec<String>,
    pub validation: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_id_roundtrip() {
        for id in DomainId::ALL {
            let parsed: DomainId = id.as_str().parse().expect("parse DomainId");
            assert_eq!(parsed, id);
        }
    }

    #[test]
    fn domain_id_aliases() {
        assert_eq!("Marketing".parse::<DomainId>().unwrap(), DomainId::Crm);
        assert_eq!("e-commerce".parse::<DomainId>().unwrap(), DomainId::Ecommerce);
        assert!("astrology".parse::<DomainId>().is_err());
    }

    #[test]
    fn generic_is_lowest_priority() {
        assert_eq!(DomainId::ALL.last(), Some(&DomainId::Generic));
        assert!(DomainId::Insurance < DomainId::Generic);
        assert!(DomainId::Healthcare < DomainId::Banking);
    }

    #[test]
    fn raw_input_accepts_camel_case_keys() {
        let json = r#"{
            "scope": "Included - lead management",
            "briefRequirements": "Capture web leads",
            "validation": "All leads must be verified"
        }"#;
        let input = RawInput::from_json_str(json).expect("parse");
        assert_eq!(input.brief_requirements, "Capture web leads");
        assert_eq!(input.validations, "All leads must be verified");
        assert!(input.budget.is_empty());
    }

    #[test]
    fn raw_input_from_pairs() {
        let input: RawInput = [
            ("objectives", "Grow revenue"),
            ("requirements", "Nightly export"),
            ("unknown", "ignored"),
        ]
        .into_iter()
        .collect();
        assert_eq!(input.objectives, "Grow revenue");
        assert_eq!(input.brief_requirements, "Nightly export");
        assert!(!input.is_blank());
    }

    #[test]
    fn raw_input_from_toml() {
        let toml_str = r#"
scope = "Policy administration"
budget = "USD 250k"
"#;
        let input = RawInput::from_toml_str(toml_str).expect("parse");
        assert_eq!(input.get(Section::Budget), "USD 250k");
        assert!(input.combined_text().contains("Policy administration"));
    }

    #[test]
    fn combined_text_skips_blank_sections() {
        let mut input = RawInput::default();
        input.set(Section::Scope, "Claims intake");
        input.set(Section::Constraints, "   ");
        assert_eq!(input.combined_text(), "Claims intake");
    }

    #[test]
    fn user_story_accepts_camel_case_criteria() {
        let json = r#"{"id":"US-001","title":"Login","acceptanceCriteria":["Valid email"]}"#;
        let story: UserStory = serde_json::from_str(json).expect("parse");
        assert_eq!(story.acceptance_criteria, vec!["Valid email".to_string()]);
        assert!(story.description.is_empty());
    }
}
