//! MoSCoW prioritisation of derived user stories.
//!
//! Every story gets a score from domain keyword tiers, its persona, its
//! estimated complexity and how many other stories build on it. The score is
//! mapped to a MoSCoW category; healthcare and banking use stricter
//! thresholds.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use reqdraft_shared::{DomainId, Level, UserStory};
use reqdraft_text::comparison_key;

/// Scores never drop below this floor.
const MIN_SCORE: u32 = 10;
/// Added per other story that mentions this story's subject.
const DEPENDENT_BONUS: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Moscow {
    Must,
    Should,
    Could,
    Wont,
}

impl Moscow {
    pub const ALL: [Moscow; 4] = [Self::Must, Self::Should, Self::Could, Self::Wont];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Must => "Must Have",
            Self::Should => "Should Have",
            Self::Could => "Could Have",
            Self::Wont => "Won't Have (this time)",
        }
    }

    fn justification(&self) -> &'static str {
        match self {
            Self::Must => "Critical requirement that directly enables core business functionality.",
            Self::Should => "Important feature that significantly enhances user experience and business value.",
            Self::Could => "Adds value but is not essential for core operations.",
            Self::Wont => "Can be deferred to a later release without impacting core functionality.",
        }
    }
}

/// One user story with its priority assessment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prioritized {
    pub story_id: String,
    pub title: String,
    pub score: u32,
    pub category: Moscow,
    /// 1-based position after sorting by score.
    pub rank: usize,
    pub complexity: Level,
    pub business_value: Level,
    pub technical_risk: Level,
    pub justification: String,
    /// Stories this one needs first.
    pub depends_on: Vec<String>,
}

// ---------------------------------------------------------------------------
// Keyword tables
// ---------------------------------------------------------------------------

type Tiers = &'static [(&'static [&'static str], u32)];

const ECOMMERCE_TIERS: Tiers = &[
    (&["login", "authenticate", "register", "sign in", "sign up"], 100),
    (&["search", "browse", "catalog", "catalogue", "product", "find"], 90),
    (&["cart", "basket", "shopping"], 85),
    (&["checkout", "payment", "order", "purchase"], 80),
    (&["profile", "account settings"], 70),
    (&["wishlist", "favorite", "favourite", "bookmark"], 60),
    (&["review", "rating", "feedback"], 50),
    (&["recommend", "suggest", "analytics"], 40),
];

const HEALTHCARE_TIERS: Tiers = &[
    (&["login", "authenticate", "access", "security"], 100),
    (&["patient", "registration", "admit"], 95),
    (&["medical", "history", "record", "chart"], 90),
    (&["appointment", "schedule", "booking"], 85),
    (&["prescription", "medication", "drug"], 80),
    (&["billing", "insurance", "claim"], 75),
    (&["report", "analytics", "dashboard"], 65),
    (&["notification", "alert", "reminder"], 55),
];

const BANKING_TIERS: Tiers = &[
    (&["login", "authenticate", "security", "access"], 100),
    (&["account", "balance", "onboarding", "kyc"], 95),
    (&["transaction", "transfer", "payment"], 90),
    (&["statement", "history", "record"], 80),
    (&["notification", "alert", "sms"], 70),
    (&["investment", "portfolio", "advisory"], 60),
];

const INSURANCE_TIERS: Tiers = &[
    (&["login", "authenticate", "security"], 100),
    (&["policy", "quote", "underwriting"], 90),
    (&["claim", "fnol", "settlement"], 85),
    (&["premium", "billing", "payment"], 75),
    (&["renewal", "endorsement"], 65),
    (&["report", "analytics", "dashboard"], 55),
];

const TELECOM_TIERS: Tiers = &[
    (&["activation", "onboarding", "kyc", "sim"], 95),
    (&["billing", "charging", "rating", "invoice"], 90),
    (&["usage", "network", "porting"], 80),
    (&["plan", "tariff", "upgrade"], 70),
    (&["report", "analytics", "dashboard"], 55),
];

const CRM_TIERS: Tiers = &[
    (&["lead", "contact", "account"], 90),
    (&["opportunity", "pipeline", "deal"], 85),
    (&["campaign", "email", "segment"], 70),
    (&["report", "analytics", "dashboard", "forecast"], 55),
];

const FINANCE_TIERS: Tiers = &[
    (&["ledger", "journal", "posting"], 95),
    (&["payable", "invoice", "vendor"], 90),
    (&["receivable", "collection"], 85),
    (&["reconciliation", "bank", "close"], 80),
    (&["report", "analytics", "dashboard"], 60),
];

const EDUCATION_TIERS: Tiers = &[
    (&["enrol", "enroll", "registration", "student"], 95),
    (&["course", "curriculum", "schedule"], 90),
    (&["grade", "assessment", "exam"], 80),
    (&["report", "analytics", "dashboard"], 55),
];

const LOGISTICS_TIERS: Tiers = &[
    (&["shipment", "dispatch", "delivery"], 95),
    (&["tracking", "track", "route"], 90),
    (&["warehouse", "inventory", "stock"], 80),
    (&["carrier", "freight", "rate"], 70),
    (&["report", "analytics", "dashboard"], 55),
];

const GENERIC_TIERS: Tiers = &[
    (&["login", "authenticate", "security", "access"], 90),
    (&["create", "register", "record"], 75),
    (&["workflow", "approval", "process"], 65),
    (&["report", "analytics", "dashboard"], 50),
];

fn tiers(domain: DomainId) -> Tiers {
    match domain {
        DomainId::Ecommerce => ECOMMERCE_TIERS,
        DomainId::Healthcare => HEALTHCARE_TIERS,
        DomainId::Banking => BANKING_TIERS,
        DomainId::Insurance => INSURANCE_TIERS,
        DomainId::Telecom => TELECOM_TIERS,
        DomainId::Crm => CRM_TIERS,
        DomainId::Finance => FINANCE_TIERS,
        DomainId::Education => EDUCATION_TIERS,
        DomainId::Logistics => LOGISTICS_TIERS,
        DomainId::Generic => GENERIC_TIERS,
    }
}

const HIGH_COMPLEXITY: &[&str] = &[
    "integrate", "integration", "algorithm", "machine learning", "complex", "workflow",
    "encryption", "security", "payment", "billing", "reporting", "analytics",
];
const MEDIUM_COMPLEXITY: &[&str] = &[
    "manage", "process", "generate", "validate", "calculate", "schedule", "notification",
    "email", "search", "filter", "dashboard",
];
const LOW_COMPLEXITY: &[&str] = &[
    "view", "display", "list", "show", "read", "access", "login", "logout", "profile",
    "basic", "simple",
];

const HIGH_RISK: &[&str] = &[
    "integrate", "integration", "algorithm", "machine learning", "complex", "encryption",
    "payment", "security",
];
const MEDIUM_RISK: &[&str] = &["calculate", "validate", "process", "generate", "workflow", "notification"];

const ADMIN_ROLES: &[&str] = &["admin", "administrator", "system"];
const CUSTOMER_ROLES: &[&str] = &[
    "customer", "user", "client", "shopper", "patient", "subscriber", "student",
    "policyholder", "account holder",
];

/// `action -> prerequisites`; a story mentioning the action depends on every
/// other story mentioning one of the prerequisites.
fn dependency_rules(domain: DomainId) -> &'static [(&'static str, &'static [&'static str])] {
    match domain {
        DomainId::Ecommerce => &[
            ("search", &["login", "authentication"]),
            ("cart", &["search", "product"]),
            ("checkout", &["cart", "login"]),
            ("payment", &["checkout", "account"]),
            ("order", &["payment", "checkout"]),
        ],
        DomainId::Healthcare => &[
            ("appointment", &["patient", "registration"]),
            ("medical", &["login", "patient"]),
            ("prescription", &["medical", "patient"]),
            ("billing", &["patient", "treatment"]),
        ],
        DomainId::Banking => &[
            ("transaction", &["login", "account"]),
            ("transfer", &["account", "authentication"]),
            ("statement", &["account", "login"]),
        ],
        DomainId::Insurance => &[
            ("claim", &["policy"]),
            ("renewal", &["policy"]),
            ("premium", &["quote", "policy"]),
        ],
        DomainId::Telecom => &[
            ("billing", &["activation", "usage"]),
            ("usage", &["activation"]),
        ],
        _ => &[],
    }
}

fn high_value_words(domain: DomainId) -> &'static [&'static str] {
    match domain {
        DomainId::Ecommerce => &["purchase", "buy", "checkout", "payment", "order", "revenue"],
        DomainId::Healthcare => &["patient", "medical", "treatment", "diagnosis", "safety"],
        DomainId::Banking => &["transaction", "payment", "account", "security", "compliance"],
        DomainId::Insurance => &["claim", "policy", "premium", "coverage", "risk"],
        _ => &["revenue", "customer", "business", "critical", "core"],
    }
}

// ---------------------------------------------------------------------------
// Assessments
// ---------------------------------------------------------------------------

fn mentions(text: &str, words: &[&str]) -> bool {
    let padded = format!(" {text} ");
    words.iter().any(|w| {
        padded.contains(&format!(" {w} "))
            || padded.contains(&format!(" {w}s "))
            || (w.len() >= 5 && padded.contains(&format!(" {w}")))
    })
}

/// Lowercased title and description of a story, punctuation removed.
fn story_text(story: &UserStory) -> String {
    comparison_key(&format!("{} {}", story.title, story.description))
}

/// The persona in "As a <role>, I want ...".
fn role_of(story: &UserStory) -> String {
    static ROLE_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"(?i)^\s*as an?\s+([^,]+),").expect("valid regex"));

    ROLE_RE
        .captures(&story.description)
        .map(|caps| comparison_key(&caps[1]))
        .unwrap_or_default()
}

/// Complexity from the wording of a story.
pub fn estimate_complexity(text: &str) -> Level {
    let key = comparison_key(text);
    if mentions(&key, HIGH_COMPLEXITY) {
        Level::High
    } else if mentions(&key, MEDIUM_COMPLEXITY) {
        Level::Medium
    } else if mentions(&key, LOW_COMPLEXITY) {
        Level::Low
    } else {
        Level::Medium
    }
}

fn technical_risk(text: &str) -> Level {
    if mentions(text, HIGH_RISK) {
        Level::High
    } else if mentions(text, MEDIUM_RISK) {
        Level::Medium
    } else {
        Level::Low
    }
}

fn business_value(text: &str, domain: DomainId) -> Level {
    if mentions(text, high_value_words(domain)) {
        Level::High
    } else if mentions(text, &["manage", "process", "improve", "enhance"]) {
        Level::Medium
    } else {
        Level::Low
    }
}

/// Title words that other stories may refer to.
fn subject_words(story: &UserStory) -> HashSet<String> {
    comparison_key(&story.title)
        .split_whitespace()
        .filter(|w| w.chars().count() > 3)
        .map(str::to_string)
        .collect()
}

/// Score one story against the whole set.
pub fn priority_score(story: &UserStory, domain: DomainId, all: &[UserStory]) -> u32 {
    let text = story_text(story);
    let mut score: i64 = tiers(domain)
        .iter()
        .find(|(words, _)| mentions(&text, words))
        .map(|&(_, points)| i64::from(points))
        .unwrap_or(0);

    let role = role_of(story);
    if mentions(&role, ADMIN_ROLES) {
        score += 10;
    } else if mentions(&role, CUSTOMER_ROLES) {
        score += 20;
    }

    match estimate_complexity(&text) {
        Level::Low => score += 15,
        Level::High => score -= 10,
        Level::Medium => {}
    }

    let subject = subject_words(story);
    let dependents = all
        .iter()
        .filter(|other| other.id != story.id)
        .filter(|other| {
            let other_text = story_text(other);
            other_text.split_whitespace().any(|w| subject.contains(w))
        })
        .count();
    score += i64::from(DEPENDENT_BONUS) * dependents as i64;

    u32::try_from(score).unwrap_or(0).max(MIN_SCORE)
}

/// MoSCoW category for a score. Healthcare and banking need higher scores
/// for every category.
pub fn moscow_category(score: u32, domain: DomainId) -> Moscow {
    let (must, should, could) = match domain {
        DomainId::Healthcare | DomainId::Banking => (80, 60, 40),
        _ => (75, 55, 35),
    };
    if score >= must {
        Moscow::Must
    } else if score >= should {
        Moscow::Should
    } else if score >= could {
        Moscow::Could
    } else {
        Moscow::Wont
    }
}

fn justification(category: Moscow, text: &str, domain: DomainId) -> String {
    let specific: &[(&str, &str)] = match (category, domain) {
        (Moscow::Must, DomainId::Ecommerce) => &[
            ("login", "Foundation requirement: shoppers authenticate before any personalised feature."),
            ("search", "Core business function: shoppers must find products before they can buy."),
            ("cart", "Essential to the shopping flow: collects purchase intent."),
            ("checkout", "Revenue-generating capability that directly drives business results."),
        ],
        (Moscow::Must, DomainId::Healthcare) => &[
            ("login", "Security foundation: patient data requires controlled access."),
            ("patient", "Patient management is fundamental to healthcare operations."),
            ("medical", "Clinical data access is essential for patient care."),
            ("appointment", "Scheduling is fundamental to care delivery."),
        ],
        _ => &[],
    };
    specific
        .iter()
        .find(|(word, _)| mentions(text, &[*word]))
        .map(|(_, reason)| reason.to_string())
        .unwrap_or_else(|| category.justification().to_string())
}

fn dependencies(story: &UserStory, all: &[UserStory], domain: DomainId) -> Vec<String> {
    let text = story_text(story);
    let mut out: Vec<String> = Vec::new();
    for (action, prereqs) in dependency_rules(domain) {
        if !mentions(&text, &[*action]) {
            continue;
        }
        for other in all.iter().filter(|o| o.id != story.id) {
            let other_text = story_text(other);
            if prereqs.iter().any(|p| mentions(&other_text, &[*p])) && !out.contains(&other.id) {
                out.push(other.id.clone());
            }
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

/// Prioritise `stories`, highest score first. Ties keep story order.
pub fn prioritize(stories: &[UserStory], domain: DomainId) -> Vec<Prioritized> {
    let mut out: Vec<Prioritized> = stories
        .iter()
        .map(|story| {
            let text = story_text(story);
            let score = priority_score(story, domain, stories);
            let category = moscow_category(score, domain);
            Prioritized {
                story_id: story.id.clone(),
                title: story.title.clone(),
                score,
                category,
                rank: 0,
                complexity: estimate_complexity(&text),
                business_value: business_value(&text, domain),
                technical_risk: technical_risk(&text),
                justification: justification(category, &text, domain),
                depends_on: dependencies(story, stories, domain),
            }
        })
        .collect();

    out.sort_by(|a, b| b.score.cmp(&a.score));
    for (i, p) in out.iter_mut().enumerate() {
        p.rank = i + 1;
    }
    debug!(%domain, stories = out.len(), "stories prioritised");
    out
}

/// Story count per category, in MoSCoW order.
pub fn distribution(priorities: &[Prioritized]) -> Vec<(Moscow, usize)> {
    Moscow::ALL
        .iter()
        .map(|&m| (m, priorities.iter().filter(|p| p.category == m).count()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn story(id: &str, title: &str, description: &str) -> UserStory {
        UserStory {
            id: id.into(),
            title: title.into(),
            description: description.into(),
            acceptance_criteria: Vec::new(),
        }
    }

    #[test]
    fn complexity_follows_wording() {
        assert_eq!(estimate_complexity("Integrate the payment gateway"), Level::High);
        assert_eq!(estimate_complexity("Schedule weekly exports"), Level::Medium);
        assert_eq!(estimate_complexity("View my profile"), Level::Low);
        assert_eq!(estimate_complexity("Something unusual"), Level::Medium);
    }

    #[test]
    fn critical_domains_use_stricter_thresholds() {
        assert_eq!(moscow_category(78, DomainId::Ecommerce), Moscow::Must);
        assert_eq!(moscow_category(78, DomainId::Healthcare), Moscow::Should);
        assert_eq!(moscow_category(38, DomainId::Banking), Moscow::Wont);
        assert_eq!(moscow_category(38, DomainId::Crm), Moscow::Could);
    }

    #[test]
    fn ecommerce_search_outranks_reviews() {
        let stories = vec![
            story("US-001", "Customer Reviews", "As a shopper, I want to leave feedback and a rating."),
            story("US-002", "Product Search", "As a shopper, I want to search the catalogue."),
        ];
        let ranked = prioritize(&stories, DomainId::Ecommerce);
        assert_eq!(ranked[0].story_id, "US-002");
        assert_eq!(ranked[0].rank, 1);
        assert_eq!(ranked[0].category, Moscow::Must);
        assert_eq!(ranked[1].rank, 2);
        assert!(ranked[0].score > ranked[1].score);
    }

    #[test]
    fn floor_and_dependencies() {
        let stories = vec![
            story("US-001", "Shopping Cart", "As a shopper, I want to keep items in a cart."),
            story("US-002", "Checkout", "As a shopper, I want to pay for my cart at checkout."),
        ];
        let ranked = prioritize(&stories, DomainId::Ecommerce);
        let checkout = ranked.iter().find(|p| p.story_id == "US-002").expect("checkout");
        assert_eq!(checkout.depends_on, vec!["US-001".to_string()]);

        let lone = vec![story("US-001", "Misc", "Nothing here.")];
        assert_eq!(priority_score(&lone[0], DomainId::Generic, &lone), MIN_SCORE);
    }

    #[test]
    fn distribution_counts_every_category() {
        let stories = vec![
            story("US-001", "Patient Registration", "As a patient, I want to register online."),
            story("US-002", "Misc", "Nothing here."),
        ];
        let ranked = prioritize(&stories, DomainId::Healthcare);
        let dist = distribution(&ranked);
        assert_eq!(dist.len(), 4);
        assert_eq!(dist.iter().map(|(_, n)| n).sum::<usize>(), 2);
        assert_eq!(dist[0], (Moscow::Must, 1));
        assert_eq!(ranked[0].justification, "Patient management is fundamental to healthcare operations.");
    }
}
