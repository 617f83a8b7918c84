//! Entity extraction from segmented input.
//!
//! Each extractor takes the free text of its own section (never another
//! section's) and falls back to the domain profile when the text is too
//! sparse to use. Fallbacks are marked with [`Provenance::DomainDefault`]
//! rather than reported as errors.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use reqdraft_domain::{DomainProfile, profile};
use reqdraft_shared::{
    DomainId, Epic, Kpi, Level, Objective, Provenance, Risk, RuleSource, ValidationMode,
    ValidationRule,
};
use reqdraft_text::{
    comparison_key, dedupe_case_insensitive, ensure_period, lowercase_first, segment_text,
    sentence_case, split_list, strip_enumerators, strip_terminal_punct, title_from,
};

use crate::scope::{is_budget_like, strip_excluded};

/// Source text shorter than this (in characters, trimmed) is treated as absent.
pub const MIN_SOURCE_CHARS: usize = 20;

pub const MAX_EPICS: usize = 8;
const MAX_RISKS: usize = 8;

/// A validation item needs at least this many words to count as a rule.
pub const MIN_RULE_WORDS: usize = 3;

pub const DEFAULT_OBJECTIVE_EPIC: &str = "Objective-Driven Operations";
pub const DEFAULT_SCOPE_EPIC: &str = "Scope-Aligned Features";

fn is_sparse(text: &str) -> bool {
    text.trim().chars().count() < MIN_SOURCE_CHARS
}

// ---------------------------------------------------------------------------
// Shared item helpers
// ---------------------------------------------------------------------------

/// Segmented, budget-free, deduplicated items of a block.
///
/// When a block is a single comma-separated line it is split on commas.
pub fn list_items(text: &str) -> Vec<String> {
    let mut items: Vec<String> = segment_text(text)
        .into_iter()
        .filter(|item| !is_budget_like(item))
        .collect();
    if items.len() == 1 && items[0].contains(',') {
        items = split_list(&items[0])
            .into_iter()
            .filter(|piece| piece.chars().count() >= 3)
            .collect();
    }
    dedupe_case_insensitive(items.into_iter().filter(|item| !is_budget_like(item)))
}

fn objective_items(text: &str) -> Vec<String> {
    dedupe_case_insensitive(segment_text(text).into_iter().filter(|item| !is_budget_like(item)))
}

const STOP_WORDS: &[&str] = &[
    "increase", "improve", "reduce", "enable", "support", "provide", "ensure", "management",
    "manage", "system", "process", "processes", "through", "within", "across", "their", "with",
    "from", "into", "that", "this", "will", "should", "must", "shall", "more", "less", "than",
    "data", "based", "using", "able", "each", "every", "time", "all",
];

/// Lowercase words of four or more letters, minus connective and verb filler.
fn content_words(text: &str) -> HashSet<String> {
    comparison_key(text)
        .split_whitespace()
        .filter(|w| w.chars().count() >= 4 && !STOP_WORDS.contains(w))
        .map(|w| w.trim_end_matches('s').to_string())
        .collect()
}

fn overlap(a: &HashSet<String>, b: &HashSet<String>) -> usize {
    a.intersection(b).count()
}

/// Title text for use inside a sentence: acronyms kept, other words lowercased.
fn phrase(title: &str) -> String {
    title
        .split_whitespace()
        .map(|w| {
            let letters: Vec<char> = w.chars().filter(|c| c.is_alphabetic()).collect();
            if letters.len() >= 2 && letters.iter().all(|c| c.is_uppercase()) {
                w.to_string()
            } else {
                w.to_lowercase()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

// ---------------------------------------------------------------------------
// Objective phrasing
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Raise,
    Lower,
    Deliver,
}

/// Split an objective into its direction and the thing being moved, with any
/// numeric target ("by 20%", "to 95%") removed.
fn objective_subject(item: &str) -> (Direction, String) {
    static VERB_RE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(
            r"(?i)^(increase|improve|grow|boost|raise|enhance|maximi[sz]e|accelerate|expand|strengthen|reduce|decrease|minimi[sz]e|cut|lower|eliminate|shorten|avoid|prevent)\s+(.+)$",
        )
        .expect("valid regex")
    });
    static TARGET_RE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"(?i)\s+(?:by|to|from|within|in|under|below|above)\s+(?:at least\s+|over\s+)?[\d$€£₹].*$")
            .expect("valid regex")
    });

    let base = strip_terminal_punct(item);
    let Some(caps) = VERB_RE.captures(&base) else {
        return (Direction::Deliver, lowercase_first(&base));
    };

    let verb = caps[1].to_ascii_lowercase();
    let subject = TARGET_RE.replace(&caps[2], "").trim().to_string();
    let direction = match verb.as_str() {
        "reduce" | "decrease" | "minimise" | "minimize" | "cut" | "lower" | "eliminate"
        | "shorten" | "avoid" | "prevent" => Direction::Lower,
        _ => Direction::Raise,
    };
    (direction, subject)
}

fn hypothesis(item: &str, outcome: &str) -> String {
    let (direction, subject) = objective_subject(item);
    match direction {
        Direction::Raise => format!("Improving {subject} will increase {outcome}."),
        Direction::Lower => format!("Reducing {subject} will increase {outcome}."),
        Direction::Deliver => format!("Delivering {subject} will increase {outcome}."),
    }
}

// ---------------------------------------------------------------------------
// Objectives
// ---------------------------------------------------------------------------

/// One objective per segmented item, each with a templated hypothesis.
pub fn extract_objectives(objectives_text: &str, domain: DomainId) -> Vec<Objective> {
    let p = profile(domain);
    let items = objective_items(objectives_text);

    if is_sparse(objectives_text) || items.is_empty() {
        debug!(%domain, "objectives too sparse, using domain defaults");
        return p
            .objectives
            .iter()
            .enumerate()
            .map(|(i, statement)| Objective {
                id: format!("OBJ-{}", i + 1),
                statement: ensure_period(statement),
                hypothesis: hypothesis(statement, p.outcome),
                provenance: Provenance::DomainDefault,
            })
            .collect();
    }

    items
        .iter()
        .enumerate()
        .map(|(i, item)| Objective {
            id: format!("OBJ-{}", i + 1),
            statement: ensure_period(&sentence_case(item)),
            hypothesis: hypothesis(item, p.outcome),
            provenance: Provenance::Extracted,
        })
        .collect()
}

// ---------------------------------------------------------------------------
// EPICs
// ---------------------------------------------------------------------------

/// Accounting-style functional area used for area-scoped EPIC IDs.
#[derive(Debug)]
struct FunctionalArea {
    code: &'static str,
    name: &'static str,
    /// Accepted forms of an explicit `Label:` prefix.
    labels: &'static [&'static str],
    /// Phrases that switch area grouping on.
    strong: &'static [&'static str],
    /// Phrases that assign an area once grouping is on.
    weak: &'static [&'static str],
}

static AREAS: &[FunctionalArea] = &[
    FunctionalArea {
        code: "AP",
        name: "Accounts Payable",
        labels: &["ap", "accounts payable", "payables"],
        strong: &["accounts payable", "payables", "vendor invoice", "vendor invoices"],
        weak: &["vendor", "vendors", "purchase order", "supplier"],
    },
    FunctionalArea {
        code: "AR",
        name: "Accounts Receivable",
        labels: &["ar", "accounts receivable", "receivables"],
        strong: &["accounts receivable", "receivables"],
        weak: &["collections", "customer invoice", "customer invoices", "dunning"],
    },
    FunctionalArea {
        code: "GL",
        name: "General Ledger",
        labels: &["gl", "general ledger", "ledger"],
        strong: &["general ledger", "journal entries", "journal entry"],
        weak: &["ledger", "journal", "journals", "period close", "month end close"],
    },
    FunctionalArea {
        code: "BANK",
        name: "Banking and Cash",
        labels: &["bank", "banking", "cash", "treasury"],
        strong: &["bank reconciliation", "bank reconciliations"],
        weak: &["bank", "banks", "cash management", "treasury", "bank feeds"],
    },
    FunctionalArea {
        code: "FA",
        name: "Fixed Assets",
        labels: &["fa", "fixed assets", "assets"],
        strong: &["fixed asset", "fixed assets", "depreciation"],
        weak: &["asset register", "assets"],
    },
    FunctionalArea {
        code: "REP",
        name: "Financial Reporting",
        labels: &["rep", "reporting", "reports"],
        strong: &["financial reporting", "financial statements"],
        weak: &["reporting", "reports", "dashboards"],
    },
];

fn contains_phrase(padded_key: &str, phrase: &str) -> bool {
    padded_key.contains(&format!(" {phrase} "))
}

fn area_for_label(label: &str) -> Option<&'static FunctionalArea> {
    let key = comparison_key(label);
    AREAS.iter().find(|a| a.labels.contains(&key.as_str()))
}

fn strong_area(item: &str) -> Option<&'static FunctionalArea> {
    let padded = format!(" {} ", comparison_key(item));
    AREAS.iter().find(|a| {
        item.split(|c: char| !c.is_alphanumeric()).any(|t| t == a.code)
            || a.strong.iter().any(|p| contains_phrase(&padded, p))
    })
}

fn weak_area(item: &str) -> Option<&'static FunctionalArea> {
    let padded = format!(" {} ", comparison_key(item));
    AREAS
        .iter()
        .find(|a| a.weak.iter().any(|p| contains_phrase(&padded, p)))
}

#[derive(Debug)]
struct Candidate {
    text: String,
    area: Option<&'static FunctionalArea>,
    labelled: bool,
    /// Zero-based objective index this candidate came from or links to.
    objective: Option<usize>,
    from_objective: bool,
}

/// Scope candidates, honouring `Area: item; item` label lines.
fn scope_candidates(in_scope: &str) -> Vec<Candidate> {
    static LABEL_RE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"^\s*([A-Za-z][A-Za-z &/]{0,30}?)\s*:\s*(.+)$").expect("valid regex")
    });

    let mut out = Vec::new();
    for line in in_scope.lines() {
        let line = strip_enumerators(line);
        let labelled = LABEL_RE
            .captures(&line)
            .and_then(|caps| area_for_label(&caps[1]).map(|area| (area, caps[2].to_string())));
        if let Some((area, rest)) = labelled {
            for piece in split_list(&rest.replace(';', ",")) {
                if piece.chars().count() >= 3 && !is_budget_like(&piece) {
                    out.push(Candidate {
                        text: piece,
                        area: Some(area),
                        labelled: true,
                        objective: None,
                        from_objective: false,
                    });
                }
            }
            continue;
        }

        for item in list_items(&line) {
            out.push(Candidate {
                text: item,
                area: None,
                labelled: false,
                objective: None,
                from_objective: false,
            });
        }
    }
    out
}

/// EPICs from objectives and in-scope text only.
///
/// Excluded scope is stripped before segmentation and budget-like items are
/// dropped. When accounting areas are detected, items of the same area are
/// grouped under one `EPIC-<area>-<n>`; the counter `n` is global across all
/// EPICs. Falls back to [`default_epics`] when nothing usable remains.
pub fn extract_epics(objectives_text: &str, in_scope_text: &str, domain: DomainId) -> Vec<Epic> {
    let p = profile(domain);
    let in_scope = strip_excluded(in_scope_text);

    if is_sparse(objectives_text) && is_sparse(&in_scope) {
        debug!(%domain, "objectives and scope too sparse, using default epics");
        return default_epics(domain);
    }

    let objectives = if is_sparse(objectives_text) {
        Vec::new()
    } else {
        objective_items(objectives_text)
    };
    let objective_words: Vec<HashSet<String>> =
        objectives.iter().map(|o| content_words(o)).collect();

    let mut candidates = scope_candidates(&in_scope);
    let area_mode = candidates.iter().any(|c| c.labelled || strong_area(&c.text).is_some());
    if area_mode {
        for c in candidates.iter_mut().filter(|c| c.area.is_none()) {
            c.area = strong_area(&c.text).or_else(|| weak_area(&c.text));
        }
    }

    // Link scope candidates to the objective they share the most words with.
    let mut covered = vec![false; objectives.len()];
    for c in &mut candidates {
        let words = content_words(&c.text);
        let best = objective_words
            .iter()
            .enumerate()
            .map(|(i, ow)| (i, overlap(&words, ow)))
            .filter(|&(_, n)| n > 0)
            .max_by(|a, b| a.1.cmp(&b.1).then(b.0.cmp(&a.0)));
        if let Some((i, _)) = best {
            c.objective = Some(i);
            covered[i] = true;
        }
    }

    // Objectives that no scope item covers become EPICs of their own.
    for (i, item) in objectives.iter().enumerate() {
        if covered[i] {
            continue;
        }
        let (_, subject) = objective_subject(item);
        let area = if area_mode {
            strong_area(item).or_else(|| weak_area(item))
        } else {
            None
        };
        candidates.push(Candidate {
            text: subject,
            area,
            labelled: false,
            objective: Some(i),
            from_objective: true,
        });
    }

    let epics = group_candidates(candidates, p);
    if epics.is_empty() {
        debug!(%domain, "no usable epic candidates, using default epics");
        return default_epics(domain);
    }
    epics
}

/// Group candidates into EPIC slots and number them.
fn group_candidates(candidates: Vec<Candidate>, p: &DomainProfile) -> Vec<Epic> {
    struct Slot {
        area: Option<&'static FunctionalArea>,
        items: Vec<String>,
        objective: Option<usize>,
        from_objective: bool,
    }

    let mut seen = HashSet::new();
    let mut slots: Vec<Slot> = Vec::new();
    for c in candidates {
        if c.text.trim().is_empty() || !seen.insert(comparison_key(&c.text)) {
            continue;
        }
        let existing = c.area.and_then(|area| {
            slots
                .iter_mut()
                .find(|s| s.area.is_some_and(|a| a.code == area.code))
        });
        if let Some(slot) = existing {
            slot.items.push(c.text);
            if slot.objective.is_none() {
                slot.objective = c.objective;
            }
            continue;
        }
        slots.push(Slot {
            area: c.area,
            items: vec![c.text],
            objective: c.objective,
            from_objective: c.from_objective,
        });
    }

    slots
        .into_iter()
        .take(MAX_EPICS)
        .enumerate()
        .map(|(i, slot)| {
            let n = i + 1;
            let id = match slot.area {
                Some(area) => format!("EPIC-{}-{n}", area.code),
                None => format!("EPIC-{n}"),
            };
            let title = match (slot.area, slot.items.len()) {
                (Some(area), len) if len > 1 => area.name.to_string(),
                _ => title_from(&slot.items[0], 6),
            };
            let objective_ref = slot.objective.map(|o| format!("OBJ-{}", o + 1));
            build_epic(
                id,
                slot.area.map(|a| a.code.to_string()),
                title,
                &slot.items,
                objective_ref,
                slot.from_objective,
                p,
            )
        })
        .collect()
}

fn build_epic(
    id: String,
    area: Option<String>,
    title: String,
    items: &[String],
    objective_ref: Option<String>,
    from_objective: bool,
    p: &DomainProfile,
) -> Epic {
    let subject = phrase(&title);
    let audience = p
        .stakeholders
        .first()
        .map(|s| s.to_lowercase())
        .unwrap_or_else(|| "business users".to_string());

    let problem = if from_objective {
        format!("There is no dependable capability today to improve {subject}.")
    } else {
        format!(
            "{title} is handled through manual steps and disconnected tools, which delays work and hides status from {audience}."
        )
    };
    let value = format!("Gives {audience} a consistent way to handle {subject}, supporting {}.", p.outcome);

    let mut capabilities: Vec<String> = items.iter().map(|i| ensure_period(&sentence_case(i))).collect();
    if items.len() == 1 {
        capabilities.push(format!("Capture and maintain {subject} records with a full audit history."));
        capabilities.push(format!("Track {subject} status and exceptions in operational views."));
    }

    let mut acceptance = vec![
        format!(
            "A {} can complete {subject} end to end without manual workarounds.",
            p.primary_persona()
        ),
        format!("{title} data passes all applicable validation rules before it is saved."),
    ];
    acceptance.push(match &objective_ref {
        Some(obj) => format!("Progress on {subject} is measured against {obj}."),
        None => format!("{title} activity is visible in operational reporting."),
    });

    Epic {
        id,
        area,
        title,
        problem,
        value,
        capabilities,
        constraints: vec![format!(
            "Operates within the {} security and compliance baseline.",
            p.id.label()
        )],
        acceptance,
        objective_ref,
        provenance: Provenance::Extracted,
    }
}

/// The two EPICs used when objectives and scope give nothing to work with.
pub fn default_epics(domain: DomainId) -> Vec<Epic> {
    let p = profile(domain);
    let audience = p
        .stakeholders
        .first()
        .map(|s| s.to_lowercase())
        .unwrap_or_else(|| "business users".to_string());
    let baseline = format!(
        "Operates within the {} security and compliance baseline.",
        p.id.label()
    );

    vec![
        Epic {
            id: "EPIC-1".into(),
            area: None,
            title: DEFAULT_OBJECTIVE_EPIC.into(),
            problem: "Business objectives are not yet broken down into deliverable capabilities.".into(),
            value: format!("Connects day-to-day work of {audience} to {}.", p.outcome),
            capabilities: p.objectives.iter().map(|o| ensure_period(o)).collect(),
            constraints: vec![baseline.clone()],
            acceptance: vec![
                "Each business objective is traced to at least one delivered capability.".into(),
                "Objective progress is reported through the agreed KPIs.".into(),
            ],
            objective_ref: Some("OBJ-1".into()),
            provenance: Provenance::DomainDefault,
        },
        Epic {
            id: "EPIC-2".into(),
            area: None,
            title: DEFAULT_SCOPE_EPIC.into(),
            problem: "The functional scope has not been captured in enough detail to plan delivery.".into(),
            value: format!("Delivers the core {} capabilities expected by {audience}.", p.id.label()),
            capabilities: p.scope.iter().map(|s| ensure_period(s)).collect(),
            constraints: vec![baseline],
            acceptance: vec![
                "Each in-scope capability is available to its primary users.".into(),
                "Scope boundaries are confirmed with stakeholders before build.".into(),
            ],
            objective_ref: None,
            provenance: Provenance::DomainDefault,
        },
    ]
}

/// Reference the validation rules relevant to each EPIC in its constraints.
///
/// Rules sharing vocabulary with the EPIC are listed; an EPIC with no such
/// rule references the first three.
pub fn attach_validations(epics: &mut [Epic], rules: &[ValidationRule]) {
    if rules.is_empty() {
        return;
    }
    let rule_words: Vec<HashSet<String>> = rules.iter().map(|r| content_words(&r.text)).collect();

    for epic in epics.iter_mut() {
        let mut words = content_words(&epic.title);
        for c in &epic.capabilities {
            words.extend(content_words(c));
        }
        let mut ids: Vec<&str> = rules
            .iter()
            .zip(&rule_words)
            .filter(|(_, rw)| overlap(&words, rw) > 0)
            .map(|(r, _)| r.id.as_str())
            .collect();
        if ids.is_empty() {
            ids = rules.iter().take(3).map(|r| r.id.as_str()).collect();
        }
        epic.constraints
            .push(format!("Subject to validation rules {}.", ids.join(", ")));
    }
}

// ---------------------------------------------------------------------------
// KPIs
// ---------------------------------------------------------------------------

struct MetricTemplate {
    triggers: &'static [&'static str],
    name: &'static str,
    formula: &'static str,
    frequency: &'static str,
}

static METRICS: &[MetricTemplate] = &[
    MetricTemplate {
        triggers: &["conversion", "convert"],
        name: "Conversion Rate",
        formula: "Converted records / Qualified records x 100",
        frequency: "Monthly",
    },
    MetricTemplate {
        triggers: &["retention", "retain", "churn", "renewal"],
        name: "Retention Rate",
        formula: "Customers retained / Customers at period start x 100",
        frequency: "Monthly",
    },
    MetricTemplate {
        triggers: &["satisfaction", "csat", "nps", "experience"],
        name: "Customer Satisfaction Score",
        formula: "Average post-interaction survey score",
        frequency: "Quarterly",
    },
    MetricTemplate {
        triggers: &["fraud"],
        name: "Fraud Loss Rate",
        formula: "Fraud losses / Transaction value x 100",
        frequency: "Monthly",
    },
    MetricTemplate {
        triggers: &["time", "cycle", "turnaround", "faster", "speed", "wait", "delay", "latency", "backlog"],
        name: "Cycle Time",
        formula: "Median elapsed time from request to completion",
        frequency: "Weekly",
    },
    MetricTemplate {
        triggers: &["cost", "expense", "spend"],
        name: "Cost per Transaction",
        formula: "Total operating cost / Transactions processed",
        frequency: "Monthly",
    },
    MetricTemplate {
        triggers: &["revenue", "sales", "growth", "upsell", "order value"],
        name: "Revenue Growth",
        formula: "(Current period revenue - Prior period revenue) / Prior period revenue x 100",
        frequency: "Monthly",
    },
    MetricTemplate {
        triggers: &["error", "accuracy", "accurate", "quality", "defect"],
        name: "Accuracy Rate",
        formula: "Records without errors / Total records x 100",
        frequency: "Monthly",
    },
    MetricTemplate {
        triggers: &["adoption", "usage", "engagement", "self-service", "digital"],
        name: "Adoption Rate",
        formula: "Active users / Eligible users x 100",
        frequency: "Monthly",
    },
    MetricTemplate {
        triggers: &["compliance", "compliant", "audit", "regulatory"],
        name: "Compliance Rate",
        formula: "Controls passed / Controls tested x 100",
        frequency: "Quarterly",
    },
];

fn metric_for(statement: &str) -> Option<&'static MetricTemplate> {
    let key = comparison_key(statement);
    let words: Vec<&str> = key.split_whitespace().collect();
    let padded = format!(" {key} ");
    METRICS.iter().find(|m| {
        m.triggers.iter().any(|t| {
            if t.contains(' ') {
                padded.contains(&format!(" {t} "))
            } else {
                words.iter().any(|w| w.starts_with(t))
            }
        })
    })
}

fn target_for(statement: &str, direction: Direction) -> String {
    static PERCENT_RE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"(?i)(\d+(?:\.\d+)?)\s*(?:%|percent)").expect("valid regex")
    });

    match PERCENT_RE.captures(statement) {
        Some(caps) => match direction {
            Direction::Lower => format!("-{}% vs baseline", &caps[1]),
            _ => format!("+{}% vs baseline", &caps[1]),
        },
        None => "Measurable improvement vs baseline within 2 quarters".to_string(),
    }
}

/// One KPI per objective, traced back to the objective and its EPICs.
///
/// When every objective is a domain default the domain's KPI set is used
/// instead, traced to objectives and EPICs by position.
pub fn extract_kpis(objectives: &[Objective], epics: &[Epic], domain: DomainId) -> Vec<Kpi> {
    let p = profile(domain);

    if objectives.iter().all(|o| o.provenance == Provenance::DomainDefault) {
        return p
            .kpis
            .iter()
            .enumerate()
            .map(|(i, t)| {
                let traces = objectives
                    .get(i)
                    .map(|o| o.id.clone())
                    .into_iter()
                    .chain(epics.get(i).map(|e| e.id.clone()))
                    .collect();
                Kpi {
                    id: format!("KPI-{}", i + 1),
                    name: t.name.to_string(),
                    formula: t.formula.to_string(),
                    target: t.target.to_string(),
                    frequency: t.frequency.to_string(),
                    traces,
                }
            })
            .collect();
    }

    let mut used = HashSet::new();
    objectives
        .iter()
        .enumerate()
        .map(|(i, obj)| {
            let (direction, subject) = objective_subject(&obj.statement);
            let (mut name, formula, frequency) = match metric_for(&obj.statement) {
                Some(m) => (m.name.to_string(), m.formula.to_string(), m.frequency),
                None => (
                    format!("{} Attainment", title_from(&subject, 4)),
                    "Achieved outcome / Planned outcome x 100".to_string(),
                    "Monthly",
                ),
            };
            if !used.insert(name.clone()) {
                name = format!("{name} ({})", title_from(&subject, 3));
                used.insert(name.clone());
            }

            let mut traces = vec![obj.id.clone()];
            traces.extend(
                epics
                    .iter()
                    .filter(|e| e.objective_ref.as_deref() == Some(obj.id.as_str()))
                    .map(|e| e.id.clone()),
            );

            Kpi {
                id: format!("KPI-{}", i + 1),
                name,
                formula,
                target: target_for(&obj.statement, direction),
                frequency: frequency.to_string(),
                traces,
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Risks
// ---------------------------------------------------------------------------

struct RiskSpec {
    title: &'static str,
    description: &'static str,
    likelihood: Level,
    impact: Level,
    mitigation: &'static str,
    contingency: &'static str,
}

impl RiskSpec {
    fn to_risk(&self, n: usize) -> Risk {
        Risk {
            id: format!("RISK-{n}"),
            title: self.title.into(),
            description: self.description.into(),
            likelihood: self.likelihood,
            impact: self.impact,
            mitigation: self.mitigation.into(),
            contingency: self.contingency.into(),
        }
    }
}

static INTEGRATION_RISK: RiskSpec = RiskSpec {
    title: "Third-party integration dependencies",
    description: "In-scope capabilities depend on external systems or APIs whose availability and contracts are outside the project's control.",
    likelihood: Level::Medium,
    impact: Level::High,
    mitigation: "Agree interface contracts early and test against sandboxes from the first sprint.",
    contingency: "Use stubbed interfaces or file-based exchange until the dependency is ready.",
};

static MIGRATION_RISK: RiskSpec = RiskSpec {
    title: "Data migration quality",
    description: "Legacy data may be incomplete or inconsistent and fail validation when migrated.",
    likelihood: Level::Medium,
    impact: Level::Medium,
    mitigation: "Profile source data and run trial migrations with reconciliation reports.",
    contingency: "Migrate in waves and keep the legacy system read-only until sign-off.",
};

static BASELINE_RISKS: [RiskSpec; 2] = [
    RiskSpec {
        title: "Scope creep",
        description: "New requests are added during delivery without re-planning.",
        likelihood: Level::Medium,
        impact: Level::Medium,
        mitigation: "Baseline scope in this BRD and route changes through change control.",
        contingency: "Defer lower-priority items to a later release.",
    },
    RiskSpec {
        title: "Low user adoption",
        description: "Users keep existing workarounds and the expected benefits are not realised.",
        likelihood: Level::Medium,
        impact: Level::High,
        mitigation: "Involve key users in design reviews and plan training before go-live.",
        contingency: "Run targeted adoption campaigns and assign business champions.",
    },
];

/// Domain risk templates, risks triggered by scope wording, and one risk per
/// stated constraint.
pub fn extract_risks(scope_text: &str, constraints_text: &str, domain: DomainId) -> Vec<Risk> {
    let p = profile(domain);
    let mut risks: Vec<Risk> = Vec::new();

    for t in p.risks {
        let n = risks.len() + 1;
        risks.push(Risk {
            id: format!("RISK-{n}"),
            title: t.title.into(),
            description: t.description.into(),
            likelihood: t.likelihood,
            impact: t.impact,
            mitigation: t.mitigation.into(),
            contingency: t.contingency.into(),
        });
    }

    let scope_key = format!(" {} ", comparison_key(&strip_excluded(scope_text)));
    let mentions = |words: &[&str]| words.iter().any(|w| scope_key.contains(&format!(" {w}")));
    if mentions(&["integrat", "api", "interface", "third party", "third-party", "external"]) {
        risks.push(INTEGRATION_RISK.to_risk(risks.len() + 1));
    }
    if mentions(&["migrat", "legacy", "conversion of"]) {
        risks.push(MIGRATION_RISK.to_risk(risks.len() + 1));
    }

    for item in list_items(constraints_text) {
        let n = risks.len() + 1;
        risks.push(Risk {
            id: format!("RISK-{n}"),
            title: format!("Constraint: {}", title_from(&item, 6)),
            description: format!("Delivery is bound by the stated constraint: {}", ensure_period(&item)),
            likelihood: Level::Medium,
            impact: Level::Medium,
            mitigation: "Confirm the constraint with its owner during planning and design within it.".into(),
            contingency: "Re-plan the affected scope through change control.".into(),
        });
    }

    for spec in &BASELINE_RISKS {
        if risks.len() >= 2 {
            break;
        }
        risks.push(spec.to_risk(risks.len() + 1));
    }

    risks.truncate(MAX_RISKS);
    risks
}

// ---------------------------------------------------------------------------
// Validation rules
// ---------------------------------------------------------------------------

/// Whether text is fixture or placeholder phrasing rather than a real rule.
pub fn is_placeholder(text: &str) -> bool {
    static PLACEHOLDER_RES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
        [
            r"(?i)\bshould\s+(?:show|display|list|include|contain|have)\b.*\bvalidations?\b",
            r"(?i)\b(?:placeholder|lorem ipsum|tbd|tbc|todo|to be (?:defined|determined|confirmed))\b",
            r"(?i)\b(?:sample|example|dummy|test|generic)\s+validations?\b",
            r"(?i)\b[a-z]+-specific\s+validation\s+(?:criteria|rules)\b",
            r"(?i)\bnot\s+generic\b",
            r"(?i)\bvalidation criteria (?:here|go here|to follow)\b",
            r"(?i)^\s*(?:n/?a|none|nil|-+|\.+)\s*$",
        ]
        .iter()
        .map(|p| Regex::new(p).expect("valid regex"))
        .collect()
    });

    PLACEHOLDER_RES.iter().any(|re| re.is_match(text))
}

fn is_specific(item: &str) -> bool {
    item.split_whitespace().count() >= MIN_RULE_WORDS
}

/// Prefix with "Enforce" unless the rule already opens with enforce,
/// validate or require. Original casing is kept and a period ensured.
pub fn normalize_rule(item: &str) -> String {
    static VERB_RE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"(?i)^(?:enforce|validate|require)s?\b").expect("valid regex")
    });

    let body = strip_terminal_punct(item);
    let text = if VERB_RE.is_match(&body) {
        sentence_case(&body)
    } else {
        format!("Enforce {body}")
    };
    ensure_period(&text)
}

/// Validation rules from user text, or the domain's canned rules.
///
/// In [`ValidationMode::Auto`] placeholder items and items below
/// [`MIN_RULE_WORDS`] are dropped; if nothing survives the domain rules
/// apply. [`ValidationMode::UserOnly`] keeps every segmented item.
pub fn extract_validations(text: &str, domain: DomainId, mode: ValidationMode) -> Vec<ValidationRule> {
    let items: Vec<String> = match mode {
        ValidationMode::DomainDefaults => Vec::new(),
        ValidationMode::UserOnly => segment_text(text),
        ValidationMode::Auto => {
            if is_placeholder(text) && segment_text(text).len() <= 1 {
                Vec::new()
            } else {
                segment_text(text)
                    .into_iter()
                    .filter(|item| !is_placeholder(item) && is_specific(item))
                    .collect()
            }
        }
    };

    let (texts, source) = if items.is_empty() {
        debug!(%domain, ?mode, "using domain validation rules");
        let rules = profile(domain).validation_rules.iter().map(|r| ensure_period(r));
        (dedupe_case_insensitive(rules), RuleSource::DomainDefault)
    } else {
        let rules = items.iter().map(|i| normalize_rule(i));
        (dedupe_case_insensitive(rules), RuleSource::User)
    };

    texts
        .into_iter()
        .enumerate()
        .map(|(i, text)| ValidationRule {
            id: format!("V-{:03}", i + 1),
            text,
            source,
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Stakeholders and business requirements
// ---------------------------------------------------------------------------

pub fn stakeholders(domain: DomainId) -> Vec<String> {
    profile(domain).stakeholders.iter().map(|s| s.to_string()).collect()
}

const LEADING_VERBS: &[&str] = &[
    "allow", "enable", "support", "provide", "capture", "track", "manage", "send", "generate",
    "integrate", "record", "display", "notify", "calculate", "validate", "store", "create",
    "update", "delete", "search", "export", "import", "report", "process", "route", "score",
    "sync", "synchronize", "automate", "maintain", "handle", "schedule", "approve", "allocate",
    "verify", "issue", "collect", "reconcile", "publish", "book", "assign", "monitor", "offer",
];

/// Rewrite a requirement item as "The system shall ..." once.
pub fn to_requirement_sentence(item: &str) -> String {
    static SHALL_RE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"(?i)^the system (?:shall|must|should|will)\b").expect("valid regex")
    });
    static TO_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"(?i)^to\s+").expect("valid regex"));
    static ABILITY_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"(?i)\bability to\b").expect("valid regex"));

    let trimmed = item.trim();
    if SHALL_RE.is_match(trimmed) {
        return ensure_period(&sentence_case(trimmed));
    }

    let body = TO_RE.replace(trimmed, "");
    let body = ABILITY_RE.replace_all(&body, "be able to");
    let body = lowercase_first(&strip_terminal_punct(&body));
    let first = body
        .split_whitespace()
        .next()
        .map(|w| w.to_ascii_lowercase())
        .unwrap_or_default();

    if first == "be" || LEADING_VERBS.contains(&first.as_str()) {
        format!("The system shall {body}.")
    } else {
        format!("The system shall support {body}.")
    }
}

/// Business requirement sentences from the brief-requirements block.
///
/// This block is rendered as its own section and never feeds EPICs.
pub fn business_requirements(text: &str, domain: DomainId) -> (Vec<String>, Provenance) {
    let items = list_items(text);
    if items.is_empty() {
        let defaults = profile(domain)
            .scope
            .iter()
            .map(|s| to_requirement_sentence(s))
            .collect();
        return (defaults, Provenance::DomainDefault);
    }
    let sentences = items.iter().map(|i| to_requirement_sentence(i));
    (dedupe_case_insensitive(sentences), Provenance::Extracted)
}
