//! FRD derivation from parsed BRD EPICs.
//!
//! Each EPIC yields one functional requirement and one user story. The
//! acceptance and validation criteria come from the first theme written for
//! the document's domain whose triggers match the EPIC (title first, then its
//! capabilities), so a billing EPIC and an onboarding EPIC never share
//! boilerplate. EPICs that
//! match no theme get criteria parameterised by their own title.

use std::collections::HashSet;

use tracing::debug;

use reqdraft_domain::{DomainProfile, profile};
use reqdraft_shared::{
    DomainId, Epic, FunctionalRequirement, UserStory, ValidationRule,
};
use reqdraft_text::{comparison_key, ensure_period, escape_html, lowercase_first, strip_terminal_punct};

use crate::assembler::{Document, DocumentKind, html_list, html_table, paragraph, validations_section};
use crate::priority::{Prioritized, distribution};

// ---------------------------------------------------------------------------
// Themes
// ---------------------------------------------------------------------------

/// Criteria shared by every EPIC about the same kind of business work.
#[derive(Debug)]
pub struct Theme {
    pub name: &'static str,
    /// Domains the criteria are written for. Empty means every domain.
    domains: &'static [DomainId],
    triggers: &'static [&'static str],
    benefit: &'static str,
    acceptance: &'static [&'static str],
    validation: &'static [&'static str],
}

static THEMES: &[Theme] = &[
    Theme {
        name: "onboarding",
        domains: &[DomainId::Telecom, DomainId::Banking, DomainId::Insurance],
        triggers: &["onboarding", "kyc", "sim", "activation", "activate", "registration", "enrolment", "enrollment", "account opening", "sign up"],
        benefit: "new customers can start using the service on the same day",
        acceptance: &[
            "Identity documents are captured and verified before the account or service is activated.",
            "Activation completes end to end within the agreed turnaround and the customer is notified.",
            "Incomplete applications are saved and can be resumed without re-entering data.",
            "Rejected applications record a reason code visible to the agent.",
        ],
        validation: &[
            "KYC documents: type, number and expiry date are mandatory; expired documents are rejected.",
            "Identity match: name and date of birth must match the verified document.",
            "SIM/ICCID or service identifier: checksum valid and not already assigned.",
            "Duplicate check: no active account exists for the same verified identity.",
            "Contact details: mobile number and email are format-validated and confirmed by OTP.",
        ],
    },
    Theme {
        name: "billing",
        domains: &[DomainId::Telecom, DomainId::Insurance, DomainId::Healthcare, DomainId::Ecommerce, DomainId::Finance, DomainId::Generic],
        triggers: &["billing", "invoice", "invoicing", "charging", "rating", "tariff", "payment", "premium", "dunning", "collection"],
        benefit: "every charge is correct and disputes are rare",
        acceptance: &[
            "Invoices are generated on the billing cycle date with itemised charges and taxes.",
            "Rated charges reconcile to source usage or transactions with no unexplained variance.",
            "Payments are allocated to open invoices and balances update immediately.",
            "Disputed charges can be raised, tracked and credited from the invoice view.",
        ],
        validation: &[
            "Rated amount: must equal quantity x applicable tariff rate, rounded to currency precision.",
            "Tax: calculated per jurisdiction rules and shown separately on each invoice line.",
            "Invoice totals: sum of line items plus tax minus credits; negative totals are rejected.",
            "Payment amount: positive, in the account currency and not exceeding the open balance without approval.",
            "Billing cycle: each charge belongs to exactly one open cycle; closed cycles are read-only.",
        ],
    },
    Theme {
        name: "claims",
        domains: &[DomainId::Insurance],
        triggers: &["claim", "fnol", "settlement", "loss"],
        benefit: "claims are settled quickly and fairly",
        acceptance: &[
            "First notice of loss captures all mandatory claim details in one session.",
            "Claims are triaged and assigned to an adjuster based on complexity.",
            "Settlement approvals follow authority limits and the approval hierarchy.",
        ],
        validation: &[
            "Policy: must be active on the date of loss.",
            "Loss date: not in the future and not before policy inception.",
            "Claim amount: positive and not above the coverage limit without referral.",
            "Supporting documents: at least one attachment required before assessment.",
        ],
    },
    Theme {
        name: "policy",
        domains: &[DomainId::Insurance],
        triggers: &["policy", "policies", "underwriting", "quote", "quotation", "renewal", "coverage"],
        benefit: "cover is issued accurately and on time",
        acceptance: &[
            "Quotes are produced with accurate rating within 30 seconds.",
            "Underwriting rules are applied consistently and referrals are routed to an underwriter.",
            "Policy documents are issued on bind and stored against the policy record.",
        ],
        validation: &[
            "Effective date: not earlier than today and before expiry date.",
            "Sum insured: within product minimum and maximum limits.",
            "Risk questions: all mandatory underwriting answers present before quote.",
            "Premium: recalculated whenever a rating factor changes.",
        ],
    },
    Theme {
        name: "patient records",
        domains: &[DomainId::Healthcare],
        triggers: &["patient", "medical record", "medical records", "ehr", "emr", "clinical", "health record"],
        benefit: "clinicians have a complete and trusted record at the point of care",
        acceptance: &[
            "Patient records can be searched by name, date of birth or record number.",
            "Clinical entries are signed and time-stamped by the author.",
            "Access to each record is logged with user, time and reason.",
        ],
        validation: &[
            "Patient name: required, 2-100 characters.",
            "Date of birth: valid date, not in the future.",
            "Medical record number: unique per facility.",
            "Record access: limited to the care team or authorised staff.",
        ],
    },
    Theme {
        name: "appointments",
        domains: &[DomainId::Healthcare],
        triggers: &["appointment", "scheduling", "schedule", "booking", "calendar"],
        benefit: "time slots are used fully and patients wait less",
        acceptance: &[
            "Available slots are shown in real time and booking confirms instantly.",
            "Reminders are sent before the appointment through the preferred channel.",
            "Cancellations free the slot for rebooking immediately.",
        ],
        validation: &[
            "Slot: within provider availability and not double-booked.",
            "Advance booking: at least 1 hour and at most 6 months ahead.",
            "Overlap: no two appointments for the same person at the same time.",
        ],
    },
    Theme {
        name: "leads",
        domains: &[DomainId::Crm],
        triggers: &["lead", "prospect", "opportunity", "opportunities", "pipeline", "deal"],
        benefit: "sales effort goes to the prospects most likely to convert",
        acceptance: &[
            "New leads are captured from every configured source with attribution.",
            "Leads are scored and routed to an owner within 5 minutes.",
            "Lead status changes are tracked through to opportunity conversion.",
        ],
        validation: &[
            "Lead source: mandatory and from the configured source list.",
            "Email: valid format and unique across open leads.",
            "Consent: marketing consent flag captured with timestamp before any outreach.",
            "Score: recalculated on every qualifying activity.",
        ],
    },
    Theme {
        name: "campaigns",
        domains: &[DomainId::Crm, DomainId::Ecommerce],
        triggers: &["campaign", "email marketing", "newsletter", "segment", "segmentation", "nurture"],
        benefit: "campaigns reach the right audience and their results are measurable",
        acceptance: &[
            "Audiences are built from saved segments and previewed before launch.",
            "Campaign sends respect consent and unsubscribe status at send time.",
            "Opens, clicks and conversions are attributed to the campaign.",
        ],
        validation: &[
            "Audience: excludes contacts without consent or with a hard bounce.",
            "Schedule: send time in the future and within the allowed window.",
            "Content: subject line and unsubscribe link are mandatory.",
        ],
    },
    Theme {
        name: "contacts",
        domains: &[DomainId::Crm, DomainId::Ecommerce, DomainId::Banking, DomainId::Telecom, DomainId::Generic],
        triggers: &["contact", "account management", "customer profile", "customer data", "customer record"],
        benefit: "customer information is complete and consistent across teams",
        acceptance: &[
            "Contacts and accounts can be created, merged and searched.",
            "Each contact shows related activities, opportunities and cases.",
            "Changes to key fields are audited.",
        ],
        validation: &[
            "Name: required; duplicates detected on email and phone.",
            "Email: valid format.",
            "Phone: E.164 format.",
            "Account hierarchy: a contact belongs to at most one primary account.",
        ],
    },
    Theme {
        name: "orders",
        domains: &[DomainId::Ecommerce, DomainId::Logistics, DomainId::Generic],
        triggers: &["order", "orders", "checkout", "cart", "basket"],
        benefit: "customers complete purchases without friction",
        acceptance: &[
            "Customers can review the cart and complete checkout in under 3 steps.",
            "Order confirmation is shown and sent immediately after payment.",
            "Orders can be tracked and cancelled before dispatch.",
        ],
        validation: &[
            "Quantity: positive integer not exceeding available stock.",
            "Shipping address: complete and serviceable postcode.",
            "Order total: recalculated after every cart change including discounts and tax.",
        ],
    },
    Theme {
        name: "catalogue",
        domains: &[DomainId::Ecommerce, DomainId::Logistics],
        triggers: &["catalog", "catalogue", "product", "inventory", "stock", "sku", "merchandising"],
        benefit: "product and stock information is accurate everywhere it is shown",
        acceptance: &[
            "Products can be created with attributes, images and pricing.",
            "Stock levels update in real time across channels.",
            "Low-stock alerts are raised at the configured threshold.",
        ],
        validation: &[
            "SKU: unique and required.",
            "Price: positive with currency precision.",
            "Stock level: never negative; adjustments require a reason code.",
        ],
    },
    Theme {
        name: "shipments",
        domains: &[DomainId::Logistics, DomainId::Ecommerce],
        triggers: &["shipment", "shipping", "delivery", "dispatch", "fleet", "warehouse", "freight", "route"],
        benefit: "goods arrive on time and their status is always known",
        acceptance: &[
            "Shipments are created with carrier, route and expected delivery date.",
            "Tracking events update shipment status in real time.",
            "Proof of delivery is captured and linked to the shipment.",
        ],
        validation: &[
            "Weight and dimensions: positive and within carrier limits.",
            "Delivery address: geocoded and serviceable.",
            "Delivery date: not earlier than dispatch date.",
        ],
    },
    Theme {
        name: "courses",
        domains: &[DomainId::Education],
        triggers: &["course", "courses", "curriculum", "grade", "grading", "learning", "student", "instructor"],
        benefit: "students progress through their courses without administrative delays",
        acceptance: &[
            "Courses can be published with sections, schedule and capacity.",
            "Students can enrol, withdraw and see their progress.",
            "Grades are recorded and published to students on release.",
        ],
        validation: &[
            "Enrolment: prerequisites met and section not over capacity.",
            "Grade: within the defined grading scale.",
            "Dates: course end date after start date.",
        ],
    },
    Theme {
        name: "ledger",
        domains: &[DomainId::Finance, DomainId::Banking],
        triggers: &["ledger", "journal", "accounts payable", "accounts receivable", "payable", "payables", "receivable", "receivables", "reconciliation", "period close", "fixed asset"],
        benefit: "the books close on time with balanced, auditable entries",
        acceptance: &[
            "Journal entries post only when debits equal credits.",
            "Reconciliations match source transactions and exceptions are listed.",
            "Period close locks postings to the closed period.",
        ],
        validation: &[
            "Journal: total debits equal total credits.",
            "GL account: active and valid for the entity.",
            "Posting date: within an open accounting period.",
            "Vendor and customer: active master record required for AP and AR documents.",
        ],
    },
    Theme {
        name: "banking transactions",
        domains: &[DomainId::Banking, DomainId::Finance],
        triggers: &["transaction", "transactions", "transfer", "transfers", "loan", "beneficiary", "card", "deposit", "withdrawal"],
        benefit: "money moves safely and customers trust the balance they see",
        acceptance: &[
            "Balances update in real time for pending and completed transactions.",
            "Transfers to new beneficiaries require verification before release.",
            "Transaction history can be filtered by date, amount and type.",
        ],
        validation: &[
            "Transfer amount: positive and within available balance and daily limits.",
            "Beneficiary account: verified before first transfer.",
            "IBAN or account number: checksum valid.",
            "High-risk transactions: step-up authentication required.",
        ],
    },
    Theme {
        name: "reporting",
        domains: &[],
        triggers: &["report", "reports", "reporting", "analytics", "dashboard", "dashboards", "insight", "insights"],
        benefit: "decisions are made on current, trusted figures",
        acceptance: &[
            "Reports can be filtered by period and business unit and exported.",
            "Figures reconcile to the underlying transactional data.",
            "Scheduled reports are delivered to subscribers on time.",
        ],
        validation: &[
            "Date range: start before end and within data retention.",
            "Filters: only values the user is authorised to see.",
            "Totals: match the sum of detail rows.",
        ],
    },
    Theme {
        name: "security",
        domains: &[],
        triggers: &["security", "access", "authentication", "login", "role", "roles", "permission", "permissions", "audit", "sso", "mfa"],
        benefit: "only the right people can see and change data",
        acceptance: &[
            "Users sign in with MFA and sessions expire after inactivity.",
            "Role changes take effect immediately and are audited.",
            "Access reviews list every user with their current roles.",
        ],
        validation: &[
            "Password: meets length and complexity policy.",
            "Account lockout: after 5 failed attempts.",
            "Role assignment: requires approver different from requester.",
        ],
    },
    Theme {
        name: "network usage",
        domains: &[DomainId::Telecom],
        triggers: &["network", "usage", "roaming", "porting", "data plan", "cdr", "bandwidth"],
        benefit: "usage is captured completely and subscribers see it promptly",
        acceptance: &[
            "Usage records are collected from the network and available within 15 minutes.",
            "Subscribers can view current usage against plan allowances.",
            "Port-in and port-out requests complete within the regulated window.",
        ],
        validation: &[
            "Usage record: unique by record ID; duplicates are discarded.",
            "MSISDN: valid national format and active on the usage date.",
            "Port request: authorization code valid and donor operator confirmed.",
        ],
    },
];

fn matches_trigger(key: &str, trigger: &str) -> bool {
    if trigger.contains(' ') {
        let padded = format!(" {key} ");
        return padded.contains(&format!(" {trigger} ")) || padded.contains(&format!(" {trigger}s "));
    }
    key.split_whitespace().any(|w| {
        w == trigger
            || w.strip_suffix('s') == Some(trigger)
            || w.strip_suffix("es") == Some(trigger)
            || (trigger.len() >= 6 && w.starts_with(trigger))
    })
}

impl Theme {
    fn applies_to(&self, domain: DomainId) -> bool {
        self.domains.is_empty() || self.domains.contains(&domain)
    }
}

fn theme_in(text: &str, domain: DomainId) -> Option<&'static Theme> {
    let key = comparison_key(text);
    THEMES
        .iter()
        .filter(|t| t.applies_to(domain))
        .find(|t| t.triggers.iter().any(|trigger| matches_trigger(&key, trigger)))
}

/// Theme for an EPIC in `domain`: its title decides first, its capabilities
/// second. Themes written for other domains are never chosen.
pub fn theme_for(epic: &Epic, domain: DomainId) -> Option<&'static Theme> {
    theme_in(&epic.title, domain).or_else(|| theme_in(&epic.capabilities.join(" "), domain))
}

// ---------------------------------------------------------------------------
// Derivation
// ---------------------------------------------------------------------------

fn article(word: &str) -> &'static str {
    match word.chars().next().map(|c| c.to_ascii_lowercase()) {
        Some('a' | 'e' | 'i' | 'o' | 'u') => "an",
        _ => "a",
    }
}

fn subject_of(title: &str) -> String {
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

/// Persona whose role overlaps the theme, else the domain's primary one.
fn persona_for(theme: Option<&Theme>, p: &DomainProfile) -> &'static str {
    theme
        .and_then(|t| {
            p.personas.iter().copied().find(|persona| {
                let key = comparison_key(persona);
                t.triggers.iter().any(|trigger| matches_trigger(&key, trigger))
            })
        })
        .unwrap_or_else(|| p.primary_persona())
}

fn rule_words(text: &str) -> HashSet<String> {
    comparison_key(text)
        .split_whitespace()
        .filter(|w| w.chars().count() >= 4)
        .map(|w| w.trim_end_matches('s').to_string())
        .collect()
}

/// One rule for the EPIC: best vocabulary overlap among the BRD's rules and
/// the domain's, or a domain rule chosen by position.
fn matching_rule(epic: &Epic, index: usize, rules: &[ValidationRule], p: &DomainProfile) -> Option<String> {
    let mut words = rule_words(&epic.title);
    for c in &epic.capabilities {
        words.extend(rule_words(c));
    }

    let candidates: Vec<String> = rules
        .iter()
        .map(|r| r.text.clone())
        .chain(p.validation_rules.iter().map(|r| ensure_period(r)))
        .collect();

    // Earlier candidates win ties, so BRD rules beat domain rules.
    let best = candidates
        .iter()
        .enumerate()
        .map(|(i, c)| (i, rule_words(c).intersection(&words).count()))
        .filter(|&(_, n)| n > 0)
        .max_by(|a, b| a.1.cmp(&b.1).then(b.0.cmp(&a.0)));

    match best {
        Some((i, _)) => Some(candidates[i].clone()),
        None if !p.validation_rules.is_empty() => {
            Some(ensure_period(p.validation_rules[index % p.validation_rules.len()]))
        }
        None => None,
    }
}

fn generic_acceptance(title: &str) -> Vec<String> {
    let subject = subject_of(title);
    vec![
        format!("{title} records can be created, viewed, updated and searched by authorised users."),
        format!("Every change to {subject} is saved with user and timestamp in the audit log."),
        format!("{title} screens respond within 3 seconds under normal load."),
    ]
}

fn generic_validation(title: &str) -> Vec<String> {
    let subject = subject_of(title);
    vec![
        format!("Mandatory {subject} fields are checked before save with field-level error messages."),
        format!("Duplicate {subject} records are detected on their business key."),
        format!("Status changes to {subject} follow the allowed transition sequence."),
    ]
}

/// One FR and one user story per EPIC, numbered `FR-001`/`US-001` in EPIC
/// order.
pub fn derive_requirements(
    epics: &[Epic],
    rules: &[ValidationRule],
    domain: DomainId,
) -> (Vec<FunctionalRequirement>, Vec<UserStory>) {
    let p = profile(domain);
    let mut requirements = Vec::with_capacity(epics.len());
    let mut stories = Vec::with_capacity(epics.len());

    for (i, epic) in epics.iter().enumerate() {
        let n = i + 1;
        let theme = theme_for(epic, domain);
        debug!(epic = %epic.id, theme = theme.map(|t| t.name).unwrap_or("generic"), "deriving requirement");

        let subject = subject_of(&epic.title);
        let (acceptance, mut validation) = match theme {
            Some(t) => (
                t.acceptance.iter().map(|s| s.to_string()).collect::<Vec<_>>(),
                t.validation.iter().map(|s| s.to_string()).collect::<Vec<_>>(),
            ),
            None => (generic_acceptance(&epic.title), generic_validation(&epic.title)),
        };
        if let Some(rule) = matching_rule(epic, i, rules, p).filter(|r| !validation.contains(r)) {
            validation.push(rule);
        }

        let highlights: Vec<String> = epic
            .capabilities
            .iter()
            .take(2)
            .map(|c| lowercase_first(&strip_terminal_punct(c)))
            .collect();
        let description = if highlights.is_empty() {
            format!("The system shall support {subject}.")
        } else {
            format!("The system shall support {subject}, including {}.", highlights.join(" and "))
        };

        let persona = persona_for(theme, p);
        let benefit = theme
            .map(|t| t.benefit.to_string())
            .unwrap_or_else(|| format!("{} improves", p.outcome));

        requirements.push(FunctionalRequirement {
            id: format!("FR-{n:03}"),
            epic_id: epic.id.clone(),
            title: epic.title.clone(),
            description,
            acceptance: acceptance.clone(),
            validation,
        });
        stories.push(UserStory {
            id: format!("US-{n:03}"),
            title: epic.title.clone(),
            description: format!(
                "As {} {persona}, I want to manage {subject} so that {benefit}.",
                article(persona)
            ),
            acceptance_criteria: acceptance,
        });
    }

    (requirements, stories)
}

// ---------------------------------------------------------------------------
// Assembly
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct FrdContent {
    pub project: String,
    pub version: u32,
    pub domain: DomainId,
    pub epics: Vec<Epic>,
    pub requirements: Vec<FunctionalRequirement>,
    pub stories: Vec<UserStory>,
    /// Rules carried over from the BRD, or the domain's when it had none.
    pub rules: Vec<ValidationRule>,
    /// MoSCoW assessment of `stories`, highest priority first.
    pub priorities: Vec<Prioritized>,
}

pub fn assemble_frd(content: &FrdContent) -> Document {
    let p = profile(content.domain);
    let mut doc = Document::new(
        DocumentKind::Frd,
        &content.project,
        content.version,
        content.domain,
        None,
    );

    let mut context = paragraph(&format!(
        "This FRD details the functional behaviour of {} derived from its BRD. Domain: {}. Channels: {}.",
        content.project.trim(),
        content.domain.label(),
        p.channels
    ));
    context.push('\n');
    context.push_str(&html_list(
        "ul",
        "frd-epics",
        content.epics.iter().map(|e| format!("{}: {}", e.id, e.title)),
    ));
    doc.push("scope-context", "Scope & Context", context);
    doc.push("stakeholders", "Stakeholders", html_list("ul", "stakeholders", p.stakeholders));
    doc.push("nfrs", "Non-functional Requirements", html_list("ul", "nfrs", p.nfrs));
    doc.push("data-model", "Data Model Highlights", html_list("ul", "data-entities", p.data_entities));
    doc.push("interfaces", "Interfaces & Integrations", html_list("ul", "interfaces", p.interfaces));
    doc.push(
        "functional-requirements",
        "Functional Requirements",
        content.requirements.iter().map(render_requirement).collect::<Vec<_>>().join("\n"),
    );
    doc.push(
        "user-stories",
        "User Stories",
        content.stories.iter().map(render_story).collect::<Vec<_>>().join("\n"),
    );
    doc.push("prioritisation", "Requirement Prioritisation (MoSCoW)", prioritisation(&content.priorities));
    doc.push("field-validations", "Field-level Validations", validations_section(&content.rules));
    doc.push("traceability", "Traceability Matrix", traceability(content));
    doc
}

fn render_requirement(fr: &FunctionalRequirement) -> String {
    format!(
        "<div class=\"functional-requirement\" data-fr-id=\"{id}\" data-epic-id=\"{epic}\">\n<h3>{id}: {title}</h3>\n<p>{desc}</p>\n<p class=\"fr-source\">Source: {epic}</p>\n<h4>Acceptance Criteria</h4>\n{acc}\n<h4>Validation Criteria</h4>\n{val}\n</div>",
        id = escape_html(&fr.id),
        epic = escape_html(&fr.epic_id),
        title = escape_html(&fr.title),
        desc = escape_html(&fr.description),
        acc = html_list("ul", "fr-acceptance", &fr.acceptance),
        val = html_list("ul", "fr-validation", &fr.validation),
    )
}

fn render_story(story: &UserStory) -> String {
    format!(
        "<div class=\"user-story\" data-us-id=\"{id}\">\n<h3>{id}: {title}</h3>\n<p>{desc}</p>\n<h4>Acceptance Criteria</h4>\n{acc}\n</div>",
        id = escape_html(&story.id),
        title = escape_html(&story.title),
        desc = escape_html(&story.description),
        acc = html_list("ul", "us-acceptance", &story.acceptance_criteria),
    )
}

fn prioritisation(priorities: &[Prioritized]) -> String {
    let summary = distribution(priorities)
        .iter()
        .map(|(category, count)| format!("{}: {count}", category.label()))
        .collect::<Vec<_>>()
        .join(" | ");
    let rows: Vec<Vec<String>> = priorities
        .iter()
        .map(|p| {
            vec![
                p.rank.to_string(),
                p.story_id.clone(),
                p.title.clone(),
                p.category.label().to_string(),
                p.score.to_string(),
                p.complexity.as_str().to_string(),
                p.business_value.as_str().to_string(),
                p.technical_risk.as_str().to_string(),
                if p.depends_on.is_empty() {
                    "-".to_string()
                } else {
                    p.depends_on.join(", ")
                },
                p.justification.clone(),
            ]
        })
        .collect();
    format!(
        "<p class=\"moscow-distribution\">{}</p>\n{}",
        escape_html(&summary),
        html_table(
            "prioritisation",
            &[
                "Rank", "User Story", "Title", "MoSCoW", "Score", "Complexity", "Business Value",
                "Technical Risk", "Depends On", "Justification",
            ],
            &rows,
        )
    )
}

fn traceability(content: &FrdContent) -> String {
    let rows: Vec<Vec<String>> = content
        .requirements
        .iter()
        .zip(&content.stories)
        .map(|(fr, us)| {
            let objective = content
                .epics
                .iter()
                .find(|e| e.id == fr.epic_id)
                .and_then(|e| e.objective_ref.clone())
                .unwrap_or_else(|| "-".to_string());
            vec![fr.id.clone(), us.id.clone(), fr.epic_id.clone(), objective]
        })
        .collect();
    html_table("traceability", &["FR", "User Story", "EPIC", "Objective"], &rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqdraft_shared::Provenance;

    use crate::priority::prioritize;

    fn epic(id: &str, title: &str, capabilities: &[&str]) -> Epic {
        Epic {
            id: id.into(),
            area: None,
            title: title.into(),
            problem: String::new(),
            value: String::new(),
            capabilities: capabilities.iter().map(|c| c.to_string()).collect(),
            constraints: Vec::new(),
            acceptance: Vec::new(),
            objective_ref: None,
            provenance: Provenance::Extracted,
        }
    }

    #[test]
    fn themes_follow_epic_content() {
        let telecom = DomainId::Telecom;
        assert_eq!(
            theme_for(&epic("EPIC-1", "Billing & Charging", &[]), telecom).map(|t| t.name),
            Some("billing")
        );
        assert_eq!(
            theme_for(&epic("EPIC-2", "Customer Onboarding & SIM Activation", &[]), telecom).map(|t| t.name),
            Some("onboarding")
        );
        assert_eq!(
            theme_for(&epic("EPIC-3", "Self Service", &["Raise invoices online."]), telecom).map(|t| t.name),
            Some("billing")
        );
        assert!(theme_for(&epic("EPIC-4", "Simple Things", &[]), telecom).is_none());
    }

    #[test]
    fn themes_stay_within_their_domain() {
        let privacy = epic("EPIC-1", "Patient Privacy Policy Management", &[]);
        assert_eq!(
            theme_for(&privacy, DomainId::Healthcare).map(|t| t.name),
            Some("patient records")
        );
        assert_eq!(theme_for(&privacy, DomainId::Insurance).map(|t| t.name), Some("policy"));

        assert!(theme_for(&epic("EPIC-2", "Revenue Loss Reduction", &[]), DomainId::Ecommerce).is_none());
        assert!(theme_for(&epic("EPIC-3", "CRM Usage Adoption", &[]), DomainId::Crm).is_none());
        assert_eq!(
            theme_for(&epic("EPIC-4", "Access Reviews", &[]), DomainId::Education).map(|t| t.name),
            Some("security")
        );
    }

    #[test]
    fn non_insurance_policy_epic_gets_its_own_criteria() {
        let epics = vec![epic("EPIC-1", "Returns Policy Management", &[])];
        let (frs, _) = derive_requirements(&epics, &[], DomainId::Ecommerce);
        let criteria = frs[0].acceptance.iter().chain(&frs[0].validation).collect::<Vec<_>>();
        assert!(criteria.iter().all(|c| !c.contains("Sum insured") && !c.contains("underwriting")));
        assert!(frs[0].validation[0].contains("returns policy management"));
    }

    #[test]
    fn billing_and_onboarding_criteria_differ() {
        let epics = vec![
            epic("EPIC-1", "Billing & Charging", &["Rate usage records."]),
            epic("EPIC-2", "Customer Onboarding & SIM Activation", &["Capture KYC documents."]),
        ];
        let (frs, _) = derive_requirements(&epics, &[], DomainId::Telecom);
        assert_ne!(frs[0].validation, frs[1].validation);
        assert!(frs[0].validation.iter().any(|v| v.contains("Tax")));
        assert!(frs[1].validation.iter().any(|v| v.contains("KYC")));
        let shared: Vec<_> = frs[0].validation.iter().filter(|v| frs[1].validation.contains(v)).collect();
        assert!(shared.is_empty(), "shared criteria: {shared:?}");
    }

    #[test]
    fn generic_epics_are_parameterised_by_title() {
        let epics = vec![
            epic("EPIC-1", "Facilities Maintenance Requests", &[]),
            epic("EPIC-2", "Visitor Badges", &[]),
        ];
        let (frs, _) = derive_requirements(&epics, &[], DomainId::Generic);
        assert_ne!(frs[0].validation, frs[1].validation);
        assert!(frs[1].validation[0].contains("visitor badges"));
    }

    #[test]
    fn numbering_and_stories() {
        let epics = vec![
            epic("EPIC-1", "Billing & Charging", &[]),
            epic("EPIC-2", "Network Usage Visibility", &[]),
        ];
        let (frs, stories) = derive_requirements(&epics, &[], DomainId::Telecom);
        assert_eq!(frs[0].id, "FR-001");
        assert_eq!(frs[1].id, "FR-002");
        assert_eq!(stories[1].id, "US-002");
        assert_eq!(frs[1].epic_id, "EPIC-2");
        assert!(stories[0].description.starts_with("As a billing analyst, I want to manage billing & charging"));
        assert_eq!(stories[0].acceptance_criteria, frs[0].acceptance);
    }

    #[test]
    fn brd_rule_is_carried_into_validation() {
        let rules = vec![ValidationRule {
            id: "V-001".into(),
            text: "Enforce double opt-in for every new lead.".into(),
            source: reqdraft_shared::RuleSource::User,
        }];
        let epics = vec![epic("EPIC-1", "Lead Capture", &["Capture web leads."])];
        let (frs, _) = derive_requirements(&epics, &rules, DomainId::Crm);
        assert!(frs[0].validation.contains(&"Enforce double opt-in for every new lead.".to_string()));
    }

    #[test]
    fn frd_sections_and_traceability() {
        let mut e = epic("EPIC-1", "Billing & Charging", &[]);
        e.objective_ref = Some("OBJ-2".into());
        let epics = vec![e];
        let (requirements, stories) = derive_requirements(&epics, &[], DomainId::Telecom);
        let priorities = prioritize(&stories, DomainId::Telecom);
        let doc = assemble_frd(&FrdContent {
            project: "Telco BSS".into(),
            version: 1,
            domain: DomainId::Telecom,
            epics,
            requirements,
            stories,
            rules: Vec::new(),
            priorities,
        });
        let ids: Vec<&str> = doc.sections.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(
            ids,
            vec![
                "scope-context",
                "stakeholders",
                "nfrs",
                "data-model",
                "interfaces",
                "functional-requirements",
                "user-stories",
                "prioritisation",
                "field-validations",
                "traceability",
            ]
        );
        let html = doc.to_html();
        assert!(html.contains("<td>FR-001</td><td>US-001</td><td>EPIC-1</td><td>OBJ-2</td>"));
        assert!(html.contains("data-kind=\"frd\""));
        assert!(html.contains("<td>1</td><td>US-001</td><td>Billing &amp; Charging</td><td>Must Have</td>"));
        assert!(html.contains("Must Have: 1 | Should Have: 0 | Could Have: 0"));
    }
}
