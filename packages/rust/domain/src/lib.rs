//! Domain profiles and keyword classification.
//!
//! Every supported industry vertical has one immutable [`DomainProfile`]
//! carrying its keyword triggers and the canned content the extractor falls
//! back to (stakeholders, validation rules, KPIs, risks, FRD context). The
//! [`DomainRegistry`] compiles the keyword tables once and scores text
//! against them.

mod profiles;

use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, warn};

use reqdraft_shared::{DomainId, Level, RawInput};

/// A domain must reach at least this many keyword hits to beat `Generic`.
pub const MIN_HITS: usize = 1;

// ---------------------------------------------------------------------------
// Profile data
// ---------------------------------------------------------------------------

/// Canned KPI used when objectives give nothing to measure.
#[derive(Debug, Clone, Copy)]
pub struct KpiTemplate {
    pub name: &'static str,
    pub formula: &'static str,
    pub target: &'static str,
    pub frequency: &'static str,
}

#[derive(Debug, Clone, Copy)]
pub struct RiskTemplate {
    pub title: &'static str,
    pub description: &'static str,
    pub likelihood: Level,
    pub impact: Level,
    pub mitigation: &'static str,
    pub contingency: &'static str,
}

/// Static description of one industry vertical.
#[derive(Debug)]
pub struct DomainProfile {
    pub id: DomainId,
    /// `(keyword or phrase, weight)` pairs. Matching is case-insensitive on
    /// word boundaries and accepts a plural `s`/`es` suffix.
    pub keywords: &'static [(&'static str, u32)],
    pub stakeholders: &'static [&'static str],
    /// Delivery channels, as a phrase for scope and FRD context text.
    pub channels: &'static str,
    /// Actors used in generated user stories, most common first.
    pub personas: &'static [&'static str],
    /// Business outcome used as the "Y" in objective hypotheses.
    pub outcome: &'static str,
    pub validation_rules: &'static [&'static str],
    pub scope: &'static [&'static str],
    pub objectives: &'static [&'static str],
    pub kpis: &'static [KpiTemplate],
    pub risks: &'static [RiskTemplate],
    pub nfrs: &'static [&'static str],
    pub data_entities: &'static [&'static str],
    pub interfaces: &'static [&'static str],
    /// `(label, sample value)` tiles for the wireframe dashboard.
    pub dashboard_metrics: &'static [(&'static str, &'static str)],
    pub quick_actions: &'static [&'static str],
}

impl DomainProfile {
    /// Primary actor for user stories.
    pub fn primary_persona(&self) -> &'static str {
        self.personas.first().copied().unwrap_or("business user")
    }
}

/// Profile for a domain. Infallible: every [`DomainId`] has an entry.
pub fn profile(id: DomainId) -> &'static DomainProfile {
    let generic = &profiles::PROFILES[profiles::PROFILES.len() - 1];
    profiles::PROFILES
        .iter()
        .find(|p| p.id == id)
        .unwrap_or(generic)
}

/// All profiles in classifier priority order.
pub fn all_profiles() -> &'static [DomainProfile] {
    &profiles::PROFILES
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

struct KeywordMatcher {
    keyword: &'static str,
    weight: u32,
    pattern: Regex,
}

struct CompiledProfile {
    profile: &'static DomainProfile,
    matchers: Vec<KeywordMatcher>,
}

/// Score of one domain against a piece of text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainScore {
    pub domain: DomainId,
    /// Sum of `weight x occurrences` over all matched keywords.
    pub score: u32,
    /// Keywords that matched at least once, in table order.
    pub hits: Vec<&'static str>,
}

/// Holds the compiled keyword tables in priority order.
pub struct DomainRegistry {
    profiles: Vec<CompiledProfile>,
}

impl DomainRegistry {
    /// Compile every built-in profile.
    pub fn new() -> Self {
        let profiles = all_profiles()
            .iter()
            .map(|profile| CompiledProfile {
                profile,
                matchers: profile
                    .keywords
                    .iter()
                    .filter_map(|&(keyword, weight)| {
                        let source = format!(r"(?i)\b{}(?:s|es)?\b", regex::escape(keyword));
                        match Regex::new(&source) {
                            Ok(pattern) => Some(KeywordMatcher {
                                keyword,
                                weight,
                                pattern,
                            }),
                            Err(e) => {
                                warn!(keyword, error = %e, "skipping keyword");
                                None
                            }
                        }
                    })
                    .collect(),
            })
            .collect();
        Self { profiles }
    }

    /// Process-wide registry, compiled on first use.
    pub fn global() -> &'static DomainRegistry {
        static REGISTRY: LazyLock<DomainRegistry> = LazyLock::new(DomainRegistry::new);
        &REGISTRY
    }

    /// Score every keyed domain, in priority order. `Generic` is not listed.
    pub fn scores(&self, text: &str) -> Vec<DomainScore> {
        self.profiles
            .iter()
            .filter(|compiled| !compiled.matchers.is_empty())
            .map(|compiled| {
                let mut score = 0;
                let mut hits = Vec::new();
                for matcher in &compiled.matchers {
                    let count = matcher.pattern.find_iter(text).count() as u32;
                    if count > 0 {
                        score += matcher.weight * count;
                        hits.push(matcher.keyword);
                    }
                }
                DomainScore {
                    domain: compiled.profile.id,
                    score,
                    hits,
                }
            })
            .collect()
    }

    /// Highest-scoring domain; earlier profiles win ties. `Generic` when
    /// nothing reaches [`MIN_HITS`].
    pub fn classify(&self, text: &str) -> DomainId {
        let mut best: Option<DomainScore> = None;
        for candidate in self.scores(text) {
            if candidate.hits.len() < MIN_HITS {
                continue;
            }
            // Strict comparison keeps the earlier profile on a tie.
            if best.as_ref().is_none_or(|b| candidate.score > b.score) {
                best = Some(candidate);
            }
        }

        match best {
            Some(score) => {
                debug!(domain = %score.domain, score = score.score, hits = ?score.hits, "domain classified");
                score.domain
            }
            None => {
                debug!("no domain keywords matched, using generic");
                DomainId::Generic
            }
        }
    }

    pub fn profile(&self, id: DomainId) -> &'static DomainProfile {
        profile(id)
    }
}

impl Default for DomainRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Convenience entry points
// ---------------------------------------------------------------------------

/// Classify a generation request by all of its sections. Never fails.
pub fn detect_domain(input: &RawInput) -> DomainId {
    detect_domain_text(&input.combined_text())
}

/// Classify arbitrary text, such as a rendered BRD.
pub fn detect_domain_text(text: &str) -> DomainId {
    DomainRegistry::global().classify(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_order_matches_priority() {
        let ids: Vec<DomainId> = all_profiles().iter().map(|p| p.id).collect();
        assert_eq!(ids, DomainId::ALL.to_vec());
    }

    #[test]
    fn every_profile_has_fallback_content() {
        for p in all_profiles() {
            assert!(!p.stakeholders.is_empty(), "{} stakeholders", p.id);
            assert!(!p.validation_rules.is_empty(), "{} rules", p.id);
            assert!(!p.scope.is_empty(), "{} scope", p.id);
            assert!(!p.objectives.is_empty(), "{} objectives", p.id);
            assert!(!p.kpis.is_empty(), "{} kpis", p.id);
            assert!(!p.personas.is_empty(), "{} personas", p.id);
            assert!(p.dashboard_metrics.len() >= 4, "{} metrics", p.id);
        }
    }

    #[test]
    fn insurance_keywords() {
        let text = "Manage policy issuance, claim intake, premium billing and underwriting rules";
        assert_eq!(detect_domain_text(text), DomainId::Insurance);
    }

    #[test]
    fn healthcare_keywords() {
        let text = "Patient intake and clinical notes must be HIPAA compliant";
        assert_eq!(detect_domain_text(text), DomainId::Healthcare);
    }

    #[test]
    fn no_keywords_is_generic() {
        assert_eq!(detect_domain_text("Make things better for everyone"), DomainId::Generic);
        assert_eq!(detect_domain_text(""), DomainId::Generic);
        assert_eq!(detect_domain(&RawInput::default()), DomainId::Generic);
    }

    #[test]
    fn crm_beats_incidental_banking_terms() {
        let input: RawInput = [
            (
                "scope",
                "Included — lead and account management, campaign tracking. Excluded — payroll",
            ),
            ("objectives", "Increase qualified lead conversion by 20%"),
        ]
        .into_iter()
        .collect();
        assert_eq!(detect_domain(&input), DomainId::Crm);
    }

    #[test]
    fn ties_resolve_by_priority() {
        // "claim" (insurance) and "campaign" (crm) both weigh 3.
        let registry = DomainRegistry::new();
        let scores = registry.scores("one claim and one campaign");
        let insurance = scores.iter().find(|s| s.domain == DomainId::Insurance).unwrap();
        let crm = scores.iter().find(|s| s.domain == DomainId::Crm).unwrap();
        assert_eq!(insurance.score, crm.score);
        assert_eq!(registry.classify("one claim and one campaign"), DomainId::Insurance);
    }

    #[test]
    fn matching_respects_word_boundaries_and_plurals() {
        let registry = DomainRegistry::new();
        let scores = registry.scores("Claims and premiums; disclaimer text");
        let insurance = scores.iter().find(|s| s.domain == DomainId::Insurance).unwrap();
        // "claims" and "premiums" count; "disclaimer" does not.
        assert_eq!(insurance.score, 6);
        assert_eq!(insurance.hits, vec!["claim", "premium"]);
    }

    #[test]
    fn telecom_keywords() {
        let text = "Subscriber onboarding, SIM activation and roaming charges";
        assert_eq!(detect_domain_text(text), DomainId::Telecom);
    }

    #[test]
    fn profile_lookup_is_total() {
        for id in DomainId::ALL {
            assert_eq!(profile(id).id, id);
        }
        assert_eq!(profile(DomainId::Crm).primary_persona(), "sales representative");
    }
}
