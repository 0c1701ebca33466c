//! Analysis Report Schema
//!
//! The strictly-typed result of one repository audit. Every field here is
//! guaranteed UI-safe: enums are always members of their declared value set,
//! the maintainability score is always in [1, 10], text fields are always
//! scalar strings, and list fields are always present (possibly empty).
//!
//! The normalizer (`ai::normalize`) is the only producer of these values
//! from raw model output; a constructed `AnalysisResult` is immutable and
//! handed to storage and rendering as a value.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::constants::normalize::SUMMARY_MAX_CHARS;

/// Declare a report enum with canonical spellings and a lenient constructor.
///
/// `from_loose` matches input case-insensitively against the canonical
/// values and resolves anything else (unmatched string, non-string, absent)
/// to the declared fallback. It never fails and never yields a value
/// outside the set.
macro_rules! loose_enum {
    (
        $(#[$meta:meta])*
        $name:ident, fallback = $fallback:ident {
            $($variant:ident => $text:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $text)] $variant,)+
        }

        impl $name {
            /// Value substituted when the input cannot be matched.
            pub const FALLBACK: Self = Self::$fallback;

            /// Canonical spelling of every member, in declaration order.
            pub const VALUES: &'static [&'static str] = &[$($text),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $text,)+
                }
            }

            /// Case-insensitive match against the canonical values.
            pub fn from_loose(value: &Value) -> Self {
                if let Some(s) = value.as_str() {
                    let s = s.trim();
                    $(
                        if s.eq_ignore_ascii_case($text) {
                            return Self::$variant;
                        }
                    )+
                }
                Self::FALLBACK
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

// =============================================================================
// Enumerations
// =============================================================================

loose_enum! {
    ArchitectureType, fallback = Unstructured {
        FeatureBased => "Feature-based",
        Layered => "Layered",
        Monolithic => "Monolithic",
        Microservices => "Microservices",
        Hybrid => "Hybrid",
        Unstructured => "Unstructured",
    }
}

loose_enum! {
    CodebaseSize, fallback = Medium {
        Small => "Small",
        Medium => "Medium",
        Large => "Large",
        Massive => "Massive",
    }
}

loose_enum! {
    ActivitySignal, fallback = LowActivity {
        ActivelyMaintained => "Actively Maintained",
        LowActivity => "Low Activity",
        Stagnant => "Stagnant",
        Deprecated => "Deprecated",
    }
}

loose_enum! {
    MaturityStage, fallback = Prototype {
        Prototype => "Prototype",
        StructuredEarlyStage => "Structured Early-Stage",
        Growing => "Growing",
        ProductionGrade => "Production-Grade",
    }
}

loose_enum! {
    ModularityStrength, fallback = Moderate {
        Weak => "Weak",
        Moderate => "Moderate",
        Strong => "Strong",
    }
}

loose_enum! {
    CouplingRisk, fallback = Medium {
        Low => "Low",
        Medium => "Medium",
        High => "High",
    }
}

loose_enum! {
    /// Shared by `executiveVerdict.refactorSafety` and
    /// `testingProfile.refactorSafetyRating`; both fall back to Low.
    RefactorSafety, fallback = Low {
        Low => "Low",
        Moderate => "Moderate",
        High => "High",
    }
}

loose_enum! {
    ProductionReadiness, fallback = Experimental {
        Experimental => "Experimental",
        EarlyStage => "Early-stage",
        Stable => "Stable",
        ProductionHardened => "Production-Hardened",
    }
}

loose_enum! {
    AdoptionRecommendation, fallback = AdoptWithCaution {
        SafeToAdopt => "Safe to adopt",
        AdoptWithCaution => "Adopt with caution",
        RefactorBeforeAdopting => "Refactor before adopting",
        NotRecommended => "Not recommended for production",
    }
}

loose_enum! {
    SetupComplexity, fallback = High {
        Low => "Low",
        Moderate => "Moderate",
        High => "High",
    }
}

loose_enum! {
    DocumentationClarity, fallback = Poor {
        Poor => "Poor",
        Average => "Average",
        Excellent => "Excellent",
    }
}

loose_enum! {
    Priority, fallback = Medium {
        High => "High",
        Medium => "Medium",
        Low => "Low",
    }
}

// =============================================================================
// Sub-records
// =============================================================================

/// Orientation facts about the repository.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepoSnapshot {
    pub description: String,
    pub primary_stack: String,
    pub architecture_type: ArchitectureType,
    pub codebase_size: CodebaseSize,
    pub activity_signal: ActivitySignal,
}

/// Top-level engineering judgment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutiveVerdict {
    pub maturity_stage: MaturityStage,
    /// Always an integer in [1, 10].
    pub maintainability_score: u8,
    pub maintenance_context: String,
    pub modularity_strength: ModularityStrength,
    pub coupling_risk: CouplingRisk,
    pub coupling_context: String,
    pub refactor_safety: RefactorSafety,
    pub refactor_context: String,
    pub production_readiness: ProductionReadiness,
    pub adoption_recommendation: AdoptionRecommendation,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchitecturalHealth {
    pub architecture_identity: String,
    pub pattern: String,
    pub boundary_strength: String,
    pub cohesion: String,
    pub consistency: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DependencyAnalysis {
    pub central_nodes: Vec<String>,
    pub top_consumers: Vec<String>,
    pub circular_risk: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlastRadius {
    pub high_blast_radius_areas: Vec<String>,
    pub safe_zones: Vec<String>,
    pub refactor_confidence: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Maintainability {
    pub centralization: String,
    pub abstraction_quality: String,
    pub dependency_sprawl: String,
    pub technical_debt_indicators: Vec<String>,
}

/// Execution flow narrative. Every field is a single string, never a list,
/// even when the model emits one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionFlow {
    pub entry_point: String,
    pub core_path: String,
    pub side_effect_zones: String,
    pub state_mutation_pattern: String,
    pub api_boundary: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestingProfile {
    pub unit_coverage: String,
    pub integration_depth: String,
    pub e2e_presence: String,
    pub mocking_strategy: String,
    pub refactor_safety_rating: RefactorSafety,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scalability {
    pub deployment_maturity: String,
    pub config_hygiene: String,
    pub scaling_bottlenecks: String,
    pub caching: String,
}

/// Onboarding friction and reading path.
///
/// `key_files_to_read` and `areas_to_avoid` predate the `start_here` /
/// `then_read` / `high_risk_files` trio and are kept so older persisted
/// records still deserialize and render.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Onboarding {
    pub setup_complexity: SetupComplexity,
    pub documentation_clarity: DocumentationClarity,
    pub estimated_onboarding_time: String,
    pub core_domain_summary: String,
    pub start_here: Vec<String>,
    pub then_read: Vec<String>,
    pub data_flow_summary: String,
    pub high_risk_files: Vec<String>,
    pub first_day_advice: String,
    pub key_files_to_read: Vec<String>,
    pub areas_to_avoid: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Improvement {
    pub title: String,
    pub description: String,
    pub priority: Priority,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalRecommendation {
    pub good_for: Vec<String>,
    pub risky_for: Vec<String>,
    pub recommended_approach: String,
}

// =============================================================================
// Root
// =============================================================================

/// A complete, normalized audit report. Constructed once per analysis from
/// one raw model response; immutable thereafter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub repo_snapshot: RepoSnapshot,
    pub executive_verdict: ExecutiveVerdict,
    pub architectural_health: ArchitecturalHealth,
    pub dependency_analysis: DependencyAnalysis,
    pub blast_radius: BlastRadius,
    pub maintainability: Maintainability,
    pub execution_flow: ExecutionFlow,
    pub testing_profile: TestingProfile,
    pub scalability: Scalability,
    pub onboarding: Onboarding,
    /// Ordered as emitted by the model; order encodes priority.
    pub improvements: Vec<Improvement>,
    pub final_recommendation: FinalRecommendation,
}

impl AnalysisResult {
    /// One-line summary stored alongside the record: the core domain
    /// summary when present, otherwise the snapshot description truncated.
    pub fn summary(&self) -> String {
        let core = self.onboarding.core_domain_summary.trim();
        if !core.is_empty() && core != "Not specified" {
            return core.to_string();
        }
        let desc = &self.repo_snapshot.description;
        if desc.chars().count() > SUMMARY_MAX_CHARS {
            let truncated: String = desc.chars().take(SUMMARY_MAX_CHARS).collect();
            format!("{}...", truncated)
        } else {
            desc.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_loose_enum_exact_match() {
        assert_eq!(
            ArchitectureType::from_loose(&json!("Layered")),
            ArchitectureType::Layered
        );
    }

    #[test]
    fn test_loose_enum_case_insensitive() {
        assert_eq!(
            ArchitectureType::from_loose(&json!("feature-based")),
            ArchitectureType::FeatureBased
        );
        assert_eq!(CouplingRisk::from_loose(&json!("low")), CouplingRisk::Low);
        assert_eq!(
            ActivitySignal::from_loose(&json!("ACTIVELY MAINTAINED")),
            ActivitySignal::ActivelyMaintained
        );
    }

    #[test]
    fn test_loose_enum_unmatched_falls_back() {
        assert_eq!(
            CouplingRisk::from_loose(&json!("Ultra-High")),
            CouplingRisk::Medium
        );
        assert_eq!(
            SetupComplexity::from_loose(&json!("impossible")),
            SetupComplexity::High
        );
        assert_eq!(
            DocumentationClarity::from_loose(&json!("superb")),
            DocumentationClarity::Poor
        );
    }

    #[test]
    fn test_loose_enum_non_string_falls_back() {
        assert_eq!(Priority::from_loose(&json!(3)), Priority::Medium);
        assert_eq!(Priority::from_loose(&json!(null)), Priority::Medium);
        assert_eq!(Priority::from_loose(&json!(["High"])), Priority::Medium);
    }

    #[test]
    fn test_loose_enum_trims_whitespace() {
        assert_eq!(
            RefactorSafety::from_loose(&json!("  moderate ")),
            RefactorSafety::Moderate
        );
    }

    #[test]
    fn test_enum_serializes_canonical_text() {
        let v = serde_json::to_value(AdoptionRecommendation::NotRecommended).unwrap();
        assert_eq!(v, json!("Not recommended for production"));

        let back: AdoptionRecommendation =
            serde_json::from_value(json!("Adopt with caution")).unwrap();
        assert_eq!(back, AdoptionRecommendation::AdoptWithCaution);
    }

    #[test]
    fn test_summary_truncates_long_description() {
        let mut result = crate::ai::normalize_value(&json!({}));
        result.repo_snapshot.description = "x".repeat(200);

        let summary = result.summary();
        assert_eq!(summary.chars().count(), SUMMARY_MAX_CHARS + 3);
        assert!(summary.ends_with("..."));
    }

    #[test]
    fn test_enum_values_exposed() {
        assert_eq!(
            MaturityStage::VALUES,
            &[
                "Prototype",
                "Structured Early-Stage",
                "Growing",
                "Production-Grade"
            ]
        );
        assert_eq!(MaturityStage::FALLBACK, MaturityStage::Prototype);
    }
}
