//! Response Normalizer
//!
//! Single public entry point for turning raw completion text into a
//! guaranteed-well-formed `AnalysisResult`.
//!
//! Contract:
//! - Text that is not valid JSON is a hard failure (`MalformedResponse`);
//!   an unparseable payload cannot be reasoned about and no repair is
//!   attempted.
//! - Everything past the parse is absorbed: wrong types, absent fields,
//!   out-of-range numbers, and unmatched enum strings resolve to their
//!   per-field fallbacks. A nested section missing entirely is normalized
//!   as all-absent leaves, never failing the whole result. Degraded data
//!   beats no data; the only consumer is a human reading a report.
//!
//! Each invocation is pure in its input; no state is shared between calls.

pub mod coerce;

use serde_json::Value;
use tracing::debug;

use crate::types::report::*;
use crate::types::{Result, VetError};
use coerce::{flexible_string, score, string_list};

static NULL: Value = Value::Null;

/// Parse and normalize one raw model response.
pub fn normalize_response(raw: &str) -> Result<AnalysisResult> {
    let root: Value = serde_json::from_str(raw.trim())
        .map_err(|e| VetError::MalformedResponse(e.to_string()))?;
    Ok(normalize_value(&root))
}

/// Normalize an already-parsed payload against the report schema.
pub fn normalize_value(root: &Value) -> AnalysisResult {
    AnalysisResult {
        repo_snapshot: repo_snapshot(section(root, "repoSnapshot")),
        executive_verdict: executive_verdict(section(root, "executiveVerdict")),
        architectural_health: architectural_health(section(root, "architecturalHealth")),
        dependency_analysis: dependency_analysis(section(root, "dependencyAnalysis")),
        blast_radius: blast_radius(section(root, "blastRadius")),
        maintainability: maintainability(section(root, "maintainability")),
        execution_flow: execution_flow(section(root, "executionFlow")),
        testing_profile: testing_profile(section(root, "testingProfile")),
        scalability: scalability(section(root, "scalability")),
        onboarding: onboarding(section(root, "onboarding")),
        improvements: improvements(field(root, "improvements")),
        final_recommendation: final_recommendation(section(root, "finalRecommendation")),
    }
}

/// Look up a nested section; a missing or non-object section degrades to
/// null so every leaf under it takes its fallback.
fn section<'a>(root: &'a Value, key: &str) -> &'a Value {
    let v = field(root, key);
    if !v.is_object() {
        debug!(section = key, "section absent or not an object, using fallbacks");
    }
    v
}

fn field<'a>(obj: &'a Value, key: &str) -> &'a Value {
    obj.get(key).unwrap_or(&NULL)
}

// =============================================================================
// Section walkers
// =============================================================================

fn repo_snapshot(v: &Value) -> RepoSnapshot {
    RepoSnapshot {
        description: flexible_string(field(v, "description")),
        primary_stack: flexible_string(field(v, "primaryStack")),
        architecture_type: ArchitectureType::from_loose(field(v, "architectureType")),
        codebase_size: CodebaseSize::from_loose(field(v, "codebaseSize")),
        activity_signal: ActivitySignal::from_loose(field(v, "activitySignal")),
    }
}

fn executive_verdict(v: &Value) -> ExecutiveVerdict {
    ExecutiveVerdict {
        maturity_stage: MaturityStage::from_loose(field(v, "maturityStage")),
        maintainability_score: score(field(v, "maintainabilityScore")),
        maintenance_context: flexible_string(field(v, "maintenanceContext")),
        modularity_strength: ModularityStrength::from_loose(field(v, "modularityStrength")),
        coupling_risk: CouplingRisk::from_loose(field(v, "couplingRisk")),
        coupling_context: flexible_string(field(v, "couplingContext")),
        refactor_safety: RefactorSafety::from_loose(field(v, "refactorSafety")),
        refactor_context: flexible_string(field(v, "refactorContext")),
        production_readiness: ProductionReadiness::from_loose(field(v, "productionReadiness")),
        adoption_recommendation: AdoptionRecommendation::from_loose(field(
            v,
            "adoptionRecommendation",
        )),
    }
}

fn architectural_health(v: &Value) -> ArchitecturalHealth {
    ArchitecturalHealth {
        architecture_identity: flexible_string(field(v, "architectureIdentity")),
        pattern: flexible_string(field(v, "pattern")),
        boundary_strength: flexible_string(field(v, "boundaryStrength")),
        cohesion: flexible_string(field(v, "cohesion")),
        consistency: flexible_string(field(v, "consistency")),
    }
}

fn dependency_analysis(v: &Value) -> DependencyAnalysis {
    DependencyAnalysis {
        central_nodes: string_list(field(v, "centralNodes")),
        top_consumers: string_list(field(v, "topConsumers")),
        circular_risk: flexible_string(field(v, "circularRisk")),
    }
}

fn blast_radius(v: &Value) -> BlastRadius {
    BlastRadius {
        high_blast_radius_areas: string_list(field(v, "highBlastRadiusAreas")),
        safe_zones: string_list(field(v, "safeZones")),
        refactor_confidence: flexible_string(field(v, "refactorConfidence")),
    }
}

fn maintainability(v: &Value) -> Maintainability {
    Maintainability {
        centralization: flexible_string(field(v, "centralization")),
        abstraction_quality: flexible_string(field(v, "abstractionQuality")),
        dependency_sprawl: flexible_string(field(v, "dependencySprawl")),
        technical_debt_indicators: string_list(field(v, "technicalDebtIndicators")),
    }
}

fn execution_flow(v: &Value) -> ExecutionFlow {
    // Models regularly emit sideEffectZones as an array despite the prompt;
    // flexible_string folds it back into one scalar.
    ExecutionFlow {
        entry_point: flexible_string(field(v, "entryPoint")),
        core_path: flexible_string(field(v, "corePath")),
        side_effect_zones: flexible_string(field(v, "sideEffectZones")),
        state_mutation_pattern: flexible_string(field(v, "stateMutationPattern")),
        api_boundary: flexible_string(field(v, "apiBoundary")),
    }
}

fn testing_profile(v: &Value) -> TestingProfile {
    TestingProfile {
        unit_coverage: flexible_string(field(v, "unitCoverage")),
        integration_depth: flexible_string(field(v, "integrationDepth")),
        e2e_presence: flexible_string(field(v, "e2ePresence")),
        mocking_strategy: flexible_string(field(v, "mockingStrategy")),
        refactor_safety_rating: RefactorSafety::from_loose(field(v, "refactorSafetyRating")),
    }
}

fn scalability(v: &Value) -> Scalability {
    Scalability {
        deployment_maturity: flexible_string(field(v, "deploymentMaturity")),
        config_hygiene: flexible_string(field(v, "configHygiene")),
        scaling_bottlenecks: flexible_string(field(v, "scalingBottlenecks")),
        caching: flexible_string(field(v, "caching")),
    }
}

fn onboarding(v: &Value) -> Onboarding {
    Onboarding {
        setup_complexity: SetupComplexity::from_loose(field(v, "setupComplexity")),
        documentation_clarity: DocumentationClarity::from_loose(field(v, "documentationClarity")),
        estimated_onboarding_time: flexible_string(field(v, "estimatedOnboardingTime")),
        core_domain_summary: flexible_string(field(v, "coreDomainSummary")),
        start_here: string_list(field(v, "startHere")),
        then_read: string_list(field(v, "thenRead")),
        data_flow_summary: flexible_string(field(v, "dataFlowSummary")),
        high_risk_files: string_list(field(v, "highRiskFiles")),
        first_day_advice: flexible_string(field(v, "firstDayAdvice")),
        key_files_to_read: string_list(field(v, "keyFilesToRead")),
        areas_to_avoid: string_list(field(v, "areasToAvoid")),
    }
}

fn improvements(v: &Value) -> Vec<Improvement> {
    let Some(items) = v.as_array() else {
        return Vec::new();
    };
    items
        .iter()
        .filter(|item| item.is_object())
        .map(|item| Improvement {
            title: flexible_string(field(item, "title")),
            description: flexible_string(field(item, "description")),
            priority: Priority::from_loose(field(item, "priority")),
        })
        .collect()
}

fn final_recommendation(v: &Value) -> FinalRecommendation {
    FinalRecommendation {
        good_for: string_list(field(v, "goodFor")),
        risky_for: string_list(field(v, "riskyFor")),
        recommended_approach: flexible_string(field(v, "recommendedApproach")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    /// A payload that already conforms to the schema exactly.
    fn conformant_doc() -> Value {
        json!({
            "repoSnapshot": {
                "description": "A CLI tool",
                "primaryStack": "Rust, Tokio",
                "architectureType": "Layered",
                "codebaseSize": "Small",
                "activitySignal": "Actively Maintained"
            },
            "executiveVerdict": {
                "maturityStage": "Growing",
                "maintainabilityScore": 8,
                "maintenanceContext": "Consistent module layout",
                "modularityStrength": "Strong",
                "couplingRisk": "Low",
                "couplingContext": "Few cross-module imports",
                "refactorSafety": "High",
                "refactorContext": "Good test coverage",
                "productionReadiness": "Stable",
                "adoptionRecommendation": "Safe to adopt"
            },
            "architecturalHealth": {
                "architectureIdentity": "Layered CLI",
                "pattern": "Commands over services",
                "boundaryStrength": "Strong",
                "cohesion": "High",
                "consistency": "Uniform"
            },
            "dependencyAnalysis": {
                "centralNodes": ["src/lib.rs"],
                "topConsumers": ["src/main.rs"],
                "circularRisk": "None observed"
            },
            "blastRadius": {
                "highBlastRadiusAreas": ["src/core.rs"],
                "safeZones": ["src/cli"],
                "refactorConfidence": "High"
            },
            "maintainability": {
                "centralization": "Centralized in lib.rs",
                "abstractionQuality": "Good",
                "dependencySprawl": "Low",
                "technicalDebtIndicators": ["No CI"]
            },
            "executionFlow": {
                "entryPoint": "src/main.rs",
                "corePath": "main -> run -> report",
                "sideEffectZones": "Database writes in storage module",
                "stateMutationPattern": "Owned state, no globals",
                "apiBoundary": "lib.rs public surface"
            },
            "testingProfile": {
                "unitCoverage": "Moderate",
                "integrationDepth": "Shallow",
                "e2ePresence": "None",
                "mockingStrategy": "Hand-rolled fakes",
                "refactorSafetyRating": "Moderate"
            },
            "scalability": {
                "deploymentMaturity": "Binary release",
                "configHygiene": "Good",
                "scalingBottlenecks": "Single-threaded pipeline",
                "caching": "None"
            },
            "onboarding": {
                "setupComplexity": "Low",
                "documentationClarity": "Average",
                "estimatedOnboardingTime": "1 day",
                "coreDomainSummary": "Audits repositories",
                "startHere": ["README.md"],
                "thenRead": ["src/lib.rs"],
                "dataFlowSummary": "url -> fetch -> prompt -> report",
                "highRiskFiles": ["src/core.rs"],
                "firstDayAdvice": "Run the tests first",
                "keyFilesToRead": ["src/lib.rs"],
                "areasToAvoid": ["src/legacy.rs"]
            },
            "improvements": [
                {"title": "Add CI", "description": "GitHub Actions", "priority": "High"}
            ],
            "finalRecommendation": {
                "goodFor": ["Internal tooling"],
                "riskyFor": ["Regulated environments"],
                "recommendedApproach": "Adopt incrementally"
            }
        })
    }

    #[test]
    fn test_conformant_payload_is_identity() {
        let doc = conformant_doc();
        let result = normalize_response(&doc.to_string()).unwrap();
        let round_tripped = serde_json::to_value(&result).unwrap();
        assert_eq!(round_tripped, doc);
    }

    #[test]
    fn test_degraded_payload_is_repaired() {
        let mut doc = conformant_doc();
        doc["executiveVerdict"]["maintainabilityScore"] = json!(95);
        doc["executionFlow"]["sideEffectZones"] = json!(["a", "b"]);
        doc["repoSnapshot"]["architectureType"] = json!("feature-based");

        let result = normalize_response(&doc.to_string()).unwrap();
        assert_eq!(result.executive_verdict.maintainability_score, 10);
        assert_eq!(result.execution_flow.side_effect_zones, "a. b");
        assert_eq!(
            result.repo_snapshot.architecture_type,
            ArchitectureType::FeatureBased
        );
    }

    #[test]
    fn test_non_json_is_hard_failure() {
        let err = normalize_response("I could not produce JSON, sorry.").unwrap_err();
        assert!(matches!(err, VetError::MalformedResponse(_)));
    }

    #[test]
    fn test_missing_section_falls_back_per_field() {
        let result = normalize_response("{}").unwrap();
        assert_eq!(result.repo_snapshot.description, "Not specified");
        assert_eq!(
            result.repo_snapshot.architecture_type,
            ArchitectureType::Unstructured
        );
        assert_eq!(result.executive_verdict.maintainability_score, 5);
        assert_eq!(
            result.executive_verdict.adoption_recommendation,
            AdoptionRecommendation::AdoptWithCaution
        );
        assert_eq!(result.onboarding.setup_complexity, SetupComplexity::High);
        assert!(result.improvements.is_empty());
        assert!(result.dependency_analysis.central_nodes.is_empty());
    }

    #[test]
    fn test_list_fields_never_null() {
        let mut doc = conformant_doc();
        doc["dependencyAnalysis"]["centralNodes"] = json!(null);
        doc["blastRadius"]["safeZones"] = json!("not-a-list");
        doc["improvements"] = json!("nope");

        let result = normalize_response(&doc.to_string()).unwrap();
        assert!(result.dependency_analysis.central_nodes.is_empty());
        assert!(result.blast_radius.safe_zones.is_empty());
        assert!(result.improvements.is_empty());
    }

    #[test]
    fn test_improvement_items_coerced_individually() {
        let mut doc = conformant_doc();
        doc["improvements"] = json!([
            {"title": "Fix logging", "description": ["use", "tracing"], "priority": "urgent"},
            "stray string",
            {"title": null, "priority": "low"}
        ]);

        let result = normalize_response(&doc.to_string()).unwrap();
        assert_eq!(result.improvements.len(), 2);
        assert_eq!(result.improvements[0].description, "use. tracing");
        assert_eq!(result.improvements[0].priority, Priority::Medium);
        assert_eq!(result.improvements[1].title, "Not specified");
        assert_eq!(result.improvements[1].priority, Priority::Low);
    }

    #[test]
    fn test_whitespace_around_payload_is_tolerated() {
        let raw = format!("\n  {}  \n", conformant_doc());
        assert!(normalize_response(&raw).is_ok());
    }

    #[test]
    fn test_summary_prefers_core_domain() {
        let result = normalize_response(&conformant_doc().to_string()).unwrap();
        assert_eq!(result.summary(), "Audits repositories");
    }

    #[test]
    fn test_summary_falls_back_to_description() {
        let mut doc = conformant_doc();
        doc["onboarding"]["coreDomainSummary"] = json!(null);
        let result = normalize_response(&doc.to_string()).unwrap();
        assert_eq!(result.summary(), "A CLI tool");
    }
}
