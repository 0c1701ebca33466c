//! Report Rendering
//!
//! Terminal rendering for a normalized audit report. Every value printed
//! here came through the normalizer, so no field needs a missing-data
//! branch.

use console::style;

use super::output::Output;
use crate::types::AnalysisResult;

/// Print a full report to stdout.
pub fn render(out: &Output, result: &AnalysisResult) {
    let snapshot = &result.repo_snapshot;
    out.section("Repository Snapshot");
    out.field("Description", &snapshot.description);
    out.field("Primary stack", &snapshot.primary_stack);
    out.field("Architecture", snapshot.architecture_type.as_str());
    out.field("Size", snapshot.codebase_size.as_str());
    out.field("Activity", snapshot.activity_signal.as_str());

    let verdict = &result.executive_verdict;
    out.section("Executive Verdict");
    out.field("Maturity", verdict.maturity_stage.as_str());
    println!(
        "  {} {}",
        style("Maintainability:").dim(),
        score_badge(verdict.maintainability_score)
    );
    out.field("Context", &verdict.maintenance_context);
    out.field("Modularity", verdict.modularity_strength.as_str());
    out.field("Coupling risk", verdict.coupling_risk.as_str());
    out.field("Coupling context", &verdict.coupling_context);
    out.field("Refactor safety", verdict.refactor_safety.as_str());
    out.field("Refactor context", &verdict.refactor_context);
    out.field("Readiness", verdict.production_readiness.as_str());
    out.field("Recommendation", verdict.adoption_recommendation.as_str());

    let health = &result.architectural_health;
    out.section("Architectural Health");
    out.field("Identity", &health.architecture_identity);
    out.field("Pattern", &health.pattern);
    out.field("Boundaries", &health.boundary_strength);
    out.field("Cohesion", &health.cohesion);
    out.field("Consistency", &health.consistency);

    let deps = &result.dependency_analysis;
    out.section("Dependency Analysis");
    out.list("Central nodes", &deps.central_nodes);
    out.list("Top consumers", &deps.top_consumers);
    out.field("Circular risk", &deps.circular_risk);

    let blast = &result.blast_radius;
    out.section("Blast Radius");
    out.list("High blast radius", &blast.high_blast_radius_areas);
    out.list("Safe zones", &blast.safe_zones);
    out.field("Refactor confidence", &blast.refactor_confidence);

    let maint = &result.maintainability;
    out.section("Maintainability");
    out.field("Centralization", &maint.centralization);
    out.field("Abstraction quality", &maint.abstraction_quality);
    out.field("Dependency sprawl", &maint.dependency_sprawl);
    out.list("Debt indicators", &maint.technical_debt_indicators);

    let flow = &result.execution_flow;
    out.section("Execution Flow");
    out.field("Entry point", &flow.entry_point);
    out.field("Core path", &flow.core_path);
    out.field("Side effect zones", &flow.side_effect_zones);
    out.field("State mutation", &flow.state_mutation_pattern);
    out.field("API boundary", &flow.api_boundary);

    let testing = &result.testing_profile;
    out.section("Testing Profile");
    out.field("Unit coverage", &testing.unit_coverage);
    out.field("Integration depth", &testing.integration_depth);
    out.field("E2E presence", &testing.e2e_presence);
    out.field("Mocking strategy", &testing.mocking_strategy);
    out.field("Refactor safety", testing.refactor_safety_rating.as_str());

    let scale = &result.scalability;
    out.section("Scalability");
    out.field("Deployment maturity", &scale.deployment_maturity);
    out.field("Config hygiene", &scale.config_hygiene);
    out.field("Bottlenecks", &scale.scaling_bottlenecks);
    out.field("Caching", &scale.caching);

    let onboarding = &result.onboarding;
    out.section("Onboarding");
    out.field("Setup complexity", onboarding.setup_complexity.as_str());
    out.field("Docs clarity", onboarding.documentation_clarity.as_str());
    out.field("Estimated time", &onboarding.estimated_onboarding_time);
    out.field("Core domain", &onboarding.core_domain_summary);
    out.list("Start here", &onboarding.start_here);
    out.list("Then read", &onboarding.then_read);
    out.field("Data flow", &onboarding.data_flow_summary);
    out.list("High risk files", &onboarding.high_risk_files);
    out.field("First day advice", &onboarding.first_day_advice);
    out.list("Key files", &onboarding.key_files_to_read);
    out.list("Areas to avoid", &onboarding.areas_to_avoid);

    if !result.improvements.is_empty() {
        out.section("Suggested Improvements");
        for improvement in &result.improvements {
            println!(
                "  {} {} {}",
                priority_badge(improvement.priority),
                style(&improvement.title).bold(),
                style(&improvement.description).dim()
            );
        }
    }

    let rec = &result.final_recommendation;
    out.section("Final Recommendation");
    out.list("Good for", &rec.good_for);
    out.list("Risky for", &rec.risky_for);
    out.field("Approach", &rec.recommended_approach);
}

fn score_badge(score: u8) -> String {
    let styled = match score {
        8..=10 => style(format!("{}/10", score)).green(),
        5..=7 => style(format!("{}/10", score)).yellow(),
        _ => style(format!("{}/10", score)).red(),
    };
    styled.to_string()
}

fn priority_badge(priority: crate::types::Priority) -> String {
    use crate::types::Priority;
    let styled = match priority {
        Priority::High => style("[High]").red(),
        Priority::Medium => style("[Medium]").yellow(),
        Priority::Low => style("[Low]").dim(),
    };
    styled.to_string()
}
