//! Audit Prompt Construction
//!
//! Renders the instruction text sent to the language model from repository
//! metadata. Pure: the same metadata always yields the same prompt text.
//!
//! The critical shape constraints (score range, "single string not array")
//! are stated in BOTH the user prompt and the system instruction;
//! duplicating them measurably reduces malformed output downstream.

use crate::types::RepoMetadata;
use crate::types::report::{
    ActivitySignal, AdoptionRecommendation, ArchitectureType, CodebaseSize, DocumentationClarity,
    MaturityStage, ModularityStrength, CouplingRisk, Priority, ProductionReadiness,
    RefactorSafety, SetupComplexity,
};

/// Prompt section types
#[derive(Debug, Clone)]
enum PromptSection {
    /// Role definition with expertise area
    Role { expertise: String, task: String },
    /// Numbered objectives
    Objectives(Vec<String>),
    /// Context key-value pairs, rendered in insertion order
    Context(Vec<(String, String)>),
    /// Raw text section with optional header
    Text {
        header: Option<String>,
        content: String,
    },
    /// Code block with language
    Code { language: String, content: String },
}

/// Prompt builder for consistent prompt construction.
///
/// Context entries keep insertion order so built prompts are byte-stable.
#[derive(Debug, Clone, Default)]
pub struct PromptBuilder {
    sections: Vec<PromptSection>,
}

impl PromptBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn role(mut self, expertise: &str, task: &str) -> Self {
        self.sections.push(PromptSection::Role {
            expertise: expertise.to_string(),
            task: task.to_string(),
        });
        self
    }

    pub fn objectives(mut self, objectives: Vec<&str>) -> Self {
        self.sections.push(PromptSection::Objectives(
            objectives.into_iter().map(String::from).collect(),
        ));
        self
    }

    /// Add a context item, appending to the current context section.
    pub fn context_item(mut self, key: &str, value: &str) -> Self {
        if let Some(PromptSection::Context(ctx)) = self.sections.last_mut() {
            ctx.push((key.to_string(), value.to_string()));
        } else {
            self.sections
                .push(PromptSection::Context(vec![(
                    key.to_string(),
                    value.to_string(),
                )]));
        }
        self
    }

    /// Add a text section with header.
    pub fn section(mut self, header: &str, content: &str) -> Self {
        self.sections.push(PromptSection::Text {
            header: Some(header.to_string()),
            content: content.to_string(),
        });
        self
    }

    pub fn code(mut self, language: &str, content: &str) -> Self {
        self.sections.push(PromptSection::Code {
            language: language.to_string(),
            content: content.to_string(),
        });
        self
    }

    pub fn build(self) -> String {
        let mut prompt = String::new();

        for section in self.sections {
            match section {
                PromptSection::Role { expertise, task } => {
                    prompt.push_str("<ROLE>\n");
                    prompt.push_str(&format!("You are a {} performing {}.\n", expertise, task));
                    prompt.push_str("</ROLE>\n\n");
                }
                PromptSection::Objectives(objectives) => {
                    prompt.push_str("<OBJECTIVES>\n");
                    for (i, obj) in objectives.iter().enumerate() {
                        prompt.push_str(&format!("{}. {}\n", i + 1, obj));
                    }
                    prompt.push_str("</OBJECTIVES>\n\n");
                }
                PromptSection::Context(ctx) => {
                    prompt.push_str("# Context\n\n");
                    for (key, value) in ctx {
                        prompt.push_str(&format!("**{}**: {}\n", key, value));
                    }
                    prompt.push('\n');
                }
                PromptSection::Text { header, content } => {
                    if let Some(h) = header {
                        prompt.push_str(&format!("# {}\n\n", h));
                    }
                    prompt.push_str(&content);
                    prompt.push_str("\n\n");
                }
                PromptSection::Code { language, content } => {
                    prompt.push_str(&format!("```{}\n", language));
                    prompt.push_str(&content);
                    prompt.push_str("\n```\n\n");
                }
            }
        }

        prompt.trim_end().to_string()
    }
}

// =============================================================================
// Audit prompt
// =============================================================================

/// JSON skeleton the model must fill in, with every enum's allowed values
/// documented inline. Kept in sync with `types::report`.
const RESPONSE_SKELETON: &str = r#"{
  "repoSnapshot": {
    "description": "single descriptive string",
    "primaryStack": "comma-separated string",
    "architectureType": "Feature-based", // ONLY: "Feature-based" | "Layered" | "Monolithic" | "Microservices" | "Hybrid" | "Unstructured"
    "codebaseSize": "Medium", // ONLY: "Small" | "Medium" | "Large" | "Massive"
    "activitySignal": "Actively Maintained" // ONLY: "Actively Maintained" | "Low Activity" | "Stagnant" | "Deprecated"
  },
  "executiveVerdict": {
    "maturityStage": "Structured Early-Stage", // ONLY: "Prototype" | "Structured Early-Stage" | "Growing" | "Production-Grade"
    "maintainabilityScore": 7, // INTEGER 1-10 ONLY (NOT 0-100, NOT >10)
    "maintenanceContext": "descriptive string",
    "modularityStrength": "Moderate", // ONLY: "Weak" | "Moderate" | "Strong"
    "couplingRisk": "Medium", // ONLY: "Low" | "Medium" | "High"
    "couplingContext": "descriptive string",
    "refactorSafety": "Moderate", // ONLY: "Low" | "Moderate" | "High"
    "refactorContext": "descriptive string",
    "productionReadiness": "Early-stage", // ONLY: "Experimental" | "Early-stage" | "Stable" | "Production-Hardened"
    "adoptionRecommendation": "Adopt with caution" // ONLY: "Safe to adopt" | "Adopt with caution" | "Refactor before adopting" | "Not recommended for production"
  },
  "architecturalHealth": {
    "architectureIdentity": "string",
    "pattern": "string",
    "boundaryStrength": "string",
    "cohesion": "string",
    "consistency": "string"
  },
  "dependencyAnalysis": {
    "centralNodes": ["array of file paths"],
    "topConsumers": ["array of file paths"],
    "circularRisk": "string"
  },
  "blastRadius": {
    "highBlastRadiusAreas": ["array of strings"],
    "safeZones": ["array of strings"],
    "refactorConfidence": "string"
  },
  "maintainability": {
    "centralization": "string",
    "abstractionQuality": "string",
    "dependencySprawl": "string",
    "technicalDebtIndicators": ["array of strings"]
  },
  "executionFlow": {
    "entryPoint": "string",
    "corePath": "string",
    "sideEffectZones": "Database writes in auth module, API calls in analysis layer", // MUST BE A SINGLE STRING, NOT AN ARRAY
    "stateMutationPattern": "string",
    "apiBoundary": "string"
  },
  "testingProfile": {
    "unitCoverage": "string",
    "integrationDepth": "string",
    "e2ePresence": "string",
    "mockingStrategy": "string",
    "refactorSafetyRating": "Low" // ONLY: "Low" | "Moderate" | "High"
  },
  "scalability": {
    "deploymentMaturity": "string",
    "configHygiene": "string",
    "scalingBottlenecks": "string",
    "caching": "string"
  },
  "onboarding": {
    "setupComplexity": "Low", // ONLY: "Low" | "Moderate" | "High"
    "documentationClarity": "Poor", // ONLY: "Poor" | "Average" | "Excellent"
    "estimatedOnboardingTime": "string",
    "coreDomainSummary": "one-paragraph summary of what this codebase actually does",
    "startHere": ["array of file paths to read first"],
    "thenRead": ["array of file paths to read next"],
    "dataFlowSummary": "input -> transformation -> output, one line",
    "highRiskFiles": ["array of file paths to avoid changing initially"],
    "firstDayAdvice": "string",
    "keyFilesToRead": ["array of file paths"],
    "areasToAvoid": ["array of strings"]
  },
  "improvements": [
    {
      "title": "string",
      "description": "string",
      "priority": "High" // ONLY: "High" | "Medium" | "Low"
    }
  ],
  "finalRecommendation": {
    "goodFor": ["array of strings"],
    "riskyFor": ["array of strings"],
    "recommendedApproach": "string"
  }
}"#;

/// Shape constraints repeated verbatim in both message roles.
const VALIDATION_RULES: &str = "\
- maintainabilityScore: MUST be an integer 1-10 (do NOT use a 0-100 scale, do NOT exceed 10)
- sideEffectZones: MUST be a single string describing zones (NOT an array)
- All enum fields: MUST match the EXACT case-sensitive values listed in the skeleton
- Return ONLY raw JSON (no ```json markdown fencing, no commentary)";

/// Fixed system-role instruction sent with every audit request.
pub fn system_instruction() -> String {
    format!(
        "You are a Principal Software Architect. You provide dense, evidence-based \
technical audits of unfamiliar repositories.\n\n\
CRITICAL OUTPUT RULES:\n{rules}\n\n\
EXACT ENUM VALUES (case-sensitive):\n\
- architectureType: {arch}\n\
- codebaseSize: {size}\n\
- activitySignal: {activity}\n\
- maturityStage: {maturity}\n\
- modularityStrength: {modularity}\n\
- couplingRisk: {coupling}\n\
- refactorSafety / refactorSafetyRating: {refactor}\n\
- productionReadiness: {readiness}\n\
- adoptionRecommendation: {adoption}\n\
- setupComplexity: {setup}\n\
- documentationClarity: {docs}\n\
- priority: {priority}\n\n\
If uncertain, use conservative values rather than inventing new ones.",
        rules = VALIDATION_RULES,
        arch = ArchitectureType::VALUES.join(" | "),
        size = CodebaseSize::VALUES.join(" | "),
        activity = ActivitySignal::VALUES.join(" | "),
        maturity = MaturityStage::VALUES.join(" | "),
        modularity = ModularityStrength::VALUES.join(" | "),
        coupling = CouplingRisk::VALUES.join(" | "),
        refactor = RefactorSafety::VALUES.join(" | "),
        readiness = ProductionReadiness::VALUES.join(" | "),
        adoption = AdoptionRecommendation::VALUES.join(" | "),
        setup = SetupComplexity::VALUES.join(" | "),
        docs = DocumentationClarity::VALUES.join(" | "),
        priority = Priority::VALUES.join(" | "),
    )
}

/// Render the user-role audit prompt for one repository.
pub fn build_audit_prompt(meta: &RepoMetadata) -> String {
    let description = if meta.description.trim().is_empty() {
        "No description provided.".to_string()
    } else {
        meta.description.clone()
    };

    let mut builder = PromptBuilder::new()
        .role(
            "Principal Software Architect",
            "a decision-grade technical audit of a repository you have never seen before",
        )
        .objectives(vec![
            "NO PLATITUDES: say \"Strict typing in API layers reduces runtime regression risk\", not \"types add safety\"",
            "SPECIFIC EVIDENCE: back every claim with file paths or patterns from the file list",
            "CHANGE-CENTRIC: focus on change blast radius and refactor risk",
            "DECISION-FIRST: lead to a clear adopt / refactor / avoid decision",
            "TONE: professional, concise, unsentimental",
        ])
        .context_item("Repository", &meta.slug())
        .context_item("Primary Language", &meta.language)
        .context_item("Description", &description);

    builder = builder.section("File Structure", &meta.tree.join("\n"));

    let hints = entry_point_hints(&meta.tree);
    if !hints.is_empty() {
        builder = builder.section(
            "Entry Point Hints (heuristic, advisory only)",
            &hints.join("\n"),
        );
    }

    if !meta.readme.trim().is_empty() {
        builder = builder.section("README Excerpt", &meta.readme);
    }

    if !meta.manifest_text.trim().is_empty() {
        builder = builder.section("Manifest", &meta.manifest_text);
    }

    builder
        .section("Critical Validation Rules", VALIDATION_RULES)
        .section(
            "Output Contract",
            "Return a JSON object matching this EXACT structure (comments document allowed values; do not emit them):",
        )
        .code("jsonc", RESPONSE_SKELETON)
        .build()
}

/// Pattern-match well-known path fragments to guess framework or domain
/// entry files. Advisory text only; accuracy is not a contract.
pub fn entry_point_hints(tree: &[String]) -> Vec<String> {
    const PATTERNS: &[(&str, &str)] = &[
        ("app/page.", "framework route entry (App Router)"),
        ("pages/_app.", "application shell (Pages Router)"),
        ("src/main.", "main entry point"),
        ("src/index.", "index module entry"),
        ("src/lib.rs", "library crate root"),
        ("cmd/", "command entry point"),
        ("main.py", "script entry point"),
        ("manage.py", "framework management entry"),
        ("index.js", "module entry"),
        ("index.ts", "module entry"),
    ];
    const MAX_HINTS: usize = 8;

    let mut hints = Vec::new();
    for path in tree {
        if let Some((_, hint)) = PATTERNS.iter().find(|(frag, _)| path.contains(frag)) {
            hints.push(format!("{} ({})", path, hint));
            if hints.len() == MAX_HINTS {
                break;
            }
        }
    }
    hints
}
