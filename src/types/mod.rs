pub mod error;
pub mod repo;
pub mod report;

pub use error::{Result, ResultExt, VetError};
pub use repo::RepoMetadata;
pub use report::{
    AdoptionRecommendation, AnalysisResult, ArchitecturalHealth, ArchitectureType, ActivitySignal,
    BlastRadius, CodebaseSize, CouplingRisk, DependencyAnalysis, DocumentationClarity,
    ExecutionFlow, ExecutiveVerdict, FinalRecommendation, Improvement, Maintainability,
    MaturityStage, ModularityStrength, Onboarding, Priority, ProductionReadiness, RefactorSafety,
    RepoSnapshot, Scalability, SetupComplexity, TestingProfile,
};
