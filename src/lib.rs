pub use fixflow_analysis as analysis;
pub use fixflow_ir as ir;

pub mod prelude {
    pub use fixflow_analysis::{
        AnalysisConfig, AnalysisError, AvailableExpressions, DataflowAnalysis, FactSet,
        FunctionAnalysis, Liveness, Report, analyze, analyze_module,
    };
    pub use fixflow_ir::*;
}
