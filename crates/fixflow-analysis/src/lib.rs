//! Iterative gen/kill dataflow analysis over a control-flow graph.
//!
//! A [`DataflowAnalysis`] computes GEN and KILL for every block; the generic
//! [`Solver`] then iterates `GEN ∪ (X − KILL)` with the analysis' meet
//! operator until nothing changes. Two analyses are provided:
//! [`AvailableExpressions`] (forward, intersection) and [`Liveness`]
//! (backward, union).
//!
//! ```
//! use fixflow_analysis::{AnalysisConfig, Liveness, analyze};
//! use fixflow_ir::{BlockBuilder, FunctionBuilder};
//!
//! let function = FunctionBuilder::new("f")
//!     .block(BlockBuilder::new("entry").load("t0", "x").store("t0", "y").br("exit"))
//!     .block(BlockBuilder::new("exit").load("t1", "y").add("t2", "t1", 1i64).ret())
//!     .finish();
//!
//! let result = analyze(&Liveness, &function, &AnalysisConfig::default())
//!     .unwrap()
//!     .unwrap();
//! assert_eq!(result.result("entry").unwrap().to_string(), "y");
//! ```

mod analysis;
mod available;
pub mod cfg;
mod config;
mod error;
mod fact;
mod liveness;
mod local;
pub mod report;
pub mod solver;

pub use analysis::{
    DataflowAnalysis, FunctionAnalysis, FunctionOutcome, Side, analyze, analyze_module,
};
pub use available::AvailableExpressions;
pub use cfg::Cfg;
pub use config::AnalysisConfig;
pub use error::AnalysisError;
pub use fact::{ArithOp, Expression, Fact, FactSet, OperandKey, Variable};
pub use liveness::Liveness;
pub use local::LocalSets;
pub use report::Report;
pub use solver::{Problem, Solution, Solver};
