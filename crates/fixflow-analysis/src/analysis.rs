use std::fmt::Write;

use fixflow_ir::{FunctionView, Name};

use crate::cfg::{BlockMap, Cfg};
use crate::report::{BlockRecord, Report, labelled};
use crate::solver::{Problem, Solution, Solver};
use crate::{AnalysisConfig, AnalysisError, Fact, FactSet, LocalSets};

/// Which side of a block a result describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    In,
    Out,
}

/// A gen/kill dataflow analysis, solved by [`Solver`].
///
/// Implementors describe how to scan a function for local facts and which
/// problem to solve; [`analyze`] does the rest.
pub trait DataflowAnalysis {
    type Fact: Fact;

    /// Identifies the analysis in reports, e.g. `liveness`.
    fn name(&self) -> &'static str;

    /// Prefix of each block's fact line in reports.
    fn label(&self) -> &'static str;

    /// GEN and KILL of every block of `function`.
    fn local_sets<V: FunctionView>(
        &self,
        function: &V,
        cfg: &Cfg,
    ) -> Result<LocalSets<Self::Fact>, AnalysisError>;

    fn problem(&self, cfg: &Cfg) -> Problem<Self::Fact>;

    /// The side reported per block.
    fn reported(&self) -> Side {
        Side::Out
    }
}

/// Everything computed for one function: the CFG, local sets and solution.
#[derive(Debug, Clone)]
pub struct FunctionAnalysis<F: Fact> {
    analysis: &'static str,
    label: &'static str,
    reported: Side,
    cfg: Cfg,
    local: LocalSets<F>,
    solution: Solution<F>,
}

impl<F: Fact> FunctionAnalysis<F> {
    pub fn function(&self) -> &Name {
        self.cfg.function()
    }

    pub fn cfg(&self) -> &Cfg {
        &self.cfg
    }

    pub fn local(&self) -> &LocalSets<F> {
        &self.local
    }

    pub fn solution(&self) -> &Solution<F> {
        &self.solution
    }

    /// The reported set of every block.
    pub fn results(&self) -> &BlockMap<FactSet<F>> {
        match self.reported {
            Side::In => self.solution.inputs(),
            Side::Out => self.solution.outputs(),
        }
    }

    pub fn result(&self, block: &str) -> Option<&FactSet<F>> {
        self.results().get(block)
    }

    pub fn report(&self) -> Report {
        Report {
            analysis: self.analysis,
            function: self.function().clone(),
            label: self.label,
            blocks: self
                .results()
                .iter()
                .map(|(block, facts)| BlockRecord {
                    block: block.clone(),
                    facts: facts.to_sorted_strings(),
                })
                .collect(),
        }
    }

    /// Every intermediate map, block by block.
    pub fn dump(&self) -> String {
        let empty = FactSet::new();
        let mut out = String::new();
        let _ = writeln!(out, "{}: {}", self.analysis, self.function());
        let _ = writeln!(out, "passes: {}", self.solution.passes());
        let _ = writeln!(
            out,
            "{}",
            labelled("universe", &self.local.universe().to_sorted_strings())
        );
        for block in self.cfg.blocks() {
            let sets = [
                ("GEN", self.local.generated(block)),
                ("KILL", self.local.killed(block)),
                ("IN", self.solution.input(block)),
                ("OUT", self.solution.output(block)),
            ];
            let _ = writeln!(out, "----- {block} -----");
            let _ = writeln!(
                out,
                "{}",
                labelled("pred", &names(self.cfg.predecessors(block)))
            );
            let _ = writeln!(
                out,
                "{}",
                labelled("succ", &names(self.cfg.successors(block)))
            );
            for (label, set) in sets {
                let facts = set.unwrap_or(&empty).to_sorted_strings();
                let _ = writeln!(out, "{}", labelled(label, &facts));
            }
        }
        out
    }
}

fn names<'a>(iter: impl Iterator<Item = &'a Name>) -> Vec<String> {
    iter.map(Name::to_string).collect()
}

/// Run `analysis` on one function.
///
/// Returns `Ok(None)` if the configuration skips the function.
#[tracing::instrument(
    level = "debug",
    skip_all,
    fields(analysis = analysis.name(), function = %function.name())
)]
pub fn analyze<A, V>(
    analysis: &A,
    function: &V,
    config: &AnalysisConfig,
) -> Result<Option<FunctionAnalysis<A::Fact>>, AnalysisError>
where
    A: DataflowAnalysis,
    V: FunctionView,
{
    if config.skips(function.name().as_str()) {
        tracing::debug!("skipped");
        return Ok(None);
    }

    let cfg = Cfg::build(function)?;
    let local = analysis.local_sets(function, &cfg)?;
    let problem = analysis.problem(&cfg);
    let solution = Solver::new(&problem, &cfg, &local)
        .with_max_passes(config.max_passes)
        .solve()?;
    tracing::debug!(
        blocks = cfg.len(),
        universe = local.universe().len(),
        passes = solution.passes(),
        "solved"
    );

    Ok(Some(FunctionAnalysis {
        analysis: analysis.name(),
        label: analysis.label(),
        reported: analysis.reported(),
        cfg,
        local,
        solution,
    }))
}

/// The outcome of analyzing one function of a module.
#[derive(Debug)]
pub struct FunctionOutcome<F: Fact> {
    pub function: Name,
    pub result: Result<Option<FunctionAnalysis<F>>, AnalysisError>,
}

/// Run `analysis` on every function in turn. A function that fails does not
/// stop the others.
pub fn analyze_module<'m, A, V>(
    analysis: &A,
    functions: impl IntoIterator<Item = &'m V>,
    config: &AnalysisConfig,
) -> Vec<FunctionOutcome<A::Fact>>
where
    A: DataflowAnalysis,
    V: FunctionView + 'm,
{
    functions
        .into_iter()
        .map(|function| {
            let result = analyze(analysis, function, config);
            if let Err(err) = &result {
                tracing::warn!(function = %function.name(), "analysis failed: {err}");
            }
            FunctionOutcome {
                function: function.name().clone(),
                result,
            }
        })
        .collect()
}
