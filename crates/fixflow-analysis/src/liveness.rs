//! Live variables: a backward may-analysis over the variables read through
//! `load` and written through `store`.

use fixflow_ir::{BlockView, FunctionView, InstructionView, Name, Opcode};

use crate::analysis::DataflowAnalysis;
use crate::cfg::Cfg;
use crate::fact::Variable;
use crate::local::{Site, binary_operands, load_address, store_destination};
use crate::solver::{Direction, Initial, Meet, Problem};
use crate::{AnalysisError, FactSet, LocalSets};

/// A variable is live at a point if some path from there reads it before
/// writing it.
///
/// Reads are modelled through a pending buffer: a `load` stages the variable,
/// and the next binary operation or `store` consumes everything staged. A
/// comparison discards staged loads without consuming them, so variables only
/// read by comparisons are not considered used.
#[derive(Debug, Clone, Copy, Default)]
pub struct Liveness;

impl DataflowAnalysis for Liveness {
    type Fact = Variable;

    fn name(&self) -> &'static str {
        "liveness"
    }

    fn label(&self) -> &'static str {
        "Live-out"
    }

    fn local_sets<V: FunctionView>(
        &self,
        function: &V,
        _cfg: &Cfg,
    ) -> Result<LocalSets<Variable>, AnalysisError> {
        let mut blocks = Vec::new();
        let mut universe = FactSet::new();
        for block in function.blocks() {
            let mut pending: Vec<Name> = Vec::new();
            let mut uses = FactSet::new();
            let mut killed = FactSet::new();
            for (i, inst) in block.instructions().enumerate() {
                let site = Site {
                    function: function.name(),
                    block: block.name(),
                    index: i,
                    opcode: inst.opcode(),
                };
                match inst.opcode() {
                    Opcode::Load => pending.push(load_address(inst, site)?.clone()),
                    Opcode::Binary(_) => {
                        binary_operands(inst, site)?;
                        uses.extend(pending.drain(..).map(Variable));
                    }
                    Opcode::Store => {
                        let destination = store_destination(inst, site)?;
                        uses.extend(pending.drain(..).map(Variable));
                        killed.insert(Variable(destination.clone()));
                    }
                    Opcode::Compare => pending.clear(),
                    _ => {}
                }
            }
            let generated = uses.difference(&killed);
            tracing::trace!(block = %block.name(), %generated, %killed, "local sets");
            universe.extend(generated.iter().chain(&killed).cloned());
            blocks.push((block.name().clone(), generated, killed));
        }

        let mut local = LocalSets::new(universe);
        for (block, generated, killed) in blocks {
            local.record(block, generated, killed);
        }
        Ok(local)
    }

    fn problem(&self, _cfg: &Cfg) -> Problem<Variable> {
        Problem::builder()
            .direction(Direction::Backward)
            .meet(Meet::Union)
            .initial(Initial::Generated)
            .build()
    }
}
