//! Available expressions: a forward must-analysis over `add`, `sub`, `mul`
//! and `sdiv` expressions.

use fixflow_ir::{BlockView, FunctionView, InstructionView, Name, Opcode, Operand};
use rustc_hash::{FxHashMap, FxHashSet};

use crate::analysis::DataflowAnalysis;
use crate::cfg::Cfg;
use crate::fact::{ArithOp, Expression, OperandKey};
use crate::local::{Site, binary_operands, load_address, store_destination};
use crate::solver::{Boundary, Direction, Initial, Meet, Problem};
use crate::{AnalysisError, FactSet, LocalSets};

/// An expression is available at a point if every path from the entry
/// computes it and no store overwrites one of its operands afterwards.
#[derive(Debug, Clone, Copy, Default)]
pub struct AvailableExpressions;

impl DataflowAnalysis for AvailableExpressions {
    type Fact = Expression;

    fn name(&self) -> &'static str {
        "available-expressions"
    }

    fn label(&self) -> &'static str {
        "Available"
    }

    fn local_sets<V: FunctionView>(
        &self,
        function: &V,
        _cfg: &Cfg,
    ) -> Result<LocalSets<Expression>, AnalysisError> {
        let operands = OperandIdentity::scan(function)?;
        let index = DependencyIndex::scan(function, &operands)?;
        tracing::debug!(
            function = %function.name(),
            universe = index.universe.len(),
            "collected expressions"
        );

        let mut local = LocalSets::new(index.universe.clone());
        for block in function.blocks() {
            let mut generated = FactSet::new();
            let mut killed = FactSet::new();
            for (i, inst) in block.instructions().enumerate() {
                let site = Site {
                    function: function.name(),
                    block: block.name(),
                    index: i,
                    opcode: inst.opcode(),
                };
                match inst.opcode() {
                    Opcode::Binary(op) => {
                        let Some(op) = ArithOp::from_binary(op) else {
                            continue;
                        };
                        let (lhs, rhs) = binary_operands(inst, site)?;
                        let fact = operands.expression(lhs, op, rhs);
                        killed.remove(&fact);
                        generated.insert(fact);
                    }
                    Opcode::Store => {
                        let destination = store_destination(inst, site)?;
                        for fact in index.dependents(destination) {
                            generated.remove(fact);
                            killed.insert(fact.clone());
                        }
                    }
                    _ => {}
                }
            }
            tracing::trace!(block = %block.name(), %generated, %killed, "local sets");
            local.record(block.name().clone(), generated, killed);
        }
        Ok(local)
    }

    fn problem(&self, cfg: &Cfg) -> Problem<Expression> {
        Problem::builder()
            .direction(Direction::Forward)
            .meet(Meet::Intersection)
            .initial(Initial::Universe)
            .maybe_boundary(
                cfg.entry()
                    .map(|entry| Boundary::new(entry, FactSet::new())),
            )
            .build()
    }
}

/// Resolves operands to the identity an expression is keyed by: the loaded
/// variable for results of a `load`, the operand itself otherwise.
#[derive(Debug, Default)]
struct OperandIdentity {
    loaded: FxHashMap<Name, Name>,
}

impl OperandIdentity {
    /// Fails if two instructions bind the same result name, since operands
    /// naming it would be ambiguous.
    fn scan<V: FunctionView>(function: &V) -> Result<Self, AnalysisError> {
        let mut loaded = FxHashMap::default();
        let mut defined = FxHashSet::default();
        for block in function.blocks() {
            for (i, inst) in block.instructions().enumerate() {
                if let Some(result) = inst.result() {
                    if !defined.insert(result) {
                        return Err(AnalysisError::DuplicateResult {
                            function: function.name().clone(),
                            block: block.name().clone(),
                            index: i,
                            name: result.clone(),
                        });
                    }
                }
                if inst.opcode() != Opcode::Load {
                    continue;
                }
                let site = Site {
                    function: function.name(),
                    block: block.name(),
                    index: i,
                    opcode: Opcode::Load,
                };
                let address = load_address(inst, site)?;
                if let Some(result) = inst.result() {
                    loaded.insert(result.clone(), address.clone());
                }
            }
        }
        Ok(Self { loaded })
    }

    fn key(&self, operand: &Operand) -> OperandKey {
        match operand {
            Operand::Const(value) => OperandKey::Literal(*value),
            Operand::Value(name) => {
                OperandKey::Name(self.loaded.get(name).unwrap_or(name).clone())
            }
        }
    }

    fn expression(&self, lhs: &Operand, op: ArithOp, rhs: &Operand) -> Expression {
        Expression::new(self.key(lhs), op, self.key(rhs))
    }
}

/// Every expression of a function, and for each variable the expressions
/// that use it. Shared by all blocks of the function.
#[derive(Debug, Default)]
struct DependencyIndex {
    universe: FactSet<Expression>,
    dependents: FxHashMap<Name, FactSet<Expression>>,
}

impl DependencyIndex {
    fn scan<V: FunctionView>(
        function: &V,
        operands: &OperandIdentity,
    ) -> Result<Self, AnalysisError> {
        let mut index = Self::default();
        for block in function.blocks() {
            for (i, inst) in block.instructions().enumerate() {
                let Opcode::Binary(op) = inst.opcode() else {
                    continue;
                };
                let site = Site {
                    function: function.name(),
                    block: block.name(),
                    index: i,
                    opcode: inst.opcode(),
                };
                let (lhs, rhs) = binary_operands(inst, site)?;
                let Some(op) = ArithOp::from_binary(op) else {
                    continue;
                };
                let fact = operands.expression(lhs, op, rhs);
                for name in fact.names() {
                    index
                        .dependents
                        .entry(name.clone())
                        .or_default()
                        .insert(fact.clone());
                }
                index.universe.insert(fact);
            }
        }
        Ok(index)
    }

    fn dependents(&self, variable: &Name) -> impl Iterator<Item = &Expression> {
        self.dependents
            .get(variable)
            .into_iter()
            .flat_map(|facts| facts.iter())
    }
}

#[cfg(test)]
mod tests {
    use fixflow_ir::{BlockBuilder, FunctionBuilder};

    use super::*;

    fn local(function: &fixflow_ir::Function) -> LocalSets<Expression> {
        let cfg = Cfg::build(function).unwrap();
        AvailableExpressions.local_sets(function, &cfg).unwrap()
    }

    #[test]
    fn test_loaded_operands_resolve_to_variables() {
        let function = FunctionBuilder::new("f")
            .block(
                BlockBuilder::new("entry")
                    .load("t0", "a")
                    .load("t1", "b")
                    .add("t2", "t0", "t1")
                    .mul("t3", "t2", 4i64)
                    .ret(),
            )
            .finish();
        let local = local(&function);
        assert_eq!(local.generated("entry").unwrap().to_string(), "a+b t2*4");
        assert_eq!(local.universe().len(), 2);
    }

    #[test]
    fn test_reused_result_name_is_an_error() {
        let function = FunctionBuilder::new("f")
            .block(
                BlockBuilder::new("b1")
                    .load("t0", "a")
                    .add("t1", "t0", 1i64)
                    .store(0i64, "a")
                    .br("b2"),
            )
            .block(BlockBuilder::new("b2").load("t0", "b").ret())
            .finish();
        let cfg = Cfg::build(&function).unwrap();
        let err = AvailableExpressions.local_sets(&function, &cfg).unwrap_err();
        assert_eq!(
            err,
            AnalysisError::DuplicateResult {
                function: "f".into(),
                block: "b2".into(),
                index: 0,
                name: "t0".into(),
            }
        );
    }

    #[test]
    fn test_store_kills_dependents_and_regeneration_revives() {
        let function = FunctionBuilder::new("f")
            .block(
                BlockBuilder::new("entry")
                    .load("t0", "a")
                    .load("t1", "b")
                    .add("t2", "t0", "t1")
                    .store(7i64, "a")
                    .ret(),
            )
            .block(
                BlockBuilder::new("again")
                    .store(1i64, "b")
                    .load("t3", "a")
                    .load("t4", "b")
                    .add("t5", "t3", "t4")
                    .ret(),
            )
            .finish();
        let local = local(&function);
        assert!(local.generated("entry").unwrap().is_empty());
        assert_eq!(local.killed("entry").unwrap().to_string(), "a+b");
        assert_eq!(local.generated("again").unwrap().to_string(), "a+b");
        assert!(local.killed("again").unwrap().is_empty());
    }

    #[test]
    fn test_dependency_index_is_function_wide() {
        // The store in `first` precedes the only computation of `x+1`, in a
        // later block, and still kills it.
        let function = FunctionBuilder::new("f")
            .block(BlockBuilder::new("first").store(0i64, "x").br("second"))
            .block(
                BlockBuilder::new("second")
                    .load("t0", "x")
                    .add("t1", "t0", 1i64)
                    .ret(),
            )
            .finish();
        let local = local(&function);
        assert_eq!(local.killed("first").unwrap().to_string(), "x+1");
    }

    #[test]
    fn test_other_binary_ops_form_no_facts() {
        let function = FunctionBuilder::new("f")
            .block(
                BlockBuilder::new("entry")
                    .binary(fixflow_ir::BinaryOp::Xor, "t0", "a", "b")
                    .binary(fixflow_ir::BinaryOp::UDiv, "t1", "a", "b")
                    .ret(),
            )
            .finish();
        let local = local(&function);
        assert!(local.universe().is_empty());
        assert!(local.generated("entry").unwrap().is_empty());
    }

    #[test]
    fn test_binary_with_one_operand_is_an_error() {
        let inst = fixflow_ir::Instruction::builder()
            .opcode(Opcode::Binary(fixflow_ir::BinaryOp::Shl))
            .result("t0")
            .operands(vec![Operand::from("a")])
            .new();
        let function = FunctionBuilder::new("f")
            .block(BlockBuilder::new("entry").inst(inst).ret())
            .finish();
        let cfg = Cfg::build(&function).unwrap();
        let err = AvailableExpressions.local_sets(&function, &cfg).unwrap_err();
        assert!(matches!(
            err,
            AnalysisError::MissingOperand {
                expected: 2,
                found: 1,
                ..
            }
        ));
    }

    #[test]
    fn test_store_to_constant_is_an_error() {
        let inst = fixflow_ir::Instruction::builder()
            .opcode(Opcode::Store)
            .operands(vec![Operand::from(1i64), Operand::from(2i64)])
            .new();
        let function = FunctionBuilder::new("f")
            .block(BlockBuilder::new("entry").inst(inst).ret())
            .finish();
        let cfg = Cfg::build(&function).unwrap();
        let err = AvailableExpressions.local_sets(&function, &cfg).unwrap_err();
        assert!(matches!(err, AnalysisError::UnnamedAddress { index: 0, .. }));
    }
}
