//! Per-block GEN/KILL sets and the operand checks shared by the local scans.

use fixflow_ir::{InstructionView, Name, Opcode, Operand};

use crate::cfg::BlockMap;
use crate::{AnalysisError, Fact, FactSet};

/// GEN and KILL of every block, plus the universe of facts seen in the function.
///
/// Computed once before solving and never modified afterwards.
#[derive(Debug, Clone)]
pub struct LocalSets<F: Fact> {
    generated: BlockMap<FactSet<F>>,
    killed: BlockMap<FactSet<F>>,
    universe: FactSet<F>,
}

impl<F: Fact> LocalSets<F> {
    pub fn new(universe: FactSet<F>) -> Self {
        Self {
            generated: BlockMap::default(),
            killed: BlockMap::default(),
            universe,
        }
    }

    pub fn record(&mut self, block: Name, generated: FactSet<F>, killed: FactSet<F>) {
        self.generated.insert(block.clone(), generated);
        self.killed.insert(block, killed);
    }

    pub fn generated(&self, block: &str) -> Option<&FactSet<F>> {
        self.generated.get(block)
    }

    pub fn killed(&self, block: &str) -> Option<&FactSet<F>> {
        self.killed.get(block)
    }

    pub fn universe(&self) -> &FactSet<F> {
        &self.universe
    }

    /// `GEN(block) ∪ (input − KILL(block))`. Blocks without recorded sets pass
    /// `input` through unchanged.
    pub fn transfer(&self, block: &str, input: &FactSet<F>) -> FactSet<F> {
        match (self.generated.get(block), self.killed.get(block)) {
            (Some(generated), Some(killed)) => generated.transfer(input, killed),
            (Some(generated), None) => generated.transfer(input, &FactSet::new()),
            (None, Some(killed)) => input.difference(killed),
            (None, None) => input.clone(),
        }
    }
}

/// Where an instruction sits, for error reporting.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Site<'a> {
    pub function: &'a Name,
    pub block: &'a Name,
    pub index: usize,
    pub opcode: Opcode,
}

impl Site<'_> {
    fn missing_operand(&self, expected: usize, found: usize) -> AnalysisError {
        AnalysisError::MissingOperand {
            function: self.function.clone(),
            block: self.block.clone(),
            index: self.index,
            opcode: self.opcode,
            expected,
            found,
        }
    }

    fn unnamed_address(&self) -> AnalysisError {
        AnalysisError::UnnamedAddress {
            function: self.function.clone(),
            block: self.block.clone(),
            index: self.index,
            opcode: self.opcode,
        }
    }
}

/// The two operands of a binary instruction.
pub(crate) fn binary_operands<'i, I: InstructionView>(
    inst: &'i I,
    site: Site<'_>,
) -> Result<(&'i Operand, &'i Operand), AnalysisError> {
    let mut operands = inst.operands();
    match (operands.next(), operands.next()) {
        (Some(lhs), Some(rhs)) => Ok((lhs, rhs)),
        (lhs, _) => Err(site.missing_operand(2, usize::from(lhs.is_some()))),
    }
}

/// The variable a store writes to: its last operand after the stored value.
pub(crate) fn store_destination<'i, I: InstructionView>(
    inst: &'i I,
    site: Site<'_>,
) -> Result<&'i Name, AnalysisError> {
    let mut operands = inst.operands();
    if operands.next().is_none() {
        return Err(site.missing_operand(2, 0));
    }
    let destination = operands.last().ok_or_else(|| site.missing_operand(2, 1))?;
    destination.name().ok_or_else(|| site.unnamed_address())
}

/// The variable a load reads from.
pub(crate) fn load_address<'i, I: InstructionView>(
    inst: &'i I,
    site: Site<'_>,
) -> Result<&'i Name, AnalysisError> {
    let address = inst
        .operands()
        .next()
        .ok_or_else(|| site.missing_operand(1, 0))?;
    address.name().ok_or_else(|| site.unnamed_address())
}
