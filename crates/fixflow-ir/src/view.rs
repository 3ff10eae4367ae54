//! Read-only views over a function's IR.
//!
//! The analyses only ever see IR through these traits, so a host compiler can
//! expose its own representation without converting it into [`Function`].

use crate::{BasicBlock, Function, Instruction, Name, Opcode, Operand};

pub trait InstructionView {
    fn opcode(&self) -> Opcode;
    fn result(&self) -> Option<&Name>;
    fn operands(&self) -> impl Iterator<Item = &Operand>;
    /// Successor block names declared by a terminator.
    fn successors(&self) -> impl Iterator<Item = &Name>;
}

pub trait BlockView {
    type Instruction: InstructionView;

    fn name(&self) -> &Name;
    fn instructions(&self) -> impl Iterator<Item = &Self::Instruction>;

    /// Successors declared by the block's terminator, empty when the block
    /// does not end in one.
    fn successors(&self) -> impl Iterator<Item = &Name> {
        self.instructions()
            .last()
            .filter(|inst| inst.opcode().is_terminator())
            .into_iter()
            .flat_map(|inst| inst.successors())
    }
}

pub trait FunctionView {
    type Block: BlockView;

    fn name(&self) -> &Name;
    /// Blocks in declaration order. The first block is the entry.
    fn blocks(&self) -> impl Iterator<Item = &Self::Block>;
}

impl InstructionView for Instruction {
    fn opcode(&self) -> Opcode {
        self.opcode
    }

    fn result(&self) -> Option<&Name> {
        self.result.as_ref()
    }

    fn operands(&self) -> impl Iterator<Item = &Operand> {
        self.operands.iter()
    }

    fn successors(&self) -> impl Iterator<Item = &Name> {
        self.successors.iter()
    }
}

impl BlockView for BasicBlock {
    type Instruction = Instruction;

    fn name(&self) -> &Name {
        &self.name
    }

    fn instructions(&self) -> impl Iterator<Item = &Instruction> {
        self.instructions.iter()
    }
}

impl FunctionView for Function {
    type Block = BasicBlock;

    fn name(&self) -> &Name {
        &self.name
    }

    fn blocks(&self) -> impl Iterator<Item = &BasicBlock> {
        self.blocks.iter()
    }
}
