use crate::node::*;
use crate::Name;

/// Builds a [`BasicBlock`] one instruction at a time.
///
/// ```
/// use fixflow_ir::BlockBuilder;
///
/// let block = BlockBuilder::new("entry")
///     .load("t0", "a")
///     .load("t1", "b")
///     .add("t2", "t0", "t1")
///     .store("t2", "c")
///     .ret()
///     .finish();
/// assert_eq!(block.instructions.len(), 5);
/// ```
#[derive(Debug, Clone)]
pub struct BlockBuilder {
    name: Name,
    instructions: Vec<Instruction>,
}

impl BlockBuilder {
    pub fn new(name: impl Into<Name>) -> Self {
        BlockBuilder {
            name: name.into(),
            instructions: Vec::new(),
        }
    }

    /// Append an arbitrary instruction.
    pub fn inst(mut self, inst: Instruction) -> Self {
        self.instructions.push(inst);
        self
    }

    /// `%result = alloca`
    pub fn alloca(self, result: impl Into<Name>) -> Self {
        self.inst(
            Instruction::builder()
                .opcode(Opcode::Alloca)
                .result(result)
                .new(),
        )
    }

    /// `%result = load %address`
    pub fn load(self, result: impl Into<Name>, address: impl Into<Name>) -> Self {
        self.inst(
            Instruction::builder()
                .opcode(Opcode::Load)
                .result(result)
                .operands(vec![Operand::Value(address.into())])
                .new(),
        )
    }

    /// `store <value>, %address`
    pub fn store(self, value: impl Into<Operand>, address: impl Into<Name>) -> Self {
        self.inst(
            Instruction::builder()
                .opcode(Opcode::Store)
                .operands(vec![value.into(), Operand::Value(address.into())])
                .new(),
        )
    }

    /// `%result = <op> <lhs>, <rhs>`
    pub fn binary(
        self,
        op: BinaryOp,
        result: impl Into<Name>,
        lhs: impl Into<Operand>,
        rhs: impl Into<Operand>,
    ) -> Self {
        self.inst(
            Instruction::builder()
                .opcode(Opcode::Binary(op))
                .result(result)
                .operands(vec![lhs.into(), rhs.into()])
                .new(),
        )
    }

    pub fn add(
        self,
        result: impl Into<Name>,
        lhs: impl Into<Operand>,
        rhs: impl Into<Operand>,
    ) -> Self {
        self.binary(BinaryOp::Add, result, lhs, rhs)
    }

    pub fn sub(
        self,
        result: impl Into<Name>,
        lhs: impl Into<Operand>,
        rhs: impl Into<Operand>,
    ) -> Self {
        self.binary(BinaryOp::Sub, result, lhs, rhs)
    }

    pub fn mul(
        self,
        result: impl Into<Name>,
        lhs: impl Into<Operand>,
        rhs: impl Into<Operand>,
    ) -> Self {
        self.binary(BinaryOp::Mul, result, lhs, rhs)
    }

    pub fn sdiv(
        self,
        result: impl Into<Name>,
        lhs: impl Into<Operand>,
        rhs: impl Into<Operand>,
    ) -> Self {
        self.binary(BinaryOp::SDiv, result, lhs, rhs)
    }

    /// `%result = icmp <lhs>, <rhs>`
    pub fn compare(
        self,
        result: impl Into<Name>,
        lhs: impl Into<Operand>,
        rhs: impl Into<Operand>,
    ) -> Self {
        self.inst(
            Instruction::builder()
                .opcode(Opcode::Compare)
                .result(result)
                .operands(vec![lhs.into(), rhs.into()])
                .new(),
        )
    }

    /// Unconditional branch.
    pub fn br(self, target: impl Into<Name>) -> Self {
        self.inst(
            Instruction::builder()
                .opcode(Opcode::Branch)
                .successors(vec![target.into()])
                .new(),
        )
    }

    /// Two-way branch on `condition`.
    pub fn cond_br(
        self,
        condition: impl Into<Operand>,
        then_target: impl Into<Name>,
        else_target: impl Into<Name>,
    ) -> Self {
        self.inst(
            Instruction::builder()
                .opcode(Opcode::Branch)
                .operands(vec![condition.into()])
                .successors(vec![then_target.into(), else_target.into()])
                .new(),
        )
    }

    pub fn ret(self) -> Self {
        self.inst(Instruction::builder().opcode(Opcode::Return).new())
    }

    pub fn finish(self) -> BasicBlock {
        BasicBlock::new(self.name, self.instructions)
    }
}
