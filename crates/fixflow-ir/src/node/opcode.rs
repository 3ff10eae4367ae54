use std::fmt;

/// Two-operand integer arithmetic and bitwise operators.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    SDiv,
    UDiv,
    SRem,
    URem,
    Shl,
    LShr,
    AShr,
    And,
    Or,
    Xor,
}

impl BinaryOp {
    pub fn mnemonic(self) -> &'static str {
        match self {
            BinaryOp::Add => "add",
            BinaryOp::Sub => "sub",
            BinaryOp::Mul => "mul",
            BinaryOp::SDiv => "sdiv",
            BinaryOp::UDiv => "udiv",
            BinaryOp::SRem => "srem",
            BinaryOp::URem => "urem",
            BinaryOp::Shl => "shl",
            BinaryOp::LShr => "lshr",
            BinaryOp::AShr => "ashr",
            BinaryOp::And => "and",
            BinaryOp::Or => "or",
            BinaryOp::Xor => "xor",
        }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}

/// The classification of an instruction that the analyses dispatch on.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Opcode {
    Binary(BinaryOp),
    /// `load <address>`
    Load,
    /// `store <value>, <address>`
    Store,
    Compare,
    Alloca,
    Call,
    /// Transfers control to the instruction's successors.
    Branch,
    Return,
    Other,
}

impl Opcode {
    pub fn is_terminator(self) -> bool {
        matches!(self, Opcode::Branch | Opcode::Return)
    }

    pub fn is_binary(self) -> bool {
        matches!(self, Opcode::Binary(_))
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Opcode::Binary(op) => op.fmt(f),
            Opcode::Load => f.write_str("load"),
            Opcode::Store => f.write_str("store"),
            Opcode::Compare => f.write_str("icmp"),
            Opcode::Alloca => f.write_str("alloca"),
            Opcode::Call => f.write_str("call"),
            Opcode::Branch => f.write_str("br"),
            Opcode::Return => f.write_str("ret"),
            Opcode::Other => f.write_str("other"),
        }
    }
}
