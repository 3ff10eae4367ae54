use smallvec::SmallVec;

use super::{Opcode, Operand};
use crate::Name;

#[derive(Clone, Debug, Hash, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Instruction {
    pub(crate) opcode: Opcode,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub(crate) result: Option<Name>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub(crate) operands: SmallVec<[Operand; 2]>,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Vec::is_empty"))]
    pub(crate) successors: Vec<Name>,
}

#[bon::bon]
impl Instruction {
    #[builder(finish_fn = new)]
    pub fn new(
        /// The opcode class of this instruction.
        opcode: Opcode,
        /// The name bound to the value this instruction produces.
        #[builder(into)]
        result: Option<Name>,
        /// Operands in source order.
        #[builder(default)]
        operands: Vec<Operand>,
        /// Successor block names, only meaningful on terminators.
        #[builder(default)]
        successors: Vec<Name>,
    ) -> Self {
        Self {
            opcode,
            result,
            operands: SmallVec::from_vec(operands),
            successors,
        }
    }
}

impl std::fmt::Display for Instruction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(result) = &self.result {
            write!(f, "%{result} = ")?;
        }
        write!(f, "{}", self.opcode)?;
        for (i, operand) in self.operands.iter().enumerate() {
            let sep = if i == 0 { " " } else { ", " };
            write!(f, "{sep}{operand}")?;
        }
        for (i, successor) in self.successors.iter().enumerate() {
            let sep = if i == 0 && self.operands.is_empty() {
                " "
            } else {
                ", "
            };
            write!(f, "{sep}^{successor}")?;
        }
        Ok(())
    }
}
