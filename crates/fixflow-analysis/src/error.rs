use fixflow_ir::{Name, Opcode};

/// Error type for a failed function analysis.
///
/// Every variant is fatal for the function it was raised in: the analysis of
/// that function stops, other functions in the same module are unaffected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AnalysisError {
    /// A terminator names a block that the function does not define.
    #[error("block '{block}' in function '{function}' branches to unknown block '{successor}'")]
    UnknownSuccessor {
        function: Name,
        block: Name,
        successor: Name,
    },
    /// Two blocks share a name, so successor names are ambiguous.
    #[error("function '{function}' defines block '{block}' more than once")]
    DuplicateBlock { function: Name, block: Name },
    /// A branch or return followed by more instructions in its block.
    #[error("{opcode} at {function}:{block}#{index} is not the last instruction of its block")]
    MisplacedTerminator {
        function: Name,
        block: Name,
        index: usize,
        opcode: Opcode,
    },
    /// A result name bound by more than one instruction of the function.
    #[error("result '{name}' at {function}:{block}#{index} is already defined")]
    DuplicateResult {
        function: Name,
        block: Name,
        index: usize,
        name: Name,
    },
    /// The problem's boundary names a block the function does not define.
    #[error("boundary block '{block}' is not in function '{function}'")]
    UnknownBoundary { function: Name, block: Name },
    /// An instruction lacks an operand its opcode requires.
    #[error(
        "{opcode} at {function}:{block}#{index} needs {expected} operand(s), found {found}"
    )]
    MissingOperand {
        function: Name,
        block: Name,
        index: usize,
        opcode: Opcode,
        expected: usize,
        found: usize,
    },
    /// A store or load whose address operand is a literal instead of a name.
    #[error("{opcode} at {function}:{block}#{index} has no named address operand")]
    UnnamedAddress {
        function: Name,
        block: Name,
        index: usize,
        opcode: Opcode,
    },
    /// The solver ran out of passes before reaching a fixed point.
    #[error("no fixed point for function '{function}' after {passes} passes")]
    NoConvergence { function: Name, passes: usize },
}
