mod block;
mod function;
mod instruction;
mod module;
mod opcode;
mod operand;

pub use block::BasicBlock;
pub use function::Function;
pub use instruction::Instruction;
pub use module::Module;
pub use opcode::{BinaryOp, Opcode};
pub use operand::Operand;
