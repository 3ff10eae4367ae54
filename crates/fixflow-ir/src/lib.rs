mod builder;
mod lattice;
mod name;
mod node;
mod view;


pub use builder::{BlockBuilder, FunctionBuilder};
pub use lattice::{HasBottom, Lattice};
pub use name::Name;
pub use node::{BasicBlock, BinaryOp, Function, Instruction, Module, Opcode, Operand};
pub use view::{BlockView, FunctionView, InstructionView};
