mod block;
mod function;

pub use block::BlockBuilder;
pub use function::FunctionBuilder;
