use super::BlockBuilder;
use crate::node::{BasicBlock, Function};
use crate::Name;

#[derive(Debug, Clone)]
pub struct FunctionBuilder {
    name: Name,
    blocks: Vec<BasicBlock>,
}

impl FunctionBuilder {
    pub fn new(name: impl Into<Name>) -> Self {
        FunctionBuilder {
            name: name.into(),
            blocks: Vec::new(),
        }
    }

    /// Append a block. Blocks keep the order they are added in; the first one
    /// becomes the entry.
    pub fn block(mut self, block: BlockBuilder) -> Self {
        self.blocks.push(block.finish());
        self
    }

    pub fn finish(self) -> Function {
        Function::new(self.name, self.blocks)
    }
}
