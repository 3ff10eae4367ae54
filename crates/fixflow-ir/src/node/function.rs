use super::BasicBlock;
use crate::Name;

#[derive(Clone, Debug, Hash, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Function {
    pub name: Name,
    /// Blocks in declaration order; the first one is the entry.
    #[cfg_attr(feature = "serde", serde(default))]
    pub blocks: Vec<BasicBlock>,
}

impl Function {
    pub fn new(name: impl Into<Name>, blocks: Vec<BasicBlock>) -> Self {
        Self {
            name: name.into(),
            blocks,
        }
    }

    pub fn entry(&self) -> Option<&BasicBlock> {
        self.blocks.first()
    }

    pub fn block(&self, name: &str) -> Option<&BasicBlock> {
        self.blocks.iter().find(|block| block.name == name)
    }
}
