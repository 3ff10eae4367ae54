use fixflow_ir::{BlockView, FunctionView, InstructionView, Name};
use indexmap::{IndexMap, IndexSet};
use rustc_hash::FxBuildHasher;

use crate::AnalysisError;

/// A map keyed by block name that iterates in program order.
pub type BlockMap<V> = IndexMap<Name, V, FxBuildHasher>;

/// A set of block names that iterates in insertion order.
pub type BlockSet = IndexSet<Name, FxBuildHasher>;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Edges {
    pub predecessors: BlockSet,
    pub successors: BlockSet,
}

/// Predecessor and successor sets of every block of one function.
#[derive(Debug, Clone)]
pub struct Cfg {
    function: Name,
    edges: BlockMap<Edges>,
}

impl Cfg {
    /// Derive the CFG of `function` from its terminators.
    ///
    /// Fails if a terminator names a block the function does not define, if a
    /// terminator is followed by other instructions, or if two blocks share a
    /// name.
    pub fn build<V: FunctionView>(function: &V) -> Result<Self, AnalysisError> {
        let mut edges = BlockMap::<Edges>::default();
        for block in function.blocks() {
            if edges.insert(block.name().clone(), Edges::default()).is_some() {
                return Err(AnalysisError::DuplicateBlock {
                    function: function.name().clone(),
                    block: block.name().clone(),
                });
            }
            let last = block.instructions().count().saturating_sub(1);
            let misplaced = block
                .instructions()
                .enumerate()
                .find(|(i, inst)| *i != last && inst.opcode().is_terminator());
            if let Some((index, inst)) = misplaced {
                return Err(AnalysisError::MisplacedTerminator {
                    function: function.name().clone(),
                    block: block.name().clone(),
                    index,
                    opcode: inst.opcode(),
                });
            }
        }

        for block in function.blocks() {
            for successor in block.successors() {
                let Some(target) = edges.get_mut(successor) else {
                    return Err(AnalysisError::UnknownSuccessor {
                        function: function.name().clone(),
                        block: block.name().clone(),
                        successor: successor.clone(),
                    });
                };
                target.predecessors.insert(block.name().clone());
                edges[block.name()].successors.insert(successor.clone());
            }
        }

        tracing::trace!(function = %function.name(), blocks = edges.len(), "built cfg");
        Ok(Cfg {
            function: function.name().clone(),
            edges,
        })
    }

    pub fn function(&self) -> &Name {
        &self.function
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn contains(&self, block: &str) -> bool {
        self.edges.contains_key(block)
    }

    /// The first block in program order.
    pub fn entry(&self) -> Option<&Name> {
        self.edges.keys().next()
    }

    /// Block names in program order.
    pub fn blocks(&self) -> impl DoubleEndedIterator<Item = &Name> {
        self.edges.keys()
    }

    pub fn edges(&self, block: &str) -> Option<&Edges> {
        self.edges.get(block)
    }

    pub fn predecessors(&self, block: &str) -> impl Iterator<Item = &Name> {
        self.edges
            .get(block)
            .into_iter()
            .flat_map(|edges| edges.predecessors.iter())
    }

    pub fn successors(&self, block: &str) -> impl Iterator<Item = &Name> {
        self.edges
            .get(block)
            .into_iter()
            .flat_map(|edges| edges.successors.iter())
    }

    /// Blocks with no successors, in program order.
    pub fn exits(&self) -> impl Iterator<Item = &Name> {
        self.edges
            .iter()
            .filter(|(_, edges)| edges.successors.is_empty())
            .map(|(name, _)| name)
    }
}
