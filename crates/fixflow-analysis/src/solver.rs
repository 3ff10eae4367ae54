//! Round-robin fixed-point iteration over a [`Cfg`].
//!
//! The solver keeps two values per block: the *merged* value, obtained by
//! combining the neighbours with the meet operator, and the *tracked* value,
//! obtained by applying the block's transfer function to the merged one. For
//! a forward problem merged is IN and tracked is OUT; a backward problem swaps
//! them. Each pass visits every block once and updates values in place, so a
//! block already sees the values its neighbours computed earlier in the same
//! pass. Iteration stops after the first pass that changes no tracked value.

use fixflow_ir::{Lattice, Name};

use crate::cfg::{BlockMap, Cfg};
use crate::{AnalysisError, Fact, FactSet, LocalSets};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Facts flow from predecessors to successors.
    Forward,
    /// Facts flow from successors to predecessors.
    Backward,
}

impl Direction {
    /// Program order for forward problems, reverse program order for
    /// backward ones, so most blocks see up-to-date neighbours.
    pub fn default_order(self) -> Order {
        match self {
            Direction::Forward => Order::Program,
            Direction::Backward => Order::Reverse,
        }
    }
}

/// How neighbouring values are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Meet {
    /// Must-analysis: a fact holds if it holds on every path.
    Intersection,
    /// May-analysis: a fact holds if it holds on some path.
    Union,
}

impl Meet {
    /// Combine `values`. Both operators yield the empty set when there is
    /// nothing to combine, never the universe.
    pub fn combine<'a, F: Fact + 'a>(
        self,
        values: impl IntoIterator<Item = &'a FactSet<F>>,
    ) -> FactSet<F> {
        let mut values = values.into_iter();
        let Some(first) = values.next() else {
            return FactSet::new();
        };
        values.fold(first.clone(), |acc, value| match self {
            Meet::Intersection => acc.meet(value),
            Meet::Union => acc.join(value),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Order {
    Program,
    Reverse,
}

/// The starting tracked value of every block other than the boundary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Initial {
    /// Every fact of the function; the optimistic start of a must-analysis.
    Universe,
    /// The block's own GEN set.
    Generated,
    #[default]
    Empty,
}

/// A block whose merged value is fixed instead of computed from neighbours.
///
/// Its tracked value is `transfer(value)`, computed once, and the block is
/// never revisited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Boundary<F: Fact> {
    pub block: Name,
    pub value: FactSet<F>,
}

impl<F: Fact> Boundary<F> {
    pub fn new(block: impl Into<Name>, value: FactSet<F>) -> Self {
        Self {
            block: block.into(),
            value,
        }
    }
}

/// The shape of a dataflow problem, independent of any particular function.
#[derive(Debug, Clone, bon::Builder)]
pub struct Problem<F: Fact> {
    pub direction: Direction,
    pub meet: Meet,
    pub boundary: Option<Boundary<F>>,
    #[builder(default)]
    pub initial: Initial,
    /// Visit order within a pass; [`Direction::default_order`] when unset.
    pub order: Option<Order>,
}

impl<F: Fact> Problem<F> {
    pub fn order(&self) -> Order {
        self.order
            .unwrap_or_else(|| self.direction.default_order())
    }

    fn is_boundary(&self, block: &Name) -> bool {
        self.boundary
            .as_ref()
            .is_some_and(|boundary| &boundary.block == block)
    }
}

/// One change of a block's tracked value, reported to
/// [`Solver::solve_with`] observers.
#[derive(Debug)]
pub struct Update<'a, F: Fact> {
    /// 1-based pass number.
    pub pass: usize,
    pub block: &'a Name,
    pub previous: &'a FactSet<F>,
    pub current: &'a FactSet<F>,
}

/// Converged IN and OUT of every block, in program order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solution<F: Fact> {
    direction: Direction,
    inputs: BlockMap<FactSet<F>>,
    outputs: BlockMap<FactSet<F>>,
    passes: usize,
}

impl<F: Fact> Solution<F> {
    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn input(&self, block: &str) -> Option<&FactSet<F>> {
        self.inputs.get(block)
    }

    pub fn output(&self, block: &str) -> Option<&FactSet<F>> {
        self.outputs.get(block)
    }

    pub fn inputs(&self) -> &BlockMap<FactSet<F>> {
        &self.inputs
    }

    pub fn outputs(&self) -> &BlockMap<FactSet<F>> {
        &self.outputs
    }

    /// Number of passes run, including the final pass that changed nothing.
    pub fn passes(&self) -> usize {
        self.passes
    }

    /// The values the solver iterated on: OUT for forward, IN for backward.
    pub fn tracked(&self) -> &BlockMap<FactSet<F>> {
        match self.direction {
            Direction::Forward => &self.outputs,
            Direction::Backward => &self.inputs,
        }
    }
}

pub struct Solver<'a, F: Fact> {
    problem: &'a Problem<F>,
    cfg: &'a Cfg,
    local: &'a LocalSets<F>,
    max_passes: Option<usize>,
}

impl<'a, F: Fact> Solver<'a, F> {
    pub fn new(problem: &'a Problem<F>, cfg: &'a Cfg, local: &'a LocalSets<F>) -> Self {
        Self {
            problem,
            cfg,
            local,
            max_passes: None,
        }
    }

    /// Limit the number of passes. Without a limit the solver allows
    /// `|universe| × |blocks| + 1` passes, enough for any monotone problem.
    pub fn with_max_passes(mut self, max_passes: Option<usize>) -> Self {
        self.max_passes = max_passes;
        self
    }

    pub fn solve(&self) -> Result<Solution<F>, AnalysisError> {
        self.solve_with(|_| {})
    }

    /// Solve, calling `observe` every time a block's tracked value changes.
    ///
    /// Fails if the boundary block is not part of the CFG.
    #[tracing::instrument(level = "debug", skip_all, fields(function = %self.cfg.function()))]
    pub fn solve_with(
        &self,
        mut observe: impl FnMut(Update<'_, F>),
    ) -> Result<Solution<F>, AnalysisError> {
        if let Some(boundary) = &self.problem.boundary {
            if !self.cfg.contains(&boundary.block) {
                return Err(AnalysisError::UnknownBoundary {
                    function: self.cfg.function().clone(),
                    block: boundary.block.clone(),
                });
            }
        }
        let (mut merged, mut tracked) = self.seed();
        let order = self.visit_order();
        let limit = self.max_passes.unwrap_or_else(|| self.pass_bound());

        let mut passes = 0;
        loop {
            if passes >= limit {
                return Err(AnalysisError::NoConvergence {
                    function: self.cfg.function().clone(),
                    passes,
                });
            }
            passes += 1;

            let mut changed = false;
            for &block in &order {
                if self.problem.is_boundary(block) {
                    continue;
                }
                let joined = self.merge(block, &tracked);
                let next = self.local.transfer(block, &joined);
                merged[block] = joined;
                if next != tracked[block] {
                    tracing::trace!(pass = passes, block = %block, facts = %next, "updated");
                    observe(Update {
                        pass: passes,
                        block,
                        previous: &tracked[block],
                        current: &next,
                    });
                    tracked[block] = next;
                    changed = true;
                }
            }

            if !changed {
                break;
            }
        }

        tracing::debug!(passes, "reached fixed point");
        let (inputs, outputs) = match self.problem.direction {
            Direction::Forward => (merged, tracked),
            Direction::Backward => (tracked, merged),
        };
        Ok(Solution {
            direction: self.problem.direction,
            inputs,
            outputs,
            passes,
        })
    }

    /// Whether one more pass over `solution` would leave every value as is.
    pub fn is_fixed_point(&self, solution: &Solution<F>) -> bool {
        let tracked = solution.tracked();
        self.cfg
            .blocks()
            .filter(|block| !self.problem.is_boundary(block))
            .all(|block| {
                let next = self.local.transfer(block, &self.merge(block, tracked));
                tracked.get(block) == Some(&next)
            })
    }

    fn pass_bound(&self) -> usize {
        self.local
            .universe()
            .len()
            .saturating_mul(self.cfg.len())
            .saturating_add(1)
    }

    fn visit_order(&self) -> Vec<&'a Name> {
        match self.problem.order() {
            Order::Program => self.cfg.blocks().collect(),
            Order::Reverse => self.cfg.blocks().rev().collect(),
        }
    }

    /// Initial merged and tracked values of every block.
    fn seed(&self) -> (BlockMap<FactSet<F>>, BlockMap<FactSet<F>>) {
        let mut merged = BlockMap::default();
        let mut tracked = BlockMap::default();
        for block in self.cfg.blocks() {
            match &self.problem.boundary {
                Some(boundary) if &boundary.block == block => {
                    tracked.insert(block.clone(), self.local.transfer(block, &boundary.value));
                    merged.insert(block.clone(), boundary.value.clone());
                }
                _ => {
                    let initial = match self.problem.initial {
                        Initial::Universe => self.local.universe().clone(),
                        Initial::Generated => {
                            self.local.generated(block).cloned().unwrap_or_default()
                        }
                        Initial::Empty => FactSet::new(),
                    };
                    tracked.insert(block.clone(), initial);
                    merged.insert(block.clone(), FactSet::new());
                }
            }
        }
        (merged, tracked)
    }

    /// Meet of the tracked values of `block`'s neighbours.
    fn merge(&self, block: &Name, tracked: &BlockMap<FactSet<F>>) -> FactSet<F> {
        let Some(edges) = self.cfg.edges(block) else {
            return FactSet::new();
        };
        let neighbours = match self.problem.direction {
            Direction::Forward => &edges.predecessors,
            Direction::Backward => &edges.successors,
        };
        self.problem
            .meet
            .combine(neighbours.iter().filter_map(|name| tracked.get(name)))
    }
}
