use std::collections::BTreeSet;
use std::fmt;
use std::hash::Hash;

use fixflow_ir::{BinaryOp, HasBottom, Lattice, Name};

/// A value tracked by a dataflow analysis.
pub trait Fact: Clone + Eq + Ord + Hash + fmt::Debug + fmt::Display {}

impl<T> Fact for T where T: Clone + Eq + Ord + Hash + fmt::Debug + fmt::Display {}

/// The operators an available expression can be built from.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub enum ArithOp {
    Add,
    Sub,
    Mul,
    SDiv,
}

impl ArithOp {
    /// `None` for binary operators that never form an expression fact.
    pub fn from_binary(op: BinaryOp) -> Option<Self> {
        match op {
            BinaryOp::Add => Some(ArithOp::Add),
            BinaryOp::Sub => Some(ArithOp::Sub),
            BinaryOp::Mul => Some(ArithOp::Mul),
            BinaryOp::SDiv => Some(ArithOp::SDiv),
            _ => None,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            ArithOp::Add => "+",
            ArithOp::Sub => "-",
            ArithOp::Mul => "*",
            ArithOp::SDiv => "/",
        }
    }
}

impl fmt::Display for ArithOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// The identity of one side of an expression.
#[derive(Clone, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub enum OperandKey {
    Literal(i64),
    Name(Name),
}

impl fmt::Display for OperandKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperandKey::Literal(value) => write!(f, "{value}"),
            OperandKey::Name(name) => write!(f, "{name}"),
        }
    }
}

/// A non-trivial binary expression, e.g. `a+b`.
#[derive(Clone, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct Expression {
    pub lhs: OperandKey,
    pub op: ArithOp,
    pub rhs: OperandKey,
}

impl Expression {
    pub fn new(lhs: OperandKey, op: ArithOp, rhs: OperandKey) -> Self {
        Self { lhs, op, rhs }
    }

    /// Names the expression depends on. A name used on both sides is yielded twice.
    pub fn names(&self) -> impl Iterator<Item = &Name> {
        [&self.lhs, &self.rhs].into_iter().filter_map(|key| match key {
            OperandKey::Name(name) => Some(name),
            OperandKey::Literal(_) => None,
        })
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.lhs, self.op, self.rhs)
    }
}

/// A variable, the fact domain of liveness.
#[derive(Clone, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct Variable(pub Name);

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for Variable {
    fn from(name: &str) -> Self {
        Variable(name.into())
    }
}

/// A finite set of facts, ordered so that iteration never depends on hashing.
///
/// Sets form a lattice under inclusion: `join` is union, `meet` is intersection.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct FactSet<F: Fact>(BTreeSet<F>);

impl<F: Fact> Default for FactSet<F> {
    fn default() -> Self {
        FactSet(BTreeSet::new())
    }
}

impl<F: Fact> FactSet<F> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, fact: &F) -> bool {
        self.0.contains(fact)
    }

    /// Returns whether the fact was newly inserted.
    pub fn insert(&mut self, fact: F) -> bool {
        self.0.insert(fact)
    }

    /// Returns whether the fact was present.
    pub fn remove(&mut self, fact: &F) -> bool {
        self.0.remove(fact)
    }

    pub fn iter(&self) -> impl Iterator<Item = &F> {
        self.0.iter()
    }

    pub fn difference(&self, other: &Self) -> Self {
        FactSet(self.0.difference(&other.0).cloned().collect())
    }

    /// `self ∪ (input − kill)`, the shape of every transfer function here.
    pub fn transfer(&self, input: &Self, kill: &Self) -> Self {
        let mut out = self.clone();
        out.0
            .extend(input.0.iter().filter(|fact| !kill.0.contains(*fact)).cloned());
        out
    }

    /// Facts rendered in canonical text, sorted by that text.
    pub fn to_sorted_strings(&self) -> Vec<String> {
        let mut text: Vec<String> = self.0.iter().map(ToString::to_string).collect();
        text.sort();
        text
    }
}

impl<F: Fact> Lattice for FactSet<F> {
    fn join(&self, other: &Self) -> Self {
        FactSet(self.0.union(&other.0).cloned().collect())
    }

    fn meet(&self, other: &Self) -> Self {
        FactSet(self.0.intersection(&other.0).cloned().collect())
    }

    fn is_subseteq(&self, other: &Self) -> bool {
        self.0.is_subset(&other.0)
    }
}

impl<F: Fact> HasBottom for FactSet<F> {
    fn bottom() -> Self {
        Self::default()
    }
}

impl<F: Fact> FromIterator<F> for FactSet<F> {
    fn from_iter<I: IntoIterator<Item = F>>(iter: I) -> Self {
        FactSet(iter.into_iter().collect())
    }
}

impl<F: Fact> Extend<F> for FactSet<F> {
    fn extend<I: IntoIterator<Item = F>>(&mut self, iter: I) {
        self.0.extend(iter)
    }
}

impl<'a, F: Fact> IntoIterator for &'a FactSet<F> {
    type Item = &'a F;
    type IntoIter = std::collections::btree_set::Iter<'a, F>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl<F: Fact> fmt::Debug for FactSet<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.0.iter()).finish()
    }
}

/// Space-separated, sorted by canonical text.
impl<F: Fact> fmt::Display for FactSet<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_sorted_strings().join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(n: &str) -> OperandKey {
        OperandKey::Name(n.into())
    }

    #[test]
    fn test_expression_display() {
        let e = Expression::new(name("a"), ArithOp::Add, OperandKey::Literal(-3));
        assert_eq!(e.to_string(), "a+-3");
        let e = Expression::new(name("x"), ArithOp::SDiv, name("y"));
        assert_eq!(e.to_string(), "x/y");
    }

    #[test]
    fn test_expression_names_skip_literals() {
        let e = Expression::new(OperandKey::Literal(2), ArithOp::Mul, name("n"));
        let names: Vec<&str> = e.names().map(Name::as_str).collect();
        assert_eq!(names, ["n"]);
    }

    #[test]
    fn test_only_four_operators_form_facts() {
        assert_eq!(ArithOp::from_binary(BinaryOp::Add), Some(ArithOp::Add));
        assert_eq!(ArithOp::from_binary(BinaryOp::SDiv), Some(ArithOp::SDiv));
        assert_eq!(ArithOp::from_binary(BinaryOp::UDiv), None);
        assert_eq!(ArithOp::from_binary(BinaryOp::Xor), None);
    }

    #[test]
    fn test_transfer() {
        let gen_: FactSet<Variable> = ["g"].into_iter().map(Variable::from).collect();
        let input: FactSet<Variable> = ["a", "k"].into_iter().map(Variable::from).collect();
        let kill: FactSet<Variable> = ["k"].into_iter().map(Variable::from).collect();
        assert_eq!(gen_.transfer(&input, &kill).to_string(), "a g");
    }

    #[test]
    fn test_display_sorts_by_text() {
        // `10` orders before `9` as text even though 9 < 10 numerically.
        let set: FactSet<Expression> = [
            Expression::new(OperandKey::Literal(9), ArithOp::Add, name("a")),
            Expression::new(OperandKey::Literal(10), ArithOp::Add, name("a")),
        ]
        .into_iter()
        .collect();
        assert_eq!(set.to_string(), "10+a 9+a");
    }

    #[test]
    fn test_lattice_operations() {
        let a: FactSet<Variable> = ["x", "y"].into_iter().map(Variable::from).collect();
        let b: FactSet<Variable> = ["y", "z"].into_iter().map(Variable::from).collect();
        assert_eq!(a.join(&b).to_string(), "x y z");
        assert_eq!(a.meet(&b).to_string(), "y");
        assert!(a.meet(&b).is_subseteq(&a));
        assert!(!a.is_subseteq(&b));
        assert!(FactSet::<Variable>::bottom().is_subseteq(&a));
    }
}
