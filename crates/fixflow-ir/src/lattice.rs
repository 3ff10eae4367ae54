pub trait Lattice {
    fn join(&self, other: &Self) -> Self;
    fn meet(&self, other: &Self) -> Self;
    fn is_subseteq(&self, other: &Self) -> bool;
}

/// A lattice with a statically known least element.
///
/// There is no matching `HasTop`: the top of a fact lattice is the universe of
/// facts observed in one function, which is only known at analysis time.
pub trait HasBottom: Lattice {
    fn bottom() -> Self;
}
