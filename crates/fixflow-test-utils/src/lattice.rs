//! Assertion helpers for lattice laws and monotone chains.
//!
//! Every helper checks all pairs (or triples) of the given samples and
//! collects the violations into one panic message, so a broken lattice
//! shows every failing law at once.
//!
//! ```
//! use fixflow_test_utils::lattice::{Flags, assert_lattice_laws};
//!
//! assert_lattice_laws(&[Flags(0b001), Flags(0b011), Flags(0b110)]);
//! ```

use std::fmt::{Debug, Write};

use fixflow_ir::{HasBottom, Lattice};

/// A bit-set lattice over eight elements, for testing the helpers themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Flags(pub u8);

impl Lattice for Flags {
    fn join(&self, other: &Self) -> Self {
        Flags(self.0 | other.0)
    }

    fn meet(&self, other: &Self) -> Self {
        Flags(self.0 & other.0)
    }

    fn is_subseteq(&self, other: &Self) -> bool {
        self.0 & !other.0 == 0
    }
}

impl HasBottom for Flags {
    fn bottom() -> Self {
        Flags(0)
    }
}

fn report(violations: Vec<String>) {
    if violations.is_empty() {
        return;
    }
    let mut msg = format!("{} lattice law violation(s):\n", violations.len());
    for (i, v) in violations.iter().enumerate() {
        let _ = writeln!(msg, "  {}. {}", i + 1, v);
    }
    panic!("{msg}");
}

/// Commutativity, associativity and idempotence of `join` and `meet`,
/// absorption, and agreement of `is_subseteq` with both operators.
pub fn assert_lattice_laws<L: Lattice + PartialEq + Debug>(elements: &[L]) {
    let mut violations = Vec::new();
    check_operator(elements, "join", L::join, &mut violations);
    check_operator(elements, "meet", L::meet, &mut violations);
    check_absorption(elements, &mut violations);
    check_ordering(elements, &mut violations);
    report(violations);
}

/// [`assert_lattice_laws`] plus: `bottom()` is below every element, is the
/// identity of `join`, and absorbs `meet`.
pub fn assert_bounded_lattice_laws<L: HasBottom + PartialEq + Debug>(elements: &[L]) {
    let mut violations = Vec::new();
    check_operator(elements, "join", L::join, &mut violations);
    check_operator(elements, "meet", L::meet, &mut violations);
    check_absorption(elements, &mut violations);
    check_ordering(elements, &mut violations);
    check_bottom(elements, &mut violations);
    report(violations);
}

/// Every element is below or equal to the one before it.
pub fn assert_descending<L: Lattice + Debug>(chain: &[L]) {
    let mut violations = Vec::new();
    for pair in chain.windows(2) {
        if !pair[1].is_subseteq(&pair[0]) {
            violations.push(format!("chain grew: {:?} -> {:?}", pair[0], pair[1]));
        }
    }
    report(violations);
}

/// Every element is above or equal to the one before it.
pub fn assert_ascending<L: Lattice + Debug>(chain: &[L]) {
    let mut violations = Vec::new();
    for pair in chain.windows(2) {
        if !pair[0].is_subseteq(&pair[1]) {
            violations.push(format!("chain shrank: {:?} -> {:?}", pair[0], pair[1]));
        }
    }
    report(violations);
}

fn check_operator<L: PartialEq + Debug>(
    elements: &[L],
    name: &str,
    op: impl Fn(&L, &L) -> L,
    v: &mut Vec<String>,
) {
    for a in elements {
        if op(a, a) != *a {
            v.push(format!("{name} not idempotent on {a:?}"));
        }
        for b in elements {
            if op(a, b) != op(b, a) {
                v.push(format!("{name} not commutative on {a:?}, {b:?}"));
            }
            for c in elements {
                if op(&op(a, b), c) != op(a, &op(b, c)) {
                    v.push(format!("{name} not associative on {a:?}, {b:?}, {c:?}"));
                }
            }
        }
    }
}

fn check_absorption<L: Lattice + PartialEq + Debug>(elements: &[L], v: &mut Vec<String>) {
    for a in elements {
        for b in elements {
            if a.join(&a.meet(b)) != *a {
                v.push(format!("{a:?}.join({a:?}.meet({b:?})) != {a:?}"));
            }
            if a.meet(&a.join(b)) != *a {
                v.push(format!("{a:?}.meet({a:?}.join({b:?})) != {a:?}"));
            }
        }
    }
}

fn check_ordering<L: Lattice + PartialEq + Debug>(elements: &[L], v: &mut Vec<String>) {
    for a in elements {
        for b in elements {
            let sub = a.is_subseteq(b);
            if sub != (a.join(b) == *b) {
                v.push(format!("{a:?}.is_subseteq({b:?}) = {sub} disagrees with join"));
            }
            if sub != (a.meet(b) == *a) {
                v.push(format!("{a:?}.is_subseteq({b:?}) = {sub} disagrees with meet"));
            }
        }
    }
}

fn check_bottom<L: HasBottom + PartialEq + Debug>(elements: &[L], v: &mut Vec<String>) {
    let bot = L::bottom();
    for x in elements {
        if !bot.is_subseteq(x) {
            v.push(format!("bottom not below {x:?}"));
        }
        if bot.join(x) != *x {
            v.push(format!("bottom().join({x:?}) != {x:?}"));
        }
        if bot.meet(x) != bot {
            v.push(format!("bottom().meet({x:?}) != bottom()"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_lattice_laws() {
        assert_bounded_lattice_laws(&[Flags(0), Flags(0b101), Flags(0b011), Flags(0xff)]);
    }

    #[test]
    fn chains() {
        assert_descending(&[Flags(0b111), Flags(0b011), Flags(0b011), Flags(0)]);
        assert_ascending(&[Flags(0), Flags(0b100), Flags(0b110)]);
    }

    #[test]
    #[should_panic(expected = "chain grew")]
    fn descending_rejects_growth() {
        assert_descending(&[Flags(0b001), Flags(0b011)]);
    }

    #[derive(Debug, Clone, PartialEq)]
    struct Broken(u8);

    impl Lattice for Broken {
        fn join(&self, other: &Self) -> Self {
            Broken(self.0.wrapping_add(other.0))
        }

        fn meet(&self, other: &Self) -> Self {
            Broken(self.0.min(other.0))
        }

        fn is_subseteq(&self, other: &Self) -> bool {
            self.0 <= other.0
        }
    }

    #[test]
    #[should_panic(expected = "join not idempotent")]
    fn violations_are_reported() {
        assert_lattice_laws(&[Broken(1), Broken(2)]);
    }
}
