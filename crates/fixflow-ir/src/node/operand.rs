use crate::Name;

/// An instruction operand: an integer literal or a reference by name to a
/// variable or to the result of another instruction.
#[derive(Clone, Debug, Hash, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Operand {
    Const(i64),
    Value(Name),
}

impl Operand {
    pub fn is_constant(&self) -> bool {
        matches!(self, Operand::Const(_))
    }

    /// Canonical text of a literal operand, `None` for named operands.
    pub fn literal_value(&self) -> Option<String> {
        match self {
            Operand::Const(value) => Some(value.to_string()),
            Operand::Value(_) => None,
        }
    }

    /// The result or variable name this operand refers to, `None` for literals.
    pub fn name(&self) -> Option<&Name> {
        match self {
            Operand::Const(_) => None,
            Operand::Value(name) => Some(name),
        }
    }
}

impl From<i64> for Operand {
    fn from(value: i64) -> Self {
        Operand::Const(value)
    }
}

impl From<&str> for Operand {
    fn from(name: &str) -> Self {
        Operand::Value(name.into())
    }
}

impl From<Name> for Operand {
    fn from(name: Name) -> Self {
        Operand::Value(name)
    }
}

impl std::fmt::Display for Operand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operand::Const(value) => write!(f, "{value}"),
            Operand::Value(name) => write!(f, "%{name}"),
        }
    }
}
