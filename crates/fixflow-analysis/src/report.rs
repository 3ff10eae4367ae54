//! Line-oriented rendering of converged results.

use std::fmt::{self, Write};

use fixflow_ir::Name;

/// The reported set of every block of one function, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Report {
    pub analysis: &'static str,
    pub function: Name,
    /// What the listed facts are, e.g. `Available` or `Live-out`.
    pub label: &'static str,
    pub blocks: Vec<BlockRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct BlockRecord {
    pub block: Name,
    /// Canonical fact text, sorted.
    pub facts: Vec<String>,
}

impl Report {
    /// Render as text:
    ///
    /// ```text
    /// available-expressions: f
    /// ----- entry -----
    /// Available: a+b
    /// ```
    ///
    /// The first line is omitted when `heading` is false.
    pub fn render(&self, heading: bool) -> String {
        let mut out = String::new();
        if heading {
            let _ = writeln!(out, "{}: {}", self.analysis, self.function);
        }
        for record in &self.blocks {
            let _ = writeln!(out, "----- {} -----", record.block);
            out.push_str(&labelled(self.label, &record.facts));
            out.push('\n');
        }
        out
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(true))
    }
}

/// `label: a b c`, or just `label:` for no facts.
pub(crate) fn labelled(label: &str, facts: &[String]) -> String {
    if facts.is_empty() {
        format!("{label}:")
    } else {
        format!("{label}: {}", facts.join(" "))
    }
}
