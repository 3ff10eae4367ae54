//! Configuration for running an analysis over a module.

use fixflow_ir::Name;

/// Options shared by every analysis.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AnalysisConfig {
    /// Functions that are not analyzed. The program's top-level driver,
    /// `main`, is skipped by default.
    pub skip_functions: Vec<Name>,
    /// Upper bound on solver passes. `None` uses `|universe| × |blocks| + 1`.
    pub max_passes: Option<usize>,
    /// Whether reports start with an `<analysis>: <function>` line.
    pub heading: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            skip_functions: vec![Name::from("main")],
            max_passes: None,
            heading: true,
        }
    }
}

impl AnalysisConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the skip list.
    pub fn with_skip_functions<I>(mut self, names: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Name>,
    {
        self.skip_functions = names.into_iter().map(Into::into).collect();
        self
    }

    /// Add one function to the skip list.
    pub fn with_skip(mut self, name: impl Into<Name>) -> Self {
        self.skip_functions.push(name.into());
        self
    }

    pub fn with_max_passes(mut self, max_passes: Option<usize>) -> Self {
        self.max_passes = max_passes;
        self
    }

    pub fn with_heading(mut self, heading: bool) -> Self {
        self.heading = heading;
        self
    }

    pub fn skips(&self, function: &str) -> bool {
        self.skip_functions.iter().any(|name| name == function)
    }
}
