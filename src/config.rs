//! Transformation options.

/// Configuration record consumed by the transformation core. The driver maps
/// command-line flags onto this; library callers fill it directly.
#[derive(Debug, Clone)]
pub struct Options {
    /// Split static/extern initializers into header declarations and
    /// implementation definitions. When false, a qualifying file is folded
    /// back into a single combined sequence.
    pub extract_impl: bool,
    /// Expand `for <var> [<start>] <limit> [<step>]` shorthand.
    pub enable_for: bool,
    /// Expand the reverse-direction `rof` shorthand.
    pub enable_rof: bool,
    /// Treat every assignment as mutation of an existing name (no implicit
    /// declaration insertion).
    pub disable_implication: bool,
    /// Append `// <file>:<line>` correlation comments to output lines.
    pub add_source_map: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            extract_impl: true,
            enable_for: false,
            enable_rof: false,
            disable_implication: false,
            add_source_map: false,
        }
    }
}
