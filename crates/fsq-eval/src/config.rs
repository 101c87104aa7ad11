//! Evaluator configuration.

/// What an expression statement does when its value is a function taking
/// no arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FunctionPolicy {
    /// Return the function itself; the embedder shows its signature.
    #[default]
    Describe,
    /// Call it and return its result.
    AutoInvoke,
}

/// Evaluator settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvalConfig {
    /// Tag key whose value names record fields (e.g. `json`).
    ///
    /// When set, field lookup tries the tagged name first and `ls` lists only
    /// tagged fields.
    pub display_tag: Option<String>,
    pub function_policy: FunctionPolicy,
    /// A blank input line yields a snapshot of the environment.
    pub snapshot_on_empty: bool,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            display_tag: None,
            function_policy: FunctionPolicy::Describe,
            snapshot_on_empty: true,
        }
    }
}

impl EvalConfig {
    pub fn with_display_tag(mut self, tag: impl Into<String>) -> Self {
        let tag = tag.into();
        self.display_tag = if tag.is_empty() { None } else { Some(tag) };
        self
    }

    pub fn with_function_policy(mut self, policy: FunctionPolicy) -> Self {
        self.function_policy = policy;
        self
    }

    pub fn with_snapshot_on_empty(mut self, enabled: bool) -> Self {
        self.snapshot_on_empty = enabled;
        self
    }

    /// The configured display tag, if any.
    pub fn tag(&self) -> Option<&str> {
        self.display_tag.as_deref()
    }
}
