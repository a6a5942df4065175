//! Resource bounds applied while decoding.
//!
//! The value tree is recursive, so unbounded nesting would let a hostile
//! document exhaust the stack. Input size is bounded separately so that a
//! caller holding untrusted bytes can refuse them before any work is done.

/// Default maximum nesting depth for arrays and objects.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Decoding limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    /// Maximum nesting depth of arrays/objects. `[[]]` has depth 2.
    pub max_depth: usize,
    /// Maximum input length in bytes; `None` means unbounded.
    pub max_input_size: Option<usize>,
}

impl Limits {
    pub const fn new() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            max_input_size: None,
        }
    }

    pub const fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub const fn with_max_input_size(mut self, max_input_size: usize) -> Self {
        self.max_input_size = Some(max_input_size);
        self
    }
}

impl Default for Limits {
    fn default() -> Self {
        Self::new()
    }
}
