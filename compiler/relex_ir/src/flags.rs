//! Pre-computed green element flags.
//!
//! `NodeFlags` are computed once when a trivia, token or node is built and
//! propagate upward: a node carries the union of its children's presence
//! flags. The blender's reuse test reads them without walking subtrees.

use bitflags::bitflags;

bitflags! {
    /// Cached properties of a green trivia, token or node.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    pub struct NodeFlags: u8 {
        // === Own flags (not inherited) ===

        /// Token synthesized by the parser with no source text.
        const IS_MISSING = 1 << 0;

        // === Presence flags (inherited by ancestors) ===

        /// Element or a descendant has diagnostics attached.
        const CONTAINS_DIAGNOSTICS = 1 << 1;
        /// Element or a descendant carries directive trivia.
        const CONTAINS_DIRECTIVES = 1 << 2;
        /// Element or a descendant carries skipped-token trivia or bad tokens.
        const CONTAINS_SKIPPED_TEXT = 1 << 3;
        /// Element or a descendant carries client annotations.
        const CONTAINS_ANNOTATIONS = 1 << 4;

        /// Flags a parent inherits from its children.
        const INHERITED = Self::CONTAINS_DIAGNOSTICS.bits()
            | Self::CONTAINS_DIRECTIVES.bits()
            | Self::CONTAINS_SKIPPED_TEXT.bits()
            | Self::CONTAINS_ANNOTATIONS.bits();
    }
}

impl NodeFlags {
    /// Presence flags a parent inherits from this element.
    #[inline]
    #[must_use]
    pub fn inherited(self) -> NodeFlags {
        self & NodeFlags::INHERITED
    }
}

#[cfg(test)]
mod tests;
