//! Walk position over an old tree.
//!
//! A [`Cursor`] is a copyable (tree, element) pair. Every move returns a new
//! cursor; nothing is allocated and no move recurses, so deep or very flat
//! trees cost loop iterations, not stack.
//!
//! Zero-width elements are never landed on, with one exception: the
//! end-of-file token is always reachable, and reaching it finishes the walk.

use relex_ir::{GreenElement, NodeFlags, SyntaxKind};

use crate::tree::{ElementId, SyntaxTree};

#[derive(Copy, Clone, Debug)]
pub struct Cursor<'t> {
    tree: Option<&'t SyntaxTree>,
    current: Option<ElementId>,
    /// `current` is an interpolated string node seen as its opaque token.
    opaque: bool,
}

impl<'t> Cursor<'t> {
    /// A cursor with nothing to walk; already finished.
    pub const fn empty() -> Self {
        Cursor {
            tree: None,
            current: None,
            opaque: false,
        }
    }

    pub fn from_root(tree: &'t SyntaxTree) -> Self {
        Cursor {
            tree: Some(tree),
            current: Some(ElementId::ROOT),
            opaque: false,
        }
    }

    fn at(self, id: Option<ElementId>, opaque: bool) -> Self {
        Cursor {
            tree: self.tree,
            current: id,
            opaque,
        }
    }

    /// `true` past the last element or on the end-of-file token.
    pub fn is_finished(&self) -> bool {
        self.element()
            .is_none_or(|element| element.kind() == SyntaxKind::EndOfFileToken)
    }

    /// Current element; the opaque token for an interpolated string node.
    pub fn element(&self) -> Option<&'t GreenElement> {
        let (tree, id) = (self.tree?, self.current?);
        if self.opaque {
            tree.opaque_token(id)
        } else {
            Some(tree.element(id))
        }
    }

    /// Full start of the current element in the old document.
    pub fn position(&self) -> Option<u32> {
        Some(self.tree?.position(self.current?))
    }

    /// Flags of the current element's parent; empty at the root.
    pub fn parent_flags(&self) -> NodeFlags {
        let parent = self
            .tree
            .zip(self.current)
            .and_then(|(tree, id)| Some(tree.element(tree.parent(id)?).flags()));
        parent.unwrap_or_default()
    }

    pub fn is_node(&self) -> bool {
        matches!(self.element(), Some(GreenElement::Node(_)))
    }

    /// Next sibling with a non-zero width, climbing to ancestors' siblings
    /// when a child list runs out.
    #[must_use]
    pub fn move_to_next_sibling(self) -> Self {
        let (Some(tree), Some(mut id)) = (self.tree, self.current) else {
            return self.at(None, false);
        };
        loop {
            let Some(parent) = tree.parent(id) else {
                return self.at(None, false);
            };
            let count = tree.child_count(parent);
            for index in tree.index_in_parent(id) + 1..count {
                if let Some(sibling) = tree.child(parent, index) {
                    if is_reachable(tree.element(sibling)) {
                        return self.at(Some(sibling), false);
                    }
                }
            }
            id = parent;
        }
    }

    /// First child with a non-zero width.
    ///
    /// An interpolated string node is not entered: the cursor stays on it
    /// and presents the node's opaque token instead.
    #[must_use]
    pub fn move_to_first_child(self) -> Self {
        let (Some(tree), Some(id)) = (self.tree, self.current) else {
            return self;
        };
        if self.opaque {
            return self;
        }
        if tree.opaque_token(id).is_some() {
            return self.at(Some(id), true);
        }
        let first = (0..tree.child_count(id))
            .filter_map(|index| tree.child(id, index))
            .find(|&child| is_reachable(tree.element(child)));
        self.at(first, false)
    }

    /// First token at or below the current element.
    #[must_use]
    pub fn move_to_first_token(self) -> Self {
        let mut cursor = self;
        while !cursor.is_finished() && cursor.is_node() {
            cursor = cursor.move_to_first_child();
        }
        cursor
    }
}

impl Default for Cursor<'_> {
    fn default() -> Self {
        Cursor::empty()
    }
}

fn is_reachable(element: &GreenElement) -> bool {
    element.full_width() != 0 || element.kind() == SyntaxKind::EndOfFileToken
}
