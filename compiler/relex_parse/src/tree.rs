//! Old syntax trees, flattened for the blender.
//!
//! A [`SyntaxTree`] owns a green root plus an arena with one entry per
//! element. Entries record their parent, their index among the parent's
//! children and their absolute position, so the cursor walks the tree with
//! plain indices and parent links own nothing. The children of a node
//! occupy one contiguous run of entries.
//!
//! Interpolated string nodes also get their single-token form up front: the
//! cursor hands that token out instead of descending into the node.

use std::fmt;
use std::sync::Arc;

use relex_ir::{DirectiveSlot, DirectiveStack, GreenElement, GreenNode, SyntaxKind};
use relex_lexer::rescan_interpolated_string;

/// Index of an element in a [`SyntaxTree`].
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct ElementId(u32);

impl ElementId {
    /// The root node.
    pub const ROOT: ElementId = ElementId(0);

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[inline]
#[allow(
    clippy::cast_possible_truncation,
    reason = "element counts are bounded by u32 character positions"
)]
fn to_u32(index: usize) -> u32 {
    index as u32
}

struct Entry {
    element: GreenElement,
    parent: Option<ElementId>,
    index_in_parent: u32,
    /// Absolute full start in the old document.
    position: u32,
    first_child: u32,
    child_count: u32,
    /// Opaque token standing in for an interpolated string node.
    opaque: Option<GreenElement>,
}

impl Entry {
    fn new(element: GreenElement, parent: Option<ElementId>, index_in_parent: u32, position: u32) -> Self {
        let opaque = match &element {
            GreenElement::Node(node) if node.kind() == SyntaxKind::InterpolatedStringExpression => {
                Some(GreenElement::Token(Arc::new(rescan_interpolated_string(node))))
            }
            _ => None,
        };
        Entry {
            element,
            parent,
            index_in_parent,
            position,
            first_child: 0,
            child_count: 0,
            opaque,
        }
    }
}

/// A previously produced syntax tree, ready for incremental reuse.
pub struct SyntaxTree {
    root: Arc<GreenNode>,
    entries: Vec<Entry>,
    directives: DirectiveSlot,
}

impl SyntaxTree {
    #[tracing::instrument(level = "debug", skip_all, fields(width = root.full_width()))]
    pub fn new(root: Arc<GreenNode>) -> Self {
        let mut entries = vec![Entry::new(GreenElement::Node(Arc::clone(&root)), None, 0, 0)];

        // Breadth-first, so each node's children land next to each other.
        let mut next = 0;
        while next < entries.len() {
            let GreenElement::Node(node) = &entries[next].element else {
                next += 1;
                continue;
            };
            let node = Arc::clone(node);
            let parent = ElementId(to_u32(next));
            let first_child = to_u32(entries.len());
            let mut position = entries[next].position;
            for (index, child) in (0u32..).zip(node.children()) {
                entries.push(Entry::new(child.clone(), Some(parent), index, position));
                position += child.full_width();
            }
            let entry = &mut entries[next];
            entry.first_child = first_child;
            entry.child_count = to_u32(node.children().len());
            next += 1;
        }

        tracing::debug!(elements = entries.len(), "flattened old tree");
        SyntaxTree {
            root,
            entries,
            directives: DirectiveSlot::new(),
        }
    }

    #[inline]
    pub fn root(&self) -> &Arc<GreenNode> {
        &self.root
    }

    /// Length of the old document.
    #[inline]
    pub fn full_width(&self) -> u32 {
        self.root.full_width()
    }

    /// Number of nodes and tokens, the root included.
    #[inline]
    pub fn element_count(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn element(&self, id: ElementId) -> &GreenElement {
        &self.entries[id.index()].element
    }

    /// Single-token form of an interpolated string node.
    #[inline]
    pub fn opaque_token(&self, id: ElementId) -> Option<&GreenElement> {
        self.entries[id.index()].opaque.as_ref()
    }

    #[inline]
    pub fn parent(&self, id: ElementId) -> Option<ElementId> {
        self.entries[id.index()].parent
    }

    #[inline]
    pub fn index_in_parent(&self, id: ElementId) -> u32 {
        self.entries[id.index()].index_in_parent
    }

    /// Absolute full start of an element in the old document.
    #[inline]
    pub fn position(&self, id: ElementId) -> u32 {
        self.entries[id.index()].position
    }

    #[inline]
    pub fn child_count(&self, id: ElementId) -> u32 {
        self.entries[id.index()].child_count
    }

    pub fn child(&self, id: ElementId, index: u32) -> Option<ElementId> {
        let entry = &self.entries[id.index()];
        (index < entry.child_count).then(|| ElementId(entry.first_child + index))
    }

    /// Directive history at the end of the old document, computed once.
    pub fn directives(&self) -> &DirectiveStack {
        self.directives
            .get_or_compute(|| self.root.apply_directives(&DirectiveStack::EMPTY))
    }

    pub fn to_full_string(&self) -> String {
        self.root.to_full_string()
    }
}

impl fmt::Debug for SyntaxTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyntaxTree")
            .field("kind", &self.root.kind())
            .field("width", &self.root.full_width())
            .field("elements", &self.entries.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests;
