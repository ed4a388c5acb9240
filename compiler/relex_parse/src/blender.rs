//! Blending an old tree with fresh lexing.
//!
//! The blender walks two documents at once: the old tree through a
//! [`Cursor`], the new text through a [`FreshLexer`]. `change_delta` is how
//! far the old walk must move to line up with the new one:
//!
//! - lexing a fresh token subtracts its width,
//! - skipping an old token adds its width,
//! - passing the end of a change adds `new_len - old_len`.
//!
//! While the delta is negative, old tokens are skipped. While it is
//! positive, new text is lexed. At zero the old element under the cursor is
//! offered for reuse; a rejected node is entered, a rejected token skipped.
//!
//! # State
//!
//! A [`Blender`] is an immutable snapshot. Reads return the next element
//! together with the advanced snapshot, so a parser can keep an earlier
//! blender and read again from there (the lexer is repositioned as needed).

use std::sync::Arc;

use relex_ir::{
    ChangeError, ChangeRange, DirectiveStack, GreenElement, GreenNode, GreenToken, NodeFlags,
    Span, SyntaxKind,
};
use relex_lexer::LexerMode;
use tracing::{debug, trace};

use crate::cursor::Cursor;
use crate::fresh::FreshLexer;
use crate::tree::SyntaxTree;

/// Reader state for one blending session.
#[derive(Clone, Debug)]
pub struct Blender<'t> {
    cursor: Cursor<'t>,
    changes: Arc<[ChangeRange]>,
    /// Index of the first change not yet passed.
    next_change: usize,
    old_width: u32,
    new_position: u32,
    change_delta: i64,
    new_directives: DirectiveStack,
    old_directives: DirectiveStack,
    /// Location and style bits handed back by the last documentation token.
    lexer_driven: LexerMode,
    skipped: u32,
}

/// One read from a [`Blender`].
#[derive(Clone, Debug)]
pub struct BlendedNode<'t> {
    /// Set when a whole old subtree was reused.
    pub node: Option<Arc<GreenNode>>,
    /// Set when a token was reused or lexed.
    pub token: Option<Arc<GreenToken>>,
    /// Full start in the new document.
    pub position: u32,
    pub reused: bool,
    /// State after this read.
    pub blender: Blender<'t>,
}

impl BlendedNode<'_> {
    pub fn full_width(&self) -> u32 {
        match (&self.node, &self.token) {
            (Some(node), _) => node.full_width(),
            (None, Some(token)) => token.full_width(),
            (None, None) => 0,
        }
    }

    pub fn kind(&self) -> SyntaxKind {
        match (&self.node, &self.token) {
            (Some(node), _) => node.kind(),
            (None, Some(token)) => token.kind(),
            (None, None) => SyntaxKind::None,
        }
    }
}

impl<'t> Blender<'t> {
    /// Start a session at the beginning of the new document.
    ///
    /// Without an old tree every read lexes fresh, starting wherever the
    /// lexer currently is. With one, `changes` must describe the edit from
    /// the old tree's text to the lexer's document.
    #[tracing::instrument(level = "debug", skip_all, fields(changes = changes.len(), old_tree = old_tree.is_some()))]
    pub fn new<L: FreshLexer + ?Sized>(
        lexer: &L,
        old_tree: Option<&'t SyntaxTree>,
        changes: &[ChangeRange],
    ) -> Result<Self, ChangeError> {
        let blender = match old_tree {
            Some(tree) => {
                ChangeRange::validate(changes, tree.full_width())?;
                Blender {
                    cursor: Cursor::from_root(tree).move_to_first_child(),
                    changes: changes.into(),
                    next_change: 0,
                    old_width: tree.full_width(),
                    new_position: 0,
                    change_delta: 0,
                    new_directives: DirectiveStack::EMPTY,
                    old_directives: DirectiveStack::EMPTY,
                    lexer_driven: LexerMode::empty(),
                    skipped: 0,
                }
            }
            None => Blender {
                cursor: Cursor::empty(),
                changes: Arc::from([]),
                next_change: 0,
                old_width: 0,
                new_position: lexer.position(),
                change_delta: 0,
                new_directives: lexer.directives().clone(),
                old_directives: DirectiveStack::EMPTY,
                lexer_driven: LexerMode::empty(),
                skipped: 0,
            },
        };
        debug!(position = blender.new_position, "blender ready");
        Ok(blender)
    }

    /// Next node or token. Old subtrees are reused whole when possible.
    pub fn read_node<L: FreshLexer + ?Sized>(&self, lexer: &mut L, mode: LexerMode) -> BlendedNode<'t> {
        self.clone().read_node_or_token(lexer, mode, false)
    }

    /// Next token. Old tokens are reused when possible, never old nodes.
    pub fn read_token<L: FreshLexer + ?Sized>(&self, lexer: &mut L, mode: LexerMode) -> BlendedNode<'t> {
        self.clone().read_node_or_token(lexer, mode, true)
    }

    /// Position in the new document where the next read starts.
    #[inline]
    pub fn position(&self) -> u32 {
        self.new_position
    }

    #[inline]
    pub fn change_delta(&self) -> i64 {
        self.change_delta
    }

    /// Directive history of the new document up to [`position`](Self::position).
    #[inline]
    pub fn directives(&self) -> &DirectiveStack {
        &self.new_directives
    }

    /// Directive history of the old tree up to the cursor.
    #[inline]
    pub fn old_directives(&self) -> &DirectiveStack {
        &self.old_directives
    }

    /// Changes the old walk has not passed yet.
    pub fn pending_changes(&self) -> &[ChangeRange] {
        &self.changes[self.next_change..]
    }

    /// Old tokens dropped without being reused.
    #[inline]
    pub fn skipped_tokens(&self) -> u32 {
        self.skipped
    }

    #[inline]
    pub fn cursor(&self) -> &Cursor<'t> {
        &self.cursor
    }

    fn read_node_or_token<L: FreshLexer + ?Sized>(
        mut self,
        lexer: &mut L,
        mode: LexerMode,
        as_token: bool,
    ) -> BlendedNode<'t> {
        loop {
            if self.cursor.is_finished() {
                return self.read_new_token(lexer, mode);
            }
            if self.change_delta < 0 {
                self.skip_old_token();
            } else if self.change_delta > 0 {
                return self.read_new_token(lexer, mode);
            } else {
                if let Some(blended) = self.try_take_old(mode, as_token) {
                    return blended;
                }
                if self.cursor.is_node() {
                    self.cursor = self.cursor.move_to_first_child();
                } else {
                    self.skip_old_token();
                }
            }
        }
    }

    // === Fresh text ===

    fn read_new_token<L: FreshLexer + ?Sized>(mut self, lexer: &mut L, mode: LexerMode) -> BlendedNode<'t> {
        let token = self.lex_new_token(lexer, mode);
        let position = self.new_position;
        let width = token.full_width();
        self.new_position += width;
        self.change_delta -= i64::from(width);
        self.skip_past_changes();
        trace!(kind = ?token.kind(), position, width, "lexed");
        BlendedNode {
            node: None,
            token: Some(token),
            position,
            reused: false,
            blender: self,
        }
    }

    fn lex_new_token<L: FreshLexer + ?Sized>(&mut self, lexer: &mut L, mode: LexerMode) -> Arc<GreenToken> {
        if lexer.position() != self.new_position || !lexer.directives().ptr_eq(&self.new_directives) {
            lexer.reset(self.new_position, self.new_directives.clone());
        }
        let mut mode = mode;
        if mode.is_doc_comment() {
            mode |= self.lexer_driven;
        }
        let token = lexer.lex(&mut mode);
        self.new_directives = lexer.directives().clone();
        self.lexer_driven = mode.lexer_driven();
        token
    }

    // === Old tree ===

    fn skip_old_token(&mut self) {
        self.cursor = self.cursor.move_to_first_token();
        let Some(element) = self.cursor.element() else {
            return;
        };
        trace!(kind = ?element.kind(), position = self.cursor.position(), "skipped");
        self.change_delta += i64::from(element.full_width());
        self.old_directives = element.apply_directives(&self.old_directives);
        self.skipped += 1;
        self.cursor = self.cursor.move_to_next_sibling();
        self.skip_past_changes();
    }

    /// Drop the changes the old walk has moved past, folding their length
    /// difference into the delta.
    fn skip_past_changes(&mut self) {
        let old_position = self.cursor.position().unwrap_or(self.old_width);
        while let Some(change) = self.changes.get(self.next_change) {
            if old_position < change.span.end {
                break;
            }
            self.change_delta += change.delta();
            self.next_change += 1;
        }
    }

    fn try_take_old(&mut self, mode: LexerMode, as_token: bool) -> Option<BlendedNode<'t>> {
        if as_token {
            self.cursor = self.cursor.move_to_first_token();
        }
        let element = self.cursor.element()?;
        let position = self.cursor.position()?;
        if mode.kind() != LexerMode::SYNTAX || !self.can_reuse(element, position) {
            trace!(kind = ?element.kind(), position, "not reusable");
            return None;
        }

        self.new_position += element.full_width();
        self.cursor = self.cursor.move_to_next_sibling();
        self.new_directives = element.apply_directives(&self.new_directives);
        self.old_directives = element.apply_directives(&self.old_directives);
        trace!(kind = ?element.kind(), position, width = element.full_width(), "reused");

        let (node, token) = match element {
            GreenElement::Node(node) => (Some(Arc::clone(node)), None),
            GreenElement::Token(token) => (None, Some(Arc::clone(token))),
        };
        Some(BlendedNode {
            node,
            token,
            position: self.new_position - element.full_width(),
            reused: true,
            blender: self.clone(),
        })
    }

    fn can_reuse(&self, element: &GreenElement, position: u32) -> bool {
        // Zero width means the parser synthesized something here.
        if element.full_width() == 0 {
            return false;
        }
        let flags = element.flags();
        if flags.contains(NodeFlags::CONTAINS_ANNOTATIONS) {
            return false;
        }
        if self.intersects_next_change(element, position) {
            return false;
        }
        if flags.contains(NodeFlags::CONTAINS_DIAGNOSTICS) {
            return false;
        }
        if matches!(element, GreenElement::Token(_))
            && flags.contains(NodeFlags::CONTAINS_SKIPPED_TEXT)
            && self.cursor.parent_flags().contains(NodeFlags::CONTAINS_DIAGNOSTICS)
        {
            return false;
        }
        if element.kind().is_fabricated() {
            return false;
        }
        if is_missing_or_incomplete(element) {
            return false;
        }
        if !flags.contains(NodeFlags::CONTAINS_DIRECTIVES) {
            return true;
        }
        self.new_directives.incrementally_equivalent(&self.old_directives)
    }

    fn intersects_next_change(&self, element: &GreenElement, position: u32) -> bool {
        let Some(change) = self.changes.get(self.next_change) else {
            return false;
        };
        let span = Span::from_len(position, element.full_width());
        // Trailing whitespace or a line break ends the last token's scan
        // before the change.
        if span.end <= change.span.start && ends_in_separator(element) {
            return false;
        }
        // Otherwise the scan may have peeked one character past the end
        // (`1.` followed by a digit).
        let reach = Span::new(span.start, span.end + 1);
        reach.intersects_or_touches(change.span)
    }
}

/// A missing token, or a node whose last token is missing.
fn is_missing_or_incomplete(element: &GreenElement) -> bool {
    element.last_token().is_some_and(|token| token.is_missing())
}

fn ends_in_separator(element: &GreenElement) -> bool {
    element
        .last_token()
        .and_then(|token| token.trailing().last())
        .is_some_and(|trivia| {
            matches!(
                trivia.kind(),
                SyntaxKind::WhitespaceTrivia | SyntaxKind::EndOfLineTrivia
            )
        })
}
