//! Token-at-a-time iteration over a blending session.

use relex_ir::{ChangeError, ChangeRange, SyntaxKind};
use relex_lexer::LexerMode;
use tracing::debug;

use crate::blender::{BlendedNode, Blender};
use crate::fresh::FreshLexer;
use crate::tree::SyntaxTree;

/// Statistics for one incremental session.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IncrementalStats {
    /// Tokens copied from the old tree.
    pub reused_count: usize,
    /// Tokens produced by the fresh lexer.
    pub relexed_count: usize,
    /// Old tokens dropped without reuse.
    pub skipped_count: usize,
}

impl IncrementalStats {
    /// Share of emitted tokens that were reused, as a percentage.
    #[allow(
        clippy::cast_precision_loss,
        reason = "counts won't approach 2^52; precision loss irrelevant for display"
    )]
    pub fn reuse_rate(&self) -> f64 {
        let total = self.reused_count + self.relexed_count;
        if total == 0 {
            0.0
        } else {
            (self.reused_count as f64 / total as f64) * 100.0
        }
    }
}

/// Syntax-mode tokens of the new document, through end of file.
pub struct TokenStream<'t, 'l, L: FreshLexer + ?Sized> {
    lexer: &'l mut L,
    blender: Blender<'t>,
    stats: IncrementalStats,
    finished: bool,
}

impl<'t, 'l, L: FreshLexer + ?Sized> TokenStream<'t, 'l, L> {
    pub fn new(
        lexer: &'l mut L,
        old_tree: Option<&'t SyntaxTree>,
        changes: &[ChangeRange],
    ) -> Result<Self, ChangeError> {
        let blender = Blender::new(&*lexer, old_tree, changes)?;
        Ok(TokenStream {
            lexer,
            blender,
            stats: IncrementalStats::default(),
            finished: false,
        })
    }

    #[inline]
    pub fn stats(&self) -> &IncrementalStats {
        &self.stats
    }

    /// State after the last token read.
    #[inline]
    pub fn blender(&self) -> &Blender<'t> {
        &self.blender
    }
}

impl<'t, L: FreshLexer + ?Sized> Iterator for TokenStream<'t, '_, L> {
    type Item = BlendedNode<'t>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        let blended = self.blender.read_token(&mut *self.lexer, LexerMode::SYNTAX);
        if blended.reused {
            self.stats.reused_count += 1;
        } else {
            self.stats.relexed_count += 1;
        }
        self.stats.skipped_count = blended.blender.skipped_tokens() as usize;
        self.blender = blended.blender.clone();

        if blended.kind() == SyntaxKind::EndOfFileToken {
            self.finished = true;
            debug!(
                reused = self.stats.reused_count,
                relexed = self.stats.relexed_count,
                skipped = self.stats.skipped_count,
                rate = self.stats.reuse_rate(),
                "token stream finished"
            );
        }
        Some(blended)
    }
}
