//! Relex incremental blender
//!
//! Produces the token stream of an edited document by copying what it can
//! from the previous parse and lexing the rest fresh.
//!
//! # Architecture
//!
//! 1. **Syntax Tree** - the old green tree flattened into an arena with
//!    parent links and absolute positions
//! 2. **Cursor** - a copyable walk position over that arena
//! 3. **Blender** - keeps old-tree and new-text positions in sync across a
//!    list of changes, deciding per element whether to reuse or re-lex
//! 4. **Token Stream** - pulls syntax tokens through end of file and counts
//!    what was reused
//!
//! # Reuse Rules
//!
//! An old element is copied forward only if it has a width, carries no
//! annotations or diagnostics, stays clear of the next change, is not a
//! parser-made token, is complete, and (when it holds directives) was lexed
//! under an equivalent directive history.

mod blender;
mod cursor;
mod fresh;
mod stream;
mod tree;

#[cfg(test)]
mod test_support;
#[cfg(test)]
mod tests;

pub use blender::{BlendedNode, Blender};
pub use cursor::Cursor;
pub use fresh::FreshLexer;
pub use stream::{IncrementalStats, TokenStream};
pub use tree::{ElementId, SyntaxTree};

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debug output.
///
/// Safe to call multiple times. Enable with `RUST_LOG=relex_parse=debug`,
/// or `trace` for every reuse decision.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        // Only initialize if RUST_LOG is set
        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .init();
        }
    });
}
