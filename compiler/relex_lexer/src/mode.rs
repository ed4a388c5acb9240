//! Lexer modes.
//!
//! The low 16 bits select what kind of token to scan. Above them sit two
//! small fields the lexer itself updates while it walks a documentation
//! comment: the comment *location* (start of a line, inside, between lines,
//! finished) and the comment *style* (`///` lines or `/** */`). Those fields
//! only mean something when the mode kind is a documentation mode; the
//! accessors assert that.

use bitflags::bitflags;

bitflags! {
    /// Requested scanning mode plus lexer-driven documentation state.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
    pub struct LexerMode: u32 {
        const SYNTAX = 0x0001;
        const DEBUGGER_SYNTAX = 0x0002;
        const DIRECTIVE = 0x0004;
        const XML_DOC_COMMENT = 0x0008;
        const XML_ELEMENT_TAG = 0x0010;
        const XML_ATTRIBUTE_TEXT_QUOTE = 0x0020;
        const XML_ATTRIBUTE_TEXT_DOUBLE_QUOTE = 0x0040;
        const XML_CREF_QUOTE = 0x0080;
        const XML_CREF_DOUBLE_QUOTE = 0x0100;
        const XML_NAME_QUOTE = 0x0200;
        const XML_NAME_DOUBLE_QUOTE = 0x0400;
        const XML_CDATA_SECTION_TEXT = 0x0800;
        const XML_COMMENT_TEXT = 0x1000;
        const XML_PROCESSING_INSTRUCTION_TEXT = 0x2000;
        const XML_CHARACTER = 0x4000;
        const MASK_LEX_MODE = 0xFFFF;

        // === Lexer-driven documentation state ===
        const XML_DOC_COMMENT_LOCATION_INTERIOR = 0x1_0000;
        const XML_DOC_COMMENT_LOCATION_EXTERIOR = 0x2_0000;
        const XML_DOC_COMMENT_LOCATION_END = 0x4_0000;
        const MASK_XML_DOC_COMMENT_LOCATION = 0xF_0000;

        const XML_DOC_COMMENT_STYLE_DELIMITED = 0x10_0000;
        const MASK_XML_DOC_COMMENT_STYLE = 0x30_0000;

        /// Bits the lexer hands back to its caller between calls.
        const MASK_LEXER_DRIVEN = Self::MASK_XML_DOC_COMMENT_LOCATION.bits()
            | Self::MASK_XML_DOC_COMMENT_STYLE.bits();
    }
}

/// Where the lexer is within a documentation comment.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum DocCommentLocation {
    /// Before the first exterior marker.
    Start,
    /// Inside the comment text of a line.
    Interior,
    /// After a line break, before the next line's exterior marker.
    Exterior,
    /// Past the end of the comment.
    End,
}

/// Documentation comment flavor.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum DocCommentStyle {
    /// Consecutive `///` lines.
    SingleLine,
    /// One `/** ... */` comment.
    Delimited,
}

impl LexerMode {
    /// Mode kind with the lexer-driven fields stripped.
    #[inline]
    pub fn kind(self) -> LexerMode {
        self & LexerMode::MASK_LEX_MODE
    }

    /// Mode kind is one of the documentation comment modes.
    pub fn is_doc_comment(self) -> bool {
        let kind = self.kind();
        kind.bits() >= LexerMode::XML_DOC_COMMENT.bits() && kind.bits() <= LexerMode::XML_CHARACTER.bits()
    }

    /// Location field. Only valid for documentation modes.
    pub fn location(self) -> DocCommentLocation {
        debug_assert!(self.is_doc_comment(), "location of non-documentation mode {self:?}");
        let bits = self & LexerMode::MASK_XML_DOC_COMMENT_LOCATION;
        if bits.contains(LexerMode::XML_DOC_COMMENT_LOCATION_END) {
            DocCommentLocation::End
        } else if bits.contains(LexerMode::XML_DOC_COMMENT_LOCATION_EXTERIOR) {
            DocCommentLocation::Exterior
        } else if bits.contains(LexerMode::XML_DOC_COMMENT_LOCATION_INTERIOR) {
            DocCommentLocation::Interior
        } else {
            DocCommentLocation::Start
        }
    }

    /// Same mode with the location field replaced.
    #[must_use]
    pub fn with_location(self, location: DocCommentLocation) -> LexerMode {
        let bits = match location {
            DocCommentLocation::Start => LexerMode::empty(),
            DocCommentLocation::Interior => LexerMode::XML_DOC_COMMENT_LOCATION_INTERIOR,
            DocCommentLocation::Exterior => LexerMode::XML_DOC_COMMENT_LOCATION_EXTERIOR,
            DocCommentLocation::End => LexerMode::XML_DOC_COMMENT_LOCATION_END,
        };
        (self - LexerMode::MASK_XML_DOC_COMMENT_LOCATION) | bits
    }

    /// Style field. Only valid for documentation modes.
    pub fn style(self) -> DocCommentStyle {
        debug_assert!(self.is_doc_comment(), "style of non-documentation mode {self:?}");
        if self.contains(LexerMode::XML_DOC_COMMENT_STYLE_DELIMITED) {
            DocCommentStyle::Delimited
        } else {
            DocCommentStyle::SingleLine
        }
    }

    #[must_use]
    pub fn with_style(self, style: DocCommentStyle) -> LexerMode {
        let bits = match style {
            DocCommentStyle::SingleLine => LexerMode::empty(),
            DocCommentStyle::Delimited => LexerMode::XML_DOC_COMMENT_STYLE_DELIMITED,
        };
        (self - LexerMode::MASK_XML_DOC_COMMENT_STYLE) | bits
    }

    /// Location and style bits only.
    #[inline]
    pub fn lexer_driven(self) -> LexerMode {
        self & LexerMode::MASK_LEXER_DRIVEN
    }

    /// `self`'s kind combined with `driven`'s location and style.
    #[must_use]
    pub fn merge_lexer_driven(self, driven: LexerMode) -> LexerMode {
        (self - LexerMode::MASK_LEXER_DRIVEN) | driven.lexer_driven()
    }
}

#[cfg(test)]
mod tests;
