//! Case-preserving Yale -> Fale rewriting.
//!
//! Two layers: a pure string replacer that mirrors the casing of each
//! occurrence, and a selective DOM rewriter that applies it to body text
//! nodes and the document title while leaving markup and attributes alone.

mod dom;
mod replacer;

pub use dom::{RewrittenDocument, rewrite_document};
pub use replacer::replace_preserving_case;
