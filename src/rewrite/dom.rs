//! Selective HTML tree rewriting.
//!
//! Parses a document, maps every text node inside `<body>` through the
//! case-preserving replacer, and writes back only the nodes whose content
//! actually changed. Element attributes never pass through the replacer,
//! which keeps URLs containing the target word intact while the visible
//! link text is rewritten. The `<title>` is processed independently.

use kuchiki::NodeRef;
use kuchiki::traits::TendrilSink;

use super::replacer::replace_preserving_case;

/// Result of rewriting one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewrittenDocument {
    /// Serialized HTML with all eligible text replaced.
    pub html: String,
    /// The rewritten title; empty when the document has none.
    pub title: String,
}

/// Rewrite all eligible text in `html` and return the serialized document
/// together with the rewritten title.
///
/// Malformed input is tolerated: the html5ever parser recovers on a
/// best-effort basis and this function transforms whatever tree it produced.
pub fn rewrite_document(html: &str) -> RewrittenDocument {
    let document = kuchiki::parse_html().one(html);

    if let Ok(body) = document.select_first("body") {
        for node in body.as_node().descendants() {
            let Some(text) = node.as_text() else { continue };
            let current = text.borrow().clone();
            let rewritten = replace_preserving_case(&current);
            if rewritten != current {
                *text.borrow_mut() = rewritten;
            }
        }
    }

    let title = rewrite_title(&document);

    RewrittenDocument {
        html: serialize(&document),
        title,
    }
}

/// Rewrite the `<title>` text and write it back into the element.
/// Documents without a title yield an empty string.
fn rewrite_title(document: &NodeRef) -> String {
    let Ok(title) = document.select_first("title") else {
        return String::new();
    };

    let node = title.as_node();
    let current = node.text_contents();
    let rewritten = replace_preserving_case(&current);
    if rewritten != current {
        while let Some(child) = node.first_child() {
            child.detach();
        }
        node.append(NodeRef::new_text(rewritten.clone()));
    }
    rewritten
}

fn serialize(document: &NodeRef) -> String {
    let mut out = Vec::new();
    // Writing to an in-memory buffer cannot fail
    let _ = document.serialize(&mut out);
    String::from_utf8_lossy(&out).into_owned()
}
