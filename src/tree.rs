// src/tree.rs
//! Read-only access to the résumé page.
//!
//! The extractor only ever talks to a [`ContentNode`]: a borrowed element it
//! can query by selector, read text and attributes from, and ask about its
//! enclosing containers. [`HtmlTree`] provides that view over a parsed HTML
//! document.

use anyhow::{Context, Result};
use scraper::{ElementRef, Html, Node, Selector};
use std::path::Path;
use tracing::warn;

pub trait ContentNode: Sized + Clone {
    /// Descendants matching `selector`, in document order. An unparsable
    /// selector matches nothing.
    fn find_all(&self, selector: &str) -> Vec<Self>;

    /// Concatenated text of the node and all its descendants.
    fn text_content(&self) -> String;

    /// Text content, skipping any subtree rooted at an element with `class`.
    fn text_excluding(&self, class: &str) -> String;

    fn attribute(&self, name: &str) -> Option<String>;

    fn has_class(&self, class: &str) -> bool;

    /// Whether an ancestor strictly between `self` and `boundary` carries `class`.
    fn enclosed_by(&self, class: &str, boundary: &Self) -> bool;

    fn find_first(&self, selector: &str) -> Option<Self> {
        self.find_all(selector).into_iter().next()
    }
}

/// A parsed résumé page.
pub struct HtmlTree {
    document: Html,
}

impl HtmlTree {
    pub fn parse(html: &str) -> Self {
        Self {
            document: Html::parse_document(html),
        }
    }

    pub async fn load(path: &Path) -> Result<Self> {
        let html = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read page: {}", path.display()))?;
        Ok(Self::parse(&html))
    }

    pub fn root(&self) -> ElementRef<'_> {
        self.document.root_element()
    }

    /// `src` of every `<img>`, in document order, duplicates removed.
    pub fn image_sources(&self) -> Vec<String> {
        let mut sources: Vec<String> = Vec::new();
        for img in self.root().find_all("img") {
            if let Some(src) = img.attribute("src") {
                if !src.is_empty() && !sources.contains(&src) {
                    sources.push(src);
                }
            }
        }
        sources
    }
}

fn element_has_class(element: &ElementRef<'_>, class: &str) -> bool {
    element.value().classes().any(|c| c == class)
}

impl<'a> ContentNode for ElementRef<'a> {
    fn find_all(&self, selector: &str) -> Vec<Self> {
        match Selector::parse(selector) {
            Ok(parsed) => ElementRef::select(self, &parsed).collect(),
            Err(e) => {
                warn!("Ignoring unparsable selector {:?}: {:?}", selector, e);
                Vec::new()
            }
        }
    }

    fn text_content(&self) -> String {
        self.text().collect()
    }

    fn text_excluding(&self, class: &str) -> String {
        let mut out = String::new();
        for node in self.descendants() {
            let Node::Text(text) = node.value() else {
                continue;
            };
            let excluded = node
                .ancestors()
                .take_while(|ancestor| ancestor.id() != self.id())
                .filter_map(ElementRef::wrap)
                .any(|element| element_has_class(&element, class));
            if !excluded {
                out.push_str(text);
            }
        }
        out
    }

    fn attribute(&self, name: &str) -> Option<String> {
        self.value().attr(name).map(str::to_string)
    }

    fn has_class(&self, class: &str) -> bool {
        element_has_class(self, class)
    }

    fn enclosed_by(&self, class: &str, boundary: &Self) -> bool {
        self.ancestors()
            .take_while(|ancestor| ancestor.id() != boundary.id())
            .filter_map(ElementRef::wrap)
            .any(|element| element_has_class(&element, class))
    }
}
