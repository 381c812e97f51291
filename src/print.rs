// src/print.rs
//! Print copy of the résumé page.
//!
//! The page is not modified in place: a copy is parsed into a DOM, gets its
//! images inlined (or hidden when they cannot be loaded), a `<base>` pointing
//! back at the original directory and a stylesheet with the compact print
//! layout, and is serialized again.

use anyhow::{Context, Result};
use html5ever::serialize::{serialize, SerializeOpts};
use html5ever::tendril::TendrilSink;
use html5ever::tree_builder::TreeBuilderOpts;
use html5ever::{ns, parse_document, Attribute, LocalName, ParseOpts, QualName};
use markup5ever_rcdom::{Handle, Node, NodeData, RcDom, SerializableHandle};
use serde::{Deserialize, Serialize};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::path::Path;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use crate::images::{ImageIssue, ImageResolver, ResolvedImage};
use crate::renderer::RenderOptions;
use crate::tree::HtmlTree;

const STYLE_ID: &str = "pdf-styles";

/// Overrides tightening the sidebar and photo for paper
const COMPACT_STYLES: &str = "\
.profile-photo img { width: 100px !important; height: 100px !important; border: 2px solid #34495e !important; }
.profile-photo { margin-bottom: 10px !important; }
.sidebar { padding: 15px 15px !important; }
.sidebar section { margin-bottom: 15px !important; }
.sidebar h3 { margin-bottom: 10px !important; padding-bottom: 5px !important; }
.contact-item { margin-bottom: 8px !important; font-size: 12px !important; }
.education-item { margin-bottom: 12px !important; }
.sidebar ul li { font-size: 11px !important; margin-bottom: 5px !important; }
";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrintOptions {
    /// Screen-only parts of the page left out of the print copy
    pub hide_selectors: Vec<String>,
    pub image_timeout_secs: u64,
    pub compact_styles: bool,
}

impl Default for PrintOptions {
    fn default() -> Self {
        Self {
            hide_selectors: [
                "#main-nav",
                ".main-nav",
                "#repositories-section",
                ".repositories-section",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            image_timeout_secs: 5,
            compact_styles: true,
        }
    }
}

#[derive(Debug)]
pub struct PreparedPage {
    pub html: String,
    pub inlined: usize,
    pub hidden: Vec<ImageIssue>,
}

pub async fn prepare_print_page(
    html: &str,
    base_dir: &Path,
    print: &PrintOptions,
    render: &RenderOptions,
) -> Result<PreparedPage> {
    let sources = HtmlTree::parse(html).image_sources();

    let resolver = Arc::new(ImageResolver::new(
        base_dir.to_path_buf(),
        Duration::from_secs(print.image_timeout_secs),
    )?);
    let resolved = resolver.resolve_all(sources).await;

    let mut replacements = HashMap::new();
    let mut hidden = Vec::new();
    for (src, outcome) in resolved {
        match outcome {
            ResolvedImage::Keep => {}
            ResolvedImage::Inline(uri) => {
                replacements.insert(src, uri);
            }
            ResolvedImage::Hide(issue) => hidden.push(issue),
        }
    }

    let hidden_sources: Vec<&str> = hidden.iter().map(|issue| issue.source.as_str()).collect();
    let stylesheet = print_stylesheet(print, render, &hidden_sources);
    let base = base_href(base_dir)?;

    let dom = parse_page(html);
    let inlined = inline_images(&dom.document, &replacements);
    inject_head(&dom, &base, &stylesheet)?;
    let page = serialize_page(&dom)?;

    info!(
        "Prepared print page: {} images inlined, {} hidden",
        inlined,
        hidden.len()
    );

    Ok(PreparedPage {
        html: page,
        inlined,
        hidden,
    })
}

pub fn print_stylesheet(print: &PrintOptions, render: &RenderOptions, hidden_sources: &[&str]) -> String {
    let mut css = String::new();

    if print.compact_styles {
        css.push_str(COMPACT_STYLES);
    }

    if !print.hide_selectors.is_empty() {
        css.push_str(&format!(
            "{} {{ display: none !important; }}\n",
            print.hide_selectors.join(", ")
        ));
    }

    if !render.avoid_break_selectors.is_empty() {
        css.push_str(&format!(
            "{} {{ page-break-inside: avoid; break-inside: avoid; }}\n",
            render.avoid_break_selectors.join(", ")
        ));
    }

    for src in hidden_sources {
        css.push_str(&format!(
            "img[src=\"{}\"] {{ display: none !important; }}\n",
            escape_css_string(src)
        ));
    }

    css
}

fn parse_page(html: &str) -> RcDom {
    let opts = ParseOpts {
        tree_builder: TreeBuilderOpts {
            drop_doctype: false,
            ..Default::default()
        },
        ..Default::default()
    };

    parse_document(RcDom::default(), opts)
        .from_utf8()
        .one(html.as_bytes())
}

fn serialize_page(dom: &RcDom) -> Result<String> {
    let mut bytes = Vec::new();
    let document: SerializableHandle = dom.document.clone().into();
    serialize(&mut bytes, &document, SerializeOpts::default())
        .context("Failed to serialize print page")?;
    String::from_utf8(bytes).context("Print page is not valid UTF-8")
}

/// Put `<base href>` and the print `<style>` first in the document head.
fn inject_head(dom: &RcDom, base_href: &str, css: &str) -> Result<()> {
    let head = find_elements(&dom.document, "head")
        .into_iter()
        .next()
        .context("Print page has no head element")?;

    let base = create_element("base", &[("href", base_href)]);
    let style = create_element("style", &[("id", STYLE_ID)]);
    append_child(&style, create_text(&format!("\n{}", css)));

    let mut children = head.children.borrow_mut();
    for (index, node) in [base, style].into_iter().enumerate() {
        node.parent.set(Some(Rc::downgrade(&head)));
        children.insert(index, node);
    }
    Ok(())
}

/// Point every `<img>` whose source has a replacement at it. Returns the
/// number of elements rewritten.
fn inline_images(document: &Handle, replacements: &HashMap<String, String>) -> usize {
    let mut rewritten = 0;
    for img in find_elements(document, "img") {
        let NodeData::Element { ref attrs, .. } = img.data else {
            continue;
        };
        for attr in attrs.borrow_mut().iter_mut() {
            if attr.name.local.as_ref() != "src" {
                continue;
            }
            if let Some(uri) = replacements.get(&*attr.value) {
                attr.value = uri.as_str().into();
                rewritten += 1;
            }
        }
    }
    rewritten
}

fn find_elements(handle: &Handle, name: &str) -> Vec<Handle> {
    let mut found = Vec::new();
    collect_elements(handle, name, &mut found);
    found
}

fn collect_elements(handle: &Handle, name: &str, found: &mut Vec<Handle>) {
    if let NodeData::Element { name: ref qname, .. } = handle.data {
        if qname.local.as_ref() == name {
            found.push(handle.clone());
        }
    }
    for child in handle.children.borrow().iter() {
        collect_elements(child, name, found);
    }
}

fn create_element(tag: &str, attrs: &[(&str, &str)]) -> Handle {
    let attributes = attrs
        .iter()
        .map(|(name, value)| Attribute {
            name: QualName::new(None, ns!(), LocalName::from(*name)),
            value: (*value).into(),
        })
        .collect();

    Rc::new(Node {
        parent: Cell::new(None),
        children: RefCell::new(Vec::new()),
        data: NodeData::Element {
            name: QualName::new(None, ns!(html), LocalName::from(tag)),
            attrs: RefCell::new(attributes),
            template_contents: Default::default(),
            mathml_annotation_xml_integration_point: false,
        },
    })
}

fn create_text(text: &str) -> Handle {
    Rc::new(Node {
        parent: Cell::new(None),
        children: RefCell::new(Vec::new()),
        data: NodeData::Text {
            contents: RefCell::new(text.into()),
        },
    })
}

fn append_child(parent: &Handle, child: Handle) {
    child.parent.set(Some(Rc::downgrade(parent)));
    parent.children.borrow_mut().push(child);
}

fn base_href(base_dir: &Path) -> Result<String> {
    let absolute = if base_dir.is_absolute() {
        base_dir.to_path_buf()
    } else {
        std::env::current_dir()
            .context("Failed to get current directory")?
            .join(base_dir)
    };
    let mut href = format!("file://{}", absolute.display());
    if !href.ends_with('/') {
        href.push('/');
    }
    Ok(href)
}

fn escape_css_string(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}
