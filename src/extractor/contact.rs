// src/extractor/contact.rs
use crate::schema::{self, Field};
use crate::tree::ContentNode;
use crate::types::{ContactBlock, ContactEntry, ContactShape};
use crate::utils::{clean_text, strip_icon_glyphs};

const ICON_CLASS: &str = "icon";

pub fn extract<N: ContentNode>(root: &N) -> ContactBlock {
    let inline: Vec<ContactEntry> = schema::nodes(root, Field::InlineContacts)
        .iter()
        .map(inline_entry)
        .filter(|entry| !entry.text.is_empty())
        .collect();

    if !inline.is_empty() {
        return ContactBlock {
            shape: ContactShape::Inline,
            entries: inline,
        };
    }

    let legacy = schema::nodes(root, Field::LegacyContacts)
        .iter()
        .map(legacy_entry)
        .filter(|entry| !entry.text.is_empty() || entry.uri.is_some())
        .collect();

    ContactBlock {
        shape: ContactShape::Legacy,
        entries: legacy,
    }
}

fn inline_entry<N: ContentNode>(item: &N) -> ContactEntry {
    let uri = item
        .find_first("a")
        .and_then(|link| link.attribute("href"))
        .filter(|href| !href.is_empty());

    ContactEntry {
        icon: schema::text(item, Field::ContactIcon),
        text: strip_icon_glyphs(&clean_text(&item.text_excluding(ICON_CLASS))),
        uri,
    }
}

fn legacy_entry<N: ContentNode>(item: &N) -> ContactEntry {
    match schema::nodes(item, Field::ContactLink).into_iter().next() {
        Some(link) => ContactEntry {
            icon: schema::text(item, Field::ContactIcon),
            text: link.text_content().trim().to_string(),
            uri: link.attribute("href").filter(|href| !href.is_empty()),
        },
        None => ContactEntry {
            icon: String::new(),
            text: strip_icon_glyphs(item.text_content().trim()),
            uri: None,
        },
    }
}
