// src/schema.rs
//! Where each logical résumé field lives on the page.
//!
//! Every [`Field`] maps to candidate selectors in priority order: the current
//! (compact) markup first, the legacy markup after it. Lookups return the first
//! candidate that yields something non-empty, and an empty value when none
//! does. A missing node is never an error.

use crate::tree::ContentNode;
use crate::utils::clean_text;

/// How raw text content is turned into a field value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextMode {
    Trim,
    /// Multi-line source flattened to one line
    Clean,
}

impl TextMode {
    pub fn apply(self, raw: &str) -> String {
        match self {
            Self::Trim => raw.trim().to_string(),
            Self::Clean => clean_text(raw),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    // Page-level text
    Name,
    Title,
    Profile,
    ConsolidatedEducation,
    SoftSkills,
    ConsolidatedLanguages,

    // Page-level collections
    InlineContacts,
    LegacyContacts,
    ExperienceItems,
    ProjectItems,
    CertificationItems,
    CompactSkillCategories,
    SkillCategories,
    FlatSkills,
    EducationItems,
    LanguageItems,

    // Inside a contact item
    ContactIcon,
    ContactLink,

    // Inside an experience item
    Role,
    Organization,
    DateRange,
    ExperienceDescription,
    Achievements,

    // Inside a project item
    ProjectTitle,
    ProjectDate,
    ProjectDescription,
    ProjectBullets,

    // Inside a certification item
    CertificationInstitution,
    CertificationTitle,
    CertificationDate,

    // Inside a skill category
    CompactSkillLabel,
    CategoryName,
    CategoryItems,

    // Inside an education record
    EducationDate,
    EducationTitle,
    EducationDescription,
    EducationNote,
}

impl Field {
    pub fn candidates(self) -> &'static [&'static str] {
        match self {
            Self::Name => &[".main-name"],
            Self::Title => &[".main-title"],
            Self::Profile => &[".profile .profile-text", ".profile p"],
            Self::ConsolidatedEducation => &[".education-compact", ".education-text"],
            Self::SoftSkills => &[".soft-skills-compact", ".soft-skills-text"],
            Self::ConsolidatedLanguages => &[".languages-compact", ".languages-text"],

            Self::InlineContacts => &[".contact-item-inline"],
            Self::LegacyContacts => &[".contact-item"],
            Self::ExperienceItems => &[".experience-item"],
            Self::ProjectItems => &[".project-item"],
            Self::CertificationItems => &[".certification-item-compact", ".certification-item"],
            Self::CompactSkillCategories => &[".skill-category-compact"],
            Self::SkillCategories => &[".skill-category"],
            Self::FlatSkills => &[".skills li"],
            Self::EducationItems => &[".education-item"],
            Self::LanguageItems => &[".languages li"],

            Self::ContactIcon => &[".icon"],
            Self::ContactLink => &[".contact-link"],

            Self::Role => &[".experience-header .role", ".role"],
            Self::Organization => &[
                ".experience-header .company",
                ".experience-header h3",
                ".company",
            ],
            Self::DateRange => &[".date-range", ".experience-header .date"],
            Self::ExperienceDescription => &[".experience-description", "p"],
            Self::Achievements => &[".achievements li", "ul li"],

            Self::ProjectTitle => &[".project-header h3", ".project-title", "h3", "h4"],
            Self::ProjectDate => &[".project-header .project-date", ".project-date"],
            Self::ProjectDescription => &[".project-description", "p"],
            Self::ProjectBullets => &["ul li"],

            Self::CertificationInstitution => &[".certification-institution"],
            Self::CertificationTitle => &[".certification-title"],
            Self::CertificationDate => &[".certification-date"],

            Self::CompactSkillLabel => &[".skill-label"],
            Self::CategoryName => &[".category-name"],
            Self::CategoryItems => &[".category-items"],

            Self::EducationDate => &[".date"],
            Self::EducationTitle => &["h4"],
            Self::EducationDescription => &["p:not(.education-note):not(.note)"],
            Self::EducationNote => &[".education-note", ".note"],
        }
    }

    pub fn mode(self) -> TextMode {
        match self {
            Self::Profile
            | Self::ConsolidatedEducation
            | Self::SoftSkills
            | Self::ConsolidatedLanguages
            | Self::ExperienceDescription
            | Self::ProjectDescription
            | Self::CertificationTitle
            | Self::CategoryItems
            | Self::EducationDescription
            | Self::EducationNote => TextMode::Clean,
            _ => TextMode::Trim,
        }
    }
}

fn candidate_nodes<N: ContentNode>(scope: &N, selector: &str, nested: Option<&str>) -> Vec<N> {
    let found = scope.find_all(selector);
    match nested {
        Some(class) => found
            .into_iter()
            .filter(|node| !node.enclosed_by(class, scope))
            .collect(),
        None => found,
    }
}

fn lookup_text<N: ContentNode>(scope: &N, field: Field, nested: Option<&str>) -> String {
    for selector in field.candidates() {
        if let Some(node) = candidate_nodes(scope, selector, nested).into_iter().next() {
            let text = field.mode().apply(&node.text_content());
            if !text.is_empty() {
                return text;
            }
        }
    }
    String::new()
}

fn lookup_nodes<N: ContentNode>(scope: &N, field: Field, nested: Option<&str>) -> Vec<N> {
    field
        .candidates()
        .iter()
        .map(|selector| candidate_nodes(scope, selector, nested))
        .find(|nodes| !nodes.is_empty())
        .unwrap_or_default()
}

fn lookup_texts<N: ContentNode>(scope: &N, field: Field, nested: Option<&str>) -> Vec<String> {
    lookup_entries(
        scope,
        field,
        nested,
        |node| field.mode().apply(&node.text_content()),
        |text: &String| !text.is_empty(),
    )
}

fn lookup_entries<N, T>(
    scope: &N,
    field: Field,
    nested: Option<&str>,
    build: impl Fn(&N) -> T,
    keep: impl Fn(&T) -> bool,
) -> Vec<T>
where
    N: ContentNode,
{
    for selector in field.candidates() {
        let found: Vec<T> = candidate_nodes(scope, selector, nested)
            .iter()
            .map(&build)
            .filter(|entry| keep(entry))
            .collect();
        if !found.is_empty() {
            return found;
        }
    }
    Vec::new()
}

/// Value of `field` below `scope`, or an empty string.
pub fn text<N: ContentNode>(scope: &N, field: Field) -> String {
    lookup_text(scope, field, None)
}

/// Like [`text`], ignoring matches that sit inside a nested `nested` container.
pub fn own_text<N: ContentNode>(scope: &N, field: Field, nested: &str) -> String {
    lookup_text(scope, field, Some(nested))
}

/// Nodes of the first candidate that matches anything.
pub fn nodes<N: ContentNode>(scope: &N, field: Field) -> Vec<N> {
    lookup_nodes(scope, field, None)
}

/// Non-empty text values of the first candidate that has any.
pub fn texts<N: ContentNode>(scope: &N, field: Field) -> Vec<String> {
    lookup_texts(scope, field, None)
}

pub fn own_texts<N: ContentNode>(scope: &N, field: Field, nested: &str) -> Vec<String> {
    lookup_texts(scope, field, Some(nested))
}

/// Entries built from each candidate in turn, keeping the first candidate
/// for which `keep` accepts at least one entry. Blank current-shape items
/// therefore fall through to the legacy markup.
pub fn entries<N, T>(
    scope: &N,
    field: Field,
    build: impl Fn(&N) -> T,
    keep: impl Fn(&T) -> bool,
) -> Vec<T>
where
    N: ContentNode,
{
    lookup_entries(scope, field, None, build, keep)
}
