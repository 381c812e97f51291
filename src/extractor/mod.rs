// src/extractor/mod.rs
//! Reduce the résumé page to [`Resume`] entities.
//!
//! Each field is looked up independently through [`crate::schema`], so a page
//! can mix current and legacy markup freely. Nothing here fails: a missing
//! node yields an empty value and the rest of the page is still extracted.

pub mod contact;
pub mod experience;
pub mod sidebar;

use crate::ats::{self, AtsLabels};
use crate::schema::{self, Field};
use crate::tree::ContentNode;
use crate::types::{Identity, Resume};
use tracing::debug;

pub fn extract_identity<N: ContentNode>(root: &N) -> Identity {
    Identity::new(
        &schema::text(root, Field::Name),
        &schema::text(root, Field::Title),
    )
}

pub fn extract_resume<N: ContentNode>(root: &N) -> Resume {
    let resume = Resume {
        identity: extract_identity(root),
        contact: contact::extract(root),
        profile: schema::text(root, Field::Profile),
        experience: experience::extract_experience(root),
        projects: experience::extract_standalone_projects(root),
        certifications: sidebar::extract_certifications(root),
        skills: sidebar::extract_skills(root),
        education: sidebar::extract_education(root),
        languages: sidebar::extract_languages(root),
    };

    debug!(
        "Extracted {} contact entries, {} experience entries, {} standalone projects, {} certifications",
        resume.contact.entries.len(),
        resume.experience.len(),
        resume.projects.len(),
        resume.certifications.len()
    );

    resume
}

/// The full ATS transcript of the page, with the default headings.
pub fn extract_document<N: ContentNode>(root: &N) -> String {
    extract_document_with(root, &AtsLabels::default())
}

pub fn extract_document_with<N: ContentNode>(root: &N, labels: &AtsLabels) -> String {
    ats::render(&extract_resume(root), labels)
}
