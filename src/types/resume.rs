// src/types/resume.rs
//! Entities reconstructed from the résumé page on every export

use serde::Serialize;

// ===== Aggregate =====

#[derive(Debug, Clone, Default, Serialize)]
pub struct Resume {
    pub identity: Identity,
    pub contact: ContactBlock,
    pub profile: String,
    pub experience: Vec<ExperienceEntry>,
    /// Projects that are not nested under an experience entry
    pub projects: Vec<ProjectEntry>,
    pub certifications: Vec<CertificationEntry>,
    pub skills: SkillsBlock,
    pub education: EducationBlock,
    pub languages: LanguagesBlock,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Identity {
    pub name: Option<String>,
    pub title: Option<String>,
}

impl Identity {
    pub fn new(name: &str, title: &str) -> Self {
        let present = |s: &str| Some(s.to_string()).filter(|s| !s.trim().is_empty());
        Self {
            name: present(name),
            title: present(title),
        }
    }
}

// ===== Contact =====

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactShape {
    /// One line, items separated by ` | `
    #[default]
    Inline,
    /// One item per line
    Legacy,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ContactBlock {
    pub shape: ContactShape,
    pub entries: Vec<ContactEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ContactEntry {
    pub icon: String,
    pub text: String,
    pub uri: Option<String>,
}

// ===== Experience & projects =====

#[derive(Debug, Clone, Default, Serialize)]
pub struct ExperienceEntry {
    pub role: String,
    pub organization: String,
    pub dates: String,
    pub description: String,
    pub achievements: Vec<String>,
    pub projects: Vec<ProjectEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProjectEntry {
    pub title: String,
    pub date: String,
    pub description: String,
    pub bullets: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CertificationEntry {
    pub institution: String,
    pub title: String,
    pub date: String,
}

// ===== Sidebar blocks =====

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EducationBlock {
    Consolidated(String),
    Records(Vec<EducationRecord>),
}

impl Default for EducationBlock {
    fn default() -> Self {
        Self::Records(Vec::new())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EducationRecord {
    pub date: String,
    pub title: String,
    pub description: String,
    pub note: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SkillsBlock {
    pub hard: Vec<SkillCategory>,
    pub soft: String,
    /// Plain skill list, only filled when the page has no structured skills
    pub flat: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SkillCategory {
    pub label: String,
    pub items: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LanguagesBlock {
    Consolidated(String),
    List(Vec<String>),
}

impl Default for LanguagesBlock {
    fn default() -> Self {
        Self::List(Vec::new())
    }
}
