// src/ats.rs
//! Plain-text ATS transcript of a [`Resume`]

use crate::types::{
    ContactBlock, ContactEntry, ContactShape, EducationBlock, ExperienceEntry, LanguagesBlock,
    ProjectEntry, Resume, SkillsBlock,
};
use crate::utils::join_present;
use serde::{Deserialize, Serialize};

const BULLET: &str = "• ";
const NESTED_INDENT: &str = "  ";

/// Section headings and fixed labels of the transcript
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AtsLabels {
    pub contact: String,
    pub profile: String,
    pub experience: String,
    pub projects: String,
    pub certifications: String,
    pub skills: String,
    pub education: String,
    pub languages: String,
    /// Introduces the projects nested under an experience entry
    pub featured_projects: String,
}

impl Default for AtsLabels {
    fn default() -> Self {
        Self {
            contact: "CONTACTO".to_string(),
            profile: "PERFIL".to_string(),
            experience: "EXPERIENCIA LABORAL".to_string(),
            projects: "PROYECTOS".to_string(),
            certifications: "CERTIFICACIONES".to_string(),
            skills: "HABILIDADES".to_string(),
            education: "EDUCACIÓN".to_string(),
            languages: "IDIOMAS".to_string(),
            featured_projects: "Proyectos destacados:".to_string(),
        }
    }
}

pub fn render(resume: &Resume, labels: &AtsLabels) -> String {
    let mut out = String::new();

    push_section(&mut out, &labels.contact, &render_contact(&resume.contact));

    let identity = join_present(
        &[
            resume.identity.name.as_deref().unwrap_or_default(),
            resume.identity.title.as_deref().unwrap_or_default(),
        ],
        "\n",
    );
    if !identity.is_empty() {
        out.push_str(&identity);
        out.push_str("\n\n");
    }

    push_section(&mut out, &labels.profile, &resume.profile);

    let experience = resume
        .experience
        .iter()
        .map(|entry| render_experience(entry, labels))
        .collect::<Vec<_>>()
        .join("\n\n");
    push_section(&mut out, &labels.experience, &experience);

    if !resume.projects.is_empty() {
        let projects = resume
            .projects
            .iter()
            .map(|project| render_project(project, "").join("\n"))
            .collect::<Vec<_>>()
            .join("\n\n");
        push_section(&mut out, &labels.projects, &projects);
    }

    if !resume.certifications.is_empty() {
        let certifications = resume
            .certifications
            .iter()
            .map(|cert| join_present(&[&cert.institution, &cert.title, &cert.date], "\n"))
            .collect::<Vec<_>>()
            .join("\n\n");
        push_section(&mut out, &labels.certifications, &certifications);
    }

    push_section(&mut out, &labels.skills, &render_skills(&resume.skills));
    push_section(&mut out, &labels.education, &render_education(&resume.education));
    push_section(&mut out, &labels.languages, &render_languages(&resume.languages));

    let mut document = out.trim_end_matches('\n').to_string();
    document.push('\n');
    document
}

fn push_section(out: &mut String, heading: &str, body: &str) {
    out.push_str(heading);
    out.push('\n');
    if !body.is_empty() {
        out.push_str(body);
        out.push('\n');
    }
    out.push('\n');
}

fn render_contact(contact: &ContactBlock) -> String {
    match contact.shape {
        ContactShape::Inline => contact
            .entries
            .iter()
            .map(|entry| entry.text.as_str())
            .collect::<Vec<_>>()
            .join(" | "),
        ContactShape::Legacy => contact
            .entries
            .iter()
            .map(legacy_contact_line)
            .collect::<Vec<_>>()
            .join("\n"),
    }
}

fn legacy_contact_line(entry: &ContactEntry) -> String {
    let mut line = join_present(&[&entry.icon, &entry.text], " ");
    if let Some(uri) = &entry.uri {
        line.push_str(" - ");
        line.push_str(uri);
    }
    line
}

fn render_experience(entry: &ExperienceEntry, labels: &AtsLabels) -> String {
    let mut lines: Vec<String> = Vec::new();

    let heading = join_present(&[&entry.role, &entry.organization], " - ");
    for line in [heading, entry.dates.clone(), entry.description.clone()] {
        if !line.is_empty() {
            lines.push(line);
        }
    }
    lines.extend(entry.achievements.iter().map(|a| format!("  {}{}", BULLET, a)));

    if !entry.projects.is_empty() {
        if !lines.is_empty() {
            lines.push(String::new());
        }
        lines.push(labels.featured_projects.clone());
        for project in &entry.projects {
            lines.extend(render_project(project, NESTED_INDENT));
        }
    }

    lines.join("\n")
}

fn render_project(project: &ProjectEntry, indent: &str) -> Vec<String> {
    let heading = match (project.title.is_empty(), project.date.is_empty()) {
        (_, true) => project.title.clone(),
        (true, false) => project.date.clone(),
        (false, false) => format!("{} ({})", project.title, project.date),
    };

    let mut lines = Vec::new();
    for line in [heading, project.description.clone()] {
        if !line.is_empty() {
            lines.push(format!("{}{}", indent, line));
        }
    }
    lines.extend(
        project
            .bullets
            .iter()
            .map(|b| format!("{}  {}{}", indent, BULLET, b)),
    );
    lines
}

fn render_skills(skills: &SkillsBlock) -> String {
    let hard = skills
        .hard
        .iter()
        .map(|category| join_present(&[&category.label, &category.items], " "))
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("; ");

    let mut line = String::new();
    if !hard.is_empty() {
        line.push_str("Hard Skills: ");
        line.push_str(&hard);
    }
    if !skills.soft.is_empty() {
        if !hard.is_empty() {
            line.push_str(" | ");
        }
        line.push_str("Soft Skills: ");
        line.push_str(&skills.soft);
    }

    if line.is_empty() {
        skills.flat.join(", ")
    } else {
        line
    }
}

fn render_education(education: &EducationBlock) -> String {
    match education {
        EducationBlock::Consolidated(text) => text.clone(),
        EducationBlock::Records(records) => records
            .iter()
            .map(|r| join_present(&[&r.date, &r.title, &r.description, &r.note], " - "))
            .collect::<Vec<_>>()
            .join("\n"),
    }
}

fn render_languages(languages: &LanguagesBlock) -> String {
    match languages {
        LanguagesBlock::Consolidated(text) => text.clone(),
        LanguagesBlock::List(items) => items.join(", "),
    }
}
