// src/extractor/experience.rs
use crate::schema::{self, Field};
use crate::tree::ContentNode;
use crate::types::{ExperienceEntry, ProjectEntry};

/// Class of a project item, nested or standalone
const PROJECT_ITEM: &str = "project-item";
const EXPERIENCE_ITEM: &str = "experience-item";
/// Container marking projects that belong to an experience entry
const PROJECTS_WITHIN_EXPERIENCE: &str = "projects-within-experience";
/// Experience items and project containers, matched in document order
const ANCHORS: &str = ".experience-item, .projects-within-experience";

pub fn extract_experience<N: ContentNode>(root: &N) -> Vec<ExperienceEntry> {
    let mut entries: Vec<ExperienceEntry> = schema::nodes(root, Field::ExperienceItems)
        .iter()
        .map(experience_entry)
        .collect();

    for (owner, container) in detached_containers(root) {
        if let Some(entry) = owner.and_then(|index| entries.get_mut(index)) {
            entry.projects.extend(container_projects(&container));
        }
    }

    entries
        .into_iter()
        .filter(|entry| !is_blank_experience(entry))
        .collect()
}

/// Projects not listed under an experience entry
pub fn extract_standalone_projects<N: ContentNode>(root: &N) -> Vec<ProjectEntry> {
    let mut projects: Vec<ProjectEntry> = detached_containers(root)
        .iter()
        .filter(|(owner, _)| owner.is_none())
        .flat_map(|(_, container)| container_projects(container))
        .collect();

    projects.extend(
        schema::nodes(root, Field::ProjectItems)
            .iter()
            .filter(|item| {
                !item.enclosed_by(EXPERIENCE_ITEM, root)
                    && !item.enclosed_by(PROJECTS_WITHIN_EXPERIENCE, root)
            })
            .map(project_entry)
            .filter(|project| !is_blank_project(project)),
    );
    projects
}

/// `.projects-within-experience` containers placed outside any experience
/// item, each paired with the index of the experience item preceding it in
/// document order.
fn detached_containers<N: ContentNode>(root: &N) -> Vec<(Option<usize>, N)> {
    let mut owner = None;
    let mut seen = 0;
    let mut detached = Vec::new();

    for node in root.find_all(ANCHORS) {
        if node.has_class(EXPERIENCE_ITEM) {
            owner = Some(seen);
            seen += 1;
        } else if !node.enclosed_by(EXPERIENCE_ITEM, root) {
            detached.push((owner, node));
        }
    }
    detached
}

fn container_projects<N: ContentNode>(container: &N) -> Vec<ProjectEntry> {
    schema::nodes(container, Field::ProjectItems)
        .iter()
        .map(project_entry)
        .filter(|project| !is_blank_project(project))
        .collect()
}

fn experience_entry<N: ContentNode>(item: &N) -> ExperienceEntry {
    let projects = schema::nodes(item, Field::ProjectItems)
        .iter()
        .map(project_entry)
        .filter(|project| !is_blank_project(project))
        .collect();

    ExperienceEntry {
        role: schema::own_text(item, Field::Role, PROJECT_ITEM),
        organization: schema::own_text(item, Field::Organization, PROJECT_ITEM),
        dates: schema::own_text(item, Field::DateRange, PROJECT_ITEM),
        description: schema::own_text(item, Field::ExperienceDescription, PROJECT_ITEM),
        achievements: schema::own_texts(item, Field::Achievements, PROJECT_ITEM),
        projects,
    }
}

fn project_entry<N: ContentNode>(item: &N) -> ProjectEntry {
    ProjectEntry {
        title: schema::text(item, Field::ProjectTitle),
        date: schema::text(item, Field::ProjectDate),
        description: schema::text(item, Field::ProjectDescription),
        bullets: schema::texts(item, Field::ProjectBullets),
    }
}

fn is_blank_project(project: &ProjectEntry) -> bool {
    project.title.is_empty()
        && project.date.is_empty()
        && project.description.is_empty()
        && project.bullets.is_empty()
}

fn is_blank_experience(entry: &ExperienceEntry) -> bool {
    entry.role.is_empty()
        && entry.organization.is_empty()
        && entry.dates.is_empty()
        && entry.description.is_empty()
        && entry.achievements.is_empty()
        && entry.projects.is_empty()
}
