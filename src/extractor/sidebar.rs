// src/extractor/sidebar.rs
//! Certifications, skills, education and languages

use crate::schema::{self, Field, TextMode};
use crate::tree::ContentNode;
use crate::types::{
    CertificationEntry, EducationBlock, EducationRecord, LanguagesBlock, SkillCategory,
    SkillsBlock,
};
use crate::utils::clean_text;

const COMPACT_SKILL_LABEL: &str = "skill-label";

pub fn extract_certifications<N: ContentNode>(root: &N) -> Vec<CertificationEntry> {
    schema::entries(
        root,
        Field::CertificationItems,
        |item| CertificationEntry {
            institution: schema::text(item, Field::CertificationInstitution),
            title: schema::text(item, Field::CertificationTitle),
            date: schema::text(item, Field::CertificationDate),
        },
        |cert: &CertificationEntry| !(cert.institution.is_empty() && cert.title.is_empty() && cert.date.is_empty()),
    )
}

pub fn extract_skills<N: ContentNode>(root: &N) -> SkillsBlock {
    let mut hard: Vec<SkillCategory> = schema::nodes(root, Field::CompactSkillCategories)
        .iter()
        .map(compact_category)
        .filter(|category| !category.items.is_empty())
        .collect();

    if hard.is_empty() {
        hard = schema::nodes(root, Field::SkillCategories)
            .iter()
            .map(structured_category)
            .filter(|category| !(category.label.is_empty() && category.items.is_empty()))
            .collect();
    }

    let soft = schema::text(root, Field::SoftSkills);

    let flat = if hard.is_empty() && soft.is_empty() {
        schema::texts(root, Field::FlatSkills)
    } else {
        Vec::new()
    };

    SkillsBlock { hard, soft, flat }
}

/// `<label> items` as one run of text
fn compact_category<N: ContentNode>(node: &N) -> SkillCategory {
    SkillCategory {
        label: schema::text(node, Field::CompactSkillLabel),
        items: clean_text(&node.text_excluding(COMPACT_SKILL_LABEL)),
    }
}

/// Name plus an items element, either plain text or a list
fn structured_category<N: ContentNode>(node: &N) -> SkillCategory {
    let items = match schema::nodes(node, Field::CategoryItems).first() {
        Some(items_node) => {
            let listed: Vec<String> = items_node
                .find_all("li")
                .iter()
                .map(|li| li.text_content().trim().to_string())
                .filter(|item| !item.is_empty())
                .collect();
            if listed.is_empty() {
                TextMode::Clean.apply(&items_node.text_content())
            } else {
                listed.join(", ")
            }
        }
        None => String::new(),
    };

    SkillCategory {
        label: schema::text(node, Field::CategoryName),
        items,
    }
}

pub fn extract_education<N: ContentNode>(root: &N) -> EducationBlock {
    let consolidated = schema::text(root, Field::ConsolidatedEducation);
    if !consolidated.is_empty() {
        return EducationBlock::Consolidated(consolidated);
    }

    EducationBlock::Records(schema::entries(
        root,
        Field::EducationItems,
        |item| EducationRecord {
            date: schema::text(item, Field::EducationDate),
            title: schema::text(item, Field::EducationTitle),
            description: schema::text(item, Field::EducationDescription),
            note: schema::text(item, Field::EducationNote),
        },
        |record: &EducationRecord| {
            !(record.date.is_empty()
                && record.title.is_empty()
                && record.description.is_empty()
                && record.note.is_empty())
        },
    ))
}

pub fn extract_languages<N: ContentNode>(root: &N) -> LanguagesBlock {
    let consolidated = schema::text(root, Field::ConsolidatedLanguages);
    if !consolidated.is_empty() {
        return LanguagesBlock::Consolidated(consolidated);
    }
    LanguagesBlock::List(schema::texts(root, Field::LanguageItems))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::HtmlTree;

    #[test]
    fn test_certifications_prefer_compact_items() {
        let tree = HtmlTree::parse(
            r#"<div class="certification-item-compact">
                 <span class="certification-institution">AWS</span>
                 <span class="certification-title">Solutions
                    Architect</span>
                 <span class="certification-date">2023</span>
               </div>
               <div class="certification-item">
                 <span class="certification-title">Legacy cert</span>
               </div>"#,
        );
        let certs = extract_certifications(&tree.root());
        assert_eq!(
            certs,
            vec![CertificationEntry {
                institution: "AWS".to_string(),
                title: "Solutions Architect".to_string(),
                date: "2023".to_string(),
            }]
        );
    }

    #[test]
    fn test_blank_compact_certifications_fall_back_to_legacy() {
        let tree = HtmlTree::parse(
            r#"<div class="certification-item-compact">
                 <span class="certification-title">  </span>
               </div>
               <div class="certification-item">
                 <span class="certification-institution">AWS</span>
                 <span class="certification-title">Architect</span>
               </div>"#,
        );
        assert_eq!(
            extract_certifications(&tree.root()),
            vec![CertificationEntry {
                institution: "AWS".to_string(),
                title: "Architect".to_string(),
                date: String::new(),
            }]
        );
    }

    #[test]
    fn test_compact_skills() {
        let tree = HtmlTree::parse(
            r#"<div class="skills">
                 <div class="skill-category-compact"><strong class="skill-label">Lenguajes:</strong> Rust, Go</div>
                 <div class="skill-category-compact"><strong class="skill-label">Cloud:</strong> AWS</div>
                 <div class="skill-category"><span class="category-name">Old</span></div>
                 <p class="soft-skills-text">Comunicación</p>
               </div>"#,
        );
        let skills = extract_skills(&tree.root());
        assert_eq!(skills.hard.len(), 2);
        assert_eq!(skills.hard[0].label, "Lenguajes:");
        assert_eq!(skills.hard[0].items, "Rust, Go");
        assert_eq!(skills.soft, "Comunicación");
        assert!(skills.flat.is_empty());
    }

    #[test]
    fn test_structured_skills_with_list_items() {
        let tree = HtmlTree::parse(
            r#"<div class="skill-category">
                 <span class="category-name">Bases de datos:</span>
                 <ul class="category-items"><li>PostgreSQL</li><li>Redis</li></ul>
               </div>
               <div class="skill-category">
                 <span class="category-name">Herramientas:</span>
                 <span class="category-items">Docker,
                   Kubernetes</span>
               </div>"#,
        );
        let skills = extract_skills(&tree.root());
        assert_eq!(
            skills.hard,
            vec![
                SkillCategory {
                    label: "Bases de datos:".to_string(),
                    items: "PostgreSQL, Redis".to_string(),
                },
                SkillCategory {
                    label: "Herramientas:".to_string(),
                    items: "Docker, Kubernetes".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_flat_skills_fallback() {
        let tree = HtmlTree::parse(r#"<ul class="skills"><li>Rust</li><li> SQL </li></ul>"#);
        let skills = extract_skills(&tree.root());
        assert!(skills.hard.is_empty());
        assert_eq!(skills.flat, vec!["Rust", "SQL"]);
    }

    #[test]
    fn test_education_consolidated_and_records() {
        let tree = HtmlTree::parse(
            r#"<div class="education-compact">Grado en Informática,
                  UPM (2015 - 2019)</div>
               <div class="education-item"><span class="date">2019</span><h4>Ignored</h4></div>"#,
        );
        assert_eq!(
            extract_education(&tree.root()),
            EducationBlock::Consolidated("Grado en Informática, UPM (2015 - 2019)".to_string())
        );

        let tree = HtmlTree::parse(
            r#"<div class="education-item">
                 <span class="date">2015 - 2019</span><h4>Grado en Informática</h4>
                 <p>Universidad Politécnica</p><span class="education-note">Matrícula de honor</span>
               </div>
               <div class="education-item"><span class="date">2020</span><h4>Máster</h4></div>"#,
        );
        match extract_education(&tree.root()) {
            EducationBlock::Records(records) => {
                assert_eq!(records.len(), 2);
                assert_eq!(records[0].note, "Matrícula de honor");
                assert_eq!(records[1].description, "");
            }
            other => panic!("expected records, got {:?}", other),
        }
    }

    #[test]
    fn test_education_note_paragraph_is_not_the_description() {
        let tree = HtmlTree::parse(
            r#"<div class="education-item">
                 <span class="date">2019</span><h4>Grado</h4><p class="note">Con honores</p>
               </div>"#,
        );
        match extract_education(&tree.root()) {
            EducationBlock::Records(records) => {
                assert_eq!(records[0].description, "");
                assert_eq!(records[0].note, "Con honores");
            }
            other => panic!("expected records, got {:?}", other),
        }
    }

    #[test]
    fn test_languages_prefer_consolidated() {
        let tree = HtmlTree::parse(
            r#"<section class="languages">
                 <p class="languages-text">Español (nativo), Inglés (C1)</p>
                 <ul><li>Español</li><li>Inglés</li></ul>
               </section>"#,
        );
        assert_eq!(
            extract_languages(&tree.root()),
            LanguagesBlock::Consolidated("Español (nativo), Inglés (C1)".to_string())
        );

        let tree = HtmlTree::parse(
            r#"<section class="languages"><ul><li>Español</li><li>Inglés</li></ul></section>"#,
        );
        assert_eq!(
            extract_languages(&tree.root()),
            LanguagesBlock::List(vec!["Español".to_string(), "Inglés".to_string()])
        );
    }
}
