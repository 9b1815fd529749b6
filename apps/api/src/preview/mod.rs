//! Preview — the formatted, read-only view of a resume document.
//!
//! The view is derived on every read; it holds display strings only, so the
//! client can lay it out without re-implementing any formatting rule.

pub mod format;
pub mod handlers;

use std::fmt::Write as _;

use serde::Serialize;

use crate::models::resume::ResumeDocument;
use crate::preview::format::{degree_heading, format_range};

pub const NAME_PLACEHOLDER: &str = "Your Name";
pub const EMPTY_TITLE: &str = "Your resume preview will appear here";
pub const EMPTY_HINT: &str = "Start by filling out your personal information";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResumeView {
    pub header: HeaderView,
    pub sections: Vec<SectionView>,
    /// Present only when the document is blank.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<Placeholder>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeaderView {
    pub name: String,
    pub contact: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Placeholder {
    pub title: String,
    pub hint: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SectionView {
    Summary { title: String, text: String },
    Experience { title: String, items: Vec<ExperienceView> },
    Education { title: String, items: Vec<EducationView> },
    Skills { title: String, items: Vec<String> },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExperienceView {
    pub id: String,
    pub position: String,
    pub company: String,
    pub dates: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EducationView {
    pub id: String,
    pub heading: String,
    pub school: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub graduation_year: String,
}

/// Builds the preview for a document.
///
/// Sections appear in a fixed order (summary, experience, education, skills)
/// and only when they have content. A blank document gets the placeholder and
/// no sections at all.
pub fn build_view(doc: &ResumeDocument) -> ResumeView {
    let info = &doc.personal_info;
    let name = if info.name.is_empty() {
        NAME_PLACEHOLDER.to_string()
    } else {
        info.name.clone()
    };
    let contact = [&info.email, &info.phone, &info.address]
        .into_iter()
        .filter(|s| !s.is_empty())
        .cloned()
        .collect();
    let header = HeaderView { name, contact };

    if doc.is_blank() {
        return ResumeView {
            header,
            sections: Vec::new(),
            placeholder: Some(Placeholder {
                title: EMPTY_TITLE.to_string(),
                hint: EMPTY_HINT.to_string(),
            }),
        };
    }

    let mut sections = Vec::new();

    if !info.summary.is_empty() {
        sections.push(SectionView::Summary {
            title: "Professional Summary".to_string(),
            text: info.summary.clone(),
        });
    }

    if !doc.experience.is_empty() {
        sections.push(SectionView::Experience {
            title: "Work Experience".to_string(),
            items: doc
                .experience
                .iter()
                .map(|e| ExperienceView {
                    id: e.id.clone(),
                    position: e.position.clone(),
                    company: e.company.clone(),
                    dates: format_range(&e.start_date, &e.end_date),
                    description: e.description.clone(),
                })
                .collect(),
        });
    }

    if !doc.education.is_empty() {
        sections.push(SectionView::Education {
            title: "Education".to_string(),
            items: doc
                .education
                .iter()
                .map(|e| EducationView {
                    id: e.id.clone(),
                    heading: degree_heading(&e.degree, &e.field),
                    school: e.school.clone(),
                    graduation_year: e.graduation_year.clone(),
                })
                .collect(),
        });
    }

    if !doc.skills.is_empty() {
        sections.push(SectionView::Skills {
            title: "Skills".to_string(),
            items: doc.skills.clone(),
        });
    }

    ResumeView {
        header,
        sections,
        placeholder: None,
    }
}

/// Plain-text rendering of a view.
pub fn render_text(view: &ResumeView) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", view.header.name);
    for line in &view.header.contact {
        let _ = writeln!(out, "{line}");
    }

    if let Some(placeholder) = &view.placeholder {
        let _ = writeln!(out, "\n{}\n{}", placeholder.title, placeholder.hint);
        return out;
    }

    for section in &view.sections {
        match section {
            SectionView::Summary { title, text } => {
                heading(&mut out, title);
                let _ = writeln!(out, "{text}");
            }
            SectionView::Experience { title, items } => {
                heading(&mut out, title);
                for item in items {
                    let _ = writeln!(out, "{} | {}", item.position, item.dates);
                    let _ = writeln!(out, "{}", item.company);
                    if !item.description.is_empty() {
                        let _ = writeln!(out, "{}", item.description);
                    }
                }
            }
            SectionView::Education { title, items } => {
                heading(&mut out, title);
                for item in items {
                    if item.graduation_year.is_empty() {
                        let _ = writeln!(out, "{}", item.heading);
                    } else {
                        let _ = writeln!(out, "{} | {}", item.heading, item.graduation_year);
                    }
                    let _ = writeln!(out, "{}", item.school);
                }
            }
            SectionView::Skills { title, items } => {
                heading(&mut out, title);
                let _ = writeln!(out, "{}", items.join(", "));
            }
        }
    }
    out
}

fn heading(out: &mut String, title: &str) {
    let _ = writeln!(out, "\n{title}\n{}", "-".repeat(title.chars().count()));
}
