//! Template Projector — the single content-selection pass shared by every template.
//!
//! `project` decides which sections exist, in which order, and the exact text of every
//! entry (including fallback labels). Templates and the export serializer only decide
//! how that content looks; they never re-derive it.

use serde::Serialize;

use crate::layout::FontFamily;
use crate::models::resume::{
    present, CertificationItem, ColorScheme, EducationItem, ExperienceItem, ProjectItem,
    ResumeRecord, SkillCategory, TemplateId,
};
use crate::models::validation::validate_record;
use crate::render::RenderError;

pub const PRESENT: &str = "Present";
pub const COMPLETED: &str = "Completed";
pub const IN_PROGRESS: &str = "In Progress";
pub const ACTIVE: &str = "Active";

const META_SEPARATOR: &str = " | ";

// ────────────────────────────────────────────────────────────────────────────
// Projection types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Projection {
    pub template: TemplateId,
    pub color_scheme: ColorScheme,
    pub font: FontFamily,
    pub header: Header,
    /// Included sections only, in canonical order.
    pub sections: Vec<Section>,
}

impl Projection {
    pub fn section(&self, kind: SectionKind) -> Option<&Section> {
        self.sections.iter().find(|s| s.kind == kind)
    }

    pub fn kinds(&self) -> Vec<SectionKind> {
        self.sections.iter().map(|s| s.kind).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Header {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub location: Option<String>,
    pub website: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    Summary,
    Experience,
    Education,
    Skills,
    Projects,
    Certifications,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Section {
    pub kind: SectionKind,
    pub body: SectionBody,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionBody {
    Text(String),
    Entries(Vec<Entry>),
    Skills(Vec<SkillLine>),
}

/// One experience / education / project / certification item, fully formatted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Entry {
    pub title: String,
    /// Date range or single date, with fallback labels applied.
    pub dates: String,
    /// The details line exactly as displayed (organisation, dates, location).
    pub meta: String,
    pub description: Option<String>,
    pub detail: Option<Detail>,
}

/// A labelled secondary line such as `GPA: 3.9` or `Technologies: Rust, Go`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Detail {
    pub label: &'static str,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkillLine {
    pub category: SkillCategory,
    /// Comma-separated, in insertion order.
    pub items: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Projection
// ────────────────────────────────────────────────────────────────────────────

/// Projects a record into its ordered section sequence.
///
/// Fails only when the record breaks a required-field invariant; such records must
/// be rejected upstream and are never rendered partially.
pub fn project(record: &ResumeRecord) -> Result<Projection, RenderError> {
    validate_record(record).map_err(RenderError::MalformedInput)?;

    let info = &record.personal_info;
    let header = Header {
        full_name: info.full_name(),
        email: info.email.trim().to_string(),
        phone: info.phone.trim().to_string(),
        location: present(&info.location).map(str::to_string),
        website: present(&info.website).map(str::to_string),
    };

    let mut sections = Vec::new();

    if let Some(summary) = present(&info.summary) {
        sections.push(Section {
            kind: SectionKind::Summary,
            body: SectionBody::Text(summary.to_string()),
        });
    }

    if !record.experience.is_empty() {
        sections.push(Section {
            kind: SectionKind::Experience,
            body: SectionBody::Entries(record.experience.iter().map(experience_entry).collect()),
        });
    }

    if !record.education.is_empty() {
        sections.push(Section {
            kind: SectionKind::Education,
            body: SectionBody::Entries(record.education.iter().map(education_entry).collect()),
        });
    }

    let skill_lines: Vec<SkillLine> = SkillCategory::ALL
        .iter()
        .filter_map(|c| {
            let items: Vec<&str> = record.skills.list(*c).iter().filter_map(|s| present(s)).collect();
            (!items.is_empty()).then(|| SkillLine {
                category: *c,
                items: items.join(", "),
            })
        })
        .collect();
    if !skill_lines.is_empty() {
        sections.push(Section {
            kind: SectionKind::Skills,
            body: SectionBody::Skills(skill_lines),
        });
    }

    if !record.projects.is_empty() {
        sections.push(Section {
            kind: SectionKind::Projects,
            body: SectionBody::Entries(record.projects.iter().map(project_entry).collect()),
        });
    }

    if !record.certifications.is_empty() {
        sections.push(Section {
            kind: SectionKind::Certifications,
            body: SectionBody::Entries(
                record.certifications.iter().map(certification_entry).collect(),
            ),
        });
    }

    Ok(Projection {
        template: record.template,
        color_scheme: record.color_scheme,
        font: FontFamily::resolve(&record.font_style),
        header,
        sections,
    })
}

/// `start - end`, where `end` is `Present` for ongoing items and `open_label` when
/// no end date is stored. A missing start collapses the range to its end label.
pub fn date_range(start: &str, end: &str, current: bool, open_label: &str) -> String {
    let end = if current {
        PRESENT
    } else {
        present(end).unwrap_or(open_label)
    };
    match present(start) {
        Some(start) => format!("{start} - {end}"),
        None => end.to_string(),
    }
}

fn join_meta<'a>(parts: impl IntoIterator<Item = Option<&'a str>>) -> String {
    parts
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(META_SEPARATOR)
}

fn experience_entry(item: &ExperienceItem) -> Entry {
    let dates = date_range(&item.start_date, &item.end_date, item.current, PRESENT);
    Entry {
        title: item.job_title.trim().to_string(),
        meta: join_meta([
            present(&item.company),
            Some(dates.as_str()),
            present(&item.location),
        ]),
        dates,
        description: present(&item.description).map(str::to_string),
        detail: None,
    }
}

fn education_entry(item: &EducationItem) -> Entry {
    let dates = present(&item.graduation_date)
        .unwrap_or(IN_PROGRESS)
        .to_string();
    let school = match present(&item.field) {
        Some(field) => format!("{} - {field}", item.institution.trim()),
        None => item.institution.trim().to_string(),
    };
    Entry {
        title: item.degree.trim().to_string(),
        meta: join_meta([Some(school.as_str()), Some(dates.as_str()), present(&item.location)]),
        dates,
        description: None,
        detail: present(&item.gpa).map(|gpa| Detail {
            label: "GPA",
            value: gpa.to_string(),
        }),
    }
}

fn project_entry(item: &ProjectItem) -> Entry {
    let dates = date_range(&item.start_date, &item.end_date, item.current, COMPLETED);
    let technologies: Vec<&str> = item.technologies.iter().filter_map(|t| present(t)).collect();
    Entry {
        title: item.name.trim().to_string(),
        meta: dates.clone(),
        dates,
        description: present(&item.description).map(str::to_string),
        detail: (!technologies.is_empty()).then(|| Detail {
            label: "Technologies",
            value: technologies.join(", "),
        }),
    }
}

fn certification_entry(item: &CertificationItem) -> Entry {
    let dates = present(&item.issue_date).unwrap_or(ACTIVE).to_string();
    Entry {
        title: item.name.trim().to_string(),
        meta: join_meta([present(&item.issuer), Some(dates.as_str())]),
        dates,
        description: None,
        detail: present(&item.credential_id).map(|id| Detail {
            label: "ID",
            value: id.to_string(),
        }),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
