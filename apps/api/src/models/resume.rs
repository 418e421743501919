//! Résumé data model — the normalized record consumed by the rendering engine.
//!
//! Serde layout mirrors the persisted JSON document (`personalInfo`, `experience[]`,
//! `skills{technical,soft,languages}`, `template`, `colorScheme`, `fontStyle`, …).
//! Optional text fields are plain strings; an empty or whitespace-only value means
//! "not provided".

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ────────────────────────────────────────────────────────────────────────────
// Entities
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersonalInfo {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub location: String,
    pub website: String,
    pub summary: String,
}

impl PersonalInfo {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExperienceItem {
    pub id: String,
    pub job_title: String,
    pub company: String,
    pub location: String,
    pub start_date: String,
    /// Ignored whenever `current` is true.
    pub end_date: String,
    pub current: bool,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EducationItem {
    pub id: String,
    pub institution: String,
    pub degree: String,
    pub field: String,
    pub location: String,
    pub graduation_date: String,
    pub gpa: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkillsBlock {
    pub technical: Vec<String>,
    pub soft: Vec<String>,
    pub languages: Vec<String>,
}

impl SkillsBlock {
    pub fn list(&self, category: SkillCategory) -> &[String] {
        match category {
            SkillCategory::Technical => &self.technical,
            SkillCategory::Soft => &self.soft,
            SkillCategory::Languages => &self.languages,
        }
    }

    fn list_mut(&mut self, category: SkillCategory) -> &mut Vec<String> {
        match category {
            SkillCategory::Technical => &mut self.technical,
            SkillCategory::Soft => &mut self.soft,
            SkillCategory::Languages => &mut self.languages,
        }
    }
}

/// The three parallel skill lists, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillCategory {
    Technical,
    Soft,
    Languages,
}

impl SkillCategory {
    pub const ALL: [SkillCategory; 3] = [
        SkillCategory::Technical,
        SkillCategory::Soft,
        SkillCategory::Languages,
    ];
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectItem {
    pub id: String,
    pub name: String,
    pub description: String,
    pub technologies: Vec<String>,
    pub start_date: String,
    pub end_date: String,
    pub current: bool,
    pub url: String,
    pub github_url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CertificationItem {
    pub id: String,
    pub name: String,
    pub issuer: String,
    pub issue_date: String,
    pub expiry_date: String,
    pub credential_id: String,
    pub credential_url: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Presentation selectors
// ────────────────────────────────────────────────────────────────────────────

/// The four fixed layout variants. Unknown names resolve to `Classic`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TemplateId {
    #[default]
    Classic,
    Modern,
    Minimalist,
    Executive,
}

impl TemplateId {
    pub const ALL: [TemplateId; 4] = [
        TemplateId::Classic,
        TemplateId::Modern,
        TemplateId::Minimalist,
        TemplateId::Executive,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TemplateId::Classic => "classic",
            TemplateId::Modern => "modern",
            TemplateId::Minimalist => "minimalist",
            TemplateId::Executive => "executive",
        }
    }

    pub fn parse(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "modern" => TemplateId::Modern,
            "minimalist" => TemplateId::Minimalist,
            "executive" => TemplateId::Executive,
            _ => TemplateId::Classic,
        }
    }
}

impl From<String> for TemplateId {
    fn from(value: String) -> Self {
        TemplateId::parse(&value)
    }
}

impl From<TemplateId> for String {
    fn from(value: TemplateId) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for TemplateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Accent colour selector. Unknown or unset names resolve to `Primary`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ColorScheme {
    #[default]
    Primary,
    Accent,
    Red,
    Purple,
}

impl ColorScheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColorScheme::Primary => "primary",
            ColorScheme::Accent => "accent",
            ColorScheme::Red => "red",
            ColorScheme::Purple => "purple",
        }
    }

    pub fn parse(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "accent" => ColorScheme::Accent,
            "red" => ColorScheme::Red,
            "purple" => ColorScheme::Purple,
            _ => ColorScheme::Primary,
        }
    }
}

impl From<String> for ColorScheme {
    fn from(value: String) -> Self {
        ColorScheme::parse(&value)
    }
}

impl From<ColorScheme> for String {
    fn from(value: ColorScheme) -> Self {
        value.as_str().to_string()
    }
}

pub const DEFAULT_FONT_STYLE: &str = "Inter";

fn default_font_style() -> String {
    DEFAULT_FONT_STYLE.to_string()
}

// ────────────────────────────────────────────────────────────────────────────
// Aggregate
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeRecord {
    #[serde(default)]
    pub personal_info: PersonalInfo,
    #[serde(default)]
    pub experience: Vec<ExperienceItem>,
    #[serde(default)]
    pub education: Vec<EducationItem>,
    #[serde(default)]
    pub skills: SkillsBlock,
    #[serde(default)]
    pub certifications: Vec<CertificationItem>,
    #[serde(default)]
    pub projects: Vec<ProjectItem>,
    #[serde(default)]
    pub template: TemplateId,
    #[serde(default)]
    pub color_scheme: ColorScheme,
    /// Free-form; resolved against the known font list at render time.
    #[serde(default = "default_font_style")]
    pub font_style: String,
}

impl Default for ResumeRecord {
    fn default() -> Self {
        Self::empty()
    }
}

impl ResumeRecord {
    /// A fresh session record: every list empty, selectors at their defaults.
    pub fn empty() -> Self {
        ResumeRecord {
            personal_info: PersonalInfo::default(),
            experience: Vec::new(),
            education: Vec::new(),
            skills: SkillsBlock::default(),
            certifications: Vec::new(),
            projects: Vec::new(),
            template: TemplateId::default(),
            color_scheme: ColorScheme::default(),
            font_style: default_font_style(),
        }
    }

    /// Applies one edit and returns the resulting snapshot. `self` is left untouched.
    pub fn apply(&self, edit: ResumeEdit) -> ResumeRecord {
        let mut next = self.clone();
        match edit {
            ResumeEdit::SetPersonalInfo(info) => next.personal_info = info,
            ResumeEdit::AddExperience(mut item) => {
                ensure_id(&mut item.id);
                next.experience.push(item);
            }
            ResumeEdit::UpdateExperience(item) => replace_by_id(&mut next.experience, item, |i| &i.id),
            ResumeEdit::RemoveExperience { id } => next.experience.retain(|i| i.id != id),
            ResumeEdit::AddEducation(mut item) => {
                ensure_id(&mut item.id);
                next.education.push(item);
            }
            ResumeEdit::UpdateEducation(item) => replace_by_id(&mut next.education, item, |i| &i.id),
            ResumeEdit::RemoveEducation { id } => next.education.retain(|i| i.id != id),
            ResumeEdit::AddProject(mut item) => {
                ensure_id(&mut item.id);
                next.projects.push(item);
            }
            ResumeEdit::UpdateProject(item) => replace_by_id(&mut next.projects, item, |i| &i.id),
            ResumeEdit::RemoveProject { id } => next.projects.retain(|i| i.id != id),
            ResumeEdit::AddCertification(mut item) => {
                ensure_id(&mut item.id);
                next.certifications.push(item);
            }
            ResumeEdit::UpdateCertification(item) => {
                replace_by_id(&mut next.certifications, item, |i| &i.id)
            }
            ResumeEdit::RemoveCertification { id } => next.certifications.retain(|i| i.id != id),
            ResumeEdit::AddSkill { category, skill } => {
                let skill = skill.trim();
                if !skill.is_empty() {
                    next.skills.list_mut(category).push(skill.to_string());
                }
            }
            ResumeEdit::RemoveSkill { category, index } => {
                let list = next.skills.list_mut(category);
                if index < list.len() {
                    list.remove(index);
                }
            }
            ResumeEdit::SetTemplate(template) => next.template = template,
            ResumeEdit::SetColorScheme(scheme) => next.color_scheme = scheme,
            ResumeEdit::SetFontStyle(font) => next.font_style = font,
        }
        next
    }

    /// Overlays the fields present in `patch`, returning the merged snapshot.
    pub fn merged(&self, patch: ResumePatch) -> ResumeRecord {
        let ResumePatch {
            personal_info,
            experience,
            education,
            skills,
            certifications,
            projects,
            template,
            color_scheme,
            font_style,
        } = patch;

        ResumeRecord {
            personal_info: personal_info.unwrap_or_else(|| self.personal_info.clone()),
            experience: experience.unwrap_or_else(|| self.experience.clone()),
            education: education.unwrap_or_else(|| self.education.clone()),
            skills: skills.unwrap_or_else(|| self.skills.clone()),
            certifications: certifications.unwrap_or_else(|| self.certifications.clone()),
            projects: projects.unwrap_or_else(|| self.projects.clone()),
            template: template.unwrap_or(self.template),
            color_scheme: color_scheme.unwrap_or(self.color_scheme),
            font_style: font_style.unwrap_or_else(|| self.font_style.clone()),
        }
    }
}

fn ensure_id(id: &mut String) {
    if id.trim().is_empty() {
        *id = Uuid::new_v4().to_string();
    }
}

fn replace_by_id<T>(list: &mut [T], item: T, id_of: impl Fn(&T) -> &String) {
    if let Some(slot) = list.iter_mut().find(|existing| id_of(&**existing) == id_of(&item)) {
        *slot = item;
    }
}

/// A single change to a résumé snapshot, as issued by the data-entry layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", content = "value", rename_all = "snake_case")]
pub enum ResumeEdit {
    SetPersonalInfo(PersonalInfo),
    AddExperience(ExperienceItem),
    UpdateExperience(ExperienceItem),
    RemoveExperience { id: String },
    AddEducation(EducationItem),
    UpdateEducation(EducationItem),
    RemoveEducation { id: String },
    AddProject(ProjectItem),
    UpdateProject(ProjectItem),
    RemoveProject { id: String },
    AddCertification(CertificationItem),
    UpdateCertification(CertificationItem),
    RemoveCertification { id: String },
    AddSkill { category: SkillCategory, skill: String },
    RemoveSkill { category: SkillCategory, index: usize },
    SetTemplate(TemplateId),
    SetColorScheme(ColorScheme),
    SetFontStyle(String),
}

/// Partial record accepted by the persistence `update` operation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResumePatch {
    pub personal_info: Option<PersonalInfo>,
    pub experience: Option<Vec<ExperienceItem>>,
    pub education: Option<Vec<EducationItem>>,
    pub skills: Option<SkillsBlock>,
    pub certifications: Option<Vec<CertificationItem>>,
    pub projects: Option<Vec<ProjectItem>>,
    pub template: Option<TemplateId>,
    pub color_scheme: Option<ColorScheme>,
    pub font_style: Option<String>,
}

/// Returns the trimmed value if it carries any text.
pub fn present(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_record_defaults() {
        let record = ResumeRecord::empty();
        assert!(record.experience.is_empty());
        assert_eq!(record.skills, SkillsBlock::default());
        assert_eq!(record.template, TemplateId::Classic);
        assert_eq!(record.color_scheme, ColorScheme::Primary);
        assert_eq!(record.font_style, "Inter");
    }

    #[test]
    fn test_deserializes_persisted_layout() {
        let value = json!({
            "personalInfo": {
                "firstName": "Ada",
                "lastName": "Lovelace",
                "email": "ada@example.com",
                "phone": "555-0100"
            },
            "experience": [{
                "id": "x1",
                "jobTitle": "Analyst",
                "company": "Engines Ltd",
                "startDate": "1842-01",
                "current": true
            }],
            "skills": { "technical": ["Go", "Rust"] },
            "template": "executive",
            "colorScheme": "purple",
            "createdAt": "2024-01-01T00:00:00Z"
        });

        let record: ResumeRecord = serde_json::from_value(value).unwrap();
        assert_eq!(record.personal_info.full_name(), "Ada Lovelace");
        assert!(record.experience[0].current);
        assert_eq!(record.skills.technical, vec!["Go", "Rust"]);
        assert!(record.skills.soft.is_empty());
        assert_eq!(record.template, TemplateId::Executive);
        assert_eq!(record.color_scheme, ColorScheme::Purple);
        assert_eq!(record.font_style, "Inter");
    }

    #[test]
    fn test_unknown_selectors_fall_back() {
        let record: ResumeRecord =
            serde_json::from_value(json!({ "template": "baroque", "colorScheme": "teal" }))
                .unwrap();
        assert_eq!(record.template, TemplateId::Classic);
        assert_eq!(record.color_scheme, ColorScheme::Primary);
    }

    #[test]
    fn test_selectors_serialize_to_canonical_names() {
        let mut record = ResumeRecord::empty();
        record.template = TemplateId::Minimalist;
        record.color_scheme = ColorScheme::Accent;
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["template"], "minimalist");
        assert_eq!(value["colorScheme"], "accent");
        assert_eq!(value["fontStyle"], "Inter");
        assert!(value["personalInfo"]["firstName"].is_string());
    }

    #[test]
    fn test_apply_leaves_original_untouched() {
        let original = ResumeRecord::empty();
        let next = original.apply(ResumeEdit::AddExperience(ExperienceItem {
            job_title: "Engineer".to_string(),
            ..Default::default()
        }));
        assert!(original.experience.is_empty());
        assert_eq!(next.experience.len(), 1);
        assert!(!next.experience[0].id.is_empty(), "id generated on add");
    }

    #[test]
    fn test_apply_update_and_remove_by_id() {
        let record = ResumeRecord::empty()
            .apply(ResumeEdit::AddEducation(EducationItem {
                id: "e1".to_string(),
                institution: "MIT".to_string(),
                degree: "BSc".to_string(),
                ..Default::default()
            }))
            .apply(ResumeEdit::AddEducation(EducationItem {
                id: "e2".to_string(),
                institution: "ETH".to_string(),
                degree: "MSc".to_string(),
                ..Default::default()
            }));

        let updated = record.apply(ResumeEdit::UpdateEducation(EducationItem {
            id: "e2".to_string(),
            institution: "ETH Zurich".to_string(),
            degree: "MSc".to_string(),
            ..Default::default()
        }));
        assert_eq!(updated.education[1].institution, "ETH Zurich");
        assert_eq!(updated.education[0].institution, "MIT");

        let removed = updated.apply(ResumeEdit::RemoveEducation {
            id: "e1".to_string(),
        });
        assert_eq!(removed.education.len(), 1);
        assert_eq!(removed.education[0].id, "e2");
    }

    #[test]
    fn test_skills_preserve_insertion_order() {
        let record = ResumeRecord::empty()
            .apply(ResumeEdit::AddSkill {
                category: SkillCategory::Technical,
                skill: "Rust".to_string(),
            })
            .apply(ResumeEdit::AddSkill {
                category: SkillCategory::Technical,
                skill: "Go".to_string(),
            })
            .apply(ResumeEdit::AddSkill {
                category: SkillCategory::Technical,
                skill: "   ".to_string(),
            });
        assert_eq!(record.skills.technical, vec!["Rust", "Go"]);

        let removed = record.apply(ResumeEdit::RemoveSkill {
            category: SkillCategory::Technical,
            index: 0,
        });
        assert_eq!(removed.skills.technical, vec!["Go"]);

        let unchanged = removed.apply(ResumeEdit::RemoveSkill {
            category: SkillCategory::Technical,
            index: 7,
        });
        assert_eq!(unchanged, removed);
    }

    #[test]
    fn test_merged_overlays_only_present_fields() {
        let mut base = ResumeRecord::empty();
        base.personal_info.first_name = "Grace".to_string();
        base.skills.soft = vec!["Mentoring".to_string()];

        let patch = ResumePatch {
            template: Some(TemplateId::Modern),
            skills: Some(SkillsBlock {
                technical: vec!["COBOL".to_string()],
                ..Default::default()
            }),
            ..Default::default()
        };
        let merged = base.merged(patch);
        assert_eq!(merged.personal_info.first_name, "Grace");
        assert_eq!(merged.template, TemplateId::Modern);
        assert_eq!(merged.skills.technical, vec!["COBOL"]);
        assert!(merged.skills.soft.is_empty());
    }

    #[test]
    fn test_present_trims_whitespace() {
        assert_eq!(present("  Berlin "), Some("Berlin"));
        assert_eq!(present("   "), None);
        assert_eq!(present(""), None);
    }
}
