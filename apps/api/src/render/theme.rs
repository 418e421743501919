//! Template variants — the four presentation functions over one projection.
//!
//! A `TemplateStyle` owns everything a variant is allowed to change: heading wording
//! and case, rules and markers, header arrangement, and which optional contact fields
//! appear in the header. Section presence, order and entry text come from the
//! projection untouched.

use serde::Serialize;

use crate::models::resume::{ColorScheme, SkillCategory, TemplateId};
use crate::render::projector::{Entry, Header, Projection, SectionBody, SectionKind};

impl ColorScheme {
    /// The single accent colour a scheme maps to.
    pub fn accent_hex(&self) -> &'static str {
        match self {
            ColorScheme::Primary => "#2563EB",
            ColorScheme::Accent => "#10B981",
            ColorScheme::Red => "#EF4444",
            ColorScheme::Purple => "#A855F7",
        }
    }

    /// Accent at 20% opacity, used for heading rules.
    pub fn accent_tint(&self) -> String {
        format!("{}33", self.accent_hex())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HeaderLayout {
    /// Name and contact line centred above the body.
    Centered,
    /// Avatar block on the left, name and contact line beside it.
    TwoColumn,
    /// Left-aligned, oversized name.
    Stacked,
    /// Left-aligned with a divider rule under the header.
    Ruled,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateStyle {
    pub template: TemplateId,
    pub header_layout: HeaderLayout,
    /// Headings drawn in the accent colour (otherwise neutral).
    pub accent_headings: bool,
    /// Accent-tinted rule under each heading.
    pub heading_rule: bool,
    /// Accent dot before each heading.
    pub heading_marker: bool,
    pub shows_location: bool,
    pub shows_website: bool,
    headings: [&'static str; 6],
    soft_skills_label: &'static str,
}

impl TemplateStyle {
    pub fn for_template(template: TemplateId) -> Self {
        match template {
            TemplateId::Classic => TemplateStyle {
                template,
                header_layout: HeaderLayout::Centered,
                accent_headings: true,
                heading_rule: true,
                heading_marker: false,
                shows_location: true,
                shows_website: false,
                headings: [
                    "Professional Summary",
                    "Experience",
                    "Education",
                    "Skills",
                    "Projects",
                    "Certifications",
                ],
                soft_skills_label: "Soft Skills",
            },
            TemplateId::Modern => TemplateStyle {
                template,
                header_layout: HeaderLayout::TwoColumn,
                accent_headings: true,
                heading_rule: false,
                heading_marker: false,
                shows_location: false,
                shows_website: false,
                headings: [
                    "About",
                    "Experience",
                    "Education",
                    "Skills",
                    "Projects",
                    "Certifications",
                ],
                soft_skills_label: "Soft Skills",
            },
            TemplateId::Minimalist => TemplateStyle {
                template,
                header_layout: HeaderLayout::Stacked,
                accent_headings: false,
                heading_rule: false,
                heading_marker: false,
                shows_location: true,
                shows_website: false,
                headings: [
                    "SUMMARY",
                    "EXPERIENCE",
                    "EDUCATION",
                    "SKILLS",
                    "PROJECTS",
                    "CERTIFICATIONS",
                ],
                soft_skills_label: "Soft Skills",
            },
            TemplateId::Executive => TemplateStyle {
                template,
                header_layout: HeaderLayout::Ruled,
                accent_headings: false,
                heading_rule: false,
                heading_marker: true,
                shows_location: true,
                shows_website: true,
                headings: [
                    "EXECUTIVE SUMMARY",
                    "PROFESSIONAL EXPERIENCE",
                    "EDUCATION",
                    "CORE COMPETENCIES",
                    "KEY PROJECTS",
                    "CERTIFICATIONS",
                ],
                soft_skills_label: "Leadership",
            },
        }
    }

    pub fn heading(&self, kind: SectionKind) -> &'static str {
        let index = match kind {
            SectionKind::Summary => 0,
            SectionKind::Experience => 1,
            SectionKind::Education => 2,
            SectionKind::Skills => 3,
            SectionKind::Projects => 4,
            SectionKind::Certifications => 5,
        };
        self.headings[index]
    }

    pub fn skill_label(&self, category: SkillCategory) -> &'static str {
        match category {
            SkillCategory::Technical => "Technical",
            SkillCategory::Soft => self.soft_skills_label,
            SkillCategory::Languages => "Languages",
        }
    }

    /// `email | phone[ | location][ | website]` under this variant's header policy.
    pub fn contact_line(&self, header: &Header) -> String {
        let mut parts = vec![header.email.as_str(), header.phone.as_str()];
        if self.shows_location {
            parts.extend(header.location.as_deref());
        }
        if self.shows_website {
            parts.extend(header.website.as_deref());
        }
        parts.join(" | ")
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Presented view model (what the HTML templates consume)
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct PresentedResume {
    pub template: &'static str,
    pub header_layout: HeaderLayout,
    pub accent: &'static str,
    pub accent_tint: String,
    pub font: &'static str,
    pub accent_headings: bool,
    pub heading_rule: bool,
    pub heading_marker: bool,
    pub name: String,
    pub contact_line: String,
    pub sections: Vec<PresentedSection>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PresentedSection {
    pub kind: SectionKind,
    pub heading: &'static str,
    pub text: Option<String>,
    pub entries: Vec<Entry>,
    pub skills: Vec<PresentedSkillLine>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PresentedSkillLine {
    pub label: &'static str,
    pub items: String,
}

impl PresentedResume {
    pub fn from_projection(projection: &Projection) -> Self {
        let style = TemplateStyle::for_template(projection.template);

        let sections = projection
            .sections
            .iter()
            .map(|section| {
                let mut presented = PresentedSection {
                    kind: section.kind,
                    heading: style.heading(section.kind),
                    text: None,
                    entries: Vec::new(),
                    skills: Vec::new(),
                };
                match &section.body {
                    SectionBody::Text(text) => presented.text = Some(text.clone()),
                    SectionBody::Entries(entries) => presented.entries = entries.clone(),
                    SectionBody::Skills(lines) => {
                        presented.skills = lines
                            .iter()
                            .map(|line| PresentedSkillLine {
                                label: style.skill_label(line.category),
                                items: line.items.clone(),
                            })
                            .collect();
                    }
                }
                presented
            })
            .collect();

        PresentedResume {
            template: projection.template.as_str(),
            header_layout: style.header_layout,
            accent: projection.color_scheme.accent_hex(),
            accent_tint: projection.color_scheme.accent_tint(),
            font: projection.font.css_name(),
            accent_headings: style.accent_headings,
            heading_rule: style.heading_rule,
            heading_marker: style.heading_marker,
            name: projection.header.full_name.clone(),
            contact_line: style.contact_line(&projection.header),
            sections,
        }
    }
}
