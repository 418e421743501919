//! Rendering engine: projection, template variants, live preview and print export.
//!
//! Every output path starts from `projector::project`, so the preview and the exported
//! document can never disagree about which content exists or in what order.

pub mod export;
pub mod preview;
pub mod projector;
pub mod session;
pub mod sink;
pub mod theme;

use thiserror::Error;

use crate::models::validation::ValidationReport;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Malformed résumé: {0}")]
    MalformedInput(ValidationReport),

    #[error("Template error: {0}")]
    Template(#[from] minijinja::Error),
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::models::resume::{
        CertificationItem, EducationItem, ExperienceItem, PersonalInfo, ProjectItem,
        ResumeRecord, SkillsBlock,
    };

    /// Required fields only; every optional section absent.
    pub fn minimal_record() -> ResumeRecord {
        ResumeRecord {
            personal_info: PersonalInfo {
                first_name: "Ada".to_string(),
                last_name: "Lovelace".to_string(),
                email: "ada@example.com".to_string(),
                phone: "555-0100".to_string(),
                ..Default::default()
            },
            ..ResumeRecord::empty()
        }
    }

    /// Every section populated.
    pub fn full_record() -> ResumeRecord {
        let mut record = minimal_record();
        record.personal_info.location = "London".to_string();
        record.personal_info.website = "https://ada.dev".to_string();
        record.personal_info.summary =
            "Mathematician and writer, known for work on the Analytical Engine.".to_string();
        record.experience = vec![
            ExperienceItem {
                id: "exp-1".to_string(),
                job_title: "Analyst".to_string(),
                company: "Analytical Engine Co".to_string(),
                location: "London".to_string(),
                start_date: "1842-01".to_string(),
                current: true,
                description: "Wrote the first published algorithm for a computing machine."
                    .to_string(),
                ..Default::default()
            },
            ExperienceItem {
                id: "exp-2".to_string(),
                job_title: "Translator".to_string(),
                company: "Scientific Memoirs".to_string(),
                start_date: "1840-06".to_string(),
                end_date: "1841-12".to_string(),
                ..Default::default()
            },
        ];
        record.education = vec![EducationItem {
            id: "edu-1".to_string(),
            institution: "Private Tutoring".to_string(),
            degree: "Mathematics".to_string(),
            field: "Calculus".to_string(),
            graduation_date: "1835".to_string(),
            gpa: "4.0".to_string(),
            ..Default::default()
        }];
        record.skills = SkillsBlock {
            technical: vec!["Algorithms".to_string(), "Calculus".to_string()],
            soft: vec!["Writing".to_string()],
            languages: vec!["English".to_string(), "French".to_string()],
        };
        record.projects = vec![ProjectItem {
            id: "prj-1".to_string(),
            name: "Note G".to_string(),
            description: "Bernoulli number computation for the Engine.".to_string(),
            technologies: vec!["Punched cards".to_string()],
            start_date: "1842".to_string(),
            end_date: "1843".to_string(),
            ..Default::default()
        }];
        record.certifications = vec![CertificationItem {
            id: "crt-1".to_string(),
            name: "Fellow".to_string(),
            issuer: "Royal Society".to_string(),
            issue_date: "1843".to_string(),
            credential_id: "RS-1843".to_string(),
            ..Default::default()
        }];
        record
    }
}
