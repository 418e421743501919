//! Required-field invariants for a résumé record.
//!
//! The data-entry layer is expected to reject incomplete records before they reach the
//! renderer; the renderer re-checks and fails fast instead of emitting partial output.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::models::resume::{present, ResumeRecord};

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?)+$")
        .expect("email pattern compiles")
});

static URL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^https?://[^\s/?#]+[^\s]*$").expect("url pattern compiles")
});

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldProblem {
    /// Path to the offending field, e.g. `experience[1].company`.
    pub field: String,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub problems: Vec<FieldProblem>,
}

impl ValidationReport {
    pub fn is_empty(&self) -> bool {
        self.problems.is_empty()
    }

    fn require(&mut self, field: impl Into<String>, value: &str, message: &str) {
        if present(value).is_none() {
            self.push(field, message);
        }
    }

    fn push(&mut self, field: impl Into<String>, message: &str) {
        self.problems.push(FieldProblem {
            field: field.into(),
            message: message.to_string(),
        });
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self
            .problems
            .iter()
            .map(|p| format!("{}: {}", p.field, p.message))
            .collect::<Vec<_>>()
            .join("; ");
        f.write_str(&joined)
    }
}

pub fn is_valid_email(value: &str) -> bool {
    EMAIL_RE.is_match(value.trim())
}

pub fn is_valid_url(value: &str) -> bool {
    URL_RE.is_match(value.trim())
}

/// Checks every required-field invariant, collecting all failures.
pub fn validate_record(record: &ResumeRecord) -> Result<(), ValidationReport> {
    let mut report = ValidationReport::default();
    let info = &record.personal_info;

    report.require("personalInfo.firstName", &info.first_name, "First name is required");
    report.require("personalInfo.lastName", &info.last_name, "Last name is required");
    if !is_valid_email(&info.email) {
        report.push("personalInfo.email", "Invalid email address");
    }
    report.require("personalInfo.phone", &info.phone, "Phone number is required");
    if let Some(website) = present(&info.website) {
        if !is_valid_url(website) {
            report.push("personalInfo.website", "Invalid url");
        }
    }

    for (i, item) in record.experience.iter().enumerate() {
        report.require(format!("experience[{i}].jobTitle"), &item.job_title, "Job title is required");
        report.require(format!("experience[{i}].company"), &item.company, "Company name is required");
        report.require(format!("experience[{i}].startDate"), &item.start_date, "Start date is required");
    }

    for (i, item) in record.education.iter().enumerate() {
        report.require(
            format!("education[{i}].institution"),
            &item.institution,
            "Institution name is required",
        );
        report.require(format!("education[{i}].degree"), &item.degree, "Degree is required");
    }

    for (i, item) in record.projects.iter().enumerate() {
        report.require(format!("projects[{i}].name"), &item.name, "Project name is required");
    }

    for (i, item) in record.certifications.iter().enumerate() {
        report.require(
            format!("certifications[{i}].name"),
            &item.name,
            "Certification name is required",
        );
        report.require(
            format!("certifications[{i}].issuer"),
            &item.issuer,
            "Issuing organization is required",
        );
    }

    if report.is_empty() {
        Ok(())
    } else {
        Err(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::resume::{CertificationItem, ExperienceItem, PersonalInfo};

    fn valid_record() -> ResumeRecord {
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

    #[test]
    fn test_minimal_record_passes() {
        assert!(validate_record(&valid_record()).is_ok());
    }

    #[test]
    fn test_empty_record_reports_every_required_personal_field() {
        let report = validate_record(&ResumeRecord::empty()).unwrap_err();
        let fields: Vec<&str> = report.problems.iter().map(|p| p.field.as_str()).collect();
        assert_eq!(
            fields,
            vec![
                "personalInfo.firstName",
                "personalInfo.lastName",
                "personalInfo.email",
                "personalInfo.phone",
            ]
        );
    }

    #[test]
    fn test_whitespace_only_name_is_missing() {
        let mut record = valid_record();
        record.personal_info.first_name = "   ".to_string();
        let report = validate_record(&record).unwrap_err();
        assert_eq!(report.problems[0].field, "personalInfo.firstName");
    }

    #[test]
    fn test_email_syntax() {
        assert!(is_valid_email("first.last+tag@sub.example.org"));
        assert!(!is_valid_email("no-at-sign.example.com"));
        assert!(!is_valid_email("user@localhost"));
        assert!(!is_valid_email("two@@example.com"));
    }

    #[test]
    fn test_website_checked_only_when_present() {
        let mut record = valid_record();
        record.personal_info.website = "https://ada.dev/portfolio".to_string();
        assert!(validate_record(&record).is_ok());

        record.personal_info.website = "not a url".to_string();
        let report = validate_record(&record).unwrap_err();
        assert_eq!(report.problems[0].field, "personalInfo.website");
    }

    #[test]
    fn test_website_must_be_http_or_https() {
        assert!(is_valid_url("http://ada.dev"));
        assert!(is_valid_url("HTTPS://ada.dev/a?b=c#d"));
        assert!(!is_valid_url("ftp://x.org"));
        assert!(!is_valid_url("javascript://x"));
        assert!(!is_valid_url("https://"));

        let mut record = valid_record();
        record.personal_info.website = "ftp://x.org".to_string();
        let report = validate_record(&record).unwrap_err();
        assert_eq!(report.problems.len(), 1);
        assert_eq!(report.problems[0].field, "personalInfo.website");
    }

    #[test]
    fn test_nested_item_paths() {
        let mut record = valid_record();
        record.experience.push(ExperienceItem {
            id: "x".to_string(),
            job_title: "Engineer".to_string(),
            start_date: "2020-01".to_string(),
            ..Default::default()
        });
        record.certifications.push(CertificationItem {
            id: "c".to_string(),
            name: "CKA".to_string(),
            ..Default::default()
        });
        let report = validate_record(&record).unwrap_err();
        assert_eq!(report.problems.len(), 2);
        assert_eq!(report.problems[0].field, "experience[0].company");
        assert_eq!(report.problems[1].field, "certifications[0].issuer");
        assert!(report.to_string().contains("Issuing organization is required"));
    }

    #[test]
    fn test_free_form_optional_fields_are_not_checked() {
        let mut record = valid_record();
        record.certifications.push(CertificationItem {
            id: "c".to_string(),
            name: "CKA".to_string(),
            issuer: "CNCF".to_string(),
            credential_id: "¯\\_(ツ)_/¯".to_string(),
            issue_date: "sometime".to_string(),
            ..Default::default()
        });
        assert!(validate_record(&record).is_ok());
    }
}
