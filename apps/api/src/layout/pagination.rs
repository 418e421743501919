//! Page-count estimate for the export document.
//!
//! Walks the projection in print order, measuring each block in body-line units with
//! the selected font's metrics. Entries are kept whole (the export stylesheet sets
//! `break-inside: avoid`), so an entry that does not fit the remainder of a page
//! starts the next one. All counts saturate, so absurdly long input reports
//! `u16::MAX` pages instead of wrapping.

use serde::Serialize;

use crate::layout::font_metrics::{FontMetrics, PageGeometry};
use crate::render::projector::{Entry, Projection, SectionBody};

/// Name (18pt) plus contact line plus the gap below the header.
const HEADER_LINES: u16 = 4;
/// 10.5pt heading, its rule and the spacing under it.
const HEADING_LINES: u16 = 2;
const SECTION_GAP_LINES: u16 = 1;
const ENTRY_GAP_LINES: u16 = 1;
/// Width of the widest skill category label.
const SKILL_LABEL_ALLOWANCE: &str = "Soft Skills: ";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageEstimate {
    pub pages: u16,
    pub lines_per_page: u16,
    /// Lines consumed on the final page.
    pub last_page_lines: u16,
}

struct PageCursor {
    capacity: u16,
    pages: u16,
    used: u16,
}

impl PageCursor {
    fn new(capacity: u16) -> Self {
        PageCursor {
            capacity,
            pages: 1,
            used: 0,
        }
    }

    /// Places a block that may split across pages.
    fn flow(&mut self, lines: u16) {
        let mut remaining = lines;
        while remaining > 0 {
            let free = self.capacity - self.used;
            if remaining <= free {
                self.used += remaining;
                remaining = 0;
            } else {
                remaining -= free;
                self.break_page();
            }
        }
    }

    /// Places a block that must stay on one page if it can fit on any page.
    fn keep_together(&mut self, lines: u16) {
        if lines > self.capacity - self.used && self.used > 0 && lines <= self.capacity {
            self.break_page();
        }
        self.flow(lines);
    }

    /// Places a heading, moving it to the next page when the block that follows
    /// would otherwise start there alone.
    fn keep_with_next(&mut self, lines: u16, next: u16) {
        let needed = lines.saturating_add(next.min(self.capacity / 2));
        if needed > self.capacity - self.used && self.used > 0 && needed <= self.capacity {
            self.break_page();
        }
        self.flow(lines);
    }

    fn break_page(&mut self) {
        self.pages = self.pages.saturating_add(1);
        self.used = 0;
    }
}

pub fn estimate_pages(projection: &Projection, geometry: &PageGeometry) -> u16 {
    estimate(projection, geometry).pages
}

pub fn estimate(projection: &Projection, geometry: &PageGeometry) -> PageEstimate {
    let metrics = projection.font.metrics();
    let width = geometry.text_width_em();
    let mut cursor = PageCursor::new(geometry.lines_per_page());

    cursor.flow(HEADER_LINES);

    for section in &projection.sections {
        let first_block = match &section.body {
            SectionBody::Text(text) => wrapped(metrics, text, width),
            SectionBody::Entries(entries) => entries
                .first()
                .map(|e| entry_lines(metrics, e, width))
                .unwrap_or(0),
            SectionBody::Skills(lines) => lines
                .first()
                .map(|l| skill_lines(metrics, &l.items, width))
                .unwrap_or(0),
        };
        cursor.keep_with_next(HEADING_LINES, first_block);

        match &section.body {
            SectionBody::Text(text) => cursor.flow(wrapped(metrics, text, width)),
            SectionBody::Entries(entries) => {
                for entry in entries {
                    cursor.keep_together(
                        entry_lines(metrics, entry, width).saturating_add(ENTRY_GAP_LINES),
                    );
                }
            }
            SectionBody::Skills(lines) => {
                for line in lines {
                    cursor.flow(
                        skill_lines(metrics, &line.items, width).saturating_add(ENTRY_GAP_LINES),
                    );
                }
            }
        }
        cursor.flow(SECTION_GAP_LINES);
    }

    PageEstimate {
        pages: cursor.pages.max(1),
        lines_per_page: cursor.capacity,
        last_page_lines: cursor.used,
    }
}

fn wrapped(metrics: &FontMetrics, text: &str, width_em: f32) -> u16 {
    metrics.estimated_lines(text, width_em)
}

/// The category label shares the first line with the items.
fn skill_lines(metrics: &FontMetrics, items: &str, width_em: f32) -> u16 {
    let text = format!("{SKILL_LABEL_ALLOWANCE}{items}");
    wrapped(metrics, &text, width_em)
}

fn entry_lines(metrics: &FontMetrics, entry: &Entry, width_em: f32) -> u16 {
    let mut lines = wrapped(metrics, &entry.title, width_em).max(1);
    lines = lines.saturating_add(wrapped(metrics, &entry.meta, width_em));
    if let Some(description) = &entry.description {
        lines = lines.saturating_add(wrapped(metrics, description, width_em));
    }
    if let Some(detail) = &entry.detail {
        let text = format!("{}: {}", detail.label, detail.value);
        lines = lines.saturating_add(wrapped(metrics, &text, width_em));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::font_metrics::Paper;
    use crate::models::resume::ExperienceItem;
    use crate::render::projector::project;
    use crate::render::test_support::{full_record, minimal_record};

    fn experience(n: usize) -> ExperienceItem {
        ExperienceItem {
            id: format!("exp-{n}"),
            job_title: format!("Engineer {n}"),
            company: "Acme".to_string(),
            start_date: "2020-01".to_string(),
            end_date: "2021-01".to_string(),
            description: "Shipped features across the stack and mentored a team of four. "
                .repeat(3),
            ..Default::default()
        }
    }

    #[test]
    fn test_header_only_is_one_page() {
        let projection = project(&minimal_record()).unwrap();
        let estimate = estimate(&projection, &PageGeometry::default());
        assert_eq!(estimate.pages, 1);
        assert_eq!(estimate.last_page_lines, HEADER_LINES);
    }

    #[test]
    fn test_full_record_fits_one_page() {
        let projection = project(&full_record()).unwrap();
        assert_eq!(estimate_pages(&projection, &PageGeometry::default()), 1);
    }

    #[test]
    fn test_long_history_spills_onto_more_pages() {
        let mut record = minimal_record();
        record.experience = (0..30).map(experience).collect();
        let projection = project(&record).unwrap();
        let pages = estimate_pages(&projection, &PageGeometry::default());
        assert!(pages >= 3, "got {pages}");
    }

    #[test]
    fn test_more_content_never_fewer_pages() {
        let mut record = minimal_record();
        let mut previous = 1;
        for n in 0..25 {
            record.experience.push(experience(n));
            let projection = project(&record).unwrap();
            let pages = estimate_pages(&projection, &PageGeometry::default());
            assert!(pages >= previous);
            previous = pages;
        }
    }

    #[test]
    fn test_huge_summary_saturates_instead_of_overflowing() {
        let mut record = minimal_record();
        record.personal_info.summary = "ab ".repeat(70_000);
        let projection = project(&record).unwrap();
        // Roughly one two-letter word per line and one line per page.
        let geometry = PageGeometry {
            body_font_pt: 500.0,
            ..PageGeometry::default()
        };
        assert_eq!(geometry.lines_per_page(), 1);
        assert_eq!(estimate_pages(&projection, &geometry), u16::MAX);
    }

    #[test]
    fn test_huge_description_keeps_default_estimate_total() {
        let mut record = minimal_record();
        let mut item = experience(0);
        item.description = format!("{} ", "x".repeat(120)).repeat(70_000);
        record.experience.push(item);
        let projection = project(&record).unwrap();
        let pages = estimate_pages(&projection, &PageGeometry::default());
        assert!(pages > 1_000, "got {pages}");
    }

    #[test]
    fn test_entries_are_not_split() {
        let mut cursor = PageCursor::new(10);
        cursor.flow(7);
        cursor.keep_together(5);
        assert_eq!(cursor.pages, 2);
        assert_eq!(cursor.used, 5);
    }

    #[test]
    fn test_heading_moves_with_following_block() {
        let mut cursor = PageCursor::new(10);
        cursor.flow(7);
        cursor.keep_with_next(2, 3);
        assert_eq!(cursor.pages, 2);
        assert_eq!(cursor.used, 2);
    }

    #[test]
    fn test_oversized_block_flows() {
        let mut cursor = PageCursor::new(10);
        cursor.flow(3);
        cursor.keep_together(25);
        assert_eq!(cursor.pages, 3);
        assert_eq!(cursor.used, 8);
    }

    #[test]
    fn test_letter_paper_has_fewer_lines_per_page() {
        let projection = project(&full_record()).unwrap();
        let a4 = estimate(&projection, &PageGeometry::for_paper(Paper::A4));
        let letter = estimate(&projection, &PageGeometry::for_paper(Paper::Letter));
        assert!(letter.lines_per_page < a4.lines_per_page);
    }
}
