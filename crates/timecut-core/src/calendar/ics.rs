//! iCalendar (RFC 5545) output.

use super::{Lecture, collect_lectures};
use crate::error::Result;
use crate::pipeline::{HookContext, ScanHook};
use chrono::{Duration, NaiveDateTime, Utc};
use std::path::PathBuf;
use tracing::info;

const LINE_LIMIT: usize = 75;
const STAMP_FORMAT: &str = "%Y%m%dT%H%M%S";

/// Render lectures as a VCALENDAR. Times are floating local times;
/// `stamp` is the UTC creation time written to every event.
pub fn render_ics(lectures: &[Lecture], minutes: u32, stamp: NaiveDateTime) -> String {
    let mut lines: Vec<String> = vec![
        "BEGIN:VCALENDAR".into(),
        "VERSION:2.0".into(),
        "PRODID:-//timecut//timetable//EN".into(),
        "CALSCALE:GREGORIAN".into(),
    ];

    for lecture in lectures {
        let end = lecture.start + Duration::minutes(i64::from(minutes));
        lines.push("BEGIN:VEVENT".into());
        lines.push(format!(
            "UID:{}-{}-y{}@timecut",
            lecture.abbrev,
            lecture.start.format(STAMP_FORMAT),
            lecture.year
        ));
        lines.push(format!("DTSTAMP:{}Z", stamp.format(STAMP_FORMAT)));
        lines.push(format!("DTSTART:{}", lecture.start.format(STAMP_FORMAT)));
        lines.push(format!("DTEND:{}", end.format(STAMP_FORMAT)));
        lines.push(format!(
            "SUMMARY:{}",
            escape_text(&format!("{} ({})", lecture.name, lecture.abbrev))
        ));
        if !lecture.location.is_empty() {
            lines.push(format!("LOCATION:{}", escape_text(&lecture.location)));
        }
        if !lecture.tutor.is_empty() {
            lines.push(format!("DESCRIPTION:{}", escape_text(&format!("Tutor: {}", lecture.tutor))));
        }
        lines.push("END:VEVENT".into());
    }
    lines.push("END:VCALENDAR".into());

    let mut out = String::new();
    for line in lines {
        out.push_str(&fold(&line));
        out.push_str("\r\n");
    }
    out
}

/// Escape a TEXT property value.
pub fn escape_text(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            ';' => out.push_str("\\;"),
            ',' => out.push_str("\\,"),
            '\n' => out.push_str("\\n"),
            '\r' => {}
            _ => out.push(ch),
        }
    }
    out
}

/// Fold a content line at 75 octets without splitting a character.
fn fold(line: &str) -> String {
    let mut out = String::with_capacity(line.len() + 8);
    let mut used = 0;
    for ch in line.chars() {
        let width = ch.len_utf8();
        if used + width > LINE_LIMIT {
            out.push_str("\r\n ");
            // The leading space counts toward the next line.
            used = 1;
        }
        out.push(ch);
        used += width;
    }
    out
}

/// Writes an .ics file of the run's lectures.
pub struct IcsExport {
    pub path: PathBuf,
    pub minutes: u32,
}

impl ScanHook for IcsExport {
    fn name(&self) -> &str {
        "ics"
    }

    fn run(&mut self, ctx: &HookContext<'_>) -> Result<()> {
        let lectures = collect_lectures(
            &ctx.sheet.grid,
            ctx.outcome,
            ctx.allow,
            ctx.config,
            ctx.year,
        );
        let content = render_ics(&lectures, self.minutes, Utc::now().naive_utc());
        std::fs::write(&self.path, content)?;
        info!(path = %self.path.display(), events = lectures.len(), "wrote calendar");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn lecture() -> Lecture {
        let date = NaiveDate::from_ymd_opt(2024, 9, 16).unwrap();
        Lecture {
            abbrev: "GR".into(),
            name: "Group Revision".into(),
            tutor: "Dr. Smith".into(),
            location: "Room 4, East Wing".into(),
            date,
            time: "15:00".into(),
            start: date.and_hms_opt(15, 0, 0).unwrap(),
            year: 2,
        }
    }

    fn stamp() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 9, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    #[test]
    fn renders_one_event_per_lecture() {
        let ics = render_ics(&[lecture(), lecture()], 60, stamp());
        assert!(ics.starts_with("BEGIN:VCALENDAR\r\n"));
        assert!(ics.ends_with("END:VCALENDAR\r\n"));
        assert_eq!(ics.matches("BEGIN:VEVENT").count(), 2);
        assert!(ics.contains("DTSTART:20240916T150000\r\n"));
        assert!(ics.contains("DTEND:20240916T160000\r\n"));
        assert!(ics.contains("DTSTAMP:20240901T120000Z\r\n"));
        assert!(ics.contains("UID:GR-20240916T150000-y2@timecut\r\n"));
        assert!(ics.contains("SUMMARY:Group Revision (GR)\r\n"));
        assert!(ics.contains("LOCATION:Room 4\\, East Wing\r\n"));
        assert!(ics.contains("DESCRIPTION:Tutor: Dr. Smith\r\n"));
    }

    #[test]
    fn duration_follows_minutes() {
        let ics = render_ics(&[lecture()], 50, stamp());
        assert!(ics.contains("DTEND:20240916T155000\r\n"));
    }

    #[test]
    fn empty_calendar_is_valid() {
        let ics = render_ics(&[], 60, stamp());
        assert!(!ics.contains("VEVENT"));
        assert!(ics.contains("VERSION:2.0"));
    }

    #[test]
    fn escapes_text_values() {
        assert_eq!(escape_text("a;b,c\\d\ne"), "a\\;b\\,c\\\\d\\ne");
    }

    #[test]
    fn folds_long_lines() {
        let line = format!("SUMMARY:{}", "é".repeat(60));
        let folded = fold(&line);
        for part in folded.split("\r\n") {
            assert!(part.len() <= LINE_LIMIT);
        }
        assert_eq!(folded.replace("\r\n ", ""), line);
    }
}
