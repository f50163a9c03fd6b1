//! Keep or clear ordinary cells against the requested courses.

use super::tokens::strip_decoration;
use crate::grid::{Alignment, Cell, CellValue, Fill};

/// The course abbreviations a run keeps.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AllowList {
    courses: Vec<String>,
}

impl AllowList {
    pub fn new<I, S>(courses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        courses.into_iter().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.courses.is_empty()
    }

    pub fn len(&self) -> usize {
        self.courses.len()
    }

    pub fn contains(&self, token: &str) -> bool {
        let token = strip_decoration(token);
        self.courses.iter().any(|c| c == token)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.courses.iter().map(String::as_str)
    }

    /// Tokens that are requested courses, in cell order.
    pub fn intersect<'a>(&self, tokens: &'a [String]) -> Vec<&'a str> {
        tokens
            .iter()
            .map(|t| strip_decoration(t))
            .filter(|t| self.contains(t))
            .collect()
    }
}

impl<S: AsRef<str>> FromIterator<S> for AllowList {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        let mut courses: Vec<String> = Vec::new();
        for course in iter {
            let course = strip_decoration(course.as_ref().trim());
            if !course.is_empty() && !courses.iter().any(|c| c == course) {
                courses.push(course.to_string());
            }
        }
        AllowList { courses }
    }
}

/// Outcome for one ordinary cell.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Verdict {
    /// Rewrite to this label and centre it.
    Keep(String),
    /// Blank the cell and paint it white.
    Clear,
}

pub fn classify(tokens: &[String], allow: &AllowList) -> Verdict {
    let matched = allow.intersect(tokens);
    if matched.is_empty() {
        Verdict::Clear
    } else {
        Verdict::Keep(matched.join(" "))
    }
}

/// Apply a verdict to the cell in place.
pub fn apply(cell: &mut Cell, verdict: &Verdict) {
    match verdict {
        Verdict::Keep(label) => {
            cell.value = CellValue::Text(label.clone());
            cell.alignment = Some(Alignment::Center);
        }
        Verdict::Clear => {
            cell.value = CellValue::Empty;
            cell.fill = Some(Fill::white());
        }
    }
}
