//! Course records built from metadata blocks.

use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;

/// One course described by a metadata block.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Course {
    pub abbrev: String,
    pub name: String,
    pub tutor: String,
    pub location: String,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("course {abbrev} already has all four fields; extra field {extra:?}")]
pub struct FieldOverflow {
    pub abbrev: String,
    pub extra: String,
}

/// Which field the next recorded value fills.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BuilderState {
    ExpectAbbrev,
    ExpectName,
    ExpectTutor,
    ExpectLocation,
    Complete,
}

/// Accumulates the fields of one course in block order:
/// abbreviation, name, tutor, location.
#[derive(Clone, Debug)]
pub struct CourseBuilder {
    state: BuilderState,
    course: Course,
}

impl Default for CourseBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl CourseBuilder {
    pub fn new() -> Self {
        CourseBuilder {
            state: BuilderState::ExpectAbbrev,
            course: Course::default(),
        }
    }

    pub fn state(&self) -> BuilderState {
        self.state
    }

    /// Store `value` in the next field.
    pub fn record(&mut self, value: &str) -> Result<(), FieldOverflow> {
        let value = value.to_string();
        self.state = match self.state {
            BuilderState::ExpectAbbrev => {
                self.course.abbrev = value;
                BuilderState::ExpectName
            }
            BuilderState::ExpectName => {
                self.course.name = value;
                BuilderState::ExpectTutor
            }
            BuilderState::ExpectTutor => {
                self.course.tutor = value;
                BuilderState::ExpectLocation
            }
            BuilderState::ExpectLocation => {
                self.course.location = value;
                BuilderState::Complete
            }
            BuilderState::Complete => {
                return Err(FieldOverflow {
                    abbrev: self.course.abbrev.clone(),
                    extra: value,
                });
            }
        };
        Ok(())
    }

    /// The finished course, or `None` if no abbreviation was recorded.
    /// Fields never recorded stay empty.
    pub fn finish(self) -> Option<Course> {
        match self.state {
            BuilderState::ExpectAbbrev => None,
            _ => Some(self.course),
        }
    }
}

/// Courses keyed by abbreviation.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CourseRegistry {
    courses: BTreeMap<String, Course>,
}

impl CourseRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a course, returning the entry it replaced.
    pub fn commit(&mut self, course: Course) -> Option<Course> {
        self.courses.insert(course.abbrev.clone(), course)
    }

    /// Look up by abbreviation. Bracket decoration on `abbrev` is ignored.
    pub fn get(&self, abbrev: &str) -> Option<&Course> {
        self.courses
            .get(abbrev)
            .or_else(|| self.courses.get(super::tokens::strip_decoration(abbrev)))
    }

    pub fn contains(&self, abbrev: &str) -> bool {
        self.get(abbrev).is_some()
    }

    pub fn len(&self) -> usize {
        self.courses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.courses.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Course> {
        self.courses.values()
    }
}

impl<'a> IntoIterator for &'a CourseRegistry {
    type Item = &'a Course;
    type IntoIter = std::collections::btree_map::Values<'a, String, Course>;

    fn into_iter(self) -> Self::IntoIter {
        self.courses.values()
    }
}
