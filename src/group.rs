use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum GroupError {
    #[error("unknown course: {0}")]
    UnknownCourse(String),
    #[error("unknown classroom: {0}")]
    UnknownClassroom(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Course {
    #[serde(rename = "1º")]
    First,
    #[serde(rename = "2º")]
    Second,
}

impl Course {
    pub const ALL: [Course; 2] = [Course::First, Course::Second];

    pub fn as_str(&self) -> &'static str {
        match self {
            Course::First => "1º",
            Course::Second => "2º",
        }
    }
}

impl FromStr for Course {
    type Err = GroupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Course::ALL
            .into_iter()
            .find(|c| c.as_str() == s.trim())
            .ok_or_else(|| GroupError::UnknownCourse(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Classroom {
    Dam,
    Daw,
    Asir,
}

impl Classroom {
    pub const ALL: [Classroom; 3] = [Classroom::Dam, Classroom::Daw, Classroom::Asir];

    pub fn as_str(&self) -> &'static str {
        match self {
            Classroom::Dam => "DAM",
            Classroom::Daw => "DAW",
            Classroom::Asir => "ASIR",
        }
    }
}

impl FromStr for Classroom {
    type Err = GroupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Classroom::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| GroupError::UnknownClassroom(s.to_string()))
    }
}

/// Display label for the sheet header. Has no bearing on grades.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseGroup {
    pub course: Course,
    pub classroom: Classroom,
}

impl Default for CourseGroup {
    fn default() -> Self {
        Self {
            course: Course::First,
            classroom: Classroom::Dam,
        }
    }
}

impl fmt::Display for CourseGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.course.as_str(), self.classroom.as_str())
    }
}

#[derive(Debug, Clone, Default)]
pub struct GroupSelector {
    selected: CourseGroup,
}

impl GroupSelector {
    pub fn new(initial: CourseGroup) -> Self {
        Self { selected: initial }
    }

    pub fn selected(&self) -> CourseGroup {
        self.selected
    }

    /// Changes either half of the selection. Both values are parsed before
    /// anything is applied, so a bad classroom does not leave a new course
    /// selected.
    pub fn select(
        &mut self,
        course: Option<&str>,
        classroom: Option<&str>,
    ) -> Result<CourseGroup, GroupError> {
        let course = course.map(str::parse::<Course>).transpose()?;
        let classroom = classroom.map(str::parse::<Classroom>).transpose()?;
        if let Some(c) = course {
            self.selected.course = c;
        }
        if let Some(c) = classroom {
            self.selected.classroom = c;
        }
        tracing::debug!(group = %self.selected, "group selected");
        Ok(self.selected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_first_dam() {
        let sel = GroupSelector::default();
        assert_eq!(sel.selected().to_string(), "1º DAM");
    }

    #[test]
    fn select_changes_each_half_independently() {
        let mut sel = GroupSelector::default();
        sel.select(Some("2º"), None).unwrap();
        assert_eq!(sel.selected().to_string(), "2º DAM");
        sel.select(None, Some("asir")).unwrap();
        assert_eq!(sel.selected().to_string(), "2º ASIR");
    }

    #[test]
    fn unknown_values_leave_selection_unchanged() {
        let mut sel = GroupSelector::default();
        let err = sel.select(Some("2º"), Some("SMR")).unwrap_err();
        assert_eq!(err, GroupError::UnknownClassroom("SMR".to_string()));
        assert_eq!(sel.selected(), CourseGroup::default());
        assert!(sel.select(Some("3º"), None).is_err());
    }

    #[test]
    fn wire_names_match_labels() {
        let json = serde_json::to_value(CourseGroup {
            course: Course::Second,
            classroom: Classroom::Daw,
        })
        .unwrap();
        assert_eq!(json, serde_json::json!({ "course": "2º", "classroom": "DAW" }));
    }
}
