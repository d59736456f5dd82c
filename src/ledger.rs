use crate::calc::{self, GradingScheme, Student, StudentField};
use crate::dni;
use crate::roster::RosterView;
use std::collections::BTreeMap;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum LedgerError {
    #[error("student {0} not found")]
    StudentNotFound(u64),
    /// The edit was not applied; the message is also kept as the row's error.
    #[error("{message}")]
    DuplicateDni {
        student_id: u64,
        dni: String,
        conflicts_with: u64,
        message: String,
    },
}

/// In-memory list of students plus the per-row DNI error messages.
#[derive(Debug)]
pub struct Ledger {
    scheme: GradingScheme,
    students: Vec<Student>,
    dni_errors: BTreeMap<u64, String>,
    next_id: u64,
}

impl Ledger {
    pub fn new(scheme: GradingScheme) -> Self {
        Self {
            scheme,
            students: Vec::new(),
            dni_errors: BTreeMap::new(),
            next_id: 1,
        }
    }

    /// A ledger holding one blank row, which is how a fresh grade sheet opens.
    pub fn with_blank_student(scheme: GradingScheme) -> Self {
        let mut ledger = Self::new(scheme);
        ledger.add_student();
        ledger
    }

    pub fn scheme(&self) -> &GradingScheme {
        &self.scheme
    }

    pub fn len(&self) -> usize {
        self.students.len()
    }

    /// Students in insertion order.
    #[cfg(test)]
    pub fn students(&self) -> &[Student] {
        &self.students
    }

    pub fn get(&self, id: u64) -> Option<&Student> {
        self.students.iter().find(|s| s.id == id)
    }

    pub fn dni_error(&self, id: u64) -> Option<&str> {
        self.dni_errors.get(&id).map(String::as_str)
    }

    /// Whether `dni` could be given to student `id` without a conflict.
    pub fn is_dni_available(&self, id: u64, dni: &str) -> bool {
        dni.is_empty() || dni::is_dni_unique(&self.students, dni, id)
    }

    pub fn roster(&self) -> RosterView<'_> {
        RosterView::new(&self.students)
    }

    /// Appends a blank student. Ids are never reused, even after removals.
    pub fn add_student(&mut self) -> &Student {
        let id = self.next_id;
        self.next_id += 1;
        self.students.push(Student::blank(id));
        tracing::info!(student_id = id, "student added");
        &self.students[self.students.len() - 1]
    }

    pub fn remove_student(&mut self, id: u64) -> Result<Student, LedgerError> {
        let pos = self.position(id)?;
        let removed = self.students.remove(pos);
        self.dni_errors.remove(&id);
        tracing::info!(student_id = id, "student removed");
        Ok(removed)
    }

    /// Applies one field edit. DNI edits clear the row's previous error first;
    /// a non-empty duplicate is rejected and leaves the old value in place.
    pub fn set_field(
        &mut self,
        id: u64,
        field: StudentField,
        value: &str,
    ) -> Result<&Student, LedgerError> {
        let pos = self.position(id)?;

        if field == StudentField::Dni {
            self.dni_errors.remove(&id);
            if let Some(other) = dni::find_conflict(&self.students, value, id) {
                let message = dni::DUPLICATE_DNI_MESSAGE.to_string();
                self.dni_errors.insert(id, message.clone());
                tracing::warn!(student_id = id, conflicts_with = other, "duplicate dni rejected");
                return Err(LedgerError::DuplicateDni {
                    student_id: id,
                    dni: value.to_string(),
                    conflicts_with: other,
                    message,
                });
            }
        }

        let updated = calc::calculate_grades(&self.students[pos], field, value, &self.scheme);
        tracing::debug!(student_id = id, field = %field, final_grade = updated.grades.final_grade, "student updated");
        self.students[pos] = updated;
        Ok(&self.students[pos])
    }

    fn position(&self, id: u64) -> Result<usize, LedgerError> {
        self.students
            .iter()
            .position(|s| s.id == id)
            .ok_or(LedgerError::StudentNotFound(id))
    }
}
