use crate::calc::Student;

pub const DUPLICATE_DNI_MESSAGE: &str = "Este DNI ya existe";

/// True when no record other than `current_id` already holds `dni`.
/// Comparison is exact; callers decide whether an empty value is checked.
pub fn is_dni_unique(students: &[Student], dni: &str, current_id: u64) -> bool {
    !students
        .iter()
        .any(|s| s.dni == dni && s.id != current_id)
}

/// Id of the first other record holding `dni`, if any. Empty values never
/// conflict.
pub fn find_conflict(students: &[Student], dni: &str, current_id: u64) -> Option<u64> {
    if dni.is_empty() {
        return None;
    }
    students
        .iter()
        .find(|s| s.dni == dni && s.id != current_id)
        .map(|s| s.id)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_dni(id: u64, dni: &str) -> Student {
        let mut s = Student::blank(id);
        s.dni = dni.to_string();
        s
    }

    #[test]
    fn own_record_is_not_a_conflict() {
        let students = vec![with_dni(1, "12345678Z"), with_dni(2, "")];
        assert!(is_dni_unique(&students, "12345678Z", 1));
        assert!(!is_dni_unique(&students, "12345678Z", 2));
        assert_eq!(find_conflict(&students, "12345678Z", 2), Some(1));
    }

    #[test]
    fn empty_dni_never_conflicts() {
        let students = vec![with_dni(1, ""), with_dni(2, "")];
        assert_eq!(find_conflict(&students, "", 2), None);
    }

    #[test]
    fn comparison_is_exact() {
        let students = vec![with_dni(1, "12345678Z")];
        assert!(is_dni_unique(&students, "12345678z", 2));
        assert!(is_dni_unique(&students, " 12345678Z", 2));
    }
}
