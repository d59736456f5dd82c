use crate::calc::Student;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

const COMBINING_TILDE: char = '\u{0303}';

/// Spaces and punctuation in CLDR root order. They all sort before digits and
/// letters, so "O-Neill" comes before "O'Neill" as it does in ICU.
const PUNCTUATION_ORDER: &str = " _-,;:!¡?¿.'\"()[]{}@*/\\&#%`^+<=>|~$";

/// Offset that keeps every ordinary character above the punctuation weights.
const BASE_WEIGHT: u32 = 128;

fn char_weight(c: char) -> u32 {
    match PUNCTUATION_ORDER.chars().position(|p| p == c) {
        Some(rank) => rank as u32 + 1,
        None => BASE_WEIGHT + (c as u32) * 2,
    }
}

/// Primary-strength Spanish sort key: case and accents are ignored, except
/// that `ñ` is its own letter sorting right after `n`.
///
/// Other characters weigh twice their lowercase code point so `ñ` can take
/// the odd slot between `n` and `o`. Common punctuation follows CLDR order
/// instead; anything outside that table and the Latin letters keeps
/// code-point order, which can differ from a full ICU collator.
pub fn collation_key(s: &str) -> Vec<u32> {
    let mut key: Vec<u32> = Vec::with_capacity(s.len());
    let mut last_was_n = false;
    for c in s.nfd() {
        if is_combining_mark(c) {
            if c == COMBINING_TILDE && last_was_n {
                if let Some(w) = key.last_mut() {
                    *w += 1;
                }
            }
            last_was_n = false;
            continue;
        }
        last_was_n = false;
        for lc in c.to_lowercase() {
            key.push(char_weight(lc));
            last_was_n = lc == 'n';
        }
    }
    key
}

/// Read-only view of the roster ordered by last name. Iterating it never
/// touches the backing slice, and every call to [`RosterView::iter`] starts
/// from the first student again.
#[derive(Debug, Clone, Copy)]
pub struct RosterView<'a> {
    students: &'a [Student],
}

impl<'a> RosterView<'a> {
    pub fn new(students: &'a [Student]) -> Self {
        Self { students }
    }

    pub fn iter(&self) -> ByLastName<'a> {
        ByLastName {
            students: self.students,
            order: None,
        }
    }
}

impl<'a> IntoIterator for &RosterView<'a> {
    type Item = &'a Student;
    type IntoIter = ByLastName<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// The ordering is computed on the first call to `next`.
#[derive(Debug)]
pub struct ByLastName<'a> {
    students: &'a [Student],
    order: Option<std::vec::IntoIter<usize>>,
}

impl<'a> ByLastName<'a> {
    fn sorted_indices(students: &[Student]) -> Vec<usize> {
        let mut keyed: Vec<(Vec<u32>, usize)> = students
            .iter()
            .enumerate()
            .map(|(i, s)| (collation_key(&s.last_name), i))
            .collect();
        // stable: equal keys keep insertion order
        keyed.sort_by(|a, b| a.0.cmp(&b.0));
        keyed.into_iter().map(|(_, i)| i).collect()
    }
}

impl<'a> Iterator for ByLastName<'a> {
    type Item = &'a Student;

    fn next(&mut self) -> Option<Self::Item> {
        let students = self.students;
        let order = self
            .order
            .get_or_insert_with(|| Self::sorted_indices(students).into_iter());
        order.next().map(|i| &students[i])
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match &self.order {
            Some(it) => it.size_hint(),
            None => (self.students.len(), Some(self.students.len())),
        }
    }
}

impl ExactSizeIterator for ByLastName<'_> {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cmp::Ordering;

    fn compare_last_names(a: &str, b: &str) -> Ordering {
        collation_key(a).cmp(&collation_key(b))
    }

    fn named(id: u64, last_name: &str) -> Student {
        let mut s = Student::blank(id);
        s.last_name = last_name.to_string();
        s
    }

    fn ids(view: &RosterView<'_>) -> Vec<u64> {
        view.iter().map(|s| s.id).collect()
    }

    #[test]
    fn accents_and_case_are_ignored() {
        assert_eq!(compare_last_names("Álvarez", "Alvarez"), Ordering::Equal);
        assert_eq!(compare_last_names("álvarez", "ALVAREZ"), Ordering::Equal);
        assert_eq!(compare_last_names("Güell", "guell"), Ordering::Equal);
        assert_eq!(compare_last_names("Álvarez", "Benítez"), Ordering::Less);
    }

    #[test]
    fn enye_sorts_after_n() {
        assert_eq!(compare_last_names("Nuñez", "Nunez"), Ordering::Greater);
        assert_eq!(compare_last_names("Ñandú", "Nzeta"), Ordering::Greater);
        assert_eq!(compare_last_names("Ñandú", "Ortega"), Ordering::Less);
        assert_eq!(compare_last_names("ñ", "Ñ"), Ordering::Equal);
    }

    #[test]
    fn punctuation_follows_cldr_order() {
        assert_eq!(compare_last_names("O-Neill", "O'Neill"), Ordering::Less);
        assert_eq!(compare_last_names("De la Cruz", "De-la Cruz"), Ordering::Less);
        assert_eq!(compare_last_names("Pérez-Ortiz", "Pérez1"), Ordering::Less);
        assert_eq!(compare_last_names("San Juan", "Sanz"), Ordering::Less);
    }

    #[test]
    fn empty_last_names_sort_first() {
        assert_eq!(compare_last_names("", "Abad"), Ordering::Less);
    }

    #[test]
    fn sort_is_stable_for_equal_keys() {
        let students = vec![
            named(1, "Ruiz"),
            named(2, "Álvarez"),
            named(3, "García"),
            named(4, "alvarez"),
            named(5, "Alvarez"),
        ];
        let view = RosterView::new(&students);
        assert_eq!(ids(&view), vec![2, 4, 5, 3, 1]);
    }

    #[test]
    fn view_is_restartable_and_non_destructive() {
        let students = vec![named(1, "Zapata"), named(2, "Abad")];
        let view = RosterView::new(&students);

        let mut it = view.iter();
        assert_eq!(it.len(), 2);
        assert_eq!(it.next().map(|s| s.id), Some(2));

        // a fresh iteration starts over
        assert_eq!(ids(&view), vec![2, 1]);
        assert_eq!(ids(&view), vec![2, 1]);
        assert_eq!(students[0].id, 1);
        assert_eq!(students[1].id, 2);
    }
}
