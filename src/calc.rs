use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GradingScheme {
    pub exam_weight: f64,
    pub book_weight: f64,
    pub behavior_weight: f64,
    pub pass_mark: f64,
    pub max_score: f64,
}

impl Default for GradingScheme {
    fn default() -> Self {
        Self {
            exam_weight: 0.65,
            book_weight: 0.15,
            behavior_weight: 0.2,
            pass_mark: 5.0,
            max_score: 10.0,
        }
    }
}

impl GradingScheme {
    pub fn validate(&self) -> Result<(), String> {
        let weights = [
            ("examWeight", self.exam_weight),
            ("bookWeight", self.book_weight),
            ("behaviorWeight", self.behavior_weight),
        ];
        for (name, w) in weights {
            if !w.is_finite() || w < 0.0 {
                return Err(format!("{name} must be a non-negative number"));
            }
        }
        let sum = self.exam_weight + self.book_weight + self.behavior_weight;
        if (sum - 1.0).abs() > 1e-6 {
            return Err(format!("weights must sum to 1 (got {sum})"));
        }
        if !self.max_score.is_finite() || self.max_score <= 0.0 {
            return Err("maxScore must be > 0".to_string());
        }
        if !self.pass_mark.is_finite() || self.pass_mark < 0.0 || self.pass_mark > self.max_score
        {
            return Err("passMark must be within [0, maxScore]".to_string());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PassStatus {
    #[serde(rename = "APROBADO")]
    Aprobado,
    #[serde(rename = "SUSPENSO")]
    Suspenso,
}

impl PassStatus {
    pub fn from_final(final_grade: f64, scheme: &GradingScheme) -> Self {
        if final_grade >= scheme.pass_mark {
            PassStatus::Aprobado
        } else {
            PassStatus::Suspenso
        }
    }
}

/// Editable columns of a student row. Derived columns are not listed here and
/// therefore can never be set directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StudentField {
    Dni,
    Name,
    LastName,
    FirstExam,
    SecondExam,
    BookGrade,
    Behavior,
}

impl StudentField {
    pub const ALL: [StudentField; 7] = [
        StudentField::Dni,
        StudentField::Name,
        StudentField::LastName,
        StudentField::FirstExam,
        StudentField::SecondExam,
        StudentField::BookGrade,
        StudentField::Behavior,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StudentField::Dni => "dni",
            StudentField::Name => "name",
            StudentField::LastName => "lastName",
            StudentField::FirstExam => "firstExam",
            StudentField::SecondExam => "secondExam",
            StudentField::BookGrade => "bookGrade",
            StudentField::Behavior => "behavior",
        }
    }

    pub fn is_numeric(&self) -> bool {
        !matches!(
            self,
            StudentField::Dni | StudentField::Name | StudentField::LastName
        )
    }
}

impl fmt::Display for StudentField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StudentField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StudentField::ALL
            .into_iter()
            .find(|f| f.as_str() == s)
            .ok_or_else(|| format!("field is not editable: {s}"))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GradeBreakdown {
    pub average: f64,
    pub weighted_average: f64,
    pub weighted_book: f64,
    pub weighted_behavior: f64,
    pub final_grade: f64,
}

impl GradeBreakdown {
    pub fn compute(
        first_exam: f64,
        second_exam: f64,
        book_grade: f64,
        behavior: f64,
        scheme: &GradingScheme,
    ) -> Self {
        let average = (first_exam + second_exam) / 2.0;
        let weighted_average = average * scheme.exam_weight;
        let weighted_book = book_grade * scheme.book_weight;
        let weighted_behavior = behavior * scheme.behavior_weight;
        Self {
            average,
            weighted_average,
            weighted_book,
            weighted_behavior,
            final_grade: weighted_average + weighted_book + weighted_behavior,
        }
    }

    pub fn status(&self, scheme: &GradingScheme) -> PassStatus {
        PassStatus::from_final(self.final_grade, scheme)
    }

    /// Two-decimal strings for every derived column, as shown in the grade table.
    pub fn display(&self) -> serde_json::Value {
        serde_json::json!({
            "average": fixed_2(self.average),
            "weightedAverage": fixed_2(self.weighted_average),
            "weightedBook": fixed_2(self.weighted_book),
            "weightedBehavior": fixed_2(self.weighted_behavior),
            "finalGrade": fixed_2(self.final_grade),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: u64,
    pub dni: String,
    pub name: String,
    pub last_name: String,
    pub first_exam: f64,
    pub second_exam: f64,
    pub book_grade: f64,
    pub behavior: f64,
    #[serde(flatten)]
    pub grades: GradeBreakdown,
}

impl Student {
    pub fn blank(id: u64) -> Self {
        Self {
            id,
            dni: String::new(),
            name: String::new(),
            last_name: String::new(),
            first_exam: 0.0,
            second_exam: 0.0,
            book_grade: 0.0,
            behavior: 0.0,
            grades: GradeBreakdown::default(),
        }
    }

    pub fn status(&self, scheme: &GradingScheme) -> PassStatus {
        self.grades.status(scheme)
    }

    fn recompute(&mut self, scheme: &GradingScheme) {
        self.grades = GradeBreakdown::compute(
            self.first_exam,
            self.second_exam,
            self.book_grade,
            self.behavior,
            scheme,
        );
    }
}

/// Lenient numeric coercion for score inputs: blank, missing, non-numeric and
/// non-finite values all become 0. A comma is accepted as decimal separator.
pub fn coerce_score(raw: &str) -> f64 {
    let s = raw.trim();
    if s.is_empty() {
        return 0.0;
    }
    let parsed = s
        .parse::<f64>()
        .or_else(|_| s.replacen(',', ".", 1).parse::<f64>());
    match parsed {
        Ok(v) if v.is_finite() => v,
        _ => 0.0,
    }
}

pub fn clamp_score(v: f64, scheme: &GradingScheme) -> f64 {
    v.clamp(0.0, scheme.max_score)
}

/// Returns a copy of `student` with `field` set to `value` and every derived
/// column recomputed. Never fails.
pub fn calculate_grades(
    student: &Student,
    field: StudentField,
    value: &str,
    scheme: &GradingScheme,
) -> Student {
    let mut updated = student.clone();
    let score = || clamp_score(coerce_score(value), scheme);
    match field {
        StudentField::Dni => updated.dni = value.to_string(),
        StudentField::Name => updated.name = value.to_string(),
        StudentField::LastName => updated.last_name = value.to_string(),
        StudentField::FirstExam => updated.first_exam = score(),
        StudentField::SecondExam => updated.second_exam = score(),
        StudentField::BookGrade => updated.book_grade = score(),
        StudentField::Behavior => updated.behavior = score(),
    }
    updated.recompute(scheme);
    updated
}

/// `toFixed(2)`-style rendering of the exact binary value, so 2.275 (stored
/// as 2.27499...) shows as "2.27". Exact ties round away from zero.
pub fn fixed_2(x: f64) -> String {
    // An exact tie at the third decimal is an odd multiple of 1/8.
    let eighths = x * 8.0;
    if eighths.fract() == 0.0 && eighths % 2.0 != 0.0 {
        return format!("{:.2}", (x * 100.0).round() / 100.0);
    }
    format!("{x:.2}")
}
