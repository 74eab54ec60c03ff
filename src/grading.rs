//! Letter-grade banding
//!
//! Maps a continuous predicted grade to a discrete letter grade via a fixed
//! threshold table, evaluated top-down with first match winning. The bands
//! partition the whole real line: anything below the lowest cutoff
//! (including NaN, which fails every comparison) is an `F`.

/// Ordered cutoffs: a prediction at or above the cutoff earns the grade.
pub const GRADE_BANDS: [(f32, &str); 8] = [
    (18.0, "A+"),
    (15.0, "A"),
    (13.0, "B+"),
    (11.0, "B"),
    (9.0, "C+"),
    (7.0, "C"),
    (5.0, "D+"),
    (3.0, "D"),
];

/// Map a continuous prediction to its letter grade.
pub fn letter_grade(prediction: f32) -> &'static str {
    for (cutoff, grade) in GRADE_BANDS {
        if prediction >= cutoff {
            return grade;
        }
    }
    "F"
}

/// Rank of a letter grade under the ordering A+ > A > ... > F.
///
/// Lower rank means a better grade. Used by tests to assert monotonicity.
pub fn grade_rank(grade: &str) -> Option<usize> {
    GRADE_BANDS
        .iter()
        .position(|&(_, g)| g == grade)
        .or_else(|| (grade == "F").then_some(GRADE_BANDS.len()))
}
