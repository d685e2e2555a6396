use super::rubric::{Category, SubScores};
use super::CategoryScores;

/// Magnitude from which every `f64` is a whole number.
const INTEGRAL_MAGNITUDE: f64 = 4_503_599_627_370_496.0;

/// Mean over every sub-criterion present, including caller-supplied extras.
/// An empty category scores 0.
///
/// Finite inputs always give a finite mean, even when their plain sum would
/// overflow.
pub fn category_score(scores: &SubScores) -> f64 {
    if scores.is_empty() {
        return 0.0;
    }
    let count = scores.len() as f64;
    let sum: f64 = scores.values().sum();
    if sum.is_finite() {
        return sum / count;
    }
    saturate(scores.values().map(|score| score / count).sum())
}

/// Weighted sum of the category means, rounded to one decimal.
///
/// Out-of-range inputs are not clamped; a sub-score of 120 raises the total
/// past what a well-formed rubric response could reach. The result is always
/// finite.
pub fn overall_score(category_scores: &CategoryScores) -> f64 {
    let weighted: f64 = Category::ALL
        .iter()
        .map(|category| category_scores.get(*category) * category.weight())
        .sum();
    round_one_decimal(saturate(weighted))
}

/// Rounds half away from zero at the first decimal of the shortest decimal
/// form of `value`, so `81.85` gives `81.9` and `0.04999999995` gives `0.0`.
///
/// Non-finite values and values too large to carry a fraction are returned
/// unchanged.
pub fn round_one_decimal(value: f64) -> f64 {
    if !value.is_finite() || value.abs() >= INTEGRAL_MAGNITUDE {
        return value;
    }

    let digits = value.abs().to_string();
    let (whole, fraction) = digits.split_once('.').unwrap_or((digits.as_str(), ""));
    let mut fraction = fraction.bytes().map(|digit| u64::from(digit - b'0'));
    let first = fraction.next().unwrap_or(0);
    let round_up = fraction.next().is_some_and(|second| second >= 5);

    let Ok(whole) = whole.parse::<u64>() else {
        return value;
    };
    let tenths = whole * 10 + first + u64::from(round_up);
    let rounded = format!("{}.{}", tenths / 10, tenths % 10)
        .parse::<f64>()
        .unwrap_or(value.abs());

    if value.is_sign_negative() && rounded != 0.0 {
        -rounded
    } else {
        rounded
    }
}

fn saturate(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(f64::MIN, f64::MAX)
    }
}
