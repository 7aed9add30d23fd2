//! Canonical rendering of coefficient sequences.
//!
//! Terms are printed from the highest degree down, zero coefficients are skipped and
//! unit coefficients collapse to a bare `x` / `x^n`. Every negative term, the first
//! one included, is written as `- ` followed by its magnitude:
//!
//! ```
//! use polyeq::format::format_terms;
//!
//! assert_eq!(format_terms(&[1.0, 0.0, 2.0, 3.0], false, None), "3x^3 + 2x^2 + 1");
//! assert_eq!(format_terms(&[0.0, -1.0, 0.5], true, None), "0.5x^2 - x + C");
//! assert_eq!(format_terms(&[2.0, -3.0], false, None), "- 3x + 2");
//! ```

use itertools::Itertools;

/// Renders an ascending coefficient sequence in canonical notation.
///
/// # Arguments
/// * `terms` - Coefficients where index `i` belongs to `x^i`
/// * `show_constant` - Append the `C` marker of a pending integration constant
/// * `precision` - Number of decimals for every coefficient, or `None` for the shortest form
///
/// # Returns
/// The formatted string. The zero function without a marker renders as `0`.
pub fn format_terms(terms: &[f64], show_constant: bool, precision: Option<usize>) -> String {
    let mut parts: Vec<String> = Vec::with_capacity(terms.len() + 1);

    for (degree, &coeff) in terms.iter().enumerate().rev() {
        if coeff == 0.0 {
            continue;
        }

        let sign = match (parts.is_empty(), coeff < 0.0) {
            (_, true) => "- ",
            (true, false) => "",
            (false, false) => "+ ",
        };

        let magnitude = coeff.abs();
        let number = if degree >= 1 && magnitude == 1.0 {
            String::new()
        } else {
            format_number(magnitude, precision)
        };

        let variable = match degree {
            0 => String::new(),
            1 => "x".to_string(),
            n => format!("x^{n}"),
        };

        parts.push(format!("{sign}{number}{variable}"));
    }

    if show_constant {
        let marker = if parts.is_empty() { "C" } else { "+ C" };
        parts.push(marker.to_string());
    }

    if parts.is_empty() {
        return format_number(0.0, precision);
    }

    parts.iter().join(" ").trim_end().to_string()
}

fn format_number(value: f64, precision: Option<usize>) -> String {
    match precision {
        Some(p) => format!("{value:.p$}"),
        None => format!("{value}"),
    }
}
