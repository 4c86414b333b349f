//! Maintainability index.
//!
//! Uses the classic three-term form without the comment term:
//! `MI = 171 - 5.2 * ln(V) - 0.23 * CC - 16.2 * ln(LOC)`, clamped to
//! `[0, 100]`. An empty function is perfectly maintainable.

/// Compute the maintainability index from Halstead volume, cyclomatic
/// complexity and lines of code.
pub fn maintainability_index(volume: f64, cyclomatic: u32, lines_of_code: u32) -> f64 {
    if lines_of_code == 0 {
        return 100.0;
    }

    let volume_term = if volume > 0.0 { 5.2 * volume.ln() } else { 0.0 };
    let mi = 171.0 - volume_term - 0.23 * cyclomatic as f64 - 16.2 * (lines_of_code as f64).ln();

    if mi.is_nan() {
        return 0.0;
    }
    mi.clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_function_is_100() {
        assert_eq!(maintainability_index(500.0, 10, 0), 100.0);
    }

    #[test]
    fn test_single_line_function_clamps_to_100() {
        // 171 - 0 - 0.23 - 0 > 100
        assert_eq!(maintainability_index(0.0, 1, 1), 100.0);
    }

    #[test]
    fn test_huge_function_clamps_to_0() {
        assert_eq!(maintainability_index(1e9, 200, 5000), 0.0);
    }

    #[test]
    fn test_typical_value() {
        let mi = maintainability_index(100.0, 5, 20);
        let expected = 171.0 - 5.2 * 100f64.ln() - 0.23 * 5.0 - 16.2 * 20f64.ln();
        assert!((mi - expected).abs() < 1e-9);
        assert!(mi > 0.0 && mi < 100.0);
    }

    #[test]
    fn test_nonpositive_volume_drops_term() {
        let with_zero = maintainability_index(0.0, 3, 200);
        let expected = 171.0 - 0.23 * 3.0 - 16.2 * 200f64.ln();
        assert!(with_zero > 0.0 && with_zero < 100.0);
        assert!((with_zero - expected).abs() < 1e-9);
        assert_eq!(maintainability_index(-4.0, 3, 200), with_zero);

        // Short functions clamp to the ceiling.
        assert_eq!(maintainability_index(0.0, 3, 30), 100.0);
    }
}
