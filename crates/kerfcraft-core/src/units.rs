//! Unit conversion and number formatting for machine-readable output.

use crate::constants::MIL_TO_MM;

/// Convert mils (thousandths of an inch) to millimeters.
pub fn mils_to_mm(mils: f64) -> f64 {
    mils * MIL_TO_MM
}

/// Format a millimeter value with at most six decimals and no trailing zeros.
///
/// `-0` is printed as `0`.
pub fn format_mm(value: f64) -> String {
    let mut s = format!("{:.6}", value);
    if s.contains('.') {
        while s.ends_with('0') {
            s.pop();
        }
        if s.ends_with('.') {
            s.pop();
        }
    }
    if s == "-0" {
        s = "0".to_string();
    }
    s
}
