//! Available-copies reconciliation
//!
//! While a book is being edited, changing its total copy count moves the
//! available count by the difference from the total the form was loaded
//! with. The loaded total never moves during an edit session; the available
//! count is whatever the form currently holds.

/// Parse an integer the way a browser form field is read: leading
/// whitespace is skipped, an optional sign and the leading digits are
/// taken, trailing garbage is ignored. Anything without digits reads as 0.
pub fn parse_int_lenient(input: &str) -> i64 {
    let s = input.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let end = digits
        .bytes()
        .position(|b| !b.is_ascii_digit())
        .unwrap_or(digits.len());

    match digits[..end].parse::<i64>() {
        Ok(value) if negative => -value,
        Ok(value) => value,
        Err(_) => 0,
    }
}

/// Total copy count recorded when a book form is loaded from the server
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CopiesBaseline {
    total: i64,
}

impl CopiesBaseline {
    pub fn new(total: i64) -> Self {
        Self { total }
    }

    pub fn total(&self) -> i64 {
        self.total
    }

    /// Available copies after the total changes to `new_total`, never below
    /// zero. `None` when the total matches the loaded one and the available
    /// count stays as it is.
    pub fn reconcile(&self, current_available: i64, new_total: i64) -> Option<i64> {
        let delta = new_total.saturating_sub(self.total);
        if delta == 0 {
            return None;
        }
        Some(current_available.saturating_add(delta).max(0))
    }

    /// Same as [`reconcile`](Self::reconcile), reading both counts from raw field input
    pub fn reconcile_input(&self, available_input: &str, total_input: &str) -> Option<i64> {
        self.reconcile(
            parse_int_lenient(available_input),
            parse_int_lenient(total_input),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_growing_total_adds_copies() {
        let baseline = CopiesBaseline::new(5);
        assert_eq!(baseline.reconcile(2, 8), Some(5));
    }

    #[test]
    fn test_shrinking_total_floors_at_zero() {
        let baseline = CopiesBaseline::new(5);
        assert_eq!(baseline.reconcile(2, 1), Some(0));
        assert_eq!(baseline.reconcile(2, 3), Some(0));
        assert_eq!(baseline.reconcile(2, 4), Some(1));
    }

    #[test]
    fn test_unchanged_total_leaves_available_alone() {
        let baseline = CopiesBaseline::new(5);
        assert_eq!(baseline.reconcile(2, 5), None);
        assert_eq!(baseline.reconcile_input("3", " 5"), None);
    }

    #[test]
    fn test_unparsable_total_reads_as_zero() {
        let baseline = CopiesBaseline::new(5);
        assert_eq!(baseline.reconcile_input("2", "abc"), Some(0));
        assert_eq!(baseline.reconcile_input("2", ""), Some(0));

        let baseline = CopiesBaseline::new(3);
        assert_eq!(baseline.reconcile_input("7", "many"), Some(4));
    }

    #[test]
    fn test_delta_applies_to_current_available() {
        let baseline = CopiesBaseline::new(5);
        // Available edited from 2 to 3 before the total changes
        assert_eq!(baseline.reconcile_input("3", "6"), Some(4));
        // Delta is still measured from the loaded total of 5
        assert_eq!(baseline.reconcile_input("4", "7"), Some(6));
    }

    #[test]
    fn test_never_negative_for_any_total() {
        for total in 0..20 {
            let baseline = CopiesBaseline::new(total);
            for available in 0..=total {
                for new_total in 0..40 {
                    match baseline.reconcile(available, new_total) {
                        Some(result) => {
                            assert!(result >= 0);
                            assert_eq!(result, (available + new_total - total).max(0));
                        }
                        None => assert_eq!(new_total, total),
                    }
                }
            }
        }
    }

    #[test]
    fn test_parse_int_lenient() {
        assert_eq!(parse_int_lenient("12"), 12);
        assert_eq!(parse_int_lenient("  7 "), 7);
        assert_eq!(parse_int_lenient("12abc"), 12);
        assert_eq!(parse_int_lenient("-3"), -3);
        assert_eq!(parse_int_lenient("+4"), 4);
        assert_eq!(parse_int_lenient("abc"), 0);
        assert_eq!(parse_int_lenient("-"), 0);
        assert_eq!(parse_int_lenient(""), 0);
        assert_eq!(parse_int_lenient("99999999999999999999999"), 0);
    }
}
