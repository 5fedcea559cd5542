//! Arithmetic for the task statistics report.

/// Percentage of completed tasks, rounded to one decimal place.
///
/// Returns `0.0` when there are no tasks at all.
pub fn completion_rate(completed: i64, total: i64) -> f64 {
    if total <= 0 {
        return 0.0;
    }
    let rate = completed as f64 / total as f64 * 100.0;
    (rate * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_tasks_is_zero() {
        assert_eq!(completion_rate(0, 0), 0.0);
    }

    #[test]
    fn rounds_to_one_decimal() {
        assert_eq!(completion_rate(1, 3), 33.3);
        assert_eq!(completion_rate(2, 3), 66.7);
    }

    #[test]
    fn all_done_is_hundred() {
        assert_eq!(completion_rate(4, 4), 100.0);
    }
}
