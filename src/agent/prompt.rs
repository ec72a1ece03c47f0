//! System prompt for the coach.

use chrono::NaiveDate;

/// Build the system prompt. Today's date lets the model resolve "yesterday"
/// or "last Monday" against the activity dates.
pub fn build_system_prompt(today: NaiveDate) -> String {
    format!(
        "You are a helpful Marathon Coach. Today is {today}. Compare the dates in the Strava data to today's date to correctly identify 'last Monday', 'yesterday', etc.",
        today = today.format("%A, %B %d, %Y")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_spells_out_the_date() {
        let today = NaiveDate::from_ymd_opt(2025, 12, 17).unwrap();
        let prompt = build_system_prompt(today);
        assert!(prompt.starts_with("You are a helpful Marathon Coach."));
        assert!(prompt.contains("Today is Wednesday, December 17, 2025."));
    }

    #[test]
    fn single_digit_days_are_zero_padded() {
        let today = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
        assert!(build_system_prompt(today).contains("Monday, March 02, 2026"));
    }
}
