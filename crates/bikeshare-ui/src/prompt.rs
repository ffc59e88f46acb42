//! Console prompter: reads filters and yes/no answers line by line.

use std::io::{BufRead, Write};
use std::str::FromStr;

use bikeshare_core::models::{City, FilterCriteria, MonthFilter, WeekdayFilter};
use bikeshare_runtime::session::{CriteriaProvider, Question};
use tracing::{debug, warn};

use crate::render::separator;

const GREETING: &str = "Hello! Let's explore some US bikeshare data!";
const CITY_PROMPT: &str = "Please enter a city (chicago, new york city, washington): ";
const MONTH_PROMPT: &str =
    "Please enter a month (all, january, february, march, april, may, june): ";
const DAY_PROMPT: &str = "Please enter a day (all, monday, tuesday, wednesday, thursday, friday, saturday, sunday): ";
const INVALID_CHOICE: &str = "Invalid input. Please try again.";
const INVALID_YES_NO: &str = "Invalid input. Please enter 'yes' or 'no'.";

const VIEW_RAW_PROMPT: &str = "Would you like to see the raw data? Enter 'yes' or 'no': ";
const MORE_ROWS_PROMPT: &str = "Do you want to see 5 more rows? Enter 'yes' or 'no': ";
const RESTART_PROMPT: &str = "\nWould you like to restart? Enter yes or no: ";

/// [`CriteriaProvider`] over any line reader and writer.
pub struct ConsolePrompter<R, W> {
    input: R,
    out: W,
}

impl<R: BufRead, W: Write> ConsolePrompter<R, W> {
    pub fn new(input: R, out: W) -> Self {
        Self { input, out }
    }

    pub fn into_inner(self) -> (R, W) {
        (self.input, self.out)
    }

    fn say(&mut self, text: &str) {
        if let Err(e) = self.out.write_all(text.as_bytes()).and_then(|()| self.out.flush()) {
            warn!("failed to write prompt: {}", e);
        }
    }

    /// Print `prompt` and read one lowercased, trimmed answer. `None` on EOF.
    fn ask(&mut self, prompt: &str) -> Option<String> {
        self.say(prompt);
        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) => None,
            Ok(_) => Some(line.trim().to_lowercase()),
            Err(e) => {
                warn!("failed to read input: {}", e);
                None
            }
        }
    }

    /// Re-ask until the answer parses as `T`.
    fn ask_until_valid<T: FromStr>(&mut self, prompt: &str) -> Option<T> {
        loop {
            let answer = self.ask(prompt)?;
            match answer.parse::<T>() {
                Ok(value) => return Some(value),
                Err(_) => {
                    debug!("rejected input {:?}", answer);
                    self.say(&format!("{INVALID_CHOICE}\n"));
                }
            }
        }
    }

    fn ask_restart(&mut self) -> bool {
        loop {
            match self.ask(RESTART_PROMPT).as_deref() {
                Some("yes") => return true,
                Some("no") | None => return false,
                Some(_) => self.say(&format!("{INVALID_YES_NO}\n")),
            }
        }
    }
}

impl<R: BufRead, W: Write> CriteriaProvider for ConsolePrompter<R, W> {
    fn next_criteria(&mut self) -> Option<FilterCriteria> {
        self.say(&format!("{GREETING}\n"));
        let city: City = self.ask_until_valid(CITY_PROMPT)?;
        let month: MonthFilter = self.ask_until_valid(MONTH_PROMPT)?;
        let weekday: WeekdayFilter = self.ask_until_valid(DAY_PROMPT)?;
        self.say(&format!("{}\n", separator()));
        Some(FilterCriteria::new(city, month, weekday))
    }

    fn confirm(&mut self, question: Question) -> bool {
        match question {
            Question::ViewRawData => match self.ask(VIEW_RAW_PROMPT).as_deref() {
                Some("yes") => true,
                Some("no") | None => false,
                Some(_) => {
                    self.say(&format!("{INVALID_YES_NO}\n"));
                    false
                }
            },
            Question::MoreRows => self.ask(MORE_ROWS_PROMPT).as_deref() == Some("yes"),
            Question::Restart => self.ask_restart(),
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Month, Weekday};
    use std::io::Cursor;

    fn prompter(input: &str) -> ConsolePrompter<Cursor<Vec<u8>>, Vec<u8>> {
        ConsolePrompter::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    fn output(p: ConsolePrompter<Cursor<Vec<u8>>, Vec<u8>>) -> String {
        String::from_utf8(p.into_inner().1).unwrap()
    }

    // ── next_criteria ────────────────────────────────────────────────────────

    #[test]
    fn test_next_criteria_valid_input() {
        let mut p = prompter("Chicago\nMarch\nFriday\n");
        let criteria = p.next_criteria().unwrap();
        assert_eq!(criteria.city, City::Chicago);
        assert_eq!(criteria.month, MonthFilter::Only(Month::March));
        assert_eq!(criteria.weekday, WeekdayFilter::Only(Weekday::Fri));

        let out = output(p);
        assert!(out.starts_with(GREETING));
        assert!(out.contains(CITY_PROMPT));
        assert!(out.contains(DAY_PROMPT));
        assert!(out.ends_with(&format!("{}\n", "-".repeat(40))));
    }

    #[test]
    fn test_next_criteria_reprompts_on_invalid() {
        let mut p = prompter("boston\nnew york city\njuly\nall\nfunday\nall\n");
        let criteria = p.next_criteria().unwrap();
        assert_eq!(criteria.city, City::NewYorkCity);
        assert_eq!(criteria.month, MonthFilter::All);
        assert_eq!(criteria.weekday, WeekdayFilter::All);

        let out = output(p);
        assert_eq!(out.matches(INVALID_CHOICE).count(), 3);
        assert_eq!(out.matches(CITY_PROMPT).count(), 2);
    }

    #[test]
    fn test_next_criteria_eof_returns_none() {
        let mut p = prompter("washington\n");
        assert!(p.next_criteria().is_none());
        assert!(prompter("").next_criteria().is_none());
    }

    // ── confirm ──────────────────────────────────────────────────────────────

    #[test]
    fn test_confirm_view_raw_data() {
        assert!(prompter("YES\n").confirm(Question::ViewRawData));
        assert!(!prompter("no\n").confirm(Question::ViewRawData));

        let mut p = prompter("maybe\n");
        assert!(!p.confirm(Question::ViewRawData));
        assert!(output(p).contains(INVALID_YES_NO));
    }

    #[test]
    fn test_confirm_more_rows_only_yes_continues() {
        assert!(prompter("yes\n").confirm(Question::MoreRows));
        assert!(!prompter("y\n").confirm(Question::MoreRows));
        assert!(!prompter("").confirm(Question::MoreRows));
    }

    #[test]
    fn test_confirm_restart_reprompts_until_yes_or_no() {
        let mut p = prompter("sure\nnope\nYes\n");
        assert!(p.confirm(Question::Restart));
        let out = output(p);
        assert_eq!(out.matches(INVALID_YES_NO).count(), 2);
        assert_eq!(out.matches("Would you like to restart?").count(), 3);
    }

    #[test]
    fn test_confirm_restart_eof_is_no() {
        assert!(!prompter("").confirm(Question::Restart));
        assert!(!prompter("no\n").confirm(Question::Restart));
    }
}
