use time::{Date, Month};

use crate::time_utils::format_date;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatePart {
    Year,
    Month,
    Day,
}

/// Keyboard date picker. Edits one part at a time, either by stepping with
/// up/down or by typing digits.
///
/// With a minimum set, no date before it can be selected: every edit that
/// would land earlier lands on the minimum instead.
#[derive(Debug, Clone, PartialEq)]
pub struct DateInput {
    value: Option<Date>,
    min: Option<Date>,
    pub part: DatePart,
    buffer: String,
}

impl DateInput {
    pub fn new(value: Option<Date>) -> Self {
        Self {
            value,
            min: None,
            part: DatePart::Year,
            buffer: String::new(),
        }
    }

    pub fn value(&self) -> Option<Date> {
        self.value
    }

    pub fn min(&self) -> Option<Date> {
        self.min
    }

    /// Move the lower bound. A value below the new bound is raised to it.
    pub fn set_min(&mut self, min: Option<Date>) {
        self.min = min;
        self.value = self.value.map(|v| self.clamp(v));
    }

    fn clamp(&self, date: Date) -> Date {
        match self.min {
            Some(min) if date < min => min,
            _ => date,
        }
    }

    /// Select `date`, or the minimum if `date` is before it. Returns the selected date.
    pub fn select(&mut self, date: Date) -> Date {
        let date = self.clamp(date);
        self.value = Some(date);
        date
    }

    pub fn clear(&mut self) {
        self.value = None;
        self.buffer.clear();
    }

    fn current_or(&self, fallback: Date) -> Date {
        self.value.unwrap_or_else(|| self.clamp(fallback))
    }

    pub fn next_part(&mut self) {
        self.part = match self.part {
            DatePart::Year => DatePart::Month,
            DatePart::Month => DatePart::Day,
            DatePart::Day => DatePart::Year,
        };
        self.buffer.clear();
    }

    pub fn previous_part(&mut self) {
        self.part = match self.part {
            DatePart::Year => DatePart::Day,
            DatePart::Month => DatePart::Year,
            DatePart::Day => DatePart::Month,
        };
        self.buffer.clear();
    }

    /// Step the focused part by `delta`. An empty input starts from `fallback`.
    pub fn step(&mut self, delta: i32, fallback: Date) {
        let date = self.current_or(fallback);
        if self.value.is_none() {
            self.value = Some(date);
            return;
        }

        let stepped = match self.part {
            DatePart::Year => with_ymd(date.year() + delta, date.month(), date.day()),
            DatePart::Month => {
                let index = date.year() * 12 + (date.month() as i32 - 1) + delta;
                let month = Month::try_from((index.rem_euclid(12) + 1) as u8).ok();
                month.and_then(|m| with_ymd(index.div_euclid(12), m, date.day()))
            }
            DatePart::Day => date.checked_add(time::Duration::days(delta as i64)),
        };
        if let Some(stepped) = stepped {
            self.select(stepped);
        }
    }

    /// Type a digit into the focused part. The part is applied once complete.
    pub fn input_digit(&mut self, c: char, fallback: Date) {
        if !c.is_ascii_digit() {
            return;
        }
        let date = self.current_or(fallback);
        self.buffer.push(c);

        let width = match self.part {
            DatePart::Year => 4,
            DatePart::Month | DatePart::Day => 2,
        };
        if self.buffer.len() < width {
            return;
        }

        let typed: i32 = self.buffer.parse().unwrap_or(0);
        self.buffer.clear();
        let candidate = match self.part {
            DatePart::Year if (1900..=2100).contains(&typed) => {
                with_ymd(typed, date.month(), date.day())
            }
            DatePart::Month => Month::try_from(typed as u8)
                .ok()
                .filter(|_| (1..=12).contains(&typed))
                .and_then(|m| with_ymd(date.year(), m, date.day())),
            DatePart::Day if typed >= 1 => {
                let max = days_in_year_month(date.year(), date.month()) as i32;
                (typed <= max)
                    .then(|| Date::from_calendar_date(date.year(), date.month(), typed as u8).ok())
                    .flatten()
            }
            _ => None,
        };
        if let Some(candidate) = candidate {
            self.select(candidate);
            self.next_part();
        }
    }

    pub fn backspace(&mut self) {
        if self.buffer.pop().is_none() {
            self.clear();
        }
    }

    pub fn display(&self, editing: bool) -> String {
        let Some(date) = self.value else {
            return if editing && !self.buffer.is_empty() {
                format!("[{}]", self.buffer)
            } else {
                "not set".to_string()
            };
        };
        let text = format_date(date);
        if !editing {
            return text;
        }
        let marker = if self.buffer.is_empty() {
            match self.part {
                DatePart::Year => "[YYYY]".to_string(),
                DatePart::Month => "[MM]".to_string(),
                DatePart::Day => "[DD]".to_string(),
            }
        } else {
            format!("[{}]", self.buffer)
        };
        format!("{} {}", text, marker)
    }
}

fn days_in_year_month(year: i32, month: Month) -> u8 {
    match month {
        Month::April | Month::June | Month::September | Month::November => 30,
        Month::February if time::util::is_leap_year(year) => 29,
        Month::February => 28,
        _ => 31,
    }
}

/// Build a date, pulling the day back to the end of shorter months.
fn with_ymd(year: i32, month: Month, day: u8) -> Option<Date> {
    let day = day.min(days_in_year_month(year, month));
    Date::from_calendar_date(year, month, day).ok()
}
