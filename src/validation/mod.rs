//! Request body validation.
//!
//! Every rule that fails is recorded, so a single response lists all bad
//! fields. Error items use the `{type, value, msg, path, location}` shape
//! existing clients already parse.

pub mod auth;
pub mod subtask;
pub mod task;

use std::str::FromStr;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldError {
    #[serde(rename = "type")]
    pub kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    pub msg: String,
    pub path: String,
    pub location: &'static str,
}

impl FieldError {
    pub fn body(path: &str, value: Option<&Value>, msg: &str) -> Self {
        Self {
            kind: "field",
            value: value.cloned(),
            msg: msg.to_string(),
            path: path.to_string(),
            location: "body",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
#[error("validation failed on {} field(s)", .0.len())]
pub struct ValidationErrors(pub Vec<FieldError>);

impl ValidationErrors {
    pub fn fields(&self) -> Vec<&str> {
        self.0.iter().map(|e| e.path.as_str()).collect()
    }
}

pub struct Validator<'a> {
    body: &'a Map<String, Value>,
    errors: Vec<FieldError>,
}

impl<'a> Validator<'a> {
    pub fn new(body: &'a Map<String, Value>) -> Self {
        Self { body, errors: Vec::new() }
    }

    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn into_errors(self) -> ValidationErrors {
        ValidationErrors(self.errors)
    }

    /// Present means the key exists, even with a `null` value
    pub fn is_present(&self, field: &str) -> bool {
        self.body.contains_key(field)
    }

    fn fail(&mut self, field: &str, msg: &str) {
        let value = self.body.get(field);
        self.errors.push(FieldError::body(field, value, msg));
    }

    /// Non-empty text after trimming. Numbers are accepted as their string form.
    pub fn required_text(&mut self, field: &str, msg: &str) -> Option<String> {
        match self.body.get(field).and_then(text_of) {
            Some(text) if !text.is_empty() => Some(text),
            _ => {
                self.fail(field, msg);
                None
            }
        }
    }

    pub fn optional_text(&mut self, field: &str, msg: &str) -> Option<String> {
        if !self.is_present(field) {
            return None;
        }
        self.required_text(field, msg)
    }

    /// Free text that may be cleared with `null`
    pub fn nullable_text(&mut self, field: &str, msg: &str) -> Option<Option<String>> {
        match self.body.get(field)? {
            Value::Null => Some(None),
            value => match text_of(value) {
                Some(text) => Some(Some(text)),
                None => {
                    self.fail(field, msg);
                    None
                }
            },
        }
    }

    pub fn max_chars(&mut self, field: &str, text: Option<String>, max: usize, msg: &str) -> Option<String> {
        match text {
            Some(text) if text.chars().count() > max => {
                self.fail(field, msg);
                None
            }
            other => other,
        }
    }

    /// ISO-8601 date (`2024-01-01`) or date-time
    pub fn required_date(&mut self, field: &str, msg: &str) -> Option<DateTime<Utc>> {
        match self.body.get(field).and_then(Value::as_str).and_then(parse_iso8601) {
            Some(date) => Some(date),
            None => {
                self.fail(field, msg);
                None
            }
        }
    }

    pub fn optional_date(&mut self, field: &str, msg: &str) -> Option<DateTime<Utc>> {
        if !self.is_present(field) {
            return None;
        }
        self.required_date(field, msg)
    }

    /// Exact match against the wire names of `T`
    pub fn required_one_of<T: FromStr>(&mut self, field: &str, msg: &str) -> Option<T> {
        match self.body.get(field).and_then(Value::as_str).map(str::parse::<T>) {
            Some(Ok(value)) => Some(value),
            _ => {
                self.fail(field, msg);
                None
            }
        }
    }

    pub fn optional_one_of<T: FromStr>(&mut self, field: &str, msg: &str) -> Option<T> {
        if !self.is_present(field) {
            return None;
        }
        self.required_one_of(field, msg)
    }

    /// JSON booleans, or the strings "true"/"false"
    pub fn optional_bool(&mut self, field: &str, msg: &str) -> Option<bool> {
        let value = self.body.get(field)?;
        let parsed = match value {
            Value::Bool(b) => Some(*b),
            Value::String(s) if s == "true" => Some(true),
            Value::String(s) if s == "false" => Some(false),
            _ => None,
        };
        if parsed.is_none() {
            self.fail(field, msg);
        }
        parsed
    }

    pub fn required_email(&mut self, field: &str, msg: &str) -> Option<String> {
        match self.body.get(field).and_then(Value::as_str).map(str::trim) {
            Some(email) if looks_like_email(email) => Some(email.to_lowercase()),
            _ => {
                self.fail(field, msg);
                None
            }
        }
    }

    /// Raw (untrimmed) string with a minimum length in characters
    pub fn required_secret(&mut self, field: &str, min_chars: usize, msg: &str) -> Option<String> {
        match self.body.get(field).and_then(Value::as_str) {
            Some(secret) if secret.chars().count() >= min_chars && !secret.is_empty() => Some(secret.to_string()),
            _ => {
                // never echo secrets back
                self.errors.push(FieldError::body(field, None, msg));
                None
            }
        }
    }
}

fn text_of(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// ISO-8601 calendar dates in extended or basic form (`2024-01-01`,
/// `20240101`), reduced precision (`2024-01`, `2024`), and date-times with
/// minute or second precision and an optional `Z`/`±hh[:mm]` offset.
/// Values without an offset are read as UTC.
pub fn parse_iso8601(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    match raw.split_once(['T', 't', ' ']) {
        Some((date, time)) => parse_date_time(parse_date(date)?, time),
        None => parse_date(raw)?.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc()),
    }
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    let digits = raw.bytes().all(|b| b.is_ascii_digit());
    match raw.len() {
        10 => NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok(),
        8 if digits => {
            let extended = format!("{}-{}-{}", &raw[..4], &raw[4..6], &raw[6..]);
            NaiveDate::parse_from_str(&extended, "%Y-%m-%d").ok()
        }
        7 => NaiveDate::parse_from_str(&format!("{}-01", raw), "%Y-%m-%d").ok(),
        4 if digits => raw.parse().ok().and_then(|year| NaiveDate::from_ymd_opt(year, 1, 1)),
        _ => None,
    }
}

fn parse_date_time(date: NaiveDate, time: &str) -> Option<DateTime<Utc>> {
    let (clock, offset) = match time.find(['+', '-', 'Z', 'z']) {
        Some(at) => (&time[..at], Some(&time[at..])),
        None => (time, None),
    };
    let clock = ["%H:%M:%S%.f", "%H:%M:%S", "%H:%M"]
        .iter()
        .find_map(|format| NaiveTime::parse_from_str(clock, format).ok())?;
    let naive = date.and_time(clock);

    match offset {
        None => Some(naive.and_utc()),
        Some(offset) => naive
            .and_local_timezone(parse_offset(offset)?)
            .single()
            .map(|dt| dt.with_timezone(&Utc)),
    }
}

/// `Z`, `±hh`, `±hhmm` or `±hh:mm`
fn parse_offset(raw: &str) -> Option<FixedOffset> {
    if raw.eq_ignore_ascii_case("z") {
        return FixedOffset::east_opt(0);
    }
    let sign = match raw.as_bytes().first()? {
        b'+' => 1,
        b'-' => -1,
        _ => return None,
    };
    let digits: String = raw[1..].chars().filter(|c| *c != ':').collect();
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let (hours, minutes) = match digits.len() {
        2 => (digits.parse::<i32>().ok()?, 0),
        4 => (digits[..2].parse::<i32>().ok()?, digits[2..].parse::<i32>().ok()?),
        _ => return None,
    };
    if hours > 23 || minutes > 59 {
        return None;
    }
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

fn looks_like_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && !email.chars().any(char::is_whitespace)
        && domain.split('.').count() >= 2
        && domain.split('.').all(|label| !label.is_empty())
}

/// Body must be a JSON object; anything else is rejected before field rules run
pub fn as_object(body: &Value) -> Result<&Map<String, Value>, ValidationErrors> {
    body.as_object().ok_or_else(|| {
        ValidationErrors(vec![FieldError::body("", Some(body), "Request body must be a JSON object")])
    })
}
