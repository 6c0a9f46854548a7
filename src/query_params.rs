//! Turns a raw query string into a flat map of parameters and extracts the
//! typed values the reports need.

use std::collections::HashMap;

use time::{Date, format_description::BorrowedFormatItem, macros::format_description};

use crate::{Error, calendar::DateRange, tag_report::TagId, transaction::TransactionKind};

const DATE_FORMAT: &[BorrowedFormatItem] = format_description!("[year]-[month]-[day]");

/// The decoded parameters of a request's query string.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryParams(HashMap<String, String>);

impl QueryParams {
    /// Decode `raw`, with or without its leading `?`.
    ///
    /// Percent escapes and `+` are decoded. When a key appears more than once
    /// the last value wins.
    ///
    /// # Errors
    /// Returns [Error::InvalidQueryString] if the string cannot be decoded.
    pub fn parse(raw: Option<&str>) -> Result<Self, Error> {
        let raw = raw.unwrap_or_default();
        let raw = raw.strip_prefix('?').unwrap_or(raw);

        let pairs: Vec<(String, String)> = serde_urlencoded::from_str(raw)
            .map_err(|error| Error::InvalidQueryString(error.to_string()))?;

        Ok(Self(pairs.into_iter().collect()))
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    fn require(&self, key: &str) -> Result<&str, Error> {
        self.get(key)
            .ok_or_else(|| Error::MissingParameter(key.to_owned()))
    }

    /// The `type` parameter, [TransactionKind::Income] when absent.
    pub fn kind(&self) -> Result<TransactionKind, Error> {
        match self.get("type") {
            Some(kind) => kind.parse(),
            None => Ok(TransactionKind::default()),
        }
    }

    /// The inclusive range from `startDate` to `endDate`.
    ///
    /// # Errors
    /// Both dates are required, must be formatted as `YYYY-MM-DD`, and the
    /// start may not come after the end.
    pub fn date_range(&self) -> Result<DateRange, Error> {
        let start = self.date("startDate")?;
        let end = self.date("endDate")?;

        DateRange::new(start, end).ok_or_else(|| {
            Error::invalid_parameter("startDate", format!("{start} is after endDate {end}"))
        })
    }

    /// The required integer `tagId`.
    pub fn tag_id(&self) -> Result<TagId, Error> {
        let raw = self.require("tagId")?;

        raw.trim()
            .parse()
            .map_err(|_| Error::invalid_parameter("tagId", format!("\"{raw}\" is not an integer")))
    }

    fn date(&self, key: &str) -> Result<Date, Error> {
        let raw = self.require(key)?;

        Date::parse(raw, DATE_FORMAT).map_err(|error| {
            Error::invalid_parameter(key, format!("\"{raw}\" is not a YYYY-MM-DD date: {error}"))
        })
    }
}
