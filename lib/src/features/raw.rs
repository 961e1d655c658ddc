//! Raw, untransformed inference inputs.
//!
//! Callers supply values in the units they naturally have: a ZIP code as text, the
//! waterfront flag as 0/1, areas in square feet. Values deserialize from JSON without
//! tags, so `{"zipcode": "98178", "grade": 7, "date": "2014-10-13"}` is a valid input.

use crate::dataset::SaleRecord;
use crate::dates::parse_sale_date;
use crate::error::{PricingError, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single raw input value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Number(f64),
    Date(NaiveDate),
    Text(String),
}

impl From<f64> for RawValue {
    fn from(v: f64) -> Self {
        RawValue::Number(v)
    }
}

impl From<i64> for RawValue {
    fn from(v: i64) -> Self {
        RawValue::Number(v as f64)
    }
}

impl From<u32> for RawValue {
    fn from(v: u32) -> Self {
        RawValue::Number(f64::from(v))
    }
}

impl From<u8> for RawValue {
    fn from(v: u8) -> Self {
        RawValue::Number(f64::from(v))
    }
}

impl From<NaiveDate> for RawValue {
    fn from(v: NaiveDate) -> Self {
        RawValue::Date(v)
    }
}

impl From<&str> for RawValue {
    fn from(v: &str) -> Self {
        RawValue::Text(v.to_string())
    }
}

impl From<String> for RawValue {
    fn from(v: String) -> Self {
        RawValue::Text(v)
    }
}

/// Named raw inputs for one prediction. Keys not used by the model are ignored.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawFeatures {
    values: BTreeMap<String, RawValue>,
}

impl RawFeatures {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: &str, value: impl Into<RawValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: &str, value: impl Into<RawValue>) -> Option<RawValue> {
        self.values.insert(key.to_string(), value.into())
    }

    pub fn remove(&mut self, key: &str) -> Option<RawValue> {
        self.values.remove(key)
    }

    pub fn get(&self, key: &str) -> Option<&RawValue> {
        self.values.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RawValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// The inference input equivalent to a training row.
    pub fn from_record(record: &SaleRecord) -> Self {
        Self::new()
            .with("date", record.date)
            .with("bathrooms", record.bathrooms)
            .with("sqft_living", record.sqft_living)
            .with("sqft_lot", record.sqft_lot)
            .with("waterfront", record.waterfront)
            .with("view", record.view)
            .with("condition", record.condition)
            .with("grade", record.grade)
            .with("zipcode", record.zipcode.trim())
    }

    /// A finite number; numeric text is accepted.
    ///
    /// # Errors
    /// [`PricingError::Schema`] if the key is absent or the value is not a finite number.
    pub fn number(&self, key: &str) -> Result<f64> {
        let value = match self.values.get(key) {
            None => return Err(PricingError::missing_field(key)),
            Some(RawValue::Number(n)) => *n,
            Some(RawValue::Text(s)) => s
                .trim()
                .parse::<f64>()
                .map_err(|_| PricingError::malformed_field(key, format!("'{}' is not a number", s)))?,
            Some(RawValue::Date(d)) => {
                return Err(PricingError::malformed_field(
                    key,
                    format!("expected a number, got date {}", d),
                ))
            }
        };
        if value.is_finite() {
            Ok(value)
        } else {
            Err(PricingError::malformed_field(key, format!("{} is not finite", value)))
        }
    }

    fn integer(&self, key: &str) -> Result<i64> {
        let value = self.number(key)?;
        if value.fract() != 0.0 || value.abs() > i32::MAX as f64 {
            return Err(PricingError::malformed_field(
                key,
                format!("{} is not a whole number", value),
            ));
        }
        Ok(value as i64)
    }

    fn optional_integer(&self, key: &str, default: i64) -> Result<i64> {
        if self.values.contains_key(key) {
            self.integer(key)
        } else {
            Ok(default)
        }
    }

    /// Canonical 5-digit ZIP code string.
    pub fn zipcode(&self) -> Result<String> {
        match self.values.get("zipcode") {
            None => Err(PricingError::missing_field("zipcode")),
            Some(RawValue::Text(s)) => {
                let zip = s.trim();
                if zip.is_empty() {
                    Err(PricingError::malformed_field("zipcode", "empty"))
                } else {
                    Ok(zip.to_string())
                }
            }
            Some(RawValue::Number(n)) => {
                if n.fract() == 0.0 && (0.0..=99_999.0).contains(n) {
                    Ok(format!("{:05}", *n as u32))
                } else {
                    Err(PricingError::malformed_field(
                        "zipcode",
                        format!("{} is not a 5-digit code", n),
                    ))
                }
            }
            Some(RawValue::Date(d)) => Err(PricingError::malformed_field(
                "zipcode",
                format!("expected a ZIP code, got date {}", d),
            )),
        }
    }

    /// The sale date, from `date` or from `sale_year` with optional `sale_month` and
    /// `sale_day_of_month` (each defaulting to 1).
    pub fn sale_date(&self) -> Result<NaiveDate> {
        if let Some(value) = self.values.get("date") {
            return match value {
                RawValue::Date(d) => Ok(*d),
                RawValue::Text(s) => parse_sale_date(s).ok_or_else(|| {
                    PricingError::malformed_field("date", format!("unrecognised date '{}'", s))
                }),
                RawValue::Number(n) if n.fract() == 0.0 && *n >= 0.0 => {
                    parse_sale_date(&format!("{}", *n as u64)).ok_or_else(|| {
                        PricingError::malformed_field("date", format!("unrecognised date {}", n))
                    })
                }
                RawValue::Number(n) => Err(PricingError::malformed_field(
                    "date",
                    format!("unrecognised date {}", n),
                )),
            };
        }

        if !self.values.contains_key("sale_year") {
            return Err(PricingError::missing_field("date"));
        }
        let year = self.integer("sale_year")?;
        let month = self.optional_integer("sale_month", 1)?;
        let day = self.optional_integer("sale_day_of_month", 1)?;
        u32::try_from(month)
            .ok()
            .zip(u32::try_from(day).ok())
            .and_then(|(m, d)| NaiveDate::from_ymd_opt(year as i32, m, d))
            .ok_or_else(|| {
                PricingError::malformed_field(
                    "date",
                    format!("{}-{}-{} is not a valid calendar date", year, month, day),
                )
            })
    }
}

impl<K: Into<String>, V: Into<RawValue>> FromIterator<(K, V)> for RawFeatures {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
