//! ZIP-code location encoding.
//!
//! King County ZIP codes are ranked by the historical average sale price of homes in
//! each code; the rank is the model's ordinal "location" feature. The table is a
//! process-wide constant built once and never mutated.

use crate::error::{PricingError, Result};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// `(zipcode, average sale price)` in ascending price order. The position is the index.
const KING_COUNTY_ZIPCODES: [(&str, f64); 66] = [
    ("98002", 234284.0),
    ("98168", 240328.4),
    ("98032", 251296.2),
    ("98001", 280804.7),
    ("98148", 284908.6),
    ("98023", 286742.8),
    ("98188", 289078.3),
    ("98003", 294111.3),
    ("98030", 296188.0),
    ("98031", 300539.9),
    ("98198", 302896.7),
    ("98055", 304262.1),
    ("98178", 310612.8),
    ("98042", 311632.1),
    ("98022", 315709.3),
    ("98106", 319581.4),
    ("98092", 334921.1),
    ("98058", 353619.1),
    ("98108", 355678.5),
    ("98146", 359496.3),
    ("98038", 366876.1),
    ("98133", 386997.4),
    ("98118", 417645.3),
    ("98056", 420895.5),
    ("98155", 423736.9),
    ("98126", 424734.6),
    ("98019", 424815.1),
    ("98014", 455617.1),
    ("98028", 462488.9),
    ("98166", 464322.4),
    ("98125", 469485.0),
    ("98070", 487480.5),
    ("98011", 490377.1),
    ("98059", 493625.3),
    ("98034", 521740.0),
    ("98065", 528003.1),
    ("98136", 551768.5),
    ("98072", 570073.5),
    ("98117", 576834.8),
    ("98107", 579109.8),
    ("98103", 585048.8),
    ("98144", 594706.5),
    ("98029", 612642.7),
    ("98027", 617054.0),
    ("98007", 617254.0),
    ("98116", 618695.1),
    ("98115", 619944.1),
    ("98122", 634558.1),
    ("98052", 645244.2),
    ("98008", 645628.2),
    ("98177", 676419.4),
    ("98053", 678275.7),
    ("98077", 682886.0),
    ("98074", 685675.8),
    ("98075", 790734.7),
    ("98199", 792187.9),
    ("98033", 803990.8),
    ("98005", 810289.7),
    ("98119", 849714.8),
    ("98006", 859938.6),
    ("98105", 863228.9),
    ("98109", 880077.8),
    ("98102", 901516.2),
    ("98112", 1096239.0),
    ("98040", 1194873.6),
    ("98004", 1356524.0),
];

static KING_COUNTY: Lazy<LocationTable> = Lazy::new(|| {
    LocationTable::from_ranked(KING_COUNTY_ZIPCODES.iter().map(|&(z, p)| (z, p)))
});

/// One row of the location table.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LocationEntry {
    pub zipcode: String,
    pub index: usize,
    pub average_price: f64,
}

/// Immutable mapping from ZIP code to dense location index.
#[derive(Debug)]
pub struct LocationTable {
    entries: Vec<LocationEntry>,
    by_zipcode: HashMap<String, usize>,
}

impl LocationTable {
    /// The King County table shared by the whole process.
    pub fn global() -> &'static LocationTable {
        &KING_COUNTY
    }

    /// Builds a table from ZIP codes already sorted by rank; indices are assigned 0, 1, 2, ...
    ///
    /// Later duplicates of an already-seen ZIP code are ignored so indices stay contiguous.
    pub fn from_ranked<'a, I>(ranked: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, f64)>,
    {
        let mut entries = Vec::new();
        let mut by_zipcode = HashMap::new();
        for (zipcode, average_price) in ranked {
            if by_zipcode.contains_key(zipcode) {
                continue;
            }
            let index = entries.len();
            by_zipcode.insert(zipcode.to_string(), index);
            entries.push(LocationEntry {
                zipcode: zipcode.to_string(),
                index,
                average_price,
            });
        }
        Self {
            entries,
            by_zipcode,
        }
    }

    /// Location index of a ZIP code.
    ///
    /// # Errors
    /// [`PricingError::Lookup`] when the ZIP code is not in the table. There is no
    /// fallback index.
    pub fn index_for(&self, zipcode: &str) -> Result<usize> {
        self.entry(zipcode).map(|e| e.index)
    }

    /// Location index of a numeric ZIP code, formatted as five digits.
    pub fn index_for_number(&self, zipcode: u32) -> Result<usize> {
        self.index_for(&format!("{:05}", zipcode))
    }

    /// Historical average sale price for a ZIP code.
    pub fn average_price(&self, zipcode: &str) -> Result<f64> {
        self.entry(zipcode).map(|e| e.average_price)
    }

    pub fn entry(&self, zipcode: &str) -> Result<&LocationEntry> {
        let key = zipcode.trim();
        self.by_zipcode
            .get(key)
            .map(|&i| &self.entries[i])
            .ok_or_else(|| PricingError::Lookup {
                zipcode: key.to_string(),
            })
    }

    pub fn contains(&self, zipcode: &str) -> bool {
        self.by_zipcode.contains_key(zipcode.trim())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in index order.
    pub fn iter(&self) -> impl Iterator<Item = &LocationEntry> {
        self.entries.iter()
    }
}
