//! Training-data ingestion.
//!
//! The King County sales export is a CSV file with one row per historical sale. This
//! module turns it into validated [`SaleRecord`]s; the rest of the crate only ever sees
//! the parsed records.
//!
//! # Example
//!
//! ```no_run
//! use kc_house_price::dataset::SalesData;
//!
//! let data = SalesData::from_csv("kc_house_data.csv")?;
//! println!("{} sales, first price {}", data.len(), data.prices()[0]);
//! # Ok::<(), kc_house_price::PricingError>(())
//! ```

mod sales;

pub use sales::{SaleRecord, SalesData};
