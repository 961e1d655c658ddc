use crate::config::TrainingDataConfig;
use crate::dates::parse_sale_date;
use crate::error::{PricingError, Result};
use chrono::NaiveDate;
use serde::{de, Deserialize, Deserializer, Serialize};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::{debug, info};

/// One historical King County sale.
///
/// Field names follow the sales export header; `lat`/`long` and `List price` are
/// renamed to Rust-friendly names.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SaleRecord {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(deserialize_with = "deserialize_sale_date")]
    pub date: NaiveDate,
    /// Final sale price.
    pub price: f64,
    pub bedrooms: u32,
    pub bathrooms: f64,
    pub sqft_living: u32,
    pub sqft_lot: u32,
    pub floors: f64,
    /// 1 if the property is on the waterfront, 0 otherwise.
    pub waterfront: u8,
    pub view: u8,
    /// 1 (poor) through 5 (excellent).
    pub condition: u8,
    /// 1 through 15.
    pub grade: u8,
    pub sqft_above: u32,
    pub sqft_basement: u32,
    pub yr_built: u16,
    /// 0 if never renovated.
    pub yr_renovated: u16,
    pub zipcode: String,
    #[serde(rename = "lat", alias = "latitude")]
    pub latitude: f64,
    #[serde(rename = "long", alias = "longitude")]
    pub longitude: f64,
    pub sqft_living15: u32,
    pub sqft_lot15: u32,
    #[serde(rename = "List price", alias = "list_price", default)]
    pub list_price: Option<f64>,
}

fn deserialize_sale_date<'de, D>(deserializer: D) -> std::result::Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let text = String::deserialize(deserializer)?;
    parse_sale_date(&text)
        .ok_or_else(|| de::Error::custom(format!("unrecognised sale date '{}'", text)))
}

impl SaleRecord {
    /// Checks the value ranges the model relies on.
    pub fn validate(&self) -> Result<()> {
        if !(self.price.is_finite() && self.price > 0.0) {
            return Err(PricingError::Schema(format!(
                "price must be positive, got {}",
                self.price
            )));
        }
        if !(1..=5).contains(&self.condition) {
            return Err(PricingError::Schema(format!(
                "condition must be 1-5, got {}",
                self.condition
            )));
        }
        if !(1..=15).contains(&self.grade) {
            return Err(PricingError::Schema(format!(
                "grade must be 1-15, got {}",
                self.grade
            )));
        }
        if self.waterfront > 1 {
            return Err(PricingError::Schema(format!(
                "waterfront must be 0 or 1, got {}",
                self.waterfront
            )));
        }
        if !self.bathrooms.is_finite() || self.bathrooms < 0.0 {
            return Err(PricingError::Schema(format!(
                "bathrooms must be non-negative, got {}",
                self.bathrooms
            )));
        }
        if self.zipcode.trim().is_empty() {
            return Err(PricingError::Schema("zipcode is empty".to_string()));
        }
        Ok(())
    }
}

/// Parsed, validated sales history.
#[derive(Clone, Debug, Default)]
pub struct SalesData {
    records: Vec<SaleRecord>,
}

impl SalesData {
    pub fn new(records: Vec<SaleRecord>) -> Self {
        Self { records }
    }

    /// Loads the file named by a training-data configuration.
    pub fn from_config(config: &TrainingDataConfig) -> Result<Self> {
        Self::from_csv(config.resolve()?)
    }

    /// Loads a sales export from disk.
    ///
    /// # Errors
    /// - [`PricingError::Configuration`] if the file cannot be opened.
    /// - [`PricingError::Schema`] if any row is malformed or out of range.
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            PricingError::Configuration(format!(
                "cannot open training data {}: {}",
                path.display(),
                e
            ))
        })?;
        info!(path = %path.display(), "reading sales data");
        Self::from_reader(BufReader::new(file))
    }

    /// Parses CSV text with a header row.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);

        let mut records = Vec::new();
        for (row, result) in rdr.deserialize::<SaleRecord>().enumerate() {
            let record = result?;
            record.validate().map_err(|e| {
                PricingError::Schema(format!("data row {}: {}", row + 1, e))
            })?;
            records.push(record);
        }

        debug!(rows = records.len(), "parsed sales records");
        Ok(Self { records })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[SaleRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<SaleRecord> {
        self.records
    }

    pub fn prices(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.price).collect()
    }

    pub fn zipcodes(&self) -> Vec<&str> {
        self.records.iter().map(|r| r.zipcode.as_str()).collect()
    }

    /// Splits in record order into `(train, test)`.
    pub fn split(&self, train_ratio: f64) -> (Self, Self) {
        let ratio = train_ratio.clamp(0.0, 1.0);
        let n_train = (self.records.len() as f64 * ratio) as usize;
        (
            Self::new(self.records[..n_train].to_vec()),
            Self::new(self.records[n_train..].to_vec()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use std::io::Write;

    const HEADER: &str = "id,date,price,bedrooms,bathrooms,sqft_living,sqft_lot,floors,waterfront,view,condition,grade,sqft_above,sqft_basement,yr_built,yr_renovated,zipcode,lat,long,sqft_living15,sqft_lot15,List price";

    fn sample_csv() -> String {
        format!(
            "{}\n{}\n{}\n",
            HEADER,
            "7129300520,20141013T000000,221900,3,1,1180,5650,1,0,0,3,7,1180,0,1955,0,98178,47.5112,-122.257,1340,5650,225000",
            "6414100192,20141209T000000,538000,3,2.25,2570,7242,2,0,0,3,7,2170,400,1951,1991,98125,47.721,-122.319,1690,7639,529000"
        )
    }

    #[test]
    fn test_from_reader_parses_rows() {
        let data = SalesData::from_reader(sample_csv().as_bytes()).unwrap();
        assert_eq!(data.len(), 2);
        let first = &data.records()[0];
        assert_eq!(first.date, NaiveDate::from_ymd_opt(2014, 10, 13).unwrap());
        assert_eq!(first.zipcode, "98178");
        assert_eq!(first.sqft_living, 1180);
        assert_eq!(first.list_price, Some(225000.0));
        assert!((first.latitude - 47.5112).abs() < 1e-9);
        assert_eq!(data.records()[1].yr_renovated, 1991);
        assert_eq!(data.prices(), vec![221900.0, 538000.0]);
        assert_eq!(data.zipcodes(), vec!["98178", "98125"]);
    }

    #[test]
    fn test_list_price_column_is_optional() {
        let header = HEADER.trim_end_matches(",List price");
        let csv = format!(
            "{}\n{}\n",
            header,
            "1,2014-05-02,221900,3,1,1180,5650,1,0,0,3,7,1180,0,1955,0,98178,47.5,-122.2,1340,5650"
        );
        let data = SalesData::from_reader(csv.as_bytes()).unwrap();
        assert_eq!(data.records()[0].list_price, None);
    }

    #[test]
    fn test_malformed_row_is_schema_error() {
        let csv = format!(
            "{}\n{}\n",
            HEADER,
            "1,20141013T000000,not-a-price,3,1,1180,5650,1,0,0,3,7,1180,0,1955,0,98178,47.5,-122.2,1340,5650,0"
        );
        let err = SalesData::from_reader(csv.as_bytes()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Schema);
    }

    #[test]
    fn test_bad_date_is_schema_error() {
        let csv = format!(
            "{}\n{}\n",
            HEADER,
            "1,someday,221900,3,1,1180,5650,1,0,0,3,7,1180,0,1955,0,98178,47.5,-122.2,1340,5650,0"
        );
        let err = SalesData::from_reader(csv.as_bytes()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Schema);
        assert!(err.to_string().contains("someday"));
    }

    #[test]
    fn test_out_of_range_condition_is_rejected() {
        let csv = format!(
            "{}\n{}\n",
            HEADER,
            "1,20141013T000000,221900,3,1,1180,5650,1,0,0,9,7,1180,0,1955,0,98178,47.5,-122.2,1340,5650,0"
        );
        let err = SalesData::from_reader(csv.as_bytes()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Schema);
        assert!(err.to_string().contains("data row 1"));
    }

    #[test]
    fn test_missing_file_is_configuration_error() {
        let err = SalesData::from_csv("/definitely/not/here/sales.csv").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn test_from_csv_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(sample_csv().as_bytes()).unwrap();
        file.flush().unwrap();
        let data = SalesData::from_csv(file.path()).unwrap();
        assert_eq!(data.len(), 2);
    }

    #[test]
    fn test_validate_ranges() {
        let good = SaleRecord {
            price: 100_000.0,
            condition: 3,
            grade: 7,
            zipcode: "98002".to_string(),
            ..Default::default()
        };
        assert!(good.validate().is_ok());
        assert!(SaleRecord { grade: 0, ..good.clone() }.validate().is_err());
        assert!(SaleRecord { waterfront: 2, ..good.clone() }.validate().is_err());
        assert!(SaleRecord { price: 0.0, ..good.clone() }.validate().is_err());
        assert!(SaleRecord { zipcode: " ".into(), ..good }.validate().is_err());
    }

    #[test]
    fn test_split() {
        let data = SalesData::from_reader(sample_csv().as_bytes()).unwrap();
        let (train, test) = data.split(0.5);
        assert_eq!(train.len(), 1);
        assert_eq!(test.len(), 1);
        let (all, none) = data.split(2.0);
        assert_eq!(all.len(), 2);
        assert!(none.is_empty());
    }
}
