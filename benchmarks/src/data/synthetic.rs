use chrono::{Duration, NaiveDate};
use kc_house_price::{LocationTable, SaleRecord, SalesData};
use rand::{rngs::StdRng, Rng, SeedableRng};

/// First and last sale dates in the King County export.
const FIRST_SALE: (i32, u32, u32) = (2014, 5, 2);
const SALE_WINDOW_DAYS: i64 = 390;

/// Deterministic generator of King County-like sales.
///
/// Prices follow the ZIP code average from the location table, scaled by living
/// area, grade, condition and waterfront, with multiplicative noise. The same seed
/// always yields the same records, so benchmark runs are comparable.
///
/// # Example
///
/// ```
/// use benchmarks::data::SyntheticSales;
///
/// let sales = SyntheticSales::new(42).generate(500);
/// assert_eq!(sales.len(), 500);
/// ```
#[derive(Debug, Clone)]
pub struct SyntheticSales {
    seed: u64,
    noise: f64,
}

impl SyntheticSales {
    pub fn new(seed: u64) -> Self {
        Self { seed, noise: 0.15 }
    }

    /// Relative spread of the price noise (default 0.15).
    pub fn with_noise(mut self, noise: f64) -> Self {
        self.noise = noise.max(0.0);
        self
    }

    pub fn generate(&self, n: usize) -> SalesData {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let table = LocationTable::global();
        let zipcodes: Vec<(&str, f64)> = table
            .iter()
            .map(|entry| (entry.zipcode.as_str(), entry.average_price))
            .collect();
        let first_sale = NaiveDate::from_ymd_opt(FIRST_SALE.0, FIRST_SALE.1, FIRST_SALE.2)
            .unwrap_or_default();

        let records = (0..n)
            .map(|i| {
                let (zipcode, zip_price) = zipcodes[rng.gen_range(0..zipcodes.len())];
                let sqft_living: u32 = rng.gen_range(600..5500);
                let sqft_lot: u32 = sqft_living + rng.gen_range(500..40_000);
                let grade: u8 = rng.gen_range(5..=12);
                let condition: u8 = rng.gen_range(1..=5);
                // every batch of 25 carries one waterfront sale
                let waterfront: u8 = u8::from(i % 25 == 0 || rng.gen_bool(0.01));
                let view: u8 = if waterfront == 1 {
                    rng.gen_range(2..=4)
                } else {
                    rng.gen_range(0..=2)
                };
                let bathrooms = f64::from(rng.gen_range(2u8..=18)) * 0.25;
                let floors = f64::from(rng.gen_range(2u8..=6)) * 0.5;
                let yr_built: u16 = rng.gen_range(1900..=2014);

                let size = (f64::from(sqft_living) / 2000.0).powf(0.8);
                let quality = 1.12f64.powi(i32::from(grade) - 7)
                    * (1.0 + 0.04 * (f64::from(condition) - 3.0));
                let shore = if waterfront == 1 { 1.8 } else { 1.0 };
                let noise = 1.0 + self.noise * (rng.gen::<f64>() * 2.0 - 1.0);
                let price = (zip_price * size * quality * shore * noise).max(75_000.0).round();

                SaleRecord {
                    id: Some(1_000_000_000 + i as u64),
                    date: first_sale + Duration::days(rng.gen_range(0..SALE_WINDOW_DAYS)),
                    price,
                    bedrooms: rng.gen_range(1..=6),
                    bathrooms,
                    sqft_living,
                    sqft_lot,
                    floors,
                    waterfront,
                    view,
                    condition,
                    grade,
                    sqft_above: sqft_living,
                    sqft_basement: 0,
                    yr_built,
                    yr_renovated: 0,
                    zipcode: zipcode.to_string(),
                    latitude: 47.2 + rng.gen::<f64>() * 0.6,
                    longitude: -122.5 + rng.gen::<f64>() * 0.7,
                    sqft_living15: sqft_living,
                    sqft_lot15: sqft_lot,
                    list_price: None,
                }
            })
            .collect();

        SalesData::new(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generation_is_deterministic() {
        let a = SyntheticSales::new(7).generate(200);
        let b = SyntheticSales::new(7).generate(200);
        assert_eq!(a.records(), b.records());

        let c = SyntheticSales::new(8).generate(200);
        assert_ne!(a.records(), c.records());
    }

    #[test]
    fn test_records_are_valid() {
        let sales = SyntheticSales::new(1).generate(300);
        for record in sales.records() {
            record.validate().unwrap();
            assert!(LocationTable::global().contains(&record.zipcode));
        }
        assert!(sales.records().iter().any(|r| r.waterfront == 1));
    }
}
