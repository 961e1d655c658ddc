#![allow(dead_code)]

use chrono::NaiveDate;
use kc_house_price::{RawFeatures, SaleRecord};

#[allow(clippy::too_many_arguments)]
pub fn sale(
    date: (i32, u32, u32),
    bathrooms: f64,
    sqft_living: u32,
    sqft_lot: u32,
    waterfront: u8,
    view: u8,
    condition: u8,
    grade: u8,
    zipcode: &str,
    price: f64,
) -> SaleRecord {
    SaleRecord {
        date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
        price,
        bedrooms: 3,
        bathrooms,
        sqft_living,
        sqft_lot,
        floors: 1.0,
        waterfront,
        view,
        condition,
        grade,
        sqft_above: sqft_living,
        yr_built: 1960,
        zipcode: zipcode.to_string(),
        ..Default::default()
    }
}

/// Three sales in which every model column varies.
pub fn three_sales() -> Vec<SaleRecord> {
    vec![
        sale((2014, 5, 2), 1.0, 1180, 5650, 0, 0, 3, 7, "98178", 221900.0),
        sale((2014, 12, 9), 2.25, 2570, 7242, 0, 1, 4, 8, "98125", 538000.0),
        sale((2015, 2, 25), 3.0, 3560, 9796, 1, 3, 5, 10, "98004", 1350000.0),
    ]
}

/// The smallest house imaginable in the cheapest ZIP code on the epoch date.
pub fn bare_lot() -> RawFeatures {
    RawFeatures::new()
        .with("date", "2014-01-01")
        .with("bathrooms", 0.0)
        .with("sqft_living", 0.0)
        .with("sqft_lot", 0.0)
        .with("waterfront", 0.0)
        .with("view", 0.0)
        .with("condition", 1.0)
        .with("grade", 1.0)
        .with("zipcode", "98002")
}

pub const SALES_HEADER: &str = "id,date,price,bedrooms,bathrooms,sqft_living,sqft_lot,floors,waterfront,view,condition,grade,sqft_above,sqft_basement,yr_built,yr_renovated,zipcode,lat,long,sqft_living15,sqft_lot15";

pub const SALES_ROWS: [&str; 3] = [
    "7129300520,20140502T000000,221900,3,1,1180,5650,1,0,0,3,7,1180,0,1955,0,98178,47.5112,-122.257,1340,5650",
    "6414100192,20141209T000000,538000,3,2.25,2570,7242,2,0,1,4,8,2170,400,1951,1991,98125,47.721,-122.319,1690,7639",
    "2524049179,20150225T000000,1350000,4,3,3560,9796,1,1,3,5,10,1860,1700,1965,0,98004,47.5208,-122.393,2210,8925",
];

pub fn sales_csv() -> String {
    let mut text = String::from(SALES_HEADER);
    for row in SALES_ROWS {
        text.push('\n');
        text.push_str(row);
    }
    text.push('\n');
    text
}
