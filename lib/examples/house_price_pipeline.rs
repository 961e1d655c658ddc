//! End-to-end King County pricing example.
//!
//! This example walks the whole workflow:
//! - Parse a small sales export
//! - Fit the pipeline (sale-day encoding, ZIP ranking, exponential transforms,
//!   standardization, cross-validated ridge)
//! - Inspect the fitted model
//! - Save it, load it back and serve predictions from the loaded copy
//!
//! Run with: cargo run --example house_price_pipeline

use kc_house_price::{ModelConfig, PredictionService, RawFeatures, SalesData, TrainedModel};
use std::error::Error;

const SALES: &str = "\
id,date,price,bedrooms,bathrooms,sqft_living,sqft_lot,floors,waterfront,view,condition,grade,sqft_above,sqft_basement,yr_built,yr_renovated,zipcode,lat,long,sqft_living15,sqft_lot15
7129300520,20141013T000000,221900,3,1,1180,5650,1,0,0,3,7,1180,0,1955,0,98178,47.5112,-122.257,1340,5650
6414100192,20141209T000000,538000,3,2.25,2570,7242,2,0,0,3,7,2170,400,1951,1991,98125,47.721,-122.319,1690,7639
5631500400,20150225T000000,180000,2,1,770,10000,1,0,0,3,6,770,0,1933,0,98028,47.7379,-122.233,2720,8062
2487200875,20141209T000000,604000,4,3,1960,5000,1,0,0,5,7,1050,910,1965,0,98136,47.5208,-122.393,1360,5000
1954400510,20150218T000000,510000,3,2,1680,8080,1,0,0,3,8,1680,0,1987,0,98074,47.6168,-122.045,1800,7503
7237550310,20140512T000000,1225000,4,4.5,5420,101930,1,1,3,3,11,3890,1530,2001,0,98053,47.6561,-122.005,4760,101930
1321400060,20140627T000000,257500,3,2.25,1715,6819,2,0,0,3,7,1715,0,1995,0,98003,47.3097,-122.327,2238,6819
2008000270,20150115T000000,291850,3,1.5,1060,9711,1,0,0,3,7,1060,0,1963,0,98198,47.4095,-122.315,1650,9711
2414600126,20150415T000000,229500,3,1,1780,7470,1,0,0,3,7,1050,730,1960,0,98146,47.5123,-122.337,1780,8113
3793500160,20150312T000000,323000,3,2.5,1890,6560,2,0,0,3,7,1890,0,2003,0,98038,47.3684,-122.031,2390,7570
1736800520,20150403T000000,662500,3,2.5,3560,9796,1,0,2,3,8,1860,1700,1965,0,98007,47.6007,-122.145,2210,8925
9212900260,20140527T000000,468000,2,1,1160,6000,1,0,0,4,7,860,300,1942,0,98115,47.69,-122.292,1330,6000
";

fn main() -> Result<(), Box<dyn Error>> {
    println!("=== King County Sale Price Pipeline ===\n");

    // 1. Parse the sales export
    let sales = SalesData::from_reader(SALES.as_bytes())?;
    println!("Training data: {} sales", sales.len());

    // 2. Fit
    let service = PredictionService::new(ModelConfig::default());
    let model = service.build(sales.records())?;

    println!("\nCross-validation (leave-one-out MSE):");
    for (alpha, mse) in model.regressor().cv_scores() {
        println!("  alpha {:>5}: {:.3e}", alpha, mse);
    }
    println!("Chosen alpha: {}", model.regressor().alpha());
    println!("Mean sale price: {:.2}", model.mean_response());

    println!("\nCoefficients (standardized units):");
    for (name, w) in model
        .schema()
        .names()
        .iter()
        .zip(model.regressor().coefficients())
    {
        println!("  {:<12} {:>12.2}", name, w);
    }

    // 3. Persist and reload
    let path = std::env::temp_dir().join("kc_price_example.bin");
    model.save_to_file(&path)?;
    let loaded = TrainedModel::load_from_file(&path)?;
    println!("\nModel saved to and reloaded from {}", path.display());

    let served = PredictionService::new(ModelConfig::default());
    served.install(loaded)?;

    // 4. Inference on a new house
    let house = RawFeatures::new()
        .with("date", "2015-05-01")
        .with("bathrooms", 2.0)
        .with("sqft_living", 1900u32)
        .with("sqft_lot", 6000u32)
        .with("waterfront", 0u8)
        .with("view", 0u8)
        .with("condition", 4u8)
        .with("grade", 8u8)
        .with("zipcode", "98115");
    println!("\nEstimated price for a 1900 sqft house in 98115: {}", served.predict(&house)?);

    println!("\nIn-sample estimates:");
    for record in sales.records() {
        println!(
            "  {} {:>10.0} -> {:>12.2}",
            record.zipcode,
            record.price,
            served.predict_record(record)?
        );
    }

    std::fs::remove_file(path).ok();
    Ok(())
}
