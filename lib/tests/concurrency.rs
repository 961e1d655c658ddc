mod common;

use common::three_sales;
use kc_house_price::{ModelConfig, PredictionService, RawFeatures, SaleRecord};
use std::sync::Arc;

fn doubled_prices() -> Vec<SaleRecord> {
    three_sales()
        .into_iter()
        .map(|mut r| {
            r.price *= 2.0;
            r
        })
        .collect()
}

#[test]
fn test_concurrent_predictions_share_one_model() {
    let service = Arc::new(PredictionService::new(ModelConfig::default()));
    service.build(&three_sales()).unwrap();
    let raw = RawFeatures::from_record(&three_sales()[1]);
    let expected = service.predict(&raw).unwrap();

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let service = Arc::clone(&service);
            let raw = raw.clone();
            std::thread::spawn(move || {
                (0..200)
                    .map(|_| service.predict(&raw).unwrap())
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    for handle in handles {
        for price in handle.join().unwrap() {
            assert_eq!(price, expected);
        }
    }
}

#[test]
fn test_rebuild_is_atomic_for_readers() {
    let raw = RawFeatures::from_record(&three_sales()[1]);

    let reference = PredictionService::new(ModelConfig::default());
    reference.build(&doubled_prices()).unwrap();
    let new_price = reference.predict(&raw).unwrap();

    let service = PredictionService::new(ModelConfig::default());
    service.build(&three_sales()).unwrap();
    let old_price = service.predict(&raw).unwrap();
    assert_ne!(old_price, new_price);

    std::thread::scope(|scope| {
        let readers: Vec<_> = (0..4)
            .map(|_| {
                scope.spawn(|| {
                    for _ in 0..500 {
                        let price = service.predict(&raw).unwrap();
                        assert!(
                            price == old_price || price == new_price,
                            "observed a price from neither model: {}",
                            price
                        );
                    }
                })
            })
            .collect();

        for _ in 0..20 {
            service.build(&doubled_prices()).unwrap();
            service.build(&three_sales()).unwrap();
        }
        service.build(&doubled_prices()).unwrap();

        for reader in readers {
            reader.join().unwrap();
        }
    });

    assert_eq!(service.predict(&raw).unwrap(), new_price);
}
