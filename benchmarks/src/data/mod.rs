//! Benchmark datasets.

mod synthetic;

pub use synthetic::SyntheticSales;
