//! Assembles ordered feature rows from sale records and raw inference inputs.

use crate::dataset::SaleRecord;
use crate::dates::DateEncoder;
use crate::error::{PricingError, Result};
use crate::features::{Feature, FeatureSchema, RawFeatures};
use crate::location::LocationTable;
use ndarray::{Array1, Array2};
use tracing::debug;

/// Turns records or raw inputs into feature rows following a [`FeatureSchema`].
///
/// Every row is produced by walking the schema's columns in order: the raw value of the
/// column's feature is looked up, then the column's transform is applied.
#[derive(Clone, Debug)]
pub struct FeatureBuilder<'a> {
    schema: &'a FeatureSchema,
    dates: DateEncoder,
    locations: &'a LocationTable,
}

impl<'a> FeatureBuilder<'a> {
    /// A builder over `schema` using the default date encoder and the global location table.
    pub fn new(schema: &'a FeatureSchema) -> Self {
        Self {
            schema,
            dates: DateEncoder::default(),
            locations: LocationTable::global(),
        }
    }

    pub fn with_locations(mut self, locations: &'a LocationTable) -> Self {
        self.locations = locations;
        self
    }

    pub fn with_dates(mut self, dates: DateEncoder) -> Self {
        self.dates = dates;
        self
    }

    pub fn schema(&self) -> &FeatureSchema {
        self.schema
    }

    /// Builds the training matrix (one row per record, schema column order) and the
    /// response vector of sale prices.
    ///
    /// # Errors
    /// - [`PricingError::Precondition`] if `records` is empty.
    /// - [`PricingError::Lookup`] if a record's ZIP code is not in the location table.
    /// - [`PricingError::Schema`] if a transformed value is not finite.
    pub fn build_training_matrix(
        &self,
        records: &[SaleRecord],
    ) -> Result<(Array2<f64>, Array1<f64>)> {
        if records.is_empty() {
            return Err(PricingError::Precondition(
                "cannot build a model from zero training records".to_string(),
            ));
        }

        let n_cols = self.schema.len();
        let mut data = Vec::with_capacity(records.len() * n_cols);
        for record in records {
            for column in self.schema.columns() {
                let raw = self.record_value(column.feature, record)?;
                data.push(finite(column.feature, column.transform.apply(raw))?);
            }
        }

        let x = Array2::from_shape_vec((records.len(), n_cols), data)
            .map_err(|e| PricingError::Schema(e.to_string()))?;
        let y = records.iter().map(|r| r.price).collect::<Array1<f64>>();

        debug!(rows = records.len(), cols = n_cols, "built training matrix");
        Ok((x, y))
    }

    /// Builds one inference row from raw inputs, in schema column order.
    ///
    /// # Errors
    /// - [`PricingError::Schema`] if a required input is absent or malformed.
    /// - [`PricingError::Lookup`] if the ZIP code is not in the location table.
    pub fn build_inference_vector(&self, raw: &RawFeatures) -> Result<Array1<f64>> {
        let mut row = Vec::with_capacity(self.schema.len());
        for column in self.schema.columns() {
            let value = self.raw_value(column.feature, raw)?;
            row.push(finite(column.feature, column.transform.apply(value))?);
        }
        Ok(Array1::from(row))
    }

    fn record_value(&self, feature: Feature, record: &SaleRecord) -> Result<f64> {
        Ok(match feature {
            Feature::SaleDay => self.dates.sale_day(record.date) as f64,
            Feature::Bathrooms => record.bathrooms,
            Feature::SqftLiving => f64::from(record.sqft_living),
            Feature::SqftLot => f64::from(record.sqft_lot),
            Feature::Waterfront => f64::from(record.waterfront),
            Feature::View => f64::from(record.view),
            Feature::Condition => f64::from(record.condition),
            Feature::Grade => f64::from(record.grade),
            Feature::Location => self.locations.index_for(&record.zipcode)? as f64,
        })
    }

    fn raw_value(&self, feature: Feature, raw: &RawFeatures) -> Result<f64> {
        match feature {
            Feature::SaleDay => Ok(self.dates.sale_day(raw.sale_date()?) as f64),
            Feature::Location => Ok(self.locations.index_for(&raw.zipcode()?)? as f64),
            other => raw.number(other.name()),
        }
    }
}

fn finite(feature: Feature, value: f64) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(PricingError::malformed_field(
            feature.name(),
            "value overflows after transformation",
        ))
    }
}
