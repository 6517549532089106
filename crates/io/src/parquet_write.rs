//! Low-level Parquet column building.

use std::path::Path;
use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Array, RecordBatch, StringArray, UInt32Array};
use arrow::datatypes::{DataType, Field, Schema};
use hydrobias_crossval::ResultRow;
use hydrobias_metrics::Metrics;
use parquet::arrow::ArrowWriter;
use parquet::file::properties::WriterProperties;

use crate::error::IoError;

/// Builds the Arrow schema of the results table.
///
/// `gauge_id`, `type`, `quantiles` and `fold` are required; the metric
/// columns are nullable, a null meaning the metric was unavailable.
pub(crate) fn build_schema() -> Schema {
    let mut fields = vec![
        Field::new("gauge_id", DataType::UInt32, false),
        Field::new("type", DataType::Utf8, false),
        Field::new("quantiles", DataType::Utf8, false),
        Field::new("fold", DataType::Utf8, false),
    ];
    fields.extend(
        Metrics::NAMES
            .iter()
            .map(|name| Field::new(*name, DataType::Float64, true)),
    );
    Schema::new(fields)
}

/// Converts result rows into one Arrow [`RecordBatch`] with the schema of
/// [`build_schema`].
pub(crate) fn results_to_record_batch(
    rows: &[ResultRow],
    schema: &Schema,
) -> Result<RecordBatch, IoError> {
    let gauge_col: ArrayRef = Arc::new(UInt32Array::from(
        rows.iter().map(|r| r.gauge_id).collect::<Vec<_>>(),
    ));
    let type_col: ArrayRef = Arc::new(StringArray::from(
        rows.iter()
            .map(|r| r.correction.to_string())
            .collect::<Vec<_>>(),
    ));
    let quantiles_col: ArrayRef = Arc::new(StringArray::from(
        rows.iter().map(ResultRow::quantiles_label).collect::<Vec<_>>(),
    ));
    let fold_col: ArrayRef = Arc::new(StringArray::from(
        rows.iter().map(|r| r.fold.clone()).collect::<Vec<_>>(),
    ));

    let mut columns = vec![gauge_col, type_col, quantiles_col, fold_col];
    for k in 0..Metrics::NAMES.len() {
        let values: Vec<Option<f64>> = rows.iter().map(|r| r.metrics.values()[k]).collect();
        columns.push(Arc::new(Float64Array::from(values)));
    }

    Ok(RecordBatch::try_new(Arc::new(schema.clone()), columns)?)
}

/// Writes a sequence of [`RecordBatch`]es to a Parquet file at `path`.
///
/// # Errors
///
/// Returns [`IoError::Io`] if the file cannot be created and
/// [`IoError::Parquet`] if batch writing or finalisation fails.
pub(crate) fn write_batches(
    path: &Path,
    batches: &[RecordBatch],
    schema: &Schema,
    props: WriterProperties,
) -> Result<(), IoError> {
    let file = std::fs::File::create(path)?;
    let mut writer = ArrowWriter::try_new(file, Arc::new(schema.clone()), Some(props))?;

    for batch in batches {
        writer.write(batch)?;
    }

    writer.close()?;
    Ok(())
}
