// src/data_input/csv_loader.rs

use csv::ReaderBuilder;
use log::{debug, info};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::axis_names::AXIS_NAMES;
use crate::data_input::accel_data::AccelSamples;
use crate::error::{AnalysisError, Result, ResultExt};

// Cell contents read as missing values, the same set a pandas `read_csv` uses.
const MISSING_VALUE_TOKENS: [&str; 19] = [
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// How the X, Y and Z channels are located in the input table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColumnLayout {
    /// Derive channel positions from the column count:
    /// 5 columns -> 2, 3, 4 and 4 columns -> 1, 2, 3.
    #[default]
    Inferred,
    /// Caller supplied zero-based column indices.
    Explicit { x: usize, y: usize, z: usize },
}

impl ColumnLayout {
    /// Resolves the X, Y, Z column indices for a table with `columns` columns.
    pub fn resolve(&self, columns: usize) -> Result<[usize; 3]> {
        match *self {
            ColumnLayout::Inferred => match columns {
                5 => Ok([2, 3, 4]),
                4 => Ok([1, 2, 3]),
                _ => Err(AnalysisError::UnsupportedFormat { columns }),
            },
            ColumnLayout::Explicit { x, y, z } => {
                let indices = [x, y, z];
                for (axis, &index) in indices.iter().enumerate() {
                    if index >= columns {
                        return Err(AnalysisError::ColumnOutOfRange {
                            axis: AXIS_NAMES[axis],
                            index,
                            columns,
                        });
                    }
                }
                Ok(indices)
            }
        }
    }
}

/// Loads acceleration data from a CSV file, inferring channel positions from the column count.
pub fn load_acceleration_data(input_file_path: &Path) -> Result<AccelSamples> {
    load_with_layout(input_file_path, ColumnLayout::Inferred)
}

/// Loads acceleration data from a CSV file using the given column layout.
pub fn load_with_layout(input_file_path: &Path, layout: ColumnLayout) -> Result<AccelSamples> {
    let file = File::open(input_file_path).context(format!("Opening {}", input_file_path.display()))?;
    info!("Loading acceleration data from {}", input_file_path.display());
    parse_acceleration_csv(BufReader::new(file), layout)
}

/// Parses a headed CSV table from any reader and extracts the three acceleration channels.
///
/// Empty cells, missing-value markers (`NA`, `null`, ...) and cells missing from
/// short rows are read as NaN and propagate into the analysis unchanged.
pub fn parse_acceleration_csv<R: Read>(reader: R, layout: ColumnLayout) -> Result<AccelSamples> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let header_record = reader.headers()?.clone();
    let columns = header_record.len();
    if columns == 0 {
        return Err(AnalysisError::EmptyInput);
    }
    debug!("Headers found in CSV: {:?}", header_record);

    let indices = layout.resolve(columns)?;
    for (axis, &index) in indices.iter().enumerate() {
        debug!(
            "  {} axis <- column {} ('{}')",
            AXIS_NAMES[axis],
            index,
            header_record.get(index).unwrap_or("")
        );
    }

    let mut channels: [Vec<f64>; 3] = Default::default();
    for (row_index, result) in reader.records().enumerate() {
        let record = result.context(format!("Reading data row {}", row_index + 1))?;
        // Line numbers are 1-based and the header occupies line 1.
        for (axis, &column) in indices.iter().enumerate() {
            let cell = record.get(column).unwrap_or("");
            channels[axis].push(parse_cell(cell, row_index + 2, column)?);
        }
    }

    let [x, y, z] = channels;
    if x.is_empty() {
        return Err(AnalysisError::EmptyInput);
    }
    info!("Finished reading {} data rows ({} columns).", x.len(), columns);
    AccelSamples::new(x, y, z, columns)
}

fn parse_cell(cell: &str, row: usize, column: usize) -> Result<f64> {
    if MISSING_VALUE_TOKENS.contains(&cell) {
        return Ok(f64::NAN);
    }
    cell.parse::<f64>().map_err(|_| AnalysisError::InvalidNumber {
        row,
        column,
        value: cell.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(content: &str) -> Result<AccelSamples> {
        parse_acceleration_csv(content.as_bytes(), ColumnLayout::Inferred)
    }

    #[test]
    fn test_five_columns_use_last_three() {
        let samples = parse("idx,time,ax,ay,az\n0,0.0,1.0,2.0,3.0\n1,0.1,4.0,5.0,6.0\n").unwrap();
        assert_eq!(samples.x, vec![1.0, 4.0]);
        assert_eq!(samples.y, vec![2.0, 5.0]);
        assert_eq!(samples.z, vec![3.0, 6.0]);
        assert_eq!(samples.source_columns, 5);
    }

    #[test]
    fn test_four_columns_skip_one() {
        let samples = parse("time,ax,ay,az\n0.0,1.5,-2.5,3.5\n").unwrap();
        assert_eq!(samples.x, vec![1.5]);
        assert_eq!(samples.y, vec![-2.5]);
        assert_eq!(samples.z, vec![3.5]);
        assert_eq!(samples.source_columns, 4);
    }

    #[test]
    fn test_other_column_counts_fail_with_count() {
        for (content, expected) in [
            ("a,b,c\n1,2,3\n", 3),
            ("a,b,c,d,e,f\n1,2,3,4,5,6\n", 6),
            ("a\n1\n", 1),
        ] {
            match parse(content) {
                Err(AnalysisError::UnsupportedFormat { columns }) => assert_eq!(columns, expected),
                other => panic!("expected format error, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_explicit_layout() {
        let samples = parse_acceleration_csv(
            "az,ay,ax\n3,2,1\n".as_bytes(),
            ColumnLayout::Explicit { x: 2, y: 1, z: 0 },
        )
        .unwrap();
        assert_eq!((samples.x[0], samples.y[0], samples.z[0]), (1.0, 2.0, 3.0));
    }

    #[test]
    fn test_explicit_layout_out_of_range() {
        let err = parse_acceleration_csv(
            "a,b,c\n1,2,3\n".as_bytes(),
            ColumnLayout::Explicit { x: 0, y: 1, z: 3 },
        )
        .unwrap_err();
        assert!(matches!(
            err,
            AnalysisError::ColumnOutOfRange { axis: "Z", index: 3, columns: 3 }
        ));
    }

    #[test]
    fn test_non_numeric_cell_is_reported() {
        let err = parse("t,ax,ay,az\n0,1,oops,3\n").unwrap_err();
        match err {
            AnalysisError::InvalidNumber { row, column, value } => {
                assert_eq!((row, column, value.as_str()), (2, 2, "oops"));
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_empty_and_nan_cells_propagate() {
        let samples = parse("t,ax,ay,az\n0,,NaN,1\n").unwrap();
        assert!(samples.x[0].is_nan());
        assert!(samples.y[0].is_nan());
        assert_eq!(samples.z[0], 1.0);
    }

    #[test]
    fn test_missing_value_markers_and_short_rows() {
        let samples = parse("t,ax,ay,az\n0,NA,null,-nan\n1,N/A,2\n2,3\n").unwrap();
        assert_eq!(samples.len(), 3);
        assert!(samples.x[0].is_nan() && samples.y[0].is_nan() && samples.z[0].is_nan());
        assert!(samples.x[1].is_nan());
        assert_eq!(samples.y[1], 2.0);
        assert!(samples.z[1].is_nan());
        assert_eq!(samples.x[2], 3.0);
        assert!(samples.y[2].is_nan() && samples.z[2].is_nan());
    }

    #[test]
    fn test_header_only_is_empty_input() {
        assert!(matches!(parse("t,ax,ay,az\n"), Err(AnalysisError::EmptyInput)));
        assert!(matches!(parse(""), Err(AnalysisError::EmptyInput)));
    }
}
