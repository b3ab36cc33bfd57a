use crate::dataset::error::DatasetError;
use crate::dataset::record::*;
use log::{info, warn};
use polars::prelude::*;
use std::path::Path;

/// Cell texts read as missing, on top of empty cells: the common spreadsheet
/// and dataframe spellings of "no value".
const NULL_LITERALS: [&str; 18] = [
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// The cleaned historical weather record, in file order.
///
/// Loading drops every row with a missing field and every exact duplicate row
/// (keeping the first occurrence). Nothing is cached: each call to
/// [`HistoricalDataset::load`] reads the file again.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct HistoricalDataset {
    records: Vec<HistoricalRecord>,
}

impl HistoricalDataset {
    /// Reads and cleans the CSV file at `path`.
    ///
    /// The header must name exactly the columns `MinTemp, MaxTemp, WindGustDir,
    /// WindGustSpeed, Humidity, Pressure, Temp, RainTomorrow`, in any order.
    /// Numeric cells that do not parse as numbers count as missing.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::NotFound`] if there is no file at `path`,
    /// [`DatasetError::Schema`] if the column set differs, and
    /// [`DatasetError::CsvRead`] if the file cannot be parsed as CSV.
    pub fn load(path: &Path) -> Result<Self, DatasetError> {
        if !path.is_file() {
            warn!("Historical dataset {:?} does not exist", path);
            return Err(DatasetError::NotFound(path.to_path_buf()));
        }

        let raw = Self::read_csv(path)?;
        Self::check_schema(path, &raw)?;
        let raw_rows = raw.height();

        let cleaned = Self::clean(raw)?;
        let records = Self::frame_to_records(&cleaned)?;
        info!(
            "Loaded {} historical records from {:?} ({} dropped as incomplete or duplicate)",
            records.len(),
            path,
            raw_rows - records.len()
        );
        Ok(Self { records })
    }

    /// Wraps records that are already clean. No filtering is applied.
    pub fn from_records(records: Vec<HistoricalRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[HistoricalRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All values of one numeric column, in record order.
    pub fn values(&self, field: NumericField) -> Vec<f64> {
        self.records.iter().map(|r| r.value(field)).collect()
    }

    fn read_csv(path: &Path) -> Result<DataFrame, DatasetError> {
        CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(None) // scan every row, columns may switch int -> float late
            .map_parse_options(|options| {
                let literals = NULL_LITERALS.iter().map(|&literal| literal.into()).collect();
                options.with_null_values(Some(NullValues::AllColumns(literals)))
            })
            .try_into_reader_with_file_path(Some(path.to_path_buf()))
            .map_err(|e| DatasetError::CsvRead(path.to_path_buf(), e))?
            .finish()
            .map_err(|e| DatasetError::CsvRead(path.to_path_buf(), e))
    }

    fn check_schema(path: &Path, df: &DataFrame) -> Result<(), DatasetError> {
        let found: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|name| name.to_string())
            .collect();

        let missing: Vec<String> = SCHEMA_COLUMNS
            .into_iter()
            .filter(|column| !found.iter().any(|name| name == column))
            .map(str::to_string)
            .collect();
        let unexpected: Vec<String> = found
            .iter()
            .filter(|name| !SCHEMA_COLUMNS.contains(&name.as_str()))
            .cloned()
            .collect();

        if missing.is_empty() && unexpected.is_empty() {
            return Ok(());
        }
        warn!(
            "Rejecting historical dataset {:?}: missing columns {:?}, unexpected columns {:?}",
            path, missing, unexpected
        );
        Err(DatasetError::Schema {
            path: path.to_path_buf(),
            missing,
            unexpected,
        })
    }

    /// Casts every column to its canonical type, then drops incomplete and duplicate rows.
    fn clean(df: DataFrame) -> Result<DataFrame, DatasetError> {
        let columns: Vec<Expr> = SCHEMA_COLUMNS
            .into_iter()
            .map(|name| {
                let dtype = if name == COL_WIND_GUST_DIR || name == COL_RAIN_TOMORROW {
                    DataType::String
                } else {
                    DataType::Float64
                };
                // non-strict cast: unparsable cells become null and are dropped below
                col(name).cast(dtype)
            })
            .collect();

        let cleaned = df
            .lazy()
            .select(columns)
            .drop_nulls(None)
            .filter(all_numbers())
            .unique_stable(None, UniqueKeepStrategy::First)
            .collect()?;
        Ok(cleaned)
    }

    fn frame_to_records(df: &DataFrame) -> Result<Vec<HistoricalRecord>, DatasetError> {
        let min_temp = float_column(df, COL_MIN_TEMP)?;
        let max_temp = float_column(df, COL_MAX_TEMP)?;
        let wind_gust_dir = string_column(df, COL_WIND_GUST_DIR)?;
        let wind_gust_speed = float_column(df, COL_WIND_GUST_SPEED)?;
        let humidity = float_column(df, COL_HUMIDITY)?;
        let pressure = float_column(df, COL_PRESSURE)?;
        let temp = float_column(df, COL_TEMP)?;
        let rain_tomorrow = string_column(df, COL_RAIN_TOMORROW)?;

        (0..df.height())
            .map(|row| {
                Ok(HistoricalRecord {
                    min_temp: required(min_temp.get(row), COL_MIN_TEMP, row)?,
                    max_temp: required(max_temp.get(row), COL_MAX_TEMP, row)?,
                    wind_gust_dir: required(wind_gust_dir.get(row), COL_WIND_GUST_DIR, row)?
                        .to_string(),
                    wind_gust_speed: required(wind_gust_speed.get(row), COL_WIND_GUST_SPEED, row)?,
                    humidity: required(humidity.get(row), COL_HUMIDITY, row)?,
                    pressure: required(pressure.get(row), COL_PRESSURE, row)?,
                    temp: required(temp.get(row), COL_TEMP, row)?,
                    rain_tomorrow: required(rain_tomorrow.get(row), COL_RAIN_TOMORROW, row)?
                        .to_string(),
                })
            })
            .collect()
    }
}

/// `true` for rows whose numeric cells are all real numbers, not NaN.
fn all_numbers() -> Expr {
    NumericField::ALL
        .into_iter()
        .map(|field| col(field.column_name()).is_not_nan())
        .fold(lit(true), |acc, is_number| acc.and(is_number))
}

fn get_column<'a>(df: &'a DataFrame, name: &str) -> Result<&'a Column, DatasetError> {
    df.column(name)
        .map_err(|e| DatasetError::ColumnNotFound(name.to_string(), e))
}

fn float_column<'a>(df: &'a DataFrame, name: &str) -> Result<&'a Float64Chunked, DatasetError> {
    Ok(get_column(df, name)?.f64()?)
}

fn string_column<'a>(df: &'a DataFrame, name: &str) -> Result<&'a StringChunked, DatasetError> {
    Ok(get_column(df, name)?.str()?)
}

fn required<T>(value: Option<T>, column: &str, row: usize) -> Result<T, DatasetError> {
    value.ok_or_else(|| DatasetError::MissingValue {
        column: column.to_string(),
        row,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const HEADER: &str = "MinTemp,MaxTemp,WindGustDir,WindGustSpeed,Humidity,Pressure,Temp,RainTomorrow";

    fn write_csv(lines: &[&str]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        for line in lines {
            writeln!(file, "{line}").unwrap();
        }
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_keeps_file_order() -> Result<(), DatasetError> {
        let file = write_csv(&[
            HEADER,
            "13.4,22.9,W,44,71,1007.7,21.8,No",
            "7.4,25.1,WNW,44,44,1010.6,24.3,No",
            "12.9,25.7,WSW,46,38,1007.6,23.2,Yes",
        ]);
        let dataset = HistoricalDataset::load(file.path())?;
        assert_eq!(dataset.len(), 3);
        assert_eq!(dataset.values(NumericField::Temp), vec![21.8, 24.3, 23.2]);
        let first = &dataset.records()[0];
        assert_eq!(first.wind_gust_dir, "W");
        assert_eq!(first.rain_tomorrow, "No");
        assert_eq!(first.pressure, 1007.7);
        Ok(())
    }

    #[test]
    fn test_duplicates_are_removed_once() -> Result<(), DatasetError> {
        let file = write_csv(&[
            HEADER,
            "13.4,22.9,W,44,71,1007.7,21.8,No",
            "7.4,25.1,WNW,44,44,1010.6,24.3,No",
            "13.4,22.9,W,44,71,1007.7,21.8,No",
            "13.4,22.9,W,44,71,1007.7,21.8,No",
        ]);
        let dataset = HistoricalDataset::load(file.path())?;
        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.values(NumericField::MinTemp), vec![13.4, 7.4]);
        Ok(())
    }

    #[test]
    fn test_rows_with_missing_fields_are_dropped() -> Result<(), DatasetError> {
        let file = write_csv(&[
            HEADER,
            "13.4,22.9,W,44,71,1007.7,21.8,No",
            "7.4,,WNW,44,44,1010.6,24.3,No",
            "12.9,25.7,NA,46,38,1007.6,23.2,Yes",
            "9.2,28.0,NE,24,45,1017.6,26.5,",
            "17.5,32.3,W,41,82,1010.8,29.7,Yes",
        ]);
        let dataset = HistoricalDataset::load(file.path())?;
        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.values(NumericField::MinTemp), vec![13.4, 17.5]);
        Ok(())
    }

    #[test]
    fn test_missing_value_spellings_are_dropped() -> Result<(), DatasetError> {
        let file = write_csv(&[
            HEADER,
            "13.4,22.9,W,44,71,1007.7,21.8,No",
            "7.4,25.1,WNW,44,44,1010.6,NaN,No",
            "12.9,25.7,WSW,46,38,1007.6,23.2,N/A",
            "9.2,28.0,NE,24,45,1017.6,26.5,null",
            "8.1,24.2,N/A,31,47,1012.0,22.4,Yes",
            "6.3,nan,null,28,52,1011.1,20.9,No",
            "17.5,32.3,W,41,82,1010.8,29.7,Yes",
        ]);
        let dataset = HistoricalDataset::load(file.path())?;
        assert_eq!(dataset.values(NumericField::Temp), vec![21.8, 29.7]);
        let labels: Vec<&str> = dataset
            .records()
            .iter()
            .map(|record| record.rain_tomorrow.as_str())
            .collect();
        assert_eq!(labels, vec!["No", "Yes"]);
        Ok(())
    }

    #[test]
    fn test_missing_rain_labels_do_not_become_a_class() -> Result<(), DatasetError> {
        let file = write_csv(&[
            HEADER,
            "13.4,22.9,W,44,71,1007.7,21.8,No",
            "7.4,25.1,WNW,44,44,1010.6,24.3,N/A",
            "12.9,25.7,WSW,46,38,1007.6,23.2,Yes",
            "9.2,28.0,NE,24,45,1017.6,26.5,NULL",
            "8.1,24.2,SSE,31,47,1012.0,22.4,<NA>",
        ]);
        let dataset = HistoricalDataset::load(file.path())?;
        let encoder = crate::encoding::label_encoder::LabelEncoder::fit(
            dataset.records().iter().map(|record| record.rain_tomorrow.as_str()),
        );
        assert_eq!(encoder.classes(), ["No", "Yes"]);
        Ok(())
    }

    #[test]
    fn test_nan_in_numeric_column_is_dropped() -> Result<(), DatasetError> {
        let file = write_csv(&[
            HEADER,
            "13.4,22.9,W,44,71,1007.7,21.8,No",
            "7.4,25.1,WNW,44,NaN,1010.6,24.3,No",
            "12.9,25.7,WSW,46,38,1007.6,23.2,Yes",
        ]);
        let dataset = HistoricalDataset::load(file.path())?;
        assert_eq!(dataset.len(), 2);
        for field in NumericField::ALL {
            assert!(dataset.values(field).iter().all(|value| !value.is_nan()));
        }
        Ok(())
    }

    #[test]
    fn test_non_numeric_cell_counts_as_missing() -> Result<(), DatasetError> {
        let file = write_csv(&[
            HEADER,
            "13.4,22.9,W,44,71,1007.7,21.8,No",
            "7.4,25.1,WNW,calm,44,1010.6,24.3,No",
        ]);
        let dataset = HistoricalDataset::load(file.path())?;
        assert_eq!(dataset.len(), 1);
        Ok(())
    }

    #[test]
    fn test_columns_may_come_in_any_order() -> Result<(), DatasetError> {
        let file = write_csv(&[
            "RainTomorrow,Temp,Pressure,Humidity,WindGustSpeed,WindGustDir,MaxTemp,MinTemp",
            "Yes,21.8,1007.7,71,44,W,22.9,13.4",
        ]);
        let dataset = HistoricalDataset::load(file.path())?;
        let record = &dataset.records()[0];
        assert_eq!(record.min_temp, 13.4);
        assert_eq!(record.max_temp, 22.9);
        assert_eq!(record.humidity, 71.0);
        assert_eq!(record.rain_tomorrow, "Yes");
        Ok(())
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let result = HistoricalDataset::load(Path::new("definitely/not/here/weather.csv"));
        assert!(matches!(result, Err(DatasetError::NotFound(_))));
    }

    #[test]
    fn test_wrong_columns_are_a_schema_error() {
        let file = write_csv(&[
            "MinTemp,MaxTemp,WindGustDir,WindGustSpeed,Humidity,Pressure,Temp,Rainfall",
            "13.4,22.9,W,44,71,1007.7,21.8,0.6",
        ]);
        match HistoricalDataset::load(file.path()) {
            Err(DatasetError::Schema {
                missing,
                unexpected,
                ..
            }) => {
                assert_eq!(missing, vec!["RainTomorrow".to_string()]);
                assert_eq!(unexpected, vec!["Rainfall".to_string()]);
            }
            other => panic!("expected schema error, got {other:?}"),
        }
    }

    #[test]
    fn test_numeric_rain_labels_are_read_as_text() -> Result<(), DatasetError> {
        let file = write_csv(&[
            HEADER,
            "13.4,22.9,W,44,71,1007.7,21.8,0",
            "7.4,25.1,WNW,44,44,1010.6,24.3,1",
        ]);
        let dataset = HistoricalDataset::load(file.path())?;
        assert_eq!(dataset.records()[1].rain_tomorrow, "1");
        Ok(())
    }
}
