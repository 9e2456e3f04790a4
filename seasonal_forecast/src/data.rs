//! Weather and yield table handling

use crate::error::{ForecastError, Result};
use polars::prelude::*;
use std::collections::BTreeSet;
use std::fs::File;
use std::path::Path;

/// Header of the district-name column in both tables
pub const DISTRICT_COLUMN: &str = "Dist Name";

/// Header of the year column in both tables
pub const YEAR_COLUMN: &str = "Year";

/// Per-(district, year) weather observations with monthly maximum temperatures
#[derive(Debug, Clone)]
pub struct WeatherTable {
    /// Data frame holding the raw weather records
    df: DataFrame,
}

/// Per-(district, year) yield observations
#[derive(Debug, Clone)]
pub struct YieldTable {
    /// Data frame holding the raw yield records
    df: DataFrame,
    /// Name of the yield measurement column
    yield_column: String,
}

/// One yield observation for a district
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct YieldRecord {
    pub year: i64,
    pub value: f64,
}

/// Data loader for the weather and yield tables
#[derive(Debug)]
pub struct DataLoader;

impl DataLoader {
    /// Read a CSV file into a DataFrame with trimmed column headers
    pub fn read_csv<P: AsRef<Path>>(path: P) -> Result<DataFrame> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ForecastError::MissingDataset(path.display().to_string()));
        }

        let file = File::open(path)?;
        let mut df = CsvReader::new(file)
            .infer_schema(None)
            .has_header(true)
            .finish()?;

        let trimmed: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|name| name.trim().to_string())
            .collect();
        df.set_column_names(&trimmed)?;

        Ok(df)
    }
}

impl WeatherTable {
    /// Load the weather table from a CSV file
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<Self> {
        let df = DataLoader::read_csv(path)?;
        Self::from_dataframe(df)
    }

    /// Wrap an existing DataFrame, checking for the district column
    pub fn from_dataframe(df: DataFrame) -> Result<Self> {
        require_column(&df, "weather table", DISTRICT_COLUMN)?;
        Ok(Self { df })
    }

    /// Get the DataFrame
    pub fn dataframe(&self) -> &DataFrame {
        &self.df
    }

    /// Whether a column with exactly this name exists
    pub fn has_column(&self, name: &str) -> bool {
        self.df.get_column_names().iter().any(|c| *c == name)
    }

    /// Sorted, de-duplicated district names
    pub fn districts(&self) -> Result<Vec<String>> {
        let unique: BTreeSet<String> = self.district_values()?.into_iter().flatten().collect();
        Ok(unique.into_iter().collect())
    }

    /// District name of every row, in table order
    pub fn district_values(&self) -> Result<Vec<Option<String>>> {
        column_as_string(&self.df, DISTRICT_COLUMN)
    }

    /// Year of every row, or all-missing when the table has no year column
    pub fn year_values(&self) -> Result<Vec<Option<i64>>> {
        if self.has_column(YEAR_COLUMN) {
            column_as_i64(&self.df, YEAR_COLUMN)
        } else {
            Ok(vec![None; self.len()])
        }
    }

    /// A numeric column with unparseable cells coerced to missing
    pub fn numeric_values(&self, column: &str) -> Result<Vec<Option<f64>>> {
        column_as_f64(&self.df, column)
    }

    /// Check if the table is empty
    pub fn is_empty(&self) -> bool {
        self.df.height() == 0
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.df.height()
    }
}

impl YieldTable {
    /// Load the yield table from a CSV file
    pub fn from_csv<P: AsRef<Path>>(path: P, yield_column: &str) -> Result<Self> {
        let df = DataLoader::read_csv(path)?;
        Self::from_dataframe(df, yield_column)
    }

    /// Wrap an existing DataFrame, checking for the required columns
    pub fn from_dataframe(df: DataFrame, yield_column: &str) -> Result<Self> {
        for column in [DISTRICT_COLUMN, YEAR_COLUMN, yield_column] {
            require_column(&df, "yield table", column)?;
        }

        Ok(Self {
            df,
            yield_column: yield_column.to_string(),
        })
    }

    /// Name of the yield measurement column
    pub fn yield_column(&self) -> &str {
        &self.yield_column
    }

    /// Sorted, de-duplicated district names
    pub fn districts(&self) -> Result<Vec<String>> {
        let unique: BTreeSet<String> = column_as_string(&self.df, DISTRICT_COLUMN)?
            .into_iter()
            .flatten()
            .collect();
        Ok(unique.into_iter().collect())
    }

    /// Complete yield records for one district, in table order
    pub fn records_for(&self, district: &str) -> Result<Vec<YieldRecord>> {
        let districts = column_as_string(&self.df, DISTRICT_COLUMN)?;
        let years = column_as_i64(&self.df, YEAR_COLUMN)?;
        let values = column_as_f64(&self.df, &self.yield_column)?;

        let records = districts
            .iter()
            .zip(years)
            .zip(values)
            .filter(|((d, _), _)| d.as_deref() == Some(district))
            .filter_map(|((_, year), value)| match (year, value) {
                (Some(year), Some(value)) => Some(YieldRecord { year, value }),
                _ => None,
            })
            .collect();

        Ok(records)
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.df.height()
    }

    /// Check if the table is empty
    pub fn is_empty(&self) -> bool {
        self.df.height() == 0
    }
}

fn require_column(df: &DataFrame, table: &str, column: &str) -> Result<()> {
    if df.get_column_names().iter().any(|c| *c == column) {
        Ok(())
    } else {
        Err(ForecastError::MissingColumn {
            table: table.to_string(),
            column: column.to_string(),
        })
    }
}

fn column<'a>(df: &'a DataFrame, name: &str) -> Result<&'a Series> {
    df.column(name).map_err(|e| {
        ForecastError::PolarsError(format!("Column '{}' not found: {}", name, e))
    })
}

/// Helper to get a column as f64 values; cells that do not parse become `None`
fn column_as_f64(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>> {
    let casted = column(df, name)?.cast(&DataType::Float64)?;
    let values = casted
        .f64()?
        .into_iter()
        .map(|v| v.filter(|x| x.is_finite()))
        .collect();
    Ok(values)
}

fn column_as_i64(df: &DataFrame, name: &str) -> Result<Vec<Option<i64>>> {
    let casted = column(df, name)?.cast(&DataType::Int64)?;
    let values = casted.i64()?.into_iter().collect();
    Ok(values)
}

fn column_as_string(df: &DataFrame, name: &str) -> Result<Vec<Option<String>>> {
    let casted = column(df, name)?.cast(&DataType::Utf8)?;
    let values = casted
        .utf8()?
        .into_iter()
        .map(|v| v.map(str::to_string))
        .collect();
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn weather_frame() -> DataFrame {
        df!(
            DISTRICT_COLUMN => &["Pune", "Nashik", "Pune"],
            YEAR_COLUMN => &[2001i64, 2001, 2002],
            "MARCH MAXIMUM (Centigrate)" => &[Some(34.5), None, Some(35.0)]
        )
        .unwrap()
    }

    #[test]
    fn test_districts_sorted_and_unique() {
        let table = WeatherTable::from_dataframe(weather_frame()).unwrap();
        assert_eq!(table.districts().unwrap(), vec!["Nashik", "Pune"]);
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn test_missing_district_column() {
        let df = df!(YEAR_COLUMN => &[2001i64]).unwrap();
        let err = WeatherTable::from_dataframe(df).unwrap_err();
        assert!(matches!(err, ForecastError::MissingColumn { .. }));
    }

    #[test]
    fn test_numeric_values_keep_missing_cells() {
        let table = WeatherTable::from_dataframe(weather_frame()).unwrap();
        let values = table.numeric_values("MARCH MAXIMUM (Centigrate)").unwrap();
        assert_eq!(values, vec![Some(34.5), None, Some(35.0)]);
    }
}
