//! Seasonal feature derivation from monthly maximum temperatures
//!
//! Each weather record is reduced to three seasonal averages:
//!
//! | Season  | Months                         |
//! |---------|--------------------------------|
//! | Summer  | March, April, May              |
//! | Monsoon | June, July, August, September  |
//! | Winter  | October through February       |
//!
//! A season value is the row-wise mean of whichever of its source columns
//! are present in the table and non-missing in that row.

use crate::data::WeatherTable;
use crate::error::{ForecastError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// One of the three fixed month groupings
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Season {
    Summer,
    Monsoon,
    Winter,
}

impl Season {
    /// All seasons, in exogenous column order
    pub const ALL: [Season; 3] = [Season::Summer, Season::Monsoon, Season::Winter];

    /// Column identifier used in exogenous tables and model artifacts
    pub fn name(self) -> &'static str {
        match self {
            Season::Summer => "Summer",
            Season::Monsoon => "Monsoon",
            Season::Winter => "Winter",
        }
    }

    /// Weather table columns averaged into this season
    pub fn source_columns(self) -> &'static [&'static str] {
        match self {
            Season::Summer => &[
                "MARCH MAXIMUM (Centigrate)",
                "APRIL MAXIMUM (Centigrate)",
                "MAY MAXIMUM (Centigrate)",
            ],
            Season::Monsoon => &[
                "JUNE MAXIMUM (Centigrate)",
                "JULY MAXIMUM (Centigrate)",
                "AUGUST MAXIMUM (Centigrate)",
                "SEPTEMBER MAXIMUM (Centigrate)",
            ],
            Season::Winter => &[
                "OCTOBER MAXIMUM (Centigrate)",
                "NOVEMBER MAXIMUM (Centigrate)",
                "DECEMBER MAXIMUM (Centigrate)",
                "JANUARY MAXIMUM (Centigrate)",
                "FEBRUARY MAXIMUM (Centigrate)",
            ],
        }
    }

    /// Column names of all seasons, in exogenous column order
    pub fn column_names() -> Vec<String> {
        Self::ALL.iter().map(|s| s.name().to_string()).collect()
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Seasonal averages for one district, one row per retained weather record
#[derive(Debug, Clone, PartialEq)]
pub struct SeasonalFeatureTable {
    /// District the rows belong to
    district: String,
    /// Position of each row in the source weather table
    row_indices: Vec<usize>,
    /// Year of each row
    years: Vec<Option<i64>>,
    /// Season values; seasons without any source column are absent
    seasons: BTreeMap<Season, Vec<Option<f64>>>,
}

/// Derive seasonal features for one district.
///
/// Rows are matched on exact district equality and keep their original
/// order. A district with no rows yields an empty table rather than an
/// error; callers decide how to report that.
pub fn derive(weather: &WeatherTable, district: &str) -> Result<SeasonalFeatureTable> {
    let positions: Vec<usize> = weather
        .district_values()?
        .iter()
        .enumerate()
        .filter(|(_, d)| d.as_deref() == Some(district))
        .map(|(i, _)| i)
        .collect();

    let all_years = weather.year_values()?;
    let years = positions.iter().map(|&i| all_years[i]).collect();

    let mut seasons = BTreeMap::new();
    for season in Season::ALL {
        let available: Vec<&str> = season
            .source_columns()
            .iter()
            .copied()
            .filter(|c| weather.has_column(c))
            .collect();

        if available.is_empty() {
            tracing::debug!(%season, district, "no source columns present");
            continue;
        }

        let columns = available
            .iter()
            .map(|c| weather.numeric_values(c))
            .collect::<Result<Vec<_>>>()?;

        let values = positions
            .iter()
            .map(|&row| row_mean(columns.iter().map(|col| col[row])))
            .collect();
        seasons.insert(season, values);
    }

    Ok(SeasonalFeatureTable {
        district: district.to_string(),
        row_indices: positions,
        years,
        seasons,
    })
}

/// Mean of the non-missing values, `None` when every value is missing
fn row_mean(values: impl Iterator<Item = Option<f64>>) -> Option<f64> {
    let (sum, count) = values
        .flatten()
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}

impl SeasonalFeatureTable {
    /// Build a table directly from rows of seasonal values
    pub fn from_rows(district: &str, rows: Vec<(i64, [Option<f64>; 3])>) -> Self {
        let mut seasons: BTreeMap<Season, Vec<Option<f64>>> = Season::ALL
            .iter()
            .map(|&s| (s, Vec::with_capacity(rows.len())))
            .collect();
        let mut years = Vec::with_capacity(rows.len());

        for (year, values) in &rows {
            years.push(Some(*year));
            for (season, value) in Season::ALL.iter().zip(values) {
                if let Some(column) = seasons.get_mut(season) {
                    column.push(*value);
                }
            }
        }

        Self {
            district: district.to_string(),
            row_indices: (0..rows.len()).collect(),
            years,
            seasons,
        }
    }

    /// District the rows belong to
    pub fn district(&self) -> &str {
        &self.district
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.row_indices.len()
    }

    /// Check if the table is empty
    pub fn is_empty(&self) -> bool {
        self.row_indices.is_empty()
    }

    /// Position of each row in the source weather table
    pub fn row_indices(&self) -> &[usize] {
        &self.row_indices
    }

    /// Year of each row
    pub fn years(&self) -> &[Option<i64>] {
        &self.years
    }

    /// Values for one season, `None` if the season has no source columns
    pub fn season(&self, season: Season) -> Option<&[Option<f64>]> {
        self.seasons.get(&season).map(Vec::as_slice)
    }

    /// Seasons whose source columns were all absent
    pub fn missing_seasons(&self) -> Vec<Season> {
        Season::ALL
            .iter()
            .copied()
            .filter(|s| !self.seasons.contains_key(s))
            .collect()
    }

    /// Fail unless every season could be derived
    pub fn require_all_seasons(&self) -> Result<()> {
        let missing = self.missing_seasons();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(ForecastError::MissingSeasonColumns(
                missing.iter().map(|s| s.name().to_string()).collect(),
            ))
        }
    }

    /// Non-missing historical values of one season
    pub fn valid_values(&self, season: Season) -> Vec<f64> {
        self.season(season)
            .map(|values| values.iter().flatten().copied().collect())
            .unwrap_or_default()
    }

    /// Seasonal values of one row, by position in this table
    pub fn row(&self, position: usize) -> [Option<f64>; 3] {
        Season::ALL.map(|s| {
            self.seasons
                .get(&s)
                .and_then(|values| values.get(position).copied().flatten())
        })
    }

    /// New table keeping only the given positions, in the given order
    pub fn select(&self, positions: &[usize]) -> Self {
        Self {
            district: self.district.clone(),
            row_indices: positions.iter().map(|&p| self.row_indices[p]).collect(),
            years: positions.iter().map(|&p| self.years[p]).collect(),
            seasons: self
                .seasons
                .iter()
                .map(|(s, values)| (*s, positions.iter().map(|&p| values[p]).collect()))
                .collect(),
        }
    }

    /// The last `n` rows (or all rows when fewer exist)
    pub fn tail(&self, n: usize) -> Self {
        let start = self.len().saturating_sub(n);
        let positions: Vec<usize> = (start..self.len()).collect();
        self.select(&positions)
    }

    /// The first `n` rows (or all rows when fewer exist)
    pub fn head(&self, n: usize) -> Self {
        let positions: Vec<usize> = (0..n.min(self.len())).collect();
        self.select(&positions)
    }
}
