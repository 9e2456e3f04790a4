#![allow(dead_code)]

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fs;
use std::path::Path;

pub const MONTHS: [&str; 12] = [
    "JANUARY", "FEBRUARY", "MARCH", "APRIL", "MAY", "JUNE", "JULY", "AUGUST", "SEPTEMBER",
    "OCTOBER", "NOVEMBER", "DECEMBER",
];

/// Typical monthly maximum temperatures, January first
pub const MONTH_BASE: [f64; 12] = [
    29.0, 31.5, 35.0, 37.5, 38.0, 33.0, 29.5, 29.0, 30.5, 31.5, 30.0, 29.0,
];

pub fn month_header(month: &str) -> String {
    format!("{} MAXIMUM (Centigrate)", month)
}

pub type MonthValues = [Option<f64>; 12];

/// Weather CSV text with all twelve month columns
pub fn weather_csv(rows: &[(&str, i64, MonthValues)]) -> String {
    let mut text = String::from("Dist Name,Year");
    for month in MONTHS {
        text.push(',');
        text.push_str(&month_header(month));
    }
    text.push('\n');

    for (district, year, values) in rows {
        text.push_str(&format!("{},{}", district, year));
        for value in values {
            text.push(',');
            if let Some(v) = value {
                text.push_str(&v.to_string());
            }
        }
        text.push('\n');
    }
    text
}

pub fn yield_csv(rows: &[(&str, i64, f64)]) -> String {
    let mut text = String::from("Dist Name,Year,Yield\n");
    for (district, year, value) in rows {
        text.push_str(&format!("{},{},{}\n", district, year, value));
    }
    text
}

pub fn write(path: &Path, text: &str) {
    fs::write(path, text).unwrap();
}

/// Noisy but full monthly data for one district and a range of years
pub fn synthetic_weather(
    district: &'static str,
    years: std::ops::RangeInclusive<i64>,
    seed: u64,
) -> Vec<(&'static str, i64, MonthValues)> {
    let mut rng = StdRng::seed_from_u64(seed);
    years
        .map(|year| {
            let values = MONTH_BASE.map(|base| Some(base + rng.gen_range(-2.0..2.0)));
            (district, year, values)
        })
        .collect()
}

/// Yield that depends linearly on the seasonal means of `weather`, plus noise
pub fn synthetic_yield(
    weather: &[(&'static str, i64, MonthValues)],
    seed: u64,
) -> Vec<(&'static str, i64, f64)> {
    let mut rng = StdRng::seed_from_u64(seed);
    weather
        .iter()
        .map(|(district, year, values)| {
            let mean = |idx: &[usize]| {
                idx.iter().map(|&i| values[i].unwrap_or(0.0)).sum::<f64>() / idx.len() as f64
            };
            let summer = mean(&[2, 3, 4]);
            let monsoon = mean(&[5, 6, 7, 8]);
            let winter = mean(&[9, 10, 11, 0, 1]);
            let value = 2.0 + 0.08 * summer - 0.05 * monsoon + 0.04 * winter
                + rng.gen_range(-0.05..0.05);
            (*district, *year, value)
        })
        .collect()
}
