//! CSV-based assumption loader
//!
//! Loads the four assumption tables from CSV files in a single directory:
//! `mortality.csv` (age, band_0..band_5), `lapse.csv` (duration, rate),
//! `premium.csv` (age_at_entry, policy_term, rate) and `discount.csv`
//! (year, rate).

use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

use crate::error::{ProjectionError, Result};

use super::mortality::DURATION_BANDS;

/// Default path to the assumptions directory
pub const DEFAULT_ASSUMPTIONS_PATH: &str = "data/assumptions";

fn open_csv(path: &Path) -> Result<csv::Reader<File>> {
    let file = File::open(path).map_err(|source| ProjectionError::Io {
        path: path.display().to_string(),
        source,
    })?;
    Ok(csv::Reader::from_reader(file))
}

fn csv_err(path: &Path, source: csv::Error) -> ProjectionError {
    ProjectionError::Csv {
        path: path.display().to_string(),
        source,
    }
}

fn parse_field<T: std::str::FromStr>(path: &Path, field: &str) -> Result<T> {
    field.trim().parse().map_err(|_| {
        ProjectionError::config(format!(
            "unparseable value {:?} in {}",
            field,
            path.display()
        ))
    })
}

/// Load mortality rates from mortality.csv.
///
/// Rows must cover a contiguous ascending age range; returns the first age
/// and one row of band rates per age.
pub fn load_mortality_rates(dir: &Path) -> Result<(u32, Vec<[f64; DURATION_BANDS]>)> {
    let path = dir.join("mortality.csv");
    let mut reader = open_csv(&path)?;

    let mut min_age = None;
    let mut rows: Vec<[f64; DURATION_BANDS]> = Vec::new();

    for result in reader.records() {
        let record = result.map_err(|e| csv_err(&path, e))?;
        if record.len() != 1 + DURATION_BANDS {
            return Err(ProjectionError::config(format!(
                "mortality row needs age plus {} band columns in {}",
                DURATION_BANDS,
                path.display()
            )));
        }
        let age: u32 = parse_field(&path, &record[0])?;
        match min_age {
            None => min_age = Some(age),
            Some(first) => {
                let next = first + rows.len() as u32;
                if age != next {
                    return Err(ProjectionError::config(format!(
                        "mortality ages must be contiguous: expected {}, got {} in {}",
                        next,
                        age,
                        path.display()
                    )));
                }
            }
        }

        let mut row = [0.0; DURATION_BANDS];
        for (band, slot) in row.iter_mut().enumerate() {
            *slot = parse_field(&path, &record[1 + band])?;
        }
        rows.push(row);
    }

    let min_age = min_age
        .ok_or_else(|| ProjectionError::config(format!("{} is empty", path.display())))?;
    Ok((min_age, rows))
}

/// Load annual lapse rates by duration from lapse.csv.
///
/// Durations must run contiguously from 0.
pub fn load_lapse_rates(dir: &Path) -> Result<Vec<f64>> {
    let path = dir.join("lapse.csv");
    let mut reader = open_csv(&path)?;

    let mut rates = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| csv_err(&path, e))?;
        let duration: usize = parse_field(&path, &record[0])?;
        if duration != rates.len() {
            return Err(ProjectionError::config(format!(
                "lapse durations must run contiguously from 0 in {}",
                path.display()
            )));
        }
        rates.push(parse_field(&path, &record[1])?);
    }
    Ok(rates)
}

/// Load monthly premium rates by (entry age, term) from premium.csv
pub fn load_premium_rates(dir: &Path) -> Result<HashMap<(u32, u32), f64>> {
    let path = dir.join("premium.csv");
    let mut reader = open_csv(&path)?;

    let mut rates = HashMap::new();
    for result in reader.records() {
        let record = result.map_err(|e| csv_err(&path, e))?;
        let age: u32 = parse_field(&path, &record[0])?;
        let term: u32 = parse_field(&path, &record[1])?;
        let rate: f64 = parse_field(&path, &record[2])?;
        if rates.insert((age, term), rate).is_some() {
            return Err(ProjectionError::config(format!(
                "duplicate premium entry (age {}, term {}) in {}",
                age,
                term,
                path.display()
            )));
        }
    }
    Ok(rates)
}

/// Load annual discount rates by year from discount.csv.
///
/// Years must run contiguously from 0.
pub fn load_discount_rates(dir: &Path) -> Result<Vec<f64>> {
    let path = dir.join("discount.csv");
    let mut reader = open_csv(&path)?;

    let mut rates = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| csv_err(&path, e))?;
        let year: usize = parse_field(&path, &record[0])?;
        if year != rates.len() {
            return Err(ProjectionError::config(format!(
                "discount years must run contiguously from 0 in {}",
                path.display()
            )));
        }
        rates.push(parse_field(&path, &record[1])?);
    }
    Ok(rates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_file(dir: &Path, name: &str, contents: &str) {
        let mut file = File::create(dir.join(name)).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
    }

    #[test]
    fn test_load_round_trip() {
        let dir = std::env::temp_dir().join("term_projection_loader_test");
        std::fs::create_dir_all(&dir).unwrap();

        write_file(
            &dir,
            "mortality.csv",
            "age,band_0,band_1,band_2,band_3,band_4,band_5\n\
             18,0.000231,0.000254,0.000280,0.000308,0.000338,0.000372\n\
             19,0.000235,0.000259,0.000285,0.000313,0.000345,0.000379\n",
        );
        write_file(&dir, "lapse.csv", "duration,rate\n0,0.1\n1,0.08\n");
        write_file(
            &dir,
            "premium.csv",
            "age_at_entry,policy_term,rate\n47,10,0.00015\n",
        );
        write_file(&dir, "discount.csv", "year,rate\n0,0.0\n1,0.00555\n");

        let (min_age, rows) = load_mortality_rates(&dir).unwrap();
        assert_eq!(min_age, 18);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1][5], 0.000379);

        let lapse = load_lapse_rates(&dir).unwrap();
        assert_eq!(lapse, vec![0.1, 0.08]);

        let premium = load_premium_rates(&dir).unwrap();
        assert_eq!(premium[&(47, 10)], 0.00015);

        let discount = load_discount_rates(&dir).unwrap();
        assert_eq!(discount, vec![0.0, 0.00555]);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = Path::new("/nonexistent/assumptions");
        match load_lapse_rates(dir) {
            Err(ProjectionError::Io { .. }) => {}
            other => panic!("expected Io error, got {:?}", other),
        }
    }
}
