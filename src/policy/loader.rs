//! Load model points from model_points.csv

use std::path::Path;

use csv::Reader;

use super::{ModelPoint, ModelPointStore, Sex};
use crate::error::{ProjectionError, Result};

/// Raw CSV row matching the model point table columns
#[derive(Debug, serde::Deserialize)]
struct CsvRow {
    point_id: u32,
    age_at_entry: u32,
    sex: String,
    policy_term: u32,
    policy_count: f64,
    sum_assured: f64,
    duration_mth: i32,
}

impl CsvRow {
    fn to_model_point(self) -> Result<ModelPoint> {
        let sex = match self.sex.as_str() {
            "M" => Sex::M,
            "F" => Sex::F,
            other => {
                return Err(ProjectionError::config(format!(
                    "unknown sex {:?} for model point {}",
                    other, self.point_id
                )))
            }
        };

        if self.policy_term == 0 {
            return Err(ProjectionError::config(format!(
                "model point {} has zero policy term",
                self.point_id
            )));
        }

        Ok(ModelPoint {
            point_id: self.point_id,
            age_at_entry: self.age_at_entry,
            sex,
            policy_term: self.policy_term,
            policy_count: self.policy_count,
            sum_assured: self.sum_assured,
            duration_mth: self.duration_mth,
        })
    }
}

/// Load all model points from a CSV file
pub fn load_model_points<P: AsRef<Path>>(path: P) -> Result<ModelPointStore> {
    let path = path.as_ref();
    let mut reader = Reader::from_path(path).map_err(|source| ProjectionError::Csv {
        path: path.display().to_string(),
        source,
    })?;

    let mut points = Vec::new();
    for result in reader.deserialize() {
        let row: CsvRow = result.map_err(|source| ProjectionError::Csv {
            path: path.display().to_string(),
            source,
        })?;
        points.push(row.to_model_point()?);
    }

    log::info!("loaded {} model points from {}", points.len(), path.display());
    ModelPointStore::from_points(points)
}

/// Load model points from any reader (e.g. a string buffer)
pub fn load_model_points_from_reader<R: std::io::Read>(reader: R) -> Result<ModelPointStore> {
    let mut csv_reader = Reader::from_reader(reader);

    let mut points = Vec::new();
    for result in csv_reader.deserialize() {
        let row: CsvRow = result.map_err(|source| ProjectionError::Csv {
            path: "<reader>".to_string(),
            source,
        })?;
        points.push(row.to_model_point()?);
    }

    ModelPointStore::from_points(points)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
point_id,age_at_entry,sex,policy_term,policy_count,sum_assured,duration_mth
1,47,M,10,86,622000,1
2,29,M,20,56,752000,210
3,51,F,10,84,799000,15
";

    #[test]
    fn test_load_from_reader() {
        let store = load_model_points_from_reader(SAMPLE.as_bytes()).unwrap();
        assert_eq!(store.len(), 3);

        let p1 = store.get(1).unwrap();
        assert_eq!(p1.age_at_entry, 47);
        assert_eq!(p1.sex, Sex::M);
        assert_eq!(p1.policy_term, 10);
        assert_eq!(p1.duration_mth, 1);

        let p3 = store.get(3).unwrap();
        assert_eq!(p3.sex, Sex::F);
        assert_eq!(p3.duration_mth, 15);
    }

    #[test]
    fn test_unknown_sex_rejected() {
        let bad = "\
point_id,age_at_entry,sex,policy_term,policy_count,sum_assured,duration_mth
1,47,X,10,86,622000,1
";
        assert!(load_model_points_from_reader(bad.as_bytes()).is_err());
    }
}
