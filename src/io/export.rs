//! Export merged tables to CSV.
//!
//! One file per country, meant to be easy to consume in spreadsheets or
//! downstream scripts.

use std::fs::create_dir_all;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::domain::{Indicator, MergedTable, MergedTables};
use crate::error::AppError;

/// Write one merged table to `path`.
///
/// Missing indicator values are written as empty fields.
pub fn write_merged_csv(path: &Path, table: &MergedTable) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_path(path)
        .map_err(|e| AppError::io(format!("Failed to create export CSV '{}': {e}", path.display())))?;

    writer
        .write_record([
            "period",
            Indicator::GdpPerCapita.column_name(),
            table.indicator.column_name(),
            "country",
        ])
        .map_err(|e| AppError::io(format!("Failed to write export CSV header: {e}")))?;

    for r in &table.rows {
        writer
            .write_record([
                r.period.clone(),
                r.gdp_per_capita.to_string(),
                r.value.map(|v| v.to_string()).unwrap_or_default(),
                table.country.clone(),
            ])
            .map_err(|e| AppError::io(format!("Failed to write export CSV row: {e}")))?;
    }

    writer
        .flush()
        .map_err(|e| AppError::io(format!("Failed to flush export CSV '{}': {e}", path.display())))?;
    Ok(())
}

/// Write every table of `tables` into `dir`, returning the created paths.
pub fn write_merged_dir(dir: &Path, tables: &MergedTables) -> Result<Vec<PathBuf>, AppError> {
    create_dir_all(dir)
        .map_err(|e| AppError::io(format!("Failed to create export dir '{}': {e}", dir.display())))?;

    let mut paths = Vec::with_capacity(tables.len());
    for table in tables.iter() {
        let name = format!(
            "{}_{}.csv",
            file_stem(table.indicator.column_name()),
            file_stem(&table.country)
        );
        let path = dir.join(name);
        write_merged_csv(&path, table)?;
        paths.push(path);
    }
    info!(dir = %dir.display(), files = paths.len(), "exported merged tables");
    Ok(paths)
}

/// Lowercase file-name fragment: non-alphanumerics become `_`.
pub fn file_stem(s: &str) -> String {
    s.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '_' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::MergedRow;

    fn tables() -> MergedTables {
        MergedTables {
            indicator: Indicator::Depletion,
            tables: vec![MergedTable {
                country: "Korea, Rep.".to_string(),
                indicator: Indicator::Depletion,
                rows: vec![
                    MergedRow { period: "2000".into(), gdp_per_capita: 12000.5, value: Some(0.25) },
                    MergedRow { period: "2001".into(), gdp_per_capita: 12500.0, value: None },
                ],
            }],
        }
    }

    #[test]
    fn writes_one_csv_per_country() {
        let dir = tempfile::tempdir().unwrap();
        let paths = write_merged_dir(dir.path(), &tables()).unwrap();
        assert_eq!(paths.len(), 1);
        assert!(paths[0].ends_with("natural_depletion_korea__rep_.csv"));

        let text = std::fs::read_to_string(&paths[0]).unwrap();
        let expected = concat!(
            "period,gdp per capita,natural depletion,country\n",
            "2000,12000.5,0.25,\"Korea, Rep.\"\n",
            "2001,12500,,\"Korea, Rep.\"\n",
        );
        assert_eq!(text, expected);
    }

    #[test]
    fn awkward_country_labels_survive_a_reread() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("odd.csv");
        let table = MergedTable {
            country: "Says \"hi\"\r\nthere".to_string(),
            indicator: Indicator::Greenhouse,
            rows: vec![MergedRow { period: "1999".into(), gdp_per_capita: 800.0, value: Some(1.5e6) }],
        };
        write_merged_csv(&path, &table).unwrap();

        let mut reader = csv::ReaderBuilder::new().has_headers(true).from_path(&path).unwrap();
        let headers = reader.headers().unwrap().clone();
        assert_eq!(&headers[2], "greenhouse emission");
        let records: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(records.len(), 1);
        assert_eq!(&records[0][0], "1999");
        assert_eq!(&records[0][2], "1500000");
        assert_eq!(&records[0][3], table.country);
    }
}
