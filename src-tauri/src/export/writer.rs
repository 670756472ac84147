use std::fs;
use std::path::Path;

use rust_xlsxwriter::Workbook;

use crate::config;
use crate::export::{ExportError, FlatRow};
use crate::models::{ExportFormat, ExportedCase};

/// Nested per-case records, pretty-printed so the file stays readable
/// for hand inspection and diffing.
pub fn write_nested_json(path: &Path, cases: &[ExportedCase]) -> Result<(), ExportError> {
    let json = serde_json::to_string_pretty(cases)?;
    fs::write(path, json)?;
    Ok(())
}

pub fn write_flat_csv(path: &Path, rows: &[FlatRow]) -> Result<(), ExportError> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(FlatRow::COLUMNS)?;
    for row in rows {
        writer.write_record(row.values())?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write_flat_xlsx(path: &Path, rows: &[FlatRow]) -> Result<(), ExportError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(config::DATASET_NAME)?;

    for (col, header) in FlatRow::COLUMNS.iter().enumerate() {
        worksheet.write_string(0, col as u16, *header)?;
    }
    for (line, row) in rows.iter().enumerate() {
        for (col, value) in row.values().iter().enumerate() {
            worksheet.write_string(line as u32 + 1, col as u16, *value)?;
        }
    }

    workbook.save(path)?;
    Ok(())
}

/// Suggested file name for the save dialog, e.g.
/// `Export_patients-melds_2026-08-27_14-30-05.csv`.
pub fn default_file_name(scope_label: &str, format: ExportFormat) -> String {
    let stamp = chrono::Local::now().format("%Y-%m-%d_%H-%M-%S");
    let label = if scope_label.is_empty() {
        "all".to_string()
    } else {
        scope_label
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join("-")
    };
    format!("Export_{label}_{stamp}.{}", format.extension())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewPatient;

    fn sample_rows() -> Vec<FlatRow> {
        let mut row = FlatRow::default();
        row.surname = "Writer".into();
        row.site = "BON".into();
        vec![row]
    }

    #[test]
    fn json_writer_emits_array_of_cases() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("export.json");
        let cases = vec![ExportedCase {
            patient: Some(NewPatient {
                surname: "Nolan".into(),
                ..Default::default()
            }),
            ..Default::default()
        }];

        write_nested_json(&path, &cases).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        let parsed: Vec<ExportedCase> = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].patient.as_ref().unwrap().surname, "Nolan");
    }

    #[test]
    fn csv_writer_emits_header_plus_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("export.csv");

        write_flat_csv(&path, &sample_rows()).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("kkb_id,firstname,surname"));
        assert!(lines[1].contains("Writer"));
    }

    #[test]
    fn xlsx_writer_produces_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("export.xlsx");

        write_flat_xlsx(&path, &sample_rows()).unwrap();

        assert!(path.metadata().unwrap().len() > 0);
    }

    #[test]
    fn default_name_carries_scope_and_extension() {
        let name = default_file_name("patients, melds", ExportFormat::Csv);
        assert!(name.starts_with("Export_patients-melds_"));
        assert!(name.ends_with(".csv"));

        let name = default_file_name("", ExportFormat::Json);
        assert!(name.starts_with("Export_all_"));
        assert!(name.ends_with(".json"));
    }
}
