use log::info;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::errors::*;
use crate::export_workbook::*;

/// Writes every section of the workbook into one CSV document, separated by
/// blank rows.
pub fn write_workbook_csv<W: Write>(workbook: &ExportWorkbook, writer: W) -> Result<()> {
    let mut csv_writer = csv::WriterBuilder::new()
        .flexible(true)
        .from_writer(writer);

    csv_writer
        .write_record(&[workbook.title()])
        .and_then(|_| csv_writer.write_record(&["Currency".to_string(), workbook.currency.to_string()]))
        .chain_err(|| "Failed to write export header")?;
    write_blank_line(&mut csv_writer)?;

    for section in &workbook.sections {
        csv_writer
            .write_record(&[section.title])
            .and_then(|_| csv_writer.write_record(&section.columns))
            .chain_err(|| format!("Failed to write {} header", section.title))?;
        for row in &section.rows {
            csv_writer
                .write_record(row)
                .chain_err(|| format!("Failed to write {} row", section.title))?;
        }
        write_blank_line(&mut csv_writer)?;
    }

    csv_writer
        .write_record(&workbook.footer())
        .chain_err(|| "Failed to write export footer")?;
    csv_writer.flush().chain_err(|| "Failed to flush CSV export")?;
    Ok(())
}

// A record with one empty field is written as `""`, so separators bypass the
// record writer.
fn write_blank_line<W: Write>(csv_writer: &mut csv::Writer<W>) -> Result<()> {
    csv_writer.flush().chain_err(|| "Failed to flush CSV export")?;
    csv_writer
        .get_mut()
        .write_all(b"\n")
        .chain_err(|| "Failed to write section separator")
}

/// Saves the workbook as a timestamped CSV file in `output_dir`, creating the
/// directory if needed.
pub fn save_workbook_csv(workbook: &ExportWorkbook, output_dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(output_dir)
        .chain_err(|| format!("Failed to create export directory: {}", output_dir.display()))?;
    let path = output_dir.join(workbook.file_name());
    let file = fs::File::create(&path)
        .chain_err(|| format!("Failed to create export file: {}", path.display()))?;
    write_workbook_csv(workbook, file)?;
    info!("Wrote CSV export to {}", path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::*;
    use crate::test_support::*;
    use chrono::NaiveDate;
    use serde_json::json;
    use std::env;

    fn workbook() -> ExportWorkbook {
        let data = ExportData {
            incomes: json!([
                { "id": 1, "source": "Salary, June", "date": "2024-06-15", "amount": 1234.5 }
            ]),
            ..ExportData::default()
        };
        ExportWorkbook::build(
            data,
            php(),
            NaiveDate::from_ymd_opt(2024, 6, 30)
                .and_then(|date| date.and_hms_opt(8, 0, 0))
                .unwrap(),
        )
    }

    fn read_back(bytes: &[u8]) -> Vec<Vec<String>> {
        csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(bytes)
            .records()
            .map(|record| record.unwrap().iter().map(String::from).collect())
            .collect()
    }

    fn position(rows: &[Vec<String>], first_cell: &str) -> usize {
        rows.iter()
            .position(|row| row.get(0).map(String::as_str) == Some(first_cell))
            .unwrap()
    }

    #[test]
    fn test_write_workbook_csv_layout() {
        let mut bytes = vec![];
        write_workbook_csv(&workbook(), &mut bytes).unwrap();
        let rows = read_back(&bytes);

        assert_eq!(rows[0], vec!["MyAlkansya Financial Export - 20240630_080000"]);
        assert_eq!(rows[1], vec!["Currency", "PHP"]);

        let summary = position(&rows, SUMMARY_SECTION);
        assert_eq!(rows[summary + 1], vec!["Category", "Amount"]);
        assert_eq!(rows[summary + 2], vec!["Total Income", "₱0.00"]);

        let income = position(&rows, INCOME_SECTION);
        assert!(income > summary);
        assert_eq!(rows[income + 1], INCOME_COLUMNS.to_vec());
        assert_eq!(
            rows[income + 2],
            vec!["1", "Salary, June", "₱1,234.50", "2024-06-15", "PHP"]
        );

        let expense = position(&rows, EXPENSE_SECTION);
        assert!(expense > income);
        assert_eq!(rows[expense + 2], vec![NO_EXPENSE_RECORDS]);
        let budget = position(&rows, BUDGET_SECTION);
        assert_eq!(rows[budget + 2], vec![NO_BUDGET_RECORDS]);
        let savings = position(&rows, SAVINGS_GOAL_SECTION);
        assert!(savings > budget);
        assert_eq!(rows[savings + 2], vec![NO_SAVINGS_GOALS]);

        assert_eq!(
            rows.last().unwrap(),
            &vec!["Generated by MyAlkansya App on", "2024-06-30 08:00:00"]
        );
    }

    #[test]
    fn test_sections_are_separated_by_empty_lines() {
        let mut bytes = vec![];
        write_workbook_csv(&workbook(), &mut bytes).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[1], "Currency,PHP");
        assert_eq!(lines[2], "");
        assert_eq!(lines[3], SUMMARY_SECTION);
        assert!(!lines.contains(&"\"\""));
        // One after the header and one after each of the five sections.
        assert_eq!(lines.iter().filter(|line| line.is_empty()).count(), 6);
        assert!(lines[lines.len() - 2].is_empty());
    }

    #[test]
    fn test_save_workbook_csv_names_file() {
        let output_dir = env::temp_dir().join(format!("myalkansya-export-test-{}", std::process::id()));
        let path = save_workbook_csv(&workbook(), &output_dir).unwrap();
        assert_eq!(
            path.file_name().unwrap().to_str().unwrap(),
            "MyAlkansya_Export_20240630_080000.csv"
        );
        let rows = read_back(&fs::read(&path).unwrap());
        assert_eq!(rows[1], vec!["Currency", "PHP"]);
        fs::remove_dir_all(&output_dir).unwrap();
    }
}
