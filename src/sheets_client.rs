use log::{debug, info};
use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::constants::*;
use crate::errors::*;
use crate::export_workbook::*;

/// Somewhere a workbook can be published as a shared spreadsheet.
pub trait SpreadsheetPublisher {
    /// Returns the URL of the published spreadsheet.
    fn publish(&self, workbook: &ExportWorkbook) -> Result<String>;
}

#[derive(Debug)]
pub struct GoogleSheetsClient {
    client: Client,
    access_token: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreatedSpreadsheet {
    spreadsheet_id: String,
    #[serde(default)]
    spreadsheet_url: Option<String>,
}

impl GoogleSheetsClient {
    pub fn new(access_token: String) -> Result<GoogleSheetsClient> {
        let client = Client::builder()
            .build()
            .chain_err(|| "Failed to build HTTP client")?;
        Ok(GoogleSheetsClient {
            client,
            access_token,
        })
    }

    fn create_spreadsheet(&self, workbook: &ExportWorkbook) -> Result<CreatedSpreadsheet> {
        debug!("POST {}", GOOGLE_SHEETS_API_URL);
        let response = self
            .client
            .post(GOOGLE_SHEETS_API_URL)
            .bearer_auth(&self.access_token)
            .json(&create_spreadsheet_body(workbook))
            .send()
            .chain_err(|| "Failed to get response")?;
        let status = response.status();
        ensure!(
            status.is_success(),
            ErrorKind::ServerError(status.as_u16(), "Failed to create spreadsheet".to_string())
        );
        response
            .json()
            .chain_err(|| "Failed to parse created spreadsheet")
    }

    fn fill_spreadsheet(&self, spreadsheet_id: &str, workbook: &ExportWorkbook) -> Result<()> {
        let url = format!(
            "{}/{}/values:batchUpdate",
            GOOGLE_SHEETS_API_URL, spreadsheet_id
        );
        debug!("POST {}", url);
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.access_token)
            .json(&batch_update_body(workbook))
            .send()
            .chain_err(|| "Failed to get response")?;
        let status = response.status();
        ensure!(
            status.is_success(),
            ErrorKind::ServerError(status.as_u16(), "Failed to fill spreadsheet".to_string())
        );
        Ok(())
    }
}

impl SpreadsheetPublisher for GoogleSheetsClient {
    fn publish(&self, workbook: &ExportWorkbook) -> Result<String> {
        let created = self.create_spreadsheet(workbook)?;
        info!("Created spreadsheet {}", created.spreadsheet_id);
        self.fill_spreadsheet(&created.spreadsheet_id, workbook)?;
        Ok(spreadsheet_url(created))
    }
}

fn spreadsheet_url(created: CreatedSpreadsheet) -> String {
    let spreadsheet_id = created.spreadsheet_id;
    created
        .spreadsheet_url
        .unwrap_or_else(|| format!("{}/{}", GOOGLE_SHEETS_DOCUMENT_URL, spreadsheet_id))
}

fn spreadsheet_title(workbook: &ExportWorkbook) -> String {
    format!(
        "{}{}",
        EXPORT_FILE_PREFIX,
        workbook.generated_at.format(EXPORT_TIMESTAMP_FORMAT)
    )
}

fn create_spreadsheet_body(workbook: &ExportWorkbook) -> Value {
    json!({
        "properties": { "title": spreadsheet_title(workbook) },
        "sheets": workbook
            .sections
            .iter()
            .map(|section| json!({ "properties": { "title": section.sheet_name } }))
            .collect::<Vec<Value>>(),
    })
}

fn batch_update_body(workbook: &ExportWorkbook) -> Value {
    let data: Vec<Value> = workbook
        .sections
        .iter()
        .map(|section| {
            let mut values = vec![vec![section.title.to_string()]];
            values.extend(section.sheet_values());
            json!({
                "range": format!("'{}'!A1", section.sheet_name),
                "values": values,
            })
        })
        .collect();
    json!({
        "valueInputOption": SHEETS_VALUE_INPUT_OPTION,
        "data": data,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::*;
    use chrono::NaiveDate;

    fn workbook() -> ExportWorkbook {
        ExportWorkbook::build(
            ExportData::default(),
            usd(),
            NaiveDate::from_ymd_opt(2024, 1, 2)
                .and_then(|date| date.and_hms_opt(3, 4, 5))
                .unwrap(),
        )
    }

    #[test]
    fn test_create_spreadsheet_body_lists_sheets() {
        let body = create_spreadsheet_body(&workbook());
        assert_eq!(
            body["properties"]["title"],
            json!("MyAlkansya_Export_20240102_030405")
        );
        let titles: Vec<&str> = body["sheets"]
            .as_array()
            .unwrap()
            .iter()
            .map(|sheet| sheet["properties"]["title"].as_str().unwrap())
            .collect();
        assert_eq!(
            titles,
            vec!["Summary", "Income", "Expenses", "Budget", "SavingsGoal"]
        );
    }

    #[test]
    fn test_batch_update_body_writes_each_sheet() {
        let body = batch_update_body(&workbook());
        assert_eq!(body["valueInputOption"], json!("USER_ENTERED"));
        let data = body["data"].as_array().unwrap();
        assert_eq!(data.len(), 5);
        assert_eq!(data[0]["range"], json!("'Summary'!A1"));
        assert_eq!(data[0]["values"][0], json!(["FINANCIAL SUMMARY"]));
        assert_eq!(data[0]["values"][1], json!(["Category", "Amount"]));
        assert_eq!(data[0]["values"][2], json!(["Total Income", "$0.00"]));
        assert_eq!(data[4]["range"], json!("'SavingsGoal'!A1"));
        assert_eq!(data[4]["values"][2], json!(["No savings goals found"]));
    }

    #[test]
    fn test_spreadsheet_url_prefers_returned_url() {
        let created: CreatedSpreadsheet = serde_json::from_value(json!({
            "spreadsheetId": "abc123",
            "spreadsheetUrl": "https://docs.google.com/spreadsheets/d/abc123/edit"
        }))
        .unwrap();
        assert_eq!(
            spreadsheet_url(created),
            "https://docs.google.com/spreadsheets/d/abc123/edit"
        );
    }

    #[test]
    fn test_spreadsheet_url_falls_back_to_id() {
        let created: CreatedSpreadsheet =
            serde_json::from_value(json!({ "spreadsheetId": "abc123" })).unwrap();
        assert_eq!(
            spreadsheet_url(created),
            format!("{}/abc123", GOOGLE_SHEETS_DOCUMENT_URL)
        );
    }
}
