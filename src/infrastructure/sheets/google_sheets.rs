//! reqwest implementation of [`SheetPublisher`] over the Sheets v4 and
//! Drive v3 REST APIs.

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::json;
use url::Url;

use crate::config::Config;
use crate::domain::entities::CampaignReport;
use crate::domain::gateways::{PublishTarget, SheetPublisher};
use crate::error::AppError;
use crate::infrastructure::http_client_builder;
use crate::infrastructure::sheets::layout::{
    BatchUpdateValuesRequest, CHART_DATA_RANGE, CellUpdateBatch, SpreadsheetInfo, ValueInputOption,
    ValueRange, campaign_cells, chart_labels, plan_template_sheets, weekly_cells,
};
use crate::utils::calendar::{fridays_in_month, sheet_name, spreadsheet_name, week_friday};
use crate::utils::timezone::format_updated_at;

const SHEETS_API: &str = "https://sheets.googleapis.com/v4/spreadsheets";
const DRIVE_API: &str = "https://www.googleapis.com/drive/v3/files";
const SPREADSHEET_MIME: &str = "application/vnd.google-apps.spreadsheet";

#[derive(Debug, Deserialize)]
struct DriveFileList {
    #[serde(default)]
    files: Vec<DriveFile>,
}

#[derive(Debug, Deserialize)]
struct DriveFile {
    id: String,
}

/// Publishes reports to Google Sheets with an OAuth bearer token.
pub struct GoogleSheetsPublisher {
    client: reqwest::Client,
    access_token: String,
    template_id: String,
}

impl GoogleSheetsPublisher {
    /// Creates a publisher from the configured token and template.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Config`] if `GOOGLE_ACCESS_TOKEN` is unset or the
    /// HTTP client cannot be built.
    pub fn new(config: &Config) -> Result<Self, AppError> {
        let access_token = config
            .google_access_token
            .clone()
            .ok_or_else(|| AppError::config("GOOGLE_ACCESS_TOKEN is required to publish"))?;

        let client = http_client_builder(config)
            .build()
            .map_err(|e| AppError::config(format!("Google HTTP client: {}", e)))?;

        Ok(Self {
            client,
            access_token,
            template_id: config.template_id.clone(),
        })
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, AppError> {
        let response = request.bearer_auth(&self.access_token).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::from_problem("sheets", status.as_u16(), &body));
        }

        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }

    /// `{SHEETS_API}/{spreadsheet_id}/{segments...}` with each segment
    /// percent-encoded, so sheet names with spaces survive.
    fn sheets_url(spreadsheet_id: &str, segments: &[&str]) -> Result<Url, AppError> {
        let mut url = Url::parse(SHEETS_API).map_err(|e| AppError::sheet(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| AppError::sheet("Sheets API URL cannot carry a path"))?
            .push(spreadsheet_id)
            .extend(segments);
        Ok(url)
    }

    async fn find_spreadsheet(&self, name: &str) -> Result<Option<String>, AppError> {
        let query = format!(
            "name = '{}' and mimeType = '{}' and trashed = false",
            name.replace('\'', "\\'"),
            SPREADSHEET_MIME
        );
        let list: DriveFileList = self
            .send(
                self.client
                    .get(DRIVE_API)
                    .query(&[("q", query.as_str()), ("fields", "files(id)")]),
            )
            .await?;

        Ok(list.files.into_iter().next().map(|f| f.id))
    }

    async fn copy_template(&self, name: &str) -> Result<String, AppError> {
        let url = format!("{}/{}/copy", DRIVE_API, self.template_id);
        let file: DriveFile = self
            .send(self.client.post(url).json(&json!({ "name": name })))
            .await?;
        Ok(file.id)
    }

    async fn sheet_properties(&self, spreadsheet_id: &str) -> Result<SpreadsheetInfo, AppError> {
        let url = Self::sheets_url(spreadsheet_id, &[])?;
        self.send(
            self.client
                .get(url)
                .query(&[("fields", "sheets.properties(sheetId,title)")]),
        )
        .await
    }

    async fn batch_update(
        &self,
        spreadsheet_id: &str,
        body: &serde_json::Value,
    ) -> Result<(), AppError> {
        let url = Self::sheets_url(&format!("{}:batchUpdate", spreadsheet_id), &[])?;
        let _: serde_json::Value = self.send(self.client.post(url).json(body)).await?;
        Ok(())
    }

    async fn update_values(
        &self,
        spreadsheet_id: &str,
        range: &ValueRange,
        input: ValueInputOption,
    ) -> Result<(), AppError> {
        let url = Self::sheets_url(spreadsheet_id, &["values", &range.range])?;
        let _: serde_json::Value = self
            .send(
                self.client
                    .put(url)
                    .query(&[("valueInputOption", input.as_str())])
                    .json(range),
            )
            .await?;
        Ok(())
    }

    async fn append_values(
        &self,
        spreadsheet_id: &str,
        range: &ValueRange,
        input: ValueInputOption,
    ) -> Result<(), AppError> {
        let url = Self::sheets_url(spreadsheet_id, &["values", &format!("{}:append", range.range)])?;
        let _: serde_json::Value = self
            .send(
                self.client
                    .post(url)
                    .query(&[("valueInputOption", input.as_str())])
                    .json(range),
            )
            .await?;
        Ok(())
    }

    async fn batch_update_values(
        &self,
        spreadsheet_id: &str,
        request: &BatchUpdateValuesRequest,
    ) -> Result<(), AppError> {
        let url = Self::sheets_url(spreadsheet_id, &["values:batchUpdate"])?;
        tracing::debug!(spreadsheet_id, data = ?request.data, "Writing cells");
        let _: serde_json::Value = self.send(self.client.post(url).json(request)).await?;
        Ok(())
    }

    async fn write_cells(&self, spreadsheet_id: &str, cells: CellUpdateBatch) -> Result<(), AppError> {
        if cells.dropped_rows() > 0 {
            tracing::warn!(
                spreadsheet_id,
                dropped = cells.dropped_rows(),
                "More URLs than the sheet has rows for, lowest rates left out"
            );
        }
        if cells.is_empty() {
            return Ok(());
        }
        self.batch_update_values(spreadsheet_id, &cells.into_request(ValueInputOption::Raw))
            .await
    }

    /// Returns the id of the month's spreadsheet, creating it from the
    /// template when Drive has none by that name.
    async fn monthly_spreadsheet(&self, friday: NaiveDate) -> Result<String, AppError> {
        let name = spreadsheet_name(friday);
        if let Some(id) = self.find_spreadsheet(&name).await? {
            tracing::debug!(spreadsheet = %name, spreadsheet_id = %id, "Found monthly spreadsheet");
            return Ok(id);
        }

        let id = self.copy_template(&name).await?;
        let titles: Vec<String> = fridays_in_month(friday).into_iter().map(sheet_name).collect();

        let info = self.sheet_properties(&id).await?;
        let properties: Vec<_> = info.sheets.into_iter().map(|s| s.properties).collect();
        let plan = plan_template_sheets(&properties, &titles);
        if !plan.is_empty() {
            self.batch_update(&id, &plan.to_body()).await?;
        }

        self.update_values(&id, &chart_labels(&titles), ValueInputOption::UserEntered)
            .await?;

        tracing::info!(spreadsheet = %name, spreadsheet_id = %id, sheets = titles.len(), "Created monthly spreadsheet from template");
        Ok(id)
    }
}

#[async_trait]
impl SheetPublisher for GoogleSheetsPublisher {
    async fn publish(&self, target: &PublishTarget, report: &CampaignReport) -> Result<(), AppError> {
        match target {
            PublishTarget::Campaign { spreadsheet_id } => {
                let label = ValueRange::column(CHART_DATA_RANGE, vec![json!(report.campaign_name)]);
                self.append_values(spreadsheet_id, &label, ValueInputOption::UserEntered)
                    .await?;
                self.write_cells(spreadsheet_id, campaign_cells(report)).await?;

                tracing::info!(spreadsheet_id = %spreadsheet_id, sheet = %report.campaign_name, "Wrote campaign sheet");
            }
            PublishTarget::Weekly { run_date } => {
                let friday = week_friday(*run_date);
                let spreadsheet_id = self.monthly_spreadsheet(friday).await?;
                let sheet = sheet_name(friday);

                let cells = weekly_cells(&sheet, report, &format_updated_at(Utc::now()));
                self.write_cells(&spreadsheet_id, cells).await?;

                tracing::info!(spreadsheet_id = %spreadsheet_id, sheet = %sheet, "Wrote weekly sheet");
            }
        }
        Ok(())
    }
}
