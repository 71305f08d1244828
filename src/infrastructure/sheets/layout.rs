//! Cell layout of the metrics spreadsheets and the request bodies that fill it.
//!
//! Everything here is pure: the builders produce the JSON the Sheets API
//! expects, and [`super::GoogleSheetsPublisher`] sends it.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::domain::entities::{CampaignReport, UrlRate};

/// Chart source column on the `Master` worksheet.
pub const CHART_DATA_RANGE: &str = "Master!I11:I16";

/// Template worksheets to be renamed carry this title suffix.
pub const TEMPLATE_SHEET_SUFFIX: &str = "Friday";

/// Fixed cell blocks of one worksheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SheetLayout {
    pub overview_cells: &'static str,
    pub url_cells: &'static str,
    /// Rows available in `url_cells`.
    pub url_rows: usize,
}

/// Weekly worksheet: `[updated-at, open rate, click rate]` down column B.
pub const WEEKLY_LAYOUT: SheetLayout = SheetLayout {
    overview_cells: "B1:B3",
    url_cells: "C6:E116",
    url_rows: 111,
};

/// Per-campaign worksheet: `[open rate, click rate]` down column B.
pub const CAMPAIGN_LAYOUT: SheetLayout = SheetLayout {
    overview_cells: "B2:B3",
    url_cells: "C6:E22",
    url_rows: 17,
};

/// A1 range on a named worksheet. The name is always quoted.
pub fn sheet_range(sheet: &str, cells: &str) -> String {
    format!("'{}'!{}", sheet.replace('\'', "''"), cells)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MajorDimension {
    Rows,
    Columns,
}

/// How the Sheets API interprets written values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueInputOption {
    Raw,
    UserEntered,
}

impl ValueInputOption {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Raw => "RAW",
            Self::UserEntered => "USER_ENTERED",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueRange {
    pub range: String,
    pub major_dimension: MajorDimension,
    pub values: Vec<Vec<Value>>,
}

impl ValueRange {
    /// A single column starting at the top of `range`.
    pub fn column(range: impl Into<String>, values: Vec<Value>) -> Self {
        Self {
            range: range.into(),
            major_dimension: MajorDimension::Columns,
            values: vec![values],
        }
    }

    pub fn rows(range: impl Into<String>, rows: Vec<Vec<Value>>) -> Self {
        Self {
            range: range.into(),
            major_dimension: MajorDimension::Rows,
            values: rows,
        }
    }
}

/// Body of `values:batchUpdate`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchUpdateValuesRequest {
    pub value_input_option: &'static str,
    pub data: Vec<ValueRange>,
}

/// Overview and URL blocks of one worksheet, written together.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CellUpdateBatch {
    overview: Option<ValueRange>,
    urls: Option<ValueRange>,
    dropped_rows: usize,
}

impl CellUpdateBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_overview(&mut self, range: String, values: Vec<Value>) {
        self.overview = Some(ValueRange::column(range, values));
    }

    /// URL rows in the given order, cut to the layout's capacity.
    pub fn set_urls(&mut self, range: String, rates: &[UrlRate], capacity: usize) {
        let rows = rates
            .iter()
            .take(capacity)
            .map(|r| vec![json!(r.url), json!(r.click_rate), json!(r.unique_click_rate)])
            .collect();
        self.dropped_rows = rates.len().saturating_sub(capacity);
        self.urls = Some(ValueRange::rows(range, rows));
    }

    /// URL rows that did not fit the layout.
    pub fn dropped_rows(&self) -> usize {
        self.dropped_rows
    }

    pub fn is_empty(&self) -> bool {
        self.overview.is_none() && self.urls.is_none()
    }

    pub fn into_request(self, input: ValueInputOption) -> BatchUpdateValuesRequest {
        BatchUpdateValuesRequest {
            value_input_option: input.as_str(),
            data: self.overview.into_iter().chain(self.urls).collect(),
        }
    }
}

/// Cells of a per-campaign worksheet named after the campaign.
pub fn campaign_cells(report: &CampaignReport) -> CellUpdateBatch {
    let sheet = &report.campaign_name;
    let mut batch = CellUpdateBatch::new();
    batch.set_overview(
        sheet_range(sheet, CAMPAIGN_LAYOUT.overview_cells),
        vec![json!(report.summary.open_rate), json!(report.summary.click_rate)],
    );
    batch.set_urls(
        sheet_range(sheet, CAMPAIGN_LAYOUT.url_cells),
        &report.url_rates,
        CAMPAIGN_LAYOUT.url_rows,
    );
    batch
}

/// Cells of a weekly worksheet, stamped with `updated_at`.
pub fn weekly_cells(sheet: &str, report: &CampaignReport, updated_at: &str) -> CellUpdateBatch {
    let mut batch = CellUpdateBatch::new();
    batch.set_overview(
        sheet_range(sheet, WEEKLY_LAYOUT.overview_cells),
        vec![
            json!(updated_at),
            json!(report.summary.open_rate),
            json!(report.summary.click_rate),
        ],
    );
    batch.set_urls(
        sheet_range(sheet, WEEKLY_LAYOUT.url_cells),
        &report.url_rates,
        WEEKLY_LAYOUT.url_rows,
    );
    batch
}

/// Chart labels for a fresh monthly spreadsheet.
///
/// The leading apostrophe keeps `October 2` from being parsed as a date.
pub fn chart_labels(sheet_names: &[String]) -> ValueRange {
    ValueRange::column(
        CHART_DATA_RANGE,
        sheet_names.iter().map(|n| json!(format!("'{n}"))).collect(),
    )
}

/// Structural edits sent through `spreadsheets:batchUpdate`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SheetRequestBatch {
    requests: Vec<Value>,
}

impl SheetRequestBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rename_sheet(&mut self, sheet_id: i64, title: &str) {
        self.requests.push(json!({
            "updateSheetProperties": {
                "properties": {"sheetId": sheet_id, "title": title},
                "fields": "title"
            }
        }));
    }

    pub fn delete_sheet(&mut self, sheet_id: i64) {
        self.requests.push(json!({
            "deleteSheet": {"sheetId": sheet_id}
        }));
    }

    pub fn len(&self) -> usize {
        self.requests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    pub fn to_body(&self) -> Value {
        json!({ "requests": self.requests })
    }
}

/// `GET spreadsheets/{id}?fields=sheets.properties(sheetId,title)`
#[derive(Debug, Deserialize)]
pub struct SpreadsheetInfo {
    #[serde(default)]
    pub sheets: Vec<SheetEntry>,
}

#[derive(Debug, Deserialize)]
pub struct SheetEntry {
    pub properties: SheetProperties,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetProperties {
    pub sheet_id: i64,
    pub title: String,
}

/// Renames the template's placeholder worksheets to `titles`, in order, and
/// deletes the placeholders left over. Other worksheets are untouched.
pub fn plan_template_sheets(sheets: &[SheetProperties], titles: &[String]) -> SheetRequestBatch {
    let mut batch = SheetRequestBatch::new();
    let mut titles = titles.iter();

    for sheet in sheets
        .iter()
        .filter(|s| s.title.ends_with(TEMPLATE_SHEET_SUFFIX))
    {
        match titles.next() {
            Some(title) => batch.rename_sheet(sheet.sheet_id, title),
            None => batch.delete_sheet(sheet.sheet_id),
        }
    }
    batch
}
