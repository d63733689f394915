use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Represents a cell value with type information
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum CellValue {
    Empty,
    Text(String),
    Number(f64),
}

impl Default for CellValue {
    fn default() -> Self {
        CellValue::Empty
    }
}

impl CellValue {
    /// Trimmed display text, or `None` when the cell holds nothing worth inspecting.
    pub fn text(&self) -> Option<Cow<'_, str>> {
        match self {
            CellValue::Empty => None,
            CellValue::Text(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    None
                } else {
                    Some(Cow::Borrowed(trimmed))
                }
            }
            CellValue::Number(n) => Some(Cow::Owned(format_number(*n))),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.text().is_none()
    }
}

/// Render a number the way a spreadsheet shows it in a plain cell (no trailing `.0`).
fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.is_finite() && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

/// One cell of a loaded sheet: the displayed value plus an optional link target.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    pub value: CellValue,
    pub hyperlink: Option<String>,
}

impl Cell {
    pub fn new(value: CellValue) -> Self {
        Cell {
            value,
            hyperlink: None,
        }
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        if s.is_empty() {
            Cell::new(CellValue::Empty)
        } else {
            Cell::new(CellValue::Text(s.to_string()))
        }
    }
}

/// A rectangular grid of cells. Row 0 is the header row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Sheet {
    pub name: String,
    pub rows: Vec<Vec<Cell>>,
    /// Rows present in the file, which may exceed `rows.len()` when loading was capped.
    pub total_rows: u32,
}

impl Sheet {
    /// Build a sheet from string rows; empty strings become empty cells.
    #[cfg(test)]
    pub(crate) fn from_rows(name: impl Into<String>, rows: &[&[&str]]) -> Self {
        let rows: Vec<Vec<Cell>> = rows
            .iter()
            .map(|row| row.iter().map(|v| Cell::from(*v)).collect())
            .collect();
        let total_rows = rows.len() as u32;
        Sheet {
            name: name.into(),
            rows,
            total_rows,
        }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn col_count(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&Cell> {
        self.rows.get(row).and_then(|r| r.get(col))
    }

    /// Header for a column: first-row text, or "Column A", "Column B", ... by position.
    pub fn header(&self, col: usize) -> String {
        self.cell(0, col)
            .and_then(|c| c.value.text().map(|t| t.into_owned()))
            .unwrap_or_else(|| format!("Column {}", column_index_to_letter(col as u32)))
    }

    /// Values of one column below the header row. Short rows yield `Empty`.
    pub fn column_values(&self, col: usize) -> impl Iterator<Item = &CellValue> + '_ {
        const EMPTY: &CellValue = &CellValue::Empty;
        self.rows
            .iter()
            .skip(1)
            .map(move |row| row.get(col).map(|c| &c.value).unwrap_or(EMPTY))
    }

    /// Coordinates and targets of every linked cell, row-major.
    pub fn hyperlinks(&self) -> impl Iterator<Item = (usize, usize, &str)> + '_ {
        self.rows.iter().enumerate().flat_map(|(r, row)| {
            row.iter()
                .enumerate()
                .filter_map(move |(c, cell)| cell.hyperlink.as_deref().map(|t| (r, c, t)))
        })
    }
}

/// A loaded workbook: its worksheets in file order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Workbook {
    pub sheets: Vec<Sheet>,
}

impl Workbook {
    /// The sheet that gets converted: the first worksheet.
    pub fn primary_sheet(&self) -> Option<&Sheet> {
        self.sheets.first()
    }
}

/// What a column holds, as decided by the classifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Website,
    Email,
    Text,
    Unknown,
}

impl ContentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Website => "website",
            ContentType::Email => "email",
            ContentType::Text => "text",
            ContentType::Unknown => "unknown",
        }
    }

    /// Whether cells in a column of this type are candidates for linking.
    pub fn is_linkable(&self) -> bool {
        matches!(self, ContentType::Website | ContentType::Email)
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classification of a single column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnClassification {
    pub column: usize,
    pub header: String,
    pub content_type: ContentType,
    /// Count of non-empty cells that matched the winning type.
    pub confidence: usize,
}

impl fmt::Display for ColumnClassification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} (confidence: {})",
            self.header, self.content_type, self.confidence
        )
    }
}

/// Outcome of processing one workbook file
#[derive(Debug, Clone, Serialize)]
pub struct ConversionResult {
    pub input_path: PathBuf,
    pub output_path: Option<PathBuf>,
    pub backup_path: Option<PathBuf>,
    pub sheet_name: Option<String>,
    pub rows: usize,
    pub columns: usize,
    pub hyperlink_count: usize,
    pub classifications: Vec<ColumnClassification>,
    pub error: Option<ExcelError>,
}

impl ConversionResult {
    pub fn new(input_path: impl Into<PathBuf>) -> Self {
        ConversionResult {
            input_path: input_path.into(),
            output_path: None,
            backup_path: None,
            sheet_name: None,
            rows: 0,
            columns: 0,
            hyperlink_count: 0,
            classifications: Vec::new(),
            error: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }

    /// The human-readable summary block for this file.
    pub fn report_lines(&self) -> Vec<String> {
        let file_name = self
            .input_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.input_path.display().to_string());

        let mut lines = vec![format!("Processing: {}", file_name)];

        if self.rows > 0 || self.columns > 0 {
            lines.push(format!(
                "Dimensions: {} rows × {} columns",
                self.rows, self.columns
            ));
        }
        lines.extend(self.classifications.iter().map(|c| c.to_string()));

        match &self.error {
            Some(err) => lines.push(format!("Error: {}", err)),
            None => {
                lines.push(format!("Total hyperlinks created: {}", self.hyperlink_count));
                if let Some(ref output) = self.output_path {
                    lines.push(format!("Saved as: {}", output.display()));
                }
                if let Some(ref backup) = self.backup_path {
                    lines.push(format!("Backup: {}", backup.display()));
                }
            }
        }

        lines
    }
}

/// Aggregate of a directory run
#[derive(Debug, Clone, Serialize)]
pub struct BatchSummary {
    pub directory: PathBuf,
    pub results: Vec<ConversionResult>,
}

impl BatchSummary {
    pub fn succeeded(&self) -> usize {
        self.results.iter().filter(|r| r.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.results.len() - self.succeeded()
    }

    pub fn total_hyperlinks(&self) -> usize {
        self.results.iter().map(|r| r.hyperlink_count).sum()
    }
}

/// Errors raised while linking a workbook
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
#[error("{message}")]
pub struct ExcelError {
    pub message: String,
    pub error_type: ExcelErrorType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExcelErrorType {
    Load,
    Backup,
    Conversion,
    Save,
    Config,
    InvalidInput,
}

impl ExcelError {
    pub fn new(message: impl Into<String>, error_type: ExcelErrorType) -> Self {
        ExcelError {
            message: message.into(),
            error_type,
        }
    }

    pub fn file_not_found(path: &str) -> Self {
        ExcelError::new(format!("File not found: {}", path), ExcelErrorType::Load)
    }

    pub fn load_error(message: impl Into<String>) -> Self {
        ExcelError::new(message, ExcelErrorType::Load)
    }

    pub fn backup_error(message: impl Into<String>) -> Self {
        ExcelError::new(message, ExcelErrorType::Backup)
    }

    pub fn conversion_error(message: impl Into<String>) -> Self {
        ExcelError::new(message, ExcelErrorType::Conversion)
    }

    pub fn save_error(message: impl Into<String>) -> Self {
        ExcelError::new(message, ExcelErrorType::Save)
    }

    pub fn config_error(message: impl Into<String>) -> Self {
        ExcelError::new(message, ExcelErrorType::Config)
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        ExcelError::new(message, ExcelErrorType::InvalidInput)
    }
}

/// Convert column index (0-based) to Excel column letter (A, B, ..., Z, AA, AB, ...)
pub fn column_index_to_letter(index: u32) -> String {
    let mut result = String::new();
    let mut n = index + 1;

    while n > 0 {
        n -= 1;
        let c = (b'A' + (n % 26) as u8) as char;
        result.insert(0, c);
        n /= 26;
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_index_to_letter() {
        assert_eq!(column_index_to_letter(0), "A");
        assert_eq!(column_index_to_letter(1), "B");
        assert_eq!(column_index_to_letter(25), "Z");
        assert_eq!(column_index_to_letter(26), "AA");
        assert_eq!(column_index_to_letter(27), "AB");
        assert_eq!(column_index_to_letter(51), "AZ");
        assert_eq!(column_index_to_letter(52), "BA");
    }

    #[test]
    fn test_header_falls_back_to_column_letter() {
        let sheet = Sheet::from_rows("Sheet1", &[&["Name", ""], &["a", "b"]]);
        assert_eq!(sheet.header(0), "Name");
        assert_eq!(sheet.header(1), "Column B");
        assert_eq!(sheet.header(2), "Column C");
    }

    #[test]
    fn test_column_values_skip_header_and_pad_short_rows() {
        let sheet = Sheet::from_rows("Sheet1", &[&["A", "B"], &["1", "2"], &["3"]]);
        let values: Vec<_> = sheet.column_values(1).cloned().collect();
        assert_eq!(
            values,
            vec![CellValue::Text("2".to_string()), CellValue::Empty]
        );
    }

    #[test]
    fn test_number_text_has_no_trailing_zero() {
        assert_eq!(CellValue::Number(42.0).text().as_deref(), Some("42"));
        assert_eq!(CellValue::Number(1.5).text().as_deref(), Some("1.5"));
        assert!(CellValue::Text("   ".to_string()).is_empty());
    }

    #[test]
    fn test_report_lines_for_failure() {
        let mut result = ConversionResult::new("/tmp/data/broken.xlsx");
        result.error = Some(ExcelError::load_error("Failed to open workbook: bad zip"));

        let lines = result.report_lines();
        assert_eq!(lines[0], "Processing: broken.xlsx");
        assert_eq!(lines.last().unwrap(), "Error: Failed to open workbook: bad zip");
        assert!(!lines.iter().any(|l| l.starts_with("Dimensions")));
    }
}
