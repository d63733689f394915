use std::path::{Path, PathBuf};
use umya_spreadsheet::{reader, writer, Hyperlink, Spreadsheet, Worksheet};

use super::types::{ExcelError, Sheet};

/// Suffix inserted before the extension of converted files
pub const OUTPUT_SUFFIX: &str = "_with_hyperlinks";

/// Extensions umya-spreadsheet can write back, lowercase with the leading dot
pub const WRITABLE_EXTENSIONS: [&str; 4] = [".xlsx", ".xlsm", ".xltx", ".xltm"];

/// Visual style applied to linked cells: the given font colour plus a single underline
#[derive(Debug, Clone)]
pub struct HyperlinkStyle {
    /// RGB hex, e.g. "0000FF"
    pub color: String,
}

impl Default for HyperlinkStyle {
    fn default() -> Self {
        HyperlinkStyle {
            color: "0000FF".to_string(),
        }
    }
}

/// Whether `path` names an OOXML workbook that can be saved with links.
pub fn is_writable(path: &Path) -> bool {
    let Some(ext) = path.extension() else { return false };
    let ext = format!(".{}", ext.to_string_lossy().to_ascii_lowercase());
    WRITABLE_EXTENSIONS.contains(&ext.as_str())
}

/// `<dir>/<stem>_with_hyperlinks.<ext>` next to the input
pub fn output_path_for(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    let file_name = match input.extension() {
        Some(ext) => format!("{}{}.{}", stem, OUTPUT_SUFFIX, ext.to_string_lossy()),
        None => format!("{}{}", stem, OUTPUT_SUFFIX),
    };

    input.with_file_name(file_name)
}

/// Write the links of a converted sheet into a copy of `source` saved at `output`.
///
/// The source is reopened so formatting and formulas survive; only hyperlink targets and
/// link styling are added. The file is written to a temporary sibling first and persisted
/// into place, so an interrupted save never leaves a half-written output. The temporary
/// file is removed on every failure path.
pub fn save_hyperlinks(
    source: &Path,
    sheet: &Sheet,
    output: &Path,
    style: &HyperlinkStyle,
) -> Result<usize, ExcelError> {
    let mut book = reader::xlsx::read(source).map_err(|e| {
        ExcelError::save_error(format!(
            "Failed to reopen {} for writing: {}",
            source.display(),
            e
        ))
    })?;

    let applied = apply_hyperlinks(&mut book, sheet, style)?;

    let dir = output
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let tmp_path = tempfile::Builder::new()
        .prefix(".")
        .suffix(".tmp")
        .tempfile_in(dir)
        .map_err(|e| {
            ExcelError::save_error(format!(
                "Failed to create temporary file in {}: {}",
                dir.display(),
                e
            ))
        })?
        .into_temp_path();

    writer::xlsx::write(&book, &*tmp_path).map_err(|e| {
        ExcelError::save_error(format!(
            "Failed to save workbook {}: {}",
            output.display(),
            e
        ))
    })?;

    tmp_path.persist(output).map_err(|e| {
        ExcelError::save_error(format!(
            "Failed to move saved workbook to {}: {}",
            output.display(),
            e.error
        ))
    })?;

    Ok(applied)
}

fn apply_hyperlinks(
    book: &mut Spreadsheet,
    sheet: &Sheet,
    style: &HyperlinkStyle,
) -> Result<usize, ExcelError> {
    let worksheet = book.get_sheet_by_name_mut(&sheet.name).ok_or_else(|| {
        ExcelError::conversion_error(format!("Sheet not found in workbook: {}", sheet.name))
    })?;

    let mut applied = 0;
    for (row, col, target) in sheet.hyperlinks() {
        apply_single_link(worksheet, row, col, target, style);
        applied += 1;
    }

    Ok(applied)
}

fn apply_single_link(
    worksheet: &mut Worksheet,
    row: usize,
    col: usize,
    target: &str,
    style: &HyperlinkStyle,
) {
    // Excel uses 1-based indexing
    let cell = worksheet.get_cell_mut(((col + 1) as u32, (row + 1) as u32));

    let mut link = Hyperlink::default();
    link.set_url(target);
    cell.set_hyperlink(link);

    let font = cell.get_style_mut().get_font_mut();
    font.get_color_mut().set_argb(format!("FF{}", style.color));
    font.set_underline("single");
}
