use super::patterns::{is_email, is_url, mailto, normalize_url};
use super::types::{ColumnClassification, ContentType, ExcelError, Sheet};

/// Attach hyperlinks to the qualifying cells of a classified sheet.
///
/// Returns a converted copy and the number of links created; the input is left alone.
/// Only `website` and `email` columns are touched, and within them only the cells whose
/// own value matches the column's pattern. Displayed values are never modified. Cells
/// that already carry a link are re-derived from their current text.
pub fn convert(
    sheet: &Sheet,
    classifications: &[ColumnClassification],
) -> Result<(Sheet, usize), ExcelError> {
    let col_count = sheet.col_count();
    let mut converted = sheet.clone();
    let mut created = 0;

    for classification in classifications {
        if !classification.content_type.is_linkable() {
            continue;
        }

        let col = classification.column;
        if col >= col_count {
            return Err(ExcelError::conversion_error(format!(
                "Column {} ('{}') is outside sheet '{}' with {} columns",
                col, classification.header, sheet.name, col_count
            )));
        }

        for row in converted.rows.iter_mut().skip(1) {
            let Some(cell) = row.get_mut(col) else { continue };
            let Some(text) = cell.value.text() else { continue };

            let target = match classification.content_type {
                ContentType::Website if is_url(&text) => normalize_url(&text),
                ContentType::Email if is_email(&text) => mailto(&text),
                _ => continue,
            };

            cell.hyperlink = Some(target);
            created += 1;
        }
    }

    Ok((converted, created))
}
