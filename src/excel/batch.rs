use glob::{glob_with, MatchOptions};
use std::path::{Path, PathBuf};

use super::backup::create_backup;
use super::classifier::classify;
use super::converter::convert;
use super::reader::load_workbook;
use super::types::*;
use super::writer::{is_writable, output_path_for, save_hyperlinks, OUTPUT_SUFFIX, WRITABLE_EXTENSIONS};
use crate::context::LinkerContext;

/// Run one file through load → backup → classify → convert → save.
///
/// Never fails: every error ends up in `ConversionResult::error`.
pub fn process_file(ctx: &LinkerContext, path: &Path) -> ConversionResult {
    let span = tracing::info_span!("file", path = %path.display());
    let _guard = span.enter();

    tracing::info!("Starting processing: {}", path.display());

    let mut result = ConversionResult::new(path);
    if let Err(e) = run_pipeline(ctx, path, &mut result) {
        tracing::error!("Error processing {}: {}", path.display(), e);
        result.output_path = None;
        result.error = Some(e);
    }

    result
}

fn run_pipeline(
    ctx: &LinkerContext,
    path: &Path,
    result: &mut ConversionResult,
) -> Result<(), ExcelError> {
    let config = &ctx.config;

    // Outputs are written with umya, which only handles the OOXML family.
    if !is_writable(path) {
        return Err(ExcelError::invalid_input(format!(
            "Cannot save links into {}: supported formats are {}",
            path.display(),
            WRITABLE_EXTENSIONS.join(", ")
        )));
    }

    let workbook = load_workbook(path, config.max_rows_to_process)?;
    let sheet = workbook
        .primary_sheet()
        .ok_or_else(|| ExcelError::load_error("Workbook has no worksheets"))?;

    result.sheet_name = Some(sheet.name.clone());
    result.rows = sheet.row_count();
    result.columns = sheet.col_count();
    tracing::info!(
        "Dimensions: {} rows × {} columns (sheet '{}')",
        result.rows,
        result.columns,
        sheet.name
    );
    if sheet.total_rows as usize > sheet.row_count() {
        tracing::warn!(
            "Only the first {} of {} rows are processed",
            sheet.row_count(),
            sheet.total_rows
        );
    }

    if config.backup_files {
        result.backup_path = Some(create_backup(path, &config.backup_dir)?);
    }

    let classifications = classify(sheet);
    for classification in &classifications {
        tracing::debug!("{}", classification);
    }
    result.classifications = classifications;

    let (converted, created) = convert(sheet, &result.classifications)?;
    result.hyperlink_count = created;

    let output = output_path_for(path);
    save_hyperlinks(path, &converted, &output, &config.hyperlink_style())?;

    tracing::info!(
        "Conversion completed: {} links converted, saved as {}",
        created,
        output.display()
    );
    result.output_path = Some(output);
    Ok(())
}

/// Workbook files directly inside `dir`, sorted by path.
///
/// Outputs of earlier runs and Office lock files are left out.
pub fn find_workbooks(dir: &Path, extensions: &[String]) -> Result<Vec<PathBuf>, ExcelError> {
    if !dir.is_dir() {
        return Err(ExcelError::invalid_input(format!(
            "Folder not found: {}",
            dir.display()
        )));
    }

    let options = MatchOptions {
        case_sensitive: false,
        require_literal_separator: true,
        require_literal_leading_dot: true,
    };

    let escaped_dir = glob::Pattern::escape(&dir.to_string_lossy());
    let mut files = Vec::new();

    for ext in extensions {
        let ext = ext.trim_start_matches('.');
        let pattern = format!("{}/*.{}", escaped_dir, glob::Pattern::escape(ext));

        let entries = glob_with(&pattern, options)
            .map_err(|e| ExcelError::invalid_input(format!("Bad extension '{}': {}", ext, e)))?;

        files.extend(
            entries
                .filter_map(Result::ok)
                .filter(|p| p.is_file() && !is_skipped(p)),
        );
    }

    files.sort();
    files.dedup();
    Ok(files)
}

fn is_skipped(path: &Path) -> bool {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    name.starts_with("~$") || stem.ends_with(OUTPUT_SUFFIX)
}

/// Process every workbook in a directory (non-recursive).
pub fn process_directory(ctx: &LinkerContext, dir: &Path) -> Result<BatchSummary, ExcelError> {
    process_directory_with_progress(ctx, dir, |_, _, _| {})
}

/// Like [`process_directory`], calling `on_file(index, total, result)` after each file.
pub fn process_directory_with_progress<F>(
    ctx: &LinkerContext,
    dir: &Path,
    mut on_file: F,
) -> Result<BatchSummary, ExcelError>
where
    F: FnMut(usize, usize, &ConversionResult),
{
    let files = find_workbooks(dir, &ctx.config.supported_extensions)?;
    let total = files.len();

    if total == 0 {
        tracing::warn!("No Excel files found in: {}", dir.display());
    } else {
        tracing::info!("Found {} Excel files to process", total);
    }

    let mut results = Vec::with_capacity(total);
    for (index, file) in files.iter().enumerate() {
        let result = process_file(ctx, file);
        on_file(index, total, &result);
        results.push(result);
    }

    let summary = BatchSummary {
        directory: dir.to_path_buf(),
        results,
    };
    tracing::info!(
        "Batch processing completed: {}/{} files successful",
        summary.succeeded(),
        total
    );

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LinkerConfig;

    fn test_context(root: &Path) -> LinkerContext {
        let config = LinkerConfig {
            backup_dir: root.join("backups"),
            ..LinkerConfig::default()
        };
        LinkerContext::new(config, None)
    }

    fn write_contacts(path: &Path) {
        let mut book = umya_spreadsheet::new_file();
        let ws = book.get_sheet_by_name_mut("Sheet1").unwrap();
        ws.get_cell_mut("A1").set_value("Name");
        ws.get_cell_mut("B1").set_value("Link");
        ws.get_cell_mut("C1").set_value("Email");
        ws.get_cell_mut("A2").set_value("A");
        ws.get_cell_mut("B2").set_value("example.com");
        ws.get_cell_mut("C2").set_value("a@b.com");
        ws.get_cell_mut("A3").set_value("B");
        ws.get_cell_mut("B3").set_value("not a link");
        ws.get_cell_mut("C3").set_value("c@d.com");
        umya_spreadsheet::writer::xlsx::write(&book, path).unwrap();
    }

    #[test]
    fn test_process_file_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = test_context(dir.path());
        let input = dir.path().join("contacts.xlsx");
        write_contacts(&input);
        let original = std::fs::read(&input).unwrap();

        let result = process_file(&ctx, &input);

        assert!(result.error.is_none(), "{:?}", result.error);
        assert_eq!(result.hyperlink_count, 3);
        assert_eq!((result.rows, result.columns), (3, 3));
        assert_eq!(
            result
                .classifications
                .iter()
                .map(|c| c.to_string())
                .collect::<Vec<_>>(),
            vec![
                "Name: text (confidence: 2)",
                "Link: website (confidence: 1)",
                "Email: email (confidence: 2)",
            ]
        );

        let output = result.output_path.clone().unwrap();
        assert_eq!(output, dir.path().join("contacts_with_hyperlinks.xlsx"));
        let backup = result.backup_path.clone().unwrap();
        assert!(backup.starts_with(dir.path().join("backups")));
        assert_eq!(std::fs::read(&backup).unwrap(), original);
        // Source is never written
        assert_eq!(std::fs::read(&input).unwrap(), original);

        // Backup exists and predates the output
        let backup_time = std::fs::metadata(&backup).unwrap().modified().unwrap();
        let output_time = std::fs::metadata(&output).unwrap().modified().unwrap();
        assert!(backup_time <= output_time);

        let saved = umya_spreadsheet::reader::xlsx::read(&output).unwrap();
        let ws = saved.get_sheet_by_name("Sheet1").unwrap();
        assert_eq!(
            ws.get_cell("B2").unwrap().get_hyperlink().unwrap().get_url(),
            "https://example.com"
        );
        assert_eq!(ws.get_cell("B2").unwrap().get_value(), "example.com");
        assert!(ws.get_cell("B3").unwrap().get_hyperlink().is_none());
        assert_eq!(
            ws.get_cell("C3").unwrap().get_hyperlink().unwrap().get_url(),
            "mailto:c@d.com"
        );

        let lines = result.report_lines();
        assert!(lines.contains(&"Dimensions: 3 rows × 3 columns".to_string()));
        assert!(lines.contains(&"Total hyperlinks created: 3".to_string()));
    }

    #[test]
    fn test_rerun_on_output_derives_same_links() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = test_context(dir.path());
        let input = dir.path().join("contacts.xlsx");
        write_contacts(&input);

        let first = process_file(&ctx, &input);
        let second = process_file(&ctx, first.output_path.as_ref().unwrap());

        assert!(second.error.is_none(), "{:?}", second.error);
        assert_eq!(first.hyperlink_count, second.hyperlink_count);
        assert_eq!(first.classifications, second.classifications);
    }

    #[test]
    fn test_backups_can_be_disabled() {
        let dir = tempfile::tempdir().unwrap();
        let mut ctx = test_context(dir.path());
        ctx.config.backup_files = false;
        let input = dir.path().join("contacts.xlsx");
        write_contacts(&input);

        let result = process_file(&ctx, &input);
        assert!(result.error.is_none());
        assert!(result.backup_path.is_none());
        assert!(!dir.path().join("backups").exists());
    }

    #[test]
    fn test_unwritable_backup_dir_skips_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut ctx = test_context(dir.path());
        let blocker = dir.path().join("blocked");
        std::fs::write(&blocker, b"file, not dir").unwrap();
        ctx.config.backup_dir = blocker;
        let input = dir.path().join("contacts.xlsx");
        write_contacts(&input);

        let result = process_file(&ctx, &input);
        let err = result.error.unwrap();
        assert_eq!(err.error_type, ExcelErrorType::Backup);
        assert!(result.output_path.is_none());
        assert!(!dir.path().join("contacts_with_hyperlinks.xlsx").exists());
    }

    #[test]
    fn test_unwritable_output_is_save_error() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = test_context(dir.path());
        let input = dir.path().join("c.xlsx");
        write_contacts(&input);
        std::fs::create_dir(dir.path().join("c_with_hyperlinks.xlsx")).unwrap();

        let result = process_file(&ctx, &input);

        assert_eq!(result.error.as_ref().unwrap().error_type, ExcelErrorType::Save);
        assert!(result.output_path.is_none());
        assert!(result.backup_path.as_ref().unwrap().exists());

        let mut names: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        assert_eq!(names, vec!["backups", "c.xlsx", "c_with_hyperlinks.xlsx"]);
    }

    #[test]
    fn test_legacy_format_is_rejected_before_backup() {
        let dir = tempfile::tempdir().unwrap();
        let mut ctx = test_context(dir.path());
        ctx.config.supported_extensions.push(".xls".to_string());
        let input = dir.path().join("old.xls");
        std::fs::write(&input, b"legacy bytes").unwrap();

        let result = process_file(&ctx, &input);

        assert_eq!(
            result.error.as_ref().unwrap().error_type,
            ExcelErrorType::InvalidInput
        );
        assert!(result.backup_path.is_none());
        assert!(!dir.path().join("backups").exists());
    }

    #[test]
    fn test_directory_with_corrupt_file_keeps_going() {
        let dir = tempfile::tempdir().unwrap();
        let data = dir.path().join("data");
        std::fs::create_dir(&data).unwrap();
        let ctx = test_context(dir.path());

        write_contacts(&data.join("a.xlsx"));
        std::fs::write(data.join("b.xlsx"), b"corrupted bytes").unwrap();
        write_contacts(&data.join("c.xlsx"));
        std::fs::write(data.join("notes.txt"), b"ignored").unwrap();

        let summary = process_directory(&ctx, &data).unwrap();

        assert_eq!(summary.results.len(), 3);
        let names: Vec<_> = summary
            .results
            .iter()
            .map(|r| r.input_path.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.xlsx", "b.xlsx", "c.xlsx"]);

        for ok in [&summary.results[0], &summary.results[2]] {
            assert!(ok.error.is_none());
            assert!(ok.output_path.as_ref().unwrap().exists());
            assert!(ok.backup_path.as_ref().unwrap().exists());
        }

        let bad = &summary.results[1];
        assert_eq!(bad.error.as_ref().unwrap().error_type, ExcelErrorType::Load);
        assert!(bad.output_path.is_none());
        assert!(bad.backup_path.is_none());

        assert_eq!(summary.succeeded(), 2);
        assert_eq!(summary.failed(), 1);
        assert_eq!(summary.total_hyperlinks(), 6);
    }

    #[test]
    fn test_find_workbooks_skips_outputs_and_lock_files() {
        let dir = tempfile::tempdir().unwrap();
        for name in [
            "b.XLSX",
            "a.xlsm",
            "a_with_hyperlinks.xlsm",
            "~$a.xlsx",
            "c.csv",
        ] {
            std::fs::write(dir.path().join(name), b"x").unwrap();
        }
        std::fs::create_dir(dir.path().join("nested.xlsx")).unwrap();

        let files = find_workbooks(dir.path(), &LinkerConfig::default().supported_extensions)
            .unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.xlsm", "b.XLSX"]);
    }

    #[test]
    fn test_missing_directory_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = test_context(dir.path());
        let err = process_directory(&ctx, &dir.path().join("absent")).unwrap_err();
        assert_eq!(err.error_type, ExcelErrorType::InvalidInput);
    }

    #[test]
    fn test_progress_callback_sees_every_file() {
        let dir = tempfile::tempdir().unwrap();
        let data = dir.path().join("data");
        std::fs::create_dir(&data).unwrap();
        let ctx = test_context(dir.path());
        write_contacts(&data.join("one.xlsx"));
        write_contacts(&data.join("two.xlsx"));

        let mut seen = Vec::new();
        process_directory_with_progress(&ctx, &data, |i, total, r| {
            seen.push((i, total, r.is_success()));
        })
        .unwrap();

        assert_eq!(seen, vec![(0, 2, true), (1, 2, true)]);
    }
}
