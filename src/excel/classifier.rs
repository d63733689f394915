use super::patterns::{is_email, is_url};
use super::types::{CellValue, ColumnClassification, ContentType, Sheet};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct ContentCounts {
    urls: usize,
    emails: usize,
    text: usize,
}

impl ContentCounts {
    fn tally<'a, I>(values: I) -> Self
    where
        I: IntoIterator<Item = &'a CellValue>,
    {
        let mut counts = ContentCounts::default();

        for value in values {
            let Some(text) = value.text() else { continue };

            if is_url(&text) {
                counts.urls += 1;
            } else if is_email(&text) {
                counts.emails += 1;
            } else {
                counts.text += 1;
            }
        }

        counts
    }

    /// Plurality winner; ties resolve website > email > text.
    fn winner(&self) -> (ContentType, usize) {
        let ContentCounts { urls, emails, text } = *self;

        if urls > 0 && urls >= emails && urls >= text {
            (ContentType::Website, urls)
        } else if emails > 0 && emails >= text {
            (ContentType::Email, emails)
        } else if text > 0 {
            (ContentType::Text, text)
        } else {
            (ContentType::Unknown, 0)
        }
    }
}

/// Classify one column from its values (header row excluded).
pub fn classify_column<'a, I>(column: usize, header: impl Into<String>, values: I) -> ColumnClassification
where
    I: IntoIterator<Item = &'a CellValue>,
{
    let (content_type, confidence) = ContentCounts::tally(values).winner();

    ColumnClassification {
        column,
        header: header.into(),
        content_type,
        confidence,
    }
}

/// Classify every column of a sheet, left to right.
pub fn classify(sheet: &Sheet) -> Vec<ColumnClassification> {
    (0..sheet.col_count())
        .map(|col| classify_column(col, sheet.header(col), sheet.column_values(col)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_values(values: &[&str]) -> Vec<CellValue> {
        values
            .iter()
            .map(|v| {
                if v.is_empty() {
                    CellValue::Empty
                } else {
                    CellValue::Text(v.to_string())
                }
            })
            .collect()
    }

    #[test]
    fn test_all_urls_is_website_with_full_confidence() {
        let values = text_values(&["example.com", "", "https://rust-lang.org", "www.a.io"]);
        let c = classify_column(0, "Site", &values);
        assert_eq!(c.content_type, ContentType::Website);
        assert_eq!(c.confidence, 3);
    }

    #[test]
    fn test_empty_column_is_unknown() {
        let values = text_values(&["", "   ", ""]);
        let c = classify_column(2, "Notes", &values);
        assert_eq!(c.content_type, ContentType::Unknown);
        assert_eq!(c.confidence, 0);

        let c = classify_column(0, "Nothing", std::iter::empty::<&CellValue>());
        assert_eq!(c.content_type, ContentType::Unknown);
    }

    #[test]
    fn test_url_email_tie_goes_to_website() {
        let values = text_values(&["a@b.com", "example.com", "c@d.org", "www.x.net"]);
        let c = classify_column(0, "Mixed", &values);
        assert_eq!(c.content_type, ContentType::Website);
        assert_eq!(c.confidence, 2);
    }

    #[test]
    fn test_email_text_tie_goes_to_email() {
        let values = text_values(&["a@b.com", "hello"]);
        let c = classify_column(0, "Contact", &values);
        assert_eq!(c.content_type, ContentType::Email);
        assert_eq!(c.confidence, 1);
    }

    #[test]
    fn test_url_text_tie_goes_to_website() {
        let values = text_values(&["example.com", "hello"]);
        assert_eq!(
            classify_column(0, "X", &values).content_type,
            ContentType::Website
        );
    }

    #[test]
    fn test_email_majority() {
        let values = text_values(&["a@b.com", "c@d.com", "not an email"]);
        let c = classify_column(1, "Email", &values);
        assert_eq!(c.content_type, ContentType::Email);
        assert_eq!(c.confidence, 2);
    }

    #[test]
    fn test_addresses_on_link_domains_are_email() {
        let values = text_values(&["jane.doe@linkedin.com", "bob@linkedin.com", "x@acme.com"]);
        let c = classify_column(0, "Email", &values);
        assert_eq!(c.content_type, ContentType::Email);
        assert_eq!(c.confidence, 3);
    }

    #[test]
    fn test_text_plurality_and_numbers_count_as_text() {
        let values = vec![
            CellValue::Number(12.0),
            CellValue::Number(3.5),
            CellValue::Text("example.com".to_string()),
        ];
        let c = classify_column(0, "Qty", &values);
        assert_eq!(c.content_type, ContentType::Text);
        assert_eq!(c.confidence, 2);
    }

    #[test]
    fn test_classify_sheet_uses_headers_and_skips_header_row() {
        let sheet = Sheet::from_rows(
            "Sheet1",
            &[
                &["Name", "Link", ""],
                &["A", "example.com", "x@y.com"],
                &["B", "not a link", ""],
            ],
        );

        let classes = classify(&sheet);
        assert_eq!(classes.len(), 3);
        assert_eq!(classes[0].to_string(), "Name: text (confidence: 2)");
        assert_eq!(classes[1].to_string(), "Link: website (confidence: 1)");
        assert_eq!(classes[2].to_string(), "Column C: email (confidence: 1)");
    }
}
