//! DOCX export.
//!
//! Writes a [`Report`] with docx-rs. Layout:
//!
//! ```text
//! header:  <selector>                      Generated: <timestamp>
//! body:    <selector>           (centered title)
//!          <subtitle>           (centered)
//!          per section: bold heading, then
//!            table      -> shaded header row + every row
//!            kv grid    -> two-column table, shaded label column
//!            kv headed  -> two-column table under a shaded header row
//!            kv inline  -> "Label: value" paragraphs
//! footer:  <subtitle>
//! ```
//!
//! Packing is CPU-bound, so [`generate_docx`] runs the whole pipeline on the
//! blocking pool. Once started it cannot be cancelled; dropping the future
//! only discards the result.

use crate::config::ExportOptions;
use crate::error::{ExportError, ExportResult};
use crate::format::{first_text, value_text};
use crate::record::RecordView;
use crate::render::{build_report, report_dossier, KvBlock, KvStyle, Report, Section, Table};
use crate::sanitize::sanitize;
use chrono::{DateTime, Utc};
use docx_rs::{
    AlignmentType, Docx, Footer, Header, Paragraph, Run, Shading, Table as DocxTable, TableCell,
    TableRow, WidthType,
};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use std::io::Cursor;

const BACKGROUND_LIGHT: &str = "F5F5F5";
const TEXT_MUTED: &str = "666666";

/// Usable width of a Letter page with 1" margins, in twentieths of a point
const CONTENT_WIDTH_DXA: usize = 9360;

// Run sizes are half-points
const TITLE_SIZE: usize = 36;
const SUBTITLE_SIZE: usize = 24;
const HEADING_SIZE: usize = 28;

const FILE_SUFFIX: &str = " Enrichment.docx";
const FALLBACK_FILE_STEM: &str = "report";
const MAX_FILE_STEM_CHARS: usize = 50;

/// Phone fields tried for the file name, in order
const FILE_PHONE_CHAIN: &[&str] = &["display_international", "display", "number", "raw"];

/// Anything outside `[A-Za-z0-9_-]`
static UNSAFE_FILE_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^A-Za-z0-9_-]").expect("Invalid regex"));

/// Pack a laid-out report into DOCX bytes
pub fn render_docx(report: &Report<'_>, options: &ExportOptions) -> ExportResult<Vec<u8>> {
    let header = Header::new()
        .add_paragraph(Paragraph::new().add_run(Run::new().add_text(&report.selector)))
        .add_paragraph(
            Paragraph::new()
                .add_run(Run::new().add_text(format!("Generated: {}", report.generated_at)))
                .align(AlignmentType::Right),
        );

    let footer = Footer::new().add_paragraph(
        Paragraph::new()
            .add_run(Run::new().add_text(&options.report_subtitle).color(TEXT_MUTED))
            .align(AlignmentType::Center),
    );

    let mut doc = Docx::new()
        .header(header)
        .footer(footer)
        .add_paragraph(
            Paragraph::new()
                .add_run(Run::new().add_text(&report.title).bold().size(TITLE_SIZE))
                .align(AlignmentType::Center),
        )
        .add_paragraph(
            Paragraph::new()
                .add_run(
                    Run::new()
                        .add_text(&report.subtitle)
                        .size(SUBTITLE_SIZE)
                        .color(TEXT_MUTED),
                )
                .align(AlignmentType::Center),
        );

    for section in &report.sections {
        doc = doc.add_paragraph(heading(section.title()));
        doc = match section {
            Section::Table(table) => doc.add_table(entity_table(table)),
            Section::KeyValue(block) => match block.style {
                KvStyle::Inline => block
                    .entries
                    .iter()
                    .fold(doc, |doc, (label, value)| doc.add_paragraph(inline_entry(label, value))),
                KvStyle::Grid | KvStyle::Headed { .. } => doc.add_table(kv_table(block)),
            },
        };
        doc = doc.add_paragraph(Paragraph::new());
    }

    let mut buf = Cursor::new(Vec::new());
    doc.build()
        .pack(&mut buf)
        .map_err(|e| ExportError::Docx(e.to_string()))?;

    let bytes = buf.into_inner();
    tracing::info!(
        sections = report.sections.len(),
        bytes = bytes.len(),
        "[DocxExport] Packed report"
    );
    Ok(bytes)
}

/// Sanitize, build and pack a record on the blocking pool
pub async fn generate_docx(record: Value, options: ExportOptions) -> ExportResult<Vec<u8>> {
    tokio::task::spawn_blocking(move || docx_for_record(&record, &options, Utc::now()))
        .await
        .map_err(|e| ExportError::Task(e.to_string()))?
}

/// The synchronous pipeline behind [`generate_docx`]
pub fn docx_for_record(
    record: &Value,
    options: &ExportOptions,
    now: DateTime<Utc>,
) -> ExportResult<Vec<u8>> {
    let clean = sanitize(record, options.sanitize_options());
    let view = RecordView::locate(&clean)?;
    let dossier = report_dossier(&view);
    let report = build_report(&view, &dossier, &options.report_subtitle, now);
    render_docx(&report, options)
}

/// Download name for a record's report: `<selector> Enrichment.docx`.
///
/// The selector is the query's first phone, else `phone_hint`, else the
/// person's first phone; it is reduced to `[A-Za-z0-9_-]` and capped.
pub fn report_file_name(record: &Value, phone_hint: Option<&str>) -> String {
    let selector = file_selector(record, phone_hint);
    let compact: String = selector
        .chars()
        .filter(|c| *c != '+' && !c.is_whitespace())
        .collect();
    let cleaned = UNSAFE_FILE_CHARS.replace_all(&compact, "");
    let stem: String = cleaned.chars().take(MAX_FILE_STEM_CHARS).collect();

    if stem.is_empty() {
        format!("{FALLBACK_FILE_STEM}{FILE_SUFFIX}")
    } else {
        format!("{stem}{FILE_SUFFIX}")
    }
}

fn file_selector(record: &Value, phone_hint: Option<&str>) -> String {
    let view = RecordView::locate(record).ok();
    let first_phone = |node: Option<&Value>| -> Option<String> {
        let phone = node?.get("phones")?.as_array()?.first()?;
        match phone {
            Value::Object(map) => first_text(map, FILE_PHONE_CHAIN),
            Value::String(_) | Value::Number(_) => Some(value_text(phone)),
            _ => None,
        }
    };

    first_phone(view.as_ref().and_then(|v| v.query()))
        .or_else(|| {
            phone_hint
                .map(str::trim)
                .filter(|h| !h.is_empty())
                .map(str::to_string)
        })
        .or_else(|| first_phone(view.as_ref().and_then(|v| v.person())))
        .unwrap_or_else(|| "Unknown".to_string())
}

fn heading(title: &str) -> Paragraph {
    Paragraph::new().add_run(Run::new().add_text(title).bold().size(HEADING_SIZE))
}

fn inline_entry(label: &str, value: &str) -> Paragraph {
    Paragraph::new()
        .add_run(Run::new().add_text(format!("{label}: ")).bold())
        .add_run(Run::new().add_text(value))
}

fn cell(text: &str, width: usize) -> TableCell {
    TableCell::new()
        .add_paragraph(Paragraph::new().add_run(Run::new().add_text(text)))
        .width(width, WidthType::Dxa)
}

fn shaded_cell(text: &str, width: usize) -> TableCell {
    TableCell::new()
        .add_paragraph(
            Paragraph::new()
                .add_run(Run::new().add_text(text).bold())
                .align(AlignmentType::Center),
        )
        .shading(Shading::new().fill(BACKGROUND_LIGHT))
        .width(width, WidthType::Dxa)
}

fn grid(columns: usize) -> Vec<usize> {
    let width = CONTENT_WIDTH_DXA / columns.max(1);
    vec![width; columns]
}

fn entity_table(table: &Table<'_>) -> DocxTable {
    let widths = grid(table.columns.len());

    let header = TableRow::new(
        table
            .header()
            .iter()
            .zip(&widths)
            .map(|(label, w)| shaded_cell(label, *w))
            .collect(),
    );

    let mut rows = vec![header];
    for row in table.cells() {
        rows.push(TableRow::new(
            row.iter()
                .zip(&widths)
                .map(|(text, w)| cell(text, *w))
                .collect(),
        ));
    }

    DocxTable::new(rows).set_grid(widths)
}

fn kv_table(block: &KvBlock) -> DocxTable {
    // 30/70 split for label/value grids, even split under a header row
    let widths = match block.style {
        KvStyle::Headed { .. } => grid(2),
        _ => vec![CONTENT_WIDTH_DXA * 3 / 10, CONTENT_WIDTH_DXA * 7 / 10],
    };

    let mut rows = Vec::with_capacity(block.entries.len() + 1);
    if let KvStyle::Headed { key, value } = block.style {
        rows.push(TableRow::new(vec![
            shaded_cell(key, widths[0]),
            shaded_cell(value, widths[1]),
        ]));
        for (label, text) in &block.entries {
            rows.push(TableRow::new(vec![cell(label, widths[0]), cell(text, widths[1])]));
        }
    } else {
        for (label, text) in &block.entries {
            rows.push(TableRow::new(vec![
                shaded_cell(label, widths[0]),
                cell(text, widths[1]),
            ]));
        }
    }

    DocxTable::new(rows).set_grid(widths)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 14, 9, 26, 0).unwrap()
    }

    fn paragraph_text(para: &docx_rs::Paragraph) -> String {
        let mut out = String::new();
        for child in &para.children {
            if let docx_rs::ParagraphChild::Run(run) = child {
                for run_child in &run.children {
                    if let docx_rs::RunChild::Text(text) = run_child {
                        out.push_str(&text.text);
                    }
                }
            }
        }
        out
    }

    /// Body paragraphs and tables (as rows of cell text), in document order
    fn read_body(bytes: &[u8]) -> (Vec<String>, Vec<Vec<Vec<String>>>) {
        let doc = docx_rs::read_docx(bytes).unwrap();
        let mut paragraphs = Vec::new();
        let mut tables = Vec::new();

        for child in &doc.document.children {
            match child {
                docx_rs::DocumentChild::Paragraph(para) => paragraphs.push(paragraph_text(para)),
                docx_rs::DocumentChild::Table(table) => {
                    let mut rows = Vec::new();
                    for row in &table.rows {
                        let docx_rs::TableChild::TableRow(tr) = row;
                        let mut cells = Vec::new();
                        for cell in &tr.cells {
                            let docx_rs::TableRowChild::TableCell(tc) = cell;
                            let mut text = String::new();
                            for content in &tc.children {
                                if let docx_rs::TableCellContent::Paragraph(para) = content {
                                    text.push_str(&paragraph_text(para));
                                }
                            }
                            cells.push(text);
                        }
                        rows.push(cells);
                    }
                    tables.push(rows);
                }
                _ => {}
            }
        }

        (paragraphs, tables)
    }

    fn record() -> Value {
        json!({
            "status": "success",
            "data": { "data": {
                "query": { "phones": [{ "number": 526671059517_i64, "display_international": "+52 667 105 9517" }] },
                "QuotaCurrent": 3,
                "person": {
                    "@match": 0.9,
                    "names": [{ "display": "Jane Doe", "first": "Jane", "last": "Doe" }],
                    "phones": [
                        { "number": 5215550100001_i64 },
                        { "number": 5215550100002_i64 },
                        { "number": 5215550100003_i64 },
                        { "number": 5215550100004_i64 },
                        { "number": 5215550100005_i64 }
                    ],
                    "gender": "female",
                    "languages": [{ "language": "es", "region": "MX" }]
                }
            } }
        })
    }

    #[test]
    fn test_document_layout() {
        let bytes = docx_for_record(&record(), &ExportOptions::default(), now()).unwrap();
        let (paragraphs, tables) = read_body(&bytes);

        assert_eq!(paragraphs[0], "526671059517");
        assert_eq!(paragraphs[1], "Enrichment Report");
        assert!(paragraphs.iter().any(|p| p == "Query Summary"));
        let inline = |label: &str, value: &str| {
            paragraphs
                .iter()
                .any(|p| p.starts_with(label) && p.trim_end().ends_with(value))
        };
        assert!(inline("Gender:", "Female"));
        assert!(inline("Languages:", "es (MX)"));
        assert!(inline("Generated:", "2026-03-14 09:26 UTC"));

        let headings: Vec<&str> = paragraphs
            .iter()
            .map(String::as_str)
            .filter(|p| {
                matches!(
                    *p,
                    "Query Summary" | "Names" | "Phones" | "Demographics" | "Available Data"
                )
            })
            .collect();
        assert_eq!(
            headings,
            vec!["Query Summary", "Names", "Phones", "Demographics", "Available Data"]
        );

        // Query summary, names, phones, available data
        assert_eq!(tables.len(), 4);
        assert_eq!(tables[0][0], vec!["Queried Phone", "526671059517"]);
    }

    #[test]
    fn test_tables_write_every_row() {
        let bytes = docx_for_record(&record(), &ExportOptions::default(), now()).unwrap();
        let (_, tables) = read_body(&bytes);

        let phones = &tables[2];
        assert_eq!(phones[0][0], "Phone (Intl)");
        assert_eq!(phones.len(), 1 + 5);

        let names = &tables[1];
        assert_eq!(names[1], vec!["Jane Doe", "Jane", "", "Doe", "", ""]);

        let counts = &tables[3];
        assert_eq!(counts[0], vec!["Data Type", "Count"]);
        assert_eq!(counts[2], vec!["Phones", "5"]);
    }

    #[test]
    fn test_custom_subtitle() {
        let options = ExportOptions {
            report_subtitle: "Carrier Lookup".to_string(),
            ..ExportOptions::default()
        };
        let bytes = docx_for_record(&record(), &options, now()).unwrap();
        let (paragraphs, _) = read_body(&bytes);
        assert_eq!(paragraphs[1], "Carrier Lookup");
    }

    #[test]
    fn test_no_data() {
        let err = docx_for_record(&json!({}), &ExportOptions::default(), now()).unwrap_err();
        assert_eq!(err, ExportError::NoData);
    }

    #[test]
    fn test_record_without_person_still_renders() {
        let record = json!({ "data": { "query": { "phones": ["+15550100"] } } });
        let bytes = docx_for_record(&record, &ExportOptions::default(), now()).unwrap();
        let (paragraphs, tables) = read_body(&bytes);

        assert_eq!(paragraphs[0], "+15550100");
        // Query summary and available data counts
        assert_eq!(tables.len(), 2);
    }

    #[test]
    fn test_flat_payload_renders_entity_tables() {
        let record = json!({
            "data": {
                "query": { "phones": [{ "number": "+526671059517", "country_code": 52 }] },
                "names": [{ "display": "Juan Pérez García", "first": "Juan", "last": "Pérez García" }],
                "phones": [{ "number": "+526671059517", "carrier": "Telcel" }],
                "gender": "male",
                "quota_current": 12
            }
        });
        let bytes = docx_for_record(&record, &ExportOptions::default(), now()).unwrap();
        let (paragraphs, tables) = read_body(&bytes);

        assert!(paragraphs.iter().any(|p| p == "Names"));
        assert!(paragraphs.iter().any(|p| p == "Phones"));
        assert!(paragraphs
            .iter()
            .any(|p| p.starts_with("Gender:") && p.trim_end().ends_with("Male")));

        // Query summary, names, phones, available data
        assert_eq!(tables.len(), 4);
        assert_eq!(tables[1][1][0], "Juan Pérez García");
        assert_eq!(tables[3][2], vec!["Phones", "1"]);
    }

    #[tokio::test]
    async fn test_generate_docx_async() {
        let bytes = generate_docx(record(), ExportOptions::default()).await.unwrap();
        assert_eq!(&bytes[..2], b"PK");
        assert!(docx_rs::read_docx(&bytes).is_ok());
    }

    #[tokio::test]
    async fn test_generate_docx_no_data() {
        let err = generate_docx(Value::Null, ExportOptions::default()).await.unwrap_err();
        assert_eq!(err, ExportError::NoData);
    }

    #[test]
    fn test_report_file_name() {
        assert_eq!(
            report_file_name(&record(), None),
            "526671059517 Enrichment.docx"
        );

        let record = json!({ "data": { "person": { "phones": [{ "display": "+1 (555) 0100" }] } } });
        assert_eq!(report_file_name(&record, None), "15550100 Enrichment.docx");
        assert_eq!(
            report_file_name(&record, Some("+52 667 105 9517")),
            "526671059517 Enrichment.docx"
        );

        assert_eq!(report_file_name(&json!({}), None), "Unknown Enrichment.docx");
        assert_eq!(report_file_name(&json!({}), Some("+++")), "report Enrichment.docx");

        let long = "9".repeat(80);
        let name = report_file_name(&json!({}), Some(&long));
        assert_eq!(name, format!("{} Enrichment.docx", "9".repeat(50)));
    }
}
