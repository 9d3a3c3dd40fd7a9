//! Section/table renderer.
//!
//! Builds the ordered [`Section`] list behind the on-screen dossier view and
//! the DOCX report. A section is either a key/value block or a table whose
//! rows borrow the dossier's entities; nothing here formats bytes.
//!
//! ## Layout
//!
//! ```text
//! Section::KeyValue(KvBlock)   title + [(label, value)], drawn per KvStyle
//! Section::Table(Table)        title + [ColumnSpec] + rows + collapse cap
//! ```

pub mod columns;
pub mod report;
pub mod view;

pub use report::{build_report, report_dossier, Report};
pub use view::{dossier_sections, record_sections};

use crate::dossier::Entity;
use crate::format::format_display_value;
use std::fmt;

/// Per-column render function
pub type CellFn = fn(&Entity) -> String;

/// One table column: a source key, a label and an optional render rule
#[derive(Clone, Copy)]
pub struct ColumnSpec {
    pub key: &'static str,
    pub label: &'static str,
    pub render: Option<CellFn>,
}

impl ColumnSpec {
    /// Column rendered by the generic formatter over `row[key]`
    pub const fn keyed(key: &'static str, label: &'static str) -> Self {
        Self {
            key,
            label,
            render: None,
        }
    }

    /// Column with its own render rule
    pub const fn rendered(key: &'static str, label: &'static str, render: CellFn) -> Self {
        Self {
            key,
            label,
            render: Some(render),
        }
    }

    pub fn cell(&self, row: &Entity) -> String {
        match self.render {
            Some(render) => render(row),
            None => format_display_value(row.field(self.key), Some(self.key)),
        }
    }
}

impl fmt::Debug for ColumnSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnSpec")
            .field("key", &self.key)
            .field("label", &self.label)
            .field("rendered", &self.render.is_some())
            .finish()
    }
}

/// How a key/value block is drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KvStyle {
    /// Label/value grid without a header row
    Grid,
    /// Two-column table under a header row
    Headed {
        key: &'static str,
        value: &'static str,
    },
    /// One `Label: value` line per entry
    Inline,
}

#[derive(Debug, Clone, PartialEq)]
pub struct KvBlock {
    pub title: String,
    pub entries: Vec<(String, String)>,
    pub style: KvStyle,
}

impl KvBlock {
    pub fn new(title: impl Into<String>, style: KvStyle) -> Self {
        Self {
            title: title.into(),
            entries: Vec::new(),
            style,
        }
    }

    pub fn push(&mut self, label: impl Into<String>, value: impl Into<String>) {
        self.entries.push((label.into(), value.into()));
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct Table<'a> {
    pub title: String,
    pub columns: &'static [ColumnSpec],
    pub rows: &'a [Entity],
    /// Rows shown before the view offers "show more"; `None` never collapses
    pub max_rows_before_collapse: Option<usize>,
}

impl<'a> Table<'a> {
    pub fn new(title: impl Into<String>, columns: &'static [ColumnSpec], rows: &'a [Entity]) -> Self {
        Self {
            title: title.into(),
            columns,
            rows,
            max_rows_before_collapse: None,
        }
    }

    pub fn collapse_after(mut self, max_rows: usize) -> Self {
        self.max_rows_before_collapse = Some(max_rows);
        self
    }

    pub fn header(&self) -> Vec<&'static str> {
        self.columns.iter().map(|c| c.label).collect()
    }

    /// Rows shown by the view; exports always take every row
    pub fn visible_rows(&self, expanded: bool) -> &[Entity] {
        match self.max_rows_before_collapse {
            Some(max) if !expanded && self.rows.len() > max => &self.rows[..max],
            _ => self.rows,
        }
    }

    /// Rows hidden behind the collapse
    pub fn hidden_rows(&self) -> usize {
        self.rows.len() - self.visible_rows(false).len()
    }

    pub fn render_rows(&self, rows: &[Entity]) -> Vec<Vec<String>> {
        rows.iter()
            .map(|row| self.columns.iter().map(|c| c.cell(row)).collect())
            .collect()
    }

    /// Every row rendered, ignoring the collapse cap
    pub fn cells(&self) -> Vec<Vec<String>> {
        self.render_rows(self.rows)
    }
}

#[derive(Debug, Clone)]
pub enum Section<'a> {
    KeyValue(KvBlock),
    Table(Table<'a>),
}

impl Section<'_> {
    pub fn title(&self) -> &str {
        match self {
            Section::KeyValue(block) => &block.title,
            Section::Table(table) => &table.title,
        }
    }

    pub fn as_table(&self) -> Option<&Table<'_>> {
        match self {
            Section::Table(table) => Some(table),
            Section::KeyValue(_) => None,
        }
    }

    pub fn as_key_value(&self) -> Option<&KvBlock> {
        match self {
            Section::KeyValue(block) => Some(block),
            Section::Table(_) => None,
        }
    }
}

/// Find a section by title
pub fn find<'s, 'a>(sections: &'s [Section<'a>], title: &str) -> Option<&'s Section<'a>> {
    sections.iter().find(|s| s.title() == title)
}
