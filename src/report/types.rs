// src/report/types.rs
// Report content as produced by the text model

use serde::{Deserialize, Deserializer, Serialize};

pub const DEFAULT_TITLE: &str = "Property Report";
pub const DEFAULT_SUBTITLE: &str = "Prepared by EstateOS AI";

/// Structured report content. Every field is optional; absent or empty
/// blocks are left out of the rendered document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportData {
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub executive_summary: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub property_details: Table,
    #[serde(deserialize_with = "null_as_default")]
    pub sections: Vec<ReportSection>,
    #[serde(deserialize_with = "null_as_default")]
    pub key_metrics: Table,
    pub conclusion: Option<String>,
}

impl ReportData {
    pub fn title_or_default(&self) -> &str {
        non_blank(self.title.as_deref()).unwrap_or(DEFAULT_TITLE)
    }

    pub fn subtitle_or_default(&self) -> &str {
        non_blank(self.subtitle.as_deref()).unwrap_or(DEFAULT_SUBTITLE)
    }

    pub fn executive_summary(&self) -> Option<&str> {
        non_blank(self.executive_summary.as_deref())
    }

    pub fn conclusion(&self) -> Option<&str> {
        non_blank(self.conclusion.as_deref())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportSection {
    pub heading: String,
    pub body: String,
}

/// Rows of cells; the first row is the header
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Table {
    pub rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn from_rows<R, C>(rows: R) -> Self
    where
        R: IntoIterator<Item = C>,
        C: IntoIterator,
        C::Item: Into<String>,
    {
        Self {
            rows: rows
                .into_iter()
                .map(|row| row.into_iter().map(|c| Cell(c.into())).collect())
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn header(&self) -> Option<&[Cell]> {
        self.rows.first().map(Vec::as_slice)
    }

    /// Column count taken from the header row
    pub fn column_count(&self) -> usize {
        self.header().map(<[Cell]>::len).unwrap_or(0)
    }
}

/// A table cell. Models emit numbers and booleans as often as strings,
/// so scalars are accepted and kept in their JSON text form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawCell")]
pub struct Cell(pub String);

impl Cell {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawCell {
    Text(String),
    Number(serde_json::Number),
    Flag(bool),
    Null(()),
}

impl From<RawCell> for Cell {
    fn from(raw: RawCell) -> Self {
        match raw {
            RawCell::Text(s) => Cell(s),
            RawCell::Number(n) => Cell(n.to_string()),
            RawCell::Flag(b) => Cell(b.to_string()),
            RawCell::Null(()) => Cell(String::new()),
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.trim().is_empty())
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
