/// In-memory tabular model for one correction run.
///
/// A workbook is an ordered list of named sheets; a sheet is a header row plus
/// rectangular rows of stringified cells. The pipeline mutates sheets in place
/// and the exporter writes them back out in the same order.

#[derive(Debug, Clone, PartialEq)]
pub struct Sheet {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Sheet {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    /// Index of the first header matching `name` case-insensitively.
    pub fn find_column(&self, name: &str) -> Option<usize> {
        let wanted = name.to_lowercase();
        self.headers
            .iter()
            .position(|h| h.trim().to_lowercase() == wanted)
    }

    /// Values of one column, top to bottom, excluding the header.
    pub fn column_values(&self, index: usize) -> Vec<String> {
        self.rows
            .iter()
            .map(|row| row.get(index).cloned().unwrap_or_default())
            .collect()
    }

    /// Overwrites one column's values in place. The caller has already
    /// checked that `values.len()` matches the row count.
    pub fn replace_column(&mut self, index: usize, values: Vec<String>) {
        for (row, value) in self.rows.iter_mut().zip(values) {
            row[index] = value;
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Workbook {
    sheets: Vec<(String, Sheet)>,
}

impl Workbook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, name: impl Into<String>, sheet: Sheet) {
        self.sheets.push((name.into(), sheet));
    }

    pub fn len(&self) -> usize {
        self.sheets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sheets.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Sheet)> + '_ {
        self.sheets.iter().map(|(name, sheet)| (name.as_str(), sheet))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&str, &mut Sheet)> + '_ {
        self.sheets
            .iter_mut()
            .map(|(name, sheet)| (name.as_str(), sheet))
    }

    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, sheet)| sheet)
    }
}
