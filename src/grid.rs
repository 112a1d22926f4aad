use itertools::Itertools;

/// One table cell, reduced to its rendered text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    pub text: String,
}

impl Cell {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Text with every run of whitespace, non-breaking spaces and newlines
    /// included, collapsed to one ordinary space, and the ends trimmed.
    pub fn normalized(&self) -> String {
        self.text.replace('\u{a0}', " ").split_whitespace().join(" ")
    }

    /// Nothing but whitespace. U+00A0 counts.
    pub fn is_blank(&self) -> bool {
        self.text.chars().all(char::is_whitespace)
    }
}

impl From<&str> for Cell {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

/// A table row. The first cell is the row header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    cells: Vec<Cell>,
}

impl Row {
    pub fn new(cells: Vec<Cell>) -> Self {
        Self { cells }
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Every cell after the header.
    pub fn data_cells(&self) -> &[Cell] {
        self.cells.get(1..).unwrap_or(&[])
    }
}

impl<C: Into<Cell>> FromIterator<C> for Row {
    fn from_iter<I: IntoIterator<Item = C>>(iter: I) -> Self {
        Self::new(iter.into_iter().map(Into::into).collect())
    }
}

/// Every row of the page, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableGrid {
    rows: Vec<Row>,
}

impl TableGrid {
    pub fn new(rows: Vec<Row>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl FromIterator<Row> for TableGrid {
    fn from_iter<I: IntoIterator<Item = Row>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
