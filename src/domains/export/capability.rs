use async_trait::async_trait;

use crate::errors::ExportResult;

/// Identifier of a sheet inside a workbook under construction.
pub type SheetId = usize;

/// Visual treatment applied to an appended row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RowStyle {
    #[default]
    Body,
    /// Bold text over a shaded fill, used for header rows.
    Header,
}

/// Workbook under construction inside an external spreadsheet backend.
///
/// The engine feeds a row/column/style model through this interface; the
/// backend owns the binary encoding. Encoding may involve asynchronous
/// work, so `finish` suspends until the payload is complete.
#[async_trait]
pub trait SpreadsheetWorkbook: Send {
    /// Add an empty sheet and return its identifier.
    fn add_sheet(&mut self, name: &str) -> ExportResult<SheetId>;

    /// Append one row of cells to a sheet.
    fn append_row(&mut self, sheet: SheetId, cells: &[String], style: RowStyle)
        -> ExportResult<()>;

    /// Fix the width of a column, in character units.
    fn set_column_width(&mut self, sheet: SheetId, column: usize, width: f64) -> ExportResult<()>;

    /// Mark the filterable region spanning the populated rows/columns.
    fn set_auto_filter(&mut self, sheet: SheetId, rows: usize, columns: usize) -> ExportResult<()>;

    /// Finish the workbook and return the encoded bytes.
    async fn finish(self: Box<Self>) -> ExportResult<Vec<u8>>;
}

/// Factory for workbooks. Injected where spreadsheet export is wanted;
/// its absence makes the spreadsheet format fail fast.
pub trait SpreadsheetCapability: Send + Sync {
    fn new_workbook(&self) -> Box<dyn SpreadsheetWorkbook>;
}

/// Document under construction inside an external layout backend.
///
/// Coordinates are points with the origin at the top-left of the page.
#[async_trait]
pub trait DocumentSurface: Send {
    fn set_font_size(&mut self, size: f32);

    /// Place a text run at page coordinates on the current page.
    fn draw_text(&mut self, x: f32, y: f32, text: &str);

    /// Start a new page.
    fn add_page(&mut self);

    /// Finish the document and return the encoded bytes.
    async fn finish(self: Box<Self>) -> ExportResult<Vec<u8>>;
}

/// Factory for document surfaces; same injection contract as
/// [`SpreadsheetCapability`].
pub trait DocumentCapability: Send + Sync {
    fn new_document(&self) -> Box<dyn DocumentSurface>;
}
