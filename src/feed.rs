//! Supplier stock feed download and parsing.
//!
//! The supplier publishes a zip archive containing a single `.xls` spreadsheet
//! at a fixed URL. The sheet carries a fixed-offset header row; the columns of
//! interest are the literal feed headers "Код", "Количество" and "Цена".

use std::io::Cursor;
use std::path::Path;

use calamine::{open_workbook, Data, Range, Reader, Xls};

use crate::error::{Result, SyncError};

/// Supplier stock feed URL
pub const FEED_URL: &str = "https://timeworld.ru/upload/files/ostatki.zip";

/// Zero-based offset of the header row; everything above it is preamble.
const HEADER_ROW: usize = 17;

const CODE_COLUMN: &str = "Код";
const QUANTITY_COLUMN: &str = "Количество";
const PRICE_COLUMN: &str = "Цена";

/// One record from the supplier feed, cells stringified as-is
#[derive(Debug, Clone)]
pub struct SupplierRow {
    pub code: String,
    pub quantity: String,
    pub price: String,
}

/// Download the feed archive and parse the contained spreadsheet into rows
pub fn download_feed(url: &str) -> Result<Vec<SupplierRow>> {
    log::info!("Downloading supplier feed from {}", url);

    let response = reqwest::blocking::Client::new()
        .get(url)
        .header("User-Agent", "watch_sync/1.0")
        .send()?;

    if !response.status().is_success() {
        return Err(SyncError::HttpStatus(response.status()));
    }

    let bytes = response.bytes()?;
    let rows = parse_feed_archive(&bytes)?;

    log::info!("Parsed {} supplier rows from feed", rows.len());
    Ok(rows)
}

/// Extract the spreadsheet from the archive bytes, parse it and remove the
/// extracted file again (also when parsing fails).
pub fn parse_feed_archive(bytes: &[u8]) -> Result<Vec<SupplierRow>> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))?;

    let entry_name = archive
        .file_names()
        .find(|name| name.to_ascii_lowercase().ends_with(".xls"))
        .map(String::from)
        .ok_or_else(|| SyncError::Feed("archive contains no .xls spreadsheet".to_string()))?;

    let path = std::env::temp_dir().join(format!("watch_sync-{}.xls", std::process::id()));
    {
        let mut entry = archive.by_name(&entry_name)?;
        let mut out = std::fs::File::create(&path)?;
        std::io::copy(&mut entry, &mut out)?;
    }

    let rows = parse_spreadsheet(&path);
    let _ = std::fs::remove_file(&path);
    rows
}

fn parse_spreadsheet(path: &Path) -> Result<Vec<SupplierRow>> {
    let mut workbook: Xls<_> = open_workbook(path)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| SyncError::Feed("spreadsheet has no worksheets".to_string()))??;
    parse_rows(&range)
}

fn parse_rows(range: &Range<Data>) -> Result<Vec<SupplierRow>> {
    let mut sheet_rows = range.rows().skip(HEADER_ROW);
    let header = sheet_rows
        .next()
        .ok_or_else(|| SyncError::Feed("spreadsheet shorter than the header offset".to_string()))?;

    let code_idx = column_index(header, CODE_COLUMN)?;
    let quantity_idx = column_index(header, QUANTITY_COLUMN)?;
    let price_idx = column_index(header, PRICE_COLUMN)?;

    let mut rows = Vec::new();
    for sheet_row in sheet_rows {
        let code = cell_text(sheet_row, code_idx);
        if code.is_empty() {
            continue;
        }
        rows.push(SupplierRow {
            code,
            quantity: cell_text(sheet_row, quantity_idx),
            price: cell_text(sheet_row, price_idx),
        });
    }
    Ok(rows)
}

fn column_index(header: &[Data], name: &str) -> Result<usize> {
    header
        .iter()
        .position(|cell| cell.to_string().trim() == name)
        .ok_or_else(|| SyncError::Feed(format!("feed column {:?} not found in header row", name)))
}

fn cell_text(row: &[Data], idx: usize) -> String {
    row.get(idx)
        .map(|cell| cell.to_string().trim().to_string())
        .unwrap_or_default()
}

#[cfg(test)]
#[path = "feed_tests.rs"]
mod tests;
