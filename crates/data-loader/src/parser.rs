//! Parsers for the dataset files.
//!
//! - items.dat: itemId::title
//! - similarity.dat: one matrix row per line, scores separated by commas
//!   and/or whitespace
//!
//! Blank lines are skipped in both files. Line numbers in errors are 1-based
//! and refer to the physical line in the file.

use crate::error::{DataLoadError, Result};
use crate::types::ItemId;
use rayon::prelude::*;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// Read a whole file into memory, mapping a missing file to `FileNotFound`
fn read_to_string(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => DataLoadError::FileNotFound {
            path: path.display().to_string(),
        },
        _ => DataLoadError::IoError(e),
    })
}

/// Name used in parse errors
fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Parse the items file into `(id, title)` pairs, in file order
pub fn parse_items(path: &Path) -> Result<Vec<(ItemId, String)>> {
    let content = read_to_string(path)?;
    parse_items_str(&content, &file_label(path))
}

/// Parse items from an in-memory string
pub fn parse_items_str(content: &str, file: &str) -> Result<Vec<(ItemId, String)>> {
    let mut items = Vec::new();

    for (idx, line) in content.lines().enumerate() {
        let line_no = idx + 1;
        let line_trimmed = line.trim();
        if line_trimmed.is_empty() {
            continue;
        }

        // Titles may contain "::" themselves, so only split once
        let (id, title) = line_trimmed
            .split_once("::")
            .ok_or_else(|| DataLoadError::ParseError {
                file: file.to_string(),
                line: line_no,
                reason: "Expected 'itemId::title'".to_string(),
            })?;

        let id = id.trim().parse::<ItemId>().map_err(|_| DataLoadError::ParseError {
            file: file.to_string(),
            line: line_no,
            reason: format!("Invalid itemId '{}'", id.trim()),
        })?;

        let title = title.trim();
        if title.is_empty() {
            return Err(DataLoadError::ParseError {
                file: file.to_string(),
                line: line_no,
                reason: "Missing title".to_string(),
            });
        }

        items.push((id, title.to_string()));
    }

    Ok(items)
}

/// Parse the similarity file into rows of scores
pub fn parse_similarity(path: &Path) -> Result<Vec<Vec<f32>>> {
    let content = read_to_string(path)?;
    parse_similarity_str(&content, &file_label(path))
}

/// Parse similarity rows from an in-memory string.
///
/// Rows are independent, so they are parsed in parallel with Rayon.
/// `collect` into a `Result` keeps row order and reports the first failing row.
pub fn parse_similarity_str(content: &str, file: &str) -> Result<Vec<Vec<f32>>> {
    let lines: Vec<(usize, &str)> = content
        .lines()
        .enumerate()
        .map(|(idx, line)| (idx + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty())
        .collect();

    lines
        .par_iter()
        .map(|&(line_no, line)| parse_score_row(line, line_no, file))
        .collect()
}

fn parse_score_row(line: &str, line_no: usize, file: &str) -> Result<Vec<f32>> {
    line.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|field| !field.is_empty())
        .map(|field| {
            field.parse::<f32>().map_err(|_| DataLoadError::ParseError {
                file: file.to_string(),
                line: line_no,
                reason: format!("Invalid score '{}'", field),
            })
        })
        .collect()
}
