//! Spreadsheet sum handler.

use async_trait::async_trait;

use crate::adapters::tabular::{self, Column};
use crate::classify::TaskKind;
use crate::error::{ResolveError, ResolveResult};

use super::{format_number, Handler, TaskContext};

/// Sum the numeric cells of an uploaded sheet and answer with the total.
///
/// A quoted column name selects by header row; a bare letter selects the
/// position over every row; no column sums the whole sheet.
pub struct SheetSum;

fn column_target(name: Option<&str>, letter: Option<&str>) -> Column {
    if let Some(name) = name {
        return Column::Named(name.to_string());
    }
    match letter.and_then(|value| value.chars().next()) {
        Some(ch) if ch.is_ascii_alphabetic() => {
            Column::Index(ch.to_ascii_lowercase() as usize - 'a' as usize)
        }
        _ => Column::All,
    }
}

#[async_trait]
impl Handler for SheetSum {
    fn kind(&self) -> TaskKind {
        TaskKind::SpreadsheetSum
    }

    async fn run(&self, ctx: &TaskContext<'_>) -> ResolveResult<String> {
        let upload = ctx.upload()?;
        let column = column_target(ctx.params.get("column"), ctx.params.get("column_letter"));

        let is_csv = upload.file_name.to_ascii_lowercase().ends_with(".csv");
        let path = upload.path.clone();
        // Both readers are synchronous; keep them off the async runtime.
        let total = tokio::task::spawn_blocking(move || {
            if is_csv {
                tabular::csv_sum(&path, &column)
            } else {
                tabular::sheet_sum(&path, &column)
            }
        })
        .await
        .map_err(|err| ResolveError::Execution(format!("worker task failed: {}", err)))??;

        Ok(format_number(total))
    }
}
