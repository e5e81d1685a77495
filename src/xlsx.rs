use crate::sheet::{Cell, RawSheet};
use anyhow::Context;
use calamine::{DataRef, DataType, Reader, Xlsx};
use std::io::Cursor;

/// Largest worksheet Excel can address; cells beyond are dropped.
pub const MAX_ROWS: u32 = 1_048_576;
pub const MAX_COLS: u32 = 16_384;

#[derive(Debug, Clone)]
pub struct DecodedSheet {
    pub name: String,
    pub sheet: RawSheet,
}

fn to_cell(value: &DataRef<'_>) -> Cell {
    let text = |s: &str| {
        if s.is_empty() {
            Cell::Empty
        } else {
            Cell::Text(s.to_string())
        }
    };
    match value {
        DataRef::Empty | DataRef::Error(_) => Cell::Empty,
        DataRef::Int(i) => Cell::Number(*i as f64),
        DataRef::Float(f) => Cell::Number(*f),
        DataRef::Bool(b) => Cell::Bool(*b),
        DataRef::String(s) => text(s),
        DataRef::SharedString(s) => text(s),
        DataRef::DateTimeIso(s) | DataRef::DurationIso(s) => text(s),
        // Serial dates keep their numeric value.
        other => other.as_f64().map(Cell::Number).unwrap_or(Cell::Empty),
    }
}

fn place(rows: &mut Vec<Vec<Cell>>, row: usize, col: usize, cell: Cell) {
    if matches!(cell, Cell::Empty) {
        return;
    }
    if rows.len() <= row {
        rows.resize_with(row + 1, Vec::new);
    }
    let r = &mut rows[row];
    if r.len() <= col {
        r.resize(col + 1, Cell::Empty);
    }
    r[col] = cell;
}

fn read_sheet(workbook: &mut Xlsx<Cursor<&[u8]>>, name: &str) -> anyhow::Result<RawSheet> {
    let mut reader = workbook
        .worksheet_cells_reader(name)
        .with_context(|| format!("failed to open worksheet {name}"))?;
    let mut rows: Vec<Vec<Cell>> = Vec::new();
    let mut dropped = 0usize;
    while let Some(cell) = reader
        .next_cell()
        .with_context(|| format!("failed to read worksheet {name}"))?
    {
        let (row, col) = cell.get_position();
        if row >= MAX_ROWS || col >= MAX_COLS {
            dropped += 1;
            continue;
        }
        place(&mut rows, row as usize, col as usize, to_cell(cell.get_value()));
    }
    if dropped > 0 {
        tracing::warn!(sheet = %name, dropped, "cells outside the worksheet grid ignored");
    }
    Ok(RawSheet::new(rows))
}

/// Decodes every worksheet of an `.xlsx` file, in workbook order. Cells are
/// streamed and placed at their absolute position, so leading blank rows and
/// columns survive.
pub fn read_workbook(bytes: &[u8]) -> anyhow::Result<Vec<DecodedSheet>> {
    let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes)).context("not an xlsx workbook")?;
    let names = workbook.sheet_names();
    let mut out = Vec::with_capacity(names.len());
    for name in names {
        let sheet = read_sheet(&mut workbook, &name)?;
        out.push(DecodedSheet { name, sheet });
    }
    Ok(out)
}
