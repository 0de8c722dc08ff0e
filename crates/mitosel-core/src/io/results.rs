use std::collections::BTreeMap;
use std::io::{Read, Write};
use std::path::Path;
use std::str::FromStr;

use csv::{ReaderBuilder, StringRecord, Terminator, Trim, WriterBuilder};

use crate::consts::{NOT_APPLICABLE, RESULT_COLUMNS};
use crate::error::{MitoselError, Result};
use crate::roi::{ResultTable, RoiBounds, RoiRecord, StageValue};

fn csv_writer() -> WriterBuilder {
    let mut builder = WriterBuilder::new();
    builder.terminator(Terminator::Any(b'\n'));
    builder
}

fn csv_reader() -> ReaderBuilder {
    let mut builder = ReaderBuilder::new();
    builder.flexible(true).trim(Trim::All);
    builder
}

/// Write the header and one row per ROI.
///
/// Columns: `Cell,x0,y0,x1,y1,t0,t1,<stages...>` where x is the column
/// axis and y the row axis. Unset cells are left empty.
fn write_table<W: Write>(table: &ResultTable, wtr: &mut csv::Writer<W>) -> Result<()> {
    wtr.write_record(
        RESULT_COLUMNS
            .iter()
            .copied()
            .chain(table.stage_names().iter().map(String::as_str)),
    )?;

    for record in table.records() {
        let b = &record.bounds;
        let mut fields = vec![
            record.id.to_string(),
            b.col_min.to_string(),
            b.row_min.to_string(),
            b.col_max.to_string(),
            b.row_max.to_string(),
            optional(record.time_start),
            optional(record.time_end),
        ];
        for stage in table.stage_names() {
            fields.push(match record.stage_labels.get(stage) {
                Some(StageValue::Frame(v)) => v.to_string(),
                Some(StageValue::NotApplicable) => NOT_APPLICABLE.to_string(),
                None => String::new(),
            });
        }
        wtr.write_record(&fields)?;
    }

    wtr.flush()?;
    Ok(())
}

fn optional(value: Option<usize>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// Render a result table as CSV text.
pub fn to_csv_string(table: &ResultTable) -> Result<String> {
    let mut wtr = csv_writer().from_writer(Vec::new());
    write_table(table, &mut wtr)?;
    let bytes = wtr.into_inner().map_err(|e| MitoselError::Io(e.into_error()))?;
    String::from_utf8(bytes).map_err(|e| MitoselError::ResultTable(e.to_string()))
}

pub fn write_results_csv(table: &ResultTable, path: &Path) -> Result<()> {
    let mut wtr = csv_writer().from_path(path)?;
    write_table(table, &mut wtr)
}

pub fn read_results_csv(path: &Path) -> Result<ResultTable> {
    read_table(csv_reader().from_path(path)?)
}

/// Parse a results table from CSV text. Quoted fields are accepted.
pub fn parse_results_csv(contents: &str) -> Result<ResultTable> {
    read_table(csv_reader().from_reader(contents.as_bytes()))
}

fn read_table<R: Read>(mut reader: csv::Reader<R>) -> Result<ResultTable> {
    let header = reader.headers()?.clone();
    let fixed = RESULT_COLUMNS.len();
    if header.len() < fixed || !header.iter().take(fixed).eq(RESULT_COLUMNS.iter().copied()) {
        return Err(MitoselError::ResultTable(format!(
            "header must start with {}, got {}",
            RESULT_COLUMNS.join(","),
            header.iter().collect::<Vec<_>>().join(",")
        )));
    }
    let stage_names: Vec<String> = header.iter().skip(fixed).map(str::to_string).collect();

    let mut builder = ResultTable::builder(stage_names.clone());
    for (row, record) in reader.records().enumerate() {
        let record = record?;
        if record.len() != header.len() {
            return Err(MitoselError::ResultTable(format!(
                "row {} has {} fields, expected {}",
                row + 1,
                record.len(),
                header.len()
            )));
        }
        builder.push_record(parse_record(&record, &stage_names)?);
    }
    Ok(builder.build())
}

fn parse_record(record: &StringRecord, stage_names: &[String]) -> Result<RoiRecord> {
    let fixed = RESULT_COLUMNS.len();
    let mut stage_labels = BTreeMap::new();
    for (stage, cell) in stage_names.iter().zip(record.iter().skip(fixed)) {
        if cell.is_empty() {
            continue;
        }
        let value = if cell.eq_ignore_ascii_case(NOT_APPLICABLE) {
            StageValue::NotApplicable
        } else {
            StageValue::Frame(parse_field(cell, stage)?)
        };
        stage_labels.insert(stage.clone(), value);
    }

    Ok(RoiRecord {
        id: parse_field(&record[0], "Cell")?,
        bounds: RoiBounds {
            col_min: parse_field(&record[1], "x0")?,
            row_min: parse_field(&record[2], "y0")?,
            col_max: parse_field(&record[3], "x1")?,
            row_max: parse_field(&record[4], "y1")?,
        },
        time_start: parse_optional(&record[5], "t0")?,
        time_end: parse_optional(&record[6], "t1")?,
        stage_labels,
    })
}

fn parse_field<T: FromStr>(cell: &str, column: &str) -> Result<T> {
    cell.parse()
        .map_err(|_| MitoselError::ResultTable(format!("invalid {column} value: {cell:?}")))
}

fn parse_optional(cell: &str, column: &str) -> Result<Option<usize>> {
    if cell.is_empty() {
        Ok(None)
    } else {
        parse_field(cell, column).map(Some)
    }
}
