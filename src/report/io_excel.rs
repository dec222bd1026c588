use calamine::{open_workbook, DataType, Range, Reader, Xlsx};
use chrono::Timelike;
use log::{debug, info};
use snafu::prelude::*;

use crate::report::*;

pub fn read_excel_dataset(path: &str, worksheet_name: Option<&str>) -> RepResult<Dataset> {
    let wrange = get_range(path, worksheet_name)?;

    let mut iter = wrange.rows();
    let header = iter.next().context(EmptyExcelSnafu { path })?;
    debug!("read_excel_dataset: header: {:?}", header);

    let mut columns: Vec<String> = Vec::new();
    for (idx, cell) in header.iter().enumerate() {
        let name = read_cell(cell, 1)?.unwrap_or_else(|| format!("Unnamed: {}", idx));
        columns.push(name);
    }

    let mut rows: Vec<Vec<Option<String>>> = Vec::new();
    for (idx, row) in iter.enumerate() {
        let lineno = idx + 2;
        let mut values: Vec<Option<String>> = Vec::new();
        for cell in row.iter() {
            values.push(read_cell(cell, lineno)?);
        }
        // A range is rectangular, but be lenient with truncated rows.
        values.resize(columns.len(), None);
        rows.push(values);
    }
    info!("Read {} rows from {}", rows.len(), path);

    Ok(Dataset { columns, rows })
}

fn get_range(path: &str, worksheet_name: Option<&str>) -> RepResult<Range<DataType>> {
    let mut workbook: Xlsx<_> = open_workbook(path).context(OpeningExcelSnafu { path })?;
    let wrange = match worksheet_name {
        Some(name) => workbook
            .worksheet_range(name)
            .context(MissingWorksheetSnafu { name, path })?
            .context(OpeningExcelSnafu { path })?,
        None => workbook
            .worksheet_range_at(0)
            .context(EmptyExcelSnafu { path })?
            .context(OpeningExcelSnafu { path })?,
    };
    Ok(wrange)
}

/// Reads a cell as a category label.
///
/// Numbers that are integers lose their decimal part, so that a year or an
/// age typed in a spreadsheet reads the same as in a CSV file. Dates read as
/// `YYYY-MM-DD`, with the time only when it is not midnight.
pub fn read_cell(cell: &DataType, lineno: usize) -> RepResult<Option<String>> {
    match cell {
        DataType::String(s) if s.is_empty() => Ok(None),
        DataType::String(s) => Ok(Some(s.clone())),
        DataType::Int(i) => Ok(Some(i.to_string())),
        DataType::Float(f) if f.fract() == 0.0 && f.is_finite() => {
            Ok(Some(format!("{:.0}", f)))
        }
        DataType::Float(f) => Ok(Some(f.to_string())),
        DataType::Bool(b) => Ok(Some(b.to_string())),
        DataType::DateTime(serial) => match cell.as_datetime() {
            Some(dt) if dt.num_seconds_from_midnight() == 0 => {
                Ok(Some(dt.format("%Y-%m-%d").to_string()))
            }
            Some(dt) => Ok(Some(dt.format("%Y-%m-%d %H:%M:%S").to_string())),
            None => Err(ReportError::ExcelWrongCellType {
                lineno,
                content: serial.to_string(),
            }),
        },
        DataType::Empty => Ok(None),
        DataType::Error(e) => Err(ReportError::ExcelWrongCellType {
            lineno,
            content: format!("{:?}", e),
        }),
        other => Ok(Some(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cells() {
        assert_eq!(
            read_cell(&DataType::String("Engineer".to_string()), 2).unwrap(),
            Some("Engineer".to_string())
        );
        assert_eq!(read_cell(&DataType::String("".to_string()), 2).unwrap(), None);
        assert_eq!(read_cell(&DataType::Empty, 2).unwrap(), None);
        assert_eq!(
            read_cell(&DataType::Int(2019), 2).unwrap(),
            Some("2019".to_string())
        );
        assert_eq!(
            read_cell(&DataType::Float(35.0), 2).unwrap(),
            Some("35".to_string())
        );
        assert_eq!(
            read_cell(&DataType::Float(1.5), 2).unwrap(),
            Some("1.5".to_string())
        );
        assert_eq!(
            read_cell(&DataType::Bool(true), 2).unwrap(),
            Some("true".to_string())
        );
    }

    #[test]
    fn date_cells() {
        assert_eq!(
            read_cell(&DataType::DateTime(43466.0), 2).unwrap(),
            Some("2019-01-01".to_string())
        );
        assert_eq!(
            read_cell(&DataType::DateTime(43466.5), 2).unwrap(),
            Some("2019-01-01 12:00:00".to_string())
        );
    }

    #[test]
    fn error_cell() {
        let res = read_cell(&DataType::Error(calamine::CellErrorType::NA), 7);
        assert!(matches!(
            res,
            Err(ReportError::ExcelWrongCellType { lineno: 7, .. })
        ));
    }

    fn fixture(name: &str) -> String {
        format!("{}/tests/fixtures/{}", env!("CARGO_MANIFEST_DIR"), name)
    }

    #[test]
    fn first_worksheet() {
        let ds = read_excel_dataset(&fixture("attendees.xlsx"), None).unwrap();
        assert_eq!(
            ds.columns,
            vec!["Title_Categories", "Unnamed: 1", "Country"]
        );
        assert_eq!(ds.rows.len(), 3);
        assert_eq!(
            ds.rows[0],
            vec![
                Some("Engineer".to_string()),
                Some("2019".to_string()),
                Some("Taiwan".to_string()),
            ]
        );
        assert_eq!(ds.rows[1][1], None);
        // Only the first cell is filled, the rest of the row is missing.
        assert_eq!(
            ds.rows[2],
            vec![Some("Other".to_string()), None, None]
        );
        assert_eq!(ds.value_counts("Country").unwrap().len(), 2);
    }

    #[test]
    fn named_worksheet() {
        let ds = read_excel_dataset(&fixture("attendees.xlsx"), Some("Late")).unwrap();
        assert_eq!(ds.columns, vec!["Country"]);
        assert_eq!(
            ds.column_values("Country").unwrap(),
            vec!["Japan", "No Record"]
        );
    }

    #[test]
    fn missing_worksheet() {
        let res = read_excel_dataset(&fixture("attendees.xlsx"), Some("Form1"));
        assert!(matches!(
            res,
            Err(ReportError::MissingWorksheet { ref name, .. }) if name == "Form1"
        ));
    }

    #[test]
    fn missing_file() {
        let res = read_excel_dataset("/nonexistent/attendees.xlsx", None);
        assert!(matches!(res, Err(ReportError::OpeningExcel { .. })));
    }
}
