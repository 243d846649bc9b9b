//! Delimited-text emission for recorder frames.

use crate::error::RecorderResult;
use crate::frame::RecorderFrame;
use std::io::Write;

/// Write the column-name header line.
pub fn write_csv_header<W: Write>(out: &mut W, delimiter: &str) -> RecorderResult<()> {
    let frame = RecorderFrame::default();
    let names: Vec<&str> = frame.fields().iter().map(|(name, _)| *name).collect();
    writeln!(out, "{}", names.join(delimiter))?;
    Ok(())
}

/// Write one frame as a delimited row, fields in wire order.
pub fn write_csv_row<W: Write>(
    out: &mut W,
    delimiter: &str,
    frame: &RecorderFrame,
) -> RecorderResult<()> {
    let values: Vec<String> = frame
        .fields()
        .iter()
        .map(|(_, value)| value.to_string())
        .collect();
    writeln!(out, "{}", values.join(delimiter))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_and_row_have_matching_arity() {
        let mut header = Vec::new();
        write_csv_header(&mut header, ",").unwrap();
        let header = String::from_utf8(header).unwrap();

        let mut row = Vec::new();
        write_csv_row(&mut row, ",", &RecorderFrame::default()).unwrap();
        let row = String::from_utf8(row).unwrap();

        assert_eq!(
            header.trim_end().split(',').count(),
            row.trim_end().split(',').count()
        );
        assert_eq!(
            header.trim_end().split(',').count(),
            RecorderFrame::FIELD_COUNT
        );
    }

    #[test]
    fn custom_delimiter() {
        let mut row = Vec::new();
        write_csv_row(&mut row, ";", &RecorderFrame::default()).unwrap();
        let row = String::from_utf8(row).unwrap();
        assert_eq!(row.trim_end().split(';').count(), RecorderFrame::FIELD_COUNT);
    }

    #[test]
    fn header_starts_with_time_column() {
        let mut header = Vec::new();
        write_csv_header(&mut header, ",").unwrap();
        let header = String::from_utf8(header).unwrap();
        assert!(header.starts_with("ap_sm.simulation_time_s,"));
    }
}
