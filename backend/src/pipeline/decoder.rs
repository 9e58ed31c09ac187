use crate::error::{ApiError, ApiResult};
use csv::{ReaderBuilder, StringRecord, StringRecordsIntoIter, Trim};
use std::collections::HashMap;
use std::io::Read;

/// One decoded data row: header name to trimmed cell value.
pub type CsvRow = HashMap<String, String>;

/// Lazy iterator over the data rows of a CSV document.
///
/// Rows are decoded one at a time as the iterator is advanced; a malformed
/// row surfaces as an `Err` at its position without affecting earlier rows.
pub struct CsvRows<R: Read> {
    headers: StringRecord,
    records: StringRecordsIntoIter<R>,
}

/// Reads the header line of `reader` and returns the remaining rows lazily.
///
/// Cells and headers are trimmed, blank lines skipped, and a row whose field
/// count differs from the header is reported as malformed.
pub fn decode<R: Read>(reader: R) -> ApiResult<CsvRows<R>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .flexible(false)
        .from_reader(reader);
    let headers = reader.headers()?.clone();
    Ok(CsvRows {
        headers,
        records: reader.into_records(),
    })
}

impl<R: Read> Iterator for CsvRows<R> {
    type Item = ApiResult<CsvRow>;

    fn next(&mut self) -> Option<Self::Item> {
        let record = match self.records.next()? {
            Ok(record) => record,
            Err(err) => return Some(Err(ApiError::from(err))),
        };
        Some(Ok(self
            .headers
            .iter()
            .zip(record.iter())
            .map(|(header, value)| (header.to_string(), value.to_string()))
            .collect()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(input: &str) -> ApiResult<Vec<CsvRow>> {
        decode(input.as_bytes())?.collect()
    }

    #[test]
    fn rows_are_keyed_by_trimmed_header() {
        let rows = collect("Name , Mail\n  Jane ,j@x.com \n\"Doe, John\",d@x.com\n").unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["Name"], "Jane");
        assert_eq!(rows[0]["Mail"], "j@x.com");
        assert_eq!(rows[1]["Name"], "Doe, John");
    }

    #[test]
    fn empty_lines_are_skipped() {
        let rows = collect("Name,Mail\n\nJane,j@x.com\r\n\r\nJohn,d@x.com\n\n").unwrap();
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn header_only_and_empty_input_yield_no_rows() {
        assert!(collect("Name,Mail\n").unwrap().is_empty());
        assert!(collect("").unwrap().is_empty());
    }

    #[test]
    fn inconsistent_column_count_is_malformed() {
        let err = collect("Name,Mail\nJane,j@x.com,extra\n").unwrap_err();
        assert!(matches!(err, ApiError::MalformedInput(_)), "{:?}", err);
    }

    #[test]
    fn unterminated_quote_is_malformed() {
        let err = collect("Name,Mail\n\"Jane,j@x.com\nJohn,d@x.com\n").unwrap_err();
        assert!(matches!(err, ApiError::MalformedInput(_)), "{:?}", err);
    }

    #[test]
    fn rows_before_a_malformed_row_are_available() {
        let mut rows = decode("Name,Mail\nJane,j@x.com\nbroken\n".as_bytes()).unwrap();

        let first = rows.next().unwrap().unwrap();
        assert_eq!(first["Name"], "Jane");
        assert!(rows.next().unwrap().is_err());
    }
}
