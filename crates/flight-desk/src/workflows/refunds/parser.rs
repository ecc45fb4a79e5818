use serde::Deserialize;
use std::io::Read;

#[derive(Debug, Deserialize)]
struct RefundRow {
    #[serde(rename = "Hours Left")]
    hours_left: f64,
}

pub(crate) fn parse_hours<R: Read>(reader: R) -> Result<Vec<f64>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    csv_reader
        .deserialize::<RefundRow>()
        .map(|row| row.map(|row| row.hours_left))
        .collect()
}
