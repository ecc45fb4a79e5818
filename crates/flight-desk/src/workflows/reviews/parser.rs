use super::ReviewRecord;
use serde::Deserialize;
use std::io::Read;

#[derive(Debug, Deserialize)]
struct ReviewRow {
    #[serde(rename = "AirLine_Name")]
    airline_name: String,
    #[serde(rename = "Recommond", default)]
    recommended: String,
}

pub(crate) fn parse_reviews<R: Read>(reader: R) -> Result<Vec<ReviewRecord>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .flexible(true)
        .from_reader(reader);
    let mut records = Vec::new();

    for row in csv_reader.deserialize::<ReviewRow>() {
        let row = row?;
        records.push(ReviewRecord {
            airline_name: row.airline_name,
            recommended: row.recommended,
        });
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn blank_recommendation_is_not_a_yes() {
        let records =
            parse_reviews(Cursor::new("AirLine_Name,Recommond\nIndigo,\n")).expect("parses");
        assert_eq!(records.len(), 1);
        assert!(!records[0].is_recommended());
    }

    #[test]
    fn cells_are_kept_verbatim() {
        let csv = " AirLine_Name , Recommond \n Indigo,yes\nIndigo, yes\nIndigo,yes\n";
        let records = parse_reviews(Cursor::new(csv)).expect("parses");
        assert_eq!(records[0].airline_name, " Indigo");
        assert!(!records[1].is_recommended());
        assert!(records[2].is_recommended());
        assert_eq!(records[2].airline_name, "Indigo");
    }

    #[test]
    fn header_without_airline_column_fails() {
        assert!(parse_reviews(Cursor::new("Airline,Recommond\nIndigo,yes\n")).is_err());
    }
}
