/**
 * neighborec
 * Copyright (C) 2019 the neighborec developers
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * This program is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with this program. If not, see <http://www.gnu.org/licenses/>.
 */

use csv;

use std::fs::File;
use std::io;
use std::io::prelude::*;
use std::io::stdout;
use std::path::Path;

use fnv::FnvHashMap;

use errors::CfError;
use similarity::Mode;
use stats::Renaming;
use types::PredictionMatrix;

/// Reads a rating dataset: one record per line, tab-separated, no headers,
/// fields `user, item, rating[, timestamp]`. The rating must parse as an
/// integer; the timestamp is ignored. Any malformed record aborts the load.
pub fn read_ratings(file: &str) -> Result<Vec<(String, String, f64)>, CfError> {

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .delimiter(b'\t')
        .flexible(true)
        .from_path(file)?;

    let mut triples = Vec::new();

    for (index, record) in reader.records().enumerate() {
        let record = record?;
        let triple = parse_record(&record)
            .map_err(|details| CfError::DatasetFormat(
                format!("line {}: {}", index + 1, details)))?;
        triples.push(triple);
    }

    Ok(triples)
}

fn parse_record(record: &csv::StringRecord) -> Result<(String, String, f64), String> {

    if record.len() < 3 {
        return Err(format!(
            "expected at least 3 tab-separated fields, found {}", record.len()));
    }

    let rating: i64 = record[2].trim().parse()
        .map_err(|_| format!("rating '{}' is not an integer", &record[2]))?;

    Ok((record[0].to_string(), record[1].to_string(), rating as f64))
}

/// Struct used for JSON serialization of a prediction row. Field names will
/// be used in JSON.
#[derive(Serialize)]
struct PredictedRow<'a> {
    for_entity: &'a str,
    predictions: FnvHashMap<&'a str, f64>,
}

/// Writes the prediction table as JSON lines, one entity per line, with the
/// original identifiers restored. If a `predictions_path` is supplied, we
/// write to a file at the specified path, otherwise we output to stdout.
pub fn write_predictions(
    predictions: &PredictionMatrix,
    mode: Mode,
    renaming: &Renaming,
    predictions_path: Option<String>,
) -> io::Result<()> {

    let mut out: Box<Write> = match predictions_path {
        Some(path) => Box::new(File::create(&Path::new(&path))?),
        _ => Box::new(stdout()),
    };

    for (entity_index, predicted_row) in predictions.iter().enumerate() {

        let predicted: FnvHashMap<&str, f64> = predicted_row.iter()
            .map(|(counterpart, value)| {
                (mode.counterpart_name(renaming, *counterpart), *value)
            })
            .collect();

        let row_as_json = json!(PredictedRow {
            for_entity: mode.entity_name(renaming, entity_index as u32),
            predictions: predicted,
        });

        write!(out, "{}\n", row_as_json.to_string())?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {

    use csv;

    use io::parse_record;

    #[test]
    fn parses_a_movielens_record() {
        let record = csv::StringRecord::from(vec!["196", "242", "3", "881250949"]);
        assert_eq!(parse_record(&record).unwrap(),
            ("196".to_string(), "242".to_string(), 3.0));
    }

    #[test]
    fn parses_a_record_without_timestamp() {
        let record = csv::StringRecord::from(vec!["196", "242", "3"]);
        assert!(parse_record(&record).is_ok());
    }

    #[test]
    fn rejects_a_short_record() {
        let record = csv::StringRecord::from(vec!["196", "242"]);
        assert!(parse_record(&record).is_err());
    }

    #[test]
    fn rejects_a_non_numeric_rating() {
        let record = csv::StringRecord::from(vec!["196", "242", "great"]);
        assert!(parse_record(&record).is_err());
    }
}
