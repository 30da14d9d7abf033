use std::{fs::File, io::Read, path::Path};

use flux_common::{Intensity, Real};
use thiserror::Error;
use tracing::{debug, instrument};

use crate::{error::FluxError, signal::Signal};

/// Intensity column names written by line profile exports, in order of preference.
pub const DEFAULT_INTENSITY_COLUMNS: [&str; 2] = ["Y", "Gray_Value"];

#[derive(Debug, Error)]
pub enum LoaderError {
    #[error("Cannot open {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("CSV Error: {0}")]
    Csv(#[from] csv::Error),
    #[error("No intensity column found, looked for: {}", .candidates.join(", "))]
    MissingColumn { candidates: Vec<String> },
    #[error("Line {line}: cannot read {value:?} as an intensity")]
    Parse { line: u64, value: String },
    #[error("{0}")]
    Signal(#[from] FluxError),
}

/// Loads one scan line profile from a CSV file.
///
/// The intensity column is `column` if given, otherwise the first of
/// [DEFAULT_INTENSITY_COLUMNS] present. Samples are indexed by row order.
#[instrument(skip_all, fields(path = %path.as_ref().display(), column = column))]
pub fn load_signal(path: impl AsRef<Path>, column: Option<&str>) -> Result<Signal, LoaderError> {
    let file = File::open(path.as_ref()).map_err(|source| LoaderError::Io {
        path: path.as_ref().display().to_string(),
        source,
    })?;
    read_signal(file, column)
}

/// As [load_signal], from any reader.
pub fn read_signal<R: Read>(reader: R, column: Option<&str>) -> Result<Signal, LoaderError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    // Profile exports are not always UTF-8, so headers are decoded lossily.
    let headers: Vec<String> = reader
        .byte_headers()?
        .iter()
        .map(|header| {
            String::from_utf8_lossy(header)
                .trim_start_matches('\u{feff}')
                .trim()
                .to_owned()
        })
        .collect();

    let candidates: Vec<&str> = match column {
        Some(column) => vec![column],
        None => DEFAULT_INTENSITY_COLUMNS.to_vec(),
    };
    let position = candidates
        .iter()
        .find_map(|candidate| headers.iter().position(|header| header.as_str() == *candidate))
        .ok_or_else(|| LoaderError::MissingColumn {
            candidates: candidates.iter().map(ToString::to_string).collect(),
        })?;
    debug!(column = headers.get(position).map(String::as_str), "Intensity column");

    let mut intensities = Vec::<Intensity>::new();
    for record in reader.byte_records() {
        let record = record?;
        if record.iter().all(|field| field.trim_ascii().is_empty()) {
            continue;
        }
        let value = String::from_utf8_lossy(record.get(position).unwrap_or_default());
        let value = value.trim();
        let intensity = value.parse::<Real>().map_err(|_| LoaderError::Parse {
            line: record.position().map_or(0, csv::Position::line),
            value: value.to_owned(),
        })?;
        intensities.push(intensity);
    }
    debug!(samples = intensities.len(), "Profile loaded");

    Ok(Signal::from_intensities(intensities)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{MissingDataError, Stage};

    fn read(csv: &str, column: Option<&str>) -> Result<Signal, LoaderError> {
        read_signal(csv.as_bytes(), column)
    }

    fn intensities(signal: &Signal) -> Vec<Intensity> {
        signal.intensities().collect()
    }

    #[test]
    fn y_column() {
        let signal = read("X,Y\n0,3000\n1,2990.5\n2,3010\n", None).expect("valid profile");
        assert_eq!(intensities(&signal), vec![3000.0, 2990.5, 3010.0]);
        assert_eq!(signal.indices().collect::<Vec<_>>(), vec![0, 1, 2]);
    }

    #[test]
    fn gray_value_column() {
        let signal = read("X,Gray_Value\n0,12\n1,13\n", None).expect("valid profile");
        assert_eq!(intensities(&signal), vec![12.0, 13.0]);
    }

    #[test]
    fn y_preferred_over_gray_value() {
        let signal = read("Gray_Value,Y\n1,2\n", None).expect("valid profile");
        assert_eq!(intensities(&signal), vec![2.0]);
    }

    #[test]
    fn explicit_column() {
        let signal = read("X,Y,Mean\n0,1,7\n1,2,8\n", Some("Mean")).expect("valid profile");
        assert_eq!(intensities(&signal), vec![7.0, 8.0]);
    }

    #[test]
    fn headers_are_trimmed_and_bom_ignored() {
        let signal = read("\u{feff} X , Gray_Value \n0, 5\n", None).expect("valid profile");
        assert_eq!(intensities(&signal), vec![5.0]);
    }

    #[test]
    fn blank_rows_are_skipped() {
        let signal = read("X,Y\n0,1\n\n1,2\n,\n2,3\n", None).expect("valid profile");
        assert_eq!(intensities(&signal), vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn missing_column() {
        let result = read("X,Z\n0,1\n", None);
        assert!(matches!(
            result,
            Err(LoaderError::MissingColumn { candidates }) if candidates == ["Y", "Gray_Value"]
        ));
    }

    #[test]
    fn unparsable_cell_names_line() {
        let result = read("X,Y\n0,1\n1,bright\n", None);
        assert!(matches!(
            result,
            Err(LoaderError::Parse { line: 3, value }) if value == "bright"
        ));
    }

    #[test]
    fn no_samples() {
        let result = read("X,Y\n", None);
        assert!(matches!(
            result,
            Err(LoaderError::Signal(FluxError::MissingData {
                reason: MissingDataError::EmptySignal,
                location: Stage::Signal
            }))
        ));
    }

    #[test]
    fn missing_file() {
        assert!(matches!(
            load_signal("/nonexistent/profile.csv", None),
            Err(LoaderError::Io { .. })
        ));
    }
}
