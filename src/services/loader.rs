use csv::{ReaderBuilder, StringRecord, Trim};
use std::fs::File;
use std::io::{BufRead, Read};
use std::path::Path;

use crate::error::{Error, Result};
use crate::models::{DecimalPoint, DmsPoint, InputFormat, PointSet};

/// Supplies an ordered point set to the matcher
pub trait PointSource {
    fn load(&mut self, format: InputFormat) -> Result<PointSet>;
}

/// Header-based CSV point reader
///
/// Decimal sets read `<lat>` and `<lon>` columns. DMS sets read
/// `<col>_deg`, `<col>_min`, `<col>_sec` and `<col>_dir` for each axis.
pub struct CsvPointSource<R> {
    reader: R,
    lat_column: String,
    lon_column: String,
    delimiter: u8,
}

impl CsvPointSource<File> {
    pub fn from_path(path: &Path, lat_column: &str, lon_column: &str) -> Result<Self> {
        let file = File::open(path)?;
        Ok(Self::from_reader(file, lat_column, lon_column))
    }
}

impl<R: Read> CsvPointSource<R> {
    pub fn from_reader(reader: R, lat_column: &str, lon_column: &str) -> Self {
        Self {
            reader,
            lat_column: lat_column.to_string(),
            lon_column: lon_column.to_string(),
            delimiter: b',',
        }
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    fn columns(&self, format: InputFormat) -> Vec<String> {
        match format {
            InputFormat::Decimal => vec![self.lat_column.clone(), self.lon_column.clone()],
            InputFormat::Degrees => [&self.lat_column, &self.lon_column]
                .into_iter()
                .flat_map(|column| {
                    ["deg", "min", "sec", "dir"]
                        .into_iter()
                        .map(move |suffix| format!("{column}_{suffix}"))
                })
                .collect(),
        }
    }
}

impl<R: Read> PointSource for CsvPointSource<R> {
    fn load(&mut self, format: InputFormat) -> Result<PointSet> {
        let columns = self.columns(format);
        let mut csv_reader = ReaderBuilder::new()
            .trim(Trim::Fields)
            .delimiter(self.delimiter)
            .from_reader(&mut self.reader);

        let headers = csv_reader.headers()?.clone();
        let indices = column_indices(&headers, &columns)?;

        let mut points = PointSet::empty(format);
        for (row, record) in csv_reader.records().enumerate() {
            let record = record?;
            let fields: Vec<&str> = indices
                .iter()
                .map(|&index| record.get(index).unwrap_or_default())
                .collect();

            // Header is line 1
            let line = row + 2;
            match &mut points {
                PointSet::Decimal(points) => {
                    points.push(DecimalPoint::from_fields(&fields).map_err(|e| at_line(e, line))?)
                }
                PointSet::Degrees(points) => {
                    points.push(DmsPoint::from_fields(&fields).map_err(|e| at_line(e, line))?)
                }
            }
        }

        tracing::debug!("Loaded {} {} points from CSV", points.len(), format);
        Ok(points)
    }
}

fn column_indices(headers: &StringRecord, columns: &[String]) -> Result<Vec<usize>> {
    columns
        .iter()
        .map(|column| {
            headers
                .iter()
                .position(|header| header.eq_ignore_ascii_case(column))
                .ok_or_else(|| Error::MissingColumn {
                    name: column.clone(),
                })
        })
        .collect()
}

fn at_line(error: Error, line: usize) -> Error {
    match error {
        Error::InvalidInput { message } => Error::InvalidInput {
            message: format!("line {line}: {message}"),
        },
        other => other,
    }
}

/// Reads one whitespace-separated point per line until a blank line or EOF
///
/// Lines that do not parse are logged and skipped, so a typo does not throw
/// away the points already entered.
pub struct LinePointSource<R> {
    reader: R,
    rejected: usize,
}

impl<R: BufRead> LinePointSource<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            rejected: 0,
        }
    }

    /// Lines skipped so far because they failed to parse
    pub fn rejected(&self) -> usize {
        self.rejected
    }
}

impl<R: BufRead> PointSource for LinePointSource<R> {
    fn load(&mut self, format: InputFormat) -> Result<PointSet> {
        let mut points = PointSet::empty(format);
        let mut line = String::new();

        loop {
            line.clear();
            if self.reader.read_line(&mut line)? == 0 {
                break;
            }

            let fields: Vec<&str> = line.split_whitespace().collect();
            if fields.is_empty() {
                break;
            }

            let parsed = match &mut points {
                PointSet::Decimal(points) => {
                    DecimalPoint::from_fields(&fields).map(|point| points.push(point))
                }
                PointSet::Degrees(points) => {
                    DmsPoint::from_fields(&fields).map(|point| points.push(point))
                }
            };

            if let Err(e) = parsed {
                self.rejected += 1;
                tracing::warn!("Skipping line '{}': {}", line.trim(), e);
            }
        }

        Ok(points)
    }
}
