use chrono::{DateTime, NaiveDateTime};
use flate2::bufread::GzDecoder;
use serde::Deserialize;
use std::{
    fs::File,
    io::{BufReader, Read},
    path::{Path, PathBuf},
    time::Instant,
};

/// Default metric the readings are filtered on
pub const METRIC: &str = "Power_consumption";

#[derive(thiserror::Error, Debug)]
pub enum ReadingsError {
    #[error("Failed to open the readings file {1:?}")]
    Io(#[source] std::io::Error, PathBuf),
    #[error("Failed to deserialize the CSV file")]
    Csv(#[from] csv::Error),
    #[error("Failed to parse timestamp {text:?} in row #{row}")]
    Timestamp { row: usize, text: String },
    #[error("Column {0:?} is missing from the readings header")]
    MissingColumn(&'static str),
}
type Result<T> = std::result::Result<T, ReadingsError>;

#[derive(Deserialize, Debug)]
struct Record {
    time: String,
    metric: String,
    value: Option<f64>,
}

const COLUMNS: [&str; 3] = ["time", "metric", "value"];

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];
const OFFSET_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f%:z", "%Y-%m-%d %H:%M:%S%.f%z"];

/// Parses a timestamp into the wall-clock time it was recorded at
///
/// Timestamps with an UTC offset keep their local time, the offset is dropped.
pub fn parse_timestamp(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    DateTime::parse_from_rfc3339(text)
        .ok()
        .or_else(|| {
            OFFSET_FORMATS
                .iter()
                .find_map(|fmt| DateTime::parse_from_str(text, fmt).ok())
        })
        .map(|dt| dt.naive_local())
        .or_else(|| {
            NAIVE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        })
}

/// Time series of a single metric
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Readings {
    pub metric: String,
    pub time: Vec<NaiveDateTime>,
    /// the metric value, `None` where the field was empty
    pub value: Vec<Option<f64>>,
}
impl Readings {
    pub fn len(&self) -> usize {
        self.time.len()
    }
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
    /// Running state of the equipment: `value > threshold`
    pub fn running(&self, threshold: f64) -> Vec<bool> {
        self.value
            .iter()
            .map(|v| v.is_some_and(|v| v > threshold))
            .collect()
    }
}

/// Readings file loader
pub struct ReadingsLoader {
    path: PathBuf,
    delimiter: u8,
    metric: String,
    time_range: (Option<NaiveDateTime>, Option<NaiveDateTime>),
}
impl Default for ReadingsLoader {
    fn default() -> Self {
        Self {
            path: Path::new("data").join("process_data_analyst_test.csv"),
            delimiter: b';',
            metric: METRIC.to_string(),
            time_range: (None, None),
        }
    }
}
impl ReadingsLoader {
    pub fn data_path<P: AsRef<Path>>(self, path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            ..self
        }
    }
    pub fn delimiter(self, delimiter: u8) -> Self {
        Self { delimiter, ..self }
    }
    pub fn metric<S: Into<String>>(self, metric: S) -> Self {
        Self {
            metric: metric.into(),
            ..self
        }
    }
    pub fn start_time(self, time: NaiveDateTime) -> Self {
        Self {
            time_range: (Some(time), self.time_range.1),
            ..self
        }
    }
    pub fn end_time(self, time: NaiveDateTime) -> Self {
        Self {
            time_range: (self.time_range.0, Some(time)),
            ..self
        }
    }
    fn open(&self) -> Result<Box<dyn Read>> {
        let file = File::open(&self.path).map_err(|e| ReadingsError::Io(e, self.path.clone()))?;
        let buf = BufReader::new(file);
        let rdr: Box<dyn Read> = match self.path.extension().and_then(|ext| ext.to_str()) {
            Some("gz") => Box::new(GzDecoder::new(buf)),
            #[cfg(feature = "bzip2")]
            Some("bz2") => Box::new(bzip2::bufread::BzDecoder::new(buf)),
            _ => Box::new(buf),
        };
        Ok(rdr)
    }
    /// Loads the readings from the data file
    pub fn load(self) -> Result<Readings> {
        log::info!("Loading {:?}...", self.path);
        let now = Instant::now();
        let readings = self.open().and_then(|rdr| self.load_from_reader(rdr))?;
        log::info!(
            "... loaded {} {} readings in {}ms",
            readings.len(),
            readings.metric,
            now.elapsed().as_millis()
        );
        Ok(readings)
    }
    /// Loads the readings from any delimited text source
    pub fn load_from_reader<R: Read>(&self, rdr: R) -> Result<Readings> {
        let mut rdr = csv::ReaderBuilder::new()
            .delimiter(self.delimiter)
            .trim(csv::Trim::All)
            .from_reader(rdr);

        let headers = rdr.headers()?.clone();
        if let Some(column) = COLUMNS
            .into_iter()
            .find(|&column| !headers.iter().any(|h| h == column))
        {
            return Err(ReadingsError::MissingColumn(column));
        }

        let mut data: Vec<(NaiveDateTime, Option<f64>)> = vec![];
        for (k, result) in rdr.deserialize().enumerate() {
            let record: Record = result?;
            if record.metric != self.metric {
                continue;
            }
            let time = parse_timestamp(&record.time).ok_or(ReadingsError::Timestamp {
                row: k + 1,
                text: record.time,
            })?;
            match self.time_range {
                (Some(start), _) if time < start => continue,
                (_, Some(end)) if time > end => continue,
                _ => (),
            }
            data.push((time, record.value));
        }

        if !data.windows(2).all(|w| w[0].0 <= w[1].0) {
            log::warn!("{} readings are not in chronological order, sorting", self.metric);
            data.sort_by_key(|(time, _)| *time);
        }
        let (time, value) = data.into_iter().unzip();
        Ok(Readings {
            metric: self.metric.clone(),
            time,
            value,
        })
    }
}
