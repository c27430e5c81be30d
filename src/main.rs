use chrono::NaiveDateTime;
use power_cycles::{parse_timestamp, Analysis, AnalysisConfig, ReadingsLoader};
use std::path::PathBuf;
use structopt::StructOpt;

fn parse_time(text: &str) -> Result<NaiveDateTime, String> {
    parse_timestamp(text).ok_or_else(|| format!("invalid timestamp: {text:?}"))
}

#[derive(Debug, StructOpt)]
#[structopt(
    name = "power-cycles",
    about = "Production cycles & shifts analysis of power consumption readings"
)]
struct Opt {
    /// Path to the readings file (.csv, .csv.gz)
    #[structopt(long, parse(from_os_str))]
    path: Option<PathBuf>,
    /// Metric to analyze
    #[structopt(short, long, default_value = "Power_consumption")]
    metric: String,
    /// Power level above which the equipment is running
    #[structopt(short, long, default_value = "1.0")]
    threshold: f64,
    /// Readings file field delimiter
    #[structopt(short, long, default_value = ";")]
    delimiter: char,
    /// Readings start time
    #[structopt(short, long, parse(try_from_str = parse_time))]
    start: Option<NaiveDateTime>,
    /// Readings end time
    #[structopt(short, long, parse(try_from_str = parse_time))]
    end: Option<NaiveDateTime>,
    /// Cycles chart SVG file [default: cycles.svg]
    #[structopt(short, long, parse(from_os_str))]
    plot: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let opt = Opt::from_args();
    log::debug!("{:?}", opt);

    let delimiter = u8::try_from(opt.delimiter)
        .map_err(|_| anyhow::anyhow!("the delimiter must be an ASCII character"))?;
    let mut loader = ReadingsLoader::default()
        .metric(opt.metric)
        .delimiter(delimiter);
    if let Some(arg) = opt.path {
        loader = loader.data_path(arg);
    }
    if let Some(arg) = opt.start {
        loader = loader.start_time(arg);
    }
    if let Some(arg) = opt.end {
        loader = loader.end_time(arg);
    }
    let readings = loader.load()?;

    let analysis = Analysis::new(readings, AnalysisConfig::default().threshold(opt.threshold));
    println!("Cycle durations and pauses:");
    println!("{}", analysis.cycles);
    analysis.report().summary();

    #[cfg(feature = "polars")]
    {
        println!("{}", analysis.cycles.to_dataframe()?);
        println!("{}", analysis.report().to_dataframe()?);
    }

    #[cfg(feature = "plot")]
    analysis.plot(opt.plot.unwrap_or_else(|| PathBuf::from("cycles.svg")))?;
    #[cfg(not(feature = "plot"))]
    if opt.plot.is_some() {
        log::warn!("built without the `plot` feature, no chart written");
    }

    Ok(())
}
