use clap::{Parser, Subcommand, ValueEnum};
use macroscope_client::{MacroIndicator, Region, Summary, MACRO_COUNTRIES};
use macroscope_series::NormalizationMode;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Sets the level of tracing
    #[arg(long, default_value = "info", global = true)]
    pub trace: TraceLevel,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Search tickers, polling until the backend has enough to show.
    Search {
        query: String,

        #[arg(long, default_value_t = 10)]
        limit: usize,

        /// One request, no polling.
        #[arg(long)]
        once: bool,
    },

    /// Chart the major US indices.
    Markets {
        /// Trailing window, in months.
        #[arg(long, default_value_t = 6)]
        months: u32,

        #[arg(long, value_enum, default_value = "normalised")]
        mode: Mode,

        #[arg(long, default_value_t = 800.0)]
        width: f64,
    },

    /// Chart one macroeconomic indicator for a country.
    Macro {
        #[arg(long, default_value = "United States", value_parser = MACRO_COUNTRIES)]
        country: String,

        #[arg(long, default_value = "inflation", value_parser = parse_indicator)]
        indicator: MacroIndicator,

        #[arg(long, value_enum, default_value = "raw")]
        mode: Mode,

        #[arg(long, default_value_t = 800.0)]
        width: f64,
    },

    /// Chart one region's government bond yields.
    Bonds {
        #[arg(long, default_value = "us", value_parser = parse_region)]
        region: Region,

        /// Trailing window, in months.
        #[arg(long, default_value_t = 6)]
        months: u32,

        #[arg(long, value_enum, default_value = "normalised")]
        mode: Mode,

        /// Chart width in pixels; drives tick density.
        #[arg(long, default_value_t = 800.0)]
        width: f64,
    },

    /// Chart commodity histories side by side.
    Commodities {
        /// Commodities to include; all of them when empty.
        names: Vec<String>,

        #[arg(long, value_enum, default_value = "normalised")]
        mode: Mode,

        #[arg(long, default_value_t = 800.0)]
        width: f64,
    },

    /// Print one dashboard section as JSON.
    Show { section: Section },

    /// Print the backend's detail for one ticker.
    Ticker { symbol: String },

    /// Print quotes for `symbols`, or the backend's default list.
    Stocks { symbols: Vec<String> },

    /// Ask the backend to refresh its data.
    Update,

    /// Check the backend is up.
    Health,
}

#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
pub enum Section {
    Overview,
    Dashboard,
    Sentiment,
    Breadth,
    All,
}

impl From<Section> for Summary {
    fn from(section: Section) -> Self {
        match section {
            Section::Overview => Summary::Overview,
            Section::Dashboard => Summary::Dashboard,
            Section::Sentiment => Summary::Sentiment,
            Section::Breadth => Summary::Breadth,
            Section::All => Summary::All,
        }
    }
}

#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
pub enum Mode {
    Raw,
    Normalised,
}

impl From<Mode> for NormalizationMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Raw => NormalizationMode::Raw,
            Mode::Normalised => NormalizationMode::Normalised,
        }
    }
}

#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
pub enum TraceLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

fn parse_region(s: &str) -> Result<Region, String> {
    s.parse()
}

fn parse_indicator(s: &str) -> Result<MacroIndicator, String> {
    s.parse()
}
