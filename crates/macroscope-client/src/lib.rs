pub mod api;
pub mod bonds;
pub mod charts;
pub mod config;
pub mod error;
pub mod schema;
pub mod search;

pub use api::{ApiClient, Summary};
pub use bonds::{catalogue, Bond, Region, Tenor};
pub use charts::{
    bond_frame, commodity_frame, macro_frame, market_frame, MacroIndicator, MACRO_COUNTRIES,
    US_INDICES,
};
pub use config::{ClientConfig, SearchConfig};
pub use error::{ClientError, Result, SEARCH_FAILED_MESSAGE};
pub use schema::{
    bond_series, history_series, yearly_series, BondPoint, SearchBatch, SearchResult,
};
pub use search::{
    merge, run_search, CancellationToken, SearchBackend, SearchOutcome, SearchSession,
    SearchSnapshot, SearchState, SearchStop, StockSearch,
};
