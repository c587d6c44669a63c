//! Government bond catalogue: which yields exist and how regions group them.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Tenor {
    #[serde(rename = "2y")]
    TwoYear,
    #[serde(rename = "5y")]
    FiveYear,
    #[serde(rename = "10y")]
    TenYear,
}

impl Tenor {
    pub const ALL: [Tenor; 3] = [Tenor::TwoYear, Tenor::FiveYear, Tenor::TenYear];

    pub fn label(self) -> &'static str {
        match self {
            Tenor::TwoYear => "2Y",
            Tenor::FiveYear => "5Y",
            Tenor::TenYear => "10Y",
        }
    }

    /// Line colour for this tenor on a region chart.
    pub fn color(self) -> &'static str {
        match self {
            Tenor::TwoYear => "#1976d2",
            Tenor::FiveYear => "#43a047",
            Tenor::TenYear => "#ba68c8",
        }
    }
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum Region {
    #[default]
    Us,
    Germany,
    Uk,
    France,
}

impl Region {
    pub const ALL: [Region; 4] = [Region::Us, Region::Germany, Region::Uk, Region::France];

    pub fn key(self) -> &'static str {
        match self {
            Region::Us => "us",
            Region::Germany => "germany",
            Region::Uk => "uk",
            Region::France => "france",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Region::Us => "United States",
            Region::Germany => "Germany",
            Region::Uk => "United Kingdom",
            Region::France => "France",
        }
    }

    fn prefix(self) -> &'static str {
        match self {
            Region::Us => "US",
            Region::Germany => "DE",
            Region::Uk => "GB",
            Region::France => "FR",
        }
    }

    fn instrument(self) -> &'static str {
        match self {
            Region::Us => "Treasury",
            Region::Germany => "Bund",
            Region::Uk => "Gilt",
            Region::France => "OAT",
        }
    }

    fn short_name(self) -> &'static str {
        match self {
            Region::Us => "US",
            Region::Germany => "Germany",
            Region::Uk => "UK",
            Region::France => "France",
        }
    }

    /// The region's bonds, shortest tenor first.
    pub fn bonds(self) -> Vec<Bond> {
        Tenor::ALL.iter().map(|&tenor| Bond { region: self, tenor }).collect()
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Region {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Region::ALL
            .into_iter()
            .find(|r| r.key().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown bond region {s:?}"))
    }
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Bond {
    pub region: Region,
    pub tenor: Tenor,
}

impl Bond {
    /// Symbol for `/bond_history/<symbol>`, e.g. `DE10Y`.
    pub fn symbol(&self) -> String {
        format!("{}{}", self.region.prefix(), self.tenor.label())
    }

    /// e.g. "Germany 10Y Bund".
    pub fn name(&self) -> String {
        format!(
            "{} {} {}",
            self.region.short_name(),
            self.tenor.label(),
            self.region.instrument()
        )
    }

    /// Name used for this bond's line on its region chart, e.g.
    /// "United Kingdom 5Y".
    pub fn series_name(&self) -> String {
        format!("{} {}", self.region.label(), self.tenor.label())
    }

    pub fn color(&self) -> &'static str {
        self.tenor.color()
    }
}

/// Every bond the backend serves, region by region.
pub fn catalogue() -> Vec<Bond> {
    Region::ALL.into_iter().flat_map(Region::bonds).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalogue_symbols() {
        let symbols: Vec<_> = catalogue().iter().map(Bond::symbol).collect();
        assert_eq!(symbols.len(), 12);
        assert_eq!(&symbols[..3], ["US2Y", "US5Y", "US10Y"]);
        assert!(symbols.contains(&"GB5Y".to_string()));
        assert_eq!(symbols.last().map(String::as_str), Some("FR10Y"));
    }

    #[test]
    fn names_and_colors() {
        let bund = Bond {
            region: Region::Germany,
            tenor: Tenor::TenYear,
        };
        assert_eq!(bund.name(), "Germany 10Y Bund");
        assert_eq!(bund.series_name(), "Germany 10Y");
        assert_eq!(bund.color(), "#ba68c8");

        let colors: Vec<_> = Region::Uk.bonds().iter().map(Bond::color).collect();
        assert_eq!(colors, ["#1976d2", "#43a047", "#ba68c8"]);
    }

    #[test]
    fn region_lookup() {
        assert_eq!("germany".parse::<Region>(), Ok(Region::Germany));
        assert_eq!(" UK ".parse::<Region>(), Ok(Region::Uk));
        assert!("japan".parse::<Region>().is_err());
        assert_eq!(Region::default().to_string(), "us");
    }
}
