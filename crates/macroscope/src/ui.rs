use colored::{ColoredString, Colorize};
use indicatif::{ProgressBar, ProgressStyle};
use macroscope_client::SearchResult;
use std::time::Duration;

pub fn spinner(msg: impl Into<String>) -> anyhow::Result<ProgressBar> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("[{elapsed_precise}] {spinner:.cyan} {msg}")?);
    pb.set_message(msg.into());
    pb.enable_steady_tick(Duration::from_millis(80));
    Ok(pb)
}

/// Green up, red down, dimmed when unknown.
pub fn change(percent: Option<f64>) -> ColoredString {
    match percent {
        Some(p) if p > 0.0 => format!("{p:+.2}%").green(),
        Some(p) if p < 0.0 => format!("{p:+.2}%").red(),
        Some(p) => format!("{p:.2}%").normal(),
        None => "n/a".dimmed(),
    }
}

/// One line per search hit.
pub fn result_line(result: &SearchResult) -> String {
    let price = result
        .price
        .map(|p| format!("{p:.2}"))
        .unwrap_or_else(|| "-".to_string());
    format!(
        "{:<10} {:<8} {:<40} {:>10} {:>9}",
        result.symbol.bold(),
        result.exchange.as_deref().unwrap_or(""),
        result.name.as_deref().unwrap_or(""),
        price,
        change(result.change_percent),
    )
}
