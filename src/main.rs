//! # Tử Vi Chart Application Entry Point
//!
//! Command-line front end over the chart library: parses a birth instant
//! and gender from the arguments, builds the chart, and renders it to the
//! terminal as an ASCII grid or as the JSON snapshot.

// Test modules
#[cfg(test)]
mod tests;

use anyhow::{Context, Result, bail};
use std::env;
use tuvi_chart_lib::chart::build_chart;
use tuvi_chart_lib::config::Config;
use tuvi_chart_lib::palace::Gender;
use tuvi_chart_lib::renderer::draw_ascii;

const USAGE: &str = "usage: tuvi-chart <year> <month> <day> <hour> <minute> <NAM|NU> \
[querent-year] [display-name] [--json]";

struct Args {
    year: i32,
    month: u32,
    day: u32,
    hour: u32,
    minute: u32,
    gender: Gender,
    querent_year: Option<i32>,
    display_name: Option<String>,
    json: bool,
}

fn parse_gender(token: &str) -> Result<Gender> {
    match token.to_uppercase().as_str() {
        "NAM" | "1" => Ok(Gender::Nam),
        "NU" | "NỮ" | "-1" => Ok(Gender::Nu),
        other => bail!("unknown gender {other:?} (expected NAM or NU)"),
    }
}

fn parse_args(raw: &[String]) -> Result<Args> {
    let json = raw.iter().any(|a| a == "--json");
    let positional: Vec<&String> = raw.iter().filter(|a| !a.starts_with("--")).collect();

    if positional.len() < 6 {
        bail!("{USAGE}");
    }

    let year = positional[0].parse().context("invalid year")?;
    let month = positional[1].parse().context("invalid month")?;
    let day = positional[2].parse().context("invalid day")?;
    let hour = positional[3].parse().context("invalid hour")?;
    let minute = positional[4].parse().context("invalid minute")?;
    let gender = parse_gender(positional[5])?;

    let querent_year = match positional.get(6) {
        Some(token) => Some(token.parse().context("invalid querent year")?),
        None => None,
    };
    let display_name = positional.get(7).map(|s| s.to_string());

    Ok(Args {
        year,
        month,
        day,
        hour,
        minute,
        gender,
        querent_year,
        display_name,
        json,
    })
}

fn main() -> Result<()> {
    let raw: Vec<String> = env::args().skip(1).collect();
    let args = parse_args(&raw)?;

    // Config supplies the defaults the command line left out.
    let config = Config::load();
    let querent_year = args.querent_year.unwrap_or(config.chart.querent_year);
    let display_name = args
        .display_name
        .unwrap_or_else(|| config.chart.display_name.clone());

    let chart = build_chart(
        args.year,
        args.month,
        args.day,
        args.hour,
        args.minute,
        0,
        args.gender,
        querent_year,
        &display_name,
    )
    .context("failed to build chart")?;

    if args.json || config.display.json {
        println!("{}", serde_json::to_string_pretty(&chart)?);
    } else {
        draw_ascii(&chart);
    }

    Ok(())
}
