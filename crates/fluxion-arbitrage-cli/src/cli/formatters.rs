// Copyright (c) 2025 SOLARE S.R.O.
//
// This file is part of FluxION.

//! Output formatters for CLI arbitrage results.

use anyhow::{Context, Result};
use comfy_table::{Attribute, Cell, Color, Table, presets::UTF8_FULL};
use fluxion_arbitrage::{
    Aggregation, ArbitrageReport, BestWorstDays, CycleStatistics, DailySpread, HourlyAverage,
    MarketSummary, PeriodAverage,
};
use serde::Serialize;
use std::fs;

/// Formatter for pretty tables
#[derive(Debug)]
pub struct TableFormatter;

/// Formatter for CSV export
#[derive(Debug)]
pub struct CsvFormatter;

/// Formatter for JSON export
#[derive(Debug)]
pub struct JsonFormatter;

/// Everything the `market` command reports
#[derive(Debug, Clone, Serialize)]
pub struct MarketOverview {
    pub summary: Option<MarketSummary>,
    pub daily_spreads: Vec<DailySpread>,
    pub hourly_profile: Vec<HourlyAverage>,
    pub aggregation: Aggregation,
    pub periods: Vec<PeriodAverage>,
}

fn money(value: f64, symbol: &str) -> String {
    if value.is_finite() {
        format!("{value:.2} {symbol}")
    } else {
        "-".to_owned()
    }
}

fn payback(report: &ArbitrageReport) -> String {
    if report.roi.has_payback() {
        format!("{:.1} years", report.roi.payback_years)
    } else {
        "never".to_owned()
    }
}

fn header(names: &[&str]) -> Vec<Cell> {
    names
        .iter()
        .map(|name| Cell::new(name).add_attribute(Attribute::Bold))
        .collect()
}

fn optional_price(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_owned(), |v| format!("{v:.2}"))
}

impl TableFormatter {
    /// Summary of one analysis run
    #[must_use]
    pub fn format_report(report: &ArbitrageReport, source: &str, symbol: &str) -> String {
        let params = &report.params;
        let roi = &report.roi;

        let mut table = Table::new();
        table.load_preset(UTF8_FULL);
        table.set_header(header(&["Metric", "Value"]));

        let mut rows: Vec<(String, String)> = vec![
            ("Analysis".to_owned(), report.analysis_type().to_string()),
            ("Days analyzed".to_owned(), roi.total_days.to_string()),
            ("Total benefit".to_owned(), money(roi.total_benefit, symbol)),
            ("Avg daily benefit".to_owned(), money(roi.avg_daily_benefit, symbol)),
            ("Projected yearly benefit".to_owned(), money(roi.yearly_benefit, symbol)),
            ("Total investment".to_owned(), money(roi.total_investment, symbol)),
            ("ROI".to_owned(), format!("{:.2} %", roi.roi_percentage)),
            ("Payback".to_owned(), payback(report)),
        ];

        match report.cycle_stats {
            CycleStatistics::TwoCycles {
                days_with_two_cycles,
                days_with_one_cycle,
                days_with_no_cycles,
                total_cycles_used,
                avg_cycles_per_day,
            } => {
                rows.push(("Days with 2 cycles".to_owned(), days_with_two_cycles.to_string()));
                rows.push(("Days with 1 cycle".to_owned(), days_with_one_cycle.to_string()));
                rows.push(("Days with no cycle".to_owned(), days_with_no_cycles.to_string()));
                rows.push(("Total cycles".to_owned(), total_cycles_used.to_string()));
                rows.push(("Avg cycles per day".to_owned(), format!("{avg_cycles_per_day:.2}")));
            }
            CycleStatistics::OneCycle {
                feasible_days,
                infeasible_days,
                feasibility_percentage,
            } => {
                rows.push(("Feasible days".to_owned(), feasible_days.to_string()));
                rows.push(("Infeasible days".to_owned(), infeasible_days.to_string()));
                rows.push(("Feasibility".to_owned(), format!("{feasibility_percentage:.1} %")));
            }
        }

        if let Some(BestWorstDays { best, worst }) = report.best_worst {
            rows.push(("Best day".to_owned(), format!("{} ({})", best.date, money(best.benefit, symbol))));
            rows.push(("Worst day".to_owned(), format!("{} ({})", worst.date, money(worst.benefit, symbol))));
        }
        if let Some(BestWorstDays { best, worst }) = report.best_worst_feasible {
            rows.push((
                "Best feasible day (raw)".to_owned(),
                format!("{} ({})", best.date, money(best.benefit, symbol)),
            ));
            rows.push((
                "Worst feasible day (raw)".to_owned(),
                format!("{} ({})", worst.date, money(worst.benefit, symbol)),
            ));
        }
        if let Some(summary) = report.benefit_summary {
            rows.push(("Median daily benefit".to_owned(), money(summary.median, symbol)));
            rows.push(("Daily benefit std dev".to_owned(), money(summary.std_dev, symbol)));
        }

        for (metric, value) in rows {
            table.add_row(vec![Cell::new(metric), Cell::new(value)]);
        }

        let mut output = table.to_string();
        output.push('\n');
        output.push_str(&format!(
            "{source} | Battery: {:.2} MWh | Efficiency: {:.0}% | Degradation: {}% per cycle\n",
            params.battery_capacity_mwh,
            params.efficiency * 100.0,
            params.degradation_per_cycle * 100.0
        ));

        output
    }

    /// One row per analysed day
    #[must_use]
    pub fn format_daily(report: &ArbitrageReport, symbol: &str) -> String {
        let mut table = Table::new();
        table.load_preset(UTF8_FULL);
        table.set_header(header(&[
            "Date",
            "Min\nPrice",
            "Max\nPrice",
            "Charge",
            "Discharge",
            "Cycles",
            "Cumulative\nCycles",
            "Capacity\n(MWh)",
            "Benefit",
            "Degraded\nBenefit",
        ]));

        for day in &report.daily {
            let time = |t: Option<chrono::NaiveDateTime>| {
                t.map_or_else(|| "-".to_owned(), |t| t.format("%H:%M").to_string())
            };
            let benefit_cell = Cell::new(money(day.daily_benefit, symbol));
            let benefit_cell = if day.arbitrage_possible {
                benefit_cell
            } else {
                benefit_cell.fg(Color::DarkGrey)
            };

            table.add_row(vec![
                Cell::new(day.date),
                Cell::new(optional_price(day.min_price)),
                Cell::new(optional_price(day.max_price)),
                Cell::new(time(day.min_time)),
                Cell::new(time(day.max_time)),
                Cell::new(day.cycles_used),
                Cell::new(day.cumulative_cycles),
                Cell::new(format!("{:.4}", day.remaining_capacity)),
                benefit_cell,
                Cell::new(money(day.degraded_benefit, symbol)),
            ]);
        }

        let mut output = table.to_string();
        output.push('\n');
        output
    }

    /// Side-by-side comparison, best yearly benefit highlighted
    #[must_use]
    pub fn format_comparison(reports: &[ArbitrageReport], symbol: &str) -> String {
        let mut table = Table::new();
        table.load_preset(UTF8_FULL);
        table.set_header(header(&[
            "Strategy",
            "Total\nBenefit",
            "Yearly\nBenefit",
            "ROI\n(%)",
            "Payback",
            "Cycles\nUsed",
            "Days with\nArbitrage",
        ]));

        let best = reports
            .iter()
            .filter(|r| !r.is_empty())
            .max_by(|a, b| a.roi.yearly_benefit.total_cmp(&b.roi.yearly_benefit))
            .map(ArbitrageReport::analysis_type);

        for report in reports {
            let label = report.analysis_type().to_string();
            let name_cell = if Some(report.analysis_type()) == best {
                Cell::new(label).fg(Color::Green).add_attribute(Attribute::Bold)
            } else {
                Cell::new(label)
            };
            let cycles: u32 = report.daily.iter().map(|d| d.cycles_used).sum();
            let feasible = report.daily.iter().filter(|d| d.arbitrage_possible).count();

            table.add_row(vec![
                name_cell,
                Cell::new(money(report.roi.total_benefit, symbol)),
                Cell::new(money(report.roi.yearly_benefit, symbol)),
                Cell::new(format!("{:.2}", report.roi.roi_percentage)),
                Cell::new(payback(report)),
                Cell::new(cycles),
                Cell::new(format!("{feasible} / {}", report.daily.len())),
            ]);
        }

        let mut output = table.to_string();
        output.push('\n');
        output
    }

    /// Market summary, average day and period averages
    #[must_use]
    pub fn format_market(overview: &MarketOverview, symbol: &str) -> String {
        let mut output = String::new();

        let Some(summary) = overview.summary else {
            output.push_str("No prices in the selected range\n");
            return output;
        };

        let mut table = Table::new();
        table.load_preset(UTF8_FULL);
        table.set_header(header(&["Metric", "Value"]));
        for (metric, value) in [
            ("Average price", summary.average_price),
            ("Max price", summary.max_price),
            ("Min price", summary.min_price),
            ("Avg daily spread", summary.average_daily_spread),
            ("Price volatility (std dev)", summary.price_volatility),
        ] {
            table.add_row(vec![Cell::new(metric), Cell::new(money(value, symbol))]);
        }
        output.push_str(&table.to_string());
        output.push('\n');

        let mut profile = Table::new();
        profile.load_preset(UTF8_FULL);
        profile.set_header(header(&["Hour", "Average Price"]));
        for hour in &overview.hourly_profile {
            profile.add_row(vec![
                Cell::new(format!("{:02}:00", hour.hour)),
                Cell::new(money(hour.average_price, symbol)),
            ]);
        }
        output.push_str(&profile.to_string());
        output.push('\n');

        let mut periods = Table::new();
        periods.load_preset(UTF8_FULL);
        let period_title = format!("Period ({})", overview.aggregation);
        periods.set_header(header(&[period_title.as_str(), "Average Price"]));
        for period in &overview.periods {
            periods.add_row(vec![
                Cell::new(&period.period),
                Cell::new(money(period.average_price, symbol)),
            ]);
        }
        output.push_str(&periods.to_string());
        output.push('\n');

        output
    }
}

#[derive(Debug, Serialize)]
struct DailyCsvRow<'a> {
    analysis_type: &'a str,
    date: String,
    min_price: Option<f64>,
    max_price: Option<f64>,
    min_time: Option<String>,
    max_time: Option<String>,
    arbitrage_possible: bool,
    daily_benefit: f64,
    cycles_used: u32,
    cumulative_cycles: u32,
    remaining_capacity: f64,
    degraded_benefit: f64,
}

impl CsvFormatter {
    /// Export the daily outcomes of one or more reports to a CSV file
    pub fn write_daily(reports: &[ArbitrageReport], path: &str) -> Result<()> {
        let mut writer = csv::Writer::from_path(path)
            .with_context(|| format!("Failed to create CSV file: {path}"))?;

        for report in reports {
            let analysis_type = report.analysis_type().label();
            for day in &report.daily {
                writer.serialize(DailyCsvRow {
                    analysis_type,
                    date: day.date.to_string(),
                    min_price: day.min_price,
                    max_price: day.max_price,
                    min_time: day.min_time.map(|t| t.to_string()),
                    max_time: day.max_time.map(|t| t.to_string()),
                    arbitrage_possible: day.arbitrage_possible,
                    daily_benefit: day.daily_benefit,
                    cycles_used: day.cycles_used,
                    cumulative_cycles: day.cumulative_cycles,
                    remaining_capacity: day.remaining_capacity,
                    degraded_benefit: day.degraded_benefit,
                })?;
            }
        }

        writer.flush()?;
        Ok(())
    }

    /// Export period averages to a CSV file
    pub fn write_periods(periods: &[PeriodAverage], path: &str) -> Result<()> {
        let mut writer = csv::Writer::from_path(path)
            .with_context(|| format!("Failed to create CSV file: {path}"))?;

        for period in periods {
            writer.serialize(period)?;
        }

        writer.flush()?;
        Ok(())
    }
}

impl JsonFormatter {
    /// Write any result as pretty JSON
    pub fn write<T: Serialize + ?Sized>(value: &T, path: &str) -> Result<()> {
        let json = serde_json::to_string_pretty(value)?;
        fs::write(path, json).with_context(|| format!("Failed to write JSON file: {path}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fluxion_arbitrage::{
        AnalysisType, ArbitrageParams, PriceSeries, calculate_arbitrage_benefits, compare_strategies,
    };
    use tempfile::tempdir;

    use crate::price_scenarios::PriceScenario;

    fn series() -> PriceSeries {
        let start = chrono::NaiveDate::from_ymd_opt(2024, 4, 1).unwrap();
        PriceScenario::UsualDay.generate_series(start, 3).unwrap()
    }

    #[test]
    fn test_report_table_lists_metrics() {
        let params = ArbitrageParams::default().with_analysis_type(AnalysisType::TwoCycles);
        let report = calculate_arbitrage_benefits(&series(), &params);

        let output = TableFormatter::format_report(&report, "Scenario: Usual Day", "€");

        assert!(output.contains("2 Cycles"));
        assert!(output.contains("Days with 2 cycles"));
        assert!(output.contains("Projected yearly benefit"));
        assert!(output.contains("Scenario: Usual Day"));
    }

    #[test]
    fn test_empty_report_renders() {
        let report = calculate_arbitrage_benefits(&PriceSeries::empty(), &ArbitrageParams::default());
        let output = TableFormatter::format_report(&report, "CSV: empty.csv", "€");
        assert!(output.contains("never"));
        assert!(!output.contains("Best day"));
    }

    #[test]
    fn test_comparison_has_both_strategies() {
        let reports = compare_strategies(&series(), &ArbitrageParams::default());
        let output = TableFormatter::format_comparison(&reports, "€");
        assert!(output.contains("1 Cycle"));
        assert!(output.contains("2 Cycles"));
    }

    #[test]
    fn test_csv_export_writes_one_row_per_day() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("daily.csv");
        let path = path.to_str().unwrap();
        let reports = compare_strategies(&series(), &ArbitrageParams::default());

        CsvFormatter::write_daily(&reports, path).unwrap();

        let content = std::fs::read_to_string(path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 1 + 6);
        assert!(lines[0].starts_with("analysis_type,date,"));
        assert!(lines[1].starts_with("1 Cycle,2024-04-01,"));
    }

    #[test]
    fn test_json_export_round_trips_report() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("report.json");
        let path = path.to_str().unwrap();
        let report = calculate_arbitrage_benefits(&series(), &ArbitrageParams::default());

        JsonFormatter::write(&report, path).unwrap();

        let parsed: ArbitrageReport =
            serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(parsed.daily.len(), report.daily.len());
        assert_eq!(parsed.params.analysis_type, AnalysisType::OneCycle);
    }
}
