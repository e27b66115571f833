use crate::infra::{parse_period_input, PeriodInput};
use clap::Args;
use num_format::{Locale, ToFormattedString};
use rent_roll::config::AppConfig;
use rent_roll::domain::{LeaseRecord, RentRoll};
use rent_roll::error::AppError;
use rent_roll::ingest::{ClassificationRules, RentRollImporter};
use rent_roll::metrics::{DeltaSummary, PeriodSnapshot, RiskProfile};
use rent_roll::portfolio::{AnalysisOptions, FundAnalysis, PortfolioAnalysis};
use rent_roll::telemetry;
use serde::Serialize;
use std::fmt::Write as _;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct ReportArgs {
    /// Rent roll extract as LABEL,YYYY-MM-DD,PATH. Repeat once per period.
    #[arg(long = "period", value_parser = parse_period_input, required = true)]
    pub(crate) periods: Vec<PeriodInput>,
}

#[derive(Args, Debug)]
pub(crate) struct ExportArgs {
    /// Rent roll extract as LABEL,YYYY-MM-DD,PATH. Repeat once per period.
    #[arg(long = "period", value_parser = parse_period_input, required = true)]
    pub(crate) periods: Vec<PeriodInput>,
    /// Destination file for the JSON document (defaults to stdout)
    #[arg(long)]
    pub(crate) output: Option<PathBuf>,
    /// Embed the normalized lease records in the document
    #[arg(long)]
    pub(crate) include_records: bool,
}

/// Nested JSON document shared by the export command and the HTTP endpoint.
#[derive(Debug, Serialize)]
pub(crate) struct ReportDocument {
    pub(crate) analysis: PortfolioAnalysis,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) records: Option<Vec<PeriodRecords>>,
}

#[derive(Debug, Serialize)]
pub(crate) struct PeriodRecords {
    pub(crate) period: String,
    pub(crate) records: Vec<LeaseRecord>,
}

impl ReportDocument {
    pub(crate) fn build(rolls: Vec<RentRoll>, include_records: bool) -> Result<Self, AppError> {
        let analysis = PortfolioAnalysis::build(&rolls, &AnalysisOptions::default())?;
        let records = include_records.then(|| {
            rolls
                .into_iter()
                .map(|roll| PeriodRecords {
                    period: roll.period().label.clone(),
                    records: roll.records().to_vec(),
                })
                .collect()
        });
        Ok(Self { analysis, records })
    }
}

pub(crate) fn run_report(args: ReportArgs) -> Result<(), AppError> {
    let rules = load_rules()?;
    let rolls = load_rolls(&args.periods, &rules)?;
    let analysis = PortfolioAnalysis::build(&rolls, &AnalysisOptions::default())?;
    print!("{}", render_report(&analysis));
    Ok(())
}

pub(crate) fn run_export(args: ExportArgs) -> Result<(), AppError> {
    let rules = load_rules()?;
    let rolls = load_rolls(&args.periods, &rules)?;
    let document = ReportDocument::build(rolls, args.include_records)?;
    let json = serde_json::to_string_pretty(&document)?;

    match args.output {
        Some(path) => {
            std::fs::write(&path, json)?;
            eprintln!("wrote {}", path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

// Telemetry writes to stderr; stdout carries the report.
fn load_rules() -> Result<ClassificationRules, AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;
    Ok(config.classification)
}

fn load_rolls(
    inputs: &[PeriodInput],
    rules: &ClassificationRules,
) -> Result<Vec<RentRoll>, AppError> {
    inputs
        .iter()
        .map(|input| {
            RentRollImporter::from_path(&input.path, input.period.clone(), rules)
                .map_err(AppError::from)
        })
        .collect()
}

pub(crate) fn render_report(analysis: &PortfolioAnalysis) -> String {
    let mut out = String::new();
    let labels: Vec<&str> = analysis
        .periods
        .iter()
        .map(|period| period.label.as_str())
        .collect();
    let _ = writeln!(
        out,
        "Rent roll analysis: {} ({} periods)",
        labels.join(" -> "),
        labels.len()
    );

    let _ = writeln!(out, "\n== Portfolio (Fund 2 + Fund 3) ==");
    render_snapshot_table(&mut out, &analysis.portfolio, &[]);

    for fund in &analysis.funds {
        render_fund(&mut out, fund);
    }
    out
}

fn render_fund(out: &mut String, fund: &FundAnalysis) {
    let _ = writeln!(out, "\n== {} ==", fund.label);
    render_snapshot_table(out, &fund.snapshots, &fund.risk);

    if !fund.deltas.is_empty() {
        let _ = writeln!(out, "Changes");
        for delta in &fund.deltas {
            render_delta(out, delta);
        }
    }
    if let Some(trend) = fund.trend.as_ref().filter(|_| fund.deltas.len() > 1) {
        let _ = writeln!(out, "Trend");
        render_delta(out, trend);
    }

    let _ = writeln!(out, "Lease expiration ({})", fund.expiry_detailed.variant);
    for bucket in &fund.expiry_detailed.buckets {
        let _ = writeln!(
            out,
            "  {:<16}{:>4} leases {:>12} SF {:>6.1}% of rent",
            bucket.label,
            bucket.count,
            thousands(bucket.area),
            bucket.rent_share_pct
        );
    }

    if let Some(risk) = fund.latest_risk() {
        let _ = writeln!(
            out,
            "Top tenants (top 5 {:.1}% | top 10 {:.1}% | {} tenants)",
            risk.top5_concentration, risk.top10_concentration, risk.unique_tenants
        );
        for (rank, tenant) in risk.top_tenants.iter().take(5).enumerate() {
            let _ = writeln!(
                out,
                "  {}. {:<28} ${:>12} {:>6.1}%",
                rank + 1,
                tenant.tenant,
                thousands(tenant.annual_rent),
                tenant.share_pct
            );
        }
    }

    if !fund.upcoming_expirations.is_empty() {
        let _ = writeln!(out, "Upcoming expirations");
        for lease in &fund.upcoming_expirations {
            let _ = writeln!(
                out,
                "  {:<28} {:>10} SF {:>5.1} mo  {}",
                lease.tenant.as_deref().unwrap_or("-"),
                thousands(lease.area),
                lease.months_to_expiry,
                lease.property
            );
        }
    }

    let _ = writeln!(
        out,
        "Vacancy: {} spaces | {} SF | {} of {} properties | ${} potential rent",
        fund.vacancy.vacant_spaces,
        thousands(fund.vacancy.vacant_sf),
        fund.vacancy.properties_with_vacancy,
        fund.vacancy.total_properties,
        thousands(fund.vacancy.potential_annual_revenue)
    );
    let _ = writeln!(
        out,
        "Security: {:.1} months of rent covered | {} leases ({:.1}%) without security",
        fund.security.coverage_months,
        fund.security.leases_without_security,
        fund.security.leases_without_security_pct
    );
    if let Some(stats) = &fund.rent_statistics {
        let _ = writeln!(
            out,
            "Rent/SF: mean {:.2} | median {:.2} | p25 {:.2} | p75 {:.2} | range {:.2}-{:.2}",
            stats.mean, stats.median, stats.p25, stats.p75, stats.min, stats.max
        );
    }

    if fund.insights.is_empty() {
        let _ = writeln!(out, "Insights: none");
    } else {
        let _ = writeln!(out, "Insights");
        for insight in &fund.insights {
            let _ = writeln!(
                out,
                "- [{}] {}: {}\n  -> {}",
                insight.severity.label(),
                insight.category.label(),
                insight.message,
                insight.recommendation
            );
        }
    }
}

fn render_snapshot_table(out: &mut String, snapshots: &[PeriodSnapshot], risk: &[RiskProfile]) {
    let _ = writeln!(
        out,
        "{:<10}{:>10}{:>16}{:>8}{:>11}  Risk",
        "Period", "Occupancy", "Revenue", "WALT", "Near-term"
    );
    for (index, snapshot) in snapshots.iter().enumerate() {
        let risk = risk
            .get(index)
            .map(|profile| format!("{} ({})", profile.risk_level.label(), profile.risk_score))
            .unwrap_or_else(|| "-".to_string());
        let _ = writeln!(
            out,
            "{:<10}{:>9.1}%{:>16}{:>8.1}{:>10.1}%  {}",
            snapshot.period,
            snapshot.occupancy_rate,
            format!("${}", thousands(snapshot.annual_revenue)),
            snapshot.walt,
            snapshot.near_term_expiry_pct,
            risk
        );
    }
}

fn render_delta(out: &mut String, delta: &DeltaSummary) {
    let _ = writeln!(
        out,
        "- {} -> {}: occupancy {:+.1}pp | revenue {:+.1}% | WALT {:+.1} mo | +{} / -{} leases | net absorption {} SF",
        delta.from_period,
        delta.to_period,
        delta.occupancy_change,
        delta.revenue_growth_pct,
        delta.walt_change,
        delta.new_leases,
        delta.lost_leases,
        thousands(delta.net_absorption)
    );
}

/// Rounds to a whole number and groups digits, e.g. `-1234567.8` -> `-1,234,568`.
pub(crate) fn thousands(value: f64) -> String {
    (value.round() as i64).to_formatted_string(&Locale::en)
}
