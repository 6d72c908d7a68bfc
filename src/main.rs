//! Gestational calendar CLI application.
//!
//! # Usage
//! ```ignore
//! gestcal 2025-03-01                 // LMP and gestational age for an EDD
//! gestcal -m anc 2024-06-10          // Next ANC visit for an LMP
//! gestcal -m pnc 2024-10-01          // Next PNC visit for a delivery date
//! gestcal -m convert -c ethiopian 2017-03-05
//! ```

use gestcal::Result;
use gestcal::args::{Args, get_reference_date};
use gestcal::calendar::{next_visit, summarize_edd, summarize_lmp};
use gestcal::formatter::{print_appointment_report, print_conversion_report, print_edd_report};
use gestcal::types::{CalendarDate, Mode, ReportContext, ScheduleKind};
use tracing::debug;
use tracing_subscriber::EnvFilter;

fn main() {
    init_logging();
    let args = Args::parse();

    if let Err(e) = run(&args) {
        eprintln!("gestcal: {}", e);
        std::process::exit(1);
    }
}

fn init_logging() {
    let filter =
        EnvFilter::try_from_env("GESTCAL_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(args: &Args) -> Result<()> {
    let ctx = ReportContext::new(args)?;
    let reference = get_reference_date(args)?;
    debug!(?reference, today = ?ctx.today, mode = ?args.mode, "computing report");

    match args.mode {
        Mode::Edd => print_edd_report(&ctx, &summarize_edd(&reference, &ctx.today)?),
        Mode::Lmp => print_edd_report(&ctx, &summarize_lmp(&reference, &ctx.today)?),
        Mode::Anc => print_next_visit(&ctx, &reference, ScheduleKind::Antenatal)?,
        Mode::Pnc => print_next_visit(&ctx, &reference, ScheduleKind::Postnatal)?,
        Mode::Convert => print_conversion_report(&ctx, &reference.pair()),
    }

    Ok(())
}

fn print_next_visit(
    ctx: &ReportContext,
    reference: &CalendarDate,
    kind: ScheduleKind,
) -> Result<()> {
    let result = next_visit(reference, &ctx.today, &kind.schedule())?;
    print_appointment_report(ctx, kind, &result);
    Ok(())
}
