//! CLI window onto the chronal engine.
//!
//! Query zone offsets and transitions, decompose instants into calendar
//! fields, and apply calendar-aware shifts from the command line. Input
//! instants are RFC 3339; zones are `UTC`, fixed offsets (`+05:30`) or IANA
//! names tabulated on demand.

use anyhow::{Context, Result};
use chrono::DateTime;
use clap::{Parser, Subcommand};

use chronal::{provider, CalendarKind, Chronology, DateTimeFieldType, Instant, TimeZone};

/// Year range tabulated for IANA zones.
const TABLE_START_YEAR: i32 = 1900;
const TABLE_END_YEAR: i32 = 2100;

#[derive(Parser)]
#[command(name = "chronal", version, about = "Zone offsets, calendar fields and shifts")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show the offsets in force at an instant.
    Offset {
        /// Zone name: UTC, a fixed offset, or an IANA name.
        #[arg(long)]
        zone: String,
        /// RFC 3339 instant (e.g. 2026-03-15T14:00:00Z).
        #[arg(long)]
        at: String,
    },
    /// List a zone's transitions over a year range.
    Transitions {
        #[arg(long)]
        zone: String,
        /// First year to cover (inclusive).
        #[arg(long)]
        from: i32,
        /// Last year to cover (exclusive).
        #[arg(long)]
        to: i32,
    },
    /// Decompose an instant into every calendar field.
    Fields {
        #[arg(long)]
        at: String,
        #[arg(long, default_value = "UTC")]
        zone: String,
        /// Calendar system: iso, buddhist or coptic.
        #[arg(long, default_value = "iso")]
        calendar: String,
    },
    /// Apply a calendar-aware shift to one field of an instant.
    Shift {
        #[arg(long)]
        at: String,
        /// Field to shift (e.g. monthOfYear, dayOfMonth, hourOfDay).
        #[arg(long)]
        field: String,
        /// Signed number of units.
        #[arg(long)]
        amount: i64,
        #[arg(long, default_value = "UTC")]
        zone: String,
        #[arg(long, default_value = "iso")]
        calendar: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Command::Offset { zone, at } => offset(&zone, &at),
        Command::Transitions { zone, from, to } => transitions(&zone, from, to),
        Command::Fields { at, zone, calendar } => fields(&at, &zone, &calendar),
        Command::Shift {
            at,
            field,
            amount,
            zone,
            calendar,
        } => shift(&at, &field, amount, &zone, &calendar),
    }
}

fn offset(zone_name: &str, at: &str) -> Result<()> {
    let zone = resolve_zone(zone_name)?;
    let instant = parse_instant(at)?;
    println!("zone:     {zone}");
    println!("at:       {instant}");
    println!("fixed:    {}", zone.is_fixed());
    println!("offset:   {}", format_offset(zone.offset(instant)));
    println!("standard: {}", format_offset(zone.standard_offset(instant)));
    println!("name:     {}", zone.name_key(instant));
    let next = zone.next_transition(instant);
    if next != instant {
        println!("next transition: {next}");
    } else {
        println!("next transition: none");
    }
    Ok(())
}

fn transitions(zone_name: &str, from: i32, to: i32) -> Result<()> {
    let zone = match zone_name.parse::<chrono_tz::Tz>() {
        Ok(tz) => provider::zone_from_tz(tz, from, to)
            .with_context(|| format!("cannot tabulate '{zone_name}' over [{from}, {to})"))?,
        Err(_) => resolve_zone(zone_name)?,
    };
    if zone.is_fixed() {
        println!("{zone} is fixed at {}", format_offset(zone.offset(Instant::EPOCH)));
        return Ok(());
    }
    let start = Chronology::iso_utc()
        .datetime(from, 1, 1, 0, 0, 0, 0)
        .context("year range start out of bounds")?;
    let mut at = start;
    loop {
        let next = zone.next_transition(at);
        if next == at {
            break;
        }
        println!(
            "{next}  {} ({})",
            format_offset(zone.offset(next)),
            zone.name_key(next)
        );
        at = next;
    }
    Ok(())
}

fn fields(at: &str, zone_name: &str, calendar: &str) -> Result<()> {
    let chronology = resolve_chronology(zone_name, calendar)?;
    let instant = parse_instant(at)?;
    println!("instant:    {instant}");
    println!("chronology: {chronology}");
    for field_type in DateTimeFieldType::all() {
        let field = chronology.field(field_type);
        println!("{:<16} {}", field_type.to_string(), field.get(instant));
    }
    Ok(())
}

fn shift(at: &str, field_name: &str, amount: i64, zone_name: &str, calendar: &str) -> Result<()> {
    let chronology = resolve_chronology(zone_name, calendar)?;
    let instant = parse_instant(at)?;
    let field_type: DateTimeFieldType = field_name
        .parse()
        .with_context(|| format!("unknown field '{field_name}'"))?;
    let field = chronology.field(field_type);
    let shifted = field
        .add(instant, amount)
        .with_context(|| format!("cannot add {amount} to {field_name}"))?;
    println!("before: {instant}  ({field_name}={})", field.get(instant));
    println!("after:  {shifted}  ({field_name}={})", field.get(shifted));
    Ok(())
}

// ── Helpers ─────────────────────────────────────────────────────────────────

fn resolve_zone(name: &str) -> Result<TimeZone> {
    provider::zone(name, TABLE_START_YEAR, TABLE_END_YEAR)
        .with_context(|| format!("cannot resolve zone '{name}'"))
}

fn resolve_chronology(zone_name: &str, calendar: &str) -> Result<Chronology> {
    let kind: CalendarKind = calendar
        .parse()
        .with_context(|| format!("unknown calendar '{calendar}'"))?;
    Ok(Chronology::get(kind, resolve_zone(zone_name)?))
}

fn parse_instant(s: &str) -> Result<Instant> {
    let parsed = DateTime::parse_from_rfc3339(s)
        .with_context(|| format!("'{s}' is not an RFC 3339 instant"))?;
    Ok(Instant::from_millis(parsed.timestamp_millis()))
}

fn format_offset(offset_millis: i32) -> String {
    let sign = if offset_millis < 0 { '-' } else { '+' };
    let total_minutes = offset_millis.unsigned_abs() / 60_000;
    format!("{sign}{:02}:{:02}", total_minutes / 60, total_minutes % 60)
}
