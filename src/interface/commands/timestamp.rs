//! # Timestamp Command
//!
//! Turns `YYYY-MM-DD hh:mm ±hh:mm` into copy-pastable `<t:N>` codes.

use crate::application::bus::EventBus;
use crate::application::registry::{Command, CommandRegistry};
use crate::domain::config::AppConfig;
use crate::domain::content::{Embed, EmbedField};
use crate::domain::context::Context;
use crate::interface::commands::reply;
use crate::strings::{self, messages};
use anyhow::{Context as _, Result, anyhow, bail};
use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, SecondsFormat, Utc};
use regex::Regex;
use std::sync::{Arc, LazyLock};

static DATE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{1,4}-[01]?\d-[0-3]?\d$").expect("valid date pattern"));
static TIME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[012]?\d:[0-5][0-9]$").expect("valid time pattern"));
static TZ_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+-](\d|[01]\d|2[0-3])?(:[0-5]\d)?$").expect("valid offset pattern")
});

pub fn register(registry: &Arc<CommandRegistry>, config: &AppConfig) {
    registry.add_command(Arc::new(TimestampCommand::new(&config.commands.prefix)));
}

/// Parse exactly three tokens (date, time, offset) into epoch seconds.
pub fn parse_time(args: &[String]) -> Result<i64> {
    let [date, time, offset] = args else {
        bail!("Args missing or in wrong format: {}", args.join(" "));
    };
    if !DATE_PATTERN.is_match(date) || !TIME_PATTERN.is_match(time) || !TZ_PATTERN.is_match(offset) {
        bail!("Unsupported date format, expected YYYY-MM-DD hh:mm +hh:mm");
    }

    let date = parse_date(date)?;
    let time = parse_clock(time)?;
    let offset = parse_offset(offset)?;
    let local = date
        .and_time(time)
        .and_local_timezone(offset)
        .single()
        .ok_or_else(|| anyhow!("ambiguous local time"))?;
    Ok(local.timestamp())
}

/// Years of one or two digits are read as 1950..=2049.
fn parse_date(text: &str) -> Result<NaiveDate> {
    let mut parts = text.split('-');
    let mut next = |what: &str| -> Result<u32> {
        parts
            .next()
            .ok_or_else(|| anyhow!("missing {what}"))?
            .parse::<u32>()
            .with_context(|| format!("bad {what} in {text}"))
    };
    let (year, month, day) = (next("year")?, next("month")?, next("day")?);
    let year = match (text.find('-'), year) {
        (Some(1..=2), 0..=49) => 2000 + year,
        (Some(1..=2), _) => 1900 + year,
        _ => year,
    };
    NaiveDate::from_ymd_opt(year as i32, month, day)
        .ok_or_else(|| anyhow!("no such date: {text}"))
}

fn parse_clock(text: &str) -> Result<NaiveTime> {
    let (hour, minute) = text
        .split_once(':')
        .ok_or_else(|| anyhow!("bad time: {text}"))?;
    NaiveTime::from_hms_opt(hour.parse()?, minute.parse()?, 0)
        .ok_or_else(|| anyhow!("no such time: {text}"))
}

/// `+`, `-2`, `+02:00` and `-:30` are all accepted. A bare sign is UTC.
fn parse_offset(text: &str) -> Result<FixedOffset> {
    let (sign, rest) = text.split_at(1);
    let (hours, minutes) = rest.split_once(':').unwrap_or((rest, ""));
    let hours: i32 = if hours.is_empty() { 0 } else { hours.parse()? };
    let minutes: i32 = if minutes.is_empty() { 0 } else { minutes.parse()? };
    let seconds = (hours * 3600 + minutes * 60) * if sign == "-" { -1 } else { 1 };
    FixedOffset::east_opt(seconds).ok_or_else(|| anyhow!("offset out of range: {text}"))
}

fn build_embed(timestamp: i64) -> Result<Embed> {
    let utc = DateTime::<Utc>::from_timestamp(timestamp, 0)
        .ok_or_else(|| anyhow!("timestamp out of range: {timestamp}"))?;
    Ok(Embed {
        title: Some("Timestamp".to_string()),
        fields: vec![
            EmbedField::new("Interpretation", utc.to_rfc3339_opts(SecondsFormat::Secs, true)),
            EmbedField::new("Fixed date", format!("`<t:{timestamp}>` <t:{timestamp}>")),
            EmbedField::new("Relative date", format!("`<t:{timestamp}:R>` <t:{timestamp}:R>")),
        ],
        ..Default::default()
    })
}

pub struct TimestampCommand {
    description: String,
}

impl TimestampCommand {
    pub fn new(prefix: &str) -> Self {
        Self {
            description: strings::help::timestamp(prefix),
        }
    }
}

#[async_trait]
impl Command for TimestampCommand {
    fn name(&self) -> &str {
        "Timestamp"
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn icon(&self) -> Option<&str> {
        Some(":clock130:")
    }

    fn accept(&self, command: &str) -> bool {
        command == "timestamp"
    }

    async fn handle(
        &self,
        args: &[String],
        context: &Context,
        bus: &EventBus,
        _command: &str,
    ) -> Result<()> {
        tracing::debug!(command = "timestamp");
        match parse_time(args).and_then(build_embed) {
            Ok(embed) => reply(bus, context, embed).await,
            Err(err) => {
                tracing::error!(error = %err, "Error processing timestamp command");
                reply(bus, context, messages::TIMESTAMP_SHRUG).await
            }
        }
    }
}
