//! # Calendar Commands
//!
//! `day`, `month`, `date` and `months`: the current UTC date expressed in the lore calendar.

use crate::application::bus::EventBus;
use crate::application::registry::{Command, CommandRegistry};
use crate::domain::config::AppConfig;
use crate::domain::context::Context;
use crate::interface::commands::reply;
use crate::strings::{self, calendar as lore};
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Datelike, Utc};
use std::sync::Arc;

pub fn register(registry: &Arc<CommandRegistry>, config: &AppConfig) {
    for kind in [Lore::Day, Lore::Month, Lore::Date, Lore::Months] {
        registry.add_command(Arc::new(LoreCommand::new(kind, &config.commands.prefix)));
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lore {
    Day,
    Month,
    Date,
    Months,
}

pub struct LoreCommand {
    kind: Lore,
    description: String,
}

impl LoreCommand {
    pub fn new(kind: Lore, prefix: &str) -> Self {
        let description = match kind {
            Lore::Day => strings::help::day(prefix),
            Lore::Month => strings::help::month(prefix),
            Lore::Date => strings::help::date(prefix),
            Lore::Months => strings::help::months(prefix),
        };
        Self { kind, description }
    }

    fn word(&self) -> &'static str {
        match self.kind {
            Lore::Day => "day",
            Lore::Month => "month",
            Lore::Date => "date",
            Lore::Months => "months",
        }
    }

    pub fn render(&self, now: DateTime<Utc>) -> String {
        match self.kind {
            Lore::Day => strings::messages::lore_day(day(now)),
            Lore::Month => strings::messages::lore_month(month(now)),
            Lore::Date => strings::messages::lore_date(&date(now)),
            Lore::Months => strings::messages::lore_months(&months(now)),
        }
    }
}

#[async_trait]
impl Command for LoreCommand {
    fn name(&self) -> &str {
        match self.kind {
            Lore::Day => "Lore day",
            Lore::Month => "Lore month",
            Lore::Date => "Lore date",
            Lore::Months => "Lore months",
        }
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn icon(&self) -> Option<&str> {
        Some(match self.kind {
            Lore::Day => ":calendar:",
            Lore::Month => ":full_moon:",
            Lore::Date => ":calendar_spiral:",
            Lore::Months => ":last_quarter_moon:",
        })
    }

    fn accept(&self, command: &str) -> bool {
        command == self.word()
    }

    async fn handle(
        &self,
        _args: &[String],
        context: &Context,
        bus: &EventBus,
        _command: &str,
    ) -> Result<()> {
        reply(bus, context, self.render(Utc::now())).await
    }
}

pub fn day(now: DateTime<Utc>) -> &'static str {
    lore::DAYS[now.weekday().num_days_from_sunday() as usize]
}

pub fn month(now: DateTime<Utc>) -> &'static str {
    lore::MONTHS[now.month0() as usize]
}

pub fn year(now: DateTime<Utc>) -> i32 {
    now.year() - lore::YEAR_OFFSET
}

pub fn date(now: DateTime<Utc>) -> String {
    let (argonian, meaning) = lore::ARGONIAN_MONTHS[now.month0() as usize];
    format!(
        "{} the {} of {} ({argonian}, *{meaning}*) 2E {}",
        day(now),
        ordinal(now.day()),
        month(now),
        year(now)
    )
}

/// Numbered month list with the current one highlighted.
pub fn months(now: DateTime<Utc>) -> String {
    let current = now.month0() as usize;
    lore::MONTHS
        .iter()
        .zip(lore::ARGONIAN_MONTHS.iter())
        .enumerate()
        .map(|(i, (name, (argonian, meaning)))| {
            let (fix, mark) = if i == current {
                ("**", lore::YOU_ARE_HERE)
            } else {
                ("", "")
            };
            format!("{}. {fix}{name} ({argonian}, *{meaning}*){fix}{mark}\n", i + 1)
        })
        .collect()
}

pub fn ordinal(n: u32) -> String {
    let suffix = match (n % 10, n % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{n}{suffix}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn monday() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2021, 6, 14, 21, 15, 0).unwrap()
    }

    #[test]
    fn test_day_month_year() {
        assert_eq!(day(monday()), "Morndas");
        assert_eq!(month(monday()), "Midyear");
        assert_eq!(year(monday()), 589);
    }

    #[test]
    fn test_date() {
        assert_eq!(
            date(monday()),
            "Morndas the 14th of Midyear (Hist-Tsoko, *Elder Hist*) 2E 589"
        );
    }

    #[test]
    fn test_months_highlight() {
        let listing = months(monday());
        assert_eq!(listing.lines().count(), 12);
        assert!(listing.contains(
            "6. **Midyear (Hist-Tsoko, *Elder Hist*)** :arrow_left: You are here!\n"
        ));
        assert!(listing.starts_with("1. Morning Star (Vakka, *Sun*)\n"));
    }

    #[test]
    fn test_ordinals() {
        let got: Vec<String> = [1, 2, 3, 4, 11, 12, 13, 21, 22, 23, 31]
            .into_iter()
            .map(ordinal)
            .collect();
        assert_eq!(
            got,
            vec!["1st", "2nd", "3rd", "4th", "11th", "12th", "13th", "21st", "22nd", "23rd", "31st"]
        );
    }

    #[test]
    fn test_render_and_accept() {
        let cmd = LoreCommand::new(Lore::Day, "%");
        assert!(cmd.accept("day"));
        assert!(!cmd.accept("days"));
        assert_eq!(cmd.render(monday()), "It is **Morndas**");
        assert_eq!(cmd.description(), "`%day` Gets the current in-character lore day.");
    }
}
