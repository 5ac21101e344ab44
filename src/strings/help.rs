//! # Help Text
//!
//! Framing for the help listing. The per-command entries come from the registry.

pub const TITLE: &str = "Bot help";
pub const URL: &str = "https://github.com/iyoro/yobot#readme";
pub const DESCRIPTION: &str =
    "Hi! These are the commands I understand. Click on the link above for complete documentation.";
pub const FOOTER: &str = "Made for you with <3";
/// Shown for commands without their own icon.
pub const DEFAULT_ICON: &str = ":exclamation:";

pub fn help(prefix: &str) -> String {
    format!("`{prefix}help` You are here.")
}

pub fn roll(prefix: &str) -> String {
    format!(
        concat!(
            "`{p}roll 4d6+2` Roll dice with expressions made of dice and fixed values. ",
            "Standard dice expressions like `d20` and `4d8` are supported. Fudge/Fate dice are supported ",
            "with `dF`. You can use `d%` to mean `d100` (both work). ",
            "Add a comment after `#`: `{p}roll d20+3 # attack the boss`."
        ),
        p = prefix
    )
}

pub fn reroll(prefix: &str) -> String {
    format!(
        "`{prefix}{prefix}` Repeat your last {prefix}roll. Maybe the next one will be better... \
         Add `# new comment` to change the comment."
    )
}

pub fn rps(prefix: &str) -> String {
    format!(
        concat!(
            "`{p}rps` Randomly picks one of three values from the well-known three-way tie-breaker game. ",
            "Alternatively, use `{p}spc` to get soulgem, parchment, clippers."
        ),
        p = prefix
    )
}

pub fn timestamp(prefix: &str) -> String {
    format!("`{prefix}timestamp 2021-06-14 23:15 +02:00` Creates copy-pastable timestamp codes")
}

pub fn day(prefix: &str) -> String {
    format!("`{prefix}day` Gets the current in-character lore day.")
}

pub fn month(prefix: &str) -> String {
    format!("`{prefix}month` Gets the current in-character month.")
}

pub fn date(prefix: &str) -> String {
    format!("`{prefix}date` Gets the current in-character lore date.")
}

pub fn months(prefix: &str) -> String {
    format!("`{prefix}months` Gets a list of lore months with the current in-character month highlighted.")
}
