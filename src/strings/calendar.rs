//! # Lore Calendar Tables

/// Lore years are counted from this offset of the real year.
pub const YEAR_OFFSET: i32 = 1432;

pub const MONTHS: [&str; 12] = [
    "Morning Star",
    "Sun's Dawn",
    "First Seed",
    "Rain's Hand",
    "Second Seed",
    "Midyear",
    "Sun's Height",
    "Last Seed",
    "Hearthfire",
    "Frostfall",
    "Sun's Dusk",
    "Evening Star",
];

/// (Argonian name, meaning) per month.
pub const ARGONIAN_MONTHS: [(&str, &str); 12] = [
    ("Vakka", "Sun"),
    ("Xeech", "Nut"),
    ("Sisei", "Sprout"),
    ("Hist-Deek", "Hist Sapling"),
    ("Hist-Dooka", "Mature Hist"),
    ("Hist-Tsoko", "Elder Hist"),
    ("Thtithil-Gah", "Egg-Basket"),
    ("Thtithil", "Egg"),
    ("Nushmeeko", "Lizard"),
    ("Shaja-Nushmeeko", "Semi-Humanoid Lizard"),
    ("Saxhleel", "Argonian"),
    ("Xulomaht", "The Deceased"),
];

/// Starts on Sunday.
pub const DAYS: [&str; 7] = [
    "Sundas", "Morndas", "Tirdas", "Middas", "Turdas", "Fredas", "Loredas",
];

pub const YOU_ARE_HERE: &str = " :arrow_left: You are here!";
