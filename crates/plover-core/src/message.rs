//! Birthday message templates and formatting.
//!
//! Messages are composed from one of two template pools depending on whether
//! the user's age may be disclosed. Templates use `{placeholder}` markers:
//! `{name}` / `{Name}` / `{NAME}`, `{ping}`, `{age}` and `{age_suffixed}`
//! (the age with an ordinal suffix, e.g. "21st").

use rand::seq::IndexedRandom;

use crate::UserId;

/// Default templates used when the user's age is not disclosed.
pub const DEFAULT_TEMPLATES_NO_AGE: &[&str] = &[
    "Hey everyone, it's {name}'s birthday today! Happy birthday {ping}!",
    "{name}! It's your birthday!! Hope it's a great one, {ping}!",
    "did y'all know it's {name}'s birthday?? happy birthday {ping}! :D",
    "Attention please... IT'S {NAME}'S BIRTHDAY! Happy birthday {ping}!!",
];

/// Default templates used when the user's age is disclosed.
pub const DEFAULT_TEMPLATES_WITH_AGE: &[&str] = &[
    "Hey everyone, it's {name}'s birthday! They turn {age} today. Happy birthday {ping}!",
    "{name}! It's your {age_suffixed} birthday!! Hope it's a great one, {ping}!",
    "did y'all know it's {name}'s birthday?? they're {age} now! happy birthday {ping}! :D",
    "Attention please... IT'S {NAME}'S BIRTHDAY! {age} years old today! Happy birthday {ping}!!",
];

/// Formats an age with its ordinal suffix: "20th", "21st", "22nd", "23rd".
pub fn age_with_suffix(age: i32) -> String {
    format!("{age}{}", ordinal_suffix(age))
}

fn ordinal_suffix(n: i32) -> &'static str {
    // 11th-13th override the usual 1st/2nd/3rd endings
    match n.abs() % 100 {
        11..=13 => "th",
        _ => match n.abs() % 10 {
            1 => "st",
            2 => "nd",
            3 => "rd",
            _ => "th",
        },
    }
}

fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// Picks a random template from the pool matching whether the age is
/// disclosed. Returns `None` when the matching pool is empty.
pub fn choose_template<'a>(
    no_age: &'a [String],
    with_age: &'a [String],
    age_disclosed: bool,
) -> Option<&'a str> {
    let pool = if age_disclosed { with_age } else { no_age };
    pool.choose(&mut rand::rng()).map(String::as_str)
}

/// Substitutes placeholders in `template` for one user's birthday message.
///
/// `{age}` and `{age_suffixed}` render empty when no age is given; callers
/// select a no-age template in that case.
pub fn format_birthday_message(
    template: &str,
    user: UserId,
    name: &str,
    age: Option<i32>,
) -> String {
    let mut message = template
        .replace("{name}", name)
        .replace("{Name}", &capitalize_first(name))
        .replace("{NAME}", &name.to_uppercase())
        .replace("{ping}", &user.mention());
    match age {
        Some(age) => {
            message = message
                .replace("{age}", &age.to_string())
                .replace("{age_suffixed}", &age_with_suffix(age));
        }
        None => {
            message = message.replace("{age}", "").replace("{age_suffixed}", "");
        }
    }
    message
}
