//! Core types: identifiers, birthdays, notification windows, messages

pub mod birthday;
pub mod ids;
pub mod message;
pub mod privacy;
pub mod tracing;
pub mod window;

pub use birthday::{Birthday, InvalidBirthday};
pub use ids::{ChannelId, GuildId, UserId};
pub use message::{
    DEFAULT_TEMPLATES_NO_AGE, DEFAULT_TEMPLATES_WITH_AGE, age_with_suffix, choose_template,
    format_birthday_message,
};
pub use privacy::Privacy;
pub use self::tracing::{TracingConfig, TracingError, TracingOutputFormat, init_tracing};
pub use window::{NotificationWindow, local_midnight, resolve_timezone};
