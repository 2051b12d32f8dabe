//! Business logic services.

#![allow(missing_docs)]

pub mod auth;
pub mod calendar;
pub mod expo;
pub mod kontak;
pub mod konten;
pub mod lomba;
pub mod mail;
pub mod prestasi;
pub mod registration;
pub mod reminder;
pub mod search;

pub use auth::{AdminIdentity, AuthService, DEV_TOKEN_PREFIX, LoginTokens};
pub use calendar::{CalendarEvent, CalendarService};
pub use expo::{ExpoInput, ExpoRegistrationForm, ExpoService};
pub use kontak::{KontakForm, KontakService};
pub use konten::KontenService;
pub use lomba::{LombaInput, LombaService};
pub use mail::{Mailer, ReminderMail};
pub use prestasi::{CertificateUpload, PrestasiInput, PrestasiService, PrestasiSubmission};
pub use registration::{RegistrationForm, RegistrationService};
pub use reminder::{
    AdhocReminder, DEFAULT_LOOKAHEAD_DAYS, DeadlineItem, DeadlineReport, Registrant,
    ReminderDispatch, ReminderService,
};
pub use search::{SearchResults, SearchService};
