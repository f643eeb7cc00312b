//! Newsletter draft and per-recipient send entities.

pub mod model;
pub mod send;

pub use model::{NewsletterDraft, NewsletterStatus};
pub use send::{NewsletterSend, SendStatus};
