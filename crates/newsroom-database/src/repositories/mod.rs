//! Concrete repository implementations backed by PostgreSQL.
//!
//! Each repository owns the queries over one fact table. Cross-table
//! aggregates live with the table they count.

pub mod click;
pub mod content;
pub mod event;
pub mod newsletter;
pub mod send;
pub mod source;
pub mod subscriber;

pub use click::ClickRepository;
pub use content::ContentRepository;
pub use event::SubscriberEventRepository;
pub use newsletter::NewsletterRepository;
pub use send::SendRepository;
pub use source::SourceRepository;
pub use subscriber::SubscriberRepository;
