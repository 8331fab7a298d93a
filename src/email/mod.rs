//! Transactional email: SMTP mailer plus the HTML templates the
//! storefront sends (order confirmation, owner notification, password
//! reset).
//!
//! Sending is fire-and-forget relative to the HTTP response: callers
//! spawn it and failures are logged, never surfaced to the client.

pub mod mailer;
pub mod templates;

pub use mailer::Mailer;
