//! Value Objects - Immutable, identity-less domain primitives

mod email_address;
mod recipient_set;

pub use email_address::EmailAddress;
pub use recipient_set::RecipientSet;
