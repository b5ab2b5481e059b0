//! Domain entities - values built and discarded within one report run

mod delivery_outcome;
mod lookup_result;
mod report_document;

pub use delivery_outcome::{DeliveryOutcome, DeliveryStatus};
pub use lookup_result::{LookupResult, LookupStatus, NO_INFORMATION};
pub use report_document::{PDF_MIME_TYPE, ReportDocument};
