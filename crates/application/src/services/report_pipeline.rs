//! Report pipeline
//!
//! One run takes a subject term and recipient input to a delivered PDF
//! report: resolve recipients, look the term up (unless results were
//! supplied), render the report and hand it to the mailer.

use std::fmt;

use domain::{DeliveryOutcome, LookupResult, ReportDocument};
use tracing::{debug, info, instrument, warn};

use super::{LookupService, PdfReportBuilder, ReportRenderer, recipient_resolver};
use crate::{
    config::PipelineConfig,
    error::ApplicationError,
    ports::{MailAttachment, MailerPort, OutgoingMail},
};

/// Orchestrates lookup, rendering and delivery of one report
pub struct ReportPipeline {
    lookup: LookupService,
    renderer: Box<dyn ReportRenderer>,
    default_from_address: Option<String>,
}

impl fmt::Debug for ReportPipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReportPipeline")
            .field("lookup", &self.lookup)
            .field("default_from_address", &self.default_from_address)
            .finish_non_exhaustive()
    }
}

impl ReportPipeline {
    pub fn new(
        lookup: LookupService,
        renderer: impl ReportRenderer + 'static,
        default_from_address: Option<String>,
    ) -> Self {
        Self {
            lookup,
            renderer: Box::new(renderer),
            default_from_address,
        }
    }

    pub fn from_config(lookup: LookupService, config: &PipelineConfig) -> Self {
        Self::new(
            lookup,
            PdfReportBuilder::from_config(config),
            config.default_from_address.clone(),
        )
    }

    pub const fn lookup(&self) -> &LookupService {
        &self.lookup
    }

    /// Mail subject for a subject term
    pub fn mail_subject(subject_term: &str) -> String {
        format!("Wikipedia results: {}", subject_term.trim())
    }

    /// Plain-text mail body for a subject term
    pub fn mail_body(subject_term: &str) -> String {
        format!("Here are the results for: {}", subject_term.trim())
    }

    /// Look up and render a report without delivering it
    ///
    /// Uses `prefetched` when given instead of fetching.
    ///
    /// # Errors
    ///
    /// Returns [`ApplicationError::Rendering`] if the PDF cannot be written.
    #[instrument(skip(self, prefetched))]
    pub async fn render(
        &self,
        subject_term: &str,
        prefetched: Option<LookupResult>,
    ) -> Result<ReportDocument, ApplicationError> {
        let result = match prefetched {
            Some(result) => {
                debug!("Using supplied lookup result");
                result
            },
            None => self.lookup.lookup(subject_term).await,
        };

        let title = match result.subject_term() {
            "" => subject_term.trim(),
            term => term,
        };
        self.renderer
            .build_report(title, &result.report_body(), result.source_url())
    }

    /// Run the full pipeline for one subject term
    ///
    /// Recipient resolution happens first; with no recipients nothing is
    /// fetched, rendered or sent. A failed or empty lookup is still reported.
    /// A report that cannot be rendered ends as a transport error without an
    /// attachment. Delivery is attempted once.
    #[instrument(skip(self, prefetched, mailer))]
    pub async fn run(
        &self,
        subject_term: &str,
        prefetched: Option<LookupResult>,
        raw_recipients: &str,
        fallback_identity: Option<&str>,
        mailer: &dyn MailerPort,
    ) -> DeliveryOutcome {
        let Ok(recipients) = recipient_resolver::resolve(raw_recipients, fallback_identity) else {
            info!("No recipients given, nothing to send");
            return DeliveryOutcome::no_recipients();
        };
        debug!(recipients = recipients.len(), "Resolved recipients");

        let document = match self.render(subject_term, prefetched).await {
            Ok(document) => document,
            Err(e) => {
                warn!(error = %e, "Report rendering failed");
                return DeliveryOutcome::rendering_failed(recipients, e.to_string());
            },
        };
        let attachment_name = document.filename().to_string();

        let mail = OutgoingMail {
            subject: Self::mail_subject(subject_term),
            body: Self::mail_body(subject_term),
            from: self.default_from_address.clone(),
            to: recipients.clone(),
            attachment: MailAttachment::from(document),
        };

        match mailer.send(&mail).await {
            Ok(()) => {
                info!(%recipients, attachment = %attachment_name, "Report sent");
                DeliveryOutcome::sent(recipients, attachment_name)
            },
            Err(e) => {
                warn!(error = %e, "Report delivery failed");
                DeliveryOutcome::transport_error(recipients, attachment_name, e.to_string())
            },
        }
    }
}
