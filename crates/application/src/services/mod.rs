//! Application services - Use case implementations

mod lookup_service;
mod pdf_report_builder;
pub mod recipient_resolver;
mod report_pipeline;
mod text_extractor;

pub use lookup_service::LookupService;
pub use pdf_report_builder::{
    PdfReportBuilder, ReportRenderer, truncate_chars, wrap_hard, wrap_text,
};
pub use recipient_resolver::resolve as resolve_recipients;
pub use report_pipeline::ReportPipeline;
pub use text_extractor::extract_summary;
