//! Message model and MIME formatting

use std::fmt;

use base64::Engine;
use chrono::{DateTime, Utc};

use crate::SmtpError;

/// Base64 body lines are wrapped at this width
const BASE64_LINE_WIDTH: usize = 76;

/// A file attached to a message
#[derive(Clone, PartialEq, Eq)]
pub struct Attachment {
    pub filename: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

impl Attachment {
    pub fn new(
        filename: impl Into<String>,
        content_type: impl Into<String>,
        data: Vec<u8>,
    ) -> Self {
        Self {
            filename: filename.into(),
            content_type: content_type.into(),
            data,
        }
    }
}

impl fmt::Debug for Attachment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Attachment")
            .field("filename", &self.filename)
            .field("content_type", &self.content_type)
            .field("size_bytes", &self.data.len())
            .finish()
    }
}

/// A message to deliver in one SMTP transaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailMessage {
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    /// Plain-text body
    pub body: String,
    pub attachments: Vec<Attachment>,
}

impl MailMessage {
    pub fn new(
        from: impl Into<String>,
        to: Vec<String>,
        subject: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            from: from.into(),
            to,
            subject: subject.into(),
            body: body.into(),
            attachments: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_attachment(mut self, attachment: Attachment) -> Self {
        self.attachments.push(attachment);
        self
    }

    /// Check that the envelope can be sent
    pub fn validate(&self) -> Result<(), SmtpError> {
        if self.from.trim().is_empty() {
            return Err(SmtpError::InvalidMessage("missing sender".to_string()));
        }
        if self.to.iter().all(|r| r.trim().is_empty()) {
            return Err(SmtpError::InvalidMessage("no recipients".to_string()));
        }
        let bad = std::iter::once(&self.from)
            .chain(&self.to)
            .find(|a| a.contains(['<', '>', '\r', '\n']));
        if let Some(address) = bad {
            return Err(SmtpError::InvalidMessage(format!(
                "address contains forbidden characters: {}",
                address.escape_debug()
            )));
        }
        Ok(())
    }

    /// Format the message as RFC 5322 text with CRLF line endings
    ///
    /// Without attachments the body is sent as a single text part; otherwise
    /// as `multipart/mixed` with the text first.
    pub fn format(&self, message_id: &str, date: &DateTime<Utc>, boundary: &str) -> String {
        let mut out = String::new();
        push_header(&mut out, "From", &self.from);
        push_header(&mut out, "To", &self.to.join(", "));
        push_header(&mut out, "Subject", &encode_header_text(&self.subject));
        push_header(&mut out, "Date", &date.to_rfc2822());
        push_header(&mut out, "Message-ID", message_id);
        push_header(&mut out, "MIME-Version", "1.0");

        if self.attachments.is_empty() {
            push_text_part_headers(&mut out);
            out.push_str("\r\n");
            out.push_str(&normalize_line_endings(&self.body));
            out.push_str("\r\n");
            return out;
        }

        push_header(
            &mut out,
            "Content-Type",
            &format!("multipart/mixed; boundary=\"{boundary}\""),
        );
        out.push_str("\r\n");
        out.push_str("This is a multi-part message in MIME format.\r\n");

        out.push_str(&format!("\r\n--{boundary}\r\n"));
        push_text_part_headers(&mut out);
        out.push_str("\r\n");
        out.push_str(&normalize_line_endings(&self.body));
        out.push_str("\r\n");

        for attachment in &self.attachments {
            out.push_str(&format!("\r\n--{boundary}\r\n"));
            let name = encode_filename_param(&attachment.filename);
            push_header(
                &mut out,
                "Content-Type",
                &format!("{}; name{name}", sanitize(&attachment.content_type)),
            );
            push_header(
                &mut out,
                "Content-Disposition",
                &format!("attachment; filename{name}"),
            );
            push_header(&mut out, "Content-Transfer-Encoding", "base64");
            out.push_str("\r\n");
            out.push_str(&encode_base64_wrapped(&attachment.data));
        }

        out.push_str(&format!("\r\n--{boundary}--\r\n"));
        out
    }
}

fn push_header(out: &mut String, name: &str, value: &str) {
    out.push_str(name);
    out.push_str(": ");
    out.push_str(&sanitize(value));
    out.push_str("\r\n");
}

fn push_text_part_headers(out: &mut String) {
    push_header(out, "Content-Type", "text/plain; charset=utf-8");
    push_header(out, "Content-Transfer-Encoding", "8bit");
}

/// Header values never carry line breaks
fn sanitize(value: &str) -> String {
    value.replace(['\r', '\n'], " ")
}

/// RFC 2047 encoded-word for non-ASCII header text
fn encode_header_text(text: &str) -> String {
    if text.is_ascii() {
        text.to_string()
    } else {
        let encoded = base64::engine::general_purpose::STANDARD.encode(text);
        format!("=?UTF-8?B?{encoded}?=")
    }
}

/// `="name"` or, for non-ASCII names, the RFC 2231 `*=UTF-8''...` form
fn encode_filename_param(filename: &str) -> String {
    if filename.is_ascii() && !filename.contains(['"', '\\']) {
        return format!("=\"{}\"", sanitize(filename));
    }
    let mut encoded = String::from("*=UTF-8''");
    for byte in filename.bytes() {
        if byte.is_ascii_alphanumeric() || b"-._~".contains(&byte) {
            encoded.push(char::from(byte));
        } else {
            encoded.push_str(&format!("%{byte:02X}"));
        }
    }
    encoded
}

fn encode_base64_wrapped(data: &[u8]) -> String {
    let encoded = base64::engine::general_purpose::STANDARD.encode(data);
    let mut out = String::with_capacity(encoded.len() + encoded.len() / BASE64_LINE_WIDTH * 2 + 2);
    for chunk in encoded.as_bytes().chunks(BASE64_LINE_WIDTH) {
        // base64 output is ASCII
        out.push_str(&String::from_utf8_lossy(chunk));
        out.push_str("\r\n");
    }
    out
}

/// Convert bare `\n` and `\r` to CRLF
pub(crate) fn normalize_line_endings(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n").replace('\n', "\r\n")
}

/// Escape lines starting with `.` for the DATA phase
pub(crate) fn dot_stuff(content: &str) -> String {
    let content = normalize_line_endings(content);
    let stuffed = content.replace("\r\n.", "\r\n..");
    if stuffed.starts_with('.') {
        format!(".{stuffed}")
    } else {
        stuffed
    }
}
