//! SMTP command/reply exchange over any async stream

use std::time::Duration;

use tokio::{
    io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader},
    time::timeout,
};
use tracing::trace;

use crate::SmtpError;

/// A complete (possibly multi-line) server reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Reply {
    pub code: u16,
    pub lines: Vec<String>,
}

impl Reply {
    pub fn text(&self) -> String {
        self.lines.join(" ")
    }

    /// EHLO keyword check, e.g. `STARTTLS` or `AUTH`
    pub fn has_extension(&self, keyword: &str) -> bool {
        self.lines.iter().any(|line| {
            line.split_whitespace()
                .next()
                .is_some_and(|word| word.eq_ignore_ascii_case(keyword))
        })
    }

    /// Fail with [`SmtpError::Rejected`] unless the code is one of `accepted`
    pub fn ensure(self, command: &str, accepted: &[u16]) -> Result<Self, SmtpError> {
        if accepted.contains(&self.code) {
            Ok(self)
        } else {
            Err(SmtpError::Rejected {
                command: command.to_string(),
                code: self.code,
                message: self.text(),
            })
        }
    }
}

/// Line-oriented SMTP conversation with a per-operation timeout
pub(crate) struct SmtpSession<S> {
    stream: BufReader<S>,
    timeout_secs: u64,
}

impl<S> SmtpSession<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(stream: S, timeout_secs: u64) -> Self {
        Self {
            stream: BufReader::new(stream),
            timeout_secs,
        }
    }

    /// Give the stream back, e.g. for a TLS upgrade
    pub fn into_inner(self) -> S {
        self.stream.into_inner()
    }

    /// Send one command line and read the reply
    pub async fn command(&mut self, line: &str) -> Result<Reply, SmtpError> {
        let verb = line.split(' ').next().unwrap_or(line);
        trace!(command = %verb, "Sending SMTP command");
        self.write_all(format!("{line}\r\n").as_bytes()).await?;
        self.read_reply().await
    }

    pub async fn write_all(&mut self, bytes: &[u8]) -> Result<(), SmtpError> {
        let duration = Duration::from_secs(self.timeout_secs);
        let stream = &mut self.stream;
        let write = async {
            stream.write_all(bytes).await?;
            stream.flush().await?;
            Ok::<_, std::io::Error>(())
        };
        timeout(duration, write)
            .await
            .map_err(|_| SmtpError::Timeout {
                timeout_secs: self.timeout_secs,
            })?
            .map_err(|e| SmtpError::ConnectionFailed(format!("Failed to write: {e}")))
    }

    /// Read a reply, joining continuation lines (`250-...`)
    pub async fn read_reply(&mut self) -> Result<Reply, SmtpError> {
        let mut lines = Vec::new();
        loop {
            let line = self.read_line().await?;
            trace!(line = %line, "SMTP reply");

            let (code, separator, text) = parse_reply_line(&line)?;
            lines.push(text.to_string());
            if separator != '-' {
                return Ok(Reply { code, lines });
            }
        }
    }

    async fn read_line(&mut self) -> Result<String, SmtpError> {
        let mut line = String::new();
        let read = timeout(
            Duration::from_secs(self.timeout_secs),
            self.stream.read_line(&mut line),
        )
        .await
        .map_err(|_| SmtpError::Timeout {
            timeout_secs: self.timeout_secs,
        })?
        .map_err(|e| SmtpError::ConnectionFailed(format!("Failed to read reply: {e}")))?;

        if read == 0 {
            return Err(SmtpError::Protocol(
                "connection closed by server".to_string(),
            ));
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }
}

/// Split `250-text` / `250 text` / `250` into code, separator and text
fn parse_reply_line(line: &str) -> Result<(u16, char, &str), SmtpError> {
    let malformed = || SmtpError::Protocol(format!("malformed reply: {line:?}"));

    let code = line
        .get(..3)
        .and_then(|c| c.parse::<u16>().ok())
        .filter(|c| (200..600).contains(c))
        .ok_or_else(malformed)?;

    match line[3..].chars().next() {
        None => Ok((code, ' ', "")),
        Some(sep @ ('-' | ' ')) => Ok((code, sep, &line[4..])),
        Some(_) => Err(malformed()),
    }
}

#[cfg(test)]
mod tests {
    use tokio::io::{AsyncReadExt, duplex};

    use super::*;

    #[test]
    fn parses_reply_lines() {
        assert_eq!(parse_reply_line("250 OK").unwrap(), (250, ' ', "OK"));
        assert_eq!(
            parse_reply_line("250-STARTTLS").unwrap(),
            (250, '-', "STARTTLS")
        );
        assert_eq!(parse_reply_line("354").unwrap(), (354, ' ', ""));
        assert!(parse_reply_line("hello").is_err());
        assert!(parse_reply_line("25").is_err());
        assert!(parse_reply_line("250x").is_err());
        assert!(parse_reply_line("999 nope").is_err());
    }

    #[test]
    fn reply_extensions() {
        let reply = Reply {
            code: 250,
            lines: vec![
                "mail.example.org".to_string(),
                "starttls".to_string(),
                "AUTH PLAIN LOGIN".to_string(),
            ],
        };
        assert!(reply.has_extension("STARTTLS"));
        assert!(reply.has_extension("auth"));
        assert!(!reply.has_extension("8BITMIME"));
    }

    #[test]
    fn reply_ensure() {
        let reply = Reply {
            code: 550,
            lines: vec!["no such user".to_string()],
        };
        assert_eq!(
            reply.clone().ensure("RCPT", &[250, 251]),
            Err(SmtpError::Rejected {
                command: "RCPT".to_string(),
                code: 550,
                message: "no such user".to_string(),
            })
        );
        assert!(reply.ensure("RCPT", &[550]).is_ok());
    }

    #[tokio::test]
    async fn reads_multiline_reply() {
        let (client, mut server) = duplex(1024);
        server
            .write_all(b"250-mail.example.org\r\n250-STARTTLS\r\n250 SIZE 1000\r\n")
            .await
            .unwrap();

        let mut session = SmtpSession::new(client, 5);
        let reply = session.read_reply().await.unwrap();
        assert_eq!(reply.code, 250);
        assert_eq!(reply.lines, vec!["mail.example.org", "STARTTLS", "SIZE 1000"]);
    }

    #[tokio::test]
    async fn command_writes_crlf_line() {
        let (client, mut server) = duplex(1024);
        server.write_all(b"250 OK\r\n").await.unwrap();

        let mut session = SmtpSession::new(client, 5);
        let reply = session.command("NOOP").await.unwrap();
        assert_eq!(reply.code, 250);

        let mut buf = [0u8; 6];
        server.read_exact(&mut buf).await.unwrap();
        assert_eq!(&buf, b"NOOP\r\n");
    }

    #[tokio::test]
    async fn closed_connection_is_protocol_error() {
        let (client, server) = duplex(64);
        drop(server);

        let mut session = SmtpSession::new(client, 5);
        assert!(matches!(
            session.read_reply().await,
            Err(SmtpError::Protocol(_))
        ));
    }

    #[tokio::test]
    async fn silent_server_times_out() {
        let (client, _server) = duplex(64);

        let mut session = SmtpSession::new(client, 1);
        assert_eq!(
            session.read_reply().await,
            Err(SmtpError::Timeout { timeout_secs: 1 })
        );
    }
}
