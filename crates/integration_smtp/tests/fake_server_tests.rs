//! End-to-end tests against an in-process fake SMTP server
//!
//! The server speaks just enough SMTP over a plain TCP socket to record the
//! conversation, so delivery can be checked without a real mail relay.

use std::time::Duration;

use base64::Engine;
use integration_smtp::{Attachment, MailMessage, SmtpClient, SmtpConfig, SmtpError, SmtpSecurity};
use tokio::{
    io::{AsyncBufReadExt, AsyncWriteExt, BufReader},
    net::TcpListener,
    task::JoinHandle,
};

/// Replies the fake server gives to selected commands
#[derive(Clone, Copy)]
struct Script {
    ehlo: &'static str,
    auth: &'static str,
    rcpt: &'static str,
}

impl Default for Script {
    fn default() -> Self {
        Self {
            ehlo: "250-fake.test\r\n250-AUTH PLAIN\r\n250 8BITMIME\r\n",
            auth: "235 2.7.0 Authentication successful\r\n",
            rcpt: "250 2.1.5 OK\r\n",
        }
    }
}

#[derive(Debug, Default)]
struct Transcript {
    commands: Vec<String>,
    data: String,
}

async fn start_server(script: Script) -> (u16, JoinHandle<Transcript>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    let handle = tokio::spawn(async move {
        let (socket, _) = listener.accept().await.unwrap();
        let (reader, mut writer) = socket.into_split();
        let mut reader = BufReader::new(reader);
        let mut transcript = Transcript::default();

        writer.write_all(b"220 fake.test ESMTP\r\n").await.unwrap();

        loop {
            let mut line = String::new();
            if reader.read_line(&mut line).await.unwrap() == 0 {
                break;
            }
            let command = line.trim_end().to_string();
            transcript.commands.push(command.clone());
            let verb = command
                .split([' ', ':'])
                .next()
                .unwrap_or_default()
                .to_ascii_uppercase();

            let reply: &str = match verb.as_str() {
                "EHLO" => script.ehlo,
                "AUTH" => script.auth,
                "MAIL" => "250 2.1.0 OK\r\n",
                "RCPT" => script.rcpt,
                "DATA" => {
                    writer.write_all(b"354 End data with <CR><LF>.<CR><LF>\r\n").await.unwrap();
                    loop {
                        let mut data_line = String::new();
                        if reader.read_line(&mut data_line).await.unwrap() == 0 {
                            return transcript;
                        }
                        if data_line == ".\r\n" {
                            break;
                        }
                        transcript.data.push_str(&data_line);
                    }
                    "250 2.0.0 Queued\r\n"
                },
                "QUIT" => {
                    writer.write_all(b"221 2.0.0 Bye\r\n").await.unwrap();
                    break;
                },
                _ => "500 5.5.2 Unknown command\r\n",
            };
            writer.write_all(reply.as_bytes()).await.unwrap();
        }
        transcript
    });

    (port, handle)
}

fn report_message() -> MailMessage {
    MailMessage::new(
        "reports@colegio.edu.ar",
        vec!["ana@x.com".to_string(), "beto@x.com".to_string()],
        "Wikipedia results: Rust",
        "Here are the results for: Rust\n.hidden line",
    )
    .with_attachment(Attachment::new(
        "wiki_Rust.pdf",
        "application/pdf",
        b"%PDF-1.5\nfake report".to_vec(),
    ))
}

fn config(port: u16) -> SmtpConfig {
    SmtpConfig::plain("127.0.0.1", port)
        .with_timeout_secs(5)
        .with_helo_name("client.test")
}

#[tokio::test]
async fn test_delivers_message_to_all_recipients() {
    let (port, server) = start_server(Script::default()).await;
    let client = SmtpClient::new(config(port).with_credentials("reports", "s3cret"));

    let message_id = client.send(&report_message()).await.unwrap();
    let transcript = server.await.unwrap();

    assert!(message_id.ends_with("@colegio.edu.ar>"));

    let expected_auth = base64::engine::general_purpose::STANDARD.encode("\0reports\0s3cret");
    assert_eq!(
        transcript.commands,
        vec![
            "EHLO client.test".to_string(),
            format!("AUTH PLAIN {expected_auth}"),
            "MAIL FROM:<reports@colegio.edu.ar>".to_string(),
            "RCPT TO:<ana@x.com>".to_string(),
            "RCPT TO:<beto@x.com>".to_string(),
            "DATA".to_string(),
            "QUIT".to_string(),
        ]
    );

    assert!(transcript.data.contains("Subject: Wikipedia results: Rust\r\n"));
    assert!(transcript.data.contains("To: ana@x.com, beto@x.com\r\n"));
    assert!(transcript.data.contains("multipart/mixed"));
    assert!(transcript.data.contains("filename=\"wiki_Rust.pdf\""));
    // Dot-stuffed on the wire
    assert!(transcript.data.contains("\r\n..hidden line\r\n"));

    let pdf_b64 = base64::engine::general_purpose::STANDARD.encode(b"%PDF-1.5\nfake report");
    assert!(transcript.data.contains(&pdf_b64));
}

#[tokio::test]
async fn test_no_auth_without_username() {
    let (port, server) = start_server(Script::default()).await;
    let client = SmtpClient::new(config(port));

    client.send(&report_message()).await.unwrap();
    let transcript = server.await.unwrap();

    assert!(!transcript.commands.iter().any(|c| c.starts_with("AUTH")));
    assert_eq!(transcript.commands[1], "MAIL FROM:<reports@colegio.edu.ar>");
}

#[tokio::test]
async fn test_rejected_recipient_aborts_delivery() {
    let script = Script {
        rcpt: "550 5.1.1 No such user\r\n",
        ..Default::default()
    };
    let (port, server) = start_server(script).await;
    let client = SmtpClient::new(config(port));

    let err = client.send(&report_message()).await.unwrap_err();
    assert_eq!(
        err,
        SmtpError::Rejected {
            command: "RCPT".to_string(),
            code: 550,
            message: "5.1.1 No such user".to_string(),
        }
    );

    drop(client);
    let transcript = server.await.unwrap();
    assert!(!transcript.commands.iter().any(|c| c == "DATA"));
    assert!(transcript.data.is_empty());
}

#[tokio::test]
async fn test_bad_credentials() {
    let script = Script {
        auth: "535 5.7.8 Authentication credentials invalid\r\n",
        ..Default::default()
    };
    let (port, server) = start_server(script).await;
    let client = SmtpClient::new(config(port).with_credentials("reports", "wrong"));

    let err = client.send(&report_message()).await.unwrap_err();
    assert!(matches!(err, SmtpError::AuthenticationFailed(ref m) if m.starts_with("535")));
    server.abort();
}

#[tokio::test]
async fn test_starttls_required_but_not_offered() {
    let (port, server) = start_server(Script::default()).await;
    let mut config = config(port);
    config.security = SmtpSecurity::StartTls;
    let client = SmtpClient::new(config);

    let err = client.send(&report_message()).await.unwrap_err();
    assert_eq!(
        err,
        SmtpError::Tls("server does not offer STARTTLS".to_string())
    );
    server.abort();
}

#[tokio::test]
async fn test_silent_server_times_out() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let server = tokio::spawn(async move {
        let (_socket, _) = listener.accept().await.unwrap();
        tokio::time::sleep(Duration::from_secs(10)).await;
    });

    let client = SmtpClient::new(config(port).with_timeout_secs(1));
    let err = client.send(&report_message()).await.unwrap_err();
    assert_eq!(err, SmtpError::Timeout { timeout_secs: 1 });
    server.abort();
}

#[tokio::test]
async fn test_connection_refused() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let client = SmtpClient::new(config(port));
    let err = client.send(&report_message()).await.unwrap_err();
    assert!(matches!(err, SmtpError::ConnectionFailed(_)));
    assert!(err.is_transient());
}
