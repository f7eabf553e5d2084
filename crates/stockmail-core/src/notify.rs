use crate::config::{Credentials, Relay};
use crate::Result;
use chrono::NaiveDate;
use lettre::message::{header::ContentType, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials as SmtpCredentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

const PLAIN_FALLBACK: &str =
    "Your daily stock report is attached as HTML; open it in an HTML-capable mail client.";

pub fn subject(date: NaiveDate) -> String {
    format!("Multi-Period Stock Report - {}", date.format("%B %d, %Y"))
}

/// Delivers the rendered report to the configured recipient.
pub struct Notifier {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    to: Mailbox,
}

impl Notifier {
    /// No connection is made until [`Notifier::send`].
    pub fn new(relay: &Relay, credentials: &Credentials) -> Result<Self> {
        let from: Mailbox = credentials.sender.parse()?;
        let to: Mailbox = credentials.recipient.parse()?;
        let builder = if relay.uses_starttls() {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&relay.host)?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&relay.host)?
        };
        let transport = builder
            .port(relay.port)
            .credentials(SmtpCredentials::new(
                credentials.sender.clone(),
                credentials.password.clone(),
            ))
            .build();
        Ok(Self {
            transport,
            from,
            to,
        })
    }

    pub fn message(&self, document: &str, subject: &str) -> Result<Message> {
        let message = Message::builder()
            .from(self.from.clone())
            .to(self.to.clone())
            .subject(subject)
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(PLAIN_FALLBACK.to_string()),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(document.to_string()),
                    ),
            )?;
        Ok(message)
    }

    /// One attempt; a failure is final for this run.
    pub async fn send(&self, document: &str, subject: &str) -> Result<()> {
        let message = self.message(document, subject)?;
        log::debug!("Sending \"{subject}\" to {}", self.to);
        self.transport.send(message).await?;
        Ok(())
    }
}
