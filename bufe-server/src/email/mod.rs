//! Outgoing e-mail
//!
//! Production sends through SES. Without a configured sender the mail is
//! written to the log instead, which is what local development uses.

use aws_sdk_sesv2::Client as SesClient;
use aws_sdk_sesv2::types::{Body, Content, Destination, EmailContent, Message};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Clone)]
pub enum Mailer {
    Ses { client: SesClient, from: String },
    Log,
}

impl Mailer {
    pub async fn send_verification_email(
        &self,
        to: &str,
        name: &str,
        link: &str,
    ) -> Result<(), BoxError> {
        let subject = "Büfé regisztráció megerősítése";
        let body_text = format!(
            "Kedves {name}!\n\n\
             A büfé fiókod aktiválásához kattints az alábbi linkre:\n\
             {link}\n\n\
             A link 24 óráig érvényes.\n\
             Ha nem te regisztráltál, hagyd figyelmen kívül ezt a levelet."
        );

        match self {
            Mailer::Ses { client, from } => {
                send_email(client, from, to, subject, body_text).await?;
                tracing::info!(to = to, "Verification email sent");
            }
            Mailer::Log => {
                tracing::info!(to = to, link = link, "Verification email (not sent, no SES sender)");
            }
        }
        Ok(())
    }
}

async fn send_email(
    ses: &SesClient,
    from: &str,
    to: &str,
    subject: &str,
    body_text: String,
) -> Result<(), BoxError> {
    let subject = Content::builder().data(subject).charset("UTF-8").build()?;

    let body = Body::builder()
        .text(Content::builder().data(body_text).charset("UTF-8").build()?)
        .build();

    let message = Message::builder().subject(subject).body(body).build();

    ses.send_email()
        .from_email_address(from)
        .destination(Destination::builder().to_addresses(to).build())
        .content(EmailContent::builder().simple(message).build())
        .send()
        .await?;
    Ok(())
}
