use crate::domain::UserEmail;
use reqwest::{Client, Url};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use std::time::Duration;

pub struct EmailClient {
    client: Client,
    url: Url,
    sender: UserEmail,
    sender_name: String,
    auth_token: SecretString,
}

impl EmailClient {
    pub fn new(
        url: Url,
        sender: UserEmail,
        sender_name: String,
        auth_token: SecretString,
        timeout: Duration,
    ) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to build the email HTTP client.");

        Self {
            client,
            url,
            sender,
            sender_name,
            auth_token,
        }
    }

    pub async fn send_email(
        &self,
        recipient: &UserEmail,
        subject: &str,
        html_body: &str,
        text_body: &str,
    ) -> Result<(), reqwest::Error> {
        let from = format!(r#""{}" <{}>"#, self.sender_name, self.sender);
        let body = SendEmailRequest {
            from: &from,
            to: recipient.as_ref(),
            subject,
            html_body,
            text_body,
        };

        let url = self
            .url
            .join("email")
            .expect("Given URL cannot fail parsing.");

        self.client
            .post(url)
            .header("X-Postmark-Server-Token", self.auth_token.expose_secret())
            .json(&body)
            .send()
            .await?
            .error_for_status()?;

        Ok(())
    }
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct SendEmailRequest<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    html_body: &'a str,
    text_body: &'a str,
}
