use crate::{
    domain::{PersonName, UserEmail},
    email_client::EmailClient,
};

/// An email the marketplace sends on its own behalf.
pub struct Notification {
    pub subject: String,
    pub html_body: String,
    pub text_body: String,
}

impl Notification {
    pub fn welcome() -> Self {
        let message = "Reliable Workers, Right at Your Doorstep. Thanks \u{1F33C}";
        Self {
            subject: "Welcome to Neighbourly".into(),
            html_body: format!("<p>{message}</p>"),
            text_body: message.into(),
        }
    }

    pub fn booking_confirmed() -> Self {
        let message = "You've successfully booked a service through Neighbourly. \
            Worker is on the way toward your address. Thank You \u{1F91D}";
        Self {
            subject: "Booking Successfull".into(),
            html_body: format!("<p>{message}</p>"),
            text_body: message.into(),
        }
    }

    pub fn worker_booked(resident: &PersonName) -> Self {
        let message = format!(
            "Hurry Up! Get ready to go {}'s address. \u{1F973}",
            resident.as_ref()
        );
        Self {
            subject: "Yay! You are booked!".into(),
            html_body: format!("<p>{message}</p>"),
            text_body: message,
        }
    }
}

/// Deliver a notification, logging instead of failing.
///
/// Notifications follow a write that already succeeded, so a delivery problem
/// never changes the response.
#[tracing::instrument(
    name = "Sending a notification",
    skip(email_client, notification),
    fields(subject = %notification.subject)
)]
pub async fn notify(email_client: &EmailClient, recipient: &UserEmail, notification: Notification) {
    if let Err(e) = email_client
        .send_email(
            recipient,
            &notification.subject,
            &notification.html_body,
            &notification.text_body,
        )
        .await
    {
        tracing::error!(
            error.cause_chain = ?e,
            error.message = %e,
            "Failed to deliver a notification.",
        );
    }
}
