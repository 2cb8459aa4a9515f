//! Booking confirmations sent over email and SMS.
//!
//! Both senders are mocked: they log the outgoing message, wait a fixed
//! delay and report success.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::time::Duration;

pub const BUSINESS_PHONE: &str = "(949) 555-1234";
pub const CONFIRMATION_SUBJECT: &str = "Your IT Service Appointment Confirmation";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub body: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TextMessage {
    pub to: String,
    pub message: String,
}

#[async_trait]
pub trait EmailSender: Send + Sync {
    async fn send_email(&self, email: &EmailMessage) -> Result<bool>;
}

#[async_trait]
pub trait SmsSender: Send + Sync {
    async fn send_text(&self, text: &TextMessage) -> Result<bool>;
}

#[derive(Debug, Clone, Default)]
pub struct LoggingEmailSender {
    delay: Duration,
}

impl LoggingEmailSender {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

#[async_trait]
impl EmailSender for LoggingEmailSender {
    async fn send_email(&self, email: &EmailMessage) -> Result<bool> {
        tracing::info!(to = %email.to, subject = %email.subject, body = %email.body, "sending email");
        tokio::time::sleep(self.delay).await;
        Ok(true)
    }
}

#[derive(Debug, Clone, Default)]
pub struct LoggingSmsSender {
    delay: Duration,
}

impl LoggingSmsSender {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

#[async_trait]
impl SmsSender for LoggingSmsSender {
    async fn send_text(&self, text: &TextMessage) -> Result<bool> {
        tracing::info!(to = %text.to, message = %text.message, "sending text message");
        tokio::time::sleep(self.delay).await;
        Ok(true)
    }
}

/// A visitor's booking as submitted. Fields are used verbatim.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BookingRequest {
    pub email: String,
    pub phone: String,
    pub name: String,
    pub service: String,
    pub date: NaiveDate,
    pub time: String,
}

impl BookingRequest {
    /// Start instant of the booking, if `time` reads as `10:30 AM` or `14:00`.
    pub fn start(&self) -> Option<DateTime<Utc>> {
        let time = self.time.trim();
        let parsed = NaiveTime::parse_from_str(time, "%I:%M %p")
            .or_else(|_| NaiveTime::parse_from_str(time, "%H:%M"))
            .ok()?;
        Some(self.date.and_time(parsed).and_utc())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingConfirmation {
    pub email: EmailMessage,
    pub text: TextMessage,
}

impl BookingConfirmation {
    pub fn from_request(request: &BookingRequest) -> Self {
        let date = format_long_date(request.date);
        let body = format!(
            "Hello {name},\n\n\
             Thank you for booking an appointment with OC Tech Support!\n\n\
             Your appointment details:\n\
             Service: {service}\n\
             Date: {date}\n\
             Time: {time}\n\n\
             If you need to reschedule or cancel, please contact us at {BUSINESS_PHONE}.\n\n\
             Best regards,\n\
             OC Tech Support Team\n",
            name = request.name,
            service = request.service,
            time = request.time,
        );
        let message = format!(
            "OC Tech Support: Your appointment for {} is confirmed for {} at {}. Questions? Call {BUSINESS_PHONE}.",
            request.service, date, request.time
        );

        Self {
            email: EmailMessage {
                to: request.email.clone(),
                subject: CONFIRMATION_SUBJECT.to_string(),
                body,
            },
            text: TextMessage {
                to: request.phone.clone(),
                message,
            },
        }
    }
}

/// `Monday, June 5, 2023`
pub fn format_long_date(date: NaiveDate) -> String {
    date.format("%A, %B %-d, %Y").to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BookingReceipt {
    pub email_sent: bool,
    pub sms_sent: bool,
    #[serde(default)]
    pub appointment_id: Option<String>,
}

/// Sends the email first, then the text message.
pub async fn send_booking_confirmation(
    email_sender: &dyn EmailSender,
    sms_sender: &dyn SmsSender,
    request: &BookingRequest,
) -> Result<BookingReceipt> {
    let confirmation = BookingConfirmation::from_request(request);
    let email_sent = email_sender.send_email(&confirmation.email).await?;
    let sms_sent = sms_sender.send_text(&confirmation.text).await?;
    Ok(BookingReceipt {
        email_sent,
        sms_sent,
        appointment_id: None,
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    fn request() -> BookingRequest {
        BookingRequest {
            email: "ann@example.com".into(),
            phone: "(714) 555-0000".into(),
            name: "Ann".into(),
            service: "Wi-Fi Network Setup".into(),
            date: NaiveDate::from_ymd_opt(2023, 6, 5).unwrap(),
            time: "10:30 AM".into(),
        }
    }

    #[derive(Default)]
    struct Recorder {
        sent: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl EmailSender for Recorder {
        async fn send_email(&self, email: &EmailMessage) -> Result<bool> {
            self.sent.lock().unwrap().push(format!("email:{}", email.to));
            Ok(true)
        }
    }

    #[async_trait]
    impl SmsSender for Recorder {
        async fn send_text(&self, text: &TextMessage) -> Result<bool> {
            self.sent.lock().unwrap().push(format!("sms:{}", text.to));
            Ok(true)
        }
    }

    #[test]
    fn long_date_format() {
        assert_eq!(
            format_long_date(NaiveDate::from_ymd_opt(2023, 6, 5).unwrap()),
            "Monday, June 5, 2023"
        );
    }

    #[test]
    fn confirmation_messages_carry_booking_details() {
        let confirmation = BookingConfirmation::from_request(&request());
        assert_eq!(confirmation.email.to, "ann@example.com");
        assert_eq!(confirmation.email.subject, CONFIRMATION_SUBJECT);
        assert!(confirmation.email.body.starts_with("Hello Ann,"));
        assert!(confirmation.email.body.contains("Service: Wi-Fi Network Setup"));
        assert!(confirmation.email.body.contains("Date: Monday, June 5, 2023"));
        assert!(confirmation.email.body.contains("Time: 10:30 AM"));
        assert_eq!(confirmation.text.to, "(714) 555-0000");
        assert_eq!(
            confirmation.text.message,
            "OC Tech Support: Your appointment for Wi-Fi Network Setup is confirmed for Monday, June 5, 2023 at 10:30 AM. Questions? Call (949) 555-1234."
        );
    }

    #[tokio::test]
    async fn email_is_sent_before_sms() {
        let recorder = Recorder::default();
        let receipt = send_booking_confirmation(&recorder, &recorder, &request())
            .await
            .unwrap();
        assert!(receipt.email_sent && receipt.sms_sent);
        assert_eq!(
            *recorder.sent.lock().unwrap(),
            ["email:ann@example.com", "sms:(714) 555-0000"]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn logging_senders_succeed_after_delay() {
        let email = LoggingEmailSender::new(Duration::from_millis(500));
        let sms = LoggingSmsSender::new(Duration::from_millis(500));
        let started = tokio::time::Instant::now();
        let receipt = send_booking_confirmation(&email, &sms, &request())
            .await
            .unwrap();
        assert!(receipt.email_sent && receipt.sms_sent);
        assert!(started.elapsed() >= Duration::from_millis(1000));
    }

    #[test]
    fn start_parses_twelve_and_twenty_four_hour_times() {
        let mut req = request();
        assert_eq!(
            req.start().unwrap().to_rfc3339(),
            "2023-06-05T10:30:00+00:00"
        );
        req.time = "14:00".into();
        assert_eq!(
            req.start().unwrap().to_rfc3339(),
            "2023-06-05T14:00:00+00:00"
        );
        req.time = "after lunch".into();
        assert!(req.start().is_none());
    }
}
