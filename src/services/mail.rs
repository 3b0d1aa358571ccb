//! 邮件发送
//!
//! `mail.smtp_host` 为空时不发送，只记录日志。

use std::sync::OnceLock;

use lettre::message::{Mailbox, Message, header};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Tokio1Executor};
use tracing::{info, warn};

use crate::config::{AppConfig, MailConfig};
use crate::errors::{Result, SchoolError};
use crate::models::payments::entities::Payment;

static MAILER: OnceLock<Option<Mailer>> = OnceLock::new();

pub struct Mailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl Mailer {
    pub fn from_config(config: &MailConfig) -> Result<Option<Self>> {
        if config.smtp_host.trim().is_empty() {
            return Ok(None);
        }

        let from = config
            .from
            .parse::<Mailbox>()
            .map_err(|e| SchoolError::mail(format!("Invalid mail.from address: {e}")))?;

        let builder = if config.use_starttls {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_host)
        }?
        .port(config.smtp_port);

        let builder = if config.smtp_username.is_empty() {
            builder
        } else {
            builder.credentials(Credentials::new(
                config.smtp_username.clone(),
                config.smtp_password.clone(),
            ))
        };

        Ok(Some(Self {
            transport: builder.build(),
            from,
        }))
    }

    /// 全局实例，配置错误时视为未启用
    pub fn global() -> Option<&'static Mailer> {
        MAILER
            .get_or_init(|| match Self::from_config(&AppConfig::get().mail) {
                Ok(mailer) => {
                    if mailer.is_none() {
                        info!("SMTP host not configured, outgoing mail disabled");
                    }
                    mailer
                }
                Err(e) => {
                    warn!("Mail transport disabled: {}", e);
                    None
                }
            })
            .as_ref()
    }

    pub async fn send_text(&self, recipient: &str, subject: &str, body: String) -> Result<()> {
        let to = recipient
            .parse::<Mailbox>()
            .map_err(|e| SchoolError::mail(format!("Invalid recipient address: {e}")))?;

        let email = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(subject)
            .header(header::ContentType::TEXT_PLAIN)
            .body(body)?;

        self.transport.send(email).await?;
        info!(subject, "mail sent");
        Ok(())
    }
}

/// 金额（最小货币单位）格式化为两位小数
pub fn format_amount(amount: i64, currency: &str) -> String {
    let sign = if amount < 0 { "-" } else { "" };
    let abs = amount.unsigned_abs();
    format!("{sign}{currency} {}.{:02}", abs / 100, abs % 100)
}

pub fn payment_receipt_body(school: &str, student_name: &str, payment: &Payment, currency: &str) -> String {
    let mut body = format!(
        "Dear {student_name},\n\n\
         {school} has received your payment.\n\n\
         Receipt no.: {}\n\
         Date: {}\n\
         Amount: {}\n\
         Method: {}\n\
         Classes added: {}\n",
        payment.id,
        payment.paid_on,
        format_amount(payment.amount, currency),
        payment.method,
        payment.credits,
    );
    if let Some(reference) = &payment.reference {
        body.push_str(&format!("Reference: {reference}\n"));
    }
    body.push_str("\nThank you.\n");
    body
}

/// 后台发送收款回执，失败只记日志
pub fn spawn_payment_receipt(recipient: String, student_name: String, payment: Payment) {
    let Some(mailer) = Mailer::global() else {
        return;
    };
    let school = &AppConfig::get().school;
    let subject = format!("{} payment receipt #{}", school.name, payment.id);
    let body = payment_receipt_body(&school.name, &student_name, &payment, &school.currency);

    tokio::spawn(async move {
        if let Err(e) = mailer.send_text(&recipient, &subject, body).await {
            warn!("Failed to send receipt for payment {}: {}", payment.id, e);
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::payments::entities::PaymentMethod;

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(123456, "INR"), "INR 1234.56");
        assert_eq!(format_amount(5, "USD"), "USD 0.05");
        assert_eq!(format_amount(-250, "USD"), "-USD 2.50");
    }

    #[test]
    fn test_receipt_body_mentions_credits() {
        let payment = Payment {
            id: 12,
            student_id: 1,
            enrollment_id: None,
            package_id: None,
            amount: 400000,
            credits: 8,
            method: PaymentMethod::Upi,
            paid_on: chrono::NaiveDate::from_ymd_opt(2024, 9, 1).unwrap(),
            reference: Some("UTR123".into()),
            notes: None,
            recorded_by: 1,
            created_at: chrono::Utc::now(),
        };
        let body = payment_receipt_body("Harmony", "Asha Rao", &payment, "INR");
        assert!(body.contains("Receipt no.: 12"));
        assert!(body.contains("INR 4000.00"));
        assert!(body.contains("Classes added: 8"));
        assert!(body.contains("Reference: UTR123"));
    }

    #[test]
    fn test_empty_host_disables_mail() {
        let config = MailConfig {
            smtp_host: String::new(),
            smtp_port: 587,
            smtp_username: String::new(),
            smtp_password: String::new(),
            from: "School <office@school.test>".into(),
            use_starttls: true,
        };
        assert!(Mailer::from_config(&config).unwrap().is_none());
    }
}
