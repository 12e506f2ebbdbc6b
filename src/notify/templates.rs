//! HTML email bodies rendered with askama.

use askama::Template;
use chrono::{Datelike, Utc};

use super::{EmailAttachment, OutboundEmail};
use crate::config::MailConfig;
use crate::errors::AppError;
use crate::models::{format_money, ContactRequest, Order};

/// Invoice reference length used in subjects and attachment names.
const INVOICE_REF_LEN: usize = 8;

/// One order line as shown in email tables.
pub struct LineView {
    pub name: String,
    pub quantity: i64,
    pub price: String,
}

impl LineView {
    fn from_order(order: &Order) -> Vec<Self> {
        order
            .items
            .iter()
            .map(|item| Self {
                name: item.name.clone(),
                quantity: item.quantity,
                price: format_money(item.price),
            })
            .collect()
    }
}

#[derive(Template)]
#[template(path = "email/order_confirmation.html")]
struct OrderConfirmationTemplate<'a> {
    company_name: &'a str,
    footer_text: String,
    order: &'a Order,
    provider: String,
    address_lines: Vec<String>,
    lines: Vec<LineView>,
    subtotal: String,
    processing_fee: String,
    show_shipping: bool,
    shipping_cost: String,
    total: String,
    support_email: &'a str,
}

#[derive(Template)]
#[template(path = "email/admin_alert.html")]
struct AdminAlertTemplate<'a> {
    order: &'a Order,
    reference: String,
    lines: Vec<LineView>,
    total: String,
}

#[derive(Template)]
#[template(path = "email/invoice.html")]
struct InvoiceEmailTemplate<'a> {
    company_name: &'a str,
    footer_text: String,
    reference: String,
    total: String,
    support_email: &'a str,
}

#[derive(Template)]
#[template(path = "email/payment_link.html")]
struct PaymentLinkTemplate<'a> {
    company_name: &'a str,
    customer_name: String,
    payment_link: &'a str,
}

#[derive(Template)]
#[template(path = "email/contact.html")]
struct ContactTemplate<'a> {
    company_name: &'a str,
    request: &'a ContactRequest,
}

fn footer_text(mail: &MailConfig) -> String {
    format!(
        "© {} {}. All rights reserved.",
        Utc::now().year(),
        mail.from_name
    )
}

/// Street, optional second line, then "city, state, zip"; blanks dropped.
fn address_lines(order: &Order) -> Vec<String> {
    let address = &order.shipping_address;
    let locality = [&address.city, &address.state, &address.zip]
        .into_iter()
        .filter(|part| !part.trim().is_empty())
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ");

    [
        Some(address.street.clone()),
        address.street2.clone(),
        Some(locality),
    ]
    .into_iter()
    .flatten()
    .filter(|line| !line.trim().is_empty())
    .collect()
}

/// Confirmation sent to the customer after checkout.
pub fn order_confirmation_email(order: &Order, mail: &MailConfig) -> Result<OutboundEmail, AppError> {
    let provider = format!("{} {}", order.title, order.customer_name())
        .trim()
        .to_string();

    let html = OrderConfirmationTemplate {
        company_name: &mail.from_name,
        footer_text: footer_text(mail),
        order,
        provider,
        address_lines: address_lines(order),
        lines: LineView::from_order(order),
        subtotal: format_money(order.subtotal),
        processing_fee: format_money(order.processing_fee),
        show_shipping: order.shipping_cost > 0.0,
        shipping_cost: format_money(order.shipping_cost),
        total: format_money(order.total),
        support_email: &mail.from_address,
    }
    .render()?;

    Ok(OutboundEmail {
        to: order.email.clone(),
        reply_to: Some(mail.from_address.clone()),
        subject: format!(
            "Order Invoice #{} - {}",
            order.reference(INVOICE_REF_LEN),
            mail.from_name
        ),
        html,
        attachment: None,
    })
}

/// New-order notice for the shop owner.
pub fn admin_alert_email(order: &Order, mail: &MailConfig) -> Result<OutboundEmail, AppError> {
    let reference = order.reference(INVOICE_REF_LEN);
    let total = format_money(order.total);

    let html = AdminAlertTemplate {
        order,
        reference: reference.clone(),
        lines: LineView::from_order(order),
        total: total.clone(),
    }
    .render()?;

    Ok(OutboundEmail {
        to: mail.admin_alert_address.clone(),
        reply_to: None,
        subject: format!("New Order Alert! #{} - ${}", reference, total),
        html,
        attachment: None,
    })
}

/// Invoice email with the PDF attached.
pub fn invoice_email(
    order: &Order,
    pdf: Vec<u8>,
    mail: &MailConfig,
) -> Result<OutboundEmail, AppError> {
    let reference = order.reference(INVOICE_REF_LEN);

    let html = InvoiceEmailTemplate {
        company_name: &mail.from_name,
        footer_text: footer_text(mail),
        reference: reference.clone(),
        total: format_money(order.total),
        support_email: &mail.from_address,
    }
    .render()?;

    Ok(OutboundEmail {
        to: order.email.clone(),
        reply_to: Some(mail.from_address.clone()),
        subject: format!("Invoice #{} - {} (Resent)", reference, mail.from_name),
        html,
        attachment: Some(EmailAttachment {
            filename: format!("Invoice-{}.pdf", reference),
            content_type: "application/pdf".to_string(),
            content: pdf,
        }),
    })
}

/// Payment request sent from the admin console.
pub fn payment_link_email(
    order: &Order,
    payment_link: &str,
    mail: &MailConfig,
) -> Result<OutboundEmail, AppError> {
    let html = PaymentLinkTemplate {
        company_name: &mail.from_name,
        customer_name: order.customer_name(),
        payment_link,
    }
    .render()?;

    Ok(OutboundEmail {
        to: order.email.clone(),
        reply_to: Some(mail.from_address.clone()),
        subject: "Payment Link for Your Order".to_string(),
        html,
        attachment: None,
    })
}

/// Contact form submission forwarded to the shop owner; replies go to the sender.
pub fn contact_email(request: &ContactRequest, mail: &MailConfig) -> Result<OutboundEmail, AppError> {
    let html = ContactTemplate {
        company_name: &mail.from_name,
        request,
    }
    .render()?;

    Ok(OutboundEmail {
        to: mail.admin_alert_address.clone(),
        reply_to: Some(request.email.trim().to_string()),
        subject: format!(
            "New Contact Form Submission from {} {}",
            request.first_name.trim(),
            request.last_name.trim()
        ),
        html,
        attachment: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{OrderItem, OrderStatus, ShippingAddress};

    fn mail() -> MailConfig {
        MailConfig {
            smtp_host: "smtp.example.com".to_string(),
            smtp_port: 465,
            smtp_user: None,
            smtp_pass: None,
            from_address: "support@example.com".to_string(),
            from_name: "BioVibe Peptides".to_string(),
            admin_alert_address: "owner@example.com".to_string(),
        }
    }

    fn order() -> Order {
        Order {
            id: "0f8fad5b-d9cb-469f-a165-70867728950e".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            title: "Dr.".to_string(),
            practice_name: "Analytical <Clinic>".to_string(),
            email: "ada@example.com".to_string(),
            phone: String::new(),
            shipping_address: ShippingAddress {
                street: "1 Main St".to_string(),
                street2: None,
                city: "Austin".to_string(),
                state: "TX".to_string(),
                zip: "78701".to_string(),
                country: "USA".to_string(),
            },
            shipping_option: "Express".to_string(),
            shipping_cost: 15.0,
            items: vec![OrderItem {
                product_id: None,
                name: "BPC-157".to_string(),
                quantity: 2,
                price: 1200.0,
            }],
            subtotal: 1200.0,
            processing_fee: 60.0,
            total: 1275.0,
            status: OrderStatus::Pending,
            payment_link: None,
            notes: String::new(),
            referral: String::new(),
            created_at: "2024-03-05T10:00:00Z".to_string(),
            updated_at: "2024-03-05T10:00:00Z".to_string(),
        }
    }

    #[test]
    fn test_order_confirmation_content() {
        let email = order_confirmation_email(&order(), &mail()).unwrap();
        assert_eq!(email.to, "ada@example.com");
        assert_eq!(email.subject, "Order Invoice #7728950E - BioVibe Peptides");
        assert!(email.html.contains("Dr. Ada Lovelace"));
        assert!(email.html.contains("1,275.00"));
        assert!(email.html.contains("Austin, TX, 78701"));
        assert!(email.html.contains("Express"));
        // Customer input is escaped
        assert!(email.html.contains("Analytical &lt;Clinic&gt;"));
    }

    #[test]
    fn test_confirmation_hides_free_shipping() {
        let mut order = order();
        order.shipping_cost = 0.0;
        let email = order_confirmation_email(&order, &mail()).unwrap();
        assert!(!email.html.contains("Express"));
    }

    #[test]
    fn test_admin_alert_goes_to_owner() {
        let email = admin_alert_email(&order(), &mail()).unwrap();
        assert_eq!(email.to, "owner@example.com");
        assert_eq!(email.subject, "New Order Alert! #7728950E - $1,275.00");
        assert!(email.html.contains("2x BPC-157"));
    }

    #[test]
    fn test_invoice_email_attaches_pdf() {
        let email = invoice_email(&order(), b"%PDF".to_vec(), &mail()).unwrap();
        let attachment = email.attachment.unwrap();
        assert_eq!(attachment.filename, "Invoice-7728950E.pdf");
        assert_eq!(attachment.content_type, "application/pdf");
        assert!(email.subject.ends_with("(Resent)"));
    }

    #[test]
    fn test_payment_link_email() {
        let email =
            payment_link_email(&order(), "https://pay.example.com/abc", &mail()).unwrap();
        assert_eq!(email.subject, "Payment Link for Your Order");
        assert!(email.html.contains("Dear Ada Lovelace"));
        assert!(email.html.contains("pay.example.com"));
    }

    #[test]
    fn test_contact_email_replies_to_sender() {
        let request = ContactRequest {
            first_name: "Grace".to_string(),
            last_name: "Hopper".to_string(),
            email: "grace@example.com".to_string(),
            message: "Do you ship to Canada?".to_string(),
        };
        let email = contact_email(&request, &mail()).unwrap();
        assert_eq!(email.to, "owner@example.com");
        assert_eq!(email.reply_to.as_deref(), Some("grace@example.com"));
        assert_eq!(
            email.subject,
            "New Contact Form Submission from Grace Hopper"
        );
        assert!(email.html.contains("Do you ship to Canada?"));
    }
}
