//! Email bodies.
//!
//! Every value that originates from a customer or an admin is HTML-escaped
//! before it is interpolated.

use crate::{
    domain::{
        orders::records::OrderRecord, pricing::format_minor, promotions::records::PromoCodeRecord,
    },
    notifications::mailer::EmailMessage,
};

const STORE_NAME: &str = "FreshMart";

/// Escape text for inclusion in HTML element content or attribute values.
pub fn escape_html(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());

    for c in input.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }

    escaped
}

fn greeting(name: &str) -> String {
    let name = name.trim();

    if name.is_empty() {
        "Hello,".to_string()
    } else {
        format!("Hello {},", escape_html(name))
    }
}

fn code_block(code: &PromoCodeRecord) -> String {
    let minimum = if code.min_order_amount > 0 {
        format!(
            "<p>Valid on orders of {} or more.</p>",
            format_minor(code.min_order_amount)
        )
    } else {
        String::new()
    };

    format!(
        "<p style=\"font-size:24px;font-weight:bold;letter-spacing:4px\">{code}</p>\
         <p>{discount} your next order. Use it before {until}.</p>{minimum}",
        code = escape_html(&code.code),
        discount = escape_html(&code.discount.to_string()),
        until = code.valid_until.strftime("%Y-%m-%d"),
    )
}

fn wrap(body: &str) -> String {
    format!(
        "<!DOCTYPE html><html><body style=\"font-family:sans-serif\">{body}\
         <p>Thanks for shopping with {STORE_NAME}.</p></body></html>"
    )
}

/// Welcome code sent after a customer's first order.
pub fn welcome_code(recipient_name: &str, code: &PromoCodeRecord) -> EmailMessage {
    EmailMessage {
        to: code.recipient_email.clone(),
        subject: format!("Welcome to {STORE_NAME}! Here's a gift for your next order"),
        html_body: wrap(&format!(
            "<p>{greeting}</p><p>Thank you for your first order. Here is your welcome code:</p>{block}",
            greeting = greeting(recipient_name),
            block = code_block(code),
        )),
    }
}

/// Code earned by an order that matched a promo event.
pub fn campaign_code(recipient_name: &str, code: &PromoCodeRecord) -> EmailMessage {
    EmailMessage {
        to: code.recipient_email.clone(),
        subject: format!("You unlocked a {STORE_NAME} reward"),
        html_body: wrap(&format!(
            "<p>{greeting}</p><p>Your order qualified for our <strong>{event}</strong> promotion.</p>{block}",
            greeting = greeting(recipient_name),
            event = escape_html(&code.event_name),
            block = code_block(code),
        )),
    }
}

/// Code sent to a new promo email subscriber.
pub fn subscription_code(code: &PromoCodeRecord) -> EmailMessage {
    EmailMessage {
        to: code.recipient_email.clone(),
        subject: format!("Thanks for subscribing to {STORE_NAME} offers"),
        html_body: wrap(&format!(
            "<p>Hello,</p><p>You're on the list. Here is a code to get you started:</p>{block}",
            block = code_block(code),
        )),
    }
}

/// Notice that an order has been delivered.
pub fn delivery_notification(order: &OrderRecord) -> EmailMessage {
    let info = &order.delivery_info;

    let address = [&info.address, &info.city, &info.state, &info.zip]
        .into_iter()
        .map(|part| part.trim())
        .filter(|part| !part.is_empty())
        .map(escape_html)
        .collect::<Vec<_>>()
        .join(", ");

    EmailMessage {
        to: info.email.clone(),
        subject: format!("Your {STORE_NAME} order has been delivered"),
        html_body: wrap(&format!(
            "<p>{greeting}</p><p>Your order <strong>{order}</strong> has been delivered{to}.</p>\
             <p>Order total: {total}</p>",
            greeting = greeting(&info.name),
            order = order.uuid,
            to = if address.is_empty() {
                String::new()
            } else {
                format!(" to {address}")
            },
            total = format_minor(order.totals.total),
        )),
    }
}
