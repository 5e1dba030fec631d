use chrono::NaiveDate;
use html_escape::{encode_double_quoted_attribute, encode_text};
use url::Url;

const BRAND_NAME: &str = "subdesk";

fn origin_label(app_origin: &str) -> String {
    Url::parse(app_origin)
        .ok()
        .and_then(|url| url.host_str().map(|host| host.to_string()))
        .unwrap_or_else(|| encode_text(app_origin).into_owned())
}

fn format_day(day: NaiveDate) -> String {
    day.format("%B %-d, %Y").to_string()
}

pub fn primary_button(url: &str, label: &str) -> String {
    let url = encode_double_quoted_attribute(url);
    let label = encode_text(label);
    format!(
        r#"<a href="{url}" style="display:inline-block;padding:12px 18px;background-color:#111827;color:#ffffff;text-decoration:none;border-radius:8px;font-weight:600;">{label}</a>"#
    )
}

pub fn signup_received_email(app_origin: &str, full_name: &str, plan: &str, is_trial: bool) -> (String, String) {
    let name = encode_text(full_name);
    let plan = encode_text(plan);
    let subject = format!("Welcome to {}", BRAND_NAME);
    let headline = format!("Thanks for signing up, {}", name);
    let lead = format!("We've received your details for the <strong>{}</strong> plan.", plan);
    let body = if is_trial {
        format!(
            r#"<p style="margin:12px 0 0;color:#374151;">Your free trial is active now and runs for {} days.</p>"#,
            crate::domain::lifecycle::FREE_TRIAL_DAYS
        )
    } else {
        r#"<p style="margin:12px 0 0;color:#374151;">Your subscription will be activated as soon as we've confirmed your payment. We'll email you when that happens.</p>"#.to_string()
    };
    let reason = format!("you signed up for the {} plan", plan);

    let html = wrap_email(app_origin, &headline, &lead, &body, &reason);
    (subject, html)
}

pub fn payment_confirmed_email(app_origin: &str, full_name: &str, plan: &str, due: NaiveDate) -> (String, String) {
    let name = encode_text(full_name);
    let plan = encode_text(plan);
    let subject = "Your payment has been confirmed".to_string();
    let headline = "Payment confirmed";
    let lead = format!(
        "Hi {}, your <strong>{}</strong> subscription is active.",
        name, plan
    );
    let body = format!(
        r#"<p style="margin:12px 0 0;color:#374151;">Your next renewal is due on <strong>{}</strong>.</p>"#,
        format_day(due)
    );
    let reason = format!("your {} subscription was paid", plan);

    let html = wrap_email(app_origin, headline, &lead, &body, &reason);
    (subject, html)
}

pub fn renewal_reminder_email(app_origin: &str, full_name: &str, plan: &str, due: NaiveDate) -> (String, String) {
    let name = encode_text(full_name);
    let plan = encode_text(plan);
    let due_label = format_day(due);
    let subject = format!("Your subscription renews on {}", due_label);
    let headline = "Your subscription is about to renew";
    let lead = format!(
        "Hi {}, your <strong>{}</strong> subscription is due on <strong>{}</strong>.",
        name, plan, due_label
    );
    let button = primary_button(app_origin, "Renew now");
    let body = format!(
        r#"{button}<p style="margin:12px 0 0;color:#374151;">Renew before the due date to keep your access without interruption.</p>"#
    );
    let reason = format!("you have an active {} subscription", plan);

    let html = wrap_email(app_origin, headline, &lead, &body, &reason);
    (subject, html)
}

pub fn wrap_email(app_origin: &str, headline: &str, lead: &str, body_html: &str, reason: &str) -> String {
    let origin = origin_label(app_origin);
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
  <body style="background:#f8fafc;margin:0;padding:24px;font-family:Arial,Helvetica,sans-serif;">
    <div style="max-width:560px;margin:0 auto;background:#ffffff;border:1px solid #e5e7eb;border-radius:12px;padding:24px;">
      <div style="font-size:12px;letter-spacing:0.08em;text-transform:uppercase;color:#6b7280;">{brand} - {origin}</div>
      <h1 style="margin:12px 0 8px;font-size:22px;color:#111827;">{headline}</h1>
      <p style="margin:0 0 12px;font-size:15px;color:#111827;line-height:1.6;">{lead}</p>
      {body_html}
      <div style="margin-top:20px;padding-top:16px;border-top:1px solid #e5e7eb;">
        <p style="margin:0;font-size:13px;color:#4b5563;">Why you got this email: {reason}.</p>
      </div>
      <p style="margin:14px 0 0;font-size:12px;color:#9ca3af;">Sent by {brand} - {origin}</p>
    </div>
  </body>
</html>
"#,
        brand = BRAND_NAME,
    )
}
