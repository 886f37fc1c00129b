use rust_decimal::Decimal;

use super::digest_model::{DigestConfig, DigestFrequency, DigestSnapshot};
use crate::insights::Insight;
use crate::notifications::EmailMessage;
use crate::users::UserProfile;
use crate::utils::format::{format_percent, format_usd};

const POSITIVE_COLOR: &str = "#16a34a";
const NEGATIVE_COLOR: &str = "#dc2626";

/// Escapes text for safe inclusion in HTML element content and attributes.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

fn change_color(value: Decimal) -> &'static str {
    if value.is_sign_negative() && !value.is_zero() {
        NEGATIVE_COLOR
    } else {
        POSITIVE_COLOR
    }
}

fn render_movers(snapshot: &DigestSnapshot) -> String {
    if snapshot.top_movers.is_empty() {
        return String::new();
    }
    let rows: String = snapshot
        .top_movers
        .iter()
        .map(|m| {
            format!(
                r#"<tr><td style="padding:6px 0">{name} <span style="color:#6b7280">{symbol}</span></td><td style="padding:6px 0;text-align:right">{value}</td><td style="padding:6px 0;text-align:right;color:{color}">{change}</td></tr>"#,
                name = escape_html(&m.coin_name),
                symbol = escape_html(&m.coin_symbol),
                value = format_usd(m.current_value),
                color = change_color(m.profit_loss_percent),
                change = format_percent(m.profit_loss_percent),
            )
        })
        .collect();
    format!(
        r#"<h2 style="font-size:16px;margin:24px 0 8px">Top movers</h2><table style="width:100%;border-collapse:collapse">{}</table>"#,
        rows
    )
}

fn render_insight(insight: &Insight, app_url: &str) -> String {
    match insight {
        Insight::None => String::new(),
        Insight::Basic => format!(
            r#"<div style="margin-top:24px;padding:16px;border-radius:8px;background:#f3f4f6"><strong>Unlock AI insights</strong><p style="margin:8px 0 0">Upgrade to Pro for portfolio summaries, risk analytics and daily digests.</p><p style="margin:8px 0 0"><a href="{}/pricing">See Pro plans</a></p></div>"#,
            escape_html(app_url)
        ),
        Insight::ProSummary { summary, trends } => {
            let items: String = trends
                .iter()
                .map(|t| format!("<li>{}</li>", escape_html(t)))
                .collect();
            format!(
                r#"<div style="margin-top:24px;padding:16px;border-radius:8px;background:#eef2ff"><strong>AI insights</strong><p style="margin:8px 0 0">{}</p><ul style="margin:8px 0 0;padding-left:20px">{}</ul></div>"#,
                escape_html(summary),
                items
            )
        }
    }
}

/// Builds the digest email for one user.
pub fn render_digest_email(
    user: &UserProfile,
    snapshot: &DigestSnapshot,
    insight: &Insight,
    frequency: DigestFrequency,
    config: &DigestConfig,
) -> EmailMessage {
    let app_url = config.app_url.trim_end_matches('/');
    let subject = format!(
        "Your {} portfolio digest: {} ({})",
        frequency.as_str(),
        format_usd(snapshot.total_value),
        format_percent(snapshot.since_purchase_change)
    );

    let html = format!(
        r#"<!DOCTYPE html><html><body style="font-family:Arial,sans-serif;color:#111827;max-width:560px;margin:0 auto;padding:24px"><h1 style="font-size:20px">{label} Digest</h1><p>Hi {name},</p><p>Here is how your {count} holding{plural} performed.</p><table style="width:100%;border-collapse:collapse"><tr><td>Total value</td><td style="text-align:right;font-weight:bold">{value}</td></tr><tr><td>24h change</td><td style="text-align:right;color:{change_color}">{change}</td></tr><tr><td>Profit / loss</td><td style="text-align:right;color:{pl_color}">{pl}</td></tr></table>{movers}{insight}<p style="margin-top:24px"><a href="{url}/dashboard">Open your dashboard</a></p><p style="font-size:12px;color:#6b7280">You receive this email because digests are enabled. <a href="{url}/settings">Manage preferences</a></p></body></html>"#,
        label = frequency.label(),
        name = escape_html(user.greeting_name()),
        count = snapshot.holdings_count,
        plural = if snapshot.holdings_count == 1 { "" } else { "s" },
        value = format_usd(snapshot.total_value),
        change_color = change_color(snapshot.since_purchase_change),
        change = format_percent(snapshot.since_purchase_change),
        pl_color = change_color(snapshot.total_profit_loss),
        pl = format_usd(snapshot.total_profit_loss),
        movers = render_movers(snapshot),
        insight = render_insight(insight, app_url),
        url = escape_html(app_url),
    );

    EmailMessage {
        from: config.from_address.clone(),
        to: user.email.clone(),
        subject,
        html,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::portfolio::holdings::TopMover;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn user(display_name: Option<&str>) -> UserProfile {
        let now = Utc::now().naive_utc();
        UserProfile {
            id: "u1".to_string(),
            email: "alice@example.com".to_string(),
            display_name: display_name.map(str::to_string),
            created_at: now,
            updated_at: now,
        }
    }

    fn snapshot() -> DigestSnapshot {
        DigestSnapshot {
            total_value: dec!(300),
            total_cost: dec!(200),
            total_profit_loss: dec!(100),
            since_purchase_change: dec!(50),
            holdings_count: 1,
            top_movers: vec![TopMover {
                coin_id: "bitcoin".to_string(),
                coin_name: "Bitcoin".to_string(),
                coin_symbol: "BTC".to_string(),
                current_value: dec!(300),
                profit_loss_percent: dec!(50),
            }],
        }
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<b>"Tom" & 'Jerry'</b>"#),
            "&lt;b&gt;&quot;Tom&quot; &amp; &#39;Jerry&#39;&lt;/b&gt;"
        );
    }

    #[test]
    fn test_render_contains_totals_and_labels() {
        let message = render_digest_email(
            &user(Some("Alice")),
            &snapshot(),
            &Insight::Basic,
            DigestFrequency::Weekly,
            &DigestConfig::default(),
        );
        assert_eq!(message.to, "alice@example.com");
        assert_eq!(message.from, "Coinfolio <digest@coinfolio.app>");
        assert_eq!(message.subject, "Your weekly portfolio digest: $300.00 (+50.00%)");
        assert!(message.html.contains("$300.00"));
        assert!(message.html.contains("24h change"));
        assert!(message.html.contains("+50.00%"));
        assert!(message.html.contains("Bitcoin"));
        assert!(message.html.contains("Upgrade to Pro"));
        assert!(message.html.contains("http://localhost:3000/dashboard"));
    }

    #[test]
    fn test_user_strings_are_escaped() {
        let message = render_digest_email(
            &user(Some("<script>alert(1)</script>")),
            &snapshot(),
            &Insight::ProSummary {
                summary: "a & b".to_string(),
                trends: vec!["<i>x</i>".to_string()],
            },
            DigestFrequency::Daily,
            &DigestConfig::default(),
        );
        assert!(!message.html.contains("<script>"));
        assert!(message.html.contains("&lt;script&gt;"));
        assert!(message.html.contains("a &amp; b"));
        assert!(message.html.contains("<li>&lt;i&gt;x&lt;/i&gt;</li>"));
    }

    #[test]
    fn test_insight_none_renders_no_block() {
        let message = render_digest_email(
            &user(None),
            &snapshot(),
            &Insight::None,
            DigestFrequency::Weekly,
            &DigestConfig::default(),
        );
        assert!(!message.html.contains("AI insights"));
        assert!(!message.html.contains("Upgrade to Pro"));
        assert!(message.html.contains("Hi alice,"));
    }
}
