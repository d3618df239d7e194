//! HTML rendering for the interactive page
//!
//! Plain string building; every piece of ledger, user or model text passes
//! through [`escape_html`].

use std::fmt::Write;

use axum::{http::StatusCode, response::Html};

use kakeibo_core::ledger::whole_amount;
use kakeibo_core::{ConversationEntry, Ledger, Role};

const STYLE: &str = r#"
body { font-family: system-ui, sans-serif; max-width: 960px; margin: 2rem auto; padding: 0 1rem; color: #222; }
h1 { font-size: 1.6rem; }
table { border-collapse: collapse; width: 100%; font-size: 0.9rem; }
th, td { border-bottom: 1px solid #ddd; padding: 0.3rem 0.5rem; text-align: left; }
td.amount { text-align: right; font-variant-numeric: tabular-nums; }
td.income { color: #1a7f37; }
td.expense { color: #b42318; }
.ledger { max-height: 24rem; overflow-y: auto; margin-bottom: 1.5rem; }
.summary { display: flex; gap: 2rem; margin: 1rem 0; }
.error { background: #fdecea; border: 1px solid #f5c2c0; padding: 0.75rem; margin: 1rem 0; }
.entry { padding: 0.75rem; margin: 0.5rem 0; border-radius: 6px; white-space: pre-wrap; }
.entry.user { background: #eef4ff; }
.entry.assistant { background: #f3f3f3; }
.entry .role { font-weight: bold; display: block; margin-bottom: 0.25rem; }
form.question { display: flex; gap: 0.5rem; margin-top: 1rem; }
form.question input { flex: 1; padding: 0.4rem; }
"#;

/// Escape text for use in HTML element content and attribute values
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
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

/// Render the full page for one session
pub fn render(
    session_id: &str,
    ledger: &Ledger,
    entries: &[ConversationEntry],
    flash: Option<&str>,
) -> String {
    let summary = ledger.summarize();
    let session_id = escape_html(session_id);
    let mut html = String::new();

    // Writing into a String cannot fail
    let _ = write!(
        html,
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Kakeibo - AI budgeting advisor</title>
<style>{STYLE}</style>
</head>
<body>
<h1>Kakeibo - AI budgeting advisor</h1>
"#
    );

    let _ = write!(
        html,
        r#"<div class="summary">
<div>Income: <strong>{} yen</strong></div>
<div>Expense: <strong>{} yen</strong></div>
<div>Balance: <strong>{} yen</strong></div>
</div>
"#,
        whole_amount(summary.total_income),
        whole_amount(summary.total_expense),
        whole_amount(summary.balance),
    );

    html.push_str(
        "<h2>Transactions</h2>\n<div class=\"ledger\">\n<table>\n\
         <thead><tr><th>Date</th><th>Category</th><th>Description</th><th>Amount (yen)</th></tr></thead>\n<tbody>\n",
    );
    for tx in ledger.transactions() {
        let class = if tx.is_income() { "income" } else { "expense" };
        let _ = writeln!(
            html,
            r#"<tr><td>{}</td><td>{}</td><td>{}</td><td class="amount {}">{}</td></tr>"#,
            tx.date.format("%Y-%m-%d"),
            escape_html(tx.category.label()),
            escape_html(&tx.description),
            class,
            whole_amount(tx.amount),
        );
    }
    if ledger.is_empty() {
        html.push_str("<tr><td colspan=\"4\">No transactions.</td></tr>\n");
    }
    html.push_str("</tbody>\n</table>\n</div>\n");

    let _ = write!(
        html,
        r#"<form method="post" action="/sessions/{session_id}/advice">
<button type="submit">Get advice</button>
</form>
"#
    );

    if let Some(message) = flash {
        let _ = writeln!(
            html,
            r#"<div class="error" role="alert">{}</div>"#,
            escape_html(message)
        );
    }

    html.push_str("<h2>Conversation</h2>\n");
    for entry in entries {
        let label = match entry.role {
            Role::User => "You",
            Role::Assistant => "Advisor",
        };
        let _ = writeln!(
            html,
            r#"<div class="entry {}"><span class="role">{}</span>{}</div>"#,
            entry.role.as_str(),
            label,
            escape_html(&entry.content),
        );
    }

    let _ = write!(
        html,
        r#"<form class="question" method="post" action="/sessions/{session_id}/questions">
<input type="text" name="question" placeholder="Ask about your budget" autocomplete="off">
<button type="submit">Ask</button>
</form>
</body>
</html>
"#
    );

    html
}

/// Page shown when the ledger cannot be loaded
pub fn error_page(message: &str) -> (StatusCode, Html<String>) {
    let body = format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head><meta charset="utf-8"><title>Kakeibo - error</title><style>{STYLE}</style></head>
<body>
<h1>Kakeibo</h1>
<div class="error" role="alert">{}</div>
<p><a href="/">Start over</a></p>
</body>
</html>
"#,
        escape_html(message)
    );
    (StatusCode::INTERNAL_SERVER_ERROR, Html(body))
}
