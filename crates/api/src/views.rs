//! Server-rendered HTML pages.
//!
//! Every interpolated value goes through [`html_escape`]. Figures on the stats
//! page carry stable element ids (`user-count`, `total-avg`, ...).

use axum::http::StatusCode;
use rust_decimal::Decimal;

use pricestats_products::{Field, StatsReport, ValidationErrors};

use crate::context::CurrentUser;

fn layout(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title}</title>
</head>
<body>
{body}
</body>
</html>
"#,
        title = html_escape(title),
    )
}

fn nav(user: &CurrentUser) -> String {
    format!(
        r#"<nav>
<span>Signed in as <strong>{username}</strong></span>
<a href="/create/">Add product</a>
<a href="/stats/{id}/">Statistics</a>
<form method="post" action="/logout/" style="display:inline"><button type="submit">Log out</button></form>
</nav>"#,
        username = html_escape(user.username().as_str()),
        id = user.user_id(),
    )
}

pub fn login_page(username: &str, next: Option<&str>, error: Option<&str>) -> String {
    let error = error
        .map(|e| format!(r#"<p class="error" id="login-error">{}</p>"#, html_escape(e)))
        .unwrap_or_default();

    let body = format!(
        r#"<h1>Log in</h1>
{error}
<form method="post" action="/">
<input type="hidden" name="next" value="{next}">
<label>Username <input type="text" name="username" value="{username}" maxlength="150" required></label>
<label>Password <input type="password" name="password" required></label>
<button type="submit">Log in</button>
</form>"#,
        next = html_escape(next.unwrap_or_default()),
        username = html_escape(username),
    );
    layout("Log in", &body)
}

pub fn create_page(
    user: &CurrentUser,
    name: &str,
    price: &str,
    errors: Option<&ValidationErrors>,
) -> String {
    let field_error = |field: Field| {
        errors
            .and_then(|e| e.for_field(field))
            .map(|e| {
                format!(
                    r#"<p class="error" id="{field}-error">{}</p>"#,
                    html_escape(&e.kind.to_string()),
                )
            })
            .unwrap_or_default()
    };

    let body = format!(
        r#"{nav}
<h1>New product</h1>
<form method="post" action="/create/">
<label>Name <input type="text" name="name" value="{name}" maxlength="100"></label>
{name_error}
<label>Price <input type="text" name="price" value="{price}" inputmode="decimal"></label>
{price_error}
<button type="submit">Save</button>
</form>"#,
        nav = nav(user),
        name = html_escape(name),
        price = html_escape(price),
        name_error = field_error(Field::Name),
        price_error = field_error(Field::Price),
    );
    layout("New product", &body)
}

pub fn stats_page(user: &CurrentUser, report: &StatsReport) -> String {
    let mut sections = String::new();

    if let Some(mine) = &report.user {
        sections.push_str(&format!(
            r#"<section id="user-stats">
<h2>Your products</h2>
<dl>
<dt>Products</dt><dd id="user-count">{count}</dd>
<dt>Highest price</dt><dd id="user-max">{max}</dd>
<dt>Sum of prices</dt><dd id="user-sum">{sum}</dd>
</dl>
<a href="/increase/{id}/">Raise all my prices by 1</a>
</section>
"#,
            count = mine.count,
            max = money(mine.max_price),
            sum = money(mine.sum_price),
            id = user.user_id(),
        ));
    } else {
        sections.push_str("<p id=\"user-empty\">You have not added any products yet.</p>\n");
    }

    if let Some(all) = &report.global {
        sections.push_str(&format!(
            r#"<section id="total-stats">
<h2>All products</h2>
<dl>
<dt>Products</dt><dd id="total-count">{count}</dd>
<dt>Average price</dt><dd id="total-avg">{avg}</dd>
</dl>
</section>
"#,
            count = all.count,
            avg = money(all.avg_price),
        ));
    }

    sections.push_str(&format!(
        r#"<section id="conditional-stats">
<h2>Conditional sum</h2>
<p id="conditional-sum">{}</p>
</section>"#,
        money(Some(report.conditional_sum.total)),
    ));

    let body = format!("{}\n<h1>Statistics</h1>\n{}", nav(user), sections);
    layout("Statistics", &body)
}

pub fn error_page(status: StatusCode, message: &str) -> String {
    let body = format!(
        "<h1>{}</h1>\n<p>{}</p>\n<a href=\"/\">Back</a>",
        status.as_u16(),
        html_escape(message),
    );
    layout(status.canonical_reason().unwrap_or("Error"), &body)
}

/// Two fractional digits; `-` for "no value".
fn money(value: Option<Decimal>) -> String {
    match value {
        Some(v) => format!("{:.2}", v.round_dp(2)),
        None => "-".to_string(),
    }
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}
