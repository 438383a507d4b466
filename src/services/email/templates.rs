//! HTML bodies for the three transactional emails. Styling is inline so the
//! plain-text fallback produced by `strip_html` stays readable.

fn greeting(name: Option<&str>) -> String {
    match name {
        Some(name) => format!("Hello {},", name),
        None => "Hello,".to_string(),
    }
}

fn code_block(code: &str, color: &str) -> String {
    format!(
        r#"<div style="text-align:center;margin:30px 0;padding:20px;border:2px solid #e2e8f0;border-radius:8px;">
  <span style="font-size:32px;font-weight:bold;letter-spacing:8px;font-family:monospace;color:{};">{}</span>
</div>"#,
        color, code
    )
}

fn footer() -> &'static str {
    r#"<p style="font-size:14px;color:#6b7280;">This is an automated message, please do not reply.</p>"#
}

pub fn mfa_code(code: &str, name: Option<&str>) -> String {
    format!(
        r#"<html><body style="font-family:sans-serif;max-width:600px;margin:0 auto;">
<h1>Verification code</h1>
<p>{greeting}</p>
<p>You requested access to your account. Use the following code to complete sign-in:</p>
{code}
<p><strong>Important:</strong> this code is valid for a limited time and can be used only once.
If you did not request it, ignore this email.</p>
{footer}
</body></html>"#,
        greeting = greeting(name),
        code = code_block(code, "#1e40af"),
        footer = footer(),
    )
}

pub fn password_reset(code: &str, name: Option<&str>) -> String {
    format!(
        r#"<html><body style="font-family:sans-serif;max-width:600px;margin:0 auto;">
<h1>Password reset</h1>
<p>{greeting}</p>
<p>You requested a password reset. Use the following code to continue:</p>
{code}
<p><strong>Important:</strong> this code can be used only once.
If you did not request this, change your password immediately.</p>
{footer}
</body></html>"#,
        greeting = greeting(name),
        code = code_block(code, "#dc2626"),
        footer = footer(),
    )
}

pub fn welcome(name: Option<&str>) -> String {
    format!(
        r#"<html><body style="font-family:sans-serif;max-width:600px;margin:0 auto;">
<h1>Welcome aboard!</h1>
<p>{greeting}</p>
<p>Your account has been created successfully. Sign-ins are protected with
email verification codes: enter your email and password, then the code we
send you.</p>
{footer}
</body></html>"#,
        greeting = greeting(name),
        footer = footer(),
    )
}

/// Plain-text fallback: drops tags and collapses whitespace.
pub fn strip_html(html: &str) -> String {
    let mut text = String::with_capacity(html.len());
    let mut in_tag = false;

    for c in html.chars() {
        match c {
            '<' => in_tag = true,
            '>' => {
                in_tag = false;
                text.push(' ');
            }
            c if !in_tag => text.push(c),
            _ => {}
        }
    }

    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
