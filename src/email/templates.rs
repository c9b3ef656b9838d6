//! Email template system
//!
//! Variables are specified using {{variable_name}} syntax.

use std::collections::HashMap;

/// Available email templates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmailTemplate {
    /// One-time code for comment verification
    CommentOtp,
    /// Sent to a blog owner after signup
    Welcome,
}

impl EmailTemplate {
    pub fn subject(&self) -> &'static str {
        match self {
            Self::CommentOtp => "Your verification code: {{code}}",
            Self::Welcome => "Welcome to {{app_name}}, {{blog_name}} is live",
        }
    }

    pub fn html_body(&self) -> &'static str {
        match self {
            Self::CommentOtp => COMMENT_OTP_TEMPLATE,
            Self::Welcome => WELCOME_TEMPLATE,
        }
    }

    pub fn text_body(&self) -> &'static str {
        match self {
            Self::CommentOtp => COMMENT_OTP_TEMPLATE_TEXT,
            Self::Welcome => WELCOME_TEMPLATE_TEXT,
        }
    }
}

/// Template rendering engine with variable substitution
#[derive(Debug, Default)]
pub struct TemplateEngine {
    variables: HashMap<String, String>,
}

impl TemplateEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a variable value
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.variables.insert(key.into(), value.into());
        self
    }

    /// Render a template string, replacing {{variable}} with values
    pub fn render(&self, template: &str) -> String {
        let mut result = template.to_string();

        for (key, value) in &self.variables {
            let placeholder = format!("{{{{{}}}}}", key);
            result = result.replace(&placeholder, value);
        }

        result
    }

    /// Render a complete email template
    pub fn render_template(&self, template: EmailTemplate) -> RenderedEmail {
        RenderedEmail {
            subject: self.render(template.subject()),
            html_body: self.render(template.html_body()),
            text_body: self.render(template.text_body()),
        }
    }
}

/// Rendered email with all variables substituted
#[derive(Debug, Clone)]
pub struct RenderedEmail {
    pub subject: String,
    pub html_body: String,
    pub text_body: String,
}

const COMMENT_OTP_TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Verification code</title>
    <style>
        body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, Helvetica, Arial, sans-serif; line-height: 1.6; color: #333; margin: 0; padding: 0; background-color: #f5f5f5; }
        .container { max-width: 600px; margin: 40px auto; padding: 40px; background: #ffffff; border-radius: 8px; }
        .code { font-size: 32px; letter-spacing: 8px; font-weight: 700; text-align: center; margin: 30px 0; color: #111; }
        .footer { text-align: center; font-size: 12px; color: #666; margin-top: 30px; padding-top: 20px; border-top: 1px solid #eee; }
    </style>
</head>
<body>
    <div class="container">
        <p>Use this code to confirm your email and publish your comment:</p>
        <div class="code">{{code}}</div>
        <p style="font-size: 14px; color: #666;">The code expires in {{expires_in_minutes}} minutes.</p>
        <div class="footer">
            <p>If you did not try to comment, you can ignore this email.</p>
            <p>&copy; {{year}} {{app_name}}</p>
        </div>
    </div>
</body>
</html>"#;

const COMMENT_OTP_TEMPLATE_TEXT: &str = r#"Your verification code is {{code}}

Use it to confirm your email and publish your comment.
The code expires in {{expires_in_minutes}} minutes.

If you did not try to comment, you can ignore this email.

(c) {{year}} {{app_name}}"#;

const WELCOME_TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <title>Welcome</title>
</head>
<body style="font-family: sans-serif; line-height: 1.6; color: #333;">
    <h1>Welcome, {{user_name}}!</h1>
    <p>Your blog <strong>{{blog_name}}</strong> is ready at <a href="{{blog_url}}">{{blog_url}}</a>.</p>
    <p>&copy; {{year}} {{app_name}}</p>
</body>
</html>"#;

const WELCOME_TEMPLATE_TEXT: &str = r#"Welcome, {{user_name}}!

Your blog {{blog_name}} is ready at {{blog_url}}.

(c) {{year}} {{app_name}}"#;
