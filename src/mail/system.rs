//! System notification messages.
//!
//! Builders for the mails the service itself originates: email
//! verification and password reset. Relay submissions are built by the
//! dispatcher instead.

use super::message::OutboundMessage;

/// Build the verification mail sent on registration and resend.
pub fn verification_mail(frontend_url: &str, to: &str, token: &str) -> OutboundMessage {
    let link = format!("{}/verify-email/{}", frontend_url.trim_end_matches('/'), token);

    let text = format!(
        "Welcome!\n\nPlease open the link below to verify your email address:\n\n{link}\n"
    );
    let html = format!(
        "<h1>Welcome!</h1>\
         <p>Please click the link below to verify your email address:</p>\
         <p><a href=\"{link}\">Verify Email Address</a></p>"
    );

    OutboundMessage::new(vec![to.to_string()], "Verify Your Email")
        .with_text_body(text)
        .with_html_body(html)
}

/// Build the password-reset mail.
pub fn password_reset_mail(frontend_url: &str, to: &str, token: &str) -> OutboundMessage {
    let link = format!(
        "{}/reset-password/{}",
        frontend_url.trim_end_matches('/'),
        token
    );

    let text = format!(
        "You requested a password reset. Open the link below to choose a new \
         password:\n\n{link}\n\nThis link will expire in 10 minutes.\n"
    );
    let html = format!(
        "<h1>Password Reset Request</h1>\
         <p>You requested a password reset. Please click the link below to reset \
         your password:</p>\
         <p><a href=\"{link}\">Reset Password</a></p>\
         <p>This link will expire in 10 minutes.</p>"
    );

    OutboundMessage::new(vec![to.to_string()], "Password Reset Request")
        .with_text_body(text)
        .with_html_body(html)
}
