//! HTML email templates
//!
//! Rendered server-side before the job is enqueued, so the email worker only
//! ever carries an opaque body.

/// Reset-password email with the tokenized link
pub fn forgot_password_template(username: &str, reset_link: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<body style="font-family: Arial, Helvetica, sans-serif; color: #333; padding: 20px;">
    <h2>Password Reset</h2>
    <p>Hello {username},</p>
    <p>You requested a password reset. Click the button below to set a new password:</p>
    <p style="margin: 30px 0;">
        <a href="{reset_link}" style="background-color: #50b5ff; color: #fff; padding: 12px 24px; text-decoration: none; border-radius: 4px; display: inline-block;">Reset Password</a>
    </p>
    <p style="color: #666; font-size: 14px;">
        If the button doesn't work, copy this link into your browser:<br>
        <a href="{reset_link}">{reset_link}</a>
    </p>
    <p style="color: #999; font-size: 12px;">
        This link expires in 1 hour. If you did not request this, you can ignore this email.
    </p>
</body>
</html>"#,
    )
}

/// Confirmation sent after a password was changed or reset
pub fn password_updated_template(username: &str, email: &str, date: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<body style="font-family: Arial, Helvetica, sans-serif; color: #333; padding: 20px;">
    <h2>Password Changed</h2>
    <p>Hello {username},</p>
    <p>The password for your account <strong>{email}</strong> was successfully updated on {date}.</p>
    <p style="color: #999; font-size: 12px;">
        If you did not make this change, please contact support immediately.
    </p>
</body>
</html>"#,
    )
}

/// Notification that someone commented on the recipient's post
pub fn comment_notification_template(username: &str, message: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<body style="font-family: Arial, Helvetica, sans-serif; color: #333; padding: 20px;">
    <h2>New Comment</h2>
    <p>{username} commented on your post:</p>
    <blockquote style="border-left: 3px solid #50b5ff; margin: 16px 0; padding: 8px 16px; color: #555;">
        {message}
    </blockquote>
    <p style="color: #999; font-size: 12px;">
        You are receiving this because comment notifications are enabled on your account.
    </p>
</body>
</html>"#,
    )
}
