use super::Mail;
use crate::content::validate::escape;

/// 订阅成功后的欢迎邮件
pub fn welcome_mail(site_name: &str, site_url: &str, email: &str) -> Mail {
    Mail {
        recipients: vec![email.to_string()],
        subject: format!("Welcome to {site_name}"),
        html: format!(
            r#"<p>Welcome to {name}, I'm pleased to have you on board. <a style="color:red;" href="{site_url}">Visit</a> now to start reading.</p>"#,
            name = escape(site_name),
        ),
    }
}

/// 新文章通知，收件人为全部订阅者
pub fn new_post_mail(
    site_name: &str,
    site_url: &str,
    recipients: Vec<String>,
    post_id: &str,
    title: &str,
) -> Mail {
    Mail {
        recipients,
        subject: format!("{title} at {site_name}"),
        html: format!(
            r#"<p>I just posted a new blog titled <b>{title}</b>, check it out <a style="color:red;" href="{site_url}/blog/{post_id}">here</a>.</p>"#,
            title = escape(title),
        ),
    }
}
