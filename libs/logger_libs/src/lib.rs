use std::fmt::Debug;
use lazy_static::lazy_static;
use log::{debug, error, info, warn};
use regex::Regex;
use serde_json::{json, Value};
use serde::Serialize;

lazy_static! {
    static ref EMAIL_RE: Regex =
        Regex::new(r"([A-Za-z0-9._%+-]{1,3})[A-Za-z0-9._%+-]*@([A-Za-z0-9.-]+)").expect("valid email pattern");
}

const SECRET_FIELDS: [&str; 3] = ["password", "confirm_password", "password_hash"];

/// Serializes `data` into a JSON object with the user-identifying fields masked.
pub fn json_mask<T>(data: T) -> Option<serde_json::Map<String, Value>>
where
    T: Serialize,
{
    let mut request_json = serde_json::to_value(data).unwrap_or(json!({}));

    if let Some(obj) = request_json.as_object_mut() {
        if let Some(username) = obj.get_mut("username") {
            *username = Value::String(username_mask(username.as_str().unwrap_or("")));
        }
        if let Some(email) = obj.get_mut("email") {
            *email = Value::String(email_mask(email.as_str().unwrap_or("")));
        }
        for field in SECRET_FIELDS {
            if let Some(secret) = obj.get_mut(field) {
                *secret = Value::String(password_mask());
            }
        }
    }

    request_json.as_object().cloned()
}

pub fn debug_logger<T, B>(log_id: &str, handler: &str, method: &str, request: &T, response: &B)
where
    T: Serialize + Debug,
    B: Serialize + Debug,
{
    let request = json_mask(request).unwrap_or_default();
    let response = json_mask(response).unwrap_or_default();

    debug!(
        "[ {} ] {}.{} Request: {:?} | Response: {:?}",
        log_id,
        handler,
        method,
        request,
        response
    );
}

pub fn info_logger(
    log_id: &str,
    handler: &str,
    method: &str
)
{
    info!(
        "[ {} ] {}.{}",
        log_id,
        handler,
        method
    )
}

pub fn warning_logger(log_id: &str, handler: &str, method: &str, message: &str) {
    warn!(
        "[ {} ] {}.{} warning: {}",
        log_id, handler, method, message_mask(message)
    );
}

pub fn error_logger(
    log_id: &str,
    handler: &str,
    method: &str,
    message: &str,
)
{
    error!(
        "[ {} ] {}.{} error: {}",
        log_id,
        handler,
        method,
        message_mask(message)
    )
}

pub fn password_mask() -> String {
    String::from("***")
}

pub fn username_mask(username: &str) -> String {
    username
        .split(' ')
        .map(|word| {
            let prefix: String = word.chars().take(3).collect();
            format!("{}***", prefix)
        })
        .collect::<Vec<String>>()
        .join(" ")
}

pub fn email_mask(email: &str) -> String {
    match email.split_once('@') {
        Some((local, domain)) => format!("{}@{}", username_mask(local), domain),
        None => username_mask(email),
    }
}

/// Masks every e-mail address found in free text, e.g. database error details.
pub fn message_mask(message: &str) -> String {
    EMAIL_RE.replace_all(message, "$1***@$2").into_owned()
}
