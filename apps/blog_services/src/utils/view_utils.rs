use actix_web::{
    cookie::Cookie,
    http::{header::LOCATION, StatusCode},
    HttpRequest, HttpResponse,
};
use logger_libs::warning_logger;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::error::FormErrors;

pub const FLASH_COOKIE: &str = "_flashes";

const HIDDEN_FORM_FIELDS: [&str; 2] = ["password", "confirm_password"];

/// One-shot notification shown on the next rendered view.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Flash {
    pub category: String,
    pub message: String,
}

impl Flash {
    pub fn new(category: &str, message: impl Into<String>) -> Self {
        Self {
            category: category.to_string(),
            message: message.into(),
        }
    }
}

/// A rendered view: the JSON document every page handler answers with.
pub struct Page {
    view: &'static str,
    title: String,
    status: StatusCode,
    flashes: Vec<Flash>,
    data: Value,
    form: Option<Value>,
    errors: Option<FormErrors>,
    message: Option<String>,
}

impl Page {
    pub fn new(view: &'static str, title: impl Into<String>) -> Self {
        Self {
            view,
            title: title.into(),
            status: StatusCode::OK,
            flashes: Vec::new(),
            data: Value::Null,
            form: None,
            errors: None,
            message: None,
        }
    }

    pub fn data<T: Serialize>(mut self, data: T) -> Self {
        self.data = serde_json::to_value(data).unwrap_or(Value::Null);
        self
    }

    pub fn status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    pub fn flash(mut self, category: &str, message: impl Into<String>) -> Self {
        self.flashes.push(Flash::new(category, message));
        self
    }

    /// Echoes submitted values back to the form; password fields are dropped.
    pub fn form<T: Serialize>(mut self, form: T) -> Self {
        let mut value = serde_json::to_value(form).unwrap_or(Value::Null);
        if let Some(fields) = value.as_object_mut() {
            for hidden in HIDDEN_FORM_FIELDS {
                fields.remove(hidden);
            }
        }
        self.form = Some(value);
        self
    }

    pub fn errors(mut self, errors: FormErrors) -> Self {
        self.errors = Some(errors);
        self
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    fn body(self, mut flashes: Vec<Flash>) -> Value {
        flashes.extend(self.flashes);

        let mut body = Map::new();
        let status = if self.status.is_success() { "success" } else { "failed" };
        body.insert("status".to_string(), json!(status));
        body.insert("view".to_string(), json!(self.view));
        body.insert("title".to_string(), json!(self.title));
        body.insert("flashes".to_string(), json!(flashes));
        if let Some(message) = self.message {
            body.insert("message".to_string(), json!(message));
        }
        if let Some(form) = self.form {
            body.insert("form".to_string(), form);
        }
        if let Some(errors) = self.errors {
            body.insert("errors".to_string(), json!(errors));
        }
        body.insert("data".to_string(), self.data);
        Value::Object(body)
    }

    /// Renders the page, consuming any flashes left by the previous redirect.
    pub fn render(self, req: &HttpRequest) -> HttpResponse {
        let pending = read_flashes(req);
        let mut builder = HttpResponse::build(self.status);
        if req.cookie(FLASH_COOKIE).is_some() {
            builder.cookie(flash_removal());
        }
        builder.json(self.body(pending))
    }

    /// Renders without request context; pending flashes stay for the next page.
    pub fn into_response(self) -> HttpResponse {
        HttpResponse::build(self.status).json(self.body(Vec::new()))
    }
}

pub struct Redirect {
    location: String,
    flashes: Vec<Flash>,
    cookies: Vec<Cookie<'static>>,
}

impl Redirect {
    pub fn to(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            flashes: Vec::new(),
            cookies: Vec::new(),
        }
    }

    pub fn flash(mut self, category: &str, message: impl Into<String>) -> Self {
        self.flashes.push(Flash::new(category, message));
        self
    }

    pub fn cookie(mut self, cookie: Cookie<'static>) -> Self {
        self.cookies.push(cookie);
        self
    }

    pub fn finish(self) -> HttpResponse {
        let mut builder = HttpResponse::Found();
        builder.insert_header((LOCATION, self.location));
        if !self.flashes.is_empty() {
            builder.cookie(flash_cookie(&self.flashes));
        }
        for cookie in self.cookies {
            builder.cookie(cookie);
        }
        builder.finish()
    }
}

pub fn read_flashes(req: &HttpRequest) -> Vec<Flash> {
    let Some(cookie) = req.cookie(FLASH_COOKIE) else {
        return Vec::new();
    };

    let decoded = urlencoding::decode(cookie.value())
        .map_err(|error| error.to_string())
        .and_then(|raw| serde_json::from_str::<Vec<Flash>>(&raw).map_err(|error| error.to_string()));

    match decoded {
        Ok(flashes) => flashes,
        Err(error) => {
            warning_logger("-", "view", "read_flashes", &error);
            Vec::new()
        }
    }
}

fn flash_cookie(flashes: &[Flash]) -> Cookie<'static> {
    let raw = serde_json::to_string(flashes).unwrap_or_else(|_| String::from("[]"));
    Cookie::build(FLASH_COOKIE, urlencoding::encode(&raw).into_owned())
        .path("/")
        .http_only(true)
        .finish()
}

fn flash_removal() -> Cookie<'static> {
    let mut cookie = Cookie::build(FLASH_COOKIE, "").path("/").finish();
    cookie.make_removal();
    cookie
}

/// An empty `next` sends the user home after login.
pub fn login_url(next: &str) -> String {
    if next.is_empty() {
        return String::from("/login");
    }
    format!("/login?next={}", urlencoding::encode(next))
}

/// Accepts only local absolute paths, so `next` cannot bounce to another host.
pub fn safe_next(next: Option<&str>) -> String {
    match next {
        Some(path) if path.starts_with('/') && !path.starts_with("//") && !path.contains('\\') => {
            path.to_string()
        }
        _ => String::from("/home"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn redirect_carries_flash_cookie() {
        let response = Redirect::to("/home").flash("success", "Your post has been created!").finish();
        assert_eq!(response.status(), StatusCode::FOUND);

        let cookie = response
            .cookies()
            .find(|cookie| cookie.name() == FLASH_COOKIE)
            .unwrap()
            .into_owned();
        let request = TestRequest::default().cookie(cookie).to_http_request();

        assert_eq!(
            read_flashes(&request),
            vec![Flash::new("success", "Your post has been created!")]
        );
    }

    #[test]
    fn garbage_flash_cookie_is_ignored() {
        let request = TestRequest::default()
            .cookie(Cookie::new(FLASH_COOKIE, "not-json"))
            .to_http_request();
        assert!(read_flashes(&request).is_empty());
    }

    #[test]
    fn form_echo_hides_passwords() {
        let page = Page::new("register", "Register").form(json!({
            "username": "jm",
            "password": "pw123",
            "confirm_password": "pw123"
        }));
        let body = page.body(Vec::new());

        assert_eq!(body["form"], json!({ "username": "jm" }));
    }

    #[test]
    fn empty_next_is_left_out() {
        assert_eq!(login_url(""), "/login");
        assert_eq!(login_url("/post/new"), "/login?next=%2Fpost%2Fnew");
    }

    #[test]
    fn next_must_stay_local() {
        assert_eq!(safe_next(Some("/account")), "/account");
        assert_eq!(safe_next(Some("/post/new?x=1")), "/post/new?x=1");
        assert_eq!(safe_next(Some("//evil.example")), "/home");
        assert_eq!(safe_next(Some("https://evil.example")), "/home");
        assert_eq!(safe_next(None), "/home");
    }
}
