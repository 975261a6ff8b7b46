use std::rc::Rc;

use actix_web::{
    dev::{forward_ready, Payload, Service, ServiceRequest, ServiceResponse, Transform},
    http::Method,
    web::Data,
    Error, FromRequest, HttpMessage, HttpRequest,
};
use futures::future::{err, ok, LocalBoxFuture, Ready};
use logger_libs::warning_logger;

use crate::{
    error::BlogError,
    modules::user::{model::CurrentUser, service::{UserServices, SESSION_COOKIE}},
    AppState,
};

/// Resolves the session cookie into a [`CurrentUser`] request extension.
/// Never rejects a request; guarding is left to the `CurrentUser` extractor.
pub struct SessionMW;

impl<S, B> Transform<S, ServiceRequest> for SessionMW
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Transform = SessionMiddleware<S>;
    type Error = Error;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(SessionMiddleware { service: Rc::new(service) })
    }
}

pub struct SessionMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for SessionMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);

        Box::pin(async move {
            let app_state = req.app_data::<Data<AppState>>().cloned();
            let session_cookie = req.cookie(SESSION_COOKIE);

            if let (Some(state), Some(cookie)) = (app_state, session_cookie) {
                match UserServices::resolve_session(cookie.value(), &state).await {
                    Ok(Some(user)) => {
                        req.extensions_mut().insert(user);
                    }
                    Ok(None) => {}
                    Err(error) => {
                        warning_logger("-", "session", "resolve_session", &error.to_string());
                    }
                }
            }

            service.call(req).await
        })
    }
}

/// Route guard: extracting a `CurrentUser` fails with a redirect to the login
/// page when the request carries no live session.
impl FromRequest for CurrentUser {
    type Error = BlogError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let user = req.extensions().get::<CurrentUser>().cloned();

        match user {
            Some(user) => ok(user),
            None => {
                // only a GET can be replayed after login
                let next = if req.method() == Method::GET {
                    req.uri()
                        .path_and_query()
                        .map(|path| path.as_str().to_string())
                        .unwrap_or_else(|| req.path().to_string())
                } else {
                    String::new()
                };
                err(BlogError::LoginRequired { next })
            }
        }
    }
}
