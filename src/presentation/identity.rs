use crate::domain::user::CurrentUser;
use crate::presentation::error::ApiError;
use crate::presentation::handlers::AppState;
use actix_web::{FromRequest, HttpMessage, HttpRequest, dev::Payload, web};
use std::future::ready;
use std::pin::Pin;
use tracing::trace;

/// Resolves the acting user once per request and caches it in the request
/// extensions. Handlers that do not ask for a `CurrentUser` never touch the
/// user table.
impl FromRequest for CurrentUser {
    type Error = ApiError;
    type Future = Pin<Box<dyn std::future::Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        if let Some(user) = req.extensions().get::<CurrentUser>().cloned() {
            trace!(user_id = user.id, "Current user taken from request cache");
            return Box::pin(ready(Ok(user)));
        }

        let req = req.clone();
        Box::pin(async move {
            let state = req
                .app_data::<web::Data<AppState>>()
                .cloned()
                .ok_or_else(|| ApiError::Internal("application state is not configured".to_string()))?;
            let user = CurrentUser::from(state.users.resolve_current_user().await?);
            req.extensions_mut().insert(user.clone());
            Ok(user)
        })
    }
}
