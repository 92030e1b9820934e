//! Auth middleware.

use std::sync::Arc;

use salvo::{http::header::AUTHORIZATION, prelude::*};
use tracing::{debug, error};

use storefront_app::auth::AuthServiceError;

use crate::{envelope::ApiError, extensions::*, state::State};

/// Resolve the bearer token to an [`Identity`](storefront_app::auth::Identity)
/// and store it in the depot, or reject with 401.
#[salvo::handler]
pub(crate) async fn authenticate(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    let Some(token) = extract_bearer_token(req) else {
        reject(res, ctrl, ApiError::unauthorized("Not authorized, no token."));

        return;
    };

    let state = match depot.obtain_or_500::<Arc<State>>() {
        Ok(state) => Arc::clone(state),
        Err(error) => {
            reject(res, ctrl, error);

            return;
        }
    };

    let identity = match state.app.auth.authenticate_bearer(token).await {
        Ok(identity) => identity,
        Err(AuthServiceError::Sql(source)) => {
            error!("failed to load user for bearer token: {source}");

            reject(
                res,
                ctrl,
                ApiError::internal("Not authorized, token failed.", &source),
            );

            return;
        }
        Err(error) => {
            debug!("bearer token rejected: {error}");

            reject(
                res,
                ctrl,
                ApiError::unauthorized("Not authorized, token failed."),
            );

            return;
        }
    };

    depot.insert_identity(identity);

    ctrl.call_next(req, depot, res).await;
}

/// Only lets admins through. Must run after [`authenticate`].
#[salvo::handler]
pub(crate) async fn require_admin(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    match depot.identity_or_401() {
        Ok(identity) if identity.is_admin() => {
            ctrl.call_next(req, depot, res).await;
        }
        Ok(_) => reject(
            res,
            ctrl,
            ApiError::forbidden("Access denied, admin privileges required."),
        ),
        Err(error) => reject(res, ctrl, error),
    }
}

fn reject(res: &mut Response, ctrl: &mut FlowCtrl, error: ApiError) {
    res.render(error);
    ctrl.skip_rest();
}

fn extract_bearer_token(req: &Request) -> Option<&str> {
    let value = req.headers().get(AUTHORIZATION)?.to_str().ok()?;
    let mut parts = value.splitn(2, ' ');

    let scheme = parts.next()?;
    let token = parts.next()?.trim();

    if !scheme.eq_ignore_ascii_case("bearer") || token.is_empty() {
        return None;
    }

    Some(token)
}
