use axum::{extract::Request, middleware::Next, response::Response};

use crate::{
    app_error::AppError,
    session::{Role, Session},
};

async fn authorize(mut req: Request, next: Next, allowed: &[Role]) -> Result<Response, AppError> {
    let session = Session::from_headers(req.headers())?;
    if !session.is_one_of(allowed) {
        return Err(AppError::Forbidden(format!(
            "The {} role cannot use this panel",
            session.role
        )));
    }

    req.extensions_mut().insert(session);
    Ok(next.run(req).await)
}

pub async fn waiter_authorization(req: Request, next: Next) -> Result<Response, AppError> {
    authorize(req, next, &[Role::Waiter, Role::Admin]).await
}

pub async fn chef_authorization(req: Request, next: Next) -> Result<Response, AppError> {
    authorize(req, next, &[Role::Chef, Role::Admin]).await
}

pub async fn admin_authorization(req: Request, next: Next) -> Result<Response, AppError> {
    authorize(req, next, &[Role::Admin]).await
}

/// Any signed-in staff member.
pub async fn staff_authorization(req: Request, next: Next) -> Result<Response, AppError> {
    authorize(req, next, &[Role::Admin, Role::Waiter, Role::Chef]).await
}
