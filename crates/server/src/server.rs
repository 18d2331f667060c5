use axum::{
    Router,
    extract::{Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::Response,
    routing::{delete, get},
};
use axum_extra::{
    TypedHeader,
    headers::{Error as AxumError, Header},
    typed_header::TypedHeaderRejection,
};
use uuid::Uuid;

use std::sync::Arc;

use crate::transactions;
use engine::Engine;

static ACCOUNT_HEADER: axum::http::HeaderName =
    axum::http::HeaderName::from_static("x-account-id");

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
}

/// `TypedHeader` for the authenticated account.
///
/// The authentication gateway in front of the service verifies the caller and
/// forwards its account id in the "x-account-id" entry of the header.
#[derive(Debug)]
struct AccountHeader(Uuid);

impl Header for AccountHeader {
    fn name() -> &'static axum::http::HeaderName {
        &ACCOUNT_HEADER
    }

    fn decode<'i, I>(values: &mut I) -> Result<Self, AxumError>
    where
        Self: Sized,
        I: Iterator<Item = &'i axum::http::HeaderValue>,
    {
        let value = values.next().ok_or_else(AxumError::invalid)?;
        let Ok(value) = value.to_str() else {
            return Err(AxumError::invalid());
        };
        let Ok(value) = Uuid::parse_str(value.trim()) else {
            return Err(AxumError::invalid());
        };

        Ok(AccountHeader(value))
    }

    fn encode<E: Extend<axum::http::HeaderValue>>(&self, values: &mut E) {
        let as_string = self.0.to_string();
        match axum::http::HeaderValue::from_str(&as_string) {
            Ok(value) => values.extend(std::iter::once(value)),
            Err(_) => tracing::error!("failed to encode x-account-id header"),
        }
    }
}

/// Account id of the caller, inserted in the request extensions by [`auth`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AuthenticatedAccount(pub Uuid);

async fn auth(
    account_header: Result<TypedHeader<AccountHeader>, TypedHeaderRejection>,
    mut request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let TypedHeader(AccountHeader(account_id)) = account_header.map_err(|rejection| {
        tracing::debug!("rejected request without account: {rejection}");
        StatusCode::UNAUTHORIZED
    })?;

    request
        .extensions_mut()
        .insert(AuthenticatedAccount(account_id));
    Ok(next.run(request).await)
}

async fn health(State(_): State<ServerState>) -> StatusCode {
    StatusCode::OK
}

fn routes(state: ServerState) -> Router {
    Router::new()
        .route("/users/transactions", get(transactions::history))
        .route(
            "/users/transactions/{id}",
            delete(transactions::soft_delete),
        )
        .route_layer(middleware::from_fn(auth))
        .route("/health", get(health))
        .with_state(state)
}

/// Build the application router around `engine`.
pub fn router(engine: Engine) -> Router {
    routes(ServerState {
        engine: Arc::new(engine),
    })
}

pub async fn run_with_listener(
    engine: Engine,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, router(engine)).await
}
