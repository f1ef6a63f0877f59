//! Resource routes.

use crate::handlers::{accounts, ledgers, transactions, users};
use crate::state::AppState;
use axum::{
    routing::{patch, post},
    Router,
};

pub fn api_routes(state: AppState) -> Router {
    Router::new()
        .route("/ledgers", post(ledgers::create).get(ledgers::list))
        .route("/ledgers/:id", patch(ledgers::update))
        .route("/accounts", post(accounts::create).get(accounts::list))
        .route("/accounts/:id", patch(accounts::update))
        .route(
            "/transactions",
            post(transactions::create).get(transactions::list),
        )
        .route(
            "/transactions/:id",
            patch(transactions::update).delete(transactions::delete),
        )
        .route("/users", post(users::create))
        .route("/login", post(users::login))
        .with_state(state)
}
