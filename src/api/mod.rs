//! API module - GraphQL schema, resolvers and the HTTP router

pub mod auth;
pub mod mutation;
pub mod query;
pub mod routes;
pub mod types;

use std::sync::Arc;

use async_graphql::{EmptySubscription, Schema};

use crate::AppState;
use mutation::MutationRoot;
use query::QueryRoot;

/// The executable GraphQL schema
pub type ServiceSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

/// Build the schema with the application state attached
pub fn build_schema(state: Arc<AppState>) -> ServiceSchema {
    Schema::build(QueryRoot, MutationRoot, EmptySubscription)
        .data(state)
        .finish()
}
