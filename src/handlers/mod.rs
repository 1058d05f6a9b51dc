// handlers/mod.rs - HTTP route handlers
//
// Routes are public at the HTTP layer. Caller identity is resolved by the auth
// context middleware and enforced per operation inside the GraphQL resolvers.

pub mod graphql;
pub mod system;

pub use graphql::{graphiql, graphql_handler};
pub use system::{health, not_found, root};
