pub mod chain;
pub mod cors;
pub mod error;
pub mod logger;
pub mod response;
pub mod secret_auth;
pub mod traits;

pub use chain::MiddlewareChain;
pub use cors::{CorsConfig, CorsMiddleware};
pub use error::MiddlewareError;
pub use logger::RequestLogger;
pub use response::handle_middleware_error;
pub use secret_auth::SecretAuthMiddleware;
pub use traits::{BoxHandler, FnHandler, Handler, Middleware, Request, Response};
