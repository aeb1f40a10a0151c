//! 서버 구성, 파이프라인 합성, 연결 서빙을 담당하는 모듈입니다.

mod builder;
mod builtin;
mod context;
mod error;
mod handler;
mod listener;

pub type Result<T> = std::result::Result<T, Error>;

pub use builder::{serve, Server, ServerInstance};
pub use context::ServerContext;
pub use error::Error;
pub use handler::{RequestHandler, Router};
pub use listener::ServerListener;
