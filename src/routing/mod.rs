//! 라우트 패턴 컴파일, 엔드포인트 레지스트리, 접두사/그룹 재작성을
//! 제공하는 모듈입니다.

mod endpoint;
mod error;
mod group;
mod pattern;
mod registry;

pub use endpoint::{ContextFn, Endpoint, EndpointOptions, EndpointRecord, HandlerKind, PlainFn};
pub use error::RoutingError;
pub use group::apply_group;
pub use pattern::RoutePattern;
pub use registry::EndpointRegistry;
