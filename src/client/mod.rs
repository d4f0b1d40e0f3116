//! Outbound HTTP client subsystem.
//!
//! # Data Flow
//! ```text
//! Request::builder(target) ... .build()
//!     → rest_client.rs (RestClient::get/post/put/delete[_entity])
//!     → invocation.rs (URL, Accept, headers, body)
//!     → transport.rs (one round-trip, reqwest by default)
//!     → rest_client.rs (classify, run handlers)
//!     → decode.rs (typed forms only, under response.rs ReleaseGuard)
//! ```
//!
//! # Design Decisions
//! - Requests are immutable snapshots; handlers are part of the snapshot
//! - Transport and decoder are traits so tests and callers can swap them
//! - Every response body is released exactly once, whichever path is taken

pub mod decode;
pub mod error;
pub mod invocation;
pub mod request;
pub mod response;
pub mod rest_client;
pub mod transport;

pub use decode::{EntityDecoder, JsonDecoder};
pub use error::{ClientError, DecodeError, Failure, HandlerError, HandlerResult, TransportError};
pub use invocation::Invocation;
pub use request::{Entity, Request, RequestBuilder};
pub use response::{BufferedBody, ReleaseGuard, Response, ResponseBody};
pub use rest_client::{Outcome, RestClient};
pub use transport::{ReqwestTransport, Transport};
