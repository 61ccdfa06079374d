//! Checkbox Client - client for the Checkbox fiscal cash-register API
//!
//! Requests are described by [`ApiMethod`] descriptors and issued through a
//! [`Client`] (async) or [`BlockingClient`]. Authentication state lives in a
//! [`SessionStorage`] passed to every call. Long-running fiscal operations
//! (opening shifts, registering receipts) are followed to completion with
//! [`Client::wait_status`].

pub mod client;
pub mod config;
pub mod error;
pub mod method;
pub mod request;
pub mod session;
pub mod transport;

pub use client::{
    BlockingClient, BlockingPages, Client, EmitOptions, Pages, PollOptions, StatusWait,
};
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult, StatusFailure};
pub use request::{Headers, PreparedRequest, Query, RawResponse};
pub use session::{Entity, SessionStorage};
pub use transport::{AsyncTransport, BlockingTransport, Effects};

// Descriptor traits and paging window
pub use method::{ApiMethod, Paginated, Pagination};
