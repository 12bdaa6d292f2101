//! # Courier Test
//!
//! Fixtures for exercising a [`JsonDriver`](https://docs.rs/courier-driver)
//! without an external application.
//!
//! - [`target_app`] - a small JSON application with echo, redirect and error
//!   routes
//! - [`HandlerTransport`] - answers requests in-process, no sockets
//! - [`TestServer`] - serves a handler over real HTTP on a loopback port
//!
//! ## Example
//!
//! ```ignore
//! use courier_driver::JsonDriver;
//! use courier_test::{HandlerTransport, TestServer};
//!
//! // In memory
//! let mut driver = JsonDriver::builder("http://127.0.0.1:9292")
//!     .transport(HandlerTransport::target_app())
//!     .build()?;
//! driver.visit("/")?;
//!
//! // Over the loopback interface
//! let server = TestServer::start()?;
//! let mut driver = JsonDriver::builder(server.base_url()).build()?;
//! driver.visit("/")?;
//! ```

#![doc(html_root_url = "https://docs.rs/courier-test/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod app;
mod error;
mod server;
mod transport;

pub use app::{target_app, JSON_UTF8};
pub use error::TestError;
pub use server::TestServer;
pub use transport::{Handler, HandlerTransport};
