//! # Courier Driver
//!
//! A blocking driver for exercising JSON web applications in tests.
//!
//! [`JsonDriver`] issues `GET`/`POST`/`PUT`/`DELETE` requests against a base
//! URL, optionally follows redirects, and keeps the last response for
//! inspection. Requests go through a [`Transport`](courier_core::Transport);
//! [`HttpTransport`] speaks HTTP/1.1 over hyper.
//!
//! ## Example
//!
//! ```rust,ignore
//! use courier_core::Headers;
//! use courier_driver::JsonDriver;
//! use serde_json::json;
//!
//! let mut driver = JsonDriver::builder("http://127.0.0.1:9292")
//!     .follow_redirects(false)
//!     .build()?;
//!
//! driver.get("/env", &json!({"page": 2}), &Headers::new())?;
//! assert_eq!(driver.body()?["query_string"], "page=2");
//!
//! let err = driver.get_strict("/errors/404", &(), &Headers::new()).unwrap_err();
//! assert_eq!(err.status_code(), Some(404));
//! ```

#![doc(html_root_url = "https://docs.rs/courier-driver/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod driver;
mod http_transport;
pub mod redirect;

pub use driver::{JsonDriver, JsonDriverBuilder};
pub use http_transport::HttpTransport;
pub use redirect::RedirectPolicy;
