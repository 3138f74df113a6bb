//! OFAC Client SDK.
//!
//! This crate provides a client library for the OFAC sanctions screening API.
//!
//! # Example
//!
//! ```no_run
//! use ofactest_client::{ClientOptions, OfacClient, SearchOptions};
//!
//! # async fn example() -> Result<(), ofactest_client::ClientError> {
//! let client = OfacClient::with_options(
//!     "https://api.moov.io/v1/ofac",
//!     ClientOptions::with_bearer_token("your-oauth-token"),
//! )?;
//!
//! client.ping().await?;
//!
//! let results = client.search(&SearchOptions::new("Nicolas Maduro", 5)).await?;
//! if let Some((id, score)) = results.top_candidate() {
//!     println!("best match {id} ({score:.2})");
//! }
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod client;
mod error;
mod types;

pub use client::{ClientOptions, OfacClient};
pub use error::ClientError;
pub use types::*;
