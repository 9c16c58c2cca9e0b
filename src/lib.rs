#![warn(missing_docs, missing_debug_implementations)]

//! Client for the username.dev reserved username API.
//!
//! The API answers one question: is this username reserved, and if so under
//! which categories (system names, brands, cities, first names, ...). This
//! library wraps the single `GET /check` call, decoding successful answers
//! into [`CheckResult`](types::CheckResult) and RFC 7807 problem documents
//! into [`ClientError::Api`](check::ClientError::Api) with an actionable
//! message.
//!
//! # Example
//!
//! ```no_run
//! use username_dev::check::{Client, ClientConfig};
//!
//! let client = Client::new(ClientConfig::new("un_live_example")).unwrap();
//! match client.check("berlin") {
//!     Ok(result) if result.is_reserved => println!("reserved"),
//!     Ok(_) => println!("available"),
//!     Err(e) => eprintln!("Error: {e}"),
//! }
//! ```

pub mod check;
pub mod report;
pub mod types;
