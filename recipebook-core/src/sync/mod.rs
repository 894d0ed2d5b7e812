//! Remote sync for the recipe and shopping lists.
//!
//! ## Protocol
//!
//! Each list lives in one JSON document per user:
//!
//! ```text
//! GET/PUT <base>/<userId>/recipes.json?auth=<idToken>
//! GET/PUT <base>/<userId>/shopping-list.json?auth=<idToken>
//! ```
//!
//! A save PUTs the whole local list; a load GETs the whole remote list and
//! replaces the local one. There is no merging: the last writer wins.

mod error;
mod remote;
mod transport;

pub use error::SyncError;
pub use remote::{decode_list, encode_list, Remote, Resource};
pub use transport::{HttpTransport, Transport};
