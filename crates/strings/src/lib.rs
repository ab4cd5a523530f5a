//! Per-language localized string banks.
//!
//! Strings are stored under an order-independent [`TagSet`] key
//! (`"menu title"` and `"title, menu"` are one key), each with one or more
//! variants. A strings package carries one table per configured language,
//! back to back, in language order.

mod bank;
mod list;
mod provider;
mod tagset;

pub use crate::bank::{StringBank, StringKey};
pub use crate::list::StringList;
pub use crate::provider::LocalizationProvider;
pub use crate::tagset::TagSet;
