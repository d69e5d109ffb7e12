//! Wire shape shared by the sync client and the backing store server.

use serde::{Deserialize, Serialize};

/// One document as the store reports it.
///
/// `saved: false` means the server holds this content only provisionally
/// (not flushed to durable storage); clients must treat the link as
/// unlinked despite having content.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub content: String,
    pub title: String,
    pub saved: bool,
}

/// Title used before a document has a name of its own.
pub const DEFAULT_TITLE: &str = "Untitled";
