//! Exchange-rate display feed, independent of the inventory.

pub mod feed;
pub mod source;

pub use feed::{QuoteBoard, QuoteFeed, QuoteHandle, QuoteState};
pub use source::{DollarQuote, HttpQuoteSource, QuoteError, QuoteSource};
