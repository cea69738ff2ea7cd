//! Source selection
//!
//! Runs only on already-normalized quotes: a discarded source is `None`.

use crate::feeds::FeedQuote;

/// Pick the quote to trust.
///
/// The strictly more recent quote wins. On a timestamp tie the
/// deterministic source is kept. A single usable source is used as is.
pub fn select_quote(
    deterministic: Option<FeedQuote>,
    probabilistic: Option<FeedQuote>,
) -> Option<FeedQuote> {
    match (deterministic, probabilistic) {
        (Some(d), Some(p)) => {
            if p.timestamp > d.timestamp {
                Some(p)
            } else {
                Some(d)
            }
        }
        (Some(d), None) => Some(d),
        (None, Some(p)) => Some(p),
        (None, None) => None,
    }
}
