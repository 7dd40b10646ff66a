//! Request generation counters.
//!
//! Every async fetch captures a token when it starts; a completion is
//! committed only if its token still equals the stream's latest. A
//! mismatch means the user superseded the request (retyped the query,
//! switched tabs, clicked Next again) and the response is dropped
//! silently. Browsing and searching get independent counters so a list
//! fetch cannot invalidate an in-flight search or vice versa.

/// One logical stream of fetch operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stream {
    Browse,
    Search,
    Detail,
}

/// Strictly increasing generation token, scoped to one [`Stream`].
pub type Token = u64;

#[derive(Debug, Default)]
pub struct RequestArbiter {
    browse: Token,
    search: Token,
    detail: Token,
}

impl RequestArbiter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new operation on `stream`, superseding any in flight.
    pub fn begin(&mut self, stream: Stream) -> Token {
        let counter = self.counter_mut(stream);
        *counter += 1;
        *counter
    }

    /// Whether `token` is still the latest for `stream`.
    pub fn is_current(&self, stream: Stream, token: Token) -> bool {
        match stream {
            Stream::Browse => self.browse == token,
            Stream::Search => self.search == token,
            Stream::Detail => self.detail == token,
        }
    }

    fn counter_mut(&mut self, stream: Stream) -> &mut Token {
        match stream {
            Stream::Browse => &mut self.browse,
            Stream::Search => &mut self.search,
            Stream::Detail => &mut self.detail,
        }
    }
}
