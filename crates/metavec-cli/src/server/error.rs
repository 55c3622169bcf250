//! Listener errors.

use std::io;
use std::net::SocketAddr;

use thiserror::Error;

pub type ServerResult<T> = std::result::Result<T, ServerError>;

/// Failures of the HTTP listener itself.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("cannot listen on {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },

    #[error("listener stopped unexpectedly: {0}")]
    Serve(#[source] io::Error),
}

impl ServerError {
    fn io(&self) -> &io::Error {
        match self {
            Self::Bind { source, .. } | Self::Serve(source) => source,
        }
    }

    /// An operator hint for the common bind failures.
    pub fn suggestion(&self) -> Option<&'static str> {
        match self.io().kind() {
            io::ErrorKind::AddrInUse => Some("another process holds the port, set PORT to a free one"),
            io::ErrorKind::PermissionDenied => Some("use a port above 1024 or grant bind privileges"),
            io::ErrorKind::AddrNotAvailable => Some("HOST is not an address of this machine"),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bind_failure_names_address_and_hint() {
        let error = ServerError::Bind {
            addr: "127.0.0.1:5000".parse().unwrap(),
            source: io::Error::new(io::ErrorKind::AddrInUse, "address in use"),
        };

        assert!(error.to_string().contains("127.0.0.1:5000"));
        assert!(error.suggestion().is_some_and(|hint| hint.contains("PORT")));
    }

    #[test]
    fn other_failures_have_no_hint() {
        assert!(ServerError::Serve(io::Error::other("boom")).suggestion().is_none());
    }
}
