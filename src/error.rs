use std::{error::Error, sync::Arc};

use thiserror::Error;

/// The default value carried on a stream's error channel.
///
/// Streams are generic over their error type; this is what you get when you
/// don't pick one. It either wraps a plain message or any other error.
#[derive(Debug, Clone, Error)]
pub enum StreamError {
  #[error("{0}")]
  Message(String),

  #[error(transparent)]
  Source(Arc<dyn Error + Send + Sync>),
}

impl StreamError {
  pub fn msg(message: impl Into<String>) -> Self { StreamError::Message(message.into()) }

  pub fn from_error(err: impl Error + Send + Sync + 'static) -> Self {
    StreamError::Source(Arc::new(err))
  }
}

impl From<&str> for StreamError {
  fn from(message: &str) -> Self { StreamError::msg(message) }
}

impl From<String> for StreamError {
  fn from(message: String) -> Self { StreamError::Message(message) }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn displays_message_and_source() {
    assert_eq!(StreamError::msg("boom").to_string(), "boom");

    let io = std::io::Error::new(std::io::ErrorKind::Other, "disk gone");
    let err = StreamError::from_error(io);
    assert_eq!(err.to_string(), "disk gone");
    assert!(matches!(err.clone(), StreamError::Source(_)));
  }
}
