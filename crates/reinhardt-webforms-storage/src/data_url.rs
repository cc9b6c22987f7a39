//! Inline attachment payload decoding.

use crate::{Result, StorageError};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;

/// Decode an inline attachment payload.
///
/// Accepts `data:<mime>;base64,<payload>` as well as bare base64; everything
/// up to the first comma is treated as the media header and ignored.
///
/// # Examples
///
/// ```
/// use reinhardt_webforms_storage::data_url::decode;
///
/// assert_eq!(decode("data:text/plain;base64,aGVsbG8=").unwrap(), b"hello");
/// assert_eq!(decode("aGVsbG8=").unwrap(), b"hello");
/// ```
///
/// # Errors
///
/// Returns `` `StorageError::InvalidDataUrl` `` if the payload is not base64.
pub fn decode(data_url: &str) -> Result<Vec<u8>> {
	let payload = match data_url.split_once(',') {
		Some((_, payload)) => payload,
		None => data_url,
	};
	STANDARD
		.decode(payload.trim())
		.map_err(|e| StorageError::InvalidDataUrl(e.to_string()))
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case::data_url("data:application/pdf;base64,JVBERg==", b"%PDF".as_slice())]
	#[case::bare("JVBERg==", b"%PDF".as_slice())]
	#[case::empty_payload("data:text/plain;base64,", b"".as_slice())]
	fn test_decode(#[case] input: &str, #[case] expected: &[u8]) {
		assert_eq!(decode(input).unwrap(), expected);
	}

	#[test]
	fn test_decode_rejects_garbage() {
		assert!(matches!(
			decode("data:text/plain;base64,not base64!"),
			Err(StorageError::InvalidDataUrl(_))
		));
	}
}
