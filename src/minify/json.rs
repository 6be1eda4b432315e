/*!
# HTMBundle: JSON.
*/

use crate::{
	BundleError,
	Minifiers,
	mime,
};
use serde_json::Value;



/// # Minify JSON.
///
/// Parse and re-print compactly. Key order is preserved.
pub(super) fn minify(_: &Minifiers, src: &str) -> Result<String, BundleError> {
	let err = || BundleError::Minify { mime: mime::JSON, src: None };
	let value: Value = serde_json::from_str(src).map_err(|_| err())?;
	serde_json::to_string(&value).map_err(|_| err())
}
