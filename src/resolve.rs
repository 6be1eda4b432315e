/*!
# HTMBundle: Resource Resolution.
*/

use crate::BundleError;
use percent_encoding::percent_decode_str;
use std::path::{
	Path,
	PathBuf,
};
use url::{
	ParseError,
	Url,
};



#[derive(Debug, Clone, Eq, PartialEq)]
/// # Resource.
///
/// Where a `src`/`href` reference points.
pub(crate) enum Resource {
	/// # Local File.
	///
	/// The path has not been checked for existence.
	Local(PathBuf),

	/// # Remote (Absolute) URL.
	External,
}



/// # Resolve Reference.
///
/// Classify the raw attribute value `raw` as external or local, resolving
/// the latter relative to the directory containing `input`.
///
/// ## Errors
///
/// Returns an error if `raw` cannot be parsed as a URI reference.
pub(crate) fn resolve(raw: &str, input: &Path) -> Result<Resource, BundleError> {
	let raw = raw.trim_matches(|c: char| c.is_ascii_whitespace());
	let err = || BundleError::Reference(raw.to_owned());

	if raw.bytes().any(|b| b.is_ascii_control()) { return Err(err()); }

	// Protocol-relative URLs have a host, so aren't ours.
	if raw.starts_with("//") { return Ok(Resource::External); }

	match Url::parse(raw) {
		Ok(_) => return Ok(Resource::External),
		Err(ParseError::RelativeUrlWithoutBase) => {},
		Err(_) => return Err(err()),
	}

	// Strip the fragment and query.
	let path = raw.split_once('#').map_or(raw, |(p, _)| p);
	let path = path.split_once('?').map_or(path, |(p, _)| p);

	if ! valid_escapes(path) { return Err(err()); }
	let path = percent_decode_str(path).decode_utf8().map_err(|_| err())?;

	// Root-relative paths are anchored to the document's directory too.
	let path = path.trim_start_matches('/');

	let dir = input.parent().unwrap_or_else(|| Path::new(""));
	Ok(Resource::Local(dir.join(path)))
}

#[must_use]
/// # Valid Percent Escapes?
///
/// Every `%` must be followed by two hex digits.
fn valid_escapes(src: &str) -> bool {
	let mut bytes = src.as_bytes();
	while let Some(pos) = bytes.iter().position(|&b| b == b'%') {
		match bytes.get(pos + 1..pos + 3) {
			Some([a, b]) if a.is_ascii_hexdigit() && b.is_ascii_hexdigit() => {
				bytes = &bytes[pos + 3..];
			},
			_ => return false,
		}
	}
	true
}
