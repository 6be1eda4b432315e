/*!
# HTMBundle: CSS.
*/

use crate::{
	BundleError,
	Minifiers,
	mime,
};
use lightningcss::stylesheet::{
	ParserOptions,
	PrinterOptions,
	StyleSheet,
};



/// # Minify CSS.
pub(super) fn minify(_: &Minifiers, src: &str) -> Result<String, BundleError> {
	let err = || BundleError::Minify { mime: mime::CSS, src: None };

	let sheet = StyleSheet::parse(src, ParserOptions::default()).map_err(|_| err())?;
	let out = sheet.to_css(PrinterOptions {
		minify: true,
		..PrinterOptions::default()
	}).map_err(|_| err())?;

	Ok(out.code)
}
