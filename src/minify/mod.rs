/*!
# HTMBundle: Minification.

The registry maps MIME keys to minifier back-ends. It is built once at
startup and handed to whatever needs it; back-ends receive it too, so they
can recurse into embedded content.
*/

mod css;
mod html;
mod js;
mod json;
pub(crate) mod mime;
mod xml;

use crate::BundleError;
use indexmap::IndexMap;



/// # Minifier Callback.
pub(crate) type MinifyFn = fn(&Minifiers, &str) -> Result<String, BundleError>;



#[derive(Debug, Clone)]
/// # Minifier Registry.
pub(crate) struct Minifiers(IndexMap<&'static str, MinifyFn>);

impl Default for Minifiers {
	/// # Default Back-Ends.
	fn default() -> Self {
		Self::empty()
			.with(mime::HTML, html::minify)
			.with(mime::CSS, css::minify)
			.with(mime::JS, js::minify)
			.with(mime::JSON, json::minify)
			.with(mime::SVG, xml::minify_svg)
			.with(mime::XML, xml::minify)
	}
}

impl Minifiers {
	#[must_use]
	/// # Empty Registry.
	pub(crate) fn empty() -> Self { Self(IndexMap::new()) }

	#[must_use]
	/// # With Back-End.
	///
	/// Register (or replace) the minifier for `mime`.
	pub(crate) fn with(mut self, mime: &'static str, cb: MinifyFn) -> Self {
		self.0.insert(mime, cb);
		self
	}

	/// # Minify.
	///
	/// ## Errors
	///
	/// Returns an error if no back-end is registered for `mime`, or if the
	/// back-end rejects the content.
	pub(crate) fn minify(&self, mime: &str, src: &str) -> Result<String, BundleError> {
		let cb = self.0.get(mime)
			.ok_or_else(|| BundleError::NoMinifier(mime.to_owned()))?;
		cb(self, src)
	}
}
