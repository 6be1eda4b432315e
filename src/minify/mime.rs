/*!
# HTMBundle: MIME Keys.
*/

use crate::dom::node::{
	attr_name,
	Attributes,
};
use html5ever::{
	local_name,
	ns,
	QualName,
};



/// # CSS.
pub(crate) const CSS: &str = "text/css";

/// # HTML.
pub(crate) const HTML: &str = "text/html";

/// # JavaScript.
pub(crate) const JS: &str = "text/javascript";

/// # JSON.
pub(crate) const JSON: &str = "text/json";

/// # SVG.
pub(crate) const SVG: &str = "image/svg+xml";

/// # XML.
pub(crate) const XML: &str = "text/xml";



#[must_use]
/// # Embedded Content Type.
///
/// Return the MIME key matching the (inline) content of a `<style>` or
/// `<script>` element, if it is one we know how to minify. Scripts double as
/// data blocks, so JSON, SVG, and XML types count too.
pub(crate) fn embedded(tag: &QualName, attrs: &Attributes) -> Option<&'static str> {
	if ! matches!(tag.ns, ns!(html)) { return None; }

	let kind = attrs.get(&attr_name(local_name!("type")))
		.map(|v| v.trim().to_ascii_lowercase());
	let kind = kind.as_deref().unwrap_or("");

	match tag.local {
		local_name!("style") => matches!(kind, "" | "text/css").then_some(CSS),
		local_name!("script") => match kind {
			"" |
			"application/ecmascript" |
			"application/javascript" |
			"application/x-javascript" |
			"module" |
			"text/ecmascript" |
			"text/javascript" => Some(JS),
			"application/json" |
			"application/ld+json" |
			"importmap" |
			"speculationrules" => Some(JSON),
			"image/svg+xml" => Some(SVG),
			"application/xml" |
			"text/xml" => Some(XML),
			_ => None,
		},
		_ => None,
	}
}
