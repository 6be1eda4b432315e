/*!
# HTMBundle: XML and SVG.
*/

use crate::{
	BundleError,
	Minifiers,
	mime,
};
use quick_xml::{
	events::Event,
	Reader,
	Writer,
};



/// # Minify XML.
pub(super) fn minify(_: &Minifiers, src: &str) -> Result<String, BundleError> {
	crunch(src, mime::XML)
}

/// # Minify SVG.
pub(super) fn minify_svg(_: &Minifiers, src: &str) -> Result<String, BundleError> {
	crunch(src, mime::SVG)
}

/// # Crunch.
///
/// Re-write the document event-by-event, dropping comments and trimming
/// the whitespace around text.
fn crunch(src: &str, mime: &'static str) -> Result<String, BundleError> {
	let err = || BundleError::Minify { mime, src: None };

	let mut reader = Reader::from_str(src);
	reader.config_mut().trim_text(true);
	let mut writer = Writer::new(Vec::with_capacity(src.len()));

	loop {
		match reader.read_event().map_err(|_| err())? {
			Event::Eof => break,
			Event::Comment(_) => {},
			e => { writer.write_event(e).map_err(|_| err())?; },
		}
	}

	String::from_utf8(writer.into_inner()).map_err(|_| err())
}
