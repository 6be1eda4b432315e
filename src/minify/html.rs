/*!
# HTMBundle: HTML.
*/

use crate::{
	BundleError,
	Minifiers,
	Tree,
};



/// # Minify HTML.
///
/// Parse the markup into a tree, crunch the tree (recursing into inline
/// styles and scripts), then serialize it compactly.
pub(super) fn minify(minifiers: &Minifiers, src: &str) -> Result<String, BundleError> {
	let dom = Tree::parse(src.as_bytes())?;
	dom.minify(minifiers)?;
	Ok(dom.serialize(src.len()))
}
