/*!
# HTMBundle: Questions of Spec.

Whitespace and element rules used by the `text/html` minifier and the
serializer.
*/

use html5ever::{
	interface::QualName,
	local_name,
	ns,
	tendril::StrTendril,
};



#[derive(Debug, Clone, Copy, Eq, PartialEq)]
/// # Whitespace Handling.
///
/// What to do with the text children of a given element.
pub(crate) struct WhiteSpace(u8);

impl WhiteSpace {
	/// # Collapse Whitespace Runs.
	const COLLAPSE: u8 =   0b0001;

	/// # Drop Text Nodes, Period.
	const DROP_ANY: u8 =   0b0010;

	/// # Drop Whitespace-Only Text Nodes.
	const DROP_EMPTY: u8 = 0b0100;

	/// # Root (Document) State.
	pub(crate) const ROOT: Self = Self(Self::COLLAPSE | Self::DROP_ANY | Self::DROP_EMPTY);

	#[must_use]
	/// # From Element.
	pub(crate) const fn from_element(tag: &QualName) -> Self {
		let mut flags = 0;

		match tag.ns {
			ns!(html) => {
				if ! is_preformatted(tag) { flags |= Self::COLLAPSE; }
				if is_textless(tag) { flags |= Self::DROP_ANY | Self::DROP_EMPTY; }
				else if matches!(
					tag.local,
					local_name!("body") |
					local_name!("option") |
					local_name!("template")
				) {
					flags |= Self::DROP_EMPTY;
				}
			},
			// SVG containers can lose their formatting whitespace.
			ns!(svg) => if matches!(
				tag.local,
				local_name!("defs") |
				local_name!("g") |
				local_name!("svg") |
				local_name!("symbol")
			) {
				flags |= Self::DROP_EMPTY;
			},
			_ => {},
		}

		Self(flags)
	}

	#[must_use]
	/// # Trim First/Last Text Child?
	pub(crate) const fn trim(self) -> bool { Self::DROP_EMPTY == self.0 & Self::DROP_EMPTY }

	#[must_use]
	/// # Process Text.
	///
	/// Return the replacement text for a child text node, if any. An empty
	/// replacement means the node should be dropped.
	pub(crate) fn process(self, raw: &[u8]) -> Option<StrTendril> {
		if
			Self::DROP_ANY == self.0 & Self::DROP_ANY ||
			(Self::DROP_EMPTY == self.0 & Self::DROP_EMPTY && is_whitespace(raw))
		{
			Some(StrTendril::new())
		}
		else if
			Self::COLLAPSE == self.0 & Self::COLLAPSE &&
			let Some(new) = collapse(raw) &&
			let Ok(new) = String::from_utf8(new)
		{
			Some(StrTendril::from(new))
		}
		else { None }
	}
}



#[must_use]
/// # Can Trim Child Text?
///
/// Leading whitespace can be trimmed from the first text child and trailing
/// whitespace from the last.
pub(crate) const fn can_trim(tag: &QualName) -> bool {
	WhiteSpace::from_element(tag).trim() ||
	match tag.ns {
		ns!(html) | ns!(svg) => matches!(
			tag.local,
			local_name!("desc") |
			local_name!("script") |
			local_name!("style") |
			local_name!("title")
		),
		_ => false,
	}
}

#[must_use]
/// # Is Void HTML Element?
pub(crate) const fn is_void_html_tag(tag: &QualName) -> bool {
	matches!(tag.ns, ns!(html)) &&
	matches!(
		tag.local,
		local_name!("area") |
		local_name!("base") |
		local_name!("basefont") |
		local_name!("bgsound") |
		local_name!("br") |
		local_name!("col") |
		local_name!("embed") |
		local_name!("frame") |
		local_name!("hr") |
		local_name!("img") |
		local_name!("input") |
		local_name!("keygen") |
		local_name!("link") |
		local_name!("meta") |
		local_name!("param") |
		local_name!("source") |
		local_name!("track") |
		local_name!("wbr")
	)
}

#[must_use]
/// # Raw Text Element?
///
/// Text inside these is written verbatim, without entity escaping.
pub(crate) const fn is_raw_text(tag: &QualName) -> bool {
	matches!(tag.ns, ns!(html)) &&
	matches!(
		tag.local,
		local_name!("iframe") |
		local_name!("noembed") |
		local_name!("noframes") |
		local_name!("noscript") |
		local_name!("plaintext") |
		local_name!("script") |
		local_name!("style") |
		local_name!("xmp")
	)
}

#[must_use]
/// # Preformatted?
///
/// Whitespace is significant inside these, so must be left alone.
const fn is_preformatted(tag: &QualName) -> bool {
	matches!(
		tag.local,
		local_name!("code") |
		local_name!("listing") |
		local_name!("plaintext") |
		local_name!("pre") |
		local_name!("script") |
		local_name!("style") |
		local_name!("textarea") |
		local_name!("xmp")
	)
}

#[must_use]
/// # Textless?
///
/// Elements that have no business holding text nodes.
const fn is_textless(tag: &QualName) -> bool {
	matches!(
		tag.local,
		local_name!("audio") |
		local_name!("head") |
		local_name!("html") |
		local_name!("optgroup") |
		local_name!("picture") |
		local_name!("select") |
		local_name!("table") |
		local_name!("tbody") |
		local_name!("tfoot") |
		local_name!("thead") |
		local_name!("tr") |
		local_name!("video")
	)
}

#[must_use]
/// # Collapse Whitespace.
///
/// Convert every contiguous run of ASCII whitespace into a single space,
/// returning the result if it differs from the original.
pub(crate) fn collapse(txt: &[u8]) -> Option<Vec<u8>> {
	// Nothing to do unless there's a non-space whitespace or a run.
	let pos = txt.iter().position(|&b| matches!(b, b'\t' | b'\n' | b'\x0C' | b'\r'))
		.or_else(|| txt.windows(2).position(|pair| pair == b"  "))?;

	let (a, rest) = txt.split_at(pos);
	let mut new = Vec::with_capacity(txt.len());
	new.extend_from_slice(a);

	let mut in_ws = a.last() == Some(&b' ');
	for &b in rest {
		if matches!(b, b'\t' | b'\n' | b'\x0C' | b'\r' | b' ') {
			if ! in_ws {
				in_ws = true;
				new.push(b' ');
			}
		}
		else {
			in_ws = false;
			new.push(b);
		}
	}

	if new == txt { None }
	else { Some(new) }
}

#[must_use]
/// # Is (Only) Whitespace?
///
/// Returns `true` if the text is empty or contains only whitespace.
pub(crate) const fn is_whitespace(mut txt: &[u8]) -> bool {
	while let [b'\t' | b'\n' | b'\x0C' | b'\r' | b' ', rest @ ..] = txt { txt = rest; }
	txt.is_empty()
}



#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn t_preformatted() {
		for i in [
			local_name!("code"),
			local_name!("plaintext"),
			local_name!("pre"),
			local_name!("script"),
			local_name!("style"),
			local_name!("textarea"),
		] {
			let name = QualName::new(None, ns!(html), i);
			assert_eq!(WhiteSpace::from_element(&name).process(b"a\n\nb"), None);
		}

		let name = QualName::new(None, ns!(html), local_name!("div"));
		assert_eq!(
			WhiteSpace::from_element(&name).process(b"a\n\nb").as_deref(),
			Some("a b"),
		);
	}

	#[test]
	fn t_collapse() {
		for (lhs, rhs) in [
			(&b"raw"[..], None),
			(b" ", None),
			(b"  ", Some(vec![b' '])),
			(b"   ", Some(vec![b' '])),
			(b"\n", Some(vec![b' '])),
			(b"hello world", None),
			(b"hello\nworld", Some(b"hello world".to_vec())),
			(b"hello \x0C \t\nworld", Some(b"hello world".to_vec())),
			(b"hello\x0C \t\nworld, hello  moon", Some(b"hello world, hello moon".to_vec())),
		] {
			assert_eq!(collapse(lhs), rhs);
		}
	}

	#[test]
	fn t_is_whitespace() {
		assert!(is_whitespace(b""));
		assert!(is_whitespace(b"  \t\n  \x0C"));
		assert!(! is_whitespace(b"  a "));
	}

	#[test]
	fn t_textless() {
		let name = QualName::new(None, ns!(html), local_name!("head"));
		assert_eq!(
			WhiteSpace::from_element(&name).process(b"hello").as_deref(),
			Some(""),
		);
	}
}
