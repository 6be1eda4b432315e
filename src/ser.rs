/*!
# HTMBundle: Serialization
*/

use crate::{
	Handle,
	NodeInner,
	spec,
	Tree,
};
use html5ever::{
	local_name,
	LocalName,
	ns,
	QualName,
	tendril::StrTendril,
};
use std::rc::Rc;



/// # HTML5 Doctype.
const DOCTYPE: &str = "<!DOCTYPE html>";



impl Tree {
	#[must_use]
	/// # Serialize.
	///
	/// Convert the tree back into HTML.
	///
	/// A few cheap optimizations are applied along the way:
	///
	/// * Childless SVG elements are self-closed;
	/// * Default `style` and `script` types are omitted;
	/// * Boolean attribute values are omitted;
	/// * Class lists are trimmed and collapsed;
	/// * Attribute values are quoted with whichever character is cheapest;
	pub(crate) fn serialize(&self, size_hint: usize) -> String {
		/// # Work Item.
		enum Stage {
			/// # Open Tag.
			Open(Handle),

			/// # Close Tag.
			Close(QualName),
		}

		let mut ser = Serializer::new(size_hint);

		// Work through the tree with a stack rather than recursion.
		let mut stack: Vec<Stage> = self.root().children.borrow()
			.iter()
			.rev()
			.map(|h| Stage::Open(Rc::clone(h)))
			.collect();

		while let Some(op) = stack.pop() {
			match op {
				Stage::Open(handle) => match handle.inner {
					NodeInner::Element { ref name, ref attrs } => {
						let children = handle.children.borrow();
						ser.start_elem(name, attrs.borrow().iter(), ! children.is_empty());

						stack.push(Stage::Close(name.clone()));
						stack.extend(children.iter().rev().map(|h| Stage::Open(Rc::clone(h))));
					},
					NodeInner::Text { ref contents } => { ser.write_text(&contents.borrow()); },
					NodeInner::Document | NodeInner::Ignored => {},
				},
				Stage::Close(name) => { ser.end_elem(&name); },
			}
		}

		ser.buf
	}
}



#[derive(Debug, Clone)]
/// # Open Element Details.
///
/// What the serializer needs to remember about each open element.
struct Frame {
	/// # Raw Text Tag.
	///
	/// Set for elements whose text is written verbatim.
	raw_text: Option<LocalName>,

	/// # Already Closed?
	///
	/// This is `true` for void HTML tags and self-closed SVG tags.
	closed: bool,
}



/// # Serializer.
struct Serializer {
	/// # Output.
	buf: String,

	/// # Open Elements.
	stack: Vec<Frame>,
}

impl Serializer {
	#[must_use]
	/// # New Instance.
	fn new(size_hint: usize) -> Self {
		let mut buf = String::with_capacity(size_hint.max(DOCTYPE.len()));
		buf.push_str(DOCTYPE);
		Self {
			buf,
			stack: vec![Frame { raw_text: None, closed: false }],
		}
	}

	/// # Write Opening Tag.
	fn start_elem<'a, I>(&mut self, tag: &QualName, attrs: I, has_children: bool)
	where I: Iterator<Item=(&'a QualName, &'a StrTendril)> {
		// Children of void elements shouldn't exist, but if they do, they
		// get swallowed.
		if self.stack.last().is_some_and(|f| f.closed) {
			self.stack.push(Frame { raw_text: None, closed: true });
			return;
		}

		self.buf.push('<');
		self.buf.push_str(&tag.local);

		for (key, value) in attrs { self.write_attr(tag, key, value); }

		let closed =
			if
				! has_children &&
				matches!(tag.ns, ns!(svg)) &&
				! matches!(tag.local, local_name!("svg"))
			{
				self.buf.push_str("/>");
				true
			}
			else {
				self.buf.push('>');
				spec::is_void_html_tag(tag)
			};

		self.stack.push(Frame {
			raw_text: spec::is_raw_text(tag).then(|| tag.local.clone()),
			closed,
		});
	}

	/// # Write Closing Tag.
	fn end_elem(&mut self, tag: &QualName) {
		if self.stack.pop().is_some_and(|f| ! f.closed) {
			self.buf.push_str("</");
			self.buf.push_str(&tag.local);
			self.buf.push('>');
		}
	}

	/// # Write Attribute.
	fn write_attr(&mut self, tag: &QualName, key: &QualName, value: &str) {
		// Default types are implied.
		if
			matches!(key.local, local_name!("type")) &&
			match tag.local {
				local_name!("script") => value.trim().eq_ignore_ascii_case("text/javascript"),
				local_name!("style") => value.trim().eq_ignore_ascii_case("text/css"),
				_ => false,
			}
		{ return; }

		self.buf.push(' ');
		match key.ns {
			ns!() => {},
			ns!(xml) => { self.buf.push_str("xml:"); },
			ns!(xmlns) => if ! matches!(key.local, local_name!("xmlns")) {
				self.buf.push_str("xmlns:");
			},
			ns!(xlink) => { self.buf.push_str("xlink:"); },
			_ => if let Some(prefix) = key.prefix.as_ref() {
				self.buf.push_str(prefix);
				self.buf.push(':');
			},
		}
		self.buf.push_str(&key.local);

		let html = matches!(tag.ns, ns!(html));
		if html && is_boolean(key) && (
			value.trim().is_empty() ||
			value.eq_ignore_ascii_case(&key.local) ||
			value.eq_ignore_ascii_case("true")
		) {
			return;
		}

		if matches!(key.local, local_name!("class")) {
			let value = value.trim();
			if let Some(new) = spec::collapse(value.as_bytes()) {
				let new = String::from_utf8_lossy(&new);
				self.write_attr_value(&new);
			}
			else { self.write_attr_value(value); }
		}
		else { self.write_attr_value(value); }
	}

	/// # Write Attribute Value.
	///
	/// Quote with whichever of `"` or `'` needs less escaping.
	fn write_attr_value(&mut self, value: &str) {
		let (double, single) = value.bytes().fold((0_usize, 0_usize), |(d, s), b| match b {
			b'"' => (d + 1, s),
			b'\'' => (d, s + 1),
			_ => (d, s),
		});
		let quote = if single < double { '\'' } else { '"' };

		self.buf.push('=');
		self.buf.push(quote);
		for c in value.chars() {
			match c {
				'\u{a0}' => { self.buf.push_str("&nbsp;"); },
				'&' => { self.buf.push_str("&amp;"); },
				'"' if quote == '"' => { self.buf.push_str("&#34;"); },
				'\'' if quote == '\'' => { self.buf.push_str("&#39;"); },
				c => { self.buf.push(c); },
			}
		}
		self.buf.push(quote);
	}

	/// # Write Text.
	fn write_text(&mut self, txt: &str) {
		if let Some(tag) = self.stack.last().and_then(|f| f.raw_text.as_ref()) {
			push_raw_text(&mut self.buf, txt, tag);
			return;
		}

		for c in txt.chars() {
			match c {
				'\u{a0}' => { self.buf.push_str("&nbsp;"); },
				'&' => { self.buf.push_str("&amp;"); },
				'<' => { self.buf.push_str("&lt;"); },
				'>' => { self.buf.push_str("&gt;"); },
				c => { self.buf.push(c); },
			}
		}
	}
}



/// # Write Raw Text.
///
/// Raw text runs until the first closing tag matching its element, so any
/// lookalikes in the content get a backslash after the `<`.
fn push_raw_text(buf: &mut String, txt: &str, tag: &str) {
	let bytes = txt.as_bytes();
	let mut last = 0;
	let mut idx = 0;
	while let Some(pos) = bytes[idx..].windows(2).position(|w| w == b"</") {
		let start = idx + pos;
		let end = start + 2 + tag.len();
		idx = start + 2;

		if
			bytes.get(start + 2..end).is_some_and(|t| t.eq_ignore_ascii_case(tag.as_bytes())) &&
			bytes.get(end).is_none_or(|b| matches!(b, b'\t' | b'\n' | b'\x0C' | b'\r' | b' ' | b'/' | b'>'))
		{
			buf.push_str(&txt[last..=start]);
			buf.push('\\');
			last = start + 1;
		}
	}
	buf.push_str(&txt[last..]);
}

#[must_use]
/// # Boolean Attribute?
///
/// The mere presence of these attributes is what counts.
const fn is_boolean(key: &QualName) -> bool {
	matches!(key.ns, ns!()) &&
	matches!(
		key.local,
		local_name!("allowfullscreen") |
		local_name!("async") |
		local_name!("autofocus") |
		local_name!("autoplay") |
		local_name!("checked") |
		local_name!("controls") |
		local_name!("default") |
		local_name!("defer") |
		local_name!("disabled") |
		local_name!("formnovalidate") |
		local_name!("ismap") |
		local_name!("itemscope") |
		local_name!("loop") |
		local_name!("multiple") |
		local_name!("muted") |
		local_name!("nomodule") |
		local_name!("novalidate") |
		local_name!("open") |
		local_name!("readonly") |
		local_name!("required") |
		local_name!("reversed") |
		local_name!("selected")
	)
}
