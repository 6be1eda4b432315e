/*!
# HTMBundle: DOM Node.
*/

use html5ever::{
	local_name,
	LocalName,
	ns,
	QualName,
	tendril::StrTendril,
};
use indexmap::IndexMap;
use std::{
	cell::RefCell,
	rc::Rc,
};



/// # Reference-Counted Node.
///
/// Nodes are self-referential, so generally need to be wrapped in `Rc`.
pub(crate) type Handle = Rc<Node>;

/// # Attribute Map.
///
/// Insertion order is document order, and is preserved across removals.
pub(crate) type Attributes = IndexMap<QualName, StrTendril>;



#[derive(Debug)]
/// # DOM Node.
///
/// This struct holds tag/attribute/content details for a node and its
/// children. At the root level, it's the whole damn tree.
pub(crate) struct Node {
	/// # Node Kind/Data.
	pub(crate) inner: NodeInner,

	/// # Child Node(s).
	pub(crate) children: RefCell<Vec<Handle>>,
}

impl Node {
	#[must_use]
	/// # New Node.
	pub(crate) fn new(inner: NodeInner) -> Handle {
		Rc::new(Self {
			inner,
			children: RefCell::new(Vec::new()),
		})
	}

	#[must_use]
	/// # New Text Node.
	pub(crate) fn text<S: Into<StrTendril>>(contents: S) -> Handle {
		Self::new(NodeInner::Text { contents: RefCell::new(contents.into()) })
	}

	#[must_use]
	/// # New HTML Element With Text.
	///
	/// Return an attribute-less HTML element containing a single text node.
	pub(crate) fn html_with_text<S: Into<StrTendril>>(tag: LocalName, contents: S)
	-> Handle {
		Rc::new(Self {
			inner: NodeInner::Element {
				name: QualName::new(None, ns!(html), tag),
				attrs: RefCell::new(Attributes::new()),
			},
			children: RefCell::new(vec![Self::text(contents)]),
		})
	}

	#[must_use]
	/// # Is HTML Element?
	///
	/// Returns `true` if the node is an HTML-namespaced element with the
	/// given tag.
	pub(crate) fn is_html(&self, tag: &LocalName) -> bool {
		if let NodeInner::Element { ref name, .. } = self.inner {
			matches!(name.ns, ns!(html)) && name.local == *tag
		}
		else { false }
	}

	#[must_use]
	/// # Attribute Value.
	///
	/// Return a copy of the value of the un-namespaced attribute `key`, if
	/// present.
	pub(crate) fn attr(&self, key: LocalName) -> Option<StrTendril> {
		if let NodeInner::Element { ref attrs, .. } = self.inner {
			attrs.borrow().get(&attr_name(key)).cloned()
		}
		else { None }
	}

	/// # Remove Attribute.
	///
	/// Remove the un-namespaced attribute `key`, shifting the rest to keep
	/// their relative order.
	pub(crate) fn remove_attr(&self, key: LocalName) -> Option<StrTendril> {
		if let NodeInner::Element { ref attrs, .. } = self.inner {
			attrs.borrow_mut().shift_remove(&attr_name(key))
		}
		else { None }
	}

	/// # Replace Children With Text.
	///
	/// Drop any existing children, replacing them with a single text node.
	pub(crate) fn set_text<S: Into<StrTendril>>(&self, contents: S) {
		let children: &mut Vec<_> = &mut self.children.borrow_mut();
		children.truncate(0);
		children.push(Self::text(contents));
	}

	#[must_use]
	/// # Text Content.
	///
	/// Return the concatenated contents of the direct text children.
	pub(crate) fn text_content(&self) -> String {
		let mut out = String::new();
		for child in self.children.borrow().iter() {
			if let NodeInner::Text { ref contents } = child.inner {
				out.push_str(&contents.borrow());
			}
		}
		out
	}
}



#[derive(Debug, Clone)]
/// # Node Kind/Data.
pub(crate) enum NodeInner {
	/// # The Root Node.
	Document,

	/// # HTML Element.
	Element {
		/// # Tag Name.
		name: QualName,

		/// # Tag Attributes.
		attrs: RefCell<Attributes>,
	},

	/// # Text.
	Text {
		/// # Content.
		contents: RefCell<StrTendril>
	},

	/// # Comments, Doctypes, Processing Instructions.
	///
	/// These are never kept, but the `TreeSink` API requires we "create"
	/// them anyway.
	Ignored,
}



#[must_use]
/// # Un-Namespaced Attribute Name.
pub(crate) fn attr_name(key: LocalName) -> QualName {
	QualName::new(None, ns!(), key)
}

#[must_use]
/// # Has Nonce?
///
/// Scripts and styles with a `nonce` are left exactly as-is.
pub(crate) fn has_nonce(attrs: &Attributes) -> bool {
	attrs.contains_key(&attr_name(local_name!("nonce")))
}
