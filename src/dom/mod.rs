/*!
# HTMBundle: DOM.
*/

pub(super) mod node;

use crate::{
	BundleError,
	Handle,
	Minifiers,
	mime,
	Node,
	NodeInner,
	spec::{
		self,
		WhiteSpace,
	},
};
use html5ever::{
	Attribute,
	expanded_name,
	ns,
	local_name,
	ExpandedName,
	interface::{
		ElementFlags,
		NodeOrText,
		QuirksMode,
		TreeSink,
	},
	ParseOpts,
	QualName,
	tendril::{
		StrTendril,
		TendrilSink,
	},
	tree_builder::TreeBuilderOpts,
};
use node::Attributes;
use std::{
	borrow::Cow,
	cell::RefCell,
	io::Cursor,
	rc::Rc,
};



/// # Invalid Expanded Name.
///
/// This is used to avoid unfriendly panics in inapplicable `TreeSink` member
/// methods.
static NOOP_NAME: ExpandedName = expanded_name!("", "abbr");



#[derive(Debug, Clone)]
/// # HTML DOM Tree.
///
/// This struct mostly only exists as a place to chuck the ugly `TreeSink`
/// trait on. `Node` (or `Handle`) is self-referential, so is more or less
/// its own tree.
pub(crate) struct Tree {
	/// # Document Root.
	root: Handle,

	/// # Error.
	error: RefCell<Option<BundleError>>,
}

impl Default for Tree {
	#[inline]
	/// # Default: Empty Root Document.
	fn default() -> Self {
		Self {
			root: Node::new(NodeInner::Document),
			error: RefCell::new(None),
		}
	}
}

impl TreeSink for Tree {
	type Handle = Handle;
	type Output = Self;
	type ElemName<'a> = ExpandedName<'a>
	where Self: 'a;

	/// # Add Attributes if Missing.
	///
	/// If `target` is an element, attach the new attributes to it, except
	/// when they'd collide with existing entries.
	fn add_attrs_if_missing(&self, target: &Handle, new: Vec<Attribute>) {
		use indexmap::map::Entry;

		if let NodeInner::Element { ref attrs, .. } = target.inner {
			let attrs: &mut Attributes = &mut attrs.borrow_mut();
			for Attribute { name, value } in new {
				if let Entry::Vacant(e) = attrs.entry(name) { e.insert(value); }
			}
		}
	}

	/// # Append Node.
	///
	/// Attach a text or element child node to an existing (parent) node.
	///
	/// Other node types are ignored.
	fn append(&self, parent: &Handle, child: NodeOrText<Handle>) {
		match child {
			NodeOrText::AppendText(v) =>
				// If the last node was text, merge them.
				if
					let Some(last) = parent.children.borrow().last() &&
					let NodeInner::Text { ref contents } = last.inner
				{
					contents.borrow_mut().push_tendril(&v);
				}
				else {
					parent.children.borrow_mut().push(Node::text(v));
				},

			NodeOrText::AppendNode(v) => if matches!(v.inner, NodeInner::Element { .. }) {
				parent.children.borrow_mut().push(v);
			},
		}
	}

	/// # Append Based on Parent Node.
	///
	/// Insert `child` before `sibling` if `sibling` has a parent, otherwise
	/// append it to `last_parent`.
	fn append_based_on_parent_node(
		&self,
		sibling: &Handle,
		last_parent: &Handle,
		child: NodeOrText<Self::Handle>,
	) {
		if self.find_node_parent_and_index(sibling).is_some() {
			self.append_before_sibling(sibling, child);
		}
		else { self.append(last_parent, child); }
	}

	/// # Append Before Sibling.
	fn append_before_sibling(&self, sibling: &Handle, child: NodeOrText<Handle>) {
		let Some((parent, pos)) = self.find_node_parent_and_index(sibling) else {
			self.error.borrow_mut().replace(BundleError::Parse);
			return;
		};

		let children: &mut Vec<_> = &mut parent.children.borrow_mut();
		if children.len() <= pos {
			self.error.borrow_mut().replace(BundleError::Parse);
			return;
		}

		match child {
			NodeOrText::AppendText(v) =>
				// If the previous node was text, merge them.
				if
					pos != 0 &&
					let NodeInner::Text { ref contents } = children[pos - 1].inner
				{
					contents.borrow_mut().push_tendril(&v);
				}
				else { children.insert(pos, Node::text(v)); },

			NodeOrText::AppendNode(v) => if matches!(v.inner, NodeInner::Element { .. }) {
				children.insert(pos, v);
			},
		}
	}

	/// # Create Comment.
	///
	/// Return a generic placeholder node that will be ignored if appended.
	fn create_comment(&self, _text: StrTendril) -> Handle {
		Node::new(NodeInner::Ignored)
	}

	/// # Create Element.
	fn create_element(&self, name: QualName, attrs: Vec<Attribute>, flags: ElementFlags)
	-> Handle {
		let inner = NodeInner::Element {
			name,
			attrs: RefCell::new(attrs.into_iter().map(|v| (v.name, v.value)).collect())
		};

		// Template contents are built as a separate document; we'll fold
		// them back in during post-processing.
		let children = RefCell::new(
			if flags.template { vec![Node::new(NodeInner::Document)] }
			else { Vec::new() }
		);

		Rc::new(Node { inner, children })
	}

	/// # Create Processing Instruction.
	///
	/// Return a generic placeholder node that will be ignored if appended.
	fn create_pi(&self, _target: StrTendril, _data: StrTendril) -> Handle {
		Node::new(NodeInner::Ignored)
	}

	/// # Element Name.
	fn elem_name<'a>(&self, target: &'a Handle) -> ExpandedName<'a> {
		if let NodeInner::Element { ref name, .. } = target.inner {
			name.expanded()
		}
		else {
			debug_assert!(false, "BUG: elem_name called on non-element node.");
			self.error.borrow_mut().replace(BundleError::Parse);
			NOOP_NAME
		}
	}

	#[inline]
	/// # Finish Parsing.
	fn finish(self) -> Self { self }

	/// # Get Document Root.
	fn get_document(&self) -> Handle { Rc::clone(&self.root) }

	/// # Get Template Contents.
	fn get_template_contents(&self, target: &Handle) -> Handle {
		if
			let NodeInner::Element { ref name, .. } = target.inner &&
			matches!(name.ns, ns!(html)) &&
			matches!(name.local, local_name!("template")) &&
			let Some(out) = target.children.borrow().first()
		{
			return Rc::clone(out);
		}

		debug_assert!(false, "BUG: get_template_contents called on non-template node.");
		self.error.borrow_mut().replace(BundleError::Parse);
		Node::new(NodeInner::Ignored)
	}

	/// # Remove From Parent.
	fn remove_from_parent(&self, target: &Handle) {
		if let Some((parent, pos)) = self.find_node_parent_and_index(target) {
			let children: &mut Vec<_> = &mut parent.children.borrow_mut();
			if pos < children.len() { children.remove(pos); }
		}
	}

	/// # Reparent Children.
	///
	/// Drain and append all children from `old_parent` onto `new_parent`.
	fn reparent_children(&self, old_parent: &Handle, new_parent: &Handle) {
		let old_children: &mut Vec<_> = &mut old_parent.children.borrow_mut();
		let new_children: &mut Vec<_> = &mut new_parent.children.borrow_mut();
		new_children.append(old_children);
	}

	/// # Same Node?
	fn same_node(&self, x: &Handle, y: &Handle) -> bool { Rc::ptr_eq(x, y) }

	/// # Append Doctype to Document.
	fn append_doctype_to_document(
		&self,
		_name: StrTendril,
		_public_id: StrTendril,
		_system_id: StrTendril,
	) {
		// Noop; the serializer always writes an HTML5 doctype.
	}

	/// # Is Mathml?
	fn is_mathml_annotation_xml_integration_point(&self, _node: &Handle) -> bool {
		false
	}

	/// # Set Parsing Error.
	///
	/// HTML is forgiving; so are we.
	fn parse_error(&self, _msg: Cow<'static, str>) {}

	/// # Set Quirks Mode.
	fn set_quirks_mode(&self, _mode: QuirksMode) {}
}

impl Tree {
	/// # Parse Document.
	///
	/// Parse raw HTML into a tree, returning it unless there's a
	/// show-stopping error of some kind.
	///
	/// ## Errors
	///
	/// Returns an error if the source is not UTF-8 or the tree builder hits
	/// an impossible state.
	pub(crate) fn parse(raw: &[u8]) -> Result<Self, BundleError> {
		if std::str::from_utf8(raw).is_err() { return Err(BundleError::Parse); }

		let opts = ParseOpts {
			tree_builder: TreeBuilderOpts {
				drop_doctype: true,
				..TreeBuilderOpts::default()
			},
			..ParseOpts::default()
		};

		let dom = html5ever::parse_document(Self::default(), opts)
			.from_utf8()
			.read_from(&mut Cursor::new(raw))
			.map_err(|_| BundleError::Parse)?;

		if let Some(e) = dom.error.borrow_mut().take() {
			return Err(e);
		}

		dom.post_process();
		Ok(dom)
	}

	#[must_use]
	/// # Document Root.
	pub(crate) const fn root(&self) -> &Handle { &self.root }

	#[must_use]
	/// # Find Node.
	///
	/// Search the tree for `target`, returning its parent and position in
	/// `parent.children` if found.
	fn find_node_parent_and_index(&self, target: &Handle) -> Option<(Handle, usize)> {
		/// # Search.
		fn walk(handle: &Handle, target: &Handle) -> Option<(Handle, usize)> {
			let children = handle.children.borrow();
			if let Some(pos) = children.iter().position(|v| Rc::ptr_eq(v, target)) {
				return Some((Rc::clone(handle), pos));
			}

			children.iter().find_map(|child| walk(child, target))
		}

		walk(&self.root, target)
	}

	/// # Post Processing.
	///
	/// Ensure void HTML elements really have no children, and fold
	/// `<template>` contents back in as regular children.
	fn post_process(&self) {
		/// # Patch Tree.
		fn walk(handle: &Handle) {
			if let NodeInner::Element { ref name, .. } = handle.inner {
				if spec::is_void_html_tag(name) {
					handle.children.borrow_mut().truncate(0);
					return;
				}

				if
					matches!(name.ns, ns!(html)) &&
					matches!(name.local, local_name!("template"))
				{
					let children: &mut Vec<_> = &mut handle.children.borrow_mut();
					if
						let Some(first) = children.pop() &&
						matches!(first.inner, NodeInner::Document)
					{
						std::mem::swap(children, &mut first.children.borrow_mut());
					}
					else { children.truncate(0); }
				}
			}

			for child in handle.children.borrow().iter() { walk(child); }
		}

		walk(&self.root);
	}

	/// # Minify.
	///
	/// Strip and collapse insignificant whitespace throughout the tree, and
	/// run the bodies of inline styles and scripts through the matching
	/// minifiers.
	///
	/// ## Errors
	///
	/// Returns an error if an inline style or script can't be minified.
	pub(crate) fn minify(&self, minifiers: &Minifiers) -> Result<(), BundleError> {
		/// # Minify Node by Node.
		fn walk(handle: &Handle, ws: WhiteSpace, minifiers: &Minifiers)
		-> Result<(), BundleError> {
			let try_trim = match handle.inner {
				NodeInner::Document => true,
				NodeInner::Element { ref name, .. } => spec::can_trim(name),
				_ => false,
			};
			if try_trim { trim_edges(handle); }

			// Process text, and drop anything that doesn't need to be here.
			handle.children.borrow_mut().retain(|v| match v.inner {
				NodeInner::Text { ref contents } => {
					let mut contents = contents.borrow_mut();
					! contents.is_empty() && ws.process(contents.as_bytes()).is_none_or(|new|
						if new.is_empty() { false }
						else {
							*contents = new;
							true
						}
					)
				},
				NodeInner::Element { .. } | NodeInner::Document => true,
				NodeInner::Ignored => false,
			});

			// Recurse.
			for child in handle.children.borrow().iter() {
				match child.inner {
					NodeInner::Element { ref name, ref attrs } => {
						let embedded = {
							let attrs = attrs.borrow();
							if node::has_nonce(&attrs) && spec::is_raw_text(name) {
								continue;
							}
							mime::embedded(name, &attrs)
						};

						walk(child, WhiteSpace::from_element(name), minifiers)?;
						if let Some(mime) = embedded { minify_embedded(child, mime, minifiers)?; }
					},
					NodeInner::Document => { walk(child, WhiteSpace::ROOT, minifiers)?; },
					_ => {},
				}
			}

			Ok(())
		}

		walk(&self.root, WhiteSpace::ROOT, minifiers)
	}
}



/// # Trim First/Last Text.
///
/// Trim leading whitespace from the first child (if text) and trailing
/// whitespace from the last.
fn trim_edges(handle: &Handle) {
	let children = handle.children.borrow();
	if let Some(NodeInner::Text { contents }) = children.first().map(|c| &c.inner) {
		let contents: &mut StrTendril = &mut contents.borrow_mut();
		let new: &str = contents.as_ref().trim_start();
		if new.len() != contents.len() { *contents = StrTendril::from(new); }
	}
	if let Some(NodeInner::Text { contents }) = children.last().map(|c| &c.inner) {
		let contents: &mut StrTendril = &mut contents.borrow_mut();
		let new: &str = contents.as_ref().trim_end();
		if new.len() != contents.len() { *contents = StrTendril::from(new); }
	}
}

/// # Minify Embedded Content.
///
/// Replace the text of an inline `<style>` or `<script>` with its minified
/// form. Empty elements are left empty.
fn minify_embedded(handle: &Handle, mime: &'static str, minifiers: &Minifiers)
-> Result<(), BundleError> {
	let raw = handle.text_content();
	if spec::is_whitespace(raw.as_bytes()) {
		handle.children.borrow_mut().truncate(0);
		return Ok(());
	}

	let new = minifiers.minify(mime, &raw)?;
	if new.is_empty() { handle.children.borrow_mut().truncate(0); }
	else { handle.set_text(new); }
	Ok(())
}



#[cfg(test)]
mod tests {
	use super::*;

	/// # Predictable Test Tree.
	const HTML: &[u8] = b"\
	<html>\
		<head></head>\
		<body>\
			<div>\
				<span></span>\
			</div>\
		</body>\
	</html>";

	/// # The Span.
	fn span(tree: &Tree) -> Handle {
		Rc::clone(
			&tree.root.children.borrow()[0]
				.children.borrow()[1]
				.children.borrow()[0]
				.children.borrow()[0]
		)
	}

	#[test]
	fn t_remove_from_parent() {
		let tree = Tree::parse(HTML).expect("Tree parse failed.");
		let target = span(&tree);
		assert!(target.is_html(&local_name!("span")));

		tree.remove_from_parent(&target);

		// The div should have no children now.
		assert!(
			tree.root.children.borrow()[0]
				.children.borrow()[1]
				.children.borrow()[0]
				.children.borrow().is_empty()
		);
	}

	#[test]
	fn t_append_before_sibling() {
		let tree = Tree::parse(HTML).expect("Tree parse failed.");
		let target = span(&tree);

		// Add text and an element before the span.
		tree.append_before_sibling(
			&target,
			NodeOrText::AppendText(StrTendril::from("Hello World")),
		);
		tree.append_before_sibling(
			&target,
			NodeOrText::AppendNode(Node::html_with_text(local_name!("b"), "!")),
		);

		let div = Rc::clone(
			&tree.root.children.borrow()[0]
				.children.borrow()[1]
				.children.borrow()[0]
		);
		let children = div.children.borrow();
		assert_eq!(children.len(), 3);
		assert!(matches!(children[0].inner, NodeInner::Text { .. }));
		assert!(children[1].is_html(&local_name!("b")));
		assert!(Rc::ptr_eq(&children[2], &target));
	}

	#[test]
	fn t_parse_invalid() {
		assert_eq!(
			Tree::parse(b"<html>\xFF\xFE</html>").err(),
			Some(BundleError::Parse),
		);
	}

	#[test]
	fn t_void_and_template() {
		let tree = Tree::parse(b"<link rel=stylesheet href=a.css><template><p>Hi</p></template>")
			.expect("Tree parse failed.");

		let head = Rc::clone(&tree.root.children.borrow()[0].children.borrow()[0]);
		let link = Rc::clone(&head.children.borrow()[0]);
		assert!(link.is_html(&local_name!("link")));
		assert!(link.children.borrow().is_empty());

		// The template's paragraph should be a direct child.
		let template = Rc::clone(&head.children.borrow()[1]);
		assert!(template.is_html(&local_name!("template")));
		assert!(template.children.borrow()[0].is_html(&local_name!("p")));
	}
}
