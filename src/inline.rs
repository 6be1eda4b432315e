/*!
# HTMBundle: Inlining.

Walk the tree, replacing local `<link rel="stylesheet">` and `<script src>`
references with the (minified) contents of the files they point to.
*/

use crate::{
	BundleError,
	Handle,
	Minifiers,
	mime,
	Node,
	NodeInner,
	resolve::{
		resolve,
		Resource,
	},
	Tree,
};
use html5ever::{
	local_name,
	tendril::StrTendril,
};
use std::{
	path::{
		Path,
		PathBuf,
	},
	rc::Rc,
};



#[derive(Debug, Clone, Default, Eq, PartialEq)]
/// # Inlining Summary.
pub(crate) struct Inlined {
	/// # Scripts Inlined.
	pub(crate) scripts: usize,

	/// # Stylesheets Inlined.
	pub(crate) styles: usize,

	/// # External References Skipped.
	pub(crate) external: Vec<String>,
}



/// # Candidate.
///
/// An element eligible for inlining, and the reference it carries.
enum Candidate {
	/// # `<script src>`.
	Script(StrTendril),

	/// # `<link rel="stylesheet" href>`.
	Stylesheet(StrTendril),
}

impl Candidate {
	/// # From Node.
	///
	/// Each element yields at most one candidate; which attribute counts is
	/// determined by the tag.
	fn from_node(node: &Node) -> Option<Self> {
		if node.is_html(&local_name!("script")) {
			node.attr(local_name!("src")).map(Self::Script)
		}
		else if
			node.is_html(&local_name!("link")) &&
			node.attr(local_name!("rel"))
				.is_some_and(|v| v.trim().eq_ignore_ascii_case("stylesheet"))
		{
			node.attr(local_name!("href")).map(Self::Stylesheet)
		}
		else { None }
	}
}



/// # Inline Resources.
///
/// Replace every local script and stylesheet reference in `tree` with the
/// minified contents of the file, resolving paths relative to `input`.
///
/// The tree is modified in place. External (absolute-URL) references are
/// left as-is and noted in the returned summary.
///
/// ## Errors
///
/// The first unparseable reference, unreadable file, or minification
/// failure aborts the whole thing.
pub(crate) fn inline(tree: &Tree, input: &Path, minifiers: &Minifiers)
-> Result<Inlined, BundleError> {
	let mut out = Inlined::default();
	walk(tree.root(), input, minifiers, &mut out)?;
	Ok(out)
}

/// # Walk.
///
/// Sibling positions never change, but inlined stylesheets are swapped out
/// for new `<style>` nodes, so the children are addressed by index.
fn walk(handle: &Handle, input: &Path, minifiers: &Minifiers, out: &mut Inlined)
-> Result<(), BundleError> {
	let len = handle.children.borrow().len();
	for idx in 0..len {
		let child = Rc::clone(&handle.children.borrow()[idx]);
		if ! matches!(child.inner, NodeInner::Element { .. }) { continue; }

		match Candidate::from_node(&child) {
			Some(Candidate::Script(src)) => {
				let Some(path) = local_path(&src, input, out)? else { continue; };
				let code = read(&path)?;
				let code = minifiers.minify(mime::JS, &code)
					.map_err(|e| e.with_src(&path))?;

				child.remove_attr(local_name!("src"));
				child.set_text(code);
				out.scripts += 1;
			},
			Some(Candidate::Stylesheet(href)) => {
				let Some(path) = local_path(&href, input, out)? else { continue; };
				let css = read(&path)?;
				let css = minifiers.minify(mime::CSS, &css)
					.map_err(|e| e.with_src(&path))?;

				handle.children.borrow_mut()[idx] =
					Node::html_with_text(local_name!("style"), css);
				out.styles += 1;
			},
			None =>
				// Scripts and links are leaves; everything else gets a
				// closer look.
				if
					! child.is_html(&local_name!("script")) &&
					! child.is_html(&local_name!("link"))
				{
					walk(&child, input, minifiers, out)?;
				},
		}
	}

	Ok(())
}

/// # Local Path.
///
/// Resolve the reference, returning the path if local, or `None` (after
/// making a note of it) if external.
fn local_path(raw: &str, input: &Path, out: &mut Inlined)
-> Result<Option<PathBuf>, BundleError> {
	match resolve(raw, input)? {
		Resource::Local(path) => Ok(Some(path)),
		Resource::External => {
			out.external.push(raw.to_owned());
			Ok(None)
		},
	}
}

/// # Read File.
fn read(path: &Path) -> Result<String, BundleError> {
	std::fs::read_to_string(path).map_err(|e| BundleError::read(path, &e))
}



#[cfg(test)]
mod tests {
	use super::*;
	use std::fs;

	/// # Test Assets.
	const ASSETS: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/skel/test-assets");

	/// # Find First Element.
	fn find(handle: &Handle, tag: &html5ever::LocalName) -> Option<Handle> {
		for child in handle.children.borrow().iter() {
			if child.is_html(tag) { return Some(Rc::clone(child)); }
			if let Some(out) = find(child, tag) { return Some(out); }
		}
		None
	}

	/// # Parse.
	fn parse(html: &str) -> Tree {
		Tree::parse(html.as_bytes()).expect("Parse failed.")
	}

	#[test]
	fn t_inline_stylesheet() {
		let input = Path::new(ASSETS).join("index.html");
		let tree = parse(r#"<link id="x" rel="stylesheet" href="a.css"><p>Hi</p>"#);
		let res = inline(&tree, &input, &Minifiers::default()).expect("Inline failed.");
		assert_eq!(res.styles, 1);
		assert_eq!(res.scripts, 0);

		assert!(find(tree.root(), &local_name!("link")).is_none());
		let style = find(tree.root(), &local_name!("style")).expect("Missing style.");
		let NodeInner::Element { ref attrs, .. } = style.inner else {
			panic!("Not an element.");
		};
		assert!(attrs.borrow().is_empty());
		assert_eq!(style.children.borrow().len(), 1);
		assert_eq!(style.text_content(), "body{color:red}");
	}

	#[test]
	fn t_inline_script() {
		let input = Path::new(ASSETS).join("index.html");
		let tree = parse(r#"<script id="y" src="b.js" defer></script>"#);
		let res = inline(&tree, &input, &Minifiers::default()).expect("Inline failed.");
		assert_eq!(res.scripts, 1);

		let script = find(tree.root(), &local_name!("script")).expect("Missing script.");
		assert!(script.attr(local_name!("src")).is_none());
		assert_eq!(script.attr(local_name!("id")).as_deref(), Some("y"));
		assert_eq!(script.children.borrow().len(), 1);
		assert_eq!(script.text_content(), "function f(){return 1}");

		// The remaining attributes keep their order.
		let NodeInner::Element { ref attrs, .. } = script.inner else {
			panic!("Not an element.");
		};
		let keys: Vec<_> = attrs.borrow().keys().map(|k| k.local.to_string()).collect();
		assert_eq!(keys, ["id", "defer"]);
	}

	#[test]
	fn t_inline_external() {
		let input = Path::new(ASSETS).join("index.html");
		let html = r#"<link rel="stylesheet" href="https://example.com/x.css"><script src="https://example.com/x.js"></script>"#;
		let tree = parse(html);
		let before = tree.serialize(0);

		let res = inline(&tree, &input, &Minifiers::default()).expect("Inline failed.");
		assert_eq!(res.external, ["https://example.com/x.css", "https://example.com/x.js"]);
		assert_eq!(tree.serialize(0), before);

		// Again!
		inline(&tree, &input, &Minifiers::default()).expect("Inline failed.");
		assert_eq!(tree.serialize(0), before);
	}

	#[test]
	fn t_inline_idempotent() {
		let dir = tempfile::tempdir().expect("Tempdir failed.");
		let input = dir.path().join("index.html");
		fs::write(dir.path().join("a.css"), "a { color: blue; }").expect("Write failed.");
		fs::write(dir.path().join("b.js"), "var a = 1;").expect("Write failed.");

		let tree = parse(r#"<link rel="stylesheet" href="a.css"><script src="b.js"></script>"#);
		inline(&tree, &input, &Minifiers::default()).expect("Inline failed.");
		let once = tree.serialize(0);

		// Remove the sources; a second pass must not try to read them.
		fs::remove_file(dir.path().join("a.css")).expect("Delete failed.");
		fs::remove_file(dir.path().join("b.js")).expect("Delete failed.");

		let res = inline(&tree, &input, &Minifiers::default()).expect("Inline failed.");
		assert_eq!(res, Inlined::default());
		assert_eq!(tree.serialize(0), once);
	}

	#[test]
	fn t_inline_skips() {
		// Non-stylesheet links and src-less scripts are left alone.
		let input = Path::new(ASSETS).join("index.html");
		let html = r#"<link rel="icon" href="missing.png"><link rel="stylesheet"><script>var a;</script>"#;
		let tree = parse(html);
		let before = tree.serialize(0);

		let res = inline(&tree, &input, &Minifiers::default()).expect("Inline failed.");
		assert_eq!(res, Inlined::default());
		assert_eq!(tree.serialize(0), before);
	}

	#[test]
	fn t_inline_nested() {
		// Candidates deeper in the tree are found too.
		let input = Path::new(ASSETS).join("index.html");
		let tree = parse(r#"<div><section><script src="b.js"></script></section></div>"#);
		let res = inline(&tree, &input, &Minifiers::default()).expect("Inline failed.");
		assert_eq!(res.scripts, 1);
	}

	#[test]
	fn t_inline_errors() {
		let input = Path::new(ASSETS).join("index.html");

		// Missing files are fatal.
		let tree = parse(r#"<script src="nope.js"></script>"#);
		assert!(matches!(
			inline(&tree, &input, &Minifiers::default()),
			Err(BundleError::Read(p, _)) if p.ends_with("nope.js"),
		));

		// So are empty references.
		let tree = parse(r#"<script src=""></script>"#);
		assert!(matches!(
			inline(&tree, &input, &Minifiers::default()),
			Err(BundleError::Read(_, _)),
		));

		// And invalid code.
		let tree = parse(r#"<script src="bad.js"></script>"#);
		assert!(matches!(
			inline(&tree, &input, &Minifiers::default()),
			Err(BundleError::Minify { src: Some(p), .. }) if p.ends_with("bad.js"),
		));

		// And invalid references.
		let tree = parse(r#"<link rel="stylesheet" href="a%zz.css">"#);
		assert!(matches!(
			inline(&tree, &input, &Minifiers::default()),
			Err(BundleError::Reference(_)),
		));
	}
}
