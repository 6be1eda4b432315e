/*!
# HTMBundle: Pipeline.
*/

use crate::{
	BundleError,
	inline::{
		inline,
		Inlined,
	},
	Minifiers,
	mime,
	Tree,
};
use flate2::{
	Compression,
	write::GzEncoder,
};
use std::{
	fs::File,
	io::{
		BufWriter,
		Write,
	},
	path::Path,
};



#[derive(Debug, Clone, Default, Eq, PartialEq)]
/// # Bundle Report.
pub(crate) struct Report {
	/// # Input Size (Bytes).
	pub(crate) before: u64,

	/// # Output Size (Bytes).
	pub(crate) after: u64,

	/// # Inlining Summary.
	pub(crate) inlined: Inlined,
}



/// # Bundle.
///
/// Parse the document at `input`, inline its local scripts and
/// stylesheets, minify the lot, and save it gzipped to `output`.
///
/// ## Errors
///
/// Any read, parse, inlining, minification, or write failure aborts the
/// run. The output file may be left in a partial state in such cases.
pub(crate) fn bundle(input: &Path, output: &Path, minifiers: &Minifiers)
-> Result<Report, BundleError> {
	// Load and parse the document.
	let raw = std::fs::read(input).map_err(|e| BundleError::read(input, &e))?;
	let dom = Tree::parse(&raw)?;

	// Inline its stuff.
	let inlined = inline(&dom, input, minifiers)?;

	// Serialize and minify.
	let html = dom.serialize(raw.len());
	drop(dom);
	let html = minifiers.minify(mime::HTML, &html)?;

	// Compress and save.
	let after = save(output, html.as_bytes())?;

	Ok(Report {
		before: u64::try_from(raw.len()).unwrap_or(u64::MAX),
		after,
		inlined,
	})
}

/// # Save (Gzipped).
///
/// Write `data` to `dst` through a gzip encoder, returning the compressed
/// size.
fn save(dst: &Path, data: &[u8]) -> Result<u64, BundleError> {
	let err = |e: &std::io::Error| BundleError::write(dst, e);

	let file = File::create(dst).map_err(|e| err(&e))?;
	let mut encoder = GzEncoder::new(BufWriter::new(file), Compression::best());
	encoder.write_all(data).map_err(|e| err(&e))?;

	// Finish up explicitly so errors aren't lost to `Drop`.
	let mut writer = encoder.finish().map_err(|e| err(&e))?;
	writer.flush().map_err(|e| err(&e))?;
	let file = writer.into_inner().map_err(|e| err(e.error()))?;
	file.sync_all().map_err(|e| err(&e))?;

	file.metadata().map(|m| m.len()).map_err(|e| err(&e))
}



#[cfg(test)]
mod tests {
	use super::*;
	use crate::Handle;
	use flate2::read::GzDecoder;
	use html5ever::{
		local_name,
		LocalName,
	};
	use std::{
		fs,
		io::Read,
		path::PathBuf,
		rc::Rc,
	};

	/// # Test Assets.
	const ASSETS: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/skel/test-assets");

	/// # Decompress.
	fn gunzip(path: &Path) -> String {
		let raw = fs::read(path).expect("Read failed.");
		let mut out = String::new();
		GzDecoder::new(raw.as_slice()).read_to_string(&mut out).expect("Gunzip failed.");
		out
	}

	/// # Find First Element.
	fn find(handle: &Handle, tag: &LocalName) -> Option<Handle> {
		for child in handle.children.borrow().iter() {
			if child.is_html(tag) { return Some(Rc::clone(child)); }
			if let Some(out) = find(child, tag) { return Some(out); }
		}
		None
	}

	#[test]
	fn t_bundle() {
		let dir = tempfile::tempdir().expect("Tempdir failed.");
		let output = dir.path().join("bundle.html.gz");
		let input = PathBuf::from(ASSETS).join("index.html");

		let report = bundle(&input, &output, &Minifiers::default())
			.expect("Bundle failed.");
		assert_eq!(report.inlined.scripts, 1);
		assert_eq!(report.inlined.styles, 1);
		assert_eq!(report.inlined.external, ["https://example.com/x.js"]);
		assert_eq!(report.after, fs::metadata(&output).expect("Missing output.").len());

		let html = gunzip(&output);
		assert!(html.starts_with("<!DOCTYPE html><html"), "{html}");
		assert!(html.contains("<style>body{color:red}</style>"), "{html}");
		assert!(html.contains("<script>function f(){return 1}</script>"), "{html}");
		assert!(html.contains(r#"<script src="https://example.com/x.js"></script>"#), "{html}");
		assert!(! html.contains("a.css"));
		assert!(! html.contains("b.js"));
		assert!(! html.contains('\n'), "{html}");

		// The result should be parseable, and stable under another round of
		// minification.
		let again = Minifiers::default().minify(mime::HTML, &html).expect("Minify failed.");
		assert_eq!(html, again);
	}

	#[test]
	fn t_bundle_closing_tags() {
		let dir = tempfile::tempdir().expect("Tempdir failed.");
		let input = dir.path().join("index.html");
		let output = dir.path().join("bundle.html.gz");

		let css = r#"a::after { content: "</style><b>x</b>"; }"#;
		let js = r#"var s = "</script><i>y</i>";"#;
		fs::write(dir.path().join("a.css"), css).expect("Write failed.");
		fs::write(dir.path().join("b.js"), js).expect("Write failed.");
		fs::write(
			&input,
			r#"<link rel="stylesheet" href="a.css"><script src="b.js"></script><p>after</p>"#,
		).expect("Write failed.");

		let minifiers = Minifiers::default();
		bundle(&input, &output, &minifiers).expect("Bundle failed.");
		let html = gunzip(&output);
		assert!(html.contains(r#"<style>a:after{content:"<\/style><b>x</b>"}</style>"#), "{html}");

		// The tree should come back with everything where it belongs.
		let dom = Tree::parse(html.as_bytes()).expect("Parse failed.");
		assert!(find(dom.root(), &local_name!("b")).is_none(), "{html}");
		assert!(find(dom.root(), &local_name!("i")).is_none(), "{html}");
		let p = find(dom.root(), &local_name!("p")).expect("Missing paragraph.");
		assert_eq!(p.text_content(), "after");

		// And the styles and scripts should match their sources.
		let style = find(dom.root(), &local_name!("style")).expect("Missing style.");
		assert_eq!(
			minifiers.minify(mime::CSS, &style.text_content()),
			minifiers.minify(mime::CSS, css),
		);
		let script = find(dom.root(), &local_name!("script")).expect("Missing script.");
		assert_eq!(
			minifiers.minify(mime::JS, &script.text_content()),
			minifiers.minify(mime::JS, js),
		);
	}

	#[test]
	fn t_bundle_errors() {
		let dir = tempfile::tempdir().expect("Tempdir failed.");
		let output = dir.path().join("bundle.html.gz");

		// Missing input.
		let input = dir.path().join("nope.html");
		assert!(matches!(
			bundle(&input, &output, &Minifiers::default()),
			Err(BundleError::Read(p, _)) if p == input,
		));

		// Bad encoding.
		fs::write(&input, b"<p>\xFF</p>").expect("Write failed.");
		assert_eq!(
			bundle(&input, &output, &Minifiers::default()),
			Err(BundleError::Parse),
		);

		// Missing asset.
		fs::write(&input, "<script src=\"gone.js\"></script>").expect("Write failed.");
		assert!(matches!(
			bundle(&input, &output, &Minifiers::default()),
			Err(BundleError::Read(p, _)) if p.ends_with("gone.js"),
		));

		// Unwritable output.
		fs::write(&input, "<p>Hi</p>").expect("Write failed.");
		let output = dir.path().join("missing-dir").join("bundle.html.gz");
		assert!(matches!(
			bundle(&input, &output, &Minifiers::default()),
			Err(BundleError::Write(p, _)) if p == output,
		));
	}
}
