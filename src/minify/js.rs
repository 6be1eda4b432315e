/*!
# HTMBundle: JavaScript.
*/

use crate::{
	BundleError,
	Minifiers,
	mime,
};
use oxc::{
	allocator::Allocator,
	codegen::{
		Codegen,
		CodegenOptions,
		CommentOptions,
	},
	parser::Parser,
	span::SourceType,
};



/// # Minify JavaScript.
///
/// Classic scripts share the global scope with everything else on the page,
/// so output is whitespace/comment-minified only; names are left alone.
///
/// Sources are parsed as classic scripts first, falling back to modules if
/// that fails (e.g. for `import`/`export` statements).
pub(super) fn minify(_: &Minifiers, src: &str) -> Result<String, BundleError> {
	for module in [false, true] {
		let allocator = Allocator::default();
		let source_type = SourceType::mjs().with_module(module);
		let ret = Parser::new(&allocator, src, source_type).parse();
		if ! ret.errors.is_empty() { continue; }

		let mut code = Codegen::new()
			.with_options(CodegenOptions {
				minify: true,
				comments: CommentOptions::disabled(),
				..CodegenOptions::default()
			})
			.build(&ret.program)
			.code;

		code.truncate(code.trim_end().len());
		return Ok(code);
	}

	Err(BundleError::Minify { mime: mime::JS, src: None })
}



#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn t_minify() {
		let m = Minifiers::empty();

		let out = minify(&m, "function f(){ return 1; }").expect("Minify failed.");
		assert!(out.starts_with("function f(){return 1"), "{out}");
		assert!(out.ends_with('}'), "{out}");

		// Comments and formatting go away.
		let out = minify(&m, "// Hello\nvar answer = 42;\n\n/* Bye */\n")
			.expect("Minify failed.");
		assert!(out.starts_with("var answer=42"), "{out}");
		assert!(! out.contains("Hello"));

		// Modules are fine too.
		let out = minify(&m, "import { a } from './a.js';\nexport const b = a;\n")
			.expect("Minify failed.");
		assert!(out.contains("export"), "{out}");

		// Garbage is not.
		assert_eq!(
			minify(&m, "function ( {"),
			Err(BundleError::Minify { mime: mime::JS, src: None }),
		);
	}
}
