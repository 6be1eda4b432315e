/*!
# `HTMBundle`

`HTMBundle` turns a single HTML document into a single, self-contained,
gzipped file, ready to be served straight out of flash by some tiny
embedded web server.

Every local `<link rel="stylesheet">` and `<script src>` is replaced with the
(minified) contents of the file it points to, the document as a whole is
minified, and the result is gzipped. If requested, the compressed bytes are
also printed as a C array for embedding into firmware sources.

Remote (absolute-URL) references are left as-is.



## Use

```bash
# Bundle ../index.html into ../bundle.html.gz.
htmbundle

# Choose the files yourself, and print a C array too.
htmbundle -i web/index.html -o build/ui.html.gz -c > src/ui.h

# For a full list of options, run help:
htmbundle -h
```
*/

#![deny(
	clippy::allow_attributes_without_reason,
	clippy::correctness,
	unreachable_pub,
	unsafe_code,
)]

#![warn(
	clippy::complexity,
	clippy::nursery,
	clippy::pedantic,
	clippy::perf,
	clippy::style,

	clippy::allow_attributes,
	clippy::clone_on_ref_ptr,
	clippy::create_dir,
	clippy::filetype_is_file,
	clippy::format_push_string,
	clippy::get_unwrap,
	clippy::impl_trait_in_params,
	clippy::lossy_float_literal,
	clippy::missing_assert_message,
	clippy::missing_docs_in_private_items,
	clippy::needless_raw_strings,
	clippy::panic_in_result_fn,
	clippy::pub_without_shorthand,
	clippy::rest_pat_in_fully_bound_structs,
	clippy::semicolon_inside_block,
	clippy::str_to_string,
	clippy::string_to_string,
	clippy::todo,
	clippy::undocumented_unsafe_blocks,
	clippy::unneeded_field_pattern,
	clippy::unseparated_literal_suffix,
	clippy::unwrap_in_result,

	macro_use_extern_crate,
	missing_copy_implementations,
	missing_docs,
	non_ascii_idents,
	trivial_casts,
	trivial_numeric_casts,
	unused_crate_dependencies,
	unused_extern_crates,
	unused_import_braces,
)]

#![expect(clippy::redundant_pub_crate, reason = "Unresolvable.")]



mod bundle;
mod carray;
mod dom;
mod error;
mod inline;
mod minify;
mod resolve;
mod ser;
mod spec;

use argyle::Argument;
use dactyl::NiceU64;
pub(crate) use dom::{
	node::{
		Handle,
		Node,
		NodeInner,
	},
	Tree,
};
pub(crate) use error::BundleError;
use fyi_msg::Msg;
pub(crate) use minify::{
	mime,
	Minifiers,
};
use std::{
	io::Write,
	path::PathBuf,
	process::ExitCode,
};



/// # Default Input.
const DEFAULT_INPUT: &str = "../index.html";

/// # Default Output.
const DEFAULT_OUTPUT: &str = "../bundle.html.gz";



/// # Main.
fn main() -> ExitCode {
	match main__() {
		Ok(()) => ExitCode::SUCCESS,
		Err(e @ (BundleError::PrintHelp | BundleError::PrintVersion)) => {
			println!("{}", e.as_str());
			ExitCode::SUCCESS
		},
		Err(e) => {
			Msg::error(e.to_string()).with_newline(true).eprint();
			ExitCode::FAILURE
		},
	}
}

#[inline]
/// # Actual Main.
fn main__() -> Result<(), BundleError> {
	let mut input: Option<PathBuf> = None;
	let mut output: Option<PathBuf> = None;
	let mut name: Option<String> = None;
	let mut c_array = false;

	let args = argyle::args()
		.with_keywords(include!(concat!(env!("OUT_DIR"), "/argyle.rs")));
	for arg in args {
		match arg {
			Argument::Key("-c" | "--c-array") => { c_array = true; },
			Argument::Key("-h" | "--help") => return Err(BundleError::PrintHelp),
			Argument::Key("-V" | "--version") => return Err(BundleError::PrintVersion),

			Argument::KeyWithValue("-i" | "--input", s) => { input.replace(PathBuf::from(s)); },
			Argument::KeyWithValue("-n" | "--name", s) => {
				name.replace(carray::validate_name(s)?);
			},
			Argument::KeyWithValue("-o" | "--output", s) => { output.replace(PathBuf::from(s)); },

			Argument::Other(s) => return Err(BundleError::Cli(s)),
			Argument::InvalidUtf8(s) => return Err(BundleError::Cli(s.to_string_lossy().into_owned())),

			// Nothing else is relevant.
			_ => {},
		}
	}

	// Make the paths absolute.
	let input = input.unwrap_or_else(|| PathBuf::from(DEFAULT_INPUT));
	let input = std::path::absolute(&input).map_err(|e| BundleError::read(&input, &e))?;
	let output = output.unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT));
	let output = std::path::absolute(&output).map_err(|e| BundleError::write(&output, &e))?;

	// Do it!
	let minifiers = Minifiers::default();
	let report = bundle::bundle(&input, &output, &minifiers)?;
	for url in &report.inlined.external {
		Msg::warning(format!("Skipped external resource: {url}"))
			.with_newline(true)
			.eprint();
	}

	// Print the array?
	if c_array {
		let name = name.unwrap_or_else(|| carray::default_name(&output));
		let mut handle = std::io::stdout().lock();
		carray::emit(&output, &name, &mut handle)?;
		handle.flush().map_err(|_| BundleError::Print)?;
	}

	Msg::success(format!(
		"Bundle created: {} ({} scripts and {} stylesheets inlined; {} → {} bytes).",
		output.display(),
		report.inlined.scripts,
		report.inlined.styles,
		NiceU64::from(report.before).as_str(),
		NiceU64::from(report.after).as_str(),
	))
		.with_newline(true)
		.eprint();

	Ok(())
}
