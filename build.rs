/*!
# `HTMBundle`: Build
*/

use argyle::KeyWordsBuilder;
use std::path::PathBuf;



/// # Build.
///
/// We might as well pre-compile the CLI keywords.
pub fn main() {
	println!("cargo:rerun-if-env-changed=CARGO_PKG_VERSION");

	let mut builder = KeyWordsBuilder::default();
	builder.push_keys([
		"-c", "--c-array",
		"-h", "--help",
		"-V", "--version",
	]);
	builder.push_keys_with_values([
		"-i", "--input",
		"-n", "--name",
		"-o", "--output",
	]);
	builder.save(out_path("argyle.rs"));
}

/// # Output Path.
///
/// Append the sub-path to `OUT_DIR`.
fn out_path(name: &str) -> PathBuf {
	std::fs::canonicalize(std::env::var("OUT_DIR").expect("Missing OUT_DIR."))
		.expect("Missing OUT_DIR.")
		.join(name)
}
