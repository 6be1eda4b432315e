/*!
# HTMBundle: C Array.
*/

use crate::BundleError;
use std::{
	io::Write,
	path::Path,
};



/// # Bytes Per Row.
const ROW: usize = 16;



/// # Emit C Array.
///
/// Read the file at `src` and write it to `out` as a C byte array named
/// `name`, preceded by a `#define` holding its length.
///
/// ## Errors
///
/// Returns an error if the file can't be read or `out` can't be written.
pub(crate) fn emit<W: Write>(src: &Path, name: &str, out: &mut W)
-> Result<(), BundleError> {
	let raw = std::fs::read(src).map_err(|e| BundleError::read(src, &e))?;
	write_array(&raw, name, out).map_err(|_| BundleError::Print)
}

/// # Write Array.
fn write_array<W: Write>(raw: &[u8], name: &str, out: &mut W) -> std::io::Result<()> {
	writeln!(out, "#define {name}_size {}", raw.len())?;
	writeln!(out, "const uint8_t {name}[{name}_size] = {{")?;
	for row in raw.chunks(ROW) {
		out.write_all(b"\t")?;
		for (idx, b) in row.iter().enumerate() {
			if idx != 0 { out.write_all(b" ")?; }
			write!(out, "0x{b:02x},")?;
		}
		out.write_all(b"\n")?;
	}
	out.write_all(b"};\n")?;
	out.flush()
}

#[must_use]
/// # Default Name.
///
/// Derive an identifier from the file name, e.g. `bundle.html.gz` becomes
/// `bundle_html_gz`.
pub(crate) fn default_name(path: &Path) -> String {
	let mut out: String = path.file_name()
		.map(|n| n.to_string_lossy())
		.unwrap_or_default()
		.chars()
		.map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
		.collect();

	if out.is_empty() { out.push_str("bundle"); }
	else if out.starts_with(|c: char| c.is_ascii_digit()) { out.insert(0, '_'); }
	out
}

/// # Validate Name.
///
/// ## Errors
///
/// Returns an error unless `name` is a valid C identifier.
pub(crate) fn validate_name(name: String) -> Result<String, BundleError> {
	if
		name.starts_with(|c: char| c.is_ascii_alphabetic() || c == '_') &&
		name.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_')
	{
		Ok(name)
	}
	else { Err(BundleError::Name(name)) }
}
