/*!
# HTMBundle: Errors
*/

use std::{
	error::Error,
	fmt,
	io,
	path::{
		Path,
		PathBuf,
	},
};



/// # Help Text.
const HELP: &str = concat!(r"
    .--------.
   / .------. \     ", "\x1b[38;5;199mHTMBundle\x1b[0;38;5;69m v", env!("CARGO_PKG_VERSION"), "\x1b[0m", r#"
  | |  </>   | |    Inline, minify, and gzip
  | '--------' |    an HTML document.
  '------------'

USAGE:
    htmbundle [FLAGS] [OPTIONS]

FLAGS:
    -c, --c-array     Print the bundle as a C byte array to STDOUT.
    -h, --help        Print help information and exit.
    -V, --version     Print program version and exit.

OPTIONS:
    -i, --input <FILE>    The HTML document to bundle. Local stylesheets and
                          scripts are resolved relative to its directory.
                          [default: ../index.html]
    -n, --name <IDENT>    The identifier to use for the C byte array.
                          [default: derived from the output file name]
    -o, --output <FILE>   Where to save the gzipped bundle.
                          [default: ../bundle.html.gz]
"#);



#[derive(Debug, Clone, Eq, PartialEq)]
/// # Generic Error.
pub(crate) enum BundleError {
	/// # Unrecognized CLI Argument.
	Cli(String),

	/// # Minification Failed.
	Minify {
		/// # MIME Key.
		mime: &'static str,

		/// # Source File (If Known).
		src: Option<PathBuf>,
	},

	/// # Invalid Array Name.
	Name(String),

	/// # Unregistered MIME Key.
	NoMinifier(String),

	/// # Unparseable Document.
	Parse,

	/// # Unable to Write to STDOUT.
	Print,

	/// # File Read Error.
	Read(PathBuf, io::ErrorKind),

	/// # Unparseable Resource Reference.
	Reference(String),

	/// # File Write Error.
	Write(PathBuf, io::ErrorKind),

	/// # Print Help (Not an Error).
	PrintHelp,

	/// # Print Version (Not an Error).
	PrintVersion,
}

impl fmt::Display for BundleError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Cli(s) => write!(f, "Invalid CLI argument: {s}"),
			Self::Minify { mime, src: Some(src) } =>
				write!(f, "Unable to minify {} as {mime}.", src.display()),
			Self::Minify { mime, src: None } =>
				write!(f, "Unable to minify {mime} content."),
			Self::Name(s) => write!(f, "Invalid C array name: {s}"),
			Self::NoMinifier(s) => write!(f, "No minifier is registered for {s}."),
			Self::Read(path, kind) =>
				write!(f, "Unable to read {}: {kind}.", path.display()),
			Self::Reference(s) => write!(f, "Unable to parse resource reference: {s:?}"),
			Self::Write(path, kind) =>
				write!(f, "Unable to write {}: {kind}.", path.display()),
			Self::Parse | Self::Print | Self::PrintHelp | Self::PrintVersion =>
				f.write_str(self.as_str()),
		}
	}
}

impl Error for BundleError {}

impl BundleError {
	/// # As Str.
	///
	/// Return the static message for payload-free variants.
	pub(crate) const fn as_str(&self) -> &'static str {
		match self {
			Self::Parse => "Unable to parse the document.",
			Self::Print => "Unable to write to STDOUT.",
			Self::PrintHelp => HELP,
			Self::PrintVersion => concat!("HTMBundle v", env!("CARGO_PKG_VERSION")),
			_ => "",
		}
	}

	#[must_use]
	/// # Read Error.
	pub(crate) fn read(path: &Path, err: &io::Error) -> Self {
		Self::Read(path.to_path_buf(), err.kind())
	}

	#[must_use]
	/// # Write Error.
	pub(crate) fn write(path: &Path, err: &io::Error) -> Self {
		Self::Write(path.to_path_buf(), err.kind())
	}

	#[must_use]
	/// # Attach Source Path.
	///
	/// Minification errors raised by the back-ends don't know where their
	/// content came from; this fills in the blank.
	pub(crate) fn with_src(self, path: &Path) -> Self {
		match self {
			Self::Minify { mime, src: None } => Self::Minify {
				mime,
				src: Some(path.to_path_buf()),
			},
			e => e,
		}
	}
}
