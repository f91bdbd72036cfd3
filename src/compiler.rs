//! The external compiler a [`UnitLoader`]( crate::UnitLoader ) drives.

use std::ffi::{ OsStr, OsString };
use std::path::Path ;
use std::process::{ Command, ExitStatus, Stdio };
use itertools::Itertools ;
use thiserror::Error ;

use crate::UnitName ;



/// Everything a compiler needs to turn one source file into a build artifact.
///
/// The artifact must land at the same path relative to `output_dir` as the source
/// has relative to the source root, with the artifact extension.
#[derive( Debug, Clone, Copy )]
pub struct CompileRequest<'a> {
	/// Unit being compiled
	pub unit: &'a UnitName,
	/// Source file to compile
	pub source: &'a Path,
	/// Build-output root
	pub output_dir: &'a Path,
	/// Platform-joined search path (see [`std::env::join_paths`])
	pub search_path: &'a OsStr,
}

/// Turns a source file into a build artifact.
pub trait Compiler: Send + Sync {
	/// Compiles `request.source` into `request.output_dir`.
	///
	/// # Errors
	/// Any failure of the toolchain. Callers don't trust a success either and
	/// look for the artifact themselves.
	fn compile( &self, request: &CompileRequest<'_> ) -> Result<(), CompileError> ;
}

/// Plain functions and closures are compilers too.
///
/// ```
/// use wasm_devload::{ Compiler, CompileError, CompileRequest };
///
/// fn refuse( request: &CompileRequest<'_> ) -> Result<(), CompileError> {
/// 	Err( CompileError::Failed { status: None, diagnostics: format!( "{} refused", request.unit ) })
/// }
///
/// fn assert_compiler( _: &impl Compiler ) {}
/// assert_compiler( &refuse );
/// ```
impl<F> Compiler for F
where
	F: Fn( &CompileRequest<'_> ) -> Result<(), CompileError> + Send + Sync,
{
	#[inline]
	fn compile( &self, request: &CompileRequest<'_> ) -> Result<(), CompileError> { self( request ) }
}

impl<C: Compiler + ?Sized> Compiler for std::sync::Arc<C> {
	#[inline]
	fn compile( &self, request: &CompileRequest<'_> ) -> Result<(), CompileError> { ( **self ).compile( request ) }
}

/// Errors that can occur while compiling a unit.
#[derive( Debug, Error )]
pub enum CompileError {
	/// A search path entry contains the platform's path list separator.
	#[error( "Invalid Search Path: {0}" )] SearchPath( #[from] std::env::JoinPathsError ),
	/// The build-output root couldn't be created.
	#[error( "Output Directory Unavailable: {0}" )] OutputDirectory( std::io::Error ),
	/// The compiler process couldn't be started.
	#[error( "Spawn Failed: {0}" )] Spawn( std::io::Error ),
	/// The compiler ran and reported failure.
	#[error( "Compilation Failed ({}): {diagnostics}", describe_status( .status.as_ref() ))]
	Failed { status: Option<ExitStatus>, diagnostics: String },
}

fn describe_status( status: Option<&ExitStatus> ) -> String {
	status.map_or_else(|| "no status".to_string(), ToString::to_string )
}

/// Runs an external toolchain process for every compilation.
///
/// The command line is `program [args..] <search-path-flag> <search-path>
/// <output-flag> <output-dir> <source>`. Standard output is discarded and
/// standard error is captured into [`CompileError::Failed`] unless
/// [`CommandCompiler::inherit_diagnostics`] is set.
///
/// ```
/// use wasm_devload::CommandCompiler ;
///
/// let compiler = CommandCompiler::new( "wat-build" )
/// 	.arg( "--component" )
/// 	.search_path_flag( "-L" )
/// 	.output_flag( "-o" );
/// # let _ = compiler ;
/// ```
#[derive( Debug, Clone )]
pub struct CommandCompiler {
	program: OsString,
	args: Vec<OsString>,
	search_path_flag: OsString,
	output_flag: OsString,
	inherit_diagnostics: bool,
}

impl CommandCompiler {

	pub fn new( program: impl Into<OsString> ) -> Self {
		Self {
			program: program.into(),
			args: Vec::with_capacity( 0 ),
			search_path_flag: "--search-path".into(),
			output_flag: "--out-dir".into(),
			inherit_diagnostics: false,
		}
	}

	/// Appends a fixed argument placed before the generated ones.
	pub fn arg( mut self, arg: impl Into<OsString> ) -> Self {
		self.args.push( arg.into());
		self
	}

	/// Flag preceding the search path. Defaults to `--search-path`.
	pub fn search_path_flag( mut self, flag: impl Into<OsString> ) -> Self {
		self.search_path_flag = flag.into();
		self
	}

	/// Flag preceding the output directory. Defaults to `--out-dir`.
	pub fn output_flag( mut self, flag: impl Into<OsString> ) -> Self {
		self.output_flag = flag.into();
		self
	}

	/// Forwards compiler diagnostics to this process's standard error instead of
	/// capturing them.
	pub fn inherit_diagnostics( mut self, inherit: bool ) -> Self {
		self.inherit_diagnostics = inherit ;
		self
	}

	fn command( &self, request: &CompileRequest<'_> ) -> Command {
		let mut command = Command::new( &self.program );
		command
			.args( &self.args )
			.arg( &self.search_path_flag ).arg( request.search_path )
			.arg( &self.output_flag ).arg( request.output_dir )
			.arg( request.source )
			.stdin( Stdio::null())
			.stdout( Stdio::null())
			.stderr( match self.inherit_diagnostics {
				true => Stdio::inherit(),
				false => Stdio::piped(),
			});
		command
	}

}

impl Compiler for CommandCompiler {
	fn compile( &self, request: &CompileRequest<'_> ) -> Result<(), CompileError> {
		let mut command = self.command( request );
		log::debug!(
			"Compiling {}: {} {}",
			request.unit,
			command.get_program().to_string_lossy(),
			command.get_args().map( OsStr::to_string_lossy ).join( " " ),
		);
		let output = command.output().map_err( CompileError::Spawn )?;
		match output.status.success() {
			true => Ok(()),
			false => Err( CompileError::Failed {
				status: Some( output.status ),
				diagnostics: String::from_utf8_lossy( &output.stderr ).into_owned(),
			}),
		}
	}
}
