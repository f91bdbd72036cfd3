//! Compile-on-demand unit resolution.
//!
//! On a cache miss a [`UnitLoader`] runs these steps, in order:
//!
//! 1. Names outside the configured scope go straight to the delegate.
//! 2. Unless the name is nested, the source artifact is compiled into the build
//! 	root if it exists. Whatever the compiler reports is only logged.
//! 3. The build artifact is read back. A missing or unreadable artifact means
//! 	there's no local unit.
//! 4. The bytes are defined in the [`UnitSpace`].
//! 5. Without a local unit, the delegate resolves the name.
//! 6. Successful outcomes of either kind are cached for the loader's lifetime.

use std::io::Read ;
use std::path::PathBuf ;
use std::sync::Arc ;
use dashmap::DashMap ;
use once_cell::sync::OnceCell ;
use parking_lot::Mutex ;
use pipe_trait::Pipe ;
use thiserror::Error ;

use crate::{ Compiler, CompileError, CompileRequest, Layout, ResolveError, ResourceLocation, ResourceOverlay, Resolver, UnitName, UnitSpace };



/// Where a cached unit came from.
#[derive( Debug, Clone, Copy, PartialEq, Eq, Hash )]
pub enum Origin {
	/// Defined from a build artifact in the loader's build root.
	Local,
	/// Returned by the delegate.
	Delegated,
}

/// Serialises compilations.
///
/// Every loader owns one. Loaders that write into the same build root should
/// share it through [`UnitLoader::with_compile_lock`] so no two compilations
/// ever run at the same time.
#[derive( Debug, Clone, Default )]
pub struct CompileLock( Arc<Mutex<()>> );

impl CompileLock {
	#[inline] pub fn new() -> Self { Self::default() }
}

#[derive( Debug, Clone )]
struct Cached<Unit> {
	unit: Unit,
	origin: Origin,
}

/// Why a name wasn't loaded locally.
#[derive( Debug, Error )]
enum Fallthrough {
	#[error( "outside of scope" )] OutOfScope,
	#[error( "name can't be mapped to a path" )] MalformedName,
	#[error( "no build artifact" )] ArtifactAbsent,
	#[error( "build artifact unreadable: {0}" )] ArtifactUnreadable( std::io::Error ),
	#[error( "build artifact rejected: {0}" )] ArtifactRejected( String ),
}

/// What happened when a compilation was attempted.
#[derive( Debug )]
enum CompileOutcome {
	Compiled,
	Nested,
	MalformedName,
	NoSource,
	Failed( CompileError ),
}

/// Resolves units by compiling their sources on demand, falling back to a delegate.
///
/// The loader never fails on its own account: a missing source, a failing
/// compiler or an unreadable artifact all hand the name to the delegate, and only
/// the delegate's error reaches the caller.
///
/// # Type Parameters
/// - `D`: The delegate consulted whenever no local unit can be produced
/// - `S`: The unit space build artifacts are defined in
/// - `C`: The compiler invoked for in-scope sources
///
/// ```
/// use wasm_devload::{ CommandCompiler, ComponentSpace, DirectoryResolver, Engine, Layout, UnitLoader, UnitName };
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// # let project = tempfile::tempdir()?;
/// let engine = Engine::default();
/// let layout = Layout::new( project.path() );
///
/// // A prebuilt component the delegate knows about.
/// let prebuilt = project.path().join( "lib" );
/// std::fs::create_dir_all( prebuilt.join( "std" ))?;
/// std::fs::write( prebuilt.join( "std" ).join( "Io.wasm" ), "(component)" )?;
///
/// let loader = UnitLoader::new(
/// 	DirectoryResolver::new( ComponentSpace::new( engine.clone() ), [ prebuilt ]),
/// 	ComponentSpace::new( engine ),
/// 	CommandCompiler::new( "wat-build" ),
/// )
/// 	.with_scope( "com.app" )
/// 	.with_layout( layout );
///
/// // Outside of `com.app`, so the compiler is never started.
/// let _component = loader.resolve( &UnitName::new( "std.Io" ))?;
/// assert!( loader.resolve( &UnitName::new( "std.Missing" )).is_err() );
/// # Ok(())
/// # }
/// ```
pub struct UnitLoader<D, S, C>
where
	D: Resolver,
	S: UnitSpace<Unit = D::Unit>,
	C: Compiler,
{
	delegate: D,
	space: S,
	compiler: C,
	scope: Option<String>,
	layout: Layout,
	overlay: ResourceOverlay,
	cache: DashMap<UnitName, Arc<OnceCell<Cached<D::Unit>>>>,
	compile_lock: CompileLock,
}

impl<D, S, C> UnitLoader<D, S, C>
where
	D: Resolver,
	S: UnitSpace<Unit = D::Unit>,
	C: Compiler,
{

	/// Creates an unscoped loader using [`Layout::default`].
	pub fn new( delegate: D, space: S, compiler: C ) -> Self {
		let layout = Layout::default();
		Self {
			delegate,
			space,
			compiler,
			scope: None,
			overlay: ResourceOverlay::new( layout.resource_root()),
			layout,
			cache: DashMap::new(),
			compile_lock: CompileLock::new(),
		}
	}

	/// Restricts local compilation to names within `prefix`.
	///
	/// An empty prefix is the same as no prefix.
	pub fn with_scope( mut self, prefix: impl Into<String> ) -> Self {
		let prefix = prefix.into();
		self.scope = match prefix.is_empty() {
			true => None,
			false => Some( prefix ),
		};
		self
	}

	/// Re-roots the loader's sources, build artifacts and overlay resources.
	pub fn with_layout( mut self, layout: Layout ) -> Self {
		self.overlay = ResourceOverlay::new( layout.resource_root());
		self.layout = layout ;
		self
	}

	/// Shares a compile lock with other loaders.
	pub fn with_compile_lock( mut self, lock: CompileLock ) -> Self {
		self.compile_lock = lock ;
		self
	}

	#[inline] pub fn scope( &self ) -> Option<&str> { self.scope.as_deref() }
	#[inline] pub fn layout( &self ) -> &Layout { &self.layout }
	#[inline] pub fn delegate( &self ) -> &D { &self.delegate }
	#[inline] pub fn compile_lock( &self ) -> &CompileLock { &self.compile_lock }

	/// Where the cached unit for `name` came from, if it has been resolved.
	pub fn origin( &self, name: &UnitName ) -> Option<Origin> {
		self.cache.get( &name.canonical())?.get().map(| cached | cached.origin )
	}

	/// Number of names with a cached unit or a resolution in flight.
	#[inline] pub fn cached_len( &self ) -> usize { self.cache.len() }

	/// Whether `name` would be considered for local compilation.
	pub fn in_scope( &self, name: &UnitName ) -> bool {
		self.scope.as_deref().is_none_or(| prefix | name.is_within( prefix ))
	}

	/// Resolves `name`, from the cache if it was resolved before.
	///
	/// Names are cached and resolved in their [canonical]( UnitName::canonical )
	/// spelling. Concurrent calls for the same name wait for a single resolution.
	///
	/// # Errors
	/// Only the delegate's error. Delegate failures aren't cached.
	pub fn resolve( &self, name: &UnitName ) -> Result<D::Unit, ResolveError> {

		let name = &name.canonical();
		let cell = self.cache.entry( name.clone()).or_default().value().clone();
		if let Some( cached ) = cell.get() {
			log::trace!( "Cache hit for {} ({:?})", name, cached.origin );
			return Ok( cached.unit.clone());
		}

		match cell.get_or_try_init(|| self.resolve_uncached( name )) {
			Ok( cached ) => Ok( cached.unit.clone()),
			Err( err ) => {
				// Only the map and this call hold the cell unless another caller is waiting on it.
				self.cache.remove_if( name, | _, entry | entry.get().is_none() && Arc::strong_count( entry ) <= 2 );
				Err( err )
			}
		}

	}

	fn resolve_uncached( &self, name: &UnitName ) -> Result<Cached<D::Unit>, ResolveError> {
		match self.load_local( name ) {
			Ok( unit ) => {
				log::debug!( "Loaded {} from the build root", name );
				Ok( Cached { unit, origin: Origin::Local })
			}
			Err( Fallthrough::OutOfScope ) => {
				log::trace!( "{} is outside of scope, delegating", name );
				self.delegate.resolve( name ).map(| unit | Cached { unit, origin: Origin::Delegated })
			}
			Err( reason ) => {
				log::debug!( "Delegating {}: {}", name, reason );
				self.delegate.resolve( name ).map(| unit | Cached { unit, origin: Origin::Delegated })
			}
		}
	}

	fn load_local( &self, name: &UnitName ) -> Result<D::Unit, Fallthrough> {

		if !self.in_scope( name ) { return Err( Fallthrough::OutOfScope ) }

		let bytes = {
			let _guard = self.compile_lock.0.lock();
			match self.compile( name ) {
				CompileOutcome::Failed( err ) => log::warn!( "Compiling {} failed: {}", name, err ),
				outcome => log::trace!( "Compile step for {}: {:?}", name, outcome ),
			}
			self.read_artifact( name )?
		};

		self.space.define( name, &bytes )
			.map_err(| err | Fallthrough::ArtifactRejected( err.to_string() ))

	}

	/// Must be called with the compile lock held.
	fn compile( &self, name: &UnitName ) -> CompileOutcome {

		if name.is_nested() { return CompileOutcome::Nested }
		let Some( source ) = self.layout.source_path( name ) else { return CompileOutcome::MalformedName };
		if !source.is_file() { return CompileOutcome::NoSource }

		let search_path = match std::env::join_paths( self.delegate.search_path() ) {
			Ok( search_path ) => search_path,
			Err( err ) => return CompileOutcome::Failed( err.into()),
		};
		let output_dir = self.layout.build_root();
		if let Err( err ) = std::fs::create_dir_all( output_dir ) {
			return CompileOutcome::Failed( CompileError::OutputDirectory( err ));
		}

		CompileRequest { unit: name, source: &source, output_dir, search_path: &search_path }
			.pipe(| request | self.compiler.compile( &request ))
			.map_or_else( CompileOutcome::Failed, |()| CompileOutcome::Compiled )

	}

	fn read_artifact( &self, name: &UnitName ) -> Result<Vec<u8>, Fallthrough> {
		let artifact = self.layout.artifact_path( name ).ok_or( Fallthrough::MalformedName )?;
		std::fs::read( artifact ).map_err(| err | match err.kind() {
			std::io::ErrorKind::NotFound => Fallthrough::ArtifactAbsent,
			_ => Fallthrough::ArtifactUnreadable( err ),
		})
	}

}

impl<D, S, C> Resolver for UnitLoader<D, S, C>
where
	D: Resolver,
	S: UnitSpace<Unit = D::Unit>,
	C: Compiler,
{
	type Unit = D::Unit ;

	fn resolve( &self, name: &UnitName ) -> Result<D::Unit, ResolveError> { UnitLoader::resolve( self, name ) }

	fn locate_resource( &self, path: &str ) -> Option<ResourceLocation> {
		self.overlay.locate( path, &self.delegate )
	}

	fn open_resource( &self, path: &str ) -> Option<Box<dyn Read + Send>> {
		self.overlay.open( path, &self.delegate )
	}

	/// The delegate's search path followed by this loader's build root.
	fn search_path( &self ) -> Vec<PathBuf> {
		let mut search_path = self.delegate.search_path();
		search_path.push( self.layout.build_root().to_path_buf() );
		search_path
	}
}

impl<D, S, C> std::fmt::Debug for UnitLoader<D, S, C>
where
	D: Resolver + std::fmt::Debug,
	S: UnitSpace<Unit = D::Unit> + std::fmt::Debug,
	C: Compiler + std::fmt::Debug,
{
	fn fmt( &self, f: &mut std::fmt::Formatter<'_> ) -> std::fmt::Result {
		f.debug_struct( "UnitLoader" )
			.field( "delegate", &self.delegate )
			.field( "space", &self.space )
			.field( "compiler", &self.compiler )
			.field( "scope", &self.scope )
			.field( "layout", &self.layout )
			.field( "cached", &self.cache.len() )
			.finish_non_exhaustive()
	}
}
