//! The resolution capability shared by loaders and their delegates.

use std::fs::File ;
use std::io::Read ;
use std::path::{ Path, PathBuf };
use std::sync::Arc ;
use thiserror::Error ;

use crate::UnitName ;



/// Something that can turn a [`UnitName`] into a loaded unit and look up resources.
///
/// A [`UnitLoader`]( crate::UnitLoader ) falls back to a `Resolver` whenever it
/// can't produce a unit itself, and is a `Resolver` in turn, so loaders chain by
/// wrapping one another.
///
/// ```
/// use std::path::PathBuf ;
/// use wasm_devload::{ Resolver, ResolveError, ResourceLocation, UnitName };
///
/// struct Nothing ;
///
/// impl Resolver for Nothing {
/// 	type Unit = ();
/// 	fn resolve( &self, name: &UnitName ) -> Result<(), ResolveError> {
/// 		Err( ResolveError::NotFound( name.clone() ))
/// 	}
/// 	fn locate_resource( &self, _path: &str ) -> Option<ResourceLocation> { None }
/// }
///
/// assert!( Nothing.resolve( &UnitName::new( "a.B" )).is_err() );
/// assert!( Nothing.open_resource( "a.txt" ).is_none() );
/// assert_eq!( Nothing.search_path(), Vec::<PathBuf>::new() );
/// ```
pub trait Resolver: Send + Sync {

	/// The loaded representation of a unit. Cloning must be cheap; resolvers
	/// hand out shared handles rather than exclusive ownership.
	type Unit: Clone + Send + Sync ;

	/// Resolves `name` to a loaded unit.
	///
	/// # Errors
	/// Returns [`ResolveError::NotFound`] if no unit with that name is known, or
	/// another variant if one was found but couldn't be loaded.
	fn resolve( &self, name: &UnitName ) -> Result<Self::Unit, ResolveError> ;

	/// Locates a resource without opening it.
	fn locate_resource( &self, path: &str ) -> Option<ResourceLocation> ;

	/// Opens a resource for reading.
	///
	/// The default implementation opens whatever [`Resolver::locate_resource`] returns.
	fn open_resource( &self, path: &str ) -> Option<Box<dyn Read + Send>> {
		let file = self.locate_resource( path )?.open().ok()?;
		Some( Box::new( file ))
	}

	/// Directories this resolver loads units from, in lookup order.
	///
	/// Compilers get these as their search path.
	fn search_path( &self ) -> Vec<PathBuf> { Vec::with_capacity( 0 ) }

}

impl<R: Resolver + ?Sized> Resolver for Arc<R> {
	type Unit = R::Unit ;
	#[inline] fn resolve( &self, name: &UnitName ) -> Result<Self::Unit, ResolveError> { ( **self ).resolve( name ) }
	#[inline] fn locate_resource( &self, path: &str ) -> Option<ResourceLocation> { ( **self ).locate_resource( path ) }
	#[inline] fn open_resource( &self, path: &str ) -> Option<Box<dyn Read + Send>> { ( **self ).open_resource( path ) }
	#[inline] fn search_path( &self ) -> Vec<PathBuf> { ( **self ).search_path() }
}

/// Errors a [`Resolver`] reports when it can't produce a unit.
#[derive( Debug, Error )]
pub enum ResolveError {
	/// No unit with this name is known.
	#[error( "Unit Not Found: {0}" )] NotFound( UnitName ),
	/// A unit was found but its bytes were refused.
	#[error( "Unit Rejected: {name}: {reason}" )] Rejected { name: UnitName, reason: String },
	/// Reading the unit failed.
	#[error( "IO Error: {0}" )] Io( #[from] std::io::Error ),
}

/// A locatable reference to a resource file.
#[derive( Debug, Clone, PartialEq, Eq, Hash )]
pub struct ResourceLocation( PathBuf );

impl ResourceLocation {

	#[inline] pub fn new( path: impl Into<PathBuf> ) -> Self { Self( path.into()) }

	#[inline] pub fn path( &self ) -> &Path { &self.0 }

	/// Opens the resource for reading.
	///
	/// # Errors
	/// Fails if the file can't be opened.
	pub fn open( &self ) -> std::io::Result<File> { File::open( &self.0 ) }

}
