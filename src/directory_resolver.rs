//! Resolution from directories of prebuilt artifacts.

use std::path::PathBuf ;

use crate::{ ResolveError, ResourceLocation, Resolver, UnitName, UnitSpace };
use crate::layout::{ relative_resource_path, ARTIFACT_EXTENSION };



/// Resolves units from prebuilt build artifacts found under a list of directories.
///
/// Directories are searched in order and the first match wins, for units and
/// resources alike. The directories double as the search path handed to
/// compilers of any [`UnitLoader`]( crate::UnitLoader ) delegating here.
///
/// This is the usual end of a chain of loaders.
#[derive( Debug, Clone )]
pub struct DirectoryResolver<S: UnitSpace> {
	space: S,
	directories: Vec<PathBuf>,
}

impl<S: UnitSpace> DirectoryResolver<S> {

	pub fn new( space: S, directories: impl IntoIterator<Item = impl Into<PathBuf>> ) -> Self {
		Self { space, directories: directories.into_iter().map( Into::into ).collect() }
	}

	#[inline] pub fn directories( &self ) -> &[PathBuf] { &self.directories }

}

impl<S: UnitSpace> Resolver for DirectoryResolver<S> {
	type Unit = S::Unit ;

	fn resolve( &self, name: &UnitName ) -> Result<S::Unit, ResolveError> {
		let relative = name.relative_path( ARTIFACT_EXTENSION )
			.ok_or_else(|| ResolveError::NotFound( name.clone() ))?;
		let artifact = self.directories.iter()
			.map(| directory | directory.join( &relative ))
			.find(| artifact | artifact.is_file() )
			.ok_or_else(|| ResolveError::NotFound( name.clone() ))?;
		let bytes = std::fs::read( &artifact )?;
		self.space.define( name, &bytes ).map_err(| err | ResolveError::Rejected {
			name: name.clone(),
			reason: err.to_string(),
		})
	}

	fn locate_resource( &self, path: &str ) -> Option<ResourceLocation> {
		let relative = relative_resource_path( path )?;
		self.directories.iter()
			.map(| directory | directory.join( &relative ))
			.find(| file | file.is_file() )
			.map( ResourceLocation::new )
	}

	fn search_path( &self ) -> Vec<PathBuf> { self.directories.clone() }
}
