//! Resource lookup with an overlay directory in front of a fallback resolver.

use std::fs::File ;
use std::io::Read ;
use std::path::{ Path, PathBuf };
use pipe_trait::Pipe ;

use crate::{ ResourceLocation, Resolver };
use crate::layout::relative_resource_path ;



/// Serves resources from a directory before asking a fallback [`Resolver`].
///
/// Nothing is cached; every lookup checks the filesystem again.
#[derive( Debug, Clone, PartialEq, Eq )]
pub struct ResourceOverlay {
	root: PathBuf,
}

impl ResourceOverlay {

	#[inline] pub fn new( root: impl Into<PathBuf> ) -> Self { Self { root: root.into() }}

	#[inline] pub fn root( &self ) -> &Path { &self.root }

	/// Locates `path` in the overlay, or wherever `fallback` locates it.
	pub fn locate<R: Resolver + ?Sized>( &self, path: &str, fallback: &R ) -> Option<ResourceLocation> {
		match self.overlay_file( path ) {
			Some( file ) => Some( ResourceLocation::new( file )),
			None => fallback.locate_resource( path ),
		}
	}

	/// Opens `path` from the overlay, or through `fallback`.
	///
	/// An overlay file that exists but can't be opened is treated as absent.
	pub fn open<R: Resolver + ?Sized>( &self, path: &str, fallback: &R ) -> Option<Box<dyn Read + Send>> {
		let Some( file ) = self.overlay_file( path ) else { return fallback.open_resource( path ) };
		match File::open( &file ) {
			Ok( file ) => Some( Box::new( file )),
			Err( err ) => {
				log::debug!( "Overlay resource {} unreadable, falling back: {}", file.display(), err );
				fallback.open_resource( path )
			}
		}
	}

	fn overlay_file( &self, path: &str ) -> Option<PathBuf> {
		relative_resource_path( path )?
			.pipe(| relative | self.root.join( relative ))
			.pipe(| file | match file.is_file() {
				true => Some( file ),
				false => None,
			})
	}

}
