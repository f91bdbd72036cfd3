//! Filesystem layout of a project.
//!
//! The shape is fixed: sources live in `src/main/wat`, build artifacts in
//! `target/classes` and overlay resources in `src/main/resources`. Only the
//! project root the three are resolved against can move.

use std::path::{ Component, Path, PathBuf };

use crate::UnitName ;



/// Extension of source artifacts under [`Layout::source_root`].
pub const SOURCE_EXTENSION: &str = "wat";
/// Extension of build artifacts under [`Layout::build_root`].
pub const ARTIFACT_EXTENSION: &str = "wasm";

/// Where sources, build artifacts and overlay resources are found.
#[derive( Debug, Clone, PartialEq, Eq )]
pub struct Layout {
	source_root: PathBuf,
	build_root: PathBuf,
	resource_root: PathBuf,
}

impl Layout {

	/// Resolves the fixed layout against `project_root`.
	pub fn new( project_root: impl AsRef<Path> ) -> Self {
		let root = project_root.as_ref();
		Self {
			source_root: root.join( "src" ).join( "main" ).join( SOURCE_EXTENSION ),
			build_root: root.join( "target" ).join( "classes" ),
			resource_root: root.join( "src" ).join( "main" ).join( "resources" ),
		}
	}

	#[inline] pub fn source_root( &self ) -> &Path { &self.source_root }
	#[inline] pub fn build_root( &self ) -> &Path { &self.build_root }
	#[inline] pub fn resource_root( &self ) -> &Path { &self.resource_root }

	/// Path of the source artifact for `name`, or `None` if the name is malformed.
	pub fn source_path( &self, name: &UnitName ) -> Option<PathBuf> {
		name.relative_path( SOURCE_EXTENSION ).map(| path | self.source_root.join( path ))
	}

	/// Path of the build artifact for `name`, or `None` if the name is malformed.
	pub fn artifact_path( &self, name: &UnitName ) -> Option<PathBuf> {
		name.relative_path( ARTIFACT_EXTENSION ).map(| path | self.build_root.join( path ))
	}

	/// Path of an overlay resource, or `None` if `path` would escape the overlay root.
	pub fn resource_path( &self, path: &str ) -> Option<PathBuf> {
		relative_resource_path( path ).map(| path | self.resource_root.join( path ))
	}

}

impl Default for Layout {
	/// The layout rooted at the working directory.
	fn default() -> Self { Self::new( "." ) }
}

/// Normalises a resource path to a relative one.
///
/// Absolute paths, drive prefixes and `..` components are refused; `.` components
/// are dropped.
pub(crate) fn relative_resource_path( path: &str ) -> Option<PathBuf> {
	let mut relative = PathBuf::new();
	for component in Path::new( path ).components() {
		match component {
			Component::Normal( segment ) => relative.push( segment ),
			Component::CurDir => {}
			Component::ParentDir | Component::RootDir | Component::Prefix( _ ) => return None,
		}
	}
	match relative.as_os_str().is_empty() {
		true => None,
		false => Some( relative ),
	}
}
