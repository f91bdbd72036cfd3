//! Qualified unit names.
//!
//! A [`UnitName`] is a `.` or `/` delimited identifier such as `com.app.Widget`.
//! Source and build artifact paths are derived from it by turning every delimiter
//! into a path separator and appending an extension.

use std::path::PathBuf ;
use itertools::Itertools ;



/// Marks a unit that lives inside another unit and can't be compiled on its own.
pub const NESTED_MARKER: char = '$';

const DELIMITERS: [char; 2] = [ '.', '/' ];

/// The symbolic name of a loadable code unit.
///
/// ```
/// use wasm_devload::UnitName ;
///
/// let name = UnitName::new( "com.app.Widget" );
/// assert!( name.is_within( "com.app" ));
/// assert!( !name.is_within( "com.ap" ));
/// assert!( !name.is_nested() );
/// assert_eq!(
/// 	name.relative_path( "wasm" ),
/// 	Some( std::path::PathBuf::from( "com/app/Widget.wasm" )),
/// );
/// assert_eq!( UnitName::new( "com..Widget" ).relative_path( "wasm" ), None );
/// ```
#[derive( Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash )]
pub struct UnitName( String );

impl UnitName {

	/// Wraps a qualified name. No validation happens here; a name that can't be
	/// mapped onto a path simply never resolves locally.
	#[inline]
	pub fn new( name: impl Into<String> ) -> Self { Self( name.into()) }

	#[inline] pub fn as_str( &self ) -> &str { &self.0 }

	/// Whether the name refers to a nested unit (contains [`NESTED_MARKER`]).
	#[inline] pub fn is_nested( &self ) -> bool { self.0.contains( NESTED_MARKER ) }

	/// Whether the leading segments of the name are the segments of `prefix`.
	///
	/// Either delimiter may be used on either side, so `com/app/Foo` is within
	/// `com.app`, but `com.appx.Foo` is not.
	pub fn is_within( &self, prefix: &str ) -> bool {
		let mut segments = self.segments();
		prefix.split( DELIMITERS ).all(| expected | segments.next() == Some( expected ))
	}

	/// The same name with every delimiter spelled as `.`.
	///
	/// ```
	/// use wasm_devload::UnitName ;
	///
	/// assert_eq!( UnitName::new( "com/app.Widget" ).canonical(), UnitName::new( "com.app.Widget" ));
	/// ```
	pub fn canonical( &self ) -> Self { Self( self.segments().join( "." )) }

	/// Iterates over the delimited segments of the name.
	pub fn segments( &self ) -> impl Iterator<Item = &str> {
		self.0.split( DELIMITERS )
	}

	/// Derives the relative file path for this unit with the given extension.
	///
	/// Returns `None` when a segment can't become a path component: empty
	/// segments, `.` and `..`, or segments carrying a backslash or NUL.
	pub fn relative_path( &self, extension: &str ) -> Option<PathBuf> {
		let segments = self.segments().collect_vec();
		if segments.iter().any(| segment | !is_valid_segment( segment )) { return None }
		let ( last, parents ) = segments.split_last()?;
		let mut path = parents.iter().collect::<PathBuf>();
		path.push( format!( "{}.{}", last, extension ));
		Some( path )
	}

}

fn is_valid_segment( segment: &str ) -> bool {
	!segment.is_empty()
		&& segment != "."
		&& segment != ".."
		&& !segment.contains([ '\\', '\0' ])
}

impl std::fmt::Display for UnitName {
	fn fmt( &self, f: &mut std::fmt::Formatter<'_> ) -> std::fmt::Result { f.write_str( &self.0 ) }
}

impl AsRef<str> for UnitName {
	fn as_ref( &self ) -> &str { &self.0 }
}

impl From<&str> for UnitName {
	fn from( name: &str ) -> Self { Self::new( name ) }
}

impl From<String> for UnitName {
	fn from( name: String ) -> Self { Self( name ) }
}
