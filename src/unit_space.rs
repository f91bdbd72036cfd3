//! Materialising build artifacts into loaded units.

use wasmtime::Engine ;
use wasmtime::component::Component ;

use crate::UnitName ;



/// Turns the bytes of a build artifact into a loaded unit.
pub trait UnitSpace: Send + Sync {

	/// The loaded unit. Handed out by clone, so this should be a shared handle.
	type Unit: Clone + Send + Sync ;

	/// Why a set of bytes was refused.
	type Error: std::fmt::Display ;

	/// Defines a unit named `name` from `bytes`.
	///
	/// # Errors
	/// Fails if the bytes don't form a valid unit.
	fn define( &self, name: &UnitName, bytes: &[u8] ) -> Result<Self::Unit, Self::Error> ;

}

/// Compiles artifacts into wasmtime [`Component`]s bound to one [`Engine`].
///
/// Both the binary and the text format are accepted.
///
/// ```
/// use wasm_devload::{ ComponentSpace, UnitName, UnitSpace, Engine };
///
/// let space = ComponentSpace::new( Engine::default() );
/// assert!( space.define( &UnitName::new( "a.Empty" ), b"(component)" ).is_ok() );
/// assert!( space.define( &UnitName::new( "a.Broken" ), b"not wasm" ).is_err() );
/// ```
#[derive( Clone )]
pub struct ComponentSpace {
	engine: Engine,
}

impl ComponentSpace {
	#[inline] pub fn new( engine: Engine ) -> Self { Self { engine }}
	#[inline] pub fn engine( &self ) -> &Engine { &self.engine }
}

impl UnitSpace for ComponentSpace {
	type Unit = Component ;
	type Error = wasmtime::Error ;

	fn define( &self, name: &UnitName, bytes: &[u8] ) -> Result<Component, wasmtime::Error> {
		log::trace!( "Defining component {} from {} bytes", name, bytes.len() );
		Component::new( &self.engine, bytes )
	}
}

impl std::fmt::Debug for ComponentSpace {
	fn fmt( &self, f: &mut std::fmt::Formatter<'_> ) -> std::fmt::Result {
		f.debug_struct( "ComponentSpace" )
			.field( "engine", &"<Engine>" )
			.finish()
	}
}
