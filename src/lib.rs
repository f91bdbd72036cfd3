//! A compile-on-demand loader for WebAssembly components during development.
//!
//! Given the qualified name of a unit, `wasm_devload` looks for a matching source
//! file in the project, runs an external compiler over it, loads the resulting
//! artifact and caches the outcome. Whenever that isn't possible it falls back to
//! a delegate resolver, which is also the only thing that can make a lookup fail.
//! A resource overlay directory gets the same treatment for plain files.
//!
//! # Core Concepts
//!
//! - [`UnitName`]: A `.` or `/` delimited name such as `com.app.Widget`. Names
//! 	containing [`NESTED_MARKER`] are never compiled on their own.
//!
//! - [`Layout`]: The fixed project shape. Sources live in `src/main/wat`, build
//! 	artifacts in `target/classes` and overlay resources in `src/main/resources`.
//!
//! - [`Resolver`]: The capability a loader delegates to. [`UnitLoader`] implements
//! 	it as well, so loaders chain by composition. [`DirectoryResolver`] resolves
//! 	from directories of prebuilt artifacts and usually ends the chain.
//!
//! - [`Compiler`]: The external toolchain. [`CommandCompiler`] runs a process;
//! 	functions and closures with the same signature work too.
//!
//! - [`UnitSpace`]: Turns artifact bytes into loaded units. [`ComponentSpace`]
//! 	produces wasmtime [`Component`]s.
//!
//! # Resolution
//!
//! A name is compiled locally only if it is in scope (see [`UnitLoader::with_scope`]),
//! not nested, and has a source file. The build artifact is read back no matter what
//! the compiler reported; an artifact left over from an earlier build is loaded just
//! the same. Local and delegated outcomes are cached for the lifetime of the loader.
//! Compilations are serialised through a [`CompileLock`].
//!
//! # Example
//!
//! ```
//! use std::io::Read ;
//! use wasm_devload::{ ComponentSpace, DirectoryResolver, Engine, Layout, Origin, Resolver, UnitLoader, UnitName };
//! use wasm_devload::{ Compiler, CompileError, CompileRequest };
//!
//! // Stands in for a real toolchain: copies the text format over as is.
//! struct CopyCompiler ;
//!
//! impl Compiler for CopyCompiler {
//! 	fn compile( &self, request: &CompileRequest<'_> ) -> Result<(), CompileError> {
//! 		let artifact = request.output_dir.join( request.unit.relative_path( "wasm" ).unwrap() );
//! 		std::fs::create_dir_all( artifact.parent().unwrap() ).map_err( CompileError::OutputDirectory )?;
//! 		std::fs::copy( request.source, artifact ).map_err( CompileError::OutputDirectory )?;
//! 		Ok(())
//! 	}
//! }
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! # let project = tempfile::tempdir()?;
//! let layout = Layout::new( project.path() );
//! std::fs::create_dir_all( layout.source_root().join( "app" ))?;
//! std::fs::write( layout.source_root().join( "app" ).join( "Widget.wat" ), "(component)" )?;
//! std::fs::create_dir_all( layout.resource_root() )?;
//! std::fs::write( layout.resource_root().join( "greeting.txt" ), "hello" )?;
//!
//! let engine = Engine::default();
//! let loader = UnitLoader::new(
//! 	DirectoryResolver::new( ComponentSpace::new( engine.clone() ), Vec::<std::path::PathBuf>::new() ),
//! 	ComponentSpace::new( engine ),
//! 	CopyCompiler,
//! ).with_layout( layout );
//!
//! let name = UnitName::new( "app.Widget" );
//! let _component = loader.resolve( &name )?;
//! assert_eq!( loader.origin( &name ), Some( Origin::Local ));
//!
//! let mut greeting = String::new();
//! loader.open_resource( "greeting.txt" ).unwrap().read_to_string( &mut greeting )?;
//! assert_eq!( greeting, "hello" );
//! # Ok(())
//! # }
//! ```

mod unit_name ;
mod layout ;
mod resolver ;
mod compiler ;
mod unit_space ;
mod resource_overlay ;
mod directory_resolver ;
mod unit_loader ;

#[doc( no_inline )]
pub use wasmtime::Engine ;
#[doc( no_inline )]
pub use wasmtime::component::Component ;

pub use unit_name::{ UnitName, NESTED_MARKER };
pub use layout::{ Layout, SOURCE_EXTENSION, ARTIFACT_EXTENSION };
pub use resolver::{ Resolver, ResolveError, ResourceLocation };
pub use compiler::{ Compiler, CompileRequest, CompileError, CommandCompiler };
pub use unit_space::{ UnitSpace, ComponentSpace };
pub use resource_overlay::ResourceOverlay ;
pub use directory_resolver::DirectoryResolver ;
pub use unit_loader::{ UnitLoader, Origin, CompileLock };
