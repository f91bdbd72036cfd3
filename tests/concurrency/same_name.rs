use std::sync::{ Arc, Barrier };
use std::time::Duration ;
use wasm_devload::UnitName ;

use crate::fixtures::{ loader, FakeCompiler, Project, Source, StubDelegate };

const THREADS: usize = 8 ;

fn resolve_from_threads<T: Send>( threads: usize, barrier: &Barrier, resolve: impl Fn() -> T + Sync ) -> Vec<T> {
	let resolve = &resolve ;
	std::thread::scope(| scope | {
		let handles = ( 0..threads ).map(| _ | scope.spawn( move || {
			barrier.wait();
			resolve()
		})).collect::<Vec<_>>();
		handles.into_iter().map(| handle | handle.join().expect( "resolver thread panicked" )).collect()
	})
}

#[test]
fn concurrent_first_resolutions_compile_once() {

	let project = Project::new();
	project.write_source( "com.app.Widget", "(component)" );
	let delegate = Arc::new( StubDelegate::new() );
	let compiler = Arc::new( FakeCompiler::writing( b"compiled widget" ).with_delay( Duration::from_millis( 50 )));
	let loader = loader( &project, &delegate, &compiler );
	let barrier = Barrier::new( THREADS );
	let name = UnitName::new( "com.app.Widget" );

	let units = resolve_from_threads( THREADS, &barrier, || loader.resolve( &name ).expect( "failed to resolve" ));

	assert_eq!( compiler.calls(), 1 );
	assert_eq!( delegate.calls(), 0 );
	for unit in &units {
		assert_eq!( unit.source, Source::Space );
		assert_eq!( unit.bytes.as_slice(), b"compiled widget" );
		assert!( unit.same_as( &units[0] ));
	}

}

#[test]
fn concurrent_delegations_resolve_once() {

	let project = Project::new();
	let delegate = Arc::new( StubDelegate::new().with_unit( "org.other.Lib", b"external" ));
	let compiler = Arc::new( FakeCompiler::writing( b"compiled" ));
	let loader = loader( &project, &delegate, &compiler ).with_scope( "com.app" );
	let barrier = Barrier::new( THREADS );
	let name = UnitName::new( "org.other.Lib" );

	let units = resolve_from_threads( THREADS, &barrier, || loader.resolve( &name ).expect( "failed to resolve" ));

	assert_eq!( delegate.calls(), 1 );
	assert!( units.iter().all(| unit | unit.same_as( &units[0] )));

}
