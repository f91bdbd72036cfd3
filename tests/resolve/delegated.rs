use std::sync::Arc ;
use wasm_devload::{ Origin, ResolveError, UnitName };

use crate::fixtures::{ loader, FakeCompiler, Project, Source, StubDelegate };

#[test]
fn missing_source_delegates_without_compiling() {

	let project = Project::new();
	let delegate = Arc::new( StubDelegate::new().with_unit( "com.app.Missing", b"external" ));
	let compiler = Arc::new( FakeCompiler::writing( b"compiled" ));
	let loader = loader( &project, &delegate, &compiler );

	let name = UnitName::new( "com.app.Missing" );
	let unit = loader.resolve( &name ).expect( "failed to resolve" );

	assert_eq!( unit.source, Source::Delegate );
	assert_eq!( unit.bytes.as_slice(), b"external" );
	assert_eq!( compiler.calls(), 0 );
	assert_eq!( delegate.calls_for( "com.app.Missing" ), 1 );
	assert_eq!( loader.origin( &name ), Some( Origin::Delegated ));

}

#[test]
fn nested_unit_without_artifact_delegates() {

	let project = Project::new();
	project.write_source( "com.app.Widget$Inner", "(component)" );
	let delegate = Arc::new( StubDelegate::new().with_unit( "com.app.Widget$Inner", b"external" ));
	let compiler = Arc::new( FakeCompiler::writing( b"compiled" ));
	let loader = loader( &project, &delegate, &compiler );

	let unit = loader.resolve( &UnitName::new( "com.app.Widget$Inner" )).expect( "failed to resolve" );

	assert_eq!( unit.source, Source::Delegate );
	assert_eq!( compiler.calls(), 0 );

}

#[test]
fn rejected_artifact_delegates() {

	let project = Project::new();
	project.write_source( "com.app.Widget", "(component)" );
	let delegate = Arc::new( StubDelegate::new().with_unit( "com.app.Widget", b"external" ));
	let compiler = Arc::new( FakeCompiler::writing( b"bad bytes" ));
	let loader = loader( &project, &delegate, &compiler );

	let unit = loader.resolve( &UnitName::new( "com.app.Widget" )).expect( "failed to resolve" );

	assert_eq!( unit.source, Source::Delegate );
	assert_eq!( compiler.calls(), 1 );

}

#[test]
fn malformed_name_delegates() {

	let project = Project::new();
	let delegate = Arc::new( StubDelegate::new().with_unit( "com..Widget", b"external" ));
	let compiler = Arc::new( FakeCompiler::writing( b"compiled" ));
	let loader = loader( &project, &delegate, &compiler );

	let unit = loader.resolve( &UnitName::new( "com..Widget" )).expect( "failed to resolve" );

	assert_eq!( unit.source, Source::Delegate );
	assert_eq!( compiler.calls(), 0 );

}

#[test]
fn delegate_failure_is_the_only_error() {

	let project = Project::new();
	let delegate = Arc::new( StubDelegate::new() );
	let compiler = Arc::new( FakeCompiler::failing() );
	let loader = loader( &project, &delegate, &compiler );

	match loader.resolve( &UnitName::new( "com.app.Nowhere" )) {
		Err( ResolveError::NotFound( name )) => assert_eq!( name.as_str(), "com.app.Nowhere" ),
		other => panic!( "Expected NotFound, got: {:#?}", other ),
	}

}
