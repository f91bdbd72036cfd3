use std::sync::Arc ;
use wasm_devload::{ CommandCompiler, CompileError, CompileRequest, Compiler, Origin, UnitLoader, UnitName };

use crate::fixtures::{ Project, RecordingSpace, Source, StubDelegate };

// Positional parameters after the script name:
// $1 search-path flag, $2 search path, $3 output flag, $4 output dir, $5 source.
const COPY_SCRIPT: &str = r#"mkdir -p "$4/com/app" && cp "$5" "$4/com/app/Widget.wasm""#;

fn shell( script: &str ) -> CommandCompiler {
	CommandCompiler::new( "sh" ).arg( "-c" ).arg( script ).arg( "toolchain" )
}

#[test]
fn successful_toolchain_produces_the_artifact() {

	let project = Project::new();
	project.write_source( "com.app.Widget", "(component)" );
	let delegate = Arc::new( StubDelegate::new() );
	let loader = UnitLoader::new( Arc::clone( &delegate ), RecordingSpace, shell( COPY_SCRIPT ))
		.with_layout( project.layout.clone() );

	let name = UnitName::new( "com.app.Widget" );
	let unit = loader.resolve( &name ).expect( "failed to resolve" );

	assert_eq!( unit.source, Source::Space );
	assert_eq!( unit.bytes.as_slice(), b"(component)" );
	assert_eq!( loader.origin( &name ), Some( Origin::Local ));
	assert_eq!( delegate.calls(), 0 );

}

#[test]
fn flags_are_passed_in_order() {

	let project = Project::new();
	let output = project.root().join( "args.txt" );
	let script = format!( r#"printf '%s\n' "$@" > "{}""#, output.display() );
	let compiler = shell( &script ).search_path_flag( "-L" ).output_flag( "-o" );

	let name = UnitName::new( "com.app.Widget" );
	let source = project.root().join( "Widget.wat" );
	let output_dir = project.root().join( "out" );
	compiler.compile( &CompileRequest {
		unit: &name,
		source: &source,
		output_dir: &output_dir,
		search_path: std::ffi::OsStr::new( "/lib/a:/lib/b" ),
	}).expect( "failed to compile" );

	let args = std::fs::read_to_string( output ).expect( "failed to read arguments" );
	assert_eq!( args.lines().collect::<Vec<_>>(), vec![
		"-L",
		"/lib/a:/lib/b",
		"-o",
		output_dir.to_str().expect( "non-utf8 path" ),
		source.to_str().expect( "non-utf8 path" ),
	]);

}

#[test]
fn failing_toolchain_reports_status_and_diagnostics() {

	let project = Project::new();
	let name = UnitName::new( "com.app.Widget" );
	let source = project.root().join( "Widget.wat" );
	let result = shell( "echo 'syntax error' >&2; exit 3" ).compile( &CompileRequest {
		unit: &name,
		source: &source,
		output_dir: project.root(),
		search_path: std::ffi::OsStr::new( "" ),
	});

	let message = result.as_ref().err().map( ToString::to_string ).unwrap_or_default();
	match result {
		Err( CompileError::Failed { status: Some( status ), diagnostics }) => {
			assert_eq!( status.code(), Some( 3 ));
			assert_eq!( diagnostics.trim(), "syntax error" );
			assert!( message.starts_with( "Compilation Failed (exit status: 3)" ), "{}", message );
		}
		other => panic!( "Expected Failed, got: {:#?}", other ),
	}

}

#[test]
fn failing_toolchain_falls_back_to_delegate() {

	let project = Project::new();
	project.write_source( "com.app.Widget", "(component)" );
	let delegate = Arc::new( StubDelegate::new().with_unit( "com.app.Widget", b"external" ));
	let loader = UnitLoader::new( Arc::clone( &delegate ), RecordingSpace, shell( "exit 1" ))
		.with_layout( project.layout.clone() );

	let unit = loader.resolve( &UnitName::new( "com.app.Widget" )).expect( "failed to resolve" );

	assert_eq!( unit.source, Source::Delegate );
	assert_eq!( delegate.calls(), 1 );

}

#[test]
fn missing_toolchain_is_a_spawn_error() {

	let project = Project::new();
	let name = UnitName::new( "com.app.Widget" );
	let source = project.root().join( "Widget.wat" );
	let result = CommandCompiler::new( "definitely-not-a-real-toolchain" ).compile( &CompileRequest {
		unit: &name,
		source: &source,
		output_dir: project.root(),
		search_path: std::ffi::OsStr::new( "" ),
	});

	assert!( matches!( result, Err( CompileError::Spawn( _ ))));

}
