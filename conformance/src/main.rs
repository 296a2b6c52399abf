// Cross-language vector tool: writes the reference world as encoded by the
// Rust runtime, then decodes and checks every file named on the command line
// (typically the vectors written by the other runtimes).

use std::fs;
use std::process::ExitCode;

use bitpacker::Message;
use bitpacker_conformance::{reference_world, verify_world, WorldState};

const OUTPUT: &str = "test_data_rust.bin";

fn main() -> ExitCode {
    pretty_env_logger::init();

    let encoded = match reference_world().encode() {
        Ok(bytes) => bytes,
        Err(err) => {
            eprintln!("encode failed: {}", err);
            return ExitCode::FAILURE;
        }
    };
    if let Err(err) = WorldState::decode(&encoded).map_err(|e| e.to_string()).and_then(|w| verify_world(&w)) {
        eprintln!("round trip failed: {}", err);
        return ExitCode::FAILURE;
    }
    println!("Rust round trip OK ({} bytes)", encoded.len());

    if let Err(err) = fs::write(OUTPUT, &encoded) {
        eprintln!("{}: {}", OUTPUT, err);
        return ExitCode::FAILURE;
    }
    println!("Wrote {}", OUTPUT);

    let mut failed = false;
    for path in std::env::args().skip(1) {
        let result = fs::read(&path)
            .map_err(|e| e.to_string())
            .and_then(|data| WorldState::decode(&data).map_err(|e| e.to_string()))
            .and_then(|world| verify_world(&world));
        match result {
            Ok(()) => println!("{}: OK", path),
            Err(err) => {
                println!("{}: FAILED ({})", path, err);
                failed = true;
            }
        }
    }

    if failed { ExitCode::FAILURE } else { ExitCode::SUCCESS }
}
