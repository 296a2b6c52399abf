use std::path::{Path, PathBuf};
use bitpacker_compiler::{compile_file, write_artifacts, Backend, GeneratorConfig, RustBackend};

fn generate(schema_path: &str, out_dir: &Path, configure: impl FnOnce(&mut GeneratorConfig)) {
    println!("cargo:rerun-if-changed={}", schema_path);

    let schema = compile_file(schema_path)
        .unwrap_or_else(|err| panic!("{}: {}", schema_path, err));
    let mut config = GeneratorConfig::for_schema(&schema);
    configure(&mut config);

    let artifacts = RustBackend
        .emit(&schema, &config)
        .unwrap_or_else(|err| panic!("{}: {}", schema_path, err));
    write_artifacts(out_dir, &artifacts).expect("Failed to write generated code!");
}

fn main() {
    let out_dir = PathBuf::from(std::env::var("OUT_DIR").expect("OUT_DIR is set by cargo"));

    generate("schema/world.buff", &out_dir.join("plain"), |_| {});
    generate("schema/world.buff", &out_dir.join("packed"), |config| {
        config.compress = true;
        config.package = Some("packed".into());
    });
    generate("schema/tree.buff", &out_dir.join("split"), |config| {
        config.split_files = true;
    });
}
