use clap::{Parser, Subcommand};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use bitpacker::{compile_file, decode_to_json, encode_json, Error, Schema};
use bitpacker_compiler::{backend_for, write_artifacts, GeneratorConfig};

#[derive(Parser)]
#[command(name = "bitpacker")]
#[command(about = "Check BitPacker schemas, generate code from them, and encode or decode messages", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a `.buff` schema and print a summary
    Check {
        /// Input `.buff` schema file
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Generate source code from a `.buff` schema
    Generate {
        /// Input `.buff` schema file
        #[arg(short, long)]
        file: PathBuf,

        /// Target language
        #[arg(short, long, default_value = "rust")]
        lang: String,

        /// Output directory; files land in `<out>/<lang>/`
        #[arg(short, long, default_value = "./generated")]
        out: PathBuf,

        /// Generated messages are zlib-compressed
        #[arg(long)]
        compress: bool,

        /// Write type definitions and codec implementations to separate files
        #[arg(long)]
        sep: bool,

        /// Wrap the generated code in a module / package of this name
        #[arg(long)]
        package: Option<String>,
    },

    /// Encode a JSON document as a message of the schema's main class
    Encode {
        /// Input `.buff` schema file
        #[arg(short, long)]
        file: PathBuf,

        /// JSON document to encode
        #[arg(short, long)]
        input: PathBuf,

        /// Output message file
        #[arg(short, long)]
        output: PathBuf,

        /// zlib-compress the message
        #[arg(long)]
        compress: bool,
    },

    /// Decode a message to JSON (printed to stdout)
    Decode {
        /// Input `.buff` schema file
        #[arg(short, long)]
        file: PathBuf,

        /// Message file to decode
        #[arg(short, long)]
        input: PathBuf,

        /// The message is zlib-compressed
        #[arg(long)]
        compress: bool,
    },

    /// Print the validated schema as JSON
    Ir {
        /// Input `.buff` schema file
        #[arg(short, long)]
        file: PathBuf,
    },
}

fn load_schema(path: &Path) -> Result<Schema, Error> {
    if path.extension().and_then(|ext| ext.to_str()) != Some("buff") {
        return Err(Error::Io(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{}: schema files must have the .buff extension", path.display()),
        )));
    }
    Ok(compile_file(path)?)
}

fn main() -> Result<(), Error> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    match &cli.command {
        Commands::Check { file } => {
            let schema = load_schema(file)?;
            println!(
                "{}: version {}, {} class(es)",
                file.display(),
                schema.version,
                schema.classes.len()
            );
            for (i, class) in schema.classes.iter().enumerate() {
                let marker = if i == 0 { " (main)" } else { "" };
                println!("  {}{}: {} field(s)", class.name, marker, class.fields.len());
            }
            Ok(())
        }

        Commands::Generate { file, lang, out, compress, sep, package } => {
            let schema = load_schema(file)?;
            let backend = backend_for(lang)?;

            let mut config = GeneratorConfig::for_schema(&schema);
            config.compress = *compress;
            config.split_files = *sep;
            config.package = package.clone();

            let artifacts = backend.emit(&schema, &config)?;
            let written = write_artifacts(&out.join(backend.id()), &artifacts)?;
            for path in written {
                println!("Generated {}", path.display());
            }
            Ok(())
        }

        Commands::Encode { file, input, output, compress } => {
            let schema = load_schema(file)?;
            let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(input)?)?;
            let bytes = encode_json(&schema, &json, *compress)?;
            fs::write(output, &bytes)?;
            println!("Encoded {} → {} ({} bytes)", input.display(), output.display(), bytes.len());
            Ok(())
        }

        Commands::Decode { file, input, compress } => {
            let schema = load_schema(file)?;
            let data = fs::read(input)?;
            log::debug!("decoding {} bytes from {}", data.len(), input.display());
            println!("{}", decode_to_json(&schema, &data, *compress)?);
            Ok(())
        }

        Commands::Ir { file } => {
            let schema = load_schema(file)?;
            println!("{}", serde_json::to_string_pretty(&schema)?);
            Ok(())
        }
    }
}
