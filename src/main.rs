use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use sha2::{Digest, Sha256};
use shroud::{encode_strings, normalize, transform, RenameMap, TransformOptions};
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

/// shroud - pattern-based source obfuscator
///
/// Strips comments and whitespace, optionally renames identifiers and
/// encodes string literals. The output is harder to read, nothing more:
/// do not mistake it for protection.
#[derive(Parser)]
#[command(name = "shroud")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Obfuscate a source file (or stdin)
    Obfuscate {
        /// Path to the source file; reads stdin when omitted
        path: Option<PathBuf>,

        /// Rename identifiers to short generated names
        #[arg(long, short = 'r', default_value_t = false)]
        rename_identifiers: bool,

        /// Encode string literals as atob() calls
        #[arg(long, short = 'e', default_value_t = false)]
        encode_strings: bool,

        /// Write the result here instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,

        /// Write the rename map as YAML (requires --rename-identifiers)
        #[arg(long)]
        map: Option<PathBuf>,
    },

    /// Show version information
    Version,
}

/// On-disk manifest for a rename map: the entries plus a digest of the
/// obfuscated output they belong to, so `unshroud` can tell when a map and
/// a file do not match.
#[derive(Serialize)]
struct MapManifest<'a> {
    output_digest: String,
    entries: &'a [(String, String)],
}

fn output_digest(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    hex::encode(hasher.finalize())
}

fn read_source(path: &Option<PathBuf>) -> Result<String> {
    match path {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read source file {:?}", path)),
        None => {
            let mut source = String::new();
            io::stdin()
                .read_to_string(&mut source)
                .context("Failed to read source from stdin")?;
            Ok(source)
        }
    }
}

fn handle_obfuscate(
    path: Option<PathBuf>,
    rename: bool,
    encode: bool,
    output: Option<PathBuf>,
    map: Option<PathBuf>,
) -> Result<()> {
    if map.is_some() && !rename {
        anyhow::bail!("--map requires --rename-identifiers");
    }

    let source = read_source(&path)?;

    // Stage the passes by hand when a map file was requested; the map must
    // be built from the same intermediate text the renamer saw.
    let (result, rename_map) = if map.is_some() && !source.trim().is_empty() {
        let mut result = normalize(&source);
        if encode {
            result = encode_strings(&result);
        }
        let rename_map = RenameMap::from_text(&result);
        result = rename_map.apply(&result);
        (result, Some(rename_map))
    } else {
        let options = TransformOptions {
            rename_identifiers: rename,
            encode_strings: encode,
        };
        (transform(&source, &options), None)
    };

    match &output {
        Some(out_path) => {
            fs::write(out_path, &result)
                .with_context(|| format!("Failed to write output to {:?}", out_path))?;
            println!("✓ Obfuscated: {:?}", out_path);
            println!("  {} bytes in, {} bytes out", source.len(), result.len());
            if let Some(rename_map) = &rename_map {
                println!("  Renamed identifiers: {}", rename_map.len());
            }
        }
        None => print!("{}", result),
    }

    if let Some(map_path) = &map {
        let rename_map = rename_map.unwrap_or_default();
        let manifest = MapManifest {
            output_digest: output_digest(&result),
            entries: rename_map.entries(),
        };
        let yaml = serde_yaml::to_string(&manifest).context("Failed to serialize rename map")?;
        fs::write(map_path, yaml)
            .with_context(|| format!("Failed to write map file {:?}", map_path))?;
        if output.is_some() {
            println!("✓ Rename map: {:?}", map_path);
        }
    }

    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Obfuscate {
            path,
            rename_identifiers,
            encode_strings,
            output,
            map,
        } => handle_obfuscate(path, rename_identifiers, encode_strings, output, map),
        Commands::Version => {
            println!("shroud {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_obfuscate_defaults() {
        let cli = Cli::parse_from(["shroud", "obfuscate", "input.js"]);
        match cli.command {
            Commands::Obfuscate {
                path,
                rename_identifiers,
                encode_strings,
                output,
                map,
            } => {
                assert_eq!(path, Some(PathBuf::from("input.js")));
                assert!(!rename_identifiers);
                assert!(!encode_strings);
                assert!(output.is_none());
                assert!(map.is_none());
            }
            _ => panic!("Expected Obfuscate command"),
        }
    }

    #[test]
    fn test_cli_parses_obfuscate_flags() {
        let cli = Cli::parse_from(["shroud", "obfuscate", "input.js", "-r", "-e"]);
        match cli.command {
            Commands::Obfuscate {
                rename_identifiers,
                encode_strings,
                ..
            } => {
                assert!(rename_identifiers);
                assert!(encode_strings);
            }
            _ => panic!("Expected Obfuscate command"),
        }
    }

    #[test]
    fn test_cli_parses_obfuscate_stdin_with_map() {
        let cli = Cli::parse_from([
            "shroud",
            "obfuscate",
            "--rename-identifiers",
            "--map",
            "out.map.yaml",
        ]);
        match cli.command {
            Commands::Obfuscate {
                path,
                rename_identifiers,
                map,
                ..
            } => {
                assert_eq!(path, None);
                assert!(rename_identifiers);
                assert_eq!(map, Some(PathBuf::from("out.map.yaml")));
            }
            _ => panic!("Expected Obfuscate command"),
        }
    }

    #[test]
    fn test_cli_parses_version() {
        let cli = Cli::parse_from(["shroud", "version"]);
        match cli.command {
            Commands::Version => {}
            _ => panic!("Expected Version command"),
        }
    }

    #[test]
    fn test_map_without_rename_is_rejected() {
        let err = handle_obfuscate(
            None,
            false,
            false,
            None,
            Some(PathBuf::from("out.map.yaml")),
        )
        .unwrap_err();
        assert!(err.to_string().contains("--map requires"));
    }

    #[test]
    fn test_output_digest_is_stable() {
        assert_eq!(
            output_digest("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_manifest_serializes_entries_in_order() {
        let rename_map = RenameMap::from_text("alpha beta");
        let manifest = MapManifest {
            output_digest: output_digest("_0 _1"),
            entries: rename_map.entries(),
        };
        let yaml = serde_yaml::to_string(&manifest).unwrap();
        assert!(yaml.contains("output_digest"));
        let alpha = yaml.find("alpha").unwrap();
        let beta = yaml.find("beta").unwrap();
        assert!(alpha < beta);
    }
}
