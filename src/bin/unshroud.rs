//! Standalone decoder binary for shroud output.
//!
//! Reverses what can be reversed mechanically: identifier renames (when the
//! rename map written by `shroud obfuscate --map` is available) and
//! `atob()` string calls. Stripped comments and collapsed whitespace are
//! gone for good.
//!
//! Usage:
//!   unshroud <file> [--map <file>]

use shroud::{decode_strings, replace_word};
use std::env;
use std::fs;
use std::path::PathBuf;
use std::process;

/// Manifest structure written by `shroud obfuscate --map`.
#[derive(serde::Deserialize)]
struct MapManifest {
    output_digest: String,
    entries: Vec<(String, String)>,
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: unshroud <file> [--map <file>]");
        process::exit(1);
    }

    let file_path = PathBuf::from(&args[1]);

    let map_path = if args.len() >= 4 && args[2] == "--map" {
        Some(PathBuf::from(&args[3]))
    } else {
        None
    };

    let content = fs::read_to_string(&file_path)
        .map_err(|e| format!("Failed to read {:?}: {}", file_path, e))?;

    let mut result = content.clone();

    if let Some(map_path) = map_path {
        let map_content = fs::read_to_string(&map_path)
            .map_err(|e| format!("Failed to read map file {:?}: {}", map_path, e))?;
        let manifest: MapManifest = serde_yaml::from_str(&map_content)
            .map_err(|e| format!("Failed to parse map file: {}", e))?;

        if digest(&content) != manifest.output_digest {
            eprintln!(
                "Warning: map digest does not match {:?}; decoding anyway",
                file_path
            );
        }

        // Generated names are unique `_<base36>` tokens, so putting the
        // originals back in entry order cannot cascade.
        for (original, replacement) in &manifest.entries {
            result = replace_word(&result, replacement, original);
        }
    }

    result = decode_strings(&result);

    print!("{}", result);

    Ok(())
}

fn digest(text: &str) -> String {
    use sha2::{Digest, Sha256};

    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    hex::encode(hasher.finalize())
}
