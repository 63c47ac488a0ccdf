//! Build script for storefront crate.
//!
//! Generates content-based hashes for static assets (CSS and JS) so the
//! templates can link immutable, cache-busted copies.

use std::env;
use std::fs;
use std::path::Path;

use sha2::{Digest, Sha256};

fn main() {
    hash_asset("css", "main", "CSS_HASH");
    hash_asset("js", "app", "JS_HASH");
}

/// Hash `static/{kind}/{stem}.{kind}` and copy it to the derived directory
/// with the hash in its filename.
///
/// Sets `env_var` for use with `env!`. A missing file yields an empty hash.
fn hash_asset(kind: &str, stem: &str, env_var: &str) {
    let Ok(manifest_dir) = env::var("CARGO_MANIFEST_DIR") else {
        println!("cargo:rustc-env={env_var}=");
        return;
    };
    let asset_dir = Path::new(&manifest_dir).join("static").join(kind);
    let source = asset_dir.join(format!("{stem}.{kind}"));

    println!("cargo:rerun-if-changed={}", source.display());

    let content = match fs::read(&source) {
        Ok(content) => content,
        Err(e) => {
            println!("cargo:warning=Could not read {}: {e}", source.display());
            println!("cargo:rustc-env={env_var}=");
            return;
        }
    };

    // First 8 hex chars of SHA256
    let hash = format!("{:x}", Sha256::digest(&content));
    let short_hash: String = hash.chars().take(8).collect();

    let derived_dir = asset_dir.join("derived");
    let derived_path = derived_dir.join(format!("{stem}.{short_hash}.{kind}"));
    let copied = fs::create_dir_all(&derived_dir).and_then(|()| fs::copy(&source, &derived_path));
    if let Err(e) = copied {
        // Fall back to the unhashed file
        println!("cargo:warning=Could not write {}: {e}", derived_path.display());
        println!("cargo:rustc-env={env_var}=");
        return;
    }

    println!("cargo:rustc-env={env_var}={short_hash}");
}
