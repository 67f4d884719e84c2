// Build script for explorerctl - embeds version at compile time

fn main() {
    // Release builds may override the version, otherwise use Cargo.toml
    let version =
        std::env::var("EXPLORER_VERSION").unwrap_or_else(|_| env!("CARGO_PKG_VERSION").to_string());

    println!("cargo:rustc-env=EXPLORER_VERSION={}", version);

    println!("cargo:rerun-if-changed=Cargo.toml");
    println!("cargo:rerun-if-env-changed=EXPLORER_VERSION");
}
