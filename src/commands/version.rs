use anyhow::Result;

pub fn execute() -> Result<()> {
    println!("plex-sync version {}", env!("CARGO_PKG_VERSION"));
    Ok(())
}
