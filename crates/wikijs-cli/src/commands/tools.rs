//! `wikijs-mcp tools`: print the tool catalog.

use anyhow::Result;
use wikijs_mcp::default_registry;

pub fn run() -> Result<()> {
    let registry = default_registry()?;
    for definition in registry.list() {
        let access = match definition.annotations.as_ref().and_then(|a| a.read_only_hint) {
            Some(true) => "read",
            _ => "write",
        };
        println!("{:<26} [{}] {}", definition.name, access, definition.description);
    }
    Ok(())
}
