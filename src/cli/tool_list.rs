use std::error::Error;

use crate::core::config::Config;
use crate::core::tools::build_registry;

pub fn list_tools(config: &Config) -> Result<(), Box<dyn Error>> {
    let registry = build_registry(config.builtin_tools, &config.tools)?;
    if registry.is_empty() {
        println!("No tools available.");
        return Ok(());
    }

    let width = registry.names().map(str::len).max().unwrap_or(0);
    println!("Available tools:\n");
    for name in registry.names() {
        let description = registry
            .get(name)
            .map(|tool| tool.description().to_string())
            .unwrap_or_default();
        println!("  {name:<width$}  {description}");
    }
    Ok(())
}
