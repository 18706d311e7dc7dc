use crate::core::config::Config;

pub fn list_crew(config: &Config) {
    if config.crew.is_empty() {
        println!("No crew configured.");
        return;
    }

    let default = config
        .default_crew
        .as_deref()
        .or_else(|| config.crew.first().map(|member| member.name.as_str()));

    println!("Crew manifest:\n");
    for member in &config.crew {
        let marker = if default.is_some_and(|name| name.eq_ignore_ascii_case(&member.name)) {
            "*"
        } else {
            " "
        };
        let model = member.model.as_deref().unwrap_or(&config.backend.model);
        println!("{marker} {:<20} model: {model}", member.name);
    }
    println!("\n* active at startup");
}
