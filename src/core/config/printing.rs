use crate::core::config::data::Config;

impl Config {
    pub fn print_all(&self) {
        println!("Current configuration:");
        match &self.default_crew {
            Some(name) => println!("  default-crew: {name}"),
            None => println!("  default-crew: (first crew member)"),
        }
        match &self.log_file {
            Some(path) => println!("  log-file: {path}"),
            None => println!("  log-file: (stderr)"),
        }
        println!("  exit-grace: {}ms", self.exit_grace_ms);
        println!("  backend:");
        println!("    base-url: {}", self.backend.base_url);
        println!("    model: {}", self.backend.model);
        match self.backend.max_tokens {
            Some(max) => println!("    max-tokens: {max}"),
            None => println!("    max-tokens: (server default)"),
        }
        if self.backend.server_command.is_empty() {
            println!("    server-command: (none)");
        } else {
            println!("    server-command: {}", self.backend.server_command.join(" "));
        }
        match self.animation.enabled {
            true => println!(
                "  animation: on ({}ms/char, {}ms garble, {:?} when busy)",
                self.animation.char_delay_ms, self.animation.garble_ms, self.animation.busy_policy
            ),
            false => println!("  animation: off"),
        }
        println!(
            "  runner: {} concurrent task(s)",
            self.runner.max_concurrent_tasks
        );
        println!(
            "  execution: {} {} (code agent: {})",
            self.execution.interpreter,
            self.execution.args.join(" "),
            self.execution.code_agent
        );
        if self.crew.is_empty() {
            println!("  crew: (none)");
        } else {
            let names: Vec<&str> = self.crew.iter().map(|m| m.name.as_str()).collect();
            println!("  crew: {}", names.join(", "));
        }
        if self.tools.is_empty() {
            println!("  tools: (none configured)");
        } else {
            let names: Vec<&str> = self.tools.iter().map(|t| t.name.as_str()).collect();
            println!("  tools: {}", names.join(", "));
        }
    }
}
