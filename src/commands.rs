/// Available commands and autocomplete logic

#[derive(Debug, Clone)]
pub struct Command {
  pub name: &'static str,
  pub aliases: &'static [&'static str],
  pub description: &'static str,
}

/// All available commands
pub const COMMANDS: &[Command] = &[
  Command {
    name: "careers",
    aliases: &["c", "jobs", "vacancies"],
    description: "Open positions",
  },
  Command {
    name: "opportunities",
    aliases: &["o", "opps", "volunteer"],
    description: "Volunteering, training and funding",
  },
  Command {
    name: "partners",
    aliases: &["p", "partner"],
    description: "Partner organisations",
  },
  Command {
    name: "updates",
    aliases: &["u", "news"],
    description: "Latest news",
  },
  Command {
    name: "resources",
    aliases: &["r", "docs", "documents"],
    description: "Reports, policies and guides",
  },
  Command {
    name: "tenders",
    aliases: &["t", "procurement"],
    description: "Procurement notices",
  },
  Command {
    name: "reconnect",
    aliases: &["rc", "ping"],
    description: "Check the backend again",
  },
  Command {
    name: "quit",
    aliases: &["q", "exit"],
    description: "Exit portal",
  },
];

/// Get autocomplete suggestions for a given input
pub fn get_suggestions(input: &str) -> Vec<&'static Command> {
  let input_lower = input.trim().to_lowercase();

  if input_lower.is_empty() {
    return COMMANDS.iter().collect();
  }

  let mut matches: Vec<(&Command, u32)> = Vec::new();

  for cmd in COMMANDS {
    // Exact match on name
    if cmd.name == input_lower {
      matches.push((cmd, 0)); // Highest priority
      continue;
    }

    // Exact match on alias
    if cmd.aliases.contains(&input_lower.as_str()) {
      matches.push((cmd, 1));
      continue;
    }

    // Prefix match on name
    if cmd.name.starts_with(&input_lower) {
      matches.push((cmd, 2));
      continue;
    }

    // Prefix match on alias
    if cmd.aliases.iter().any(|a| a.starts_with(&input_lower)) {
      matches.push((cmd, 3));
      continue;
    }

    // Fuzzy match (contains)
    if cmd.name.contains(&input_lower) {
      matches.push((cmd, 4));
      continue;
    }

    // Fuzzy match on alias
    if cmd.aliases.iter().any(|a| a.contains(&input_lower)) {
      matches.push((cmd, 5));
    }
  }

  // Stable sort keeps declaration order within a priority
  matches.sort_by_key(|(_, priority)| *priority);

  matches.into_iter().map(|(cmd, _)| cmd).collect()
}
