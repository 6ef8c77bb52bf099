use colored::Colorize;

pub struct Theme {
    pub title: fn(&str) -> String,
    pub text: fn(&str) -> String,
    pub label: fn(&str) -> String,
    pub muted: fn(&str) -> String,
    pub warn: fn(&str) -> String,
}

impl Theme {
    pub fn from_name(name: &str) -> Self {
        match name {
            "plain" | "" => Self::plain(),
            "vivid" => Self::vivid(),
            _ => {
                eprintln!("{}", format!("✘ Unknown theme: {}", name).red());
                Self::plain()
            }
        }
    }

    fn plain() -> Self {
        Self {
            title: |s| s.bold().to_string(),
            text: |s| s.normal().to_string(),
            label: |s| s.cyan().to_string(),
            muted: |s| s.bright_black().dimmed().to_string(),
            warn: |s| s.yellow().to_string(),
        }
    }

    fn vivid() -> Self {
        Self {
            title: |s| s.bright_magenta().italic().bold().underline().to_string(),
            text: |s| s.bright_white().to_string(),
            label: |s| s.green().italic().to_string(),
            muted: |s| s.bright_black().italic().to_string(),
            warn: |s| s.red().bold().to_string(),
        }
    }
}
