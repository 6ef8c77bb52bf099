use clap::Parser;

#[derive(Parser)]
#[command(name = "kbt")]
#[command(about = "Offline translation for keyboard input.")]
#[command(version)]
pub struct Cli {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Choose color theme
    #[arg(short = 'T', long)]
    pub theme: Option<String>,

    /// Don't download the model before translating
    #[arg(short = 'n', long)]
    pub no_download: bool,

    /// Download the model for the configured language pair
    #[arg(long)]
    pub download: bool,

    /// Delete the installed model for the configured language pair
    #[arg(long)]
    pub delete_model: bool,

    /// Generate config sample
    #[arg(long)]
    pub generate_config: bool,

    /// Edit configuration file
    #[arg(long)]
    pub edit_config: bool,

    /// Show status
    #[arg(long)]
    pub status: bool,

    /// Text to translate
    #[arg(num_args = 1..)]
    pub text: Vec<String>,
}

impl Cli {
    /// The model download runs for `--download` and before translating unless `-n`
    pub fn wants_download(&self) -> bool {
        self.download || !self.no_download
    }

    /// A translation run without any text, caught before any download starts
    pub fn missing_text(&self) -> bool {
        !self.download && self.text.is_empty()
    }
}
