//! Generate config command implementation

use anyhow::{bail, Result};
use clap::Args;
use std::path::PathBuf;

use crate::input::FileReader;

/// Arguments for the generate-config command
#[derive(Debug, Args)]
pub struct GenerateConfigArgs {
    /// Output file path
    #[arg(short, long, value_name = "FILE", required = true)]
    pub output: PathBuf,

    /// Overwrite an existing file
    #[arg(long)]
    pub force: bool,
}

impl GenerateConfigArgs {
    /// Execute the generate-config command
    pub fn execute(&self) -> Result<()> {
        if self.output.exists() && !self.force {
            bail!(
                "{} already exists (use --force to overwrite)",
                self.output.display()
            );
        }

        println!("Generating configuration template...");
        println!("  Output file: {}", self.output.display());

        FileReader::write_bytes(&self.output, TEMPLATE.as_bytes())?;

        println!("✓ Configuration template generated successfully!");
        println!();
        println!("Next steps:");
        println!("1. Edit the configuration file to match your site layout");
        println!("2. Compile your dictionary:");
        println!(
            "   kolink --config {} compile -i 'entries/*.json' -o data",
            self.output.display()
        );
        println!("3. Scan text with it:");
        println!(
            "   kolink --config {} scan -t '안녕하세요'",
            self.output.display()
        );

        Ok(())
    }
}

/// Template content; every value is the built-in default
const TEMPLATE: &str = r#"# Kolink configuration

[compile]
# Insert longer expressions first so homonym identifiers keep file order
# within each length
sort_by_length = true

# Formats written by `kolink compile`: "json", "binary"
formats = ["json", "binary"]

[loader]
# Serialized automaton read by `scan` and `stats`
path = "data/expression-trie.json"

# "auto" detects JSON by a leading '[', otherwise binary
format = "auto"

[output]
# Pretty print JSON output
pretty_json = true

# Markdown link target; {id} is replaced by the entry identifier
link_template = "/entries/{id}"

[performance]
# Worker threads for scanning files (0 = number of CPUs)
worker_threads = 0
"#;
