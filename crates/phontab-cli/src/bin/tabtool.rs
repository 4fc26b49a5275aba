use clap::{Parser, Subcommand};

use phontab_cli::commands::{self, config_ops, kana_ops, pinyin_ops};
use phontab_cli::logging;

#[derive(Parser)]
#[command(name = "tabtool", about = "Phonetic lookup table build tool")]
struct Cli {
    /// Custom settings TOML (see settings-export)
    #[arg(long, global = true)]
    settings: Option<String>,
    /// Debug logging (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compile compact pinyin source into a binary table file
    CompilePinyin {
        /// Compact source (pinyins / pinyin_combinations / pinyin_tables)
        input: String,
        /// Output .pytb file
        output: String,
    },
    /// Emit pinyin tables as source literals
    EmitPinyin {
        /// Target language (rust, cpp)
        #[arg(long, default_value = "rust")]
        target: String,
        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<String>,
        /// Binary table or compact source
        input: String,
    },
    /// Look up the readings of each character
    Query {
        /// Reading notation (pinyin, ascii, numeric, initial)
        #[arg(long, default_value = "pinyin")]
        notation: String,
        /// Binary table or compact source
        table: String,
        /// Text to look up
        text: String,
    },
    /// Show table info (format auto-detected by magic bytes)
    Info {
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
        /// Pinyin (.pytb or source) or kana (.kntb) table
        file: String,
    },
    /// Download the configured kana dictionaries
    FetchKana {
        /// Re-download files that already exist
        #[arg(long)]
        force: bool,
        /// Output directory
        output_dir: String,
    },
    /// Merge kana dictionaries into a binary kana table
    CompileKana {
        /// Directory holding the configured sources (used when no inputs are given)
        #[arg(long, default_value = ".")]
        dir: String,
        /// Output .kntb file
        #[arg(short, long)]
        output: String,
        /// Dictionary files, merged in order
        inputs: Vec<String>,
    },
    /// Emit a kana table as two parallel literal arrays
    EmitKana {
        /// Target language (rust, cpp)
        #[arg(long, default_value = "rust")]
        target: String,
        /// Entries per line (default: [emit] group_size)
        #[arg(long)]
        group_size: Option<usize>,
        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<String>,
        /// Binary kana table
        table: String,
    },
    /// Transliterate kana to romaji
    Romanize {
        /// Binary kana table
        table: String,
        /// Kana input
        text: String,
    },
    /// Export default settings as TOML
    SettingsExport,
    /// Validate a custom settings TOML file
    SettingsValidate {
        /// Path to the TOML file
        file: String,
    },
}

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);
    if let Some(file) = &cli.settings {
        config_ops::load_settings(file);
    }

    match cli.command {
        Command::CompilePinyin { input, output } => pinyin_ops::compile(&input, &output),
        Command::EmitPinyin {
            target,
            output,
            input,
        } => pinyin_ops::emit(&input, &target, output.as_deref()),
        Command::Query {
            notation,
            table,
            text,
        } => pinyin_ops::query(&table, &text, &notation),
        Command::Info { json, file } => commands::info(&file, json),
        Command::FetchKana { force, output_dir } => kana_ops::fetch(&output_dir, force),
        Command::CompileKana {
            dir,
            output,
            inputs,
        } => kana_ops::compile(&inputs, &dir, &output),
        Command::EmitKana {
            target,
            group_size,
            output,
            table,
        } => kana_ops::emit(&table, &target, group_size, output.as_deref()),
        Command::Romanize { table, text } => kana_ops::romanize(&table, &text),
        Command::SettingsExport => config_ops::settings_export(),
        Command::SettingsValidate { file } => config_ops::settings_validate(&file),
    }
}
