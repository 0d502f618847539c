//! Command-line arguments.

use std::path::PathBuf;

use clap::Parser;

/// Batch-normalize the template sheet of a marketplace listing workbook.
#[derive(Parser, Debug)]
#[command(name = "listingkit", author, version, about, long_about = None)]
pub struct Cli {
    /// Input workbook (.xlsx or .xlsm); prompted for when omitted
    pub input_file: Option<PathBuf>,

    /// Output path (default: {input}_processed.{ext} beside the input)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Show debug logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Also write a plain-text log to listingkit.log beside the input
    /// (always on when the input is prompted for)
    #[arg(long)]
    pub log_file: bool,
}

/// Console behaviour derived from how the binary was started.
///
/// Without an input argument the binary was most likely double-clicked:
/// the log file is always written and the window waits for Enter before
/// closing, on success and on failure alike.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpecRunMode {
    pub if_prompt_input: bool,
    pub if_log_file: bool,
    pub if_pause_on_exit: bool,
}

impl SpecRunMode {
    pub fn from_cli(cli: &Cli) -> Self {
        let if_prompt_input = cli.input_file.is_none();
        Self {
            if_prompt_input,
            if_log_file: cli.log_file || if_prompt_input,
            if_pause_on_exit: if_prompt_input,
        }
    }
}

/// Clean a path pasted or dragged into a terminal prompt.
///
/// Surrounding whitespace and quotes are removed, as are shell escapes
/// before characters that are not path separators.
pub fn clean_prompt_path(raw: &str) -> String {
    let c_trimmed = raw.trim().trim_matches('"').trim_matches('\'');
    let mut c_out = String::with_capacity(c_trimmed.len());
    let mut chars = c_trimmed.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(&c_next) = chars.peek() {
                let if_is_escape = !(c_next.is_alphanumeric()
                    || c_next == '_'
                    || c_next == '/'
                    || c_next == '\\'
                    || c_next == ':');
                if if_is_escape {
                    continue;
                }
            }
        }
        c_out.push(c);
    }
    c_out
}
