// File: ./src/cli.rs
//! Shared command-line interface logic: argument parsing and help text.
use std::path::PathBuf;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliArgs {
    pub override_root: Option<PathBuf>,
    pub compact: bool,
    pub envelope: bool,
    pub verbose: bool,
    pub help: bool,
    pub version: bool,
    /// Transcript given on the command line; `None` means read stdin.
    pub transcript: Option<String>,
}

impl CliArgs {
    /// Parses arguments, program name excluded. Unknown flags are ignored;
    /// everything after `--` is transcript text.
    pub fn parse<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let args: Vec<String> = args.into_iter().map(Into::into).collect();
        let mut out = Self::default();
        let mut words: Vec<String> = Vec::new();

        let mut i = 0;
        while i < args.len() {
            match args[i].as_str() {
                "--root" | "-r" => {
                    if i + 1 < args.len() {
                        out.override_root = Some(args[i + 1].clone().into());
                        i += 1; // Also consumed the value
                    }
                }
                "--compact" | "-c" => out.compact = true,
                "--envelope" | "-e" => out.envelope = true,
                "--verbose" | "-v" => out.verbose = true,
                "--help" | "-h" | "help" => out.help = true,
                "--version" | "-V" => out.version = true,
                "--" => {
                    words.extend(args[i + 1..].iter().cloned());
                    break;
                }
                arg if !arg.starts_with('-') => words.push(arg.to_string()),
                _ => { /* Ignore unknown flags */ }
            }
            i += 1;
        }

        if !words.is_empty() {
            out.transcript = Some(words.join(" "));
        }
        out
    }
}

pub fn print_help(binary_name: &str) {
    println!(
        "Taskdraft v{} - Turn a spoken sentence into a task draft",
        env!("CARGO_PKG_VERSION")
    );
    println!();
    println!("USAGE:");
    println!("    {} [OPTIONS] [transcript words...]", binary_name);
    println!("    echo \"<transcript>\" | {} [OPTIONS]", binary_name);
    println!();
    println!("OPTIONS:");
    println!("    -r, --root <path>     Use a different directory for config.");
    println!("    -c, --compact         Print JSON on a single line.");
    println!("    -e, --envelope        Wrap the draft as {{\"transcript\", \"parsed\"}}.");
    println!("    -v, --verbose         Debug logging on stderr.");
    println!("    -V, --version         Show the version.");
    println!("    -h, --help            Show this help message.");
    println!();
    println!("RECOGNISED PHRASES:");
    println!("    Due dates         today, tonight, tomorrow, next friday, in 3 days,");
    println!("                      March 3rd, 3rd of March, end of month, at 3pm");
    println!("    Priority          urgent/asap, low priority/minor, important/high,");
    println!("                      normal/medium, soon (high), later/no rush (low)");
    println!("    Status            working on/started (in progress), done/finished,");
    println!("                      need to/todo (todo)");
    println!("    Description       \"notes: ...\" or \"with ...\" / \"including ...\"");
    println!();
    println!("EXAMPLES:");
    println!(
        "    {} Send the proposal by next Friday, high priority",
        binary_name
    );
    println!(
        "    {} --compact \"Remind me to call mom tomorrow at 6pm\"",
        binary_name
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn words_become_transcript() {
        let args = CliArgs::parse(["Buy", "milk", "tomorrow"]);
        assert_eq!(args.transcript.as_deref(), Some("Buy milk tomorrow"));
        assert!(!args.compact);
    }

    #[test]
    fn flags_and_root() {
        let args = CliArgs::parse(["-c", "--root", "/tmp/x", "-e", "call", "bob"]);
        assert!(args.compact);
        assert!(args.envelope);
        assert_eq!(args.override_root, Some(PathBuf::from("/tmp/x")));
        assert_eq!(args.transcript.as_deref(), Some("call bob"));
    }

    #[test]
    fn double_dash_keeps_dashes() {
        let args = CliArgs::parse(["--", "-v", "is", "not", "a", "flag"]);
        assert!(!args.verbose);
        assert_eq!(args.transcript.as_deref(), Some("-v is not a flag"));
    }

    #[test]
    fn no_words_reads_stdin() {
        let args = CliArgs::parse(["--verbose"]);
        assert!(args.verbose);
        assert_eq!(args.transcript, None);
    }
}
