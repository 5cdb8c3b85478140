use anyhow::{bail, Context, Result};
use std::io::{Read, Write};
use std::path::PathBuf;

use crate::config::AppConfig;
use crate::mapper::dates::Timezone;
use crate::mapper::{Import, MapOptions, Mapper};
use crate::model::trello::Board;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Convert(ConvertArgs),
    Summary { input: Input },
    Help,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertArgs {
    pub input: Input,
    pub output: Option<PathBuf>,
    pub compact: bool,
    pub local_time: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Stdin,
    File(PathBuf),
}

impl Input {
    fn from_arg(arg: &str) -> Self {
        if arg == "-" {
            Input::Stdin
        } else {
            Input::File(PathBuf::from(arg))
        }
    }

    fn read(&self) -> Result<String> {
        match self {
            Input::Stdin => {
                let mut buf = String::new();
                std::io::stdin()
                    .read_to_string(&mut buf)
                    .context("Failed to read export from stdin")?;
                Ok(buf)
            }
            Input::File(path) => std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read export from {}", path.display())),
        }
    }
}

/// Parse command line arguments (without the program name).
///
/// Supported forms:
///   trello2kanban board.json
///   trello2kanban board.json -o project.json --compact
///   trello2kanban - --local-time < board.json
///   trello2kanban summary board.json
pub fn parse_args(args: &[String]) -> Result<Command> {
    let Some(first) = args.first() else {
        bail!("Usage: trello2kanban <export.json> [-o <file>] [--compact] [--local-time]\n\nRun `trello2kanban help` for details.");
    };

    match first.as_str() {
        "help" | "-h" | "--help" => return Ok(Command::Help),
        "summary" => {
            return match &args[1..] {
                [input] => Ok(Command::Summary {
                    input: Input::from_arg(input),
                }),
                [] => bail!("Missing export file for summary"),
                _ => bail!("summary takes exactly one export file"),
            };
        }
        _ => {}
    }

    let mut input = None;
    let mut output = None;
    let mut compact = false;
    let mut local_time = false;
    let mut i = 0;

    while i < args.len() {
        match args[i].as_str() {
            "-o" | "--output" => {
                i += 1;
                match args.get(i) {
                    Some(path) => output = Some(PathBuf::from(path)),
                    None => bail!("Missing value for -o/--output flag"),
                }
            }
            "--compact" => compact = true,
            "--local-time" => local_time = true,
            arg if arg.starts_with('-') && arg != "-" => bail!("Unknown flag: {arg}"),
            arg => {
                if input.is_some() {
                    bail!("Only one export file can be converted at a time");
                }
                input = Some(Input::from_arg(arg));
            }
        }
        i += 1;
    }

    let Some(input) = input else {
        bail!("Missing export file");
    };

    Ok(Command::Convert(ConvertArgs {
        input,
        output,
        compact,
        local_time,
    }))
}

pub fn run(command: Command, config: &AppConfig) -> Result<()> {
    match command {
        Command::Help => print_help(),
        Command::Summary { input } => println!("{}", summarize(&input, config)?),
        Command::Convert(args) => convert(&args, config)?,
    }
    Ok(())
}

fn import(input: &Input, timezone: Timezone) -> Result<Import> {
    let raw = input.read()?;
    let board = Board::from_json(&raw)?;
    let import = Mapper::new(MapOptions { timezone }).run(&board)?;
    Ok(import)
}

fn summarize(input: &Input, config: &AppConfig) -> Result<String> {
    let import = import(input, config.import.timezone)?;
    Ok(summary_line(&import))
}

fn convert(args: &ConvertArgs, config: &AppConfig) -> Result<()> {
    let timezone = if args.local_time {
        Timezone::Local
    } else {
        config.import.timezone
    };
    let import = import(&args.input, timezone)?;

    let json = if config.import.pretty && !args.compact {
        serde_json::to_string_pretty(&import.project)?
    } else {
        serde_json::to_string(&import.project)?
    };

    match &args.output {
        Some(path) => std::fs::write(path, format!("{json}\n"))
            .with_context(|| format!("Failed to write {}", path.display()))?,
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{json}")?;
        }
    }

    eprintln!("{}", summary_line(&import));
    Ok(())
}

pub fn summary_line(import: &Import) -> String {
    let project = &import.project;
    let mut line = format!(
        "{}: {} columns, {} tasks, {} subtasks, {} comments, {} attachments",
        project.name,
        project.columns.len(),
        project.task_count(),
        project.subtask_count(),
        project.comment_count(),
        project.attachment_count(),
    );
    let dropped = import.dropped;
    if dropped.total() > 0 {
        line.push_str(&format!(
            " (skipped {} cards, {} comments, {} checklists)",
            dropped.cards, dropped.comments, dropped.checklists
        ));
    }
    line
}

pub fn print_help() {
    println!("trello2kanban — convert a Trello board export into a kanban project\n");
    println!("USAGE:");
    println!("  trello2kanban <export.json>          Print the project as JSON");
    println!("  trello2kanban summary <export.json>  Print what the import would contain");
    println!();
    println!("OPTIONS:");
    println!("  -o, --output <file>  Write the project JSON to a file");
    println!("  --compact            Single-line JSON output");
    println!("  --local-time         Render dates in the local timezone instead of UTC");
    println!();
    println!("Use - as the export file to read from stdin.");
    println!("Defaults are read from ~/.trello2kanban/config.toml");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapper::Dropped;
    use crate::model::project::{Column, Project};

    fn args(strs: &[&str]) -> Vec<String> {
        strs.iter().map(|s| s.to_string()).collect()
    }

    const EXPORT: &str = r#"{
        "name": "Launch",
        "lists": [{ "id": "l1", "name": "Todo", "closed": false }],
        "cards": [{
            "id": "c1", "name": "Announce", "closed": false,
            "idList": "l1", "badges": { "attachments": 0 },
            "dateLastActivity": "2024-03-01T09:15:00.000Z"
        }],
        "checklists": [],
        "actions": []
    }"#;

    #[test]
    fn parse_input_only() {
        let cmd = parse_args(&args(&["board.json"])).unwrap();
        assert_eq!(
            cmd,
            Command::Convert(ConvertArgs {
                input: Input::File("board.json".into()),
                output: None,
                compact: false,
                local_time: false,
            })
        );
    }

    #[test]
    fn parse_all_flags() {
        let cmd =
            parse_args(&args(&["--compact", "-", "--output", "out.json", "--local-time"])).unwrap();
        assert_eq!(
            cmd,
            Command::Convert(ConvertArgs {
                input: Input::Stdin,
                output: Some("out.json".into()),
                compact: true,
                local_time: true,
            })
        );
    }

    #[test]
    fn parse_help_and_summary() {
        assert_eq!(parse_args(&args(&["--help"])).unwrap(), Command::Help);
        assert_eq!(
            parse_args(&args(&["summary", "b.json"])).unwrap(),
            Command::Summary {
                input: Input::File("b.json".into())
            }
        );
    }

    #[test]
    fn parse_errors() {
        assert!(parse_args(&args(&[])).is_err());
        assert!(parse_args(&args(&["summary"])).is_err());
        assert!(parse_args(&args(&["a.json", "b.json"])).is_err());
        let err = parse_args(&args(&["a.json", "-o"])).unwrap_err();
        assert!(err.to_string().contains("Missing value"));
        let err = parse_args(&args(&["a.json", "--verbose"])).unwrap_err();
        assert!(err.to_string().contains("Unknown flag"));
        let err = parse_args(&args(&["--compact"])).unwrap_err();
        assert!(err.to_string().contains("Missing export file"));
    }

    #[test]
    fn convert_writes_output_file() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("board.json");
        let output = dir.path().join("project.json");
        std::fs::write(&input, EXPORT).unwrap();

        let cmd = Command::Convert(ConvertArgs {
            input: Input::File(input),
            output: Some(output.clone()),
            compact: true,
            local_time: false,
        });
        run(cmd, &AppConfig::default()).unwrap();

        let written: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
        assert_eq!(written["name"], "Launch");
        assert_eq!(written["columns"][0]["tasks"][0]["is_active"], 1);
        assert_eq!(
            written["columns"][0]["tasks"][0]["date_creation"],
            "2024-03-01 09:15"
        );
    }

    #[test]
    fn convert_reports_unreadable_input() {
        let dir = tempfile::tempdir().unwrap();
        let cmd = Command::Convert(ConvertArgs {
            input: Input::File(dir.path().join("missing.json")),
            output: None,
            compact: false,
            local_time: false,
        });
        let err = run(cmd, &AppConfig::default()).unwrap_err();
        assert!(err.to_string().contains("Failed to read export"));
    }

    #[test]
    fn summary_mentions_drops_only_when_present() {
        let mut project = Project::new("Board");
        project.columns.push(Column::new("Todo", "l1"));
        let mut import = Import {
            project,
            dropped: Dropped::default(),
        };
        assert_eq!(
            summary_line(&import),
            "Board: 1 columns, 0 tasks, 0 subtasks, 0 comments, 0 attachments"
        );

        import.dropped.cards = 2;
        assert!(summary_line(&import).ends_with("(skipped 2 cards, 0 comments, 0 checklists)"));
    }

    const STRAY_EXPORT: &str = r#"{
        "name": "Launch",
        "lists": [{ "id": "l1", "name": "Todo", "closed": false }],
        "cards": [
            {
                "id": "c1", "name": "Announce", "closed": false,
                "idList": "l1", "badges": { "attachments": 0 },
                "due": "2024-04-10T17:00:00.000Z"
            },
            {
                "id": "c2", "name": "Moved away", "closed": false,
                "idList": "deleted", "badges": { "attachments": 0 }
            }
        ],
        "checklists": [],
        "actions": []
    }"#;

    #[test]
    fn parse_rejects_single_dash_typo() {
        let err = parse_args(&args(&["board.json", "-x"])).unwrap_err();
        assert!(err.to_string().contains("Unknown flag: -x"));
        let err = parse_args(&args(&["-x"])).unwrap_err();
        assert!(err.to_string().contains("Unknown flag"));
    }

    #[test]
    fn summary_reports_skipped_cards() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("board.json");
        std::fs::write(&input, STRAY_EXPORT).unwrap();
        let config = AppConfig::default();

        let line = summarize(&Input::File(input.clone()), &config).unwrap();
        assert_eq!(
            line,
            "Launch: 1 columns, 1 tasks, 0 subtasks, 0 comments, 0 attachments \
             (skipped 1 cards, 0 comments, 0 checklists)"
        );

        let cmd = Command::Summary {
            input: Input::File(input),
        };
        assert!(run(cmd, &config).is_ok());
    }

    #[test]
    fn convert_local_time_overrides_config() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("board.json");
        let output = dir.path().join("project.json");
        std::fs::write(&input, STRAY_EXPORT).unwrap();

        let cmd = Command::Convert(ConvertArgs {
            input: Input::File(input),
            output: Some(output.clone()),
            compact: false,
            local_time: true,
        });
        run(cmd, &AppConfig::default()).unwrap();

        let written: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
        let expected =
            crate::mapper::dates::format_timestamp("2024-04-10T17:00:00.000Z", Timezone::Local)
                .unwrap();
        assert_eq!(written["columns"][0]["tasks"][0]["date_due"], expected);
    }
}
