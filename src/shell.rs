// The line-oriented view layer over a desktop session. Presentation glue
// only: it parses commands, calls the session, and formats what came back.
// Core no-op semantics stay no-ops; the shell only reports failures of its
// own lookups and parsing.

use std::io::Write;
use std::path::Path;

use tracing::instrument;

use crate::desktop::Desktop;
use crate::errors::{Result, TreeosError};
use crate::fsystem::{FileType, NodeId};
use crate::windows::WindowId;

#[derive(Debug)]
pub enum ShellOutput {
    Text(String),
    Quit,
}

#[derive(Debug)]
enum ShellCommand {
    Desktop,
    Ls(String),
    Open(String),
    Create(FileType, String, String),
    Remove(String),
    Move(String, String),
    Rename(String, String),
    Cat(String),
    Write(String, String),
    Meta(String),
    Export,
    Cleanup,
    Windows,
    Focus(usize),
    Minimize(usize),
    Close(usize),
    Explorer,
    Settings,
    Opened,
    Help,
    Quit,
}

fn argument_error(command: &str) -> TreeosError {
    TreeosError::invalid_command(format!("Invalid number of arguments for {}", command))
}

fn parse_command(line: &str) -> Result<Option<ShellCommand>> {
    let mut parts = line.split_whitespace();
    let name = match parts.next() {
        Some(name) => name,
        None => return Ok(None),
    };
    let arguments: Vec<&str> = parts.collect();
    let command = match name {
        "desktop" => ShellCommand::Desktop,
        "ls" => {
            let path = arguments.first().unwrap_or(&"/").to_string();
            ShellCommand::Ls(path)
        }
        "open" => {
            if arguments.len() != 1 {
                return Err(argument_error("open"));
            }
            ShellCommand::Open(arguments[0].to_string())
        }
        "create" => {
            if arguments.len() != 3 {
                return Err(argument_error("create"));
            }
            let kind = match arguments[0] {
                "file" => FileType::File,
                "folder" => FileType::Folder,
                "tree" => FileType::Tree,
                other => {
                    return Err(TreeosError::invalid_command(format!(
                        "Unknown node type `{}`",
                        other
                    )))
                }
            };
            ShellCommand::Create(kind, arguments[1].to_string(), arguments[2].to_string())
        }
        "rm" => {
            if arguments.len() != 1 {
                return Err(argument_error("rm"));
            }
            ShellCommand::Remove(arguments[0].to_string())
        }
        "mv" => {
            if arguments.len() != 2 {
                return Err(argument_error("mv"));
            }
            ShellCommand::Move(arguments[0].to_string(), arguments[1].to_string())
        }
        "rename" => {
            if arguments.len() != 2 {
                return Err(argument_error("rename"));
            }
            ShellCommand::Rename(arguments[0].to_string(), arguments[1].to_string())
        }
        "cat" => {
            if arguments.len() != 1 {
                return Err(argument_error("cat"));
            }
            ShellCommand::Cat(arguments[0].to_string())
        }
        "write" => {
            if arguments.len() < 2 {
                return Err(argument_error("write"));
            }
            ShellCommand::Write(arguments[0].to_string(), arguments[1..].join(" "))
        }
        "meta" => {
            if arguments.len() != 1 {
                return Err(argument_error("meta"));
            }
            ShellCommand::Meta(arguments[0].to_string())
        }
        "export" => ShellCommand::Export,
        "cleanup" => ShellCommand::Cleanup,
        "windows" => ShellCommand::Windows,
        "focus" => ShellCommand::Focus(parse_index(&arguments, "focus")?),
        "min" => ShellCommand::Minimize(parse_index(&arguments, "min")?),
        "close" => ShellCommand::Close(parse_index(&arguments, "close")?),
        "explorer" => ShellCommand::Explorer,
        "settings" => ShellCommand::Settings,
        "opened" => ShellCommand::Opened,
        "help" => ShellCommand::Help,
        "quit" | "exit" => ShellCommand::Quit,
        other => {
            return Err(TreeosError::invalid_command(format!(
                "Unknown command `{}`; try help",
                other
            )))
        }
    };
    Ok(Some(command))
}

fn parse_index(arguments: &[&str], command: &str) -> Result<usize> {
    if arguments.len() != 1 {
        return Err(argument_error(command));
    }
    arguments[0]
        .parse::<usize>()
        .map_err(|_| TreeosError::invalid_command(format!("`{}` wants a window number", command)))
}

const HELP: &str = "\
desktop                       list desktop icons
ls [path]                     list a directory
open <path>                   open a node in a window
create <type> <dir> <name>    create a file, folder or tree
rm <path>                     delete a node (folders cascade)
mv <path> <dir>               move a node
rename <path> <name>          rename a node
cat <path>                    print file content
write <path> <text>           replace file content
meta <path>                   node record as JSON
export                        every node record as JSON
cleanup                       re-grid the desktop icons
windows                       list open windows
focus|min|close <n>           act on window number n
explorer                      open the file explorer
settings                      open settings
opened                        list nodes marked opened
quit                          leave";

pub struct Shell {
    desktop: Desktop,
}

impl Shell {
    pub fn new(desktop: Desktop) -> Shell {
        Shell { desktop }
    }

    pub fn desktop(&self) -> &Desktop {
        &self.desktop
    }

    fn resolve(&self, path: &str) -> Result<NodeId> {
        self.desktop
            .fs()
            .resolve(path)
            .ok_or_else(|| TreeosError::not_found(format!("No node at `{}`", path)))
    }

    fn window_at(&self, index: usize) -> Result<WindowId> {
        self.desktop
            .windows()
            .windows()
            .get(index.wrapping_sub(1))
            .map(|window| window.id.clone())
            .ok_or_else(|| TreeosError::not_found(format!("No window number {}", index)))
    }

    #[instrument(name = "shell.execute", level = "info", skip(self), fields(line = %line))]
    pub fn execute(&mut self, line: &str) -> Result<ShellOutput> {
        let command = match parse_command(line)? {
            Some(command) => command,
            None => return Ok(ShellOutput::Text(String::new())),
        };
        let text = match command {
            ShellCommand::Desktop => {
                let mut lines = Vec::new();
                for node in self.desktop.icons() {
                    let position = node
                        .metadata
                        .position
                        .map(|p| format!("({}, {})", p.x, p.y))
                        .unwrap_or_else(|| "(unplaced)".to_string());
                    lines.push(format!(
                        "{:<10} {:<24} {}",
                        format!("{:?}", node.kind).to_lowercase(),
                        node.name,
                        position
                    ));
                }
                lines.join("\n")
            }
            ShellCommand::Ls(path) => {
                let mut lines = Vec::new();
                for node in self.desktop.fs().nodes_at(&path) {
                    lines.push(format!(
                        "{:<10} {}",
                        format!("{:?}", node.kind).to_lowercase(),
                        node.name
                    ));
                }
                lines.join("\n")
            }
            ShellCommand::Open(path) => {
                let id = self.resolve(&path)?;
                match self.desktop.open(&id) {
                    Some(window) => {
                        let index = self
                            .desktop
                            .windows()
                            .windows()
                            .iter()
                            .position(|w| w.id == window)
                            .map(|i| i + 1)
                            .unwrap_or(0);
                        format!("opened `{}` as window {}", path, index)
                    }
                    None => String::new(),
                }
            }
            ShellCommand::Create(kind, dir, name) => {
                match self.desktop.fs_mut().create_node(&name, kind, &dir, None) {
                    Some(node) => format!("created {}/{}", dir.trim_end_matches('/'), node.name),
                    None => format!("no directory at `{}`", dir),
                }
            }
            ShellCommand::Remove(path) => {
                let id = self.resolve(&path)?;
                self.desktop.fs_mut().delete_node(&id);
                format!("removed `{}`", path)
            }
            ShellCommand::Move(path, dir) => {
                let id = self.resolve(&path)?;
                self.desktop.fs_mut().move_node(&id, &dir, None);
                let now_at = self.desktop.fs().full_path(&id).unwrap_or_default();
                format!("`{}` is now at `{}`", path, now_at)
            }
            ShellCommand::Rename(path, name) => {
                let id = self.resolve(&path)?;
                self.desktop.fs_mut().rename_node(&id, &name);
                let now_at = self.desktop.fs().full_path(&id).unwrap_or_default();
                format!("`{}` is now at `{}`", path, now_at)
            }
            ShellCommand::Cat(path) => {
                let id = self.resolve(&path)?;
                self.desktop
                    .fs()
                    .node(&id)
                    .and_then(|node| node.content.clone())
                    .unwrap_or_default()
            }
            ShellCommand::Write(path, text) => {
                let id = self.resolve(&path)?;
                self.desktop.fs_mut().update_node_content(&id, &text);
                format!("wrote {} bytes to `{}`", text.len(), path)
            }
            ShellCommand::Meta(path) => {
                let id = self.resolve(&path)?;
                let record = self.desktop.fs().record(&id);
                serde_json::to_string_pretty(&record)?
            }
            ShellCommand::Export => {
                let fs = self.desktop.fs();
                let records: Vec<_> = fs
                    .nodes()
                    .iter()
                    .filter_map(|node| fs.record(&node.id))
                    .collect();
                serde_json::to_string_pretty(&records)?
            }
            ShellCommand::Cleanup => {
                self.desktop.cleanup();
                "desktop icons re-gridded".to_string()
            }
            ShellCommand::Windows => {
                let mut lines = Vec::new();
                for (i, window) in self.desktop.windows().windows().iter().enumerate() {
                    let focus = if self.desktop.windows().is_focused(&window.id) {
                        "*"
                    } else {
                        " "
                    };
                    let state = if window.is_minimized {
                        " (minimized)"
                    } else {
                        ""
                    };
                    lines.push(format!(
                        "{} {}. {} [z {}]{}",
                        focus,
                        i + 1,
                        window.title,
                        window.z,
                        state
                    ));
                }
                lines.join("\n")
            }
            ShellCommand::Focus(index) => {
                let id = self.window_at(index)?;
                self.desktop.focus_window(&id);
                String::new()
            }
            ShellCommand::Minimize(index) => {
                let id = self.window_at(index)?;
                self.desktop.minimize_window(&id);
                String::new()
            }
            ShellCommand::Close(index) => {
                let id = self.window_at(index)?;
                self.desktop.close_window(&id);
                String::new()
            }
            ShellCommand::Explorer => {
                self.desktop.open_explorer();
                "file explorer opened".to_string()
            }
            ShellCommand::Settings => {
                self.desktop.open_settings();
                "settings opened".to_string()
            }
            ShellCommand::Opened => {
                let fs = self.desktop.fs();
                let names: Vec<String> = fs
                    .opened_nodes()
                    .iter()
                    .map(|id| {
                        fs.node(id)
                            .map(|node| node.name.clone())
                            .unwrap_or_else(|| id.to_string())
                    })
                    .collect();
                names.join("\n")
            }
            ShellCommand::Help => HELP.to_string(),
            ShellCommand::Quit => return Ok(ShellOutput::Quit),
        };
        Ok(ShellOutput::Text(text))
    }

    pub fn run_interactive(&mut self) {
        let stdin = std::io::stdin();
        loop {
            print!("treeos> ");
            let _ = std::io::stdout().flush();
            let mut line = String::new();
            match stdin.read_line(&mut line) {
                Ok(0) | Err(_) => break,
                Ok(_) => (),
            }
            match self.execute(line.trim()) {
                Ok(ShellOutput::Quit) => break,
                Ok(ShellOutput::Text(text)) => {
                    if !text.is_empty() {
                        println!("{}", text);
                    }
                }
                Err(error) => println!("error: {}", error),
            }
        }
    }

    /// Run a command file, one command per line; `#` comments and blank
    /// lines are skipped. Errors are reported and do not stop the run.
    pub fn run_script(&mut self, path: &Path) -> Result<()> {
        let contents = std::fs::read_to_string(path)?;
        for line in contents.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            match self.execute(line) {
                Ok(ShellOutput::Quit) => break,
                Ok(ShellOutput::Text(text)) => {
                    if !text.is_empty() {
                        println!("{}", text);
                    }
                }
                Err(error) => println!("error: {}", error),
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SystemConfig;
    use crate::errors::TreeosErrorType;

    fn shell() -> Shell {
        Shell::new(Desktop::new(SystemConfig::default()))
    }

    fn text(output: ShellOutput) -> String {
        match output {
            ShellOutput::Text(text) => text,
            ShellOutput::Quit => panic!("unexpected quit"),
        }
    }

    #[test]
    fn ls_lists_the_seeded_desktop() {
        let mut shell = shell();
        let out = text(shell.execute("ls /Desktop").unwrap());
        assert!(out.contains("Welcome.txt"));
    }

    #[test]
    fn create_write_cat_round_trip() {
        let mut shell = shell();
        text(shell.execute("create file /Desktop notes.txt").unwrap());
        text(shell.execute("write /Desktop/notes.txt hello there").unwrap());
        let out = text(shell.execute("cat /Desktop/notes.txt").unwrap());
        assert_eq!(out, "hello there");
    }

    #[test]
    fn open_then_windows_shows_the_focused_window() {
        let mut shell = shell();
        let out = text(shell.execute("open /Desktop/Welcome.txt").unwrap());
        assert!(out.contains("window 1"));
        let out = text(shell.execute("windows").unwrap());
        assert!(out.contains("* 1. Welcome.txt"));
        text(shell.execute("min 1").unwrap());
        let out = text(shell.execute("windows").unwrap());
        assert!(out.contains("(minimized)"));
    }

    #[test]
    fn explorer_is_a_singleton_across_commands() {
        let mut shell = shell();
        text(shell.execute("explorer").unwrap());
        text(shell.execute("explorer").unwrap());
        assert_eq!(shell.desktop().windows().windows().len(), 1);
    }

    #[test]
    fn unknown_commands_and_paths_report_errors() {
        let mut shell = shell();
        let err = shell.execute("frobnicate").unwrap_err();
        assert_eq!(err.error_type, TreeosErrorType::InvalidCommand);
        let err = shell.execute("cat /Desktop/absent.txt").unwrap_err();
        assert_eq!(err.error_type, TreeosErrorType::NotFound);
    }

    #[test]
    fn quit_ends_the_session() {
        let mut shell = shell();
        assert!(matches!(
            shell.execute("quit").unwrap(),
            ShellOutput::Quit
        ));
    }

    #[test]
    fn blank_lines_do_nothing() {
        let mut shell = shell();
        let out = text(shell.execute("   ").unwrap());
        assert!(out.is_empty());
    }
}
