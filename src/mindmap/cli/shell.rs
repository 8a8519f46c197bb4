//! Interactive shell.
//!
//! A rustyline loop over a [`Session`]. Lines are split shell-style (quotes
//! group words), the first word picks the command, and every command prints
//! its own output. Errors are printed and the loop carries on; only `exit`,
//! `quit`, or end of input leave the shell.

use super::commands::AppContext;
use super::render::{
    print_messages, render_listing, render_maps, render_position, render_search_hits,
};
use mindmap::commands::CmdMessage;
use mindmap::error::{MindmapError, Result};
use mindmap::session::Session;
use mindmap::store::fs::{filename_for_title, list_maps, resolve_map_path, FileStore};
use mindmap::store::MapStore;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::path::{Path, PathBuf};
use tracing::warn;

const PROMPT_PATH_LIMIT: usize = 30;

/// (name, usage, description), in help order.
const SHELL_COMMANDS: &[(&str, &str, &str)] = &[
    ("new", "new TITLE [--force] [--file PATH]", "Create an empty map named after TITLE"),
    ("load", "load [NAME|PATH]", "Open a map; without arguments, pick one from the data dir"),
    ("save", "save [-f PATH]", "Save the map (to PATH, which becomes the current file)"),
    ("add", "add [-p ID] TEXT", "Add under ID, under the current node, or as a new card"),
    ("list", "list|ls [-R]", "List cards or the current node's children (-R: as a tree)"),
    ("tree", "tree", "Show every card as a tree"),
    ("go", "go|cd [ID|..|/]", "Enter a node, go up, or go to the top level"),
    ("delete", "delete|del ID", "Delete a node and its children (cards ask first)"),
    ("search", "search|find TEXT", "Find nodes containing TEXT"),
    ("edit", "edit [ID] [TEXT]", "Change a node's text (defaults to the current node)"),
    ("move", "move|mv ID PARENT", "Move a node and its children under PARENT"),
    ("export", "export [PATH]", "Print the map as a text tree, or write it to PATH"),
    ("file", "file|pwd", "Show the current map file and position"),
    ("doctor", "doctor", "Check the map for structural problems"),
    ("maps", "maps", "List the maps in the data dir"),
    ("help", "help|h [COMMAND]", "Show help"),
    ("exit", "exit|quit", "Leave the shell"),
];

fn canonical(name: &str) -> &str {
    match name {
        "ls" => "list",
        "cd" => "go",
        "del" => "delete",
        "find" => "search",
        "mv" => "move",
        "pwd" => "file",
        "h" => "help",
        "quit" => "exit",
        other => other,
    }
}

fn usage_error(name: &str) -> MindmapError {
    let usage = SHELL_COMMANDS
        .iter()
        .find(|(n, ..)| *n == name)
        .map_or(name, |(_, usage, _)| *usage);
    MindmapError::InvalidOperation(format!("Usage: {usage}"))
}

/// Asks the user a follow-up question. `None` when input ended.
pub(super) trait Prompt {
    fn ask(&mut self, question: &str) -> Option<String>;
}

impl Prompt for DefaultEditor {
    fn ask(&mut self, question: &str) -> Option<String> {
        self.readline(question).ok()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Exit,
}

/// Splits a line into words. Single and double quotes group words, and a
/// backslash escapes the next character outside single quotes.
fn split_line(line: &str) -> std::result::Result<Vec<String>, String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut quote: Option<char> = None;
    let mut chars = line.chars();

    while let Some(c) = chars.next() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some('\''), c) => current.push(c),
            (_, '\\') => match chars.next() {
                Some(escaped) => {
                    current.push(escaped);
                    in_word = true;
                }
                None => return Err("Trailing backslash".into()),
            },
            (Some(_), c) => current.push(c),
            (None, '"' | '\'') => {
                quote = Some(c);
                in_word = true;
            }
            (None, c) if c.is_whitespace() => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            (None, c) => {
                current.push(c);
                in_word = true;
            }
        }
    }

    if quote.is_some() {
        return Err("Unterminated quote".into());
    }
    if in_word {
        words.push(current);
    }
    Ok(words)
}

struct Shell {
    ctx: AppContext,
    session: Session<FileStore>,
}

pub(super) fn run(ctx: AppContext) -> Result<()> {
    let mut editor = DefaultEditor::new().map_err(readline_error)?;
    let mut shell = Shell::start(ctx);
    shell.welcome();

    loop {
        match editor.readline(&shell.prompt()) {
            Ok(line) => {
                if line.trim().is_empty() {
                    continue;
                }
                let _ = editor.add_history_entry(line.as_str());
                match shell.execute(&line, &mut editor) {
                    Ok(Flow::Exit) => break,
                    Ok(Flow::Continue) => {}
                    Err(e) => print_messages(&[CmdMessage::error(format!("Error: {e}"))]),
                }
            }
            Err(ReadlineError::Interrupted) => {
                print_messages(&[CmdMessage::warning("Interrupted. Type 'exit' or 'quit'.")]);
            }
            Err(ReadlineError::Eof) => {
                print_messages(&[CmdMessage::info("Exiting...")]);
                break;
            }
            Err(e) => return Err(readline_error(e)),
        }
    }
    Ok(())
}

fn readline_error(e: ReadlineError) -> MindmapError {
    MindmapError::Io(std::io::Error::other(e.to_string()))
}

impl Shell {
    /// Opens the current map if it exists. A missing or unreadable map leaves
    /// the shell running with no map, so `new` and `load` stay available.
    fn start(ctx: AppContext) -> Self {
        let mut session = Session::new();
        let store = FileStore::new(&ctx.map_path);
        if store.exists() {
            if let Err(e) = session.load(store) {
                warn!(map = %ctx.map_path.display(), error = %e, "could not open map at startup");
                print_messages(&[CmdMessage::error(format!(
                    "Error: could not open '{}': {e}",
                    ctx.map_path.display()
                ))]);
            }
        }
        Self { ctx, session }
    }

    fn welcome(&self) {
        println!("Welcome to the mindmap shell. Type 'help' for commands.");
        let message = match self.session.api() {
            Some(api) if api.tree().root_ids().is_empty() => {
                format!("Currently: empty map from '{}'", api.location())
            }
            Some(api) => format!(
                "Currently: {} card(s) from '{}'",
                api.tree().root_ids().len(),
                api.location()
            ),
            None => "No map loaded. Use 'new' or 'load'.".to_string(),
        };
        print_messages(&[CmdMessage::info(message)]);
    }

    fn map_path(&self) -> Option<&Path> {
        self.session.api().map(|api| api.store().path())
    }

    fn prompt(&self) -> String {
        let file = self
            .map_path()
            .and_then(|p| p.file_name())
            .and_then(|n| n.to_str())
            .unwrap_or("no file")
            .to_string();

        let path = self
            .session
            .current()
            .ok()
            .and_then(|current| current.payload)
            .map(|position| {
                let joined = position.path.join(" / ");
                if joined.len() > PROMPT_PATH_LIMIT && position.path.len() > 2 {
                    format!(".../{}", position.path[position.path.len() - 2..].join(" / "))
                } else {
                    joined
                }
            });

        match path {
            Some(path) => format!("mindmap [{file}:{path}]> "),
            None => format!("mindmap [{file}]> "),
        }
    }

    fn execute(&mut self, line: &str, prompt: &mut dyn Prompt) -> Result<Flow> {
        let words = split_line(line).map_err(MindmapError::InvalidOperation)?;
        let Some((name, rest)) = words.split_first() else {
            return Ok(Flow::Continue);
        };
        let args: Vec<&str> = rest.iter().map(String::as_str).collect();
        let name = name.to_lowercase();

        match canonical(&name) {
            "new" => self.cmd_new(&args)?,
            "load" => self.cmd_load(&args, prompt)?,
            "save" => self.cmd_save(&args)?,
            "add" => self.cmd_add(&args)?,
            "list" => self.cmd_list(&args)?,
            "tree" => self.cmd_tree()?,
            "go" => self.cmd_go(&args)?,
            "delete" => self.cmd_delete(&args, prompt)?,
            "search" => self.cmd_search(&args)?,
            "edit" => self.cmd_edit(&args, prompt)?,
            "move" => self.cmd_move(&args)?,
            "export" => self.cmd_export(&args)?,
            "file" => self.cmd_file()?,
            "doctor" => print_messages(&self.session.doctor()?.messages),
            "maps" => self.cmd_maps()?,
            "help" => print_help(args.first().copied()),
            "exit" => return Ok(Flow::Exit),
            _ => {
                return Err(MindmapError::InvalidOperation(format!(
                    "Unknown command: '{name}'. Type 'help'."
                )))
            }
        }
        Ok(Flow::Continue)
    }

    fn cmd_new(&mut self, args: &[&str]) -> Result<()> {
        let mut force = false;
        let mut file = None;
        let mut title = Vec::new();
        let mut iter = args.iter();
        while let Some(arg) = iter.next() {
            match *arg {
                "--force" => force = true,
                "--file" => file = Some(iter.next().ok_or_else(|| usage_error("new"))?),
                word => title.push(word),
            }
        }
        if title.is_empty() {
            return Err(usage_error("new"));
        }

        let path = match file {
            Some(path) => PathBuf::from(path),
            None => self
                .ctx
                .data_dir
                .join(filename_for_title(&title.join(" "))),
        };
        let result = self.session.new_map(FileStore::new(path), force)?;
        print_messages(&result.messages);
        Ok(())
    }

    fn cmd_load(&mut self, args: &[&str], prompt: &mut dyn Prompt) -> Result<()> {
        let path = match args {
            [] => match self.choose_map(prompt)? {
                Some(path) => path,
                None => return Ok(()),
            },
            [target] => resolve_map_path(&self.ctx.data_dir, target),
            _ => return Err(usage_error("load")),
        };

        let store = FileStore::new(path);
        let existed = store.exists();
        let result = self.session.load(store)?;
        print_messages(&result.messages);
        if existed
            && self
                .session
                .api()
                .is_some_and(|api| api.tree().root_ids().is_empty())
        {
            print_messages(&[CmdMessage::info("Loaded map is empty.")]);
        }
        Ok(())
    }

    /// Lists the maps in the data dir and asks which one to open.
    fn choose_map(&self, prompt: &mut dyn Prompt) -> Result<Option<PathBuf>> {
        let dir = &self.ctx.data_dir;
        let names = list_maps(dir)?;
        if names.is_empty() {
            let default = self.ctx.config.default_map_path(dir);
            print_messages(&[CmdMessage::info(format!(
                "No mind map files found in {}. Defaulting to '{}'.",
                dir.display(),
                self.ctx.config.default_map
            ))]);
            return Ok(Some(default));
        }

        println!("Available mind map files:");
        for (i, name) in names.iter().enumerate() {
            println!("  {}. {}", i + 1, name);
        }
        let choice = prompt
            .ask("Enter number, name, or path to load ('0' to cancel): ")
            .unwrap_or_default();
        let choice = choice.trim();

        if choice.is_empty() || choice == "0" {
            print_messages(&[CmdMessage::info("Load cancelled.")]);
            return Ok(None);
        }
        match choice.parse::<usize>() {
            Ok(n) if (1..=names.len()).contains(&n) => Ok(Some(dir.join(&names[n - 1]))),
            Ok(_) => Err(MindmapError::InvalidOperation("Invalid number.".into())),
            Err(_) => Ok(Some(resolve_map_path(dir, choice))),
        }
    }

    fn cmd_save(&mut self, args: &[&str]) -> Result<()> {
        let result = match args {
            [] => self.session.save()?,
            ["-f", path] => self.session.save_as(FileStore::new(*path))?,
            _ => return Err(usage_error("save")),
        };
        print_messages(&result.messages);
        Ok(())
    }

    fn cmd_add(&mut self, args: &[&str]) -> Result<()> {
        let mut parent = None;
        let mut text = Vec::new();
        let mut iter = args.iter();
        while let Some(arg) = iter.next() {
            match *arg {
                "-p" => parent = Some(*iter.next().ok_or_else(|| usage_error("add"))?),
                word => text.push(word),
            }
        }
        if text.is_empty() {
            return Err(usage_error("add"));
        }

        if parent.is_none() && self.session.cursor().is_none() && self.session.is_loaded() {
            print_messages(&[CmdMessage::info(
                "No parent specified and not inside a card. Creating a new card.",
            )]);
        }
        let result = self.session.add(&text.join(" "), parent)?;
        print_messages(&result.messages);
        Ok(())
    }

    fn cmd_list(&mut self, args: &[&str]) -> Result<()> {
        let recursive = args.iter().any(|a| *a == "-R" || *a == "--recursive");
        if !self.session.is_loaded() {
            print_messages(&[CmdMessage::info(format!(
                "No map loaded. Maps in {}:",
                self.ctx.data_dir.display()
            ))]);
            return self.cmd_maps();
        }

        let result = self
            .session
            .list(recursive, self.ctx.render_options())?;
        print!(
            "{}",
            render_listing(&result.payload, self.ctx.config.show_ids)
        );
        print_messages(&result.messages);
        Ok(())
    }

    fn cmd_tree(&mut self) -> Result<()> {
        let result = self.session.export(self.ctx.render_options())?;
        match result.payload {
            Some(text) => println!("{text}"),
            None => print_messages(&result.messages),
        }
        Ok(())
    }

    fn cmd_go(&mut self, args: &[&str]) -> Result<()> {
        match args {
            [] => {
                let result = self.session.current()?;
                if let Some(position) = &result.payload {
                    print!(
                        "{}",
                        render_position(position, self.ctx.config.show_ids)
                    );
                }
                print_messages(&result.messages);
            }
            [target] => print_messages(&self.session.go(target)?.messages),
            _ => return Err(usage_error("go")),
        }
        Ok(())
    }

    fn cmd_delete(&mut self, args: &[&str], prompt: &mut dyn Prompt) -> Result<()> {
        let [id] = args else {
            return Err(usage_error("delete"));
        };

        let card_text = self
            .session
            .api()
            .filter(|api| api.tree().is_root(id))
            .and_then(|api| api.tree().get(id))
            .map(|card| card.text.clone());

        let confirmed = match card_text {
            Some(text) => {
                let answer = prompt
                    .ask(&format!(
                        "Delete the card '{text}' and everything under it? (yes/no): "
                    ))
                    .unwrap_or_default();
                if !answer.trim().eq_ignore_ascii_case("yes") {
                    print_messages(&[CmdMessage::info("Deletion cancelled.")]);
                    return Ok(());
                }
                true
            }
            None => false,
        };

        let result = self.session.delete(id, confirmed)?;
        print_messages(&result.messages);
        Ok(())
    }

    fn cmd_search(&mut self, args: &[&str]) -> Result<()> {
        if args.is_empty() {
            return Err(usage_error("search"));
        }
        let result = self.session.search(&args.join(" "))?;
        print_messages(&result.messages);
        print!(
            "{}",
            render_search_hits(&result.payload, self.ctx.config.show_ids)
        );
        Ok(())
    }

    fn cmd_edit(&mut self, args: &[&str], prompt: &mut dyn Prompt) -> Result<()> {
        let (id, text) = match args {
            [] => (None, None),
            [id] => (Some(*id), None),
            [id, words @ ..] => (Some(*id), Some(words.join(" "))),
        };

        let text = match text {
            Some(text) => text,
            None => {
                let api = self.session.api().ok_or(MindmapError::NoMap)?;
                let target = id
                    .map(str::to_string)
                    .or_else(|| self.session.cursor().map(|c| c.to_string()))
                    .ok_or_else(|| {
                        MindmapError::InvalidOperation(
                            "Go into a node or give a node ID to edit.".into(),
                        )
                    })?;
                let node = api.tree().get(&target).ok_or_else(|| {
                    MindmapError::NotFound(format!(
                        "Node with ID '{target}' not found for editing."
                    ))
                })?;
                print_messages(&[CmdMessage::info(format!("Current text: '{}'", node.text))]);

                let answer = prompt
                    .ask("Enter new text (or press Enter to cancel): ")
                    .unwrap_or_default();
                let answer = answer.trim();
                if answer.is_empty() {
                    print_messages(&[CmdMessage::info("Edit cancelled.")]);
                    return Ok(());
                }
                answer.to_string()
            }
        };

        let result = self.session.edit(id, &text)?;
        print_messages(&result.messages);
        Ok(())
    }

    fn cmd_move(&mut self, args: &[&str]) -> Result<()> {
        let [id, parent] = args else {
            return Err(usage_error("move"));
        };
        let result = self.session.move_node(id, parent)?;
        print_messages(&result.messages);
        Ok(())
    }

    fn cmd_export(&mut self, args: &[&str]) -> Result<()> {
        match args {
            [] => self.cmd_tree(),
            [path] => {
                let result = self
                    .session
                    .export_to_file(Path::new(path), self.ctx.render_options())?;
                print_messages(&result.messages);
                Ok(())
            }
            _ => Err(usage_error("export")),
        }
    }

    fn cmd_file(&mut self) -> Result<()> {
        let Some(location) = self.session.location() else {
            print_messages(&[CmdMessage::info(format!(
                "No mind map file active. Default target: {}",
                self.ctx.map_path.display()
            ))]);
            return Ok(());
        };
        print_messages(&[CmdMessage::info(format!(
            "Current mind map file: {location}"
        ))]);
        self.cmd_go(&[])
    }

    fn cmd_maps(&mut self) -> Result<()> {
        let names = list_maps(&self.ctx.data_dir)?;
        let current = self
            .map_path()
            .filter(|p| p.parent() == Some(self.ctx.data_dir.as_path()))
            .and_then(|p| p.file_name())
            .and_then(|n| n.to_str());
        print!("{}", render_maps(&names, current));
        Ok(())
    }
}

fn print_help(command: Option<&str>) {
    match command {
        Some(name) => {
            let name = canonical(name);
            match SHELL_COMMANDS.iter().find(|(n, ..)| *n == name) {
                Some((_, usage, about)) => println!("Usage: {usage}\n  {about}"),
                None => print_messages(&[CmdMessage::error(format!(
                    "Unknown command: '{name}'."
                ))]),
            }
        }
        None => {
            println!("Commands:");
            for (_, usage, about) in SHELL_COMMANDS {
                println!("  {usage:<36} {about}");
            }
        }
    }
}
