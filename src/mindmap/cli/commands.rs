use super::render::{
    print_messages, render_listing, render_maps, render_messages, render_search_hits,
};
use super::setup::{print_grouped_help, print_help_for_command, Cli, Commands};
use super::shell;
use clap::Parser;
use mindmap::api::MindmapApi;
use mindmap::commands::config::ConfigAction;
use mindmap::commands::export::RenderOptions;
use mindmap::config::{self, MindmapConfig};
use mindmap::error::{MindmapError, Result};
use mindmap::store::fs::{list_maps, FileStore};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Everything a handler needs: where maps live and which one is current.
pub(super) struct AppContext {
    pub data_dir: PathBuf,
    pub map_path: PathBuf,
    pub config: MindmapConfig,
}

impl AppContext {
    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            show_ids: self.config.show_ids,
        }
    }
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    if cli.help {
        match &cli.command {
            None => print_grouped_help(),
            Some(command) => print_help_for_command(command.name()),
        }
        return Ok(());
    }

    setup_logging(cli.verbose);

    if let Some(Commands::Help { command }) = &cli.command {
        match command {
            Some(name) => print_help_for_command(name),
            None => print_grouped_help(),
        }
        return Ok(());
    }

    let ctx = init_context(&cli)?;
    debug!(
        command = cli.command.as_ref().map_or("list", |c| c.name()),
        map = %ctx.map_path.display(),
        "dispatching"
    );

    match cli.command {
        Some(Commands::Add { parent, text }) => handle_add(&ctx, &text.join(" "), parent),
        Some(Commands::Delete { id, yes }) => handle_delete(&ctx, &id, yes),
        Some(Commands::Edit { id, text }) => handle_edit(&ctx, &id, &text.join(" ")),
        Some(Commands::Move { id, parent }) => handle_move(&ctx, &id, &parent),
        Some(Commands::List { recursive }) => handle_list(&ctx, recursive),
        Some(Commands::Tree) => handle_list(&ctx, true),
        Some(Commands::Search { term }) => handle_search(&ctx, &term.join(" ")),
        Some(Commands::Export { output }) => handle_export(&ctx, output.as_deref()),
        Some(Commands::New { force }) => handle_new(&ctx, force),
        Some(Commands::Maps) => handle_maps(&ctx),
        Some(Commands::Shell) => shell::run(ctx),
        Some(Commands::Doctor) => handle_doctor(&ctx),
        Some(Commands::Config { key, value }) => handle_config(&ctx, key, value),
        Some(Commands::Help { .. }) => Ok(()),
        None => handle_list(&ctx, false),
    }
}

fn setup_logging(verbosity: u8) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let level = match verbosity {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_names(false)
        .with_line_number(false);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();
}

fn init_context(cli: &Cli) -> Result<AppContext> {
    let data_dir = config::data_dir()?;
    let config = MindmapConfig::load(&data_dir)?;
    let map_path = match &cli.file {
        Some(path) => path.clone(),
        None => config.default_map_path(&data_dir),
    };
    Ok(AppContext {
        data_dir,
        map_path,
        config,
    })
}

/// Opens the current map. A map that does not exist yet opens empty and is
/// written on the first change.
fn open_api(ctx: &AppContext) -> Result<MindmapApi<FileStore>> {
    let opened = MindmapApi::open(FileStore::new(&ctx.map_path))?;
    print_messages(&opened.messages);
    Ok(opened.payload)
}

fn handle_add(ctx: &AppContext, text: &str, parent: Option<String>) -> Result<()> {
    let mut api = open_api(ctx)?;
    let result = api.add(text, parent.as_deref())?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_delete(ctx: &AppContext, id: &str, yes: bool) -> Result<()> {
    let mut api = open_api(ctx)?;
    let result = match api.delete(id, yes) {
        Err(MindmapError::InvalidOperation(msg)) if !yes && api.tree().is_root(id) => {
            return Err(MindmapError::InvalidOperation(format!(
                "{msg} Re-run with --yes to delete it."
            )))
        }
        other => other?,
    };
    print_messages(&result.messages);
    Ok(())
}

fn handle_edit(ctx: &AppContext, id: &str, text: &str) -> Result<()> {
    let mut api = open_api(ctx)?;
    let result = api.edit(id, text)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_move(ctx: &AppContext, id: &str, parent: &str) -> Result<()> {
    let mut api = open_api(ctx)?;
    let result = api.move_node(id, parent)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_list(ctx: &AppContext, recursive: bool) -> Result<()> {
    let api = open_api(ctx)?;
    let result = api.list(None, recursive, ctx.render_options())?;
    print!("{}", render_listing(&result.payload, ctx.config.show_ids));
    print_messages(&result.messages);
    Ok(())
}

fn handle_search(ctx: &AppContext, term: &str) -> Result<()> {
    let api = open_api(ctx)?;
    let result = api.search(term)?;
    print!(
        "{}",
        render_search_hits(&result.payload, ctx.config.show_ids)
    );
    print_messages(&result.messages);
    Ok(())
}

fn handle_export(ctx: &AppContext, output: Option<&Path>) -> Result<()> {
    let api = open_api(ctx)?;
    match output {
        Some(path) => {
            let result = api.export_to_file(path, ctx.render_options())?;
            print_messages(&result.messages);
        }
        None => {
            let result = api.export(ctx.render_options())?;
            match result.payload {
                // Keep stdout clean for piping: just the tree.
                Some(text) => println!("{text}"),
                None => print_messages(&result.messages),
            }
        }
    }
    Ok(())
}

fn handle_new(ctx: &AppContext, force: bool) -> Result<()> {
    let created = MindmapApi::create(FileStore::new(&ctx.map_path), force)?;
    print_messages(&created.messages);
    Ok(())
}

fn handle_maps(ctx: &AppContext) -> Result<()> {
    let names = list_maps(&ctx.data_dir)?;
    let current = current_map_name(ctx);
    print!("{}", render_maps(&names, current.as_deref()));
    Ok(())
}

/// File name of the current map, when it lives in the data dir.
pub(super) fn current_map_name(ctx: &AppContext) -> Option<String> {
    (ctx.map_path.parent() == Some(ctx.data_dir.as_path()))
        .then(|| ctx.map_path.file_name())
        .flatten()
        .and_then(|n| n.to_str())
        .map(str::to_string)
}

fn handle_doctor(ctx: &AppContext) -> Result<()> {
    let api = open_api(ctx)?;
    let result = api.doctor()?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_config(ctx: &AppContext, key: Option<String>, value: Option<String>) -> Result<()> {
    let action = match (key, value) {
        (None, _) => ConfigAction::ShowAll,
        (Some(key), None) => ConfigAction::ShowKey(key),
        (Some(key), Some(value)) => ConfigAction::Set(key, value),
    };
    let result = mindmap::commands::config::run(&ctx.data_dir, action)?;
    print!("{}", render_messages(&result.messages));
    Ok(())
}
