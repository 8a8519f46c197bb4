//! # Rendering
//!
//! Turns command payloads and messages into terminal text. Colors come from
//! `colored`, which already backs off when stdout is not a terminal or
//! `NO_COLOR` is set. Every `render_*` returns a `String` so it can be tested;
//! the `*_internal` variants take `use_color` so tests can force plain output.

use colored::{ColoredString, Colorize};
use mindmap::commands::list::Listing;
use mindmap::commands::search::SearchHit;
use mindmap::commands::{CmdMessage, MessageLevel};
use mindmap::model::Node;
use mindmap::session::Position;

fn paint(text: &str, use_color: Option<bool>, style: fn(&str) -> ColoredString) -> String {
    match use_color {
        Some(false) => text.to_string(),
        _ => style(text).to_string(),
    }
}

fn node_label(node: &Node, show_ids: bool, use_color: Option<bool>) -> String {
    if show_ids {
        format!(
            "{} {}",
            node.text,
            paint(&format!("(ID: {})", node.id), use_color, |s| s.dimmed())
        )
    } else {
        node.text.clone()
    }
}

fn child_count(node: &Node) -> String {
    match node.children_ids.len() {
        0 => String::new(),
        1 => " [1 child]".to_string(),
        n => format!(" [{n} children]"),
    }
}

pub fn render_listing(listing: &Listing, show_ids: bool) -> String {
    render_listing_internal(listing, show_ids, None)
}

fn render_listing_internal(listing: &Listing, show_ids: bool, use_color: Option<bool>) -> String {
    let mut out = String::new();
    match listing {
        Listing::Cards(cards) => {
            for (i, card) in cards.iter().enumerate() {
                out.push_str(&format!(
                    "{} {}{}\n",
                    paint(&format!("{}.", i + 1), use_color, |s| s.yellow()),
                    node_label(card, show_ids, use_color),
                    child_count(card)
                ));
            }
        }
        Listing::Children { parent, children } => {
            out.push_str(&format!(
                "{}\n",
                paint(&node_label(parent, show_ids, Some(false)), use_color, |s| s
                    .bold())
            ));
            for child in children {
                out.push_str(&format!(
                    "  - {}{}\n",
                    node_label(child, show_ids, use_color),
                    child_count(child)
                ));
            }
        }
        Listing::Tree(text) => {
            out.push_str(text);
            out.push('\n');
        }
    }
    out
}

pub fn render_search_hits(hits: &[SearchHit], show_ids: bool) -> String {
    render_search_hits_internal(hits, show_ids, None)
}

fn render_search_hits_internal(hits: &[SearchHit], show_ids: bool, use_color: Option<bool>) -> String {
    hits.iter()
        .map(|hit| {
            format!(
                "- {} | Path: {}\n",
                node_label(&hit.node, show_ids, use_color),
                paint(&hit.path_display(), use_color, |s| s.cyan())
            )
        })
        .collect()
}

pub fn render_position(position: &Position, show_ids: bool) -> String {
    render_position_internal(position, show_ids, None)
}

fn render_position_internal(position: &Position, show_ids: bool, use_color: Option<bool>) -> String {
    let mut out = format!(
        "Current: {}\n",
        paint(&node_label(&position.node, show_ids, Some(false)), use_color, |s| s.bold())
    );
    out.push_str(&format!("Path:    {}\n", position.path.join(" -> ")));
    out.push_str(&format!("Depth:   {}\n", position.node.depth));
    if let Some(parent) = &position.parent {
        out.push_str(&format!("Parent:  {}\n", node_label(parent, show_ids, use_color)));
    }
    out.push_str(&format!("Children: {}\n", position.child_count));
    out
}

/// Map names, marking the one currently in use.
pub fn render_maps(names: &[String], current: Option<&str>) -> String {
    render_maps_internal(names, current, None)
}

fn render_maps_internal(names: &[String], current: Option<&str>, use_color: Option<bool>) -> String {
    if names.is_empty() {
        return "No maps found.\n".to_string();
    }
    names
        .iter()
        .map(|name| {
            if Some(name.as_str()) == current {
                format!("* {}\n", paint(name, use_color, |s| s.green()))
            } else {
                format!("  {name}\n")
            }
        })
        .collect()
}

pub fn render_messages(messages: &[CmdMessage]) -> String {
    render_messages_internal(messages, None)
}

fn render_messages_internal(messages: &[CmdMessage], use_color: Option<bool>) -> String {
    messages
        .iter()
        .map(|message| {
            let text = match message.level {
                MessageLevel::Info => paint(&message.content, use_color, |s| s.dimmed()),
                MessageLevel::Success => paint(&message.content, use_color, |s| s.green()),
                MessageLevel::Warning => paint(&message.content, use_color, |s| s.yellow()),
                MessageLevel::Error => paint(&message.content, use_color, |s| s.red()),
            };
            format!("{text}\n")
        })
        .collect()
}

pub fn print_messages(messages: &[CmdMessage]) {
    let output = render_messages(messages);
    if !output.is_empty() {
        print!("{}", output);
    }
}
