//! Item Content Markdown
//!
//! Text nodes of items are rendered through pulldown-cmark with one
//! extension, the color syntax: %r%red%r%. Raw HTML in item content is
//! escaped, images render with a bounded size.

use pulldown_cmark::{html::push_html, CowStr, Event, Options, Parser, Tag};

/// Color codes and their hex values
const COLORS: &[(&str, &str)] = &[
    ("r", "#e74c3c"), // red
    ("g", "#27ae60"), // green
    ("b", "#3498db"), // blue
    ("y", "#f1c40f"), // yellow
    ("o", "#e67e22"), // orange
    ("p", "#9b59b6"), // purple
];

/// Parse markdown with the color extension
pub fn parse_markdown(text: &str) -> String {
    let parser = Parser::new_ext(text, Options::ENABLE_STRIKETHROUGH);
    let events = transform_events(parser);
    let mut html_output = String::new();
    push_html(&mut html_output, events.into_iter());
    html_output
}

/// Parse markdown for inline use (strips outer <p> tags)
pub fn parse_markdown_inline(text: &str) -> String {
    let html = parse_markdown(text);

    html.trim()
        .strip_prefix("<p>")
        .and_then(|s| s.strip_suffix("</p>"))
        .map(|s| s.to_string())
        .unwrap_or(html)
}

fn transform_events<'a>(parser: Parser<'a>) -> Vec<Event<'a>> {
    let mut events = Vec::new();
    // Depth of alt text events being skipped after an image
    let mut skipping: Option<usize> = None;

    for event in parser {
        if let Some(depth) = skipping.as_mut() {
            match event {
                Event::Start(_) => *depth += 1,
                Event::End(_) if *depth == 0 => skipping = None,
                Event::End(_) => *depth -= 1,
                _ => {}
            }
            continue;
        }

        match event {
            Event::Start(Tag::Image { dest_url, .. }) => {
                let html = format!(
                    r#"<img src="{}" style="max-width: 100%; max-height: 160px; display: block;" draggable="false" />"#,
                    escape_html(&dest_url)
                );
                events.push(Event::Html(CowStr::from(html)));
                skipping = Some(0);
            }
            Event::Html(raw) | Event::InlineHtml(raw) => events.push(Event::Text(raw)),
            Event::Text(text) if contains_color(&text) => events.extend(process_colors(&text)),
            other => events.push(other),
        }
    }

    events
}

fn contains_color(text: &str) -> bool {
    COLORS.iter().any(|(code, _)| text.contains(&format!("%{}%", code)))
}

/// Split text on the earliest color marker until none is left
fn process_colors(text: &str) -> Vec<Event<'static>> {
    let mut events = Vec::new();
    let mut remaining = text.to_string();

    while !remaining.is_empty() {
        let earliest = COLORS
            .iter()
            .filter_map(|(code, color)| {
                let pattern = format!("%{}%", code);
                remaining.find(&pattern).map(|pos| (pos, pattern, *color))
            })
            .min_by_key(|(pos, _, _)| *pos);

        let Some((pos, pattern, color)) = earliest else {
            events.push(Event::Text(CowStr::from(remaining)));
            break;
        };

        if pos > 0 {
            events.push(Event::Text(CowStr::from(remaining[..pos].to_string())));
        }
        remaining = remaining[pos + pattern.len()..].to_string();

        match remaining.find(&pattern) {
            Some(end_pos) => {
                events.push(Event::Html(CowStr::from(format!("<span style=\"color: {}\">", color))));
                if end_pos > 0 {
                    events.push(Event::Text(CowStr::from(remaining[..end_pos].to_string())));
                }
                events.push(Event::Html(CowStr::from("</span>")));
                remaining = remaining[end_pos + pattern.len()..].to_string();
            }
            // Unclosed marker stays literal
            None => events.push(Event::Text(CowStr::from(pattern))),
        }
    }
    events
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
