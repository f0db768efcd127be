//! Action Log Component
//!
//! Side panel listing recorded actions and the most recent log lines.

use leptos::prelude::*;

use crate::context::AppContext;

/// Log lines shown under the action list
const LOG_TAIL: usize = 20;

#[component]
pub fn ActionLog() -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext should be provided");

    let actions = move || {
        ctx.dnd.revision_read.track();
        ctx.protocol
            .try_with_value(|p| p.host().actions().cloned().collect::<Vec<_>>())
            .unwrap_or_default()
    };

    let log_lines = move || {
        ctx.dnd.revision_read.track();
        let lines = rolling_logger::buffer().map(|b| b.lines()).unwrap_or_default();
        let skip = lines.len().saturating_sub(LOG_TAIL);
        lines.into_iter().skip(skip).map(|l| l.text).collect::<Vec<_>>()
    };

    let on_clear_log = move |_| {
        if let Some(buffer) = rolling_logger::buffer() {
            buffer.clear();
        }
        ctx.reload();
    };

    let on_export = move |_| {
        ctx.protocol.update_value(|p| p.export_configuration());
        ctx.reload();
    };

    view! {
        <aside class="action-log">
            <h2>"Actions"</h2>
            <button class="export-btn" on:click=on_export>"Export configuration"</button>
            <ol class="action-list">
                {move || actions()
                    .into_iter()
                    .rev()
                    .map(|a| view! {
                        <li>
                            <span class="action-selection">{a.selection}</span>
                            <span class="action-name">{a.action}</span>
                            <span class="action-input">{a.input}</span>
                        </li>
                    })
                    .collect_view()}
            </ol>
            <h2>"Log"</h2>
            <button class="clear-log-btn" on:click=on_clear_log>"Clear log"</button>
            <pre class="log-lines">{move || log_lines().join("\n")}</pre>
        </aside>
    }
}
