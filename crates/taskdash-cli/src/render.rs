//! Terminal rendering of task details and the task board.

use std::io::{self, Write};

use crossterm::style::Stylize;

use taskdash_client::{BoardSnapshot, DetailSurface};
use taskdash_core::{BadgeStyle, TaskDisplayModel};

/// Writes styled text, or plain text when color is off.
#[derive(Debug, Clone, Copy)]
pub struct Painter {
    color: bool,
}

impl Painter {
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    pub fn is_color(&self) -> bool {
        self.color
    }

    fn badge(&self, text: &str, style: BadgeStyle) -> String {
        if !self.color {
            return format!("[{}]", text);
        }
        let styled = match style {
            BadgeStyle::Success => text.green(),
            BadgeStyle::Danger => text.red(),
            BadgeStyle::Warning => text.yellow(),
            BadgeStyle::Secondary => text.dark_grey(),
        };
        styled.to_string()
    }

    fn heading(&self, text: &str) -> String {
        if self.color {
            text.bold().to_string()
        } else {
            text.to_string()
        }
    }
}

/// Detail surface that prints to the terminal.
///
/// Details go to `out`; notifications go to `err`.
pub struct TerminalSurface<W, E> {
    out: W,
    err: E,
    painter: Painter,
}

impl TerminalSurface<io::Stdout, io::Stderr> {
    pub fn stdio(color: bool) -> Self {
        Self::new(io::stdout(), io::stderr(), Painter::new(color))
    }
}

impl<W: Write, E: Write> TerminalSurface<W, E> {
    pub fn new(out: W, err: E, painter: Painter) -> Self {
        Self { out, err, painter }
    }

    #[cfg(test)]
    fn into_parts(self) -> (W, E) {
        (self.out, self.err)
    }

    fn write_model(&mut self, model: &TaskDisplayModel) -> io::Result<()> {
        let p = self.painter;
        let out = &mut self.out;

        writeln!(out, "{}", p.heading(&format!("Task {}", model.task_id)))?;
        writeln!(out, "  Status:     {}", p.badge(&model.status_label, model.status_style))?;
        writeln!(out, "  Created:    {}", model.created_display)?;
        writeln!(out, "  Completed:  {}", model.completed_display)?;
        writeln!(out)?;

        let delivery = &model.webhook_delivery;
        writeln!(out, "{}", p.heading("Webhook"))?;
        writeln!(out, "  URL:          {}", model.webhook_url_display)?;
        writeln!(out, "  Status:       {}", p.badge(&delivery.status_text, delivery.status_style))?;
        writeln!(out, "  Last attempt: {}", model.webhook_last_attempt_display)?;
        writeln!(out, "  Retries:      {}", model.webhook_retries_display)?;
        write_block(out, &p.heading("Webhook Payload"), &delivery.payload_display)?;
        write_block(out, &p.heading("Webhook Response"), &delivery.response_display)?;

        write_block(out, &p.heading("Result"), &model.result_display)?;
        write_block(out, &p.heading("Logs"), &model.logs_display)?;
        out.flush()
    }
}

impl<W: Write, E: Write> DetailSurface for TerminalSurface<W, E> {
    fn show(&mut self, model: &TaskDisplayModel) {
        if let Err(e) = self.write_model(model) {
            tracing::error!(error = %e, "Failed to write task details");
        }
    }

    fn notify(&mut self, message: &str) {
        write_notice(&mut self.err, message);
    }
}

/// Detail surface that prints the display model as JSON.
pub struct JsonSurface<W, E> {
    out: W,
    err: E,
}

impl JsonSurface<io::Stdout, io::Stderr> {
    pub fn stdio() -> Self {
        Self::new(io::stdout(), io::stderr())
    }
}

impl<W: Write, E: Write> JsonSurface<W, E> {
    pub fn new(out: W, err: E) -> Self {
        Self { out, err }
    }
}

impl<W: Write, E: Write> DetailSurface for JsonSurface<W, E> {
    fn show(&mut self, model: &TaskDisplayModel) {
        let written = serde_json::to_writer_pretty(&mut self.out, model)
            .map_err(io::Error::from)
            .and_then(|_| writeln!(self.out));
        if let Err(e) = written {
            tracing::error!(error = %e, "Failed to write task details");
        }
    }

    fn notify(&mut self, message: &str) {
        write_notice(&mut self.err, message);
    }
}

fn write_notice<E: Write>(err: &mut E, message: &str) {
    if let Err(e) = writeln!(err, "error: {}", message) {
        tracing::error!(error = %e, "Failed to write notification");
    }
}

/// Print a board snapshot as a table.
pub fn write_board<W: Write>(out: &mut W, snapshot: &BoardSnapshot, painter: Painter) -> io::Result<()> {
    let refreshed = snapshot
        .refreshed_at
        .with_timezone(&chrono::Local)
        .format("%Y-%m-%d %H:%M:%S");
    writeln!(out, "Tasks ({}), refreshed {}", snapshot.rows.len(), refreshed)?;
    writeln!(out, "{:<36}  {:<12}  {:<19}  {}", "ID", "STATUS", "CREATED", "TASK")?;
    writeln!(out, "{}", "-".repeat(100))?;

    if snapshot.is_empty() {
        writeln!(out, "No tasks yet. Submit one with `taskdash submit`.")?;
    }

    for row in &snapshot.rows {
        // Pad before painting so escape codes do not break alignment.
        let status = painter.badge(&format!("{:<10}", row.status_label), row.status_style);
        let detail = row.error.as_deref().unwrap_or(&row.description);
        writeln!(
            out,
            "{:<36}  {}  {:<19}  {}",
            row.task_id, status, row.created_display, detail
        )?;
    }
    out.flush()
}

fn write_block<W: Write>(out: &mut W, title: &str, body: &str) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", title)?;
    for line in body.lines() {
        writeln!(out, "  {}", line)?;
    }
    Ok(())
}
