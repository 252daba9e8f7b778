use cropmarket_core::display::DisplaySurface;
use cropmarket_core::present::{DisplayModel, Tone};
use std::fmt::Write as _;
use std::io::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Prints each display update. The in-flight notice goes to `progress`
/// so `out` only ever carries the final view.
pub struct TerminalSurface<O, P> {
    format: OutputFormat,
    out: O,
    progress: P,
}

impl<O, P> TerminalSurface<O, P>
where
    O: Write + Send,
    P: Write + Send,
{
    pub fn new(format: OutputFormat, out: O, progress: P) -> Self {
        Self {
            format,
            out,
            progress,
        }
    }

    fn write(&mut self, model: &DisplayModel) -> std::io::Result<()> {
        if model.pending {
            if let Some(notice) = &model.notice {
                writeln!(self.progress, "{}", notice.text)?;
            }
            return self.progress.flush();
        }

        match self.format {
            OutputFormat::Text => writeln!(self.out, "{}", render_text(model))?,
            OutputFormat::Json => {
                serde_json::to_writer_pretty(&mut self.out, model)?;
                writeln!(self.out)?;
            }
        }
        self.out.flush()
    }
}

impl<O, P> DisplaySurface for TerminalSurface<O, P>
where
    O: Write + Send,
    P: Write + Send,
{
    fn replace(&mut self, model: &DisplayModel) {
        if let Err(err) = self.write(model) {
            tracing::warn!(error = %err, "failed to write display update");
        }
    }
}

pub fn render_text(model: &DisplayModel) -> String {
    let mut out = String::new();

    if let Some(notice) = &model.notice {
        let prefix = match notice.tone {
            Tone::Error => "Error: ",
            Tone::Warning => "Warning: ",
            Tone::Info | Tone::Success => "",
        };
        let _ = writeln!(out, "{prefix}{}", notice.text);
    }

    if let Some(best) = &model.overall_best {
        let _ = writeln!(out, "{}", best.text);
    }

    for section in &model.sections {
        let _ = writeln!(out);
        let _ = writeln!(out, "{}", section.title);
        for card in &section.cards {
            let _ = writeln!(out, "  {}", card.market_name);
            let _ = writeln!(out, "    Net Profit: {}", card.net_profit);
            let _ = writeln!(out, "    Distance: {}", card.distance);
            let _ = writeln!(out, "    Predicted Price: {}", card.predicted_price);
        }
    }

    out.trim_end().to_string()
}
