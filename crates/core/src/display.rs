use crate::present::DisplayModel;

/// The one place results are drawn. Implementations replace whatever they showed before.
pub trait DisplaySurface: Send {
    fn replace(&mut self, model: &DisplayModel);
}

/// Sequence number a submission takes when it starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

impl Ticket {
    pub fn get(self) -> u64 {
        self.0
    }
}

/// Guards a [`DisplaySurface`] so a slow, older submission can never
/// overwrite the result of a newer one.
#[derive(Debug)]
pub struct DisplaySlot<S> {
    surface: S,
    issued: u64,
    shown: u64,
    current: DisplayModel,
}

impl<S: DisplaySurface> DisplaySlot<S> {
    pub fn new(surface: S) -> Self {
        Self {
            surface,
            issued: 0,
            shown: 0,
            current: DisplayModel::default(),
        }
    }

    /// Starts a submission and shows `pending` in place of the previous result.
    pub fn begin(&mut self, pending: DisplayModel) -> Ticket {
        self.issued += 1;
        let ticket = Ticket(self.issued);
        self.show(ticket, pending);
        ticket
    }

    /// Shows `model` unless a newer submission has already taken the display.
    /// Returns whether the model was shown.
    pub fn commit(&mut self, ticket: Ticket, model: DisplayModel) -> bool {
        if ticket.0 < self.shown {
            tracing::debug!(
                ticket = ticket.0,
                shown = self.shown,
                "discarding stale submission result"
            );
            return false;
        }
        self.show(ticket, model);
        true
    }

    pub fn current(&self) -> &DisplayModel {
        &self.current
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    fn show(&mut self, ticket: Ticket, model: DisplayModel) {
        self.shown = ticket.0;
        self.surface.replace(&model);
        self.current = model;
    }
}
