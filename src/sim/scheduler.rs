/// Handle for one scheduled refresh, valid only for the loop generation that
/// issued it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) struct FrameTicket {
    generation: u64,
}

/// Start/stop handle for the self-rescheduling frame loop. Every `start`
/// opens a new generation, so tickets issued before a `stop` never run.
#[derive(Debug, Default)]
pub(super) struct FrameLoop {
    generation: u64,
    running: bool,
    pending: Option<FrameTicket>,
    completed_ticks: u64,
}

impl FrameLoop {
    pub(super) fn start(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        self.running = true;
        self.pending = None;
    }

    pub(super) fn stop(&mut self) {
        self.running = false;
        self.pending = None;
    }

    pub(super) fn is_running(&self) -> bool {
        self.running
    }

    /// Issues the ticket for the next refresh; at most one is outstanding.
    pub(super) fn schedule(&mut self) -> Option<FrameTicket> {
        if !self.running {
            return None;
        }

        let ticket = FrameTicket {
            generation: self.generation,
        };
        self.pending = Some(ticket);
        Some(ticket)
    }

    /// Consumes `ticket`; true when the tick belongs to the live loop and the
    /// caller should run one simulation step.
    pub(super) fn run(&mut self, ticket: FrameTicket) -> bool {
        if !self.running || self.pending != Some(ticket) {
            return false;
        }

        self.pending = None;
        self.completed_ticks += 1;
        true
    }

    pub(super) fn completed_ticks(&self) -> u64 {
        self.completed_ticks
    }
}
