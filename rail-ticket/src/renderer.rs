use std::fs;
use std::path::{Path, PathBuf};

use rail_core::{Booking, FareDetails, Passenger};
use tracing::{debug, info};

use crate::document::TicketDocument;
use crate::pdf::write_pdf;
use crate::TicketResult;

pub const DEFAULT_WATERMARK: &str = "E-TICKET";

/// A finished ticket held in memory.
#[derive(Debug, Clone)]
pub struct RenderedTicket {
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub text_content: String,
}

impl RenderedTicket {
    /// Write the ticket into `dir`, creating it if needed.
    pub fn save_to(&self, dir: impl AsRef<Path>) -> TicketResult<PathBuf> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;
        let path = dir.join(&self.file_name);
        fs::write(&path, &self.bytes)?;
        debug!("Saved ticket to {}", path.display());
        Ok(path)
    }
}

#[derive(Debug, Clone)]
pub struct TicketRenderer {
    watermark: String,
}

impl Default for TicketRenderer {
    fn default() -> Self {
        Self::new(DEFAULT_WATERMARK)
    }
}

impl TicketRenderer {
    pub fn new(watermark: impl Into<String>) -> Self {
        Self {
            watermark: watermark.into(),
        }
    }

    /// Render a ticket. Nothing is produced when the inputs are incomplete.
    pub fn render(
        &self,
        booking: Option<&Booking>,
        passengers: &[Passenger],
        fare: &FareDetails,
    ) -> TicketResult<RenderedTicket> {
        let document = TicketDocument::assemble(booking, passengers, fare, &self.watermark)?;
        let bytes = write_pdf(&document)?;

        info!(
            pnr = %document.pnr,
            passengers = passengers.len(),
            size = bytes.len(),
            "Ticket issued"
        );

        Ok(RenderedTicket {
            file_name: document.file_name(),
            text_content: document.text_content(),
            bytes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::fixtures::{booking, fare, passengers};
    use crate::TicketError;

    #[test]
    fn test_same_inputs_render_same_text() {
        let renderer = TicketRenderer::default();
        let first = renderer.render(Some(&booking()), &passengers(), &fare()).unwrap();
        let second = renderer.render(Some(&booking()), &passengers(), &fare()).unwrap();

        assert_eq!(first.text_content, second.text_content);
        assert_eq!(first.file_name, "Ticket_8203948245.pdf");
        assert!(first.text_content.contains(DEFAULT_WATERMARK));
    }

    #[test]
    fn test_incomplete_inputs_produce_nothing() {
        let renderer = TicketRenderer::new("VOID");
        let err = renderer.render(None, &passengers(), &fare()).unwrap_err();
        assert!(matches!(err, TicketError::MissingBooking));

        let err = renderer.render(Some(&booking()), &[], &fare()).unwrap_err();
        assert!(matches!(err, TicketError::NoPassengers(_)));
    }

    #[test]
    fn test_save_to_writes_named_file() {
        let dir = std::env::temp_dir().join(format!("rail-ticket-{}", std::process::id()));
        let ticket = TicketRenderer::default()
            .render(Some(&booking()), &passengers(), &fare())
            .unwrap();

        let path = ticket.save_to(&dir).unwrap();

        assert!(path.ends_with("Ticket_8203948245.pdf"));
        let written = std::fs::read(&path).unwrap();
        assert_eq!(written, ticket.bytes);
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
