use barcoders::sym::code128::Code128;
use qrcode::{Color, EcLevel, QrCode};

use crate::{TicketError, TicketResult};

/// Code128 character-set B selector understood by `barcoders`.
const CODE128_SET_B: char = 'Ɓ';

/// Modules of a linear barcode, `true` for a bar. No human-readable text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BarcodeStrip {
    modules: Vec<bool>,
}

impl BarcodeStrip {
    pub fn encode(pnr: &str) -> TicketResult<Self> {
        let symbol = Code128::new(format!("{}{}", CODE128_SET_B, pnr))
            .map_err(|e| TicketError::Barcode(format!("{:?}", e)))?;
        let modules = symbol.encode().into_iter().map(|m| m == 1).collect();
        Ok(Self { modules })
    }

    pub fn modules(&self) -> &[bool] {
        &self.modules
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Runs of consecutive bars as `(start, width)` in module units.
    pub fn bars(&self) -> Vec<(usize, usize)> {
        let mut bars = Vec::new();
        let mut start = None;
        for (i, &dark) in self.modules.iter().enumerate() {
            match (dark, start) {
                (true, None) => start = Some(i),
                (false, Some(s)) => {
                    bars.push((s, i - s));
                    start = None;
                }
                _ => {}
            }
        }
        if let Some(s) = start {
            bars.push((s, self.modules.len() - s));
        }
        bars
    }
}

/// Square QR module matrix, row-major, `true` for a dark module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QrMatrix {
    width: usize,
    modules: Vec<bool>,
}

impl QrMatrix {
    /// Low error correction keeps room for several passengers in the payload.
    pub fn encode(payload: &str) -> TicketResult<Self> {
        let code = QrCode::with_error_correction_level(payload.as_bytes(), EcLevel::L)
            .map_err(|e| TicketError::QrCode(e.to_string()))?;
        let width = code.width();
        let modules = code.to_colors().into_iter().map(|c| c == Color::Dark).collect();
        Ok(Self { width, modules })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn is_dark(&self, x: usize, y: usize) -> bool {
        self.modules[y * self.width + x]
    }
}
