//! Structured dispatch records and the consumer-facing boundary.

/// No standard defines a sequence with more than two intermediates; excess
/// bytes set a flag and are discarded.
pub(crate) const MAX_INTERMEDIATES: usize = 2;

/// The structured result of a complete escape sequence: the final code
/// point, collected intermediates, an optional private marker, the numeric
/// parameter list and, for OSC/DCS, the accumulated string payload.
///
/// A single record type serves all sequence families; fields that do not
/// apply are simply empty. The record handed to an [`Interpreter`] is only
/// valid for the duration of the callback.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dispatch {
    pub(crate) final_byte: char,
    pub(crate) intermediates: [u8; MAX_INTERMEDIATES],
    pub(crate) intermediates_len: usize,
    pub(crate) intermediates_truncated: bool,
    pub(crate) private_marker: Option<u8>,
    pub(crate) params: Vec<u16>,
    pub(crate) params_truncated: bool,
    pub(crate) payload: Vec<u8>,
}

impl Dispatch {
    /// Code point that triggered the dispatch. `'\0'` for OSC records,
    /// whose terminator carries no meaning of its own.
    #[must_use]
    pub fn final_byte(&self) -> char {
        self.final_byte
    }

    /// Collected intermediate bytes (0x20..=0x2F), in arrival order.
    #[must_use]
    pub fn intermediates(&self) -> &[u8] {
        &self.intermediates[..self.intermediates_len]
    }

    /// True when more intermediates arrived than the record stores.
    #[must_use]
    pub fn intermediates_truncated(&self) -> bool {
        self.intermediates_truncated
    }

    /// Private marker byte (0x3C..=0x3F) denoting a vendor-private
    /// sequence, e.g. the `?` of DECSET.
    #[must_use]
    pub fn private_marker(&self) -> Option<u8> {
        self.private_marker
    }

    /// Numeric parameters in arrival order. Omitted parameters are encoded
    /// as 0; values saturate at 65535.
    #[must_use]
    pub fn params(&self) -> &[u16] {
        &self.params
    }

    /// True when parameters past the configured maximum were dropped.
    #[must_use]
    pub fn params_truncated(&self) -> bool {
        self.params_truncated
    }

    /// Parameter at `idx`, or `default` when it was omitted or absent.
    #[must_use]
    pub fn param(&self, idx: usize, default: u16) -> u16 {
        match self.params.get(idx).copied() {
            Some(0) | None => default,
            Some(value) => value,
        }
    }

    /// Raw string payload of an OSC or DCS sequence. OSC payloads keep
    /// their semicolons; splitting them is the interpreter's business.
    #[must_use]
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }
}

/// Consumer of completed dispatch records: the command-interpreter side of
/// the terminal.
///
/// Methods are called in stream order. For a device control string the
/// order is `dcs_hook`, then zero or more payload bytes accumulate, then
/// `dcs_unhook` with the payload attached to the record. A cancelled
/// sequence (CAN, SUB or ESC before the final byte) produces no dispatch
/// at all, except that an aborted DCS passthrough still sees `dcs_unhook`
/// so the handler can finish.
pub trait Interpreter {
    /// A printable code point.
    fn print(&mut self, ch: char);

    /// An immediate C0 control function, e.g. BEL, BS, CR, LF.
    fn execute(&mut self, control: u8);

    /// A complete escape sequence, e.g. `ESC ( B`.
    fn esc_dispatch(&mut self, dispatch: &Dispatch);

    /// A complete control sequence, e.g. `CSI 1 ; 31 m`.
    fn csi_dispatch(&mut self, dispatch: &Dispatch);

    /// A device control string header was recognised; the payload follows.
    fn dcs_hook(&mut self, dispatch: &Dispatch);

    /// The device control string ended; `dispatch.payload()` holds the
    /// accumulated data string.
    fn dcs_unhook(&mut self, dispatch: &Dispatch);

    /// An operating system command ended; `dispatch.payload()` holds the
    /// raw string.
    fn osc_dispatch(&mut self, dispatch: &Dispatch);
}
