//! The Decoder Adapter: a small trait wrapping a gzip-member decompressor in
//! push/pull terms (feed some input, get some output) so the Resync Driver
//! can be exercised against a scripted mock without touching a real stream.
//!
//! The gzip framing (RFC 1952 header and 8-byte trailer) is parsed by hand
//! here rather than leaned on `flate2::bufread::GzDecoder`, because the
//! member body is decoded with the raw, restartable `flate2::Decompress`:
//! its internal state survives being fed a new slice on every call, which is
//! exactly what lets an Input Window refill continue an in-flight member
//! without losing position in the Huffman/back-reference state.

use flate2::{Decompress, Flush, Status};

/// Outcome of one `Decoder::step` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// `n` plaintext bytes were written to the front of `out`.
    Produced(usize),
    /// The gzip member, trailer included, has been fully consumed.
    End,
    /// The input at the decoder's current position is not valid gzip/DEFLATE.
    Err,
}

/// A restartable gzip-member decompressor.
///
/// `step` is push-based: the caller always hands it the *next* unconsumed
/// slice of the Input Window, and is told how much of that slice was used.
/// This lets the driver track its own absolute position in the window
/// instead of asking the decoder to report one.
pub trait Decoder {
    /// Discard any in-progress state and start parsing a fresh gzip member
    /// from the next byte handed to `step`.
    fn reset(&mut self);

    /// Feed `input` and decompress into `out`. Returns how many bytes of
    /// `input` were consumed this call, plus the outcome.
    fn step(&mut self, input: &[u8], out: &mut [u8]) -> (usize, StepOutcome);
}

const FEXTRA: u8 = 0x04;
const FNAME: u8 = 0x08;
const FCOMMENT: u8 = 0x10;
const FHCRC: u8 = 0x02;

enum HeaderParse {
    Incomplete,
    Invalid,
    Complete(usize),
}

/// Determine how many leading bytes of `buf` make up a full gzip header, or
/// report that more bytes are needed, or that this isn't a gzip header at
/// all. Mirrors RFC 1952 §2.3.
fn parse_header_len(buf: &[u8]) -> HeaderParse {
    const MAGIC: [u8; 3] = [0x1f, 0x8b, 0x08];
    for (i, &want) in MAGIC.iter().enumerate() {
        match buf.get(i) {
            Some(&got) if got == want => {}
            Some(_) => return HeaderParse::Invalid,
            None => return HeaderParse::Incomplete,
        }
    }
    if buf.len() < 10 {
        return HeaderParse::Incomplete;
    }
    let flags = buf[3];
    let mut pos = 10usize;

    if flags & FEXTRA != 0 {
        if buf.len() < pos + 2 {
            return HeaderParse::Incomplete;
        }
        let xlen = u16::from_le_bytes([buf[pos], buf[pos + 1]]) as usize;
        pos += 2 + xlen;
        if buf.len() < pos {
            return HeaderParse::Incomplete;
        }
    }
    if flags & FNAME != 0 {
        match buf[pos..].iter().position(|&b| b == 0) {
            Some(off) => pos += off + 1,
            None => return HeaderParse::Incomplete,
        }
    }
    if flags & FCOMMENT != 0 {
        match buf[pos..].iter().position(|&b| b == 0) {
            Some(off) => pos += off + 1,
            None => return HeaderParse::Incomplete,
        }
    }
    if flags & FHCRC != 0 {
        if buf.len() < pos + 2 {
            return HeaderParse::Incomplete;
        }
        pos += 2;
    }
    HeaderParse::Complete(pos)
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Phase {
    Header,
    Body,
    Trailer { remaining: u8 },
    Done,
}

/// `Decoder` backed by `flate2::Decompress`, with gzip header/trailer framing
/// handled directly so the body decompressor's state can persist across
/// Input Window refills.
pub struct GzipDecoder {
    phase: Phase,
    header_buf: Vec<u8>,
    inflate: Decompress,
}

impl Default for GzipDecoder {
    fn default() -> Self {
        Self { phase: Phase::Header, header_buf: Vec::with_capacity(16), inflate: Decompress::new(false) }
    }
}

impl GzipDecoder {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Decoder for GzipDecoder {
    fn reset(&mut self) {
        self.phase = Phase::Header;
        self.header_buf.clear();
        self.inflate = Decompress::new(false);
    }

    fn step(&mut self, input: &[u8], out: &mut [u8]) -> (usize, StepOutcome) {
        let mut consumed = 0usize;
        loop {
            match self.phase {
                Phase::Header => {
                    let fresh = &input[consumed..];
                    if fresh.is_empty() {
                        return (consumed, StepOutcome::Produced(0));
                    }
                    let already_had = self.header_buf.len();
                    self.header_buf.extend_from_slice(fresh);
                    match parse_header_len(&self.header_buf) {
                        HeaderParse::Invalid => return (consumed, StepOutcome::Err),
                        HeaderParse::Incomplete => {
                            consumed += fresh.len();
                            return (consumed, StepOutcome::Produced(0));
                        }
                        HeaderParse::Complete(len) => {
                            consumed += len - already_had;
                            self.header_buf.clear();
                            self.phase = Phase::Body;
                        }
                    }
                }
                Phase::Body => {
                    let fresh = &input[consumed..];
                    let before_in = self.inflate.total_in();
                    let before_out = self.inflate.total_out();
                    let result = self.inflate.decompress(fresh, out, Flush::None);
                    consumed += (self.inflate.total_in() - before_in) as usize;
                    let produced = (self.inflate.total_out() - before_out) as usize;
                    match result {
                        Ok(Status::StreamEnd) => {
                            self.phase = Phase::Trailer { remaining: 8 };
                            if produced > 0 {
                                return (consumed, StepOutcome::Produced(produced));
                            }
                        }
                        Ok(Status::Ok) | Ok(Status::BufError) => {
                            return (consumed, StepOutcome::Produced(produced));
                        }
                        Err(_) => return (consumed, StepOutcome::Err),
                    }
                }
                Phase::Trailer { remaining } => {
                    let fresh = &input[consumed..];
                    let take = fresh.len().min(remaining as usize);
                    consumed += take;
                    let left = remaining - take as u8;
                    if left == 0 {
                        self.phase = Phase::Done;
                        return (consumed, StepOutcome::End);
                    }
                    self.phase = Phase::Trailer { remaining: left };
                    return (consumed, StepOutcome::Produced(0));
                }
                Phase::Done => return (consumed, StepOutcome::End),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn gzip_bytes(plaintext: &[u8]) -> Vec<u8> {
        let mut enc = flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::default());
        enc.write_all(plaintext).unwrap();
        enc.finish().unwrap()
    }

    fn decode_all(dec: &mut dyn Decoder, mut input: &[u8]) -> (Vec<u8>, StepOutcome) {
        let mut out = vec![0u8; 256];
        let mut produced = Vec::new();
        loop {
            let (consumed, outcome) = dec.step(input, &mut out);
            input = &input[consumed..];
            match outcome {
                StepOutcome::Produced(n) => {
                    produced.extend_from_slice(&out[..n]);
                    if n == 0 && consumed == 0 && input.is_empty() {
                        return (produced, outcome);
                    }
                }
                StepOutcome::End | StepOutcome::Err => return (produced, outcome),
            }
        }
    }

    #[test]
    fn decodes_a_clean_member_in_one_or_more_steps() {
        let gz = gzip_bytes(b"hello resynchronizing world");
        let mut dec = GzipDecoder::new();
        let (plaintext, outcome) = decode_all(&mut dec, &gz);
        assert_eq!(outcome, StepOutcome::End);
        assert_eq!(plaintext, b"hello resynchronizing world");
    }

    #[test]
    fn bad_header_surfaces_as_err_from_first_step() {
        let mut dec = GzipDecoder::new();
        let mut out = vec![0u8; 16];
        let (_, outcome) = dec.step(b"not a gzip header at all!!", &mut out);
        assert_eq!(outcome, StepOutcome::Err);
    }

    #[test]
    fn bad_magic_surfaces_as_err_even_with_fewer_than_ten_bytes() {
        let mut dec = GzipDecoder::new();
        let mut out = vec![0u8; 16];
        let (_, outcome) = dec.step(b"xyz", &mut out);
        assert_eq!(outcome, StepOutcome::Err);
    }

    #[test]
    fn short_but_correct_magic_prefix_stays_incomplete() {
        let mut dec = GzipDecoder::new();
        let mut out = vec![0u8; 16];
        let (consumed, outcome) = dec.step(&[0x1f, 0x8b], &mut out);
        assert_eq!(outcome, StepOutcome::Produced(0));
        assert_eq!(consumed, 2);
    }

    #[test]
    fn reset_allows_decoding_a_second_member_from_scratch() {
        let gz = gzip_bytes(b"first");
        let mut dec = GzipDecoder::new();
        let _ = decode_all(&mut dec, &gz);
        dec.reset();
        let gz2 = gzip_bytes(b"second");
        let (plaintext, outcome) = decode_all(&mut dec, &gz2);
        assert_eq!(outcome, StepOutcome::End);
        assert_eq!(plaintext, b"second");
    }

    #[test]
    fn header_split_across_two_step_calls_still_parses() {
        let gz = gzip_bytes(b"split header test");
        let mut dec = GzipDecoder::new();
        let mut out = vec![0u8; 256];
        let (c1, o1) = dec.step(&gz[..5], &mut out);
        assert_eq!(c1, 5);
        assert_eq!(o1, StepOutcome::Produced(0));
        let (plaintext, outcome) = decode_all(&mut dec, &gz[5..]);
        assert_eq!(outcome, StepOutcome::End);
        assert_eq!(plaintext, b"split header test");
    }
}
