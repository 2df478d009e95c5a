use std::fmt::Write as _;

use encoding_rs::{Encoding, UTF_8};
use parquet::data_type::{ByteArray, FixedLenByteArray, Int96};
use serde::Serialize;
use time::format_description::well_known::Rfc3339;
use time::{Duration, OffsetDateTime};

use super::encoding::TextDecoder;

const DEFAULT_BATCH_SIZE: usize = 128;
const JULIAN_DAY_OF_UNIX_EPOCH: i64 = 2_440_588;

/// Rendering of 96-bit integer values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum Int96Format {
    /// The three 32-bit words, low word first, separated by single spaces.
    #[default]
    Words,
    /// RFC 3339 UTC timestamp, reading the value as nanoseconds of day in
    /// the low 64 bits and a Julian day number in the high 32 bits.
    Timestamp,
}

/// Decoding and rendering settings shared by every scanner of a reader.
#[derive(Debug, Clone, Copy)]
pub struct ScanOptions {
    /// Minimum rendered width; shorter values are left-aligned and padded.
    pub width: usize,
    /// Values decoded from a column chunk per refill.
    pub batch_size: usize,
    pub int96: Int96Format,
    pub encoding: &'static Encoding,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            width: 0,
            batch_size: DEFAULT_BATCH_SIZE,
            int96: Int96Format::Words,
            encoding: UTF_8,
        }
    }
}

/// Per-scanner scratch state used to turn physical values into text.
pub(crate) struct Renderer {
    width: usize,
    int96: Int96Format,
    text: TextDecoder,
    itoa: itoa::Buffer,
    ryu: ryu::Buffer,
}

impl Renderer {
    pub(crate) fn new(options: &ScanOptions) -> Self {
        Self {
            width: options.width,
            int96: options.int96,
            text: TextDecoder::new(options.encoding),
            itoa: itoa::Buffer::new(),
            ryu: ryu::Buffer::new(),
        }
    }

    /// Renders `value` into a fresh string padded to the configured width.
    pub(crate) fn render<V: RenderValue + ?Sized>(&mut self, value: &V) -> String {
        let mut out = String::new();
        value.render_into(self, &mut out);
        let rendered = out.chars().count();
        if rendered < self.width {
            out.extend(std::iter::repeat_n(' ', self.width - rendered));
        }
        out
    }
}

/// Physical values that have a display rendering.
pub(crate) trait RenderValue {
    fn render_into(&self, renderer: &mut Renderer, out: &mut String);
}

impl RenderValue for bool {
    fn render_into(&self, _renderer: &mut Renderer, out: &mut String) {
        out.push(if *self { '1' } else { '0' });
    }
}

impl RenderValue for i32 {
    fn render_into(&self, renderer: &mut Renderer, out: &mut String) {
        out.push_str(renderer.itoa.format(*self));
    }
}

impl RenderValue for i64 {
    fn render_into(&self, renderer: &mut Renderer, out: &mut String) {
        out.push_str(renderer.itoa.format(*self));
    }
}

impl RenderValue for f32 {
    fn render_into(&self, renderer: &mut Renderer, out: &mut String) {
        out.push_str(renderer.ryu.format(*self));
    }
}

impl RenderValue for f64 {
    fn render_into(&self, renderer: &mut Renderer, out: &mut String) {
        out.push_str(renderer.ryu.format(*self));
    }
}

impl RenderValue for Int96 {
    fn render_into(&self, renderer: &mut Renderer, out: &mut String) {
        let words = self.data();
        if renderer.int96 == Int96Format::Timestamp
            && let Some(timestamp) = int96_timestamp(words)
        {
            out.push_str(&timestamp);
            return;
        }
        for (position, word) in words.iter().enumerate() {
            if position > 0 {
                out.push(' ');
            }
            out.push_str(renderer.itoa.format(*word));
        }
    }
}

impl RenderValue for ByteArray {
    fn render_into(&self, renderer: &mut Renderer, out: &mut String) {
        renderer.text.decode_into(self.data(), out);
    }
}

impl RenderValue for FixedLenByteArray {
    fn render_into(&self, _renderer: &mut Renderer, out: &mut String) {
        for (position, byte) in self.data().iter().enumerate() {
            if position > 0 {
                out.push(' ');
            }
            let _ = write!(out, "{byte}");
        }
    }
}

/// Out-of-range timestamps fall back to the word rendering.
fn int96_timestamp(words: &[u32]) -> Option<String> {
    let &[low, mid, high] = words else {
        return None;
    };
    let nanos_of_day = (u64::from(mid) << 32) | u64::from(low);
    let days = i64::from(high) - JULIAN_DAY_OF_UNIX_EPOCH;
    let timestamp = OffsetDateTime::UNIX_EPOCH
        .checked_add(Duration::days(days))?
        .checked_add(Duration::nanoseconds(i64::try_from(nanos_of_day).ok()?))?;
    timestamp.format(&Rfc3339).ok()
}
