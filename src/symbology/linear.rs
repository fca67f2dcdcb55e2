//! Built-in linear symbologies, backed by the barcoders crate.
//!
//! Each factory first applies the format's own rules (digit counts, GS1
//! check digits, subset C pairing). Values that break those rules yield an
//! encoder whose [`valid`](Encoder::valid) is false. Values that pass but are
//! still rejected by barcoders (unsupported characters, bad start/stop
//! characters) fail construction.
//!
//! | Format | Value |
//! |--------|-------|
//! | CODE128 | Any printable ASCII; digit pairs use subset C |
//! | CODE128A / B / C | Forced subset (C: even number of digits) |
//! | CODE39 | A-Z, 0-9, space, `-.$/+%` |
//! | CODE93 | Same as CODE39 |
//! | CODE11 | Digits and `-` |
//! | EAN13 | 12 digits, or 13 with check digit |
//! | EAN8 | 7 digits, or 8 with check digit |
//! | UPC | 11 digits, or 12 with check digit (UPC-A) |
//! | EAN5 / EAN2 | 5 or 2 digit add-on |
//! | ITF | Even number of digits |
//! | ITF14 | 13 digits, or 14 with check digit |
//! | CODABAR | Start/stop A-D around `0-9-$:/.+` |

use barcoders::sym::codabar::Codabar;
use barcoders::sym::code11::Code11;
use barcoders::sym::code128::Code128;
use barcoders::sym::code39::Code39;
use barcoders::sym::code93::Code93;
use barcoders::sym::ean13::EAN13;
use barcoders::sym::ean8::EAN8;
use barcoders::sym::ean_supp::EANSUPP;
use barcoders::sym::tf::TF;

use super::{EncodeOptions, Encoded, EncodedSegment, Encoder, Registry};
use crate::error::BarcodeError;

/// All built-in formats, in display order.
pub const FORMATS: &[&str] = &[
    "CODE128", "CODE128A", "CODE128B", "CODE128C", "CODE39", "CODE93", "CODE11", "EAN13", "EAN8",
    "EAN5", "EAN2", "UPC", "ITF", "ITF14", "CODABAR",
];

// Code 128 subset selectors understood by barcoders.
const SET_A: char = '\u{00C0}';
const SET_B: char = '\u{0181}';
const SET_C: char = '\u{0106}';

// EAN/UPC guard patterns are 3 modules at the ends, 5 in the middle.
const EDGE_GUARD: usize = 3;
const CENTER_GUARD: usize = 5;

/// A linear symbol encoded up front.
///
/// `encoded` is `None` when the value breaks the format's rules.
#[derive(Debug, Clone)]
pub struct Linear {
    format: &'static str,
    encoded: Option<Encoded>,
}

impl Linear {
    fn flat(format: &'static str, text: &str, modules: &[u8]) -> Self {
        Self {
            format,
            encoded: Some(Encoded::Single(EncodedSegment::new(text, to_bits(modules)))),
        }
    }

    fn invalid(format: &'static str) -> Self {
        Self {
            format,
            encoded: None,
        }
    }
}

impl Encoder for Linear {
    fn format(&self) -> &str {
        self.format
    }

    fn valid(&self) -> bool {
        self.encoded.is_some()
    }

    fn encode(&self) -> Encoded {
        self.encoded
            .clone()
            .unwrap_or_else(|| Encoded::Multi(Vec::new()))
    }
}

/// Register every built-in format.
pub fn register_all(registry: &mut Registry) {
    registry.register("CODE128", |v, _| boxed(code128(v, None)));
    registry.register("CODE128A", |v, _| boxed(code128(v, Some(SET_A))));
    registry.register("CODE128B", |v, _| boxed(code128(v, Some(SET_B))));
    registry.register("CODE128C", |v, _| boxed(code128(v, Some(SET_C))));
    registry.register("CODE39", |v, _| boxed(code39(v)));
    registry.register("CODE93", |v, _| boxed(code93(v)));
    registry.register("CODE11", |v, _| boxed(code11(v)));
    registry.register("EAN13", |v, o| boxed(ean13(v, o)));
    registry.register("EAN8", |v, o| boxed(ean8(v, o)));
    registry.register("EAN5", |v, _| boxed(ean_addon("EAN5", v, 5)));
    registry.register("EAN2", |v, _| boxed(ean_addon("EAN2", v, 2)));
    registry.register("UPC", |v, o| boxed(upc(v, o)));
    registry.register("ITF", |v, _| boxed(itf(v)));
    registry.register("ITF14", |v, _| boxed(itf14(v)));
    registry.register("CODABAR", |v, _| boxed(codabar(v)));
}

fn boxed(linear: Result<Linear, BarcodeError>) -> Result<Box<dyn Encoder>, BarcodeError> {
    linear.map(|l| Box::new(l) as Box<dyn Encoder>)
}

fn rejected<E: std::fmt::Debug>(format: &str, err: E) -> BarcodeError {
    BarcodeError::construction(format, format!("{:?}", err))
}

/// barcoders modules (0/1 per module) as a bit string.
fn to_bits(modules: &[u8]) -> String {
    modules
        .iter()
        .map(|&m| if m == 1 { '1' } else { '0' })
        .collect()
}

fn digits(value: &str) -> Option<Vec<u8>> {
    value
        .chars()
        .map(|c| c.to_digit(10).map(|d| d as u8))
        .collect()
}

fn digit_string(digits: &[u8]) -> String {
    digits.iter().map(|d| char::from(b'0' + d)).collect()
}

/// GS1 modulo-10 check digit for a payload without its check digit.
pub(crate) fn gs1_check_digit(payload: &[u8]) -> u8 {
    let sum: u32 = payload
        .iter()
        .rev()
        .enumerate()
        .map(|(i, &d)| if i % 2 == 0 { d as u32 * 3 } else { d as u32 })
        .sum();
    ((10 - sum % 10) % 10) as u8
}

/// Parse a GS1 number of `payload_len` digits, with an optional trailing
/// check digit. Returns the full number including the check digit.
fn gs1_number(value: &str, payload_len: usize) -> Option<Vec<u8>> {
    let mut number = digits(value)?;
    if number.len() == payload_len {
        number.push(gs1_check_digit(&number));
        Some(number)
    } else if number.len() == payload_len + 1 {
        let check = gs1_check_digit(&number[..payload_len]);
        (number[payload_len] == check).then_some(number)
    } else {
        None
    }
}

fn code128(value: &str, forced: Option<char>) -> Result<Linear, BarcodeError> {
    let format = match forced {
        None => "CODE128",
        Some(SET_A) => "CODE128A",
        Some(SET_B) => "CODE128B",
        Some(_) => "CODE128C",
    };
    if value.is_empty() {
        return Ok(Linear::invalid(format));
    }

    let all_digits = value.chars().all(|c| c.is_ascii_digit());
    let pairs = all_digits && value.len() % 2 == 0;
    let set = match forced {
        Some(SET_C) if !pairs => return Ok(Linear::invalid(format)),
        Some(set) => set,
        None if pairs => SET_C,
        None => SET_B,
    };

    let barcode = Code128::new(&format!("{}{}", set, value)).map_err(|e| rejected(format, e))?;
    Ok(Linear::flat(format, value, &barcode.encode()))
}

fn code39(value: &str) -> Result<Linear, BarcodeError> {
    if value.is_empty() {
        return Ok(Linear::invalid("CODE39"));
    }
    let barcode = Code39::new(value).map_err(|e| rejected("CODE39", e))?;
    Ok(Linear::flat("CODE39", value, &barcode.encode()))
}

fn code93(value: &str) -> Result<Linear, BarcodeError> {
    if value.is_empty() {
        return Ok(Linear::invalid("CODE93"));
    }
    let barcode = Code93::new(value).map_err(|e| rejected("CODE93", e))?;
    Ok(Linear::flat("CODE93", value, &barcode.encode()))
}

fn code11(value: &str) -> Result<Linear, BarcodeError> {
    if value.is_empty() {
        return Ok(Linear::invalid("CODE11"));
    }
    let barcode = Code11::new(value).map_err(|e| rejected("CODE11", e))?;
    Ok(Linear::flat("CODE11", value, &barcode.encode()))
}

fn codabar(value: &str) -> Result<Linear, BarcodeError> {
    if value.len() < 3 {
        return Ok(Linear::invalid("CODABAR"));
    }
    let barcode = Codabar::new(value).map_err(|e| rejected("CODABAR", e))?;
    Ok(Linear::flat("CODABAR", value, &barcode.encode()))
}

/// Split an EAN/UPC symbol into guard, half, guard, half, guard segments.
///
/// Falls back to one flat segment if the module count is not the expected
/// `3 + half + 5 + half + 3`.
fn ean_segments(bits: String, half: usize, lead: &str, left: &str, right: &str) -> Encoded {
    if bits.len() != 2 * EDGE_GUARD + CENTER_GUARD + 2 * half {
        return Encoded::Single(EncodedSegment::new(format!("{}{}{}", lead, left, right), bits));
    }

    let (start, rest) = bits.split_at(EDGE_GUARD);
    let (left_bits, rest) = rest.split_at(half);
    let (center, rest) = rest.split_at(CENTER_GUARD);
    let (right_bits, end) = rest.split_at(half);

    Encoded::Multi(vec![
        EncodedSegment::new(lead, start),
        EncodedSegment::new(left, left_bits),
        EncodedSegment::bits(center),
        EncodedSegment::new(right, right_bits),
        EncodedSegment::bits(end),
    ])
}

fn ean_linear(
    format: &'static str,
    text: String,
    bits: String,
    segmented: Encoded,
    options: &EncodeOptions,
) -> Linear {
    let encoded = if options.flat {
        Encoded::Single(EncodedSegment::new(text, bits))
    } else {
        segmented
    };
    Linear {
        format,
        encoded: Some(encoded),
    }
}

fn ean13(value: &str, options: &EncodeOptions) -> Result<Linear, BarcodeError> {
    let Some(number) = gs1_number(value, 12) else {
        return Ok(Linear::invalid("EAN13"));
    };
    let text = digit_string(&number);
    let barcode = EAN13::new(&text[..12]).map_err(|e| rejected("EAN13", e))?;
    let bits = to_bits(&barcode.encode());

    let segmented = ean_segments(bits.clone(), 42, &text[..1], &text[1..7], &text[7..]);
    Ok(ean_linear("EAN13", text, bits, segmented, options))
}

fn upc(value: &str, options: &EncodeOptions) -> Result<Linear, BarcodeError> {
    let Some(number) = gs1_number(value, 11) else {
        return Ok(Linear::invalid("UPC"));
    };
    let text = digit_string(&number);
    // UPC-A is EAN-13 with a leading zero.
    let barcode = EAN13::new(&format!("0{}", &text[..11])).map_err(|e| rejected("UPC", e))?;
    let bits = to_bits(&barcode.encode());

    let segmented = ean_segments(bits.clone(), 42, "", &text[..6], &text[6..]);
    Ok(ean_linear("UPC", text, bits, segmented, options))
}

fn ean8(value: &str, options: &EncodeOptions) -> Result<Linear, BarcodeError> {
    let Some(number) = gs1_number(value, 7) else {
        return Ok(Linear::invalid("EAN8"));
    };
    let text = digit_string(&number);
    let barcode = EAN8::new(&text[..7]).map_err(|e| rejected("EAN8", e))?;
    let bits = to_bits(&barcode.encode());

    let segmented = ean_segments(bits.clone(), 28, "", &text[..4], &text[4..]);
    Ok(ean_linear("EAN8", text, bits, segmented, options))
}

fn ean_addon(format: &'static str, value: &str, len: usize) -> Result<Linear, BarcodeError> {
    if value.len() != len || digits(value).is_none() {
        return Ok(Linear::invalid(format));
    }
    let barcode = EANSUPP::new(value).map_err(|e| rejected(format, e))?;
    Ok(Linear::flat(format, value, &barcode.encode()))
}

fn itf(value: &str) -> Result<Linear, BarcodeError> {
    if value.is_empty() || value.len() % 2 != 0 || digits(value).is_none() {
        return Ok(Linear::invalid("ITF"));
    }
    let barcode = TF::interleaved(value).map_err(|e| rejected("ITF", e))?;
    Ok(Linear::flat("ITF", value, &barcode.encode()))
}

fn itf14(value: &str) -> Result<Linear, BarcodeError> {
    let Some(number) = gs1_number(value, 13) else {
        return Ok(Linear::invalid("ITF14"));
    };
    let text = digit_string(&number);
    let barcode = TF::interleaved(&text).map_err(|e| rejected("ITF14", e))?;
    Ok(Linear::flat("ITF14", &text, &barcode.encode()))
}
