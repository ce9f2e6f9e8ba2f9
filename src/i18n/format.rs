//! Positional `printf`-style formatting for translated templates.
//!
//! Translation resources embed placeholders such as `%s`, `%1$s` or `%d`.
//! A literal percent sign is written `%%`. Arguments are consumed left to
//! right unless a placeholder names one explicitly with `n$`.

use crate::error::FormatError;
use std::iter::Peekable;
use std::str::Chars;

/// A single positional argument.
#[derive(Debug, Clone, PartialEq)]
pub enum FormatArg {
    Str(String),
    Int(i64),
    Float(f64),
}

impl FormatArg {
    fn to_text(&self) -> String {
        match self {
            FormatArg::Str(s) => s.clone(),
            FormatArg::Int(i) => i.to_string(),
            FormatArg::Float(f) => f.to_string(),
        }
    }

    fn to_int(&self) -> i64 {
        match self {
            FormatArg::Str(s) => leading_number(s, false).parse().unwrap_or(0),
            FormatArg::Int(i) => *i,
            FormatArg::Float(f) => *f as i64,
        }
    }

    fn to_float(&self) -> f64 {
        match self {
            FormatArg::Str(s) => leading_number(s, true).parse().unwrap_or(0.0),
            FormatArg::Int(i) => *i as f64,
            FormatArg::Float(f) => *f,
        }
    }
}

impl From<&str> for FormatArg {
    fn from(value: &str) -> Self {
        FormatArg::Str(value.to_string())
    }
}

impl From<String> for FormatArg {
    fn from(value: String) -> Self {
        FormatArg::Str(value)
    }
}

impl From<&String> for FormatArg {
    fn from(value: &String) -> Self {
        FormatArg::Str(value.clone())
    }
}

impl From<i32> for FormatArg {
    fn from(value: i32) -> Self {
        FormatArg::Int(value.into())
    }
}

impl From<i64> for FormatArg {
    fn from(value: i64) -> Self {
        FormatArg::Int(value)
    }
}

impl From<u32> for FormatArg {
    fn from(value: u32) -> Self {
        FormatArg::Int(value.into())
    }
}

impl From<usize> for FormatArg {
    fn from(value: usize) -> Self {
        FormatArg::Int(i64::try_from(value).unwrap_or(i64::MAX))
    }
}

impl From<f64> for FormatArg {
    fn from(value: f64) -> Self {
        FormatArg::Float(value)
    }
}

/// Collapse `%%` into `%` for templates rendered without arguments.
pub fn unescape_percent(text: &str) -> String {
    text.replace("%%", "%")
}

/// Apply `args` to a positional template.
///
/// Surplus arguments are ignored. A placeholder that needs an argument which
/// was not supplied fails with [`FormatError::MissingArgument`].
pub fn format_positional(template: &str, args: &[FormatArg]) -> Result<String, FormatError> {
    let mut out = String::with_capacity(template.len() + 16);
    let mut chars = template.chars().peekable();
    let mut next_arg = 0usize;

    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }
        if chars.peek() == Some(&'%') {
            chars.next();
            out.push('%');
            continue;
        }

        let placeholder = Placeholder::parse(&mut chars)?;
        let index = match placeholder.position {
            Some(0) => {
                return Err(FormatError::MissingArgument {
                    index: 0,
                    supplied: args.len(),
                })
            }
            Some(position) => position - 1,
            None => {
                next_arg += 1;
                next_arg - 1
            }
        };
        let arg = args.get(index).ok_or(FormatError::MissingArgument {
            index: index + 1,
            supplied: args.len(),
        })?;
        out.push_str(&placeholder.render(arg));
    }

    Ok(out)
}

/// One parsed `%[n$][flags][width][.precision]conversion` placeholder.
#[derive(Debug)]
struct Placeholder {
    position: Option<usize>,
    left_align: bool,
    plus_sign: bool,
    pad: char,
    width: Option<usize>,
    precision: Option<usize>,
    conversion: char,
}

impl Placeholder {
    fn parse(chars: &mut Peekable<Chars<'_>>) -> Result<Self, FormatError> {
        let mut placeholder = Placeholder {
            position: None,
            left_align: false,
            plus_sign: false,
            pad: ' ',
            width: None,
            precision: None,
            conversion: 's',
        };

        // `12$` is an argument position, `12s` is a width
        let mut lookahead = chars.clone();
        let digits = take_digits(&mut lookahead);
        if digits.is_some() && lookahead.peek() == Some(&'$') {
            lookahead.next();
            placeholder.position = digits;
            *chars = lookahead;
        }

        loop {
            match chars.peek() {
                Some('-') => placeholder.left_align = true,
                Some('+') => placeholder.plus_sign = true,
                Some(' ') => placeholder.pad = ' ',
                Some('0') => placeholder.pad = '0',
                Some('\'') => {
                    chars.next();
                    placeholder.pad = chars.next().ok_or(FormatError::Truncated)?;
                    continue;
                }
                _ => break,
            }
            chars.next();
        }

        placeholder.width = take_digits(chars);

        if chars.peek() == Some(&'.') {
            chars.next();
            placeholder.precision = Some(take_digits(chars).unwrap_or(0));
        }

        placeholder.conversion = chars.next().ok_or(FormatError::Truncated)?;
        if !"sdufFeEgGxXobc".contains(placeholder.conversion) {
            return Err(FormatError::UnknownConversion(placeholder.conversion));
        }

        Ok(placeholder)
    }

    fn render(&self, arg: &FormatArg) -> String {
        let body = match self.conversion {
            's' => {
                let text = arg.to_text();
                match self.precision {
                    Some(max) => text.chars().take(max).collect(),
                    None => text,
                }
            }
            'd' => self.signed(arg.to_int().to_string(), arg.to_int() >= 0),
            'u' => (arg.to_int() as u64).to_string(),
            'f' | 'F' => {
                let value = arg.to_float();
                let precision = self.precision.unwrap_or(6);
                self.signed(format!("{value:.precision$}"), value >= 0.0)
            }
            'e' | 'E' => {
                let value = arg.to_float();
                let text = scientific(value, self.precision.unwrap_or(6));
                let text = if self.conversion == 'E' {
                    text.to_uppercase()
                } else {
                    text
                };
                self.signed(text, value >= 0.0)
            }
            'g' | 'G' => {
                let value = arg.to_float();
                let text = general(value, self.precision.unwrap_or(6));
                let text = if self.conversion == 'G' {
                    text.to_uppercase()
                } else {
                    text
                };
                self.signed(text, value >= 0.0)
            }
            'x' => format!("{:x}", arg.to_int() as u64),
            'X' => format!("{:X}", arg.to_int() as u64),
            'o' => format!("{:o}", arg.to_int() as u64),
            'b' => format!("{:b}", arg.to_int() as u64),
            'c' => {
                // no padding for characters
                return u32::try_from(arg.to_int())
                    .ok()
                    .and_then(char::from_u32)
                    .map(String::from)
                    .unwrap_or_default();
            }
            _ => String::new(),
        };

        self.pad(body)
    }

    fn signed(&self, text: String, non_negative: bool) -> String {
        if self.plus_sign && non_negative {
            format!("+{text}")
        } else {
            text
        }
    }

    fn pad(&self, body: String) -> String {
        let len = body.chars().count();
        let width = match self.width {
            Some(width) if width > len => width,
            _ => return body,
        };
        let fill: String = std::iter::repeat(self.pad).take(width - len).collect();

        if self.left_align {
            return body + &fill;
        }

        let numeric = "dfFeEgG".contains(self.conversion);
        if self.pad == '0' && numeric && (body.starts_with('-') || body.starts_with('+')) {
            let (sign, rest) = body.split_at(1);
            return format!("{sign}{fill}{rest}");
        }

        fill + &body
    }
}

fn take_digits(chars: &mut Peekable<Chars<'_>>) -> Option<usize> {
    let mut digits = String::new();
    while let Some(c) = chars.peek().copied().filter(char::is_ascii_digit) {
        digits.push(c);
        chars.next();
    }
    digits.parse().ok()
}

/// `1.5e3` style with an explicit exponent sign: `1.500000e+3`.
fn scientific(value: f64, precision: usize) -> String {
    let raw = format!("{value:.precision$e}");
    match raw.split_once('e') {
        Some((mantissa, exponent)) if !exponent.starts_with('-') => {
            format!("{mantissa}e+{exponent}")
        }
        _ => raw,
    }
}

/// `%g`: `precision` significant digits, in fixed or scientific notation
/// depending on the exponent, without trailing zeros.
fn general(value: f64, precision: usize) -> String {
    let significant = precision.max(1);
    if value == 0.0 || !value.is_finite() {
        return format!("{value}");
    }

    // The exponent after rounding to the requested significant digits
    let rounded = format!("{value:.prec$e}", prec = significant - 1);
    let exponent: i64 = rounded
        .split_once('e')
        .and_then(|(_, exponent)| exponent.parse().ok())
        .unwrap_or(0);

    let significant = i64::try_from(significant).unwrap_or(i64::MAX);
    if exponent < -4 || exponent >= significant {
        let text = scientific(value, usize::try_from(significant - 1).unwrap_or(0));
        match text.split_once('e') {
            Some((mantissa, exponent_text)) => {
                format!("{}e{}", trim_fraction(mantissa), exponent_text)
            }
            None => text,
        }
    } else {
        let decimals = usize::try_from(significant - 1 - exponent).unwrap_or(0);
        trim_fraction(&format!("{value:.decimals$}")).to_string()
    }
}

/// Drop trailing zeros (and a trailing dot) from a decimal fraction.
fn trim_fraction(text: &str) -> &str {
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.')
    } else {
        text
    }
}

/// The numeric prefix of a string argument ("12abc" -> "12").
fn leading_number(text: &str, allow_fraction: bool) -> &str {
    let trimmed = text.trim_start();
    let mut end = 0;
    let mut seen_dot = false;
    for (i, c) in trimmed.char_indices() {
        let accept = match c {
            '+' | '-' => i == 0,
            '0'..='9' => true,
            '.' if allow_fraction && !seen_dot => {
                seen_dot = true;
                true
            }
            _ => false,
        };
        if !accept {
            break;
        }
        end = i + c.len_utf8();
    }
    &trimmed[..end]
}
