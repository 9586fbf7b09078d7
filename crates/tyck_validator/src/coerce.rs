//! Primitive coercion.
//!
//! Strict mode accepts a value only when it already has the target kind, or
//! is the canonical text form of a kind that has no native JSON shape
//! (datetime, date, time, uuid, decimal, bytes). Lax mode additionally
//! converts between compatible representations:
//!
//! | Target    | Lax sources                                                |
//! |-----------|------------------------------------------------------------|
//! | integer   | integral floats, numeric strings, booleans, integral decimals |
//! | number    | numeric strings, booleans, decimals                        |
//! | boolean   | 0/1, "true"/"false"/"yes"/"no"/"on"/"off"/"1"/"0"           |
//! | string    | UTF-8 bytes                                                |
//! | datetime  | unix timestamps, naive ISO strings (UTC), dates            |
//! | date      | datetimes at exact midnight                                |
//! | decimal   | finite floats                                              |
//!
//! Integers widen to numbers in both modes.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Timelike, Utc};
use tyck_core::{PrimitiveKind, Value};
use uuid::Uuid;

/// Coerces `raw` to the primitive `kind`.
///
/// Returns the coerced value, or a message describing the type mismatch.
pub(crate) fn coerce(kind: PrimitiveKind, raw: &Value, strict: bool) -> Result<Value, String> {
    let coerced = match kind {
        PrimitiveKind::Any => Some(raw.clone()),
        PrimitiveKind::Null => raw.is_null().then_some(Value::Null),
        PrimitiveKind::String => to_string(raw, strict),
        PrimitiveKind::Integer => return to_integer(raw, strict),
        PrimitiveKind::Number => return to_number(raw, strict),
        PrimitiveKind::Boolean => to_boolean(raw, strict),
        PrimitiveKind::DateTime => return to_datetime(raw, strict),
        PrimitiveKind::Date => return to_date(raw, strict),
        PrimitiveKind::Time => return to_time(raw),
        PrimitiveKind::Uuid => return to_uuid(raw),
        PrimitiveKind::Bytes => to_bytes(raw),
        PrimitiveKind::Decimal => return to_decimal(raw, strict),
    };
    coerced.ok_or_else(|| mismatch(kind, raw))
}

fn mismatch(kind: PrimitiveKind, raw: &Value) -> String {
    format!("expected {}, got {}", kind.name(), raw.type_name())
}

fn unparsable(kind: PrimitiveKind, text: &str) -> String {
    format!("expected {}, unable to parse '{}'", kind.name(), text)
}

fn to_string(raw: &Value, strict: bool) -> Option<Value> {
    match raw {
        Value::String(_) => Some(raw.clone()),
        Value::Bytes(bytes) if !strict => String::from_utf8(bytes.clone()).ok().map(Value::String),
        _ => None,
    }
}

fn to_integer(raw: &Value, strict: bool) -> Result<Value, String> {
    let kind = PrimitiveKind::Integer;
    match raw {
        Value::Int(_) => Ok(raw.clone()),
        _ if strict => Err(mismatch(kind, raw)),
        Value::Float(f) => integral(*f).ok_or_else(|| {
            format!("expected integer, got number with fractional part ({f})")
        }),
        Value::Bool(b) => Ok(Value::Int(i64::from(*b))),
        Value::String(s) => {
            let text = s.trim();
            if let Ok(i) = text.parse::<i64>() {
                return Ok(Value::Int(i));
            }
            text.parse::<f64>()
                .ok()
                .and_then(integral)
                .ok_or_else(|| unparsable(kind, s))
        }
        Value::Decimal(d) => d
            .parse::<f64>()
            .ok()
            .and_then(integral)
            .ok_or_else(|| format!("expected integer, got decimal with fractional part ({d})")),
        _ => Err(mismatch(kind, raw)),
    }
}

fn integral(f: f64) -> Option<Value> {
    // i64::MAX is not representable as f64; the bound below is exact.
    if f.is_finite() && f.fract() == 0.0 && f >= i64::MIN as f64 && f < 9.223_372_036_854_775_808e18 {
        Some(Value::Int(f as i64))
    } else {
        None
    }
}

fn to_number(raw: &Value, strict: bool) -> Result<Value, String> {
    let kind = PrimitiveKind::Number;
    match raw {
        Value::Float(_) => Ok(raw.clone()),
        Value::Int(i) => Ok(Value::Float(*i as f64)),
        _ if strict => Err(mismatch(kind, raw)),
        Value::Bool(b) => Ok(Value::Float(if *b { 1.0 } else { 0.0 })),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .map(Value::Float)
            .map_err(|_| unparsable(kind, s)),
        Value::Decimal(d) => d
            .parse::<f64>()
            .map(Value::Float)
            .map_err(|_| unparsable(kind, d)),
        _ => Err(mismatch(kind, raw)),
    }
}

fn to_boolean(raw: &Value, strict: bool) -> Option<Value> {
    match raw {
        Value::Bool(_) => Some(raw.clone()),
        _ if strict => None,
        Value::Int(0) => Some(Value::Bool(false)),
        Value::Int(1) => Some(Value::Bool(true)),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" | "y" | "on" | "t" => Some(Value::Bool(true)),
            "false" | "0" | "no" | "n" | "off" | "f" => Some(Value::Bool(false)),
            _ => None,
        },
        _ => None,
    }
}

fn to_datetime(raw: &Value, strict: bool) -> Result<Value, String> {
    let kind = PrimitiveKind::DateTime;
    match raw {
        Value::DateTime(_) => Ok(raw.clone()),
        Value::String(s) => {
            let text = s.trim();
            if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
                return Ok(Value::DateTime(dt));
            }
            if strict {
                return Err(unparsable(kind, s));
            }
            parse_naive_datetime(text)
                .map(|naive| Value::DateTime(naive.and_utc().fixed_offset()))
                .ok_or_else(|| unparsable(kind, s))
        }
        _ if strict => Err(mismatch(kind, raw)),
        Value::Int(secs) => DateTime::<Utc>::from_timestamp(*secs, 0)
            .map(|dt| Value::DateTime(dt.fixed_offset()))
            .ok_or_else(|| format!("timestamp {secs} is out of range")),
        Value::Float(secs) if secs.is_finite() => {
            let whole = secs.floor();
            let nanos = ((secs - whole) * 1e9).round() as u32;
            DateTime::<Utc>::from_timestamp(whole as i64, nanos.min(999_999_999))
                .map(|dt| Value::DateTime(dt.fixed_offset()))
                .ok_or_else(|| format!("timestamp {secs} is out of range"))
        }
        Value::Date(d) => Ok(Value::DateTime(
            d.and_time(NaiveTime::MIN).and_utc().fixed_offset(),
        )),
        _ => Err(mismatch(kind, raw)),
    }
}

fn parse_naive_datetime(text: &str) -> Option<NaiveDateTime> {
    const FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];
    FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(text, "%Y-%m-%d")
                .ok()
                .map(|d| d.and_time(NaiveTime::MIN))
        })
}

fn to_date(raw: &Value, strict: bool) -> Result<Value, String> {
    let kind = PrimitiveKind::Date;
    match raw {
        Value::Date(_) => Ok(raw.clone()),
        Value::String(s) => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .map(Value::Date)
            .map_err(|_| unparsable(kind, s)),
        Value::DateTime(dt) if !strict => {
            if dt.time().num_seconds_from_midnight() == 0 && dt.time().nanosecond() == 0 {
                Ok(Value::Date(dt.date_naive()))
            } else {
                Err("expected date, got datetime with non-zero time".to_string())
            }
        }
        _ => Err(mismatch(kind, raw)),
    }
}

fn to_time(raw: &Value) -> Result<Value, String> {
    let kind = PrimitiveKind::Time;
    match raw {
        Value::Time(_) => Ok(raw.clone()),
        Value::String(s) => {
            let text = s.trim();
            NaiveTime::parse_from_str(text, "%H:%M:%S%.f")
                .or_else(|_| NaiveTime::parse_from_str(text, "%H:%M"))
                .map(Value::Time)
                .map_err(|_| unparsable(kind, s))
        }
        _ => Err(mismatch(kind, raw)),
    }
}

fn to_uuid(raw: &Value) -> Result<Value, String> {
    match raw {
        Value::Uuid(_) => Ok(raw.clone()),
        Value::String(s) => Uuid::parse_str(s.trim())
            .map(Value::Uuid)
            .map_err(|_| unparsable(PrimitiveKind::Uuid, s)),
        _ => Err(mismatch(PrimitiveKind::Uuid, raw)),
    }
}

fn to_bytes(raw: &Value) -> Option<Value> {
    match raw {
        Value::Bytes(_) => Some(raw.clone()),
        Value::String(s) => Some(Value::Bytes(s.as_bytes().to_vec())),
        _ => None,
    }
}

fn to_decimal(raw: &Value, strict: bool) -> Result<Value, String> {
    let kind = PrimitiveKind::Decimal;
    match raw {
        Value::Decimal(_) => Ok(raw.clone()),
        Value::Int(i) => Ok(Value::Decimal(i.to_string())),
        Value::String(s) => canonical_decimal(s.trim())
            .map(Value::Decimal)
            .ok_or_else(|| unparsable(kind, s)),
        Value::Float(f) if !strict => {
            if f.is_finite() {
                canonical_decimal(&f.to_string())
                    .map(Value::Decimal)
                    .ok_or_else(|| unparsable(kind, &f.to_string()))
            } else {
                Err(format!("expected finite decimal, got {f}"))
            }
        }
        _ => Err(mismatch(kind, raw)),
    }
}

/// Normalizes decimal text: optional sign, digits, optional fraction.
///
/// Leading integer zeros are dropped and `-0` becomes `0`; fraction digits
/// are kept as written so that scale survives.
pub(crate) fn canonical_decimal(text: &str) -> Option<String> {
    let (negative, unsigned) = match text.as_bytes().first()? {
        b'-' => (true, &text[1..]),
        b'+' => (false, &text[1..]),
        _ => (false, text),
    };
    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((i, f)) => (i, f),
        None => (unsigned, ""),
    };
    if int_part.is_empty() && frac_part.is_empty() {
        return None;
    }
    if !int_part.bytes().all(|b| b.is_ascii_digit()) || !frac_part.bytes().all(|b| b.is_ascii_digit())
    {
        return None;
    }

    let int_digits = int_part.trim_start_matches('0');
    let int_digits = if int_digits.is_empty() { "0" } else { int_digits };
    let is_zero = int_digits == "0" && frac_part.bytes().all(|b| b == b'0');

    let mut out = String::with_capacity(text.len() + 1);
    if negative && !is_zero {
        out.push('-');
    }
    out.push_str(int_digits);
    if !frac_part.is_empty() {
        out.push('.');
        out.push_str(frac_part);
    }
    Some(out)
}

/// Significant digits and decimal places of canonical decimal text, after
/// dropping trailing fractional zeros.
pub(crate) fn decimal_shape(text: &str) -> (u32, u32) {
    let unsigned = text.trim_start_matches('-');
    let (int_part, frac_part) = unsigned.split_once('.').unwrap_or((unsigned, ""));
    let frac = frac_part.trim_end_matches('0');
    let int = int_part.trim_start_matches('0');
    let places = frac.len() as u32;
    let digits = (int.len() as u32 + places).max(places);
    (digits, places)
}
