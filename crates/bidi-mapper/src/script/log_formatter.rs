//! Console log message formatter (spec §4.5 "Log message formatter" — the
//! specifier table is normative and testable as-is, per S4).

use bidi_types::script::{JsonNumber, RemoteValue};

use crate::error::MapperError;

/// Formats a console message's args: format specifiers in the first
/// string argument consume successive values; unconsumed values are
/// appended space-separated.
///
/// # Errors
///
/// Returns `ErrorCode::InvalidArgument` if there are fewer values than
/// specifiers (`less value is provided`) or more trailing text/args than
/// consumed (`more value is provided`).
pub fn format(args: &[RemoteValue]) -> Result<String, MapperError> {
    let Some((first, rest)) = args.split_first() else {
        return Ok(String::new());
    };
    let RemoteValue::String { value: template } = first else {
        // A non-string first argument is not a format template: render
        // every argument space-separated, with no specifiers to consume.
        let parts: Vec<String> = args.iter().map(format_o).collect();
        return Ok(parts.join(" "));
    };

    let (mut out, remaining) = if contains_specifier(template) {
        apply_specifiers(template, rest)?
    } else {
        (template.clone(), rest.iter().collect::<Vec<_>>())
    };

    if remaining.is_empty() {
        return Ok(out);
    }
    let rendered: Vec<String> = remaining.iter().map(|v| format_o(v)).collect();
    out.push(' ');
    out.push_str(&rendered.join(" "));
    Err(MapperError::invalid_argument(format!(
        "more value is provided: \"{out}\""
    )))
}

/// Consumes one value per specifier in `template`, returning the formatted
/// string and the values left unconsumed.
fn apply_specifiers<'a>(
    template: &str,
    rest: &'a [RemoteValue],
) -> Result<(String, Vec<&'a RemoteValue>), MapperError> {
    let mut out = String::new();
    let mut chars = template.chars().peekable();
    let mut values = rest.iter();

    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }
        match chars.peek().copied() {
            Some(spec @ ('d' | 'i' | 'f' | 's' | 'o' | 'O' | 'c')) => {
                chars.next();
                let Some(value) = values.next() else {
                    return Err(MapperError::invalid_argument("less value is provided"));
                };
                out.push_str(&match spec {
                    'd' | 'i' => format_int(value),
                    'f' => format_float(value),
                    's' => format_s(value),
                    'o' | 'O' | 'c' => format_o(value),
                    _ => unreachable!(),
                });
            }
            Some('%') => {
                chars.next();
                out.push('%');
            }
            _ => out.push('%'),
        }
    }

    Ok((out, values.collect()))
}

fn contains_specifier(template: &str) -> bool {
    let mut chars = template.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '%' {
            if let Some(next) = chars.peek() {
                if matches!(next, 'd' | 'i' | 'f' | 's' | 'o' | 'O' | 'c') {
                    return true;
                }
            }
        }
    }
    false
}

fn format_int(value: &RemoteValue) -> String {
    match value {
        RemoteValue::Number {
            value: JsonNumber::Finite(n),
        } => {
            if !n.is_finite() {
                "NaN".to_string()
            } else if *n == 0.0 {
                "0".to_string()
            } else {
                (n.trunc() as i64).to_string()
            }
        }
        RemoteValue::Number {
            value: JsonNumber::Special(_),
        }
        | RemoteValue::Boolean { .. }
        | RemoteValue::Null
        | RemoteValue::Undefined
        | RemoteValue::Object { .. }
        | RemoteValue::Array { .. } => "NaN".to_string(),
        _ => "NaN".to_string(),
    }
}

fn format_float(value: &RemoteValue) -> String {
    if let RemoteValue::Number {
        value: JsonNumber::Special(s),
    } = value
    {
        if s == "Infinity" || s == "-Infinity" {
            return s.clone();
        }
    }
    format_int(value)
}

fn format_s(value: &RemoteValue) -> String {
    match value {
        RemoteValue::String { value } => value.clone(),
        RemoteValue::Number {
            value: JsonNumber::Finite(n),
        } => {
            if *n == n.trunc() {
                format!("{}", *n as i64)
            } else {
                n.to_string()
            }
        }
        RemoteValue::Number {
            value: JsonNumber::Special(s),
        } => s.clone(),
        RemoteValue::Boolean { value } => value.to_string(),
        RemoteValue::Null => "null".to_string(),
        RemoteValue::Undefined => "undefined".to_string(),
        RemoteValue::Array { value, .. } => format!("Array({})", value.as_ref().map_or(0, Vec::len)),
        RemoteValue::Map { value } => format!("Map({})", value.len()),
        RemoteValue::Set { value } => format!("Set({})", value.len()),
        RemoteValue::Object { value, .. } => format!("Object({})", value.as_ref().map_or(0, Vec::len)),
        RemoteValue::Date { value } => value.clone(),
        other => format_o(other),
    }
}

fn format_o(value: &RemoteValue) -> String {
    match value {
        RemoteValue::String { value } => format!("\"{value}\""),
        RemoteValue::Number {
            value: JsonNumber::Finite(n),
        } => {
            if *n == n.trunc() {
                format!("{}", *n as i64)
            } else {
                n.to_string()
            }
        }
        RemoteValue::Number {
            value: JsonNumber::Special(s),
        } => s.clone(),
        RemoteValue::Boolean { value } => value.to_string(),
        RemoteValue::Null => "null".to_string(),
        RemoteValue::Undefined => "undefined".to_string(),
        RemoteValue::BigInt { value } => format!("{value}n"),
        RemoteValue::RegExp { value } => {
            format!("/{}/{}", value.pattern, value.flags.clone().unwrap_or_default())
        }
        RemoteValue::Array { value, .. } => {
            let items: Vec<String> = value
                .as_ref()
                .map(|v| v.iter().map(format_o).collect())
                .unwrap_or_default();
            format!("[{}]", items.join(", "))
        }
        RemoteValue::Object { value, .. } => {
            let items: Vec<String> = value
                .as_ref()
                .map(|pairs| {
                    pairs
                        .iter()
                        .map(|(k, v)| format!("{}: {}", format_s(k), format_o(v)))
                        .collect()
                })
                .unwrap_or_default();
            format!("{{{}}}", items.join(", "))
        }
        RemoteValue::Map { value } => format!("Map({})", value.len()),
        RemoteValue::Set { value } => format!("Set({})", value.len()),
        RemoteValue::Date { value } => value.clone(),
        RemoteValue::Node { .. } | RemoteValue::Error { .. } => "[object]".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn num(n: f64) -> RemoteValue {
        RemoteValue::Number {
            value: JsonNumber::Finite(n),
        }
    }
    fn string(s: &str) -> RemoteValue {
        RemoteValue::String { value: s.into() }
    }

    #[test]
    fn formats_d_and_s_specifiers() {
        let args = vec![string("%d %s"), num(42.0), string("x")];
        assert_eq!(format(&args).unwrap(), "42 x");
    }

    #[test]
    fn too_few_values_fails_with_less_value_is_provided() {
        let args = vec![string("%i %i"), num(1.0)];
        let err = format(&args).unwrap_err();
        assert_eq!(err.message, "less value is provided");
    }

    #[test]
    fn trailing_values_append_and_fail_with_more_value_is_provided() {
        let args = vec![string("trailing"), num(1.0), num(2.0)];
        let err = format(&args).unwrap_err();
        assert_eq!(err.message, "more value is provided: \"trailing 1 2\"");
    }

    #[test]
    fn negative_zero_formats_as_zero() {
        assert_eq!(format_int(&num(-0.0)), "0");
    }

    #[test]
    fn nan_and_objects_format_as_nan_for_d() {
        assert_eq!(format_int(&num(f64::NAN)), "NaN");
        assert_eq!(format_int(&RemoteValue::Null), "NaN");
    }
}
