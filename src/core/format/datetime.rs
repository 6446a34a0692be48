use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

pub const DEFAULT_DATE_PATTERN: &str = "MMM dd, yyyy";
pub const DATE_TIME_PATTERN: &str = "MMM dd, yyyy h:mm a";

pub fn format_date(input: &str) -> String {
    format_date_as(input, DEFAULT_DATE_PATTERN)
}

/// Formats an ISO-8601 date or timestamp with a `MMM dd, yyyy`-style pattern.
///
/// Anything that does not parse as a real calendar instant, or a pattern with
/// unsupported letters, yields the input unchanged.
pub fn format_date_as(input: &str, pattern: &str) -> String {
    let Some(timestamp) = parse_iso(input) else {
        return input.to_string();
    };
    let Some(strftime) = translate_pattern(pattern) else {
        return input.to_string();
    };
    timestamp.format(&strftime).to_string()
}

pub fn format_date_time(input: &str) -> String {
    format_date_as(input, DATE_TIME_PATTERN)
}

/// Turns `HH:mm` or `HH:mm:ss` into `h:mm AM/PM`.
pub fn format_time(input: &str) -> String {
    let parts: Vec<&str> = input.split(':').collect();
    if parts.len() < 2 {
        return input.to_string();
    }
    let Some(hours) = parse_leading_int(parts[0]) else {
        return input.to_string();
    };
    let minutes = parts[1];

    let period = if hours >= 12 { "PM" } else { "AM" };
    let display_hours = match hours {
        0 => 12,
        h if h > 12 => h - 12,
        h => h,
    };
    format!("{display_hours}:{minutes} {period}")
}

/// Parses the ISO-8601 shapes the API emits: extended or basic dates,
/// reduced precision (`yyyy`, `yyyy-MM`, `THH`) and a `T` or space separator.
/// Timestamps carrying an offset keep the wall-clock time of that offset.
fn parse_iso(input: &str) -> Option<NaiveDateTime> {
    let (date, time) = match input.split_once(['T', ' ']) {
        Some((date, time)) => (date, Some(time)),
        None => (input, None),
    };
    let date = parse_calendar_date(date)?;
    let time = match time {
        Some(time) => parse_clock(strip_offset(time)?)?,
        None => NaiveTime::MIN,
    };
    Some(date.and_time(time))
}

fn parse_calendar_date(text: &str) -> Option<NaiveDate> {
    if !text.is_ascii() {
        return None;
    }
    let bytes = text.as_bytes();
    let (year, month, day) = match bytes.len() {
        4 => (text, "01", "01"),
        7 if bytes[4] == b'-' => (&text[..4], &text[5..], "01"),
        8 => (&text[..4], &text[4..6], &text[6..]),
        10 if bytes[4] == b'-' && bytes[7] == b'-' => (&text[..4], &text[5..7], &text[8..]),
        _ => return None,
    };
    NaiveDate::from_ymd_opt(
        i32::from(digits::<u16>(year)?),
        digits(month)?,
        digits(day)?,
    )
}

/// Drops a `Z`, `±HH`, `±HHmm` or `±HH:mm` suffix once its shape checks out.
fn strip_offset(time: &str) -> Option<&str> {
    if let Some(clock) = time.strip_suffix(['Z', 'z']) {
        return Some(clock);
    }
    let Some(at) = time.rfind(['+', '-']) else {
        return Some(time);
    };
    let (clock, offset) = time.split_at(at);
    let offset = &offset[1..];
    let valid = match offset.len() {
        2 | 4 => all_digits(offset),
        5 => {
            offset.is_ascii()
                && all_digits(&offset[..2])
                && offset.as_bytes()[2] == b':'
                && all_digits(&offset[3..])
        }
        _ => false,
    };
    valid.then_some(clock)
}

fn parse_clock(text: &str) -> Option<NaiveTime> {
    let (clock, fraction) = match text.split_once(['.', ',']) {
        Some((clock, fraction)) => (clock, Some(fraction)),
        None => (text, None),
    };
    let fields: Vec<&str> = if clock.contains(':') {
        clock.split(':').collect()
    } else if clock.len() % 2 == 0 && clock.is_ascii() {
        (0..clock.len()).step_by(2).map(|at| &clock[at..at + 2]).collect()
    } else {
        return None;
    };
    if fields.is_empty() || fields.len() > 3 || fields.iter().any(|field| field.len() != 2) {
        return None;
    }
    let hour = digits(fields[0])?;
    let minute = fields.get(1).map_or(Some(0), |field| digits(field))?;
    let second = fields.get(2).map_or(Some(0), |field| digits(field))?;
    let nanos = match fraction {
        Some(fraction) if fields.len() == 3 => fraction_nanos(fraction)?,
        Some(_) => return None,
        None => 0,
    };
    NaiveTime::from_hms_nano_opt(hour, minute, second, nanos)
}

fn fraction_nanos(fraction: &str) -> Option<u32> {
    if !all_digits(fraction) {
        return None;
    }
    let padded: String = fraction.chars().chain(std::iter::repeat('0')).take(9).collect();
    digits(&padded)
}

fn digits<T: std::str::FromStr>(text: &str) -> Option<T> {
    if !all_digits(text) {
        return None;
    }
    text.parse().ok()
}

fn all_digits(text: &str) -> bool {
    !text.is_empty() && text.bytes().all(|byte| byte.is_ascii_digit())
}

/// Maps date-fns style pattern letters onto chrono's strftime syntax.
fn translate_pattern(pattern: &str) -> Option<String> {
    let chars: Vec<char> = pattern.chars().collect();
    let mut output = String::with_capacity(pattern.len() * 2);
    let mut index = 0;

    while index < chars.len() {
        let current = chars[index];

        if current == '\'' {
            if chars.get(index + 1) == Some(&'\'') {
                output.push('\'');
                index += 2;
                continue;
            }
            let mut cursor = index + 1;
            while cursor < chars.len() {
                if chars[cursor] == '\'' {
                    if chars.get(cursor + 1) != Some(&'\'') {
                        break;
                    }
                    output.push('\'');
                    cursor += 2;
                    continue;
                }
                push_literal(&mut output, chars[cursor]);
                cursor += 1;
            }
            index = cursor + 1;
            continue;
        }

        if !current.is_ascii_alphabetic() {
            push_literal(&mut output, current);
            index += 1;
            continue;
        }

        let mut run = 1;
        while chars.get(index + run) == Some(&current) {
            run += 1;
        }
        let spec = match (current, run) {
            ('y', 2) => "%y",
            ('y', _) => "%Y",
            ('M', 1) => "%-m",
            ('M', 2) => "%m",
            ('M', 3) => "%b",
            ('M', 4) => "%B",
            ('d', 1) => "%-d",
            ('d', 2) => "%d",
            ('E', 1..=3) => "%a",
            ('E', 4) => "%A",
            ('H', 1) => "%-H",
            ('H', 2) => "%H",
            ('h', 1) => "%-I",
            ('h', 2) => "%I",
            ('m', 1) => "%-M",
            ('m', 2) => "%M",
            ('s', 1) => "%-S",
            ('s', 2) => "%S",
            ('a', 1..=3) => "%p",
            _ => return None,
        };
        output.push_str(spec);
        index += run;
    }

    Some(output)
}

fn push_literal(output: &mut String, value: char) {
    if value == '%' {
        output.push_str("%%");
    } else {
        output.push(value);
    }
}

/// Leading-digit integer parse: `"09"` and `"9am"` both give 9.
fn parse_leading_int(raw: &str) -> Option<i64> {
    let trimmed = raw.trim_start();
    let (sign, digits) = match trimmed.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }
    digits[..end].parse::<i64>().ok().map(|value| sign * value)
}
