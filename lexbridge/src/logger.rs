use std::fmt::Write;

use jiff::{Timestamp, Zoned, tz::TimeZone};
use log::{
    Record,
    kv::{self, VisitSource},
};
use logforth::{append::Stderr, layout::Layout};
use serde_json::{Map, Value};

use crate::args::{Args, LogStyle};

/// Plain or coloured single-line text. Every line is redacted before it is written.
#[derive(Debug, Clone)]
struct CustomTextLayout {
    no_color: bool,
}

impl CustomTextLayout {
    fn new() -> Self {
        Self { no_color: false }
    }

    fn no_color(mut self) -> Self {
        self.no_color = true;
        self
    }
}

impl Layout for CustomTextLayout {
    fn format(
        &self,
        record: &Record<'_>,
        _diagnostics: &[Box<dyn logforth::diagnostic::Diagnostic>],
    ) -> anyhow::Result<Vec<u8>> {
        let mut output = String::new();
        let now = Zoned::now().with_time_zone(TimeZone::UTC);

        write!(output, "{} ", now.strftime("%Y-%m-%dT%H:%M:%S%.6fZ"))?;

        let level_str = if self.no_color {
            format!("{:>5}", record.level())
        } else {
            match record.level() {
                log::Level::Error => format!("\x1b[31m{:>5}\x1b[0m", record.level()),
                log::Level::Warn => format!("\x1b[33m{:>5}\x1b[0m", record.level()),
                log::Level::Info => format!("\x1b[32m{:>5}\x1b[0m", record.level()),
                log::Level::Debug => format!("\x1b[34m{:>5}\x1b[0m", record.level()),
                log::Level::Trace => format!("\x1b[35m{:>5}\x1b[0m", record.level()),
            }
        };

        write!(output, "{level_str}  ")?;
        write!(output, "{}", text_line(record))?;

        Ok(output.into_bytes())
    }
}

/// One JSON object per line with the redacted message and key-value fields.
#[derive(Debug, Clone, Default)]
struct RedactedJsonLayout;

impl Layout for RedactedJsonLayout {
    fn format(
        &self,
        record: &Record<'_>,
        _diagnostics: &[Box<dyn logforth::diagnostic::Diagnostic>],
    ) -> anyhow::Result<Vec<u8>> {
        let mut object = Map::new();

        object.insert("timestamp".into(), Value::String(Timestamp::now().to_string()));
        object.insert("level".into(), Value::String(record.level().to_string()));
        object.insert("target".into(), Value::String(record.target().to_string()));
        object.insert("message".into(), Value::String(guard::redact(&record.args().to_string())));

        let fields = key_values(record)?
            .into_iter()
            .map(|(key, value)| (key, Value::String(guard::redact(&value))))
            .collect::<Map<_, _>>();

        if !fields.is_empty() {
            object.insert("fields".into(), Value::Object(fields));
        }

        Ok(serde_json::to_vec(&Value::Object(object))?)
    }
}

/// The message followed by its `key=value` pairs, redacted as a whole.
fn text_line(record: &Record<'_>) -> String {
    let mut line = record.args().to_string();

    // A failing source only loses the pairs, never the message.
    for (key, value) in key_values(record).unwrap_or_default() {
        let _ = write!(line, " {key}={value}");
    }

    guard::redact(&line)
}

fn key_values(record: &Record<'_>) -> Result<Vec<(String, String)>, kv::Error> {
    struct Collect(Vec<(String, String)>);

    impl<'kvs> VisitSource<'kvs> for Collect {
        fn visit_pair(&mut self, key: kv::Key<'kvs>, value: kv::Value<'kvs>) -> Result<(), kv::Error> {
            self.0.push((key.to_string(), value.to_string()));
            Ok(())
        }
    }

    let mut collect = Collect(Vec::new());
    record.key_values().visit(&mut collect)?;

    Ok(collect.0)
}

pub(super) fn init(args: &Args) {
    logforth::builder()
        .dispatch(|d| {
            let d = d.filter(args.log_level.env_filter());

            // stdout belongs to the stdio transport, so every style writes to stderr.
            match args.log_style {
                LogStyle::Color => d.append(Stderr::default().with_layout(CustomTextLayout::new())),
                LogStyle::Text => d.append(Stderr::default().with_layout(CustomTextLayout::new().no_color())),
                LogStyle::Json => d.append(Stderr::default().with_layout(RedactedJsonLayout)),
            }
        })
        .apply();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn format_text(args: std::fmt::Arguments<'_>) -> String {
        let kvs = [("kind", "upstream_timeout"), ("identity", "token:0123abcd")];
        let record = Record::builder()
            .args(args)
            .level(log::Level::Warn)
            .key_values(&kvs)
            .build();

        text_line(&record)
    }

    #[test]
    fn text_line_includes_fields() {
        insta::assert_snapshot!(
            format_text(format_args!("Upstream call failed")),
            @"Upstream call failed kind=upstream_timeout identity=token:0123abcd"
        );
    }

    #[test]
    fn text_line_is_redacted() {
        let line = format_text(format_args!("sent Token 0123456789abcdef0123456789abcdef01234567"));

        assert!(!line.contains("0123456789abcdef0123456789abcdef01234567"), "{line}");
        assert!(line.contains("[REDACTED]"), "{line}");
    }

    #[test]
    fn json_layout_redacts_message() {
        let record = Record::builder()
            .args(format_args!("password123 was sent"))
            .level(log::Level::Info)
            .target("upstream")
            .build();

        let bytes = RedactedJsonLayout.format(&record, &[]).unwrap();
        let value: Value = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(value["level"], "INFO");
        assert_eq!(value["target"], "upstream");
        assert_eq!(value["message"], "[REDACTED] was sent");
        assert!(value.get("fields").is_none());
    }
}
