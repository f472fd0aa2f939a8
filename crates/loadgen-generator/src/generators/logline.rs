//! Synthetic log line rendering.
//!
//! Each [`LogFormat`] has a fixed template whose fields are filled from the
//! [`faker`](super::faker) generators. Lines are rendered at a caller-supplied
//! instant so that timestamps inside the line match the entry timestamp.

use super::faker;
use chrono::{DateTime, Utc};
use loadgen_core::LogFormat;
use rand::Rng;
use std::fmt::Write;

/// `10/Oct/2000:13:55:36 +0000`
pub const APACHE_TIME_FORMAT: &str = "%d/%b/%Y:%H:%M:%S %z";
/// `Tue Oct 10 13:55:36.000001 2000`
pub const APACHE_ERROR_TIME_FORMAT: &str = "%a %b %d %H:%M:%S%.6f %Y";
/// `Oct 10 13:55:36`
pub const RFC3164_TIME_FORMAT: &str = "%b %d %H:%M:%S";
/// `2000-10-10T13:55:36.000Z`
pub const RFC5424_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

/// Render a line for a format identifier.
///
/// Unknown identifiers render as an empty string; callers that must not
/// accept them validate through [`KnownFormats`](loadgen_core::KnownFormats)
/// first.
pub fn render<R: Rng>(rng: &mut R, format: &str, t: DateTime<Utc>) -> String {
    match format.parse::<LogFormat>() {
        Ok(format) => render_format(rng, format, t),
        Err(_) => String::new(),
    }
}

/// Render a line in the given format.
pub fn render_format<R: Rng>(rng: &mut R, format: LogFormat, t: DateTime<Utc>) -> String {
    render_with_extra::<R, &str, &str>(rng, format, t, &[])
}

/// Render a line with additional key/value metadata.
///
/// For `json` the pairs become extra object members; every other format gets
/// trailing quoted `"key=value"` tokens.
pub fn render_with_extra<R, K, V>(
    rng: &mut R,
    format: LogFormat,
    t: DateTime<Utc>,
    extra: &[(K, V)],
) -> String
where
    R: Rng,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut line = match format {
        LogFormat::ApacheCommon | LogFormat::CommonLog => access_line(rng, t, 0..=30_000),
        LogFormat::ApacheCombined => {
            let mut line = access_line(rng, t, 30..=100_000);
            let referer = faker::url(rng);
            let agent = faker::user_agent(rng);
            let _ = write!(line, " \"{referer}\" \"{agent}\"");
            line
        }
        LogFormat::ApacheError => format!(
            "[{}] [{}:{}] [pid {}:tid {}] [client {}:{}] {}",
            t.format(APACHE_ERROR_TIME_FORMAT),
            faker::word(rng),
            faker::apache_log_level(rng),
            rng.gen_range(1..=10_000),
            rng.gen_range(1..=10_000),
            faker::ipv4(rng),
            rng.gen_range(1..=65_535),
            faker::hacker_phrase(rng),
        ),
        LogFormat::Rfc3164 => format!(
            "<{}>{} {} {}[{}]: {}",
            rng.gen_range(0..=191),
            t.format(RFC3164_TIME_FORMAT),
            faker::username(rng).to_lowercase(),
            faker::word(rng),
            rng.gen_range(1..=10_000),
            faker::hacker_phrase(rng),
        ),
        LogFormat::Rfc5424 => format!(
            "<{}>{} {} {} {} {} ID{} - {}",
            rng.gen_range(0..=191),
            rng.gen_range(1..=3),
            t.format(RFC5424_TIME_FORMAT),
            faker::domain_name(rng),
            faker::word(rng),
            rng.gen_range(1..=10_000),
            rng.gen_range(1..=1_000),
            faker::hacker_phrase(rng),
        ),
        LogFormat::Json => {
            let host = faker::ipv4(rng);
            let user = auth_user_id(rng);
            let method = faker::http_method(rng);
            let request = resource_uri(rng);
            let protocol = http_version(rng);
            let status = faker::http_status_simple(rng);
            let bytes = rng.gen_range(0..=30_000);
            let referer = faker::url(rng);
            format!(
                "{{\"host\":\"{host}\", \"user-identifier\":\"{user}\", \"datetime\":\"{}\", \
                 \"method\": \"{method}\", \"request\": \"{request}\", \"protocol\":\"{protocol}\", \
                 \"status\":{status}, \"bytes\":{bytes}, \"referer\": \"{referer}\"}}",
                t.format(APACHE_TIME_FORMAT),
            )
        }
        LogFormat::Logfmt => {
            let host = faker::ipv4(rng);
            let user = auth_user_id(rng);
            let method = faker::http_method(rng);
            let request = resource_uri(rng);
            let protocol = http_version(rng);
            let status = faker::http_status_simple(rng);
            let bytes = rng.gen_range(0..=30_000);
            let referer = faker::url(rng);
            format!(
                "host=\"{host}\" user={user} timestamp={} method={method} request=\"{request}\" \
                 protocol={protocol} status={status} bytes={bytes} referer=\"{referer}\"",
                t.format(RFC5424_TIME_FORMAT),
            )
        }
    };

    if !extra.is_empty() {
        append_extra(&mut line, format, extra);
    }
    line
}

/// Request line shared by the apache common, common log and combined formats.
fn access_line<R: Rng>(
    rng: &mut R,
    t: DateTime<Utc>,
    bytes: std::ops::RangeInclusive<u32>,
) -> String {
    let host = faker::ipv4(rng);
    let user = auth_user_id(rng);
    let method = faker::http_method(rng);
    let request = resource_uri(rng);
    let protocol = http_version(rng);
    let status = faker::http_status_simple(rng);
    let bytes = rng.gen_range(bytes);
    format!(
        "{host} - {user} [{}] \"{method} {request} {protocol}\" {status} {bytes}",
        t.format(APACHE_TIME_FORMAT),
    )
}

fn append_extra<K: AsRef<str>, V: AsRef<str>>(line: &mut String, format: LogFormat, extra: &[(K, V)]) {
    let mut rendered = String::new();
    for (key, value) in extra {
        let (key, value) = (key.as_ref(), value.as_ref());
        if format == LogFormat::Json {
            let _ = write!(rendered, ", {}: {}", quote(key), quote(value));
        } else {
            let _ = write!(rendered, " {}", quote(&format!("{key}={value}")));
        }
    }

    if format == LogFormat::Json && line.ends_with('}') {
        line.insert_str(line.len() - 1, &rendered);
    } else {
        line.push_str(&rendered);
    }
}

fn quote(s: &str) -> String {
    serde_json::Value::from(s).to_string()
}

/// Random request path of one to four lowercase, query-escaped segments.
pub fn resource_uri<R: Rng>(rng: &mut R) -> String {
    let mut uri = String::new();
    for _ in 0..rng.gen_range(1..=4) {
        uri.push('/');
        uri.push_str(&faker::query_escape(&faker::bs(rng)));
    }
    uri.to_lowercase()
}

/// Either `-` or a lowercase username, with equal probability.
pub fn auth_user_id<R: Rng>(rng: &mut R) -> String {
    let username = faker::username(rng).to_lowercase();
    if rng.gen_bool(0.5) {
        "-".to_string()
    } else {
        username
    }
}

pub fn http_version<R: Rng>(rng: &mut R) -> &'static str {
    const VERSIONS: [&str; 3] = ["HTTP/1.0", "HTTP/1.1", "HTTP/2.0"];
    VERSIONS[rng.gen_range(0..VERSIONS.len())]
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn instant() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2023, 3, 7, 9, 5, 2).unwrap() + chrono::Duration::microseconds(123_456)
    }

    #[test]
    fn test_every_format_renders() {
        let mut rng = StdRng::seed_from_u64(12345);
        for format in LogFormat::ALL {
            for _ in 0..20 {
                let line = render_format(&mut rng, format, instant());
                assert!(!line.is_empty(), "{format} rendered an empty line");
                assert!(!line.contains('\n'), "{format}: {line}");
            }
        }
    }

    #[test]
    fn test_unknown_format_renders_empty() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(render(&mut rng, "nginx", instant()), "");
        assert_eq!(render(&mut rng, "", instant()), "");
        assert!(!render(&mut rng, "logfmt", instant()).is_empty());
    }

    #[test]
    fn test_timestamps_in_lines() {
        let mut rng = StdRng::seed_from_u64(2);
        let t = instant();

        let common = render_format(&mut rng, LogFormat::ApacheCommon, t);
        assert!(common.contains("[07/Mar/2023:09:05:02 +0000]"), "{common}");

        let error = render_format(&mut rng, LogFormat::ApacheError, t);
        assert!(error.starts_with("[Tue Mar 07 09:05:02.123456 2023]"), "{error}");

        let syslog = render_format(&mut rng, LogFormat::Rfc3164, t);
        assert!(syslog.contains(">Mar 07 09:05:02 "), "{syslog}");

        let rfc5424 = render_format(&mut rng, LogFormat::Rfc5424, t);
        assert!(rfc5424.contains(" 2023-03-07T09:05:02.123Z "), "{rfc5424}");

        let logfmt = render_format(&mut rng, LogFormat::Logfmt, t);
        assert!(logfmt.contains("timestamp=2023-03-07T09:05:02.123Z "), "{logfmt}");
    }

    #[test]
    fn test_json_line_is_valid_json() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..20 {
            let line = render_format(&mut rng, LogFormat::Json, instant());
            let value: serde_json::Value = serde_json::from_str(&line).unwrap();
            assert!(value["status"].is_u64());
            assert!(value["bytes"].as_u64().unwrap() <= 30_000);
            assert_eq!(value["datetime"], "07/Mar/2023:09:05:02 +0000");
        }
    }

    #[test]
    fn test_extra_metadata() {
        let mut rng = StdRng::seed_from_u64(4);
        let extra = [("trace_id", "abc"), ("user", "o\"neil")];

        let json = render_with_extra(&mut rng, LogFormat::Json, instant(), &extra);
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["trace_id"], "abc");
        assert_eq!(value["user"], "o\"neil");

        let logfmt = render_with_extra(&mut rng, LogFormat::Logfmt, instant(), &extra);
        assert!(logfmt.ends_with(r#" "trace_id=abc" "user=o\"neil""#), "{logfmt}");
    }

    #[test]
    fn test_resource_uri() {
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..50 {
            let uri = resource_uri(&mut rng);
            let segments = uri.split('/').skip(1).count();
            assert!((1..=4).contains(&segments), "{uri}");
            assert_eq!(uri, uri.to_lowercase());
            assert!(!uri.contains(' '));
        }
    }

    #[test]
    fn test_auth_user_and_version() {
        let mut rng = StdRng::seed_from_u64(6);
        let mut saw_dash = false;
        let mut saw_user = false;
        for _ in 0..100 {
            let user = auth_user_id(&mut rng);
            if user == "-" {
                saw_dash = true;
            } else {
                saw_user = true;
                assert_eq!(user, user.to_lowercase());
            }
            assert!(http_version(&mut rng).starts_with("HTTP/"));
        }
        assert!(saw_dash && saw_user);
    }

    #[test]
    fn test_same_seed_same_lines() {
        let mut a = StdRng::seed_from_u64(12345);
        let mut b = StdRng::seed_from_u64(12345);
        for format in LogFormat::ALL {
            assert_eq!(
                render_format(&mut a, format, instant()),
                render_format(&mut b, format, instant())
            );
        }
    }
}
