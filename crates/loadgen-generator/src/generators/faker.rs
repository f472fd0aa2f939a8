//! Fake field values for synthetic log lines.
//!
//! Every function draws from the caller's RNG only, so a seeded RNG yields
//! the same values in the same order.

use rand::Rng;

const ADJECTIVES: &[&str] = &[
    "clicks-and-mortar", "compelling", "cross-platform", "distributed", "dynamic",
    "efficient", "end-to-end", "enterprise", "extensible", "frictionless",
    "global", "granular", "holistic", "impactful", "innovative", "integrated",
    "interactive", "intuitive", "leading-edge", "magnetic", "mission-critical",
    "next-generation", "one-to-one", "open-source", "proactive", "real-time",
    "revolutionary", "robust", "scalable", "seamless", "strategic", "sticky",
    "synergistic", "transparent", "turn-key", "user-centric", "value-added",
    "viral", "virtual", "visionary", "wireless", "world-class",
];

const VERBS: &[&str] = &[
    "aggregate", "architect", "benchmark", "brand", "cultivate", "deliver",
    "deploy", "disintermediate", "drive", "e-enable", "embrace", "empower",
    "enable", "engage", "engineer", "enhance", "envisioneer", "evolve",
    "expedite", "exploit", "extend", "facilitate", "generate", "grow",
    "harness", "implement", "incentivize", "incubate", "innovate", "integrate",
    "iterate", "leverage", "matrix", "maximize", "mesh", "monetize", "morph",
    "optimize", "orchestrate", "reintermediate", "reinvent", "repurpose",
    "revolutionize", "scale", "seize", "strategize", "streamline", "syndicate",
    "synergize", "synthesize", "target", "transform", "transition", "unleash",
    "utilize", "visualize", "whiteboard",
];

const BS_NOUNS: &[&str] = &[
    "action-items", "applications", "architectures", "bandwidth", "channels",
    "communities", "content", "convergence", "deliverables", "e-business",
    "e-commerce", "e-markets", "e-services", "experiences", "eyeballs",
    "functionalities", "infomediaries", "infrastructures", "initiatives",
    "interfaces", "markets", "methodologies", "metrics", "mindshare", "models",
    "networks", "niches", "paradigms", "partnerships", "platforms", "portals",
    "relationships", "roi", "schemas", "solutions", "supply-chains", "synergies",
    "systems", "technologies", "users", "vortals", "web services",
];

const NOUNS: &[&str] = &[
    "account", "answer", "badge", "battery", "bridge", "cabinet", "camera",
    "canyon", "castle", "cloud", "compass", "crystal", "desert", "engine",
    "falcon", "forest", "galaxy", "garden", "glacier", "harbor", "island",
    "jungle", "kettle", "ladder", "lantern", "library", "magnet", "meadow",
    "mirror", "mountain", "needle", "ocean", "orchard", "packet", "pencil",
    "planet", "puzzle", "quartz", "rabbit", "river", "rocket", "saddle",
    "signal", "socket", "spider", "spring", "thunder", "tower", "tunnel",
    "valley", "vessel", "village", "violin", "volcano", "wagon", "window",
];

const APP_PREFIXES: &[&str] = &[
    "Alpha", "Blue", "Bright", "Cloud", "Cyber", "Data", "Deep", "Fast", "Green",
    "Hyper", "Meta", "Micro", "Nano", "Net", "Open", "Quick", "Red", "Silver",
    "Smart", "Star", "Sun", "Swift", "Tera", "True", "Zen",
];

const APP_SUFFIXES: &[&str] = &[
    "base", "bird", "box", "cast", "desk", "dock", "flow", "forge", "gate",
    "grid", "hub", "kit", "lab", "link", "mind", "ops", "path", "pulse", "ring",
    "scope", "shift", "stack", "sync", "wave", "works",
];

const WORDS: &[&str] = &[
    "access", "agent", "alert", "auth", "backend", "cache", "client", "cluster",
    "config", "core", "cron", "daemon", "db", "dispatch", "edge", "frontend",
    "gateway", "index", "ingest", "kernel", "ledger", "loader", "mailer",
    "monitor", "node", "proxy", "queue", "relay", "router", "sched", "search",
    "server", "session", "shard", "store", "stream", "sync", "timer", "worker",
];

const LANGUAGE_ABBREVIATIONS: &[&str] = &[
    "aa", "af", "am", "ar", "as", "az", "be", "bg", "bn", "bs", "ca", "cs", "cy",
    "da", "de", "el", "en", "eo", "es", "et", "eu", "fa", "fi", "fr", "ga", "gl",
    "gu", "he", "hi", "hr", "hu", "hy", "id", "is", "it", "ja", "ka", "kk", "km",
    "kn", "ko", "la", "lt", "lv", "mk", "ml", "mn", "mr", "ms", "mt", "nb", "ne",
    "nl", "pa", "pl", "pt", "ro", "ru", "sk", "sl", "sq", "sr", "sv", "sw", "ta",
    "te", "th", "tr", "uk", "ur", "uz", "vi", "zh", "zu",
];

const FIRST_NAMES: &[&str] = &[
    "Aaliyah", "Abel", "Ada", "Ahmed", "Alice", "Amara", "Andre", "Anika", "Ben",
    "Carla", "Chen", "Dario", "Dmitri", "Elena", "Emeka", "Farah", "Felix",
    "Grace", "Hana", "Igor", "Ines", "Jamal", "Jonas", "Kai", "Kofi", "Lars",
    "Leila", "Luca", "Maya", "Mateo", "Nadia", "Noah", "Olga", "Omar", "Priya",
    "Quinn", "Rafael", "Rosa", "Sami", "Sofia", "Tariq", "Uma", "Viktor",
    "Wen", "Yara", "Yusuf", "Zane", "Zoe",
];

const LAST_NAMES: &[&str] = &[
    "Abbott", "Bauer", "Castillo", "Dubois", "Eriksen", "Fischer", "Garcia",
    "Haddad", "Ivanova", "Jensen", "Kowalski", "Larsen", "Moreau", "Nakamura",
    "Okafor", "Petrov", "Quispe", "Rossi", "Schmidt", "Tanaka", "Ueda",
    "Varga", "Weber", "Xu", "Yilmaz", "Zimmerman",
];

const TLDS: &[&str] = &["biz", "com", "info", "io", "name", "net", "org"];

const HACKER_ABBREVIATIONS: &[&str] = &[
    "ADP", "AGP", "AI", "API", "ASCII", "CLI", "COM", "CSS", "DNS", "EXE", "FTP",
    "GB", "HDD", "HEX", "HTTP", "IB", "IP", "JBOD", "JSON", "OCR", "PCI", "PNG",
    "RAM", "RSS", "SAS", "SCSI", "SDD", "SMS", "SMTP", "SQL", "SSD", "SSL",
    "TCP", "THX", "TLS", "UDP", "USB", "UTF8", "VGA", "XML", "XSS",
];

const HACKER_ADJECTIVES: &[&str] = &[
    "1080p", "auxiliary", "back-end", "bluetooth", "cross-platform", "digital",
    "haptic", "mobile", "multi-byte", "neural", "online", "open-source",
    "optical", "primary", "redundant", "solid state", "virtual", "wireless",
];

const HACKER_NOUNS: &[&str] = &[
    "alarm", "application", "array", "bandwidth", "bus", "capacitor", "card",
    "circuit", "driver", "feed", "firewall", "hard drive", "interface",
    "matrix", "microchip", "monitor", "panel", "pixel", "port", "program",
    "protocol", "sensor", "system", "transmitter",
];

const HACKER_VERBS: &[&str] = &[
    "back up", "bypass", "calculate", "compress", "connect", "copy", "generate",
    "hack", "index", "input", "navigate", "override", "parse", "program",
    "quantify", "reboot", "synthesize", "transmit",
];

const HACKER_INGVERBS: &[&str] = &[
    "backing up", "bypassing", "calculating", "compressing", "connecting",
    "copying", "generating", "hacking", "indexing", "navigating", "overriding",
    "parsing", "programming", "quantifying", "rebooting", "synthesizing",
    "transmitting",
];

const HACKER_PHRASES: &[&str] = &[
    "If we {verb} the {noun}, we can get to the {abbr} {noun} through the {adjective} {abbr} {noun}!",
    "We need to {verb} the {adjective} {abbr} {noun}!",
    "Try to {verb} the {abbr} {noun}, maybe it will {verb} the {adjective} {noun}!",
    "You can't {verb} the {noun} without {ingverb} the {adjective} {abbr} {noun}!",
    "Use the {adjective} {abbr} {noun}, then you can {verb} the {adjective} {noun}!",
    "The {abbr} {noun} is down, {verb} the {adjective} {noun} so we can {verb} the {abbr} {noun}!",
    "{ingverb} the {noun} won't do anything, we need to {verb} the {adjective} {abbr} {noun}!",
    "I'll {verb} the {adjective} {abbr} {noun}, that should {noun} the {abbr} {noun}!",
];

const HTTP_METHODS: &[&str] = &[
    "GET", "HEAD", "POST", "PUT", "TRACE", "CONNECT", "OPTIONS", "PATCH", "DELETE",
];

const HTTP_STATUS_SIMPLE: &[u16] = &[200, 301, 302, 400, 404, 500];

const APACHE_LOG_LEVELS: &[&str] = &[
    "emerg", "alert", "crit", "error", "warn", "notice", "info", "debug",
    "trace1", "trace2", "trace3", "trace4", "trace5", "trace6", "trace7", "trace8",
];

const PLATFORMS: &[&str] = &[
    "Windows NT 10.0; Win64; x64",
    "Windows NT 6.1; WOW64",
    "Macintosh; Intel Mac OS X 10_15_7",
    "X11; Linux x86_64",
    "X11; Ubuntu; Linux i686",
    "iPhone; CPU iPhone OS 16_5 like Mac OS X",
    "Linux; Android 13; Pixel 7",
];

fn pick<'a, R: Rng>(rng: &mut R, items: &[&'a str]) -> &'a str {
    items[rng.gen_range(0..items.len())]
}

/// Random dotted-quad IPv4 address.
pub fn ipv4<R: Rng>(rng: &mut R) -> String {
    format!(
        "{}.{}.{}.{}",
        rng.gen_range(1..=255u8),
        rng.gen::<u8>(),
        rng.gen::<u8>(),
        rng.gen::<u8>()
    )
}

/// Username such as `Okafor1234` (mixed case).
pub fn username<R: Rng>(rng: &mut R) -> String {
    format!("{}{}", pick(rng, LAST_NAMES), rng.gen_range(0..10_000))
}

/// Business-speak phrase, e.g. `synergize scalable platforms`.
pub fn bs<R: Rng>(rng: &mut R) -> String {
    format!(
        "{} {} {}",
        pick(rng, VERBS),
        pick(rng, ADJECTIVES),
        pick(rng, BS_NOUNS)
    )
}

/// Product-style application name, e.g. `SwiftDock`.
pub fn app_name<R: Rng>(rng: &mut R) -> String {
    let prefix = pick(rng, APP_PREFIXES);
    let suffix = pick(rng, APP_SUFFIXES);
    match rng.gen_range(0..3) {
        0 => format!("{prefix}{suffix}"),
        1 => format!("{prefix} {}", pick(rng, NOUNS)),
        _ => format!("{} {prefix}", pick(rng, FIRST_NAMES)),
    }
}

/// A single lowercase word.
pub fn word<R: Rng>(rng: &mut R) -> &'static str {
    pick(rng, WORDS)
}

pub fn noun<R: Rng>(rng: &mut R) -> &'static str {
    pick(rng, NOUNS)
}

/// Two letter ISO 639-1 language code.
pub fn language_abbreviation<R: Rng>(rng: &mut R) -> &'static str {
    pick(rng, LANGUAGE_ABBREVIATIONS)
}

/// Techno-babble sentence.
pub fn hacker_phrase<R: Rng>(rng: &mut R) -> String {
    let template = pick(rng, HACKER_PHRASES);
    let mut out = String::with_capacity(template.len() + 32);
    let mut rest = template;
    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let Some(len) = rest[start..].find('}') else {
            break;
        };
        let end = start + len;
        let value = match &rest[start + 1..end] {
            "verb" => pick(rng, HACKER_VERBS),
            "ingverb" => pick(rng, HACKER_INGVERBS),
            "noun" => pick(rng, HACKER_NOUNS),
            "adjective" => pick(rng, HACKER_ADJECTIVES),
            "abbr" => pick(rng, HACKER_ABBREVIATIONS),
            other => other,
        };
        if out.is_empty() {
            // Sentences start capitalized
            let mut chars = value.chars();
            if let Some(first) = chars.next() {
                out.extend(first.to_uppercase());
                out.push_str(chars.as_str());
            }
        } else {
            out.push_str(value);
        }
        rest = &rest[end + 1..];
    }
    out.push_str(rest);
    out
}

/// Domain name such as `visionarymatrix.io`.
pub fn domain_name<R: Rng>(rng: &mut R) -> String {
    let adjective = pick(rng, ADJECTIVES).replace(['-', ' '], "");
    let noun = pick(rng, BS_NOUNS).replace(['-', ' '], "");
    format!("{adjective}{noun}.{}", pick(rng, TLDS))
}

/// Absolute URL with a scheme, host and two or three path segments.
pub fn url<R: Rng>(rng: &mut R) -> String {
    let scheme = if rng.gen_bool(0.5) { "http" } else { "https" };
    let mut url = format!("{scheme}://www.{}", domain_name(rng));
    for _ in 0..rng.gen_range(2..=3) {
        url.push('/');
        url.push_str(&pick(rng, VERBS).replace(' ', "-"));
    }
    url
}

/// Browser user agent string.
pub fn user_agent<R: Rng>(rng: &mut R) -> String {
    let platform = pick(rng, PLATFORMS);
    match rng.gen_range(0..4) {
        0 => format!(
            "Mozilla/5.0 ({platform}) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/{}.0.{}.{} Safari/537.36",
            rng.gen_range(90..=126),
            rng.gen_range(4000..=6500),
            rng.gen_range(0..=200)
        ),
        1 => {
            let version = rng.gen_range(90..=128);
            format!("Mozilla/5.0 ({platform}; rv:{version}.0) Gecko/20100101 Firefox/{version}.0")
        }
        2 => format!(
            "Mozilla/5.0 ({platform}) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/{}.{} Safari/605.1.15",
            rng.gen_range(13..=17),
            rng.gen_range(0..=6)
        ),
        _ => format!(
            "Opera/9.{} ({platform}) Presto/2.{}.{} Version/{}.00",
            rng.gen_range(10..=99),
            rng.gen_range(8..=12),
            rng.gen_range(100..=300),
            rng.gen_range(10..=12)
        ),
    }
}

pub fn http_method<R: Rng>(rng: &mut R) -> &'static str {
    pick(rng, HTTP_METHODS)
}

/// One of the common HTTP status codes.
pub fn http_status_simple<R: Rng>(rng: &mut R) -> u16 {
    HTTP_STATUS_SIMPLE[rng.gen_range(0..HTTP_STATUS_SIMPLE.len())]
}

/// Apache `LogLevel` name.
pub fn apache_log_level<R: Rng>(rng: &mut R) -> &'static str {
    pick(rng, APACHE_LOG_LEVELS)
}

/// Escape a string for use in a URL query component.
///
/// Unreserved characters pass through, spaces become `+` and every other
/// byte is percent-encoded with uppercase hex digits.
pub fn query_escape(s: &str) -> String {
    const HEX: &[u8; 16] = b"0123456789ABCDEF";
    let mut out = String::with_capacity(s.len());
    for &b in s.as_bytes() {
        match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(b as char)
            }
            b' ' => out.push('+'),
            _ => {
                out.push('%');
                out.push(HEX[(b >> 4) as usize] as char);
                out.push(HEX[(b & 0x0f) as usize] as char);
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_ipv4_shape() {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..100 {
            let ip = ipv4(&mut rng);
            let octets: Vec<u8> = ip.split('.').map(|o| o.parse().unwrap()).collect();
            assert_eq!(octets.len(), 4);
            assert_ne!(octets[0], 0);
        }
    }

    #[test]
    fn test_deterministic_per_seed() {
        let mut a = StdRng::seed_from_u64(99);
        let mut b = StdRng::seed_from_u64(99);
        for _ in 0..20 {
            assert_eq!(bs(&mut a), bs(&mut b));
            assert_eq!(user_agent(&mut a), user_agent(&mut b));
            assert_eq!(hacker_phrase(&mut a), hacker_phrase(&mut b));
        }
    }

    #[test]
    fn test_hacker_phrase_fills_placeholders() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let phrase = hacker_phrase(&mut rng);
            assert!(!phrase.contains('{'), "{phrase}");
            assert!(!phrase.contains('}'), "{phrase}");
            assert!(phrase.chars().next().unwrap().is_uppercase(), "{phrase}");
        }
    }

    #[test]
    fn test_url_and_domain() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..20 {
            let domain = domain_name(&mut rng);
            assert!(domain.contains('.'));
            assert!(!domain.contains(' '));

            let url = url(&mut rng);
            assert!(url.starts_with("http://www.") || url.starts_with("https://www."));
            assert!(!url.contains(' '));
        }
    }

    #[test]
    fn test_http_fields() {
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..50 {
            assert!(HTTP_METHODS.contains(&http_method(&mut rng)));
            assert!(HTTP_STATUS_SIMPLE.contains(&http_status_simple(&mut rng)));
            assert!(APACHE_LOG_LEVELS.contains(&apache_log_level(&mut rng)));
        }
    }

    #[test]
    fn test_query_escape() {
        assert_eq!(query_escape("abc-XYZ_0.9~"), "abc-XYZ_0.9~");
        assert_eq!(query_escape("web services"), "web+services");
        assert_eq!(query_escape("a/b?c=d&e"), "a%2Fb%3Fc%3Dd%26e");
        assert_eq!(query_escape("é"), "%C3%A9");
    }
}
