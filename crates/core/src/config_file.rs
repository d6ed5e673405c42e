//! Generated `config.php` payloads.
//!
//! Both files are flat lists of `define('NAME', value);` lines that the
//! installed application reads at runtime. Option values and paths are
//! quoted with [`quote`]. The base URL is inserted verbatim: a URL holding a
//! `'` would break out of the string literal. Validation only guarantees it
//! parses as an `http(s)` URL.

use core::fmt;

use secrecy::ExposeSecret;

use crate::layout::Layout;
use crate::options::InstallOptions;

/// OpenCart marketplace endpoint written into the admin config.
pub const OPENCART_SERVER: &str = "https://www.opencart.com/";

/// The two rendered configuration files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedConfig {
    /// Contents of `<root>/config.php`
    pub storefront: String,
    /// Contents of `<root>/admin/config.php`
    pub admin: String,
}

/// One line of a config payload.
enum Line<'a> {
    Comment(&'static str),
    /// String literal, quoted
    Quoted(&'static str, &'a str),
    /// String literal, inserted as-is
    Verbatim(&'static str, &'a str),
    /// Root prefix plus a fixed sub-path
    Rooted(&'static str, &'a str, &'static str),
    /// Another constant plus a fixed sub-path
    Derived(&'static str, &'static str, &'static str),
    Blank,
}

impl fmt::Display for Line<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Comment(text) => write!(f, "// {text}"),
            Self::Quoted(name, value) => write!(f, "define('{name}', '{}');", quote(value)),
            Self::Verbatim(name, value) => write!(f, "define('{name}', '{value}');"),
            Self::Rooted(name, root, path) => {
                write!(f, "define('{name}', '{}{path}');", quote(root))
            }
            Self::Derived(name, base, path) => write!(f, "define('{name}', {base} . '{path}');"),
            Self::Blank => Ok(()),
        }
    }
}

/// Render both configuration payloads.
#[must_use]
pub fn render(options: &InstallOptions, layout: &Layout) -> GeneratedConfig {
    let root = layout.root_prefix();
    let store = options.base_url.as_str();
    let admin = options.base_url.admin();

    let mut storefront = vec![
        Line::Comment("HTTP"),
        Line::Verbatim("HTTP_SERVER", store),
        Line::Comment("HTTPS"),
        Line::Verbatim("HTTPS_SERVER", store),
        Line::Comment("DIR"),
        Line::Rooted("DIR_APPLICATION", &root, "catalog/"),
        Line::Rooted("DIR_SYSTEM", &root, "system/"),
        Line::Rooted("DIR_IMAGE", &root, "image/"),
        Line::Derived("DIR_STORAGE", "DIR_SYSTEM", "storage/"),
        Line::Derived("DIR_LANGUAGE", "DIR_APPLICATION", "language/"),
        Line::Derived("DIR_TEMPLATE", "DIR_APPLICATION", "view/theme/"),
    ];
    storefront.extend(runtime_dirs());
    storefront.extend(database_lines(options));

    let mut admin_lines = vec![
        Line::Comment("HTTP"),
        Line::Verbatim("HTTP_SERVER", &admin),
        Line::Verbatim("HTTP_CATALOG", store),
        Line::Comment("HTTPS"),
        Line::Verbatim("HTTPS_SERVER", &admin),
        Line::Verbatim("HTTPS_CATALOG", store),
        Line::Comment("DIR"),
        Line::Rooted("DIR_APPLICATION", &root, "admin/"),
        Line::Rooted("DIR_SYSTEM", &root, "system/"),
        Line::Rooted("DIR_IMAGE", &root, "image/"),
        Line::Derived("DIR_STORAGE", "DIR_SYSTEM", "storage/"),
        Line::Rooted("DIR_CATALOG", &root, "catalog/"),
        Line::Derived("DIR_LANGUAGE", "DIR_APPLICATION", "language/"),
        Line::Derived("DIR_TEMPLATE", "DIR_APPLICATION", "view/template/"),
    ];
    admin_lines.extend(runtime_dirs());
    admin_lines.extend(database_lines(options));
    admin_lines.push(Line::Comment("OpenCart API"));
    admin_lines.push(Line::Verbatim("OPENCART_SERVER", OPENCART_SERVER));

    GeneratedConfig {
        storefront: finish(&storefront),
        admin: finish(&admin_lines),
    }
}

fn runtime_dirs() -> [Line<'static>; 8] {
    [
        Line::Derived("DIR_CONFIG", "DIR_SYSTEM", "config/"),
        Line::Derived("DIR_CACHE", "DIR_STORAGE", "cache/"),
        Line::Derived("DIR_DOWNLOAD", "DIR_STORAGE", "download/"),
        Line::Derived("DIR_LOGS", "DIR_STORAGE", "logs/"),
        Line::Derived("DIR_MODIFICATION", "DIR_STORAGE", "modification/"),
        Line::Derived("DIR_SESSION", "DIR_STORAGE", "session/"),
        Line::Derived("DIR_UPLOAD", "DIR_STORAGE", "upload/"),
        Line::Blank,
    ]
}

fn database_lines(options: &InstallOptions) -> Vec<Line<'_>> {
    let db = &options.database;
    vec![
        Line::Comment("DB"),
        Line::Quoted("DB_DRIVER", &db.driver),
        Line::Quoted("DB_HOSTNAME", &db.hostname),
        Line::Quoted("DB_USERNAME", &db.username),
        Line::Quoted("DB_PASSWORD", db.password.expose_secret()),
        Line::Quoted("DB_DATABASE", &db.database),
        Line::Quoted("DB_PREFIX", &db.prefix),
        Line::Quoted("DB_PORT", &db.port),
    ]
}

fn finish(lines: &[Line<'_>]) -> String {
    let mut out = String::from("<?php\n");
    for line in lines {
        out.push_str(&line.to_string());
        out.push('\n');
    }
    out
}

/// Backslash-escape `'`, `"`, `\` and NUL for a single-quoted PHP literal.
#[must_use]
pub fn quote(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\'' | '"' | '\\' => {
                quoted.push('\\');
                quoted.push(c);
            }
            '\0' => quoted.push_str("\\0"),
            _ => quoted.push(c),
        }
    }
    quoted
}

/// A `define` read back from a rendered payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Definition {
    /// A single string literal, unescaped
    Literal(String),
    /// Anything else (`DIR_SYSTEM . 'storage/'`), as written
    Expression(String),
}

/// Read `define('NAME', ...);` lines back into name/value pairs, in file order.
///
/// Lines that are not definitions are skipped.
#[must_use]
pub fn parse_definitions(payload: &str) -> Vec<(String, Definition)> {
    payload
        .lines()
        .filter_map(|line| {
            let body = line.trim().strip_prefix("define('")?.strip_suffix(");")?;
            let (name, value) = body.split_once("', ")?;
            let definition = unquote(value).map_or_else(
                || Definition::Expression(value.to_owned()),
                Definition::Literal,
            );
            Some((name.to_owned(), definition))
        })
        .collect()
}

/// Look up one literal definition.
#[must_use]
pub fn literal<'a>(definitions: &'a [(String, Definition)], name: &str) -> Option<&'a str> {
    definitions.iter().find_map(|(key, value)| match value {
        Definition::Literal(text) if key == name => Some(text.as_str()),
        _ => None,
    })
}

/// Undo [`quote`] for a value that is exactly one `'...'` literal.
fn unquote(value: &str) -> Option<String> {
    let inner = value.strip_prefix('\'')?;
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next()? {
                '0' => out.push('\0'),
                escaped => out.push(escaped),
            },
            '\'' => return chars.as_str().is_empty().then_some(out),
            _ => out.push(c),
        }
    }
    None
}
