//! FITS header cards.

use std::fmt;

/// Width of one header card.
pub const CARD_LEN: usize = 80;

/// Value of a header keyword.
#[derive(Debug, Clone, PartialEq)]
pub enum HeaderValue {
    /// Character string.
    Str(String),
    /// Integer.
    Int(i64),
    /// Floating point.
    Float(f64),
    /// Logical.
    Bool(bool),
}

impl HeaderValue {
    /// Get as string slice if this is a string value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Get as integer; floats with no fractional part also convert.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            Self::Float(f) if f.fract() == 0.0 => Some(*f as i64),
            Self::Str(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Get as float.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(i) => Some(*i as f64),
            Self::Float(f) => Some(*f),
            _ => None,
        }
    }

    fn render(&self) -> String {
        match self {
            Self::Str(s) => {
                let escaped = s.replace('\'', "''");
                format!("'{:<8}'", escaped)
            }
            Self::Int(i) => format!("{:>20}", i),
            Self::Float(f) => format!("{:>20}", format!("{:.12E}", f)),
            Self::Bool(b) => format!("{:>20}", if *b { "T" } else { "F" }),
        }
    }
}

impl fmt::Display for HeaderValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(s) => f.write_str(s),
            Self::Int(i) => write!(f, "{}", i),
            Self::Float(v) => write!(f, "{}", v),
            Self::Bool(b) => f.write_str(if *b { "T" } else { "F" }),
        }
    }
}

impl From<&str> for HeaderValue {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl From<String> for HeaderValue {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

impl From<i64> for HeaderValue {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<f64> for HeaderValue {
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}

impl From<bool> for HeaderValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

/// Ordered keyword/value pairs of one HDU.
///
/// Commentary cards (COMMENT, HISTORY, blank) are not kept.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Header {
    cards: Vec<(String, HeaderValue)>,
}

impl Header {
    /// Create an empty header.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a keyword (keywords are stored upper case).
    pub fn get(&self, key: &str) -> Option<&HeaderValue> {
        let key = key.to_ascii_uppercase();
        self.cards.iter().find(|(k, _)| *k == key).map(|(_, v)| v)
    }

    /// Look up a string keyword.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(HeaderValue::as_str)
    }

    /// Look up an integer keyword.
    pub fn get_i64(&self, key: &str) -> Option<i64> {
        self.get(key).and_then(HeaderValue::as_i64)
    }

    /// Set a keyword, replacing an existing value in place.
    pub fn set(&mut self, key: &str, value: impl Into<HeaderValue>) {
        let key = key.to_ascii_uppercase();
        let value = value.into();
        match self.cards.iter_mut().find(|(k, _)| *k == key) {
            Some(card) => card.1 = value,
            None => self.cards.push((key, value)),
        }
    }

    /// Iterate keyword/value pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &HeaderValue)> {
        self.cards.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of keywords.
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Check if the header has no keywords.
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Parse one 80-column card. Returns `None` for commentary and
    /// valueless cards.
    pub fn parse_card(card: &str) -> Option<(String, HeaderValue)> {
        if !card.is_ascii() || card.len() < 10 || &card[8..10] != "= " {
            return None;
        }
        let key = card[..8].trim_end().to_string();
        let rest = card[10..].trim_start();

        let value = if let Some(quoted) = rest.strip_prefix('\'') {
            HeaderValue::Str(parse_quoted(quoted))
        } else {
            let token = rest.split('/').next().unwrap_or("").trim();
            parse_scalar(token)?
        };

        Some((key, value))
    }

    /// Render as padded 80-column cards, without END.
    pub fn to_cards(&self) -> Vec<String> {
        self.cards
            .iter()
            .map(|(k, v)| {
                let mut card = format!("{:<8}= {}", k, v.render());
                card.truncate(CARD_LEN);
                format!("{:<width$}", card, width = CARD_LEN)
            })
            .collect()
    }
}

impl FromIterator<(String, HeaderValue)> for Header {
    fn from_iter<T: IntoIterator<Item = (String, HeaderValue)>>(iter: T) -> Self {
        let mut header = Header::new();
        for (k, v) in iter {
            header.set(&k, v);
        }
        header
    }
}

/// Parse the body of a quoted string, after the opening quote.
fn parse_quoted(body: &str) -> String {
    let mut out = String::new();
    let mut chars = body.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\'' {
            if chars.peek() == Some(&'\'') {
                out.push('\'');
                chars.next();
            } else {
                break;
            }
        } else {
            out.push(c);
        }
    }
    out.trim_end().to_string()
}

fn parse_scalar(token: &str) -> Option<HeaderValue> {
    match token {
        "" => None,
        "T" => Some(HeaderValue::Bool(true)),
        "F" => Some(HeaderValue::Bool(false)),
        _ => {
            if let Ok(i) = token.parse::<i64>() {
                return Some(HeaderValue::Int(i));
            }
            token
                .replace(['D', 'd'], "E")
                .parse::<f64>()
                .ok()
                .map(HeaderValue::Float)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(text: &str) -> String {
        format!("{:<80}", text)
    }

    #[test]
    fn parses_string_card_with_comment() {
        let (k, v) = Header::parse_card(&card("TELESCOP= 'CHANDRA '           / mission name")).unwrap();
        assert_eq!(k, "TELESCOP");
        assert_eq!(v, HeaderValue::Str("CHANDRA".into()));
    }

    #[test]
    fn parses_escaped_quote() {
        let (_, v) = Header::parse_card(&card("OBJECT  = 'O''Brien'")).unwrap();
        assert_eq!(v.as_str(), Some("O'Brien"));
    }

    #[test]
    fn parses_numbers_and_logicals() {
        let (_, v) = Header::parse_card(&card("DETCHANS=                 1024")).unwrap();
        assert_eq!(v, HeaderValue::Int(1024));

        let (_, v) = Header::parse_card(&card("EXPOSURE=           1.5D+03 / s")).unwrap();
        assert_eq!(v.as_f64(), Some(1500.0));

        let (_, v) = Header::parse_card(&card("SIMPLE  =                    T")).unwrap();
        assert_eq!(v, HeaderValue::Bool(true));
    }

    #[test]
    fn skips_commentary_cards() {
        assert!(Header::parse_card(&card("COMMENT this is a comment")).is_none());
        assert!(Header::parse_card(&card("END")).is_none());
        assert!(Header::parse_card(&card("BLANK   =   / no value")).is_none());
    }

    #[test]
    fn set_replaces_in_place() {
        let mut header = Header::new();
        header.set("extname", "MATRIX");
        header.set("DETCHANS", 10i64);
        header.set("EXTNAME", "EBOUNDS");

        assert_eq!(header.len(), 2);
        assert_eq!(header.get_str("EXTNAME"), Some("EBOUNDS"));
        assert_eq!(header.iter().next().map(|(k, _)| k), Some("EXTNAME"));
    }

    #[test]
    fn rendered_cards_parse_back() {
        let mut header = Header::new();
        header.set("CHANTYPE", "PI");
        header.set("DETCHANS", 4096i64);
        header.set("LO_THRES", 1.0e-12);
        header.set("EXTEND", true);
        header.set("NOTE", "it's");

        for (card, (key, value)) in header.to_cards().iter().zip(header.iter()) {
            assert_eq!(card.len(), CARD_LEN);
            let (k, v) = Header::parse_card(card).unwrap();
            assert_eq!(k, key);
            assert_eq!(&v, value);
        }
    }

    #[test]
    fn as_i64_accepts_integral_float() {
        assert_eq!(HeaderValue::Float(256.0).as_i64(), Some(256));
        assert_eq!(HeaderValue::Float(2.5).as_i64(), None);
        assert_eq!(HeaderValue::Str(" 128 ".into()).as_i64(), Some(128));
    }
}
