//! Recursive-descent parser for Python-style data literals.
//!
//! Accepted forms: lists, tuples, dicts, strings (single, double and triple
//! quoted, `r`/`u` prefixes, adjacent-literal concatenation), integers
//! (decimal, hex, octal, binary, `_` separators), floats, unary `+`/`-` on
//! numbers, and the `True`, `False` and `None` keywords. Everything else is
//! rejected with a [`LiteralError`].

use super::Literal;
use crate::error::{LiteralError, LiteralResult};
use crate::models::exact_integer;
use once_cell::sync::Lazy;
use regex::Regex;

/// Nesting limit for brackets, to keep recursion bounded on hostile input.
const MAX_DEPTH: usize = 256;

static NUMBER_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?x)^(?:
            0[xX](?:_?[0-9a-fA-F])+
          | 0[oO](?:_?[0-7])+
          | 0[bB](?:_?[01])+
          | (?:\d(?:_?\d)*)?\.\d(?:_?\d)*(?:[eE][+-]?\d(?:_?\d)*)?
          | \d(?:_?\d)*\.?(?:[eE][+-]?\d(?:_?\d)*)?
        )",
    )
    .expect("number pattern is valid")
});

/// Parse a complete literal expression. Surrounding whitespace is allowed;
/// anything else after the value is an error.
pub fn parse_literal(source: &str) -> LiteralResult<Literal> {
    let mut parser = Parser::new(source);
    parser.skip_ws();
    let value = parser.value()?;
    parser.skip_ws();
    match parser.peek() {
        None => Ok(value),
        Some(c) => Err(parser.error(format!("unexpected trailing character {:?}", c))),
    }
}

/// Intermediate numeric value so unary minus can act before narrowing.
/// Integers are kept as canonical decimal digits, so any size is exact.
enum Numeric {
    Int { negative: bool, digits: String },
    Float(f64),
}

impl Numeric {
    fn negate(self) -> Self {
        match self {
            Numeric::Int { negative, digits } => Numeric::Int { negative: !negative, digits },
            Numeric::Float(f) => Numeric::Float(-f),
        }
    }

    fn into_literal(self, start: usize) -> LiteralResult<Literal> {
        match self {
            Numeric::Int { negative, digits } => {
                let text = if negative && digits != "0" { format!("-{}", digits) } else { digits };
                let number = exact_integer(&text)
                    .ok_or_else(|| LiteralError::new(start, "integer not representable"))?;
                Ok(match number.as_i64() {
                    Some(small) => Literal::Int(small),
                    None => Literal::BigInt(number),
                })
            }
            Numeric::Float(f) => Ok(Literal::Float(f)),
        }
    }
}

/// Rewrite `digits` (already validated for `radix`, no separators) in base
/// ten without leading zeros.
fn to_decimal(digits: &str, radix: u32) -> String {
    const LIMB: u64 = 1_000_000_000;

    // little-endian base-1e9 limbs
    let mut limbs: Vec<u64> = vec![0];
    for digit in digits.chars().filter_map(|c| c.to_digit(radix)) {
        let mut carry = u64::from(digit);
        for limb in limbs.iter_mut() {
            let value = *limb * u64::from(radix) + carry;
            *limb = value % LIMB;
            carry = value / LIMB;
        }
        while carry > 0 {
            limbs.push(carry % LIMB);
            carry /= LIMB;
        }
    }

    let mut out = String::new();
    for (i, limb) in limbs.iter().rev().enumerate() {
        if i == 0 {
            out.push_str(&limb.to_string());
        } else {
            out.push_str(&format!("{:09}", limb));
        }
    }
    out
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    fn new(src: &'a str) -> Self {
        Self { src, pos: 0, depth: 0 }
    }

    fn error(&self, message: impl Into<String>) -> LiteralError {
        LiteralError::new(self.pos, message)
    }

    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn peek_nth(&self, n: usize) -> Option<char> {
        self.rest().chars().nth(n)
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn expect(&mut self, wanted: char) -> LiteralResult<()> {
        match self.bump() {
            Some(c) if c == wanted => Ok(()),
            Some(c) => Err(self.error(format!("expected {:?}, found {:?}", wanted, c))),
            None => Err(self.error(format!("expected {:?}, found end of input", wanted))),
        }
    }

    fn skip_ws(&mut self) {
        loop {
            match self.peek() {
                Some(' ' | '\t' | '\n' | '\r' | '\x0c') => {
                    self.bump();
                }
                Some('\\') if matches!(self.peek_nth(1), Some('\n' | '\r')) => {
                    self.bump();
                    self.bump();
                    if self.peek() == Some('\n') {
                        self.bump();
                    }
                }
                _ => break,
            }
        }
    }

    fn value(&mut self) -> LiteralResult<Literal> {
        match self.peek() {
            None => Err(self.error("unexpected end of input")),
            Some('[') => self.nested(Self::list),
            Some('(') => self.nested(Self::tuple_or_group),
            Some('{') => self.nested(Self::dict),
            Some('\'' | '"') => self.strings(),
            Some('+' | '-') => self.signed_number(),
            Some(c) if c.is_ascii_digit() => {
                let start = self.pos;
                self.number()?.into_literal(start)
            }
            Some('.') if self.peek_nth(1).is_some_and(|c| c.is_ascii_digit()) => {
                let start = self.pos;
                self.number()?.into_literal(start)
            }
            Some(c) if is_ident_start(c) => self.word(),
            Some(c) => Err(self.error(format!("unexpected character {:?}", c))),
        }
    }

    fn nested(&mut self, parse: fn(&mut Self) -> LiteralResult<Literal>) -> LiteralResult<Literal> {
        if self.depth >= MAX_DEPTH {
            return Err(self.error("nesting too deep"));
        }
        self.depth += 1;
        let result = parse(self);
        self.depth -= 1;
        result
    }

    /// Comma-separated values up to `close`, trailing comma allowed.
    fn sequence(&mut self, close: char) -> LiteralResult<Vec<Literal>> {
        let mut items = Vec::new();
        loop {
            self.skip_ws();
            if self.peek() == Some(close) {
                self.bump();
                return Ok(items);
            }
            items.push(self.value()?);
            self.skip_ws();
            match self.bump() {
                Some(',') => continue,
                Some(c) if c == close => return Ok(items),
                Some(c) => {
                    return Err(self.error(format!("expected ',' or {:?}, found {:?}", close, c)));
                }
                None => return Err(self.error(format!("unclosed bracket, expected {:?}", close))),
            }
        }
    }

    fn list(&mut self) -> LiteralResult<Literal> {
        self.expect('[')?;
        Ok(Literal::List(self.sequence(']')?))
    }

    fn tuple_or_group(&mut self) -> LiteralResult<Literal> {
        self.expect('(')?;
        self.skip_ws();
        if self.peek() == Some(')') {
            self.bump();
            return Ok(Literal::Tuple(Vec::new()));
        }

        let first = self.value()?;
        self.skip_ws();
        match self.bump() {
            Some(')') => Ok(first),
            Some(',') => {
                let mut items = vec![first];
                items.extend(self.sequence(')')?);
                Ok(Literal::Tuple(items))
            }
            Some(c) => Err(self.error(format!("expected ',' or ')', found {:?}", c))),
            None => Err(self.error("unclosed parenthesis")),
        }
    }

    fn dict(&mut self) -> LiteralResult<Literal> {
        self.expect('{')?;
        let mut entries: Vec<(Literal, Literal)> = Vec::new();
        loop {
            self.skip_ws();
            if self.peek() == Some('}') {
                self.bump();
                return Ok(Literal::Dict(entries));
            }

            let key_pos = self.pos;
            let key = self.value()?;
            self.skip_ws();
            match self.bump() {
                Some(':') => {}
                Some(',' | '}') if entries.is_empty() => {
                    return Err(LiteralError::new(key_pos, "set literals are not supported"));
                }
                Some(c) => return Err(self.error(format!("expected ':', found {:?}", c))),
                None => return Err(self.error("unclosed brace")),
            }
            if !key.is_hashable() {
                return Err(LiteralError::new(key_pos, "unhashable dict key"));
            }

            self.skip_ws();
            let value = self.value()?;
            match entries.iter_mut().find(|(k, _)| k.key_eq(&key)) {
                Some(entry) => entry.1 = value,
                None => entries.push((key, value)),
            }

            self.skip_ws();
            match self.bump() {
                Some(',') => continue,
                Some('}') => return Ok(Literal::Dict(entries)),
                Some(c) => return Err(self.error(format!("expected ',' or '}}', found {:?}", c))),
                None => return Err(self.error("unclosed brace")),
            }
        }
    }

    fn signed_number(&mut self) -> LiteralResult<Literal> {
        let start = self.pos;
        let negative = self.bump() == Some('-');
        self.skip_ws();
        match self.peek() {
            Some(c) if c.is_ascii_digit() || c == '.' => {
                let n = self.number()?;
                if negative { n.negate() } else { n }.into_literal(start)
            }
            _ => Err(self.error("unary sign must be followed by a number")),
        }
    }

    fn number(&mut self) -> LiteralResult<Numeric> {
        let token = NUMBER_REGEX
            .find(self.rest())
            .map(|m| m.as_str())
            .ok_or_else(|| self.error("malformed number"))?;
        let start = self.pos;
        self.pos += token.len();

        match self.peek() {
            Some('j' | 'J') => return Err(self.error("complex numbers are not supported")),
            Some(c) if is_ident_continue(c) || c == '.' => {
                return Err(self.error(format!("malformed number near {:?}", c)));
            }
            _ => {}
        }

        let cleaned = token.replace('_', "");
        let radix = match cleaned.get(..2) {
            Some("0x" | "0X") => Some(16),
            Some("0o" | "0O") => Some(8),
            Some("0b" | "0B") => Some(2),
            _ => None,
        };

        if let Some(radix) = radix {
            return Ok(Numeric::Int {
                negative: false,
                digits: to_decimal(&cleaned[2..], radix),
            });
        }

        if cleaned.contains(['.', 'e', 'E']) {
            return cleaned
                .parse::<f64>()
                .map(Numeric::Float)
                .map_err(|_| LiteralError::new(start, "malformed float"));
        }

        if cleaned.len() > 1 && cleaned.starts_with('0') && cleaned.bytes().any(|b| b != b'0') {
            return Err(LiteralError::new(start, "leading zeros in decimal integer"));
        }

        Ok(Numeric::Int {
            negative: false,
            digits: to_decimal(&cleaned, 10),
        })
    }

    fn word(&mut self) -> LiteralResult<Literal> {
        let start = self.pos;
        while self.peek().is_some_and(is_ident_continue) {
            self.bump();
        }
        let src = self.src;
        let word = &src[start..self.pos];

        if matches!(self.peek(), Some('\'' | '"')) {
            return match word {
                "r" | "R" | "u" | "U" => {
                    self.pos = start;
                    self.strings()
                }
                _ => Err(LiteralError::new(start, format!("unsupported string prefix {:?}", word))),
            };
        }

        match word {
            "True" => Ok(Literal::Bool(true)),
            "False" => Ok(Literal::Bool(false)),
            "None" => Ok(Literal::None),
            _ => Err(LiteralError::new(start, format!("unexpected name {:?}", word))),
        }
    }

    /// One or more adjacent string literals, concatenated.
    fn strings(&mut self) -> LiteralResult<Literal> {
        let mut text = self.string()?;
        loop {
            let save = self.pos;
            self.skip_ws();
            if self.at_string_start() {
                text.push_str(&self.string()?);
            } else {
                self.pos = save;
                return Ok(Literal::Str(text));
            }
        }
    }

    fn at_string_start(&self) -> bool {
        match (self.peek(), self.peek_nth(1)) {
            (Some('\'' | '"'), _) => true,
            (Some('r' | 'R' | 'u' | 'U'), Some('\'' | '"')) => true,
            _ => false,
        }
    }

    fn string(&mut self) -> LiteralResult<String> {
        let raw = match self.peek() {
            Some('r' | 'R') => {
                self.bump();
                true
            }
            Some('u' | 'U') => {
                self.bump();
                false
            }
            _ => false,
        };

        let quote = match self.bump() {
            Some(q @ ('\'' | '"')) => q,
            _ => return Err(self.error("expected string quote")),
        };
        let triple = self.peek() == Some(quote) && self.peek_nth(1) == Some(quote);
        if triple {
            self.bump();
            self.bump();
        }

        let mut out = String::new();
        loop {
            let c = self
                .bump()
                .ok_or_else(|| self.error("unterminated string"))?;
            match c {
                c if c == quote => {
                    if !triple {
                        return Ok(out);
                    }
                    if self.peek() == Some(quote) && self.peek_nth(1) == Some(quote) {
                        self.bump();
                        self.bump();
                        return Ok(out);
                    }
                    out.push(c);
                }
                '\n' | '\r' if !triple => return Err(self.error("newline in single-quoted string")),
                '\\' if raw => {
                    out.push('\\');
                    if let Some(next) = self.bump() {
                        out.push(next);
                    }
                }
                '\\' => self.escape(&mut out)?,
                c => out.push(c),
            }
        }
    }

    fn escape(&mut self, out: &mut String) -> LiteralResult<()> {
        let c = self
            .bump()
            .ok_or_else(|| self.error("unterminated string"))?;
        match c {
            '\n' => {}
            '\r' => {
                if self.peek() == Some('\n') {
                    self.bump();
                }
            }
            '\\' | '\'' | '"' => out.push(c),
            'a' => out.push('\x07'),
            'b' => out.push('\x08'),
            'f' => out.push('\x0c'),
            'n' => out.push('\n'),
            'r' => out.push('\r'),
            't' => out.push('\t'),
            'v' => out.push('\x0b'),
            '0'..='7' => {
                let mut code = c.to_digit(8).unwrap_or(0);
                for _ in 0..2 {
                    match self.peek().and_then(|d| d.to_digit(8)) {
                        Some(d) => {
                            code = code * 8 + d;
                            self.bump();
                        }
                        None => break,
                    }
                }
                out.push(self.code_point(code)?);
            }
            'x' => out.push(self.hex_escape(2)?),
            'u' => out.push(self.hex_escape(4)?),
            'U' => out.push(self.hex_escape(8)?),
            'N' => return Err(self.error("named unicode escapes are not supported")),
            other => {
                out.push('\\');
                out.push(other);
            }
        }
        Ok(())
    }

    fn hex_escape(&mut self, len: usize) -> LiteralResult<char> {
        let digits = self
            .rest()
            .get(..len)
            .filter(|d| d.bytes().all(|b| b.is_ascii_hexdigit()))
            .ok_or_else(|| {
                self.error(format!("truncated \\x escape, expected {} hex digits", len))
            })?;
        let code = u32::from_str_radix(digits, 16).map_err(|_| self.error("invalid hex escape"))?;
        self.pos += len;
        self.code_point(code)
    }

    fn code_point(&self, code: u32) -> LiteralResult<char> {
        char::from_u32(code).ok_or_else(|| self.error(format!("invalid code point {:#x}", code)))
    }
}

fn is_ident_start(c: char) -> bool {
    c == '_' || c.is_alphabetic()
}

fn is_ident_continue(c: char) -> bool {
    c == '_' || c.is_alphanumeric()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(s: &str) -> Literal {
        parse_literal(s).unwrap_or_else(|e| panic!("{:?} failed: {}", s, e))
    }

    fn s(text: &str) -> Literal {
        Literal::Str(text.to_string())
    }

    #[test]
    fn test_keywords() {
        assert_eq!(parse("True"), Literal::Bool(true));
        assert_eq!(parse("False"), Literal::Bool(false));
        assert_eq!(parse("None"), Literal::None);
        assert!(parse_literal("true").is_err());
        assert!(parse_literal("null").is_err());
    }

    #[test]
    fn test_integers() {
        assert_eq!(parse("862"), Literal::Int(862));
        assert_eq!(parse("-5"), Literal::Int(-5));
        assert_eq!(parse("+ 5"), Literal::Int(5));
        assert_eq!(parse("1_000_000"), Literal::Int(1_000_000));
        assert_eq!(parse("0x1F"), Literal::Int(31));
        assert_eq!(parse("0o17"), Literal::Int(15));
        assert_eq!(parse("0b101"), Literal::Int(5));
        assert_eq!(parse("0"), Literal::Int(0));
        assert_eq!(parse("000"), Literal::Int(0));
        assert_eq!(parse("-9223372036854775808"), Literal::Int(i64::MIN));
    }

    #[test]
    fn test_integers_beyond_i64_stay_exact() {
        let big = |text: &str| Literal::BigInt(text.parse().unwrap());

        assert_eq!(parse("9223372036854775808"), big("9223372036854775808"));
        assert_eq!(parse("12345678901234567891"), big("12345678901234567891"));
        assert_eq!(parse("-9223372036854775809"), big("-9223372036854775809"));
        assert_eq!(
            parse("123_456_789_012_345_678_901_234_567_890"),
            big("123456789012345678901234567890")
        );
        assert_eq!(parse("0x1_0000_0000_0000_0000"), big("18446744073709551616"));
        assert_eq!(parse("0b1").to_json().to_string(), "1");
    }

    #[test]
    fn test_to_decimal() {
        assert_eq!(to_decimal("0", 10), "0");
        assert_eq!(to_decimal("000", 10), "0");
        assert_eq!(to_decimal("1000000000", 10), "1000000000");
        assert_eq!(to_decimal("ffffffffffffffff", 16), "18446744073709551615");
        assert_eq!(to_decimal("777", 8), "511");
    }

    #[test]
    fn test_malformed_integers() {
        assert!(parse_literal("007").is_err());
        assert!(parse_literal("1__0").is_err());
        assert!(parse_literal("1_").is_err());
        assert!(parse_literal("12abc").is_err());
        assert!(parse_literal("3j").is_err());
        assert!(parse_literal("- -1").is_err());
        assert!(parse_literal("-'a'").is_err());
    }

    #[test]
    fn test_floats() {
        assert_eq!(parse("1.5"), Literal::Float(1.5));
        assert_eq!(parse(".5"), Literal::Float(0.5));
        assert_eq!(parse("1."), Literal::Float(1.0));
        assert_eq!(parse("1e3"), Literal::Float(1000.0));
        assert_eq!(parse("2.5E-1"), Literal::Float(0.25));
        assert_eq!(parse("-0.0"), Literal::Float(-0.0));
        assert!(parse_literal("1.2.3").is_err());
    }

    #[test]
    fn test_strings() {
        assert_eq!(parse("'Tom Hanks'"), s("Tom Hanks"));
        assert_eq!(parse("\"Kelly O'Connell\""), s("Kelly O'Connell"));
        assert_eq!(parse(r"'it\'s'"), s("it's"));
        assert_eq!(parse(r"'a\nb\tc\\d'"), s("a\nb\tc\\d"));
        assert_eq!(parse(r"'\x41é\U0001F600\101'"), s("Aé😀A"));
        assert_eq!(parse(r"'\q'"), s("\\q"));
        assert_eq!(parse(r"r'\n'"), s("\\n"));
        assert_eq!(parse("u'Zo\u{eb}'"), s("Zoë"));
        assert_eq!(parse("'''tri'ple\nline'''"), s("tri'ple\nline"));
        assert_eq!(parse("'a' \"b\" 'c'"), s("abc"));
    }

    #[test]
    fn test_malformed_strings() {
        assert!(parse_literal("'open").is_err());
        assert!(parse_literal("'line\nbreak'").is_err());
        assert!(parse_literal(r"'\x4'").is_err());
        assert!(parse_literal("b'bytes'").is_err());
        assert!(parse_literal("f'{x}'").is_err());
        assert!(parse_literal(r"'\ud800'").is_err());
    }

    #[test]
    fn test_lists_and_tuples() {
        assert_eq!(parse("[]"), Literal::List(vec![]));
        assert_eq!(
            parse("[1, 'a', None,]"),
            Literal::List(vec![Literal::Int(1), s("a"), Literal::None])
        );
        assert_eq!(parse("()"), Literal::Tuple(vec![]));
        assert_eq!(parse("(1,)"), Literal::Tuple(vec![Literal::Int(1)]));
        assert_eq!(parse("(1)"), Literal::Int(1));
        assert_eq!(
            parse("[\n  [1],\n  (2, 3)\n]"),
            Literal::List(vec![
                Literal::List(vec![Literal::Int(1)]),
                Literal::Tuple(vec![Literal::Int(2), Literal::Int(3)]),
            ])
        );
    }

    #[test]
    fn test_malformed_sequences() {
        assert!(parse_literal("[1, 2").is_err());
        assert!(parse_literal("[1 2]").is_err());
        assert!(parse_literal("[,]").is_err());
        assert!(parse_literal("[1]]").is_err());
        assert!(parse_literal("[1] [2]").is_err());
    }

    #[test]
    fn test_dicts() {
        assert_eq!(
            parse("{'name': 'Tom', 'order': 0,}"),
            Literal::Dict(vec![(s("name"), s("Tom")), (s("order"), Literal::Int(0))])
        );
        assert_eq!(parse("{}"), Literal::Dict(vec![]));
    }

    #[test]
    fn test_duplicate_dict_keys_keep_first_position_last_value() {
        assert_eq!(
            parse("{'a': 1, 'b': 2, 'a': 3}"),
            Literal::Dict(vec![(s("a"), Literal::Int(3)), (s("b"), Literal::Int(2))])
        );
        assert_eq!(
            parse("{1: 'x', 1.0: 'y', True: 'z'}"),
            Literal::Dict(vec![(Literal::Int(1), s("z"))])
        );
    }

    #[test]
    fn test_malformed_dicts() {
        assert!(parse_literal("{'a', 'b'}").is_err());
        assert!(parse_literal("{'a': 1").is_err());
        assert!(parse_literal("{[1]: 2}").is_err());
        assert!(parse_literal("{'a' 1}").is_err());
    }

    #[test]
    fn test_rejects_names_and_expressions() {
        assert!(parse_literal("nan").is_err());
        assert!(parse_literal("foo(1)").is_err());
        assert!(parse_literal("1 + 2").is_err());
        assert!(parse_literal("").is_err());
        assert!(parse_literal("   ").is_err());
    }

    #[test]
    fn test_nesting_limit() {
        let deep = format!("{}{}", "[".repeat(MAX_DEPTH + 1), "]".repeat(MAX_DEPTH + 1));
        assert!(parse_literal(&deep).is_err());

        let ok = format!("{}{}", "[".repeat(MAX_DEPTH), "]".repeat(MAX_DEPTH));
        assert!(parse_literal(&ok).is_ok());
    }

    #[test]
    fn test_error_reports_offset() {
        let err = parse_literal("[1, @]").unwrap_err();
        assert_eq!(err.offset, 4);
    }
}
