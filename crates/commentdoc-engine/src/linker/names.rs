//! Name forms used for linking.
//!
//! Qualified names look like `ns::foo<T>::bar(int)const`. Scanning has to
//! respect nesting: a `::` or `.` inside template or argument lists is not a
//! separator. The symbol of an operator name (`operator<`, `operator()`) is a
//! single token and never opens or closes a list.

const OPERATOR: &[u8] = b"operator";
const OPERATOR_SYMBOLS: &[u8] = b"<>=!+-*/%^&|~,";

fn is_ident(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

/// Byte length of an operator name token starting at `i`, 0 when there is none.
fn operator_len(s: &str, i: usize) -> usize {
    let bytes = s.as_bytes();
    if !bytes[i..].starts_with(OPERATOR) || (i > 0 && is_ident(bytes[i - 1])) {
        return 0;
    }
    let mut end = i + OPERATOR.len();
    if bytes.get(end).copied().is_some_and(is_ident) {
        return 0;
    }
    while bytes.get(end) == Some(&b' ') {
        end += 1;
    }
    if bytes[end..].starts_with(b"()") || bytes[end..].starts_with(b"[]") {
        return end + 2 - i;
    }
    while bytes.get(end).is_some_and(|b| OPERATOR_SYMBOLS.contains(b)) {
        end += 1;
    }
    end - i
}

/// A byte cursor tracking angle and paren nesting of what it has consumed.
#[derive(Clone)]
struct NameCursor<'a> {
    s: &'a str,
    i: usize,
    angle: usize,
    paren: usize,
}

impl<'a> NameCursor<'a> {
    fn new(s: &'a str) -> Self {
        Self {
            s,
            i: 0,
            angle: 0,
            paren: 0,
        }
    }

    fn eof(&self) -> bool {
        self.i >= self.s.len()
    }

    fn peek(&self) -> Option<u8> {
        self.s.as_bytes().get(self.i).copied()
    }

    fn starts_with(&self, pat: &[u8]) -> bool {
        self.s.as_bytes()[self.i..].starts_with(pat)
    }

    /// Outside any template or argument list.
    fn at_top(&self) -> bool {
        self.angle == 0 && self.paren == 0
    }

    fn bump(&mut self) -> Option<u8> {
        let b = self.peek()?;
        let operator = operator_len(self.s, self.i);
        if operator > 0 {
            self.i += operator;
            return Some(b);
        }
        self.i += 1;
        match b {
            b'<' => self.angle += 1,
            b'>' => self.angle = self.angle.saturating_sub(1),
            b'(' => self.paren += 1,
            b')' => self.paren = self.paren.saturating_sub(1),
            _ => {}
        }
        Some(b)
    }
}

/// Relative link sigils.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    /// `*name`: a child of the referring scope
    Child,
    /// `?name`: a child of the referring scope's parent
    Sibling,
}

pub fn relative(raw: &str) -> Option<(Relation, &str)> {
    if let Some(name) = raw.strip_prefix('*') {
        Some((Relation::Child, name))
    } else {
        raw.strip_prefix('?').map(|name| (Relation::Sibling, name))
    }
}

/// Cut the argument list: `ns::f(int)const` becomes `ns::f`.
pub fn strip_signature(name: &str) -> &str {
    let mut cur = NameCursor::new(name);
    while !cur.eof() {
        if cur.at_top() && cur.peek() == Some(b'(') {
            return &name[..cur.i];
        }
        cur.bump();
    }
    name
}

/// Split off a trailing member access: `func(int).a` becomes `("func(int)", "a")`.
pub fn split_member(name: &str) -> Option<(&str, &str)> {
    let mut cur = NameCursor::new(name);
    let mut split = None;
    while !cur.eof() {
        if cur.at_top() && cur.peek() == Some(b'.') && !cur.starts_with(b"...") {
            split = Some(cur.i);
        }
        cur.bump();
    }
    let at = split.filter(|at| *at > 0 && *at + 1 < name.len())?;
    Some((&name[..at], &name[at + 1..]))
}

/// Remove template argument lists at any depth: `foo<T>::bar` becomes `foo::bar`.
pub fn strip_templates(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut depth = 0usize;
    let mut i = 0;
    while let Some(c) = name[i..].chars().next() {
        let operator = operator_len(name, i);
        if operator > 0 {
            if depth == 0 {
                out.push_str(&name[i..i + operator]);
            }
            i += operator;
            continue;
        }
        match c {
            '<' => depth += 1,
            '>' if depth > 0 => depth -= 1,
            _ if depth == 0 => out.push(c),
            _ => {}
        }
        i += c.len_utf8();
    }
    out
}

/// Split on `::` outside template and argument lists.
pub fn split_scopes(name: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut cur = NameCursor::new(name);
    let mut start = 0;
    while !cur.eof() {
        if cur.at_top() && cur.starts_with(b"::") {
            parts.push(&name[start..cur.i]);
            cur.bump();
            cur.bump();
            start = cur.i;
        } else {
            cur.bump();
        }
    }
    parts.push(&name[start..]);
    parts
}

/// The key a name is filed under in the short-name index.
pub fn short_key(name: &str) -> String {
    strip_templates(strip_signature(name.trim()))
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Every non-empty scope suffix of an id's short key, longest first:
/// `ns::bar::f2()const` gives `ns::bar::f2`, `bar::f2` and `f2`.
pub fn short_aliases(id: &str) -> Vec<String> {
    let key = short_key(id);
    let parts = split_scopes(&key);
    (0..parts.len())
        .map(|start| parts[start..].join("::"))
        .filter(|alias| !alias.is_empty() && !alias.starts_with("::"))
        .collect()
}

/// Last scope component of a name's short key.
pub fn last_component(name: &str) -> String {
    let key = short_key(name);
    split_scopes(&key)
        .last()
        .map(|last| last.to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("func(int)", "func")]
    #[case("ns::bar::f2()const", "ns::bar::f2")]
    #[case("foo<void(int)>::bar(int)", "foo<void(int)>::bar")]
    #[case("foo<T>", "foo<T>")]
    #[case("(", "")]
    fn test_strip_signature(#[case] name: &str, #[case] expected: &str) {
        assert_eq!(strip_signature(name), expected);
    }

    #[rstest]
    #[case("func(int).a", Some(("func(int)", "a")))]
    #[case("foo<A,B,C>.A", Some(("foo<A,B,C>", "A")))]
    #[case("printf(const char*,...)", None)]
    #[case("f(a.b)", None)]
    #[case("trailing.", None)]
    #[case(".leading", None)]
    fn test_split_member(#[case] name: &str, #[case] expected: Option<(&str, &str)>) {
        assert_eq!(split_member(name), expected);
    }

    #[test]
    fn test_split_scopes_respects_nesting() {
        assert_eq!(
            split_scopes("ns::foo<a::b>::bar(c::d)"),
            vec!["ns", "foo<a::b>", "bar(c::d)"]
        );
    }

    #[test]
    fn test_short_aliases() {
        assert_eq!(
            short_aliases("ns::bar::f2()const"),
            vec!["ns::bar::f2", "bar::f2", "f2"]
        );
        assert_eq!(short_aliases("foo<T>::member"), vec!["foo::member", "member"]);
        assert_eq!(short_aliases("a.hpp"), vec!["a.hpp"]);
    }

    #[rstest]
    #[case("foo<T>::operator<(const foo&)", "foo::operator<(const foo&)")]
    #[case("operator<<(ostream&,int)", "operator<<(ostream&,int)")]
    #[case("operator<=>", "operator<=>")]
    #[case("operator_count<T>", "operator_count")]
    fn test_strip_templates_keeps_operator_symbols(#[case] name: &str, #[case] expected: &str) {
        assert_eq!(strip_templates(name), expected);
    }

    #[test]
    fn test_operator_names() {
        assert_eq!(strip_signature("ns::operator<<(ostream&,int)"), "ns::operator<<");
        assert_eq!(strip_signature("a::operator()(int)const"), "a::operator()");
        assert_eq!(
            short_aliases("ns::foo<T>::operator<(const foo&)"),
            vec!["ns::foo::operator<", "foo::operator<", "operator<"]
        );
        assert_eq!(split_member("operator<(a,b).a"), Some(("operator<(a,b)", "a")));
    }

    #[test]
    fn test_relative_sigils() {
        assert_eq!(relative("*a"), Some((Relation::Child, "a")));
        assert_eq!(relative("?b"), Some((Relation::Sibling, "b")));
        assert_eq!(relative("c"), None);
    }

    #[test]
    fn test_last_component() {
        assert_eq!(last_component("ns::b<T>::c()"), "c");
        assert_eq!(last_component("c"), "c");
    }
}
