use std::fmt;

/// A parsed `$ref` value, split the way a URI parser splits it.
///
/// Only the path and fragment components matter here: a reference with an
/// empty path points into the same document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    uri: String,
    path: String,
    fragment: String,
}

impl Reference {
    /// Split a URI-like string into its path and fragment components.
    pub fn parse(uri: &str) -> Self {
        let (rest, fragment) = match uri.split_once('#') {
            Some((rest, fragment)) => (rest, fragment),
            None => (uri, ""),
        };
        let rest = match rest.split_once('?') {
            Some((rest, _query)) => rest,
            None => rest,
        };
        let rest = strip_scheme(rest);
        // An authority runs up to the first `/`.
        let path = match rest.strip_prefix("//") {
            Some(authority_and_path) => authority_and_path
                .find('/')
                .map(|i| &authority_and_path[i..])
                .unwrap_or(""),
            None => rest,
        };

        Self {
            uri: uri.to_string(),
            path: path.to_string(),
            fragment: fragment.to_string(),
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn fragment(&self) -> &str {
        &self.fragment
    }

    /// True when the reference stays within the current document.
    pub fn is_relative(&self) -> bool {
        self.path.is_empty()
    }

    pub fn to_pointer(&self) -> JsonPointer {
        JsonPointer::from_fragment(&self.fragment)
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.uri)
    }
}

fn strip_scheme(input: &str) -> &str {
    let Some(colon) = input.find(':') else {
        return input;
    };
    let scheme = &input[..colon];
    let mut chars = scheme.chars();
    let valid = chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
    if valid { &input[colon + 1..] } else { input }
}

/// Ordered pointer tokens taken from a reference fragment.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct JsonPointer {
    tokens: Vec<String>,
}

impl JsonPointer {
    /// `/components/schemas/Foo` becomes `["components", "schemas", "Foo"]`.
    /// The first segment is always dropped, leading slash or not.
    pub fn from_fragment(fragment: &str) -> Self {
        let tokens = fragment.split('/').skip(1).map(str::to_string).collect();
        Self { tokens }
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn last(&self) -> Option<&str> {
        self.tokens.last().map(String::as_str)
    }

    pub fn starts_with(&self, prefix: &[&str]) -> bool {
        self.tokens.len() >= prefix.len()
            && self.tokens.iter().zip(prefix).all(|(token, p)| token == p)
    }
}

impl fmt::Display for JsonPointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for token in &self.tokens {
            write!(f, "/{token}")?;
        }
        Ok(())
    }
}
