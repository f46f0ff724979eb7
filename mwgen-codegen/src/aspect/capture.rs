//! Arity-indexed capture of a delegate call's results.

use mwgen_reflect::TypeExpr;

/// How the results of the delegate call are bound and returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Capture {
    /// No results: the call is a plain statement.
    None,
    /// One result, bound as `err` for `error` and `res` otherwise.
    Single(String),
    /// Two results, bound as `res, err`.
    Pair(String, String),
    /// Three or more results: `res0, res1, ...` plus `err` for a trailing
    /// `error`.
    Many(Vec<String>),
}

impl Capture {
    /// Choose bindings for `returns`, asking `fresh` for each name so
    /// bindings never shadow a parameter.
    pub fn for_returns(returns: &[TypeExpr], mut fresh: impl FnMut(&str) -> String) -> Self {
        match returns {
            [] => Capture::None,
            [single] if single.is_error() => Capture::Single(fresh("err")),
            [_] => Capture::Single(fresh("res")),
            [_, _] => Capture::Pair(fresh("res"), fresh("err")),
            many => {
                let last = many.len() - 1;
                Capture::Many(
                    many.iter()
                        .enumerate()
                        .map(|(i, ty)| {
                            if i == last && ty.is_error() {
                                fresh("err")
                            } else {
                                fresh(&format!("res{}", i))
                            }
                        })
                        .collect(),
                )
            }
        }
    }

    /// Binding names in result order.
    pub fn bindings(&self) -> Vec<&str> {
        match self {
            Capture::None => Vec::new(),
            Capture::Single(name) => vec![name.as_str()],
            Capture::Pair(res, err) => vec![res.as_str(), err.as_str()],
            Capture::Many(names) => names.iter().map(String::as_str).collect(),
        }
    }

    /// Whether this capture took the N-ary path.
    pub fn is_many(&self) -> bool {
        matches!(self, Capture::Many(_))
    }

    /// The statement performing `call` and binding its results.
    pub fn call_line(&self, call: &str) -> String {
        match self {
            Capture::None => call.to_string(),
            _ => format!("{} := {}", self.bindings().join(", "), call),
        }
    }

    /// The statement returning the bound results, if there are any.
    pub fn return_line(&self) -> Option<String> {
        match self {
            Capture::None => None,
            _ => Some(format!("return {}", self.bindings().join(", "))),
        }
    }
}
