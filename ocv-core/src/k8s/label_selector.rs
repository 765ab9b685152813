use std::collections::{
    BTreeMap,
    BTreeSet,
};
use std::fmt;
use std::str::FromStr;

use lazy_static::lazy_static;
use regex::Regex;
use serde::{
    Deserialize,
    Deserializer,
    Serialize,
    Serializer,
    de,
};

use crate::errors::*;
use crate::prelude::*;

// The meanings of these operators is explained here:
// https://kubernetes.io/docs/concepts/overview/working-with-objects/labels/#set-based-requirement
pub const OPERATOR_IN: &str = "In";
pub const OPERATOR_NOT_IN: &str = "NotIn";
pub const OPERATOR_EXISTS: &str = "Exists";
pub const OPERATOR_DOES_NOT_EXIST: &str = "DoesNotExist";

lazy_static! {
    static ref SET_TERM_RE: Regex = Regex::new(r"^([^\s!=()]+)\s+(in|notin)\s*\((.*)\)$").expect("set term regex is valid");
    static ref KEY_RE: Regex =
        Regex::new(r"^([A-Za-z0-9]([A-Za-z0-9._-]*[A-Za-z0-9])?/)?[A-Za-z0-9]([A-Za-z0-9._-]*[A-Za-z0-9])?$")
            .expect("label key regex is valid");
    static ref VALUE_RE: Regex =
        Regex::new(r"^([A-Za-z0-9]([A-Za-z0-9._-]*[A-Za-z0-9])?)?$").expect("label value regex is valid");
}

err_impl! {SelectorError,
    #[error("malformed label selector requirement: {0:?}")]
    MalformedRequirement(metav1::LabelSelectorRequirement),

    #[error("could not parse label selector term: {0}")]
    InvalidTerm(String),
}

#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Requirement {
    Equals(String, String),
    NotEquals(String, String),
    In(String, BTreeSet<String>),
    NotIn(String, BTreeSet<String>),
    Exists(String),
    DoesNotExist(String),
}

impl Requirement {
    pub fn key(&self) -> &str {
        match self {
            Requirement::Equals(k, _)
            | Requirement::NotEquals(k, _)
            | Requirement::In(k, _)
            | Requirement::NotIn(k, _)
            | Requirement::Exists(k)
            | Requirement::DoesNotExist(k) => k,
        }
    }

    pub fn matches(&self, labels: &BTreeMap<String, String>) -> bool {
        match self {
            Requirement::Equals(k, v) => labels.get(k) == Some(v),
            Requirement::NotEquals(k, v) => labels.get(k) != Some(v),
            Requirement::In(k, values) => labels.get(k).is_some_and(|v| values.contains(v)),
            Requirement::NotIn(k, values) => !labels.get(k).is_some_and(|v| values.contains(v)),
            Requirement::Exists(k) => labels.contains_key(k),
            Requirement::DoesNotExist(k) => !labels.contains_key(k),
        }
    }
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let join = |values: &BTreeSet<String>| values.iter().cloned().collect::<Vec<_>>().join(",");
        match self {
            Requirement::Equals(k, v) => write!(f, "{k}={v}"),
            Requirement::NotEquals(k, v) => write!(f, "{k}!={v}"),
            Requirement::In(k, values) => write!(f, "{k} in ({})", join(values)),
            Requirement::NotIn(k, values) => write!(f, "{k} notin ({})", join(values)),
            Requirement::Exists(k) => write!(f, "{k}"),
            Requirement::DoesNotExist(k) => write!(f, "!{k}"),
        }
    }
}

// A LabelSelector is a conjunction of requirements; the empty selector matches everything.  The
// requirements are kept in a set so that two selectors built in a different order compare equal,
// which is what lets the label filter skip no-op selector changes.
//
// Selectors are validated when they're built, which means matching can never fail.
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq)]
pub struct LabelSelector {
    requirements: BTreeSet<Requirement>,
}

impl LabelSelector {
    pub fn everything() -> LabelSelector {
        LabelSelector::default()
    }

    pub fn from_pairs<K, V, I>(pairs: I) -> LabelSelector
    where
        K: Into<String>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        LabelSelector {
            requirements: pairs
                .into_iter()
                .map(|(k, v)| Requirement::Equals(k.into(), v.into()))
                .collect(),
        }
    }

    pub fn with(mut self, req: Requirement) -> LabelSelector {
        self.requirements.insert(req);
        self
    }

    pub fn parse(s: &str) -> anyhow::Result<LabelSelector> {
        let mut requirements = BTreeSet::new();
        for term in split_terms(s) {
            requirements.insert(parse_term(term)?);
        }
        Ok(LabelSelector { requirements })
    }

    pub fn is_empty(&self) -> bool {
        self.requirements.is_empty()
    }

    pub fn requirements(&self) -> impl Iterator<Item = &Requirement> {
        self.requirements.iter()
    }

    pub fn matches(&self, labels: &BTreeMap<String, String>) -> bool {
        self.requirements.iter().all(|req| req.matches(labels))
    }
}

// Split on the top-level commas, i.e., not the ones inside of an "in (a,b)" term
fn split_terms(s: &str) -> Vec<&str> {
    let mut terms = vec![];
    let (mut depth, mut start) = (0, 0);
    for (i, c) in s.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth -= 1,
            ',' if depth == 0 => {
                terms.push(&s[start..i]);
                start = i + 1;
            },
            _ => (),
        }
    }
    terms.push(&s[start..]);
    terms.into_iter().map(str::trim).filter(|t| !t.is_empty()).collect()
}

fn parse_term(term: &str) -> anyhow::Result<Requirement> {
    let req = if let Some(caps) = SET_TERM_RE.captures(term) {
        let key = caps[1].to_string();
        let values: BTreeSet<_> = caps[3]
            .split(',')
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(String::from)
            .collect();
        if values.is_empty() {
            bail!(SelectorError::invalid_term(term));
        }
        match &caps[2] {
            "in" => Requirement::In(key, values),
            _ => Requirement::NotIn(key, values),
        }
    } else if let Some((k, v)) = term.split_once("!=") {
        Requirement::NotEquals(k.trim().into(), v.trim().into())
    } else if let Some((k, v)) = term.split_once("==").or_else(|| term.split_once('=')) {
        Requirement::Equals(k.trim().into(), v.trim().into())
    } else if let Some(k) = term.strip_prefix('!') {
        Requirement::DoesNotExist(k.trim().into())
    } else {
        Requirement::Exists(term.into())
    };

    validate(&req).then_some(req).ok_or_else(|| SelectorError::invalid_term(term))
}

fn validate(req: &Requirement) -> bool {
    if !KEY_RE.is_match(req.key()) {
        return false;
    }
    match req {
        Requirement::Equals(_, v) | Requirement::NotEquals(_, v) => VALUE_RE.is_match(v),
        Requirement::In(_, values) | Requirement::NotIn(_, values) => values.iter().all(|v| VALUE_RE.is_match(v)),
        Requirement::Exists(_) | Requirement::DoesNotExist(_) => true,
    }
}

impl TryFrom<&metav1::LabelSelector> for LabelSelector {
    type Error = anyhow::Error;

    fn try_from(sel: &metav1::LabelSelector) -> anyhow::Result<LabelSelector> {
        let mut requirements = BTreeSet::new();
        for (k, v) in sel.match_labels.iter().flatten() {
            requirements.insert(Requirement::Equals(k.clone(), v.clone()));
        }

        // LabelSelectorRequirement is considered invalid if the Operator is "In" or NotIn"
        // and there are no values; conversely for "Exists" and "DoesNotExist".
        for expr in sel.match_expressions.iter().flatten() {
            let values: BTreeSet<String> = expr.values.iter().flatten().cloned().collect();
            let req = match (expr.operator.as_str(), values.is_empty()) {
                (OPERATOR_IN, false) => Requirement::In(expr.key.clone(), values),
                (OPERATOR_NOT_IN, false) => Requirement::NotIn(expr.key.clone(), values),
                (OPERATOR_EXISTS, true) => Requirement::Exists(expr.key.clone()),
                (OPERATOR_DOES_NOT_EXIST, true) => Requirement::DoesNotExist(expr.key.clone()),
                _ => bail!(SelectorError::malformed_requirement(expr)),
            };
            requirements.insert(req);
        }
        Ok(LabelSelector { requirements })
    }
}

impl FromStr for LabelSelector {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<LabelSelector> {
        LabelSelector::parse(s)
    }
}

impl fmt::Display for LabelSelector {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let terms: Vec<_> = self.requirements.iter().map(|r| r.to_string()).collect();
        write!(f, "{}", terms.join(","))
    }
}

impl Serialize for LabelSelector {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for LabelSelector {
    fn deserialize<D>(deserializer: D) -> Result<LabelSelector, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        LabelSelector::parse(&s).map_err(de::Error::custom)
    }
}
