//! Graph vocabulary: labels, relation types and typed attribute values.

use std::fmt;

use serde_json::Value as JsonValue;

/// Node label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Label {
    Tweet,
    User,
    Hashtag,
    Url,
}

impl Label {
    pub const ALL: [Label; 4] = [Label::Tweet, Label::User, Label::Hashtag, Label::Url];

    pub fn as_str(self) -> &'static str {
        match self {
            Label::Tweet => "Tweet",
            Label::User => "User",
            Label::Hashtag => "Hashtag",
            Label::Url => "Url",
        }
    }

    /// Attribute holding the natural key used for identity and edge matching.
    pub fn natural_key(self) -> &'static str {
        match self {
            Label::Tweet => "tweet_id",
            Label::User => "user_id",
            Label::Hashtag => "hashtag",
            Label::Url => "url",
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Relationship type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Relation {
    Contains,
    Contained,
    Mentions,
    Relates,
    Tweets,
    Tweeted,
}

impl Relation {
    pub const ALL: [Relation; 6] = [
        Relation::Contains,
        Relation::Contained,
        Relation::Mentions,
        Relation::Relates,
        Relation::Tweets,
        Relation::Tweeted,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Relation::Contains => "contains",
            Relation::Contained => "contained",
            Relation::Mentions => "mentions",
            Relation::Relates => "relates",
            Relation::Tweets => "tweets",
            Relation::Tweeted => "tweeted",
        }
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An attribute value tagged with its type at the call site.
///
/// The tag decides how the value is written; a key written as `Text("7")`
/// never matches a later lookup by `Int(7)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AttrValue {
    Int(i64),
    Text(String),
    Bool(bool),
}

impl AttrValue {
    pub fn as_int(&self) -> Option<i64> {
        match self {
            AttrValue::Int(i) => Some(*i),
            _ => None,
        }
    }
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttrValue::Int(i) => write!(f, "{}", i),
            AttrValue::Text(s) => write!(f, "'{}'", s),
            AttrValue::Bool(b) => write!(f, "{}", b),
        }
    }
}

impl From<AttrValue> for JsonValue {
    fn from(value: AttrValue) -> Self {
        match value {
            AttrValue::Int(i) => JsonValue::from(i),
            AttrValue::Text(s) => JsonValue::from(s),
            AttrValue::Bool(b) => JsonValue::from(b),
        }
    }
}

impl From<i64> for AttrValue {
    fn from(value: i64) -> Self {
        AttrValue::Int(value)
    }
}

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        AttrValue::Text(value.to_string())
    }
}

impl From<bool> for AttrValue {
    fn from(value: bool) -> Self {
        AttrValue::Bool(value)
    }
}

/// A named node attribute.
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    pub name: &'static str,
    pub value: AttrValue,
}

impl Attribute {
    pub fn new(name: &'static str, value: impl Into<AttrValue>) -> Self {
        Self {
            name,
            value: value.into(),
        }
    }
}

/// Equality predicate locating nodes by label and natural key.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeRef {
    pub label: Label,
    pub key: &'static str,
    pub value: AttrValue,
}

impl NodeRef {
    pub fn new(label: Label, value: impl Into<AttrValue>) -> Self {
        Self {
            label,
            key: label.natural_key(),
            value: value.into(),
        }
    }

    pub fn tweet(tweet_id: i64) -> Self {
        Self::new(Label::Tweet, tweet_id)
    }

    pub fn user(user_id: i64) -> Self {
        Self::new(Label::User, user_id)
    }

    pub fn hashtag(hashtag: &str) -> Self {
        Self::new(Label::Hashtag, hashtag)
    }

    pub fn url(url: &str) -> Self {
        Self::new(Label::Url, url)
    }
}

/// A directed edge between every node matching `from` and every node matching `to`.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeSpec {
    pub from: NodeRef,
    pub to: NodeRef,
    pub relation: Relation,
}

impl EdgeSpec {
    pub fn new(from: NodeRef, relation: Relation, to: NodeRef) -> Self {
        Self { from, to, relation }
    }
}
