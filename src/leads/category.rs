use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Returned when a categorical value given on the command line or in config
/// is not one of the known tags.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {kind} '{value}' (expected one of: {})", .expected.join(", "))]
pub struct ParseCategoryError {
    pub kind: &'static str,
    pub value: String,
    pub expected: &'static [&'static str],
}

/// Defines a closed set of kebab-case tags.
///
/// Stored data is read leniently: a tag outside the set is kept verbatim in
/// `Unknown` so an old or hand-edited file still loads. Parsing user input with
/// `FromStr` is strict and rejects unknown tags.
macro_rules! categorical {
    (
        $(#[$meta:meta])*
        $name:ident, $kind:literal {
            $($variant:ident => $tag:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(from = "String", into = "String")]
        pub enum $name {
            $($variant,)+
            Unknown(String),
        }

        impl $name {
            /// Every known tag, in display order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub const TAGS: &'static [&'static str] = &[$($tag),+];

            pub fn as_str(&self) -> &str {
                match self {
                    $($name::$variant => $tag,)+
                    $name::Unknown(raw) => raw,
                }
            }

            pub fn is_known(&self) -> bool {
                !matches!(self, $name::Unknown(_))
            }
        }

        impl From<String> for $name {
            fn from(raw: String) -> Self {
                let known = match raw.as_str() {
                    $($tag => Some($name::$variant),)+
                    _ => None,
                };
                known.unwrap_or($name::Unknown(raw))
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                match value {
                    $name::Unknown(raw) => raw,
                    known => known.as_str().to_string(),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = ParseCategoryError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_ascii_lowercase().as_str() {
                    $($tag => Ok($name::$variant),)+
                    _ => Err(ParseCategoryError {
                        kind: $kind,
                        value: s.to_string(),
                        expected: $name::TAGS,
                    }),
                }
            }
        }
    };
}

categorical! {
    /// Kind of work the prospect wants done.
    ProjectType, "project type" {
        CustomDevelopment => "custom-development",
        WebsiteRedesign => "website-redesign",
        Maintenance => "maintenance",
        Ecommerce => "ecommerce",
        MobileApp => "mobile-app",
    }
}

categorical! {
    /// Budget bracket, from under $5K up to $50K+.
    Budget, "budget" {
        Low => "low",
        Medium => "medium",
        High => "high",
        Enterprise => "enterprise",
    }
}

categorical! {
    /// How soon the prospect wants to start.
    Timeline, "timeline" {
        Urgent => "urgent",
        Soon => "soon",
        Future => "future",
    }
}

categorical! {
    CompanySize, "company size" {
        Small => "small",
        Medium => "medium",
        Enterprise => "enterprise",
    }
}

categorical! {
    /// Channel the lead came in through.
    Source, "source" {
        Website => "website",
        Referral => "referral",
        SocialMedia => "social-media",
        ColdOutreach => "cold-outreach",
        Other => "other",
    }
}

categorical! {
    /// Pipeline stage. Transitions are unconstrained.
    Status, "status" {
        New => "new",
        Qualified => "qualified",
        Contacted => "contacted",
        Proposal => "proposal",
        Won => "won",
        Lost => "lost",
    }
}

impl Status {
    /// Stages that count toward the "qualified" total.
    pub fn is_qualified(&self) -> bool {
        matches!(
            self,
            Status::Qualified | Status::Contacted | Status::Proposal | Status::Won
        )
    }
}
