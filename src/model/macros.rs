/// `Display` through an existing `as_str`. Shared by the two macros below.
macro_rules! string_enum_display {
    ($name:ident) => {
        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

/// String forms for the container lifecycle enums (`CompletionState`,
/// `CompletionMode`, `StoragePolicy`).
///
/// These are closed: a catalog or config file naming an unknown mode fails
/// to load instead of guessing. The enum carries
/// `#[serde(into = "String", try_from = "String")]`, so catalog JSON and
/// `tracing` fields spell a mode the same way (`"eject_all"`).
macro_rules! string_enum {
    ($name:ident { $($variant:ident => $str:expr),+ $(,)? }) => {
        impl $name {
            pub fn as_str(&self) -> &str {
                match self {
                    $($name::$variant => $str,)+
                }
            }
        }

        string_enum_display!($name);

        impl From<$name> for String {
            fn from(v: $name) -> Self {
                v.as_str().to_string()
            }
        }

        impl TryFrom<String> for $name {
            type Error = String;

            fn try_from(s: String) -> Result<Self, Self::Error> {
                match s.as_str() {
                    $($str => Ok($name::$variant),)+
                    other => Err(format!("unknown {}: {other}", stringify!($name))),
                }
            }
        }
    };
}

/// String forms for `ResourceType` and `ToolType`, which games extend.
///
/// Any name outside the built-in set becomes `Custom(name)`, so a catalog
/// can introduce "amber" or a "sickle" without touching this crate. Only the
/// empty name is rejected; `$label` names the kind in that error. The
/// `From<&str>` impl lets recipes be written as `Recipe::new([("stone", 2)])`.
macro_rules! string_enum_open {
    ($name:ident, $label:expr, { $($variant:ident => $str:expr),+ $(,)? }) => {
        impl $name {
            pub fn as_str(&self) -> &str {
                match self {
                    $($name::$variant => $str,)+
                    $name::Custom(s) => s,
                }
            }
        }

        string_enum_display!($name);

        impl From<$name> for String {
            fn from(v: $name) -> Self {
                match v {
                    $name::Custom(s) => s,
                    builtin => builtin.as_str().to_string(),
                }
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                match s {
                    $($str => $name::$variant,)+
                    other => $name::Custom(other.to_string()),
                }
            }
        }

        impl TryFrom<String> for $name {
            type Error = String;

            fn try_from(s: String) -> Result<Self, Self::Error> {
                if s.is_empty() {
                    return Err(format!("{} cannot be empty", $label));
                }
                Ok($name::from(s.as_str()))
            }
        }
    };
}
