//! Declarative macros shared by the field-based score types.

/// Generates `PartialOrd`, `Add`, `Sub`, and `Neg` for a field-based score type.
///
/// The constructor must accept fields in the order they are listed.
macro_rules! impl_score_ops {
    ($type:ident { $($field:ident),+ } => $ctor:ident) => {
        impl PartialOrd for $type {
            fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
                Some(self.cmp(other))
            }
        }

        impl std::ops::Add for $type {
            type Output = Self;

            fn add(self, other: Self) -> Self {
                $type::$ctor( $(self.$field + other.$field),+ )
            }
        }

        impl std::ops::Sub for $type {
            type Output = Self;

            fn sub(self, other: Self) -> Self {
                $type::$ctor( $(self.$field - other.$field),+ )
            }
        }

        impl std::ops::Neg for $type {
            type Output = Self;

            fn neg(self) -> Self {
                $type::$ctor( $(-self.$field),+ )
            }
        }
    };
}

/// Generates a `ParseableScore` impl for the `"Xsuffix/Ysuffix"` format.
macro_rules! impl_score_parse {
    ($type:ident { $($field:ident => $suffix:literal),+ } => $ctor:ident) => {
        impl $crate::score::traits::ParseableScore for $type {
            fn parse(s: &str) -> Result<Self, $crate::score::traits::ScoreParseError> {
                let s = s.trim();
                let mut parts = s.split('/');
                $(
                    let $field = {
                        let part = parts.next().map(str::trim).ok_or_else(|| {
                            $crate::score::traits::ScoreParseError {
                                message: format!(
                                    "Invalid {} '{}': missing the {} level",
                                    stringify!($type), s, $suffix
                                ),
                            }
                        })?;
                        let number = part.strip_suffix($suffix).ok_or_else(|| {
                            $crate::score::traits::ScoreParseError {
                                message: format!("'{}' must end with '{}'", part, $suffix),
                            }
                        })?;
                        number.parse::<i64>().map_err(|e| {
                            $crate::score::traits::ScoreParseError {
                                message: format!("Invalid {} score '{}': {}", $suffix, number, e),
                            }
                        })?
                    };
                )+
                if parts.next().is_some() {
                    return Err($crate::score::traits::ScoreParseError {
                        message: format!("Invalid {} '{}': too many levels", stringify!($type), s),
                    });
                }
                Ok($type::$ctor( $($field),+ ))
            }

            fn to_string_repr(&self) -> String {
                let parts: Vec<String> = vec![ $(format!("{}{}", self.$field, $suffix)),+ ];
                parts.join("/")
            }
        }
    };
}
