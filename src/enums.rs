//! Closed string vocabularies.
//!
//! Every enum generated by [`string_enum!`] serializes as its wire string,
//! parses with `FromStr` and rejects values outside its vocabulary, both when
//! parsed and when deserialized.

/// Generate a closed string enum with `as_str`, `FromStr`, `Display` and serde impls.
macro_rules! string_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $wire:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        $vis enum $name {
            $( $(#[$vmeta])* $variant ),+
        }

        impl $name {
            /// Every member of the vocabulary, in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $( $name::$variant => $wire ),+
                }
            }
        }

        impl ::std::str::FromStr for $name {
            type Err = $crate::errors::ValidationError;

            fn from_str(value: &str) -> ::std::result::Result<Self, Self::Err> {
                match value {
                    $( $wire => Ok($name::$variant), )+
                    other => Err($crate::errors::ValidationError::new(format!(
                        "{:?} is not a valid {}",
                        other,
                        stringify!($name)
                    ))),
                }
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl ::serde::Serialize for $name {
            fn serialize<S: ::serde::Serializer>(
                &self,
                serializer: S,
            ) -> ::std::result::Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> ::serde::Deserialize<'de> for $name {
            fn deserialize<D: ::serde::Deserializer<'de>>(
                deserializer: D,
            ) -> ::std::result::Result<Self, D::Error> {
                let raw = <String as ::serde::Deserialize>::deserialize(deserializer)?;
                raw.parse()
                    .map_err(|err: $crate::errors::ValidationError| {
                        <D::Error as ::serde::de::Error>::custom(err.message)
                    })
            }
        }
    };
}

string_enum! {
    /// Number type shared by inventory, search and ordering endpoints.
    pub enum PhoneNumberType {
        Local => "local",
        TollFree => "toll_free",
        Mobile => "mobile",
        National => "national",
        SharedCost => "shared_cost",
        Landline => "landline",
    }
}

string_enum! {
    pub enum Direction {
        Inbound => "inbound",
        Outbound => "outbound",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_members() {
        assert_eq!("toll_free".parse::<PhoneNumberType>().unwrap(), PhoneNumberType::TollFree);
        assert_eq!(Direction::Outbound.to_string(), "outbound");
        assert_eq!(PhoneNumberType::ALL.len(), 6);
    }

    #[test]
    fn rejects_unknown_members() {
        let err = "tollfree".parse::<PhoneNumberType>().unwrap_err();
        assert_eq!(err.message, "\"tollfree\" is not a valid PhoneNumberType");
    }

    #[test]
    fn serde_uses_wire_strings() {
        let json = serde_json::to_string(&PhoneNumberType::SharedCost).unwrap();
        assert_eq!(json, "\"shared_cost\"");
        let parsed: Direction = serde_json::from_str("\"inbound\"").unwrap();
        assert_eq!(parsed, Direction::Inbound);
        assert!(serde_json::from_str::<Direction>("\"sideways\"").is_err());
    }
}
