use crate::db::DatabaseError;
use serde::{Deserialize, Serialize};

/// Macro to generate enum with as_str + std::str::FromStr pattern.
/// Wire strings match the historical grid file format.
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $s)] $variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = DatabaseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(DatabaseError::InvalidEnum {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }
    };
}

str_enum!(Section {
    Poyet => "poyet",
    Organes => "organes",
    Somato => "somato",
    Sutures => "sutures",
    IntraOsseuse => "intraOsseuse",
    Specifique => "specifique",
});

impl Section {
    /// Fixed projection order: Poyet, Organes, Somato, Sutures,
    /// Intra-Osseuse, Spécifique.
    pub const ALL: [Section; 6] = [
        Section::Poyet,
        Section::Organes,
        Section::Somato,
        Section::Sutures,
        Section::IntraOsseuse,
        Section::Specifique,
    ];
}
