use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

macro_rules! id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[repr(transparent)]
        #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
        #[cfg_attr(feature = "serde", serde(transparent))]
        pub struct $name(pub u64);

        impl Display for $name {
            #[inline]
            fn fmt(&self, f: &mut Formatter) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl AsRef<u64> for $name {
            #[inline]
            fn as_ref(&self) -> &u64 {
                &self.0
            }
        }

        impl PartialEq<u64> for $name {
            #[inline]
            fn eq(&self, other: &u64) -> bool {
                self.0 == *other
            }
        }

        impl From<u64> for $name {
            #[inline]
            fn from(id: u64) -> Self {
                Self(id)
            }
        }

        impl FromStr for $name {
            type Err = <u64 as FromStr>::Err;

            #[inline]
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(s.parse::<u64>()?))
            }
        }
    };
}

id!(
    /// The unique identifier of a tournament.
    TournamentId
);
id!(
    /// The unique identifier of a team within a tournament.
    TeamId
);
id!(
    /// The unique identifier of a fixture within a tournament.
    ///
    /// `FixtureId(0)` is the null id carried by fixtures that have not been
    /// persisted yet; the store assigns the real id on insertion.
    FixtureId
);
