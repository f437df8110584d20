use crate::artifact::ArtifactKind;
use bitflags::bitflags;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::str::FromStr;

bitflags! {
    /// A set of artifact kinds, e.g. the categories a module actually populated.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
    pub struct KindSet: u32 {
        const CONTROLLER = 1 << 0;
        const SERVICE = 1 << 1;
        const REPOSITORY = 1 << 2;
        const MIGRATION = 1 << 3;
        const SEEDER = 1 << 4;
        const FACTORY = 1 << 5;
        const CONSOLE_COMMAND = 1 << 6;
        const MODEL = 1 << 7;
        const TRANSFORMER = 1 << 8;
        const CONFIG = 1 << 9;
        const ROUTE = 1 << 10;
        const PROVIDER = 1 << 11;
        const FACADE = 1 << 12;

        const ALL = (1 << 13) - 1;
    }
}

impl KindSet {
    /// Member kinds in load order.
    pub fn kinds(self) -> impl Iterator<Item = ArtifactKind> {
        ArtifactKind::ORDER.into_iter().filter(move |kind| self.contains(Self::from(*kind)))
    }
}

impl From<ArtifactKind> for KindSet {
    fn from(kind: ArtifactKind) -> Self {
        match kind {
            ArtifactKind::Controller => Self::CONTROLLER,
            ArtifactKind::Service => Self::SERVICE,
            ArtifactKind::Repository => Self::REPOSITORY,
            ArtifactKind::Migration => Self::MIGRATION,
            ArtifactKind::Seeder => Self::SEEDER,
            ArtifactKind::Factory => Self::FACTORY,
            ArtifactKind::ConsoleCommand => Self::CONSOLE_COMMAND,
            ArtifactKind::Model => Self::MODEL,
            ArtifactKind::Transformer => Self::TRANSFORMER,
            ArtifactKind::Config => Self::CONFIG,
            ArtifactKind::Route => Self::ROUTE,
            ArtifactKind::Provider => Self::PROVIDER,
            ArtifactKind::Facade => Self::FACADE,
        }
    }
}

impl From<&str> for KindSet {
    fn from(s: &str) -> Self {
        match s {
            "all" | "*" => Self::ALL,
            other => ArtifactKind::from_str(other).map_or_else(|_| Self::empty(), Self::from),
        }
    }
}

impl FromIterator<ArtifactKind> for KindSet {
    fn from_iter<I: IntoIterator<Item = ArtifactKind>>(iter: I) -> Self {
        iter.into_iter().fold(Self::empty(), |set, kind| set | Self::from(kind))
    }
}

impl Serialize for KindSet {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u32(self.bits())
    }
}

impl<'de> Deserialize<'de> for KindSet {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let bits = u32::deserialize(deserializer)?;
        Ok(Self::from_bits_truncate(bits))
    }
}
