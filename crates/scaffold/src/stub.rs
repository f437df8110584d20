//! Embedded source templates.

use modkit_domain::artifact::ArtifactKind;
use strum_macros::{Display, EnumIter, EnumString, IntoStaticStr};

const NAMESPACE: &str = "{{namespace}}";
const CLASS: &str = "{{class}}";

/// What a generator produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, EnumString, IntoStaticStr)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum StubKind {
    Controller,
    Service,
    Entity,
    Facade,
}

impl StubKind {
    #[must_use]
    pub const fn template(self) -> &'static str {
        match self {
            Self::Controller => include_str!("../stubs/controller.stub"),
            Self::Service => include_str!("../stubs/service.stub"),
            Self::Entity => include_str!("../stubs/entity.stub"),
            Self::Facade => include_str!("../stubs/facade.stub"),
        }
    }

    /// Artifact kind whose directory receives the generated file.
    #[must_use]
    pub const fn artifact(self) -> ArtifactKind {
        match self {
            Self::Controller => ArtifactKind::Controller,
            Self::Service => ArtifactKind::Service,
            Self::Entity => ArtifactKind::Model,
            Self::Facade => ArtifactKind::Facade,
        }
    }

    /// Substitutes the `{{namespace}}` and `{{class}}` placeholders.
    #[must_use]
    pub fn render(self, namespace: &str, class: &str) -> String {
        self.template().replace(NAMESPACE, namespace).replace(CLASS, class)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn renders_every_placeholder() {
        for kind in StubKind::iter() {
            let source = kind.render("App::Modules::Billing::Things", "Invoice");
            assert!(!source.contains("{{"), "{kind} left a placeholder");
            assert!(source.contains("pub struct Invoice"), "{kind}");
            assert!(source.contains("App::Modules::Billing::Things::Invoice"), "{kind}");
        }
    }

    #[test]
    fn parses_names() {
        assert_eq!(StubKind::from_str("Controller").ok(), Some(StubKind::Controller));
        assert_eq!(StubKind::from_str("entity").ok(), Some(StubKind::Entity));
        assert!(StubKind::from_str("widget").is_err());
    }

    #[test]
    fn entities_land_in_models() {
        assert_eq!(StubKind::Entity.artifact(), ArtifactKind::Model);
        assert_eq!(StubKind::Entity.artifact().segments(), ["Models"]);
    }
}
